//! The control layer between the UI and the editing engine.

pub(crate) mod active;
pub(crate) mod command;
pub(crate) mod hotkey;
pub(crate) mod image;
pub(crate) mod input;
pub(crate) mod limit;

pub(crate) use active::ToolbarButton;
pub(crate) use command::{dispatch, insert_image, translate_key, Command, Outcome};
pub(crate) use hotkey::KeyCombo;
pub(crate) use image::{begin_upload, read_file, url_from_prompt, ImageError, UploadTask};
pub(crate) use input::{apply_input, parse_input_type, InputAction};
pub(crate) use limit::{node_count, save_allowed, NodeLimit};

use crate::engine::{Document, Value};

const DEFAULT_VALUE_JSON: &str = include_str!("default_value.json");

/// The built-in document shown when nothing has been saved yet.
pub(crate) fn default_value() -> Value {
    Value::from_json(DEFAULT_VALUE_JSON).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "built-in document is invalid, starting empty");
        Value::new(Document::default())
    })
}
