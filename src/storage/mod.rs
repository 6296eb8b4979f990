use crate::editor::{default_value, NodeLimit};
use crate::engine::{DocumentError, Value};
#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

pub(crate) const DATA_KEY: &str = "data";
pub(crate) const NODE_LIMIT_KEY: &str = "nodeLimit";

#[derive(Debug, thiserror::Error)]
pub(crate) enum StorageError {
    #[error("local storage is unavailable")]
    Unavailable,
    #[error("failed to write `{0}`")]
    Write(String),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// String key/value persistence.
pub(crate) trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserStore;

impl BrowserStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

impl KeyValueStore for BrowserStore {
    fn get_item(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = Self::storage().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|_| StorageError::Write(key.to_string()))
    }
}

/// In-process store; stands in for `localStorage` off the browser.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The last saved document, or the built-in one when nothing valid is stored.
pub(crate) fn load_document(store: &impl KeyValueStore) -> Value {
    let Some(json) = store.get_item(DATA_KEY) else {
        return default_value();
    };
    match Value::from_json(&json) {
        Ok(value) => {
            tracing::info!("restored saved document");
            value
        }
        Err(e) => {
            tracing::warn!(error = %e, "stored document is unreadable, using default");
            default_value()
        }
    }
}

/// Overwrites whatever was saved before.
pub(crate) fn save_document(store: &impl KeyValueStore, value: &Value) -> Result<(), StorageError> {
    let json = value.to_json()?;
    store.set_item(DATA_KEY, &json)?;
    tracing::info!(bytes = json.len(), "document saved");
    Ok(())
}

pub(crate) fn load_node_limit(store: &impl KeyValueStore) -> NodeLimit {
    store
        .get_item(NODE_LIMIT_KEY)
        .map(|raw| NodeLimit::parse(&raw))
        .unwrap_or_default()
}

pub(crate) fn save_node_limit(
    store: &impl KeyValueStore,
    limit: NodeLimit,
) -> Result<(), StorageError> {
    store.set_item(NODE_LIMIT_KEY, &limit.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::*;
    use crate::engine::EditorEngine;
    use crate::models::{BlockType, MarkType};

    #[test]
    fn test_empty_store_loads_defaults() {
        let store = MemoryStore::default();
        let value = load_document(&store);
        assert_eq!(
            value.to_json().expect("serializes"),
            default_value().to_json().expect("serializes")
        );
        assert_eq!(load_node_limit(&store), NodeLimit::UNLIMITED);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let store = MemoryStore::default();
        store.set_item(DATA_KEY, "{\"object\":").expect("memory write");
        store.set_item(NODE_LIMIT_KEY, "ten").expect("memory write");
        assert_eq!(
            load_document(&store).to_json().expect("serializes"),
            default_value().to_json().expect("serializes")
        );
        assert_eq!(load_node_limit(&store), NodeLimit::UNLIMITED);
    }

    #[test]
    fn test_save_then_reload_reproduces_document() {
        let store = MemoryStore::default();
        let mut e = editor(vec![
            leaf(BlockType::HeadingOne, "hi"),
            wrap(BlockType::NumberedList, vec![li("one"), li("two")]),
        ]);
        span(&mut e, 0, 1);
        e.toggle_mark(MarkType::Underlined);
        caret(&mut e, 2, 3);
        e.insert_block(crate::engine::BlockSpec {
            kind: BlockType::Image,
            data: crate::models::BlockData::image("data:image/jpeg;base64,/9j/"),
        });

        save_document(&store, e.value()).expect("save");
        let reloaded = load_document(&store);
        assert_eq!(json(&e), reloaded.to_json().expect("serializes"));
    }

    #[test]
    fn test_each_save_overwrites_previous() {
        let store = MemoryStore::default();
        let first = editor(vec![p("first")]);
        let second = editor(vec![p("second")]);
        save_document(&store, first.value()).expect("save");
        save_document(&store, second.value()).expect("save");
        assert_eq!(store.get_item(DATA_KEY), Some(json(&second)));
    }

    #[test]
    fn test_node_limit_is_string_encoded() {
        let store = MemoryStore::default();
        save_node_limit(&store, NodeLimit(25)).expect("save");
        assert_eq!(store.get_item(NODE_LIMIT_KEY).as_deref(), Some("25"));
        assert_eq!(load_node_limit(&store), NodeLimit(25));
    }
}
