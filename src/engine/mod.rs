//! A minimal block/mark rich-text engine.
//!
//! The application talks to it only through [`EditorEngine`]: it reads the
//! current [`Value`] and issues commands. Each command builds a new snapshot
//! and swaps it in whole; nothing outside this module mutates a document.

mod node;
mod transform;
mod value;

pub use node::{Block, Document, Leaf, Node, NodeKey, Text};
pub use value::{Point, Range, Value};

use crate::models::{BlockData, BlockType, MarkType};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid document json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("document has no nodes")]
    Empty,
}

/// The block to create with [`EditorEngine::insert_block`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockSpec {
    pub kind: BlockType,
    pub data: BlockData,
}

/// Command and query surface of the editing engine.
pub trait EditorEngine {
    fn value(&self) -> &Value;

    fn toggle_mark(&mut self, mark: MarkType) -> &mut Self;
    fn set_blocks(&mut self, kind: BlockType) -> &mut Self;
    fn wrap_block(&mut self, kind: BlockType) -> &mut Self;
    fn unwrap_block(&mut self, kind: BlockType) -> &mut Self;
    fn insert_block(&mut self, block: BlockSpec) -> &mut Self;
    fn select(&mut self, range: Range) -> &mut Self;

    fn insert_text(&mut self, text: &str) -> &mut Self;
    fn delete_backward(&mut self) -> &mut Self;
    fn split_block(&mut self) -> &mut Self;
}

#[derive(Clone, Debug)]
pub struct Editor {
    value: Value,
}

impl Editor {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    fn change(&mut self, f: impl FnOnce(&mut Value)) -> &mut Self {
        let mut next = self.value.clone();
        f(&mut next);
        next.normalize();
        self.value = next;
        self
    }
}

impl EditorEngine for Editor {
    fn value(&self) -> &Value {
        &self.value
    }

    fn toggle_mark(&mut self, mark: MarkType) -> &mut Self {
        self.change(|v| v.apply_toggle_mark(mark))
    }

    fn set_blocks(&mut self, kind: BlockType) -> &mut Self {
        self.change(|v| v.apply_set_blocks(kind))
    }

    fn wrap_block(&mut self, kind: BlockType) -> &mut Self {
        self.change(|v| v.apply_wrap_block(kind))
    }

    fn unwrap_block(&mut self, kind: BlockType) -> &mut Self {
        self.change(|v| v.apply_unwrap_block(kind))
    }

    fn insert_block(&mut self, block: BlockSpec) -> &mut Self {
        self.change(|v| v.apply_insert_block(block.kind, block.data))
    }

    fn select(&mut self, range: Range) -> &mut Self {
        self.change(|v| v.apply_select(range))
    }

    fn insert_text(&mut self, text: &str) -> &mut Self {
        self.change(|v| v.apply_insert_text(text))
    }

    fn delete_backward(&mut self) -> &mut Self {
        self.change(|v| v.apply_delete_backward())
    }

    fn split_block(&mut self) -> &mut Self {
        self.change(|v| v.apply_split_block())
    }
}
