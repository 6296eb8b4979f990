use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Inline formatting carried by a run of text.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MarkType {
    Bold,
    Italic,
    Underlined,
    Code,
}

/// Structural node types.
///
/// `BulletedList` and `NumberedList` are containers; everything else holds text
/// directly. `Image` is void.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BlockType {
    #[default]
    Paragraph,
    HeadingOne,
    HeadingTwo,
    BlockQuote,
    ListItem,
    BulletedList,
    NumberedList,
    Image,
}

/// The block type every "reset" lands on.
pub const DEFAULT_NODE: BlockType = BlockType::Paragraph;

impl BlockType {
    pub fn is_container(self) -> bool {
        matches!(self, BlockType::BulletedList | BlockType::NumberedList)
    }

    pub fn is_void(self) -> bool {
        matches!(self, BlockType::Image)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListKind {
    Bulleted,
    Numbered,
}

impl ListKind {
    pub fn block_type(self) -> BlockType {
        match self {
            ListKind::Bulleted => BlockType::BulletedList,
            ListKind::Numbered => BlockType::NumberedList,
        }
    }

    pub fn from_block_type(kind: BlockType) -> Option<Self> {
        match kind {
            BlockType::BulletedList => Some(ListKind::Bulleted),
            BlockType::NumberedList => Some(ListKind::Numbered),
            _ => None,
        }
    }

    /// The opposite container.
    pub fn other(self) -> Self {
        match self {
            ListKind::Bulleted => ListKind::Numbered,
            ListKind::Numbered => ListKind::Bulleted,
        }
    }
}

/// Data attached to a block. Only images carry any today.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

impl BlockData {
    pub fn image(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_block_type_string_forms_match_document_format() {
        assert_eq!(BlockType::HeadingOne.to_string(), "heading-one");
        assert_eq!(BlockType::BlockQuote.as_ref(), "block-quote");
        assert_eq!(
            BlockType::from_str("numbered-list").ok(),
            Some(BlockType::NumberedList)
        );
        let v = serde_json::to_value(BlockType::ListItem).expect("should serialize");
        assert_eq!(v, "list-item");
    }

    #[test]
    fn test_mark_type_serde() {
        let m: MarkType = serde_json::from_str("\"underlined\"").expect("should parse");
        assert_eq!(m, MarkType::Underlined);
        assert_eq!(MarkType::Code.to_string(), "code");
    }

    #[test]
    fn test_list_kind_other_and_mapping() {
        assert_eq!(ListKind::Bulleted.other(), ListKind::Numbered);
        assert_eq!(
            ListKind::from_block_type(BlockType::NumberedList),
            Some(ListKind::Numbered)
        );
        assert_eq!(ListKind::from_block_type(BlockType::ListItem), None);
        assert!(BlockType::BulletedList.is_container());
        assert!(!BlockType::ListItem.is_container());
    }
}
