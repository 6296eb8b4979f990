//! Toolbar highlighting derived from the current selection.

use crate::engine::Value;
use crate::models::{BlockType, ListKind, MarkType};

pub fn has_mark(value: &Value, mark: MarkType) -> bool {
    value.active_marks().contains(&mark)
}

pub fn has_block(value: &Value, kind: BlockType) -> bool {
    value.blocks().iter().any(|b| b.kind == kind)
}

/// A list button lights up only when the selection is in a list item whose
/// own container has that kind.
pub fn is_list_active(value: &Value, list: ListKind) -> bool {
    let blocks = value.blocks();
    let Some(first) = blocks.first() else {
        return false;
    };
    has_block(value, BlockType::ListItem)
        && value
            .document()
            .parent(first.key)
            .is_some_and(|parent| parent.kind == list.block_type())
}

/// The fixed set of toolbar buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToolbarButton {
    Mark(MarkType),
    Block(BlockType),
    List(ListKind),
    ImageUrl,
    ImageFile,
}

impl ToolbarButton {
    pub const ALL: [ToolbarButton; 11] = [
        ToolbarButton::Mark(MarkType::Bold),
        ToolbarButton::Mark(MarkType::Italic),
        ToolbarButton::Mark(MarkType::Underlined),
        ToolbarButton::Mark(MarkType::Code),
        ToolbarButton::Block(BlockType::HeadingOne),
        ToolbarButton::Block(BlockType::HeadingTwo),
        ToolbarButton::Block(BlockType::BlockQuote),
        ToolbarButton::List(ListKind::Numbered),
        ToolbarButton::List(ListKind::Bulleted),
        ToolbarButton::ImageUrl,
        ToolbarButton::ImageFile,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ToolbarButton::Mark(MarkType::Bold) => "Bold",
            ToolbarButton::Mark(MarkType::Italic) => "Italic",
            ToolbarButton::Mark(MarkType::Underlined) => "Underline",
            ToolbarButton::Mark(MarkType::Code) => "Code",
            ToolbarButton::Block(BlockType::HeadingOne) => "Heading 1",
            ToolbarButton::Block(BlockType::HeadingTwo) => "Heading 2",
            ToolbarButton::Block(BlockType::BlockQuote) => "Quote",
            ToolbarButton::Block(_) => "Block",
            ToolbarButton::List(ListKind::Numbered) => "Numbered list",
            ToolbarButton::List(ListKind::Bulleted) => "Bulleted list",
            ToolbarButton::ImageUrl => "Image from URL",
            ToolbarButton::ImageFile => "Upload image",
        }
    }

    pub fn is_active(self, value: &Value) -> bool {
        match self {
            ToolbarButton::Mark(mark) => has_mark(value, mark),
            ToolbarButton::Block(kind) => has_block(value, kind),
            ToolbarButton::List(list) => is_list_active(value, list),
            ToolbarButton::ImageUrl | ToolbarButton::ImageFile => {
                has_block(value, BlockType::Image)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::*;
    use crate::engine::{EditorEngine, Point, Range};

    #[test]
    fn test_has_mark_requires_whole_selection() {
        let mut e = editor(vec![p("bold plain")]);
        let key = text_key(&e, 0);
        e.select(Range::new(Point::new(key, 0), Point::new(key, 4)));
        e.toggle_mark(MarkType::Bold);
        assert!(has_mark(e.value(), MarkType::Bold));

        e.select(Range::new(Point::new(key, 0), Point::new(key, 8)));
        assert!(!has_mark(e.value(), MarkType::Bold));
    }

    #[test]
    fn test_has_block_any_selected() {
        let mut e = editor(vec![leaf(BlockType::HeadingOne, "h"), p("x")]);
        span(&mut e, 0, 1);
        assert!(has_block(e.value(), BlockType::HeadingOne));
        assert!(has_block(e.value(), BlockType::Paragraph));
        assert!(!has_block(e.value(), BlockType::BlockQuote));
    }

    #[test]
    fn test_bulleted_item_does_not_light_numbered_button() {
        let mut e = editor(vec![wrap(BlockType::BulletedList, vec![li("a")])]);
        caret(&mut e, 0, 0);
        assert!(ToolbarButton::List(ListKind::Bulleted).is_active(e.value()));
        assert!(!ToolbarButton::List(ListKind::Numbered).is_active(e.value()));
    }

    #[test]
    fn test_numbered_nested_in_bulleted_lights_only_inner_kind() {
        let mut e = editor(vec![wrap(
            BlockType::BulletedList,
            vec![li("a"), wrap(BlockType::NumberedList, vec![li("b")])],
        )]);
        caret(&mut e, 1, 0);
        assert!(is_list_active(e.value(), ListKind::Numbered));
        assert!(!is_list_active(e.value(), ListKind::Bulleted));
    }

    #[test]
    fn test_paragraph_lights_no_list_button() {
        let e = editor(vec![p("a")]);
        for button in ToolbarButton::ALL {
            assert!(!button.is_active(e.value()), "{button:?}");
        }
    }
}
