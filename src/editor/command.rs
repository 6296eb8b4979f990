//! Toolbar and keyboard commands and their translation into engine calls.

use super::active::{has_block, ToolbarButton};
use super::hotkey::{Hotkey, KeyCombo};
use crate::engine::{BlockSpec, EditorEngine, Range};
use crate::models::{BlockData, BlockType, ListKind, MarkType, DEFAULT_NODE};

/// Deepest block depth that may still be indented. Top-level blocks have depth 1.
pub const MAX_INDENT_DEPTH: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    ToggleMark(MarkType),
    /// Heading one/two or block quote.
    ToggleBlock(BlockType),
    ToggleList(ListKind),
    Indent,
    Outdent,
    InsertImage(String),
}

/// Whether a command consumed its event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A command ran; suppress the platform default.
    Handled,
    /// Nothing happened; let the platform handle the event.
    PassThrough,
}

impl Command {
    pub fn from_hotkey(hotkey: Hotkey) -> Self {
        match hotkey {
            Hotkey::Bold => Command::ToggleMark(MarkType::Bold),
            Hotkey::Italic => Command::ToggleMark(MarkType::Italic),
            Hotkey::Underlined => Command::ToggleMark(MarkType::Underlined),
            Hotkey::Code => Command::ToggleMark(MarkType::Code),
            Hotkey::Tab => Command::Indent,
            Hotkey::ShiftTab => Command::Outdent,
        }
    }

    /// Image buttons open a prompt or file picker instead of running directly.
    pub fn from_button(button: ToolbarButton) -> Option<Self> {
        match button {
            ToolbarButton::Mark(mark) => Some(Command::ToggleMark(mark)),
            ToolbarButton::Block(kind) => Some(Command::ToggleBlock(kind)),
            ToolbarButton::List(list) => Some(Command::ToggleList(list)),
            ToolbarButton::ImageUrl | ToolbarButton::ImageFile => None,
        }
    }
}

pub fn translate_key(combo: &KeyCombo, is_mac: bool) -> Option<Command> {
    Hotkey::from_combo(combo, is_mac).map(Command::from_hotkey)
}

pub fn dispatch<E: EditorEngine + ?Sized>(editor: &mut E, command: &Command) -> Outcome {
    let outcome = match command {
        Command::ToggleMark(mark) => {
            editor.toggle_mark(*mark);
            Outcome::Handled
        }
        Command::ToggleBlock(kind) => match ListKind::from_block_type(*kind) {
            Some(list) => toggle_list(editor, list),
            None => toggle_block(editor, *kind),
        },
        Command::ToggleList(list) => toggle_list(editor, *list),
        Command::Indent => indent(editor),
        Command::Outdent => outdent(editor),
        Command::InsertImage(src) => insert_image(editor, src, None),
    };
    tracing::debug!(?command, ?outcome, "dispatch");
    outcome
}

fn exit_lists<E: EditorEngine + ?Sized>(editor: &mut E, kind: BlockType) {
    editor
        .set_blocks(kind)
        .unwrap_block(BlockType::BulletedList)
        .unwrap_block(BlockType::NumberedList);
}

fn toggle_block<E: EditorEngine + ?Sized>(editor: &mut E, kind: BlockType) -> Outcome {
    let value = editor.value();
    let is_active = has_block(value, kind);
    let is_list = has_block(value, BlockType::ListItem);
    let target = if is_active { DEFAULT_NODE } else { kind };

    if is_list {
        exit_lists(editor, target);
    } else {
        editor.set_blocks(target);
    }
    Outcome::Handled
}

fn toggle_list<E: EditorEngine + ?Sized>(editor: &mut E, list: ListKind) -> Outcome {
    let value = editor.value();
    let container = list.block_type();
    let is_list = has_block(value, BlockType::ListItem);
    let is_type = value.blocks().iter().any(|b| {
        value
            .document()
            .closest(b.key, |parent| parent.kind == container)
            .is_some()
    });

    if is_list && is_type {
        exit_lists(editor, DEFAULT_NODE);
    } else if is_list {
        editor
            .unwrap_block(list.other().block_type())
            .wrap_block(container);
    } else {
        editor.set_blocks(BlockType::ListItem).wrap_block(container);
    }
    Outcome::Handled
}

fn indent<E: EditorEngine + ?Sized>(editor: &mut E) -> Outcome {
    let value = editor.value();
    let document = value.document();
    let Some(block) = value.blocks().first().map(|b| b.key) else {
        return Outcome::PassThrough;
    };
    if document.previous_sibling(block).is_none() {
        return Outcome::PassThrough;
    }
    if document.depth(block).unwrap_or(0) > MAX_INDENT_DEPTH {
        return Outcome::PassThrough;
    }
    let list = document
        .parent(block)
        .and_then(|p| ListKind::from_block_type(p.kind))
        .unwrap_or(ListKind::Bulleted);

    editor
        .set_blocks(BlockType::ListItem)
        .wrap_block(list.block_type());
    Outcome::Handled
}

fn outdent<E: EditorEngine + ?Sized>(editor: &mut E) -> Outcome {
    let value = editor.value();
    let document = value.document();
    let blocks = value.blocks();
    let Some(first) = blocks.first() else {
        return Outcome::PassThrough;
    };
    let depth = document.depth(first.key);
    if blocks.iter().any(|b| document.depth(b.key) != depth) {
        return Outcome::PassThrough;
    }

    let target = match document.parent(first.key) {
        None => DEFAULT_NODE,
        Some(parent)
            if has_block(value, BlockType::ListItem) && parent.kind.is_container() =>
        {
            BlockType::ListItem
        }
        Some(_) => DEFAULT_NODE,
    };
    exit_lists(editor, target);
    Outcome::Handled
}

/// Optionally move to `target`, then insert a void image block there.
pub fn insert_image<E: EditorEngine + ?Sized>(
    editor: &mut E,
    src: &str,
    target: Option<Range>,
) -> Outcome {
    if let Some(range) = target {
        editor.select(range);
    }
    editor.insert_block(BlockSpec {
        kind: BlockType::Image,
        data: BlockData::image(src),
    });
    Outcome::Handled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::hotkey::Modifiers;
    use crate::engine::testing::*;
    use crate::engine::Editor;

    fn run(e: &mut Editor, command: Command) -> Outcome {
        dispatch(e, &command)
    }

    #[test]
    fn test_mark_toggle_twice_restores_document() {
        let mut e = editor(vec![p("some text"), p("more")]);
        span(&mut e, 0, 1);
        let before = json(&e);
        for mark in [MarkType::Bold, MarkType::Italic, MarkType::Underlined, MarkType::Code] {
            assert_eq!(run(&mut e, Command::ToggleMark(mark)), Outcome::Handled);
            assert_ne!(json(&e), before);
            run(&mut e, Command::ToggleMark(mark));
            assert_eq!(json(&e), before);
        }
    }

    #[test]
    fn test_simple_block_toggle_twice_restores_type() {
        for kind in [BlockType::HeadingOne, BlockType::HeadingTwo, BlockType::BlockQuote] {
            let mut e = editor(vec![p("first"), p("second")]);
            caret(&mut e, 0, 0);
            run(&mut e, Command::ToggleBlock(kind));
            assert_eq!(e.value().blocks()[0].kind, kind);
            run(&mut e, Command::ToggleBlock(kind));
            assert_eq!(e.value().blocks()[0].kind, BlockType::Paragraph);
        }
    }

    #[test]
    fn test_simple_block_toggle_from_same_type_round_trips() {
        for kind in [BlockType::HeadingOne, BlockType::HeadingTwo, BlockType::BlockQuote] {
            let mut e = editor(vec![leaf(kind, "first"), p("second")]);
            caret(&mut e, 0, 0);
            let before = json(&e);
            run(&mut e, Command::ToggleBlock(kind));
            assert_eq!(e.value().blocks()[0].kind, BlockType::Paragraph);
            run(&mut e, Command::ToggleBlock(kind));
            assert_eq!(e.value().blocks()[0].kind, kind);
            assert_eq!(json(&e), before);
        }
    }

    #[test]
    fn test_heading_from_list_item_exits_list() {
        let mut e = editor(vec![wrap(BlockType::BulletedList, vec![li("a")])]);
        caret(&mut e, 0, 0);
        run(&mut e, Command::ToggleBlock(BlockType::HeadingOne));
        assert_eq!(outline(&e), "heading-one,paragraph");
    }

    #[test]
    fn test_list_toggle_from_paragraph_then_same_kind_exits() {
        let mut e = editor(vec![p("a")]);
        caret(&mut e, 0, 0);
        run(&mut e, Command::ToggleList(ListKind::Bulleted));
        assert_eq!(outline(&e), "bulleted-list[list-item],paragraph");

        run(&mut e, Command::ToggleList(ListKind::Bulleted));
        assert_eq!(outline(&e), "paragraph,paragraph");
    }

    #[test]
    fn test_bulleted_to_numbered_converts_in_place() {
        let mut e = editor(vec![wrap(BlockType::BulletedList, vec![li("a"), li("b")])]);
        span(&mut e, 0, 1);
        let count = e.value().document().leaf_blocks().len();

        run(&mut e, Command::ToggleList(ListKind::Numbered));
        assert_eq!(outline(&e), "numbered-list[list-item,list-item],paragraph");
        assert_eq!(e.value().document().leaf_blocks().len(), count);

        let value = e.value();
        for block in value.blocks() {
            assert_eq!(block.kind, BlockType::ListItem);
            let container = value.document().parent(block.key).map(|p| p.kind);
            assert_eq!(container, Some(BlockType::NumberedList));
        }
    }

    #[test]
    fn test_indent_needs_previous_sibling() {
        let mut e = editor(vec![wrap(BlockType::BulletedList, vec![li("a"), li("b")])]);
        caret(&mut e, 0, 0);
        let before = json(&e);
        assert_eq!(run(&mut e, Command::Indent), Outcome::PassThrough);
        assert_eq!(json(&e), before);

        caret(&mut e, 1, 0);
        assert_eq!(run(&mut e, Command::Indent), Outcome::Handled);
        assert_eq!(
            outline(&e),
            "bulleted-list[list-item,bulleted-list[list-item]],paragraph"
        );
    }

    #[test]
    fn test_indent_keeps_parent_list_kind() {
        let mut e = editor(vec![wrap(BlockType::NumberedList, vec![li("a"), li("b")])]);
        caret(&mut e, 1, 0);
        run(&mut e, Command::Indent);
        assert_eq!(
            outline(&e),
            "numbered-list[list-item,numbered-list[list-item]],paragraph"
        );
    }

    #[test]
    fn test_indent_stops_at_max_depth() {
        use BlockType::BulletedList as Ul;
        // The last item sits at depth 4, i.e. three list levels deep.
        let mut e = editor(vec![wrap(
            Ul,
            vec![
                li("1"),
                wrap(Ul, vec![li("2"), wrap(Ul, vec![li("3"), li("4")])]),
            ],
        )]);
        caret(&mut e, 3, 0);
        let key = e.value().blocks()[0].key;
        assert_eq!(e.value().document().depth(key), Some(4));

        let before = json(&e);
        assert_eq!(run(&mut e, Command::Indent), Outcome::PassThrough);
        assert_eq!(json(&e), before);
    }

    #[test]
    fn test_indent_at_depth_three_is_allowed() {
        use BlockType::BulletedList as Ul;
        let mut e = editor(vec![wrap(
            Ul,
            vec![li("1"), wrap(Ul, vec![li("2"), li("3")])],
        )]);
        caret(&mut e, 2, 0);
        let key = e.value().blocks()[0].key;
        assert_eq!(e.value().document().depth(key), Some(3));
        assert_eq!(run(&mut e, Command::Indent), Outcome::Handled);
    }

    #[test]
    fn test_outdent_nested_item_one_level() {
        let mut e = editor(vec![wrap(
            BlockType::BulletedList,
            vec![li("a"), wrap(BlockType::BulletedList, vec![li("b")])],
        )]);
        caret(&mut e, 1, 0);
        assert_eq!(run(&mut e, Command::Outdent), Outcome::Handled);
        assert_eq!(outline(&e), "bulleted-list[list-item,list-item],paragraph");
    }

    #[test]
    fn test_outdent_top_level_block_resets_to_paragraph() {
        let mut e = editor(vec![leaf(BlockType::HeadingTwo, "h")]);
        caret(&mut e, 0, 0);
        assert_eq!(run(&mut e, Command::Outdent), Outcome::Handled);
        assert_eq!(outline(&e), "paragraph,paragraph");
    }

    #[test]
    fn test_outdent_declines_mixed_depth_selection() {
        let mut e = editor(vec![wrap(
            BlockType::BulletedList,
            vec![li("a"), wrap(BlockType::BulletedList, vec![li("b")])],
        )]);
        span(&mut e, 0, 1);
        let before = json(&e);
        assert_eq!(run(&mut e, Command::Outdent), Outcome::PassThrough);
        assert_eq!(json(&e), before);
    }

    #[test]
    fn test_insert_image_command() {
        let mut e = editor(vec![p("text")]);
        caret(&mut e, 0, 4);
        run(&mut e, Command::InsertImage("http://example.com/a.jpg".into()));
        assert_eq!(outline(&e), "paragraph,image,paragraph");
    }

    #[test]
    fn test_insert_image_at_target() {
        let mut e = editor(vec![p("one"), p("two")]);
        caret(&mut e, 1, 3);
        let target = Range::collapsed(crate::engine::Point::new(text_key(&e, 0), 0));
        insert_image(&mut e, "x.jpg", Some(target));
        assert_eq!(outline(&e), "image,paragraph,paragraph");
    }

    #[test]
    fn test_translate_key() {
        let combo = KeyCombo::new("u", Modifiers::primary(false));
        assert_eq!(
            translate_key(&combo, false),
            Some(Command::ToggleMark(MarkType::Underlined))
        );
        let shift_tab = KeyCombo::new("Tab", Modifiers::SHIFT);
        assert_eq!(translate_key(&shift_tab, false), Some(Command::Outdent));
        assert_eq!(translate_key(&KeyCombo::new("x", Modifiers::NONE), false), None);
    }

    #[test]
    fn test_from_button() {
        assert_eq!(
            Command::from_button(ToolbarButton::List(ListKind::Numbered)),
            Some(Command::ToggleList(ListKind::Numbered))
        );
        assert_eq!(Command::from_button(ToolbarButton::ImageFile), None);
    }
}
