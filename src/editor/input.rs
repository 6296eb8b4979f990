use super::command::Outcome;
use crate::engine::EditorEngine;

/// Native text-editing intents the editor surface takes over from the browser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputAction {
    InsertText(String),
    SplitBlock,
    DeleteBackward,
    /// Forward/word deletes act only on an expanded selection.
    DeleteSelection,
    Unsupported(String),
}

/// Map a `beforeinput` event's `inputType` (and `data`) to an action.
pub fn parse_input_type(input_type: &str, data: Option<String>) -> InputAction {
    match input_type {
        "insertText" | "insertReplacementText" | "insertFromPaste" | "insertFromDrop" => {
            match data {
                Some(text) if !text.is_empty() => InputAction::InsertText(text),
                _ => InputAction::Unsupported(input_type.to_string()),
            }
        }
        "insertParagraph" | "insertLineBreak" => InputAction::SplitBlock,
        "deleteContentBackward" | "deleteWordBackward" | "deleteSoftLineBackward"
        | "deleteHardLineBackward" => InputAction::DeleteBackward,
        "deleteContentForward" | "deleteWordForward" | "deleteByCut" | "deleteContent" => {
            InputAction::DeleteSelection
        }
        other => InputAction::Unsupported(other.to_string()),
    }
}

pub fn apply_input<E: EditorEngine + ?Sized>(editor: &mut E, action: &InputAction) -> Outcome {
    match action {
        InputAction::InsertText(text) => {
            editor.insert_text(text);
        }
        InputAction::SplitBlock => {
            editor.split_block();
        }
        InputAction::DeleteBackward => {
            editor.delete_backward();
        }
        InputAction::DeleteSelection => {
            if editor.value().selection().is_collapsed() {
                return Outcome::PassThrough;
            }
            editor.delete_backward();
        }
        InputAction::Unsupported(kind) => {
            tracing::debug!(input_type = %kind, "ignoring unsupported input");
            return Outcome::PassThrough;
        }
    }
    Outcome::Handled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::*;

    #[test]
    fn test_parse_input_type() {
        assert_eq!(
            parse_input_type("insertText", Some("a".into())),
            InputAction::InsertText("a".into())
        );
        assert_eq!(
            parse_input_type("insertText", None),
            InputAction::Unsupported("insertText".into())
        );
        assert_eq!(parse_input_type("insertParagraph", None), InputAction::SplitBlock);
        assert_eq!(
            parse_input_type("deleteContentBackward", None),
            InputAction::DeleteBackward
        );
        assert_eq!(
            parse_input_type("historyUndo", None),
            InputAction::Unsupported("historyUndo".into())
        );
    }

    #[test]
    fn test_typing_and_enter() {
        let mut e = editor(vec![p("ab")]);
        caret(&mut e, 0, 1);
        apply_input(&mut e, &InputAction::InsertText("X".into()));
        apply_input(&mut e, &InputAction::SplitBlock);
        assert_eq!(outline(&e), "paragraph,paragraph");
        let texts: Vec<String> = e
            .value()
            .document()
            .texts()
            .iter()
            .map(|t| t.text())
            .collect();
        assert_eq!(texts, vec!["aX".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_forward_delete_needs_expanded_selection() {
        let mut e = editor(vec![p("abc")]);
        caret(&mut e, 0, 1);
        let before = json(&e);
        assert_eq!(
            apply_input(&mut e, &InputAction::DeleteSelection),
            Outcome::PassThrough
        );
        assert_eq!(json(&e), before);

        span(&mut e, 0, 0);
        assert_eq!(apply_input(&mut e, &InputAction::DeleteSelection), Outcome::Handled);
        assert_eq!(e.value().document().texts()[0].text(), "");
    }
}
