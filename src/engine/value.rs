use super::node::{Block, Document, Marks, NodeKey, Text};
use super::DocumentError;
use serde::{Deserialize, Serialize};

/// A caret position: a text node and a char offset into it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub key: NodeKey,
    pub offset: usize,
}

impl Point {
    pub fn new(key: NodeKey, offset: usize) -> Self {
        Self { key, offset }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Range {
    pub anchor: Point,
    pub focus: Point,
}

impl Range {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point,
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "object", rename = "value")]
struct Snapshot {
    document: Document,
}

#[derive(Serialize)]
#[serde(tag = "object", rename = "value")]
struct SnapshotRef<'a> {
    document: &'a Document,
}

/// An immutable editor snapshot: document, selection and pending marks.
#[derive(Clone, Debug)]
pub struct Value {
    pub(crate) document: Document,
    pub(crate) selection: Range,
    /// Marks to apply to the next insertion at a collapsed caret.
    pub(crate) marks: Option<Marks>,
}

impl Value {
    pub fn new(document: Document) -> Self {
        let mut value = Self {
            document,
            selection: Range::default(),
            marks: None,
        };
        value.normalize();
        value.select_start();
        value
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        if snapshot.document.nodes.is_empty() {
            return Err(DocumentError::Empty);
        }
        let mut document = snapshot.document;
        document.rekey();
        Ok(Self::new(document))
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(&SnapshotRef {
            document: &self.document,
        })?)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> Range {
        self.selection
    }

    pub fn pending_marks(&self) -> Option<&Marks> {
        self.marks.as_ref()
    }

    pub(crate) fn select_start(&mut self) {
        if let Some(first) = self.document.texts().first() {
            self.selection = Range::collapsed(Point::new(first.key, 0));
        }
    }

    fn text_index(&self, key: NodeKey) -> Option<usize> {
        self.document.texts().iter().position(|t| t.key == key)
    }

    /// Selection endpoints in document order.
    pub fn ordered(&self) -> (Point, Point) {
        let Range { anchor, focus } = self.selection;
        let a = self.text_index(anchor.key);
        let f = self.text_index(focus.key);
        if (a, anchor.offset) <= (f, focus.offset) {
            (anchor, focus)
        } else {
            (focus, anchor)
        }
    }

    /// Texts touched by the selection, with the `[start, end)` slice of each.
    pub(crate) fn selected_texts(&self) -> Vec<(&Text, usize, usize)> {
        let (start, end) = self.ordered();
        let texts = self.document.texts();
        let (Some(si), Some(ei)) = (
            texts.iter().position(|t| t.key == start.key),
            texts.iter().position(|t| t.key == end.key),
        ) else {
            return Vec::new();
        };
        texts[si..=ei]
            .iter()
            .map(|t| {
                let s = if t.key == start.key { start.offset } else { 0 };
                let e = if t.key == end.key { end.offset } else { t.len() };
                (*t, s, e)
            })
            .collect()
    }

    /// Leaf blocks touched by the selection, in document order.
    pub fn blocks(&self) -> Vec<&Block> {
        let mut out: Vec<&Block> = Vec::new();
        for (text, _, _) in self.selected_texts() {
            if let Some(block) = self.document.parent(text.key) {
                if !out.iter().any(|b| b.key == block.key) {
                    out.push(block);
                }
            }
        }
        out
    }

    /// Marks carried uniformly by the whole selection.
    pub fn active_marks(&self) -> Marks {
        if self.selection.is_collapsed() {
            if let Some(marks) = &self.marks {
                return marks.clone();
            }
            let focus = self.selection.focus;
            return self
                .document
                .texts()
                .into_iter()
                .find(|t| t.key == focus.key)
                .map(|t| t.marks_at(focus.offset))
                .unwrap_or_default();
        }
        let mut acc: Option<Marks> = None;
        for (text, s, e) in self.selected_texts() {
            if let Some(marks) = text.marks_in(s, e) {
                acc = Some(match acc {
                    None => marks,
                    Some(m) => m.intersection(&marks).copied().collect(),
                });
            }
        }
        acc.unwrap_or_default()
    }

    /// Parent block of the text the focus sits in.
    pub(crate) fn focus_block(&self) -> Option<&Block> {
        self.document.parent(self.selection.focus.key)
    }
}
