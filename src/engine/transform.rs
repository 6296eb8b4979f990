//! Mutations behind the editor commands, plus schema normalization.
//!
//! Every function here works on a scratch copy of a [`Value`]; the editor swaps
//! the copy in only after [`Value::normalize`] has run.

use super::node::{Block, Document, KeyGen, Node, NodeKey, Text};
use super::value::{Point, Range, Value};
use crate::models::{BlockData, BlockType, MarkType, DEFAULT_NODE};

impl Value {
    pub(crate) fn apply_select(&mut self, range: Range) {
        self.selection = range;
        self.marks = None;
    }

    pub(crate) fn apply_toggle_mark(&mut self, mark: MarkType) {
        let active = self.active_marks();
        if self.selection.is_collapsed() {
            let mut marks = active;
            if !marks.remove(&mark) {
                marks.insert(mark);
            }
            self.marks = Some(marks);
            return;
        }

        let on = !active.contains(&mark);
        let spans: Vec<(NodeKey, usize, usize)> = self
            .selected_texts()
            .into_iter()
            .map(|(t, s, e)| (t.key, s, e))
            .collect();
        for (key, s, e) in spans {
            if let Some(text) = self.document.text_mut(key) {
                text.set_mark(s, e, mark, on);
            }
        }
    }

    pub(crate) fn apply_set_blocks(&mut self, kind: BlockType) {
        let keys: Vec<NodeKey> = self.blocks().iter().map(|b| b.key).collect();
        for key in keys {
            if let Some(block) = self.document.block_mut(key) {
                if !block.kind.is_void() {
                    block.kind = kind;
                }
            }
        }
    }

    /// Wrap the selected blocks, at the level of their closest common
    /// ancestor, in a new block of `kind`.
    pub(crate) fn apply_wrap_block(&mut self, kind: BlockType) {
        let keys: Vec<NodeKey> = self.blocks().iter().map(|b| b.key).collect();
        let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
            return;
        };
        let (Some(first), Some(last)) = (self.document.path_of(*first), self.document.path_of(*last))
        else {
            return;
        };

        let limit = first.len().min(last.len()) - 1;
        let mut common = 0;
        while common < limit && first[common] == last[common] {
            common += 1;
        }
        let (start, end) = (first[common], last[common]);
        let parent = first[..common].to_vec();

        let key = self.document.alloc_key();
        let Some(children) = self.document.children_mut(&parent) else {
            return;
        };
        let moved: Vec<Node> = children.drain(start..=end).collect();
        children.insert(start, Node::Block(Block::new(key, kind, moved)));
    }

    /// Lift the selected blocks out of their closest ancestor of `kind`,
    /// splitting that ancestor around them.
    pub(crate) fn apply_unwrap_block(&mut self, kind: BlockType) {
        let selected: Vec<NodeKey> = self.blocks().iter().map(|b| b.key).collect();
        let mut wrappers: Vec<NodeKey> = Vec::new();
        for key in &selected {
            if let Some(w) = self.document.closest(*key, |b| b.kind == kind) {
                if !wrappers.contains(&w.key) {
                    wrappers.push(w.key);
                }
            }
        }
        for wrapper in wrappers {
            lift_children(&mut self.document, wrapper, &selected);
        }
    }

    pub(crate) fn apply_insert_block(&mut self, kind: BlockType, data: BlockData) {
        if !self.selection.is_collapsed() {
            self.delete_range();
        }
        let point = self.selection.focus;
        let Some(block) = self.document.parent(point.key) else {
            return;
        };
        let (block_key, is_void, len) = (block.key, block.kind.is_void(), block.text_len());
        let Some(path) = self.document.path_of(block_key) else {
            return;
        };
        let (&index, parent) = match path.split_last() {
            Some(split) => split,
            None => return,
        };
        let parent = parent.to_vec();

        let at = if is_void || len == 0 || point.offset >= len {
            index + 1
        } else if point.offset == 0 {
            index
        } else {
            self.split_text_block(block_key, point);
            index + 1
        };

        let block_key = self.document.alloc_key();
        let text_key = self.document.alloc_key();
        let mut block = Block::new(block_key, kind, vec![Node::Text(Text::new(text_key, ""))]);
        block.data = data;
        if let Some(children) = self.document.children_mut(&parent) {
            children.insert(at, Node::Block(block));
        }
        self.apply_select(Range::collapsed(Point::new(text_key, 0)));
    }

    pub(crate) fn apply_insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.selection.is_collapsed() {
            self.delete_range();
        }
        let point = self.selection.focus;
        if self
            .document
            .parent(point.key)
            .is_some_and(|b| b.kind.is_void())
        {
            return;
        }
        let pending = self.marks.take();
        let Some(node) = self.document.text_mut(point.key) else {
            return;
        };
        let marks = pending.unwrap_or_else(|| node.marks_at(point.offset));
        node.insert(point.offset, text, marks);
        let offset = point.offset + text.chars().count();
        self.selection = Range::collapsed(Point::new(point.key, offset));
    }

    pub(crate) fn apply_delete_backward(&mut self) {
        if !self.selection.is_collapsed() {
            self.delete_range();
            return;
        }
        let point = self.selection.focus;
        if point.offset > 0 {
            if let Some(text) = self.document.text_mut(point.key) {
                text.remove(point.offset - 1, point.offset);
            }
            self.apply_select(Range::collapsed(Point::new(point.key, point.offset - 1)));
            return;
        }

        let Some(current) = self.document.parent(point.key) else {
            return;
        };
        let current_key = current.key;
        let current_void = current.kind.is_void();
        let leaves = self.document.leaf_blocks();
        let Some(index) = leaves.iter().position(|b| b.key == current_key) else {
            return;
        };
        if index == 0 {
            return;
        }
        let prev = leaves[index - 1];
        let (prev_key, prev_void) = (prev.key, prev.kind.is_void());
        let prev_text = prev.text().map(|t| (t.key, t.len()));

        if current_void {
            self.document.remove(current_key);
            if let Some((key, len)) = prev_text {
                self.apply_select(Range::collapsed(Point::new(key, len)));
            }
        } else if prev_void {
            self.document.remove(prev_key);
        } else if let Some((prev_text_key, prev_len)) = prev_text {
            let leaves = match self.document.remove(current_key) {
                Some(Node::Block(b)) => b
                    .nodes
                    .into_iter()
                    .filter_map(|n| match n {
                        Node::Text(t) => Some(t.leaves),
                        Node::Block(_) => None,
                    })
                    .flatten()
                    .collect::<Vec<_>>(),
                _ => Vec::new(),
            };
            if let Some(text) = self.document.text_mut(prev_text_key) {
                text.leaves.extend(leaves);
            }
            self.apply_select(Range::collapsed(Point::new(prev_text_key, prev_len)));
        }
    }

    pub(crate) fn apply_split_block(&mut self) {
        if !self.selection.is_collapsed() {
            self.delete_range();
        }
        let point = self.selection.focus;
        let Some((block_key, is_void)) = self
            .document
            .parent(point.key)
            .map(|b| (b.key, b.kind.is_void()))
        else {
            return;
        };
        if is_void {
            self.apply_insert_block(DEFAULT_NODE, BlockData::default());
            return;
        }
        if let Some(text_key) = self.split_text_block(block_key, point) {
            self.apply_select(Range::collapsed(Point::new(text_key, 0)));
        }
    }

    /// Split a leaf block at `point`; the new block follows it and has the
    /// same type. Returns the new block's text key.
    fn split_text_block(&mut self, block_key: NodeKey, point: Point) -> Option<NodeKey> {
        let path = self.document.path_of(block_key)?;
        let (&index, parent) = path.split_last()?;
        let parent = parent.to_vec();

        let tail = self.document.text_mut(point.key)?.split_off(point.offset);
        let (kind, data) = {
            let block = self.document.block(block_key)?;
            (block.kind, block.data.clone())
        };
        let new_block_key = self.document.alloc_key();
        let text_key = self.document.alloc_key();
        let mut block = Block::new(
            new_block_key,
            kind,
            vec![Node::Text(Text {
                key: text_key,
                leaves: tail,
            })],
        );
        block.data = data;
        self.document
            .children_mut(&parent)?
            .insert(index + 1, Node::Block(block));
        Some(text_key)
    }

    /// Remove the selected content and collapse to its start.
    pub(crate) fn delete_range(&mut self) {
        let (start, end) = self.ordered();
        if start == end {
            return;
        }
        if start.key == end.key {
            if let Some(text) = self.document.text_mut(start.key) {
                text.remove(start.offset, end.offset);
            }
        } else {
            let doomed: Vec<NodeKey> = {
                let texts = self.document.texts();
                let si = texts.iter().position(|t| t.key == start.key);
                let ei = texts.iter().position(|t| t.key == end.key);
                match (si, ei) {
                    (Some(si), Some(ei)) => texts[si + 1..=ei]
                        .iter()
                        .filter_map(|t| self.document.parent(t.key).map(|b| b.key))
                        .collect(),
                    _ => Vec::new(),
                }
            };
            let tail = self
                .document
                .text_mut(end.key)
                .map(|t| t.split_off(end.offset))
                .unwrap_or_default();
            for key in doomed {
                self.document.remove(key);
            }
            if let Some(text) = self.document.text_mut(start.key) {
                let len = text.len();
                text.remove(start.offset, len);
                text.leaves.extend(tail);
            }
        }
        self.apply_select(Range::collapsed(start));
    }

    /// Enforce the document schema and repair the selection.
    pub(crate) fn normalize(&mut self) {
        let Document { nodes, keys, .. } = &mut self.document;
        normalize_children(nodes, keys, true);

        if nodes.is_empty() || !is_paragraph(nodes.last()) {
            let text = Node::Text(Text::new(keys.next(), ""));
            nodes.push(Node::Block(Block::new(keys.next(), DEFAULT_NODE, vec![text])));
        }

        let texts = self.document.texts();
        let clamp = |p: Point| -> Option<Point> {
            texts
                .iter()
                .find(|t| t.key == p.key)
                .map(|t| Point::new(p.key, p.offset.min(t.len())))
        };
        match (clamp(self.selection.anchor), clamp(self.selection.focus)) {
            (Some(anchor), Some(focus)) => self.selection = Range::new(anchor, focus),
            _ => {
                self.marks = None;
                self.select_start();
            }
        }
    }
}

fn is_paragraph(node: Option<&Node>) -> bool {
    matches!(node, Some(Node::Block(b)) if b.kind == DEFAULT_NODE)
}

fn lift_children(doc: &mut Document, wrapper: NodeKey, selected: &[NodeKey]) {
    let Some(path) = doc.path_of(wrapper) else {
        return;
    };
    let Some((&index, parent)) = path.split_last() else {
        return;
    };
    let parent = parent.to_vec();
    let after_key = doc.alloc_key();

    let Some(children) = doc.children_mut(&parent) else {
        return;
    };
    let Node::Block(mut block) = children.remove(index) else {
        return;
    };
    let hits: Vec<usize> = block
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| selected.iter().any(|k| n.contains(*k)))
        .map(|(i, _)| i)
        .collect();
    let (Some(&first), Some(&last)) = (hits.first(), hits.last()) else {
        children.insert(index, Node::Block(block));
        return;
    };

    let after = block.nodes.split_off(last + 1);
    let lifted = block.nodes.split_off(first);
    let mut replacement: Vec<Node> = Vec::new();
    let (kind, data) = (block.kind, block.data.clone());
    if !block.nodes.is_empty() {
        replacement.push(Node::Block(block));
    }
    replacement.extend(lifted);
    if !after.is_empty() {
        let mut tail = Block::new(after_key, kind, after);
        tail.data = data;
        replacement.push(Node::Block(tail));
    }
    children.splice(index..index, replacement);
}

fn normalize_children(nodes: &mut Vec<Node>, keys: &mut KeyGen, top_level: bool) {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes.drain(..) {
        match node {
            Node::Text(text) if top_level => {
                let mut text = text;
                text.normalize();
                out.push(Node::Block(Block::new(
                    keys.next(),
                    DEFAULT_NODE,
                    vec![Node::Text(text)],
                )));
            }
            Node::Text(text) => out.push(Node::Text(text)),
            Node::Block(mut block) => {
                if block.kind.is_void() {
                    let key = block.text().map(|t| t.key).unwrap_or_else(|| keys.next());
                    block.nodes = vec![Node::Text(Text::new(key, ""))];
                    out.push(Node::Block(block));
                } else if block.is_leaf() {
                    if block.kind.is_container() && block.nodes.is_empty() {
                        continue;
                    }
                    merge_texts(&mut block, keys);
                    out.push(Node::Block(block));
                } else {
                    // Containers hold blocks only; stray text is dropped if empty,
                    // otherwise wrapped.
                    let mut inner: Vec<Node> = Vec::with_capacity(block.nodes.len());
                    for child in block.nodes.drain(..) {
                        match child {
                            Node::Text(t) if t.is_empty() => {}
                            Node::Text(t) => inner.push(Node::Block(Block::new(
                                keys.next(),
                                DEFAULT_NODE,
                                vec![Node::Text(t)],
                            ))),
                            b @ Node::Block(_) => inner.push(b),
                        }
                    }
                    normalize_children(&mut inner, keys, false);
                    if inner.is_empty() {
                        continue;
                    }
                    block.nodes = inner;
                    out.push(Node::Block(block));
                }
            }
        }
    }
    *nodes = out;
}

/// Collapse a leaf block's texts into one normalized text node.
fn merge_texts(block: &mut Block, keys: &mut KeyGen) {
    let mut texts = block.nodes.drain(..).filter_map(|n| match n {
        Node::Text(t) => Some(t),
        Node::Block(_) => None,
    });
    let mut text = texts.next().unwrap_or_else(|| Text {
        key: keys.next(),
        leaves: Vec::new(),
    });
    for rest in texts {
        text.leaves.extend(rest.leaves);
    }
    text.normalize();
    block.nodes = vec![Node::Text(text)];
}
