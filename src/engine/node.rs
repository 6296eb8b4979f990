//! Document tree nodes and their JSON form.
//!
//! The serialized shape follows the `object`-tagged layout used by Slate
//! (`document` > `block` > `text` > `leaf` > `mark`). Node keys are runtime-only:
//! they are skipped when serializing and re-assigned by [`Document::rekey`]
//! after loading.

use crate::models::{BlockData, BlockType, MarkType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u64);

pub type Marks = BTreeSet<MarkType>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct KeyGen {
    next: u64,
}

impl KeyGen {
    pub fn next(&mut self) -> NodeKey {
        self.next += 1;
        NodeKey(self.next)
    }
}

mod mark_list {
    use super::Marks;
    use crate::models::MarkType;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(tag = "object", rename = "mark")]
    struct MarkJson {
        #[serde(rename = "type")]
        kind: MarkType,
    }

    pub fn serialize<S: Serializer>(marks: &Marks, s: S) -> Result<S::Ok, S::Error> {
        let list: Vec<MarkJson> = marks.iter().map(|&kind| MarkJson { kind }).collect();
        list.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Marks, D::Error> {
        let list = Vec::<MarkJson>::deserialize(d)?;
        Ok(list.into_iter().map(|m| m.kind).collect())
    }
}

/// A run of text sharing one set of marks.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(tag = "object", rename = "leaf")]
pub struct Leaf {
    #[serde(default)]
    pub text: String,
    #[serde(default, with = "mark_list")]
    pub marks: Marks,
}

impl Leaf {
    pub fn new(text: impl Into<String>, marks: Marks) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

fn char_to_byte(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map(|(b, _)| b).unwrap_or(s.len())
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Text {
    #[serde(skip)]
    pub key: NodeKey,
    #[serde(default)]
    pub leaves: Vec<Leaf>,
}

impl Text {
    pub fn new(key: NodeKey, text: impl Into<String>) -> Self {
        Self {
            key,
            leaves: vec![Leaf::new(text, Marks::new())],
        }
    }

    pub fn len(&self) -> usize {
        self.leaves.iter().map(Leaf::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.iter().all(Leaf::is_empty)
    }

    pub fn text(&self) -> String {
        self.leaves.iter().map(|l| l.text.as_str()).collect()
    }

    /// Make sure a leaf starts exactly at `offset`, splitting if needed.
    /// Returns the index of that leaf (or `leaves.len()` at the end).
    fn boundary(&mut self, offset: usize) -> usize {
        let mut pos = 0;
        for i in 0..self.leaves.len() {
            if offset == pos {
                return i;
            }
            let len = self.leaves[i].len();
            if offset < pos + len {
                let leaf = &mut self.leaves[i];
                let at = char_to_byte(&leaf.text, offset - pos);
                let tail = leaf.text.split_off(at);
                let marks = leaf.marks.clone();
                self.leaves.insert(i + 1, Leaf::new(tail, marks));
                return i + 1;
            }
            pos += len;
        }
        self.leaves.len()
    }

    /// Marks of the character before `offset` (or of the first leaf at 0).
    pub fn marks_at(&self, offset: usize) -> Marks {
        if offset == 0 {
            return self
                .leaves
                .first()
                .map(|l| l.marks.clone())
                .unwrap_or_default();
        }
        let mut pos = 0;
        for leaf in &self.leaves {
            let len = leaf.len();
            if offset > pos && offset <= pos + len {
                return leaf.marks.clone();
            }
            pos += len;
        }
        self.leaves
            .last()
            .map(|l| l.marks.clone())
            .unwrap_or_default()
    }

    /// Intersection of marks over the leaves overlapping `[start, end)`.
    pub fn marks_in(&self, start: usize, end: usize) -> Option<Marks> {
        let mut pos = 0;
        let mut acc: Option<Marks> = None;
        for leaf in &self.leaves {
            let len = leaf.len();
            if len > 0 && pos < end && pos + len > start {
                acc = Some(match acc {
                    None => leaf.marks.clone(),
                    Some(m) => m.intersection(&leaf.marks).copied().collect(),
                });
            }
            pos += len;
        }
        acc
    }

    pub fn insert(&mut self, offset: usize, text: &str, marks: Marks) {
        let i = self.boundary(offset);
        self.leaves.insert(i, Leaf::new(text, marks));
    }

    pub fn remove(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let i = self.boundary(start);
        let j = self.boundary(end);
        self.leaves.drain(i..j);
    }

    pub fn set_mark(&mut self, start: usize, end: usize, mark: MarkType, on: bool) {
        if start >= end {
            return;
        }
        let i = self.boundary(start);
        let j = self.boundary(end);
        for leaf in &mut self.leaves[i..j] {
            if on {
                leaf.marks.insert(mark);
            } else {
                leaf.marks.remove(&mark);
            }
        }
    }

    /// Cut everything from `offset` onwards.
    pub fn split_off(&mut self, offset: usize) -> Vec<Leaf> {
        let i = self.boundary(offset);
        self.leaves.split_off(i)
    }

    pub(crate) fn normalize(&mut self) {
        let mut merged: Vec<Leaf> = Vec::with_capacity(self.leaves.len());
        for leaf in self.leaves.drain(..) {
            if leaf.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(prev) if prev.marks == leaf.marks => prev.text.push_str(&leaf.text),
                _ => merged.push(leaf),
            }
        }
        if merged.is_empty() {
            merged.push(Leaf::default());
        }
        self.leaves = merged;
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Block {
    #[serde(skip)]
    pub key: NodeKey,
    #[serde(rename = "type")]
    pub kind: BlockType,
    #[serde(default)]
    pub data: BlockData,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Block {
    pub fn new(key: NodeKey, kind: BlockType, nodes: Vec<Node>) -> Self {
        Self {
            key,
            kind,
            data: BlockData::default(),
            nodes,
        }
    }

    /// A leaf block holds text directly rather than other blocks.
    pub fn is_leaf(&self) -> bool {
        !self.nodes.iter().any(|n| matches!(n, Node::Block(_)))
    }

    pub fn text(&self) -> Option<&Text> {
        self.nodes.iter().find_map(Node::as_text)
    }

    pub fn text_len(&self) -> usize {
        self.text().map(Text::len).unwrap_or(0)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "object", rename_all = "lowercase")]
pub enum Node {
    Block(Block),
    Text(Text),
}

impl Node {
    pub fn key(&self) -> NodeKey {
        match self {
            Node::Block(b) => b.key,
            Node::Text(t) => t.key,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(b) => Some(b),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(t) => Some(t),
            Node::Block(_) => None,
        }
    }

    /// True if `key` is this node or any descendant of it.
    pub fn contains(&self, key: NodeKey) -> bool {
        if self.key() == key {
            return true;
        }
        match self {
            Node::Block(b) => b.nodes.iter().any(|n| n.contains(key)),
            Node::Text(_) => false,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(tag = "object", rename = "document")]
pub struct Document {
    #[serde(default)]
    pub data: BlockData,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(skip)]
    pub(crate) keys: KeyGen,
}

impl Document {
    pub fn new(nodes: Vec<Node>) -> Self {
        let mut doc = Self {
            data: BlockData::default(),
            nodes,
            keys: KeyGen::default(),
        };
        doc.rekey();
        doc
    }

    /// Assign fresh keys to every node in document order.
    pub fn rekey(&mut self) {
        fn walk(nodes: &mut [Node], keys: &mut KeyGen) {
            for node in nodes {
                match node {
                    Node::Block(b) => {
                        b.key = keys.next();
                        walk(&mut b.nodes, keys);
                    }
                    Node::Text(t) => t.key = keys.next(),
                }
            }
        }
        self.keys = KeyGen::default();
        walk(&mut self.nodes, &mut self.keys);
    }

    pub(crate) fn alloc_key(&mut self) -> NodeKey {
        self.keys.next()
    }

    pub fn node(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.nodes.get(*first)?;
        for &i in rest {
            node = node.as_block()?.nodes.get(i)?;
        }
        Some(node)
    }

    pub(crate) fn node_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.nodes.get_mut(*first)?;
        for &i in rest {
            node = match node {
                Node::Block(b) => b.nodes.get_mut(i)?,
                Node::Text(_) => return None,
            };
        }
        Some(node)
    }

    /// Children of the node at `path`; the empty path names the document.
    pub(crate) fn children_mut(&mut self, path: &[usize]) -> Option<&mut Vec<Node>> {
        if path.is_empty() {
            return Some(&mut self.nodes);
        }
        match self.node_mut(path)? {
            Node::Block(b) => Some(&mut b.nodes),
            Node::Text(_) => None,
        }
    }

    pub fn path_of(&self, key: NodeKey) -> Option<Vec<usize>> {
        fn find(nodes: &[Node], key: NodeKey, path: &mut Vec<usize>) -> bool {
            for (i, node) in nodes.iter().enumerate() {
                path.push(i);
                if node.key() == key {
                    return true;
                }
                if let Node::Block(b) = node {
                    if find(&b.nodes, key, path) {
                        return true;
                    }
                }
                path.pop();
            }
            false
        }
        let mut path = Vec::new();
        find(&self.nodes, key, &mut path).then_some(path)
    }

    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.node(&self.path_of(key)?)
    }

    pub fn block(&self, key: NodeKey) -> Option<&Block> {
        self.get(key)?.as_block()
    }

    pub(crate) fn block_mut(&mut self, key: NodeKey) -> Option<&mut Block> {
        let path = self.path_of(key)?;
        match self.node_mut(&path)? {
            Node::Block(b) => Some(b),
            Node::Text(_) => None,
        }
    }

    pub(crate) fn text_mut(&mut self, key: NodeKey) -> Option<&mut Text> {
        let path = self.path_of(key)?;
        match self.node_mut(&path)? {
            Node::Text(t) => Some(t),
            Node::Block(_) => None,
        }
    }

    pub(crate) fn remove(&mut self, key: NodeKey) -> Option<Node> {
        let path = self.path_of(key)?;
        let (index, parent) = path.split_last()?;
        let children = self.children_mut(parent)?;
        Some(children.remove(*index))
    }

    /// Every text node in document order.
    pub fn texts(&self) -> Vec<&Text> {
        fn walk<'a>(nodes: &'a [Node], out: &mut Vec<&'a Text>) {
            for node in nodes {
                match node {
                    Node::Block(b) => walk(&b.nodes, out),
                    Node::Text(t) => out.push(t),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.nodes, &mut out);
        out
    }

    /// Blocks holding text directly, in document order.
    pub fn leaf_blocks(&self) -> Vec<&Block> {
        fn walk<'a>(nodes: &'a [Node], out: &mut Vec<&'a Block>) {
            for node in nodes {
                if let Node::Block(b) = node {
                    if b.is_leaf() {
                        out.push(b);
                    } else {
                        walk(&b.nodes, out);
                    }
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.nodes, &mut out);
        out
    }

    /// Parent block of `key`. `None` when the parent is the document itself.
    pub fn parent(&self, key: NodeKey) -> Option<&Block> {
        let path = self.path_of(key)?;
        if path.len() < 2 {
            return None;
        }
        self.node(&path[..path.len() - 1])?.as_block()
    }

    pub fn previous_sibling(&self, key: NodeKey) -> Option<&Node> {
        let path = self.path_of(key)?;
        let (&index, parent) = path.split_last()?;
        if index == 0 {
            return None;
        }
        if parent.is_empty() {
            return self.nodes.get(index - 1);
        }
        self.node(parent)?.as_block()?.nodes.get(index - 1)
    }

    /// Number of ancestors including the document; top-level blocks have depth 1.
    pub fn depth(&self, key: NodeKey) -> Option<usize> {
        self.path_of(key).map(|p| p.len())
    }

    /// Nearest ancestor block of `key` matching `pred`.
    pub fn closest(&self, key: NodeKey, pred: impl Fn(&Block) -> bool) -> Option<&Block> {
        let path = self.path_of(key)?;
        (1..path.len())
            .rev()
            .filter_map(|len| self.node(&path[..len])?.as_block())
            .find(|b| pred(b))
    }
}
