use crate::engine::Document;
use std::fmt;

/// Ceiling on the document's block count. Zero means no limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeLimit(pub u32);

impl NodeLimit {
    pub const UNLIMITED: Self = Self(0);

    /// Lenient parse of the settings input or the stored value; anything
    /// that is not a non-negative integer counts as unlimited.
    pub fn parse(raw: &str) -> Self {
        Self(raw.trim().parse::<u32>().unwrap_or(0))
    }

    pub fn is_unlimited(self) -> bool {
        self.0 == 0
    }

    pub fn allows(self, count: usize) -> bool {
        self.is_unlimited() || count <= self.0 as usize
    }
}

impl fmt::Display for NodeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Text-holding blocks at every depth. List containers are not counted.
pub fn node_count(document: &Document) -> usize {
    document.leaf_blocks().len()
}

pub fn save_allowed(limit: NodeLimit, document: &Document) -> bool {
    limit.allows(node_count(document))
}
