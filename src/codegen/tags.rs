/// Tag identities for grid locations
///
/// A tag marks a logical location inside a fragment (a method entry point, a
/// variable slot, a jump target) so that a later linking pass can resolve it to
/// an absolute coordinate. Tags are handles into a [`TagArena`]: two tags with
/// identical metadata are still different locations, identity is the handle.
use std::fmt;

/// Opaque handle of an allocated tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(u32);

impl TagId {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a tag marks; only used for diagnostics and by the linker
#[derive(Debug, Clone, PartialEq)]
pub enum TagKind {
    /// Entry point that runs the full variable initialization of a method
    MethodEntry { method: String },
    /// Storage cell (or first cell of an array) of a variable
    VariableSlot { method: String, variable: String },
    /// Free-form jump target
    Label { name: String },
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TagKind::MethodEntry { method } => write!(f, "entry of {}", method),
            TagKind::VariableSlot { method, variable } => {
                write!(f, "slot {}::{}", method, variable)
            }
            TagKind::Label { name } => write!(f, "label {}", name),
        }
    }
}

/// Allocator for tag identities
#[derive(Debug, Clone, Default)]
pub struct TagArena {
    kinds: Vec<TagKind>,
}

impl TagArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh tag; every call yields a distinct identity
    pub fn allocate(&mut self, kind: TagKind) -> TagId {
        let id = TagId(self.kinds.len() as u32);
        log::trace!("allocated tag {} ({})", id, kind);
        self.kinds.push(kind);
        id
    }

    pub fn kind(&self, tag: TagId) -> Option<&TagKind> {
        self.kinds.get(tag.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
