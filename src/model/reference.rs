//! First-class identity for model nodes.
//!
//! Every namespace, type, and member in a documentation model is a node in
//! an arena, addressed by a typed index. Relations between nodes are stored
//! as these indices, never as owning pointers, so the graph can be walked
//! and mutated without reference cycles.
//!
//! Nodes also carry a stable string id (the C# XML documentation id the
//! loaders key on, e.g. `T:System.String` or `M:Ns.Type.Do(System.Int32)`).
//! Two nodes are the same reference exactly when their ids are equal; the
//! id is assigned once at registration and the loader is responsible for
//! interning, so structural comparison is never needed.

use std::hash::{Hash, Hasher};

/// Identity for a namespace node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamespaceId(u32);

impl NamespaceId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

/// Identity for a type reference node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(u32);

impl TypeId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

/// Identity for a member reference node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberId(u32);

impl MemberId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

/// Naming capability shared by all reference nodes.
///
/// `id` is the process-unique identity string, `name` the short display
/// name. Full names are composed from the arena, see
/// [`crate::model::naming::type_full_name`] and friends.
pub trait Reference {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

/// A namespace node. Its full name equals its short name.
#[derive(Debug, Clone)]
pub struct NamespaceNode {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) types: Vec<TypeId>,
}

impl NamespaceNode {
    pub(crate) fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            types: Vec::new(),
        }
    }

    /// Top-level types declared in this namespace, in registration order.
    pub fn types(&self) -> &[TypeId] {
        &self.types
    }
}

impl Reference for NamespaceNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for NamespaceNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for NamespaceNode {}

impl Hash for NamespaceNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
