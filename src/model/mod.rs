//! Documentation model
//!
//! This module holds the in-memory model of one documented assembly:
//! reference nodes for namespaces, types, and members (identified by their
//! XML documentation id strings), full-name composition and parsing,
//! generic argument substitution, and the documentation inheritance
//! resolver that fills `<inheritdoc/>` slots from ancestor members.

pub mod error;
pub mod generics;
pub mod inherit;
pub mod member;
pub mod naming;
pub mod reference;
pub mod registry;
pub mod type_ref;
pub mod xmldoc;

// Re-export the model surface the rest of the crate works against.
pub use error::{ModelError, ModelResult};
pub use inherit::{
    ResolveStats, copy_documentation, inherit_documentation, resolve_all, undocumented_members,
};
pub use member::MemberKind;
pub use reference::{MemberId, NamespaceId, Reference, TypeId};
pub use registry::{DocModel, MemberSpec, RefKey, TypeSpec};
pub use type_ref::{GenericScope, TypeShape};
