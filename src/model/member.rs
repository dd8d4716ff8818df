//! Member reference nodes: methods, properties, fields, events.

use std::hash::{Hash, Hasher};

use crate::model::generics::GenericParamDecl;
use crate::model::reference::{MemberId, NamespaceId, Reference, TypeId};

/// Kind of a member. Constructors are methods named `.ctor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Method,
    Property,
    Field,
    Event,
}

impl MemberKind {
    /// Prefix this kind carries in XML documentation ids.
    pub fn id_prefix(self) -> &'static str {
        match self {
            MemberKind::Method => "M:",
            MemberKind::Property => "P:",
            MemberKind::Field => "F:",
            MemberKind::Event => "E:",
        }
    }
}

/// A declared parameter in a member signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub param_type: TypeId,
}

/// A member reference node in the model arena.
///
/// `generic_params` holds the open declarations of a generic member,
/// `generic_args` the concrete arguments of an instantiated one. A closed
/// instantiation may keep its definition's declarations around, but two
/// non-empty lists of different lengths are rejected at registration.
#[derive(Debug, Clone)]
pub struct MemberNode {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) kind: MemberKind,
    pub(crate) declaring_type: TypeId,
    pub(crate) namespace: Option<NamespaceId>,
    pub(crate) element_type: Option<TypeId>,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) generic_params: Vec<GenericParamDecl>,
    pub(crate) generic_args: Vec<TypeId>,
    pub(crate) is_extension_definition: bool,
    pub(crate) is_extension_method: bool,
    pub(crate) doc: Option<String>,
    pub(crate) inherited_from: Option<MemberId>,
}

impl MemberNode {
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn declaring_type(&self) -> TypeId {
        self.declaring_type
    }

    /// Namespace owning the declaring type.
    pub fn namespace(&self) -> Option<NamespaceId> {
        self.namespace
    }

    /// Return type of a method, value type of a property or field, handler
    /// type of an event.
    pub fn element_type(&self) -> Option<TypeId> {
        self.element_type
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn generic_params(&self) -> &[GenericParamDecl] {
        &self.generic_params
    }

    pub fn generic_args(&self) -> &[TypeId] {
        &self.generic_args
    }

    pub fn is_generic_instance(&self) -> bool {
        !self.generic_args.is_empty()
    }

    /// True on the static definition of an extension method.
    pub fn is_extension_definition(&self) -> bool {
        self.is_extension_definition
    }

    /// True on the call-site view attached to the extended type.
    pub fn is_extension_method(&self) -> bool {
        self.is_extension_method
    }

    /// Raw XML documentation fragment, if any.
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Member this one's documentation was copied from, when the resolver
    /// filled it in.
    pub fn inherited_from(&self) -> Option<MemberId> {
        self.inherited_from
    }
}

impl Reference for MemberNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for MemberNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MemberNode {}

impl Hash for MemberNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
