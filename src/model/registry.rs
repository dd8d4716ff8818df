//! The model arena: registration, wiring, and lookup.
//!
//! A `DocModel` holds every namespace, type, and member of one documented
//! assembly. Loaders create nodes through the `add_*` methods (which are
//! where the fail-fast preconditions live: non-empty ids, unique ids,
//! consistent generic arity) and wire relations afterwards. After loading,
//! the model is read-only except for documentation text and inheritance
//! provenance.

use std::collections::HashMap;

use crate::model::error::{ModelError, ModelResult};
use crate::model::generics::GenericParamDecl;
use crate::model::member::{MemberKind, MemberNode, Parameter};
use crate::model::reference::{MemberId, NamespaceId, NamespaceNode, Reference, TypeId};
use crate::model::type_ref::{GenericScope, TypeNode, TypeShape};

/// What an id string in the model resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKey {
    Namespace(NamespaceId),
    Type(TypeId),
    Member(MemberId),
}

/// Registration description for a type reference node.
#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub id: String,
    pub name: Option<String>,
    pub shape: TypeShape,
    pub namespace: Option<NamespaceId>,
    pub declaring_type: Option<TypeId>,
    pub generic_params: Vec<GenericParamDecl>,
    pub doc: Option<String>,
}

impl TypeSpec {
    fn with_shape(id: impl Into<String>, name: Option<String>, shape: TypeShape) -> Self {
        Self {
            id: id.into(),
            name,
            shape,
            namespace: None,
            declaring_type: None,
            generic_params: Vec::new(),
            doc: None,
        }
    }

    /// A plain named type (or open generic definition once parameters are
    /// added with [`TypeSpec::with_generic_params`]).
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_shape(id, Some(name.into()), TypeShape::Named)
    }

    pub fn array(id: impl Into<String>, element: TypeId) -> Self {
        Self::with_shape(id, None, TypeShape::Array { element })
    }

    pub fn pointer(id: impl Into<String>, element: TypeId) -> Self {
        Self::with_shape(id, None, TypeShape::Pointer { element })
    }

    pub fn sentinel(id: impl Into<String>, element: TypeId) -> Self {
        Self::with_shape(id, None, TypeShape::Sentinel { element })
    }

    pub fn generic(id: impl Into<String>, definition: TypeId, arguments: Vec<TypeId>) -> Self {
        Self::with_shape(
            id,
            None,
            TypeShape::Generic {
                definition,
                arguments,
            },
        )
    }

    pub fn generic_param(
        id: impl Into<String>,
        name: impl Into<String>,
        position: usize,
        scope: GenericScope,
    ) -> Self {
        Self::with_shape(
            id,
            Some(name.into()),
            TypeShape::GenericParam { position, scope },
        )
    }

    pub fn in_namespace(mut self, namespace: NamespaceId) -> Self {
        self.namespace = Some(namespace);
        self
    }

    pub fn nested_in(mut self, declaring_type: TypeId) -> Self {
        self.declaring_type = Some(declaring_type);
        self
    }

    pub fn with_generic_params(mut self, names: Vec<&str>) -> Self {
        self.generic_params = names.into_iter().map(GenericParamDecl::new).collect();
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// Registration description for a member node.
#[derive(Debug, Clone)]
pub struct MemberSpec {
    pub id: String,
    pub name: String,
    pub kind: MemberKind,
    pub declaring_type: TypeId,
    pub element_type: Option<TypeId>,
    pub parameters: Vec<Parameter>,
    pub generic_params: Vec<GenericParamDecl>,
    pub generic_args: Vec<TypeId>,
    pub is_extension_definition: bool,
    pub is_extension_method: bool,
    pub doc: Option<String>,
}

impl MemberSpec {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: MemberKind,
        declaring_type: TypeId,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            declaring_type,
            element_type: None,
            parameters: Vec::new(),
            generic_params: Vec::new(),
            generic_args: Vec::new(),
            is_extension_definition: false,
            is_extension_method: false,
            doc: None,
        }
    }

    pub fn returning(mut self, element_type: TypeId) -> Self {
        self.element_type = Some(element_type);
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, param_type: TypeId) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            param_type,
        });
        self
    }

    pub fn with_generic_params(mut self, names: Vec<&str>) -> Self {
        self.generic_params = names.into_iter().map(GenericParamDecl::new).collect();
        self
    }

    pub fn with_generic_args(mut self, args: Vec<TypeId>) -> Self {
        self.generic_args = args;
        self
    }

    pub fn as_extension_definition(mut self) -> Self {
        self.is_extension_definition = true;
        self
    }

    pub fn as_extension_method(mut self) -> Self {
        self.is_extension_method = true;
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// In-memory model of one documented assembly.
#[derive(Debug, Default)]
pub struct DocModel {
    assembly: String,
    namespaces: Vec<NamespaceNode>,
    types: Vec<TypeNode>,
    members: Vec<MemberNode>,
    ids: HashMap<String, RefKey>,
}

impl DocModel {
    pub fn new(assembly: impl Into<String>) -> Self {
        Self {
            assembly: assembly.into(),
            ..Default::default()
        }
    }

    pub fn assembly(&self) -> &str {
        &self.assembly
    }

    fn claim_id(&mut self, id: &str, name: &str, key: RefKey) -> ModelResult<()> {
        if id.is_empty() {
            return Err(ModelError::EmptyId {
                name: name.to_string(),
            });
        }
        if self.ids.contains_key(id) {
            return Err(ModelError::DuplicateId { id: id.to_string() });
        }
        self.ids.insert(id.to_string(), key);
        Ok(())
    }

    pub fn add_namespace(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> ModelResult<NamespaceId> {
        let id = id.into();
        let name = name.into();
        let key = NamespaceId::new(self.namespaces.len() as u32);
        self.claim_id(&id, &name, RefKey::Namespace(key))?;
        self.namespaces.push(NamespaceNode::new(id, name));
        Ok(key)
    }

    /// Register a type reference node. Composed shapes derive their display
    /// name from their components; a generic instantiation must supply one
    /// argument per parameter its definition declares.
    pub fn add_type(&mut self, spec: TypeSpec) -> ModelResult<TypeId> {
        if let TypeShape::Generic {
            definition,
            ref arguments,
        } = spec.shape
        {
            let declared = self.type_node(definition).generic_params.len();
            if declared != arguments.len() {
                return Err(ModelError::GenericArity {
                    id: spec.id,
                    parameters: declared,
                    arguments: arguments.len(),
                });
            }
        }

        let name = match spec.name {
            Some(name) => name,
            None => self.derived_shape_name(&spec.shape),
        };
        let key = TypeId::new(self.types.len() as u32);
        self.claim_id(&spec.id, &name, RefKey::Type(key))?;

        let mut node = TypeNode::new(spec.id, name, spec.shape);
        node.namespace = spec.namespace;
        node.declaring_type = spec.declaring_type;
        node.generic_params = spec.generic_params;
        node.doc = spec.doc;
        self.types.push(node);

        if let Some(ns) = spec.namespace {
            self.namespaces[ns.index() as usize].types.push(key);
        }
        Ok(key)
    }

    fn derived_shape_name(&self, shape: &TypeShape) -> String {
        match shape {
            TypeShape::Named | TypeShape::GenericParam { .. } => String::new(),
            TypeShape::Array { element } => format!("{}[]", self.type_node(*element).name()),
            TypeShape::Pointer { element } => format!("{}*", self.type_node(*element).name()),
            TypeShape::Sentinel { element } => self.type_node(*element).name().to_string(),
            TypeShape::Generic { definition, .. } => {
                self.type_node(*definition).name().to_string()
            }
        }
    }

    /// Register a member on its declaring type. The owning namespace is
    /// taken from the outermost declaring type.
    pub fn add_member(&mut self, spec: MemberSpec) -> ModelResult<MemberId> {
        if !spec.generic_params.is_empty()
            && !spec.generic_args.is_empty()
            && spec.generic_params.len() != spec.generic_args.len()
        {
            return Err(ModelError::GenericArity {
                id: spec.id,
                parameters: spec.generic_params.len(),
                arguments: spec.generic_args.len(),
            });
        }

        let key = MemberId::new(self.members.len() as u32);
        self.claim_id(&spec.id, &spec.name, RefKey::Member(key))?;

        let namespace = self.owning_namespace(spec.declaring_type);
        self.members.push(MemberNode {
            id: spec.id,
            name: spec.name,
            kind: spec.kind,
            declaring_type: spec.declaring_type,
            namespace,
            element_type: spec.element_type,
            parameters: spec.parameters,
            generic_params: spec.generic_params,
            generic_args: spec.generic_args,
            is_extension_definition: spec.is_extension_definition,
            is_extension_method: spec.is_extension_method,
            doc: spec.doc,
            inherited_from: None,
        });
        self.types[spec.declaring_type.index() as usize]
            .members
            .push(key);
        Ok(key)
    }

    fn owning_namespace(&self, mut ty: TypeId) -> Option<NamespaceId> {
        loop {
            let node = self.type_node(ty);
            match node.declaring_type {
                Some(outer) => ty = outer,
                None => return node.namespace,
            }
        }
    }

    pub fn set_base(&mut self, ty: TypeId, base: TypeId) {
        self.types[ty.index() as usize].base = Some(base);
    }

    pub fn add_interface(&mut self, ty: TypeId, interface: TypeId) {
        self.types[ty.index() as usize].interfaces.push(interface);
    }

    pub(crate) fn set_member_doc(
        &mut self,
        member: MemberId,
        doc: String,
        inherited_from: Option<MemberId>,
    ) {
        let node = &mut self.members[member.index() as usize];
        node.doc = Some(doc);
        node.inherited_from = inherited_from;
    }

    /// Restore inheritance provenance recorded in a snapshot.
    pub(crate) fn set_inherited_from(&mut self, member: MemberId, source: MemberId) {
        self.members[member.index() as usize].inherited_from = Some(source);
    }

    /// Attach raw documentation text to the node with the given id string.
    /// Returns false when the id is unknown or names a namespace.
    pub fn attach_doc(&mut self, id: &str, doc: impl Into<String>) -> bool {
        match self.ids.get(id) {
            Some(RefKey::Type(ty)) => {
                self.types[ty.index() as usize].doc = Some(doc.into());
                true
            }
            Some(RefKey::Member(member)) => {
                let node = &mut self.members[member.index() as usize];
                node.doc = Some(doc.into());
                node.inherited_from = None;
                true
            }
            _ => false,
        }
    }

    pub fn lookup(&self, id: &str) -> Option<RefKey> {
        self.ids.get(id).copied()
    }

    pub fn type_by_id(&self, id: &str) -> Option<TypeId> {
        match self.ids.get(id) {
            Some(RefKey::Type(ty)) => Some(*ty),
            _ => None,
        }
    }

    pub fn member_by_id(&self, id: &str) -> Option<MemberId> {
        match self.ids.get(id) {
            Some(RefKey::Member(member)) => Some(*member),
            _ => None,
        }
    }

    pub fn namespace_node(&self, id: NamespaceId) -> &NamespaceNode {
        &self.namespaces[id.index() as usize]
    }

    pub fn type_node(&self, id: TypeId) -> &TypeNode {
        &self.types[id.index() as usize]
    }

    pub fn member_node(&self, id: MemberId) -> &MemberNode {
        &self.members[id.index() as usize]
    }

    pub fn namespace_ids(&self) -> Vec<NamespaceId> {
        (0..self.namespaces.len() as u32)
            .map(NamespaceId::new)
            .collect()
    }

    pub fn type_ids(&self) -> Vec<TypeId> {
        (0..self.types.len() as u32).map(TypeId::new).collect()
    }

    pub fn member_ids(&self) -> Vec<MemberId> {
        (0..self.members.len() as u32).map(MemberId::new).collect()
    }

    pub fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
