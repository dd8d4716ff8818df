//! Type reference nodes and their shape grammar.
//!
//! A type reference is either a plain named type or a composition over
//! other type references: array of, pointer to, sentinel of, generic
//! instantiation of, or a generic parameter placeholder. The composition is
//! a tagged variant, so an "array of a generic instantiation" is an `Array`
//! node whose element is a `Generic` node; there is no way to build the
//! invalid combinations a set of independent booleans would allow.

use std::hash::{Hash, Hasher};

use crate::model::generics::GenericParamDecl;
use crate::model::reference::{MemberId, NamespaceId, Reference, TypeId};

/// Who declared a generic parameter placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericScope {
    /// Declared by a type (`T` in `List<T>`)
    Type,
    /// Declared by a method (`T` in `M<T>(T value)`)
    Method,
}

/// Shape of a type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// A named type, possibly an open generic definition when the node
    /// carries generic parameter declarations.
    Named,
    /// Array of the element type (`T[]`)
    Array { element: TypeId },
    /// Unmanaged pointer to the element type (`T*`)
    Pointer { element: TypeId },
    /// Vararg sentinel position wrapping the element type. Renders like the
    /// element itself.
    Sentinel { element: TypeId },
    /// A closed generic instantiation (`List<int>`): the open definition
    /// plus one concrete argument per declared parameter.
    Generic {
        definition: TypeId,
        arguments: Vec<TypeId>,
    },
    /// A generic parameter placeholder in a signature, identified by its
    /// declaration position and owner kind.
    GenericParam { position: usize, scope: GenericScope },
}

/// A type reference node in the model arena.
///
/// Composed references (arrays, pointers, instantiations) only populate
/// `shape`; declared types additionally carry the declaration facts that
/// the inheritance resolver walks: base type, interfaces in declaration
/// order, members, and open generic parameter declarations.
#[derive(Debug, Clone)]
pub struct TypeNode {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) namespace: Option<NamespaceId>,
    pub(crate) declaring_type: Option<TypeId>,
    pub(crate) shape: TypeShape,
    pub(crate) base: Option<TypeId>,
    pub(crate) interfaces: Vec<TypeId>,
    pub(crate) members: Vec<MemberId>,
    pub(crate) generic_params: Vec<GenericParamDecl>,
    pub(crate) doc: Option<String>,
}

impl TypeNode {
    pub(crate) fn new(id: String, name: String, shape: TypeShape) -> Self {
        Self {
            id,
            name,
            namespace: None,
            declaring_type: None,
            shape,
            base: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            generic_params: Vec::new(),
            doc: None,
        }
    }

    pub fn shape(&self) -> &TypeShape {
        &self.shape
    }

    pub fn namespace(&self) -> Option<NamespaceId> {
        self.namespace
    }

    /// Enclosing type for nested types.
    pub fn declaring_type(&self) -> Option<TypeId> {
        self.declaring_type
    }

    pub fn base(&self) -> Option<TypeId> {
        self.base
    }

    /// Implemented interfaces in declaration order.
    pub fn interfaces(&self) -> &[TypeId] {
        &self.interfaces
    }

    pub fn members(&self) -> &[MemberId] {
        &self.members
    }

    pub fn generic_params(&self) -> &[GenericParamDecl] {
        &self.generic_params
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn is_array(&self) -> bool {
        matches!(self.shape, TypeShape::Array { .. })
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self.shape, TypeShape::Pointer { .. })
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self.shape, TypeShape::Sentinel { .. })
    }

    pub fn is_generic_instance(&self) -> bool {
        matches!(self.shape, TypeShape::Generic { .. })
    }

    pub fn is_generic_parameter(&self) -> bool {
        matches!(self.shape, TypeShape::GenericParam { .. })
    }

    /// Element type of an array, pointer, or sentinel shape.
    pub fn element(&self) -> Option<TypeId> {
        match self.shape {
            TypeShape::Array { element }
            | TypeShape::Pointer { element }
            | TypeShape::Sentinel { element } => Some(element),
            _ => None,
        }
    }

    /// Arguments of a generic instantiation, empty otherwise.
    pub fn generic_arguments(&self) -> &[TypeId] {
        match &self.shape {
            TypeShape::Generic { arguments, .. } => arguments,
            _ => &[],
        }
    }

    /// Open definition behind a generic instantiation.
    pub fn generic_definition(&self) -> Option<TypeId> {
        match self.shape {
            TypeShape::Generic { definition, .. } => Some(definition),
            _ => None,
        }
    }
}

impl Reference for TypeNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for TypeNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeNode {}

impl Hash for TypeNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_shape() {
        let a = TypeNode::new("T:A".to_string(), "A".to_string(), TypeShape::Named);
        let b = TypeNode::new(
            "T:A".to_string(),
            "A[]".to_string(),
            TypeShape::Array {
                element: TypeId::new(3),
            },
        );
        assert_eq!(a, b, "equality must follow the id alone");
    }

    #[test]
    fn test_facet_accessors_follow_shape() {
        let array = TypeNode::new(
            "T:A[]".to_string(),
            "A".to_string(),
            TypeShape::Array {
                element: TypeId::new(0),
            },
        );
        assert!(array.is_array());
        assert!(!array.is_pointer());
        assert_eq!(array.element(), Some(TypeId::new(0)));

        let param = TypeNode::new(
            "T:List`1!T".to_string(),
            "T".to_string(),
            TypeShape::GenericParam {
                position: 0,
                scope: GenericScope::Type,
            },
        );
        assert!(param.is_generic_parameter());
        assert_eq!(param.element(), None);
        assert!(param.generic_arguments().is_empty());
    }
}
