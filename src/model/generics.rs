//! Generic parameter declarations and argument substitution.
//!
//! When the inheritance resolver walks from a derived type into an
//! instantiated base (`D : B<int>` and further `B<T> : A<T>`), parameter
//! types found on ancestor members must be compared against the derived
//! member's types with the instantiation arguments substituted in. Each hop
//! contributes one substitution frame; a parameter maps through its own
//! frame into a type that lives one hop closer to the derived type, so
//! chasing a parameter walks the frames outward until the type is concrete.

use crate::model::reference::TypeId;
use crate::model::registry::DocModel;
use crate::model::type_ref::{GenericScope, TypeShape};

/// An open generic parameter declaration on a type or member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParamDecl {
    pub name: String,
}

impl GenericParamDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Argument substitution accumulated along one ancestry path.
///
/// `frames[0]` holds the arguments instantiating the innermost definition
/// (the type whose members are currently being inspected); `frames[i]`
/// interprets the types those arguments are written in.
#[derive(Debug, Clone, Default)]
pub struct Substitution {
    frames: Vec<Vec<TypeId>>,
}

impl Substitution {
    /// Empty substitution: every type already lives in the target world.
    pub fn identity() -> Self {
        Self { frames: Vec::new() }
    }

    /// Enter one more instantiation: `arguments` become the innermost
    /// frame and are themselves interpreted through `self`.
    pub fn extended_with(&self, arguments: &[TypeId]) -> Self {
        let mut frames = Vec::with_capacity(self.frames.len() + 1);
        frames.push(arguments.to_vec());
        frames.extend(self.frames.iter().cloned());
        Self { frames }
    }

    /// Follow type-scoped parameter mappings starting at `depth`. Returns
    /// the mapped type and the frame depth its own parameters resolve at.
    fn chase(&self, model: &DocModel, mut ty: TypeId, mut depth: usize) -> (TypeId, usize) {
        loop {
            let mapped = match model.type_node(ty).shape() {
                TypeShape::GenericParam {
                    position,
                    scope: GenericScope::Type,
                } if depth < self.frames.len() => self.frames[depth].get(*position).copied(),
                _ => None,
            };
            match mapped {
                Some(next) => {
                    ty = next;
                    depth += 1;
                }
                None => return (ty, depth),
            }
        }
    }
}

/// Structural equality of `candidate` (as seen through `subst`) and
/// `concrete` (a type in the inheriting member's own world).
///
/// Identity decides for named types; arrays, pointers, sentinels, and
/// instantiations recurse through their components; generic parameters that
/// no frame maps compare by owner scope and declaration position.
pub fn types_match(
    model: &DocModel,
    candidate: TypeId,
    subst: &Substitution,
    concrete: TypeId,
) -> bool {
    types_match_at(model, candidate, 0, subst, concrete)
}

fn types_match_at(
    model: &DocModel,
    candidate: TypeId,
    depth: usize,
    subst: &Substitution,
    concrete: TypeId,
) -> bool {
    let (candidate, depth) = subst.chase(model, candidate, depth);
    if candidate == concrete {
        return true;
    }

    let a = model.type_node(candidate);
    let b = model.type_node(concrete);
    match (a.shape(), b.shape()) {
        (
            TypeShape::GenericParam {
                position: pa,
                scope: sa,
            },
            TypeShape::GenericParam {
                position: pb,
                scope: sb,
            },
        ) => sa == sb && pa == pb,
        (TypeShape::Array { element: ea }, TypeShape::Array { element: eb })
        | (TypeShape::Pointer { element: ea }, TypeShape::Pointer { element: eb })
        | (TypeShape::Sentinel { element: ea }, TypeShape::Sentinel { element: eb }) => {
            types_match_at(model, *ea, depth, subst, *eb)
        }
        (
            TypeShape::Generic {
                definition: da,
                arguments: aa,
            },
            TypeShape::Generic {
                definition: db,
                arguments: ab,
            },
        ) => {
            types_match_at(model, *da, depth, subst, *db)
                && aa.len() == ab.len()
                && aa
                    .iter()
                    .zip(ab.iter())
                    .all(|(x, y)| types_match_at(model, *x, depth, subst, *y))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::registry::TypeSpec;

    #[test]
    fn test_parameter_maps_through_one_frame() {
        let mut model = DocModel::new("Lib");
        let int = model
            .add_type(TypeSpec::named("T:System.Int32", "Int32"))
            .unwrap();
        let t = model
            .add_type(TypeSpec::generic_param("T:Lib.B`1!T", "T", 0, GenericScope::Type))
            .unwrap();

        let subst = Substitution::identity().extended_with(&[int]);
        assert!(types_match(&model, t, &subst, int));
        assert!(!types_match(&model, t, &Substitution::identity(), int));
    }

    #[test]
    fn test_parameter_chains_across_two_frames() {
        // A<T> used as B<U> : A<U>, B instantiated with int:
        // A's T maps to B's U, which maps to int.
        let mut model = DocModel::new("Lib");
        let int = model
            .add_type(TypeSpec::named("T:System.Int32", "Int32"))
            .unwrap();
        let u = model
            .add_type(TypeSpec::generic_param("T:Lib.B`1!U", "U", 0, GenericScope::Type))
            .unwrap();
        let t = model
            .add_type(TypeSpec::generic_param("T:Lib.A`1!T", "T", 0, GenericScope::Type))
            .unwrap();

        let from_b = Substitution::identity().extended_with(&[int]);
        let from_a = from_b.extended_with(&[u]);
        assert!(types_match(&model, t, &from_a, int));
    }

    #[test]
    fn test_composed_types_compare_structurally() {
        // List<T> under T -> int must match List<int> even though the two
        // instantiation nodes are distinct references.
        let mut model = DocModel::new("Lib");
        let int = model
            .add_type(TypeSpec::named("T:System.Int32", "Int32"))
            .unwrap();
        let list = model
            .add_type(
                TypeSpec::named("T:System.Collections.Generic.List`1", "List")
                    .with_generic_params(vec!["T"]),
            )
            .unwrap();
        let t = model
            .add_type(TypeSpec::generic_param("T:Lib.B`1!T", "T", 0, GenericScope::Type))
            .unwrap();
        let list_of_t = model
            .add_type(TypeSpec::generic("T:List{B!T}", list, vec![t]))
            .unwrap();
        let list_of_int = model
            .add_type(TypeSpec::generic("T:List{System.Int32}", list, vec![int]))
            .unwrap();

        let subst = Substitution::identity().extended_with(&[int]);
        assert!(types_match(&model, list_of_t, &subst, list_of_int));
        assert!(!types_match(&model, list_of_t, &subst, list));
    }

    #[test]
    fn test_method_scoped_parameters_match_by_position() {
        let mut model = DocModel::new("Lib");
        let a0 = model
            .add_type(TypeSpec::generic_param("T:Lib.A.M``1!T", "T", 0, GenericScope::Method))
            .unwrap();
        let b0 = model
            .add_type(TypeSpec::generic_param("T:Lib.B.M``1!T", "T", 0, GenericScope::Method))
            .unwrap();
        let b1 = model
            .add_type(TypeSpec::generic_param("T:Lib.B.M``2!U", "U", 1, GenericScope::Method))
            .unwrap();

        let subst = Substitution::identity();
        assert!(types_match(&model, a0, &subst, b0));
        assert!(!types_match(&model, a0, &subst, b1));
    }
}
