//! Display-name composition and parsing.
//!
//! Full names are composed on demand from the arena instead of being stored:
//! `Ns.Outer.Inner` for named types, `T[]` for arrays, `T*` for pointers,
//! `Name<Arg1, Arg2>` for generic instantiations. A sentinel renders as its
//! element. The parser reverses the composition for tooling that needs to
//! recover name, arity, and nesting from a rendered name.

use crate::model::member::MemberKind;
use crate::model::reference::{MemberId, Reference, TypeId};
use crate::model::registry::DocModel;
use crate::model::type_ref::TypeShape;

/// Fully qualified display name of a type reference.
pub fn type_full_name(model: &DocModel, ty: TypeId) -> String {
    render_type(model, ty, true)
}

/// Short display name of a type reference (no namespace, no declaring chain).
pub fn type_display_name(model: &DocModel, ty: TypeId) -> String {
    render_type(model, ty, false)
}

fn render_type(model: &DocModel, ty: TypeId, qualified: bool) -> String {
    let node = model.type_node(ty);
    match node.shape() {
        TypeShape::Named => {
            if qualified {
                qualified_named(model, ty)
            } else {
                node.name().to_string()
            }
        }
        TypeShape::GenericParam { .. } => node.name().to_string(),
        TypeShape::Array { element } => format!("{}[]", render_type(model, *element, qualified)),
        TypeShape::Pointer { element } => format!("{}*", render_type(model, *element, qualified)),
        TypeShape::Sentinel { element } => render_type(model, *element, qualified),
        TypeShape::Generic {
            definition,
            arguments,
        } => {
            let args: Vec<String> = arguments
                .iter()
                .map(|arg| render_type(model, *arg, qualified))
                .collect();
            format!(
                "{}<{}>",
                render_type(model, *definition, qualified),
                args.join(", ")
            )
        }
    }
}

fn qualified_named(model: &DocModel, ty: TypeId) -> String {
    // Collect the declaring chain innermost-last, then prefix the
    // outermost type's namespace.
    let mut chain = Vec::new();
    let mut current = ty;
    loop {
        let node = model.type_node(current);
        chain.push(node.name().to_string());
        match node.declaring_type() {
            Some(outer) => current = outer,
            None => {
                if let Some(ns) = node.namespace() {
                    chain.push(model.namespace_node(ns).name().to_string());
                }
                break;
            }
        }
    }
    chain.reverse();
    chain.join(".")
}

/// Fully qualified display name of a member: declaring type, dot, member
/// name, generic arguments when instantiated, and the parameter list for
/// anything callable (methods always, indexers when they declare one).
pub fn member_full_name(model: &DocModel, member: MemberId) -> String {
    let node = model.member_node(member);
    let mut result = format!(
        "{}.{}",
        type_full_name(model, node.declaring_type()),
        node.name()
    );

    if !node.generic_args().is_empty() {
        let args: Vec<String> = node
            .generic_args()
            .iter()
            .map(|arg| type_full_name(model, *arg))
            .collect();
        result.push('<');
        result.push_str(&args.join(", "));
        result.push('>');
    }

    if node.kind() == MemberKind::Method || !node.parameters().is_empty() {
        let params: Vec<String> = node
            .parameters()
            .iter()
            .map(|p| type_full_name(model, p.param_type))
            .collect();
        result.push('(');
        result.push_str(&params.join(", "));
        result.push(')');
    }
    result
}

/// A display name parsed back into its shape tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedType {
    Named { path: String },
    Generic { path: String, arguments: Vec<ParsedType> },
    Array(Box<ParsedType>),
    Pointer(Box<ParsedType>),
}

impl ParsedType {
    /// Generic argument count at this level.
    pub fn arity(&self) -> usize {
        match self {
            ParsedType::Generic { arguments, .. } => arguments.len(),
            _ => 0,
        }
    }

    /// Rightmost path segment of the underlying name.
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            ParsedType::Named { path } | ParsedType::Generic { path, .. } => {
                path.rsplit('.').next()
            }
            ParsedType::Array(inner) | ParsedType::Pointer(inner) => inner.simple_name(),
        }
    }
}

/// Parse a rendered type display name. Returns None on malformed input
/// (unbalanced angle brackets, empty segments, trailing garbage).
pub fn parse_type_display(text: &str) -> Option<ParsedType> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    // Strip array and pointer suffixes from the right; they were collected
    // outermost-first, so they wrap in reverse at the end.
    let mut core = text;
    let mut suffixes = Vec::new();
    loop {
        if let Some(rest) = core.strip_suffix("[]") {
            suffixes.push(Suffix::Array);
            core = rest;
        } else if let Some(rest) = core.strip_suffix('*') {
            suffixes.push(Suffix::Pointer);
            core = rest;
        } else {
            break;
        }
    }

    let mut parsed = parse_core(core)?;
    for suffix in suffixes.into_iter().rev() {
        parsed = match suffix {
            Suffix::Array => ParsedType::Array(Box::new(parsed)),
            Suffix::Pointer => ParsedType::Pointer(Box::new(parsed)),
        };
    }
    Some(parsed)
}

enum Suffix {
    Array,
    Pointer,
}

fn parse_core(core: &str) -> Option<ParsedType> {
    let core = core.trim();
    if core.is_empty() {
        return None;
    }

    match core.find('<') {
        None => {
            if core.contains('>') || core.contains(',') {
                return None;
            }
            Some(ParsedType::Named {
                path: core.to_string(),
            })
        }
        Some(open) => {
            if !core.ends_with('>') || open == 0 {
                return None;
            }
            let path = core[..open].trim();
            if path.is_empty() {
                return None;
            }
            let inner = &core[open + 1..core.len() - 1];
            let parts = split_generic_arguments(inner);
            if parts.is_empty() {
                return None;
            }
            let mut arguments = Vec::with_capacity(parts.len());
            for part in parts {
                arguments.push(parse_type_display(&part)?);
            }
            Some(ParsedType::Generic {
                path: path.to_string(),
                arguments,
            })
        }
    }
}

/// Split a generic argument list on top-level commas, leaving nested
/// argument lists intact.
pub fn split_generic_arguments(arguments: &str) -> Vec<String> {
    if arguments.trim().is_empty() {
        return Vec::new();
    }

    let mut result = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;

    for ch in arguments.chars() {
        match ch {
            '<' => {
                depth += 1;
                current.push(ch);
            }
            '>' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                result.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if !current.trim().is_empty() {
        result.push(current.trim().to_string());
    }
    result
}

#[cfg(test)]
#[path = "naming_tests.rs"]
mod tests;
