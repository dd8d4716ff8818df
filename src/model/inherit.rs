//! Documentation inheritance resolution.
//!
//! A member without its own documentation (missing, blank, or holding an
//! `<inheritdoc/>` marker) borrows it from the member it overrides or
//! implements. The search walks the declaring type's ancestry depth-first,
//! base type before interfaces and interfaces in declaration order, looking
//! for a member with the same kind, name, and signature once the ancestry
//! path's generic arguments are substituted in. The first documented match
//! wins; an undocumented match keeps the search going through that
//! ancestor's own ancestry. Extension methods are never candidates. A
//! marker with a `cref` copies from that one target instead of searching.
//!
//! Finding nothing is a normal outcome: the member simply stays
//! undocumented and is reported, not failed.

use std::collections::HashSet;

use crate::model::generics::{Substitution, types_match};
use crate::model::member::MemberNode;
use crate::model::reference::{MemberId, Reference, TypeId};
use crate::model::registry::DocModel;
use crate::model::type_ref::TypeShape;
use crate::model::xmldoc;

/// Summary of one batch resolution run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Members that received documentation from another member
    pub inherited: usize,
    /// Fixed-point passes it took to settle
    pub passes: usize,
    /// Members left without documentation
    pub undocumented: usize,
}

/// Where one member's search landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Found {
    /// A documented source ready to copy from
    Source(MemberId),
    /// The right member, but its own documentation is still unresolved
    Waiting,
}

/// How to treat a matching member that still awaits its own resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Policy {
    /// Report it as pending so the batch driver retries next pass
    Defer,
    /// Treat it as undocumented and keep searching past it
    SearchPast,
}

/// Copy the source member's documentation text onto the target verbatim,
/// recording provenance. Returns false when the source has none to give.
pub fn copy_documentation(model: &mut DocModel, target: MemberId, source: MemberId) -> bool {
    match model.member_node(source).doc() {
        Some(text) => {
            let text = text.to_string();
            model.set_member_doc(target, text, Some(source));
            true
        }
        None => false,
    }
}

/// Resolve one member in isolation: search its ancestry (or cref target),
/// treating unresolved matches as undocumented, and copy or merge the first
/// documented text found. Idempotent; returns whether anything was copied.
pub fn inherit_documentation(model: &mut DocModel, member: MemberId) -> bool {
    if !xmldoc::needs_inheritance(model.member_node(member).doc()) {
        return false;
    }
    match locate_source(model, member, Policy::SearchPast) {
        Some(Found::Source(source)) => {
            apply_inherited(model, member, source);
            true
        }
        _ => false,
    }
}

/// Resolve every member in the model to a fixed point.
///
/// Each pass resolves the members whose source text is already settled and
/// defers the ones whose source is itself still pending, so the final
/// assignment does not depend on iteration order. Once a pass copies
/// nothing, a last sweep settles members whose nearest match can never
/// resolve by searching past it.
pub fn resolve_all(model: &mut DocModel) -> ResolveStats {
    let mut stats = ResolveStats::default();
    let mut pending: Vec<MemberId> = model
        .member_ids()
        .into_iter()
        .filter(|m| xmldoc::needs_inheritance(model.member_node(*m).doc()))
        .collect();

    loop {
        stats.passes += 1;
        let mut copied = 0;
        let mut still_pending = Vec::with_capacity(pending.len());

        for member in pending {
            match locate_source(model, member, Policy::Defer) {
                Some(Found::Source(source)) => {
                    apply_inherited(model, member, source);
                    copied += 1;
                    stats.inherited += 1;
                }
                Some(Found::Waiting) => still_pending.push(member),
                None => {}
            }
        }

        pending = still_pending;
        if copied == 0 || pending.is_empty() {
            break;
        }
    }

    // Whatever is left waits on members that will never resolve. Decide
    // every leftover against the settled model first, then apply, so the
    // outcome stays independent of iteration order.
    let settled: Vec<(MemberId, MemberId)> = pending
        .iter()
        .filter_map(
            |&member| match locate_source(model, member, Policy::SearchPast) {
                Some(Found::Source(source)) => Some((member, source)),
                _ => None,
            },
        )
        .collect();
    for (member, source) in settled {
        apply_inherited(model, member, source);
        stats.inherited += 1;
    }

    for member in undocumented_members(model) {
        log::warn!(
            "No documentation found for '{}'",
            model.member_node(member).id()
        );
        stats.undocumented += 1;
    }
    stats
}

/// Members still without usable documentation (missing, blank, or stuck on
/// an inheritdoc marker), in arena order.
pub fn undocumented_members(model: &DocModel) -> Vec<MemberId> {
    model
        .member_ids()
        .into_iter()
        .filter(|&m| xmldoc::needs_inheritance(model.member_node(m).doc()))
        .collect()
}

/// Copy `source`'s text onto `member`, merging when the member carried an
/// inheritdoc marker next to local tags.
fn apply_inherited(model: &mut DocModel, member: MemberId, source: MemberId) {
    let has_local = model
        .member_node(member)
        .doc()
        .is_some_and(|d| !d.trim().is_empty());
    if !has_local {
        copy_documentation(model, member, source);
        return;
    }

    let local = model.member_node(member).doc().unwrap_or_default().to_string();
    let inherited = model.member_node(source).doc().unwrap_or_default().to_string();
    let merged = xmldoc::merge_inherited(&local, &inherited);
    model.set_member_doc(member, merged, Some(source));
}

fn locate_source(model: &DocModel, member: MemberId, policy: Policy) -> Option<Found> {
    let doc = model.member_node(member).doc();
    if let Some(cref) = doc.and_then(xmldoc::inheritdoc_cref) {
        return locate_by_cref(model, member, &cref, policy);
    }

    let declaring = model.member_node(member).declaring_type();
    let mut visited = HashSet::new();
    visited.insert(declaring);

    let node = model.type_node(declaring);
    let subst = Substitution::identity();
    if let Some(base) = node.base() {
        if let Some(found) = search_type(model, member, base, &subst, &mut visited, policy) {
            return Some(found);
        }
    }
    for &interface in node.interfaces() {
        if let Some(found) = search_type(model, member, interface, &subst, &mut visited, policy) {
            return Some(found);
        }
    }
    None
}

/// Search one ancestor reference and, when no documented match is declared
/// there, its own ancestry, depth-first.
fn search_type(
    model: &DocModel,
    member: MemberId,
    ancestor: TypeId,
    subst: &Substitution,
    visited: &mut HashSet<TypeId>,
    policy: Policy,
) -> Option<Found> {
    if !visited.insert(ancestor) {
        return None;
    }

    // Peel the instantiation: members are declared on the definition, and
    // the arguments become the innermost substitution frame.
    let (definition, subst) = match model.type_node(ancestor).shape() {
        TypeShape::Generic {
            definition,
            arguments,
        } => (*definition, subst.extended_with(arguments)),
        TypeShape::Named => (ancestor, subst.extended_with(&[])),
        _ => return None,
    };

    let target = model.member_node(member);
    for &candidate in model.type_node(definition).members() {
        let node = model.member_node(candidate);
        if !signature_matches(model, target, node, &subst) {
            continue;
        }
        if !xmldoc::needs_inheritance(node.doc()) {
            return Some(Found::Source(candidate));
        }
        // The overridden slot exists here but has nothing to give yet.
        match policy {
            Policy::Defer => return Some(Found::Waiting),
            Policy::SearchPast => break,
        }
    }

    let node = model.type_node(definition);
    if let Some(base) = node.base() {
        if let Some(found) = search_type(model, member, base, &subst, visited, policy) {
            return Some(found);
        }
    }
    for &interface in node.interfaces() {
        if let Some(found) = search_type(model, member, interface, &subst, visited, policy) {
            return Some(found);
        }
    }
    None
}

/// Kind, name, generic arity, and parameter types (seen through the
/// ancestry path's substitution) must all line up. Extension methods are
/// not inherited members of the type they extend.
fn signature_matches(
    model: &DocModel,
    target: &MemberNode,
    candidate: &MemberNode,
    subst: &Substitution,
) -> bool {
    if candidate.is_extension_method() || candidate.is_extension_definition() {
        return false;
    }
    if candidate.kind() != target.kind() || candidate.name() != target.name() {
        return false;
    }
    if candidate.generic_params().len() != target.generic_params().len() {
        return false;
    }
    if candidate.parameters().len() != target.parameters().len() {
        return false;
    }
    candidate
        .parameters()
        .iter()
        .zip(target.parameters())
        .all(|(c, t)| types_match(model, c.param_type, subst, t.param_type))
}

/// Resolve an explicit `cref` target. Candidate id forms are tried in
/// order: as written, prefixed with the member's own kind, prefixed with
/// every other kind, and qualified by the declaring type for unqualified
/// names. No ancestry fallback: a miss leaves the member undocumented.
fn locate_by_cref(model: &DocModel, member: MemberId, cref: &str, policy: Policy) -> Option<Found> {
    for id in cref_candidates(model, member, cref) {
        let Some(candidate) = model.member_by_id(&id) else {
            continue;
        };
        if candidate == member {
            continue;
        }
        if !xmldoc::needs_inheritance(model.member_node(candidate).doc()) {
            return Some(Found::Source(candidate));
        }
        return match policy {
            Policy::Defer => Some(Found::Waiting),
            Policy::SearchPast => None,
        };
    }
    log::debug!(
        "inheritdoc cref '{}' on '{}' matches nothing in the model",
        cref,
        model.member_node(member).id()
    );
    None
}

fn cref_candidates(model: &DocModel, member: MemberId, cref: &str) -> Vec<String> {
    let node = model.member_node(member);
    let mut candidates = Vec::new();

    // Compiler-resolved crefs arrive with their kind prefix already.
    candidates.push(cref.to_string());
    candidates.push(format!("{}{}", node.kind().id_prefix(), cref));
    for prefix in ["M:", "P:", "F:", "E:"] {
        if prefix != node.kind().id_prefix() {
            candidates.push(format!("{prefix}{cref}"));
        }
    }

    // Hand-written unqualified names resolve against the declaring type.
    if !cref.contains('.') {
        let declaring = model.type_node(node.declaring_type()).id();
        if let Some(type_path) = declaring.split_once(':').map(|(_, path)| path) {
            candidates.push(format!("{}{}.{}", node.kind().id_prefix(), type_path, cref));
            for prefix in ["M:", "P:", "F:", "E:"] {
                if prefix != node.kind().id_prefix() {
                    candidates.push(format!("{prefix}{type_path}.{cref}"));
                }
            }
        }
    }
    candidates
}

#[cfg(test)]
#[path = "inherit_tests.rs"]
mod tests;
