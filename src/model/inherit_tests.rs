use crate::model::inherit::{
    copy_documentation, inherit_documentation, resolve_all, undocumented_members,
};
use crate::model::member::MemberKind;
use crate::model::reference::{MemberId, Reference, TypeId};
use crate::model::registry::{DocModel, MemberSpec, TypeSpec};
use crate::model::type_ref::GenericScope;

fn class(model: &mut DocModel, name: &str) -> TypeId {
    model
        .add_type(TypeSpec::named(format!("T:Lib.{name}"), name))
        .unwrap()
}

fn method(model: &mut DocModel, owner: TypeId, owner_name: &str, name: &str) -> MemberId {
    model
        .add_member(MemberSpec::new(
            format!("M:Lib.{owner_name}.{name}"),
            name,
            MemberKind::Method,
            owner,
        ))
        .unwrap()
}

fn documented_method(
    model: &mut DocModel,
    owner: TypeId,
    owner_name: &str,
    name: &str,
    summary: &str,
) -> MemberId {
    model
        .add_member(
            MemberSpec::new(format!("M:Lib.{owner_name}.{name}"), name, MemberKind::Method, owner)
                .with_doc(format!("<summary>{summary}</summary>")),
        )
        .unwrap()
}

#[test]
fn test_base_documented_match_beats_interface() {
    let mut model = DocModel::new("Lib");
    let base = class(&mut model, "B");
    let iface = class(&mut model, "I");
    let derived = class(&mut model, "D");
    model.set_base(derived, base);
    model.add_interface(derived, iface);

    documented_method(&mut model, base, "B", "Go", "From the base.");
    documented_method(&mut model, iface, "I", "Go", "From the interface.");
    let target = method(&mut model, derived, "D", "Go");

    assert!(inherit_documentation(&mut model, target));
    assert_eq!(
        model.member_node(target).doc(),
        Some("<summary>From the base.</summary>")
    );
    let source = model.member_node(target).inherited_from().unwrap();
    assert_eq!(model.member_node(source).id(), "M:Lib.B.Go");
}

#[test]
fn test_interfaces_searched_in_declaration_order() {
    let mut model = DocModel::new("Lib");
    let first = class(&mut model, "IFirst");
    let second = class(&mut model, "ISecond");
    let derived = class(&mut model, "D");
    model.add_interface(derived, first);
    model.add_interface(derived, second);

    documented_method(&mut model, first, "IFirst", "Go", "First.");
    documented_method(&mut model, second, "ISecond", "Go", "Second.");
    let target = method(&mut model, derived, "D", "Go");

    inherit_documentation(&mut model, target);
    assert_eq!(model.member_node(target).doc(), Some("<summary>First.</summary>"));
}

#[test]
fn test_search_recurses_past_undocumented_ancestor() {
    // A <- B <- C where only A.Go has text: C must reach it through the
    // undocumented B.Go slot.
    let mut model = DocModel::new("Lib");
    let a = class(&mut model, "A");
    let b = class(&mut model, "B");
    let c = class(&mut model, "C");
    model.set_base(b, a);
    model.set_base(c, b);

    documented_method(&mut model, a, "A", "Go", "Root docs.");
    method(&mut model, b, "B", "Go");
    let target = method(&mut model, c, "C", "Go");

    assert!(inherit_documentation(&mut model, target));
    assert_eq!(model.member_node(target).doc(), Some("<summary>Root docs.</summary>"));
}

#[test]
fn test_base_chain_exhausted_before_interfaces() {
    // The base's own base outranks an interface declared directly on the
    // derived type.
    let mut model = DocModel::new("Lib");
    let root = class(&mut model, "Root");
    let mid = class(&mut model, "Mid");
    let iface = class(&mut model, "I");
    let derived = class(&mut model, "D");
    model.set_base(mid, root);
    model.set_base(derived, mid);
    model.add_interface(derived, iface);

    documented_method(&mut model, root, "Root", "Go", "Deep base.");
    documented_method(&mut model, iface, "I", "Go", "Near interface.");
    let target = method(&mut model, derived, "D", "Go");

    inherit_documentation(&mut model, target);
    assert_eq!(model.member_node(target).doc(), Some("<summary>Deep base.</summary>"));
}

#[test]
fn test_no_match_is_silent_and_counted() {
    let mut model = DocModel::new("Lib");
    let base = class(&mut model, "B");
    let derived = class(&mut model, "D");
    model.set_base(derived, base);

    documented_method(&mut model, base, "B", "Other", "Unrelated.");
    let target = method(&mut model, derived, "D", "Go");

    assert!(!inherit_documentation(&mut model, target));
    assert_eq!(model.member_node(target).doc(), None);

    let stats = resolve_all(&mut model);
    assert_eq!(stats.inherited, 0);
    assert_eq!(stats.undocumented, 1);
    assert_eq!(model.member_node(target).doc(), None);
    assert_eq!(undocumented_members(&model), vec![target]);
}

#[test]
fn test_kind_must_match() {
    let mut model = DocModel::new("Lib");
    let base = class(&mut model, "B");
    let derived = class(&mut model, "D");
    model.set_base(derived, base);

    model
        .add_member(
            MemberSpec::new("P:Lib.B.Value", "Value", MemberKind::Property, base)
                .with_doc("<summary>A property.</summary>"),
        )
        .unwrap();
    let target = model
        .add_member(MemberSpec::new("F:Lib.D.Value", "Value", MemberKind::Field, derived))
        .unwrap();

    assert!(!inherit_documentation(&mut model, target));
    assert_eq!(model.member_node(target).doc(), None);
}

#[test]
fn test_extension_methods_are_never_matches() {
    let mut model = DocModel::new("Lib");
    let root = class(&mut model, "Root");
    let mid = class(&mut model, "Mid");
    let derived = class(&mut model, "D");
    model.set_base(mid, root);
    model.set_base(derived, mid);

    // The nearer match is an extension view and must be stepped over.
    model
        .add_member(
            MemberSpec::new("M:Lib.Ext.Go(Lib.Mid)", "Go", MemberKind::Method, mid)
                .as_extension_method()
                .with_doc("<summary>Extension view.</summary>"),
        )
        .unwrap();
    documented_method(&mut model, root, "Root", "Go", "Real slot.");
    let target = method(&mut model, derived, "D", "Go");

    inherit_documentation(&mut model, target);
    assert_eq!(model.member_node(target).doc(), Some("<summary>Real slot.</summary>"));
}

#[test]
fn test_generic_base_substitutes_type_arguments() {
    // B<T> declares Put(T); D : B<int> declares Put(int) and Put(string).
    // Only the int overload matches once T is substituted.
    let mut model = DocModel::new("Lib");
    let int = model
        .add_type(TypeSpec::named("T:System.Int32", "Int32"))
        .unwrap();
    let string = model
        .add_type(TypeSpec::named("T:System.String", "String"))
        .unwrap();
    let b = model
        .add_type(TypeSpec::named("T:Lib.B`1", "B").with_generic_params(vec!["T"]))
        .unwrap();
    let t = model
        .add_type(TypeSpec::generic_param("T:Lib.B`1!T", "T", 0, GenericScope::Type))
        .unwrap();
    let b_of_int = model
        .add_type(TypeSpec::generic("T:Lib.B{System.Int32}", b, vec![int]))
        .unwrap();
    let d = class(&mut model, "D");
    model.set_base(d, b_of_int);

    model
        .add_member(
            MemberSpec::new("M:Lib.B`1.Put(`0)", "Put", MemberKind::Method, b)
                .with_parameter("value", t)
                .with_doc("<summary>Stores a value.</summary>"),
        )
        .unwrap();
    let matching = model
        .add_member(
            MemberSpec::new("M:Lib.D.Put(System.Int32)", "Put", MemberKind::Method, d)
                .with_parameter("value", int),
        )
        .unwrap();
    let other = model
        .add_member(
            MemberSpec::new("M:Lib.D.Put(System.String)", "Put", MemberKind::Method, d)
                .with_parameter("value", string),
        )
        .unwrap();

    let stats = resolve_all(&mut model);
    assert_eq!(
        model.member_node(matching).doc(),
        Some("<summary>Stores a value.</summary>")
    );
    assert_eq!(model.member_node(other).doc(), None);
    assert_eq!(stats.inherited, 1);
    assert_eq!(stats.undocumented, 1);
}

#[test]
fn test_substitution_composes_across_two_generic_hops() {
    // A<T> '= Fetch(T)', B<U> : A<U>, D : B<int>: D.Fetch(int) reaches the
    // documentation on A through two instantiations.
    let mut model = DocModel::new("Lib");
    let int = model
        .add_type(TypeSpec::named("T:System.Int32", "Int32"))
        .unwrap();
    let a = model
        .add_type(TypeSpec::named("T:Lib.A`1", "A").with_generic_params(vec!["T"]))
        .unwrap();
    let a_t = model
        .add_type(TypeSpec::generic_param("T:Lib.A`1!T", "T", 0, GenericScope::Type))
        .unwrap();
    let b = model
        .add_type(TypeSpec::named("T:Lib.B`1", "B").with_generic_params(vec!["U"]))
        .unwrap();
    let b_u = model
        .add_type(TypeSpec::generic_param("T:Lib.B`1!U", "U", 0, GenericScope::Type))
        .unwrap();
    let a_of_u = model
        .add_type(TypeSpec::generic("T:Lib.A{Lib.B`1!U}", a, vec![b_u]))
        .unwrap();
    model.set_base(b, a_of_u);
    let b_of_int = model
        .add_type(TypeSpec::generic("T:Lib.B{System.Int32}", b, vec![int]))
        .unwrap();
    let d = class(&mut model, "D");
    model.set_base(d, b_of_int);

    model
        .add_member(
            MemberSpec::new("M:Lib.A`1.Fetch(`0)", "Fetch", MemberKind::Method, a)
                .with_parameter("key", a_t)
                .with_doc("<summary>Fetches by key.</summary>"),
        )
        .unwrap();
    let target = model
        .add_member(
            MemberSpec::new("M:Lib.D.Fetch(System.Int32)", "Fetch", MemberKind::Method, d)
                .with_parameter("key", int),
        )
        .unwrap();

    assert!(inherit_documentation(&mut model, target));
    assert_eq!(
        model.member_node(target).doc(),
        Some("<summary>Fetches by key.</summary>")
    );
}

#[test]
fn test_generic_arity_separates_overloads() {
    let mut model = DocModel::new("Lib");
    let base = class(&mut model, "B");
    let derived = class(&mut model, "D");
    model.set_base(derived, base);

    let b_t = model
        .add_type(TypeSpec::generic_param("T:Lib.B.Go``1!T", "T", 0, GenericScope::Method))
        .unwrap();
    model
        .add_member(
            MemberSpec::new("M:Lib.B.Go``1(``0)", "Go", MemberKind::Method, base)
                .with_generic_params(vec!["T"])
                .with_parameter("value", b_t)
                .with_doc("<summary>Generic form.</summary>"),
        )
        .unwrap();
    model
        .add_member(
            MemberSpec::new("M:Lib.B.Go", "Go", MemberKind::Method, base)
                .with_doc("<summary>Plain form.</summary>"),
        )
        .unwrap();

    let d_t = model
        .add_type(TypeSpec::generic_param("T:Lib.D.Go``1!T", "T", 0, GenericScope::Method))
        .unwrap();
    let generic_target = model
        .add_member(
            MemberSpec::new("M:Lib.D.Go``1(``0)", "Go", MemberKind::Method, derived)
                .with_generic_params(vec!["T"])
                .with_parameter("value", d_t),
        )
        .unwrap();
    let plain_target = method(&mut model, derived, "D", "Go");

    resolve_all(&mut model);
    assert_eq!(
        model.member_node(generic_target).doc(),
        Some("<summary>Generic form.</summary>")
    );
    assert_eq!(
        model.member_node(plain_target).doc(),
        Some("<summary>Plain form.</summary>")
    );
}

#[test]
fn test_diamond_interface_graph_terminates_and_resolves() {
    let mut model = DocModel::new("Lib");
    let ibase = class(&mut model, "IBase");
    let left = class(&mut model, "ILeft");
    let right = class(&mut model, "IRight");
    let derived = class(&mut model, "D");
    model.add_interface(left, ibase);
    model.add_interface(right, ibase);
    model.add_interface(derived, left);
    model.add_interface(derived, right);

    documented_method(&mut model, ibase, "IBase", "Go", "Shared root.");
    let target = method(&mut model, derived, "D", "Go");

    assert!(inherit_documentation(&mut model, target));
    assert_eq!(model.member_node(target).doc(), Some("<summary>Shared root.</summary>"));
}

#[test]
fn test_malformed_cyclic_ancestry_terminates() {
    let mut model = DocModel::new("Lib");
    let a = class(&mut model, "A");
    let b = class(&mut model, "B");
    model.set_base(a, b);
    model.set_base(b, a);

    let target = method(&mut model, a, "A", "Go");
    assert!(!inherit_documentation(&mut model, target));
    assert_eq!(model.member_node(target).doc(), None);
}

#[test]
fn test_cref_marker_copies_from_named_target() {
    let mut model = DocModel::new("Lib");
    let a = class(&mut model, "A");
    documented_method(&mut model, a, "A", "Go", "The real text.");
    let target = model
        .add_member(
            MemberSpec::new("M:Lib.A.GoFast", "GoFast", MemberKind::Method, a)
                .with_doc("<inheritdoc cref=\"M:Lib.A.Go\"/>"),
        )
        .unwrap();

    assert!(inherit_documentation(&mut model, target));
    assert_eq!(
        model.member_node(target).doc(),
        Some("<summary>The real text.</summary>")
    );
}

#[test]
fn test_unqualified_cref_resolves_against_declaring_type() {
    let mut model = DocModel::new("Lib");
    let a = class(&mut model, "A");
    documented_method(&mut model, a, "A", "Go", "Target docs.");
    let target = model
        .add_member(
            MemberSpec::new("M:Lib.A.GoTwice", "GoTwice", MemberKind::Method, a)
                .with_doc("<inheritdoc cref=\"Go\"/>"),
        )
        .unwrap();

    assert!(inherit_documentation(&mut model, target));
    assert_eq!(model.member_node(target).doc(), Some("<summary>Target docs.</summary>"));
}

#[test]
fn test_unresolvable_cref_is_a_warning_not_an_error() {
    let mut model = DocModel::new("Lib");
    let a = class(&mut model, "A");
    let target = model
        .add_member(
            MemberSpec::new("M:Lib.A.Go", "Go", MemberKind::Method, a)
                .with_doc("<inheritdoc cref=\"M:Lib.Nowhere.Nothing\"/>"),
        )
        .unwrap();

    let stats = resolve_all(&mut model);
    assert_eq!(stats.inherited, 0);
    assert_eq!(stats.undocumented, 1);
    assert_eq!(
        model.member_node(target).doc(),
        Some("<inheritdoc cref=\"M:Lib.Nowhere.Nothing\"/>")
    );
}

#[test]
fn test_self_referential_cref_terminates() {
    let mut model = DocModel::new("Lib");
    let a = class(&mut model, "A");
    let target = model
        .add_member(
            MemberSpec::new("M:Lib.A.Go", "Go", MemberKind::Method, a)
                .with_doc("<inheritdoc cref=\"M:Lib.A.Go\"/>"),
        )
        .unwrap();

    let stats = resolve_all(&mut model);
    assert_eq!(stats.inherited, 0);
    assert!(model.member_node(target).inherited_from().is_none());
}

#[test]
fn test_marker_with_local_tags_merges_along_the_chain() {
    // A.Go is fully documented; B.Go inherits it but overrides remarks;
    // C.Go takes B's merged text. The batch driver must resolve B before C
    // regardless of registration order.
    let mut model = DocModel::new("Lib");
    let a = class(&mut model, "A");
    let b = class(&mut model, "B");
    let c = class(&mut model, "C");
    model.set_base(b, a);
    model.set_base(c, b);

    let c_target = method(&mut model, c, "C", "Go");
    let b_target = model
        .add_member(
            MemberSpec::new("M:Lib.B.Go", "Go", MemberKind::Method, b)
                .with_doc("<inheritdoc/>\n<remarks>B specific.</remarks>"),
        )
        .unwrap();
    model
        .add_member(
            MemberSpec::new("M:Lib.A.Go", "Go", MemberKind::Method, a).with_doc(
                "<summary>Does the thing.</summary>\n<remarks>A remarks.</remarks>\n<returns>Nothing.</returns>",
            ),
        )
        .unwrap();

    let stats = resolve_all(&mut model);
    let merged =
        "<summary>Does the thing.</summary>\n<remarks>B specific.</remarks>\n<returns>Nothing.</returns>";
    assert_eq!(model.member_node(b_target).doc(), Some(merged));
    assert_eq!(model.member_node(c_target).doc(), Some(merged));
    assert_eq!(stats.inherited, 2);
    assert!(stats.passes >= 2, "C must wait for B's merge to settle");
}

#[test]
fn test_resolution_outcome_is_independent_of_registration_order() {
    // The same ancestry with members registered in opposite orders must
    // settle on identical text for every slot.
    fn build(reversed: bool) -> DocModel {
        let mut model = DocModel::new("Lib");
        let a = class(&mut model, "A");
        let b = class(&mut model, "B");
        let c = class(&mut model, "C");
        model.set_base(b, a);
        model.set_base(c, b);

        let mut specs = vec![
            MemberSpec::new("M:Lib.A.Go", "Go", MemberKind::Method, a)
                .with_doc("<summary>Root.</summary>"),
            MemberSpec::new("M:Lib.B.Go", "Go", MemberKind::Method, b)
                .with_doc("<inheritdoc/>\n<remarks>Narrowed.</remarks>"),
            MemberSpec::new("M:Lib.C.Go", "Go", MemberKind::Method, c),
        ];
        if reversed {
            specs.reverse();
        }
        for spec in specs {
            model.add_member(spec).unwrap();
        }
        resolve_all(&mut model);
        model
    }

    let forward = build(false);
    let reversed = build(true);
    for id in ["M:Lib.A.Go", "M:Lib.B.Go", "M:Lib.C.Go"] {
        let f = forward.member_by_id(id).unwrap();
        let r = reversed.member_by_id(id).unwrap();
        assert_eq!(
            forward.member_node(f).doc(),
            reversed.member_node(r).doc(),
            "{id} diverged between registration orders"
        );
    }
}

#[test]
fn test_resolution_outcome_is_independent_of_member_order() {
    // Same graph as above registered in two different orders: the final
    // text assignments must be identical.
    fn build(reversed: bool) -> DocModel {
        let mut model = DocModel::new("Lib");
        let a = class(&mut model, "A");
        let b = class(&mut model, "B");
        let c = class(&mut model, "C");
        model.set_base(b, a);
        model.set_base(c, b);

        let mut specs = vec![
            MemberSpec::new("M:Lib.A.Go", "Go", MemberKind::Method, a).with_doc(
                "<summary>Does the thing.</summary>\n<returns>Nothing.</returns>",
            ),
            MemberSpec::new("M:Lib.B.Go", "Go", MemberKind::Method, b)
                .with_doc("<inheritdoc/>\n<remarks>B specific.</remarks>"),
            MemberSpec::new("M:Lib.C.Go", "Go", MemberKind::Method, c),
        ];
        if reversed {
            specs.reverse();
        }
        for spec in specs {
            model.add_member(spec).unwrap();
        }
        model
    }

    let mut forward = build(false);
    let mut backward = build(true);
    resolve_all(&mut forward);
    resolve_all(&mut backward);

    for id in ["M:Lib.A.Go", "M:Lib.B.Go", "M:Lib.C.Go"] {
        let f = forward.member_by_id(id).unwrap();
        let b = backward.member_by_id(id).unwrap();
        assert_eq!(
            forward.member_node(f).doc(),
            backward.member_node(b).doc(),
            "resolution of {id} depended on member order"
        );
    }
}

#[test]
fn test_resolution_is_idempotent() {
    let mut model = DocModel::new("Lib");
    let a = class(&mut model, "A");
    let b = class(&mut model, "B");
    model.set_base(b, a);
    documented_method(&mut model, a, "A", "Go", "Once.");
    let target = method(&mut model, b, "B", "Go");

    assert!(inherit_documentation(&mut model, target));
    let first = model.member_node(target).doc().map(str::to_string);
    assert!(!inherit_documentation(&mut model, target));
    assert_eq!(model.member_node(target).doc().map(str::to_string), first);

    let stats = resolve_all(&mut model);
    assert_eq!(stats.inherited, 0);
}

#[test]
fn test_copy_documentation_is_verbatim_and_unconditional() {
    let mut model = DocModel::new("Lib");
    let a = class(&mut model, "A");
    let source = documented_method(&mut model, a, "A", "Go", "Source text.");
    let target = model
        .add_member(
            MemberSpec::new("M:Lib.A.Other", "Other", MemberKind::Method, a)
                .with_doc("<summary>Old text.</summary>"),
        )
        .unwrap();

    assert!(copy_documentation(&mut model, target, source));
    assert_eq!(model.member_node(target).doc(), Some("<summary>Source text.</summary>"));
    assert_eq!(model.member_node(target).inherited_from(), Some(source));

    let empty = method(&mut model, a, "A", "Empty");
    assert!(!copy_documentation(&mut model, target, empty));
}
