use super::*;
use crate::errors::TypeErrorKind;
use crate::fixtures::{Jdk, class, parameterized, var};

#[test]
fn test_bind_and_resolve() {
    let jdk = Jdk::new();
    let resolver = TypeResolver::new()
        .bind(&jdk.list_e, &jdk.string_t())
        .expect("E -> String");
    assert_eq!(resolver.len(), 1);
    assert_eq!(resolver.get(&jdk.list_e), Some(&jdk.string_t()));
    assert_eq!(
        resolver.resolve(&jdk.list_of(var(&jdk.list_e))),
        jdk.list_of(jdk.string_t())
    );
}

#[test]
fn test_bind_leaves_the_receiver_untouched() {
    let jdk = Jdk::new();
    let empty = TypeResolver::new();
    let bound = empty.bind(&jdk.list_e, &jdk.string_t()).expect("E -> String");
    assert!(empty.is_empty());
    assert_eq!(bound.len(), 1);
}

#[test]
fn test_conflicting_binding() {
    let jdk = Jdk::new();
    let resolver = TypeResolver::new()
        .bind(&jdk.list_e, &jdk.string_t())
        .expect("E -> String");

    // Same value again is fine.
    assert!(resolver.bind(&jdk.list_e, &jdk.string_t()).is_ok());

    let err = resolver
        .bind(&jdk.list_e, &jdk.integer_t())
        .expect_err("E is already String");
    assert_eq!(err.kind(), TypeErrorKind::ConflictingBinding);
    match err {
        TypeError::ConflictingBinding {
            variable,
            existing,
            requested,
        } => {
            assert_eq!(variable, jdk.list_e);
            assert_eq!(existing, jdk.string_t());
            assert_eq!(requested, jdk.integer_t());
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_self_binding_is_a_no_op() {
    let jdk = Jdk::new();
    let resolver = TypeResolver::new()
        .bind(&jdk.list_e, &var(&jdk.list_e))
        .expect("E -> E");
    assert!(resolver.is_empty());
    assert_eq!(resolver.resolve(&var(&jdk.list_e)), var(&jdk.list_e));
}

#[test]
fn test_bind_all() {
    let jdk = Jdk::new();
    let resolver = TypeResolver::new()
        .bind_all([
            (jdk.map_k.clone(), jdk.string_t()),
            (jdk.map_v.clone(), jdk.integer_t()),
        ])
        .expect("K, V");
    let mut names: Vec<&str> = resolver.mappings().map(|(var, _)| var.name()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["K", "V"]);
    assert_eq!(
        resolver.resolve(&parameterized(&jdk.map, &[var(&jdk.map_k), var(&jdk.map_v)])),
        parameterized(&jdk.map, &[jdk.string_t(), jdk.integer_t()])
    );
}

#[test]
fn test_resolve_with_empty_map_is_identity() {
    let jdk = Jdk::new();
    let resolver = TypeResolver::new();
    let samples = [
        jdk.list_of(var(&jdk.list_e)),
        Types::subtype_of(var(&jdk.list_e)).expect("wildcard"),
        Types::array_of(jdk.list_of(jdk.string_t())),
        var(&jdk.enum_e),
        class(&jdk.int),
    ];
    for ty in &samples {
        assert_eq!(&resolver.resolve(ty), ty);
    }
}

#[test]
fn test_resolve_recurses_through_structure() {
    let jdk = Jdk::new();
    let e = var(&jdk.list_e);
    let resolver = TypeResolver::new().bind(&jdk.list_e, &jdk.string_t()).expect("E");

    let wildcard = Types::supertype_of(e.clone()).expect("? super E");
    assert_eq!(
        resolver.resolve(&jdk.list_of(wildcard)).to_string(),
        "java.util.List<? super java.lang.String>"
    );

    let nested = parameterized(&jdk.map, &[e.clone(), jdk.list_of(e.clone())]);
    assert_eq!(
        resolver.resolve(&nested).to_string(),
        "java.util.Map<java.lang.String, java.util.List<java.lang.String>>"
    );

    // An unmapped variable stays as it is.
    assert_eq!(resolver.resolve(&var(&jdk.map_k)), var(&jdk.map_k));
}

#[test]
fn test_resolve_generic_array_canonicalizes_to_array_class() {
    let jdk = Jdk::new();
    let resolver = TypeResolver::new().bind(&jdk.list_e, &jdk.string_t()).expect("E");
    let e_array = Types::array_of(var(&jdk.list_e));
    assert!(matches!(e_array, Type::GenericArray(_)));
    assert_eq!(resolver.resolve(&e_array), class(&Class::array_of(&jdk.string)));
}

#[test]
fn test_resolved_values_are_not_resolved_again() {
    let jdk = Jdk::new();
    let resolver = TypeResolver::new()
        .bind(&jdk.map_k, &var(&jdk.map_v))
        .and_then(|r| r.bind(&jdk.map_v, &jdk.list_of(var(&jdk.map_k))))
        .expect("K -> V, V -> List<K>");
    assert_eq!(resolver.resolve(&var(&jdk.map_k)), var(&jdk.map_v));
    assert_eq!(
        resolver.resolve(&var(&jdk.map_v)),
        jdk.list_of(var(&jdk.map_k))
    );
}

#[test]
fn test_unify_parameterized() {
    let jdk = Jdk::new();
    let shape = parameterized(&jdk.map, &[var(&jdk.map_k), jdk.list_of(var(&jdk.map_v))]);
    let instance = parameterized(&jdk.map, &[jdk.string_t(), jdk.list_of(jdk.integer_t())]);
    let resolver = TypeResolver::new().unify(&shape, &instance).expect("unifies");
    assert_eq!(resolver.get(&jdk.map_k), Some(&jdk.string_t()));
    assert_eq!(resolver.get(&jdk.map_v), Some(&jdk.integer_t()));
    assert_eq!(resolver.resolve(&shape), instance);
}

#[test]
fn test_unify_raw_type_mismatch() {
    let jdk = Jdk::new();
    let err = TypeResolver::new()
        .unify(&jdk.list_of(var(&jdk.list_e)), &parameterized(&jdk.collection, &[jdk.string_t()]))
        .expect_err("List vs Collection");
    assert_eq!(err.kind(), TypeErrorKind::ShapeMismatch);

    let err = TypeResolver::new()
        .unify(&jdk.string_t(), &jdk.integer_t())
        .expect_err("String vs Integer");
    assert_eq!(err.kind(), TypeErrorKind::ShapeMismatch);
}

#[test]
fn test_unify_repeated_variable_must_agree() {
    let jdk = Jdk::new();
    let shape = parameterized(&jdk.map, &[var(&jdk.map_k), var(&jdk.map_k)]);

    let same = parameterized(&jdk.map, &[jdk.string_t(), jdk.string_t()]);
    assert!(TypeResolver::new().unify(&shape, &same).is_ok());

    let different = parameterized(&jdk.map, &[jdk.string_t(), jdk.integer_t()]);
    let err = TypeResolver::new()
        .unify(&shape, &different)
        .expect_err("K cannot be both");
    assert_eq!(err.kind(), TypeErrorKind::ConflictingBinding);
}

#[test]
fn test_unify_wildcards() {
    let jdk = Jdk::new();
    let e = var(&jdk.list_e);

    // `List<E>` matched against `List<? extends Number>` binds E to the wildcard.
    let instance = jdk.list_of(Types::subtype_of(jdk.number_t()).expect("wildcard"));
    let resolver = TypeResolver::new()
        .unify(&jdk.list_of(e.clone()), &instance)
        .expect("unifies");
    assert_eq!(resolver.resolve(&e), Types::subtype_of(jdk.number_t()).expect("wildcard"));

    // A wildcard shape unifies its own bounds with the instance's bounds.
    let shape = jdk.list_of(Types::subtype_of(e.clone()).expect("? extends E"));
    let resolver = TypeResolver::new().unify(&shape, &instance).expect("unifies");
    assert_eq!(resolver.get(&jdk.list_e), Some(&jdk.number_t()));

    // `? extends E` against `? super Number` has different bound shapes.
    let lower = jdk.list_of(Types::supertype_of(jdk.number_t()).expect("wildcard"));
    let err = TypeResolver::new().unify(&shape, &lower).expect_err("mismatched bounds");
    assert_eq!(err.kind(), TypeErrorKind::ShapeMismatch);

    // Any non-wildcard shape accepts a wildcard instance without bindings.
    let resolver = TypeResolver::new()
        .unify(&jdk.list_of(jdk.string_t()), &Types::unbounded())
        .expect("unifies");
    assert!(resolver.is_empty());
}

#[test]
fn test_unify_arrays() {
    let jdk = Jdk::new();
    let shape = Types::array_of(var(&jdk.list_e));
    let resolver = TypeResolver::new()
        .unify(&shape, &class(&Class::array_of(&jdk.string)))
        .expect("E[] vs String[]");
    assert_eq!(resolver.get(&jdk.list_e), Some(&jdk.string_t()));

    let generic = Types::array_of(jdk.list_of(jdk.integer_t()));
    let resolver = TypeResolver::new()
        .unify(&Types::array_of(jdk.list_of(var(&jdk.list_e))), &generic)
        .expect("List<E>[] vs List<Integer>[]");
    assert_eq!(resolver.get(&jdk.list_e), Some(&jdk.integer_t()));

    let err = TypeResolver::new()
        .unify(&shape, &jdk.string_t())
        .expect_err("String is not an array");
    assert_eq!(err.kind(), TypeErrorKind::ShapeMismatch);
}

#[test]
fn test_unify_owner_types() {
    let jdk = Jdk::new();
    let shape = jdk.registry.generic_form(&jdk.inner);
    let instance = jdk
        .types()
        .new_parameterized_with_owner(
            parameterized(&jdk.outer, &[jdk.string_t()]),
            &jdk.inner,
            vec![jdk.integer_t()],
        )
        .expect("Outer<String>.Inner<Integer>");
    let resolver = TypeResolver::new().unify(&shape, &instance).expect("unifies");
    assert_eq!(resolver.get(&jdk.outer_t), Some(&jdk.string_t()));
    assert_eq!(resolver.get(&jdk.inner_u), Some(&jdk.integer_t()));
}

#[test]
fn test_covariantly_collects_ancestor_mappings() {
    let jdk = Jdk::new();
    let resolver = TypeResolver::covariantly(&jdk.registry, &jdk.array_list_of(jdk.string_t()));
    for param in [
        &jdk.array_list_e,
        &jdk.abstract_list_e,
        &jdk.abstract_collection_e,
        &jdk.list_e,
        &jdk.collection_e,
        &jdk.iterable_t,
    ] {
        assert_eq!(resolver.get(param), Some(&jdk.string_t()), "{param:?}");
    }
    assert_eq!(resolver.get(&jdk.map_k), None);
}

#[test]
fn test_covariantly_on_raw_class_maps_to_own_parameters() {
    let jdk = Jdk::new();
    let resolver = TypeResolver::covariantly(&jdk.registry, &class(&jdk.array_list));
    assert_eq!(resolver.get(&jdk.array_list_e), None);
    assert_eq!(resolver.get(&jdk.list_e), Some(&var(&jdk.array_list_e)));
    assert_eq!(resolver.get(&jdk.iterable_t), Some(&var(&jdk.array_list_e)));
}

#[test]
fn test_covariantly_terminates_on_f_bounds() {
    let jdk = Jdk::new();
    let resolver = TypeResolver::covariantly(&jdk.registry, &class(&jdk.time_unit));
    assert_eq!(resolver.get(&jdk.enum_e), Some(&class(&jdk.time_unit)));
    assert_eq!(resolver.get(&jdk.comparable_t), Some(&class(&jdk.time_unit)));

    let through_bound = TypeResolver::covariantly(&jdk.registry, &var(&jdk.enum_e));
    assert_eq!(through_bound.get(&jdk.comparable_t), Some(&var(&jdk.enum_e)));
}

#[test]
fn test_absorb_keeps_existing_mappings() {
    let jdk = Jdk::new();
    let a = TypeResolver::new().bind(&jdk.list_e, &jdk.string_t()).expect("a");
    let b = TypeResolver::new()
        .bind_all([
            (jdk.list_e.clone(), jdk.integer_t()),
            (jdk.map_k.clone(), jdk.number_t()),
        ])
        .expect("b");
    let merged = a.absorb(&b);
    assert_eq!(merged.get(&jdk.list_e), Some(&jdk.string_t()));
    assert_eq!(merged.get(&jdk.map_k), Some(&jdk.number_t()));
}
