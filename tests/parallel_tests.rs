//! Concurrent queries against one shared class graph.
//!
//! Types, resolvers and tokens are immutable, and the registry is a
//! concurrent map, so every query below runs on the rayon pool without
//! synchronization.

mod common;

use common::Library;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use reify::{Class, ClassDecl, Type, TypeToken, Types};

static LIBRARY: Lazy<Library> = Lazy::new(Library::new);

#[test]
fn test_parallel_supertype_queries_agree() {
    let lib = &*LIBRARY;
    let args: Vec<Type> = vec![
        lib.string.clone().into(),
        lib.integer.clone().into(),
        lib.number.clone().into(),
        lib.list_of(&lib.string),
        Types::subtype_of(lib.number.clone().into()).expect("wildcard"),
    ];
    let results: Vec<String> = (0..256)
        .into_par_iter()
        .map(|idx| {
            let arg = args[idx % args.len()].clone();
            TypeToken::of(&lib.registry, lib.array_list_of(arg))
                .get_supertype(&lib.iterable)
                .map(|token| token.to_string())
                .unwrap_or_else(|err| err.to_string())
        })
        .collect();

    for (idx, result) in results.iter().enumerate() {
        let expected = format!("java.lang.Iterable<{}>", args[idx % args.len()]);
        assert_eq!(result, &expected);
    }
}

#[test]
fn test_shared_token_closure_is_computed_once() {
    let lib = &*LIBRARY;
    let token = TypeToken::of(&lib.registry, lib.array_list_of(&lib.string));
    let addresses: Vec<usize> = (0..64)
        .into_par_iter()
        .map(|_| {
            let clone = token.clone();
            clone.get_types() as *const _ as usize
        })
        .collect();
    assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(token.get_types().len(), 7);
}

#[test]
fn test_parallel_registration_and_queries() {
    let lib = Library::new();
    (0..32).into_par_iter().for_each(|idx| {
        let class = lib.registry.register(
            ClassDecl::new(Class::class(format!("com.example.Strings{idx}")))
                .implements(lib.list_of(&lib.string)),
        );
        let token = TypeToken::of(&lib.registry, lib.list_of(&lib.string));
        assert!(token.is_assignable_from(&class.into()));
    });
    assert!(lib.registry.contains("com.example.Strings31"));
}
