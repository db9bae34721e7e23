use super::*;
use crate::fixtures::{Jdk, class, parameterized, var};
use crate::type_factory::Types;

/// Counts class and parameterized nodes; leaves the rest to the defaults.
struct ClassCounter {
    guard: RecursionGuard<Type>,
    classes: usize,
    parameterized: usize,
}

impl ClassCounter {
    fn new() -> Self {
        Self {
            guard: RecursionGuard::with_profile(RecursionProfile::TypeVisit),
            classes: 0,
            parameterized: 0,
        }
    }
}

impl TypeVisitor for ClassCounter {
    fn guard(&mut self) -> &mut RecursionGuard<Type> {
        &mut self.guard
    }

    fn visit_class(&mut self, _class: &Class) {
        self.classes += 1;
    }

    fn visit_parameterized(&mut self, ty: &ParameterizedType) {
        self.parameterized += 1;
        self.visit_all(ty.arguments());
    }
}

#[test]
fn test_visit_dispatches_to_one_handler() {
    let jdk = Jdk::new();
    let mut counter = ClassCounter::new();
    counter.visit(&parameterized(&jdk.map, &[jdk.string_t(), jdk.list_of(jdk.integer_t())]));
    assert_eq!(counter.parameterized, 2);
    assert_eq!(counter.classes, 2);
    assert!(!counter.guard.is_active());
}

#[test]
fn test_visit_all_visits_in_order() {
    let jdk = Jdk::new();
    let mut counter = ClassCounter::new();
    counter.visit_all(&[jdk.string_t(), jdk.integer_t(), jdk.number_t()]);
    assert_eq!(counter.classes, 3);
}

#[test]
#[should_panic(expected = "not handled by this visitor")]
fn test_unhandled_variant_panics() {
    let jdk = Jdk::new();
    let mut counter = ClassCounter::new();
    counter.visit(&var(&jdk.list_e));
}

/// Follows variable bounds; terminates on `E extends Enum<E>`.
struct BoundWalker {
    guard: RecursionGuard<Type>,
    variables: Vec<String>,
}

impl TypeVisitor for BoundWalker {
    fn guard(&mut self) -> &mut RecursionGuard<Type> {
        &mut self.guard
    }

    fn visit_class(&mut self, _class: &Class) {}

    fn visit_parameterized(&mut self, ty: &ParameterizedType) {
        self.visit_all(ty.arguments());
    }

    fn visit_variable(&mut self, var: &TypeVariable) {
        self.variables.push(var.name().to_owned());
        self.visit_all(var.bounds());
    }
}

#[test]
fn test_self_referential_bound_is_visited_once() {
    let jdk = Jdk::new();
    let mut walker = BoundWalker {
        guard: RecursionGuard::with_profile(RecursionProfile::TypeVisit),
        variables: Vec::new(),
    };
    walker.visit(&var(&jdk.enum_e));
    assert_eq!(walker.variables, vec!["E".to_owned()]);
    assert!(!walker.guard.is_active());
}

#[test]
fn test_raw_types() {
    let jdk = Jdk::new();
    assert_eq!(raw_types(&jdk.list_of(jdk.string_t())), vec![jdk.list.clone()]);
    assert_eq!(raw_types(&var(&jdk.list_e)), vec![jdk.object.clone()]);
    assert_eq!(raw_types(&var(&jdk.enum_e)), vec![jdk.enum_.clone()]);

    let both = TypeVariable::of_class(&jdk.holder, "B");
    both.set_bounds(vec![jdk.number_t(), class(&jdk.comparable)]);
    assert_eq!(
        raw_types(&var(&both)),
        vec![jdk.number.clone(), jdk.comparable.clone()]
    );

    let wildcard = Types::subtype_of(jdk.list_of(jdk.string_t())).expect("wildcard");
    assert_eq!(wildcard.raw_types(), vec![jdk.list.clone()]);

    let generic_array = Types::array_of(var(&jdk.enum_e));
    assert_eq!(raw_types(&generic_array), vec![Class::array_of(&jdk.enum_)]);
}

#[test]
fn test_contains_variable() {
    let jdk = Jdk::new();
    let e = &jdk.list_e;
    assert!(contains_variable(&var(e), e));
    assert!(jdk.list_of(var(e)).contains_variable(e));
    assert!(Types::array_of(jdk.list_of(var(e))).contains_variable(e));
    assert!(
        Types::supertype_of(var(e))
            .expect("wildcard")
            .contains_variable(e)
    );
    assert!(!jdk.list_of(jdk.string_t()).contains_variable(e));
    // Same name, other declaration.
    assert!(!jdk.list_of(var(&jdk.collection_e)).contains_variable(e));

    // Bounds are not part of the structure.
    let u = TypeVariable::of_class(&jdk.holder, "U");
    u.set_bounds(vec![var(e)]);
    assert!(!var(&u).contains_variable(e));
}
