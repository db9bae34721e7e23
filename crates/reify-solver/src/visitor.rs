//! Type Visitor
//!
//! Single-dispatch traversal over the five [`Type`] variants. A visitor
//! overrides the handlers for the variants it cares about; reaching a
//! handler it did not override is a programming error and panics.
//!
//! Every visitor owns a [`RecursionGuard`] keyed by the visited type.
//! [`TypeVisitor::visit`] enters the guard before dispatching, so a type that
//! reappears while it is still being visited (the bound of `E extends
//! Enum<E>` mentions `E` again) is treated as already handled.

use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::{Class, ParameterizedType, Type, TypeVariable, WildcardType};
use indexmap::IndexSet;
use std::fmt;
use tracing::warn;

pub trait TypeVisitor {
    /// The in-progress set for this traversal.
    fn guard(&mut self) -> &mut RecursionGuard<Type>;

    fn visit_class(&mut self, class: &Class) {
        not_handled("class", class)
    }

    fn visit_parameterized(&mut self, ty: &ParameterizedType) {
        not_handled("parameterized type", ty)
    }

    /// `component` is the component of the generic array, not the array.
    fn visit_generic_array(&mut self, component: &Type) {
        not_handled("generic array component", component)
    }

    fn visit_wildcard(&mut self, ty: &WildcardType) {
        not_handled("wildcard type", ty)
    }

    fn visit_variable(&mut self, var: &TypeVariable) {
        not_handled("type variable", var)
    }

    /// Dispatch `ty` to exactly one handler, unless it is already in progress.
    fn visit(&mut self, ty: &Type) {
        match self.guard().enter(ty.clone()) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => return,
            denied => {
                warn!(ty = %ty, ?denied, "type visit stopped: recursion limit reached");
                return;
            }
        }
        match ty {
            Type::Class(class) => self.visit_class(class),
            Type::Parameterized(p) => self.visit_parameterized(p),
            Type::GenericArray(component) => self.visit_generic_array(component),
            Type::Wildcard(w) => self.visit_wildcard(w),
            Type::Variable(var) => self.visit_variable(var),
        }
        self.guard().leave(ty);
    }

    /// Visit each type in order.
    fn visit_all<'t>(&mut self, types: impl IntoIterator<Item = &'t Type>)
    where
        Self: Sized,
    {
        for ty in types {
            self.visit(ty);
        }
    }
}

#[cold]
fn not_handled(kind: &str, ty: &dyn fmt::Display) -> ! {
    unimplemented!("{kind} `{ty}` is not handled by this visitor")
}

// =============================================================================
// Raw types
// =============================================================================

struct RawTypeCollector {
    guard: RecursionGuard<Type>,
    raw: IndexSet<Class>,
}

impl TypeVisitor for RawTypeCollector {
    fn guard(&mut self) -> &mut RecursionGuard<Type> {
        &mut self.guard
    }

    fn visit_class(&mut self, class: &Class) {
        self.raw.insert(class.clone());
    }

    fn visit_parameterized(&mut self, ty: &ParameterizedType) {
        self.raw.insert(ty.raw_type().clone());
    }

    fn visit_generic_array(&mut self, component: &Type) {
        for raw in raw_types(component) {
            self.raw.insert(Class::array_of(&raw));
        }
    }

    fn visit_wildcard(&mut self, ty: &WildcardType) {
        self.visit_all(ty.upper_bounds());
    }

    fn visit_variable(&mut self, var: &TypeVariable) {
        let bounds = var.effective_bounds();
        self.visit_all(&bounds);
    }
}

/// The raw classes a value of type `ty` is an instance of.
///
/// A class or parameterized type contributes its raw type; a variable or
/// wildcard contributes the raw types of each upper bound, in declaration
/// order and without duplicates.
pub fn raw_types(ty: &Type) -> Vec<Class> {
    let mut collector = RawTypeCollector {
        guard: RecursionGuard::with_profile(RecursionProfile::TypeVisit),
        raw: IndexSet::new(),
    };
    collector.visit(ty);
    collector.raw.into_iter().collect()
}

// =============================================================================
// Variable occurrence
// =============================================================================

struct VariableOccurrence<'a> {
    guard: RecursionGuard<Type>,
    target: &'a TypeVariable,
    found: bool,
}

impl TypeVisitor for VariableOccurrence<'_> {
    fn guard(&mut self) -> &mut RecursionGuard<Type> {
        &mut self.guard
    }

    fn visit_class(&mut self, _class: &Class) {}

    fn visit_parameterized(&mut self, ty: &ParameterizedType) {
        if let Some(owner) = ty.owner_type() {
            self.visit(owner);
        }
        for arg in ty.arguments() {
            if self.found {
                return;
            }
            self.visit(arg);
        }
    }

    fn visit_generic_array(&mut self, component: &Type) {
        self.visit(component);
    }

    fn visit_wildcard(&mut self, ty: &WildcardType) {
        self.visit_all(ty.upper_bounds());
        self.visit_all(ty.lower_bounds());
    }

    // Bounds are not followed: `T` does not occur in `U extends T`, only in
    // types that spell `T` out.
    fn visit_variable(&mut self, var: &TypeVariable) {
        if var == self.target {
            self.found = true;
        }
    }
}

/// Whether `var` occurs anywhere in the structure of `ty`.
pub fn contains_variable(ty: &Type, var: &TypeVariable) -> bool {
    let mut visitor = VariableOccurrence {
        guard: RecursionGuard::with_profile(RecursionProfile::TypeVisit),
        target: var,
        found: false,
    };
    visitor.visit(ty);
    visitor.found
}

impl Type {
    /// See [`contains_variable`].
    pub fn contains_variable(&self, var: &TypeVariable) -> bool {
        contains_variable(self, var)
    }

    /// See [`raw_types`].
    pub fn raw_types(&self) -> Vec<Class> {
        raw_types(self)
    }
}

#[cfg(test)]
#[path = "../tests/visitor_tests.rs"]
mod tests;
