//! Subtype and assignability checking.
//!
//! `SubtypeChecker` answers "is `source` a subtype of `target`" for any two
//! types of the model:
//!
//! - class targets compare raw ancestry,
//! - parameterized targets compare type arguments invariantly, except where
//!   the target argument is a wildcard, which uses containment,
//! - arrays are covariant in their component,
//! - variables and wildcards on the source side are judged by their upper
//!   bounds, wildcards on the target side by their lower bounds.
//!
//! Checks re-enter through the bounds of F-bounded variables, so the checker
//! keeps an in-progress set of `(source, target)` pairs. Re-entering a pair
//! that is already being checked is coinductively assumed to hold.

use crate::hierarchy::ClassHierarchy;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::supertype::instantiate_as_supertype;
use crate::types::{Class, ParameterizedType, Type};
use tracing::{trace, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubtypeResult {
    True,
    False,
    /// The pair was already being checked higher up.
    CycleDetected,
}

impl SubtypeResult {
    pub fn is_true(self) -> bool {
        matches!(self, SubtypeResult::True | SubtypeResult::CycleDetected)
    }
}

impl From<bool> for SubtypeResult {
    fn from(value: bool) -> Self {
        if value {
            SubtypeResult::True
        } else {
            SubtypeResult::False
        }
    }
}

pub struct SubtypeChecker<'h> {
    hierarchy: &'h dyn ClassHierarchy,
    guard: RecursionGuard<(Type, Type)>,
}

impl<'h> SubtypeChecker<'h> {
    pub fn new(hierarchy: &'h dyn ClassHierarchy) -> Self {
        Self {
            hierarchy,
            guard: RecursionGuard::with_profile(RecursionProfile::Assignability),
        }
    }

    pub fn is_subtype(&mut self, source: &Type, target: &Type) -> bool {
        self.check_subtype(source, target).is_true()
    }

    pub fn check_subtype(&mut self, source: &Type, target: &Type) -> SubtypeResult {
        if source == target {
            return SubtypeResult::True;
        }
        let key = (source.clone(), target.clone());
        match self.guard.enter(key.clone()) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => return SubtypeResult::CycleDetected,
            denied => {
                warn!(source = %source, target = %target, ?denied, "subtype check gave up");
                return SubtypeResult::False;
            }
        }
        let result = self.check_subtype_inner(source, target);
        self.guard.leave(&key);
        trace!(source = %source, target = %target, ?result, "check_subtype");
        result.into()
    }

    fn check_subtype_inner(&mut self, source: &Type, target: &Type) -> bool {
        if let Type::Wildcard(w) = target {
            return w.lower_bounds().iter().any(|lower| self.is_subtype(source, lower));
        }
        if let Type::Wildcard(w) = source {
            return w.upper_bounds().iter().any(|upper| self.is_subtype(upper, target));
        }
        if let Type::Variable(var) = source {
            return var
                .effective_bounds()
                .iter()
                .any(|bound| self.is_subtype(bound, target));
        }
        if let Type::GenericArray(component) = source {
            return self.is_array_subtype(component, target);
        }
        match target {
            Type::Class(class) => self.hierarchy.is_subclass(&source.erasure(), class),
            Type::Parameterized(p) => self.is_subtype_of_parameterized(source, p),
            Type::GenericArray(target_component) => match source.as_class() {
                Some(class) => match class.component_type() {
                    Some(component) => {
                        self.is_subtype(&Type::Class(component.clone()), target_component)
                    }
                    None => false,
                },
                None => false,
            },
            Type::Variable(_) | Type::Wildcard(_) => false,
        }
    }

    /// `component[]` against any target.
    fn is_array_subtype(&mut self, component: &Type, target: &Type) -> bool {
        match target {
            Type::Class(class) => match class.component_type() {
                Some(target_component) => {
                    self.is_subtype(component, &Type::Class(target_component.clone()))
                }
                None => self
                    .hierarchy
                    .is_subclass(&Class::array_of(&Class::object()), class),
            },
            Type::GenericArray(target_component) => self.is_subtype(component, target_component),
            _ => false,
        }
    }

    fn is_subtype_of_parameterized(&mut self, source: &Type, target: &ParameterizedType) -> bool {
        let raw = target.raw_type();
        if !self.hierarchy.is_subclass(&source.erasure(), raw) {
            return false;
        }
        let Some(view) = instantiate_as_supertype(self.hierarchy, source, raw) else {
            return false;
        };
        // A raw view leaves the declared parameters in place.
        let actual_args: Vec<Type> = match &view {
            Type::Parameterized(p) => p.arguments().to_vec(),
            _ => self
                .hierarchy
                .type_parameters(raw)
                .into_iter()
                .map(Type::Variable)
                .collect(),
        };
        if actual_args.len() != target.arguments().len() {
            return false;
        }
        for (actual, formal) in actual_args.iter().zip(target.arguments()) {
            if !self.contains(actual, formal) {
                return false;
            }
        }

        let Some(target_owner) = target.owner_type() else {
            return true;
        };
        if self.hierarchy.is_static(raw) {
            return true;
        }
        match view.as_parameterized().and_then(ParameterizedType::owner_type) {
            Some(owner) => self.is_subtype(owner, target_owner),
            None => false,
        }
    }

    /// Whether the type argument `actual` is contained by `formal`: equal,
    /// or within the bounds of a wildcard `formal`.
    pub fn contains(&mut self, actual: &Type, formal: &Type) -> bool {
        if actual == formal {
            return true;
        }
        let Type::Wildcard(w) = formal else {
            return false;
        };
        w.upper_bounds().iter().all(|upper| self.is_subtype(actual, upper))
            && w.lower_bounds().iter().all(|lower| self.is_subtype(lower, actual))
    }
}

/// Whether a value of type `from` may be assigned to `to`.
///
/// A wildcard `to` accepts every type that fits under all of its bounds;
/// `?` accepts everything. A concrete `to` never accepts a wildcard.
pub fn is_assignable(hierarchy: &dyn ClassHierarchy, to: &Type, from: &Type) -> bool {
    let mut checker = SubtypeChecker::new(hierarchy);
    match to {
        Type::Wildcard(w) if w.is_unbounded() => true,
        Type::Wildcard(w) => {
            w.upper_bounds().iter().all(|upper| checker.is_subtype(from, upper))
                && w.lower_bounds().iter().all(|lower| checker.is_subtype(from, lower))
        }
        _ if matches!(from, Type::Wildcard(_)) => false,
        _ => checker.is_subtype(from, to),
    }
}

#[cfg(test)]
#[path = "../tests/assignability_tests.rs"]
mod tests;
