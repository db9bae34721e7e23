//! Supertype instantiation.
//!
//! Walks the generic supertype graph of a class or parameterized type and
//! returns the instantiation of one raw ancestor, applying type argument
//! substitution along the way: `ArrayList<String>` viewed as `Iterable` is
//! `Iterable<String>`.

use crate::hierarchy::ClassHierarchy;
use crate::resolver::{Substitution, substitute};
use crate::types::{Class, Type};
use reify_common::limits::MAX_SUPERTYPE_WALK_STEPS;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::{trace, warn};

/// Return `ty` viewed as `target`, or `None` if `target` is not a raw
/// ancestor of `ty`.
///
/// A bare generic class starts from its generic form, so `ArrayList` viewed
/// as `List` is `List<E>` with `ArrayList`'s `E`. A raw use of a generic class
/// further up the chain (`class Legacy extends ArrayList`) preserves rawness:
/// its supertypes are reached as raw classes.
///
/// Variables and wildcards are not handled here; callers go through their
/// upper bounds.
pub(crate) fn instantiate_as_supertype(
    hierarchy: &dyn ClassHierarchy,
    ty: &Type,
    target: &Class,
) -> Option<Type> {
    if target.is_object() && !ty.is_primitive() {
        return Some(Type::object());
    }
    let start = match ty {
        Type::Class(class) if !class.is_array() => hierarchy.generic_form(class),
        Type::Class(_) | Type::Parameterized(_) => ty.clone(),
        Type::GenericArray(_) => Type::Class(ty.erasure()),
        Type::Wildcard(_) | Type::Variable(_) => return None,
    };
    if &start.erasure() == target {
        return Some(start);
    }

    let mut queue = VecDeque::from([start]);
    let mut seen = FxHashSet::default();
    let mut steps = 0usize;

    while let Some(current) = queue.pop_front() {
        steps += 1;
        if steps > MAX_SUPERTYPE_WALK_STEPS {
            warn!(ty = %ty, target = %target, "supertype walk stopped: step limit reached");
            return None;
        }
        if !seen.insert(current.clone()) {
            continue;
        }

        let raw = current.erasure();
        let is_raw_use =
            matches!(current, Type::Class(_)) && !hierarchy.type_parameters(&raw).is_empty();
        let subst = substitution_for(hierarchy, &current);

        for edge in hierarchy.direct_supertypes(&raw) {
            let edge_raw = edge.erasure();
            if !hierarchy.is_subclass(&edge_raw, target) {
                continue;
            }
            let next = if is_raw_use {
                Type::Class(edge_raw.clone())
            } else {
                substitute(&subst, &edge)
            };
            trace!(from = %current, edge = %next, target = %target, "supertype walk step");
            if &edge_raw == target {
                return Some(next);
            }
            queue.push_back(next);
        }
    }
    None
}

/// The type-parameter bindings carried by one parameterized type, including
/// those of its owner (`Outer<String>.Inner<Integer>` binds both `T` and `U`).
pub(crate) fn substitution_for(hierarchy: &dyn ClassHierarchy, ty: &Type) -> Substitution {
    let mut subst = Substitution::default();
    let mut current = Some(ty);
    while let Some(Type::Parameterized(p)) = current {
        let params = hierarchy.type_parameters(p.raw_type());
        for (param, arg) in params.into_iter().zip(p.arguments()) {
            subst.entry(param).or_insert_with(|| arg.clone());
        }
        current = p.owner_type();
    }
    subst
}
