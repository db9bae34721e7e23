//! Transitive supertype closure of a [`TypeToken`].
//!
//! The closure holds the token itself and, for every raw ancestor, the
//! token's [`get_supertype`](TypeToken::get_supertype) view of it. Variables
//! and wildcards contribute their bounds first. Every element is assigned a
//! level: one more than the highest level among its direct
//! supertypes, where `Object` sits at 1 and an interface at least at 2 so
//! that interfaces rank before `Object`. Sorting by level, highest first,
//! yields every type before any of its supertypes; ties keep discovery
//! order.

use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::token::TypeToken;
use crate::types::{Class, Type};
use indexmap::{IndexMap, IndexSet};
use reify_common::limits::TYPE_SET_CAPACITY_HINT;
use tracing::{debug, trace, warn};

/// Supertypes of one token, subtype first. The token itself comes first.
#[derive(Clone, Debug, Default)]
pub struct TypeSet<'h> {
    types: Vec<TypeToken<'h>>,
}

impl<'h> TypeSet<'h> {
    pub fn types(&self) -> &[TypeToken<'h>] {
        &self.types
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TypeToken<'h>> {
        self.types.iter()
    }

    /// The class line: every non-interface type, `Object` included.
    pub fn classes(&self) -> Vec<TypeToken<'h>> {
        self.types
            .iter()
            .filter(|token| !token.raw_type().is_interface())
            .cloned()
            .collect()
    }

    pub fn interfaces(&self) -> Vec<TypeToken<'h>> {
        self.types
            .iter()
            .filter(|token| token.raw_type().is_interface())
            .cloned()
            .collect()
    }

    /// The distinct erasures, in closure order.
    pub fn raw_types(&self) -> Vec<Class> {
        let raw: IndexSet<Class> = self.types.iter().map(TypeToken::raw_type).collect();
        raw.into_iter().collect()
    }

    pub fn contains(&self, ty: &Type) -> bool {
        self.types.iter().any(|token| token.get_type() == ty)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<'a, 'h> IntoIterator for &'a TypeSet<'h> {
    type Item = &'a TypeToken<'h>;
    type IntoIter = std::slice::Iter<'a, TypeToken<'h>>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}

struct TypeCollector<'h> {
    guard: RecursionGuard<Type>,
    levels: IndexMap<Type, (TypeToken<'h>, u32)>,
}

impl<'h> TypeCollector<'h> {
    fn collect(&mut self, token: &TypeToken<'h>) -> u32 {
        match token.get_type() {
            Type::Variable(_) | Type::Wildcard(_) => self.visit(token, |this| {
                let mut above = u32::from(token.raw_type().is_interface());
                for interface in token.generic_interfaces() {
                    above = above.max(this.collect(&interface));
                }
                if let Some(superclass) = token.generic_superclass() {
                    above = above.max(this.collect(&superclass));
                }
                above
            }),
            _ => self.collect_ancestor(token, &token.raw_type()),
        }
    }

    /// Collect `origin` viewed as its raw ancestor `raw`, then the ancestors
    /// of `raw`. Every element is what `get_supertype` answers for its raw
    /// type, so a raw use of a generic class stays raw above it.
    fn collect_ancestor(&mut self, origin: &TypeToken<'h>, raw: &Class) -> u32 {
        let element = if &origin.raw_type() == raw {
            origin.clone()
        } else {
            match origin.get_supertype(raw) {
                Ok(supertype) => supertype,
                Err(err) => {
                    debug!(ty = %origin.get_type(), ancestor = %raw, %err, "ancestor skipped");
                    return 0;
                }
            }
        };
        let hierarchy = origin.hierarchy();
        self.visit(&element, |this| {
            let mut above = u32::from(raw.is_interface());
            for interface in hierarchy.generic_interfaces(raw) {
                above = above.max(this.collect_ancestor(origin, &interface.erasure()));
            }
            if let Some(superclass) = hierarchy.generic_superclass(raw) {
                above = above.max(this.collect_ancestor(origin, &superclass.erasure()));
            }
            above
        })
    }

    /// Record `element` one level above the highest of its supertypes, which
    /// `supertypes` collects.
    fn visit(
        &mut self,
        element: &TypeToken<'h>,
        supertypes: impl FnOnce(&mut Self) -> u32,
    ) -> u32 {
        let key = element.get_type().clone();
        if let Some((_, level)) = self.levels.get(&key) {
            return *level;
        }
        match self.guard.enter(key.clone()) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => return 0,
            denied => {
                warn!(ty = %key, ?denied, "type collection stopped: recursion limit reached");
                return 0;
            }
        }

        let level = supertypes(self) + 1;
        self.guard.leave(&key);
        trace!(ty = %key, level, "collected supertype");
        self.levels.insert(key, (element.clone(), level));
        level
    }
}

pub(crate) fn collect<'h>(token: &TypeToken<'h>) -> TypeSet<'h> {
    let mut collector = TypeCollector {
        guard: RecursionGuard::with_profile(RecursionProfile::TypeCollection),
        levels: IndexMap::with_capacity(TYPE_SET_CAPACITY_HINT),
    };
    collector.collect(token);

    let mut entries: Vec<(TypeToken<'h>, u32)> = collector.levels.into_values().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    TypeSet {
        types: entries.into_iter().map(|(token, _)| token).collect(),
    }
}

#[cfg(test)]
#[path = "../tests/type_set_tests.rs"]
mod tests;
