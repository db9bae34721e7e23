//! Recursion guard shared by the type visitors, the subtype checker and the
//! type-set collector.
//!
//! A [`RecursionGuard`] holds the keys currently being worked on. Entering a
//! key that is already held reports a cycle, which is how F-bounded
//! variables (`E extends Enum<E>`) stop recursing: a variable compares by
//! `(declaration, name)`, so its reappearance inside its own bound is the
//! same key. Depth and the total number of attempts are capped by a
//! [`RecursionProfile`].

use reify_common::limits;
use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Limit presets, one per recursive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Structural traversal by a [`crate::TypeVisitor`].
    TypeVisit,
    /// Subtype and containment checks, which re-enter through the bounds of
    /// variables and wildcards.
    Assignability,
    /// `TypeToken::get_types`.
    TypeCollection,
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::TypeVisit => limits::MAX_TYPE_VISIT_DEPTH,
            Self::Assignability => limits::MAX_SUBTYPE_DEPTH,
            Self::TypeCollection => limits::MAX_TYPE_COLLECTION_DEPTH,
        }
    }

    pub const fn max_iterations(self) -> u32 {
        limits::MAX_RECURSION_ITERATIONS
    }
}

/// Outcome of [`RecursionGuard::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    Entered,
    /// The key is already in progress.
    Cycle,
    DepthExceeded,
    IterationExceeded,
}

/// In-progress set with depth and attempt budgets.
///
/// Every [`Entered`](RecursionResult::Entered) must be paired with one
/// [`leave`](Self::leave) of the same key. Debug builds panic when a guard is
/// dropped with keys still held.
pub struct RecursionGuard<K: Hash + Eq> {
    visiting: FxHashSet<K>,
    attempts: u32,
    max_depth: u32,
    max_iterations: u32,
}

impl<K: Hash + Eq> RecursionGuard<K> {
    fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            attempts: 0,
            max_depth,
            max_iterations,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.attempts = self.attempts.saturating_add(1);
        if self.attempts > self.max_iterations {
            return RecursionResult::IterationExceeded;
        }
        if self.visiting.contains(&key) {
            return RecursionResult::Cycle;
        }
        if self.depth() >= self.max_depth {
            return RecursionResult::DepthExceeded;
        }
        self.visiting.insert(key);
        RecursionResult::Entered
    }

    pub fn leave(&mut self, key: &K) {
        let removed = self.visiting.remove(key);
        debug_assert!(removed, "RecursionGuard::leave without a matching enter");
    }

    /// Number of keys in progress.
    pub fn depth(&self) -> u32 {
        u32::try_from(self.visiting.len()).unwrap_or(u32::MAX)
    }

    pub fn is_active(&self) -> bool {
        !self.visiting.is_empty()
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} keys still in progress",
                self.visiting.len()
            );
        }
    }
}

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod tests;
