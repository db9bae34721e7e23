//! Centralized limits and thresholds for the type engine.
//!
//! Every recursive algorithm in the solver walks a type graph that may be
//! self-referential (F-bounded type variables such as `E extends Enum<E>`).
//! Cycle detection alone keeps those walks finite; the limits below bound
//! the remaining cost so a malformed hierarchy supplied by a reflection
//! provider degrades into "no relation" instead of a stack overflow.
//!
//! # Solver recursion limits
//!
//! Call sites never use these constants directly. They construct a
//! `RecursionGuard` from a named `RecursionProfile` in
//! `reify_solver::recursion`, and the profiles map onto the values here.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth for a single structural type visit.
///
/// A type nested deeper than this (e.g. `List<List<List<...>>>` a hundred
/// levels deep) stops being descended; the visitor treats the remainder as
/// already handled.
pub const MAX_TYPE_VISIT_DEPTH: u32 = 100;

/// Maximum nesting depth for subtype / containment checks.
///
/// Checking `Comparable<? super T>` against a `T extends Comparable<T>`
/// re-enters the checker through the variable's bounds; each re-entry costs
/// one level.
pub const MAX_SUBTYPE_DEPTH: u32 = 100;

/// Maximum depth when collecting the transitive supertype closure of a type.
///
/// Real class hierarchies rarely exceed a dozen levels.
pub const MAX_TYPE_COLLECTION_DEPTH: u32 = 64;

/// Maximum number of variable-to-bound hops taken while erasing a type.
///
/// `U extends T`, `T extends S`, ... chains are followed at most this far
/// before the erasure falls back to `java.lang.Object`.
pub const MAX_ERASURE_DEPTH: u32 = 64;

// =============================================================================
// Operation Counts
// =============================================================================

/// Total work budget shared by every recursion guard profile.
pub const MAX_RECURSION_ITERATIONS: u32 = 100_000;

/// Maximum number of types dequeued while searching the supertype graph
/// for one target class.
pub const MAX_SUPERTYPE_WALK_STEPS: usize = 10_000;

// =============================================================================
// Capacity Hints
// =============================================================================

/// Expected number of ancestors in a type closure; used to pre-size maps.
pub const TYPE_SET_CAPACITY_HINT: usize = 16;
