//! Error taxonomy for the type engine.
//!
//! Every failure is local and recoverable. Only the navigational entry
//! points (`get_supertype`, `get_subtype`, `where_`, factory constructors)
//! surface these to callers; yes/no queries such as `is_assignable_from`
//! fold them into `false`.

use crate::types::{Class, Type, TypeVariable};
use thiserror::Error;

pub type TypeResult<T> = Result<T, TypeError>;

/// Payload-free discriminant of [`TypeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeErrorKind {
    InvalidTypeShape,
    ConflictingBinding,
    CyclicBinding,
    NotASupertype,
    NotASubtype,
    ShapeMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Malformed construction request: wrong arity, primitive where a
    /// reference type is required, inconsistent owner type.
    #[error("invalid type shape: {reason}")]
    InvalidTypeShape { reason: String },

    #[error(
        "type variable {variable} is already bound to {existing}; cannot rebind it to {requested}"
    )]
    ConflictingBinding {
        variable: TypeVariable,
        existing: Type,
        requested: Type,
    },

    #[error("type variable {variable} cannot be bound to {value}, which contains it")]
    CyclicBinding { variable: TypeVariable, value: Type },

    #[error("{target} is not a supertype of {subject}")]
    NotASupertype { subject: Type, target: Class },

    #[error("{target} is not a subtype of {subject}: {reason}")]
    NotASubtype {
        subject: Type,
        target: Class,
        reason: String,
    },

    /// Internal unification failure. Callers convert it to `false` or to
    /// `NotASubtype` before it reaches the public surface.
    #[error("no type mapping from {shape} to {instance}")]
    ShapeMismatch { shape: Type, instance: Type },
}

impl TypeError {
    pub fn kind(&self) -> TypeErrorKind {
        match self {
            TypeError::InvalidTypeShape { .. } => TypeErrorKind::InvalidTypeShape,
            TypeError::ConflictingBinding { .. } => TypeErrorKind::ConflictingBinding,
            TypeError::CyclicBinding { .. } => TypeErrorKind::CyclicBinding,
            TypeError::NotASupertype { .. } => TypeErrorKind::NotASupertype,
            TypeError::NotASubtype { .. } => TypeErrorKind::NotASubtype,
            TypeError::ShapeMismatch { .. } => TypeErrorKind::ShapeMismatch,
        }
    }

    pub(crate) fn invalid_shape(reason: impl Into<String>) -> Self {
        TypeError::InvalidTypeShape {
            reason: reason.into(),
        }
    }

    pub(crate) fn shape_mismatch(shape: &Type, instance: &Type) -> Self {
        TypeError::ShapeMismatch {
            shape: shape.clone(),
            instance: instance.clone(),
        }
    }

    pub(crate) fn not_a_subtype(subject: &Type, target: &Class, reason: impl Into<String>) -> Self {
        TypeError::NotASubtype {
            subject: subject.clone(),
            target: target.clone(),
            reason: reason.into(),
        }
    }
}
