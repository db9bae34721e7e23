//! Types Factory
//!
//! Constructors for synthetic types. Everything built here is structurally
//! equal to (and hashes like) the same type handed out by a
//! [`ClassHierarchy`], so the two can be mixed in maps and comparisons.

use crate::errors::{TypeError, TypeResult};
use crate::hierarchy::ClassHierarchy;
use crate::types::{
    Bounds, Class, Declaration, ParameterizedType, Type, TypeVariable, WildcardType,
};
use std::sync::Arc;
use tracing::trace;

/// Factory for parameterized types, arrays, wildcards and artificial type
/// variables.
///
/// Only parameterized types need the hierarchy (for arity and owner checks);
/// the remaining constructors are associated functions.
#[derive(Clone, Copy)]
pub struct Types<'h> {
    hierarchy: &'h dyn ClassHierarchy,
}

impl<'h> Types<'h> {
    pub fn new(hierarchy: &'h dyn ClassHierarchy) -> Self {
        Self { hierarchy }
    }

    /// `raw<args...>`, owned by the enclosing class of `raw` if there is one.
    ///
    /// An inner class of a generic class has no unambiguous owner; use
    /// [`new_parameterized_with_owner`](Self::new_parameterized_with_owner).
    pub fn new_parameterized(&self, raw: &Class, args: Vec<Type>) -> TypeResult<Type> {
        let owner = match self.hierarchy.enclosing_class(raw) {
            None => None,
            Some(outer) => {
                if !self.hierarchy.is_static(raw)
                    && matches!(self.hierarchy.generic_form(&outer), Type::Parameterized(_))
                {
                    return Err(TypeError::invalid_shape(format!(
                        "inner class {raw} of generic class {outer} needs an explicit owner type"
                    )));
                }
                Some(Type::Class(outer))
            }
        };
        self.build(owner, raw, args)
    }

    /// `owner.raw<args...>`.
    pub fn new_parameterized_with_owner(
        &self,
        owner: Type,
        raw: &Class,
        args: Vec<Type>,
    ) -> TypeResult<Type> {
        let Some(enclosing) = self.hierarchy.enclosing_class(raw) else {
            return Err(TypeError::invalid_shape(format!(
                "{raw} is not a nested class and cannot have owner type {owner}"
            )));
        };
        if !matches!(owner, Type::Class(_) | Type::Parameterized(_)) {
            return Err(TypeError::invalid_shape(format!(
                "owner type {owner} of {raw} must be a class or parameterized type"
            )));
        }
        if owner.erasure() != enclosing {
            return Err(TypeError::invalid_shape(format!(
                "owner type {owner} of {raw} must be an instantiation of {enclosing}"
            )));
        }
        self.build(Some(owner), raw, args)
    }

    fn build(&self, owner: Option<Type>, raw: &Class, args: Vec<Type>) -> TypeResult<Type> {
        if raw.is_primitive() || raw.is_array() {
            return Err(TypeError::invalid_shape(format!(
                "{raw} cannot be parameterized"
            )));
        }
        let params = self.hierarchy.type_parameters(raw);
        if params.len() != args.len() {
            return Err(TypeError::invalid_shape(format!(
                "{raw} declares {} type parameter(s) but {} argument(s) were given",
                params.len(),
                args.len()
            )));
        }
        if let Some(primitive) = args.iter().find(|arg| arg.is_primitive()) {
            return Err(TypeError::invalid_shape(format!(
                "primitive type {primitive} cannot be a type argument of {raw}"
            )));
        }
        if args.is_empty() && !matches!(owner, Some(Type::Parameterized(_))) {
            return Ok(Type::Class(raw.clone()));
        }
        let ty: Type = ParameterizedType::new_unchecked(owner, raw.clone(), args).into();
        trace!(ty = %ty, "Types::new_parameterized");
        Ok(ty)
    }

    /// The array type whose component is `component`.
    ///
    /// A class component gives an array class (`String` -> `String[]`); a
    /// wildcard component gives a wildcard over arrays (`? extends Number`
    /// -> `? extends Number[]`); anything else gives a generic array.
    pub fn array_of(component: Type) -> Type {
        match component {
            Type::Class(class) => Type::Class(Class::array_of(&class)),
            Type::Wildcard(w) => {
                let arrays = |bounds: &[Type]| -> Vec<Type> {
                    bounds.iter().cloned().map(Types::array_of).collect()
                };
                WildcardType::new(arrays(w.upper_bounds()), arrays(w.lower_bounds())).into()
            }
            other => Type::GenericArray(Arc::new(other)),
        }
    }

    /// `? extends bound`.
    pub fn subtype_of(bound: Type) -> TypeResult<Type> {
        check_bound(&bound)?;
        Ok(WildcardType::new([bound], Bounds::new()).into())
    }

    /// `? super bound`.
    pub fn supertype_of(bound: Type) -> TypeResult<Type> {
        check_bound(&bound)?;
        Ok(WildcardType::new(Bounds::new(), [bound]).into())
    }

    /// `?`.
    pub fn unbounded() -> Type {
        WildcardType::new(Bounds::new(), Bounds::new()).into()
    }

    /// A type variable that no class declares, e.g. to stand for "some
    /// subtype of `T`".
    pub fn new_artificial_type_variable(
        declaration: Declaration,
        name: &str,
        bounds: Vec<Type>,
    ) -> TypeResult<TypeVariable> {
        for bound in &bounds {
            check_bound(bound)?;
        }
        Ok(TypeVariable::new(declaration, name, bounds))
    }
}

fn check_bound(bound: &Type) -> TypeResult<()> {
    if bound.is_primitive() {
        return Err(TypeError::invalid_shape(format!(
            "primitive type {bound} cannot be used as a bound"
        )));
    }
    if matches!(bound, Type::Wildcard(_)) {
        return Err(TypeError::invalid_shape(format!(
            "wildcard {bound} cannot be used as a bound"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/type_factory_tests.rs"]
mod tests;
