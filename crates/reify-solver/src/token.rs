//! Type Token
//!
//! [`TypeToken`] wraps one [`Type`] together with the [`ClassHierarchy`] it
//! lives in and the substitution context of its declaring scope. It is the
//! navigational surface of the engine:
//!
//! - [`get_supertype`](TypeToken::get_supertype) /
//!   [`get_subtype`](TypeToken::get_subtype) move along the class graph while
//!   keeping type arguments (`ArrayList<String>` <-> `List<String>`),
//! - [`is_assignable_from`](TypeToken::is_assignable_from) is the
//!   variance-aware assignability predicate,
//! - [`get_types`](TypeToken::get_types) is the transitive supertype closure,
//! - [`where_`](TypeToken::where_) substitutes a type variable.
//!
//! Tokens are immutable. The type closure and the covariant resolver are
//! computed at most once per token and shared by its clones.

use crate::assignability::is_assignable;
use crate::errors::{TypeError, TypeResult};
use crate::hierarchy::ClassHierarchy;
use crate::primitives;
use crate::resolver::TypeResolver;
use crate::supertype::instantiate_as_supertype;
use crate::type_factory::Types;
use crate::type_set::{self, TypeSet};
use crate::types::{Class, Type, TypeVariable};
use crate::visitor::raw_types;
use once_cell::sync::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Clone)]
pub struct TypeToken<'h> {
    hierarchy: &'h dyn ClassHierarchy,
    runtime_type: Type,
    resolver: TypeResolver,
    covariant: Arc<OnceCell<TypeResolver>>,
    types: Arc<OnceCell<TypeSet<'h>>>,
}

impl<'h> TypeToken<'h> {
    pub fn of(hierarchy: &'h dyn ClassHierarchy, ty: impl Into<Type>) -> Self {
        Self::with_resolver(hierarchy, ty.into(), TypeResolver::new())
    }

    pub fn of_class(hierarchy: &'h dyn ClassHierarchy, class: &Class) -> Self {
        Self::of(hierarchy, class)
    }

    fn with_resolver(
        hierarchy: &'h dyn ClassHierarchy,
        runtime_type: Type,
        resolver: TypeResolver,
    ) -> Self {
        Self {
            hierarchy,
            runtime_type,
            resolver,
            covariant: Arc::default(),
            types: Arc::default(),
        }
    }

    /// A token of the same hierarchy and context.
    fn derive(&self, ty: Type) -> Self {
        Self::with_resolver(self.hierarchy, ty, self.resolver.clone())
    }

    /// The type argument that `subclass` passes to the generic `capture_base`,
    /// the way an anonymous `new TypeCapture<List<String>>() {}` records
    /// `List<String>`.
    ///
    /// Fails with [`TypeError::InvalidTypeShape`] if `subclass` does not
    /// parameterize `capture_base`, or if the captured type is a bare type
    /// variable (use [`capture_in`](Self::capture_in) for those).
    pub fn capture(
        hierarchy: &'h dyn ClassHierarchy,
        subclass: &Class,
        capture_base: &Class,
    ) -> TypeResult<Self> {
        let captured = captured_argument(hierarchy, subclass, capture_base)?;
        if let Type::Variable(var) = &captured {
            return Err(TypeError::invalid_shape(format!(
                "cannot capture type variable {var} without its declaring context"
            )));
        }
        Ok(Self::of(hierarchy, captured))
    }

    /// Like [`capture`](Self::capture), but resolves the captured type in the
    /// generic context `declaring` (for a capture written inside
    /// `Holder<T>`, `declaring` is e.g. `Holder<String>`). The resulting
    /// token keeps that context as its resolver.
    pub fn capture_in(
        hierarchy: &'h dyn ClassHierarchy,
        subclass: &Class,
        capture_base: &Class,
        declaring: &Type,
    ) -> TypeResult<Self> {
        let captured = captured_argument(hierarchy, subclass, capture_base)?;
        let resolver = TypeResolver::covariantly(hierarchy, declaring);
        let runtime_type = resolver.resolve(&captured);
        if let Type::Variable(var) = &runtime_type {
            return Err(TypeError::invalid_shape(format!(
                "type variable {var} is not bound by {declaring}"
            )));
        }
        Ok(Self::with_resolver(hierarchy, runtime_type, resolver))
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn get_type(&self) -> &Type {
        &self.runtime_type
    }

    pub fn hierarchy(&self) -> &'h dyn ClassHierarchy {
        self.hierarchy
    }

    /// The substitution context of the declaring scope.
    pub fn resolver(&self) -> &TypeResolver {
        &self.resolver
    }

    /// The erasure: `List` for `List<String>`, the first bound's erasure for
    /// a variable or wildcard.
    pub fn raw_type(&self) -> Class {
        self.runtime_type.erasure()
    }

    pub fn is_array(&self) -> bool {
        self.runtime_type.is_array()
    }

    pub fn is_primitive(&self) -> bool {
        self.runtime_type.is_primitive()
    }

    pub fn component_type(&self) -> Option<Self> {
        self.runtime_type.component_type().map(|ty| self.derive(ty))
    }

    /// `int` -> `java.lang.Integer`; any other type is returned unchanged.
    pub fn wrap(&self) -> Self {
        match self.runtime_type.as_class().and_then(primitives::wrap) {
            Some(wrapper) => self.derive(Type::Class(wrapper)),
            None => self.clone(),
        }
    }

    /// `java.lang.Integer` -> `int`; any other type is returned unchanged.
    pub fn unwrap(&self) -> Self {
        match self.runtime_type.as_class().and_then(primitives::unwrap) {
            Some(primitive) => self.derive(Type::Class(primitive)),
            None => self.clone(),
        }
    }

    // -------------------------------------------------------------------------
    // Direct supertypes
    // -------------------------------------------------------------------------

    /// The resolved generic superclass: `AbstractList<String>` for
    /// `ArrayList<String>`.
    ///
    /// A variable or wildcard answers with its first upper bound, unless that
    /// bound is an interface. Interfaces, `Object` and primitives have none.
    pub fn generic_superclass(&self) -> Option<Self> {
        match &self.runtime_type {
            Type::Variable(var) => self.bound_as_superclass(var.effective_bounds().first()),
            Type::Wildcard(w) => self.bound_as_superclass(w.upper_bounds().first()),
            _ => {
                let superclass = self.hierarchy.generic_superclass(&self.raw_type())?;
                Some(self.resolve_supertype(&superclass))
            }
        }
    }

    /// The resolved generic interfaces, or the interface bounds of a variable
    /// or wildcard.
    pub fn generic_interfaces(&self) -> Vec<Self> {
        let bounds = match &self.runtime_type {
            Type::Variable(var) => var.effective_bounds(),
            Type::Wildcard(w) => w.upper_bounds().to_vec(),
            _ => {
                return self
                    .hierarchy
                    .generic_interfaces(&self.raw_type())
                    .iter()
                    .map(|interface| self.resolve_supertype(interface))
                    .collect();
            }
        };
        bounds
            .into_iter()
            .filter(|bound| bound.erasure().is_interface())
            .map(|bound| self.derive(bound))
            .collect()
    }

    fn bound_as_superclass(&self, bound: Option<&Type>) -> Option<Self> {
        let bound = bound?;
        if bound.erasure().is_interface() {
            return None;
        }
        Some(self.derive(bound.clone()))
    }

    fn resolve_supertype(&self, edge: &Type) -> Self {
        self.derive(self.covariant_resolver().resolve(edge))
    }

    fn covariant_resolver(&self) -> &TypeResolver {
        self.covariant
            .get_or_init(|| TypeResolver::covariantly(self.hierarchy, &self.runtime_type))
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// The instantiation of the raw ancestor `target` implied by this type:
    /// `List<String>` for `ArrayList<String>` and `List`.
    pub fn get_supertype(&self, target: &Class) -> TypeResult<Self> {
        if !self.some_raw_type_is_subclass_of(target) {
            debug!(ty = %self.runtime_type, target = %target, "not a supertype");
            return Err(self.not_a_supertype(target));
        }
        match &self.runtime_type {
            Type::Variable(var) => {
                return self.supertype_from_bounds(&var.effective_bounds(), target);
            }
            Type::Wildcard(w) => return self.supertype_from_bounds(w.upper_bounds(), target),
            _ => {}
        }
        if let Some(target_component) = target.component_type() {
            let component = self
                .component_type()
                .ok_or_else(|| self.not_a_supertype(target))?;
            let component_supertype = component.get_supertype(target_component)?;
            return Ok(self.derive(Types::array_of(component_supertype.runtime_type)));
        }
        match instantiate_as_supertype(self.hierarchy, &self.runtime_type, target) {
            Some(supertype) => {
                trace!(ty = %self.runtime_type, supertype = %supertype, "get_supertype");
                Ok(self.derive(supertype))
            }
            None => {
                debug!(ty = %self.runtime_type, target = %target, "supertype walk found no path");
                Err(self.not_a_supertype(target))
            }
        }
    }

    fn supertype_from_bounds(&self, bounds: &[Type], target: &Class) -> TypeResult<Self> {
        for bound in bounds {
            let token = self.derive(bound.clone());
            if token.some_raw_type_is_subclass_of(target) {
                return token.get_supertype(target);
            }
        }
        Err(self.not_a_supertype(target))
    }

    fn some_raw_type_is_subclass_of(&self, target: &Class) -> bool {
        raw_types(&self.runtime_type)
            .iter()
            .any(|raw| self.hierarchy.is_subclass(raw, target))
    }

    fn not_a_supertype(&self, target: &Class) -> TypeError {
        TypeError::NotASupertype {
            subject: self.runtime_type.clone(),
            target: target.clone(),
        }
    }

    /// The instantiation of the raw descendant `target` whose view as this
    /// type's raw type is this type: `ArrayList<String>` for `List<String>`
    /// and `ArrayList`.
    ///
    /// Fails with [`TypeError::NotASubtype`] if this type is a variable or a
    /// wildcard, if `target` does not descend from the raw type, or if no
    /// instantiation of `target` is a subtype of this type.
    pub fn get_subtype(&self, target: &Class) -> TypeResult<Self> {
        match &self.runtime_type {
            Type::Variable(_) | Type::Wildcard(_) => {
                debug!(
                    ty = %self.runtime_type,
                    target = %target,
                    "subtype of an indeterminate type"
                );
                return Err(TypeError::not_a_subtype(
                    &self.runtime_type,
                    target,
                    format!("the subtypes of {} are indeterminate", self.runtime_type.kind_name()),
                ));
            }
            _ => {}
        }
        if self.is_array() {
            let (Some(component), Some(target_component)) =
                (self.component_type(), target.component_type())
            else {
                return Err(TypeError::not_a_subtype(
                    &self.runtime_type,
                    target,
                    "an array type only has array subtypes",
                ));
            };
            let component_subtype = component.get_subtype(target_component)?;
            return Ok(self.derive(Types::array_of(component_subtype.runtime_type)));
        }
        if !self.hierarchy.is_subclass(target, &self.raw_type()) {
            debug!(ty = %self.runtime_type, target = %target, "not a subclass");
            return Err(TypeError::not_a_subtype(
                &self.runtime_type,
                target,
                format!("{target} is not a subclass of {}", self.raw_type()),
            ));
        }
        let subtype = self.resolve_type_args_for_subclass(target)?;
        if !is_assignable(self.hierarchy, &self.runtime_type, &subtype) {
            debug!(
                ty = %self.runtime_type,
                subtype = %subtype,
                "inferred subtype is not assignable"
            );
            return Err(TypeError::not_a_subtype(
                &self.runtime_type,
                target,
                format!("{subtype} does not appear to be a subtype"),
            ));
        }
        trace!(ty = %self.runtime_type, subtype = %subtype, "get_subtype");
        Ok(self.derive(subtype))
    }

    fn resolve_type_args_for_subclass(&self, target: &Class) -> TypeResult<Type> {
        let raw = self.raw_type();
        if matches!(self.runtime_type, Type::Class(_))
            && (self.hierarchy.type_parameters(target).is_empty()
                || !self.hierarchy.type_parameters(&raw).is_empty())
        {
            return Ok(Type::Class(target.clone()));
        }
        let generic_subtype = self.hierarchy.generic_form(target);
        let shape = instantiate_as_supertype(self.hierarchy, &generic_subtype, &raw)
            .ok_or_else(|| {
                TypeError::not_a_subtype(
                    &self.runtime_type,
                    target,
                    "no supertype path to the raw type",
                )
            })?;
        let resolver = TypeResolver::new()
            .unify(&shape, &self.runtime_type)
            .map_err(|err| TypeError::not_a_subtype(&self.runtime_type, target, err.to_string()))?;
        Ok(resolver.resolve(&generic_subtype))
    }

    // -------------------------------------------------------------------------
    // Assignability
    // -------------------------------------------------------------------------

    /// Whether a value of type `other` may be assigned to this type.
    pub fn is_assignable_from(&self, other: &Type) -> bool {
        is_assignable(self.hierarchy, &self.runtime_type, other)
    }

    /// Alias of [`is_assignable_from`](Self::is_assignable_from).
    pub fn is_supertype_of(&self, other: &Type) -> bool {
        self.is_assignable_from(other)
    }

    pub fn is_subtype_of(&self, supertype: &Type) -> bool {
        is_assignable(self.hierarchy, supertype, &self.runtime_type)
    }

    // -------------------------------------------------------------------------
    // Closure and substitution
    // -------------------------------------------------------------------------

    /// Every supertype of this type, each resolved to its instantiation,
    /// ordered subtype before supertype. Computed once per token.
    pub fn get_types(&self) -> &TypeSet<'h> {
        self.types.get_or_init(|| type_set::collect(self))
    }

    /// Resolve `ty` in this token's context: the variables of every
    /// supertype are replaced by the arguments this type implies, then the
    /// declaring scope's bindings apply.
    ///
    /// For `ArrayList<String>`, resolving `List.E` gives `String`.
    pub fn resolve_type(&self, ty: &Type) -> Self {
        let resolver = self.covariant_resolver().absorb(&self.resolver);
        Self::with_resolver(self.hierarchy, resolver.resolve(ty), self.resolver.clone())
    }

    /// This type with `param` replaced by `value`.
    ///
    /// Fails with [`TypeError::CyclicBinding`] if `value` mentions `param`,
    /// and with [`TypeError::ConflictingBinding`] if the context already
    /// binds `param` to something else.
    pub fn where_(&self, param: &TypeVariable, value: &Type) -> TypeResult<Self> {
        if matches!(value, Type::Variable(var) if var == param) {
            return Ok(self.clone());
        }
        if value.contains_variable(param) {
            debug!(variable = ?param, value = %value, "cyclic type variable binding");
            return Err(TypeError::CyclicBinding {
                variable: param.clone(),
                value: value.clone(),
            });
        }
        let resolver = self.resolver.bind(param, value)?;
        let runtime_type = resolver.resolve(&self.runtime_type);
        trace!(variable = ?param, value = %value, ty = %runtime_type, "where");
        Ok(Self::with_resolver(self.hierarchy, runtime_type, resolver))
    }
}

fn captured_argument(
    hierarchy: &dyn ClassHierarchy,
    subclass: &Class,
    capture_base: &Class,
) -> TypeResult<Type> {
    let supertype =
        instantiate_as_supertype(hierarchy, &Type::Class(subclass.clone()), capture_base);
    match supertype {
        Some(Type::Parameterized(p)) if !p.arguments().is_empty() => Ok(p.arguments()[0].clone()),
        _ => Err(TypeError::invalid_shape(format!(
            "{subclass} does not parameterize {capture_base}"
        ))),
    }
}

impl PartialEq for TypeToken<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.runtime_type == other.runtime_type
    }
}

impl Eq for TypeToken<'_> {}

impl Hash for TypeToken<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.runtime_type.hash(state);
    }
}

impl fmt::Display for TypeToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.runtime_type)
    }
}

impl fmt::Debug for TypeToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeToken({})", self.runtime_type)
    }
}

#[cfg(test)]
#[path = "../tests/token_tests.rs"]
mod tests;
