//! Type Resolver
//!
//! An immutable substitution map from type variables to types.
//!
//! - [`TypeResolver::bind`] adds one mapping, rejecting a conflicting rebind.
//! - [`TypeResolver::resolve`] rewrites a type by replacing mapped variables.
//! - [`TypeResolver::unify`] discovers mappings by matching a generic shape
//!   (`List<E>`) against an instantiation of it (`List<String>`).
//! - [`TypeResolver::covariantly`] collects the mappings implied by every
//!   ancestor of a type (`ArrayList<String>` maps `ArrayList.E`,
//!   `AbstractList.E`, `List.E`, ... to `String`).
//!
//! Resolvers share their map behind an `Arc`; every operation that adds
//! mappings returns a new resolver and leaves the receiver untouched.

use crate::errors::{TypeError, TypeResult};
use crate::hierarchy::ClassHierarchy;
use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::type_factory::Types;
use crate::types::{Class, ParameterizedType, Type, TypeVariable, WildcardType};
use crate::visitor::TypeVisitor;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, trace};

pub(crate) type Substitution = FxHashMap<TypeVariable, Type>;

#[derive(Clone, Default)]
pub struct TypeResolver {
    mappings: Arc<Substitution>,
}

impl TypeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_map(mappings: Substitution) -> Self {
        Self {
            mappings: Arc::new(mappings),
        }
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn get(&self, var: &TypeVariable) -> Option<&Type> {
        self.mappings.get(var)
    }

    pub fn mappings(&self) -> impl Iterator<Item = (&TypeVariable, &Type)> {
        self.mappings.iter()
    }

    /// A resolver with `formal -> actual` added.
    ///
    /// Binding a variable to itself, or to the type it is already bound to,
    /// is a no-op. Binding it to anything else fails with
    /// [`TypeError::ConflictingBinding`].
    pub fn bind(&self, formal: &TypeVariable, actual: &Type) -> TypeResult<Self> {
        let mut mappings = (*self.mappings).clone();
        insert(&mut mappings, formal, actual)?;
        Ok(Self::from_map(mappings))
    }

    pub fn bind_all(
        &self,
        pairs: impl IntoIterator<Item = (TypeVariable, Type)>,
    ) -> TypeResult<Self> {
        let mut mappings = (*self.mappings).clone();
        for (formal, actual) in pairs {
            insert(&mut mappings, &formal, &actual)?;
        }
        Ok(Self::from_map(mappings))
    }

    /// Merge `other` into this resolver. Where both map a variable, this
    /// resolver's mapping is kept.
    pub fn absorb(&self, other: &TypeResolver) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        let mut mappings = (*self.mappings).clone();
        for (var, ty) in other.mappings() {
            mappings.entry(var.clone()).or_insert_with(|| ty.clone());
        }
        Self::from_map(mappings)
    }

    /// Replace every mapped variable in `ty`.
    ///
    /// The replacement of a variable is not resolved again, so a resolver
    /// whose values mention mapped variables cannot loop.
    pub fn resolve(&self, ty: &Type) -> Type {
        if self.is_empty() {
            return ty.clone();
        }
        substitute(&self.mappings, ty)
    }

    /// Infer the mappings that turn `shape` into `instance` and add them to
    /// this resolver.
    ///
    /// Fails with [`TypeError::ShapeMismatch`] when `instance` is not an
    /// instantiation of `shape`, and with [`TypeError::ConflictingBinding`]
    /// when one variable would need two different values.
    pub fn unify(&self, shape: &Type, instance: &Type) -> TypeResult<Self> {
        let mut mappings = (*self.mappings).clone();
        unify_into(&mut mappings, shape, instance)?;
        Ok(Self::from_map(mappings))
    }

    /// The mappings implied by `ty` and all of its supertypes.
    ///
    /// For `ArrayList<String>` this maps the type parameter of `ArrayList`,
    /// `AbstractList`, `List`, `Collection` and `Iterable` to `String`.
    /// Mappings are recorded already resolved, so lookups never chain.
    pub fn covariantly(hierarchy: &dyn ClassHierarchy, ty: &Type) -> Self {
        let mut collector = TypeMappingCollector {
            hierarchy,
            guard: RecursionGuard::with_profile(RecursionProfile::TypeVisit),
            mappings: Substitution::default(),
        };
        collector.visit(ty);
        trace!(ty = %ty, mappings = collector.mappings.len(), "TypeResolver::covariantly");
        Self::from_map(collector.mappings)
    }
}

impl std::fmt::Debug for TypeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (var, ty) in self.mappings() {
            map.entry(var, ty);
        }
        map.finish()
    }
}

fn insert(mappings: &mut Substitution, formal: &TypeVariable, actual: &Type) -> TypeResult<()> {
    if matches!(actual, Type::Variable(var) if var == formal) {
        return Ok(());
    }
    match mappings.get(formal) {
        Some(existing) if existing == actual => Ok(()),
        Some(existing) => {
            debug!(
                variable = ?formal,
                existing = %existing,
                requested = %actual,
                "conflicting type variable binding"
            );
            Err(TypeError::ConflictingBinding {
                variable: formal.clone(),
                existing: existing.clone(),
                requested: actual.clone(),
            })
        }
        None => {
            trace!(variable = ?formal, actual = %actual, "bind");
            mappings.insert(formal.clone(), actual.clone());
            Ok(())
        }
    }
}

/// Apply `mappings` to `ty`.
pub(crate) fn substitute(mappings: &Substitution, ty: &Type) -> Type {
    match ty {
        Type::Class(_) => ty.clone(),
        Type::Variable(var) => mappings.get(var).cloned().unwrap_or_else(|| ty.clone()),
        Type::Parameterized(p) => {
            let owner = p.owner_type().map(|owner| substitute(mappings, owner));
            let args = p
                .arguments()
                .iter()
                .map(|arg| substitute(mappings, arg))
                .collect();
            ParameterizedType::new_unchecked(owner, p.raw_type().clone(), args).into()
        }
        Type::GenericArray(component) => Types::array_of(substitute(mappings, component)),
        Type::Wildcard(w) => {
            let resolve = |bounds: &[Type]| -> Vec<Type> {
                bounds.iter().map(|b| substitute(mappings, b)).collect()
            };
            let upper = resolve(w.upper_bounds());
            let lower = resolve(w.lower_bounds());
            WildcardType::new(upper, lower).into()
        }
    }
}

fn unify_into(mappings: &mut Substitution, shape: &Type, instance: &Type) -> TypeResult<()> {
    if shape == instance {
        return Ok(());
    }
    trace!(shape = %shape, instance = %instance, "unify");
    match shape {
        Type::Variable(var) => insert(mappings, var, instance),
        // `<?>` matches anything; only a wildcard instance contributes.
        Type::Wildcard(from) => {
            let Type::Wildcard(to) = instance else {
                return Ok(());
            };
            if from.upper_bounds().len() != to.upper_bounds().len()
                || from.lower_bounds().len() != to.lower_bounds().len()
            {
                return Err(TypeError::shape_mismatch(shape, instance));
            }
            for (a, b) in from.upper_bounds().iter().zip(to.upper_bounds()) {
                unify_into(mappings, a, b)?;
            }
            for (a, b) in from.lower_bounds().iter().zip(to.lower_bounds()) {
                unify_into(mappings, a, b)?;
            }
            Ok(())
        }
        Type::Parameterized(from) => match instance {
            Type::Wildcard(_) => Ok(()),
            Type::Parameterized(to) => {
                if from.raw_type() != to.raw_type()
                    || from.arguments().len() != to.arguments().len()
                {
                    return Err(TypeError::shape_mismatch(shape, instance));
                }
                for (a, b) in from.arguments().iter().zip(to.arguments()) {
                    unify_into(mappings, a, b)?;
                }
                if let (Some(a), Some(b)) = (from.owner_type(), to.owner_type()) {
                    unify_into(mappings, a, b)?;
                }
                Ok(())
            }
            _ => Err(TypeError::shape_mismatch(shape, instance)),
        },
        Type::GenericArray(component) => match instance {
            Type::Wildcard(_) => Ok(()),
            _ => match instance.component_type() {
                Some(instance_component) => unify_into(mappings, component, &instance_component),
                None => Err(TypeError::shape_mismatch(shape, instance)),
            },
        },
        Type::Class(_) => match instance {
            Type::Wildcard(_) => Ok(()),
            _ => Err(TypeError::shape_mismatch(shape, instance)),
        },
    }
}

// =============================================================================
// Covariant mapping collection
// =============================================================================

struct TypeMappingCollector<'h> {
    hierarchy: &'h dyn ClassHierarchy,
    guard: RecursionGuard<Type>,
    mappings: Substitution,
}

impl TypeMappingCollector<'_> {
    /// First mapping wins.
    fn record(&mut self, var: TypeVariable, arg: Type) {
        if matches!(&arg, Type::Variable(v) if *v == var) {
            return;
        }
        match self.mappings.get(&var) {
            Some(existing) if *existing != arg => {
                debug!(
                    variable = ?var,
                    existing = %existing,
                    ignored = %arg,
                    "ambiguous covariant mapping"
                );
            }
            Some(_) => {}
            None => {
                self.mappings.insert(var, arg);
            }
        }
    }

    fn visit_edges(&mut self, class: &Class) {
        for edge in self.hierarchy.direct_supertypes(class) {
            let resolved = substitute(&self.mappings, &edge);
            self.visit(&resolved);
        }
    }
}

impl TypeVisitor for TypeMappingCollector<'_> {
    fn guard(&mut self) -> &mut RecursionGuard<Type> {
        &mut self.guard
    }

    fn visit_class(&mut self, class: &Class) {
        self.visit_edges(class);
    }

    fn visit_parameterized(&mut self, ty: &ParameterizedType) {
        let params = self.hierarchy.type_parameters(ty.raw_type());
        for (param, arg) in params.into_iter().zip(ty.arguments()) {
            self.record(param, arg.clone());
        }
        self.visit_edges(ty.raw_type());
        if let Some(owner) = ty.owner_type() {
            self.visit(owner);
        }
    }

    fn visit_generic_array(&mut self, _component: &Type) {}

    fn visit_wildcard(&mut self, ty: &WildcardType) {
        self.visit_all(ty.upper_bounds());
    }

    fn visit_variable(&mut self, var: &TypeVariable) {
        let bounds = var.effective_bounds();
        self.visit_all(&bounds);
    }
}

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod tests;
