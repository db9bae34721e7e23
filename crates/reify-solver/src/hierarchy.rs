//! Class Hierarchy
//!
//! The boundary with the reflection provider. The engine never discovers
//! class metadata on its own: it asks a [`ClassHierarchy`] for the generic
//! superclass, generic interfaces, type parameters and enclosing class of a
//! raw type, and derives everything else from those answers.
//!
//! [`ClassRegistry`] is an in-memory provider that can be populated from
//! several threads at once. It is pre-seeded with `java.lang.Object`, the
//! array marker interfaces and the primitive classes, and answers for every
//! array class without registration.

use crate::primitives;
use crate::types::{
    CLONEABLE, Class, ClassKind, ParameterizedType, SERIALIZABLE, Type, TypeVariable,
};
use dashmap::DashMap;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::trace;

/// Generic metadata of raw types, supplied by the host.
///
/// Implementations must be consistent: a type parameter reported by
/// [`type_parameters`](Self::type_parameters) is the same variable (by
/// declaration and name) that appears inside the class's generic edges.
pub trait ClassHierarchy: Send + Sync {
    /// The generic superclass edge (`AbstractList<E>` for `ArrayList`).
    /// `None` for `java.lang.Object`, interfaces and primitives.
    fn generic_superclass(&self, class: &Class) -> Option<Type>;

    /// The generic interface edges, in declaration order. For an interface
    /// these are its superinterfaces.
    fn generic_interfaces(&self, class: &Class) -> Vec<Type>;

    /// Declared type parameters, in declaration order.
    fn type_parameters(&self, class: &Class) -> Vec<TypeVariable>;

    /// The class `class` is nested in, if any.
    fn enclosing_class(&self, class: &Class) -> Option<Class>;

    /// Whether `class` is a static nested class. Instances of a static
    /// nested class carry no instantiation of their enclosing class.
    fn is_static(&self, class: &Class) -> bool;

    /// Superclass edge followed by the interface edges.
    fn direct_supertypes(&self, class: &Class) -> Vec<Type> {
        let mut edges: Vec<Type> = self.generic_superclass(class).into_iter().collect();
        edges.extend(self.generic_interfaces(class));
        edges
    }

    /// Raw ancestry: whether `sub` is `sup` or inherits from it.
    ///
    /// Arrays of reference types are covariant in their component; arrays of
    /// primitives are only related to themselves. Every array is a subclass
    /// of `Object`, `Cloneable` and `Serializable`.
    fn is_subclass(&self, sub: &Class, sup: &Class) -> bool {
        if sub == sup {
            return true;
        }
        if sub.is_primitive() || sup.is_primitive() {
            return false;
        }
        if sup.is_object() {
            return true;
        }
        match (sub.kind(), sup.kind()) {
            (ClassKind::Array(sub_component), ClassKind::Array(sup_component)) => {
                !sub_component.is_primitive()
                    && !sup_component.is_primitive()
                    && self.is_subclass(sub_component, sup_component)
            }
            (ClassKind::Array(_), _) => matches!(sup.name(), CLONEABLE | SERIALIZABLE),
            (_, ClassKind::Array(_)) => false,
            _ => {
                let mut seen = FxHashSet::default();
                let mut queue = VecDeque::from([sub.clone()]);
                while let Some(current) = queue.pop_front() {
                    if !seen.insert(current.clone()) {
                        continue;
                    }
                    for edge in self.direct_supertypes(&current) {
                        let raw = edge.erasure();
                        if &raw == sup {
                            return true;
                        }
                        queue.push_back(raw);
                    }
                }
                false
            }
        }
    }

    /// The class as seen from inside its own declaration: `List<E>` for
    /// `List`, `Outer<T>.Inner` for an inner class of a generic class, the
    /// class itself when nothing is generic.
    fn generic_form(&self, class: &Class) -> Type {
        if let Some(component) = class.component_type() {
            return match self.generic_form(component) {
                Type::Class(_) => Type::Class(class.clone()),
                generic => Type::GenericArray(Arc::new(generic)),
            };
        }
        let owner = self.enclosing_class(class).map(|outer| {
            if self.is_static(class) {
                Type::Class(outer)
            } else {
                self.generic_form(&outer)
            }
        });
        let args: Vec<Type> = self
            .type_parameters(class)
            .into_iter()
            .map(Type::Variable)
            .collect();
        let owner_is_generic = matches!(owner, Some(Type::Parameterized(_)));
        if args.is_empty() && !owner_is_generic {
            return Type::Class(class.clone());
        }
        ParameterizedType::new_unchecked(owner, class.clone(), args).into()
    }
}

// =============================================================================
// ClassDecl
// =============================================================================

/// Declaration of one raw type for [`ClassRegistry::register`].
///
/// A non-interface class other than `java.lang.Object` extends `Object`
/// unless told otherwise.
#[derive(Clone, Debug)]
pub struct ClassDecl {
    class: Class,
    superclass: Option<Type>,
    interfaces: Vec<Type>,
    type_parameters: Vec<TypeVariable>,
    enclosing: Option<Class>,
    is_static: bool,
}

impl ClassDecl {
    pub fn new(class: Class) -> Self {
        let superclass = match class.kind() {
            ClassKind::Class if !class.is_object() => Some(Type::object()),
            _ => None,
        };
        Self {
            class,
            superclass,
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
            enclosing: None,
            is_static: false,
        }
    }

    pub fn with_type_parameters(mut self, params: impl IntoIterator<Item = TypeVariable>) -> Self {
        self.type_parameters = params.into_iter().collect();
        self
    }

    pub fn extends(mut self, superclass: impl Into<Type>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Add an interface edge; for an interface this is a superinterface.
    pub fn implements(mut self, interface: impl Into<Type>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Declare an inner (non-static) class of `outer`.
    pub fn nested_in(mut self, outer: &Class) -> Self {
        self.enclosing = Some(outer.clone());
        self.is_static = false;
        self
    }

    pub fn static_nested_in(mut self, outer: &Class) -> Self {
        self.enclosing = Some(outer.clone());
        self.is_static = true;
        self
    }
}

// =============================================================================
// ClassRegistry
// =============================================================================

/// Thread-safe in-memory [`ClassHierarchy`].
///
/// ```ignore
/// let registry = ClassRegistry::new();
/// let list = Class::interface("java.util.List");
/// let e = registry.declare_type_parameter(&list, "E");
/// registry.register(ClassDecl::new(list.clone()).with_type_parameters([e]));
/// ```
pub struct ClassRegistry {
    classes: DashMap<Arc<str>, ClassDecl>,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRegistry {
    /// A registry holding `Object`, `Cloneable`, `Serializable` and the
    /// primitive classes.
    pub fn new() -> Self {
        let registry = Self {
            classes: DashMap::new(),
        };
        registry.register(ClassDecl::new(Class::object()));
        registry.register(ClassDecl::new(Class::interface(CLONEABLE)));
        registry.register(ClassDecl::new(Class::interface(SERIALIZABLE)));
        for primitive in primitives::primitive_classes() {
            registry.register(ClassDecl::new(primitive));
        }
        registry
    }

    /// Register (or replace) a declaration and return its class.
    pub fn register(&self, decl: ClassDecl) -> Class {
        trace!(
            class = %decl.class,
            superclass = ?decl.superclass,
            interfaces = decl.interfaces.len(),
            type_parameters = decl.type_parameters.len(),
            "ClassRegistry::register"
        );
        let class = decl.class.clone();
        self.classes.insert(Arc::from(class.name()), decl);
        class
    }

    /// A type parameter owned by `class`. Its bounds may be installed later
    /// with [`TypeVariable::set_bounds`], after the types mentioning it exist.
    pub fn declare_type_parameter(&self, class: &Class, name: &str) -> TypeVariable {
        TypeVariable::of_class(class, name)
    }

    /// Look up a registered class by fully qualified name.
    pub fn get(&self, name: &str) -> Option<Class> {
        self.classes.get(name).map(|entry| entry.class.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn with_decl<T>(&self, class: &Class, f: impl FnOnce(&ClassDecl) -> T) -> Option<T> {
        self.classes.get(class.name()).map(|entry| f(&entry))
    }
}

impl ClassHierarchy for ClassRegistry {
    fn generic_superclass(&self, class: &Class) -> Option<Type> {
        if class.is_array() {
            return Some(Type::object());
        }
        self.with_decl(class, |decl| decl.superclass.clone()).flatten()
    }

    fn generic_interfaces(&self, class: &Class) -> Vec<Type> {
        if class.is_array() {
            return vec![
                Type::Class(Class::interface(CLONEABLE)),
                Type::Class(Class::interface(SERIALIZABLE)),
            ];
        }
        self.with_decl(class, |decl| decl.interfaces.clone())
            .unwrap_or_default()
    }

    fn type_parameters(&self, class: &Class) -> Vec<TypeVariable> {
        self.with_decl(class, |decl| decl.type_parameters.clone())
            .unwrap_or_default()
    }

    fn enclosing_class(&self, class: &Class) -> Option<Class> {
        self.with_decl(class, |decl| decl.enclosing.clone()).flatten()
    }

    fn is_static(&self, class: &Class) -> bool {
        self.with_decl(class, |decl| decl.is_static).unwrap_or(false)
    }
}

impl std::fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("classes", &self.classes.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/hierarchy_tests.rs"]
mod tests;
