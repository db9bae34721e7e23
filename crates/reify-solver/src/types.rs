//! Type Model
//!
//! The closed five-way representation of a reified generic type:
//!
//! | Variant | Example | Equality |
//! |---------|---------|----------|
//! | `Class` | `java.lang.String`, `int`, `java.lang.String[]` | by name |
//! | `Parameterized` | `java.util.List<T>` | raw + owner + arguments (ordered) |
//! | `GenericArray` | `java.util.List<java.lang.String>[]` | by component |
//! | `Wildcard` | `? extends java.lang.Number` | by bound *sets* |
//! | `Variable` | `T` declared by `java.util.List` | by declaration + name |
//!
//! Every handle is reference-counted, so cloning a `Type` is cheap and all
//! values are immutable once built. Synthetic types built by
//! [`crate::Types`] and types handed out by a [`crate::ClassHierarchy`] obey the
//! same equality contract and can be mixed freely.

use once_cell::sync::OnceCell;
use reify_common::limits::MAX_ERASURE_DEPTH;
use rustc_hash::FxHasher;
use smallvec::SmallVec;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Fully qualified name of the universal root class.
pub const OBJECT: &str = "java.lang.Object";
/// Marker interface implemented by every array class.
pub const CLONEABLE: &str = "java.lang.Cloneable";
/// Marker interface implemented by every array class.
pub const SERIALIZABLE: &str = "java.io.Serializable";

/// Inline storage for wildcard bound lists; almost every wildcard has one.
pub type Bounds = SmallVec<[Type; 1]>;

// =============================================================================
// Class - Raw (erased) nominal type
// =============================================================================

/// Shape of a raw type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Primitive,
    /// An array class; the payload is the component class.
    Array(Class),
}

/// A raw nominal type: a class, interface, primitive or array class.
///
/// Identity is the fully qualified name. The kind is carried along so the
/// engine can answer "is this an interface / primitive / array" without a
/// round-trip to the hierarchy provider.
#[derive(Clone)]
pub struct Class(Arc<ClassData>);

struct ClassData {
    name: Arc<str>,
    kind: ClassKind,
}

impl Class {
    pub fn new(name: impl Into<Arc<str>>, kind: ClassKind) -> Self {
        Self(Arc::new(ClassData {
            name: name.into(),
            kind,
        }))
    }

    pub fn class(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, ClassKind::Class)
    }

    pub fn interface(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, ClassKind::Interface)
    }

    pub fn primitive(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, ClassKind::Primitive)
    }

    /// `java.lang.Object`.
    pub fn object() -> Self {
        Self::class(OBJECT)
    }

    /// The array class whose component is `component` (`String` -> `String[]`).
    pub fn array_of(component: &Class) -> Self {
        Self::new(
            format!("{}[]", component.name()),
            ClassKind::Array(component.clone()),
        )
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Name without package or enclosing class prefix.
    pub fn simple_name(&self) -> &str {
        let name = self.name();
        name.rsplit(|c: char| c == '.' || c == '$').next().unwrap_or(name)
    }

    pub fn kind(&self) -> &ClassKind {
        &self.0.kind
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind(), ClassKind::Interface)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.kind(), ClassKind::Primitive)
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind(), ClassKind::Array(_))
    }

    pub fn is_object(&self) -> bool {
        self.name() == OBJECT
    }

    pub fn component_type(&self) -> Option<&Class> {
        match self.kind() {
            ClassKind::Array(component) => Some(component),
            _ => None,
        }
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.name == other.0.name
    }
}

impl Eq for Class {}

impl Hash for Class {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// TypeVariable
// =============================================================================

/// The generic declaration that introduces a type variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Declaration {
    /// A generic class or interface.
    Class(Class),
    /// A generic method of `owner`.
    Method { owner: Class, name: Arc<str> },
    /// A declaration that exists only inside the engine (artificial variables).
    Synthetic(Arc<str>),
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::Class(class) => write!(f, "{class}"),
            Declaration::Method { owner, name } => write!(f, "{owner}.{name}()"),
            Declaration::Synthetic(name) => write!(f, "{name}"),
        }
    }
}

/// A named type parameter.
///
/// Identity is `(declaration, name)`; bounds never take part in equality or
/// hashing, which is what keeps F-bounded variables (`E extends Enum<E>`)
/// from recursing forever.
///
/// Bounds may be installed after construction via [`TypeVariable::set_bounds`],
/// so that a bound can mention the variable it constrains. No bounds means
/// `java.lang.Object`.
#[derive(Clone)]
pub struct TypeVariable(Arc<TypeVariableData>);

struct TypeVariableData {
    declaration: Declaration,
    name: Arc<str>,
    bounds: OnceCell<Vec<Type>>,
}

impl TypeVariable {
    /// A variable whose bounds are known up front.
    pub fn new(declaration: Declaration, name: impl Into<Arc<str>>, bounds: Vec<Type>) -> Self {
        let var = Self::declare(declaration, name);
        var.set_bounds(bounds);
        var
    }

    /// A variable whose bounds will be installed later.
    pub fn declare(declaration: Declaration, name: impl Into<Arc<str>>) -> Self {
        Self(Arc::new(TypeVariableData {
            declaration,
            name: name.into(),
            bounds: OnceCell::new(),
        }))
    }

    /// Shorthand for a variable declared by a generic class.
    pub fn of_class(class: &Class, name: impl Into<Arc<str>>) -> Self {
        Self::declare(Declaration::Class(class.clone()), name)
    }

    /// Install the bounds. The first call wins; returns `false` if bounds
    /// were already present.
    pub fn set_bounds(&self, bounds: Vec<Type>) -> bool {
        self.0.bounds.set(bounds).is_ok()
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn declaration(&self) -> &Declaration {
        &self.0.declaration
    }

    /// The declared bounds, possibly empty.
    pub fn bounds(&self) -> &[Type] {
        self.0.bounds.get().map(Vec::as_slice).unwrap_or(&[])
    }

    /// The declared bounds, or `[java.lang.Object]` when none were declared.
    pub fn effective_bounds(&self) -> Vec<Type> {
        let bounds = self.bounds();
        if bounds.is_empty() {
            vec![Type::object()]
        } else {
            bounds.to_vec()
        }
    }
}

impl PartialEq for TypeVariable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.name == other.0.name && self.0.declaration == other.0.declaration)
    }
}

impl Eq for TypeVariable {}

impl Hash for TypeVariable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.declaration.hash(state);
        self.0.name.hash(state);
    }
}

impl fmt::Debug for TypeVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name(), self.declaration())
    }
}

impl fmt::Display for TypeVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ParameterizedType
// =============================================================================

/// A raw type applied to one argument per declared type parameter.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ParameterizedType {
    owner: Option<Type>,
    raw: Class,
    args: Vec<Type>,
}

impl ParameterizedType {
    /// Build without validation; public construction goes through
    /// [`crate::Types::new_parameterized`].
    pub(crate) fn new_unchecked(owner: Option<Type>, raw: Class, args: Vec<Type>) -> Self {
        Self { owner, raw, args }
    }

    pub fn raw_type(&self) -> &Class {
        &self.raw
    }

    pub fn owner_type(&self) -> Option<&Type> {
        self.owner.as_ref()
    }

    pub fn arguments(&self) -> &[Type] {
        &self.args
    }
}

impl fmt::Display for ParameterizedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.owner {
            Some(owner @ Type::Parameterized(_)) => {
                write!(f, "{owner}.{}", self.raw.simple_name())?;
            }
            _ => f.write_str(self.raw.name())?,
        }
        if !self.args.is_empty() {
            f.write_str("<")?;
            write_joined(f, &self.args, ", ")?;
            f.write_str(">")?;
        }
        Ok(())
    }
}

// =============================================================================
// WildcardType
// =============================================================================

/// `?`, `? extends U` or `? super L`.
///
/// The upper bound list is never empty: an absent upper bound is stored as
/// `java.lang.Object`. Bound lists are compared as sets.
#[derive(Clone)]
pub struct WildcardType {
    upper: Bounds,
    lower: Bounds,
}

impl WildcardType {
    pub(crate) fn new(
        upper: impl IntoIterator<Item = Type>,
        lower: impl IntoIterator<Item = Type>,
    ) -> Self {
        let mut upper = dedup_bounds(upper);
        if upper.is_empty() {
            upper.push(Type::object());
        }
        Self {
            upper,
            lower: dedup_bounds(lower),
        }
    }

    pub fn upper_bounds(&self) -> &[Type] {
        &self.upper
    }

    pub fn lower_bounds(&self) -> &[Type] {
        &self.lower
    }

    /// `?` (or the equivalent `? extends java.lang.Object`).
    pub fn is_unbounded(&self) -> bool {
        self.lower.is_empty() && self.upper.iter().all(Type::is_object)
    }
}

fn dedup_bounds(bounds: impl IntoIterator<Item = Type>) -> Bounds {
    let mut out = Bounds::new();
    for bound in bounds {
        if !out.contains(&bound) {
            out.push(bound);
        }
    }
    out
}

fn same_bound_set(a: &[Type], b: &[Type]) -> bool {
    a.len() == b.len() && a.iter().all(|bound| b.contains(bound))
}

fn hash_bound_set<H: Hasher>(bounds: &[Type], state: &mut H) {
    let mut combined: u64 = 0;
    for bound in bounds {
        let mut hasher = FxHasher::default();
        bound.hash(&mut hasher);
        combined = combined.wrapping_add(hasher.finish());
    }
    state.write_usize(bounds.len());
    state.write_u64(combined);
}

impl PartialEq for WildcardType {
    fn eq(&self, other: &Self) -> bool {
        same_bound_set(&self.upper, &other.upper) && same_bound_set(&self.lower, &other.lower)
    }
}

impl Eq for WildcardType {}

impl Hash for WildcardType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_bound_set(&self.upper, state);
        hash_bound_set(&self.lower, state);
    }
}

impl fmt::Display for WildcardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.lower.is_empty() {
            f.write_str("? super ")?;
            write_joined(f, &self.lower, " & ")
        } else if self.is_unbounded() {
            f.write_str("?")
        } else {
            f.write_str("? extends ")?;
            write_joined(f, &self.upper, " & ")
        }
    }
}

// =============================================================================
// Type
// =============================================================================

/// A reified type.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Class(Class),
    Parameterized(Arc<ParameterizedType>),
    GenericArray(Arc<Type>),
    Wildcard(Arc<WildcardType>),
    Variable(TypeVariable),
}

impl Type {
    pub fn object() -> Self {
        Type::Class(Class::object())
    }

    /// Human-readable variant name, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Type::Class(_) => "class",
            Type::Parameterized(_) => "parameterized type",
            Type::GenericArray(_) => "generic array type",
            Type::Wildcard(_) => "wildcard type",
            Type::Variable(_) => "type variable",
        }
    }

    pub fn as_class(&self) -> Option<&Class> {
        match self {
            Type::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_parameterized(&self) -> Option<&ParameterizedType> {
        match self {
            Type::Parameterized(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_wildcard(&self) -> Option<&WildcardType> {
        match self {
            Type::Wildcard(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&TypeVariable> {
        match self {
            Type::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Type::Class(class) if class.is_object())
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Class(class) if class.is_primitive())
    }

    pub fn is_array(&self) -> bool {
        match self {
            Type::Class(class) => class.is_array(),
            Type::GenericArray(_) => true,
            _ => false,
        }
    }

    /// The component of an array class or generic array type.
    pub fn component_type(&self) -> Option<Type> {
        match self {
            Type::Class(class) => class.component_type().cloned().map(Type::Class),
            Type::GenericArray(component) => Some((**component).clone()),
            _ => None,
        }
    }

    /// The erasure of this type: the raw class a value of this type is an
    /// instance of. Variables and wildcards erase to their first upper bound.
    pub fn erasure(&self) -> Class {
        self.erasure_at(0)
    }

    fn erasure_at(&self, depth: u32) -> Class {
        if depth > MAX_ERASURE_DEPTH {
            return Class::object();
        }
        match self {
            Type::Class(class) => class.clone(),
            Type::Parameterized(p) => p.raw_type().clone(),
            Type::GenericArray(component) => Class::array_of(&component.erasure_at(depth + 1)),
            Type::Variable(var) => var
                .bounds()
                .first()
                .map_or_else(Class::object, |bound| bound.erasure_at(depth + 1)),
            Type::Wildcard(w) => w
                .upper_bounds()
                .first()
                .map_or_else(Class::object, |bound| bound.erasure_at(depth + 1)),
        }
    }
}

impl From<Class> for Type {
    fn from(class: Class) -> Self {
        Type::Class(class)
    }
}

impl From<&Class> for Type {
    fn from(class: &Class) -> Self {
        Type::Class(class.clone())
    }
}

impl From<TypeVariable> for Type {
    fn from(var: TypeVariable) -> Self {
        Type::Variable(var)
    }
}

impl From<&TypeVariable> for Type {
    fn from(var: &TypeVariable) -> Self {
        Type::Variable(var.clone())
    }
}

impl From<ParameterizedType> for Type {
    fn from(p: ParameterizedType) -> Self {
        Type::Parameterized(Arc::new(p))
    }
}

impl From<WildcardType> for Type {
    fn from(w: WildcardType) -> Self {
        Type::Wildcard(Arc::new(w))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Class(class) => write!(f, "{class}"),
            Type::Parameterized(p) => write!(f, "{p}"),
            Type::GenericArray(component) => write!(f, "{component}[]"),
            Type::Wildcard(w) => write!(f, "{w}"),
            Type::Variable(var) => write!(f, "{var}"),
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, types: &[Type], sep: &str) -> fmt::Result {
    for (idx, ty) in types.iter().enumerate() {
        if idx > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
