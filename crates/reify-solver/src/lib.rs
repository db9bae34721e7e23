//! Reified generic type introspection.
//!
//! The engine models Java-style generic types as plain values and answers
//! questions about them that erasure would otherwise lose:
//!
//! - [`types`]: the five-way [`Type`] model with structural equality,
//! - [`visitor`]: cycle-safe single-dispatch traversal,
//! - [`hierarchy`]: the injected reflection boundary ([`ClassHierarchy`]) and
//!   an in-memory provider ([`ClassRegistry`]),
//! - [`type_factory`]: synthetic type construction ([`Types`]),
//! - [`resolver`]: substitution and unification ([`TypeResolver`]),
//! - [`token`]: the navigational façade ([`TypeToken`]).
//!
//! ```ignore
//! let registry = ClassRegistry::new();
//! // ... register java.util.List, ArrayList ...
//! let types = Types::new(&registry);
//! let list_of_string = types.new_parameterized(&array_list, vec![string.into()])?;
//! let token = TypeToken::of(&registry, list_of_string);
//! assert_eq!(token.get_supertype(&list)?.to_string(), "java.util.List<java.lang.String>");
//! ```

pub mod assignability;
pub mod errors;
pub mod hierarchy;
pub mod primitives;
pub mod recursion;
pub mod resolver;
mod supertype;
pub mod token;
pub mod type_factory;
pub mod type_set;
pub mod types;
pub mod visitor;

pub use assignability::{SubtypeChecker, SubtypeResult, is_assignable};
pub use errors::{TypeError, TypeErrorKind, TypeResult};
pub use hierarchy::{ClassDecl, ClassHierarchy, ClassRegistry};
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
pub use resolver::TypeResolver;
pub use token::TypeToken;
pub use type_factory::Types;
pub use type_set::TypeSet;
pub use types::{
    Bounds, CLONEABLE, Class, ClassKind, Declaration, OBJECT, ParameterizedType, SERIALIZABLE,
    Type, TypeVariable, WildcardType,
};
pub use visitor::{TypeVisitor, contains_variable, raw_types};

#[cfg(test)]
#[path = "../tests/fixtures.rs"]
pub(crate) mod fixtures;
