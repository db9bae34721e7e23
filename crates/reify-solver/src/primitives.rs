//! Primitive classes and their `java.lang` wrapper classes.

use crate::types::Class;

const PRIMITIVE_WRAPPERS: [(&str, &str); 9] = [
    ("boolean", "java.lang.Boolean"),
    ("byte", "java.lang.Byte"),
    ("char", "java.lang.Character"),
    ("short", "java.lang.Short"),
    ("int", "java.lang.Integer"),
    ("long", "java.lang.Long"),
    ("float", "java.lang.Float"),
    ("double", "java.lang.Double"),
    ("void", "java.lang.Void"),
];

/// Every primitive class, `void` included.
pub fn primitive_classes() -> impl Iterator<Item = Class> {
    PRIMITIVE_WRAPPERS
        .iter()
        .map(|(primitive, _)| Class::primitive(*primitive))
}

/// The wrapper class of a primitive (`int` -> `java.lang.Integer`).
pub fn wrap(class: &Class) -> Option<Class> {
    if !class.is_primitive() {
        return None;
    }
    PRIMITIVE_WRAPPERS
        .iter()
        .find(|(primitive, _)| *primitive == class.name())
        .map(|(_, wrapper)| Class::class(*wrapper))
}

/// The primitive class a wrapper boxes (`java.lang.Integer` -> `int`).
pub fn unwrap(class: &Class) -> Option<Class> {
    if class.is_primitive() || class.is_interface() {
        return None;
    }
    PRIMITIVE_WRAPPERS
        .iter()
        .find(|(_, wrapper)| *wrapper == class.name())
        .map(|(primitive, _)| Class::primitive(*primitive))
}
