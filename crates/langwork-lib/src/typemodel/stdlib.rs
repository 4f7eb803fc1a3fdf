//! The shared standard-library namespace.
//!
//! Built once per process and imported by reference into every model.
//! Declarations sit at fixed slots so they can be named by constant.

use std::sync::LazyLock;

use super::instance::{DeclId, NamespaceId, TypeInstance};
use super::namespace::TypeNamespace;

pub const STD_NAMESPACE: &str = "std";

pub const ANY: DeclId = DeclId::new(NamespaceId::STD, 0);
pub const NOTHING: DeclId = DeclId::new(NamespaceId::STD, 1);
pub const STRING: DeclId = DeclId::new(NamespaceId::STD, 2);
pub const BOOLEAN: DeclId = DeclId::new(NamespaceId::STD, 3);
pub const INTEGER: DeclId = DeclId::new(NamespaceId::STD, 4);
pub const REAL: DeclId = DeclId::new(NamespaceId::STD, 5);
pub const TIMESTAMP: DeclId = DeclId::new(NamespaceId::STD, 6);
pub const LIST: DeclId = DeclId::new(NamespaceId::STD, 7);
pub const LIST_SEPARATED: DeclId = DeclId::new(NamespaceId::STD, 8);
pub const SET: DeclId = DeclId::new(NamespaceId::STD, 9);
pub const ORDERED_SET: DeclId = DeclId::new(NamespaceId::STD, 10);
pub const MAP: DeclId = DeclId::new(NamespaceId::STD, 11);

static STD_LIB: LazyLock<TypeNamespace> = LazyLock::new(build);

/// The process-wide standard library namespace.
pub fn std_lib() -> &'static TypeNamespace {
    &STD_LIB
}

fn build() -> TypeNamespace {
    let mut ns = TypeNamespace::new(NamespaceId::STD, STD_NAMESPACE);

    let any = ns.find_or_create_special_named("Any");
    debug_assert_eq!(any, ANY);
    let nothing = ns.find_or_create_special_named("Nothing");
    debug_assert_eq!(nothing, NOTHING);

    let string = ns.find_or_create_primitive_named("String");
    debug_assert_eq!(string, STRING);
    let boolean = ns.find_or_create_primitive_named("Boolean");
    debug_assert_eq!(boolean, BOOLEAN);
    let integer = ns.find_or_create_primitive_named("Integer");
    debug_assert_eq!(integer, INTEGER);
    let real = ns.find_or_create_primitive_named("Real");
    debug_assert_eq!(real, REAL);
    let timestamp = ns.find_or_create_primitive_named("Timestamp");
    debug_assert_eq!(timestamp, TIMESTAMP);

    let list = ns.find_or_create_collection_named("List", &["E"]);
    debug_assert_eq!(list, LIST);
    let list_separated = ns.find_or_create_collection_named("ListSeparated", &["E", "I"]);
    debug_assert_eq!(list_separated, LIST_SEPARATED);
    let set = ns.find_or_create_collection_named("Set", &["E"]);
    debug_assert_eq!(set, SET);
    let ordered_set = ns.find_or_create_collection_named("OrderedSet", &["E"]);
    debug_assert_eq!(ordered_set, ORDERED_SET);
    let map = ns.find_or_create_collection_named("Map", &["K", "V"]);
    debug_assert_eq!(map, MAP);

    ns
}

pub fn any() -> TypeInstance {
    TypeInstance::of(ANY)
}

pub fn nothing() -> TypeInstance {
    TypeInstance::of(NOTHING)
}

pub fn string() -> TypeInstance {
    TypeInstance::of(STRING)
}

pub fn list_of(element: TypeInstance) -> TypeInstance {
    TypeInstance::with_args(LIST, vec![element])
}

pub fn list_separated_of(element: TypeInstance, separator: TypeInstance) -> TypeInstance {
    TypeInstance::with_args(LIST_SEPARATED, vec![element, separator])
}

pub fn is_nothing(instance: &TypeInstance) -> bool {
    instance.decl == NOTHING
}

pub fn is_collection(decl: DeclId) -> bool {
    matches!(decl, LIST | LIST_SEPARATED | SET | ORDERED_SET | MAP)
}
