//! Structural type model: namespaces of declarations addressed by handle.
//!
//! Every model implicitly sees the shared [`std_lib`] namespace. Model-owned
//! namespaces are registered through [`TypeModel::add_namespace`].

mod conformance;
mod declaration;
mod dump;
mod instance;
mod invariants;
mod model;
mod namespace;
pub mod stdlib;

#[cfg(test)]
mod conformance_tests;

pub use declaration::{
    Access, CollectionType, DataType, EnumType, Ownership, PrimitiveType, Properties,
    PropertyCharacteristics, PropertyDeclaration, SpecialType, Storage, TUPLE_TYPE_NAME,
    TupleType, TypeDeclaration, UNNAMED_SUPERTYPE_NAME, UnnamedSupertypeType,
    unique_property_name,
};
pub use instance::{DeclId, NamespaceId, TypeInstance};
pub use model::TypeModel;
pub use namespace::TypeNamespace;
pub use stdlib::std_lib;
