//! Type declaration kinds.
//!
//! `TypeDeclaration` is a closed sum: every dispatch site matches all
//! variants, so adding a kind is a compile-checked change.

use indexmap::IndexMap;

use super::instance::{DeclId, TypeInstance};

/// Whether a property is backed by a parse-tree position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Storage {
    Stored,
    Derived,
}

/// Whether a property owns its value or points at an element owned elsewhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ownership {
    Composite,
    Reference,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    ReadOnly,
    ReadWrite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PropertyCharacteristics {
    pub storage: Storage,
    pub ownership: Ownership,
    pub access: Access,
}

impl PropertyCharacteristics {
    /// Characteristics of a property synthesized from a grammar rule item.
    pub const DERIVED_FROM_GRAMMAR: Self = Self {
        storage: Storage::Stored,
        ownership: Ownership::Composite,
        access: Access::ReadWrite,
    };

    pub const REFERENCE: Self = Self {
        storage: Storage::Stored,
        ownership: Ownership::Reference,
        access: Access::ReadWrite,
    };

    pub fn is_reference(&self) -> bool {
        self.ownership == Ownership::Reference
    }

    pub fn is_stored(&self) -> bool {
        self.storage == Storage::Stored
    }
}

/// A named, typed member of a data or tuple type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyDeclaration {
    pub owner: DeclId,
    pub name: String,
    pub type_instance: TypeInstance,
    pub characteristics: PropertyCharacteristics,
    /// Child position in the producing rule; binds the property to `child[index]`.
    pub index: usize,
}

/// Ordered property table, unique by name.
pub type Properties = IndexMap<String, PropertyDeclaration>;

/// Pick a property name not yet used in `properties`.
///
/// The first occurrence keeps `base`; later ones get `base2`, `base3`, ...
pub fn unique_property_name(properties: &Properties, base: &str) -> String {
    if !properties.contains_key(base) {
        return base.to_owned();
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{base}{n}");
        if !properties.contains_key(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// `Any` and `Nothing`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpecialType {
    pub id: DeclId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimitiveType {
    pub id: DeclId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumType {
    pub id: DeclId,
    pub name: String,
    pub literals: Vec<String>,
}

/// Named structured type. Interfaces carry the same shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataType {
    pub id: DeclId,
    pub name: String,
    pub interface: bool,
    pub properties: Properties,
    pub supertypes: Vec<TypeInstance>,
    pub subtypes: Vec<TypeInstance>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionType {
    pub id: DeclId,
    pub name: String,
    pub type_parameters: Vec<String>,
}

/// Anonymous structured type, produced by groups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TupleType {
    pub id: DeclId,
    pub properties: Properties,
}

/// Union identified by its ordered list of member instances.
///
/// A recursive choice rule whose alternatives share no data shape keeps its
/// rule name on the union, so earlier references to the rule type see it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnnamedSupertypeType {
    pub id: DeclId,
    pub name: Option<String>,
    pub subtypes: Vec<TypeInstance>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeDeclaration {
    Special(SpecialType),
    Primitive(PrimitiveType),
    Enum(EnumType),
    Data(DataType),
    Collection(CollectionType),
    Tuple(TupleType),
    UnnamedSupertype(UnnamedSupertypeType),
}

pub const TUPLE_TYPE_NAME: &str = "$Tuple";
pub const UNNAMED_SUPERTYPE_NAME: &str = "$Unnamed";

impl TypeDeclaration {
    pub fn id(&self) -> DeclId {
        match self {
            Self::Special(t) => t.id,
            Self::Primitive(t) => t.id,
            Self::Enum(t) => t.id,
            Self::Data(t) => t.id,
            Self::Collection(t) => t.id,
            Self::Tuple(t) => t.id,
            Self::UnnamedSupertype(t) => t.id,
        }
    }

    /// Simple name. Anonymous kinds report a fixed marker name.
    pub fn name(&self) -> &str {
        match self {
            Self::Special(t) => &t.name,
            Self::Primitive(t) => &t.name,
            Self::Enum(t) => &t.name,
            Self::Data(t) => &t.name,
            Self::Collection(t) => &t.name,
            Self::Tuple(_) => TUPLE_TYPE_NAME,
            Self::UnnamedSupertype(t) => t.name.as_deref().unwrap_or(UNNAMED_SUPERTYPE_NAME),
        }
    }

    /// Short kind label used in dumps.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Special(_) => "special",
            Self::Primitive(_) => "primitive",
            Self::Enum(_) => "enum",
            Self::Data(t) if t.interface => "interface",
            Self::Data(_) => "data",
            Self::Collection(_) => "collection",
            Self::Tuple(_) => "tuple",
            Self::UnnamedSupertype(t) if t.name.is_some() => "union",
            Self::UnnamedSupertype(_) => "unnamed",
        }
    }

    pub fn is_named(&self) -> bool {
        match self {
            Self::Special(_)
            | Self::Primitive(_)
            | Self::Enum(_)
            | Self::Data(_)
            | Self::Collection(_) => true,
            Self::UnnamedSupertype(t) => t.name.is_some(),
            Self::Tuple(_) => false,
        }
    }

    pub fn properties(&self) -> Option<&Properties> {
        match self {
            Self::Data(t) => Some(&t.properties),
            Self::Tuple(t) => Some(&t.properties),
            Self::Special(_)
            | Self::Primitive(_)
            | Self::Enum(_)
            | Self::Collection(_)
            | Self::UnnamedSupertype(_) => None,
        }
    }

    pub fn properties_mut(&mut self) -> Option<&mut Properties> {
        match self {
            Self::Data(t) => Some(&mut t.properties),
            Self::Tuple(t) => Some(&mut t.properties),
            Self::Special(_)
            | Self::Primitive(_)
            | Self::Enum(_)
            | Self::Collection(_)
            | Self::UnnamedSupertype(_) => None,
        }
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDeclaration> {
        self.properties()?.get(name)
    }

    /// Property bound to `child[index]`, if any.
    pub fn property_at(&self, index: usize) -> Option<&PropertyDeclaration> {
        self.properties()?.values().find(|p| p.index == index)
    }

    pub fn as_data(&self) -> Option<&DataType> {
        match self {
            Self::Data(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_data_mut(&mut self) -> Option<&mut DataType> {
        match self {
            Self::Data(t) => Some(t),
            _ => None,
        }
    }

    pub fn supertypes(&self) -> &[TypeInstance] {
        match self {
            Self::Data(t) => &t.supertypes,
            Self::Special(_)
            | Self::Primitive(_)
            | Self::Enum(_)
            | Self::Collection(_)
            | Self::Tuple(_)
            | Self::UnnamedSupertype(_) => &[],
        }
    }
}
