//! A namespace: named declarations plus anonymous tuples and unions.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::declaration::{
    CollectionType, DataType, EnumType, PrimitiveType, Properties, SpecialType, TupleType,
    TypeDeclaration, UnnamedSupertypeType,
};
use super::instance::{DeclId, NamespaceId, TypeInstance};

#[derive(Clone, Debug)]
pub struct TypeNamespace {
    id: NamespaceId,
    qualified_name: String,
    imports: Vec<String>,
    resolved_imports: Vec<NamespaceId>,
    declarations: Vec<TypeDeclaration>,
    /// Simple name → slot, for named declarations still registered.
    owned: IndexMap<String, u32>,
    /// Slots of tuples and unnamed supertypes, in creation order.
    anonymous: Vec<u32>,
    unnamed_by_members: HashMap<Vec<TypeInstance>, u32>,
}

impl TypeNamespace {
    pub(crate) fn new(id: NamespaceId, qualified_name: impl Into<String>) -> Self {
        Self {
            id,
            qualified_name: qualified_name.into(),
            imports: Vec::new(),
            resolved_imports: Vec::new(),
            declarations: Vec::new(),
            owned: IndexMap::new(),
            anonymous: Vec::new(),
            unnamed_by_members: HashMap::new(),
        }
    }

    pub fn id(&self) -> NamespaceId {
        self.id
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Declared imports, by qualified namespace name.
    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// Imports bound by `TypeModel::resolve_imports`.
    pub fn resolved_imports(&self) -> &[NamespaceId] {
        &self.resolved_imports
    }

    pub fn add_import(&mut self, qualified_name: impl Into<String>) {
        let name = qualified_name.into();
        if !self.imports.contains(&name) {
            self.imports.push(name);
        }
    }

    pub(crate) fn set_resolved_imports(&mut self, resolved: Vec<NamespaceId>) {
        self.resolved_imports = resolved;
    }

    /// Find a named declaration owned by this namespace.
    pub fn find_owned(&self, name: &str) -> Option<DeclId> {
        self.owned.get(name).map(|&slot| DeclId::new(self.id, slot))
    }

    /// # Panics
    /// Panics if `decl` does not belong to this namespace.
    pub fn get(&self, decl: DeclId) -> &TypeDeclaration {
        debug_assert_eq!(decl.namespace, self.id, "declaration from another namespace");
        &self.declarations[decl.index()]
    }

    pub fn get_mut(&mut self, decl: DeclId) -> &mut TypeDeclaration {
        debug_assert_eq!(decl.namespace, self.id, "declaration from another namespace");
        &mut self.declarations[decl.index()]
    }

    /// Named declarations in creation order.
    pub fn owned_declarations(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.owned
            .values()
            .map(|&slot| &self.declarations[slot as usize])
    }

    /// Tuples and unnamed supertypes in creation order.
    pub fn anonymous_declarations(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.anonymous
            .iter()
            .map(|&slot| &self.declarations[slot as usize])
    }

    pub fn owned_count(&self) -> usize {
        self.owned.len()
    }

    fn next_id(&self) -> DeclId {
        DeclId::new(self.id, self.declarations.len() as u32)
    }

    /// Return the declaration named `name` whatever its kind, or register the
    /// one built by `make`.
    fn find_or_create(
        &mut self,
        name: &str,
        make: impl FnOnce(DeclId, String) -> TypeDeclaration,
    ) -> DeclId {
        if let Some(existing) = self.find_owned(name) {
            return existing;
        }
        let id = self.next_id();
        self.declarations.push(make(id, name.to_owned()));
        self.owned.insert(name.to_owned(), id.index);
        id
    }

    pub fn find_or_create_special_named(&mut self, name: &str) -> DeclId {
        self.find_or_create(name, |id, name| {
            TypeDeclaration::Special(SpecialType { id, name })
        })
    }

    pub fn find_or_create_primitive_named(&mut self, name: &str) -> DeclId {
        self.find_or_create(name, |id, name| {
            TypeDeclaration::Primitive(PrimitiveType { id, name })
        })
    }

    pub fn find_or_create_enum_named(&mut self, name: &str, literals: Vec<String>) -> DeclId {
        self.find_or_create(name, |id, name| {
            TypeDeclaration::Enum(EnumType { id, name, literals })
        })
    }

    pub fn find_or_create_data_type_named(&mut self, name: &str) -> DeclId {
        self.find_or_create(name, |id, name| {
            TypeDeclaration::Data(DataType {
                id,
                name,
                interface: false,
                properties: Properties::new(),
                supertypes: Vec::new(),
                subtypes: Vec::new(),
            })
        })
    }

    pub fn find_or_create_interface_named(&mut self, name: &str) -> DeclId {
        self.find_or_create(name, |id, name| {
            TypeDeclaration::Data(DataType {
                id,
                name,
                interface: true,
                properties: Properties::new(),
                supertypes: Vec::new(),
                subtypes: Vec::new(),
            })
        })
    }

    pub fn find_or_create_collection_named(
        &mut self,
        name: &str,
        type_parameters: &[&str],
    ) -> DeclId {
        self.find_or_create(name, |id, name| {
            TypeDeclaration::Collection(CollectionType {
                id,
                name,
                type_parameters: type_parameters.iter().map(|p| (*p).to_owned()).collect(),
            })
        })
    }

    /// Create a fresh, empty tuple type.
    pub fn create_tuple_type(&mut self) -> DeclId {
        let id = self.next_id();
        self.declarations.push(TypeDeclaration::Tuple(TupleType {
            id,
            properties: Properties::new(),
        }));
        self.anonymous.push(id.index);
        id
    }

    /// Union over `subtypes`, memoized by the exact ordered member list.
    pub fn create_unnamed_supertype_type(&mut self, subtypes: Vec<TypeInstance>) -> DeclId {
        if let Some(&slot) = self.unnamed_by_members.get(&subtypes) {
            return DeclId::new(self.id, slot);
        }
        let id = self.next_id();
        self.declarations
            .push(TypeDeclaration::UnnamedSupertype(UnnamedSupertypeType {
                id,
                name: None,
                subtypes: subtypes.clone(),
            }));
        self.anonymous.push(id.index);
        self.unnamed_by_members.insert(subtypes, id.index);
        id
    }

    /// Replace the named declaration in slot `decl` by a union over
    /// `subtypes` registered under the same name. Handles to `decl` stay
    /// valid and now denote the union.
    pub fn redefine_as_union(&mut self, decl: DeclId, subtypes: Vec<TypeInstance>) {
        let name = self.get(decl).name().to_owned();
        self.declarations[decl.index()] =
            TypeDeclaration::UnnamedSupertype(UnnamedSupertypeType {
                id: decl,
                name: Some(name),
                subtypes,
            });
    }

    /// Forget an anonymous union nothing refers to. Its slot stays
    /// allocated.
    pub fn withdraw_unnamed(&mut self, decl: DeclId) {
        self.anonymous.retain(|&slot| slot != decl.index);
        self.unnamed_by_members.retain(|_, slot| *slot != decl.index);
    }

    pub fn declaration_count(&self) -> usize {
        self.declarations.len()
    }

    /// Unregister a named declaration. Its slot stays allocated so
    /// outstanding handles remain valid.
    pub fn remove_owned(&mut self, name: &str) -> Option<DeclId> {
        let slot = self.owned.shift_remove(name)?;
        Some(DeclId::new(self.id, slot))
    }
}
