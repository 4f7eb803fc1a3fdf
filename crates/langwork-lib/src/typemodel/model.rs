//! TypeModel: namespace registry with qualified lookups.
//!
//! Model-owned namespaces get ids starting at 1; id 0 always resolves to the
//! shared standard library, which is never copied into a model.

use indexmap::IndexMap;

use super::declaration::{
    PropertyCharacteristics, PropertyDeclaration, TypeDeclaration, unique_property_name,
};
use super::instance::{DeclId, NamespaceId, TypeInstance};
use super::invariants::{ensure_has_properties, ensure_mutable_namespace};
use super::namespace::TypeNamespace;
use super::stdlib::{self, STD_NAMESPACE, std_lib};

#[derive(Clone, Debug)]
pub struct TypeModel {
    name: String,
    namespaces: Vec<TypeNamespace>,
    by_name: IndexMap<String, NamespaceId>,
}

impl TypeModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespaces: Vec::new(),
            by_name: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a namespace, or return the existing one with that name.
    pub fn add_namespace(&mut self, qualified_name: &str) -> NamespaceId {
        if let Some(id) = self.find_namespace(qualified_name) {
            return id;
        }
        let id = NamespaceId(self.namespaces.len() as u32 + 1);
        self.namespaces.push(TypeNamespace::new(id, qualified_name));
        self.by_name.insert(qualified_name.to_owned(), id);
        id
    }

    pub fn find_namespace(&self, qualified_name: &str) -> Option<NamespaceId> {
        if qualified_name == STD_NAMESPACE {
            return Some(NamespaceId::STD);
        }
        self.by_name.get(qualified_name).copied()
    }

    pub fn namespace(&self, id: NamespaceId) -> &TypeNamespace {
        if id.is_std() {
            return std_lib();
        }
        &self.namespaces[id.0 as usize - 1]
    }

    /// # Panics
    /// Panics for the standard library, which is immutable.
    pub fn namespace_mut(&mut self, id: NamespaceId) -> &mut TypeNamespace {
        ensure_mutable_namespace(id);
        &mut self.namespaces[id.0 as usize - 1]
    }

    /// Model-owned namespaces in registration order (the std library excluded).
    pub fn namespaces(&self) -> impl Iterator<Item = &TypeNamespace> {
        self.namespaces.iter()
    }

    /// Bind every namespace's declared imports to registered namespaces.
    ///
    /// Runs after all namespaces are registered. Returns the import names
    /// that could not be bound; absence is not an error at this layer.
    pub fn resolve_imports(&mut self) -> Vec<String> {
        let mut unresolved = Vec::new();
        let bindings: Vec<Vec<NamespaceId>> = self
            .namespaces
            .iter()
            .map(|ns| {
                ns.imports()
                    .iter()
                    .filter_map(|import| {
                        let found = self.find_namespace(import);
                        if found.is_none() {
                            unresolved.push(import.clone());
                        }
                        found
                    })
                    .collect()
            })
            .collect();
        for (ns, resolved) in self.namespaces.iter_mut().zip(bindings) {
            ns.set_resolved_imports(resolved);
        }
        unresolved
    }

    pub fn declaration(&self, decl: DeclId) -> &TypeDeclaration {
        self.namespace(decl.namespace).get(decl)
    }

    pub fn declaration_mut(&mut self, decl: DeclId) -> &mut TypeDeclaration {
        self.namespace_mut(decl.namespace).get_mut(decl)
    }

    /// `ns.Name` for named declarations, the marker name for anonymous ones.
    pub fn qualified_type_name(&self, decl: DeclId) -> String {
        let declaration = self.declaration(decl);
        if !declaration.is_named() {
            return declaration.name().to_owned();
        }
        format!(
            "{}.{}",
            self.namespace(decl.namespace).qualified_name(),
            declaration.name()
        )
    }

    /// Lookup by fully qualified name (`namespace.Name`).
    pub fn find_by_qualified_name(&self, qualified_name: &str) -> Option<DeclId> {
        let (ns_name, simple) = qualified_name.rsplit_once('.')?;
        let ns = self.find_namespace(ns_name)?;
        self.namespace(ns).find_owned(simple)
    }

    /// Qualified lookup if the name is dotted; otherwise scan model
    /// namespaces in registration order, then the std library.
    pub fn find_first_by_possibly_qualified_or_null(&self, name: &str) -> Option<DeclId> {
        if name.contains('.') {
            return self.find_by_qualified_name(name);
        }
        self.namespaces
            .iter()
            .find_map(|ns| ns.find_owned(name))
            .or_else(|| std_lib().find_owned(name))
    }

    /// Lookup as seen from one namespace: own declarations, then resolved
    /// imports, then the std library.
    pub fn find_in_context(&self, context: NamespaceId, name: &str) -> Option<DeclId> {
        if name.contains('.') {
            return self.find_by_qualified_name(name);
        }
        let ns = self.namespace(context);
        ns.find_owned(name)
            .or_else(|| {
                ns.resolved_imports()
                    .iter()
                    .find_map(|&import| self.namespace(import).find_owned(name))
            })
            .or_else(|| std_lib().find_owned(name))
    }

    /// Append a property to a data or tuple type, disambiguating the name
    /// against the owner's existing properties. Returns the name used.
    ///
    /// # Panics
    /// Panics if `owner` has no property table.
    pub fn add_property(
        &mut self,
        owner: DeclId,
        base_name: &str,
        type_instance: TypeInstance,
        characteristics: PropertyCharacteristics,
        index: usize,
    ) -> String {
        let properties = ensure_has_properties(self.declaration_mut(owner).properties_mut());
        let name = unique_property_name(properties, base_name);
        properties.insert(
            name.clone(),
            PropertyDeclaration {
                owner,
                name: name.clone(),
                type_instance,
                characteristics,
                index,
            },
        );
        name
    }

    /// Record `sub` as a subtype of `sup` and `sup` as a supertype of `sub`.
    ///
    /// Edges are recorded once; only data types carry them, so the call is
    /// a no-op unless both sides are data types.
    pub fn add_subtype(&mut self, sup: DeclId, sub: DeclId) {
        let is_data = |decl: DeclId| self.declaration(decl).as_data().is_some();
        if !is_data(sup) || !is_data(sub) {
            return;
        }
        if let Some(data) = self.declaration_mut(sup).as_data_mut() {
            let sub_instance = TypeInstance::of(sub);
            if !data.subtypes.contains(&sub_instance) {
                data.subtypes.push(sub_instance);
            }
        }
        if let Some(data) = self.declaration_mut(sub).as_data_mut() {
            let sup_instance = TypeInstance::of(sup);
            if !data.supertypes.contains(&sup_instance) {
                data.supertypes.push(sup_instance);
            }
        }
    }

    /// Human-readable signature: `List<Decl>`, `String?`, `{a: A}`, `(A | B)`.
    pub fn signature(&self, instance: &TypeInstance) -> String {
        let mut out = match self.declaration(instance.decl) {
            TypeDeclaration::Tuple(tuple) => {
                let fields: Vec<_> = tuple
                    .properties
                    .values()
                    .map(|p| format!("{}: {}", p.name, self.signature(&p.type_instance)))
                    .collect();
                format!("{{{}}}", fields.join(", "))
            }
            TypeDeclaration::UnnamedSupertype(union) => match &union.name {
                Some(name) => name.clone(),
                None => {
                    let members: Vec<_> =
                        union.subtypes.iter().map(|s| self.signature(s)).collect();
                    format!("({})", members.join(" | "))
                }
            },
            decl @ (TypeDeclaration::Special(_)
            | TypeDeclaration::Primitive(_)
            | TypeDeclaration::Enum(_)
            | TypeDeclaration::Data(_)
            | TypeDeclaration::Collection(_)) => {
                let mut name = decl.name().to_owned();
                if !instance.args.is_empty() {
                    let args: Vec<_> = instance.args.iter().map(|a| self.signature(a)).collect();
                    name = format!("{name}<{}>", args.join(", "));
                }
                name
            }
        };
        if instance.nullable {
            out.push('?');
        }
        out
    }

    pub fn is_primitive(&self, instance: &TypeInstance) -> bool {
        matches!(
            self.declaration(instance.decl),
            TypeDeclaration::Primitive(_)
        )
    }

    pub fn is_nothing(&self, instance: &TypeInstance) -> bool {
        stdlib::is_nothing(instance)
    }
}
