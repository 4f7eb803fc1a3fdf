//! Scope tree built over one ASM.
//!
//! Scopes live in an arena and point to their parent by handle. A child
//! scope is keyed by the identifying reference of the element that opened
//! it, the same name that element is registered under in its parent.

use std::fmt::Write;

use indexmap::IndexMap;

use crate::asm::AsmPath;
use crate::typemodel::TypeModel;
use crate::xref::type_matches;

/// Name and type name of the root scope.
pub const ROOT_SCOPE_NAME: &str = "§root";

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    pub const ROOT: Self = Self(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// An element visible under a name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeItem {
    pub identifier: String,
    /// Qualified type name of the element.
    pub type_name: String,
    /// Location in the ASM; `None` for external items.
    pub path: Option<AsmPath>,
    /// Declared outside this ASM, e.g. a built-in.
    pub external: bool,
}

#[derive(Clone, Debug)]
struct Scope {
    parent: Option<ScopeId>,
    name: String,
    type_name: String,
    items: IndexMap<String, Vec<ScopeItem>>,
    children: IndexMap<String, ScopeId>,
}

impl Scope {
    fn new(parent: Option<ScopeId>, name: &str, type_name: &str) -> Self {
        Self {
            parent,
            name: name.to_owned(),
            type_name: type_name.to_owned(),
            items: IndexMap::new(),
            children: IndexMap::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    by_path: IndexMap<AsmPath, ScopeId>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(None, ROOT_SCOPE_NAME, ROOT_SCOPE_NAME)],
            by_path: IndexMap::new(),
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId::ROOT
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Only the root scope exists, and it holds no items.
    pub fn is_empty(&self) -> bool {
        self.scopes.len() == 1 && self.scopes[0].items.is_empty()
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.index()].parent
    }

    pub fn name(&self, scope: ScopeId) -> &str {
        &self.scopes[scope.index()].name
    }

    pub fn type_name(&self, scope: ScopeId) -> &str {
        &self.scopes[scope.index()].type_name
    }

    pub fn child(&self, scope: ScopeId, key: &str) -> Option<ScopeId> {
        self.scopes[scope.index()].children.get(key).copied()
    }

    /// Child scope of `parent` keyed by `key`, created on first request.
    pub fn create_or_get_child(&mut self, parent: ScopeId, key: &str, type_name: &str) -> ScopeId {
        if let Some(existing) = self.child(parent, key) {
            return existing;
        }
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(Some(parent), key, type_name));
        self.scopes[parent.index()].children.insert(key.to_owned(), id);
        id
    }

    /// Register an ASM element. Returns `false`, leaving the scope
    /// unchanged, if an item with the same identifier and type exists.
    pub fn add_to_scope(
        &mut self,
        scope: ScopeId,
        identifier: &str,
        type_name: &str,
        path: AsmPath,
    ) -> bool {
        self.insert(
            scope,
            ScopeItem {
                identifier: identifier.to_owned(),
                type_name: type_name.to_owned(),
                path: Some(path),
                external: false,
            },
        )
    }

    /// Register an element declared outside the ASM.
    pub fn add_external(&mut self, scope: ScopeId, identifier: &str, type_name: &str) -> bool {
        self.insert(
            scope,
            ScopeItem {
                identifier: identifier.to_owned(),
                type_name: type_name.to_owned(),
                path: None,
                external: true,
            },
        )
    }

    fn insert(&mut self, scope: ScopeId, item: ScopeItem) -> bool {
        let items = self.scopes[scope.index()]
            .items
            .entry(item.identifier.clone())
            .or_default();
        if items.iter().any(|existing| existing.type_name == item.type_name) {
            return false;
        }
        items.push(item);
        true
    }

    /// Items registered directly in `scope` under `identifier`.
    pub fn items(&self, scope: ScopeId, identifier: &str) -> &[ScopeItem] {
        self.scopes[scope.index()]
            .items
            .get(identifier)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn identifiers(&self, scope: ScopeId) -> impl Iterator<Item = &str> {
        self.scopes[scope.index()].items.keys().map(String::as_str)
    }

    /// Remember which scope the element at `path` opened.
    pub fn record_path(&mut self, path: AsmPath, scope: ScopeId) {
        self.by_path.insert(path, scope);
    }

    pub fn scope_for_path(&self, path: &AsmPath) -> Option<ScopeId> {
        self.by_path.get(path).copied()
    }

    /// Lexical lookup: items named `identifier` whose type matches one of
    /// `target_types`, from the nearest scope that has any.
    pub fn find_conforming_to(
        &self,
        model: &TypeModel,
        scope: ScopeId,
        identifier: &str,
        target_types: &[String],
    ) -> Vec<&ScopeItem> {
        let mut current = Some(scope);
        while let Some(scope) = current {
            let found = self.matching(model, scope, identifier, target_types);
            if !found.is_empty() {
                return found;
            }
            current = self.parent(scope);
        }
        Vec::new()
    }

    /// Qualified lookup from the root: every name but the last selects a
    /// child scope, the last one an item.
    pub fn find_qualified_conforming_to(
        &self,
        model: &TypeModel,
        qualified: &[String],
        target_types: &[String],
    ) -> Vec<&ScopeItem> {
        let Some((last, prefix)) = qualified.split_last() else {
            return Vec::new();
        };
        let mut scope = self.root();
        for name in prefix {
            match self.child(scope, name) {
                Some(child) => scope = child,
                None => return Vec::new(),
            }
        }
        self.matching(model, scope, last, target_types)
    }

    fn matching(
        &self,
        model: &TypeModel,
        scope: ScopeId,
        identifier: &str,
        target_types: &[String],
    ) -> Vec<&ScopeItem> {
        self.items(scope, identifier)
            .iter()
            .filter(|item| {
                target_types.is_empty()
                    || target_types
                        .iter()
                        .any(|target| type_matches(model, &item.type_name, target))
            })
            .collect()
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        self.format_scope(w, self.root(), 0)
    }

    fn format_scope(&self, w: &mut impl Write, scope: ScopeId, indent: usize) -> std::fmt::Result {
        let pad = "  ".repeat(indent);
        let data = &self.scopes[scope.index()];
        if data.items.is_empty() && data.children.is_empty() {
            return writeln!(w, "{pad}{} {{}}", data.name);
        }
        writeln!(w, "{pad}{} {{", data.name)?;
        for item in data.items.values().flatten() {
            let simple = item
                .type_name
                .rsplit_once('.')
                .map_or(item.type_name.as_str(), |(_, simple)| simple);
            match &item.path {
                Some(path) => writeln!(w, "{pad}  {}: {simple} @ {path}", item.identifier)?,
                None => writeln!(w, "{pad}  {}: {simple} (external)", item.identifier)?,
            }
        }
        for &child in data.children.values() {
            self.format_scope(w, child, indent + 1)?;
        }
        writeln!(w, "{pad}}}")
    }
}
