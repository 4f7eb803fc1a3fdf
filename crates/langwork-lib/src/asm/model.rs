//! Abstract syntax model: typed structures addressed by handle and path.

use std::fmt;

use indexmap::IndexMap;

/// Index into the ASM's structure arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ElementId(pub u32);

impl ElementId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stable location of a value: `/0` for the first root, `/0/decl` for a
/// property, `/0/decl/1` for the second item of a list.
#[derive(Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct AsmPath(String);

impl AsmPath {
    pub fn root(index: usize) -> Self {
        Self(format!("/{index}"))
    }

    pub fn property(&self, name: &str) -> Self {
        Self(format!("{}/{name}", self.0))
    }

    pub fn item(&self, index: usize) -> Self {
        Self(format!("{}/{index}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Segments after the leading slash.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').skip(1)
    }
}

impl From<&str> for AsmPath {
    fn from(path: &str) -> Self {
        Self(path.to_owned())
    }
}

impl fmt::Display for AsmPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ReferenceTarget {
    /// Not (yet) bound to an element.
    Unresolved,
    /// Bound to something deliberately outside this ASM.
    External,
    Element(ElementId),
}

/// A property value naming another element.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AsmReference {
    pub reference: String,
    pub target: ReferenceTarget,
}

impl AsmReference {
    pub fn unresolved(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            target: ReferenceTarget::Unresolved,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.target, ReferenceTarget::Element(_))
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AsmValue {
    Nothing,
    Primitive(String),
    List(Vec<AsmValue>),
    Structure(ElementId),
    Reference(AsmReference),
}

impl AsmValue {
    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }

    pub fn as_primitive(&self) -> Option<&str> {
        match self {
            Self::Primitive(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_structure(&self) -> Option<ElementId> {
        match self {
            Self::Structure(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AsmValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

/// A typed element with named properties.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AsmStructure {
    pub id: ElementId,
    pub path: AsmPath,
    /// Qualified type name (`ns.Type`), or a marker name for tuples.
    pub type_name: String,
    pub properties: IndexMap<String, AsmValue>,
}

impl AsmStructure {
    pub fn property(&self, name: &str) -> Option<&AsmValue> {
        self.properties.get(name)
    }

    pub fn simple_type_name(&self) -> &str {
        self.type_name
            .rsplit_once('.')
            .map_or(self.type_name.as_str(), |(_, simple)| simple)
    }
}

/// An ASM instance: root values plus every structure reachable from them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Asm {
    elements: Vec<AsmStructure>,
    roots: Vec<AsmValue>,
    index: IndexMap<AsmPath, ElementId>,
}

impl Asm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path the next root will be stored at.
    pub fn next_root_path(&self) -> AsmPath {
        AsmPath::root(self.roots.len())
    }

    pub fn add_root(&mut self, value: AsmValue) {
        self.roots.push(value);
    }

    pub fn roots(&self) -> &[AsmValue] {
        &self.roots
    }

    /// Allocate a structure located at `path`. The caller attaches it to
    /// its owner (or the root list) afterwards.
    pub fn create_structure(&mut self, path: AsmPath, type_name: impl Into<String>) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.index.insert(path.clone(), id);
        self.elements.push(AsmStructure {
            id,
            path,
            type_name: type_name.into(),
            properties: IndexMap::new(),
        });
        id
    }

    pub fn structure(&self, id: ElementId) -> &AsmStructure {
        &self.elements[id.index()]
    }

    pub fn structure_mut(&mut self, id: ElementId) -> &mut AsmStructure {
        &mut self.elements[id.index()]
    }

    pub fn set_property(&mut self, id: ElementId, name: impl Into<String>, value: AsmValue) {
        self.structure_mut(id).properties.insert(name.into(), value);
    }

    pub fn elements(&self) -> impl Iterator<Item = &AsmStructure> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Structure recorded at exactly `path`.
    pub fn element_at(&self, path: &AsmPath) -> Option<ElementId> {
        self.index.get(path).copied()
    }

    /// Value found by walking `path` from the roots: property names
    /// through structures, indices through lists.
    pub fn value_at(&self, path: &AsmPath) -> Option<&AsmValue> {
        let mut segments = path.segments();
        let root: usize = segments.next()?.parse().ok()?;
        let mut current = self.roots.get(root)?;
        for segment in segments {
            current = match current {
                AsmValue::Structure(id) => self.structure(*id).property(segment)?,
                AsmValue::List(items) => items.get(segment.parse::<usize>().ok()?)?,
                AsmValue::Nothing | AsmValue::Primitive(_) | AsmValue::Reference(_) => {
                    return None;
                }
            };
        }
        Some(current)
    }
}
