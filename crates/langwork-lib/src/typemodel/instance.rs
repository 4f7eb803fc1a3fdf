//! Declaration handles and type instances.

/// Namespace handle. `NamespaceId::STD` is the shared standard library.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NamespaceId(pub(crate) u32);

impl NamespaceId {
    pub const STD: NamespaceId = NamespaceId(0);

    pub fn is_std(self) -> bool {
        self == Self::STD
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Declaration handle: owning namespace plus slot in that namespace.
///
/// Comparing two handles is O(1). Handles stay valid for the lifetime of
/// the model that issued them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct DeclId {
    pub(crate) namespace: NamespaceId,
    pub(crate) index: u32,
}

impl DeclId {
    pub(crate) const fn new(namespace: NamespaceId, index: u32) -> Self {
        Self { namespace, index }
    }

    pub fn namespace(self) -> NamespaceId {
        self.namespace
    }

    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }
}

/// A use of a declaration: type arguments plus nullability.
///
/// Two instances are equal iff declaration, arguments, and nullability match.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct TypeInstance {
    pub decl: DeclId,
    pub args: Vec<TypeInstance>,
    pub nullable: bool,
}

impl TypeInstance {
    pub fn of(decl: DeclId) -> Self {
        Self {
            decl,
            args: Vec::new(),
            nullable: false,
        }
    }

    pub fn with_args(decl: DeclId, args: Vec<TypeInstance>) -> Self {
        Self {
            decl,
            args,
            nullable: false,
        }
    }

    pub fn make_nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }

    pub fn non_null(self) -> Self {
        Self {
            nullable: false,
            ..self
        }
    }

    pub fn with_nullable(self, nullable: bool) -> Self {
        Self { nullable, ..self }
    }
}
