/// Diagnostic kinds, grouped by the pass that raises them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Syntax analysis
    MissingTransformRule,
    ParseTreeMismatch,

    // Scope building
    UnknownType,
    ElementNotIdentified,
    IdentityNotScalar,
    DuplicateScopeItem,

    // Reference resolution
    NoScopeForNavigation,
    UnresolvedReference,
    AmbiguousReference,
    InvalidReferenceValue,
    ReferenceTargetMissing,
    ReferenceTargetNotElement,
}

impl DiagnosticKind {
    /// Default severity for this kind. Can be overridden by the builder.
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnknownType
            | Self::ElementNotIdentified
            | Self::IdentityNotScalar
            | Self::DuplicateScopeItem => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn default_phase(&self) -> Phase {
        match self {
            Self::MissingTransformRule | Self::ParseTreeMismatch => Phase::Syntax,
            Self::UnknownType
            | Self::ElementNotIdentified
            | Self::IdentityNotScalar
            | Self::DuplicateScopeItem
            | Self::NoScopeForNavigation
            | Self::UnresolvedReference
            | Self::AmbiguousReference
            | Self::InvalidReferenceValue
            | Self::ReferenceTargetMissing
            | Self::ReferenceTargetNotElement => Phase::Semantic,
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::MissingTransformRule => "no transform rule for grammar rule",
            Self::ParseTreeMismatch => "parse tree does not match the grammar",
            Self::UnknownType => "unknown type",
            Self::ElementNotIdentified => "element has no identifying value",
            Self::IdentityNotScalar => "identifying value is not a name",
            Self::DuplicateScopeItem => "element already registered in scope",
            Self::NoScopeForNavigation => "navigation target defines no scope",
            Self::UnresolvedReference => "reference cannot be resolved",
            Self::AmbiguousReference => "reference is ambiguous",
            Self::InvalidReferenceValue => "reference value is not a name",
            Self::ReferenceTargetMissing => "ASM does not contain element as reference",
            Self::ReferenceTargetNotElement => "reference target is not an element",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::MissingTransformRule => "no transform rule for `{}`".to_string(),
            Self::UnknownType => "cross-reference model names unknown type `{}`".to_string(),
            Self::DuplicateScopeItem => "`{}` is already registered in this scope".to_string(),
            Self::UnresolvedReference => "cannot find `{}`".to_string(),
            Self::AmbiguousReference => "`{}` matches more than one element".to_string(),

            // Standard pattern: fallback + context
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    Info,
    Warning,
    #[default]
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Processing stage that raised a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Derivation,
    Syntax,
    Semantic,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Derivation => write!(f, "derivation"),
            Phase::Syntax => write!(f, "syntax"),
            Phase::Semantic => write!(f, "semantic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub phase: Phase,
    /// ASM path or rule name the diagnostic refers to.
    pub location: Option<String>,
    pub message: String,
    pub data: Option<String>,
}

impl DiagnosticMessage {
    pub(crate) fn with_default_message(kind: DiagnosticKind) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            phase: kind.default_phase(),
            location: None,
            message: kind.fallback_message().to_owned(),
            data: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.phase, self.message)?;
        if let Some(location) = &self.location {
            write!(f, " (at {location})")?;
        }
        if let Some(data) = &self.data {
            write!(f, " (data: {data})")?;
        }
        Ok(())
    }
}
