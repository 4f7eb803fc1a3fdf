//! Expressions used by the cross-reference model.

use std::fmt;

use crate::transform::{Navigation, NavigationError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpressionError {
    #[error("empty expression")]
    Empty,
    #[error("unterminated literal `{0}`")]
    UnterminatedLiteral(String),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

/// `self`, a property navigation such as `name` or `header.name`, or a
/// quoted literal such as `'main'`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Expression {
    SelfRef,
    Navigation(Navigation),
    Literal(String),
}

impl Expression {
    pub fn parse(text: &str) -> Result<Self, ExpressionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ExpressionError::Empty);
        }
        if let Some(rest) = text.strip_prefix('\'') {
            return rest
                .strip_suffix('\'')
                .map(|literal| Self::Literal(literal.to_owned()))
                .ok_or_else(|| ExpressionError::UnterminatedLiteral(text.to_owned()));
        }
        let navigation = Navigation::parse(text)?;
        if navigation.is_self() {
            return Ok(Self::SelfRef);
        }
        Ok(Self::Navigation(navigation))
    }

    /// Shorthand for a navigation over property names.
    pub fn property_path(names: &[&str]) -> Self {
        let mut segments = names.iter();
        match segments.next() {
            None => Self::SelfRef,
            Some(first) => Self::Navigation(
                segments.fold(Navigation::property(*first), |nav, name| nav.then_property(*name)),
            ),
        }
    }
}

impl TryFrom<String> for Expression {
    type Error = ExpressionError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::parse(&text)
    }
}

impl From<Expression> for String {
    fn from(expression: Expression) -> Self {
        expression.to_string()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfRef => write!(f, "self"),
            Self::Navigation(navigation) => write!(f, "{navigation}"),
            Self::Literal(literal) => write!(f, "'{literal}'"),
        }
    }
}
