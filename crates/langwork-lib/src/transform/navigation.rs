//! Navigation expressions over parse nodes and ASM values.

use std::fmt;

/// One step of a navigation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NavigationSegment {
    /// `child[i]`: the i-th child of a parse node.
    Child(usize),
    /// `name`: a property of an ASM structure.
    Property(String),
}

/// A chain such as `child[1].name`. The empty chain is `self`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Navigation {
    segments: Vec<NavigationSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("empty navigation segment in `{0}`")]
    EmptySegment(String),
    #[error("invalid child index in `{0}`")]
    InvalidChildIndex(String),
}

impl Navigation {
    /// The empty navigation, rendered as `self`.
    pub fn self_ref() -> Self {
        Self::default()
    }

    pub fn child(index: usize) -> Self {
        Self {
            segments: vec![NavigationSegment::Child(index)],
        }
    }

    pub fn property(name: impl Into<String>) -> Self {
        Self {
            segments: vec![NavigationSegment::Property(name.into())],
        }
    }

    pub fn then_property(mut self, name: impl Into<String>) -> Self {
        self.segments.push(NavigationSegment::Property(name.into()));
        self
    }

    pub fn segments(&self) -> &[NavigationSegment] {
        &self.segments
    }

    pub fn is_self(&self) -> bool {
        self.segments.is_empty()
    }

    /// Parse `self`, `child[2]`, `name` or a dotted chain of those.
    pub fn parse(text: &str) -> Result<Self, NavigationError> {
        let text = text.trim();
        if text == "self" {
            return Ok(Self::self_ref());
        }
        let mut segments = Vec::new();
        for part in text.split('.') {
            let part = part.trim();
            if part.is_empty() {
                return Err(NavigationError::EmptySegment(text.to_owned()));
            }
            let segment = match part.strip_prefix("child[") {
                Some(rest) => {
                    let index = rest
                        .strip_suffix(']')
                        .and_then(|digits| digits.parse().ok())
                        .ok_or_else(|| NavigationError::InvalidChildIndex(text.to_owned()))?;
                    NavigationSegment::Child(index)
                }
                None => NavigationSegment::Property(part.to_owned()),
            };
            segments.push(segment);
        }
        Ok(Self { segments })
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "self");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            match segment {
                NavigationSegment::Child(index) => write!(f, "child[{index}]")?,
                NavigationSegment::Property(name) => write!(f, "{name}")?,
            }
        }
        Ok(())
    }
}
