//! Parse-tree view consumed from the external parser.
//!
//! A rule node carries its rule name. Everything between a rule node and the
//! nodes of the rules it references is spelled out by pseudo nodes (no rule
//! name), one per rule item:
//!
//! - leaf rule: a token with the rule name and the matched text
//! - concatenation: one child per item
//! - choice: the chosen option and a single child
//! - optional: zero or one child
//! - list: one child per element; a separated list interleaves separators
//! - group: a single child, the node of the grouped item
//!
//! A rule node's own children follow the rule body: one child per item for a
//! concatenation body, option plus a single child for a choice body, and a
//! single child for any other body. Skip rules never appear.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseNode {
    Token {
        rule: Option<String>,
        text: String,
    },
    Branch {
        rule: Option<String>,
        option: usize,
        children: Vec<ParseNode>,
    },
}

impl ParseNode {
    /// A literal or pattern match that is not a rule of its own.
    pub fn token(text: impl Into<String>) -> Self {
        Self::Token {
            rule: None,
            text: text.into(),
        }
    }

    /// A leaf rule match.
    pub fn leaf(rule: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Token {
            rule: Some(rule.into()),
            text: text.into(),
        }
    }

    pub fn rule(rule: impl Into<String>, children: Vec<ParseNode>) -> Self {
        Self::Branch {
            rule: Some(rule.into()),
            option: 0,
            children,
        }
    }

    /// A choice-bodied rule that matched alternative `option`.
    pub fn rule_option(rule: impl Into<String>, option: usize, child: ParseNode) -> Self {
        Self::Branch {
            rule: Some(rule.into()),
            option,
            children: vec![child],
        }
    }

    /// Pseudo node for a concatenation, list, optional or group.
    pub fn seq(children: Vec<ParseNode>) -> Self {
        Self::Branch {
            rule: None,
            option: 0,
            children,
        }
    }

    /// Pseudo node for a nested choice.
    pub fn alt(option: usize, child: ParseNode) -> Self {
        Self::Branch {
            rule: None,
            option,
            children: vec![child],
        }
    }

    /// Pseudo node for an absent optional or an empty list.
    pub fn empty() -> Self {
        Self::seq(Vec::new())
    }

    pub fn rule_name(&self) -> Option<&str> {
        match self {
            Self::Token { rule, .. } | Self::Branch { rule, .. } => rule.as_deref(),
        }
    }

    pub fn option(&self) -> usize {
        match self {
            Self::Token { .. } => 0,
            Self::Branch { option, .. } => *option,
        }
    }

    pub fn children(&self) -> &[ParseNode] {
        match self {
            Self::Token { .. } => &[],
            Self::Branch { children, .. } => children,
        }
    }

    /// Matched text of the whole subtree.
    pub fn text(&self) -> String {
        match self {
            Self::Token { text, .. } => text.clone(),
            Self::Branch { children, .. } => children.iter().map(Self::text).collect(),
        }
    }
}
