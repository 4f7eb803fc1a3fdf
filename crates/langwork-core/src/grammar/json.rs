//! JSON deserialization for grammar definitions.
//!
//! Rule items use internally-tagged objects with a `type` field, in the
//! spirit of tree-sitter's `grammar.json`.

use indexmap::IndexMap;
use serde::Deserialize;

use super::types::{Grammar, ItemId};

/// Error during grammar loading or validation.
#[derive(Debug)]
pub enum GrammarError {
    Json(serde_json::Error),
    UnknownGrammar(String),
    UnknownRule { grammar: String, rule: String },
}

impl std::fmt::Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::UnknownGrammar(name) => write!(f, "grammar `{name}` is not defined"),
            Self::UnknownRule { grammar, rule } => {
                write!(f, "rule `{rule}` is not defined in grammar `{grammar}`")
            }
        }
    }
}

impl std::error::Error for GrammarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::UnknownGrammar(_) | Self::UnknownRule { .. } => None,
        }
    }
}

impl Grammar {
    /// Parse grammar from JSON string.
    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        let raw: RawGrammar = serde_json::from_str(json).map_err(GrammarError::Json)?;
        Ok(raw.into())
    }
}

#[derive(Debug, Deserialize)]
struct RawGrammar {
    #[serde(default)]
    namespace: String,
    name: String,
    #[serde(default)]
    extends: Vec<String>,
    rules: IndexMap<String, RawGrammarRule>,
}

#[derive(Debug, Deserialize)]
struct RawGrammarRule {
    #[serde(default)]
    leaf: bool,
    #[serde(default)]
    skip: bool,
    rhs: RawItem,
}

/// Raw rule item matching the JSON format.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
#[allow(clippy::upper_case_acronyms, non_camel_case_types)]
enum RawItem {
    EMPTY,
    LITERAL {
        value: String,
    },
    PATTERN {
        value: String,
    },
    SYMBOL {
        name: String,
    },
    EMBEDDED {
        grammar: String,
        goal: String,
    },
    SEQ {
        members: Vec<RawItem>,
    },
    CHOICE {
        members: Vec<RawItem>,
    },
    OPTIONAL {
        content: Box<RawItem>,
    },
    LIST {
        content: Box<RawItem>,
        #[serde(default)]
        min: u32,
        #[serde(default)]
        max: Option<u32>,
    },
    SEPARATED_LIST {
        content: Box<RawItem>,
        separator: Box<RawItem>,
        #[serde(default)]
        min: u32,
        #[serde(default)]
        max: Option<u32>,
    },
    GROUP {
        content: Box<RawItem>,
    },
}

impl From<RawGrammar> for Grammar {
    fn from(raw: RawGrammar) -> Self {
        // IndexMap preserves definition order; the goal rule comes first.
        let mut grammar = Grammar::new(raw.namespace, raw.name);
        grammar.extends = raw.extends;
        for (name, rule) in raw.rules {
            let rhs = lower(&mut grammar, rule.rhs);
            let added = grammar.add_rule(name, rhs);
            added.leaf = rule.leaf;
            added.skip = rule.skip;
        }
        grammar
    }
}

fn lower(grammar: &mut Grammar, item: RawItem) -> ItemId {
    match item {
        RawItem::EMPTY => grammar.empty(),
        RawItem::LITERAL { value } => grammar.literal(value),
        RawItem::PATTERN { value } => grammar.pattern(value),
        RawItem::SYMBOL { name } => grammar.nonterminal(name),
        RawItem::EMBEDDED { grammar: g, goal } => grammar.embedded(g, goal),
        RawItem::SEQ { members } => {
            let items: Vec<_> = members.into_iter().map(|m| lower(grammar, m)).collect();
            grammar.concatenation(items)
        }
        RawItem::CHOICE { members } => {
            let items: Vec<_> = members.into_iter().map(|m| lower(grammar, m)).collect();
            grammar.choice(items)
        }
        RawItem::OPTIONAL { content } => {
            let inner = lower(grammar, *content);
            grammar.optional(inner)
        }
        RawItem::LIST { content, min, max } => {
            let inner = lower(grammar, *content);
            grammar.list(inner, min, max)
        }
        RawItem::SEPARATED_LIST {
            content,
            separator,
            min,
            max,
        } => {
            let inner = lower(grammar, *content);
            let sep = lower(grammar, *separator);
            grammar.separated_list(inner, sep, min, max)
        }
        RawItem::GROUP { content } => {
            let inner = lower(grammar, *content);
            grammar.group(inner)
        }
    }
}
