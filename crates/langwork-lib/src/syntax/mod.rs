//! Syntax analysis: parse tree to ASM.

mod analyser;
mod parse_tree;

#[cfg(test)]
mod analyser_tests;

pub use analyser::SyntaxAnalyser;
pub use parse_tree::ParseNode;
