//! Abstract syntax model (ASM) built by syntax analysis and annotated by
//! semantic analysis.

mod dump;
mod model;
mod walk;


pub use model::{Asm, AsmPath, AsmReference, AsmStructure, AsmValue, ElementId, ReferenceTarget};
pub use walk::{AsmWalker, walk, walk_structure, walk_value};
