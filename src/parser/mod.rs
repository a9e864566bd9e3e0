// Row predicate parser

pub mod ast;
pub mod lexer;
pub mod predicate;

// Public API re-exports
pub use ast::{CompareOp, Literal, Predicate};
pub use predicate::parse_predicate;
