//! Typed abstract syntax tree for MicroC
//! 
//! The tree is built once by the parser (or by hand in tests), with every
//! node already carrying its static type, and is read-only afterwards.

pub mod ops;
pub mod expressions;
pub mod statements;

// Re-export commonly used types at module level
pub use ops::{ArithOp, RelOp, UnaryOp};
pub use expressions::{Expression, ExpressionKind};
pub use statements::{FunctionDefinition, Parameter, Program, Statement, StatementKind};
