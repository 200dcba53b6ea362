//! Statement AST nodes for MicroC
//! 
//! This module defines statements, function definitions and the program root.
//! Variable declarations do not appear here; they live only in the symbol table.

use super::expressions::Expression;
use mcc_common::{HasSpan, SourceSpan, SymbolId, Type};
use serde::{Deserialize, Serialize};

/// AST Statement nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    /// `lhs = rhs;`
    Assign {
        target: Expression,
        value: Expression,
    },
    
    /// `read(x);`
    Read(Expression),
    
    /// `print(expr);`
    Print(Expression),
    
    /// `return expr;` or `return;`
    Return(Option<Expression>),
    
    If {
        condition: Expression,
        then_branch: Vec<Statement>,
        else_branch: Option<Vec<Statement>>,
    },
    
    While {
        condition: Expression,
        body: Vec<Statement>,
    },
    
    /// A call, `malloc` or `free` evaluated for its side effects
    Call(Expression),
}

impl Statement {
    pub fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            span: SourceSpan::dummy(),
        }
    }
    
    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = span;
        self
    }
}

impl HasSpan for Statement {
    fn span(&self) -> SourceSpan {
        self.span.clone()
    }
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub param_type: Type,
    pub symbol: SymbolId,
}

/// Function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub symbol: SymbolId,
    pub return_type: Type,
    pub parameters: Vec<Parameter>,
    pub body: Vec<Statement>,
    pub span: SourceSpan,
}

/// Program root: the function definitions in source order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub functions: Vec<FunctionDefinition>,
}
