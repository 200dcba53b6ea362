//! Statement lowering

mod assignments;
mod io;
mod control_flow;
mod jumps;

pub use control_flow::{generate_if, generate_while};

use super::{CodeGenerator, CodeObject, CodegenError};
use crate::ast::{Statement, StatementKind};
use mcc_common::Type;

impl<'a> CodeGenerator<'a> {
    /// Lower one statement
    pub fn generate_statement(&mut self, stmt: &Statement) -> Result<CodeObject, CodegenError> {
        let span = &stmt.span;
        match &stmt.kind {
            StatementKind::Assign { target, value } => {
                assignments::generate_assign(self, target, value, span)
            }
            
            StatementKind::Read(target) => io::generate_read(self, target, span),
            
            StatementKind::Print(value) => io::generate_print(self, value, span),
            
            StatementKind::Return(value) => jumps::generate_return(self, value.as_ref(), span),
            
            StatementKind::If { condition, then_branch, else_branch } => {
                control_flow::generate_if(self, condition, then_branch, else_branch.as_deref())
            }
            
            StatementKind::While { condition, body } => {
                control_flow::generate_while(self, condition, body)
            }
            
            // The produced value, if any, is discarded
            StatementKind::Call(call) => self.generate_expression(call),
        }
    }
    
    /// Lower a statement list in order
    pub fn generate_block(&mut self, statements: &[Statement]) -> Result<CodeObject, CodegenError> {
        let mut block = CodeObject::new(Type::Void);
        for stmt in statements {
            let co = self.generate_statement(stmt)?;
            block.append(co);
        }
        Ok(block)
    }
}
