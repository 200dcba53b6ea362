//! Expression lowering
//!
//! Each rule receives the node, lowers its children first and combines their
//! code objects. Operands are turned into rvals as soon as they are
//! generated, so temporaries appear in the listing in allocation order.

mod literals;
mod arithmetic;
mod pointer_ops;
mod calls;
mod conditions;

use super::{CodeGenerator, CodeObject, CodegenError};
use crate::ast::{Expression, ExpressionKind};

impl<'a> CodeGenerator<'a> {
    /// Lower one expression
    pub fn generate_expression(&mut self, expr: &Expression) -> Result<CodeObject, CodegenError> {
        let span = &expr.span;
        match &expr.kind {
            ExpressionKind::IntLiteral(value) => Ok(literals::generate_int(self, *value)),
            
            ExpressionKind::FloatLiteral(value) => Ok(literals::generate_float(self, *value)),
            
            ExpressionKind::Variable { symbol, .. } => {
                // Validate the binding now; the load is deferred to the consumer
                self.symbol(*symbol, span)?;
                Ok(CodeObject::variable(*symbol, expr.expr_type.clone()))
            }
            
            ExpressionKind::Unary { op, operand } => arithmetic::generate_unary(self, *op, operand, span),
            
            ExpressionKind::Binary { op, left, right } => {
                arithmetic::generate_binary(self, *op, left, right, span)
            }
            
            ExpressionKind::Compare { op, left, right } => {
                conditions::generate_compare(self, *op, left, right, span)
            }
            
            ExpressionKind::Cast { target, operand } => arithmetic::generate_cast(self, target, operand, span),
            
            ExpressionKind::Deref(operand) => pointer_ops::generate_deref(self, operand, span),
            
            ExpressionKind::AddressOf(operand) => pointer_ops::generate_address_of(self, operand, span),
            
            ExpressionKind::Call { function, symbol, arguments } => {
                calls::generate_call(self, function, *symbol, arguments, span)
            }
            
            ExpressionKind::Malloc(size) => calls::generate_malloc(self, size, span),
            
            ExpressionKind::Free(pointer) => calls::generate_free(self, pointer, span),
        }
    }
    
    /// Lower an expression and load its value
    pub fn generate_rvalue(&mut self, expr: &Expression) -> Result<CodeObject, CodegenError> {
        let co = self.generate_expression(expr)?;
        self.rvalify(co, &expr.span)
    }
}
