//! Pointer dereference and address-of

use super::super::{location, CodeGenerator, CodeObject, CodegenError};
use crate::ast::Expression;
use mcc_common::{SourceSpan, Type};

/// `*expr`: the pointer value becomes the address of an lval
pub fn generate_deref(
    gen: &mut CodeGenerator,
    operand: &Expression,
    span: &SourceSpan,
) -> Result<CodeObject, CodegenError> {
    let pointer = gen.generate_rvalue(operand)?;
    let pointee = pointer.ty.unwrap().map_err(|e| {
        CodegenError::type_shape(format!("cannot dereference: {}", e), &location(span))
    })?;
    let addr = gen.value_reg(&pointer, span)?;
    
    Ok(CodeObject::address(pointer.code, addr, pointee))
}

/// `&expr`: a variable's address is materialised, anything else reuses its temp
pub fn generate_address_of(
    gen: &mut CodeGenerator,
    operand: &Expression,
    span: &SourceSpan,
) -> Result<CodeObject, CodegenError> {
    let mut target = gen.generate_expression(operand)?;
    let ty = Type::pointer_to(target.ty.clone());
    
    let addr = if let Some(symbol) = target.variable.filter(|_| target.lval) {
        let (code, addr) = gen.variable_address(symbol, span)?;
        target.code.extend(code);
        addr
    } else {
        gen.value_reg(&target, span)?
    };
    
    Ok(CodeObject::rval(target.code, addr, ty))
}
