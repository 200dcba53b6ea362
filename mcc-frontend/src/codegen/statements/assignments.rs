//! Assignment lowering
//!
//! The store is chosen by the destination's declared type. The right-hand
//! side is converted to that type first.

use super::super::{location, register_class, CodeGenerator, CodeObject, CodegenError};
use crate::ast::Expression;
use mcc_codegen::{AsmInst, RegClass};
use mcc_common::SourceSpan;

pub fn generate_assign(
    gen: &mut CodeGenerator,
    target: &Expression,
    value: &Expression,
    span: &SourceSpan,
) -> Result<CodeObject, CodegenError> {
    let rhs = gen.generate_rvalue(value)?;
    
    let mut lhs = gen.generate_expression(target)?;
    if !lhs.lval {
        return Err(CodegenError::invariant(
            "assignment target is not an lval",
            &location(span),
        ));
    }
    
    let mut code = rhs.code.clone();
    let addr = gen.lval_address(&mut lhs, span)?;
    code.extend(lhs.code);
    
    let dest_type = lhs.ty;
    let class = register_class(&dest_type).ok_or_else(|| {
        CodegenError::type_shape(format!("cannot assign to a {} location", dest_type), &location(span))
    })?;
    
    let converted = gen.coerce(CodeObject { code: Vec::new(), ..rhs }, &dest_type, &value.span)?;
    let src = gen.value_reg(&converted, &value.span)?;
    code.extend(converted.code);
    
    code.push(match class {
        RegClass::Float => AsmInst::Fsw(src, addr, 0),
        RegClass::Int => AsmInst::Sw(src, addr, 0),
    });
    
    // The destination address stays available to the caller
    let mut co = CodeObject::new(dest_type);
    co.code = code;
    co.temp = Some(addr);
    Ok(co)
}
