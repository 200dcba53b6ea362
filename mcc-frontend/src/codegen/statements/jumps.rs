//! `return` lowering
//!
//! The value is stored into the caller's return slot at `8(fp)` and control
//! jumps to the function's shared epilogue.

use super::super::{location, register_class, CodeGenerator, CodeObject, CodegenError, LabelGenerator};
use crate::ast::Expression;
use mcc_codegen::{AsmInst, Reg, RegClass};
use mcc_common::{SourceSpan, Type, RETURN_SLOT_OFFSET};

pub fn generate_return(
    gen: &mut CodeGenerator,
    value: Option<&Expression>,
    span: &SourceSpan,
) -> Result<CodeObject, CodegenError> {
    let function = gen.current_function.clone().ok_or_else(|| {
        CodegenError::invariant("return outside of a function", &location(span))
    })?;
    
    // The stored value stays available as the statement's result
    let mut co = match value {
        Some(value) => {
            let class = register_class(&function.return_type).ok_or_else(|| {
                CodegenError::type_shape(
                    format!("function '{}' returns {} but a value was given", function.name, function.return_type),
                    &location(span),
                )
            })?;
            
            let result = gen.generate_rvalue(value)?;
            let result = gen.coerce(result, &function.return_type, &value.span)?;
            let reg = gen.value_reg(&result, &value.span)?;
            let mut code = result.code;
            code.push(match class {
                RegClass::Float => AsmInst::Fsw(reg, Reg::Fp, RETURN_SLOT_OFFSET),
                RegClass::Int => AsmInst::Sw(reg, Reg::Fp, RETURN_SLOT_OFFSET),
            });
            CodeObject::rval(code, reg, function.return_type.clone())
        }
        None => CodeObject::new(Type::Void),
    };
    
    co.code.push(AsmInst::J(LabelGenerator::function_return(&function.name)));
    Ok(co)
}
