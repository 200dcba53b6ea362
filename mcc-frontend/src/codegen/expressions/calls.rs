//! Function calls and heap management
//!
//! Calling sequence, caller side:
//!
//! ```text
//!   per argument:  SW/FSW arg, 0(sp); ADDI sp, sp, -4
//!                  ADDI sp, sp, -4        # return value slot
//!                  SW ra, 0(sp); ADDI sp, sp, -4
//!                  JR func.<name>
//!                  ADDI sp, sp, 4; LW ra, 0(sp)
//!                  ADDI sp, sp, 4; LW/FLW result, 0(sp)
//!                  ADDI sp, sp, 4*M       # drop the arguments
//! ```

use super::super::{location, register_class, CodeGenerator, CodeObject, CodegenError, LabelGenerator};
use crate::ast::Expression;
use mcc_codegen::{AsmInst, Reg, RegClass};
use mcc_common::{SourceSpan, SymbolId, Type, WORD_SIZE};
use log::trace;

pub fn generate_call(
    gen: &mut CodeGenerator,
    function: &str,
    symbol: SymbolId,
    arguments: &[Expression],
    span: &SourceSpan,
) -> Result<CodeObject, CodegenError> {
    let entry = gen.symbol(symbol, span)?.as_function().ok_or_else(|| {
        CodegenError::invariant(format!("'{}' is not a function", function), &location(span))
    })?;
    
    if entry.param_types().len() != arguments.len() {
        return Err(CodegenError::type_shape(
            format!(
                "'{}' expects {} arguments, found {}",
                function,
                entry.param_types().len(),
                arguments.len()
            ),
            &location(span),
        ));
    }
    
    let mut code = Vec::new();
    for (arg, param_type) in arguments.iter().zip(entry.param_types()) {
        let value = gen.generate_rvalue(arg)?;
        let value = gen.coerce(value, param_type, &arg.span)?;
        let reg = gen.value_reg(&value, &arg.span)?;
        code.extend(value.code);
        code.push(match reg.class() {
            RegClass::Float => AsmInst::Fsw(reg, Reg::Sp, 0),
            RegClass::Int => AsmInst::Sw(reg, Reg::Sp, 0),
        });
        code.push(AsmInst::AddI(Reg::Sp, Reg::Sp, -WORD_SIZE));
    }
    
    code.push(AsmInst::AddI(Reg::Sp, Reg::Sp, -WORD_SIZE));
    code.push(AsmInst::Sw(Reg::Ra, Reg::Sp, 0));
    code.push(AsmInst::AddI(Reg::Sp, Reg::Sp, -WORD_SIZE));
    code.push(AsmInst::Call(LabelGenerator::function(function)));
    code.push(AsmInst::AddI(Reg::Sp, Reg::Sp, WORD_SIZE));
    code.push(AsmInst::Lw(Reg::Ra, Reg::Sp, 0));
    code.push(AsmInst::AddI(Reg::Sp, Reg::Sp, WORD_SIZE));
    
    // Void calls still pop the slot into an integer temporary
    let return_type = entry.return_type.clone();
    let result = match register_class(&return_type) {
        Some(RegClass::Float) => {
            let dest = gen.temps.fresh_float();
            code.push(AsmInst::Flw(dest, Reg::Sp, 0));
            dest
        }
        _ => {
            let dest = gen.temps.fresh_int();
            code.push(AsmInst::Lw(dest, Reg::Sp, 0));
            dest
        }
    };
    
    if !arguments.is_empty() {
        code.push(AsmInst::AddI(Reg::Sp, Reg::Sp, WORD_SIZE * arguments.len() as i32));
    }
    trace!("call {} with {} arguments -> {}", function, arguments.len(), result);
    
    Ok(CodeObject::rval(code, result, return_type))
}

pub fn generate_malloc(
    gen: &mut CodeGenerator,
    size: &Expression,
    span: &SourceSpan,
) -> Result<CodeObject, CodegenError> {
    let value = gen.generate_rvalue(size)?;
    if value.ty != Type::Int {
        return Err(CodegenError::type_shape(
            format!("malloc size must be INT, found {}", value.ty),
            &location(span),
        ));
    }
    
    let src = gen.value_reg(&value, span)?;
    let dest = gen.temps.fresh_int();
    let mut code = value.code;
    code.push(AsmInst::Malloc(dest, src));
    Ok(CodeObject::rval(code, dest, Type::Infer))
}

pub fn generate_free(
    gen: &mut CodeGenerator,
    pointer: &Expression,
    span: &SourceSpan,
) -> Result<CodeObject, CodegenError> {
    let value = gen.generate_rvalue(pointer)?;
    if !value.ty.is_pointer() {
        return Err(CodegenError::type_shape(
            format!("free expects a pointer, found {}", value.ty),
            &location(span),
        ));
    }
    
    let src = gen.value_reg(&value, span)?;
    let mut co = CodeObject::new(Type::Void);
    co.code = value.code;
    co.code.push(AsmInst::Free(src));
    Ok(co)
}
