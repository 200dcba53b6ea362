//! `read` and `print` lowering

use super::super::{location, CodeGenerator, CodeObject, CodegenError};
use crate::ast::Expression;
use mcc_codegen::{AsmInst, Reg};
use mcc_common::{SourceSpan, Storage, Type};

pub fn generate_read(
    gen: &mut CodeGenerator,
    target: &Expression,
    span: &SourceSpan,
) -> Result<CodeObject, CodegenError> {
    let lhs = gen.generate_expression(target)?;
    let symbol = lhs.variable.filter(|_| lhs.lval).ok_or_else(|| {
        CodegenError::invariant("read target must be a variable", &location(span))
    })?;
    let var = gen.symbol(symbol, span)?.as_variable().ok_or_else(|| {
        CodegenError::invariant("read target must be a variable", &location(span))
    })?;
    
    let (value, float) = match &var.ty {
        Type::Int => (gen.temps.fresh_int(), false),
        Type::Float => (gen.temps.fresh_float(), true),
        other => {
            return Err(CodegenError::type_shape(
                format!("cannot read a value of type {}", other),
                &location(span),
            ));
        }
    };
    
    let mut code = vec![if float { AsmInst::GetF(value) } else { AsmInst::GetI(value) }];
    let store = |base: Reg, offset: i32| {
        if float {
            AsmInst::Fsw(value, base, offset)
        } else {
            AsmInst::Sw(value, base, offset)
        }
    };
    
    match &var.storage {
        Storage::Local { offset } => code.push(store(Reg::Fp, *offset)),
        Storage::Global { label } => {
            let addr = gen.temps.fresh_int();
            code.push(AsmInst::La(addr, label.clone()));
            code.push(store(addr, 0));
        }
    }
    
    Ok(CodeObject::rval(code, value, var.ty.clone()))
}

pub fn generate_print(
    gen: &mut CodeGenerator,
    value: &Expression,
    span: &SourceSpan,
) -> Result<CodeObject, CodegenError> {
    let co = gen.generate_expression(value)?;
    
    if co.ty == Type::Str {
        let symbol = co.variable.filter(|_| co.lval).ok_or_else(|| {
            CodegenError::type_shape("printing a string requires a string variable", &location(span))
        })?;
        let (mut code, addr) = gen.variable_address(symbol, span)?;
        code.push(AsmInst::PutS(addr));
        
        let mut printed = CodeObject::new(Type::Void);
        printed.code = code;
        return Ok(printed);
    }
    
    let co = gen.rvalify(co, span)?;
    let reg = gen.value_reg(&co, span)?;
    let inst = match &co.ty {
        Type::Int | Type::Ptr(_) | Type::Infer => AsmInst::PutI(reg),
        Type::Float => AsmInst::PutF(reg),
        other => {
            return Err(CodegenError::type_shape(
                format!("cannot print a value of type {}", other),
                &location(span),
            ));
        }
    };
    
    let mut printed = CodeObject::new(Type::Void);
    printed.code = co.code;
    printed.code.push(inst);
    Ok(printed)
}
