//! Unary minus, binary arithmetic and casts

use super::super::{location, CodeGenerator, CodeObject, CodegenError};
use crate::ast::{ArithOp, Expression, UnaryOp};
use mcc_codegen::{AsmInst, Reg};
use mcc_common::{SourceSpan, Type};
use log::trace;

pub fn generate_unary(
    gen: &mut CodeGenerator,
    op: UnaryOp,
    operand: &Expression,
    span: &SourceSpan,
) -> Result<CodeObject, CodegenError> {
    let value = gen.generate_rvalue(operand)?;
    let src = gen.value_reg(&value, span)?;
    
    match (op, &value.ty) {
        (UnaryOp::Negate, Type::Int) => {
            let dest = gen.temps.fresh_int();
            let mut code = value.code;
            code.push(AsmInst::Neg(dest, src));
            Ok(CodeObject::rval(code, dest, Type::Int))
        }
        (UnaryOp::Negate, Type::Float) => {
            let dest = gen.temps.fresh_float();
            let mut code = value.code;
            code.push(AsmInst::FNeg(dest, src));
            Ok(CodeObject::rval(code, dest, Type::Float))
        }
        (UnaryOp::Negate, other) => Err(CodegenError::type_shape(
            format!("cannot negate a value of type {}", other),
            &location(span),
        )),
    }
}

fn int_inst(op: ArithOp, dest: Reg, left: Reg, right: Reg) -> AsmInst {
    match op {
        ArithOp::Add => AsmInst::Add(dest, left, right),
        ArithOp::Sub => AsmInst::Sub(dest, left, right),
        ArithOp::Mul => AsmInst::Mul(dest, left, right),
        ArithOp::Div => AsmInst::Div(dest, left, right),
    }
}

fn float_inst(op: ArithOp, dest: Reg, left: Reg, right: Reg) -> AsmInst {
    match op {
        ArithOp::Add => AsmInst::FAdd(dest, left, right),
        ArithOp::Sub => AsmInst::FSub(dest, left, right),
        ArithOp::Mul => AsmInst::FMul(dest, left, right),
        ArithOp::Div => AsmInst::FDiv(dest, left, right),
    }
}

pub fn generate_binary(
    gen: &mut CodeGenerator,
    op: ArithOp,
    left: &Expression,
    right: &Expression,
    span: &SourceSpan,
) -> Result<CodeObject, CodegenError> {
    let lhs = gen.generate_rvalue(left)?;
    let rhs = gen.generate_rvalue(right)?;
    
    let result_type = op.result_type(&lhs.ty, &rhs.ty).ok_or_else(|| {
        CodegenError::type_shape(
            format!("operator '{}' cannot be applied to {} and {}", op, lhs.ty, rhs.ty),
            &location(span),
        )
    })?;
    trace!("{} {} {} -> {}", lhs.ty, op, rhs.ty, result_type);
    
    let mut l = gen.value_reg(&lhs, &left.span)?;
    let mut r = gen.value_reg(&rhs, &right.span)?;
    let is_float = result_type == Type::Float;
    
    let mut code = lhs.code;
    code.extend(rhs.code);
    
    if is_float {
        // INT operand of a mixed pair is widened before the float op
        if lhs.ty == Type::Int {
            let widened = gen.temps.fresh_float();
            code.push(AsmInst::IntToFloat(widened, l));
            l = widened;
        }
        if rhs.ty == Type::Int {
            let widened = gen.temps.fresh_float();
            code.push(AsmInst::IntToFloat(widened, r));
            r = widened;
        }
    }
    
    let dest = if is_float {
        gen.temps.fresh_float()
    } else {
        gen.temps.fresh_int()
    };
    code.push(if is_float {
        float_inst(op, dest, l, r)
    } else {
        int_inst(op, dest, l, r)
    });
    
    Ok(CodeObject::rval(code, dest, result_type))
}

pub fn generate_cast(
    gen: &mut CodeGenerator,
    target: &Type,
    operand: &Expression,
    span: &SourceSpan,
) -> Result<CodeObject, CodegenError> {
    let value = gen.generate_rvalue(operand)?;
    
    if matches!(target, Type::Str | Type::Void) {
        return Err(CodegenError::type_shape(
            format!("cannot cast to {}", target),
            &location(span),
        ));
    }
    
    gen.coerce(value, target, span)
}
