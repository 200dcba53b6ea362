//! Relational conditions
//!
//! A comparison emits only its operand code. The branch itself is chosen by
//! the enclosing `if`/`while`, which knows the target label.

use super::super::{location, CodeGenerator, CodeObject, CodegenError, Comparison};
use crate::ast::{Expression, RelOp};
use mcc_codegen::AsmInst;
use mcc_common::{SourceSpan, Type};

pub fn generate_compare(
    gen: &mut CodeGenerator,
    op: RelOp,
    left: &Expression,
    right: &Expression,
    span: &SourceSpan,
) -> Result<CodeObject, CodegenError> {
    let lhs = gen.generate_rvalue(left)?;
    let rhs = gen.generate_rvalue(right)?;
    
    let mut l = gen.value_reg(&lhs, &left.span)?;
    let mut r = gen.value_reg(&rhs, &right.span)?;
    
    let operand_type = match (&lhs.ty, &rhs.ty) {
        (a, b) if a.is_float() || b.is_float() => {
            if !(a.is_numeric() && b.is_numeric()) {
                return Err(CodegenError::type_shape(
                    format!("cannot compare {} with {}", a, b),
                    &location(span),
                ));
            }
            Type::Float
        }
        (a, b) if a.is_integer_class() && b.is_integer_class() => Type::Int,
        (a, b) => {
            return Err(CodegenError::type_shape(
                format!("cannot compare {} with {}", a, b),
                &location(span),
            ));
        }
    };
    
    let mut co = CodeObject::new(Type::Int);
    co.code = lhs.code;
    co.code.extend(rhs.code);
    
    if operand_type == Type::Float {
        if lhs.ty == Type::Int {
            let widened = gen.temps.fresh_float();
            co.code.push(AsmInst::IntToFloat(widened, l));
            l = widened;
        }
        if rhs.ty == Type::Int {
            let widened = gen.temps.fresh_float();
            co.code.push(AsmInst::IntToFloat(widened, r));
            r = widened;
        }
    }
    
    co.comparison = Some(Comparison {
        op,
        left: l,
        right: r,
        operand_type,
    });
    Ok(co)
}
