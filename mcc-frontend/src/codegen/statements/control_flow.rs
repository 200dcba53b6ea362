//! `if` and `while` lowering
//!
//! Conditions arrive as comparison code objects. The branch emitted here
//! jumps away when the condition is false, so the fall-through path is
//! always the taken body.

use super::super::{location, CodeGenerator, CodeObject, CodegenError, Comparison};
use crate::ast::{Expression, RelOp, Statement};
use mcc_codegen::{AsmInst, Reg};
use mcc_common::{SourceSpan, Type};
use log::trace;

/// Instructions that jump to `target` when `cmp` does not hold
fn branch_if_false(gen: &mut CodeGenerator, cmp: &Comparison, target: &str) -> Vec<AsmInst> {
    let (l, r) = (cmp.left, cmp.right);
    let target = target.to_string();
    
    if cmp.operand_type != Type::Float {
        let inst = match cmp.op.negate() {
            RelOp::Less => AsmInst::Blt(l, r, target),
            RelOp::LessEqual => AsmInst::Ble(l, r, target),
            RelOp::Greater => AsmInst::Bgt(l, r, target),
            RelOp::GreaterEqual => AsmInst::Bge(l, r, target),
            RelOp::Equal => AsmInst::Beq(l, r, target),
            RelOp::NotEqual => AsmInst::Bne(l, r, target),
        };
        return vec![inst];
    }
    
    // Float compares set an integer flag, 1 when the relation holds
    let flag = gen.temps.fresh_int();
    match cmp.op {
        RelOp::Less => vec![AsmInst::Flt(flag, l, r), AsmInst::Beq(flag, Reg::Zero, target)],
        RelOp::LessEqual => vec![AsmInst::Fle(flag, l, r), AsmInst::Beq(flag, Reg::Zero, target)],
        RelOp::Greater => vec![AsmInst::Flt(flag, r, l), AsmInst::Beq(flag, Reg::Zero, target)],
        RelOp::GreaterEqual => vec![AsmInst::Fle(flag, r, l), AsmInst::Beq(flag, Reg::Zero, target)],
        RelOp::Equal => vec![AsmInst::Feq(flag, l, r), AsmInst::Beq(flag, Reg::Zero, target)],
        RelOp::NotEqual => vec![AsmInst::Feq(flag, l, r), AsmInst::Bne(flag, Reg::Zero, target)],
    }
}

/// Lower a condition and the branch taken when it is false
fn generate_condition(
    gen: &mut CodeGenerator,
    condition: &Expression,
    target: &str,
    span: &SourceSpan,
) -> Result<Vec<AsmInst>, CodegenError> {
    let co = gen.generate_expression(condition)?;
    let cmp = co.comparison.clone().ok_or_else(|| {
        CodegenError::invariant("condition is not a comparison", &location(span))
    })?;
    
    let mut code = co.code;
    code.extend(branch_if_false(gen, &cmp, target));
    Ok(code)
}

pub fn generate_if(
    gen: &mut CodeGenerator,
    condition: &Expression,
    then_branch: &[Statement],
    else_branch: Option<&[Statement]>,
) -> Result<CodeObject, CodegenError> {
    let out_label = gen.labels.next_out();
    let else_label = else_branch.map(|_| gen.labels.next_else());
    trace!("if: out={} else={:?}", out_label, else_label);
    
    let false_target = else_label.as_deref().unwrap_or(&out_label);
    let mut code = generate_condition(gen, condition, false_target, &condition.span)?;
    
    let then_co = gen.generate_block(then_branch)?;
    code.extend(then_co.code);
    
    if let (Some(else_label), Some(else_branch)) = (else_label, else_branch) {
        code.push(AsmInst::J(out_label.clone()));
        code.push(AsmInst::Label(else_label));
        let else_co = gen.generate_block(else_branch)?;
        code.extend(else_co.code);
    }
    
    code.push(AsmInst::Label(out_label));
    
    let mut co = CodeObject::new(Type::Void);
    co.code = code;
    Ok(co)
}

pub fn generate_while(
    gen: &mut CodeGenerator,
    condition: &Expression,
    body: &[Statement],
) -> Result<CodeObject, CodegenError> {
    let loop_label = gen.labels.next_loop();
    let out_label = gen.labels.next_out();
    trace!("while: loop={} out={}", loop_label, out_label);
    
    let mut code = vec![AsmInst::Label(loop_label.clone())];
    code.extend(generate_condition(gen, condition, &out_label, &condition.span)?);
    
    let body_co = gen.generate_block(body)?;
    code.extend(body_co.code);
    
    code.push(AsmInst::J(loop_label));
    code.push(AsmInst::Label(out_label));
    
    let mut co = CodeObject::new(Type::Void);
    co.code = code;
    Ok(co)
}
