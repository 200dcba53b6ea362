//! Literal lowering

use super::super::{CodeGenerator, CodeObject};
use mcc_codegen::AsmInst;
use mcc_common::Type;

pub fn generate_int(gen: &mut CodeGenerator, value: i64) -> CodeObject {
    let dest = gen.temps.fresh_int();
    CodeObject::rval(vec![AsmInst::Li(dest, value)], dest, Type::Int)
}

pub fn generate_float(gen: &mut CodeGenerator, value: f64) -> CodeObject {
    let dest = gen.temps.fresh_float();
    CodeObject::rval(vec![AsmInst::FImm(dest, value)], dest, Type::Float)
}
