//! The code generator's working value
//!
//! Each visited node yields one [`CodeObject`]: the instructions computing it,
//! the temporary holding the result, and whether that result is an address
//! still to be loaded (lval) or a value (rval). Comparisons leave the branch
//! unemitted and record their operands so `if`/`while` can pick the branch.

use crate::ast::RelOp;
use mcc_codegen::{AsmInst, Reg};
use mcc_common::{SymbolId, Type};

/// Deferred comparison metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub op: RelOp,
    pub left: Reg,
    pub right: Reg,
    /// INT for integer-class operands, FLOAT when a float compare is needed
    pub operand_type: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeObject {
    pub code: Vec<AsmInst>,
    pub temp: Option<Reg>,
    pub lval: bool,
    pub ty: Type,
    /// Plain variable backing an lval whose address is not yet materialised
    pub variable: Option<SymbolId>,
    pub comparison: Option<Comparison>,
}

impl CodeObject {
    /// Empty rval with no result
    pub fn new(ty: Type) -> Self {
        Self {
            code: Vec::new(),
            temp: None,
            lval: false,
            ty,
            variable: None,
            comparison: None,
        }
    }

    pub fn rval(code: Vec<AsmInst>, temp: Reg, ty: Type) -> Self {
        Self {
            code,
            temp: Some(temp),
            ..Self::new(ty)
        }
    }

    /// Reference to a variable; no instructions until it is used
    pub fn variable(symbol: SymbolId, ty: Type) -> Self {
        Self {
            lval: true,
            variable: Some(symbol),
            ..Self::new(ty)
        }
    }

    /// Address held in `temp`, to be loaded when used as a value
    pub fn address(code: Vec<AsmInst>, temp: Reg, ty: Type) -> Self {
        Self {
            code,
            temp: Some(temp),
            lval: true,
            ..Self::new(ty)
        }
    }

    pub fn is_variable(&self) -> bool {
        self.lval && self.variable.is_some()
    }

    /// Append another object's instructions, consuming it
    pub fn append(&mut self, other: CodeObject) {
        self.code.extend(other.code);
    }
}
