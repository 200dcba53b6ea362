//! MicroC target instruction definitions
//!
//! This module defines the register model and the fixed catalog of
//! RISC-V-flavored pseudo-assembly instructions the code generator emits.
//! Every opcode has a statically known operand signature; [`AsmInst::validate`]
//! checks an instruction against it.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Register file
///
/// Temporaries are virtual and unbounded: `tN` for integer/pointer values and
/// `fN` for float values. The remaining registers have fixed roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reg {
    Int(u32),
    Float(u32),
    Fp,
    Sp,
    Ra,
    Zero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegClass {
    Int,
    Float,
}

impl Reg {
    pub fn class(&self) -> RegClass {
        match self {
            Reg::Float(_) => RegClass::Float,
            _ => RegClass::Int,
        }
    }

    pub fn is_temp(&self) -> bool {
        matches!(self, Reg::Int(_) | Reg::Float(_))
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reg::Int(n) => write!(f, "t{}", n),
            Reg::Float(n) => write!(f, "f{}", n),
            Reg::Fp => write!(f, "fp"),
            Reg::Sp => write!(f, "sp"),
            Reg::Ra => write!(f, "ra"),
            Reg::Zero => write!(f, "x0"),
        }
    }
}

/// MicroC assembly instructions
///
/// Register operands are listed destination first, matching the printed form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AsmInst {
    // Integer arithmetic
    Add(Reg, Reg, Reg),           // rd = rs + rt
    Sub(Reg, Reg, Reg),           // rd = rs - rt
    Mul(Reg, Reg, Reg),           // rd = rs * rt
    Div(Reg, Reg, Reg),           // rd = rs / rt
    Neg(Reg, Reg),                // rd = -rs
    AddI(Reg, Reg, i32),          // rd = rs + imm
    Move(Reg, Reg),               // rd = rs

    // Float arithmetic
    FAdd(Reg, Reg, Reg),
    FSub(Reg, Reg, Reg),
    FMul(Reg, Reg, Reg),
    FDiv(Reg, Reg, Reg),
    FNeg(Reg, Reg),

    // Conversions
    IntToFloat(Reg, Reg),         // fd = (float) ts
    FloatToInt(Reg, Reg),         // td = (int) fs

    // Memory
    Lw(Reg, Reg, i32),            // rd = mem[base + off]
    Sw(Reg, Reg, i32),            // mem[base + off] = rs
    Flw(Reg, Reg, i32),
    Fsw(Reg, Reg, i32),

    // Immediates and addresses
    Li(Reg, i64),
    FImm(Reg, f64),
    La(Reg, String),              // rd = address of label

    // Control flow
    J(String),
    Beq(Reg, Reg, String),
    Bne(Reg, Reg, String),
    Blt(Reg, Reg, String),
    Ble(Reg, Reg, String),
    Bgt(Reg, Reg, String),
    Bge(Reg, Reg, String),
    Feq(Reg, Reg, Reg),           // td = fs == ft
    Flt(Reg, Reg, Reg),           // td = fs < ft
    Fle(Reg, Reg, Reg),           // td = fs <= ft
    Label(String),
    Call(String),                 // jump to a function label
    Ret,
    Halt,

    // I/O
    GetI(Reg),
    GetF(Reg),
    PutI(Reg),
    PutF(Reg),
    PutS(Reg),                    // print the string whose address is in rs

    // Heap
    Malloc(Reg, Reg),             // rd = malloc(rs bytes)
    Free(Reg),

    // Listing pseudo-instructions
    Blank,
}

/// Instruction opcodes, one per [`AsmInst`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpCode {
    Add, Sub, Mul, Div, Neg, AddI, Move,
    FAdd, FSub, FMul, FDiv, FNeg,
    IntToFloat, FloatToInt,
    Lw, Sw, Flw, Fsw,
    Li, FImm, La,
    J, Beq, Bne, Blt, Ble, Bgt, Bge, Feq, Flt, Fle,
    Label, Call, Ret, Halt,
    GetI, GetF, PutI, PutF, PutS,
    Malloc, Free,
    Blank,
}

/// The kind of value an operand slot accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperandKind {
    IntReg,
    FloatReg,
    Imm,
    FloatImm,
    Label,
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandKind::IntReg => write!(f, "integer register"),
            OperandKind::FloatReg => write!(f, "float register"),
            OperandKind::Imm => write!(f, "immediate"),
            OperandKind::FloatImm => write!(f, "float immediate"),
            OperandKind::Label => write!(f, "label"),
        }
    }
}

/// A concrete operand of an instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Operand<'a> {
    Reg(Reg),
    Imm(i64),
    FloatImm(f64),
    Label(&'a str),
}

impl Operand<'_> {
    fn matches(&self, kind: OperandKind) -> bool {
        match (self, kind) {
            (Operand::Reg(r), OperandKind::IntReg) => r.class() == RegClass::Int,
            (Operand::Reg(r), OperandKind::FloatReg) => r.class() == RegClass::Float,
            (Operand::Imm(_), OperandKind::Imm) => true,
            (Operand::FloatImm(_), OperandKind::FloatImm) => true,
            (Operand::Label(_), OperandKind::Label) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(r) => write!(f, "{}", r),
            Operand::Imm(i) => write!(f, "{}", i),
            Operand::FloatImm(v) => write!(f, "{:?}", v),
            Operand::Label(l) => write!(f, "{}", l),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("{opcode:?} takes {expected} operands, found {found}")]
    Arity {
        opcode: OpCode,
        expected: usize,
        found: usize,
    },

    #[error("operand {position} of {opcode:?} must be a {expected}, found {found}")]
    OperandKind {
        opcode: OpCode,
        position: usize,
        expected: OperandKind,
        found: String,
    },
}

impl OpCode {
    /// Operand signature, destination first
    pub fn signature(&self) -> &'static [OperandKind] {
        use OperandKind::*;
        match self {
            OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div => &[IntReg, IntReg, IntReg],
            OpCode::Neg | OpCode::Move => &[IntReg, IntReg],
            OpCode::AddI => &[IntReg, IntReg, Imm],
            OpCode::FAdd | OpCode::FSub | OpCode::FMul | OpCode::FDiv => &[FloatReg, FloatReg, FloatReg],
            OpCode::FNeg => &[FloatReg, FloatReg],
            OpCode::IntToFloat => &[FloatReg, IntReg],
            OpCode::FloatToInt => &[IntReg, FloatReg],
            OpCode::Lw | OpCode::Sw => &[IntReg, IntReg, Imm],
            OpCode::Flw | OpCode::Fsw => &[FloatReg, IntReg, Imm],
            OpCode::Li => &[IntReg, Imm],
            OpCode::FImm => &[FloatReg, FloatImm],
            OpCode::La => &[IntReg, Label],
            OpCode::J | OpCode::Label | OpCode::Call => &[Label],
            OpCode::Beq | OpCode::Bne | OpCode::Blt | OpCode::Ble | OpCode::Bgt | OpCode::Bge => {
                &[IntReg, IntReg, Label]
            }
            OpCode::Feq | OpCode::Flt | OpCode::Fle => &[IntReg, FloatReg, FloatReg],
            OpCode::Ret | OpCode::Halt | OpCode::Blank => &[],
            OpCode::GetI | OpCode::PutI | OpCode::PutS | OpCode::Free => &[IntReg],
            OpCode::GetF | OpCode::PutF => &[FloatReg],
            OpCode::Malloc => &[IntReg, IntReg],
        }
    }

    /// Fixed number of operands
    pub fn arity(&self) -> usize {
        self.signature().len()
    }

    /// Whether the first operand is written
    pub fn has_dest(&self) -> bool {
        matches!(
            self,
            OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div | OpCode::Neg
                | OpCode::AddI | OpCode::Move
                | OpCode::FAdd | OpCode::FSub | OpCode::FMul | OpCode::FDiv | OpCode::FNeg
                | OpCode::IntToFloat | OpCode::FloatToInt
                | OpCode::Lw | OpCode::Flw
                | OpCode::Li | OpCode::FImm | OpCode::La
                | OpCode::Feq | OpCode::Flt | OpCode::Fle
                | OpCode::GetI | OpCode::GetF
                | OpCode::Malloc
        )
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            OpCode::Add => "ADD",
            OpCode::Sub => "SUB",
            OpCode::Mul => "MUL",
            OpCode::Div => "DIV",
            OpCode::Neg => "NEG",
            OpCode::AddI => "ADDI",
            OpCode::Move => "MV",
            OpCode::FAdd => "FADD.S",
            OpCode::FSub => "FSUB.S",
            OpCode::FMul => "FMUL.S",
            OpCode::FDiv => "FDIV.S",
            OpCode::FNeg => "FNEG.S",
            OpCode::IntToFloat => "IMOVF.S",
            OpCode::FloatToInt => "FMOVI.S",
            OpCode::Lw => "LW",
            OpCode::Sw => "SW",
            OpCode::Flw => "FLW",
            OpCode::Fsw => "FSW",
            OpCode::Li => "LI",
            OpCode::FImm => "FIMM.S",
            OpCode::La => "LA",
            OpCode::J => "J",
            OpCode::Beq => "BEQ",
            OpCode::Bne => "BNE",
            OpCode::Blt => "BLT",
            OpCode::Ble => "BLE",
            OpCode::Bgt => "BGT",
            OpCode::Bge => "BGE",
            OpCode::Feq => "FEQ.S",
            OpCode::Flt => "FLT.S",
            OpCode::Fle => "FLE.S",
            OpCode::Label => "",
            OpCode::Call => "JR",
            OpCode::Ret => "RET",
            OpCode::Halt => "HALT",
            OpCode::GetI => "GETI",
            OpCode::GetF => "GETF",
            OpCode::PutI => "PUTI",
            OpCode::PutF => "PUTF",
            OpCode::PutS => "PUTS",
            OpCode::Malloc => "MALLOC",
            OpCode::Free => "FREE",
            OpCode::Blank => "",
        }
    }
}

impl AsmInst {
    pub fn opcode(&self) -> OpCode {
        match self {
            AsmInst::Add(..) => OpCode::Add,
            AsmInst::Sub(..) => OpCode::Sub,
            AsmInst::Mul(..) => OpCode::Mul,
            AsmInst::Div(..) => OpCode::Div,
            AsmInst::Neg(..) => OpCode::Neg,
            AsmInst::AddI(..) => OpCode::AddI,
            AsmInst::Move(..) => OpCode::Move,
            AsmInst::FAdd(..) => OpCode::FAdd,
            AsmInst::FSub(..) => OpCode::FSub,
            AsmInst::FMul(..) => OpCode::FMul,
            AsmInst::FDiv(..) => OpCode::FDiv,
            AsmInst::FNeg(..) => OpCode::FNeg,
            AsmInst::IntToFloat(..) => OpCode::IntToFloat,
            AsmInst::FloatToInt(..) => OpCode::FloatToInt,
            AsmInst::Lw(..) => OpCode::Lw,
            AsmInst::Sw(..) => OpCode::Sw,
            AsmInst::Flw(..) => OpCode::Flw,
            AsmInst::Fsw(..) => OpCode::Fsw,
            AsmInst::Li(..) => OpCode::Li,
            AsmInst::FImm(..) => OpCode::FImm,
            AsmInst::La(..) => OpCode::La,
            AsmInst::J(..) => OpCode::J,
            AsmInst::Beq(..) => OpCode::Beq,
            AsmInst::Bne(..) => OpCode::Bne,
            AsmInst::Blt(..) => OpCode::Blt,
            AsmInst::Ble(..) => OpCode::Ble,
            AsmInst::Bgt(..) => OpCode::Bgt,
            AsmInst::Bge(..) => OpCode::Bge,
            AsmInst::Feq(..) => OpCode::Feq,
            AsmInst::Flt(..) => OpCode::Flt,
            AsmInst::Fle(..) => OpCode::Fle,
            AsmInst::Label(..) => OpCode::Label,
            AsmInst::Call(..) => OpCode::Call,
            AsmInst::Ret => OpCode::Ret,
            AsmInst::Halt => OpCode::Halt,
            AsmInst::GetI(..) => OpCode::GetI,
            AsmInst::GetF(..) => OpCode::GetF,
            AsmInst::PutI(..) => OpCode::PutI,
            AsmInst::PutF(..) => OpCode::PutF,
            AsmInst::PutS(..) => OpCode::PutS,
            AsmInst::Malloc(..) => OpCode::Malloc,
            AsmInst::Free(..) => OpCode::Free,
            AsmInst::Blank => OpCode::Blank,
        }
    }

    /// Operands in printed order
    pub fn operands(&self) -> Vec<Operand<'_>> {
        use Operand as O;
        match self {
            AsmInst::Add(a, b, c)
            | AsmInst::Sub(a, b, c)
            | AsmInst::Mul(a, b, c)
            | AsmInst::Div(a, b, c)
            | AsmInst::FAdd(a, b, c)
            | AsmInst::FSub(a, b, c)
            | AsmInst::FMul(a, b, c)
            | AsmInst::FDiv(a, b, c)
            | AsmInst::Feq(a, b, c)
            | AsmInst::Flt(a, b, c)
            | AsmInst::Fle(a, b, c) => vec![O::Reg(*a), O::Reg(*b), O::Reg(*c)],

            AsmInst::Neg(a, b)
            | AsmInst::Move(a, b)
            | AsmInst::FNeg(a, b)
            | AsmInst::IntToFloat(a, b)
            | AsmInst::FloatToInt(a, b)
            | AsmInst::Malloc(a, b) => vec![O::Reg(*a), O::Reg(*b)],

            AsmInst::AddI(a, b, imm)
            | AsmInst::Lw(a, b, imm)
            | AsmInst::Sw(a, b, imm)
            | AsmInst::Flw(a, b, imm)
            | AsmInst::Fsw(a, b, imm) => vec![O::Reg(*a), O::Reg(*b), O::Imm(i64::from(*imm))],

            AsmInst::Li(a, imm) => vec![O::Reg(*a), O::Imm(*imm)],
            AsmInst::FImm(a, imm) => vec![O::Reg(*a), O::FloatImm(*imm)],
            AsmInst::La(a, label) => vec![O::Reg(*a), O::Label(label.as_str())],

            AsmInst::J(label) | AsmInst::Label(label) | AsmInst::Call(label) => vec![O::Label(label.as_str())],

            AsmInst::Beq(a, b, label)
            | AsmInst::Bne(a, b, label)
            | AsmInst::Blt(a, b, label)
            | AsmInst::Ble(a, b, label)
            | AsmInst::Bgt(a, b, label)
            | AsmInst::Bge(a, b, label) => vec![O::Reg(*a), O::Reg(*b), O::Label(label.as_str())],

            AsmInst::GetI(a)
            | AsmInst::GetF(a)
            | AsmInst::PutI(a)
            | AsmInst::PutF(a)
            | AsmInst::PutS(a)
            | AsmInst::Free(a) => vec![O::Reg(*a)],

            AsmInst::Ret | AsmInst::Halt | AsmInst::Blank => vec![],
        }
    }

    /// Register written by this instruction, if any
    pub fn dest(&self) -> Option<Reg> {
        if !self.opcode().has_dest() {
            return None;
        }
        match self.operands().first() {
            Some(Operand::Reg(r)) => Some(*r),
            _ => None,
        }
    }

    /// Check operand count and operand kinds against the opcode signature
    pub fn validate(&self) -> Result<(), ShapeError> {
        let opcode = self.opcode();
        let operands = self.operands();
        let signature = opcode.signature();

        if operands.len() != signature.len() {
            return Err(ShapeError::Arity {
                opcode,
                expected: signature.len(),
                found: operands.len(),
            });
        }

        for (position, (operand, kind)) in operands.iter().zip(signature).enumerate() {
            if !operand.matches(*kind) {
                return Err(ShapeError::OperandKind {
                    opcode,
                    position,
                    expected: *kind,
                    found: operand.to_string(),
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for AsmInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmInst::Label(label) => write!(f, "{}:", label),
            AsmInst::Blank => Ok(()),

            // base + offset addressing
            AsmInst::Lw(r, base, off)
            | AsmInst::Sw(r, base, off)
            | AsmInst::Flw(r, base, off)
            | AsmInst::Fsw(r, base, off) => {
                write!(f, "{} {}, {}({})", self.opcode().mnemonic(), r, off, base)
            }

            _ => {
                write!(f, "{}", self.opcode().mnemonic())?;
                for (i, operand) in self.operands().iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", " };
                    write!(f, "{}{}", sep, operand)?;
                }
                Ok(())
            }
        }
    }
}
