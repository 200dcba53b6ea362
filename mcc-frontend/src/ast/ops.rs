//! Operator definitions for MicroC
//! 
//! This module defines arithmetic, relational and unary operators, plus the
//! typing rule for arithmetic operands.

use mcc_common::Type;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    /// Static type of `left op right`, or `None` when the pair is not allowed.
    ///
    /// INT/FLOAT mix to FLOAT. A pointer may be offset by an integer with
    /// `+` and `-`; everything else involving pointers is rejected.
    pub fn result_type(&self, left: &Type, right: &Type) -> Option<Type> {
        match (left, right) {
            (Type::Int, Type::Int) => Some(Type::Int),
            (Type::Float, Type::Float) | (Type::Int, Type::Float) | (Type::Float, Type::Int) => {
                Some(Type::Float)
            }
            (ptr, Type::Int) if ptr.is_pointer() && matches!(self, ArithOp::Add | ArithOp::Sub) => {
                Some(ptr.clone())
            }
            (Type::Int, ptr) if ptr.is_pointer() && *self == ArithOp::Add => Some(ptr.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        };
        write!(f, "{}", op_str)
    }
}

/// Relational operators used in `if`/`while` conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelOp {
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
}

impl RelOp {
    /// The operator that holds exactly when `self` does not
    pub fn negate(&self) -> RelOp {
        match self {
            RelOp::Less => RelOp::GreaterEqual,
            RelOp::LessEqual => RelOp::Greater,
            RelOp::Greater => RelOp::LessEqual,
            RelOp::GreaterEqual => RelOp::Less,
            RelOp::Equal => RelOp::NotEqual,
            RelOp::NotEqual => RelOp::Equal,
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            RelOp::Less => "<",
            RelOp::LessEqual => "<=",
            RelOp::Greater => ">",
            RelOp::GreaterEqual => ">=",
            RelOp::Equal => "==",
            RelOp::NotEqual => "!=",
        };
        write!(f, "{}", op_str)
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Negate,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Negate => write!(f, "-"),
        }
    }
}
