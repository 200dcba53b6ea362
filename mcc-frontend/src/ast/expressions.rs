//! Expression AST nodes for MicroC
//!
//! Every expression carries its resolved static type, and every name is
//! already bound to a symbol table entry. The constructors below apply the
//! typing rules, so the parser and hand-written trees in tests share them.

use super::ops::{ArithOp, RelOp, UnaryOp};
use mcc_common::{CompilerError, HasSpan, SourceSpan, SymbolId, Type, WORD_SIZE};
use serde::{Deserialize, Serialize};

/// Typed expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub expr_type: Type,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    IntLiteral(i64),
    FloatLiteral(f64),

    /// Variable or string constant reference
    Variable {
        name: String,
        symbol: SymbolId,
    },

    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },

    Binary {
        op: ArithOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Relational comparison, only valid as an `if`/`while` condition
    Compare {
        op: RelOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    Cast {
        target: Type,
        operand: Box<Expression>,
    },

    /// `*expr`
    Deref(Box<Expression>),

    /// `&expr`
    AddressOf(Box<Expression>),

    Call {
        function: String,
        symbol: SymbolId,
        arguments: Vec<Expression>,
    },

    Malloc(Box<Expression>),

    Free(Box<Expression>),
}

fn type_error(message: String, span: &SourceSpan) -> CompilerError {
    CompilerError::type_error(message, span.clone())
}

impl Expression {
    /// Build a node with an explicit type, bypassing the typing rules
    pub fn new(kind: ExpressionKind, expr_type: Type) -> Self {
        Self {
            kind,
            expr_type,
            span: SourceSpan::dummy(),
        }
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = span;
        self
    }

    pub fn int(value: i64) -> Self {
        Self::new(ExpressionKind::IntLiteral(value), Type::Int)
    }

    pub fn float(value: f64) -> Self {
        Self::new(ExpressionKind::FloatLiteral(value), Type::Float)
    }

    pub fn variable(name: &str, symbol: SymbolId, ty: Type) -> Self {
        Self::new(
            ExpressionKind::Variable {
                name: name.to_string(),
                symbol,
            },
            ty,
        )
    }

    pub fn negate(operand: Expression) -> Result<Self, CompilerError> {
        if !operand.expr_type.is_numeric() {
            return Err(type_error(
                format!("cannot negate a value of type {}", operand.expr_type),
                &operand.span,
            ));
        }
        let ty = operand.expr_type.clone();
        let span = operand.span.clone();
        Ok(Self::new(
            ExpressionKind::Unary {
                op: UnaryOp::Negate,
                operand: Box::new(operand),
            },
            ty,
        )
        .with_span(span))
    }

    pub fn binary(op: ArithOp, left: Expression, right: Expression) -> Result<Self, CompilerError> {
        let span = left.span.to(&right.span);
        let ty = op
            .result_type(&left.expr_type, &right.expr_type)
            .ok_or_else(|| {
                type_error(
                    format!(
                        "operator '{}' cannot be applied to {} and {}",
                        op, left.expr_type, right.expr_type
                    ),
                    &span,
                )
            })?;
        Ok(Self::new(
            ExpressionKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty,
        )
        .with_span(span))
    }

    pub fn compare(op: RelOp, left: Expression, right: Expression) -> Result<Self, CompilerError> {
        let span = left.span.to(&right.span);
        let comparable = (left.expr_type.is_numeric() && right.expr_type.is_numeric())
            || (left.expr_type.is_integer_class() && right.expr_type.is_integer_class());
        if !comparable {
            return Err(type_error(
                format!("cannot compare {} with {}", left.expr_type, right.expr_type),
                &span,
            ));
        }
        Ok(Self::new(
            ExpressionKind::Compare {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            Type::Int,
        )
        .with_span(span))
    }

    pub fn cast(target: Type, operand: Expression) -> Result<Self, CompilerError> {
        let from = &operand.expr_type;
        let allowed = from == &target
            || (from.is_numeric() && target.is_numeric())
            || (from.is_integer_class() && target.is_integer_class());
        if !allowed {
            return Err(type_error(format!("cannot cast {} to {}", from, target), &operand.span));
        }
        let span = operand.span.clone();
        Ok(Self::new(
            ExpressionKind::Cast {
                target: target.clone(),
                operand: Box::new(operand),
            },
            target,
        )
        .with_span(span))
    }

    pub fn deref(operand: Expression) -> Result<Self, CompilerError> {
        let pointee = operand
            .expr_type
            .unwrap()
            .map_err(|e| type_error(format!("cannot dereference: {}", e), &operand.span))?;
        let span = operand.span.clone();
        Ok(Self::new(ExpressionKind::Deref(Box::new(operand)), pointee).with_span(span))
    }

    pub fn address_of(operand: Expression) -> Result<Self, CompilerError> {
        if !operand.is_lvalue() {
            return Err(type_error(
                "cannot take the address of a value".to_string(),
                &operand.span,
            ));
        }
        let ty = Type::pointer_to(operand.expr_type.clone());
        let span = operand.span.clone();
        Ok(Self::new(ExpressionKind::AddressOf(Box::new(operand)), ty).with_span(span))
    }

    /// `base[index]`, lowered as `*(base + index * 4)`
    pub fn index(base: Expression, index: Expression) -> Result<Self, CompilerError> {
        let offset = Self::word_offset(index)?;
        Self::deref(Self::binary(ArithOp::Add, base, offset)?)
    }

    /// `base[row][col]`, lowered as `*(base + row * 4 + col * 4)`
    pub fn index2(base: Expression, row: Expression, col: Expression) -> Result<Self, CompilerError> {
        let row_offset = Self::word_offset(row)?;
        let col_offset = Self::word_offset(col)?;
        let address = Self::binary(ArithOp::Add, Self::binary(ArithOp::Add, base, row_offset)?, col_offset)?;
        Self::deref(address)
    }

    fn word_offset(index: Expression) -> Result<Self, CompilerError> {
        if index.expr_type != Type::Int {
            return Err(type_error(
                format!("array index must be INT, found {}", index.expr_type),
                &index.span,
            ));
        }
        let span = index.span.clone();
        Self::binary(ArithOp::Mul, index, Self::int(i64::from(WORD_SIZE)).with_span(span))
    }

    pub fn call(function: &str, symbol: SymbolId, return_type: Type, arguments: Vec<Expression>) -> Self {
        Self::new(
            ExpressionKind::Call {
                function: function.to_string(),
                symbol,
                arguments,
            },
            return_type,
        )
    }

    pub fn malloc(size: Expression) -> Result<Self, CompilerError> {
        if size.expr_type != Type::Int {
            return Err(type_error(
                format!("malloc size must be INT, found {}", size.expr_type),
                &size.span,
            ));
        }
        let span = size.span.clone();
        Ok(Self::new(ExpressionKind::Malloc(Box::new(size)), Type::Infer).with_span(span))
    }

    pub fn free(pointer: Expression) -> Result<Self, CompilerError> {
        if !pointer.expr_type.is_pointer() {
            return Err(type_error(
                format!("free expects a pointer, found {}", pointer.expr_type),
                &pointer.span,
            ));
        }
        let span = pointer.span.clone();
        Ok(Self::new(ExpressionKind::Free(Box::new(pointer)), Type::Void).with_span(span))
    }

    /// Whether the expression denotes a storage location
    pub fn is_lvalue(&self) -> bool {
        matches!(self.kind, ExpressionKind::Variable { .. } | ExpressionKind::Deref(_))
    }
}

impl HasSpan for Expression {
    fn span(&self) -> SourceSpan {
        self.span.clone()
    }
}
