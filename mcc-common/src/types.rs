//! MicroC value types
//!
//! The language has two numeric types, a string type used only for global
//! string constants, `void` for functions without a result, single-level
//! pointers, and `INFER` for values whose pointee is not tracked (the result
//! of `malloc`).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Size of every scalar (INT, FLOAT, PTR) in bytes
pub const WORD_SIZE: i32 = 4;

/// A MicroC value type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Int,
    Float,
    Str,
    Void,
    Ptr(Box<Type>),
    /// Pointer-compatible value of unknown pointee (malloc result)
    Infer,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeError {
    #[error("cannot unwrap non-pointer type {0}")]
    NotAPointer(Type),
}

impl Type {
    /// Wrap `inner` in a pointer
    pub fn pointer_to(inner: Type) -> Type {
        Type::Ptr(Box::new(inner))
    }

    /// Pointee type of a pointer
    pub fn unwrap(&self) -> Result<Type, TypeError> {
        match self {
            Type::Ptr(inner) => Ok((**inner).clone()),
            other => Err(TypeError::NotAPointer(other.clone())),
        }
    }

    /// INT and FLOAT
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Type::Float)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Ptr(_) | Type::Infer)
    }

    /// Values that live in integer registers: INT, PTR and INFER
    pub fn is_integer_class(&self) -> bool {
        matches!(self, Type::Int | Type::Ptr(_) | Type::Infer)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "INT"),
            Type::Float => write!(f, "FLOAT"),
            Type::Str => write!(f, "STRING"),
            Type::Void => write!(f, "VOID"),
            Type::Ptr(inner) => write!(f, "PTR({})", inner),
            Type::Infer => write!(f, "INFER"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_wrapping() {
        let ptr = Type::pointer_to(Type::Int);
        assert_eq!(ptr, Type::Ptr(Box::new(Type::Int)));
        assert_eq!(ptr.unwrap(), Ok(Type::Int));

        let double = Type::pointer_to(ptr.clone());
        assert_eq!(double.unwrap(), Ok(ptr));
    }

    #[test]
    fn test_unwrap_non_pointer_fails() {
        assert_eq!(Type::Float.unwrap(), Err(TypeError::NotAPointer(Type::Float)));
        assert!(Type::Infer.unwrap().is_err());
    }

    #[test]
    fn test_classification() {
        assert!(Type::Int.is_numeric());
        assert!(Type::Float.is_numeric());
        assert!(!Type::pointer_to(Type::Int).is_numeric());
        assert!(Type::Infer.is_integer_class());
        assert!(!Type::Float.is_integer_class());
    }

    #[test]
    fn test_display() {
        assert_eq!(Type::pointer_to(Type::pointer_to(Type::Float)).to_string(), "PTR(PTR(FLOAT))");
        assert_eq!(Type::Str.to_string(), "STRING");
    }
}
