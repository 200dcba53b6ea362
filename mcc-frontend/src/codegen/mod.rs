//! Code generation from the typed AST to MicroC assembly
//!
//! A single post-order traversal turns each node into a [`CodeObject`] built
//! from its children's objects. All mutable bookkeeping (temporary counters,
//! label counters, the function being generated) lives on the
//! [`CodeGenerator`] instance, so independent compilations never share state.

mod errors;
mod code_object;
mod values;
mod frame;
pub mod expressions;
pub mod statements;
mod function_gen;

pub use errors::CodegenError;
pub use code_object::{CodeObject, Comparison};
pub use frame::Frame;

use mcc_codegen::{DataItem, Reg, RegClass};
use mcc_common::{SourceLocation, SourceSpan, Symbol, SymbolId, SymbolTable, Type};
use std::collections::HashSet;

/// Per-function virtual register counters
///
/// Counters are pre-incremented, so the first temporary of each kind is 1.
#[derive(Debug, Clone, Default)]
pub struct TempAllocator {
    int_count: u32,
    float_count: u32,
}

impl TempAllocator {
    pub fn fresh(&mut self, class: RegClass) -> Reg {
        match class {
            RegClass::Int => {
                self.int_count += 1;
                Reg::Int(self.int_count)
            }
            RegClass::Float => {
                self.float_count += 1;
                Reg::Float(self.float_count)
            }
        }
    }

    pub fn fresh_int(&mut self) -> Reg {
        self.fresh(RegClass::Int)
    }

    pub fn fresh_float(&mut self) -> Reg {
        self.fresh(RegClass::Float)
    }

    pub fn reset(&mut self) {
        self.int_count = 0;
        self.float_count = 0;
    }

    /// Number of integer temporaries handed out since the last reset
    pub fn int_count(&self) -> u32 {
        self.int_count
    }

    pub fn float_count(&self) -> u32 {
        self.float_count
    }
}

/// Label names, unique across the whole compilation unit
#[derive(Debug, Clone, Default)]
pub struct LabelGenerator {
    loops: u32,
    elses: u32,
    outs: u32,
}

impl LabelGenerator {
    pub fn next_loop(&mut self) -> String {
        self.loops += 1;
        format!("loop.{}", self.loops)
    }

    pub fn next_else(&mut self) -> String {
        self.elses += 1;
        format!("else.{}", self.elses)
    }

    pub fn next_out(&mut self) -> String {
        self.outs += 1;
        format!("out.{}", self.outs)
    }

    pub fn function(name: &str) -> String {
        format!("func.{}", name)
    }

    pub fn function_return(name: &str) -> String {
        format!("ret.{}", name)
    }
}

/// The function whose body is being generated
#[derive(Debug, Clone)]
pub struct FunctionContext {
    pub name: String,
    pub return_type: Type,
}

/// Register class holding values of `ty`, if it fits in a register
pub fn register_class(ty: &Type) -> Option<RegClass> {
    match ty {
        Type::Float => Some(RegClass::Float),
        Type::Int | Type::Ptr(_) | Type::Infer => Some(RegClass::Int),
        Type::Str | Type::Void => None,
    }
}

pub(crate) fn location(span: &SourceSpan) -> SourceLocation {
    span.start.clone()
}

/// Tree-walking code generator
pub struct CodeGenerator<'a> {
    pub(crate) symbols: &'a SymbolTable,
    pub(crate) temps: TempAllocator,
    pub(crate) labels: LabelGenerator,
    pub(crate) current_function: Option<FunctionContext>,
    generated: HashSet<SymbolId>,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            temps: TempAllocator::default(),
            labels: LabelGenerator::default(),
            current_function: None,
            generated: HashSet::new(),
        }
    }

    /// Record that a function body has been generated; a second body is an error
    pub(crate) fn mark_generated(&mut self, symbol: SymbolId, name: &str, span: &SourceSpan) -> Result<(), CodegenError> {
        if !self.generated.insert(symbol) {
            return Err(CodegenError::Redefinition {
                name: name.to_string(),
                location: location(span),
            });
        }
        Ok(())
    }

    pub(crate) fn symbol(&self, symbol: SymbolId, span: &SourceSpan) -> Result<&'a Symbol, CodegenError> {
        let symbols: &'a SymbolTable = self.symbols;
        symbols.get(symbol).ok_or_else(|| CodegenError::UnknownSymbol {
            symbol,
            location: location(span),
        })
    }
}

/// Data section entries for every global variable and string constant
pub fn data_items(symbols: &SymbolTable) -> Vec<DataItem> {
    symbols
        .globals()
        .filter_map(|symbol| match symbol {
            Symbol::Variable(var) => var.label().map(|label| DataItem::Word {
                label: label.to_string(),
            }),
            Symbol::StringConstant(s) => Some(DataItem::Str {
                label: s.label.clone(),
                value: s.value.clone(),
            }),
            Symbol::Function(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests;
