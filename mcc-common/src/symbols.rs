//! Scoped symbol table
//!
//! There is one global scope and, while a function body is being processed,
//! exactly one flat local scope for that function. Entries live in an arena
//! and are referenced by [`SymbolId`] from the typed AST.
//!
//! Frame layout relative to the frame pointer:
//!
//! ```text
//!   fp + 12 + 4*k   parameters (last parameter at fp + 12)
//!   fp + 8          return value slot
//!   fp + 4          return address
//!   fp + 0          saved frame pointer
//!   fp - 4, -8 ...  locals in declaration order
//! ```

use crate::source_loc::SourceLocation;
use crate::types::{Type, WORD_SIZE};
use crate::CompilerError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Symbol identifier
pub type SymbolId = u32;

/// Offset of the return value slot from the callee's frame pointer
pub const RETURN_SLOT_OFFSET: i32 = 8;

/// Offset of the last parameter from the callee's frame pointer
const LAST_PARAM_OFFSET: i32 = 12;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SymbolError {
    #[error("'{name}' is already declared in scope '{scope}'")]
    Duplicate { name: String, scope: String },

    #[error("Function '{name}' already defined")]
    Redefinition { name: String },

    #[error("Declaration of '{name}' conflicts with an earlier declaration")]
    ConflictingDeclaration { name: String },

    #[error("'{name}' is not a function")]
    NotAFunction { name: String },

    #[error("Local scope required for '{name}'")]
    NoLocalScope { name: String },
}

impl SymbolError {
    /// Attach a source location and turn into a fatal semantic error
    pub fn at(self, location: SourceLocation) -> CompilerError {
        CompilerError::semantic_error(self.to_string(), location)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Storage {
    Global { label: String },
    Local { offset: i32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableEntry {
    pub name: String,
    pub ty: Type,
    pub storage: Storage,
}

impl VariableEntry {
    pub fn is_local(&self) -> bool {
        matches!(self.storage, Storage::Local { .. })
    }

    /// Byte offset from the frame pointer; only locals and parameters have one
    pub fn frame_offset(&self) -> Option<i32> {
        match self.storage {
            Storage::Local { offset } => Some(offset),
            Storage::Global { .. } => None,
        }
    }

    /// Data label; only globals have one
    pub fn label(&self) -> Option<&str> {
        match &self.storage {
            Storage::Global { label } => Some(label),
            Storage::Local { .. } => None,
        }
    }
}

/// A `string name = "...";` declaration, always global
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringEntry {
    pub name: String,
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionEntry {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<Type>,
    pub defined: bool,
    pub local_slots: u32,
}

impl FunctionEntry {
    pub fn is_defined(&self) -> bool {
        self.defined
    }

    pub fn param_types(&self) -> &[Type] {
        &self.params
    }

    pub fn local_slot_count(&self) -> u32 {
        self.local_slots
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Symbol {
    Variable(VariableEntry),
    StringConstant(StringEntry),
    Function(FunctionEntry),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Variable(v) => &v.name,
            Symbol::StringConstant(s) => &s.name,
            Symbol::Function(f) => &f.name,
        }
    }

    /// Type of the value the symbol denotes (return type for functions)
    pub fn ty(&self) -> Type {
        match self {
            Symbol::Variable(v) => v.ty.clone(),
            Symbol::StringConstant(_) => Type::Str,
            Symbol::Function(f) => f.return_type.clone(),
        }
    }

    pub fn as_variable(&self) -> Option<&VariableEntry> {
        match self {
            Symbol::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionEntry> {
        match self {
            Symbol::Function(f) => Some(f),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Scope {
    name: String,
    symbols: HashMap<String, SymbolId>,
    next_local_offset: i32,
    local_slots: u32,
}

impl Scope {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            symbols: HashMap::new(),
            next_local_offset: -WORD_SIZE,
            local_slots: 0,
        }
    }
}

/// Symbol table with a global scope and one local scope per function body
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    scopes: Vec<Scope>,
    /// Global variables and string constants in declaration order
    globals: Vec<SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            scopes: vec![Scope::new("global")],
            globals: Vec::new(),
        }
    }

    fn current_scope(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    pub fn in_local_scope(&self) -> bool {
        self.scopes.len() > 1
    }

    pub fn current_scope_name(&self) -> &str {
        self.scopes.last().map(|s| s.name.as_str()).unwrap_or("global")
    }

    fn insert(&mut self, symbol: Symbol) -> Result<SymbolId, SymbolError> {
        let name = symbol.name().to_string();
        let scope = self.current_scope();
        if scope.symbols.contains_key(&name) {
            return Err(SymbolError::Duplicate {
                name,
                scope: scope.name.clone(),
            });
        }

        let id = self.symbols.len() as SymbolId;
        self.current_scope().symbols.insert(name, id);
        self.symbols.push(symbol);
        Ok(id)
    }

    /// Declare a variable in the current scope
    pub fn add_variable(&mut self, name: &str, ty: Type) -> Result<SymbolId, SymbolError> {
        if !self.in_local_scope() {
            let id = self.insert(Symbol::Variable(VariableEntry {
                name: name.to_string(),
                ty,
                storage: Storage::Global { label: name.to_string() },
            }))?;
            self.globals.push(id);
            return Ok(id);
        }

        let offset = self.current_scope().next_local_offset;
        let id = self.insert(Symbol::Variable(VariableEntry {
            name: name.to_string(),
            ty,
            storage: Storage::Local { offset },
        }))?;

        let scope = self.current_scope();
        scope.next_local_offset -= WORD_SIZE;
        scope.local_slots += 1;
        Ok(id)
    }

    /// Declare a global string constant
    pub fn add_string(&mut self, name: &str, value: &str) -> Result<SymbolId, SymbolError> {
        if self.in_local_scope() {
            return Err(SymbolError::Duplicate {
                name: name.to_string(),
                scope: self.current_scope_name().to_string(),
            });
        }

        let id = self.insert(Symbol::StringConstant(StringEntry {
            name: name.to_string(),
            value: value.to_string(),
            label: name.to_string(),
        }))?;
        self.globals.push(id);
        Ok(id)
    }

    /// Add the parameters of the function whose scope is current.
    ///
    /// The caller pushes arguments left to right, so the last parameter sits
    /// closest to the frame.
    pub fn add_parameters(&mut self, params: &[(String, Type)]) -> Result<Vec<SymbolId>, SymbolError> {
        if !self.in_local_scope() {
            let name = params.first().map(|(n, _)| n.clone()).unwrap_or_default();
            return Err(SymbolError::NoLocalScope { name });
        }

        let mut ids = vec![0; params.len()];
        let mut offset = LAST_PARAM_OFFSET;
        for (index, (name, ty)) in params.iter().enumerate().rev() {
            ids[index] = self.insert(Symbol::Variable(VariableEntry {
                name: name.clone(),
                ty: ty.clone(),
                storage: Storage::Local { offset },
            }))?;
            offset += WORD_SIZE;
        }
        Ok(ids)
    }

    /// Declare a function. Repeating an identical declaration is allowed.
    pub fn declare_function(
        &mut self,
        name: &str,
        return_type: Type,
        params: Vec<Type>,
    ) -> Result<SymbolId, SymbolError> {
        if let Some(&id) = self.scopes[0].symbols.get(name) {
            return match &self.symbols[id as usize] {
                Symbol::Function(f) if f.return_type == return_type && f.params == params => Ok(id),
                Symbol::Function(_) => Err(SymbolError::ConflictingDeclaration { name: name.to_string() }),
                _ => Err(SymbolError::NotAFunction { name: name.to_string() }),
            };
        }

        let id = self.symbols.len() as SymbolId;
        self.scopes[0].symbols.insert(name.to_string(), id);
        self.symbols.push(Symbol::Function(FunctionEntry {
            name: name.to_string(),
            return_type,
            params,
            defined: false,
            local_slots: 0,
        }));
        Ok(id)
    }

    /// Mark a function as defined. A second definition is an error.
    pub fn define_function(
        &mut self,
        name: &str,
        return_type: Type,
        params: Vec<Type>,
    ) -> Result<SymbolId, SymbolError> {
        let id = self.declare_function(name, return_type, params)?;
        match &mut self.symbols[id as usize] {
            Symbol::Function(f) if f.defined => Err(SymbolError::Redefinition { name: name.to_string() }),
            Symbol::Function(f) => {
                f.defined = true;
                Ok(id)
            }
            _ => Err(SymbolError::NotAFunction { name: name.to_string() }),
        }
    }

    /// Open the local scope of a function body
    pub fn push_function_scope(&mut self, name: &str) {
        self.scopes.push(Scope::new(name));
    }

    /// Close the current local scope, recording its slot count on the function
    pub fn pop_scope(&mut self) -> u32 {
        if !self.in_local_scope() {
            return 0;
        }

        let scope = self.scopes.pop().map(|s| (s.name, s.local_slots));
        let Some((name, slots)) = scope else { return 0 };
        if let Some(&id) = self.scopes[0].symbols.get(&name) {
            if let Symbol::Function(f) = &mut self.symbols[id as usize] {
                f.local_slots = slots;
            }
        }
        slots
    }

    /// Resolve a name, innermost scope first
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.symbols.get(name).copied())
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id as usize)
    }

    pub fn variable(&self, id: SymbolId) -> Option<&VariableEntry> {
        self.get(id).and_then(Symbol::as_variable)
    }

    pub fn function(&self, id: SymbolId) -> Option<&FunctionEntry> {
        self.get(id).and_then(Symbol::as_function)
    }

    pub fn function_by_name(&self, name: &str) -> Option<&FunctionEntry> {
        self.scopes[0]
            .symbols
            .get(name)
            .and_then(|&id| self.function(id))
    }

    /// Global variables and string constants in declaration order
    pub fn globals(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.globals.iter().filter_map(move |&id| self.get(id))
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
