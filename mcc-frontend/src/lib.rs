//! MicroC Compiler - Frontend
//! 
//! This crate provides the source-to-listing pipeline of the MicroC compiler:
//! - Lexer: tokenizes MicroC source code
//! - Parser: builds the typed AST and fills the symbol table in one pass
//! - AST: typed abstract syntax tree definitions
//! - Codegen: post-order lowering of the AST into the instruction model

pub mod lexer;
pub mod parser;
pub mod ast;
pub mod codegen;

pub use lexer::{Lexer, Token, TokenType};
pub use parser::{Parser, ParseError};
pub use ast::{
    ArithOp, Expression, ExpressionKind, FunctionDefinition, Parameter, Program,
    RelOp, Statement, StatementKind, UnaryOp,
};
pub use codegen::{CodeGenerator, CodeObject, CodegenError};

use mcc_codegen::{emit_program, EmitOptions, Listing};
use mcc_common::{CompilerError, SymbolTable};
use log::info;

/// A parsed program together with the symbol table it is bound to
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub program: Program,
    pub symbols: SymbolTable,
}

/// High-level frontend interface
pub struct Frontend;

impl Frontend {
    /// Parse MicroC source code into a typed AST
    pub fn parse_source(source: &str) -> Result<CompilationUnit, CompilerError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        
        let mut parser = Parser::new(tokens);
        let program = parser.parse_program()?;
        
        Ok(CompilationUnit {
            program,
            symbols: parser.into_symbols(),
        })
    }
    
    /// Generate the listing for an already parsed unit
    pub fn generate(unit: &CompilationUnit) -> Result<Listing, CompilerError> {
        let mut generator = CodeGenerator::new(&unit.symbols);
        let text = generator.generate_program(&unit.program)?;
        
        Ok(Listing {
            data: codegen::data_items(&unit.symbols),
            text,
        })
    }
    
    /// Compile MicroC source code to an instruction listing
    pub fn compile_source(source: &str) -> Result<Listing, CompilerError> {
        let unit = Self::parse_source(source)?;
        let listing = Self::generate(&unit)?;
        info!(
            "compiled {} functions into {} instructions",
            unit.program.functions.len(),
            listing.text.len()
        );
        Ok(listing)
    }
    
    /// Compile MicroC source code to assembly text
    pub fn compile_to_assembly(source: &str, options: &EmitOptions) -> Result<String, CompilerError> {
        let listing = Self::compile_source(source)?;
        Ok(emit_program(&listing, options)?)
    }
    
    /// Tokenize source code (for debugging)
    pub fn tokenize_source(source: &str) -> Result<Vec<Token>, CompilerError> {
        let mut lexer = Lexer::new(source);
        lexer.tokenize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcc_common::Type;

    #[test]
    fn test_frontend_parse_simple_function() {
        let source = r#"
int main() {
    return 42;
}
"#;
        
        let unit = Frontend::parse_source(source).unwrap();
        assert_eq!(unit.program.functions.len(), 1);
        
        let main = &unit.program.functions[0];
        assert_eq!(main.name, "main");
        assert_eq!(main.return_type, Type::Int);
        assert!(unit.symbols.function_by_name("main").is_some());
    }

    #[test]
    fn test_frontend_tokenize() {
        let tokens = Frontend::tokenize_source("int x; // counter").unwrap();
        
        // int, x, ;, comment, EOF
        assert_eq!(tokens.len(), 5);
        assert!(matches!(tokens[0].token_type, TokenType::Int));
        assert!(matches!(tokens[1].token_type, TokenType::Identifier(_)));
        assert!(matches!(tokens[3].token_type, TokenType::LineComment(_)));
    }

    #[test]
    fn test_compile_source_collects_data() {
        let listing = Frontend::compile_source("int x; string s = \"ok\"; void main() { print(s); }").unwrap();
        assert_eq!(listing.data.len(), 2);
        assert!(!listing.text.is_empty());
    }
}
