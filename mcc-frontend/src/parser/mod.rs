//! MicroC Recursive Descent Parser
//! 
//! Parses MicroC tokens into the typed AST in a single pass. Declarations go
//! straight into the symbol table, so every name in the tree is already bound
//! and every expression already typed when the parser returns.

pub mod errors;
pub mod declarations;
pub mod statements;
pub mod expressions;

use crate::lexer::{Token, TokenType};
use mcc_common::{CompilerError, SourceLocation, SourceSpan, SymbolTable, Type};
use std::collections::VecDeque;

pub use errors::ParseError;

/// Function whose body is being parsed
#[derive(Debug, Clone)]
pub(crate) struct EnclosingFunction {
    pub name: String,
    pub return_type: Type,
}

/// MicroC Parser
pub struct Parser {
    pub(crate) tokens: VecDeque<Token>,
    pub(crate) symbols: SymbolTable,
    pub(crate) current_function: Option<EnclosingFunction>,
    eof_location: SourceLocation,
}

impl Parser {
    /// Create a new parser
    pub fn new(tokens: Vec<Token>) -> Self {
        let eof_location = tokens
            .last()
            .map(|t| t.span.end.clone())
            .unwrap_or_else(|| SourceLocation::new(1, 1));
        
        let filtered_tokens: VecDeque<Token> = tokens
            .into_iter()
            .filter(|t| !t.token_type.is_trivia())
            .collect();
        
        Self {
            tokens: filtered_tokens,
            symbols: SymbolTable::new(),
            current_function: None,
            eof_location,
        }
    }
    
    /// Symbol table filled in while parsing
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }
    
    pub fn into_symbols(self) -> SymbolTable {
        self.symbols
    }
    
    /// Peek at current token without consuming
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }
    
    /// Peek `offset` tokens past the current one
    pub(crate) fn peek_ahead(&self, offset: usize) -> Option<&TokenType> {
        self.tokens.get(offset).map(|t| &t.token_type)
    }
    
    /// Get current token and advance
    pub(crate) fn advance(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }
    
    /// Check if current token matches expected type
    pub(crate) fn check(&self, token_type: &TokenType) -> bool {
        if let Some(token) = self.peek() {
            std::mem::discriminant(&token.token_type) == std::mem::discriminant(token_type)
        } else {
            matches!(token_type, TokenType::EndOfFile)
        }
    }
    
    /// Consume token if it matches expected type
    pub(crate) fn match_token(&mut self, token_type: &TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }
    
    /// Expect and consume a specific token type
    pub(crate) fn expect(&mut self, token_type: TokenType, context: &str) -> Result<Token, ParseError> {
        match self.advance() {
            Some(token) if std::mem::discriminant(&token.token_type) == std::mem::discriminant(&token_type) => {
                Ok(token)
            }
            Some(token) => Err(ParseError::UnexpectedToken {
                expected: format!("{} in {}", token_type, context),
                found: token,
            }),
            None => Err(ParseError::UnexpectedEndOfFile {
                expected: format!("{} in {}", token_type, context),
                location: self.eof_location.clone(),
            }),
        }
    }
    
    /// Expect an identifier and return its name and span
    pub(crate) fn expect_identifier(&mut self, context: &str) -> Result<(String, SourceSpan), ParseError> {
        let token = self.expect(TokenType::Identifier(String::new()), context)?;
        match token.token_type {
            TokenType::Identifier(name) => Ok((name, token.span)),
            _ => Err(ParseError::UnexpectedToken {
                expected: format!("identifier in {}", context),
                found: token,
            }),
        }
    }
    
    /// Get current location for error reporting
    pub(crate) fn current_location(&self) -> SourceLocation {
        match self.peek() {
            Some(token) => token.span.start.clone(),
            None => self.eof_location.clone(),
        }
    }
    
    /// Span from `start` to the end of the last consumed token
    pub(crate) fn span_from(&self, start: SourceLocation) -> SourceSpan {
        let end = self.current_location();
        SourceSpan::new(start, end)
    }
}

/// A value of type `from` can be stored into a location of type `to`
pub(crate) fn check_assignable(from: &Type, to: &Type, span: &SourceSpan, context: &str) -> Result<(), CompilerError> {
    let ok = from == to
        || (from.is_numeric() && to.is_numeric())
        || (from.is_integer_class() && to.is_integer_class());
    if ok {
        Ok(())
    } else {
        Err(CompilerError::type_error(
            format!("cannot use {} as {} in {}", from, to, context),
            span.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ArithOp, ExpressionKind, Program, RelOp, Statement, StatementKind};
    use crate::lexer::Lexer;
    use mcc_common::Symbol;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> Result<(Program, SymbolTable), CompilerError> {
        let tokens = Lexer::new(input).tokenize()?;
        let mut parser = Parser::new(tokens);
        let program = parser.parse_program()?;
        Ok((program, parser.into_symbols()))
    }

    fn main_body(input: &str) -> Vec<Statement> {
        let (program, _) = parse(input).unwrap();
        program.functions.into_iter().next().unwrap().body
    }

    #[test]
    fn test_globals_and_strings() {
        let (program, symbols) = parse("int x; float *y; string s = \"hi\"; void main() { }").unwrap();
        assert_eq!(program.functions.len(), 1);

        let names: Vec<&str> = symbols.globals().map(Symbol::name).collect();
        assert_eq!(names, vec!["x", "y", "s"]);

        let y = symbols.lookup("y").and_then(|id| symbols.variable(id)).unwrap();
        assert_eq!(y.ty, Type::pointer_to(Type::Float));
        assert!(!y.is_local());
    }

    #[test]
    fn test_function_scope_layout() {
        let (program, symbols) =
            parse("int f(int a, float b) { int x; int y; return a; }").unwrap();
        let f = &program.functions[0];
        assert_eq!(f.parameters.len(), 2);

        let offset = |i: usize| symbols.variable(f.parameters[i].symbol).and_then(|v| v.frame_offset());
        assert_eq!(offset(0), Some(16));
        assert_eq!(offset(1), Some(12));

        let entry = symbols.function(f.symbol).unwrap();
        assert!(entry.is_defined());
        assert_eq!(entry.local_slot_count(), 2);
        assert_eq!(entry.param_types(), &[Type::Int, Type::Float]);
    }

    #[test]
    fn test_operator_precedence() {
        let body = main_body("int x; void main() { x = 2 + 3 * 4; }");
        let StatementKind::Assign { value, .. } = &body[0].kind else {
            panic!("expected assignment, got {:?}", body[0].kind);
        };
        match &value.kind {
            ExpressionKind::Binary { op: ArithOp::Add, left, right } => {
                assert_eq!(left.kind, ExpressionKind::IntLiteral(2));
                assert!(matches!(right.kind, ExpressionKind::Binary { op: ArithOp::Mul, .. }));
            }
            other => panic!("expected 2 + (3 * 4), got {:?}", other),
        }
    }

    #[test]
    fn test_left_associative_subtraction() {
        let body = main_body("int x; void main() { x = 8 - 2 - 1; }");
        let StatementKind::Assign { value, .. } = &body[0].kind else {
            panic!("expected assignment");
        };
        match &value.kind {
            ExpressionKind::Binary { op: ArithOp::Sub, left, right } => {
                assert!(matches!(left.kind, ExpressionKind::Binary { op: ArithOp::Sub, .. }));
                assert_eq!(right.kind, ExpressionKind::IntLiteral(1));
            }
            other => panic!("expected (8 - 2) - 1, got {:?}", other),
        }
    }

    #[test]
    fn test_if_else_and_while() {
        let body = main_body(
            "int i; void main() { while (i < 10) { i = i + 1; } if (i == 10) { print(i); } else { print(0); } }",
        );
        assert_eq!(body.len(), 2);
        match &body[0].kind {
            StatementKind::While { condition, body } => {
                assert!(matches!(condition.kind, ExpressionKind::Compare { op: RelOp::Less, .. }));
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected while, got {:?}", other),
        }
        match &body[1].kind {
            StatementKind::If { else_branch, .. } => assert!(else_branch.is_some()),
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_array_and_pointer_forms() {
        let body = main_body("int *a; int **m; int i; void main() { a[i] = 1; i = m[1][2]; *a = &i; }");
        assert_eq!(body.len(), 3);
        let StatementKind::Assign { target, .. } = &body[0].kind else {
            panic!("expected assignment");
        };
        assert!(matches!(target.kind, ExpressionKind::Deref(_)));
        assert_eq!(target.expr_type, Type::Int);
    }

    #[test]
    fn test_calls_and_heap() {
        let body = main_body(
            "int add(int a, int b); int *p; void main() { p = malloc(8); add(1, 2); free(p); }",
        );
        assert_eq!(body.len(), 3);
        assert!(matches!(body[1].kind, StatementKind::Call(_)));
        assert!(matches!(body[2].kind, StatementKind::Call(_)));
    }

    #[test]
    fn test_cast_and_negation() {
        let body = main_body("float f; int i; void main() { i = (int) f; f = -f; }");
        let StatementKind::Assign { value, .. } = &body[0].kind else {
            panic!("expected assignment");
        };
        assert!(matches!(value.kind, ExpressionKind::Cast { target: Type::Int, .. }));
    }

    #[test]
    fn test_semantic_errors() {
        let semantic = |src: &str| matches!(parse(src), Err(CompilerError::SemanticError { .. }));

        assert!(semantic("void main() { x = 1; }"));
        assert!(semantic("void main() { g(); }"));
        assert!(semantic("int f(int a); void main() { f(); }"));
        assert!(semantic("void f() { } void f() { }"));
        assert!(semantic("int x; int x;"));
        assert!(semantic("int *p; void main() { read(p); }"));
    }

    #[test]
    fn test_type_errors() {
        let type_error = |src: &str| matches!(parse(src), Err(CompilerError::TypeError { .. }));

        assert!(type_error("int x; void main() { x = *x; }"));
        assert!(type_error("int *p; int *q; void main() { p = p + q; }"));
        assert!(type_error("float f; int *p; void main() { p = f; }"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse("int x"), Err(CompilerError::ParseError { .. })));
        assert!(matches!(parse("int x; void main() { x + ; }"), Err(CompilerError::ParseError { .. })));
        assert!(matches!(parse("void main() { if (1) { } }"), Err(CompilerError::ParseError { .. })));
    }
}
