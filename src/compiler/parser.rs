//! Recursive-descent parser for the mini-C language
//!
//! The parser consumes the token stream and drives the quadruple generator
//! directly: statements are lowered as they are recognized, so there is no
//! separate tree walk for statements (expressions do build a small tree).
//!
//! # Grammar
//!
//! ```text
//! program   := (func_decl | stmt)*
//! func_decl := type IDENT '(' param_list ')' block
//! stmt      := decl | return | assign | call ';' | block | if | while
//! decl      := type IDENT ('[' NUMBER ']')? ';'
//! expr      := term (('+' | '-') term)*
//! term      := factor (('*' | '/') factor)*
//! factor    := IDENT | IDENT '(' args ')' | IDENT '[' expr ']'
//!            | NUMBER | CHAR | STRING | '(' expr ')'
//! ```

use std::fmt;

use crate::compiler::ast::{BinOp, Condition, Expr};
use crate::compiler::lexer::{Token, TokenKind};
use crate::compiler::quad::{QuadGenerator, Quadruple};

/// Syntax error with the byte offset of the offending token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl std::error::Error for ParseError {}

const TYPE_NAMES: [&str; 3] = ["int", "char", "string"];

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    label_id: usize,
    end_offset: usize,
    gen: QuadGenerator,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, source_len: usize) -> Self {
        Parser {
            tokens,
            pos: 0,
            label_id: 0,
            end_offset: source_len,
            gen: QuadGenerator::new(),
        }
    }

    pub fn into_quadruples(self) -> Vec<Quadruple> {
        self.gen.into_quadruples()
    }

    fn lookahead(&self) -> Token {
        self.tokens
            .get(self.pos)
            .cloned()
            .unwrap_or_else(|| Token::eof(self.end_offset))
    }

    fn peek_value(&self, ahead: usize) -> Option<&str> {
        self.tokens.get(self.pos + ahead).map(|t| t.text.as_str())
    }

    fn error(&self, message: String) -> ParseError {
        ParseError {
            message,
            offset: self.lookahead().offset,
        }
    }

    fn match_value(&mut self, value: &str) -> Result<Token, ParseError> {
        let t = self.lookahead();
        if t.text == value {
            self.pos += 1;
            Ok(t)
        } else {
            Err(self.error(format!("Expected {}, but found {}", value, t.text)))
        }
    }

    fn match_kind(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let t = self.lookahead();
        if t.kind == kind {
            self.pos += 1;
            Ok(t)
        } else {
            Err(self.error(format!("Expected {}, but found {}", kind, t.kind)))
        }
    }

    fn new_label(&mut self) -> String {
        let label = format!("L{}", self.label_id);
        self.label_id += 1;
        label
    }

    /// Parse the whole program: function declarations and top-level
    /// statements, in any order.
    pub fn parse_program(&mut self) -> Result<(), ParseError> {
        while self.lookahead().kind != TokenKind::Eof {
            if self.is_func_decl_start() {
                self.parse_func_decl()?;
            } else {
                self.parse_stmt()?;
            }
        }
        Ok(())
    }

    /// A function declaration starts with `type IDENT (`.
    fn is_func_decl_start(&self) -> bool {
        if !TYPE_NAMES.contains(&self.lookahead().text.as_str()) {
            return false;
        }
        let is_ident = self
            .tokens
            .get(self.pos + 1)
            .is_some_and(|t| t.kind == TokenKind::Identifier);
        is_ident && self.peek_value(2) == Some("(")
    }

    fn parse_func_decl(&mut self) -> Result<(), ParseError> {
        let return_type = self.match_kind(TokenKind::Keyword)?.text;
        let name = self.match_kind(TokenKind::Identifier)?.text;
        self.match_value("(")?;
        let params = self.parse_param_list()?;
        self.match_value(")")?;

        self.gen.func_start(&name);
        self.gen.func_def(&return_type, params.len(), &name);
        for (param_type, param_name) in &params {
            self.gen.param_decl(param_type, param_name);
        }
        self.parse_block()?;
        self.gen.func_end(&name);
        Ok(())
    }

    fn parse_param_list(&mut self) -> Result<Vec<(String, String)>, ParseError> {
        let mut params = Vec::new();
        if self.lookahead().text == ")" {
            return Ok(params);
        }
        loop {
            let param_type = self.match_kind(TokenKind::Keyword)?.text;
            let name = self.match_kind(TokenKind::Identifier)?.text;
            params.push((param_type, name));
            if self.lookahead().text == "," {
                self.match_value(",")?;
            } else {
                break;
            }
        }
        Ok(params)
    }

    fn parse_stmt_list(&mut self) -> Result<(), ParseError> {
        while self.lookahead().text != "}" && self.lookahead().kind != TokenKind::Eof {
            self.parse_stmt()?;
        }
        Ok(())
    }

    fn parse_stmt(&mut self) -> Result<(), ParseError> {
        let t = self.lookahead();
        if TYPE_NAMES.contains(&t.text.as_str()) {
            self.parse_decl_stmt()
        } else if t.text == "return" {
            self.parse_return_stmt()
        } else if t.kind == TokenKind::Identifier {
            let name = self.match_kind(TokenKind::Identifier)?.text;
            match self.lookahead().text.as_str() {
                "(" => {
                    let args = self.parse_call_args()?;
                    self.match_value(";")?;
                    self.gen.generate_call(&name, &args);
                    Ok(())
                }
                "=" => {
                    self.match_value("=")?;
                    let expr = self.parse_expr()?;
                    self.gen.assign(&name, &expr);
                    self.match_value(";")?;
                    Ok(())
                }
                "[" => {
                    self.match_value("[")?;
                    let index = self.parse_expr()?;
                    self.match_value("]")?;
                    self.match_value("=")?;
                    let value = self.parse_expr()?;
                    self.gen.assign_array(&name, &index, &value);
                    self.match_value(";")?;
                    Ok(())
                }
                other => Err(self.error(format!(
                    "Expected (, = or [ after identifier, but found {}",
                    other
                ))),
            }
        } else if t.text == "{" {
            self.parse_block()
        } else if t.text == "if" {
            self.parse_if_stmt()
        } else if t.text == "while" {
            self.parse_while_stmt()
        } else {
            Err(self.error(format!(
                "Expected DeclStmt, AssignStmt or Block, but found {}",
                t.text
            )))
        }
    }

    fn parse_return_stmt(&mut self) -> Result<(), ParseError> {
        self.match_value("return")?;
        let expr = if self.lookahead().text != ";" {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.match_value(";")?;
        self.gen.return_stmt(expr.as_ref());
        Ok(())
    }

    fn parse_if_stmt(&mut self) -> Result<(), ParseError> {
        self.match_value("if")?;
        self.match_value("(")?;
        let cond = self.parse_condition()?;
        self.match_value(")")?;

        let label_else = self.new_label();
        let label_end = self.new_label();

        self.gen.if_false(&cond, &label_else);
        self.parse_stmt()?;

        if self.lookahead().text == "else" {
            self.gen.goto_label(&label_end);
            self.gen.emit_el();
            self.gen.emit_label(&label_else);
            self.match_value("else")?;
            self.parse_stmt()?;
            self.gen.emit_label(&label_end);
        } else {
            self.gen.emit_label(&label_else);
        }
        self.gen.emit_ie();
        Ok(())
    }

    fn parse_while_stmt(&mut self) -> Result<(), ParseError> {
        self.match_value("while")?;
        let label_start = self.new_label();
        let label_end = self.new_label();

        self.gen.emit_wh();
        self.gen.emit_label(&label_start);

        self.match_value("(")?;
        let cond = self.parse_condition()?;
        self.match_value(")")?;

        self.gen.if_false(&cond, &label_end);
        self.parse_stmt()?;
        self.gen.goto_label(&label_start);
        self.gen.emit_label(&label_end);

        self.gen.emit_we();
        Ok(())
    }

    fn parse_condition(&mut self) -> Result<Condition, ParseError> {
        let left = self.parse_expr()?;
        let op = self.match_kind(TokenKind::Operator)?.text;
        let right = self.parse_expr()?;
        Ok(Condition { op, left, right })
    }

    fn parse_decl_stmt(&mut self) -> Result<(), ParseError> {
        let var_type = self.match_kind(TokenKind::Keyword)?.text;
        let name = self.match_kind(TokenKind::Identifier)?.text;
        self.gen.var_decl(&var_type, &name);

        if self.lookahead().text == "[" {
            self.match_value("[")?;
            let size_token = self.match_kind(TokenKind::Number)?;
            self.match_value("]")?;
            let size: i64 = size_token
                .text
                .parse()
                .map_err(|_| self.error(format!("Invalid array size {}", size_token.text)))?;
            self.gen.declare_array(&name, size);
        }
        self.match_value(";")?;
        Ok(())
    }

    fn parse_block(&mut self) -> Result<(), ParseError> {
        self.match_value("{")?;
        self.parse_stmt_list()?;
        self.match_value("}")?;
        Ok(())
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        self.match_value("(")?;
        if self.lookahead().text != ")" {
            loop {
                args.push(self.parse_expr()?);
                if self.lookahead().text == "," {
                    self.match_value(",")?;
                } else {
                    break;
                }
            }
        }
        self.match_value(")")?;
        Ok(args)
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;
        while matches!(self.lookahead().text.as_str(), "+" | "-") {
            let text = self.match_kind(TokenKind::Operator)?.text;
            let op = BinOp::from_str(&text)
                .ok_or_else(|| self.error(format!("Unexpected operator {}", text)))?;
            let right = self.parse_term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_factor()?;
        while matches!(self.lookahead().text.as_str(), "*" | "/") {
            let text = self.match_kind(TokenKind::Operator)?.text;
            let op = BinOp::from_str(&text)
                .ok_or_else(|| self.error(format!("Unexpected operator {}", text)))?;
            let right = self.parse_factor()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let t = self.lookahead();
        match t.kind {
            TokenKind::Identifier => {
                let name = self.match_kind(TokenKind::Identifier)?.text;
                match self.lookahead().text.as_str() {
                    "(" => {
                        let args = self.parse_call_args()?;
                        Ok(Expr::Call { name, args })
                    }
                    "[" => {
                        self.match_value("[")?;
                        let index = self.parse_expr()?;
                        self.match_value("]")?;
                        Ok(Expr::ArrayAccess {
                            name,
                            index: Box::new(index),
                        })
                    }
                    _ => Ok(Expr::Var(name)),
                }
            }
            TokenKind::Number => {
                let token = self.match_kind(TokenKind::Number)?;
                let value: i64 = token
                    .text
                    .parse()
                    .map_err(|_| self.error(format!("Invalid number {}", token.text)))?;
                Ok(Expr::Number(value))
            }
            TokenKind::CharLiteral => {
                let token = self.match_kind(TokenKind::CharLiteral)?;
                Ok(Expr::Char(token.text.chars().next().unwrap_or(' ')))
            }
            TokenKind::StringLiteral => {
                let token = self.match_kind(TokenKind::StringLiteral)?;
                Ok(Expr::Str(token.text))
            }
            _ if t.text == "(" => {
                self.match_value("(")?;
                let expr = self.parse_expr()?;
                self.match_value(")")?;
                Ok(expr)
            }
            _ => Err(self.error(format!(
                "Expected Identifier, Number, Character or String, but found {}",
                t.text
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::lexer::Lexer;

    fn quads(source: &str) -> Vec<String> {
        let out = Lexer::new(source).analyze().unwrap();
        let mut parser = Parser::new(out.tokens, source.len());
        parser.parse_program().unwrap();
        parser
            .into_quadruples()
            .iter()
            .map(|q| q.to_string())
            .collect()
    }

    fn parse_err(source: &str) -> ParseError {
        let out = Lexer::new(source).analyze().unwrap();
        let mut parser = Parser::new(out.tokens, source.len());
        parser.parse_program().unwrap_err()
    }

    #[test]
    fn test_declaration_and_assignment() {
        assert_eq!(
            quads("int x; x = 1 + 2;"),
            vec!["(var_decl int _ x)", "(= 3 _ x)"]
        );
    }

    #[test]
    fn test_operator_precedence() {
        assert_eq!(
            quads("x = a + b * c;"),
            vec!["(* b c t0)", "(+ a t0 t1)", "(= t1 _ x)"]
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(
            quads("x = (a + b) * c;"),
            vec!["(+ a b t0)", "(* t0 c t1)", "(= t1 _ x)"]
        );
    }

    #[test]
    fn test_if_else_shape() {
        assert_eq!(
            quads("if (a < b) x = 1; else x = 2;"),
            vec![
                "(< a b t0)",
                "(if t0 _ L0)",
                "(= 1 _ x)",
                "(goto _ _ L1)",
                "(el _ _ _)",
                "(label _ _ L0)",
                "(= 2 _ x)",
                "(label _ _ L1)",
                "(ie _ _ _)",
            ]
        );
    }

    #[test]
    fn test_while_shape() {
        assert_eq!(
            quads("while (i < 10) i = i + 1;"),
            vec![
                "(wh _ _ _)",
                "(label _ _ L0)",
                "(< i 10 t0)",
                "(if t0 _ L1)",
                "(+ i 1 t1)",
                "(= t1 _ i)",
                "(goto _ _ L0)",
                "(label _ _ L1)",
                "(we _ _ _)",
            ]
        );
    }

    #[test]
    fn test_function_declaration() {
        assert_eq!(
            quads("int add(int a, int b) { return a + b; }"),
            vec![
                "(FuncStart _ _ add)",
                "(FuncDef int 2 add)",
                "(param_decl int _ a)",
                "(param_decl int _ b)",
                "(+ a b t0)",
                "(return t0 _ _)",
                "(FuncEnd _ _ add)",
            ]
        );
    }

    #[test]
    fn test_call_statement() {
        assert_eq!(
            quads("add(1, x);"),
            vec!["(param 1 _ _)", "(param x _ _)", "(call add 2 t0)"]
        );
    }

    #[test]
    fn test_array_declaration_and_assignment() {
        assert_eq!(
            quads("int a[10]; a[2] = 5;"),
            vec!["(var_decl int _ a)", "(ARRAY_DECL a 10 _)", "(= 5 _ a[2])"]
        );
    }

    #[test]
    fn test_array_read_in_expression() {
        assert_eq!(
            quads("x = a[i] + 1;"),
            vec!["(= a[i] _ t0)", "(+ t0 1 t1)", "(= t1 _ x)"]
        );
    }

    #[test]
    fn test_missing_semicolon_reports_offset() {
        let err = parse_err("x = 1");
        assert!(err.message.contains("Expected ;"), "{}", err.message);
        assert_eq!(err.offset, 5);
    }

    #[test]
    fn test_bad_statement_start() {
        let err = parse_err("+ 1;");
        assert!(err
            .message
            .contains("Expected DeclStmt, AssignStmt or Block"));
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn test_unclosed_block() {
        let err = parse_err("{ x = 1;");
        assert!(err.message.contains("Expected }"));
    }
}
