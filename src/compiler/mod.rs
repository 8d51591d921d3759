//! Mini-C compiler pipeline
//!
//! Source text flows through four stages, each of which feeds one or more
//! output sections:
//!
//! ```text
//! source --> lexer --> parser --> quadruples --> assembly
//!              |                      |
//!              v                      v
//!        category tables        symbol table
//! ```
//!
//! - `lexer` - Tokenization plus the five category tables
//! - `ast` - Expression tree shared by parser and quadruple generator
//! - `parser` - Recursive descent, drives quadruple generation
//! - `quad` - Quadruple records and the generator
//! - `asm` - 8086 assembly from quadruples
//! - `symbols` - Symbol table reconstructed from quadruples
//!
//! [`compile`] runs the whole pipeline and never panics on bad input: every
//! failure becomes a [`CompileOutcome`] with `success == false` and an error
//! message pointing into the source.

pub mod asm;
pub mod ast;
pub mod lexer;
pub mod parser;
pub mod quad;
pub mod symbols;

use crate::compiler::asm::AsmGenerator;
use crate::compiler::lexer::Lexer;
use crate::compiler::parser::Parser;
use crate::compiler::symbols::SymbolTable;
use crate::logger;

/// Width of the caret line underlining the error position.
const ERROR_MARKER: &str = "^^^^^^^^^^^^^^^^^^^^^^^^^^^^";

/// Everything one compilation run produced, keyed loosely by output section.
#[derive(Debug, Default)]
pub struct CompileOutcome {
    pub success: bool,
    pub message: String,
    pub quadruples: Vec<String>,
    pub standard_sequence: Vec<String>,
    pub assembly: Vec<String>,
    pub symbol_table: Vec<String>,
    pub keyword_table: Vec<String>,
    pub identifier_table: Vec<String>,
    pub constant_table: Vec<String>,
    pub operator_table: Vec<String>,
    pub separator_table: Vec<String>,
}

impl CompileOutcome {
    fn fail(message: String) -> Self {
        CompileOutcome {
            success: false,
            message,
            ..CompileOutcome::default()
        }
    }

    /// Section contents keyed by section id. Failure text lands in the
    /// primary section so it is visible even with everything else collapsed.
    pub fn sections(&self) -> Vec<(&'static str, Vec<String>)> {
        let opt_area = if self.success {
            self.quadruples.clone()
        } else {
            self.message.lines().map(str::to_string).collect()
        };
        vec![
            ("opt_area", opt_area),
            ("asm", self.assembly.clone()),
            ("tokens", self.standard_sequence.clone()),
            ("symbol_table", self.symbol_table.clone()),
            ("keyword_table", self.keyword_table.clone()),
            ("identifier_table", self.identifier_table.clone()),
            ("constant_table", self.constant_table.clone()),
            ("operator_table", self.operator_table.clone()),
            ("separator_table", self.separator_table.clone()),
        ]
    }
}

/// Point into the source: everything before the offending offset, a caret
/// line, then the rest.
fn error_context(source: &str, offset: usize) -> String {
    let offset = offset.min(source.len());
    format!(
        "{}\n{}\n{}",
        &source[..offset],
        ERROR_MARKER,
        &source[offset..]
    )
}

/// Run the full pipeline over `source`.
pub fn compile(source: &str) -> CompileOutcome {
    let lexed = match Lexer::new(source).analyze() {
        Ok(lexed) => lexed,
        Err(e) => {
            logger::warn(format!("lex error: {}", e));
            return CompileOutcome::fail(format!(
                "lexical error: {}\n{}",
                e.message,
                error_context(source, e.offset)
            ));
        }
    };

    let mut outcome = CompileOutcome {
        standard_sequence: lexed.standard_sequence.clone(),
        keyword_table: lexed.keyword_table.rows(),
        identifier_table: lexed.identifier_table.rows(),
        constant_table: lexed.constant_table.rows(),
        operator_table: lexed.operator_table.rows(),
        separator_table: lexed.separator_table.rows(),
        ..CompileOutcome::default()
    };

    let token_count = lexed.tokens.len();
    let mut parser = Parser::new(lexed.tokens, source.len());
    if let Err(e) = parser.parse_program() {
        logger::warn(format!("parse error: {}", e));
        outcome.message = format!(
            "syntax error: {}\n{}",
            e.message,
            error_context(source, e.offset)
        );
        return outcome;
    }

    let quadruples = parser.into_quadruples();
    outcome.quadruples = quadruples.iter().map(|q| q.to_string()).collect();
    outcome.symbol_table = SymbolTable::build_from_quadruples(&quadruples).render();

    let mut asm_gen = AsmGenerator::new();
    if let Err(e) = asm_gen.generate(&quadruples) {
        logger::error(format!("asm error: {}", e));
        outcome.message = format!("assembly error: {}", e.message);
        return outcome;
    }
    outcome.assembly = asm_gen.into_lines();

    outcome.success = true;
    outcome.message = format!(
        "Compiled: {} tokens, {} quadruples",
        token_count,
        outcome.quadruples.len()
    );
    outcome
}
