//! 8086 assembly generation from quadruples
//!
//! Emits MASM-style 16-bit assembly. Results are spilled to a flat memory
//! area addressed off SI, one 2-byte slot per named value, allocated at first
//! write starting at offset 100. Reads reference operands by name; numeric
//! and character operands pass through as immediates.
//!
//! Relational quadruples materialize a 0/1 value in AX (the comparison flags
//! survive the `MOV AX, 1` so the conditional jump still sees them), and the
//! following `if` quadruple tests that value against zero.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::compiler::quad::Quadruple;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsmError {
    pub message: String,
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AsmError {}

pub struct AsmGenerator {
    code: Vec<String>,
    memory_locations: FxHashMap<String, usize>,
    current_memory: usize,
    label_counter: usize,
    current_function: String,
}

impl Default for AsmGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl AsmGenerator {
    pub fn new() -> Self {
        let mut gen = AsmGenerator {
            code: Vec::new(),
            memory_locations: FxHashMap::default(),
            current_memory: 100,
            label_counter: 0,
            current_function: "_main".to_string(),
        };
        gen.emit(".MODEL SMALL");
        gen.emit(".DATA");
        gen.emit("");
        gen.emit(".CODE");
        gen.emit("MAIN PROC");
        gen.emit("    MOV AX, @DATA");
        gen.emit("    MOV DS, AX");
        gen.emit("");
        gen
    }

    fn emit(&mut self, line: &str) {
        self.code.push(line.to_string());
    }

    /// Slot offset for a named value, allocated on first use.
    fn location(&mut self, name: &str) -> usize {
        if let Some(&loc) = self.memory_locations.get(name) {
            return loc;
        }
        let loc = self.current_memory;
        self.memory_locations.insert(name.to_string(), loc);
        self.current_memory += 2;
        loc
    }

    pub fn generate(&mut self, quadruples: &[Quadruple]) -> Result<(), AsmError> {
        for q in quadruples {
            match q.op.as_str() {
                "=" => self.gen_assignment(q),
                "+" | "-" | "*" | "/" => self.gen_arithmetic(q),
                "<" | "<=" | ">" | ">=" | "==" | "!=" => self.gen_relational(q),
                "if" => self.gen_conditional(q),
                "goto" => self.emit(&format!("    JMP {}", q.result)),
                "label" => self.emit(&format!("{}:", q.result)),
                "el" | "ie" | "we" | "wh" => self.gen_control_label(q),
                "FuncStart" => self.gen_function_start(q),
                "FuncEnd" => self.gen_function_end(),
                "ARRAY_DECL" => self.emit(&format!("{} DW {} DUP(?)", q.arg1, q.arg2)),
                "return" => self.gen_return(q),
                "param" => self.emit(&format!("    PUSH {}", q.arg1)),
                "call" => self.gen_call(q),
                // Declarations carry no runtime code.
                "FuncDef" | "var_decl" | "param_decl" => {}
                other => {
                    return Err(AsmError {
                        message: format!("Unsupported operation: {}", other),
                    })
                }
            }
        }

        self.emit("    MOV AX, 4C00H");
        self.emit("    INT 21H");
        self.emit("MAIN ENDP");
        self.emit("END MAIN");
        Ok(())
    }

    fn gen_assignment(&mut self, q: &Quadruple) {
        let loc = self.location(&q.result);
        self.emit(&format!("    MOV AX, {}", q.arg1));
        self.emit(&format!("    MOV [SI+{}], AX", loc));
    }

    fn gen_arithmetic(&mut self, q: &Quadruple) {
        let loc = self.location(&q.result);
        self.emit(&format!("    MOV AX, {}", q.arg1));
        match q.op.as_str() {
            "+" => self.emit(&format!("    ADD AX, {}", q.arg2)),
            "-" => self.emit(&format!("    SUB AX, {}", q.arg2)),
            "*" => self.emit(&format!("    MUL {}", q.arg2)),
            "/" => {
                self.emit(&format!("    MOV BX, {}", q.arg2));
                self.emit("    MOV DX, 0");
                self.emit("    DIV BX");
            }
            _ => {}
        }
        self.emit(&format!("    MOV [SI+{}], AX", loc));
    }

    fn gen_relational(&mut self, q: &Quadruple) {
        let jump = match q.op.as_str() {
            "<" => "JL",
            "<=" => "JLE",
            ">" => "JG",
            ">=" => "JGE",
            "==" => "JE",
            _ => "JNE",
        };
        let skip = format!("CMP_{}", self.label_counter);
        self.label_counter += 1;
        let loc = self.location(&q.result);

        self.emit(&format!("    MOV AX, {}", q.arg1));
        self.emit(&format!("    CMP AX, {}", q.arg2));
        self.emit("    MOV AX, 1");
        self.emit(&format!("    {} {}", jump, skip));
        self.emit("    MOV AX, 0");
        self.emit(&format!("{}:", skip));
        self.emit(&format!("    MOV [SI+{}], AX", loc));
    }

    fn gen_conditional(&mut self, q: &Quadruple) {
        self.emit(&format!("    MOV AX, {}", q.arg1));
        self.emit("    CMP AX, 0");
        self.emit(&format!("    JE {}", q.result));
    }

    fn gen_control_label(&mut self, q: &Quadruple) {
        let line = format!("{}_{}:", q.op, self.label_counter);
        self.label_counter += 1;
        self.emit(&line);
    }

    fn gen_function_start(&mut self, q: &Quadruple) {
        self.current_function = q.result.clone();
        self.emit(&format!("{} PROC", self.current_function.to_uppercase()));
    }

    fn gen_function_end(&mut self) {
        self.emit("    RET");
        self.emit(&format!("{} ENDP", self.current_function.to_uppercase()));
    }

    fn gen_return(&mut self, q: &Quadruple) {
        if q.arg1 != "_" {
            self.emit(&format!("    MOV AX, {}", q.arg1));
        }
        self.emit("    RET");
    }

    fn gen_call(&mut self, q: &Quadruple) {
        let loc = self.location(&q.result);
        self.emit(&format!("    CALL {}", q.arg1.to_uppercase()));
        self.emit(&format!("    MOV [SI+{}], AX", loc));
    }

    pub fn lines(&self) -> &[String] {
        &self.code
    }

    pub fn into_lines(self) -> Vec<String> {
        self.code
    }
}
