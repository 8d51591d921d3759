//! Quadruple intermediate code generation
//!
//! Every construct lowers to `(op arg1 arg2 result)` records; `_` marks an
//! unused slot. Temporaries are named `t0, t1, ...` in allocation order. The
//! generator folds constant arithmetic at build time and reuses temporaries
//! for repeated subexpressions via a common-subexpression cache.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::compiler::ast::{BinOp, Condition, Expr};

/// One intermediate-code record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quadruple {
    pub op: String,
    pub arg1: String,
    pub arg2: String,
    pub result: String,
}

impl Quadruple {
    pub fn new(op: &str, arg1: &str, arg2: &str, result: &str) -> Self {
        Quadruple {
            op: op.to_string(),
            arg1: arg1.to_string(),
            arg2: arg2.to_string(),
            result: result.to_string(),
        }
    }
}

impl fmt::Display for Quadruple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {} {})", self.op, self.arg1, self.arg2, self.result)
    }
}

fn is_number(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Builds the quadruple list as the parser walks the program.
#[derive(Debug, Default)]
pub struct QuadGenerator {
    temp_id: usize,
    cse_cache: FxHashMap<String, String>,
    quads: Vec<Quadruple>,
}

impl QuadGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quadruples(&self) -> &[Quadruple] {
        &self.quads
    }

    pub fn into_quadruples(self) -> Vec<Quadruple> {
        self.quads
    }

    fn new_temp(&mut self) -> String {
        let t = format!("t{}", self.temp_id);
        self.temp_id += 1;
        t
    }

    /// Evaluate a condition and jump to `label` when it is false.
    pub fn if_false(&mut self, cond: &Condition, label: &str) {
        let left = self.generate_expr(&cond.left);
        let right = self.generate_expr(&cond.right);
        let temp = self.new_temp();
        self.quads
            .push(Quadruple::new(&cond.op, &left, &right, &temp));
        self.quads.push(Quadruple::new("if", &temp, "_", label));
    }

    pub fn goto_label(&mut self, label: &str) {
        self.quads.push(Quadruple::new("goto", "_", "_", label));
    }

    pub fn emit_label(&mut self, label: &str) {
        self.quads.push(Quadruple::new("label", "_", "_", label));
    }

    /// Structural markers bracketing else branches and while loops.
    pub fn emit_el(&mut self) {
        self.quads.push(Quadruple::new("el", "_", "_", "_"));
    }

    pub fn emit_ie(&mut self) {
        self.quads.push(Quadruple::new("ie", "_", "_", "_"));
    }

    pub fn emit_wh(&mut self) {
        self.quads.push(Quadruple::new("wh", "_", "_", "_"));
    }

    pub fn emit_we(&mut self) {
        self.quads.push(Quadruple::new("we", "_", "_", "_"));
    }

    pub fn func_start(&mut self, name: &str) {
        self.quads.push(Quadruple::new("FuncStart", "_", "_", name));
    }

    pub fn func_end(&mut self, name: &str) {
        self.quads.push(Quadruple::new("FuncEnd", "_", "_", name));
    }

    /// `(FuncDef returnType paramCount name)`
    pub fn func_def(&mut self, return_type: &str, param_count: usize, name: &str) {
        self.quads.push(Quadruple::new(
            "FuncDef",
            return_type,
            &param_count.to_string(),
            name,
        ));
    }

    pub fn param_decl(&mut self, param_type: &str, name: &str) {
        self.quads
            .push(Quadruple::new("param_decl", param_type, "_", name));
    }

    pub fn var_decl(&mut self, var_type: &str, name: &str) {
        self.quads
            .push(Quadruple::new("var_decl", var_type, "_", name));
    }

    pub fn declare_array(&mut self, name: &str, size: i64) {
        self.quads
            .push(Quadruple::new("ARRAY_DECL", name, &size.to_string(), "_"));
    }

    fn array_access(&mut self, name: &str, index: &Expr) -> String {
        let index_value = self.generate_expr(index);
        let temp = self.new_temp();
        let element = format!("{}[{}]", name, index_value);
        self.quads.push(Quadruple::new("=", &element, "_", &temp));
        temp
    }

    pub fn assign_array(&mut self, name: &str, index: &Expr, value: &Expr) {
        let index_value = self.generate_expr(index);
        let value = self.generate_expr(value);
        let target = format!("{}[{}]", name, index_value);
        self.quads.push(Quadruple::new("=", &value, "_", &target));
    }

    pub fn assign(&mut self, var: &str, expr: &Expr) {
        let value = self.generate_expr(expr);
        self.quads.push(Quadruple::new("=", &value, "_", var));
    }

    pub fn return_stmt(&mut self, expr: Option<&Expr>) {
        let value = match expr {
            Some(expr) => self.generate_expr(expr),
            None => "_".to_string(),
        };
        self.quads.push(Quadruple::new("return", &value, "_", "_"));
    }

    /// Function call: one `param` record per argument in order, then the
    /// `call` record carrying the argument count. Returns the temp holding
    /// the call result.
    pub fn generate_call(&mut self, name: &str, args: &[Expr]) -> String {
        let values: Vec<String> = args.iter().map(|a| self.generate_expr(a)).collect();
        for value in &values {
            self.quads.push(Quadruple::new("param", value, "_", "_"));
        }
        let temp = self.new_temp();
        self.quads
            .push(Quadruple::new("call", name, &values.len().to_string(), &temp));
        temp
    }

    /// Lower an expression and return the operand naming its value.
    pub fn generate_expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Number(n) => n.to_string(),
            Expr::Char(c) => format!("'{}'", c),
            Expr::Str(s) => format!("\"{}\"", s),
            Expr::Var(name) => name.clone(),
            Expr::ArrayAccess { name, index } => self.array_access(name, index),
            Expr::Call { name, args } => self.generate_call(name, args),
            Expr::Binary { op, left, right } => {
                let arg1 = self.generate_expr(left);
                let arg2 = self.generate_expr(right);

                let key = format!("{},{},{}", op.as_str(), arg1, arg2);
                if let Some(cached) = self.cse_cache.get(&key) {
                    return cached.clone();
                }

                if is_number(&arg1) && is_number(&arg2) {
                    let a: i64 = arg1.parse().unwrap_or(0);
                    let b: i64 = arg2.parse().unwrap_or(0);
                    // Division by a constant zero stays a runtime concern.
                    if !(*op == BinOp::Div && b == 0) {
                        return op.apply(a, b).to_string();
                    }
                }

                let result = self.new_temp();
                self.quads
                    .push(Quadruple::new(op.as_str(), &arg1, &arg2, &result));
                self.cse_cache.insert(key, result.clone());
                result
            }
        }
    }
}
