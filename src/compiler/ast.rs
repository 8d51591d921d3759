//! Expression tree built by the parser and consumed by the quadruple
//! generator.

/// Arithmetic operator of a binary expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "+" => Some(BinOp::Add),
            "-" => Some(BinOp::Sub),
            "*" => Some(BinOp::Mul),
            "/" => Some(BinOp::Div),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }

    /// Fixed-width arithmetic: overflow wraps, matching the 16-bit target's
    /// silent wraparound. Division by zero is the caller's concern.
    pub fn apply(self, left: i64, right: i64) -> i64 {
        match self {
            BinOp::Add => left.wrapping_add(right),
            BinOp::Sub => left.wrapping_sub(right),
            BinOp::Mul => left.wrapping_mul(right),
            BinOp::Div => left.wrapping_div(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Number(i64),
    Char(char),
    Str(String),
    Var(String),
    ArrayAccess {
        name: String,
        index: Box<Expr>,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

/// Relational condition of an `if` or `while` head. The operator stays a
/// string because it flows into the quadruple unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub op: String,
    pub left: Expr,
    pub right: Expr,
}
