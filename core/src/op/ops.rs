use core::fmt::{self, Display};
use std::sync::Arc;

use crate::error::{Result, RuntimeError};
use crate::val::{Value, coerce_number, format_number};

/// Override keys recognised on a metatable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaKey {
    Index,
    NewIndex,
    Len,
    Unm,
    Eq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Concat,
    Lt,
    Gt,
    Call,
}

impl MetaKey {
    pub const fn name(self) -> &'static str {
        match self {
            MetaKey::Index => "__index",
            MetaKey::NewIndex => "__newindex",
            MetaKey::Len => "__len",
            MetaKey::Unm => "__unm",
            MetaKey::Eq => "__eq",
            MetaKey::Add => "__add",
            MetaKey::Sub => "__sub",
            MetaKey::Mul => "__mul",
            MetaKey::Div => "__div",
            MetaKey::Mod => "__mod",
            MetaKey::Pow => "__pow",
            MetaKey::Concat => "__concat",
            MetaKey::Lt => "__lt",
            MetaKey::Gt => "__gt",
            MetaKey::Call => "__call",
        }
    }
}

impl Display for MetaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<MetaKey> for Value {
    #[inline]
    fn from(key: MetaKey) -> Self {
        Value::from(key.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl ArithOp {
    pub const fn meta_key(self) -> MetaKey {
        match self {
            ArithOp::Add => MetaKey::Add,
            ArithOp::Sub => MetaKey::Sub,
            ArithOp::Mul => MetaKey::Mul,
            ArithOp::Div => MetaKey::Div,
            ArithOp::Mod => MetaKey::Mod,
            ArithOp::Pow => MetaKey::Pow,
        }
    }

    /// IEEE semantics throughout: division by zero yields an infinity or
    /// `NaN`, and `%` is the truncated remainder.
    #[inline]
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            ArithOp::Add => a + b,
            ArithOp::Sub => a - b,
            ArithOp::Mul => a * b,
            ArithOp::Div => a / b,
            ArithOp::Mod => a % b,
            ArithOp::Pow => a.powf(b),
        }
    }

    /// Raw path: both operands must coerce to numbers. The error names the
    /// first operand that does not, left to right.
    pub fn raw(self, a: &Value, b: &Value) -> Result<Value> {
        match (coerce_number(a), coerce_number(b)) {
            (Some(x), Some(y)) => Ok(Value::Number(self.apply(x, y))),
            (None, _) => Err(RuntimeError::attempt("perform arithmetic on", a.kind())),
            (_, None) => Err(RuntimeError::attempt("perform arithmetic on", b.kind())),
        }
    }
}

impl Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithOp::Add => write!(f, "+"),
            ArithOp::Sub => write!(f, "-"),
            ArithOp::Mul => write!(f, "*"),
            ArithOp::Div => write!(f, "/"),
            ArithOp::Mod => write!(f, "%"),
            ArithOp::Pow => write!(f, "^"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    Gt,
}

impl CmpOp {
    pub const fn meta_key(self) -> MetaKey {
        match self {
            CmpOp::Lt => MetaKey::Lt,
            CmpOp::Gt => MetaKey::Gt,
        }
    }

    /// Raw path: both operands numbers, or both strings.
    pub fn raw(self, a: &Value, b: &Value) -> Result<bool> {
        let ord = match (a, b) {
            (Value::Number(x), Value::Number(y)) => x.partial_cmp(y),
            (Value::Str(x), Value::Str(y)) => Some(x.cmp(y)),
            _ => return Err(RuntimeError::compare(a.kind(), b.kind())),
        };
        // NaN is unordered: every comparison with it is false.
        Ok(match (self, ord) {
            (_, None) => false,
            (CmpOp::Lt, Some(o)) => o.is_lt(),
            (CmpOp::Gt, Some(o)) => o.is_gt(),
        })
    }
}

impl Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CmpOp::Lt => write!(f, "<"),
            CmpOp::Gt => write!(f, ">"),
        }
    }
}

/// Raw negation through numeric coercion.
pub fn raw_unm(v: &Value) -> Result<Value> {
    match coerce_number(v) {
        Some(n) => Ok(Value::Number(-n)),
        None => Err(RuntimeError::attempt("perform arithmetic on", v.kind())),
    }
}

fn concat_operand(v: &Value) -> Option<Arc<str>> {
    match v {
        Value::Str(s) => Some(s.clone()),
        Value::Number(n) => Some(Arc::from(format_number(*n))),
        _ => None,
    }
}

/// Raw concatenation: numbers are stringified, then both sides must be
/// strings. A failing first operand is reported before the second one.
pub fn raw_concat(a: &Value, b: &Value) -> Result<Value> {
    match (concat_operand(a), concat_operand(b)) {
        (Some(x), Some(y)) => {
            let mut out = String::with_capacity(x.len() + y.len());
            out.push_str(&x);
            out.push_str(&y);
            Ok(Value::from(out))
        }
        (None, _) => Err(RuntimeError::attempt("concatenate", a.kind())),
        // a number never reaches here: it was stringified above
        (Some(_), None) => Err(RuntimeError::attempt("concatenate", b.kind())),
    }
}
