use std::{fmt, sync::Arc};

use super::{Foreign, Function, Table, Value};

/// 2^53: the largest range in which every integer is exactly representable.
const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Integral values below this print positionally; from here on they use
/// exponent notation.
const PLAIN_INT_LIMIT: f64 = 1e21;

/// Guest-visible spelling of a number, as used by concatenation and `print`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if n.fract() == 0.0 && n.abs() < EXACT_INT_LIMIT {
        let mut buf = itoa::Buffer::new();
        return buf.format(n as i64).to_string();
    }
    let mut buf = ryu::Buffer::new();
    let text = buf.format_finite(n);
    if n.fract() == 0.0 && n.abs() < PLAIN_INT_LIMIT {
        return expand_integral(text);
    }
    text.to_string()
}

/// Spell a large integral value's shortest digits positionally, padding with
/// zeros: `1.2345678901234568e20` becomes `123456789012345680000`.
fn expand_integral(text: &str) -> String {
    let Some((mantissa, exp)) = text.split_once('e') else {
        return text.strip_suffix(".0").unwrap_or(text).to_string();
    };
    let Ok(exp) = exp.parse::<usize>() else {
        return text.to_string();
    };
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let width = exp + 1;
    format!("{sign}{digits:0<width$}")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Str(s) => f.write_str(s),
            Value::Function(func) => write!(f, "function: {:#x}", func.addr()),
            Value::Table(t) => write!(f, "table: {:#x}", t.addr()),
            Value::Foreign(foreign) => write!(f, "{}: {:#x}", foreign.label(), foreign.addr()),
        }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    #[inline]
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    #[inline]
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Value::Str(Arc::<str>::from(s))
    }
}

impl From<Arc<str>> for Value {
    #[inline]
    fn from(s: Arc<str>) -> Self {
        Value::Str(s)
    }
}

impl From<Table> for Value {
    #[inline]
    fn from(t: Table) -> Self {
        Value::Table(t)
    }
}

impl From<Function> for Value {
    #[inline]
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<Foreign> for Value {
    #[inline]
    fn from(f: Foreign) -> Self {
        Value::Foreign(f)
    }
}

impl From<()> for Value {
    #[inline]
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

impl From<&Value> for Value {
    #[inline]
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(o: Option<T>) -> Self {
        match o {
            Some(v) => v.into(),
            None => Value::Nil,
        }
    }
}
