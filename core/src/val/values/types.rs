use std::fmt;

use super::Value;

/// Classification of a guest value, as named in guest-visible messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Nil,
    Boolean,
    Number,
    String,
    Function,
    Table,
    Foreign,
}

impl Kind {
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Nil => "nil",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Function => "function",
            Kind::Table => "table",
            Kind::Foreign => "js",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    #[inline]
    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Nil,
            Value::Bool(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::Str(_) => Kind::String,
            Value::Function(_) => Kind::Function,
            Value::Table(_) => Kind::Table,
            Value::Foreign(_) => Kind::Foreign,
        }
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }
}
