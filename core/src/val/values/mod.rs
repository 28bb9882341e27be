use std::{any::Any, fmt, future::Future, sync::Arc};

use futures::future::{BoxFuture, FutureExt, ready};

use crate::error::Result;

mod convert;
mod numeric;
mod table;
mod types;

pub use convert::format_number;
pub use numeric::{coerce_number, to_number};
pub use table::{Table, raw_get, raw_len, raw_set};
pub use types::Kind;

/// Future produced by invoking a guest function. Awaiting it may suspend the
/// enclosing coroutine; the driver resumes it by polling again.
pub type GuestFuture = BoxFuture<'static, Result<Vec<Value>>>;

type FunctionBody = dyn Fn(Vec<Value>) -> GuestFuture + Send + Sync;

/// Invocable handle. Captured state is owned by the closure itself.
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    body: Arc<FunctionBody>,
}

impl Function {
    /// Wrap an asynchronous guest body.
    pub fn new<F, Fut>(name: impl AsRef<str>, body: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Value>>> + Send + 'static,
    {
        Self {
            name: Arc::from(name.as_ref()),
            body: Arc::new(move |args| body(args).boxed()),
        }
    }

    /// Wrap a synchronous host function; it never suspends.
    pub fn native<F>(name: impl AsRef<str>, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Vec<Value>> + Send + Sync + 'static,
    {
        Self::new(name, move |args: Vec<Value>| ready(body(&args)))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn invoke(&self, args: Vec<Value>) -> GuestFuture {
        (self.body)(args)
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }

    #[inline]
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.body) as *const () as usize
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function: {}@{:#x}", self.name, self.addr())
    }
}

/// Host value that is none of the guest kinds. Opaque to dispatch.
#[derive(Clone)]
pub struct Foreign {
    label: Arc<str>,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Foreign {
    pub fn new<T: Any + Send + Sync>(label: impl AsRef<str>, value: T) -> Self {
        Self {
            label: Arc::from(label.as_ref()),
            inner: Arc::new(value),
        }
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Foreign) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    #[inline]
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }
}

impl fmt::Debug for Foreign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:#x}", self.label, self.addr())
    }
}

#[derive(Debug, Default, Clone)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    /// Every guest number is a double.
    Number(f64),
    Str(Arc<str>),
    Function(Function),
    Table(Table),
    Foreign(Foreign),
}

impl Value {
    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// `nil` and `false` are falsy, everything else is truthy.
    #[inline]
    pub fn truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    #[inline]
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    #[inline]
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Raw equality: content for scalars and strings, identity for heap values.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Table(a), Value::Table(b)) => a.ptr_eq(b),
            (Value::Foreign(a), Value::Foreign(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

#[inline]
pub fn raw_equal(a: &Value, b: &Value) -> bool {
    a == b
}

/// First element of a multi-result list, `nil` when empty.
#[inline]
pub fn first(results: Vec<Value>) -> Value {
    results.into_iter().next().unwrap_or_default()
}
