use futures::future::{BoxFuture, FutureExt};

use crate::error::{Result, RuntimeError};
use crate::op::{ArithOp, CmpOp, MetaKey, raw_concat, raw_unm};
use crate::val::{Kind, Value, first, raw_equal, raw_len};

use super::Runtime;

impl Runtime {
    /// `obj[key]`.
    pub async fn index(&self, obj: Value, key: Value) -> Result<Value> {
        self.index_at(obj, key, 0).await
    }

    /// `obj[key] = value`.
    pub async fn set_index(&self, obj: Value, key: Value, value: Value) -> Result<()> {
        self.set_index_at(obj, key, value, 0).await
    }

    pub(crate) fn index_at(&self, obj: Value, key: Value, depth: usize) -> BoxFuture<'_, Result<Value>> {
        async move {
            let raw = match &obj {
                Value::Table(t) => t.get(&key),
                // string metatables are not implemented
                Value::Str(_) => return Ok(Value::Nil),
                other => return Err(RuntimeError::attempt("index", other.kind())),
            };
            if !raw.is_nil() {
                return Ok(raw);
            }
            match self.meta_handler_at(&obj, MetaKey::Index, depth).await? {
                Value::Nil => Ok(Value::Nil),
                Value::Function(handler) => {
                    tracing::debug!(
                        target: "lrt::dispatch::fallback",
                        key = %MetaKey::Index,
                        handler = handler.name(),
                        "calling __index"
                    );
                    Ok(first(handler.invoke(vec![obj, key]).await?))
                }
                next => {
                    let depth = self.descend(depth, MetaKey::Index)?;
                    self.index_at(next, key, depth).await
                }
            }
        }
        .boxed()
    }

    pub(crate) fn set_index_at(&self, obj: Value, key: Value, value: Value, depth: usize) -> BoxFuture<'_, Result<()>> {
        async move {
            let Value::Table(table) = &obj else {
                return Err(RuntimeError::attempt("index", obj.kind()));
            };
            // __newindex only governs keys that are absent
            if !table.get(&key).is_nil() {
                table.set(key, value);
                return Ok(());
            }
            match self.meta_handler_at(&obj, MetaKey::NewIndex, depth).await? {
                Value::Nil => {
                    table.set(key, value);
                    Ok(())
                }
                Value::Function(handler) => {
                    tracing::debug!(
                        target: "lrt::dispatch::fallback",
                        key = %MetaKey::NewIndex,
                        handler = handler.name(),
                        "calling __newindex"
                    );
                    handler.invoke(vec![obj.clone(), key, value]).await?;
                    Ok(())
                }
                next => {
                    let depth = self.descend(depth, MetaKey::NewIndex)?;
                    self.set_index_at(next, key, value, depth).await
                }
            }
        }
        .boxed()
    }

    /// `#value`.
    pub async fn len(&self, value: Value) -> Result<Value> {
        if matches!(value, Value::Table(_)) {
            let handler = self.meta_handler_at(&value, MetaKey::Len, 0).await?;
            if !handler.is_nil() {
                return Ok(first(self.call(handler, vec![value]).await?));
            }
        }
        raw_len(&value).map(Value::from)
    }

    /// `-value`.
    pub async fn unm(&self, value: Value) -> Result<Value> {
        if matches!(value, Value::Table(_)) {
            let handler = self.meta_handler_at(&value, MetaKey::Unm, 0).await?;
            if !handler.is_nil() {
                return Ok(first(self.call(handler, vec![value.clone(), value]).await?));
            }
        }
        raw_unm(&value)
    }

    /// `a == b`.
    pub async fn eq(&self, a: Value, b: Value) -> Result<bool> {
        if raw_equal(&a, &b) {
            return Ok(true);
        }
        let handler = self.eq_handler(&a, &b).await?;
        if handler.is_nil() {
            return Ok(false);
        }
        Ok(first(self.call(handler, vec![a, b]).await?).truthy())
    }

    pub async fn arith(&self, op: ArithOp, a: Value, b: Value) -> Result<Value> {
        match op.raw(&a, &b) {
            Ok(v) => Ok(v),
            Err(err) => self.binary_fallback(op.meta_key(), a, b, err).await,
        }
    }

    pub async fn add(&self, a: Value, b: Value) -> Result<Value> {
        self.arith(ArithOp::Add, a, b).await
    }

    pub async fn sub(&self, a: Value, b: Value) -> Result<Value> {
        self.arith(ArithOp::Sub, a, b).await
    }

    pub async fn mul(&self, a: Value, b: Value) -> Result<Value> {
        self.arith(ArithOp::Mul, a, b).await
    }

    pub async fn div(&self, a: Value, b: Value) -> Result<Value> {
        self.arith(ArithOp::Div, a, b).await
    }

    pub async fn modulo(&self, a: Value, b: Value) -> Result<Value> {
        self.arith(ArithOp::Mod, a, b).await
    }

    pub async fn pow(&self, a: Value, b: Value) -> Result<Value> {
        self.arith(ArithOp::Pow, a, b).await
    }

    /// `a .. b`.
    pub async fn concat(&self, a: Value, b: Value) -> Result<Value> {
        match raw_concat(&a, &b) {
            Ok(v) => Ok(v),
            Err(err) => self.binary_fallback(MetaKey::Concat, a, b, err).await,
        }
    }

    /// Ordering. The raw path yields a boolean; a metamethod's first result
    /// is returned as is.
    pub async fn compare(&self, op: CmpOp, a: Value, b: Value) -> Result<Value> {
        match op.raw(&a, &b) {
            Ok(v) => Ok(Value::Bool(v)),
            Err(err) => self.binary_fallback(op.meta_key(), a, b, err).await,
        }
    }

    pub async fn lt(&self, a: Value, b: Value) -> Result<Value> {
        self.compare(CmpOp::Lt, a, b).await
    }

    pub async fn gt(&self, a: Value, b: Value) -> Result<Value> {
        self.compare(CmpOp::Gt, a, b).await
    }

    /// Invoke `callee` with `args`. Tables are callable through a
    /// function-valued `__call`, which receives the table first.
    pub async fn call(&self, callee: Value, args: Vec<Value>) -> Result<Vec<Value>> {
        match &callee {
            Value::Function(f) => f.invoke(args).await,
            Value::Table(_) => match self.meta_handler_at(&callee, MetaKey::Call, 0).await? {
                Value::Function(handler) => {
                    tracing::debug!(
                        target: "lrt::dispatch::fallback",
                        key = %MetaKey::Call,
                        handler = handler.name(),
                        argc = args.len(),
                        "calling __call"
                    );
                    let mut full = Vec::with_capacity(args.len() + 1);
                    full.push(callee.clone());
                    full.extend(args);
                    handler.invoke(full).await
                }
                _ => Err(RuntimeError::attempt("call", Kind::Table)),
            },
            other => Err(RuntimeError::attempt("call", other.kind())),
        }
    }

    /// Shared fallback for binary operators whose raw path failed with `err`.
    /// Without a handler the raw error surfaces unchanged.
    async fn binary_fallback(&self, key: MetaKey, a: Value, b: Value, err: RuntimeError) -> Result<Value> {
        let handler = self.bin_handler(&a, &b, key).await?;
        if handler.is_nil() {
            return Err(err);
        }
        tracing::debug!(
            target: "lrt::dispatch::fallback",
            key = %key,
            lhs = %a.kind(),
            rhs = %b.kind(),
            handler = %handler.kind(),
            "binary metamethod"
        );
        Ok(first(self.call(handler, vec![a, b]).await?))
    }
}
