use crate::error::Result;
use crate::op::MetaKey;
use crate::val::{Table, Value, raw_equal};

use super::Runtime;

impl Runtime {
    /// Handler bound to `key` on `value`'s metatable, or `nil`.
    ///
    /// The lookup goes through the full indexing protocol, so the metatable's
    /// own `__index` chain takes part and may run (and suspend in) guest code.
    pub async fn meta_handler(&self, value: &Value, key: MetaKey) -> Result<Value> {
        self.meta_handler_at(value, key, 0).await
    }

    /// Handler for a binary operator: `a`'s first, then `b`'s.
    pub async fn bin_handler(&self, a: &Value, b: &Value, key: MetaKey) -> Result<Value> {
        let handler = self.meta_handler_at(a, key, 0).await?;
        if !handler.is_nil() {
            return Ok(handler);
        }
        self.meta_handler_at(b, key, 0).await
    }

    /// `__eq` applies only between two tables that both carry a metatable and
    /// whose handlers are the very same value.
    pub async fn eq_handler(&self, a: &Value, b: &Value) -> Result<Value> {
        let (Value::Table(ta), Value::Table(tb)) = (a, b) else {
            return Ok(Value::Nil);
        };
        if ta.metatable().is_none() || tb.metatable().is_none() {
            return Ok(Value::Nil);
        }
        let ha = self.meta_handler_at(a, MetaKey::Eq, 0).await?;
        let hb = self.meta_handler_at(b, MetaKey::Eq, 0).await?;
        if raw_equal(&ha, &hb) { Ok(ha) } else { Ok(Value::Nil) }
    }

    pub(crate) async fn meta_handler_at(&self, value: &Value, key: MetaKey, depth: usize) -> Result<Value> {
        let Some(meta) = value.as_table().and_then(Table::metatable) else {
            return Ok(Value::Nil);
        };
        let depth = self.descend(depth, key)?;
        self.index_at(Value::Table(meta), Value::from(key), depth).await
    }
}
