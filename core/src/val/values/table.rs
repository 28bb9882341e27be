use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::error::{Result, RuntimeError};
use crate::util::fast_map::{FastHashMap, fast_hash_map_with_capacity};

use super::Value;

/// Shared handle to a guest table.
///
/// Layout invariants:
/// - the array part holds keys `1..=array.len()` and its last slot is never `nil`;
/// - the map part never holds integer keys `1..=array.len() + 1`.
///
/// Together these make `array.len()` a border, so `len` is O(1).
#[derive(Clone, Default)]
pub struct Table {
    inner: Arc<Mutex<TableData>>,
}

#[derive(Default)]
struct TableData {
    array: Vec<Value>,
    map: FastHashMap<TableKey, Value>,
    meta: Option<Table>,
}

/// Map-part key. Scalars hash by content, heap values by identity.
/// `NaN` equals itself and `-0` equals `0` so every key can be found again.
#[derive(Clone)]
struct TableKey(Value);

impl PartialEq for TableKey {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (a, b) => a == b,
        }
    }
}

impl Eq for TableKey {}

impl Hash for TableKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.0 {
            Value::Nil => 0u8.hash(state),
            Value::Bool(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Value::Number(n) => {
                2u8.hash(state);
                let bits = if *n == 0.0 {
                    0u64
                } else if n.is_nan() {
                    f64::NAN.to_bits()
                } else {
                    n.to_bits()
                };
                bits.hash(state);
            }
            Value::Str(s) => {
                3u8.hash(state);
                s.hash(state);
            }
            Value::Function(f) => {
                4u8.hash(state);
                f.addr().hash(state);
            }
            Value::Table(t) => {
                5u8.hash(state);
                t.addr().hash(state);
            }
            Value::Foreign(f) => {
                6u8.hash(state);
                f.addr().hash(state);
            }
        }
    }
}

/// 1-based sequence position of `key`, if it is array-eligible.
#[inline]
fn array_position(key: &Value) -> Option<usize> {
    match key {
        Value::Number(n) if *n >= 1.0 && n.fract() == 0.0 && *n < 9_007_199_254_740_992.0 => Some(*n as usize),
        _ => None,
    }
}

impl TableData {
    fn get(&self, key: &Value) -> Value {
        if let Some(pos) = array_position(key)
            && pos <= self.array.len()
        {
            return self.array[pos - 1].clone();
        }
        if self.map.is_empty() {
            return Value::Nil;
        }
        self.map.get(&TableKey(key.clone())).cloned().unwrap_or_default()
    }

    fn set(&mut self, key: Value, value: Value) {
        if let Some(pos) = array_position(&key) {
            let len = self.array.len();
            if pos <= len {
                let clears = value.is_nil();
                self.array[pos - 1] = value;
                if clears && pos == len {
                    self.trim_tail();
                }
                return;
            }
            if pos == len + 1 {
                if !value.is_nil() {
                    self.array.push(value);
                    self.migrate_from_map();
                }
                return;
            }
        }
        let key = TableKey(key);
        if value.is_nil() {
            self.map.remove(&key);
        } else {
            self.map.insert(key, value);
        }
    }

    fn trim_tail(&mut self) {
        while matches!(self.array.last(), Some(Value::Nil)) {
            self.array.pop();
        }
    }

    /// Pull `len + 1, len + 2, ...` out of the map part after the array grew.
    fn migrate_from_map(&mut self) {
        while !self.map.is_empty() {
            let next = TableKey(Value::from(self.array.len() + 1));
            match self.map.remove(&next) {
                Some(v) => self.array.push(v),
                None => break,
            }
        }
    }
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from keyed pairs (map part) and a dense sequence
    /// (array part). Pairs are stored in order, so later pairs win.
    pub fn make<P, A>(keyed: P, array: A) -> Self
    where
        P: IntoIterator<Item = (Value, Value)>,
        A: IntoIterator<Item = Value>,
    {
        let keyed = keyed.into_iter();
        let mut data = TableData {
            array: array.into_iter().collect(),
            map: fast_hash_map_with_capacity(keyed.size_hint().0),
            meta: None,
        };
        data.trim_tail();
        for (k, v) in keyed {
            data.set(k, v);
        }
        Self {
            inner: Arc::new(Mutex::new(data)),
        }
    }

    #[inline]
    fn data(&self) -> MutexGuard<'_, TableData> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Raw read: never consults the metatable.
    #[inline]
    pub fn get(&self, key: &Value) -> Value {
        self.data().get(key)
    }

    #[inline]
    pub fn get_str(&self, key: &str) -> Value {
        self.get(&Value::from(key))
    }

    /// Raw write: never consults the metatable. Storing `nil` removes the key.
    #[inline]
    pub fn set(&self, key: impl Into<Value>, value: impl Into<Value>) {
        self.data().set(key.into(), value.into());
    }

    /// A border of the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.data().array.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        let data = self.data();
        data.array.is_empty() && data.map.is_empty()
    }

    #[inline]
    pub fn metatable(&self) -> Option<Table> {
        self.data().meta.clone()
    }

    pub fn set_metatable(&self, meta: Option<Table>) {
        self.data().meta = meta;
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Table) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    #[inline]
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }
}

// Tables routinely reference themselves (`_G._G`, `mt.__index = mt`), so
// Debug prints identity and sizes instead of walking the contents.
impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data();
        f.debug_struct("Table")
            .field("addr", &format_args!("{:#x}", self.addr()))
            .field("array_len", &data.array.len())
            .field("map_len", &data.map.len())
            .field("has_metatable", &data.meta.is_some())
            .finish()
    }
}

/// `rawget(t, key)`.
pub fn raw_get(t: &Value, key: &Value) -> Result<Value> {
    match t {
        Value::Table(table) => Ok(table.get(key)),
        other => Err(RuntimeError::expected(1, "rawget", "table", other.kind())),
    }
}

/// `rawset(t, key, value)`.
pub fn raw_set(t: &Value, key: Value, value: Value) -> Result<()> {
    match t {
        Value::Table(table) => {
            table.set(key, value);
            Ok(())
        }
        other => Err(RuntimeError::expected(1, "rawset", "table", other.kind())),
    }
}

/// Raw length: a border for tables, the character count for strings.
pub fn raw_len(v: &Value) -> Result<usize> {
    match v {
        Value::Table(table) => Ok(table.len()),
        Value::Str(s) => Ok(s.chars().count()),
        other => Err(RuntimeError::attempt("get length of", other.kind())),
    }
}
