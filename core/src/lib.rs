//! Runtime object model for an embedded Lua-style guest language: values,
//! tables with metatables, and suspension-transparent metamethod dispatch.

pub mod error;
pub mod op;
pub mod rt;
pub mod util;
pub mod val;

pub use error::{Result, RuntimeError};
pub use rt::{Runtime, RuntimeConfig};
pub use val::{Function, Kind, Table, Value};
