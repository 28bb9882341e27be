//! Metamethod resolution and operator dispatch.
//!
//! Every operation is a future. A guest function invoked as a metamethod may
//! suspend by awaiting; the whole operator chain suspends with it and resumes
//! when the driver polls again. Raw paths never await.

mod dispatch;
pub mod globals;
mod resolve;
mod runtime;

pub use runtime::{DEFAULT_MAX_META_DEPTH, Runtime, RuntimeConfig};

pub use crate::op::{ArithOp, CmpOp, MetaKey};
