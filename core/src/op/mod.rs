mod ops;

pub use ops::{ArithOp, CmpOp, MetaKey, raw_concat, raw_unm};
