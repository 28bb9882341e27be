mod values;

pub use values::{
    Foreign, Function, GuestFuture, Kind, Table, Value, coerce_number, first, format_number, raw_equal, raw_get,
    raw_len, raw_set, to_number,
};
