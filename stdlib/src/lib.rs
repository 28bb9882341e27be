//! Host bootstrap: builds the global namespace and the built-in bindings
//! guest code finds in it.

pub mod logging;


use std::io::Write;

use anyhow::{Context, Result};
use lrt_core::{
    Function, RuntimeError, Table, Value,
    rt::globals,
    val,
};

/// Install the global namespace, or return the one already installed.
pub fn bootstrap() -> Result<&'static Table> {
    if let Some(installed) = globals::globals() {
        return Ok(installed);
    }
    match globals::install(build_globals()) {
        Ok(installed) => {
            tracing::debug!(target: "lrt::stdlib", "built-ins registered");
            Ok(installed)
        }
        // lost a race with another bootstrap
        Err(RuntimeError::GlobalsInstalled) => globals::globals().context("Global namespace missing after install"),
        Err(e) => Err(e).context("Failed to install global namespace"),
    }
}

/// Fresh namespace populated with every built-in. `_G` refers to the table
/// itself.
pub fn build_globals() -> Table {
    let g = Table::new();
    register_builtin(&g, "print", print_fn);
    register_builtin(&g, "type", type_fn);
    register_builtin(&g, "tonumber", tonumber_fn);
    register_builtin(&g, "rawget", rawget_fn);
    register_builtin(&g, "rawset", rawset_fn);
    register_builtin(&g, "rawlen", rawlen_fn);
    register_builtin(&g, "rawequal", rawequal_fn);
    register_builtin(&g, "setmetatable", setmetatable_fn);
    register_builtin(&g, "getmetatable", getmetatable_fn);
    g.set("_G", g.clone());
    g
}

fn register_builtin(g: &Table, name: &str, f: fn(&[Value]) -> lrt_core::Result<Vec<Value>>) {
    g.set(name, Function::native(name, f));
}

#[inline]
fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).cloned().unwrap_or_default()
}

/// Display forms of `args`, tab-separated.
pub fn render_print_line(args: &[Value]) -> String {
    let mut out = String::new();
    for (i, v) in args.iter().enumerate() {
        if i > 0 {
            out.push('\t');
        }
        out.push_str(&v.to_string());
    }
    out
}

fn print_fn(args: &[Value]) -> lrt_core::Result<Vec<Value>> {
    let line = render_print_line(args);
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{line}").map_err(|e| RuntimeError::guest(format!("print: {e}")))?;
    Ok(Vec::new())
}

fn type_fn(args: &[Value]) -> lrt_core::Result<Vec<Value>> {
    let Some(v) = args.first() else {
        return Err(RuntimeError::bad_argument(1, "type", "value expected"));
    };
    Ok(vec![Value::from(v.type_name())])
}

fn tonumber_fn(args: &[Value]) -> lrt_core::Result<Vec<Value>> {
    let n = val::to_number(&arg(args, 0), &arg(args, 1))?;
    Ok(vec![Value::from(n)])
}

fn rawget_fn(args: &[Value]) -> lrt_core::Result<Vec<Value>> {
    Ok(vec![val::raw_get(&arg(args, 0), &arg(args, 1))?])
}

fn rawset_fn(args: &[Value]) -> lrt_core::Result<Vec<Value>> {
    let t = arg(args, 0);
    val::raw_set(&t, arg(args, 1), arg(args, 2))?;
    Ok(vec![t])
}

fn rawlen_fn(args: &[Value]) -> lrt_core::Result<Vec<Value>> {
    match arg(args, 0) {
        v @ (Value::Table(_) | Value::Str(_)) => Ok(vec![Value::from(val::raw_len(&v)?)]),
        _ => Err(RuntimeError::bad_argument(1, "rawlen", "table or string expected")),
    }
}

fn rawequal_fn(args: &[Value]) -> lrt_core::Result<Vec<Value>> {
    Ok(vec![Value::from(val::raw_equal(&arg(args, 0), &arg(args, 1)))])
}

fn setmetatable_fn(args: &[Value]) -> lrt_core::Result<Vec<Value>> {
    let target = arg(args, 0);
    let Value::Table(t) = &target else {
        return Err(RuntimeError::expected(1, "setmetatable", "table", target.kind()));
    };
    match arg(args, 1) {
        Value::Nil => t.set_metatable(None),
        Value::Table(meta) => t.set_metatable(Some(meta)),
        _ => return Err(RuntimeError::bad_argument(2, "setmetatable", "nil or table expected")),
    }
    Ok(vec![target])
}

fn getmetatable_fn(args: &[Value]) -> lrt_core::Result<Vec<Value>> {
    let meta = match arg(args, 0) {
        Value::Table(t) => t.metatable(),
        _ => None,
    };
    Ok(vec![Value::from(meta)])
}
