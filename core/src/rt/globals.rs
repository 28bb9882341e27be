//! Process-wide root namespace.
//!
//! Installed exactly once by the host bootstrap and never torn down.

use once_cell::sync::OnceCell;

use crate::error::{Result, RuntimeError};
use crate::val::Table;

static GLOBALS: OnceCell<Table> = OnceCell::new();

/// Install `table` as the global namespace. Fails if one is already installed.
pub fn install(table: Table) -> Result<&'static Table> {
    let mut pending = Some(table);
    let installed = GLOBALS.get_or_init(|| pending.take().unwrap_or_default());
    if pending.is_some() {
        return Err(RuntimeError::GlobalsInstalled);
    }
    tracing::debug!(target: "lrt::globals", "global namespace installed");
    Ok(installed)
}

#[inline]
pub fn globals() -> Option<&'static Table> {
    GLOBALS.get()
}
