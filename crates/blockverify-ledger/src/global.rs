//! Process-wide ledger handle.
//!
//! Services that cannot thread a [`LedgerHandle`] through their call graph
//! share one instance here. [`install`] lets the composition root choose the
//! configuration; otherwise the first [`get_ledger`] call creates a ledger
//! with [`LedgerConfig::default`]. Every caller observes the same instance.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::ledger::Ledger;

/// Shared handle to a ledger.
pub type LedgerHandle = Arc<Ledger>;

static LEDGER: OnceCell<LedgerHandle> = OnceCell::new();

/// The process-wide ledger, created with default settings on first use.
///
/// Concurrent first calls build exactly one ledger; the others block until
/// it is in place.
pub fn get_ledger() -> Result<LedgerHandle> {
    LEDGER
        .get_or_try_init(|| {
            info!("initializing process-wide ledger with defaults");
            Ledger::new(LedgerConfig::default()).map(Arc::new)
        })
        .cloned()
}

/// Install `ledger` as the process-wide instance.
///
/// Fails with [`LedgerError::AlreadyInitialized`] if one is already in place,
/// including one created implicitly by [`get_ledger`].
pub fn install(ledger: Ledger) -> Result<LedgerHandle> {
    let handle = Arc::new(ledger);
    LEDGER
        .set(Arc::clone(&handle))
        .map_err(|_| LedgerError::AlreadyInitialized)?;
    info!("process-wide ledger installed");
    Ok(handle)
}

/// Whether a process-wide ledger exists yet.
pub fn is_initialized() -> bool {
    LEDGER.get().is_some()
}
