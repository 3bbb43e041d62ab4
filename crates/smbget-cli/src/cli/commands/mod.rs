//! CLI command handlers. Each command is in its own file.

mod checksum;
mod get;
mod inspect;
mod mode;

pub use checksum::run_checksum;
pub use get::{run_get, Target};
pub use inspect::run_inspect;
pub use mode::run_mode;

use anyhow::Result;
use smbget_core::config::SmbgetConfig;
use smbget_core::{getter_for_scheme, Getter, Locator};

/// Getter for the locator's scheme, or an error naming the unsupported scheme.
fn resolve_getter(cfg: SmbgetConfig, locator: &Locator) -> Result<Box<dyn Getter + Send + Sync>> {
    getter_for_scheme(&locator.scheme, cfg)
        .ok_or_else(|| anyhow::anyhow!("unsupported scheme {:?} (expected smb)", locator.scheme))
}
