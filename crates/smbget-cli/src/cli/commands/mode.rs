//! `smbget mode <locator>`.

use anyhow::Result;
use smbget_core::config::SmbgetConfig;
use smbget_core::{Locator, Mode};

use super::resolve_getter;

pub fn run_mode(cfg: SmbgetConfig, locator: &str) -> Result<()> {
    let locator = Locator::parse(locator)?;
    let getter = resolve_getter(cfg, &locator)?;
    let label = match getter.mode(&locator) {
        Mode::File => "file",
        Mode::Dir => "dir",
    };
    println!("{label}");
    Ok(())
}
