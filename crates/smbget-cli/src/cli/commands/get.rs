//! `smbget get` / `smbget get-file` – retrieve a share resource.

use anyhow::Result;
use smbget_core::config::SmbgetConfig;
use smbget_core::control::Cancellation;
use smbget_core::{Locator, Request, Via};
use std::path::PathBuf;

use super::resolve_getter;

/// Which getter operation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Dir,
    File,
}

pub async fn run_get(cfg: SmbgetConfig, locator: &str, dst: PathBuf, target: Target) -> Result<()> {
    let locator = Locator::parse(locator)?;
    let getter = resolve_getter(cfg, &locator)?;

    let cancel = Cancellation::new();
    let req = Request::new(locator, dst).with_cancellation(cancel.clone());

    // Retrieval blocks on the client process; keep it off the async workers.
    let mut task = tokio::task::spawn_blocking(move || match target {
        Target::Dir => getter.get(&req),
        Target::File => getter.get_file(&req),
    });

    let retrieved = tokio::select! {
        res = &mut task => res??,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupt received, cancelling retrieval");
            cancel.cancel();
            task.await??
        }
    };

    match &retrieved.via {
        Via::Smbclient => println!("Retrieved {} with smbclient", retrieved.path.display()),
        Via::LocalMount { source } => println!(
            "Retrieved {} from local mount {}",
            retrieved.path.display(),
            source.display()
        ),
    }
    Ok(())
}
