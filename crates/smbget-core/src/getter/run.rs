//! Retrieval state machine shared by `get` and `get_file`.
//!
//! ```text
//! Start -> External -> Done(ok)
//!                   -> Cleanup -> Local -> Done(ok | exhausted)
//!                              -> Done(cleanup error)
//! ```
//!
//! Locator errors end in `Start`; only client launch/exit failures fall back.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{Mode, Request, Retrieved, SmbGetter, Via};
use crate::checksum::FileChecksum;
use crate::client::ClientLauncher;
use crate::copy::{CopyError, LocalCopier};
use crate::error::GetError;
use crate::locator::ShareTarget;
use crate::strategy::smbclient;

/// Values fixed before any strategy runs.
struct Plan {
    target: ShareTarget,
    /// Destination existed before we touched it; it is then never deleted.
    dst_existed: bool,
    checksum: Option<FileChecksum>,
}

enum Stage {
    Start,
    External(Plan),
    Cleanup(Plan, GetError),
    Local(Plan, GetError),
    Verify(FileChecksum, Retrieved),
    Done(Result<Retrieved, GetError>),
}

pub(super) fn run<L: ClientLauncher, C: LocalCopier>(
    getter: &SmbGetter<L, C>,
    req: &Request,
    mode: Mode,
) -> Result<Retrieved, GetError> {
    let mut stage = Stage::Start;
    loop {
        stage = match stage {
            Stage::Start => start(req, mode),
            Stage::External(plan) => external(getter, req, plan),
            Stage::Cleanup(plan, err) => cleanup(req.dst(), plan, err),
            Stage::Local(plan, err) => local(getter, req, mode, plan, err),
            Stage::Verify(checksum, retrieved) => {
                Stage::Done(checksum.verify(&retrieved.path).map(|()| retrieved))
            }
            Stage::Done(result) => return result,
        };
    }
}

fn succeed(plan: Plan, retrieved: Retrieved) -> Stage {
    match plan.checksum {
        Some(checksum) => Stage::Verify(checksum, retrieved),
        None => Stage::Done(Ok(retrieved)),
    }
}

fn start(req: &Request, mode: Mode) -> Stage {
    let target = match req.locator.share_target() {
        Ok(t) => t,
        Err(e) => return Stage::Done(Err(e)),
    };

    let checksum = match (mode, req.locator.checksum.as_deref()) {
        (Mode::File, Some(raw)) => match FileChecksum::parse(raw) {
            Ok(c) => Some(c),
            Err(e) => return Stage::Done(Err(e)),
        },
        (Mode::Dir, Some(_)) => {
            tracing::debug!("ignoring checksum for directory retrieval");
            None
        }
        (_, None) => None,
    };

    let dst = req.dst();
    let dst_existed = !dst.as_os_str().is_empty() && fs::symlink_metadata(dst).is_ok();

    tracing::debug!(
        share = %target.root,
        resource = %target.resource,
        dst = %dst.display(),
        dst_existed,
        ?mode,
        "starting share retrieval"
    );

    Stage::External(Plan {
        target,
        dst_existed,
        checksum,
    })
}

fn external<L: ClientLauncher, C: LocalCopier>(
    getter: &SmbGetter<L, C>,
    req: &Request,
    plan: Plan,
) -> Stage {
    let result = smbclient::fetch(
        &getter.launcher,
        &getter.config,
        &plan.target,
        req.locator.credentials.as_ref(),
        req.dst(),
    );
    match result {
        Ok(()) => {
            tracing::info!(
                share = %plan.target.root,
                resource = %plan.target.resource,
                "retrieved with smbclient"
            );
            let (_, file) = smbclient::split_resource(&plan.target.resource);
            let path = req.dst().join(file);
            succeed(plan, Retrieved { via: Via::Smbclient, path })
        }
        Err(e) if e.is_external() => {
            tracing::warn!(error = %e, "smbclient retrieval failed, trying local mount");
            Stage::Cleanup(plan, e)
        }
        Err(e) => Stage::Done(Err(e)),
    }
}

/// Removes a destination created for the client. A failure here is returned
/// as is and skips the local mount attempt.
fn cleanup(dst: &Path, plan: Plan, err: GetError) -> Stage {
    if plan.dst_existed || dst.as_os_str().is_empty() {
        return Stage::Local(plan, err);
    }
    match remove_path(dst) {
        Ok(()) => Stage::Local(plan, err),
        Err(source) => Stage::Done(Err(GetError::CleanupFailed {
            path: dst.to_path_buf(),
            source,
        })),
    }
}

fn remove_path(path: &Path) -> io::Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    tracing::debug!(path = %path.display(), "removing partial destination");
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

fn local<L: ClientLauncher, C: LocalCopier>(
    getter: &SmbGetter<L, C>,
    req: &Request,
    mode: Mode,
    plan: Plan,
    external_err: GetError,
) -> Stage {
    let source = getter
        .convention
        .resolve(&plan.target.root, &plan.target.resource);
    tracing::debug!(source = %source.display(), ?mode, "copying from local mount");

    // Only the single-file copy is cancellable.
    let result = match mode {
        Mode::File => {
            let cancel = req.cancel.clone().unwrap_or_default();
            getter.copier.copy_file(&cancel, &source, req.dst())
        }
        Mode::Dir => getter.copier.copy(&source, req.dst()),
    };

    match result {
        Ok(()) => {
            tracing::info!(source = %source.display(), "retrieved from local mount");
            let path = landed_path(req.dst(), &source, mode);
            succeed(plan, Retrieved { via: Via::LocalMount { source }, path })
        }
        Err(CopyError::Cancelled) => Stage::Done(Err(GetError::Cancelled)),
        Err(local) => {
            tracing::warn!(error = %local, "local mount retrieval failed");
            Stage::Done(Err(GetError::LocalMountFailed {
                local,
                external: Some(Box::new(external_err)),
                report_external: getter.config.report_external_error,
            }))
        }
    }
}

/// Mirrors where [`LocalCopier`] places a copy: inside `dst` when it is a
/// directory (a directory source fills `dst` itself), otherwise at `dst`.
pub(super) fn landed_path(dst: &Path, source: &Path, mode: Mode) -> PathBuf {
    let into_dir = match mode {
        Mode::File => dst.is_dir(),
        Mode::Dir => !source.is_dir(),
    };
    match source.file_name() {
        Some(name) if into_dir => dst.join(name),
        _ => dst.to_path_buf(),
    }
}
