//! Local copy primitive used when the share is already mounted.
//!
//! `copy_file` is the cancellable single-file variant; `copy` accepts a file or
//! a directory source and has no cancellation.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::control::Cancellation;

const BUF_SIZE: usize = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("copy cancelled")]
    Cancelled,
}

impl CopyError {
    fn io<'a>(op: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> CopyError + 'a {
        move |source| CopyError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Underlying I/O error kind, if any (e.g. `NotFound`, `PermissionDenied`).
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            CopyError::Io { source, .. } => Some(source.kind()),
            CopyError::Cancelled => None,
        }
    }
}

/// Copies from a locally resolved path to a destination.
pub trait LocalCopier {
    /// Copy one file. When `dst` is an existing directory the file is placed inside it.
    fn copy_file(&self, cancel: &Cancellation, src: &Path, dst: &Path) -> Result<(), CopyError>;

    /// Copy a file or a directory tree into `dst` (created if missing).
    fn copy(&self, src: &Path, dst: &Path) -> Result<(), CopyError>;
}

impl<C: LocalCopier + ?Sized> LocalCopier for &C {
    fn copy_file(&self, cancel: &Cancellation, src: &Path, dst: &Path) -> Result<(), CopyError> {
        (**self).copy_file(cancel, src, dst)
    }

    fn copy(&self, src: &Path, dst: &Path) -> Result<(), CopyError> {
        (**self).copy(src, dst)
    }
}

/// [`LocalCopier`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCopier;

impl LocalCopier for FsCopier {
    fn copy_file(&self, cancel: &Cancellation, src: &Path, dst: &Path) -> Result<(), CopyError> {
        let target = if dst.is_dir() {
            dst.join(file_name(src)?)
        } else {
            dst.to_path_buf()
        };
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(CopyError::io("create", parent))?;
        }
        match copy_chunks(Some(cancel), src, &target) {
            Err(CopyError::Cancelled) => {
                if let Err(e) = fs::remove_file(&target) {
                    tracing::debug!(error = %e, path = %target.display(), "could not remove partial copy");
                }
                Err(CopyError::Cancelled)
            }
            other => other,
        }
    }

    fn copy(&self, src: &Path, dst: &Path) -> Result<(), CopyError> {
        let meta = fs::metadata(src).map_err(CopyError::io("stat", src))?;
        fs::create_dir_all(dst).map_err(CopyError::io("create", dst))?;
        if meta.is_dir() {
            copy_tree(src, dst)
        } else {
            copy_chunks(None, src, &dst.join(file_name(src)?))
        }
    }
}

fn file_name(src: &Path) -> Result<&std::ffi::OsStr, CopyError> {
    src.file_name().ok_or_else(|| CopyError::Io {
        op: "resolve",
        path: src.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
    })
}

fn copy_tree(src: &Path, dst: &Path) -> Result<(), CopyError> {
    for entry in fs::read_dir(src).map_err(CopyError::io("read", src))? {
        let entry = entry.map_err(CopyError::io("read", src))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let kind = entry.file_type().map_err(CopyError::io("stat", &from))?;
        if kind.is_dir() {
            fs::create_dir_all(&to).map_err(CopyError::io("create", &to))?;
            copy_tree(&from, &to)?;
        } else {
            copy_chunks(None, &from, &to)?;
        }
    }
    Ok(())
}

fn copy_chunks(cancel: Option<&Cancellation>, src: &Path, dst: &Path) -> Result<(), CopyError> {
    let cancelled = || cancel.map(Cancellation::is_cancelled).unwrap_or(false);
    if cancelled() {
        return Err(CopyError::Cancelled);
    }

    let mut reader = File::open(src).map_err(CopyError::io("open", src))?;
    let mut writer = File::create(dst).map_err(CopyError::io("create", dst))?;
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        if cancelled() {
            return Err(CopyError::Cancelled);
        }
        let n = reader.read(&mut buf).map_err(CopyError::io("read", src))?;
        if n == 0 {
            break;
        }
        writer
            .write_all(&buf[..n])
            .map_err(CopyError::io("write", dst))?;
    }
    writer.flush().map_err(CopyError::io("write", dst))?;
    Ok(())
}
