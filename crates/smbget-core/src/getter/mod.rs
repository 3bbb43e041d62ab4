//! Getter interface and the SMB getter.
//!
//! A dispatcher picks a getter by locator scheme ([`getter_for_scheme`]) and
//! calls [`Getter::get`] (directory destination) or [`Getter::get_file`]
//! (single file, cancellable local copy, checksum verification).

mod run;

use std::path::{Path, PathBuf};

use crate::client::{ClientLauncher, SystemLauncher};
use crate::config::SmbgetConfig;
use crate::control::Cancellation;
use crate::copy::{FsCopier, LocalCopier};
use crate::error::GetError;
use crate::locator::Locator;
use crate::strategy::MountConvention;

/// Scheme handled by [`SmbGetter`].
pub const SMB_SCHEME: &str = "smb";

/// Whether a locator names a single file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    File,
    Dir,
}

/// Which strategy produced the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Via {
    /// smbclient wrote the file into the destination directory.
    Smbclient,
    /// Copied from the locally mounted share at `source`.
    LocalMount { source: PathBuf },
}

/// Outcome of a successful retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retrieved {
    pub via: Via,
    /// Where the resource ended up locally.
    pub path: PathBuf,
}

/// One retrieval: where from, where to, and an optional cancel token.
#[derive(Debug, Clone)]
pub struct Request {
    pub locator: Locator,
    pub dst: PathBuf,
    pub cancel: Option<Cancellation>,
}

impl Request {
    pub fn new(locator: Locator, dst: impl Into<PathBuf>) -> Self {
        Self {
            locator,
            dst: dst.into(),
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn dst(&self) -> &Path {
        &self.dst
    }
}

/// Retrieves the resource named by a locator.
pub trait Getter {
    /// Mode the locator should be fetched in.
    fn mode(&self, locator: &Locator) -> Mode;

    /// Retrieve into the destination directory.
    fn get(&self, req: &Request) -> Result<Retrieved, GetError>;

    /// Retrieve a single file.
    fn get_file(&self, req: &Request) -> Result<Retrieved, GetError>;
}

/// Returns the getter for `scheme`, or `None` when it is not supported.
pub fn getter_for_scheme(scheme: &str, config: SmbgetConfig) -> Option<Box<dyn Getter + Send + Sync>> {
    if scheme.eq_ignore_ascii_case(SMB_SCHEME) {
        Some(Box::new(SmbGetter::new(config)))
    } else {
        None
    }
}

/// Getter for `smb://` locators: smbclient first, local mount as fallback.
#[derive(Debug, Clone)]
pub struct SmbGetter<L = SystemLauncher, C = FsCopier> {
    config: SmbgetConfig,
    launcher: L,
    copier: C,
    convention: MountConvention,
}

impl SmbGetter {
    /// Getter that spawns the real client and copies with `std::fs`.
    pub fn new(config: SmbgetConfig) -> Self {
        Self::with_parts(config, SystemLauncher, FsCopier)
    }
}

impl<L: ClientLauncher, C: LocalCopier> SmbGetter<L, C> {
    pub fn with_parts(config: SmbgetConfig, launcher: L, copier: C) -> Self {
        Self {
            config,
            launcher,
            copier,
            convention: MountConvention::current(),
        }
    }

    /// Overrides the platform's mount naming convention.
    pub fn with_mount_convention(mut self, convention: MountConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn config(&self) -> &SmbgetConfig {
        &self.config
    }
}

impl<L: ClientLauncher, C: LocalCopier> Getter for SmbGetter<L, C> {
    /// Share locators are always fetched as a single file.
    fn mode(&self, _locator: &Locator) -> Mode {
        Mode::File
    }

    fn get(&self, req: &Request) -> Result<Retrieved, GetError> {
        run::run(self, req, Mode::Dir)
    }

    fn get_file(&self, req: &Request) -> Result<Retrieved, GetError> {
        run::run(self, req, Mode::File)
    }
}
