//! Deterministic stand-ins for the share client and the local mount.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use smbget_core::client::{ClientLauncher, CommandOutput, Invocation};
use smbget_core::control::Cancellation;
use smbget_core::copy::{CopyError, FsCopier, LocalCopier};

/// What the fake client does when launched.
pub enum Behavior {
    /// Write the requested file with these bytes into the working dir and exit 0.
    Fetch(Vec<u8>),
    /// Optionally leave a partial file behind, then exit with `status`.
    Fail { status: i32, stderr: String, partial: bool },
    /// Program not found.
    Missing,
    /// Make the working dir's parent read-only, then exit 1, so the partial
    /// destination cannot be removed.
    #[cfg(unix)]
    FailLockingParent,
}

pub struct FakeLauncher {
    behavior: Behavior,
    pub calls: RefCell<Vec<Invocation>>,
}

impl FakeLauncher {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(stderr: &str) -> Self {
        Self::new(Behavior::Fail {
            status: 1,
            stderr: stderr.to_string(),
            partial: false,
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn last_args(&self) -> Vec<String> {
        self.calls
            .borrow()
            .last()
            .map(|inv| inv.args.clone())
            .unwrap_or_default()
    }
}

/// File name from the trailing `get <file>` command argument.
fn requested_file(inv: &Invocation) -> String {
    let cmd = inv.args.last().cloned().unwrap_or_default();
    cmd.trim_start_matches("get ").trim_matches('"').to_string()
}

impl ClientLauncher for FakeLauncher {
    fn launch(&self, invocation: &Invocation) -> io::Result<CommandOutput> {
        self.calls.borrow_mut().push(invocation.clone());
        let dir = invocation.working_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        match &self.behavior {
            Behavior::Fetch(bytes) => {
                fs::write(dir.join(requested_file(invocation)), bytes)?;
                Ok(CommandOutput {
                    success: true,
                    status: Some(0),
                    ..Default::default()
                })
            }
            Behavior::Fail {
                status,
                stderr,
                partial,
            } => {
                if *partial {
                    fs::write(dir.join(requested_file(invocation)), b"part")?;
                }
                Ok(CommandOutput {
                    success: false,
                    status: Some(*status),
                    stdout: String::new(),
                    stderr: stderr.clone(),
                })
            }
            Behavior::Missing => Err(io::Error::from(io::ErrorKind::NotFound)),
            #[cfg(unix)]
            Behavior::FailLockingParent => {
                if let Some(parent) = dir.parent() {
                    set_mode(parent, 0o555)?;
                }
                Ok(CommandOutput {
                    success: false,
                    status: Some(1),
                    stdout: String::new(),
                    stderr: "NT_STATUS_CONNECTION_RESET".to_string(),
                })
            }
        }
    }
}

#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

/// False when directory permissions are not enforced (e.g. running as root).
#[cfg(unix)]
pub fn permissions_enforced(scratch: &Path) -> bool {
    let locked = scratch.join("perm-check");
    fs::create_dir(&locked).unwrap();
    set_mode(&locked, 0o555).unwrap();
    let enforced = fs::create_dir(locked.join("x")).is_err();
    set_mode(&locked, 0o755).unwrap();
    fs::remove_dir_all(&locked).unwrap();
    enforced
}

/// Local copier whose "mounts" live under a temp directory: `/host/share/x`
/// is read from `<root>/host/share/x`.
pub struct RootedCopier {
    root: PathBuf,
    /// Whether the destination existed each time a copy started.
    pub dst_existed: RefCell<Vec<bool>>,
    /// Source paths as requested by the getter, before re-rooting.
    pub sources: RefCell<Vec<PathBuf>>,
}

impl RootedCopier {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            dst_existed: RefCell::new(Vec::new()),
            sources: RefCell::new(Vec::new()),
        }
    }

    /// Creates `<root>/<share_path>` with `contents`, e.g. `host/share/dir/file.txt`.
    pub fn mount_file(&self, share_path: &str, contents: &[u8]) {
        let path = self.root.join(share_path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn reroot(&self, src: &Path, dst: &Path) -> PathBuf {
        self.sources.borrow_mut().push(src.to_path_buf());
        self.dst_existed.borrow_mut().push(dst.exists());
        self.root.join(src.strip_prefix("/").unwrap_or(src))
    }
}

impl LocalCopier for RootedCopier {
    fn copy_file(&self, cancel: &Cancellation, src: &Path, dst: &Path) -> Result<(), CopyError> {
        let src = self.reroot(src, dst);
        FsCopier.copy_file(cancel, &src, dst)
    }

    fn copy(&self, src: &Path, dst: &Path) -> Result<(), CopyError> {
        let src = self.reroot(src, dst);
        FsCopier.copy(&src, dst)
    }
}
