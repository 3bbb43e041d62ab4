//! Local-mount strategy: the share is expected to be mounted already, so the
//! share root is reinterpreted as a local path.

use std::path::{Path, PathBuf};

/// How a UNC-style share root (`//host/share`) maps to a local mount path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountConvention {
    /// Drop one leading `/`: `//host/share` becomes `/host/share` (Linux).
    StripLeadingSlash,
    /// Use the root as is (UNC paths resolve directly elsewhere).
    Verbatim,
}

impl MountConvention {
    /// Convention of the platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            MountConvention::StripLeadingSlash
        } else {
            MountConvention::Verbatim
        }
    }

    /// Local directory where the share is expected to be mounted.
    pub fn mount_root(self, share_root: &str) -> PathBuf {
        match self {
            MountConvention::StripLeadingSlash => {
                PathBuf::from(share_root.strip_prefix('/').unwrap_or(share_root))
            }
            MountConvention::Verbatim => PathBuf::from(share_root),
        }
    }

    /// Full local path of `resource` inside the mounted share.
    pub fn resolve(self, share_root: &str, resource: &str) -> PathBuf {
        resolve_in(&self.mount_root(share_root), resource)
    }
}

impl Default for MountConvention {
    fn default() -> Self {
        Self::current()
    }
}

fn resolve_in(root: &Path, resource: &str) -> PathBuf {
    resource
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}
