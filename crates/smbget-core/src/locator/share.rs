//! Share root / resource path split.

use crate::error::GetError;

use super::BASE_PATH_ERROR;

/// Diagnostic returned when the path names a share but no file inside it.
pub const MISSING_RESOURCE_ERROR: &str = "can not find file path and/or name in the smb url";

/// Where a locator points: the share to connect to and the file inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareTarget {
    /// UNC-style root, `//host/share`.
    pub root: String,
    /// Path of the resource inside the share; may contain further `/`.
    pub resource: String,
}

/// Splits `host` + `path` into the share root and the resource path.
///
/// One leading `/` is stripped from `path`, then it is split once on the next `/`:
/// the first segment is the share name, everything after it the resource. No
/// normalization is done; `..` and case are passed through to the transport.
pub fn split_share(host: &str, path: &str) -> Result<ShareTarget, GetError> {
    if host.is_empty() || path.is_empty() {
        return Err(GetError::InvalidLocator(BASE_PATH_ERROR.to_string()));
    }

    let trimmed = path.strip_prefix('/').unwrap_or(path);
    match trimmed.split_once('/') {
        Some((share, resource)) if !resource.is_empty() => Ok(ShareTarget {
            root: format!("//{}/{}", host, share),
            resource: resource.to_string(),
        }),
        _ => Err(GetError::InvalidLocator(MISSING_RESOURCE_ERROR.to_string())),
    }
}
