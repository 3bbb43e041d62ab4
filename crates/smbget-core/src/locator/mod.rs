//! Locator modeling: `smb://[user[:password]@]host/share/resource/path`.
//!
//! Parses the URL-shaped locator into its parts and derives the share root
//! (`//host/share`) and the resource path inside the share.

mod share;

pub use share::{split_share, ShareTarget};

use crate::error::GetError;
use percent_encoding::percent_decode_str;

/// Diagnostic returned when the locator lacks a host or path.
pub const BASE_PATH_ERROR: &str = "samba path should contain valid host, filepath, and authentication if necessary (smb://<user>:<password>@<host>/<file_path>)";

/// Query parameter carrying an expected digest, e.g. `?checksum=sha256:<hex>`.
const CHECKSUM_PARAM: &str = "checksum";

/// Username and optional password taken from the locator's userinfo.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: Option<String>,
}

impl Credentials {
    /// Formats the credentials the way smbclient's `-U` flag expects: `user` or `user%password`.
    pub fn to_client_auth(&self) -> String {
        match &self.password {
            Some(password) => format!("{}%{}", self.username, password),
            None => self.username.clone(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// A parsed share locator. Host and path may still be empty here; validation
/// happens in [`Locator::share_target`] so callers can inspect what was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub scheme: String,
    /// Host, including `:port` when one was given.
    pub host: String,
    /// Percent-decoded path, including the leading `/`.
    pub path: String,
    pub credentials: Option<Credentials>,
    /// Raw `checksum` query value, if present.
    pub checksum: Option<String>,
}

impl Locator {
    /// Parses a locator string. Only syntactic failures are reported here.
    ///
    /// The path is taken verbatim from the input: `url` would resolve `.` and
    /// `..` segments, which may move the resource into another share.
    pub fn parse(input: &str) -> Result<Self, GetError> {
        let input = input.trim();
        let parsed = url::Url::parse(input)
            .map_err(|_| GetError::InvalidLocator(BASE_PATH_ERROR.to_string()))?;

        let host = match (parsed.host_str(), parsed.port()) {
            (Some(h), Some(port)) => format!("{}:{}", h, port),
            (Some(h), None) => h.to_string(),
            (None, _) => String::new(),
        };

        let credentials = if parsed.username().is_empty() {
            None
        } else {
            Some(Credentials {
                username: decode(parsed.username())?,
                password: parsed.password().map(decode).transpose()?,
            })
        };

        let checksum = parsed
            .query_pairs()
            .find(|(k, _)| k == CHECKSUM_PARAM)
            .map(|(_, v)| v.into_owned());

        Ok(Locator {
            scheme: parsed.scheme().to_string(),
            host,
            path: decode(raw_path(input))?,
            credentials,
            checksum,
        })
    }

    /// Derives the share root and resource path, validating host and path.
    pub fn share_target(&self) -> Result<ShareTarget, GetError> {
        split_share(&self.host, &self.path)
    }
}

/// Path component of `input` as written: after the authority, before any
/// query or fragment.
fn raw_path(input: &str) -> &str {
    let Some((_, rest)) = input.split_once("://") else {
        return "";
    };
    let rest = match rest.find(['/', '?', '#']) {
        Some(i) => &rest[i..],
        None => return "",
    };
    match rest.find(['?', '#']) {
        Some(i) => &rest[..i],
        None => rest,
    }
}

fn decode(raw: &str) -> Result<String, GetError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| GetError::InvalidLocator(format!("{}: {}", BASE_PATH_ERROR, e)))
}
