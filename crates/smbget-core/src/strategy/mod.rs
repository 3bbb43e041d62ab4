//! The two ways a share resource can be retrieved.
//!
//! - [`smbclient`]: run the external client against `//host/share`.
//! - [`local_mount`]: treat the share as already mounted and copy from disk.

pub mod local_mount;
pub mod smbclient;

pub use local_mount::MountConvention;
