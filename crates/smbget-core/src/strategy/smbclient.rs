//! External-tool strategy: fetch exactly one file with `smbclient`.

use std::fs;
use std::io;
use std::path::Path;

use crate::client::{ClientLauncher, Invocation};
use crate::config::SmbgetConfig;
use crate::error::GetError;
use crate::locator::{Credentials, ShareTarget};

/// Splits a resource path into the directory to `cd` into and the file to `get`.
///
/// With no `/` the directory is `"."`.
pub fn split_resource(resource: &str) -> (&str, &str) {
    match resource.rsplit_once('/') {
        Some((dir, file)) => (dir, file),
        None => (".", resource),
    }
}

/// Characters smbclient's `--command` parser treats as syntax: `;` separates
/// commands and `"` delimits quoted names. Neither can be escaped.
const COMMAND_METACHARS: [char; 2] = [';', '"'];

/// Builds the client command line:
/// `smbclient -N [extra..] [-U user[%pass]] //host/share --directory <dir> --command "get <file>"`.
///
/// Fails with [`GetError::InvalidLocator`] when the resource cannot be passed
/// to the client as a single `get`.
pub fn build_invocation(
    cfg: &SmbgetConfig,
    target: &ShareTarget,
    credentials: Option<&Credentials>,
    dst: &Path,
) -> Result<Invocation, GetError> {
    let (directory, file) = split_resource(&target.resource);
    if let Some(c) = directory.chars().chain(file.chars()).find(|c| COMMAND_METACHARS.contains(c)) {
        return Err(GetError::InvalidLocator(format!(
            "resource path '{}' contains '{}', which smbclient cannot fetch",
            target.resource, c
        )));
    }

    let mut args = vec!["-N".to_string()];
    args.extend(cfg.client_extra_args.iter().cloned());
    if let Some(creds) = credentials.filter(|c| !c.username.is_empty()) {
        args.push("-U".to_string());
        args.push(creds.to_client_auth());
    }
    args.push(target.root.clone());
    args.push("--directory".to_string());
    args.push(directory.to_string());
    args.push("--command".to_string());
    args.push(get_command(file));

    Ok(Invocation {
        program: cfg.client_program.clone(),
        args,
        working_dir: if dst.as_os_str().is_empty() {
            None
        } else {
            Some(dst.to_path_buf())
        },
    })
}

/// smbclient splits commands on whitespace, so names containing it are quoted.
fn get_command(file: &str) -> String {
    if file.chars().any(char::is_whitespace) {
        format!("get \"{}\"", file)
    } else {
        format!("get {}", file)
    }
}

/// Makes sure `dst` exists as a directory for the client to write into.
///
/// A missing destination is created with its parents; any other stat error is surfaced.
pub fn prepare_destination(dst: &Path) -> Result<(), GetError> {
    if dst.as_os_str().is_empty() {
        return Ok(());
    }
    match fs::symlink_metadata(dst) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(dst = %dst.display(), "creating destination directory");
            fs::create_dir_all(dst).map_err(|source| GetError::DestinationSetupFailed {
                path: dst.to_path_buf(),
                source,
            })
        }
        Err(source) => Err(GetError::DestinationSetupFailed {
            path: dst.to_path_buf(),
            source,
        }),
    }
}

/// Runs the client for one resource. May leave a created `dst` behind on failure.
pub fn fetch<L: ClientLauncher + ?Sized>(
    launcher: &L,
    cfg: &SmbgetConfig,
    target: &ShareTarget,
    credentials: Option<&Credentials>,
    dst: &Path,
) -> Result<(), GetError> {
    let invocation = build_invocation(cfg, target, credentials, dst)?;
    prepare_destination(dst)?;

    tracing::debug!(
        program = %invocation.program,
        share = %target.root,
        resource = %target.resource,
        authenticated = credentials.is_some(),
        "running share client"
    );

    let output = launcher
        .launch(&invocation)
        .map_err(|source| GetError::ExternalToolUnavailable {
            program: invocation.program.clone(),
            source,
        })?;

    if !output.success {
        return Err(GetError::ExternalToolFailed {
            program: invocation.program,
            status: output.status,
            output: output.diagnostics(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn target(root: &str, resource: &str) -> ShareTarget {
        ShareTarget {
            root: root.to_string(),
            resource: resource.to_string(),
        }
    }

    #[test]
    fn split_resource_nested_and_flat() {
        assert_eq!(split_resource("dir/file.txt"), ("dir", "file.txt"));
        assert_eq!(split_resource("a/b/c.bin"), ("a/b", "c.bin"));
        assert_eq!(split_resource("file.txt"), (".", "file.txt"));
    }

    #[test]
    fn invocation_with_password() {
        let creds = Credentials {
            username: "user".into(),
            password: Some("pw".into()),
        };
        let inv = build_invocation(
            &SmbgetConfig::default(),
            &target("//host/share", "dir/file.txt"),
            Some(&creds),
            Path::new("/tmp/dst"),
        )
        .unwrap();
        assert_eq!(inv.program, "smbclient");
        assert_eq!(
            inv.args,
            vec![
                "-N", "-U", "user%pw", "//host/share", "--directory", "dir", "--command",
                "get file.txt"
            ]
        );
        assert_eq!(inv.working_dir, Some(PathBuf::from("/tmp/dst")));
    }

    #[test]
    fn invocation_username_only() {
        let creds = Credentials {
            username: "guest".into(),
            password: None,
        };
        let inv = build_invocation(
            &SmbgetConfig::default(),
            &target("//host/share", "file.txt"),
            Some(&creds),
            Path::new("dst"),
        )
        .unwrap();
        assert_eq!(&inv.args[..3], ["-N", "-U", "guest"]);
    }

    #[test]
    fn invocation_anonymous() {
        let inv = build_invocation(
            &SmbgetConfig::default(),
            &target("//host/share", "file.txt"),
            None,
            Path::new(""),
        )
        .unwrap();
        assert!(!inv.args.iter().any(|a| a == "-U"));
        assert_eq!(inv.args[0], "-N");
        assert_eq!(inv.args[2..4], ["--directory", "."]);
        assert_eq!(inv.working_dir, None);
    }

    #[test]
    fn invocation_extra_args_and_program() {
        let cfg = SmbgetConfig {
            client_program: "/opt/samba/bin/smbclient".into(),
            client_extra_args: vec!["-m".into(), "SMB3".into()],
            report_external_error: false,
        };
        let inv = build_invocation(&cfg, &target("//h/s", "f"), None, Path::new("d")).unwrap();
        assert_eq!(inv.program, "/opt/samba/bin/smbclient");
        assert_eq!(&inv.args[..3], ["-N", "-m", "SMB3"]);
    }

    #[test]
    fn get_command_quotes_whitespace() {
        assert_eq!(get_command("file.txt"), "get file.txt");
        assert_eq!(get_command("my file.txt"), "get \"my file.txt\"");
    }

    #[test]
    fn invocation_rejects_command_separators() {
        let cfg = SmbgetConfig::default();
        for resource in [
            "dir/a.txt;del important.db",
            "di;r/a.txt",
            "dir/a\"b.txt",
            "a\".txt",
        ] {
            let err = build_invocation(&cfg, &target("//host/share", resource), None, Path::new("d"))
                .unwrap_err();
            assert!(
                matches!(err, GetError::InvalidLocator(ref m) if m.contains(resource)),
                "{resource}: {err}"
            );
        }
    }

    #[test]
    fn fetch_rejects_separator_before_launch_or_mkdir() {
        struct Unreachable;
        impl ClientLauncher for Unreachable {
            fn launch(&self, _: &Invocation) -> io::Result<crate::client::CommandOutput> {
                panic!("client must not be launched");
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("dst");
        let err = fetch(
            &Unreachable,
            &SmbgetConfig::default(),
            &target("//host/share", "dir/a.txt;rm b"),
            None,
            &dst,
        )
        .unwrap_err();
        assert!(matches!(err, GetError::InvalidLocator(_)));
        assert!(!err.is_external());
        assert!(!dst.exists());
    }

    #[test]
    fn prepare_destination_creates_missing_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("a/b/c");
        prepare_destination(&dst).unwrap();
        assert!(dst.is_dir());
        // Existing destination is left as is.
        prepare_destination(&dst).unwrap();
    }

    #[test]
    fn prepare_destination_fails_under_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, b"x").unwrap();
        let err = prepare_destination(&file.join("sub")).unwrap_err();
        assert!(matches!(err, GetError::DestinationSetupFailed { .. }));
    }
}
