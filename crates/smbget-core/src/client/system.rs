//! [`ClientLauncher`] that spawns a real child process and waits for it.

use std::io;
use std::process::{Command, Stdio};

use super::{ClientLauncher, CommandOutput, Invocation};

/// Spawns the client with `std::process::Command`, blocking until it exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ClientLauncher for SystemLauncher {
    fn launch(&self, invocation: &Invocation) -> io::Result<CommandOutput> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &invocation.working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
