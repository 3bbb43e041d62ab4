//! Launching the external share client.
//!
//! Retrieval never spawns processes directly; it hands an [`Invocation`] to a
//! [`ClientLauncher`], so tests can substitute a recording fake.

mod system;

pub use system::SystemLauncher;

use std::io;
use std::path::PathBuf;

/// A fully built client command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory for the child; the client writes fetched files here.
    pub working_dir: Option<PathBuf>,
}

/// What a finished child process reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Exit code; `None` when the child was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Captured diagnostics, stderr first, for error messages.
    pub fn diagnostics(&self) -> String {
        let stderr = self.stderr.trim();
        let stdout = self.stdout.trim();
        match (stderr.is_empty(), stdout.is_empty()) {
            (false, false) => format!("{}\n{}", stderr, stdout),
            (false, true) => stderr.to_string(),
            (true, false) => stdout.to_string(),
            (true, true) => String::new(),
        }
    }
}

/// Runs a client invocation to completion.
///
/// `Err` means the program could not be started at all; a started program that
/// fails is reported through [`CommandOutput::success`].
pub trait ClientLauncher {
    fn launch(&self, invocation: &Invocation) -> io::Result<CommandOutput>;
}

impl<L: ClientLauncher + ?Sized> ClientLauncher for &L {
    fn launch(&self, invocation: &Invocation) -> io::Result<CommandOutput> {
        (**self).launch(invocation)
    }
}
