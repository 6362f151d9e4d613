//! Runs the compiled `framedither` binary inside a scratch directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Scratch directory plus a handle on the binary under test
pub struct TestCli {
    dir: TempDir,
}

/// Captured result of one CLI invocation
pub struct CliResponse {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl TestCli {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create scratch directory"),
        }
    }

    /// Root of the scratch directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `name` inside the scratch directory
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `contents` to `name` inside the scratch directory
    pub fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.file(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        std::fs::write(&path, contents).expect("Failed to write fixture");
        path
    }

    /// Run the binary with `args`
    pub fn run(&self, args: &[&str]) -> CliResponse {
        self.run_with_env(args, &[])
    }

    /// Run the binary with `args` and extra environment variables
    pub fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> CliResponse {
        let output: Output = Command::new(env!("CARGO_BIN_EXE_framedither"))
            .args(args)
            .current_dir(self.dir.path())
            .env("RUST_LOG", "warn")
            .envs(env.iter().copied())
            .output()
            .expect("Failed to run framedither");

        CliResponse {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}
