//! [`QueryRunner`] that shells out to `hyprctl`.

use crate::traits::QueryRunner;
use log::debug;
use std::process::Command;

/// Runs control-surface queries through the `hyprctl` binary.
pub struct Hyprctl {
    program: String,
}

/// Errors that can occur when running `hyprctl`.
#[derive(Debug, thiserror::Error)]
#[error("hyprctl error: {0}")]
pub struct HyprctlError(String);

impl Default for Hyprctl {
    fn default() -> Self {
        Self::new("hyprctl")
    }
}

impl Hyprctl {
    /// Use `program` instead of looking up `hyprctl` on `PATH`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl QueryRunner for Hyprctl {
    type Error = HyprctlError;

    fn run_query(&self, args: &[&str]) -> Result<String, Self::Error> {
        debug!("running {} {}", self.program, args.join(" "));
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| HyprctlError(format!("failed to execute {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(HyprctlError(format!(
                "{} {} exited with {}: {}",
                self.program,
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        String::from_utf8(output.stdout).map_err(|e| HyprctlError(format!("utf-8: {}", e)))
    }
}
