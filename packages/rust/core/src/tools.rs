//! External tooling seam: git for revisions, the project's own build.
//!
//! Every command runs with an explicit working directory; nothing here
//! touches the process-wide current directory.

use std::path::Path;
use std::process::{Command, Output};

use tracing::{debug, info};

use threejs_docset_shared::{DocsetError, Result, VersionTag};

/// Operations the pipeline needs from the outside world.
pub trait SourceTools: Send + Sync {
    /// List every tag in the repository at `repo`, in listing order.
    fn list_tags(&self, repo: &Path) -> Result<Vec<String>>;
    /// Check out `tag` in the repository at `repo`.
    fn checkout(&self, repo: &Path, tag: &VersionTag) -> Result<()>;
    /// Run `command` (program followed by arguments) inside `dir`.
    fn run(&self, dir: &Path, command: &[String]) -> Result<()>;
}

/// Shells out to the real `git` and build tools.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTools;

impl SourceTools for SystemTools {
    fn list_tags(&self, repo: &Path) -> Result<Vec<String>> {
        let output = run_checked(repo, "git", &["tag"])?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    fn checkout(&self, repo: &Path, tag: &VersionTag) -> Result<()> {
        info!(%tag, "checking out");
        run_checked(repo, "git", &["checkout", tag.as_str()])?;
        Ok(())
    }

    fn run(&self, dir: &Path, command: &[String]) -> Result<()> {
        let Some((program, args)) = command.split_first() else {
            return Err(DocsetError::config("empty command"));
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        info!(command = %command.join(" "), "running build step");
        run_checked(dir, program, &args)?;
        Ok(())
    }
}

/// Run a program to completion, failing on spawn errors and non-zero exit.
fn run_checked(dir: &Path, program: &str, args: &[&str]) -> Result<Output> {
    let shown = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");

    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| DocsetError::command(&shown, "not started", e.to_string()))?;

    debug!(
        command = %shown,
        status = %output.status,
        stdout_len = output.stdout.len(),
        "command finished"
    );

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(DocsetError::command(shown, output.status, stderr));
    }

    Ok(output)
}
