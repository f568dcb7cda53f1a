use anyhow::Context;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One generated artifact: a path relative to the output directory and its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFile {
    pub name: String,
    pub content: String,
}

/// Write `files` below `out_dir`, creating directories as needed.
///
/// Returns the written paths in the order given.
pub fn write_outputs(out_dir: &Path, files: &[OutputFile]) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = out_dir.join(&file.name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

/// Run `gofmt -w` over `paths`.
pub fn format_outputs(paths: &[PathBuf]) -> anyhow::Result<()> {
    if paths.is_empty() {
        return Ok(());
    }
    // Allow tests to override the gofmt binary path without mutating PATH
    let gofmt_bin = std::env::var("GOKITMUX_GOFMT_BIN").unwrap_or_else(|_| "gofmt".to_string());

    let mut cmd = Command::new(&gofmt_bin);
    cmd.arg("-w").args(paths);
    let status = cmd
        .status()
        .with_context(|| format!("Failed to run {gofmt_bin}"))?;
    if !status.success() {
        anyhow::bail!("gofmt failed");
    }
    Ok(())
}
