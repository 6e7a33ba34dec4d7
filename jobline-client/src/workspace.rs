//! Workspace packaging
//!
//! Turns a local directory or file into a zip archive the service accepts as
//! a job workspace.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::error::{ClientError, Result};

/// Workspace value meaning "upload nothing"
pub const NO_WORKSPACE: &str = "none";

/// Extensions the service accepts without repackaging
const ARCHIVE_EXTENSIONS: [&str; 2] = [".zip", ".gz"];

/// Version-control entries never shipped with a workspace
const EXCLUDED_NAMES: [&str; 2] = [".git", ".gitignore"];

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &str) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

/// Resolve a workspace argument to an uploadable archive
///
/// Archives are used as-is, anything else is packaged. A path that does
/// not exist is an error.
pub fn resolve(workspace: &str) -> Result<PathBuf> {
    let path = expand_home(workspace);

    if !path.exists() {
        return Err(ClientError::workspace(path, "does not exist"));
    }

    if ARCHIVE_EXTENSIONS.iter().any(|ext| workspace.ends_with(ext)) {
        debug!("Using workspace archive {} as-is", path.display());
        return Ok(path);
    }

    package(&path)
}

/// Archive a directory or single file into `<temp dir>/<name>.zip`
pub fn package(path: &Path) -> Result<PathBuf> {
    let archive_path = std::env::temp_dir().join(format!("{}.zip", archive_stem(path)));
    package_into(path, &archive_path)?;
    Ok(archive_path)
}

/// Archive `path` into `archive_path`, which may sit inside the workspace
fn package_into(path: &Path, archive_path: &Path) -> Result<()> {
    let name = archive_stem(path);
    let mut zip = ZipWriter::new(File::create(archive_path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    if path.is_dir() {
        let mut entries = Vec::new();
        collect_entries(path, archive_path, &mut entries)?;

        for entry in &entries {
            let relative = entry_name(path, entry)?;
            if entry.is_dir() {
                zip.add_directory(relative, options)?;
            } else {
                zip.start_file(relative, options)?;
                io::copy(&mut File::open(entry)?, &mut zip)?;
            }
        }
    } else {
        zip.start_file(name, options)?;
        io::copy(&mut File::open(path)?, &mut zip)?;
    }

    zip.finish()?;

    info!(
        "Packaged workspace {} into {}",
        path.display(),
        archive_path.display()
    );
    Ok(())
}

/// Name the archive after the workspace itself
fn archive_stem(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_os_string())
        .or_else(|| {
            path.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|name| name.to_os_string()))
        })
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workspace".to_string())
}

/// Depth-first walk in name order, skipping version-control entries and the
/// archive being written
fn collect_entries(current: &Path, archive_path: &Path, entries: &mut Vec<PathBuf>) -> Result<()> {
    let mut children = fs::read_dir(current)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?;
    children.sort();

    for child in children {
        let excluded = child
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| EXCLUDED_NAMES.contains(&name));
        if excluded || is_same_file(&child, archive_path) {
            continue;
        }

        entries.push(child.clone());
        if child.is_dir() {
            collect_entries(&child, archive_path, entries)?;
        }
    }

    Ok(())
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    a.file_name() == b.file_name()
        && matches!(
            (a.canonicalize(), b.canonicalize()),
            (Ok(a), Ok(b)) if a == b
        )
}

fn entry_name(root: &Path, entry: &Path) -> Result<String> {
    let relative = entry
        .strip_prefix(root)
        .map_err(|e| ClientError::workspace(entry, e.to_string()))?;
    Ok(relative.to_string_lossy().replace('\\', "/"))
}
