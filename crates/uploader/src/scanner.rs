//! File enumeration for upload.
//!
//! Recursively walks a directory and produces upload candidates with
//! relative paths joined by forward slashes, sorted byte-wise so the
//! upload order does not depend on the filesystem.

use std::path::Path;

use crate::error::UploadError;
use crate::types::UploadCandidate;

/// Scans `root` recursively and returns every regular file under it.
///
/// Directories are descended into but never returned. Symlinks are
/// followed: a link to a regular file is uploaded under the link's name,
/// a link to a directory fails the scan, as does anything that is neither
/// a file nor a directory (sockets, devices, dangling links). File names
/// must be valid UTF-8. An empty tree yields an empty list.
pub fn enumerate_files(root: &Path) -> Result<Vec<UploadCandidate>, UploadError> {
    let mut files = Vec::new();
    walk_dir(root, root, &mut files)?;

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(files)
}

fn walk_dir(root: &Path, current: &Path, files: &mut Vec<UploadCandidate>) -> Result<(), UploadError> {
    let entries = std::fs::read_dir(current)?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();

        // Real directories only; links to directories are not descended.
        if entry.file_type()?.is_dir() {
            walk_dir(root, &path, files)?;
            continue;
        }

        let metadata = std::fs::metadata(&path).map_err(|e| {
            std::io::Error::new(e.kind(), format!("stat file {}: {e}", path.display()))
        })?;
        if metadata.is_dir() {
            return Err(UploadError::Validation(format!(
                "encountered directory {} while collecting files",
                path.display()
            )));
        }
        if !metadata.is_file() {
            return Err(UploadError::Validation(format!(
                "model-path contains unsupported file type: {}",
                path.display()
            )));
        }

        files.push(UploadCandidate {
            relative_path: relative_key(root, &path)?,
            absolute_path: path,
            size_bytes: metadata.len(),
        });
    }

    Ok(())
}

/// Joins the components of `path` below `root` with `/`.
fn relative_key(root: &Path, path: &Path) -> Result<String, UploadError> {
    let rel = path.strip_prefix(root).map_err(std::io::Error::other)?;
    let names = rel
        .components()
        .map(|c| {
            c.as_os_str().to_str().ok_or_else(|| {
                UploadError::Validation(format!(
                    "model-path contains a file name that is not valid UTF-8: {}",
                    path.display()
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names.join("/"))
}
