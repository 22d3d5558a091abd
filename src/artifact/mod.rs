//! Patching built distribution artifacts.
//!
//! After a build, the generated `package_info.py` can be inserted into the
//! artifacts in `dist/` so published packages carry the same metadata as the
//! source tree. Two formats are supported:
//!
//! - wheels (`.whl`) - zip archives; the entry lives at the configured
//!   package path relative to the archive root
//! - sdists (`.tar.gz`) - gzipped tarballs; entries are prefixed with the
//!   `<name>-<version>/` root directory
//!
//! Both patchers rewrite the archive into a temporary file next to the
//! original and atomically rename over it, replacing any existing entry at
//! the target path and preserving every other entry untouched.

use anyhow::Result;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::core::PkgInfoError;

/// Distribution format an artifact can be patched in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ArtifactFormat {
    Wheel,
    Sdist,
}

impl ArtifactFormat {
    /// Classify an artifact by its file name, `None` for anything else.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if name.ends_with(".whl") {
            Some(Self::Wheel)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::Sdist)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wheel => "wheel",
            Self::Sdist => "sdist",
        }
    }
}

/// Parse configured `patch-build-formats` values.
///
/// Accepts `wheel`, `sdist` and the shorthand `all`; anything else is an
/// [`PkgInfoError::UnsupportedFormat`].
pub fn parse_patch_formats(specs: &[String]) -> Result<BTreeSet<ArtifactFormat>> {
    let mut formats = BTreeSet::new();
    for spec in specs {
        match spec.as_str() {
            "wheel" => {
                formats.insert(ArtifactFormat::Wheel);
            }
            "sdist" => {
                formats.insert(ArtifactFormat::Sdist);
            }
            "all" => {
                formats.insert(ArtifactFormat::Wheel);
                formats.insert(ArtifactFormat::Sdist);
            }
            other => {
                return Err(PkgInfoError::UnsupportedFormat {
                    format: other.to_string(),
                }
                .into());
            }
        }
    }
    Ok(formats)
}

/// Collect artifacts in `dist_dir` matching the requested formats, sorted by
/// file name.
pub fn find_artifacts(dist_dir: &Path, formats: &BTreeSet<ArtifactFormat>) -> Result<Vec<PathBuf>> {
    if !dist_dir.is_dir() {
        return Err(PkgInfoError::ArtifactNotFound {
            path: dist_dir.display().to_string(),
        }
        .into());
    }

    let mut artifacts = Vec::new();
    for entry in std::fs::read_dir(dist_dir).map_err(PkgInfoError::IoError)? {
        let path = entry.map_err(PkgInfoError::IoError)?.path();
        if let Some(format) = ArtifactFormat::from_path(&path) {
            if formats.contains(&format) {
                artifacts.push(path);
            }
        }
    }
    artifacts.sort();
    Ok(artifacts)
}

/// Insert `content` at `entry_path` (forward-slash separated, relative to the
/// package root) inside the artifact, replacing any existing entry.
///
/// # Errors
///
/// - [`PkgInfoError::ArtifactNotFound`] when the artifact does not exist
/// - [`PkgInfoError::UnsupportedFormat`] for unrecognized file names
pub fn patch_artifact(artifact: &Path, entry_path: &str, content: &str) -> Result<()> {
    if !artifact.is_file() {
        return Err(PkgInfoError::ArtifactNotFound {
            path: artifact.display().to_string(),
        }
        .into());
    }

    let format = ArtifactFormat::from_path(artifact).ok_or_else(|| {
        PkgInfoError::UnsupportedFormat {
            format: artifact.display().to_string(),
        }
    })?;

    tracing::info!(
        "Patching {} '{}' with entry '{entry_path}'",
        format.as_str(),
        artifact.display()
    );

    match format {
        ArtifactFormat::Wheel => patch_wheel(artifact, entry_path, content),
        ArtifactFormat::Sdist => patch_sdist(artifact, entry_path, content),
    }
}

/// Rewrite a wheel, carrying every entry over raw (no recompression) and
/// appending the generated file.
fn patch_wheel(artifact: &Path, entry_path: &str, content: &str) -> Result<()> {
    let file = File::open(artifact).map_err(PkgInfoError::IoError)?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| unreadable(artifact, &e.to_string()))?;

    let parent = artifact.parent().unwrap_or_else(|| Path::new("."));
    let temp = NamedTempFile::new_in(parent).map_err(PkgInfoError::IoError)?;
    let mut writer = ZipWriter::new(temp);

    for index in 0..archive.len() {
        let entry = archive
            .by_index_raw(index)
            .map_err(|e| unreadable(artifact, &e.to_string()))?;
        if entry.name() == entry_path {
            continue;
        }
        writer
            .raw_copy_file(entry)
            .map_err(|e| unreadable(artifact, &e.to_string()))?;
    }

    writer
        .start_file(entry_path, SimpleFileOptions::default())
        .map_err(|e| unreadable(artifact, &e.to_string()))?;
    writer
        .write_all(content.as_bytes())
        .map_err(PkgInfoError::IoError)?;

    let temp = writer
        .finish()
        .map_err(|e| unreadable(artifact, &e.to_string()))?;
    temp.persist(artifact)
        .map_err(|e| PkgInfoError::IoError(e.error))?;
    Ok(())
}

/// Rewrite an sdist, preserving entries and inserting the generated file
/// under the archive's `<name>-<version>/` root directory.
fn patch_sdist(artifact: &Path, entry_path: &str, content: &str) -> Result<()> {
    let file = File::open(artifact).map_err(PkgInfoError::IoError)?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));

    let parent = artifact.parent().unwrap_or_else(|| Path::new("."));
    let temp = NamedTempFile::new_in(parent).map_err(PkgInfoError::IoError)?;
    let encoder = GzEncoder::new(temp, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    let mut root_dir: Option<PathBuf> = None;
    let mut latest_mtime = 0u64;

    for entry in archive
        .entries()
        .map_err(|e| unreadable(artifact, &e.to_string()))?
    {
        let mut entry = entry.map_err(|e| unreadable(artifact, &e.to_string()))?;
        let path = entry
            .path()
            .map_err(|e| unreadable(artifact, &e.to_string()))?
            .into_owned();

        if root_dir.is_none() {
            if let Some(first) = path.components().next() {
                root_dir = Some(PathBuf::from(first.as_os_str()));
            }
        }
        latest_mtime = latest_mtime.max(entry.header().mtime().unwrap_or(0));

        // drop a pre-existing entry at the target path
        if let Some(root) = &root_dir {
            if path.strip_prefix(root).is_ok_and(|p| p == Path::new(entry_path)) {
                continue;
            }
        }

        let mut header = entry.header().clone();
        let mut data = Vec::new();
        entry.read_to_end(&mut data).map_err(PkgInfoError::IoError)?;
        builder
            .append_data(&mut header, &path, data.as_slice())
            .map_err(PkgInfoError::IoError)?;
    }

    let root = root_dir.unwrap_or_else(|| sdist_root_from_name(artifact));
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(latest_mtime);
    builder
        .append_data(&mut header, root.join(entry_path), content.as_bytes())
        .map_err(PkgInfoError::IoError)?;

    let encoder = builder.into_inner().map_err(PkgInfoError::IoError)?;
    let temp = encoder.finish().map_err(PkgInfoError::IoError)?;
    temp.persist(artifact)
        .map_err(|e| PkgInfoError::IoError(e.error))?;
    Ok(())
}

/// Fallback root directory for an empty sdist, derived from the file name.
fn sdist_root_from_name(artifact: &Path) -> PathBuf {
    let name = artifact
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    PathBuf::from(name.trim_end_matches(".tar.gz").trim_end_matches(".tgz"))
}

fn unreadable(artifact: &Path, reason: &str) -> PkgInfoError {
    PkgInfoError::UnsupportedFormat {
        format: format!("{}: {reason}", artifact.display()),
    }
}
