use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use image::{ImageFormat, RgbImage};

use crate::foundation::{core::ArtifactId, error::InkResult};

pub(crate) const TEMP_PREFIX: &str = ".inkframe-";
pub(crate) const TEMP_SUFFIX: &str = ".tmp";

pub(crate) fn image_file_name(id: &ArtifactId) -> String {
    format!("dithered_{id}.png")
}

pub(crate) fn plane_file_name(id: &ArtifactId, plane: usize) -> String {
    format!("{id}_{plane}.bin")
}

pub(crate) fn is_temp_file(name: &str) -> bool {
    name.starts_with(TEMP_PREFIX) && name.ends_with(TEMP_SUFFIX)
}

/// True for any name this cache writes: images, planes and in-progress temp files.
pub(crate) fn is_cache_file(name: &str) -> bool {
    is_temp_file(name)
        || (name.starts_with("dithered_") && name.ends_with(".png"))
        || name.ends_with(".bin")
}

/// Artifact id embedded in an image or plane file name.
pub(crate) fn artifact_id_of(name: &str) -> Option<&str> {
    if let Some(rest) = name.strip_prefix("dithered_") {
        return rest.strip_suffix(".png").filter(|id| !id.is_empty());
    }
    let (id, plane) = name.strip_suffix(".bin")?.rsplit_once('_')?;
    let numbered = !plane.is_empty() && plane.bytes().all(|b| b.is_ascii_digit());
    (numbered && !id.is_empty()).then_some(id)
}

fn temp_in(dir: &Path) -> InkResult<tempfile::NamedTempFile> {
    let tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)
        .with_context(|| format!("create temp file in '{}'", dir.display()))?;
    Ok(tmp)
}

fn persist(tmp: tempfile::NamedTempFile, dest: &Path) -> InkResult<()> {
    tmp.persist(dest)
        .map_err(|e| e.error)
        .with_context(|| format!("rename into '{}'", dest.display()))?;
    Ok(())
}

/// Encode `image` as PNG next to `dest` and rename it into place.
///
/// `dest` either holds the complete file or does not exist.
pub(crate) fn write_png_atomic(dest: &Path, image: &RgbImage) -> InkResult<()> {
    let dir = parent_dir(dest);
    let mut tmp = temp_in(dir)?;
    {
        let mut w = BufWriter::new(tmp.as_file_mut());
        image
            .write_to(&mut w, ImageFormat::Png)
            .context("encode png")?;
        w.flush().context("flush png")?;
    }
    persist(tmp, dest)
}

/// Write raw bytes next to `dest` and rename them into place.
pub(crate) fn write_bytes_atomic(dest: &Path, bytes: &[u8]) -> InkResult<()> {
    let dir = parent_dir(dest);
    let mut tmp = temp_in(dir)?;
    tmp.write_all(bytes)
        .with_context(|| format!("write '{}'", tmp.path().display()))?;
    persist(tmp, dest)
}

/// Remove `path` if present. Returns whether a file was deleted.
pub(crate) fn remove_if_exists(path: &Path) -> InkResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(anyhow::Error::new(e)
            .context(format!("remove '{}'", path.display()))
            .into()),
    }
}

/// Names of regular files directly inside `dir` accepted by `keep`.
pub(crate) fn list_files(dir: &Path, keep: impl Fn(&str) -> bool) -> InkResult<Vec<PathBuf>> {
    let mut out = Vec::new();
    let entries = fs::read_dir(dir).with_context(|| format!("list '{}'", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("list '{}'", dir.display()))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if keep(name) && entry.path().is_file() {
            out.push(entry.path());
        }
    }
    out.sort();
    Ok(out)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/files.rs"]
mod tests;
