//! Golden frame hashes for render regression tests.
//!
//! A test renders a scripted sequence of frames, hashes each RGBA buffer, and compares the list
//! against a JSON golden next to the test. Missing goldens are written on first run;
//! `PIANO_UPDATE_GOLDENS=1` rewrites existing ones.

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Environment flag helper: accepts `1/true/yes/on` (case-insensitive).
pub fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

pub fn update_goldens_enabled() -> bool {
    env_flag("PIANO_UPDATE_GOLDENS")
}

pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// `tests/goldens/<name>.json` inside the calling crate.
#[macro_export]
macro_rules! regression_golden_path {
    ($name:expr) => {{
        let base = $crate::regression::sanitize_filename($name);
        ::std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("goldens")
            .join(format!("{base}.json"))
    }};
}

pub fn rgba_sha256_hex(rgba: &[u8]) -> String {
    hex::encode(Sha256::digest(rgba))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrameHashGolden {
    pub version: u32,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub hash_alg: String,
    /// One hash per rendered frame, in order.
    pub hashes: Vec<String>,
}

impl FrameHashGolden {
    pub fn new(name: impl Into<String>, width: u32, height: u32, hashes: Vec<String>) -> Self {
        Self {
            version: 1,
            name: name.into(),
            width,
            height,
            hash_alg: "sha256".to_string(),
            hashes,
        }
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.version == other.version
            && self.hash_alg == other.hash_alg
            && self.width == other.width
            && self.height == other.height
            && self.hashes.len() == other.hashes.len()
    }
}

pub fn load_golden_json(path: impl AsRef<Path>) -> io::Result<FrameHashGolden> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("failed parsing golden json {}: {e}", path.display()),
        )
    })
}

pub fn save_golden_json(path: impl AsRef<Path>, golden: &FrameHashGolden) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(path)?;
    serde_json::to_writer_pretty(&mut file, golden).map_err(io::Error::other)?;
    file.write_all(b"\n")
}

/// Compares `golden` against the file at `path`, writing it instead when missing or `update`.
pub fn assert_or_update_golden_json(
    path: impl AsRef<Path>,
    golden: &FrameHashGolden,
    update: bool,
) -> io::Result<()> {
    let path = path.as_ref();
    let exists = path.exists();
    if update || !exists {
        save_golden_json(path, golden)?;
        log::info!(
            "{} golden: {}",
            if exists { "updated" } else { "wrote" },
            path.display()
        );
        return Ok(());
    }

    let expected = load_golden_json(path)?;
    if !expected.same_shape(golden) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "golden shape mismatch at {}: expected v{} {} {}x{} ({} frames), got v{} {} {}x{} ({} frames)\n(hint: set PIANO_UPDATE_GOLDENS=1 to rewrite)",
                path.display(),
                expected.version,
                expected.hash_alg,
                expected.width,
                expected.height,
                expected.hashes.len(),
                golden.version,
                golden.hash_alg,
                golden.width,
                golden.height,
                golden.hashes.len(),
            ),
        ));
    }

    if let Some((i, (a, b))) = expected
        .hashes
        .iter()
        .zip(&golden.hashes)
        .enumerate()
        .find(|(_, (a, b))| a != b)
    {
        return Err(io::Error::other(format!(
            "golden mismatch at {} (frame {i}):\nexpected: {a}\nactual:   {b}\n(hint: set PIANO_UPDATE_GOLDENS=1 to rewrite)",
            path.display()
        )));
    }
    Ok(())
}
