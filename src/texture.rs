//! Snowflake mask textures.
//!
//! A [`TextureSet`] is loaded once at startup from sequentially numbered PNG
//! files (`snowflake0.png`, `snowflake1.png`, ...) and stays read-only for the
//! rest of the run. Loading stops at the first index that is missing or cannot
//! be decoded, so a gap in the numbering silently truncates the set.

use image::RgbaImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default file name prefix for mask textures.
pub const DEFAULT_PREFIX: &str = "snowflake";

/// Error type for texture loading
#[derive(Debug, Error)]
pub enum TextureError {
    /// Not even index 0 could be loaded
    #[error("no snowflake textures found in '{}' (expected {prefix}0.png)", .dir.display())]
    Empty {
        /// Directory that was searched
        dir: PathBuf,
        /// File name prefix that was searched for
        prefix: String,
    },
    /// The texture directory itself is unusable
    #[error("texture directory '{}' is not readable: {source}", .dir.display())]
    Directory {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Immutable, contiguously indexed collection of RGBA mask images.
#[derive(Debug, Clone)]
pub struct TextureSet {
    masks: Vec<RgbaImage>,
}

impl TextureSet {
    /// Build a set from already decoded masks.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::Empty`] when `masks` is empty.
    pub fn from_masks(masks: Vec<RgbaImage>) -> Result<Self, TextureError> {
        if masks.is_empty() {
            return Err(TextureError::Empty { dir: PathBuf::new(), prefix: String::new() });
        }
        Ok(Self { masks })
    }

    /// Load `<dir>/<prefix><i>.png` for `i = 0, 1, ...` until one is missing.
    ///
    /// # Errors
    ///
    /// - [`TextureError::Directory`] if `dir` cannot be read at all
    /// - [`TextureError::Empty`] if index 0 is missing or unreadable
    pub fn load(dir: &Path, prefix: &str) -> Result<Self, TextureError> {
        std::fs::metadata(dir)
            .map_err(|source| TextureError::Directory { dir: dir.to_path_buf(), source })?;

        let mut masks = Vec::new();
        loop {
            let path = texture_path(dir, prefix, masks.len());
            match image::open(&path) {
                Ok(img) => {
                    log::debug!("loaded texture {}", path.display());
                    masks.push(img.to_rgba8());
                }
                Err(e) => {
                    log::debug!("stopping texture scan at {}: {}", path.display(), e);
                    break;
                }
            }
        }

        if masks.is_empty() {
            return Err(TextureError::Empty { dir: dir.to_path_buf(), prefix: prefix.to_string() });
        }

        log::info!("loaded {} snowflake texture(s) from {}", masks.len(), dir.display());
        Ok(Self { masks })
    }

    /// Number of masks in the set (always at least 1).
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    /// Always false; an empty set cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Mask at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&RgbaImage> {
        self.masks.get(index)
    }

    /// Iterate masks in index order.
    pub fn iter(&self) -> impl Iterator<Item = &RgbaImage> {
        self.masks.iter()
    }
}

/// Path of the mask with the given index.
pub fn texture_path(dir: &Path, prefix: &str, index: usize) -> PathBuf {
    dir.join(format!("{}{}.png", prefix, index))
}
