//! Logo asset loading
//!
//! Resolves a [`LogoVariant`] to decoded image pixels from an asset
//! directory. Logos are decorative: a missing or corrupt file is logged and
//! reported as `None`, and the renderers drop the logo element and carry on
//! with the rest of the label.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::{info, instrument, warn};

use crate::brand::LogoVariant;
use crate::error::{LabelError, LabelResult};

/// Filesystem-backed logo provider.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, variant: LogoVariant) -> PathBuf {
        self.root.join(variant.asset_name())
    }

    /// Load and decode the logo for `variant`.
    ///
    /// Returns `None` when the file is absent or undecodable. Callers must
    /// treat that as "render without a logo", never as a failed label.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn logo(&self, variant: LogoVariant) -> Option<DynamicImage> {
        match load_image(&self.path_for(variant)) {
            Ok(img) => Some(img),
            Err(e) => {
                warn!(error = %e, "logo unavailable, omitting");
                None
            }
        }
    }
}

fn load_image(path: &Path) -> LabelResult<DynamicImage> {
    let img = image::open(path)
        .map_err(|e| LabelError::Asset(format!("{}: {}", path.display(), e)))?;
    info!(path = %path.display(), "loaded logo asset");
    Ok(img)
}
