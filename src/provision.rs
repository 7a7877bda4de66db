use std::path::Path;

use crate::errors::PrepError;
use crate::observer::{PrepEvent, PrepObserver};
use crate::splits::SplitLabel;

/// Makes `{video_dir}/{split}/*.mp4` available before generation starts.
pub trait VideoProvisioner {
    /// Ensure the videos of `split` are present under `video_dir`.
    fn provision(
        &self,
        video_dir: &Path,
        split: SplitLabel,
        observer: &dyn PrepObserver,
    ) -> Result<(), PrepError>;
}

/// Provisioner for videos that were placed on disk ahead of time.
///
/// No download happens; the optional cache directory is only reported.
#[derive(Clone, Debug, Default)]
pub struct PreprovisionedVideos {
    cache_dir: Option<std::path::PathBuf>,
}

impl PreprovisionedVideos {
    /// Create a provisioner, recording the configured download cache.
    pub fn new(cache_dir: Option<&Path>) -> Self {
        Self {
            cache_dir: cache_dir.map(Path::to_path_buf),
        }
    }
}

impl VideoProvisioner for PreprovisionedVideos {
    fn provision(
        &self,
        video_dir: &Path,
        split: SplitLabel,
        observer: &dyn PrepObserver,
    ) -> Result<(), PrepError> {
        observer.on_event(&PrepEvent::ProvisioningSplit {
            split,
            video_dir,
            cache_dir: self.cache_dir.as_deref(),
        });
        Ok(())
    }
}
