use std::path::{Path, PathBuf};

use crate::constants::cli::{DEFAULT_DECODER_PROMPT, DEFAULT_ENCODER_PROMPT};
use crate::constants::generator::{DEFAULT_POSE_TOOL, DRY_RUN_LIMIT};
use crate::constants::splits::ALL_SPLITS;
use crate::errors::PrepError;
use crate::splits::SplitLabel;
use crate::types::{EstimatorName, PromptString};

/// Constant prompt pair written into every manifest row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompts {
    /// Prompt describing the signal language (encoder side).
    pub encoder: PromptString,
    /// Prompt describing the target language (decoder side).
    pub decoder: PromptString,
}

impl Prompts {
    /// Build a prompt pair.
    pub fn new(encoder: impl Into<PromptString>, decoder: impl Into<PromptString>) -> Self {
        Self {
            encoder: encoder.into(),
            decoder: decoder.into(),
        }
    }
}

impl Default for Prompts {
    fn default() -> Self {
        Self::new(DEFAULT_ENCODER_PROMPT, DEFAULT_DECODER_PROMPT)
    }
}

/// Invocation parameters for a preparation run.
#[derive(Clone, Debug)]
pub struct PrepConfig {
    /// Estimator / format name handed to the pose tool.
    pub estimator: EstimatorName,
    /// Root directory for pose files; each split writes to `{pose_dir}/{split}`.
    pub pose_dir: PathBuf,
    /// Directory receiving the per-split manifests.
    pub output_dir: PathBuf,
    /// Prompts written into every manifest row.
    pub prompts: Prompts,
    /// Optional download cache used by video provisioning.
    pub cache_dir: Option<PathBuf>,
    /// Directory holding `{split}/*.mp4` and the per-split corpus tables.
    pub video_dir: Option<PathBuf>,
    /// Limit each split to the first few videos.
    pub dry_run: bool,
    /// Program name (or path) of the external pose tool.
    pub pose_tool: String,
    /// Splits to process, in order.
    pub splits: Vec<SplitLabel>,
}

impl PrepConfig {
    /// Create a config with the required parameters and defaults for the rest.
    pub fn new(
        estimator: impl Into<EstimatorName>,
        pose_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            estimator: estimator.into(),
            pose_dir: pose_dir.into(),
            output_dir: output_dir.into(),
            prompts: Prompts::default(),
            cache_dir: None,
            video_dir: None,
            dry_run: false,
            pose_tool: DEFAULT_POSE_TOOL.to_string(),
            splits: ALL_SPLITS.to_vec(),
        }
    }

    /// Set the video source directory.
    pub fn with_video_dir(mut self, video_dir: impl Into<PathBuf>) -> Self {
        self.video_dir = Some(video_dir.into());
        self
    }

    /// Set the download cache directory.
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    /// Override the manifest prompts.
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Enable or disable dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Override the pose tool program.
    pub fn with_pose_tool(mut self, pose_tool: impl Into<String>) -> Self {
        self.pose_tool = pose_tool.into();
        self
    }

    /// Restrict the run to `splits` (processed in the given order).
    pub fn with_splits(mut self, splits: Vec<SplitLabel>) -> Self {
        self.splits = splits;
        self
    }

    /// Per-video cap applied during discovery.
    pub fn video_limit(&self) -> Option<usize> {
        self.dry_run.then_some(DRY_RUN_LIMIT)
    }

    /// Directory receiving pose files for `split`.
    pub fn split_pose_dir(&self, split: SplitLabel) -> PathBuf {
        self.pose_dir.join(split.as_str())
    }

    /// Video directory, required once provisioning has run.
    pub fn require_video_dir(&self) -> Result<&Path, PrepError> {
        self.video_dir.as_deref().ok_or_else(|| {
            PrepError::Configuration(
                "a video directory is required: video download is not available".to_string(),
            )
        })
    }

    /// Validate fields that cannot be checked by the type system.
    pub fn validate(&self) -> Result<(), PrepError> {
        if self.estimator.trim().is_empty() {
            return Err(PrepError::Configuration(
                "estimator name must not be empty".to_string(),
            ));
        }
        if self.pose_tool.trim().is_empty() {
            return Err(PrepError::Configuration(
                "pose tool program must not be empty".to_string(),
            ));
        }
        if self.splits.is_empty() {
            return Err(PrepError::Configuration(
                "at least one split must be selected".to_string(),
            ));
        }
        Ok(())
    }
}
