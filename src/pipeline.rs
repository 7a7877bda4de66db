use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::config::PrepConfig;
use crate::data::{Example, PoseArtifact, TextMatch};
use crate::errors::PrepError;
use crate::generator::ExampleGenerator;
use crate::manifest::write_manifest;
use crate::metadata::{load_split_metadata, metadata_path};
use crate::observer::{PrepEvent, PrepObserver};
use crate::pose::PoseEstimator;
use crate::provision::VideoProvisioner;
use crate::splits::SplitLabel;
use crate::transport::fs::discover_videos;

/// Outcome of one processed split.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SplitReport {
    /// Split that was processed.
    pub split: SplitLabel,
    /// Rows written to the manifest.
    pub examples: usize,
    /// Videos whose pose file was produced by the tool during this run.
    pub estimated: usize,
    /// Videos whose pose file already existed.
    pub cached: usize,
    /// Videos written with empty reference text.
    pub missing_text: usize,
    /// Manifest location.
    pub manifest_path: PathBuf,
}

/// Outcome of a whole run, with splits in processing order.
#[derive(Clone, Debug, Serialize)]
pub struct PrepReport {
    /// Wall-clock start of the run.
    pub started_at: DateTime<Utc>,
    /// Wall-clock end of the run.
    pub finished_at: DateTime<Utc>,
    /// Per-split outcomes.
    pub splits: IndexMap<SplitLabel, SplitReport>,
}

impl PrepReport {
    /// Example count per split, in processing order.
    pub fn example_counts(&self) -> IndexMap<SplitLabel, usize> {
        self.splits
            .iter()
            .map(|(split, report)| (*split, report.examples))
            .collect()
    }

    /// Example counts rendered as a JSON object (`{"train":n,...}`).
    pub fn summary_json(&self) -> String {
        serde_json::to_string(&self.example_counts()).unwrap_or_default()
    }
}

/// Per-split orchestration: provision, discover, load metadata, generate, write.
pub struct Pipeline<'a> {
    config: &'a PrepConfig,
    estimator: &'a dyn PoseEstimator,
    provisioner: &'a dyn VideoProvisioner,
    observer: &'a dyn PrepObserver,
}

impl<'a> Pipeline<'a> {
    /// Wire a pipeline from its collaborators.
    pub fn new(
        config: &'a PrepConfig,
        estimator: &'a dyn PoseEstimator,
        provisioner: &'a dyn VideoProvisioner,
        observer: &'a dyn PrepObserver,
    ) -> Self {
        Self {
            config,
            estimator,
            provisioner,
            observer,
        }
    }

    /// Process every configured split in order, stopping at the first error.
    pub fn run(&self) -> Result<PrepReport, PrepError> {
        self.config.validate()?;
        let started_at = Utc::now();
        self.observer.on_event(&PrepEvent::RunStarted {
            estimator: &self.config.estimator,
            dry_run: self.config.dry_run,
        });

        let mut splits = IndexMap::new();
        for split in &self.config.splits {
            let report = self.prepare_split(*split)?;
            splits.insert(*split, report);
        }

        let report = PrepReport {
            started_at,
            finished_at: Utc::now(),
            splits,
        };
        self.observer.on_event(&PrepEvent::RunFinished {
            summary: &report.summary_json(),
        });
        Ok(report)
    }

    /// Process one split. The manifest is only written once every video succeeded.
    pub fn prepare_split(&self, split: SplitLabel) -> Result<SplitReport, PrepError> {
        let video_dir = self.config.require_video_dir()?;
        self.provisioner.provision(video_dir, split, self.observer)?;

        let split_pose_dir = self.config.split_pose_dir(split);
        fs::create_dir_all(&split_pose_dir)?;

        let split_dir = video_dir.join(split.as_str());
        let videos = discover_videos(&split_dir, self.config.video_limit())?;
        self.observer.on_event(&PrepEvent::SplitStarted {
            split,
            split_dir: &split_dir,
            video_count: videos.len(),
        });

        let mapping = load_split_metadata(video_dir, split)?;
        self.observer.on_event(&PrepEvent::MetadataLoaded {
            split,
            path: &metadata_path(video_dir, split),
            entries: mapping.len(),
            overwritten: mapping.overwritten(),
            skipped_rows: mapping.skipped_rows(),
        });

        let mut examples: Vec<Example> = Vec::with_capacity(videos.len());
        let (mut estimated, mut cached, mut missing_text) = (0, 0, 0);
        let generator = ExampleGenerator::new(
            videos,
            split_pose_dir,
            &mapping,
            self.estimator,
            self.observer,
        );
        for item in generator {
            let generated = item?;
            match generated.pose {
                PoseArtifact::Estimated => estimated += 1,
                PoseArtifact::Cached => cached += 1,
            }
            if generated.text == TextMatch::Missing {
                missing_text += 1;
            }
            examples.push(generated.example);
        }

        let manifest_path =
            write_manifest(&examples, &self.config.output_dir, &self.config.prompts, split)?;
        self.observer.on_event(&PrepEvent::ManifestWritten {
            split,
            path: &manifest_path,
            rows: examples.len(),
        });

        Ok(SplitReport {
            split,
            examples: examples.len(),
            estimated,
            cached,
            missing_text,
            manifest_path,
        })
    }
}
