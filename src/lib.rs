#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command-line entry point shared by the `prepare_phoenix` binary.
pub mod apps;
/// Run configuration types.
pub mod config;
/// Centralized constants for file naming, tool flags, and defaults.
pub mod constants;
/// Example and manifest row types.
pub mod data;
/// Lazy example generation for one split.
pub mod generator;
/// Manifest writer.
pub mod manifest;
/// Per-split corpus table loader.
pub mod metadata;
pub mod observer;
/// Split orchestration and run reports.
pub mod pipeline;
/// External pose estimation.
pub mod pose;
/// Video source provisioning.
pub mod provision;
/// Split labels.
pub mod splits;
/// Input transports (local filesystem).
pub mod transport;
/// Shared type aliases.
pub mod types;

mod errors;

pub use config::{PrepConfig, Prompts};
pub use data::{Example, GeneratedExample, ManifestRow, PoseArtifact, TextMatch};
pub use errors::PrepError;
pub use generator::ExampleGenerator;
pub use manifest::{manifest_path, write_manifest};
pub use metadata::{TextMapping, load_split_metadata, metadata_path};
pub use observer::{PrepEvent, PrepObserver, SilentObserver, TracingObserver};
pub use pipeline::{Pipeline, PrepReport, SplitReport};
pub use pose::{CommandPoseEstimator, PoseEstimator};
pub use provision::{PreprovisionedVideos, VideoProvisioner};
pub use splits::{ALL_SPLITS, SplitLabel};
pub use types::{DatumId, EstimatorName, ProcessOutput, PromptString, ReferenceText};
