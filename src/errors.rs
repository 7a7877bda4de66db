use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::types::ProcessOutput;

/// Error type for configuration, metadata, pose-tool, and manifest failures.
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("split directory does not exist: {}", .path.display())]
    MissingSplitDirectory { path: PathBuf },
    #[error("metadata TSV not found: {}", .path.display())]
    MissingMetadata { path: PathBuf },
    #[error("metadata TSV '{}' is malformed: {details}", .path.display())]
    MetadataFormat { path: PathBuf, details: String },
    #[error("failed to launch pose tool '{program}': {source}")]
    PoseToolLaunch {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error(
        "pose estimation failed for '{}' ({status})\nSTDOUT:\n{stdout}\nSTDERR:\n{stderr}",
        .video.display()
    )]
    PoseEstimation {
        video: PathBuf,
        status: ExitStatus,
        stdout: ProcessOutput,
        stderr: ProcessOutput,
    },
    #[error(
        "pose tool succeeded for '{}' but no pose file exists at '{}'",
        .video.display(),
        .expected.display()
    )]
    PoseArtifactMissing { video: PathBuf, expected: PathBuf },
    #[error("failed to write manifest '{}': {details}", .path.display())]
    ManifestWrite { path: PathBuf, details: String },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}
