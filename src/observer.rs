//! Injected progress/diagnostic sink for a preparation run.
//!
//! Components report through a `&dyn PrepObserver` handed in by the entry
//! point instead of logging on their own. [`TracingObserver`] forwards every
//! event to `tracing` at the event's level.

use std::path::Path;
use std::time::Duration;

use tracing::{Level, debug, error, info, warn};

use crate::splits::SplitLabel;

/// Something worth reporting during a run.
#[derive(Debug)]
pub enum PrepEvent<'a> {
    /// A run is starting.
    RunStarted { estimator: &'a str, dry_run: bool },
    /// Video provisioning is about to run for a split.
    ProvisioningSplit {
        split: SplitLabel,
        video_dir: &'a Path,
        cache_dir: Option<&'a Path>,
    },
    /// A split's videos were discovered.
    SplitStarted {
        split: SplitLabel,
        split_dir: &'a Path,
        video_count: usize,
    },
    /// A split's corpus table was loaded.
    MetadataLoaded {
        split: SplitLabel,
        path: &'a Path,
        entries: usize,
        overwritten: usize,
        skipped_rows: usize,
    },
    /// A pose file already existed; the tool was skipped.
    PoseCached { datum_id: &'a str, pose_path: &'a Path },
    /// The pose tool is about to run.
    PoseToolCommand { video: &'a Path, command: &'a str },
    /// The pose tool produced a pose file.
    PoseEstimated {
        datum_id: &'a str,
        pose_path: &'a Path,
        elapsed: Duration,
    },
    /// The pose tool failed; captured streams are attached.
    PoseFailed {
        video: &'a Path,
        stdout: &'a str,
        stderr: &'a str,
    },
    /// No reference text exists for a video.
    MissingText { datum_id: &'a str },
    /// One video finished processing.
    ExampleProcessed { datum_id: &'a str, elapsed: Duration },
    /// A split manifest was written.
    ManifestWritten {
        split: SplitLabel,
        path: &'a Path,
        rows: usize,
    },
    /// A run finished; `summary` is the per-split example count as JSON.
    RunFinished { summary: &'a str },
}

impl PrepEvent<'_> {
    /// Severity of the event.
    pub fn level(&self) -> Level {
        match self {
            PrepEvent::RunStarted { .. } | PrepEvent::SplitStarted { .. } => Level::INFO,
            PrepEvent::MetadataLoaded {
                overwritten,
                skipped_rows,
                ..
            } if *overwritten > 0 || *skipped_rows > 0 => Level::WARN,
            PrepEvent::MissingText { .. } => Level::WARN,
            PrepEvent::PoseFailed { .. } => Level::ERROR,
            _ => Level::DEBUG,
        }
    }

    /// Stable short name of the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            PrepEvent::RunStarted { .. } => "run_started",
            PrepEvent::ProvisioningSplit { .. } => "provisioning_split",
            PrepEvent::SplitStarted { .. } => "split_started",
            PrepEvent::MetadataLoaded { .. } => "metadata_loaded",
            PrepEvent::PoseCached { .. } => "pose_cached",
            PrepEvent::PoseToolCommand { .. } => "pose_tool_command",
            PrepEvent::PoseEstimated { .. } => "pose_estimated",
            PrepEvent::PoseFailed { .. } => "pose_failed",
            PrepEvent::MissingText { .. } => "missing_text",
            PrepEvent::ExampleProcessed { .. } => "example_processed",
            PrepEvent::ManifestWritten { .. } => "manifest_written",
            PrepEvent::RunFinished { .. } => "run_finished",
        }
    }
}

/// Receiver of [`PrepEvent`]s.
pub trait PrepObserver {
    /// Handle one event.
    fn on_event(&self, event: &PrepEvent<'_>);
}

/// Observer that emits each event through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl PrepObserver for TracingObserver {
    fn on_event(&self, event: &PrepEvent<'_>) {
        match event {
            PrepEvent::RunStarted { estimator, dry_run } => {
                info!(estimator = %estimator, dry_run, "doing pose estimation");
            }
            PrepEvent::ProvisioningSplit {
                split,
                video_dir,
                cache_dir,
            } => {
                debug!(
                    split = %split,
                    video_dir = %video_dir.display(),
                    cache_dir = ?cache_dir.map(Path::display),
                    "using pre-provisioned videos"
                );
            }
            PrepEvent::SplitStarted {
                split,
                split_dir,
                video_count,
            } => {
                info!(
                    split = %split,
                    split_dir = %split_dir.display(),
                    video_count,
                    "generating examples"
                );
            }
            PrepEvent::MetadataLoaded {
                split,
                path,
                entries,
                overwritten,
                skipped_rows,
            } => {
                if *overwritten > 0 || *skipped_rows > 0 {
                    warn!(
                        split = %split,
                        path = %path.display(),
                        entries,
                        overwritten,
                        skipped_rows,
                        "metadata has duplicate or unusable rows"
                    );
                } else {
                    debug!(split = %split, path = %path.display(), entries, "loaded metadata");
                }
            }
            PrepEvent::PoseCached {
                datum_id,
                pose_path,
            } => {
                debug!(
                    datum_id = %datum_id,
                    pose_path = %pose_path.display(),
                    "pose already exists, skipping"
                );
            }
            PrepEvent::PoseToolCommand { video, command } => {
                debug!(video = %video.display(), command = %command, "running pose tool");
            }
            PrepEvent::PoseEstimated {
                datum_id,
                pose_path,
                elapsed,
            } => {
                debug!(
                    datum_id = %datum_id,
                    pose_path = %pose_path.display(),
                    elapsed_secs = elapsed.as_secs_f64(),
                    "pose estimated"
                );
            }
            PrepEvent::PoseFailed {
                video,
                stdout,
                stderr,
            } => {
                error!(video = %video.display(), "pose estimation failed");
                error!("STDOUT:\n{stdout}");
                error!("STDERR:\n{stderr}");
            }
            PrepEvent::MissingText { datum_id } => {
                warn!(datum_id = %datum_id, "no reference text found for video");
            }
            PrepEvent::ExampleProcessed { datum_id, elapsed } => {
                debug!(
                    datum_id = %datum_id,
                    "processed video in {:.2} seconds",
                    elapsed.as_secs_f64()
                );
            }
            PrepEvent::ManifestWritten { split, path, rows } => {
                debug!(split = %split, path = %path.display(), rows, "wrote manifest");
            }
            PrepEvent::RunFinished { summary } => {
                debug!(examples = %summary, "number of examples found");
            }
        }
    }
}

/// Observer that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentObserver;

impl PrepObserver for SilentObserver {
    fn on_event(&self, _event: &PrepEvent<'_>) {}
}
