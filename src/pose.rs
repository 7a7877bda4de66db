use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use crate::constants::generator::{
    DEFAULT_POSE_TOOL, POSE_TOOL_FORMAT_FLAG, POSE_TOOL_INPUT_FLAG, POSE_TOOL_OUTPUT_FLAG,
};
use crate::errors::PrepError;
use crate::observer::{PrepEvent, PrepObserver};
use crate::types::EstimatorName;

/// Produces a pose file for one video.
///
/// Implementations write `{output_dir}/{video stem}.pose` as a side effect and
/// return an error when estimation fails.
pub trait PoseEstimator {
    /// Estimate poses for `video`, writing the artifact into `output_dir`.
    fn estimate(
        &self,
        video: &Path,
        output_dir: &Path,
        observer: &dyn PrepObserver,
    ) -> Result<(), PrepError>;
}

/// Runs an external pose tool as `{program} [leading args] --format {estimator} -i {video} -o {dir}`.
#[derive(Clone, Debug)]
pub struct CommandPoseEstimator {
    program: String,
    leading_args: Vec<OsString>,
    estimator: EstimatorName,
}

impl CommandPoseEstimator {
    /// Use the default `video_to_pose` program with `estimator` as output format.
    pub fn new(estimator: impl Into<EstimatorName>) -> Self {
        Self {
            program: DEFAULT_POSE_TOOL.to_string(),
            leading_args: Vec::new(),
            estimator: estimator.into(),
        }
    }

    /// Override the program name or path.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Arguments placed before the standard flags (for wrapper programs).
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Estimator / format name passed with `--format`.
    pub fn estimator(&self) -> &str {
        &self.estimator
    }

    fn arguments(&self, video: &Path, output_dir: &Path) -> Vec<OsString> {
        let mut args = self.leading_args.clone();
        args.push(POSE_TOOL_FORMAT_FLAG.into());
        args.push(self.estimator.clone().into());
        args.push(POSE_TOOL_INPUT_FLAG.into());
        args.push(video.as_os_str().to_os_string());
        args.push(POSE_TOOL_OUTPUT_FLAG.into());
        args.push(output_dir.as_os_str().to_os_string());
        args
    }

    /// Space-joined rendering of the command line, for logging.
    pub fn command_line(&self, video: &Path, output_dir: &Path) -> String {
        std::iter::once(self.program.clone())
            .chain(
                self.arguments(video, output_dir)
                    .iter()
                    .map(|arg| arg.to_string_lossy().to_string()),
            )
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl PoseEstimator for CommandPoseEstimator {
    fn estimate(
        &self,
        video: &Path,
        output_dir: &Path,
        observer: &dyn PrepObserver,
    ) -> Result<(), PrepError> {
        let command = self.command_line(video, output_dir);
        observer.on_event(&PrepEvent::PoseToolCommand {
            video,
            command: &command,
        });

        let output = Command::new(&self.program)
            .args(self.arguments(video, output_dir))
            .output()
            .map_err(|source| PrepError::PoseToolLaunch {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout).to_string();
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            observer.on_event(&PrepEvent::PoseFailed {
                video,
                stdout: &stdout,
                stderr: &stderr,
            });
            return Err(PrepError::PoseEstimation {
                video: video.to_path_buf(),
                status: output.status,
                stdout,
                stderr,
            });
        }
        Ok(())
    }
}
