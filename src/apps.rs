use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum, error::ErrorKind};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::{PrepConfig, Prompts};
use crate::constants::cli::{DEFAULT_DECODER_PROMPT, DEFAULT_ENCODER_PROMPT, DEFAULT_LOG_FILTER};
use crate::constants::generator::DEFAULT_POSE_TOOL;
use crate::constants::splits::ALL_SPLITS;
use crate::observer::TracingObserver;
use crate::pipeline::{Pipeline, PrepReport};
use crate::pose::CommandPoseEstimator;
use crate::provision::PreprovisionedVideos;
use crate::splits::SplitLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SplitArg {
    Train,
    Validation,
    Test,
}

impl From<SplitArg> for SplitLabel {
    fn from(value: SplitArg) -> Self {
        match value {
            SplitArg::Train => SplitLabel::Train,
            SplitArg::Validation => SplitLabel::Validation,
            SplitArg::Test => SplitLabel::Test,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "prepare_phoenix",
    version,
    disable_help_subcommand = true,
    about = "Extract poses and write translation manifests for RWTH-PHOENIX-Weather 2014 T",
    long_about = "Run an external pose estimator over every split video (skipping videos whose pose file already exists), join the pose files with the corpus transcriptions, and write one TSV manifest per split.",
    after_help = "Videos are expected at <VIDEO_DIR>/<split>/*.mp4 next to PHOENIX-2014-T.<split>.corpus_poses.tsv. RUST_LOG overrides --log-level."
)]
/// CLI for `prepare_phoenix`.
///
/// Common usage:
/// - `--estimator mediapipe --pose-dir poses --output-dir manifests --video-dir phoenix`
/// - Add `--dry-run` to process the first 10 videos of each split
/// - Repeat `--split <NAME>` to process a subset of splits
struct PreparePhoenixCli {
    #[arg(long, help = "Which pose estimator to use")]
    estimator: String,
    #[arg(long = "pose-dir", value_name = "PATH", help = "Where to save poses")]
    pose_dir: PathBuf,
    #[arg(
        long = "output-dir",
        value_name = "PATH",
        help = "Where to write the manifest TSV files"
    )]
    output_dir: PathBuf,
    #[arg(
        long = "encoder-prompt",
        default_value = DEFAULT_ENCODER_PROMPT,
        help = "Encoder prompt string"
    )]
    encoder_prompt: String,
    #[arg(
        long = "decoder-prompt",
        default_value = DEFAULT_DECODER_PROMPT,
        help = "Decoder prompt string"
    )]
    decoder_prompt: String,
    #[arg(
        long = "tfds-data-dir",
        value_name = "PATH",
        help = "Optional data folder used to cache video downloads"
    )]
    tfds_data_dir: Option<PathBuf>,
    #[arg(
        long = "video-dir",
        value_name = "PATH",
        help = "Location of the Phoenix dataset videos"
    )]
    video_dir: Option<PathBuf>,
    #[arg(long = "dry-run", help = "Process very few videos per split")]
    dry_run: bool,
    #[arg(
        long = "pose-tool",
        value_name = "PROGRAM",
        default_value = DEFAULT_POSE_TOOL,
        help = "Pose estimation program to invoke"
    )]
    pose_tool: String,
    #[arg(
        long = "split",
        value_enum,
        help = "Split to process, repeat as needed (default: train, test, validation)"
    )]
    splits: Vec<SplitArg>,
    #[arg(
        long = "log-level",
        value_name = "FILTER",
        default_value = DEFAULT_LOG_FILTER,
        help = "Log filter used when RUST_LOG is unset"
    )]
    log_level: String,
}

impl PreparePhoenixCli {
    fn into_config(self) -> PrepConfig {
        let splits = if self.splits.is_empty() {
            ALL_SPLITS.to_vec()
        } else {
            self.splits.into_iter().map(Into::into).collect()
        };
        let mut config = PrepConfig::new(self.estimator, self.pose_dir, self.output_dir)
            .with_prompts(Prompts::new(self.encoder_prompt, self.decoder_prompt))
            .with_dry_run(self.dry_run)
            .with_pose_tool(self.pose_tool)
            .with_splits(splits);
        if let Some(video_dir) = self.video_dir {
            config = config.with_video_dir(video_dir);
        }
        if let Some(cache_dir) = self.tfds_data_dir {
            config = config.with_cache_dir(cache_dir);
        }
        config
    }
}

/// Entry point of the `prepare_phoenix` binary.
///
/// `args_iter` excludes the program name.
pub fn run_prepare_phoenix<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let Some(cli) = parse_cli::<PreparePhoenixCli, _>(
        std::iter::once("prepare_phoenix".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&cli.log_level)?,
    };
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    debug!(?cli, "parsed arguments");

    let config = cli.into_config();
    let report = run_with_config(&config)?;
    print_report(&report);
    Ok(())
}

/// Run a full preparation with the external pose tool and tracing-backed logging.
pub fn run_with_config(config: &PrepConfig) -> Result<PrepReport, crate::PrepError> {
    let estimator =
        CommandPoseEstimator::new(config.estimator.clone()).with_program(config.pose_tool.clone());
    let provisioner = PreprovisionedVideos::new(config.cache_dir.as_deref());
    Pipeline::new(config, &estimator, &provisioner, &TracingObserver).run()
}

fn print_report(report: &PrepReport) {
    println!("=== examples per split ===");
    for (split, split_report) in &report.splits {
        println!(
            "{split}: {} examples ({} estimated, {} cached, {} without text) -> {}",
            split_report.examples,
            split_report.estimated,
            split_report.cached,
            split_report.missing_text,
            split_report.manifest_path.display()
        );
    }
    println!(
        "elapsed: {:.2}s",
        (report.finished_at - report.started_at).num_milliseconds() as f64 / 1000.0
    );
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> PreparePhoenixCli {
        PreparePhoenixCli::try_parse_from(
            std::iter::once("prepare_phoenix").chain(args.iter().copied()),
        )
        .unwrap()
    }

    #[test]
    fn defaults_fill_prompts_tool_and_splits() {
        let config = parse(&[
            "--estimator",
            "mediapipe",
            "--pose-dir",
            "poses",
            "--output-dir",
            "out",
        ])
        .into_config();

        assert_eq!(config.estimator, "mediapipe");
        assert_eq!(config.prompts, Prompts::new("__dgs__", "__de__"));
        assert_eq!(config.pose_tool, "video_to_pose");
        assert_eq!(config.splits, ALL_SPLITS.to_vec());
        assert!(!config.dry_run);
        assert!(config.video_dir.is_none());
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn optional_arguments_flow_into_config() {
        let config = parse(&[
            "--estimator",
            "mmposewholebody",
            "--pose-dir",
            "poses",
            "--output-dir",
            "out",
            "--encoder-prompt",
            "__asl__",
            "--decoder-prompt",
            "__en__",
            "--tfds-data-dir",
            "cache",
            "--video-dir",
            "videos",
            "--dry-run",
            "--split",
            "validation",
            "--split",
            "train",
        ])
        .into_config();

        assert_eq!(config.prompts, Prompts::new("__asl__", "__en__"));
        assert_eq!(config.cache_dir, Some(PathBuf::from("cache")));
        assert_eq!(config.video_dir, Some(PathBuf::from("videos")));
        assert!(config.dry_run);
        assert_eq!(config.splits, vec![SplitLabel::Validation, SplitLabel::Train]);
    }

    #[test]
    fn required_arguments_are_enforced() {
        let err = PreparePhoenixCli::try_parse_from(["prepare_phoenix", "--estimator", "x"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn help_exits_without_running() {
        let result = run_prepare_phoenix(["--help".to_string()].into_iter());
        assert!(result.is_ok());
    }
}
