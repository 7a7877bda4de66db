use crate::splits::SplitLabel;

/// Constants used by split enumeration.
pub mod splits {
    use super::SplitLabel;

    /// Splits processed by a full run, in processing order.
    pub const ALL_SPLITS: [SplitLabel; 3] =
        [SplitLabel::Train, SplitLabel::Test, SplitLabel::Validation];
}

/// Constants used by the metadata loader.
pub mod metadata {
    /// File name prefix of the per-split corpus table (`{prefix}.{split}{suffix}`).
    pub const METADATA_FILE_PREFIX: &str = "PHOENIX-2014-T";
    /// File name suffix of the per-split corpus table.
    pub const METADATA_FILE_SUFFIX: &str = ".corpus_poses.tsv";
    /// Column holding the video (or pose) path of a corpus row.
    pub const SIGNAL_COLUMN: &str = "signal";
    /// Column holding the reference transcription of a corpus row.
    pub const OUTPUT_COLUMN: &str = "output";
    /// Field delimiter of the corpus table.
    pub const METADATA_DELIMITER: u8 = b'\t';
}

/// Constants used by the example generator.
pub mod generator {
    /// Number of videos kept per split in dry-run mode.
    pub const DRY_RUN_LIMIT: usize = 10;
    /// Extension of discovered input videos.
    pub const VIDEO_EXTENSION: &str = "mp4";
    /// Extension of pose artifacts produced by the external tool.
    pub const POSE_EXTENSION: &str = "pose";
    /// Default program name of the external pose tool.
    pub const DEFAULT_POSE_TOOL: &str = "video_to_pose";
    /// Flag carrying the estimator / output format.
    pub const POSE_TOOL_FORMAT_FLAG: &str = "--format";
    /// Flag carrying the input video path.
    pub const POSE_TOOL_INPUT_FLAG: &str = "-i";
    /// Flag carrying the output directory.
    pub const POSE_TOOL_OUTPUT_FLAG: &str = "-o";
}

/// Constants used by the manifest writer.
pub mod manifest {
    /// File name prefix of a split manifest (`{prefix}.{split}{suffix}`).
    pub const MANIFEST_FILE_PREFIX: &str = "rwth_phoenix2014_t";
    /// File name suffix of a split manifest.
    pub const MANIFEST_FILE_SUFFIX: &str = ".tsv";
    /// Manifest header, in column order.
    pub const MANIFEST_COLUMNS: [&str; 6] = [
        "signal",
        "signal_start",
        "signal_end",
        "encoder_prompt",
        "decoder_prompt",
        "output",
    ];
    /// Start/end offset meaning "use every frame of the clip".
    pub const FULL_CLIP_OFFSET: u64 = 0;
    /// Field delimiter of the manifest.
    pub const MANIFEST_DELIMITER: u8 = b'\t';
}

/// Constants used by the command-line entry point.
pub mod cli {
    /// Default encoder prompt (German Sign Language).
    pub const DEFAULT_ENCODER_PROMPT: &str = "__dgs__";
    /// Default decoder prompt (German).
    pub const DEFAULT_DECODER_PROMPT: &str = "__de__";
    /// Log filter used when `RUST_LOG` is unset.
    pub const DEFAULT_LOG_FILTER: &str = "debug";
}
