use serde::Serialize;
use std::borrow::Cow;
use std::path::PathBuf;

use crate::config::Prompts;
use crate::constants::manifest::FULL_CLIP_OFFSET;

pub use crate::types::{DatumId, ReferenceText};

/// One video of a split joined with its pose artifact and reference text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Example {
    /// Video file stem, unique within a split.
    pub datum_id: DatumId,
    /// Source video on disk.
    pub video_filepath: PathBuf,
    /// Reference transcription; empty when the corpus table has no entry.
    pub text: ReferenceText,
    /// Pose artifact on disk (pre-existing or freshly estimated).
    pub pose_filepath: PathBuf,
}

/// How the pose artifact of an example came to exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoseArtifact {
    /// The pose file was already on disk; the tool was not invoked.
    Cached,
    /// The tool ran and produced the pose file.
    Estimated,
}

/// Outcome of the metadata join for an example.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextMatch {
    /// Non-empty reference text was found.
    Found,
    /// No entry (or an empty entry) exists; `text` is empty.
    Missing,
}

/// A generated example plus the per-item status the generator observed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedExample {
    /// The assembled record.
    pub example: Example,
    /// Whether the pose tool ran for this item.
    pub pose: PoseArtifact,
    /// Whether the metadata join produced text.
    pub text: TextMatch,
}

/// On-disk projection of an [`Example`] into the six manifest columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ManifestRow<'a> {
    /// Pose file path.
    pub signal: Cow<'a, str>,
    /// First frame offset; `0` means the clip start.
    pub signal_start: u64,
    /// Last frame offset; `0` means the clip end.
    pub signal_end: u64,
    /// Run-wide encoder prompt.
    pub encoder_prompt: &'a str,
    /// Run-wide decoder prompt.
    pub decoder_prompt: &'a str,
    /// Reference transcription, possibly empty.
    pub output: &'a str,
}

impl<'a> ManifestRow<'a> {
    /// Project `example` using the run-wide `prompts`; offsets cover the full clip.
    pub fn from_example(example: &'a Example, prompts: &'a Prompts) -> Self {
        Self {
            signal: example.pose_filepath.to_string_lossy(),
            signal_start: FULL_CLIP_OFFSET,
            signal_end: FULL_CLIP_OFFSET,
            encoder_prompt: &prompts.encoder,
            decoder_prompt: &prompts.decoder,
            output: &example.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_row_uses_pose_path_and_zero_offsets() {
        let example = Example {
            datum_id: "a".to_string(),
            video_filepath: PathBuf::from("videos/train/a.mp4"),
            text: "hallo".to_string(),
            pose_filepath: PathBuf::from("poses/train/a.pose"),
        };
        let prompts = Prompts::default();
        let row = ManifestRow::from_example(&example, &prompts);

        assert_eq!(row.signal, "poses/train/a.pose");
        assert_eq!(row.signal_start, 0);
        assert_eq!(row.signal_end, 0);
        assert_eq!(row.encoder_prompt, "__dgs__");
        assert_eq!(row.decoder_prompt, "__de__");
        assert_eq!(row.output, "hallo");
    }
}
