use std::fs;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::config::Prompts;
pub use crate::constants::manifest::{
    MANIFEST_COLUMNS, MANIFEST_DELIMITER, MANIFEST_FILE_PREFIX, MANIFEST_FILE_SUFFIX,
};
use crate::data::{Example, ManifestRow};
use crate::errors::PrepError;
use crate::splits::SplitLabel;

/// Location of the manifest for `split`: `{output_dir}/rwth_phoenix2014_t.{split}.tsv`.
pub fn manifest_path(output_dir: &Path, split: SplitLabel) -> PathBuf {
    output_dir.join(format!(
        "{MANIFEST_FILE_PREFIX}.{split}{MANIFEST_FILE_SUFFIX}"
    ))
}

/// Write `examples` as the manifest of `split`, replacing any existing file.
///
/// The header row is always written, followed by one row per example in
/// input order. Returns the manifest path.
pub fn write_manifest(
    examples: &[Example],
    output_dir: &Path,
    prompts: &Prompts,
    split: SplitLabel,
) -> Result<PathBuf, PrepError> {
    fs::create_dir_all(output_dir)?;
    let path = manifest_path(output_dir, split);
    let write_error = |err: csv::Error| PrepError::ManifestWrite {
        path: path.clone(),
        details: err.to_string(),
    };

    let mut writer = WriterBuilder::new()
        .delimiter(MANIFEST_DELIMITER)
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::CRLF)
        .from_path(&path)
        .map_err(write_error)?;
    writer.write_record(MANIFEST_COLUMNS).map_err(write_error)?;
    for example in examples {
        writer
            .serialize(ManifestRow::from_example(example, prompts))
            .map_err(write_error)?;
    }
    writer.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn example(id: &str, text: &str) -> Example {
        Example {
            datum_id: id.to_string(),
            video_filepath: PathBuf::from(format!("videos/{id}.mp4")),
            text: text.to_string(),
            pose_filepath: PathBuf::from(format!("poses/{id}.pose")),
        }
    }

    #[test]
    fn manifest_path_follows_naming_convention() {
        assert_eq!(
            manifest_path(Path::new("out"), SplitLabel::Validation),
            PathBuf::from("out/rwth_phoenix2014_t.validation.tsv")
        );
    }

    #[test]
    fn writes_header_and_rows_in_input_order() {
        let temp = tempdir().unwrap();
        let examples = vec![example("b", "zwei"), example("a", "eins")];

        let path = write_manifest(
            &examples,
            temp.path(),
            &Prompts::default(),
            SplitLabel::Train,
        )
        .unwrap();

        let written = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(
            lines,
            vec![
                "signal\tsignal_start\tsignal_end\tencoder_prompt\tdecoder_prompt\toutput",
                "poses/b.pose\t0\t0\t__dgs__\t__de__\tzwei",
                "poses/a.pose\t0\t0\t__dgs__\t__de__\teins",
            ]
        );
        assert!(written.ends_with("\r\n"));
    }

    #[test]
    fn empty_example_list_still_writes_header() {
        let temp = tempdir().unwrap();
        let path =
            write_manifest(&[], temp.path(), &Prompts::default(), SplitLabel::Test).unwrap();
        let written = fs::read_to_string(path).unwrap();
        assert_eq!(written.lines().count(), 1);
    }

    #[test]
    fn existing_manifest_is_overwritten() {
        let temp = tempdir().unwrap();
        let path = manifest_path(temp.path(), SplitLabel::Train);
        fs::write(&path, "stale\nstale\nstale\nstale\n").unwrap();

        write_manifest(
            &[example("a", "eins")],
            temp.path(),
            &Prompts::new("__asl__", "__en__"),
            SplitLabel::Train,
        )
        .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(!written.contains("stale"));
        assert_eq!(written.lines().nth(1), Some("poses/a.pose\t0\t0\t__asl__\t__en__\teins"));
    }

    #[test]
    fn fields_with_delimiters_are_quoted() {
        let temp = tempdir().unwrap();
        let path = write_manifest(
            &[example("a", "tab\there")],
            temp.path(),
            &Prompts::default(),
            SplitLabel::Train,
        )
        .unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_path(path)
            .unwrap();
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(row.len(), 6);
        assert_eq!(row.get(5), Some("tab\there"));
    }
}
