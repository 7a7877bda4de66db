use std::collections::HashMap;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};

pub use crate::constants::metadata::{
    METADATA_DELIMITER, METADATA_FILE_PREFIX, METADATA_FILE_SUFFIX, OUTPUT_COLUMN, SIGNAL_COLUMN,
};
use crate::errors::PrepError;
use crate::splits::SplitLabel;
use crate::transport::fs::datum_id_from_path;
use crate::types::{DatumId, ReferenceText};

/// Read-only `datum_id -> reference text` lookup for one split.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextMapping {
    texts: HashMap<DatumId, ReferenceText>,
    overwritten: usize,
    skipped_rows: usize,
}

impl TextMapping {
    /// Build a mapping from `(id, text)` pairs; later pairs replace earlier ones.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<DatumId>,
        V: Into<ReferenceText>,
    {
        let mut mapping = Self::default();
        for (id, text) in pairs {
            mapping.insert(id.into(), text.into());
        }
        mapping
    }

    fn insert(&mut self, id: DatumId, text: ReferenceText) {
        if self.texts.insert(id, text).is_some() {
            self.overwritten += 1;
        }
    }

    /// Reference text for `datum_id`, if the corpus table lists it.
    pub fn get(&self, datum_id: &str) -> Option<&str> {
        self.texts.get(datum_id).map(String::as_str)
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// True when no identifiers were loaded.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Rows whose identifier replaced an earlier row with the same identifier.
    pub fn overwritten(&self) -> usize {
        self.overwritten
    }

    /// Rows skipped because their `signal` cell yields no identifier.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }
}

/// Location of the corpus table for `split`: `{video_dir}/PHOENIX-2014-T.{split}.corpus_poses.tsv`.
pub fn metadata_path(video_dir: &Path, split: SplitLabel) -> PathBuf {
    video_dir.join(format!(
        "{METADATA_FILE_PREFIX}.{split}{METADATA_FILE_SUFFIX}"
    ))
}

/// Load the corpus table for `split` into a [`TextMapping`].
///
/// Each row is keyed by the file stem of its `signal` cell and maps to its
/// `output` cell. Duplicate identifiers keep the last row. Extra columns are
/// ignored; short rows read missing cells as empty.
pub fn load_split_metadata(video_dir: &Path, split: SplitLabel) -> Result<TextMapping, PrepError> {
    let path = metadata_path(video_dir, split);
    if !path.is_file() {
        return Err(PrepError::MissingMetadata { path });
    }
    let format_error = |err: csv::Error| PrepError::MetadataFormat {
        path: path.clone(),
        details: err.to_string(),
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(METADATA_DELIMITER)
        .flexible(true)
        .from_path(&path)
        .map_err(format_error)?;
    let headers = reader.headers().map_err(format_error)?.clone();
    let signal_idx = column_index(&headers, SIGNAL_COLUMN, &path)?;
    let output_idx = column_index(&headers, OUTPUT_COLUMN, &path)?;

    let mut mapping = TextMapping::default();
    for record in reader.records() {
        let record = record.map_err(format_error)?;
        let signal = record.get(signal_idx).unwrap_or_default();
        let Ok(datum_id) = datum_id_from_path(Path::new(signal)) else {
            mapping.skipped_rows += 1;
            continue;
        };
        let text = record.get(output_idx).unwrap_or_default();
        mapping.insert(datum_id, text.to_string());
    }
    Ok(mapping)
}

fn column_index(headers: &StringRecord, column: &str, path: &Path) -> Result<usize, PrepError> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| PrepError::MetadataFormat {
            path: path.to_path_buf(),
            details: format!("missing required column '{column}'"),
        })
}
