use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::data::{Example, GeneratedExample, PoseArtifact, TextMatch};
use crate::errors::PrepError;
use crate::metadata::TextMapping;
use crate::observer::{PrepEvent, PrepObserver};
use crate::pose::PoseEstimator;
use crate::transport::fs::{datum_id_from_path, pose_path_for};

/// Finite, non-restartable sequence of examples for one split.
///
/// Each step may run the pose tool, so the sequence is consumed once. Items
/// come out in the order of the `videos` list. After the first `Err` the
/// generator yields nothing further.
pub struct ExampleGenerator<'a> {
    videos: std::vec::IntoIter<PathBuf>,
    pose_dir: PathBuf,
    mapping: &'a TextMapping,
    estimator: &'a dyn PoseEstimator,
    observer: &'a dyn PrepObserver,
    halted: bool,
}

impl<'a> ExampleGenerator<'a> {
    /// Create a generator over already-discovered `videos`.
    ///
    /// `pose_dir` is the split's pose directory and must exist before iteration.
    pub fn new(
        videos: Vec<PathBuf>,
        pose_dir: impl Into<PathBuf>,
        mapping: &'a TextMapping,
        estimator: &'a dyn PoseEstimator,
        observer: &'a dyn PrepObserver,
    ) -> Self {
        Self {
            videos: videos.into_iter(),
            pose_dir: pose_dir.into(),
            mapping,
            estimator,
            observer,
            halted: false,
        }
    }

    /// Split pose directory receiving artifacts.
    pub fn pose_dir(&self) -> &Path {
        &self.pose_dir
    }

    /// Drain the generator, stopping at the first failure.
    pub fn collect_examples(self) -> Result<Vec<Example>, PrepError> {
        self.map(|item| item.map(|generated| generated.example))
            .collect()
    }

    fn generate(&self, video: PathBuf) -> Result<GeneratedExample, PrepError> {
        let started = Instant::now();
        let datum_id = datum_id_from_path(&video)?;
        let pose_filepath = pose_path_for(&self.pose_dir, &datum_id);

        let pose = if pose_filepath.exists() {
            self.observer.on_event(&PrepEvent::PoseCached {
                datum_id: &datum_id,
                pose_path: &pose_filepath,
            });
            PoseArtifact::Cached
        } else {
            self.estimator
                .estimate(&video, &self.pose_dir, self.observer)?;
            if !pose_filepath.exists() {
                return Err(PrepError::PoseArtifactMissing {
                    video,
                    expected: pose_filepath,
                });
            }
            self.observer.on_event(&PrepEvent::PoseEstimated {
                datum_id: &datum_id,
                pose_path: &pose_filepath,
                elapsed: started.elapsed(),
            });
            PoseArtifact::Estimated
        };

        let (text, text_match) = match self.mapping.get(&datum_id) {
            Some(text) if !text.is_empty() => (text.to_string(), TextMatch::Found),
            _ => (String::new(), TextMatch::Missing),
        };
        if text_match == TextMatch::Missing {
            self.observer
                .on_event(&PrepEvent::MissingText { datum_id: &datum_id });
        }

        self.observer.on_event(&PrepEvent::ExampleProcessed {
            datum_id: &datum_id,
            elapsed: started.elapsed(),
        });

        Ok(GeneratedExample {
            example: Example {
                datum_id,
                video_filepath: video,
                text,
                pose_filepath,
            },
            pose,
            text: text_match,
        })
    }
}

impl Iterator for ExampleGenerator<'_> {
    type Item = Result<GeneratedExample, PrepError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }
        let video = self.videos.next()?;
        let item = self.generate(video);
        if item.is_err() {
            self.halted = true;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.halted {
            (0, Some(0))
        } else {
            (0, Some(self.videos.len()))
        }
    }
}

impl FusedIterator for ExampleGenerator<'_> {}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;
    use std::fs;
    use std::path::{Path, PathBuf};

    use crate::errors::PrepError;
    use crate::observer::PrepObserver;
    use crate::pose::PoseEstimator;
    use crate::transport::fs::{datum_id_from_path, pose_path_for};

    /// Estimator that writes an empty pose file, or fails for listed stems.
    #[derive(Default)]
    pub(crate) struct ScriptedEstimator {
        pub(crate) calls: RefCell<Vec<PathBuf>>,
        pub(crate) fail_for: Vec<String>,
        pub(crate) skip_write: bool,
    }

    impl PoseEstimator for ScriptedEstimator {
        fn estimate(
            &self,
            video: &Path,
            output_dir: &Path,
            _observer: &dyn PrepObserver,
        ) -> Result<(), PrepError> {
            self.calls.borrow_mut().push(video.to_path_buf());
            let datum_id = datum_id_from_path(video).unwrap();
            if self.fail_for.contains(&datum_id) {
                return Err(PrepError::Configuration(format!("scripted failure {datum_id}")));
            }
            if !self.skip_write {
                fs::write(pose_path_for(output_dir, &datum_id), b"pose")?;
            }
            Ok(())
        }
    }
}
