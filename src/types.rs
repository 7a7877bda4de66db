/// Per-split video identifier (file stem of the video).
/// Example: `01April_2010_Thursday_heute-6697`
pub type DatumId = String;
/// Reference transcription attached to a video.
/// Example: `und nun die wettervorhersage für morgen donnerstag den zweiten april`
pub type ReferenceText = String;
/// Pose estimator / output format name handed to the external tool.
/// Example: `mediapipe`
pub type EstimatorName = String;
/// Prompt string written verbatim into every manifest row.
/// Examples: `__dgs__`, `__de__`
pub type PromptString = String;
/// Captured text from an external process stream.
/// Example: `RuntimeError: CUDA out of memory`
pub type ProcessOutput = String;
