use std::fs;

use phoenix_poses::apps::run_prepare_phoenix;
use phoenix_poses::{SplitLabel, manifest_path, metadata_path};
use tempfile::tempdir;

fn args(parts: &[&str]) -> impl Iterator<Item = String> {
    parts
        .iter()
        .map(|part| part.to_string())
        .collect::<Vec<_>>()
        .into_iter()
}

#[test]
fn cli_writes_manifests_for_selected_splits() {
    let temp = tempdir().unwrap();
    let video_dir = temp.path().join("videos");
    let pose_dir = temp.path().join("poses");
    let output_dir = temp.path().join("out");
    for split in [SplitLabel::Train, SplitLabel::Test] {
        fs::create_dir_all(video_dir.join(split.as_str())).unwrap();
        fs::create_dir_all(pose_dir.join(split.as_str())).unwrap();
        fs::write(video_dir.join(split.as_str()).join("x.mp4"), b"video").unwrap();
        fs::write(pose_dir.join(split.as_str()).join("x.pose"), b"pose").unwrap();
        fs::write(
            metadata_path(&video_dir, split),
            "signal\toutput\nx.mp4\tregen\n",
        )
        .unwrap();
    }

    run_prepare_phoenix(args(&[
        "--estimator",
        "mediapipe",
        "--pose-dir",
        pose_dir.to_str().unwrap(),
        "--output-dir",
        output_dir.to_str().unwrap(),
        "--video-dir",
        video_dir.to_str().unwrap(),
        "--pose-tool",
        "phoenix-poses-test-tool-that-does-not-exist",
        "--encoder-prompt",
        "__gsg__",
        "--split",
        "train",
        "--split",
        "test",
        "--log-level",
        "warn",
    ]))
    .unwrap();

    for split in [SplitLabel::Train, SplitLabel::Test] {
        let written = fs::read_to_string(manifest_path(&output_dir, split)).unwrap();
        let row = written.lines().nth(1).unwrap();
        assert!(row.ends_with("\t0\t0\t__gsg__\t__de__\tregen"));
    }
    assert!(!manifest_path(&output_dir, SplitLabel::Validation).exists());
}

#[test]
fn cli_without_video_dir_fails() {
    let temp = tempdir().unwrap();
    let result = run_prepare_phoenix(args(&[
        "--estimator",
        "mediapipe",
        "--pose-dir",
        temp.path().join("poses").to_str().unwrap(),
        "--output-dir",
        temp.path().join("out").to_str().unwrap(),
        "--log-level",
        "off",
    ]));

    let err = result.unwrap_err();
    assert!(err.to_string().contains("video directory"));
}
