use super::*;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps { num: 30000, den: 1001 },
    }
}

#[test]
fn begin_rejects_odd_dimensions_before_spawning() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(dir.path().join("out.mp4")));
    let err = sink.begin(cfg(11, 10)).unwrap_err();
    assert!(err.to_string().contains("even"));
}

#[test]
fn begin_rejects_zero_fps() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(dir.path().join("out.mp4")));
    let bad = SinkConfig {
        width: 10,
        height: 10,
        fps: Fps { num: 0, den: 1 },
    };
    assert!(sink.begin(bad).is_err());
}

#[test]
fn begin_refuses_existing_output_without_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.mp4");
    std::fs::write(&out, b"x").unwrap();

    let mut opts = FfmpegSinkOpts::new(&out);
    opts.overwrite = false;
    let err = FfmpegSink::new(opts).begin(cfg(10, 10)).unwrap_err();
    assert!(err.to_string().contains("already exists"));
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn args_describe_raw_rgba_input_and_output_path() {
    let opts = FfmpegSinkOpts::new("out/clip.mp4");
    let args = ffmpeg_args(&cfg(640, 360), &opts);
    assert_eq!(args.first().map(String::as_str), Some("-y"));
    assert!(args.windows(2).any(|w| w[0] == "-s" && w[1] == "640x360"));
    assert!(args.windows(2).any(|w| w[0] == "-r" && w[1] == "30000/1001"));
    assert!(args.windows(2).any(|w| w[0] == "-pix_fmt" && w[1] == "rgba"));
    assert_eq!(args.last().map(String::as_str), Some("out/clip.mp4"));
}

#[test]
fn ensure_parent_dir_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("a").join("b").join("out.mp4");
    ensure_parent_dir(&out).unwrap();
    assert!(dir.path().join("a").join("b").is_dir());
}
