use super::*;

#[test]
fn sequence_is_reproducible() {
    let mut a = DemoSource::new(DEMO_INTERVAL);
    let mut b = DemoSource::new(DEMO_INTERVAL);
    let first: Vec<String> = (0..20).map(|_| a.next_message().to_owned()).collect();
    let second: Vec<String> = (0..20).map(|_| b.next_message().to_owned()).collect();
    assert_eq!(first, second);
    assert!(first.iter().all(|m| NAMES.contains(&m.as_str())));
}

#[test]
fn first_step_follows_the_generator() {
    let mut demo = DemoSource::new(DEMO_INTERVAL);
    let seed = DEMO_SEED.wrapping_mul(1_103_515_245).wrapping_add(12_345) % (1 << 31);
    assert_eq!(demo.next_message(), NAMES[seed as usize % NAMES.len()]);
}

#[test]
fn pull_respects_interval() {
    let mut demo = DemoSource::new(Duration::from_millis(100));
    let t0 = Instant::now();
    assert!(demo.pull_at(t0).is_some());
    assert!(demo.pull_at(t0 + Duration::from_millis(50)).is_none());
    assert!(demo.pull_at(t0 + Duration::from_millis(100)).is_some());
    assert!(demo.pull_at(t0 + Duration::from_millis(150)).is_none());
}

#[test]
fn custom_lines_replace_built_in_names() {
    let mut demo = DemoSource::with_lines(DEMO_INTERVAL, vec!["only".to_owned()]);
    assert_eq!(demo.next_message(), "only");
    assert_eq!(demo.next_message(), "only");
}

#[test]
fn demo_file_lines_are_cleaned() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.txt");
    std::fs::write(&path, "  alpha \n\nbeta\n").unwrap();

    let mut demo = DemoSource::from_file(&path, DEMO_INTERVAL).unwrap();
    for _ in 0..10 {
        let msg = demo.next_message();
        assert!(msg == "alpha" || msg == "beta", "{msg}");
    }
}

#[test]
fn empty_demo_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("demo.txt");
    std::fs::write(&path, "\n  \n").unwrap();
    assert!(DemoSource::from_file(&path, DEMO_INTERVAL).is_err());
}
