use super::*;

fn entry(msg: &str, ts: &str, is_delete: bool) -> LogEntry {
    LogEntry {
        msg: msg.to_owned(),
        is_delete,
        ts: ts.parse().unwrap(),
    }
}

#[test]
fn parse_skips_blank_lines_and_defaults_is_delete() {
    let text = "\
{\"msg\":\"hello\",\"ts\":\"2024-05-01T12:00:00Z\"}

{\"msg\":\"gone\",\"is_delete\":true,\"ts\":\"2024-05-01T12:00:01Z\"}
";
    let entries = parse_log(text.as_bytes()).unwrap();
    assert_eq!(entries.len(), 2);
    assert!(!entries[0].is_delete);
    assert!(entries[1].is_delete);
}

#[test]
fn parse_error_names_the_line() {
    let text = "{\"msg\":\"ok\",\"ts\":\"2024-05-01T12:00:00Z\"}\n{not json}\n";
    let err = parse_log(text.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("line 2"), "{err}");
}

#[test]
fn schedule_sorts_stably_and_drops_deleted() {
    let schedule = Schedule::from_entries(vec![
        entry("late", "2024-05-01T12:00:05Z", false),
        entry("first", "2024-05-01T12:00:01Z", false),
        entry("hidden", "2024-05-01T12:00:00Z", true),
        entry("second", "2024-05-01T12:00:01Z", false),
        entry("half", "2024-05-01T12:00:02.500Z", false),
    ]);

    let texts: Vec<_> = schedule.messages().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second", "half", "late"]);
    let offsets: Vec<_> = schedule.messages().iter().map(|m| m.offset).collect();
    assert_eq!(offsets, vec![0.0, 0.0, 1.5, 4.0]);
    assert_eq!(schedule.span_secs(), 4.0);
}

#[test]
fn schedule_of_only_deleted_records_is_empty() {
    let schedule = Schedule::from_entries(vec![entry("x", "2024-05-01T12:00:00Z", true)]);
    assert!(schedule.is_empty());
    assert_eq!(schedule.span_secs(), 0.0);
}

#[test]
fn writer_output_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chat.jsonl");

    let mut w = LogWriter::append(&path).unwrap();
    w.write(&entry("one", "2024-05-01T12:00:00Z", false)).unwrap();
    w.write(&entry("two", "2024-05-01T12:00:03Z", false)).unwrap();
    drop(w);

    // Appending keeps earlier records.
    let mut w = LogWriter::append(&path).unwrap();
    w.write(&entry("three", "2024-05-01T12:00:04Z", false)).unwrap();
    drop(w);

    let schedule = Schedule::from_path(&path).unwrap();
    assert_eq!(schedule.len(), 3);
    assert_eq!(schedule.messages()[2].offset, 4.0);
}

#[test]
fn missing_log_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(read_log(&dir.path().join("nope.jsonl")).is_err());
}
