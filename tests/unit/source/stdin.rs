use std::time::{Duration, Instant};

use super::*;
use crate::source::MessageSource;

fn drain(source: &mut ChannelSource, want: usize) -> Vec<String> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut out = Vec::new();
    while out.len() < want && Instant::now() < deadline {
        match source.pull() {
            Some(msg) => out.push(msg),
            None => std::thread::sleep(Duration::from_millis(5)),
        }
    }
    out
}

#[test]
fn line_reader_forwards_non_blank_lines() {
    let input = std::io::Cursor::new(b"first\n\n  second  \nthird".to_vec());
    let mut source = spawn_line_reader(input);
    assert_eq!(drain(&mut source, 3), vec!["first", "second", "third"]);
}
