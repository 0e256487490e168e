use std::io::BufRead;

use crate::source::{ChannelSource, channel, clean_line};

/// Forward non-blank lines of `reader` from a background thread.
///
/// The thread ends at end of input or once the returned source is dropped.
pub fn spawn_line_reader<R>(reader: R) -> ChannelSource
where
    R: BufRead + Send + 'static,
{
    let (tx, source) = channel();
    std::thread::spawn(move || {
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(error = %e, "line reader stopped");
                    break;
                }
            };
            let Some(msg) = clean_line(&line) else {
                continue;
            };
            if tx.send(msg).is_err() {
                break;
            }
        }
        tracing::debug!("line reader reached end of input");
    });
    source
}

/// One message per line typed on stdin.
pub fn stdin_source() -> ChannelSource {
    spawn_line_reader(std::io::BufReader::new(std::io::stdin()))
}

#[cfg(test)]
#[path = "../../tests/unit/source/stdin.rs"]
mod tests;
