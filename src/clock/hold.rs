use std::collections::VecDeque;
use std::io::Write;
use std::time::{Duration, Instant};

use crate::chatlog::LogEntry;
use crate::source::MessageSource;

/// A moderator action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModerationCommand {
    /// Drop the held message with this id.
    Delete(u64),
    /// Stop releasing messages; new arrivals wait without aging.
    Pause,
    /// Release again.
    Resume,
}

impl ModerationCommand {
    /// Parse a console line: `d <id>` / `delete <id>`, `p` / `pause`, `r` / `resume`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let cmd = match words.next()? {
            "d" | "delete" => Self::Delete(words.next()?.parse().ok()?),
            "p" | "pause" => Self::Pause,
            "r" | "resume" => Self::Resume,
            _ => return None,
        };
        words.next().is_none().then_some(cmd)
    }
}

#[derive(Debug)]
struct HeldMessage {
    id: u64,
    entry: LogEntry,
    arrived: Instant,
}

/// What one [`ModerationHold::poll`] decided.
#[derive(Debug, Default, PartialEq)]
pub struct HoldOutcome {
    /// Messages whose hold expired, oldest first.
    pub released: Vec<LogEntry>,
    /// Messages a moderator deleted, marked `is_delete`.
    pub deleted: Vec<LogEntry>,
}

/// Delays live messages so a moderator can delete them before they reach the screen.
///
/// Every arrival gets an id and waits `hold`. While paused, nothing is released and new arrivals
/// start aging only once the hold resumes.
pub struct ModerationHold {
    hold: Duration,
    held: VecDeque<HeldMessage>,
    waiting: VecDeque<HeldMessage>,
    paused: bool,
    next_id: u64,

    console: Option<Box<dyn MessageSource>>,
    board: Option<Box<dyn Write>>,
}

impl ModerationHold {
    /// Hold each message for `hold` before release.
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            held: VecDeque::new(),
            waiting: VecDeque::new(),
            paused: false,
            next_id: 1,
            console: None,
            board: None,
        }
    }

    /// Read [`ModerationCommand`] lines from `console` on every poll.
    pub fn with_console(mut self, console: Box<dyn MessageSource>) -> Self {
        self.console = Some(console);
        self
    }

    /// Announce held messages and their ids on `board`.
    pub fn with_board(mut self, board: Box<dyn Write>) -> Self {
        self.board = Some(board);
        self
    }

    /// Take a new message and return its id.
    pub fn admit(&mut self, msg: String, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.announce(format_args!("[{id}] {msg}"));

        let held = HeldMessage {
            id,
            entry: LogEntry::now(msg),
            arrived: now,
        };
        if self.paused {
            self.waiting.push_back(held);
        } else {
            self.held.push_back(held);
        }
        id
    }

    /// Apply one command. Returns the deleted entry for [`ModerationCommand::Delete`].
    pub fn apply(&mut self, cmd: ModerationCommand) -> Option<LogEntry> {
        match cmd {
            ModerationCommand::Delete(id) => {
                let removed =
                    remove_id(&mut self.held, id).or_else(|| remove_id(&mut self.waiting, id));
                match removed {
                    Some(mut held) => {
                        held.entry.is_delete = true;
                        self.announce(format_args!("[{id}] deleted"));
                        Some(held.entry)
                    }
                    None => {
                        tracing::warn!(id, "no held message with this id");
                        None
                    }
                }
            }
            ModerationCommand::Pause => {
                if !self.paused {
                    self.paused = true;
                    let pending = self.pending();
                    self.announce(format_args!("paused, {pending} pending"));
                }
                None
            }
            ModerationCommand::Resume => {
                if self.paused {
                    self.paused = false;
                    self.announce(format_args!("resumed"));
                }
                None
            }
        }
    }

    /// Run console commands, then release every message whose hold has expired.
    pub fn poll(&mut self, now: Instant) -> HoldOutcome {
        let mut outcome = HoldOutcome::default();

        let mut lines = Vec::new();
        if let Some(console) = self.console.as_mut() {
            while let Some(line) = console.pull() {
                lines.push(line);
            }
        }
        for line in lines {
            match ModerationCommand::parse(&line) {
                Some(cmd) => outcome.deleted.extend(self.apply(cmd)),
                None => tracing::warn!(line = line.as_str(), "unknown moderation command"),
            }
        }

        if self.paused {
            return outcome;
        }
        for mut held in self.waiting.drain(..) {
            held.arrived = now;
            self.held.push_back(held);
        }
        while self
            .held
            .front()
            .is_some_and(|m| now.saturating_duration_since(m.arrived) >= self.hold)
        {
            if let Some(held) = self.held.pop_front() {
                outcome.released.push(held.entry);
            }
        }
        outcome
    }

    /// `true` while releases are paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Messages not yet released or deleted.
    pub fn pending(&self) -> usize {
        self.held.len() + self.waiting.len()
    }

    fn announce(&mut self, line: std::fmt::Arguments<'_>) {
        if let Some(board) = self.board.as_mut()
            && let Err(e) = writeln!(board, "{line}")
        {
            tracing::warn!(error = %e, "moderation board disabled");
            self.board = None;
        }
    }
}

fn remove_id(queue: &mut VecDeque<HeldMessage>, id: u64) -> Option<HeldMessage> {
    let index = queue.iter().position(|m| m.id == id)?;
    queue.remove(index)
}

#[cfg(test)]
#[path = "../../tests/unit/clock/hold.rs"]
mod tests;
