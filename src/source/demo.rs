use std::path::Path;
use std::time::{Duration, Instant};

use crate::foundation::error::{DanmakuError, DanmakuResult};
use crate::source::{MessageSource, clean_line};

/// Seed of the demo generator; every demo run shows the same sequence.
pub const DEMO_SEED: u32 = 114_514;

/// Default time between demo messages.
pub const DEMO_INTERVAL: Duration = Duration::from_millis(100);

const NAMES: &[&str] = &[
    "兰茶荼",
    "兰萨卡",
    "兰非拉",
    "兰拉迦",
    "兰拉娜",
    "兰拉吉",
    "兰加惟",
    "兰多摩",
    "兰伊舍",
    "兰纳迦",
    "兰利遮",
    "兰纳真",
    "兰迦鲁",
    "兰般度",
    "兰伽卢",
    "兰贡迪",
    "兰犍多",
    "兰难世",
    "兰梨娄",
    "兰玛尼",
    "兰陀娑",
    "兰耶娑",
    "兰雅玛",
    "兰玛哈",
    "兰帝裟",
    "兰钵答",
    "兰随尼",
    "兰羯磨",
    "兰耶师",
    "兰宁巴",
    "兰沙恭",
    "兰提沙",
    "兰阐荼",
    "兰沙陀",
    "兰沙诃",
    "兰耶多",
    "兰耆都",
    "兰卑浮",
    "兰阿帕斯",
    "兰帕卡提",
    "兰百梨迦",
    "兰多希陀",
    "兰修提袈",
    "兰弥纳离",
    "兰陀尼什",
    "兰穆护昆达",
    "冒失的兰那罗",
    "收集材料的兰那罗",
    "爱音乐的兰那罗",
    "迷茫的兰那罗",
    "淘气的兰那罗",
    "兰宵宫",
];

/// Emits one message per interval, picked by a linear congruential generator from a built-in name
/// list or from the lines of a demo file.
#[derive(Debug)]
pub struct DemoSource {
    interval: Duration,
    last: Option<Instant>,
    seed: u32,
    lines: Vec<String>,
}

impl DemoSource {
    /// Demo over the built-in names.
    pub fn new(interval: Duration) -> Self {
        Self::with_lines(interval, NAMES.iter().map(|s| (*s).to_owned()).collect())
    }

    /// Demo over caller-supplied lines. An empty list falls back to the built-in names.
    pub fn with_lines(interval: Duration, lines: Vec<String>) -> Self {
        let lines = if lines.is_empty() {
            NAMES.iter().map(|s| (*s).to_owned()).collect()
        } else {
            lines
        };
        Self {
            interval,
            last: None,
            seed: DEMO_SEED,
            lines,
        }
    }

    /// Demo over the non-blank lines of `path`.
    pub fn from_file(path: &Path, interval: Duration) -> DanmakuResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            DanmakuError::feed(format!("failed to read demo file '{}': {e}", path.display()))
        })?;
        let lines: Vec<String> = text.lines().filter_map(clean_line).collect();
        if lines.is_empty() {
            return Err(DanmakuError::feed(format!(
                "demo file '{}' has no messages",
                path.display()
            )));
        }
        Ok(Self::with_lines(interval, lines))
    }

    /// Advance the generator and return the next message regardless of timing.
    pub fn next_message(&mut self) -> &str {
        self.seed = self.seed.wrapping_mul(1_103_515_245).wrapping_add(12_345) % (1 << 31);
        &self.lines[self.seed as usize % self.lines.len()]
    }

    /// Return the next message if at least one interval has passed at `now`.
    pub fn pull_at(&mut self, now: Instant) -> Option<String> {
        if let Some(last) = self.last
            && now.saturating_duration_since(last) < self.interval
        {
            return None;
        }
        self.last = Some(now);
        Some(self.next_message().to_owned())
    }
}

impl MessageSource for DemoSource {
    fn pull(&mut self) -> Option<String> {
        self.pull_at(Instant::now())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/demo.rs"]
mod tests;
