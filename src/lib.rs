//! Danmaku renders streams of short timestamped messages as right-to-left scrolling overlays.
//!
//! Messages are placed into horizontal lanes so that no two overlap within a lane, then move left
//! at a shared speed until they leave the screen. The same engine drives two modes:
//!
//! - Batch: replay a JSON Lines chat log at a fixed frame rate into an MP4 through `ffmpeg`
//! - Live: feed messages from stdin, a TCP line feed or a demo generator into an `ffplay` window
//!
//! The entry point is [`RenderSession`], driven by a [`Clock`] and writing into a [`FrameSink`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod chatlog;
pub mod clock;
/// Session configuration.
pub mod config;
pub mod encode;
pub mod engine;
pub mod render;
pub mod session;
pub mod source;
pub mod text;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex};
pub use crate::foundation::error::{DanmakuError, DanmakuResult};

pub use crate::chatlog::{LogEntry, LogWriter, Schedule};
pub use crate::clock::batch::BatchClock;
pub use crate::clock::hold::{ModerationCommand, ModerationHold};
pub use crate::clock::live::LiveClock;
pub use crate::clock::{Clock, Intake};
pub use crate::config::{BoostConfig, DanmakuConfig};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::ffplay::{FfplaySink, FfplaySinkOpts};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::engine::speed::{BacklogBoost, FixedSpeed, SpeedPolicy};
pub use crate::engine::{Engine, EngineConfig, TickReport};
pub use crate::render::cpu::{CpuSurface, CpuSurfaceOpts};
pub use crate::render::surface::{DrawSurface, FrameRGBA, RecordingSurface};
pub use crate::session::render_session::{RenderSession, RenderStats};
pub use crate::source::demo::DemoSource;
pub use crate::source::runtime::FeedRuntime;
pub use crate::source::{ChannelSource, MessageSource};
pub use crate::text::layout::{FontSpec, TextLayoutEngine};
pub use crate::text::{FixedAdvanceMetrics, MetricsProvider, TextMetrics};
