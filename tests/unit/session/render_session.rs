use super::*;
use crate::chatlog::{LogEntry, Schedule};
use crate::clock::batch::BatchClock;
use crate::encode::sink::InMemorySink;
use crate::engine::speed::FixedSpeed;
use crate::foundation::core::Canvas;

fn small_config() -> DanmakuConfig {
    DanmakuConfig {
        width: 320,
        height: 120,
        fps: Fps::new(30, 1).unwrap(),
        speed: 0.5,
        ..DanmakuConfig::default()
    }
}

fn schedule(n: usize, step_ms: i64) -> Schedule {
    let start: chrono::DateTime<chrono::Utc> = "2024-05-01T12:00:00Z".parse().unwrap();
    Schedule::from_entries(
        (0..n)
            .map(|i| LogEntry {
                msg: format!("msg{i}"),
                is_delete: false,
                ts: start + chrono::Duration::milliseconds(step_ms * i as i64),
            })
            .collect(),
    )
}

#[test]
fn surface_must_match_canvas() {
    let cfg = small_config();
    let err = RenderSession::new(
        cfg.engine_config(),
        cfg.fps,
        Box::new(FixedAdvanceMetrics::new(10.0, 40.0)),
        Box::new(RecordingSurface::new(Canvas {
            width: 10,
            height: 10,
        })),
        Box::new(FixedSpeed(0.1)),
    );
    assert!(err.is_err());
}

#[test]
fn drawing_session_requires_a_font() {
    assert!(RenderSession::drawing(&small_config(), Box::new(FixedSpeed(0.1))).is_err());
}

#[test]
fn run_streams_every_frame_in_order_and_drains() {
    let cfg = small_config();
    let mut session = RenderSession::dry_run(&cfg, cfg.batch_speed()).unwrap();
    let mut clock = BatchClock::new(schedule(10, 100), cfg.fps);
    let mut sink = InMemorySink::new();

    let stats = session.run(&mut clock, &mut sink).unwrap();
    assert!(sink.ended());
    assert_eq!(sink.frames().len() as u64, stats.frames);
    for (i, (idx, frame)) in sink.frames().iter().enumerate() {
        assert_eq!(idx.0, i as u64);
        assert_eq!((frame.width, frame.height), (320, 120));
    }
    assert_eq!(stats.messages, 10);
    assert_eq!(stats.retired, 10);
    assert!(session.engine().is_idle());
    assert_eq!(sink.config().map(|c| c.fps), Some(cfg.fps));
}

#[test]
fn simulate_matches_run_statistics() {
    let cfg = small_config();
    let mut a = RenderSession::dry_run(&cfg, cfg.batch_speed()).unwrap();
    let mut b = RenderSession::dry_run(&cfg, cfg.batch_speed()).unwrap();

    let simulated = a.simulate(&mut BatchClock::new(schedule(25, 40), cfg.fps)).unwrap();
    let ran = b
        .run(
            &mut BatchClock::new(schedule(25, 40), cfg.fps),
            &mut InMemorySink::new(),
        )
        .unwrap();
    assert_eq!(simulated, ran);
    assert!(simulated.peak_backlog > 0, "{simulated:?}");
}

struct FailingSink {
    ended: bool,
}

impl FrameSink for FailingSink {
    fn begin(&mut self, _cfg: SinkConfig) -> DanmakuResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, _frame: &FrameRGBA) -> DanmakuResult<()> {
        if idx.0 == 2 {
            return Err(DanmakuError::encode("pipe closed"));
        }
        Ok(())
    }

    fn end(&mut self) -> DanmakuResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[test]
fn sink_is_ended_when_the_loop_fails() {
    let cfg = small_config();
    let mut session = RenderSession::dry_run(&cfg, cfg.batch_speed()).unwrap();
    let mut sink = FailingSink { ended: false };
    let err = session
        .run(&mut BatchClock::new(schedule(3, 0), cfg.fps), &mut sink)
        .unwrap_err();
    assert!(err.to_string().contains("pipe closed"));
    assert!(sink.ended);
}

#[test]
fn render_frame_stops_at_target() {
    let cfg = small_config();
    let mut session = RenderSession::dry_run(&cfg, cfg.batch_speed()).unwrap();
    let mut clock = BatchClock::new(schedule(2, 0), cfg.fps);

    let frame = session.render_frame(&mut clock, FrameIndex(4)).unwrap();
    assert_eq!(frame.data.len(), 320 * 120 * 4);
    assert_eq!(session.stats().frames, 5);

    assert!(session.render_frame(&mut clock, FrameIndex(1)).is_err());
    assert!(session.render_frame(&mut clock, FrameIndex(1_000_000)).is_err());
}
