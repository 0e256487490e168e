use super::*;
use crate::engine::item::QueuedItem;
use crate::foundation::core::Canvas;
use crate::render::surface::RecordingSurface;

fn metrics() -> SessionMetrics {
    SessionMetrics {
        lane_height: 40.0,
        ascent: 32.0,
    }
}

fn surface() -> RecordingSurface {
    RecordingSurface::new(Canvas {
        width: 1000,
        height: 80,
    })
}

#[test]
fn draws_shifted_items_on_lane_baselines() {
    let mut lanes = LaneSet::new(2);
    for lane in lanes.iter_mut() {
        lane.admit(QueuedItem::new("hi".to_owned(), 20.0).place(1000.0), 10.0);
    }
    let mut s = surface();

    let report = advance(&mut lanes, 100.0, &metrics(), &mut s).unwrap();
    assert_eq!(report, MotionReport { drawn: 2, retired: 0 });
    let calls = s.calls();
    assert_eq!((calls[0].x, calls[0].y), (900.0, 32.0));
    assert_eq!((calls[1].x, calls[1].y), (900.0, 72.0));
}

#[test]
fn exited_items_are_retired_and_not_drawn() {
    let mut lanes = LaneSet::new(1);
    if let Some(lane) = lanes.iter_mut().next() {
        lane.admit(QueuedItem::new("old".to_owned(), 20.0).place(1000.0), 10.0);
    }
    let mut s = surface();

    advance(&mut lanes, 1015.0, &metrics(), &mut s).unwrap();
    assert_eq!(s.calls().len(), 1);

    let report = advance(&mut lanes, 10.0, &metrics(), &mut s).unwrap();
    assert_eq!(report.retired, 1);
    assert_eq!(report.drawn, 0);
    assert!(lanes.all_empty());
}

#[test]
fn zero_delta_keeps_positions() {
    let mut lanes = LaneSet::new(1);
    if let Some(lane) = lanes.iter_mut().next() {
        lane.admit(QueuedItem::new("still".to_owned(), 20.0).place(500.0), 10.0);
    }
    let mut s = surface();
    advance(&mut lanes, 0.0, &metrics(), &mut s).unwrap();
    assert_eq!(s.calls()[0].x, 500.0);
}
