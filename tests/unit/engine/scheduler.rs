use super::*;
use crate::engine::item::QueuedItem;
use crate::engine::lane::Lane;

fn queue_of(texts: &[&str], width: f64) -> ItemQueue {
    let mut q = ItemQueue::new();
    for t in texts {
        q.push(QueuedItem::new((*t).to_owned(), width));
    }
    q
}

#[test]
fn each_lane_takes_at_most_one_item_per_pass() {
    let mut q = queue_of(&["a", "b", "c", "d"], 50.0);
    let mut lanes = LaneSet::new(3);

    assert_eq!(admit(&mut q, &mut lanes, 1000.0, 10.0), 3);
    assert_eq!(q.len(), 1);
    let heads: Vec<_> = lanes
        .iter()
        .map(|l| l.newest().map(|i| i.text().to_owned()))
        .collect();
    assert_eq!(
        heads,
        vec![Some("a".to_owned()), Some("b".to_owned()), Some("c".to_owned())]
    );
}

#[test]
fn busy_lane_is_skipped_and_head_goes_to_next_lane() {
    let mut lanes = LaneSet::new(2);
    let mut q = queue_of(&["a"], 50.0);
    assert_eq!(admit(&mut q, &mut lanes, 1000.0, 10.0), 1);

    let mut q = queue_of(&["b"], 50.0);
    assert_eq!(admit(&mut q, &mut lanes, 1000.0, 10.0), 1);
    assert_eq!(lanes.get(0).map(Lane::len), Some(1));
    assert_eq!(lanes.get(1).and_then(Lane::newest).map(|i| i.text()), Some("b"));
}

#[test]
fn head_waits_when_no_lane_is_ready() {
    let mut lanes = LaneSet::new(1);
    let mut q = queue_of(&["a", "b"], 50.0);
    assert_eq!(admit(&mut q, &mut lanes, 1000.0, 10.0), 1);
    assert_eq!(admit(&mut q, &mut lanes, 1000.0, 10.0), 0);
    assert_eq!(q.peek_head().map(QueuedItem::text), Some("b"));
}

#[test]
fn lane_becomes_ready_exactly_at_spacing() {
    let mut lanes = LaneSet::new(1);
    let mut q = queue_of(&["a", "b"], 50.0);
    admit(&mut q, &mut lanes, 1000.0, 10.0);
    for lane in lanes.iter_mut() {
        for item in lane.items_mut() {
            item.shift_left(60.0);
        }
    }
    assert_eq!(admit(&mut q, &mut lanes, 1000.0, 10.0), 1);
    assert!(q.is_empty());
}

#[test]
fn empty_queue_admits_nothing() {
    let mut lanes = LaneSet::new(4);
    let mut q = ItemQueue::new();
    assert_eq!(admit(&mut q, &mut lanes, 1000.0, 10.0), 0);
    assert!(lanes.all_empty());
}
