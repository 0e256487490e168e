use crate::engine::lane::LaneSet;
use crate::engine::queue::ItemQueue;

/// One admission pass: every lane, top to bottom, takes at most one item from the queue head.
///
/// A lane is ready when it is empty or when its newest item has cleared at least `spacing` pixels
/// of the right edge. A lane that is not ready is skipped and the head stays queued for the next
/// lane or a later tick. Returns the number of admitted items.
pub(crate) fn admit(
    queue: &mut ItemQueue,
    lanes: &mut LaneSet,
    surface_width: f64,
    spacing: f64,
) -> usize {
    let mut admitted = 0;
    for lane in lanes.iter_mut() {
        if queue.is_empty() {
            break;
        }
        if let Some(free) = lane.free_space(surface_width)
            && free < spacing
        {
            continue;
        }
        let Some(item) = queue.dequeue_head() else {
            break;
        };
        lane.admit(item.place(surface_width), spacing);
        admitted += 1;
    }
    admitted
}

#[cfg(test)]
#[path = "../../tests/unit/engine/scheduler.rs"]
mod tests;
