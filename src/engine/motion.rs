use crate::engine::item::SessionMetrics;
use crate::engine::lane::LaneSet;
use crate::foundation::error::DanmakuResult;
use crate::render::surface::DrawSurface;

/// Outcome of one motion pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct MotionReport {
    pub(crate) drawn: usize,
    pub(crate) retired: usize,
}

/// Shift every placed item left by `delta` pixels, draw the ones still visible, then drop the ones
/// that left the surface.
///
/// Every item moves by the same `delta`, so gaps established at admission are preserved.
pub(crate) fn advance(
    lanes: &mut LaneSet,
    delta: f64,
    metrics: &SessionMetrics,
    surface: &mut dyn DrawSurface,
) -> DanmakuResult<MotionReport> {
    let mut report = MotionReport::default();
    let mut any_exited = false;

    for (index, lane) in lanes.iter_mut().enumerate() {
        let baseline = metrics.baseline(index);
        for item in lane.items_mut() {
            item.shift_left(delta);
            if item.has_exited() {
                any_exited = true;
                continue;
            }
            surface.draw_text(item.text(), item.position(), baseline)?;
            report.drawn += 1;
        }
    }

    if any_exited {
        for lane in lanes.iter_mut() {
            report.retired += lane.prune_exited();
        }
    }

    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/engine/motion.rs"]
mod tests;
