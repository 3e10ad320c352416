// Body-to-body collision: broad-phase detection, then a separate resolve pass
//
// Detection only records overlapping pairs. Callbacks run afterwards against
// that frozen set, so a callback that spawns or removes bodies cannot change
// which pairs are reported this frame.

use super::body::BodyId;
use super::context::FrameContext;
use super::world::BodySet;
use crate::engine::events::WorldEvent;

/// Record every overlapping pair of eligible bodies
///
/// Each pair is stored once, in the pending list of the body registered
/// first. Returns the number of pairs found.
pub fn detect_contacts(bodies: &mut BodySet, eligible: &[BodyId]) -> usize {
    let frames: Vec<_> = eligible
        .iter()
        .filter_map(|id| bodies.get(*id).map(|body| (*id, body.state.physics_frame())))
        .collect();

    let mut pairs = 0;
    for (index, (first, first_frame)) in frames.iter().enumerate() {
        for (second, second_frame) in &frames[index + 1..] {
            if first == second || !first_frame.intersects(second_frame) {
                continue;
            }
            if let Some(body) = bodies.get_mut(*first) {
                body.state.pending.push(*second);
                pairs += 1;
            }
        }
    }
    pairs
}

/// Notify both sides of every pending pair, then clear the pending lists
///
/// Returns the number of pairs resolved.
pub fn resolve_contacts(
    bodies: &mut BodySet,
    eligible: &[BodyId],
    ctx: &mut FrameContext<'_>,
) -> usize {
    let mut resolved = 0;
    for &id in eligible {
        let pending = match bodies.get_mut(id) {
            Some(body) => std::mem::take(&mut body.state.pending),
            None => continue,
        };

        for other in pending {
            let Some(other_snapshot) = bodies.get(other).map(|body| body.state.snapshot()) else {
                continue;
            };
            if let Some(body) = bodies.get_mut(id) {
                body.collided(&other_snapshot, ctx);
            }

            let Some(snapshot) = bodies.get(id).map(|body| body.state.snapshot()) else {
                continue;
            };
            if let Some(body) = bodies.get_mut(other) {
                body.collided(&snapshot, ctx);
            }

            ctx.emit(WorldEvent::BodyContact {
                first: id,
                second: other,
            });
            resolved += 1;
        }
    }
    resolved
}
