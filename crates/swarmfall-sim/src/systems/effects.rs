//! Timer expiry: removes status effects and buffs whose time ran out.

use crate::context::SimContext;
use crate::timers::TimerAction;

pub fn run(ctx: &mut SimContext<'_>, dt: f32) {
    for action in ctx.timers.advance(dt) {
        match action {
            TimerAction::RemoveEffect { target, id } => {
                ctx.status.remove(target, id);
            }
            TimerAction::EndBuff { handle } => {
                if ctx.stats.remove_buff(handle) {
                    tracing::debug!(stat = ?handle.kind(), "buff expired");
                }
            }
        }
    }
}
