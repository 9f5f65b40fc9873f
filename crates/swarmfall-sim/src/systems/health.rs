//! Health timers: invulnerability expiry and the death sequence.

use hecs::Entity;

use swarmfall_combat::health::{Health, HealthTransition};

use crate::context::SimContext;

/// What the engine needs to know after health timers advance.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthReport {
    /// Hostiles that finished dying this tick.
    pub disabled: u32,
    /// The player finished dying this tick.
    pub player_disabled: bool,
}

pub fn run(ctx: &mut SimContext<'_>, dt: f32) -> HealthReport {
    let mut report = HealthReport::default();
    let player: Entity = ctx.player;
    for (entity, health) in ctx.world.query_mut::<&mut Health>() {
        match health.advance(dt) {
            Some(HealthTransition::Disabled) if entity == player => {
                report.player_disabled = true;
            }
            Some(HealthTransition::Disabled) => report.disabled += 1,
            Some(HealthTransition::InvulnerabilityEnded) | None => {}
        }
    }
    if report.disabled > 0 {
        tracing::debug!(count = report.disabled, "hostiles disabled");
    }
    report
}
