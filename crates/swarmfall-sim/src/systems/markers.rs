//! Marker system: expires bounce-chain hop markers.

use crate::context::SimContext;

pub fn run(ctx: &mut SimContext<'_>, dt: f32) {
    if !(dt > 0.0) {
        return;
    }
    for handle in ctx.pools.markers.leased_handles() {
        let expired = ctx
            .pools
            .markers
            .get_mut(handle)
            .map(|marker| {
                marker.remaining_life -= dt;
                marker.remaining_life <= 0.0
            })
            .unwrap_or(true);
        if expired {
            ctx.pools.markers.release(handle);
        }
    }
}
