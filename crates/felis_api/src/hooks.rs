//! # Instrumentation Points
//!
//! The host calls these at fixed points in its own code. Each call builds
//! a fresh context, fires the matching event and translates the result
//! back into something the host acts on.
//!
//! ```text
//! host player tick ──> player_tick_start ──> Player.Tick.start
//!                      ...tick body...
//!                  ──> player_tick_end   ──> Player.Tick.end
//!
//! host block break ──> destroy_block     ──> Block.broken
//!                      <── Proceed | Suppress
//! ```

use std::sync::Arc;

use felis_events::{DispatchReport, EventContext};

use crate::context::{BreakBlockContext, PlayerTickContext};
use crate::events::EventCatalog;
use crate::types::{BlockPos, BlockState, LevelRef, PlayerRef};

/// What the host should do with a block break.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockBreakOutcome {
    /// Remove the block as usual.
    Proceed,
    /// Keep the block and report the break as failed.
    Suppress,
}

impl BlockBreakOutcome {
    /// Returns `true` for [`Suppress`](Self::Suppress).
    #[inline]
    #[must_use]
    pub const fn is_suppressed(self) -> bool {
        matches!(self, Self::Suppress)
    }
}

/// Host-facing entry into the event system.
///
/// Cheap to clone; all clones fire the same events.
#[derive(Clone, Debug)]
pub struct GameHooks {
    events: Arc<EventCatalog>,
    trace_dispatch: bool,
}

impl GameHooks {
    /// Creates hooks firing into `events`.
    #[must_use]
    pub const fn new(events: Arc<EventCatalog>) -> Self {
        Self {
            events,
            trace_dispatch: false,
        }
    }

    /// Enables per-dispatch trace logging.
    #[must_use]
    pub const fn with_trace_dispatch(mut self, enabled: bool) -> Self {
        self.trace_dispatch = enabled;
        self
    }

    /// The catalog these hooks fire into.
    #[must_use]
    pub fn events(&self) -> &EventCatalog {
        &self.events
    }

    /// Called by the host before a player tick.
    ///
    /// Ticks cannot be cancelled; the report is informational.
    pub fn player_tick_start(&self, player: &PlayerRef) -> DispatchReport {
        let ctx = PlayerTickContext::new(player.clone());
        let report = self.events.game.player.tick.start.fire(&ctx);
        self.trace(self.events.game.player.tick.start.name(), &report, ctx.is_cancelled());
        report
    }

    /// Called by the host after a player tick.
    pub fn player_tick_end(&self, player: &PlayerRef) -> DispatchReport {
        let ctx = PlayerTickContext::new(player.clone());
        let report = self.events.game.player.tick.end.fire(&ctx);
        self.trace(self.events.game.player.tick.end.name(), &report, ctx.is_cancelled());
        report
    }

    /// Called by the host before a player breaks a block.
    ///
    /// Returns [`BlockBreakOutcome::Suppress`] when any subscriber cancelled.
    #[must_use]
    pub fn destroy_block(
        &self,
        level: &LevelRef,
        player: &PlayerRef,
        pos: BlockPos,
        state: BlockState,
    ) -> BlockBreakOutcome {
        let ctx = BreakBlockContext::new(level.clone(), player.clone(), pos, state);
        let broken = &self.events.game.block.broken;
        let report = broken.fire(&ctx);
        self.trace(broken.name(), &report, ctx.is_cancelled());

        if ctx.is_cancelled() {
            tracing::debug!(pos = %pos, block = %ctx.block(), player = %player.name, "block break suppressed");
            BlockBreakOutcome::Suppress
        } else {
            BlockBreakOutcome::Proceed
        }
    }

    fn trace(&self, event: &'static str, report: &DispatchReport, cancelled: bool) {
        if self.trace_dispatch {
            tracing::trace!(
                event,
                invoked = report.invoked,
                failures = report.failures.len(),
                cancelled,
                "hook dispatched"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn overworld() -> LevelRef {
        LevelRef::new("minecraft:overworld")
    }

    #[test]
    fn test_destroy_block_without_subscribers_proceeds() {
        let hooks = GameHooks::new(Arc::new(EventCatalog::new()));
        let outcome = hooks.destroy_block(
            &overworld(),
            &PlayerRef::new(1, "Tabby"),
            BlockPos::ORIGIN,
            BlockState::new("minecraft:dirt"),
        );
        assert_eq!(outcome, BlockBreakOutcome::Proceed);
        assert!(!outcome.is_suppressed());
    }

    #[test]
    fn test_cancel_maps_to_suppress() {
        let hooks = GameHooks::new(Arc::new(EventCatalog::new())).with_trace_dispatch(true);
        hooks
            .events()
            .game
            .block
            .broken
            .subscribe(|ctx: &BreakBlockContext| {
                if ctx.block().path() == "bedrock" {
                    ctx.cancel();
                }
            });

        let player = PlayerRef::new(1, "Tabby");
        let bedrock = hooks.destroy_block(
            &overworld(),
            &player,
            BlockPos::new(0, -64, 0),
            BlockState::new("minecraft:bedrock"),
        );
        let stone = hooks.destroy_block(
            &overworld(),
            &player,
            BlockPos::new(0, 10, 0),
            BlockState::new("minecraft:stone"),
        );

        assert_eq!(bedrock, BlockBreakOutcome::Suppress);
        assert_eq!(stone, BlockBreakOutcome::Proceed);
    }

    #[test]
    fn test_tick_hooks_fire_their_own_event() {
        let hooks = GameHooks::new(Arc::new(EventCatalog::new()));
        let starts = Arc::new(AtomicUsize::new(0));

        {
            let starts = Arc::clone(&starts);
            hooks
                .events()
                .game
                .player
                .tick
                .start
                .subscribe(move |ctx: &PlayerTickContext| {
                    assert_eq!(ctx.player().entity_id, 9);
                    starts.fetch_add(1, Ordering::Relaxed);
                });
        }

        let player = PlayerRef::new(9, "Mittens");
        let start = hooks.player_tick_start(&player);
        let end = hooks.player_tick_end(&player);

        assert_eq!(start.invoked, 1);
        assert_eq!(end.invoked, 0);
        assert_eq!(starts.load(Ordering::Relaxed), 1);
    }
}
