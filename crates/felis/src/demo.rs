//! # Guardian Demo Mod
//!
//! Protects unbreakable blocks from players and counts player ticks.
//! Registered by the headless host; also a worked example for mod authors.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use felis_api::{
    BlockId, BreakBlockContext, CommonEntrypoint, EntrypointResult, InitContext, ModContainer,
    PlayerTickContext, Version,
};
use felis_events::EventContext;

/// Mod id of the guardian.
pub const GUARDIAN_ID: &str = "felis_guardian";

/// Version of the guardian, for mods that require it.
pub const GUARDIAN_VERSION: Version = Version::new(0, 1, 0);

/// Blocks the guardian refuses to let players break.
pub const PROTECTED_BLOCKS: [&str; 3] = ["bedrock", "barrier", "end_portal_frame"];

/// Counters shared between the guardian's handlers and the host.
#[derive(Debug, Default)]
pub struct GuardianStats {
    ticks: AtomicU64,
    protected: AtomicU64,
}

impl GuardianStats {
    /// Completed player ticks seen.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Block breaks the guardian cancelled.
    #[must_use]
    pub fn protected(&self) -> u64 {
        self.protected.load(Ordering::Relaxed)
    }
}

/// The guardian's common entrypoint.
#[derive(Debug, Clone, Default)]
pub struct Guardian {
    stats: Arc<GuardianStats>,
}

impl Guardian {
    /// Creates a guardian with fresh counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared counters.
    #[must_use]
    pub fn stats(&self) -> Arc<GuardianStats> {
        Arc::clone(&self.stats)
    }

    /// Wraps the guardian in a mod container.
    #[must_use]
    pub fn into_container(self) -> ModContainer {
        ModContainer::new(GUARDIAN_ID)
            .with_name("Felis Guardian")
            .with_version(GUARDIAN_VERSION)
            .with_common(self)
    }
}

/// Returns whether players may not break `block`.
#[must_use]
pub fn is_protected(block: &BlockId) -> bool {
    block.namespace() == BlockId::DEFAULT_NAMESPACE && PROTECTED_BLOCKS.contains(&block.path())
}

impl CommonEntrypoint for Guardian {
    fn on_init(&self, ctx: &mut InitContext<'_>) -> EntrypointResult {
        let events = ctx.events();

        let stats = Arc::clone(&self.stats);
        let protect = events.game.block.broken.subscribe_named(
            "felis_guardian::protect",
            move |ctx: &BreakBlockContext| {
                if ctx.is_cancelled() || !is_protected(ctx.block()) {
                    return;
                }
                ctx.cancel();
                stats.protected.fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    player = %ctx.player(),
                    block = %ctx.block(),
                    pos = %ctx.pos(),
                    "protected block"
                );
            },
        );

        let stats = Arc::clone(&self.stats);
        let count = events.game.player.tick.end.subscribe_named(
            "felis_guardian::count_ticks",
            move |_: &PlayerTickContext| {
                stats.ticks.fetch_add(1, Ordering::Relaxed);
            },
        );

        ctx.track(protect);
        ctx.track(count);
        tracing::debug!(mod_id = ctx.mod_id(), "guardian attached");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_blocks() {
        assert!(is_protected(&BlockId::new("minecraft:bedrock")));
        assert!(is_protected(&BlockId::new("barrier")));
        assert!(!is_protected(&BlockId::new("minecraft:stone")));
        assert!(!is_protected(&BlockId::new("othermod:bedrock")));
    }
}
