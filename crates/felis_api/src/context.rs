//! # Game Event Contexts
//!
//! Payloads for the game events. Fields are read-only; the only thing a
//! subscriber can change is the cancellation flag.

use felis_events::{Cancellation, EventContext};

use crate::types::{BlockId, BlockPos, BlockState, LevelRef, PlayerRef};

/// Context of `Player.Tick.start` and `Player.Tick.end`.
///
/// Cancelling a tick has no effect on the host; the flag only tells later
/// subscribers that an earlier one asked for it.
#[derive(Debug)]
pub struct PlayerTickContext {
    player: PlayerRef,
    cancellation: Cancellation,
}

impl PlayerTickContext {
    /// Creates a not-cancelled context.
    #[must_use]
    pub const fn new(player: PlayerRef) -> Self {
        Self {
            player,
            cancellation: Cancellation::new(),
        }
    }

    /// The ticking player.
    #[must_use]
    pub const fn player(&self) -> &PlayerRef {
        &self.player
    }
}

impl EventContext for PlayerTickContext {
    fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }
}

/// Context of `Block.broken`.
///
/// Fired before the host removes the block. Cancelling it keeps the block
/// in place.
#[derive(Debug)]
pub struct BreakBlockContext {
    level: LevelRef,
    player: PlayerRef,
    pos: BlockPos,
    state: BlockState,
    cancellation: Cancellation,
}

impl BreakBlockContext {
    /// Creates a not-cancelled context.
    #[must_use]
    pub const fn new(level: LevelRef, player: PlayerRef, pos: BlockPos, state: BlockState) -> Self {
        Self {
            level,
            player,
            pos,
            state,
            cancellation: Cancellation::new(),
        }
    }

    /// Level the block is in.
    #[must_use]
    pub const fn level(&self) -> &LevelRef {
        &self.level
    }

    /// Player breaking the block.
    #[must_use]
    pub const fn player(&self) -> &PlayerRef {
        &self.player
    }

    /// Block position.
    #[must_use]
    pub const fn pos(&self) -> BlockPos {
        self.pos
    }

    /// Block state before breaking.
    #[must_use]
    pub const fn state(&self) -> &BlockState {
        &self.state
    }

    /// Shorthand for `state().block()`.
    #[must_use]
    pub const fn block(&self) -> &BlockId {
        self.state.block()
    }
}

impl EventContext for BreakBlockContext {
    fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }
}
