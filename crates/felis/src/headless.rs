//! # Headless Host
//!
//! A scripted session standing in for a running game: it boots the loader
//! with the guardian mod, ticks a couple of players and has them break a
//! handful of blocks, honoring every [`BlockBreakOutcome`].

use std::sync::Arc;

use felis_api::{
    ApiResult, BlockBreakOutcome, BlockPos, BlockState, EventCatalog, FelisConfig, LevelRef,
    ModLoader, PlayerRef,
};

use crate::demo::Guardian;

/// Blocks broken during the session, in order.
pub const SCRIPTED_BREAKS: [(&str, [i32; 3]); 5] = [
    ("minecraft:stone", [0, 62, 0]),
    ("minecraft:bedrock", [0, -64, 0]),
    ("minecraft:oak_log", [3, 64, 5]),
    ("minecraft:barrier", [10, 80, 10]),
    ("minecraft:dirt", [1, 63, 1]),
];

/// Players ticked during the session.
pub const PLAYERS: [(u64, &str); 2] = [(1, "Tabby"), (2, "Whiskers")];

/// What happened during a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessSummary {
    /// Loaded mod ids.
    pub mods: Vec<String>,
    /// Player ticks run.
    pub ticks: u64,
    /// Ticks counted by the guardian.
    pub guardian_ticks: u64,
    /// Breaks the host carried out.
    pub broken: Vec<BlockPos>,
    /// Breaks a mod suppressed.
    pub suppressed: Vec<BlockPos>,
}

/// Runs one scripted session.
///
/// # Errors
///
/// Whatever the loader returns during registration or initialization.
pub fn run(config: FelisConfig) -> ApiResult<HeadlessSummary> {
    let mut loader = ModLoader::new(config, Arc::new(EventCatalog::new()));

    let guardian = Guardian::new();
    let stats = guardian.stats();
    loader.register(guardian.into_container())?;

    loader.api_init()?;
    loader.side_init()?;

    let hooks = loader.hooks();
    let level = LevelRef::new("minecraft:overworld");
    let players: Vec<PlayerRef> = PLAYERS
        .iter()
        .map(|&(id, name)| PlayerRef::new(id, name))
        .collect();

    let mut summary = HeadlessSummary {
        mods: loader.mod_ids().map(str::to_string).collect(),
        ..HeadlessSummary::default()
    };

    for player in &players {
        hooks.player_tick_start(player);
        hooks.player_tick_end(player);
        summary.ticks += 1;
    }

    for (i, (block, pos)) in SCRIPTED_BREAKS.iter().enumerate() {
        let player = &players[i % players.len()];
        let pos = BlockPos::from(*pos);
        match hooks.destroy_block(&level, player, pos, BlockState::new(*block)) {
            BlockBreakOutcome::Proceed => {
                tracing::info!(player = %player.name, block, %pos, "block broken");
                summary.broken.push(pos);
            }
            BlockBreakOutcome::Suppress => {
                tracing::info!(player = %player.name, block, %pos, "block break suppressed");
                summary.suppressed.push(pos);
            }
        }
    }

    summary.guardian_ticks = stats.ticks();
    Ok(summary)
}
