//! # Loader Integration Tests
//!
//! Full startup: config, mod registration, entrypoints per side, keyed
//! loader events, then host hooks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use felis_api::{
    BlockBreakOutcome, BlockPos, BlockState, BreakBlockContext, ClientEntrypoint,
    EntrypointResult, EventCatalog, FelisConfig, InitContext, LevelRef, ModContainer, ModLoader,
    PlayerRef, PlayerTickContext, ServerEntrypoint, Side,
};
use felis_events::EventContext;
use parking_lot::Mutex;

type Log = Arc<Mutex<Vec<String>>>;

struct SideRecorder(Log);

impl ClientEntrypoint for SideRecorder {
    fn on_client_init(&self, ctx: &mut InitContext<'_>) -> EntrypointResult {
        self.0.lock().push(format!("client:{}", ctx.mod_id()));
        Ok(())
    }
}

impl ServerEntrypoint for SideRecorder {
    fn on_server_init(&self, ctx: &mut InitContext<'_>) -> EntrypointResult {
        assert_eq!(ctx.side(), Side::Server);
        self.0.lock().push(format!("server:{}", ctx.mod_id()));
        Ok(())
    }
}

fn boot(side: Side, log: &Log) -> ModLoader {
    let config = FelisConfig::from_toml_str(&format!("side = \"{side}\"")).unwrap();
    let mut loader = ModLoader::new(config, Arc::new(EventCatalog::new()));
    loader
        .register(
            ModContainer::new("tabby")
                .with_client(SideRecorder(Arc::clone(log)))
                .with_server(SideRecorder(Arc::clone(log))),
        )
        .unwrap();
    loader
}

#[test]
fn test_only_client_entrypoints_on_client() {
    let log = Log::default();
    let mut loader = boot(Side::Client, &log);

    loader.api_init().unwrap();
    loader.side_init().unwrap();

    assert_eq!(*log.lock(), vec!["client:tabby"]);
}

#[test]
fn test_only_server_entrypoints_on_server() {
    let log = Log::default();
    let mut loader = boot(Side::Server, &log);

    loader.api_init().unwrap();
    loader.side_init().unwrap();

    assert_eq!(*log.lock(), vec!["server:tabby"]);
}

#[test]
fn test_entrypoint_loaded_is_keyed() {
    let log = Log::default();
    let mut loader = boot(Side::Server, &log);
    let loaded = Arc::clone(&loader.events().loader.entrypoint_loaded);

    for key in ["common", "client", "server"] {
        let log = Arc::clone(&log);
        loaded.subscribe_key(key.to_string(), move |ctx| {
            log.lock().push(format!("loaded:{}", ctx.key));
        });
    }

    loader.api_init().unwrap();
    assert_eq!(*log.lock(), vec!["loaded:common"]);

    loader.side_init().unwrap();
    assert_eq!(
        *log.lock(),
        vec!["loaded:common", "server:tabby", "loaded:server"]
    );
}

#[test]
fn test_mod_subscriptions_drive_hooks() {
    let mut loader = ModLoader::new(FelisConfig::default(), Arc::new(EventCatalog::new()));
    let ticks = Arc::new(AtomicUsize::new(0));

    {
        let ticks = Arc::clone(&ticks);
        loader
            .register(ModContainer::new("guardian").with_common(
                move |ctx: &mut InitContext<'_>| -> EntrypointResult {
                    let events = ctx.events();
                    let protect = events.game.block.broken.subscribe_named(
                        "guardian::protect_bedrock",
                        |ctx: &BreakBlockContext| {
                            if ctx.block().path() == "bedrock" {
                                ctx.cancel();
                            }
                        },
                    );
                    let ticks = Arc::clone(&ticks);
                    let count = events.game.player.tick.end.subscribe(
                        move |_: &PlayerTickContext| {
                            ticks.fetch_add(1, Ordering::Relaxed);
                        },
                    );
                    ctx.track(protect);
                    ctx.track(count);
                    Ok(())
                },
            ))
            .unwrap();
    }
    loader.api_init().unwrap();
    loader.side_init().unwrap();

    let guardian = loader.get("guardian").unwrap();
    assert_eq!(guardian.subscriptions().len(), 2);

    let hooks = loader.hooks();
    let level = LevelRef::new("minecraft:overworld");
    let player = PlayerRef::new(3, "Mittens");

    assert_eq!(
        hooks.destroy_block(&level, &player, BlockPos::new(0, -64, 0), BlockState::new("bedrock")),
        BlockBreakOutcome::Suppress
    );
    assert_eq!(
        hooks.destroy_block(&level, &player, BlockPos::new(0, 70, 0), BlockState::new("dirt")),
        BlockBreakOutcome::Proceed
    );

    hooks.player_tick_start(&player);
    hooks.player_tick_end(&player);
    hooks.player_tick_end(&player);
    assert_eq!(ticks.load(Ordering::Relaxed), 2);

    // Detaching the mod restores vanilla behaviour.
    for sub in guardian.subscriptions() {
        assert!(loader.events().registry().unsubscribe(sub));
    }
    assert_eq!(
        hooks.destroy_block(&level, &player, BlockPos::new(0, -64, 0), BlockState::new("bedrock")),
        BlockBreakOutcome::Proceed
    );
}
