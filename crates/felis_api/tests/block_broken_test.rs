//! # Block.broken Scenario
//!
//! Two mods on `Block.broken`: the first cancels, the second only
//! observes. Both run, and the host sees a suppressed break.

use std::sync::Arc;

use felis_api::events::BLOCK_BROKEN;
use felis_api::{
    BlockBreakOutcome, BlockPos, BlockState, BreakBlockContext, EventCatalog, GameHooks, LevelRef,
    PlayerRef,
};
use felis_events::EventContext;
use parking_lot::Mutex;

#[test]
fn test_second_subscriber_observes_cancellation() {
    let catalog = Arc::new(EventCatalog::new());
    let observed = Arc::new(Mutex::new(Vec::new()));

    catalog
        .registry()
        .subscribe(BLOCK_BROKEN, |ctx: &BreakBlockContext| ctx.cancel())
        .unwrap();
    {
        let observed = Arc::clone(&observed);
        catalog
            .registry()
            .subscribe(BLOCK_BROKEN, move |ctx: &BreakBlockContext| {
                observed.lock().push((ctx.pos(), ctx.is_cancelled()));
            })
            .unwrap();
    }

    let hooks = GameHooks::new(Arc::clone(&catalog));
    let pos = BlockPos::new(12, 40, -7);
    let outcome = hooks.destroy_block(
        &LevelRef::new("minecraft:the_nether"),
        &PlayerRef::new(1, "Tabby"),
        pos,
        BlockState::new("minecraft:netherrack"),
    );

    assert_eq!(outcome, BlockBreakOutcome::Suppress);
    assert_eq!(*observed.lock(), vec![(pos, true)]);
}

#[test]
fn test_failing_mod_does_not_block_others() {
    let catalog = Arc::new(EventCatalog::new());
    let markers = Arc::new(Mutex::new(Vec::new()));
    let broken = &catalog.game.block.broken;

    {
        let markers = Arc::clone(&markers);
        broken.subscribe(move |_: &BreakBlockContext| markers.lock().push("first"));
    }
    broken.subscribe_named("clumsy_mod", |_: &BreakBlockContext| -> Result<(), String> {
        Err("lost track of the block".to_string())
    });
    {
        let markers = Arc::clone(&markers);
        broken.subscribe(move |_: &BreakBlockContext| markers.lock().push("third"));
    }

    let ctx = BreakBlockContext::new(
        LevelRef::new("minecraft:overworld"),
        PlayerRef::new(2, "Whiskers"),
        BlockPos::ORIGIN,
        BlockState::new("minecraft:grass_block").with_property("snowy", "false"),
    );
    let report = broken.fire(&ctx);

    assert_eq!(report.invoked, 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(&*report.failures[0].handler, "clumsy_mod");
    assert_eq!(*markers.lock(), vec!["first", "third"]);
    assert!(!ctx.is_cancelled());
}
