//! Engine scenario tests: the award transaction, navigation and snapshots
//! observed through the public API only.

use draftlab_core::store;
use draftlab_core::{
    Advance, AuctionEngine, AuctionError, Catalog, MemoryStore, StoreError,
};

const PLAYERS: &str = r#"{"players": [
    {"name": "P1", "position": "FW", "photo": "p1.jpg", "rating": 90},
    {"name": "P2", "position": "MF", "photo": "p2.jpg", "rating": 85},
    {"name": "P3", "position": "DF", "photo": "p3.jpg", "rating": 80}
]}"#;
const CAPTAINS: &str = r#"{"captains": [
    {"name": "A", "teamName": "Team A"},
    {"name": "B", "teamName": "Team B"}
]}"#;
const CONFIG: &str = r#"{"teamSize": 2, "initialBudget": 100}"#;

fn fresh_engine() -> (AuctionEngine, MemoryStore, Catalog) {
    let catalog = Catalog::from_json(PLAYERS, CAPTAINS, CONFIG).unwrap();
    let store = MemoryStore::new();
    let engine = AuctionEngine::new(catalog.build_state(), store.clone()).unwrap();
    (engine, store, catalog)
}

#[test]
fn two_team_draft_scenario() {
    let (mut engine, _, _) = fresh_engine();

    // award(0, 40) on P1
    let receipt = engine.award(0, 40).unwrap().outcome;
    assert_eq!(receipt.player_index, 0);
    let s = engine.state();
    assert_eq!(s.captains[0].budget, 60);
    assert_eq!(s.captains[0].roster.len(), 1);
    assert_eq!(s.captains[0].roster[0].name, "P1");
    assert_eq!(s.captains[0].roster[0].price, 40);
    assert!(s.players[0].sold);

    assert_eq!(
        engine.advance_to_next().outcome,
        Advance::Moved { from: 0, to: 1 }
    );

    // 150 is over B's budget; 100 is exactly the budget and is accepted.
    assert_eq!(
        engine.award(1, 150),
        Err(AuctionError::InsufficientBudget {
            team: "Team B".into(),
            budget: 100,
            amount: 150,
        })
    );
    engine.award(1, 100).unwrap();
    let b = &engine.state().captains[1];
    assert_eq!(b.budget, 0);
    assert!(b.is_full(engine.state().config.team_size));

    assert_eq!(
        engine.advance_to_next().outcome,
        Advance::Moved { from: 1, to: 2 }
    );

    // A already holds captain + P1 = teamSize.
    assert_eq!(
        engine.award(0, 10),
        Err(AuctionError::RosterFull {
            team: "Team A".into()
        })
    );
    assert_eq!(engine.best_eligible_captain(), None);
    assert_eq!(engine.award_to_best(10), Err(AuctionError::NoEligibleCaptain));
}

#[test]
fn second_award_of_same_player_changes_nothing() {
    let (mut engine, store, _) = fresh_engine();
    engine.award(0, 40).unwrap();
    let before = engine.state().clone();
    let writes = store.write_count();

    assert_eq!(
        engine.award(1, 10),
        Err(AuctionError::AlreadyAwarded {
            player: "P1".into()
        })
    );
    assert_eq!(engine.state(), &before);
    assert_eq!(store.write_count(), writes);
}

#[test]
fn rejected_awards_leave_state_untouched() {
    let (mut engine, store, _) = fresh_engine();
    let before = engine.state().clone();

    let attempts: Vec<Result<_, AuctionError>> = vec![
        engine.award(9, 10),
        engine.award_entry(0, "ten"),
        engine.award_entry(0, "-3"),
        engine.award(0, 101),
    ];
    for attempt in attempts {
        assert!(attempt.is_err());
    }
    assert_eq!(engine.state(), &before);
    assert_eq!(store.write_count(), 0);
}

#[test]
fn every_mutation_is_snapshotted() {
    let (mut engine, store, _) = fresh_engine();
    engine.award(0, 40).unwrap();
    assert_eq!(store.write_count(), 1);
    engine.advance_next();
    engine.advance_prev();
    engine.jump_to(2).unwrap();
    engine.advance_to_next();
    // Completion at the last player does not move or write.
    assert_eq!(store.write_count(), 4);

    let restored = store::load(&store).unwrap();
    assert_eq!(&restored.state, engine.state());
}

#[test]
fn snapshot_roundtrip_through_restore() {
    let (mut engine, store, _) = fresh_engine();
    engine.award(0, 40).unwrap();
    engine.advance_to_next();
    engine.award_entry(1, "99.7").unwrap();

    let restored = store::load(&store).unwrap();
    let resumed = AuctionEngine::new(restored.state, MemoryStore::new()).unwrap();
    assert_eq!(resumed.state(), engine.state());
    assert_eq!(resumed.state().players[1].sold_price, Some(99));
    assert_eq!(resumed.state().current_index, 1);
}

#[test]
fn degraded_durability_is_reported_per_operation() {
    let (mut engine, store, _) = fresh_engine();
    store.set_fail_writes(true);

    let applied = engine.award(0, 40).unwrap();
    assert!(matches!(
        applied.save_warning,
        Some(StoreError::Write { .. })
    ));
    assert_eq!(engine.state().captains[0].budget, 60);
    assert!(store.contents().is_none());
}

#[test]
fn reset_restores_source_catalog() {
    let (mut engine, store, catalog) = fresh_engine();
    engine.award(0, 40).unwrap();
    engine.advance_to_next();
    engine.award(1, 100).unwrap();

    engine.reset(catalog.build_state()).unwrap();

    let s = engine.state();
    assert_eq!(s, &catalog.build_state());
    assert!(s.players.iter().all(|p| !p.sold));
    assert!(s.captains.iter().all(|c| c.budget == c.initial_budget));
    assert_eq!(store::load(&store).unwrap().state, catalog.build_state());
}
