//! Integration tests for the game lifecycle: state machine, timer races,
//! registry lookups, and the sweep.

use std::sync::Arc;
use std::time::Duration;

use rallypoint_lobby::{
    Capacity, EventSink, GameFactory, GameRegistry, GarbageCollector, NullSink, SharedGame,
    Variant, VariantCatalog,
};
use rallypoint_protocol::{GameEvent, GameId, GameKind, GameState, PlayerId};
use tokio::sync::mpsc;

// =========================================================================
// Helpers
// =========================================================================

fn pid(id: &str) -> PlayerId {
    PlayerId::new(id)
}

/// A catalog where every kind uses `capacity` and `timeout`.
fn catalog_with(capacity: Capacity, timeout: Option<Duration>) -> VariantCatalog {
    GameKind::ALL
        .into_iter()
        .fold(VariantCatalog::empty(), |catalog, kind| {
            let mut variant = Variant::standard(kind);
            variant.capacity = capacity;
            variant.timeout = timeout;
            catalog.with_variant(kind, variant)
        })
}

fn factory(min: usize, max: usize, timeout: Option<Duration>) -> GameFactory {
    GameFactory::new(catalog_with(Capacity { min, max }, timeout)).unwrap()
}

fn recorder() -> (Arc<dyn EventSink>, mpsc::UnboundedReceiver<GameEvent>) {
    let (tx, rx) = mpsc::unbounded_channel::<GameEvent>();
    let sink: Arc<dyn EventSink> = Arc::new(tx);
    (sink, rx)
}

fn states(rx: &mut mpsc::UnboundedReceiver<GameEvent>) -> Vec<GameState> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event.state);
    }
    out
}

fn state_of(game: &SharedGame) -> GameState {
    game.lock().state()
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn test_four_player_game_fills_and_closes() {
    let (sink, mut rx) = recorder();
    let game = factory(4, 4, None)
        .create(GameKind::Foosball, pid("p1"), sink, None)
        .unwrap();
    assert_eq!(state_of(&game), GameState::Open);
    assert_eq!(game.lock().roster().len(), 1);

    for id in ["p2", "p3"] {
        assert!(game.lock().add_player(pid(id)));
        assert_eq!(state_of(&game), GameState::Open);
    }
    assert!(game.lock().add_player(pid("p4")));
    assert_eq!(state_of(&game), GameState::Finished);
    assert_eq!(game.lock().roster().len(), 4);

    assert!(!game.lock().add_player(pid("p5")));
    assert_eq!(states(&mut rx), vec![GameState::Finished]);
}

#[test]
fn test_duel_goes_straight_from_open_to_finished() {
    let (sink, mut rx) = recorder();
    let game = factory(2, 2, None)
        .create(GameKind::Chess, pid("white"), sink, None)
        .unwrap();
    assert_eq!(state_of(&game), GameState::Open);

    assert!(game.lock().add_player(pid("black")));
    assert_eq!(state_of(&game), GameState::Finished);
    assert_eq!(states(&mut rx), vec![GameState::Finished]);
}

#[tokio::test(start_paused = true)]
async fn test_group_game_ready_then_back_to_open_then_empty() {
    let (sink, mut rx) = recorder();
    let game = factory(2, 8, Some(Duration::from_secs(600)))
        .create(GameKind::Darts, pid("creator"), sink, None)
        .unwrap();
    assert!(game.lock().has_armed_timer());

    game.lock().add_player(pid("joiner"));
    assert_eq!(state_of(&game), GameState::Ready);

    game.lock().remove_player(&pid("joiner"));
    assert_eq!(state_of(&game), GameState::Open);

    game.lock().remove_player(&pid("creator"));
    assert_eq!(state_of(&game), GameState::Empty);
    assert!(!game.lock().has_armed_timer(), "timer must be cancelled on Empty");

    // Past the original deadline, nothing else happens.
    tokio::time::sleep(Duration::from_secs(1200)).await;
    assert_eq!(state_of(&game), GameState::Empty);
    assert_eq!(
        states(&mut rx),
        vec![GameState::Ready, GameState::Open, GameState::Empty]
    );
}

#[tokio::test(start_paused = true)]
async fn test_timer_times_out_underfilled_game() {
    let (sink, mut rx) = recorder();
    let timeout = Duration::from_secs(3600);
    let game = factory(4, 4, Some(timeout))
        .create(GameKind::Foosball, pid("p1"), sink, None)
        .unwrap();
    game.lock().add_player(pid("p2"));

    tokio::time::sleep(timeout + Duration::from_secs(1)).await;

    assert_eq!(state_of(&game), GameState::Timeout);
    assert!(!game.lock().add_player(pid("p3")));
    assert_eq!(states(&mut rx), vec![GameState::Timeout]);
}

#[tokio::test(start_paused = true)]
async fn test_timer_finishes_game_with_enough_players() {
    let (sink, mut rx) = recorder();
    let game = factory(2, 8, Some(Duration::from_secs(60)))
        .create(GameKind::Darts, pid("a"), sink, None)
        .unwrap();
    game.lock().add_player(pid("b"));
    game.lock().add_player(pid("c"));

    tokio::time::sleep(Duration::from_secs(61)).await;

    assert_eq!(state_of(&game), GameState::Finished);
    assert_eq!(states(&mut rx), vec![GameState::Ready, GameState::Finished]);
}

#[tokio::test(start_paused = true)]
async fn test_filled_game_cancels_timer() {
    let (sink, mut rx) = recorder();
    let game = factory(2, 2, Some(Duration::from_secs(60)))
        .create(GameKind::Pong, pid("a"), sink, None)
        .unwrap();
    game.lock().add_player(pid("b"));
    assert!(!game.lock().has_armed_timer());

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(state_of(&game), GameState::Finished);
    assert_eq!(states(&mut rx), vec![GameState::Finished], "exactly one transition");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_fill_while_fired_timer_waits_on_lock() {
    let (sink, mut rx) = recorder();
    let game = factory(2, 2, Some(Duration::from_millis(50)))
        .create(GameKind::Pong, pid("a"), sink, None)
        .unwrap();

    {
        let mut guard = game.lock();
        // Hold the lock past the deadline: the timer task fires on a worker
        // thread and blocks waiting for this guard.
        std::thread::sleep(Duration::from_millis(300));
        assert!(!guard.has_armed_timer(), "timer should have fired by now");

        assert!(guard.add_player(pid("b")));
        assert_eq!(guard.state(), GameState::Finished);
    }

    // Let the blocked callback take the lock and hit the terminal guard.
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(state_of(&game), GameState::Finished);
    assert_eq!(game.lock().roster().len(), 2);
    assert_eq!(states(&mut rx), vec![GameState::Finished], "exactly one Finished");
}

#[tokio::test(start_paused = true)]
async fn test_timeout_override_replaces_variant_timeout() {
    let game = factory(4, 4, Some(Duration::from_secs(3600)))
        .create(
            GameKind::Foosball,
            pid("a"),
            Arc::new(NullSink),
            Some(Duration::from_secs(5)),
        )
        .unwrap();

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(state_of(&game), GameState::Timeout);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_game_timer_is_harmless() {
    let (sink, mut rx) = recorder();
    let game = factory(4, 4, Some(Duration::from_secs(10)))
        .create(GameKind::Foosball, pid("a"), sink, None)
        .unwrap();
    drop(game);

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert!(states(&mut rx).is_empty());
}

// =========================================================================
// Properties
// =========================================================================

#[test]
fn test_fresh_game_state_for_every_window() {
    for min in 1..=5 {
        for max in min..=6 {
            let game = factory(min, max, None)
                .create(GameKind::Darts, pid("c"), Arc::new(NullSink), None)
                .unwrap();
            let game = game.lock();
            let expected = if min > 1 {
                GameState::Open
            } else if max > 1 {
                GameState::Ready
            } else {
                GameState::Finished
            };
            assert_eq!(game.state(), expected, "window {min}..={max}");
            assert_eq!(game.roster().len(), 1);
        }
    }
}

#[test]
fn test_state_tracks_roster_size_for_mixed_sequences() {
    let game = factory(3, 6, None)
        .create(GameKind::Darts, pid("p0"), Arc::new(NullSink), None)
        .unwrap();
    let script: &[(bool, &str)] = &[
        (true, "p1"),
        (true, "p2"),
        (false, "p1"),
        (false, "nobody"),
        (true, "p3"),
        (true, "p1"),
        (false, "p2"),
        (true, "p4"),
        (true, "p5"),
    ];

    for (join, id) in script {
        let mut g = game.lock();
        if *join {
            g.add_player(pid(id));
        } else {
            g.remove_player(&pid(id));
        }
        assert_eq!(g.state(), g.capacity().state_for(g.roster().len()));
    }
}

// =========================================================================
// Registry + sweep
// =========================================================================

fn registered(
    registry: &mut GameRegistry,
    kind: GameKind,
    min: usize,
    max: usize,
) -> (GameId, SharedGame) {
    let game = factory(min, max, None)
        .create(kind, pid("creator"), Arc::new(NullSink), None)
        .unwrap();
    let id = registry.register(Arc::clone(&game));
    (id, game)
}

#[test]
fn test_sweep_removes_only_terminal_games() {
    let mut registry = GameRegistry::new();
    let (open_id, _) = registered(&mut registry, GameKind::Foosball, 4, 4);

    let (finished_id, finished) = registered(&mut registry, GameKind::Pong, 2, 2);
    finished.lock().add_player(pid("other"));

    let (timeout_id, timed_out) = registered(&mut registry, GameKind::Chess, 2, 2);
    timed_out.lock().expire();

    let mut gc = GarbageCollector::new();
    let report = gc.sweep(&mut registry);

    let mut removed = report.removed.clone();
    removed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    let mut expected = vec![finished_id, timeout_id];
    expected.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    assert_eq!(removed, expected);
    assert_eq!(report.remaining, 1);
    assert!(registry.contains(&open_id));

    let again = gc.sweep(&mut registry);
    assert!(again.removed.is_empty());
    assert_eq!(again.remaining, 1);
    assert_eq!(gc.total_sweeps(), 2);
    assert_eq!(gc.total_removed(), 2);
}

#[test]
fn test_sweep_removes_empty_games() {
    let mut registry = GameRegistry::new();
    let (id, game) = registered(&mut registry, GameKind::Darts, 2, 8);
    game.lock().remove_player(&pid("creator"));

    let report = GarbageCollector::new().sweep(&mut registry);
    assert_eq!(report.removed, vec![id]);
    assert!(registry.is_empty());
}

#[test]
fn test_find_never_returns_terminal_or_other_kind() {
    let mut registry = GameRegistry::new();
    let (_, pong) = registered(&mut registry, GameKind::Pong, 2, 2);
    pong.lock().add_player(pid("x"));
    let (darts_id, _) = registered(&mut registry, GameKind::Darts, 2, 8);

    assert!(registry.find_open_or_ready(GameKind::Pong).is_none());
    assert!(registry.find_open_or_ready(GameKind::Chess).is_none());

    let (found, game) = registry.find_open_or_ready(GameKind::Darts).unwrap();
    assert_eq!(found, darts_id);
    assert_eq!(game.lock().kind(), GameKind::Darts);
}

#[tokio::test(start_paused = true)]
async fn test_events_carry_registered_id() {
    let (sink, mut rx) = recorder();
    let mut registry = GameRegistry::new();
    let game = factory(2, 2, Some(Duration::from_secs(30)))
        .create(GameKind::Chess, pid("a"), sink, None)
        .unwrap();
    let id = registry.register(Arc::clone(&game));

    tokio::time::sleep(Duration::from_secs(31)).await;

    let event = rx.try_recv().unwrap();
    assert_eq!(event.game_id, Some(id));
    assert_eq!(event.state, GameState::Timeout);
    assert_eq!(event.kind, GameKind::Chess);
}
