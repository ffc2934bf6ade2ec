//! Scripted board scenarios through the public command surface

use zapzap::core::{GameEvent, GameState, Grid, Rejection, Scores, SimConfig, Tile, TileSource};
use zapzap::core::GridError;
use zapzap::types::{Command, Marking, Phase, Shape, SoundEvent, FREEZE_ZAP_MS, TICK_MS};

fn horizontal() -> Tile {
    Tile::new(Shape::Straight, 0)
}

fn vertical() -> Tile {
    Tile::new(Shape::Straight, 1)
}

/// 5×1 board: pins at 0 and 4, horizontal straights at 1 and 3, column 2 upright
fn five_by_one(refill: Tile) -> GameState {
    let grid = Grid::filled(5, 1, |x, _| if x == 2 { vertical() } else { horizontal() });
    GameState::with_grid(SimConfig::default(), grid, TileSource::fixed(refill))
}

fn tick_while(state: &mut GameState, phase: Phase) {
    let mut guard = 0;
    while state.phase() == phase {
        state.tick(TICK_MS);
        guard += 1;
        assert!(guard < 1_000, "stuck in {:?}", phase);
    }
}

#[test]
fn test_vertical_straight_blocks_then_rotation_zaps() {
    let mut state = five_by_one(vertical());
    assert_eq!(state.marking(2, 0), Marking::None);
    assert!(!state.resolution().is_zap());
    assert_eq!(state.phase(), Phase::WaitingForInput);

    state.handle(Command::Tap { x: 2, y: 0 }).unwrap();
    tick_while(&mut state, Phase::RotatingTile);

    assert_eq!(state.marking(2, 0), Marking::Ok);
    assert!(state.resolution().is_zap());
    assert_eq!(state.marking(0, 0), Marking::Ok);
    assert_eq!(state.marking(4, 0), Marking::Ok);
    assert_eq!(state.phase(), Phase::FreezeDuringZap);
}

#[test]
fn test_tap_on_pin_column_is_rejected() {
    let mut state = five_by_one(vertical());
    let scores = state.scores();
    let markings = state.resolution().clone();
    let generation = state.generation();
    state.drain_events().for_each(drop);

    let result = state.handle(Command::Tap { x: 0, y: 0 });
    assert_eq!(
        result,
        Err(Rejection::Grid(GridError::InvalidPosition { x: 0, y: 0 }))
    );
    assert_eq!(result.unwrap_err().code(), "invalid_position");

    assert_eq!(state.scores(), scores);
    assert_eq!(state.resolution(), &markings);
    assert_eq!(state.generation(), generation);
    assert_eq!(state.phase(), Phase::WaitingForInput);
    let events: Vec<_> = state.drain_events().collect();
    assert_eq!(events, vec![GameEvent::Sound(SoundEvent::Rejected)]);
}

#[test]
fn test_out_of_bounds_taps_are_rejected() {
    let mut state = five_by_one(vertical());
    for (x, y) in [(4, 0), (5, 0), (2, 1), (usize::MAX, 0)] {
        assert!(state.handle(Command::Tap { x, y }).is_err(), "({}, {})", x, y);
    }
    assert_eq!(state.scores(), Scores::default());
}

#[test]
fn test_removed_chain_is_refilled_and_recomputed() {
    let mut state = five_by_one(vertical());
    state.handle(Command::Tap { x: 2, y: 0 }).unwrap();
    tick_while(&mut state, Phase::RotatingTile);
    assert_eq!(state.phase(), Phase::FreezeDuringZap);

    for _ in 0..FREEZE_ZAP_MS / TICK_MS {
        state.tick(TICK_MS);
    }
    tick_while(&mut state, Phase::FreezeDuringZap);
    assert_eq!(state.phase(), Phase::RemovingAndFalling);

    // Logical refill is immediate
    assert_eq!(state.grid().tile(2, 0), Some(vertical()));
    assert!(state.grid().is_full());

    tick_while(&mut state, Phase::RemovingAndFalling);
    tick_while(&mut state, Phase::FallingBonuses);
    assert_eq!(state.phase(), Phase::WaitingForInput);
    for x in 0..5 {
        assert_ne!(state.marking(x, 0), Marking::Ok, "stale Ok at column {}", x);
    }
    assert_eq!(state.marking(2, 0), Marking::None);
}

#[test]
fn test_phase_changes_are_reported_in_order() {
    let mut state = five_by_one(vertical());
    state.drain_events().for_each(drop);
    state.handle(Command::Tap { x: 2, y: 0 }).unwrap();
    tick_while(&mut state, Phase::RotatingTile);

    let phases: Vec<(Phase, Phase)> = state
        .drain_events()
        .filter_map(|e| match e {
            GameEvent::PhaseChanged { from, to } => Some((from, to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![
            (Phase::WaitingForInput, Phase::RotatingTile),
            (Phase::RotatingTile, Phase::ResolvingConnections),
            (Phase::ResolvingConnections, Phase::FreezeDuringZap),
        ]
    );
}

#[test]
fn test_input_locked_outside_waiting() {
    let mut state = five_by_one(vertical());
    state.handle(Command::Tap { x: 2, y: 0 }).unwrap();
    tick_while(&mut state, Phase::RotatingTile);
    let grid = state.grid().clone();
    assert_eq!(
        state.handle(Command::Tap { x: 1, y: 0 }),
        Err(Rejection::Busy(Phase::FreezeDuringZap))
    );
    assert_eq!(state.grid(), &grid);
}

#[test]
fn test_snapshot_serializes_for_front_ends() {
    let state = five_by_one(vertical());
    let json = serde_json::to_value(state.snapshot()).unwrap();
    assert_eq!(json["width"], 5);
    assert_eq!(json["height"], 1);
    assert_eq!(json["phase"], "WaitingForInput");
    assert_eq!(json["tiles"].as_array().map(|t| t.len()), Some(5));
}
