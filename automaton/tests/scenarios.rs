//! End-to-end behaviour of the engine under control commands.

use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use automaton::{
    Command, CommandSource, EngineState, Grid, PaintOp, Region, RuleCatalog, SimulationEngine,
    command_channel, patterns,
};

fn engine(width: usize, height: usize) -> SimulationEngine {
    let catalog = Arc::new(RuleCatalog::builtin().expect("builtin rules parse"));
    SimulationEngine::new(catalog, width, height).expect("lamer is in the catalog")
}

fn live(grid: &Grid) -> BTreeSet<(usize, usize)> {
    grid.live_cells().collect()
}

fn idle() -> VecDeque<Command> {
    VecDeque::new()
}

fn queue(commands: impl IntoIterator<Item = Command>) -> VecDeque<Command> {
    commands.into_iter().collect()
}

// ============================================================================
// Rule scenarios
// ============================================================================

#[test]
fn lamer_clears_any_grid_in_one_step() {
    let mut engine = engine(32, 32);
    engine.seed_random(3, 0.5);
    assert!(engine.grid().population() > 0);
    assert_eq!(engine.active_rule(), "lamer");

    let report = engine.frame(&mut idle(), None);

    assert!(report.advanced);
    assert_eq!(engine.grid().population(), 0);
    assert_eq!(engine.generation(), 1);
}

#[test]
fn glider_translates_diagonally_every_four_generations() {
    let mut engine = engine(64, 64);
    engine.apply(Command::SetRule("life".into())).unwrap();
    engine.seed_pattern(patterns::find("glider").unwrap(), 20, 20);
    let start = live(engine.grid());
    assert_eq!(start.len(), 5);

    for _ in 0..4 {
        engine.frame(&mut idle(), None);
    }

    let shifted: BTreeSet<_> = start.iter().map(|&(x, y)| (x + 1, y + 1)).collect();
    assert_eq!(live(engine.grid()), shifted);
    assert_eq!(engine.generation(), 4);
}

#[test]
fn glider_dies_against_the_border_instead_of_wrapping() {
    let mut engine = engine(12, 12);
    engine.apply(Command::SetRule("life".into())).unwrap();
    engine.seed_pattern(patterns::find("glider").unwrap(), 6, 6);

    for _ in 0..60 {
        engine.step();
    }

    // Absent neighbors stop the glider in the corner; it settles as a block
    // and never reappears at the opposite edge.
    let block = BTreeSet::from([(10, 10), (11, 10), (10, 11), (11, 11)]);
    assert_eq!(live(engine.grid()), block);
}

#[test]
fn stepping_is_deterministic() {
    let catalog = Arc::new(RuleCatalog::builtin().unwrap());
    let mut start = Grid::new(48, 48);
    start.randomize(77, 0.35);

    for (name, rule) in catalog.iter() {
        let a = start.step(rule);
        let b = start.step(rule);
        assert_eq!(a, b, "{name}");
    }
}

// ============================================================================
// Command scenarios
// ============================================================================

#[test]
fn unknown_rule_name_is_rejected_without_side_effects() {
    let mut engine = engine(16, 16);
    engine.apply(Command::SetRule("highlife".into())).unwrap();
    engine.apply(Command::Pause).unwrap();

    let report = engine.frame(&mut queue([Command::SetRule("not_a_real_rule".into())]), None);

    assert_eq!(report.rejected, 1);
    assert_eq!(engine.active_rule(), "highlife");
    assert_eq!(engine.state(), EngineState::Paused);
    assert!(engine.apply(Command::SetRule("not_a_real_rule".into())).is_err());
}

#[test]
fn reset_clears_grid_but_keeps_rule_pause_and_generation() {
    let mut engine = engine(16, 16);
    engine.apply(Command::SetRule("life".into())).unwrap();
    engine.seed_pattern(patterns::find("blinker").unwrap(), 5, 5);
    engine.frame(&mut idle(), None);
    engine.apply(Command::Pause).unwrap();

    engine.frame(&mut queue([Command::Reset]), None);

    assert_eq!(engine.grid().population(), 0);
    assert_eq!(engine.active_rule(), "life");
    assert!(engine.is_paused());
    assert_eq!(engine.generation(), 1);
    assert_eq!((engine.grid().width(), engine.grid().height()), (16, 16));
}

#[test]
fn paused_frames_change_nothing() {
    let mut engine = engine(24, 24);
    engine.apply(Command::SetRule("life".into())).unwrap();
    engine.seed_random(9, 0.4);
    engine.frame(&mut queue([Command::Pause]), None);

    let grid = engine.grid().clone();
    for _ in 0..10 {
        let report = engine.frame(&mut idle(), None);
        assert!(!report.advanced);
    }
    assert_eq!(engine.grid(), &grid);
    assert_eq!(engine.generation(), 0);
}

#[test]
fn single_steps_while_paused() {
    let mut engine = engine(16, 16);
    engine.apply(Command::SetRule("life".into())).unwrap();
    engine.seed_pattern(patterns::find("blinker").unwrap(), 5, 5);
    engine.apply(Command::Pause).unwrap();

    let expected = engine.grid().step(&engine.rule());
    engine.frame(&mut queue([Command::Step]), None);
    engine.frame(&mut idle(), None);

    assert_eq!(engine.grid(), &expected);
    assert_eq!(engine.generation(), 1);
    assert_eq!(engine.state(), EngineState::Paused);
}

#[test]
fn step_from_running_pauses_after_one_generation() {
    let mut engine = engine(8, 8);
    engine.frame(&mut queue([Command::Step]), None);
    engine.frame(&mut idle(), None);
    assert_eq!(engine.generation(), 1);

    engine.frame(&mut queue([Command::Pause]), None);
    assert_eq!(engine.state(), EngineState::Running);
    assert_eq!(engine.generation(), 2);
}

#[test]
fn painting_while_paused_is_visible_immediately() {
    let mut engine = engine(16, 16);
    engine.apply(Command::Pause).unwrap();

    let paint = PaintOp::alive(Region::brush(0, 0, 2, 16, 16));
    engine.frame(&mut idle(), Some(paint));
    assert_eq!(engine.snapshot().grid.population(), 9);
    assert_eq!(engine.snapshot().generation, 0);

    let erase = PaintOp::dead(Region::brush(0, 0, 0, 16, 16));
    engine.frame(&mut idle(), Some(erase));
    assert_eq!(engine.grid().population(), 8);
}

#[test]
fn quit_stops_the_engine() {
    let mut engine = engine(8, 8);
    let report = engine.frame(&mut queue([Command::Pause, Command::Quit]), None);
    assert!(report.quit);
    assert_eq!(engine.state(), EngineState::Stopped);
    assert!(!engine.is_running());
}

// ============================================================================
// Channel-driven run loop
// ============================================================================

#[test]
fn controller_thread_drives_the_engine_through_the_channel() {
    let mut engine = engine(32, 32);
    engine.seed_pattern(patterns::find("glider").unwrap(), 4, 4);
    let (tx, mut rx) = command_channel();

    let controller = std::thread::spawn(move || {
        tx.send(Command::SetRule("life".into())).unwrap();
        tx.send(Command::Pause).unwrap();
        tx.send(Command::Step).unwrap();
        tx.send(Command::Quit).unwrap();
    });
    controller.join().unwrap();

    let mut frames = 0;
    while engine.is_running() {
        engine.frame(&mut rx, None);
        frames += 1;
    }

    assert_eq!(frames, 1);
    assert_eq!(engine.active_rule(), "life");
    assert_eq!(engine.generation(), 1);
    assert_eq!(engine.grid().population(), 5);
    assert!(rx.drain().is_empty());
    assert_eq!(
        engine.summary().to_string(),
        "Ran for 1 generations, ended with 5 cells alive."
    );
}

#[test]
fn rule_listing_is_sorted_and_complete() {
    let engine = engine(4, 4);
    let names = engine.rule_names();
    assert_eq!(names.len(), 30);
    assert!(names.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(names.iter().any(|name| name == "lamer"));
}
