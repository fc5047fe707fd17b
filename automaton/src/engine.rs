// engine.rs - Generation-stepping state machine driven by control commands

use std::fmt;
use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::catalog::{DEFAULT_RULE, RuleCatalog};
use crate::command::{Command, CommandSource};
use crate::config::AutomatonConfig;
use crate::error::{AutomatonError, Result, UnknownRuleName};
use crate::grid::{Grid, PaintOp};
use crate::patterns::Pattern;
use crate::rows::{StepMode, step_in_row_tasks};
use crate::rule::RuleSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Running,
    Paused,
    /// A `quit` command has been applied; the run loop should exit.
    Stopped,
}

/// What happened during one call to [`SimulationEngine::frame`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Commands drained from the source, including rejected ones.
    pub commands: usize,
    /// Commands that were ignored (unknown rule names).
    pub rejected: usize,
    /// Whether a generation was computed.
    pub advanced: bool,
    /// A paint op covered at least one on-grid cell.
    pub painted: bool,
    /// The engine has stopped; this was the last frame.
    pub quit: bool,
}

/// Read-only view handed to renderers between frames.
#[derive(Debug, Clone, Copy)]
pub struct GridSnapshot<'a> {
    pub grid: &'a Grid,
    pub generation: u64,
}

/// Totals reported once the run loop exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub generations: u64,
    pub live_cells: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ran for {} generations, ended with {} cells alive.",
            self.generations, self.live_cells
        )
    }
}

enum Stepper {
    Sequential,
    RowTasks { band: usize, runtime: Runtime },
}

impl Stepper {
    fn new(mode: StepMode) -> Result<Self> {
        match mode {
            StepMode::Sequential => Ok(Stepper::Sequential),
            StepMode::RowTasks { band } => {
                let runtime = tokio::runtime::Builder::new_multi_thread()
                    .thread_name("automaton-rows")
                    .build()
                    .map_err(AutomatonError::Runtime)?;
                Ok(Stepper::RowTasks {
                    band: band.max(1),
                    runtime,
                })
            }
        }
    }

    fn mode(&self) -> StepMode {
        match self {
            Stepper::Sequential => StepMode::Sequential,
            Stepper::RowTasks { band, .. } => StepMode::RowTasks { band: *band },
        }
    }

    fn step(&self, grid: &Grid, rule: RuleSpec) -> Grid {
        match self {
            Stepper::Sequential => grid.step(&rule),
            Stepper::RowTasks { band, runtime } => {
                runtime.block_on(step_in_row_tasks(grid, rule, *band))
            }
        }
    }
}

/// Owns the grid and advances it one generation per frame.
///
/// The engine starts `Running` with the `lamer` rule. Each frame drains the
/// command source, decides whether to step, then applies the frame's paint.
pub struct SimulationEngine {
    catalog: Arc<RuleCatalog>,
    grid: Grid,
    active_rule: String,
    rule: RuleSpec,
    paused: bool,
    pending_single_step: bool,
    generation: u64,
    running: bool,
    stepper: Stepper,
}

impl SimulationEngine {
    /// Creates an engine with an all-dead `width × height` grid.
    pub fn new(catalog: Arc<RuleCatalog>, width: usize, height: usize) -> Result<Self> {
        let rule = *catalog.get(DEFAULT_RULE)?;
        Ok(Self {
            catalog,
            grid: Grid::new(width, height),
            active_rule: DEFAULT_RULE.to_string(),
            rule,
            paused: false,
            pending_single_step: false,
            generation: 0,
            running: true,
            stepper: Stepper::Sequential,
        })
    }

    /// Creates an engine sized, ruled and stepped as the config says.
    ///
    /// Custom rules from the config must already be in `catalog`.
    pub fn from_config(config: &AutomatonConfig, catalog: Arc<RuleCatalog>) -> Result<Self> {
        let mut engine = Self::new(catalog, config.width, config.height)?;
        engine.select_rule(&config.default_rule)?;
        engine.set_step_mode(config.step_mode)?;
        Ok(engine)
    }

    pub fn set_step_mode(&mut self, mode: StepMode) -> Result<()> {
        if mode != self.stepper.mode() {
            self.stepper = Stepper::new(mode)?;
            tracing::debug!(?mode, "step mode changed");
        }
        Ok(())
    }

    pub fn step_mode(&self) -> StepMode {
        self.stepper.mode()
    }

    fn select_rule(&mut self, name: &str) -> std::result::Result<(), UnknownRuleName> {
        let rule = *self.catalog.get(name)?;
        self.active_rule = name.to_string();
        self.rule = rule;
        Ok(())
    }

    /// Applies a single command.
    ///
    /// An unknown rule name is returned as an error and leaves the engine
    /// untouched.
    pub fn apply(&mut self, command: Command) -> std::result::Result<(), UnknownRuleName> {
        tracing::debug!(%command, "applying command");
        match command {
            Command::SetRule(name) => {
                self.select_rule(&name)?;
                tracing::info!(rule = %self.active_rule, spec = %self.rule, "rule selected");
            }
            Command::Pause => self.paused = !self.paused,
            Command::Step => {
                self.paused = true;
                self.pending_single_step = true;
            }
            Command::Reset => {
                self.grid = self.grid.cleared();
                tracing::info!(generation = self.generation, "grid reset");
            }
            Command::Quit => {
                self.running = false;
                tracing::info!(generation = self.generation, "quit requested");
            }
        }
        Ok(())
    }

    /// Runs one frame: drain and apply every pending command in arrival
    /// order, advance if running or a single step is pending, then paint.
    pub fn frame<S>(&mut self, source: &mut S, paint: Option<PaintOp>) -> FrameReport
    where
        S: CommandSource + ?Sized,
    {
        let mut report = FrameReport::default();

        for command in source.drain() {
            report.commands += 1;
            if let Err(err) = self.apply(command) {
                report.rejected += 1;
                tracing::warn!(%err, keeping = %self.active_rule, "ignoring rule change");
            }
        }

        report.advanced = self.advance_if_due();

        if let Some(op) = paint {
            report.painted = self.paint(op);
        }

        report.quit = !self.running;
        report
    }

    /// Steps once unless paused without a pending single step.
    pub fn advance_if_due(&mut self) -> bool {
        if self.paused && !self.pending_single_step {
            return false;
        }
        self.pending_single_step = false;
        self.step();
        true
    }

    /// Unconditionally computes the next generation.
    pub fn step(&mut self) {
        self.grid = self.stepper.step(&self.grid, self.rule);
        self.generation += 1;
        tracing::trace!(generation = self.generation, "generation advanced");
    }

    /// Sets a region to alive or dead; allowed in any state. Returns whether
    /// any cell was covered.
    pub fn paint(&mut self, op: PaintOp) -> bool {
        self.grid.paint(op)
    }

    /// Places a named seed pattern with its origin at `(x, y)`.
    pub fn seed_pattern(&mut self, pattern: &Pattern, x: usize, y: usize) {
        self.grid.stamp(pattern, x, y);
        tracing::debug!(pattern = pattern.name, x, y, "pattern placed");
    }

    pub fn seed_random(&mut self, seed: u64, density: f64) {
        self.grid.randomize(seed, density);
        tracing::debug!(seed, density, live = self.grid.population(), "grid randomized");
    }

    pub fn state(&self) -> EngineState {
        if !self.running {
            EngineState::Stopped
        } else if self.paused {
            EngineState::Paused
        } else {
            EngineState::Running
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pending_single_step(&self) -> bool {
        self.pending_single_step
    }

    pub fn active_rule(&self) -> &str {
        &self.active_rule
    }

    pub fn rule(&self) -> RuleSpec {
        self.rule
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snapshot(&self) -> GridSnapshot<'_> {
        GridSnapshot {
            grid: &self.grid,
            generation: self.generation,
        }
    }

    /// Sorted rule names, for a rule picker.
    pub fn rule_names(&self) -> Vec<String> {
        self.catalog.names()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            generations: self.generation,
            live_cells: self.grid.population(),
        }
    }
}

impl fmt::Debug for SimulationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationEngine")
            .field("width", &self.grid.width())
            .field("height", &self.grid.height())
            .field("active_rule", &self.active_rule)
            .field("state", &self.state())
            .field("generation", &self.generation)
            .field("step_mode", &self.stepper.mode())
            .finish()
    }
}
