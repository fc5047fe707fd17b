// cli.rs - Command-line arguments and how they layer over the config file

use std::path::PathBuf;
use std::str::FromStr;

use automaton::patterns::{self, Pattern};
use automaton::{AutomatonConfig, Command, SimulationEngine, StepMode};
use clap::Parser;

/// Interactive binary cellular automaton sandbox
#[derive(Parser, Debug)]
#[command(name = "automatron")]
#[command(about = "Paint cells, pick a birth/survival rule, watch it evolve")]
pub struct Args {
    /// TOML config file; command-line values override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    pub width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    pub height: Option<usize>,

    /// Rule selected at startup (see --list-rules)
    #[arg(long)]
    pub rule: Option<String>,

    /// Seed pattern, centred unless a position is given (repeatable)
    #[arg(long, value_name = "NAME[@X,Y]")]
    pub pattern: Vec<PatternPlacement>,

    /// Fill the grid randomly with this live-cell density before placing patterns
    #[arg(long, value_name = "DENSITY", value_parser = parse_density)]
    pub random: Option<f64>,

    /// Seed for --random
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Compute generations as concurrent tasks of BAND rows each
    #[arg(long, value_name = "BAND")]
    pub row_tasks: Option<usize>,

    /// Run without a window
    #[arg(long)]
    pub headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 100)]
    pub frames: u64,

    /// Deliver a control command before the given headless frame (repeatable)
    #[arg(long = "at", value_name = "FRAME:COMMAND")]
    pub schedule: Vec<ScheduledCommand>,

    /// Print the rule catalog and exit
    #[arg(long)]
    pub list_rules: bool,
}

impl Args {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> automaton::Result<AutomatonConfig> {
        let mut config = match &self.config {
            Some(path) => AutomatonConfig::load(path)?,
            None => AutomatonConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(rule) = &self.rule {
            config.default_rule = rule.clone();
        }
        if let Some(band) = self.row_tasks {
            config.step_mode = StepMode::RowTasks { band };
        }

        config.validate()?;
        Ok(config)
    }

    /// Applies --random and --pattern to a fresh engine.
    pub fn seed(&self, engine: &mut SimulationEngine) {
        if let Some(density) = self.random {
            engine.seed_random(self.seed, density);
        }

        let (width, height) = (engine.grid().width(), engine.grid().height());
        for placement in &self.pattern {
            let (x, y) = placement.origin(width, height);
            engine.seed_pattern(placement.pattern, x, y);
        }
    }
}

/// Live-cell probability for `--random`: a finite number in `0..=1`.
fn parse_density(s: &str) -> Result<f64, String> {
    let density: f64 = s.trim().parse().map_err(|e| format!("bad density {s:?}: {e}"))?;
    if density.is_finite() && (0.0..=1.0).contains(&density) {
        Ok(density)
    } else {
        Err(format!("density must be between 0 and 1, got {s:?}"))
    }
}

/// A pattern and where its top-left corner goes.
#[derive(Debug, Clone)]
pub struct PatternPlacement {
    pub pattern: &'static Pattern,
    pub at: Option<(usize, usize)>,
}

impl PatternPlacement {
    pub fn origin(&self, width: usize, height: usize) -> (usize, usize) {
        self.at.unwrap_or_else(|| {
            let (pw, ph) = self.pattern.extent();
            (width.saturating_sub(pw) / 2, height.saturating_sub(ph) / 2)
        })
    }
}

impl FromStr for PatternPlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, at) = match s.split_once('@') {
            Some((name, pos)) => {
                let (x, y) = pos
                    .split_once(',')
                    .ok_or_else(|| format!("expected X,Y after '@', got {pos:?}"))?;
                let x = x.trim().parse().map_err(|e| format!("bad x {x:?}: {e}"))?;
                let y = y.trim().parse().map_err(|e| format!("bad y {y:?}: {e}"))?;
                (name, Some((x, y)))
            }
            None => (s, None),
        };

        let pattern = patterns::find(name.trim()).ok_or_else(|| {
            let known: Vec<_> = patterns::names().collect();
            format!("unknown pattern {name:?} (known: {})", known.join(", "))
        })?;

        Ok(Self { pattern, at })
    }
}

/// A control command to deliver just before a given frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledCommand {
    pub frame: u64,
    pub command: Command,
}

impl FromStr for ScheduledCommand {
    type Err = String;

    /// `FRAME:COMMAND`, e.g. `0:rule life` or `25:pause`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (frame, command) = s
            .split_once(':')
            .ok_or_else(|| format!("expected FRAME:COMMAND, got {s:?}"))?;
        let frame = frame
            .trim()
            .parse()
            .map_err(|e| format!("bad frame {frame:?}: {e}"))?;
        let command = command.parse().map_err(|e| format!("{e}"))?;
        Ok(Self { frame, command })
    }
}
