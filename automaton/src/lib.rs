//! Binary cellular automaton core.
//!
//! A [`SimulationEngine`] owns a [`Grid`] and advances it one generation per
//! frame under a birth/survival [`RuleSpec`] chosen by name from a
//! [`RuleCatalog`]. Controllers talk to the engine only through
//! [`Command`]s, delivered over a [`CommandSource`] and drained once per
//! frame.
//!
//! ```
//! use std::collections::VecDeque;
//! use std::sync::Arc;
//!
//! use automaton::{Command, RuleCatalog, SimulationEngine, patterns};
//!
//! let catalog = Arc::new(RuleCatalog::builtin()?);
//! let mut engine = SimulationEngine::new(catalog, 64, 64)?;
//! engine.seed_pattern(patterns::find("glider").unwrap(), 10, 10);
//!
//! let mut commands = VecDeque::from([Command::SetRule("life".into())]);
//! engine.frame(&mut commands, None);
//!
//! assert_eq!(engine.generation(), 1);
//! assert_eq!(engine.grid().population(), 5);
//! # Ok::<(), automaton::AutomatonError>(())
//! ```

pub mod catalog;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod patterns;
pub mod rows;
pub mod rule;

pub use catalog::{DEFAULT_RULE, RuleCatalog};
pub use command::{Command, CommandReceiver, CommandSender, CommandSource, command_channel};
pub use config::AutomatonConfig;
pub use engine::{EngineState, FrameReport, GridSnapshot, RunSummary, SimulationEngine};
pub use error::{AutomatonError, Result};
pub use grid::{Grid, NeighborCounts, PaintOp, Region};
pub use rows::StepMode;
pub use rule::{NeighborSet, RuleSpec};
