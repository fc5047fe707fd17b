// rows.rs - Stepping a generation with cooperative row tasks

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::rule::RuleSpec;

/// How the engine computes the next generation.
///
/// Both modes produce identical grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepMode {
    /// One whole-grid pass on the calling thread.
    #[default]
    Sequential,
    /// Bands of `band` rows, each computed by a spawned tokio task.
    RowTasks { band: usize },
}

/// Computes rows `start..end` of the next generation, yielding after
/// every row so other bands get scheduled.
async fn process_band(
    grid: Arc<Grid>,
    rule: RuleSpec,
    start: usize,
    end: usize,
) -> (usize, Vec<Vec<bool>>) {
    let mut rows = Vec::with_capacity(end - start);
    for y in start..end {
        rows.push(grid.next_row(&rule, y));
        tokio::task::yield_now().await;
    }
    (start, rows)
}

/// Next generation of `grid`, one spawned task per band of rows.
///
/// Every task reads from the same snapshot of the previous generation;
/// results are placed by their starting row, so completion order does not
/// matter.
pub async fn step_in_row_tasks(grid: &Grid, rule: RuleSpec, band: usize) -> Grid {
    let (width, height) = (grid.width(), grid.height());
    let band = band.max(1);
    let snapshot = Arc::new(grid.clone());

    let mut handles = Vec::with_capacity(height.div_ceil(band));
    for start in (0..height).step_by(band) {
        let end = (start + band).min(height);
        handles.push(tokio::spawn(process_band(Arc::clone(&snapshot), rule, start, end)));
    }

    let mut rows = vec![Vec::new(); height];
    for handle in handles {
        let (start, band_rows) = match handle.await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(err) => panic!("row task did not complete: {err}"),
        };
        for (offset, row) in band_rows.into_iter().enumerate() {
            rows[start + offset] = row;
        }
    }

    Grid::from_rows(width, height, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn row_tasks_match_sequential_step() {
        let rule = RuleSpec::parse("B36/S23").unwrap();
        let mut grid = Grid::new(37, 29);
        grid.randomize(2024, 0.3);

        for band in [1, 4, 29, 100] {
            let concurrent = step_in_row_tasks(&grid, rule, band).await;
            assert_eq!(concurrent, grid.step(&rule), "band {band}");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn zero_band_is_treated_as_one() {
        let rule = RuleSpec::parse("B3/S23").unwrap();
        let mut grid = Grid::new(8, 8);
        grid.randomize(5, 0.5);
        assert_eq!(step_in_row_tasks(&grid, rule, 0).await, grid.step(&rule));
    }

    #[test]
    fn step_mode_reads_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            step_mode: StepMode,
        }
        let w: Wrapper = toml::from_str("step_mode = { kind = \"row_tasks\", band = 16 }").unwrap();
        assert_eq!(w.step_mode, StepMode::RowTasks { band: 16 });
        let w: Wrapper = toml::from_str("step_mode = { kind = \"sequential\" }").unwrap();
        assert_eq!(w.step_mode, StepMode::Sequential);
    }
}
