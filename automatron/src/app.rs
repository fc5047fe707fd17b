// app.rs - Window that shows the grid, turns the pointer into paint, and runs one engine frame per tick

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use automaton::{
    AutomatonConfig, CommandReceiver, PaintOp, Region, RunSummary, SimulationEngine,
    command_channel,
};
use eframe::egui;
use egui::{Color32, ColorImage, Rect, Sense, TextureHandle, TextureOptions, Vec2, pos2};

use crate::control_panel::ControlPanel;

/// Largest on-screen size of the grid's longer edge, in points.
const MAX_VIEW_EXTENT: f32 = 768.0;

/// Shared slot the app fills in when it exits.
pub type SummarySlot = Arc<Mutex<Option<RunSummary>>>;

pub struct AutomatronApp {
    engine: SimulationEngine,
    commands: CommandReceiver,
    panel: ControlPanel,
    summary: SummarySlot,

    brush_radius: u32,
    cell_size: f32,
    live_color: Color32,
    dead_color: Color32,
    texture: Option<TextureHandle>,

    frame_interval: Duration,
    last_frame: Instant,
}

impl AutomatronApp {
    pub fn new(engine: SimulationEngine, config: &AutomatonConfig, summary: SummarySlot) -> Self {
        let (sender, commands) = command_channel();
        let panel = ControlPanel::new(sender, engine.rule_names(), engine.active_rule().to_string());
        let extent = engine.grid().width().max(engine.grid().height()) as f32;

        Self {
            engine,
            commands,
            panel,
            summary,
            brush_radius: config.brush_radius,
            cell_size: (MAX_VIEW_EXTENT / extent).floor().clamp(1.0, 16.0),
            live_color: Color32::BLACK,
            dead_color: Color32::WHITE,
            texture: None,
            frame_interval: Duration::from_secs_f64(1.0 / f64::from(config.frames_per_second.max(1))),
            last_frame: Instant::now(),
        }
    }

    /// Window size that fits the grid plus the status line.
    pub fn window_size(config: &AutomatonConfig) -> [f32; 2] {
        let extent = config.width.max(config.height).max(1) as f32;
        let cell = (MAX_VIEW_EXTENT / extent).floor().clamp(1.0, 16.0);
        [
            config.width as f32 * cell + 32.0,
            config.height as f32 * cell + 72.0,
        ]
    }

    /// Paint request from the pointer over the grid, if a button is held.
    fn pointer_paint(&self, ctx: &egui::Context, response: &egui::Response) -> Option<PaintOp> {
        let pos = response.interact_pointer_pos().or_else(|| response.hover_pos())?;
        let (primary, secondary) =
            ctx.input(|i| (i.pointer.primary_down(), i.pointer.secondary_down()));
        if !primary && !secondary {
            return None;
        }

        let cell = (pos - response.rect.min) / self.cell_size;
        let region = Region::brush(
            cell.x.floor() as i64,
            cell.y.floor() as i64,
            self.brush_radius,
            self.engine.grid().width(),
            self.engine.grid().height(),
        );
        // erasing wins when both buttons are held
        Some(PaintOp { region, alive: !secondary })
    }

    fn adjust_brush(&mut self, ctx: &egui::Context) {
        let scroll = ctx.input(|i| i.scroll_delta.y);
        if scroll > 0.0 {
            self.brush_radius += 1;
        } else if scroll < 0.0 {
            self.brush_radius = self.brush_radius.saturating_sub(1);
        }
    }

    fn upload_grid(&mut self, ctx: &egui::Context) -> egui::TextureId {
        let grid = self.engine.grid();
        let image = ColorImage {
            size: [grid.width(), grid.height()],
            pixels: grid
                .cells()
                .iter()
                .map(|&alive| if alive { self.live_color } else { self.dead_color })
                .collect(),
        };

        match &mut self.texture {
            Some(texture) => {
                texture.set(image, TextureOptions::NEAREST);
                texture.id()
            }
            None => {
                let texture = ctx.load_texture("grid", image, TextureOptions::NEAREST);
                let id = texture.id();
                self.texture = Some(texture);
                id
            }
        }
    }
}

impl eframe::App for AutomatronApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.panel.show(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let snapshot = self.engine.snapshot();
            ui.horizontal(|ui| {
                ui.label(format!("Generation: {}", snapshot.generation));
                ui.separator();
                ui.label(format!("Rule: {} ({})", self.engine.active_rule(), self.engine.rule()));
                ui.separator();
                ui.label(format!("Brush: {}", self.brush_radius));
                ui.separator();
                ui.label(format!("Live cells: {}", snapshot.grid.population()));
            });

            ui.separator();

            let grid = self.engine.grid();
            let size = Vec2::new(grid.width() as f32, grid.height() as f32) * self.cell_size;
            let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());

            if response.hovered() {
                self.adjust_brush(ctx);
            }

            if self.last_frame.elapsed() >= self.frame_interval {
                self.last_frame = Instant::now();
                let paint = self.pointer_paint(ctx, &response);
                let report = self.engine.frame(&mut self.commands, paint);
                if report.quit {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            }

            let texture = self.upload_grid(ctx);
            painter.image(
                texture,
                response.rect,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        });

        ctx.request_repaint_after(self.frame_interval.saturating_sub(self.last_frame.elapsed()));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        let summary = self.engine.summary();
        match self.summary.lock() {
            Ok(mut slot) => *slot = Some(summary),
            Err(poisoned) => *poisoned.into_inner() = Some(summary),
        }
    }
}
