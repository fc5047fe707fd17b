// control_panel.rs - Rule picker and run controls; talks to the engine only via commands

use automaton::{Command, CommandSender};
use eframe::egui;

pub struct ControlPanel {
    commands: CommandSender,
    rules: Vec<String>,
    selected_rule: String,
    paused: bool,
}

impl ControlPanel {
    pub fn new(commands: CommandSender, rules: Vec<String>, selected_rule: String) -> Self {
        Self {
            commands,
            rules,
            selected_rule,
            paused: false,
        }
    }

    fn send(&self, command: Command) {
        if let Err(err) = self.commands.send(command) {
            tracing::warn!(%err, "control panel command dropped");
        }
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        egui::Window::new("Automatron Control Panel")
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| self.ui(ui));
    }

    fn ui(&mut self, ui: &mut egui::Ui) {
        let mut chosen = None;
        ui.horizontal(|ui| {
            ui.label("Rule");
            egui::ComboBox::from_id_source("rule_selector")
                .selected_text(self.selected_rule.as_str())
                .show_ui(ui, |ui| {
                    for rule in &self.rules {
                        if ui.selectable_label(*rule == self.selected_rule, rule).clicked() {
                            chosen = Some(rule.clone());
                        }
                    }
                });
        });

        if let Some(rule) = chosen {
            self.selected_rule = rule.clone();
            self.send(Command::SetRule(rule));
        }

        ui.horizontal(|ui| {
            let pause_text = if self.paused { "Unpause" } else { "Pause" };
            if ui.button(pause_text).clicked() {
                self.paused = !self.paused;
                self.send(Command::Pause);
            }

            if ui.button("Step").clicked() {
                self.paused = true;
                self.send(Command::Step);
            }

            if ui.button("Reset").clicked() {
                self.send(Command::Reset);
            }

            if ui.button("Quit").clicked() {
                self.send(Command::Quit);
            }
        });
    }
}
