//! User interface for the layer canvas.
//!
//! This module contains the eframe application: toolbar, properties panel and the
//! canvas that feeds user input into the interaction core.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main CanvasApp
//! - `canvas` - Pointer input translation and hit testing
//! - `rendering` - Drawing nodes, connections and the tentative line
//! - `file_ops` - Exporting and opening architecture files
//! - `server_ops` - Saving, sharing and training through the backend

mod canvas;
mod file_ops;
mod rendering;
mod server_ops;
mod state;


pub use state::CanvasApp;

use crate::constants::{DELETE_KEY, RESERVED_NODE_IDS};
use crate::interaction::{CanvasEvent, Selection};
use crate::layers::LayerKind;
use crate::store::ModelStore;
use crate::types::*;
use eframe::egui;

impl eframe::App for CanvasApp {
    /// Persist the architecture and display preferences between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => storage.set_string("app_state", json),
            Err(err) => log::error!("failed to serialize app state: {err}"),
        }
    }

    /// Main update function called by egui for each frame.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The egui context
    /// * `_frame` - The eframe frame
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_file_results();
        self.handle_server_results();

        // Handle delete key for removing the selected layer or connection
        self.handle_delete_key(ctx);

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        let viewport_width = ctx.input(|i| i.screen_rect().width());
        let max_width = (viewport_width * 0.9).max(180.0);
        egui::SidePanel::right("properties_panel")
            .resizable(true)
            .default_width(self.properties_panel_width.clamp(180.0, max_width))
            .show(ctx, |ui| {
                self.properties_panel_width = ui.available_width().clamp(180.0, max_width);
                self.draw_properties_panel(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.draw_canvas(ui);
            });
    }
}

impl CanvasApp {
    /// Forwards delete key presses to the coordinator.
    ///
    /// Presses are suppressed while any text field (e.g. a layer parameter) has focus.
    fn handle_delete_key(&mut self, ctx: &egui::Context) {
        let editable_focused = ctx.wants_keyboard_input();
        if ctx.input(|i| i.key_pressed(DELETE_KEY)) {
            self.dispatch(CanvasEvent::KeyDown {
                key: DELETE_KEY,
                editable_focused,
            });
        }
    }

    /// Adds a layer of `kind` near the top-left of the canvas and selects it.
    ///
    /// Returns `None` (and reports it in the status line) when no node ID is left.
    pub fn place_layer(&mut self, kind: LayerKind) -> Option<NodeId> {
        let step = (self.placed_count % 8) as f32 * 24.0;
        let id = match self
            .architecture
            .add_node(kind, egui::pos2(200.0 + step, 80.0 + step))
        {
            Ok(id) => id,
            Err(err) => {
                log::error!("cannot place {kind:?} layer: {err}");
                self.server.status = format!("Cannot add layer: {err}");
                return None;
            }
        };
        self.placed_count += 1;
        self.architecture.select(Some(id));
        self.interaction.sync_selection(&self.architecture);
        Some(id)
    }

    /// Renders the toolbar with layer palette, file and server actions.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI context
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            for kind in LayerKind::PLACEABLE {
                if ui.button(format!("+ {}", kind.info().label)).clicked() {
                    self.place_layer(kind);
                }
            }

            ui.separator();

            if ui.button("Export…").clicked() {
                self.export_architecture(ui.ctx());
            }
            if ui.button("Open…").clicked() {
                self.open_architecture(ui.ctx());
            }

            ui.separator();

            if ui.button("Save").clicked() {
                self.save_to_server(ui.ctx());
            }
            if ui.button("Share").clicked() {
                self.share_link(ui.ctx());
            }
            if ui.button("Train").clicked() {
                self.start_training(ui.ctx());
            }
            let has_session = self.server.session_id.is_some();
            if ui
                .add_enabled(has_session, egui::Button::new("Refresh"))
                .clicked()
            {
                self.refresh_training(ui.ctx());
            }
            if ui
                .add_enabled(has_session, egui::Button::new("Stop"))
                .clicked()
            {
                self.stop_training(ui.ctx());
            }

            ui.separator();

            let theme_label = if self.dark_mode { "☀ Light" } else { "🌙 Dark" };
            if ui.button(theme_label).clicked() {
                self.dark_mode = !self.dark_mode;
            }

            if !self.server.status.is_empty() {
                ui.separator();
                ui.label(&self.server.status);
            }
        });
    }

    /// Renders the properties panel for the current selection.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI context
    fn draw_properties_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Properties");
        ui.separator();

        match self.interaction.selection() {
            Selection::Node(id) => self.draw_node_properties(ui, id),
            Selection::Connection(conn) => self.draw_connection_properties(ui, conn),
            Selection::None => {
                ui.label("Click a layer to start a connection, then click another to finish it.");
                ui.label("Drag layers to move them.");
            }
        }

        if let Some(origin) = self.interaction.pending_origin() {
            ui.separator();
            ui.colored_label(
                egui::Color32::from_rgb(255, 165, 0),
                format!("Connecting from node {origin}: click the target layer"),
            );
        }

        if let Some(link) = &self.server.share_link {
            ui.separator();
            ui.label("Share link");
            ui.horizontal(|ui| {
                ui.monospace(link.as_str());
                if ui.small_button("Copy").clicked() {
                    ui.ctx().copy_text(link.clone());
                }
            });
        }

        if let Some(training) = &self.server.training {
            ui.separator();
            ui.label("Training");
            ui.monospace(serde_json::to_string_pretty(training).unwrap_or_default());
        }
    }

    /// Shows kind, position and editable parameters of one node.
    fn draw_node_properties(&mut self, ui: &mut egui::Ui, id: NodeId) {
        let Some(node) = self.architecture.node(id) else {
            ui.label("Selected layer no longer exists");
            return;
        };
        let label = node.kind.info().label;
        let (x, y) = (node.x, node.y);
        let mut params = node.params.clone();
        let target = node.connected_to;

        ui.label(format!("{label} (node {id})"));
        ui.label(format!("Position: ({x:.0}, {y:.0})"));
        match target {
            Some(to) => ui.label(format!("Feeds into node {to}")),
            None => ui.label("No outgoing connection"),
        };

        ui.separator();
        let mut changed = false;
        egui::Grid::new("layer_params").num_columns(2).show(ui, |ui| {
            for (key, value) in params.iter_mut() {
                ui.label(key.as_str());
                changed |= ui.text_edit_singleline(value).changed();
                ui.end_row();
            }
        });
        if changed {
            self.architecture.update(id, NodePatch::params(params));
        }

        if !RESERVED_NODE_IDS.contains(&id) {
            ui.separator();
            ui.colored_label(egui::Color32::GRAY, "Press Delete to remove");
        }
    }

    /// Shows the endpoints of the selected connection.
    fn draw_connection_properties(&self, ui: &mut egui::Ui, conn: Connection) {
        let name = |id: NodeId| {
            self.architecture
                .node(id)
                .map(|node| node.kind.info().label)
                .unwrap_or("?")
        };
        ui.label("Connection");
        ui.label(format!("From: {} (node {})", name(conn.from), conn.from));
        ui.label(format!("To: {} (node {})", name(conn.to), conn.to));
        ui.separator();
        ui.colored_label(egui::Color32::GRAY, "Press Delete to remove");
    }
}
