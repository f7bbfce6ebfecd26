//! Canvas input handling.
//!
//! Translates egui pointer state into [`CanvasEvent`]s for the interaction coordinator and
//! provides hit testing for nodes and connection lines in canvas-local coordinates.

use super::state::CanvasApp;
use crate::constants::LINE_HIT_TOLERANCE;
use crate::interaction::CanvasEvent;
use crate::store::ModelStore;
use crate::types::*;
use eframe::egui;

impl CanvasApp {
    /// Renders the canvas and forwards this frame's pointer input to the coordinator.
    ///
    /// The canvas origin is measured on the first frame the canvas is shown.
    ///
    /// # Arguments
    ///
    /// * `ui` - The egui UI context
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

        if self.keyboard.is_none() {
            self.keyboard = Some(self.interaction.mount(response.rect.min));
        }

        self.handle_pointer_input(ui, &response);
        self.render_canvas(&painter, response.rect);
    }

    /// Feeds one event through the coordinator against the architecture.
    pub fn dispatch(&mut self, event: CanvasEvent) {
        self.interaction.handle(event, &mut self.architecture);
    }

    /// Converts this frame's pointer state into canvas events.
    ///
    /// Order matters: moves first so drags see the latest position, then press, release,
    /// and finally clicks that did not land on a node.
    fn handle_pointer_input(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let (latest, pressed, released, press_origin) = ui.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.press_origin(),
            )
        });

        if let Some(pos) = latest {
            if self.last_pointer != Some(pos) {
                self.last_pointer = Some(pos);
                self.dispatch(CanvasEvent::PointerMove(pos));
            }
        }

        if pressed {
            if let Some(pos) = press_origin.filter(|p| response.rect.contains(*p)) {
                let local = self.interaction.pointer().to_local(pos);
                if let Some(node) = self.find_node_at_position(local) {
                    self.dispatch(CanvasEvent::PointerDown { node, pos });
                }
            }
        }

        if released {
            self.dispatch(CanvasEvent::PointerUp);
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = self.interaction.pointer().to_local(pos);
                // Node clicks arrive through the drag release
                if self.find_node_at_position(local).is_none() {
                    match self.find_connection_at_position(local) {
                        Some(conn) => self.dispatch(CanvasEvent::ConnectionClick(conn)),
                        None => self.dispatch(CanvasEvent::BackgroundClick),
                    }
                }
            }
        }
    }

    /// Finds the topmost node covering a canvas-local position.
    pub fn find_node_at_position(&self, local: egui::Pos2) -> Option<NodeId> {
        self.architecture
            .models()
            .values()
            .rev()
            .find(|node| node.rect().contains(local))
            .map(|node| node.id)
    }

    /// Finds the connection whose line passes within the hit tolerance of a position.
    pub fn find_connection_at_position(&self, local: egui::Pos2) -> Option<Connection> {
        let models = self.architecture.models();
        self.architecture.connections().into_iter().find(|conn| {
            match (models.get(&conn.from), models.get(&conn.to)) {
                (Some(from), Some(to)) => {
                    point_to_line_distance(local, from.anchor(), to.anchor()) < LINE_HIT_TOLERANCE
                }
                _ => false,
            }
        })
    }
}

/// Distance from `point` to the segment `line_start..line_end`.
pub fn point_to_line_distance(
    point: egui::Pos2,
    line_start: egui::Pos2,
    line_end: egui::Pos2,
) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;
    let line_len_sq = line_vec.length_sq();

    if line_len_sq < 0.0001 {
        return point_vec.length();
    }

    let t = (point_vec.dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    let projection = line_start + line_vec * t;

    (point - projection).length()
}
