//! Canvas rendering for layer nodes, connection lines and the tentative connection.
//!
//! Everything is stored in canvas-local coordinates and shifted by the mounted canvas
//! origin when painted.

use super::state::CanvasApp;
use crate::constants::*;
use crate::interaction::Selection;
use crate::types::*;
use eframe::egui;
use eframe::epaint::StrokeKind;

const SELECTED_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 220, 60);
const PENDING_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 165, 0);

impl CanvasApp {
    /// Renders the background, connections, tentative line and nodes, in that order.
    ///
    /// # Arguments
    ///
    /// * `painter` - The egui painter for drawing operations
    /// * `canvas_rect` - The screen-space rectangle of the canvas area
    pub fn render_canvas(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let background = if self.dark_mode {
            egui::Color32::from_rgb(58, 40, 82)
        } else {
            egui::Color32::from_rgb(180, 119, 236)
        };
        painter.rect_filled(canvas_rect, 0.0, background);

        let selection = self.interaction.selection();
        for conn in self.architecture.connections() {
            let is_selected = selection == Selection::Connection(conn);
            self.draw_connection(painter, conn, is_selected);
        }

        if let Some((from, to)) = self.interaction.preview(&self.architecture) {
            self.draw_tentative_connection(painter, from, to);
        }

        for node in self.architecture.models.values() {
            self.draw_node(painter, node, selection == Selection::Node(node.id));
        }
    }

    /// Draws a committed connection from anchor to anchor with a direction arrow.
    pub fn draw_connection(&self, painter: &egui::Painter, conn: Connection, is_selected: bool) {
        let (Some(from), Some(to)) = (
            self.architecture.models.get(&conn.from),
            self.architecture.models.get(&conn.to),
        ) else {
            return;
        };
        let pointer = self.interaction.pointer();
        let start = pointer.to_raw(from.anchor());
        let end = pointer.to_raw(to.anchor());

        let (color, width) = if is_selected {
            (SELECTED_COLOR, SELECTED_LINE_WIDTH)
        } else {
            (egui::Color32::from_gray(230), LINE_WIDTH)
        };
        painter.line_segment([start, end], egui::Stroke::new(width, color));
        draw_arrow_at_center(painter, start, end, color);
    }

    /// Draws the dashed line from the pending connection's origin to the pointer.
    pub fn draw_tentative_connection(
        &self,
        painter: &egui::Painter,
        from: egui::Pos2,
        to: egui::Pos2,
    ) {
        let pointer = self.interaction.pointer();
        let start = pointer.to_raw(from);
        let end = pointer.to_raw(to);
        let stroke = egui::Stroke::new(LINE_WIDTH, PENDING_COLOR);
        painter.extend(egui::Shape::dashed_line(&[start, end], stroke, 8.0, 5.0));
        painter.circle_filled(end, 4.0, PENDING_COLOR);
    }

    /// Renders a single layer node.
    ///
    /// Selected nodes get a yellow border, the origin of a pending connection an orange one.
    pub fn draw_node(&self, painter: &egui::Painter, node: &Node, is_selected: bool) {
        let info = node.kind.info();
        let origin = self.interaction.pointer().origin();
        let rect = node.rect().translate(origin.to_vec2());

        painter.rect_filled(rect, NODE_CORNER_RADIUS, info.color);

        let (stroke_color, stroke_width) = if self.interaction.pending_origin() == Some(node.id) {
            (PENDING_COLOR, 3.0)
        } else if is_selected {
            (SELECTED_COLOR, 3.0)
        } else {
            (egui::Color32::BLACK, 1.5)
        };
        painter.rect_stroke(
            rect,
            NODE_CORNER_RADIUS,
            egui::Stroke::new(stroke_width, stroke_color),
            StrokeKind::Outside,
        );

        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            info.label,
            egui::FontId::proportional(14.0),
            egui::Color32::BLACK,
        );
    }
}

/// Draws a filled triangle at the middle of `start..end`, pointing towards `end`.
fn draw_arrow_at_center(
    painter: &egui::Painter,
    start: egui::Pos2,
    end: egui::Pos2,
    color: egui::Color32,
) {
    let direction = (end - start).normalized();
    if !direction.is_finite() {
        return;
    }
    let center = start + (end - start) * 0.5;
    let perpendicular = egui::vec2(-direction.y, direction.x);
    let half_width = ARROW_LENGTH * 0.6;

    let tip = center + direction * ARROW_LENGTH;
    let left = center - direction * ARROW_LENGTH + perpendicular * half_width;
    let right = center - direction * ARROW_LENGTH - perpendicular * half_width;

    painter.add(egui::Shape::convex_polygon(
        vec![tip, left, right],
        color,
        egui::Stroke::NONE,
    ));
}
