//! Raw pointer positions to canvas-local coordinates.

use eframe::egui;

/// Tracks the pointer in canvas-local coordinates.
///
/// The origin is the canvas's top-left corner, measured once when the canvas mounts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerTracker {
    origin: egui::Pos2,
    position: egui::Pos2,
}

impl PointerTracker {
    /// Fixes the canvas origin against which raw positions are measured.
    pub fn mount(&mut self, origin: egui::Pos2) {
        self.origin = origin;
    }

    /// Canvas origin in raw (screen) coordinates.
    pub fn origin(&self) -> egui::Pos2 {
        self.origin
    }

    /// Converts a raw position to canvas-local coordinates.
    pub fn to_local(&self, raw: egui::Pos2) -> egui::Pos2 {
        (raw - self.origin).to_pos2()
    }

    /// Converts a canvas-local position back to raw coordinates.
    pub fn to_raw(&self, local: egui::Pos2) -> egui::Pos2 {
        self.origin + local.to_vec2()
    }

    /// Records a pointer move and returns the new canvas-local position.
    pub fn track(&mut self, raw: egui::Pos2) -> egui::Pos2 {
        self.position = self.to_local(raw);
        self.position
    }

    /// Last tracked canvas-local pointer position.
    pub fn position(&self) -> egui::Pos2 {
        self.position
    }
}
