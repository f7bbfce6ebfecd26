//! Shared application-wide constants.
//! Centralizes tweakable values used across UI rendering and interactions.

use crate::types::NodeId;
use eframe::egui;

// Reserved nodes
/// ID of the fixed input node, seeded in every architecture.
pub const INPUT_NODE_ID: NodeId = 0;
/// ID of the fixed output node, seeded in every architecture.
pub const OUTPUT_NODE_ID: NodeId = 1;
/// Nodes that can never be deleted from the canvas.
pub const RESERVED_NODE_IDS: [NodeId; 2] = [INPUT_NODE_ID, OUTPUT_NODE_ID];

// Canvas interactions
/// Manhattan displacement (canvas units) below which a drag is reclassified as a click.
pub const CLICK_THRESHOLD: f32 = 10.0;
/// Key that deletes the current selection.
pub const DELETE_KEY: egui::Key = egui::Key::Delete;
/// Distance (canvas units) within which a click counts as hitting a connection line.
pub const LINE_HIT_TOLERANCE: f32 = 6.0;

// Drawing
/// Corner radius for layer node rectangles.
pub const NODE_CORNER_RADIUS: f32 = 6.0;
/// Stroke width of committed connection lines.
pub const LINE_WIDTH: f32 = 2.0;
/// Stroke width of the selected connection line.
pub const SELECTED_LINE_WIDTH: f32 = 3.5;
/// Length of the arrow head drawn at the end of a connection.
pub const ARROW_LENGTH: f32 = 10.0;

// Server
/// Environment variable overriding the persistence API base URL.
pub const API_URL_ENV: &str = "LAYER_CANVAS_API_URL";
/// Persistence API base URL used when no override is present.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/";
