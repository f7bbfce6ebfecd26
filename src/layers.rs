//! Layer kinds and their per-type display metadata.
//!
//! The interaction core only needs [`LayerInfo::anchor_offset`] from this table; the rest
//! (labels, sizes, colors, default parameters) serves the canvas and properties panel.

use eframe::egui;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The kinds of computation layers a node can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Fixed network input
    Input,
    /// Fixed network output
    Output,
    /// Fully connected layer
    Dense,
    /// 2D convolution
    Conv2d,
    /// 2D max pooling
    MaxPool,
    /// Dropout regularization
    Dropout,
    /// Standalone activation function
    Activation,
}

/// Static metadata for one [`LayerKind`].
#[derive(Debug)]
pub struct LayerInfo {
    /// Human-readable name shown on the node
    pub label: &'static str,
    /// Size of the node rectangle in canvas units
    pub size: egui::Vec2,
    /// Offset from the node's top-left corner to its connection anchor
    pub anchor_offset: egui::Vec2,
    /// Fill color of the node
    pub color: egui::Color32,
    /// Parameters a freshly placed node starts with
    pub default_params: &'static [(&'static str, &'static str)],
}

const INPUT: LayerInfo = LayerInfo {
    label: "Input",
    size: egui::Vec2::new(90.0, 40.0),
    anchor_offset: egui::Vec2::new(45.0, 20.0),
    color: egui::Color32::from_rgb(120, 200, 140),
    default_params: &[("shape", "28,28,1")],
};

const OUTPUT: LayerInfo = LayerInfo {
    label: "Output",
    size: egui::Vec2::new(90.0, 40.0),
    anchor_offset: egui::Vec2::new(45.0, 20.0),
    color: egui::Color32::from_rgb(230, 130, 120),
    default_params: &[("units", "10"), ("activation", "softmax")],
};

const DENSE: LayerInfo = LayerInfo {
    label: "Dense",
    size: egui::Vec2::new(100.0, 50.0),
    anchor_offset: egui::Vec2::new(50.0, 25.0),
    color: egui::Color32::from_rgb(130, 170, 240),
    default_params: &[("units", "64"), ("activation", "relu")],
};

const CONV2D: LayerInfo = LayerInfo {
    label: "Conv2D",
    size: egui::Vec2::new(110.0, 60.0),
    anchor_offset: egui::Vec2::new(55.0, 30.0),
    color: egui::Color32::from_rgb(240, 200, 110),
    default_params: &[("filters", "32"), ("kernel_size", "3"), ("activation", "relu")],
};

const MAX_POOL: LayerInfo = LayerInfo {
    label: "MaxPool",
    size: egui::Vec2::new(90.0, 40.0),
    anchor_offset: egui::Vec2::new(45.0, 20.0),
    color: egui::Color32::from_rgb(200, 160, 230),
    default_params: &[("pool_size", "2")],
};

const DROPOUT: LayerInfo = LayerInfo {
    label: "Dropout",
    size: egui::Vec2::new(90.0, 40.0),
    anchor_offset: egui::Vec2::new(45.0, 20.0),
    color: egui::Color32::from_rgb(180, 180, 180),
    default_params: &[("rate", "0.5")],
};

const ACTIVATION: LayerInfo = LayerInfo {
    label: "Activation",
    size: egui::Vec2::new(100.0, 40.0),
    anchor_offset: egui::Vec2::new(50.0, 20.0),
    color: egui::Color32::from_rgb(150, 220, 220),
    default_params: &[("function", "relu")],
};

impl LayerKind {
    /// Kinds that users can add from the toolbar. Input and output are fixed.
    pub const PLACEABLE: [LayerKind; 5] = [
        LayerKind::Dense,
        LayerKind::Conv2d,
        LayerKind::MaxPool,
        LayerKind::Dropout,
        LayerKind::Activation,
    ];

    /// Metadata for this kind.
    pub fn info(self) -> &'static LayerInfo {
        match self {
            LayerKind::Input => &INPUT,
            LayerKind::Output => &OUTPUT,
            LayerKind::Dense => &DENSE,
            LayerKind::Conv2d => &CONV2D,
            LayerKind::MaxPool => &MAX_POOL,
            LayerKind::Dropout => &DROPOUT,
            LayerKind::Activation => &ACTIVATION,
        }
    }

    /// Owned copy of this kind's default parameter table.
    pub fn default_params(self) -> BTreeMap<String, String> {
        self.info()
            .default_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}
