//! Core data types for the layer canvas.
//!
//! A network architecture is a set of [`Node`]s, each one a computation layer placed on
//! the canvas. Every node has at most one outgoing connection (`connected_to`), so
//! connections are derived from the nodes rather than stored on their own.

use crate::layers::LayerKind;
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unique, stable identifier for nodes, assigned by the model store.
pub type NodeId = u32;

/// A single layer placed on the canvas.
///
/// Field names on the wire follow the persisted architecture format (`ID`, `type`,
/// `connectedTo`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    #[serde(rename = "ID")]
    pub id: NodeId,
    /// Which kind of layer this node represents
    #[serde(rename = "type")]
    pub kind: LayerKind,
    /// Canvas-local x coordinate of the node's top-left corner
    pub x: f32,
    /// Canvas-local y coordinate of the node's top-left corner
    pub y: f32,
    /// Target of this node's outgoing connection, if any
    #[serde(rename = "connectedTo")]
    pub connected_to: Option<NodeId>,
    /// Layer hyper-parameters, edited as text in the properties panel
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl Node {
    /// Creates an unconnected node with the default parameters of its layer kind.
    pub fn new(id: NodeId, kind: LayerKind, x: f32, y: f32) -> Self {
        Self {
            id,
            kind,
            x,
            y,
            connected_to: None,
            params: kind.default_params(),
        }
    }

    /// Top-left corner of the node in canvas-local coordinates.
    pub fn position(&self) -> egui::Pos2 {
        egui::pos2(self.x, self.y)
    }

    /// Point where connection lines attach to this node.
    pub fn anchor(&self) -> egui::Pos2 {
        self.position() + self.kind.info().anchor_offset
    }

    /// Canvas-local rectangle covered by this node.
    pub fn rect(&self) -> egui::Rect {
        egui::Rect::from_min_size(self.position(), self.kind.info().size)
    }
}

/// A partial update to a [`Node`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    /// New x coordinate
    pub x: Option<f32>,
    /// New y coordinate
    pub y: Option<f32>,
    /// New outgoing connection; `Some(None)` clears it
    pub connected_to: Option<Option<NodeId>>,
    /// Replacement parameter table
    pub params: Option<BTreeMap<String, String>>,
}

impl NodePatch {
    /// Patch that moves a node to `pos`.
    pub fn position(pos: egui::Pos2) -> Self {
        Self {
            x: Some(pos.x),
            y: Some(pos.y),
            ..Default::default()
        }
    }

    /// Patch that sets (or with `None`, clears) the outgoing connection.
    pub fn connected_to(target: Option<NodeId>) -> Self {
        Self {
            connected_to: Some(target),
            ..Default::default()
        }
    }

    /// Patch that replaces the parameter table.
    pub fn params(params: BTreeMap<String, String>) -> Self {
        Self {
            params: Some(params),
            ..Default::default()
        }
    }

    /// Writes every present field into `node`.
    pub fn apply(self, node: &mut Node) {
        if let Some(x) = self.x {
            node.x = x;
        }
        if let Some(y) = self.y {
            node.y = y;
        }
        if let Some(target) = self.connected_to {
            node.connected_to = target;
        }
        if let Some(params) = self.params {
            node.params = params;
        }
    }
}

/// A directed edge implied by a node's `connected_to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    /// Source node
    pub from: NodeId,
    /// Destination node
    pub to: NodeId,
}

impl Connection {
    /// Creates the edge `from -> to`.
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }
}
