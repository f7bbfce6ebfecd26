//! The model store the interaction core issues commands against.
//!
//! The core never owns node storage. It reads through [`ModelStore::models`] and mutates only
//! via `select`, `update` and `remove`. [`Architecture`] is the in-memory store used by
//! the desktop application.

use crate::constants::{INPUT_NODE_ID, OUTPUT_NODE_ID, RESERVED_NODE_IDS};
use crate::layers::LayerKind;
use crate::types::*;
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// First ID handed out to user-placed layers; lower IDs are reserved.
const FIRST_LAYER_ID: NodeId = OUTPUT_NODE_ID + 1;

/// Reasons an architecture is rejected or cannot grow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchitectureError {
    /// A node is stored under a key other than its own ID
    #[error("node {id} is stored under key {key}")]
    KeyMismatch {
        /// Map key
        key: NodeId,
        /// The node's `ID` field
        id: NodeId,
    },
    /// One of the fixed input/output nodes is absent
    #[error("reserved node {0} is missing")]
    MissingReserved(NodeId),
    /// A node connects to itself
    #[error("node {0} is connected to itself")]
    SelfLoop(NodeId),
    /// A connection targets a node that does not exist
    #[error("node {from} is connected to missing node {to}")]
    DanglingConnection {
        /// Source node
        from: NodeId,
        /// Missing target
        to: NodeId,
    },
    /// Two nodes are connected to each other
    #[error("nodes {0} and {1} are connected both ways")]
    Bidirectional(NodeId, NodeId),
    /// No free node ID is left
    #[error("no free node IDs left")]
    IdsExhausted,
}

/// Read access plus mutation commands over the externally owned node collection.
pub trait ModelStore {
    /// All nodes, keyed by ID.
    fn models(&self) -> &BTreeMap<NodeId, Node>;

    /// Currently selected node, if any.
    fn selected(&self) -> Option<NodeId>;

    /// Selects a node, or clears the node selection with `None`.
    fn select(&mut self, id: Option<NodeId>);

    /// Applies a partial update to one node.
    fn update(&mut self, id: NodeId, patch: NodePatch);

    /// Deletes one node.
    fn remove(&mut self, id: NodeId);

    /// Looks up a single node.
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.models().get(&id)
    }
}

/// In-memory network architecture: the node collection plus the selected node.
///
/// Deserialization runs [`Architecture::validate`], so a loaded architecture always
/// satisfies the graph invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ArchitectureData")]
pub struct Architecture {
    /// Every node in the architecture, indexed by ID
    pub models: BTreeMap<NodeId, Node>,
    /// Selected node, if any
    #[serde(skip)]
    pub selected: Option<NodeId>,
}

/// Wire shape of an [`Architecture`] before validation.
#[derive(Deserialize)]
struct ArchitectureData {
    models: BTreeMap<NodeId, Node>,
}

impl TryFrom<ArchitectureData> for Architecture {
    type Error = ArchitectureError;

    fn try_from(data: ArchitectureData) -> Result<Self, Self::Error> {
        let architecture = Self {
            models: data.models,
            selected: None,
        };
        architecture.validate()?;
        Ok(architecture)
    }
}

impl Default for Architecture {
    /// Creates an architecture holding only the fixed input and output nodes.
    fn default() -> Self {
        let mut models = BTreeMap::new();
        models.insert(
            INPUT_NODE_ID,
            Node::new(INPUT_NODE_ID, LayerKind::Input, 40.0, 40.0),
        );
        models.insert(
            OUTPUT_NODE_ID,
            Node::new(OUTPUT_NODE_ID, LayerKind::Output, 40.0, 320.0),
        );
        Self {
            models,
            selected: None,
        }
    }
}

impl Architecture {
    /// Creates an architecture holding only the fixed input and output nodes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a new layer at `pos` and returns its freshly allocated ID.
    ///
    /// IDs count up from the highest one in use and never fall below the reserved range.
    pub fn add_node(
        &mut self,
        kind: LayerKind,
        pos: egui::Pos2,
    ) -> Result<NodeId, ArchitectureError> {
        let id = match self.models.keys().next_back() {
            Some(last) => last
                .checked_add(1)
                .ok_or(ArchitectureError::IdsExhausted)?
                .max(FIRST_LAYER_ID),
            None => FIRST_LAYER_ID,
        };
        self.models.insert(id, Node::new(id, kind, pos.x, pos.y));
        log::debug!("added {:?} node {id} at ({}, {})", kind, pos.x, pos.y);
        Ok(id)
    }

    /// Checks the graph invariants: keys match IDs, the reserved nodes exist, and every
    /// connection targets another existing node that does not point back.
    pub fn validate(&self) -> Result<(), ArchitectureError> {
        for id in RESERVED_NODE_IDS {
            if !self.models.contains_key(&id) {
                return Err(ArchitectureError::MissingReserved(id));
            }
        }
        for (&key, node) in &self.models {
            if key != node.id {
                return Err(ArchitectureError::KeyMismatch { key, id: node.id });
            }
            let Some(to) = node.connected_to else {
                continue;
            };
            if to == key {
                return Err(ArchitectureError::SelfLoop(key));
            }
            match self.models.get(&to) {
                None => return Err(ArchitectureError::DanglingConnection { from: key, to }),
                Some(target) if target.connected_to == Some(key) => {
                    return Err(ArchitectureError::Bidirectional(key.min(to), key.max(to)));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Enumerates every connection implied by the nodes' `connected_to` fields.
    pub fn connections(&self) -> Vec<Connection> {
        self.models
            .values()
            .filter_map(|node| node.connected_to.map(|to| Connection::new(node.id, to)))
            .collect()
    }

    /// Serializes the architecture to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes an architecture from JSON, rejecting graphs that fail [`Self::validate`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl ModelStore for Architecture {
    fn models(&self) -> &BTreeMap<NodeId, Node> {
        &self.models
    }

    fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    fn select(&mut self, id: Option<NodeId>) {
        self.selected = id;
    }

    fn update(&mut self, id: NodeId, patch: NodePatch) {
        match self.models.get_mut(&id) {
            Some(node) => patch.apply(node),
            None => log::warn!("ignoring update for unknown node {id}"),
        }
    }

    fn remove(&mut self, id: NodeId) {
        if self.models.remove(&id).is_none() {
            log::warn!("ignoring removal of unknown node {id}");
            return;
        }
        // Incoming edges would dangle otherwise
        for node in self.models.values_mut() {
            if node.connected_to == Some(id) {
                node.connected_to = None;
            }
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
    }
}

/// A command issued against a [`RecordingStore`].
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Select(Option<NodeId>),
    Update(NodeId, NodePatch),
    Remove(NodeId),
}

/// Store wrapper that logs every command before applying it.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingStore {
    pub inner: Architecture,
    pub commands: Vec<Command>,
}

#[cfg(test)]
impl RecordingStore {
    /// Input (0), output (1) and one hidden dense layer (2) at (50, 50).
    pub fn with_hidden_node() -> Self {
        let mut inner = Architecture::new();
        let id = inner.add_node(LayerKind::Dense, egui::pos2(50.0, 50.0)).unwrap();
        assert_eq!(id, 2);
        Self {
            inner,
            commands: Vec::new(),
        }
    }

    pub fn connected_to(&self, id: NodeId) -> Option<NodeId> {
        self.inner.models[&id].connected_to
    }

    pub fn removed(&self) -> Vec<NodeId> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Remove(id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
impl ModelStore for RecordingStore {
    fn models(&self) -> &BTreeMap<NodeId, Node> {
        self.inner.models()
    }

    fn selected(&self) -> Option<NodeId> {
        self.inner.selected()
    }

    fn select(&mut self, id: Option<NodeId>) {
        self.commands.push(Command::Select(id));
        self.inner.select(id);
    }

    fn update(&mut self, id: NodeId, patch: NodePatch) {
        self.commands.push(Command::Update(id, patch.clone()));
        self.inner.update(id, patch);
    }

    fn remove(&mut self, id: NodeId) {
        self.commands.push(Command::Remove(id));
        self.inner.remove(id);
    }
}
