//! Node-or-connection selection and the delete-key rules.

use super::connection::ConnectionBuilder;
use crate::constants::RESERVED_NODE_IDS;
use crate::store::ModelStore;
use crate::types::*;

/// What is currently selected on the canvas. Nodes and connections are mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    /// Nothing selected
    #[default]
    None,
    /// A single node
    Node(NodeId),
    /// A single directed connection
    Connection(Connection),
}

/// Owns the [`Selection`] and mirrors node selections into the model store.
#[derive(Debug, Clone)]
pub struct SelectionModel {
    current: Selection,
    reserved: Vec<NodeId>,
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self::new(&RESERVED_NODE_IDS)
    }
}

impl SelectionModel {
    /// Creates an empty selection; nodes in `reserved` can never be deleted.
    pub fn new(reserved: &[NodeId]) -> Self {
        Self {
            current: Selection::None,
            reserved: reserved.to_vec(),
        }
    }

    /// The current selection.
    pub fn current(&self) -> Selection {
        self.current
    }

    /// The selected connection, if a connection is selected.
    pub fn selected_connection(&self) -> Option<Connection> {
        match self.current {
            Selection::Connection(conn) => Some(conn),
            _ => None,
        }
    }

    /// Whether `id` may be removed by the delete key.
    pub fn is_deletable(&self, id: NodeId) -> bool {
        !self.reserved.contains(&id)
    }

    /// Adopts node selections made through the store by other collaborators.
    pub fn sync(&mut self, store: &dyn ModelStore) {
        match (store.selected(), self.current) {
            (Some(id), Selection::Node(current)) if id == current => {}
            (Some(id), _) => self.current = Selection::Node(id),
            (None, Selection::Node(_)) => self.current = Selection::None,
            (None, _) => {}
        }
    }

    /// Selects a node, dropping any connection selection.
    pub fn select_node(&mut self, id: NodeId, store: &mut dyn ModelStore) {
        self.current = Selection::Node(id);
        store.select(Some(id));
    }

    /// Selects a connection and deselects any node. Cancels pending connection building.
    pub fn select_connection(
        &mut self,
        conn: Connection,
        builder: &mut ConnectionBuilder,
        store: &mut dyn ModelStore,
    ) {
        builder.cancel();
        self.current = Selection::Connection(conn);
        store.select(None);
    }

    /// Drops a connection selection; node selections are untouched.
    pub fn clear_connection(&mut self) {
        if let Selection::Connection(_) = self.current {
            self.current = Selection::None;
        }
    }

    /// Clears both node and connection selection.
    pub fn clear(&mut self, store: &mut dyn ModelStore) {
        if let Selection::Node(_) = self.current {
            store.select(None);
        }
        self.current = Selection::None;
    }

    /// Deletes whatever is selected.
    ///
    /// Nothing happens at all while an editable field has focus. A selected node wins over
    /// a selected connection; reserved nodes are never removed.
    pub fn delete_selection(
        &mut self,
        editable_focused: bool,
        builder: &mut ConnectionBuilder,
        store: &mut dyn ModelStore,
    ) {
        if editable_focused {
            return;
        }
        match self.current {
            Selection::Node(id) => {
                builder.cancel();
                if !self.is_deletable(id) {
                    log::debug!("refusing to delete reserved node {id}");
                    return;
                }
                self.clear(store);
                store.remove(id);
                log::debug!("deleted node {id}");
            }
            Selection::Connection(conn) => {
                builder.cancel();
                self.current = Selection::None;
                store.update(conn.from, NodePatch::connected_to(None));
                log::debug!("deleted connection {} -> {}", conn.from, conn.to);
            }
            Selection::None => {}
        }
    }
}
