//! Click-to-start, click-to-finish construction of connections.

use super::selection::SelectionModel;
use crate::store::ModelStore;
use crate::types::*;
use eframe::egui;

/// State of the tentative connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection under construction
    #[default]
    Idle,
    /// A connection starting at the given node awaits its target
    Pending(NodeId),
}

/// Builds one connection at a time from two successive node clicks.
#[derive(Debug, Clone, Default)]
pub struct ConnectionBuilder {
    state: ConnectionState,
}

impl ConnectionBuilder {
    /// Current builder state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Origin of the pending connection, if one is being drawn.
    pub fn pending_origin(&self) -> Option<NodeId> {
        match self.state {
            ConnectionState::Pending(origin) => Some(origin),
            ConnectionState::Idle => None,
        }
    }

    /// Starts a tentative connection from `origin`, dropping any connection selection.
    pub fn begin(&mut self, origin: NodeId, selection: &mut SelectionModel) {
        self.state = ConnectionState::Pending(origin);
        selection.clear_connection();
        log::debug!("connection pending from node {origin}");
    }

    /// Returns to idle, discarding any pending connection.
    pub fn cancel(&mut self) {
        self.state = ConnectionState::Idle;
    }

    /// Handles a click on node `target`.
    ///
    /// While idle the click arms a new connection from `target`. While pending it commits
    /// `origin -> target` (unless `target` is the origin itself) and always returns to idle.
    /// Committing over an existing `target -> origin` edge clears that reverse edge.
    pub fn on_element_click(
        &mut self,
        target: NodeId,
        selection: &mut SelectionModel,
        store: &mut dyn ModelStore,
    ) {
        let origin = match self.state {
            ConnectionState::Idle => {
                self.begin(target, selection);
                return;
            }
            ConnectionState::Pending(origin) => origin,
        };

        if origin != target {
            store.update(origin, NodePatch::connected_to(Some(target)));
            let reverse = store
                .node(target)
                .is_some_and(|node| node.connected_to == Some(origin));
            if reverse {
                store.update(target, NodePatch::connected_to(None));
            }
            log::debug!("connected node {origin} -> {target}");
        }
        self.cancel();
    }

    /// Endpoints of the tentative line: the origin's anchor and the pointer.
    pub fn preview(
        &self,
        store: &dyn ModelStore,
        pointer: egui::Pos2,
    ) -> Option<(egui::Pos2, egui::Pos2)> {
        let origin = store.node(self.pending_origin()?)?;
        Some((origin.anchor(), pointer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::selection::Selection;
    use crate::store::{Command, RecordingStore};

    #[test]
    fn first_click_arms_second_click_commits() {
        let mut store = RecordingStore::with_hidden_node();
        let mut selection = SelectionModel::default();
        let mut builder = ConnectionBuilder::default();

        builder.on_element_click(2, &mut selection, &mut store);
        assert_eq!(builder.state(), ConnectionState::Pending(2));
        assert!(store.commands.is_empty());

        builder.on_element_click(1, &mut selection, &mut store);
        assert_eq!(builder.state(), ConnectionState::Idle);
        assert_eq!(store.connected_to(2), Some(1));
    }

    #[test]
    fn self_loop_is_ignored_but_consumes_pending_state() {
        let mut store = RecordingStore::with_hidden_node();
        store.inner.update(2, NodePatch::connected_to(Some(1)));
        let mut selection = SelectionModel::default();
        let mut builder = ConnectionBuilder::default();

        builder.on_element_click(2, &mut selection, &mut store);
        builder.on_element_click(2, &mut selection, &mut store);

        assert_eq!(builder.state(), ConnectionState::Idle);
        assert_eq!(store.connected_to(2), Some(1));
        assert!(store.commands.is_empty());
    }

    #[test]
    fn reverse_edge_is_cleared_on_commit() {
        let mut store = RecordingStore::with_hidden_node();
        store.inner.update(1, NodePatch::connected_to(Some(2)));
        let mut selection = SelectionModel::default();
        let mut builder = ConnectionBuilder::default();

        builder.on_element_click(2, &mut selection, &mut store);
        builder.on_element_click(1, &mut selection, &mut store);

        assert_eq!(store.connected_to(2), Some(1));
        assert_eq!(store.connected_to(1), None);
        assert_eq!(
            store.commands,
            vec![
                Command::Update(2, NodePatch::connected_to(Some(1))),
                Command::Update(1, NodePatch::connected_to(None)),
            ]
        );
    }

    #[test]
    fn unrelated_target_edge_is_kept() {
        let mut store = RecordingStore::with_hidden_node();
        store.inner.update(1, NodePatch::connected_to(Some(0)));
        let mut selection = SelectionModel::default();
        let mut builder = ConnectionBuilder::default();

        builder.on_element_click(2, &mut selection, &mut store);
        builder.on_element_click(1, &mut selection, &mut store);

        assert_eq!(store.connected_to(2), Some(1));
        assert_eq!(store.connected_to(1), Some(0));
    }

    #[test]
    fn no_pair_ends_up_bidirectional() {
        let ids = [0, 1, 2];
        for &a in &ids {
            for &b in &ids {
                if a == b {
                    continue;
                }
                let mut store = RecordingStore::with_hidden_node();
                let mut selection = SelectionModel::default();
                let mut builder = ConnectionBuilder::default();
                builder.on_element_click(b, &mut selection, &mut store);
                builder.on_element_click(a, &mut selection, &mut store);
                builder.on_element_click(a, &mut selection, &mut store);
                builder.on_element_click(b, &mut selection, &mut store);

                assert_eq!(store.connected_to(a), Some(b));
                assert_ne!(store.connected_to(b), Some(a));
            }
        }
    }

    #[test]
    fn begin_drops_connection_selection() {
        let mut store = RecordingStore::with_hidden_node();
        store.inner.update(2, NodePatch::connected_to(Some(1)));
        let mut selection = SelectionModel::default();
        let mut builder = ConnectionBuilder::default();
        selection.select_connection(Connection::new(2, 1), &mut builder, &mut store);

        builder.begin(0, &mut selection);

        assert_eq!(selection.current(), Selection::None);
    }

    #[test]
    fn preview_runs_from_origin_anchor_to_pointer() {
        let mut store = RecordingStore::with_hidden_node();
        let mut selection = SelectionModel::default();
        let mut builder = ConnectionBuilder::default();
        let pointer = egui::pos2(300.0, 200.0);
        assert_eq!(builder.preview(&store, pointer), None);

        builder.on_element_click(2, &mut selection, &mut store);

        let anchor = store.models()[&2].anchor();
        assert_eq!(builder.preview(&store, pointer), Some((anchor, pointer)));
    }
}
