//! Dragging a single node, with release-time click reclassification.

use super::selection::SelectionModel;
use crate::constants::CLICK_THRESHOLD;
use crate::store::ModelStore;
use crate::types::*;
use eframe::egui;

/// State of the drag gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragState {
    /// No node is being dragged
    #[default]
    Idle,
    /// A node follows the pointer
    Dragging {
        /// Node being dragged
        node: NodeId,
        /// Pointer position when the drag started
        pointer_start: egui::Pos2,
        /// Node position when the drag started
        node_start: egui::Pos2,
    },
}

/// How a finished gesture should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragRelease {
    /// The node barely moved: treat the gesture as a click on it
    Click(NodeId),
    /// The node was actually moved
    Moved(NodeId),
}

/// Moves one node by the pointer's relative offset.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    /// Current drag state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Node currently being dragged, if any.
    pub fn dragging(&self) -> Option<NodeId> {
        match self.state {
            DragState::Dragging { node, .. } => Some(node),
            DragState::Idle => None,
        }
    }

    /// Starts dragging `node` and selects it.
    pub fn begin(
        &mut self,
        node: NodeId,
        pointer: egui::Pos2,
        selection: &mut SelectionModel,
        store: &mut dyn ModelStore,
    ) {
        let Some(node_start) = store.node(node).map(Node::position) else {
            log::warn!("cannot drag unknown node {node}");
            return;
        };
        self.state = DragState::Dragging {
            node,
            pointer_start: pointer,
            node_start,
        };
        selection.select_node(node, store);
    }

    /// Moves the dragged node so it keeps its initial offset from the pointer.
    pub fn on_pointer_move(&mut self, pointer: egui::Pos2, store: &mut dyn ModelStore) {
        if let DragState::Dragging {
            node,
            pointer_start,
            node_start,
        } = self.state
        {
            let target = pointer + (node_start - pointer_start);
            store.update(node, NodePatch::position(target));
        }
    }

    /// Ends the drag and classifies it by the node's total Manhattan displacement.
    ///
    /// Returns `None` when no drag was active.
    pub fn on_pointer_up(&mut self, store: &dyn ModelStore) -> Option<DragRelease> {
        let DragState::Dragging {
            node, node_start, ..
        } = std::mem::take(&mut self.state)
        else {
            return None;
        };
        let current = store.node(node)?.position();
        let moved = (current.x - node_start.x).abs() + (current.y - node_start.y).abs();
        if moved < CLICK_THRESHOLD {
            Some(DragRelease::Click(node))
        } else {
            log::debug!("dragged node {node} by {moved}");
            Some(DragRelease::Moved(node))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::selection::Selection;
    use crate::store::Command;
    use crate::store::RecordingStore;

    fn start(store: &mut RecordingStore) -> (DragController, SelectionModel) {
        let mut drag = DragController::default();
        let mut selection = SelectionModel::default();
        drag.begin(2, egui::pos2(60.0, 55.0), &mut selection, store);
        (drag, selection)
    }

    #[test]
    fn begin_selects_dragged_node() {
        let mut store = RecordingStore::with_hidden_node();
        let (drag, selection) = start(&mut store);
        assert_eq!(drag.dragging(), Some(2));
        assert_eq!(selection.current(), Selection::Node(2));
        assert_eq!(store.commands, vec![Command::Select(Some(2))]);
    }

    #[test]
    fn node_keeps_offset_from_pointer() {
        let mut store = RecordingStore::with_hidden_node();
        let (mut drag, _) = start(&mut store);

        drag.on_pointer_move(egui::pos2(60.0, 55.0), &mut store);
        assert_eq!(store.models()[&2].position(), egui::pos2(50.0, 50.0));

        drag.on_pointer_move(egui::pos2(100.0, 75.0), &mut store);
        assert_eq!(store.models()[&2].position(), egui::pos2(90.0, 70.0));
    }

    #[test]
    fn small_displacement_is_a_click() {
        let mut store = RecordingStore::with_hidden_node();
        let (mut drag, _) = start(&mut store);

        drag.on_pointer_move(egui::pos2(63.0, 57.0), &mut store);

        assert_eq!(drag.on_pointer_up(&store), Some(DragRelease::Click(2)));
        assert_eq!(drag.state(), DragState::Idle);
        assert_eq!(store.models()[&2].position(), egui::pos2(53.0, 52.0));
    }

    #[test]
    fn threshold_displacement_is_a_drag() {
        let mut store = RecordingStore::with_hidden_node();
        let (mut drag, _) = start(&mut store);

        drag.on_pointer_move(egui::pos2(64.0, 61.0), &mut store);

        assert_eq!(drag.on_pointer_up(&store), Some(DragRelease::Moved(2)));
        assert_eq!(store.models()[&2].position(), egui::pos2(54.0, 56.0));
    }

    #[test]
    fn release_uses_final_position_not_path_length() {
        let mut store = RecordingStore::with_hidden_node();
        let (mut drag, _) = start(&mut store);

        drag.on_pointer_move(egui::pos2(200.0, 200.0), &mut store);
        drag.on_pointer_move(egui::pos2(61.0, 56.0), &mut store);

        assert_eq!(drag.on_pointer_up(&store), Some(DragRelease::Click(2)));
    }

    #[test]
    fn pointer_events_while_idle_do_nothing() {
        let mut store = RecordingStore::with_hidden_node();
        let mut drag = DragController::default();

        drag.on_pointer_move(egui::pos2(10.0, 10.0), &mut store);

        assert_eq!(drag.on_pointer_up(&store), None);
        assert!(store.commands.is_empty());
    }
}
