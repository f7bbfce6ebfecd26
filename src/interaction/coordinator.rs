//! Wires canvas input events to the pointer, drag, connection and selection machines.

use super::connection::ConnectionBuilder;
use super::drag::{DragController, DragRelease};
use super::pointer::PointerTracker;
use super::selection::{Selection, SelectionModel};
use crate::constants::DELETE_KEY;
use crate::store::ModelStore;
use crate::types::*;
use eframe::egui;
use std::cell::Cell;
use std::rc::Rc;

/// An input event delivered to the canvas. Positions are raw (screen) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEvent {
    /// The pointer moved
    PointerMove(egui::Pos2),
    /// The primary button went down on a node
    PointerDown {
        /// Node under the pointer
        node: NodeId,
        /// Pointer position
        pos: egui::Pos2,
    },
    /// The primary button was released anywhere
    PointerUp,
    /// A click landed on a node
    ElementClick(NodeId),
    /// A click landed on the canvas surface itself
    BackgroundClick,
    /// A click landed on a connection line
    ConnectionClick(Connection),
    /// A key was pressed
    KeyDown {
        /// The pressed key
        key: egui::Key,
        /// Whether a text field elsewhere in the UI has keyboard focus
        editable_focused: bool,
    },
}

/// Keeps the canvas keyboard listener attached for as long as it lives.
#[must_use = "dropping the scope detaches the keyboard listener"]
#[derive(Debug)]
pub struct KeyboardScope {
    listeners: Rc<Cell<usize>>,
}

impl Drop for KeyboardScope {
    fn drop(&mut self) {
        self.listeners.set(self.listeners.get().saturating_sub(1));
    }
}

/// Owns all transient interaction state and turns events into store commands.
#[derive(Debug, Default)]
pub struct InteractionCoordinator {
    pointer: PointerTracker,
    drag: DragController,
    connection: ConnectionBuilder,
    selection: SelectionModel,
    listeners: Rc<Cell<usize>>,
}

impl InteractionCoordinator {
    /// Creates a coordinator whose delete key never removes any node in `reserved`.
    pub fn with_reserved(reserved: &[NodeId]) -> Self {
        Self {
            selection: SelectionModel::new(reserved),
            ..Default::default()
        }
    }

    /// Captures the canvas origin and attaches the keyboard listener.
    ///
    /// Key events are only handled while the returned scope is alive.
    pub fn mount(&mut self, origin: egui::Pos2) -> KeyboardScope {
        self.pointer.mount(origin);
        self.listeners.set(self.listeners.get() + 1);
        log::debug!("canvas mounted at ({}, {})", origin.x, origin.y);
        KeyboardScope {
            listeners: Rc::clone(&self.listeners),
        }
    }

    /// Whether a [`KeyboardScope`] is currently alive.
    pub fn keyboard_attached(&self) -> bool {
        self.listeners.get() > 0
    }

    /// Pointer tracker, for converting between raw and canvas-local coordinates.
    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    /// Current selection.
    pub fn selection(&self) -> Selection {
        self.selection.current()
    }

    /// Origin of the pending connection, if any.
    pub fn pending_origin(&self) -> Option<NodeId> {
        self.connection.pending_origin()
    }

    /// Node being dragged, if any.
    pub fn dragging(&self) -> Option<NodeId> {
        self.drag.dragging()
    }

    /// Canvas-local endpoints of the tentative connection line.
    pub fn preview(&self, store: &dyn ModelStore) -> Option<(egui::Pos2, egui::Pos2)> {
        self.connection.preview(store, self.pointer.position())
    }

    /// Adopts a selection made directly on the store, outside any event.
    pub fn sync_selection(&mut self, store: &dyn ModelStore) {
        self.selection.sync(store);
    }

    /// Handles one input event to completion.
    pub fn handle(&mut self, event: CanvasEvent, store: &mut dyn ModelStore) {
        self.selection.sync(store);
        match event {
            CanvasEvent::PointerMove(raw) => self.on_pointer_move(raw, store),
            CanvasEvent::PointerDown { node, pos } => {
                let local = self.pointer.to_local(pos);
                self.drag.begin(node, local, &mut self.selection, store);
            }
            CanvasEvent::PointerUp => self.on_pointer_up(store),
            CanvasEvent::ElementClick(node) => self.on_element_click(node, store),
            CanvasEvent::BackgroundClick => {
                self.selection.clear(store);
                self.connection.cancel();
            }
            CanvasEvent::ConnectionClick(conn) => {
                self.selection
                    .select_connection(conn, &mut self.connection, store);
            }
            CanvasEvent::KeyDown {
                key,
                editable_focused,
            } => self.on_key_down(key, editable_focused, store),
        }
    }

    fn on_pointer_move(&mut self, raw: egui::Pos2, store: &mut dyn ModelStore) {
        let local = self.pointer.track(raw);
        self.drag.on_pointer_move(local, store);
    }

    fn on_pointer_up(&mut self, store: &mut dyn ModelStore) {
        if let Some(DragRelease::Click(node)) = self.drag.on_pointer_up(store) {
            self.selection.select_node(node, store);
            self.on_element_click(node, store);
        }
    }

    fn on_element_click(&mut self, node: NodeId, store: &mut dyn ModelStore) {
        self.connection
            .on_element_click(node, &mut self.selection, store);
    }

    fn on_key_down(&mut self, key: egui::Key, editable_focused: bool, store: &mut dyn ModelStore) {
        if !self.keyboard_attached() {
            log::debug!("ignoring {key:?}: canvas not mounted");
            return;
        }
        if key == DELETE_KEY {
            self.selection
                .delete_selection(editable_focused, &mut self.connection, store);
        }
    }
}
