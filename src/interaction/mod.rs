//! The canvas interaction state machine.
//!
//! Raw input arrives as [`CanvasEvent`]s at the [`InteractionCoordinator`], which owns all
//! transient interaction state and routes each event to the component responsible for it:
//!
//! - `pointer` - raw to canvas-local coordinates
//! - `drag` - single-node dragging and drag-vs-click classification
//! - `connection` - tentative connection construction
//! - `selection` - node XOR connection selection and deletion
//!
//! Every transition is synchronous and infallible. The only outputs are commands issued
//! against a [`ModelStore`](crate::store::ModelStore).

mod connection;
mod coordinator;
mod drag;
mod pointer;
mod selection;

pub use connection::{ConnectionBuilder, ConnectionState};
pub use coordinator::{CanvasEvent, InteractionCoordinator, KeyboardScope};
pub use drag::{DragController, DragRelease, DragState};
pub use pointer::PointerTracker;
pub use selection::{Selection, SelectionModel};
