//! # Layer Canvas
//!
//! A visual editor for neural network architectures. Layers are drawn as nodes on a
//! canvas and wired together by clicking one layer and then another:
//! - **Input / Output**: fixed endpoints of every architecture (IDs 0 and 1)
//! - **Hidden layers**: dense, convolution, pooling, dropout and activation layers
//!
//! ## Features
//! - Click-to-connect with a live dashed preview line
//! - Dragging layers, with small jitter still treated as a click
//! - Selecting and deleting layers or connections with the Delete key
//! - Exporting and opening architectures as JSON
//! - Saving, sharing and training architectures through a backend server
//!
//! The interaction core ([`interaction`]) is independent of the window: it consumes
//! [`CanvasEvent`]s and issues commands against any [`ModelStore`].

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod interaction;
pub mod layers;
pub mod server;
pub mod store;
pub mod types;
mod ui;

// Re-export public types and functions
pub use interaction::{CanvasEvent, InteractionCoordinator, KeyboardScope, Selection};
pub use layers::LayerKind;
pub use server::{ServerClient, ServerConfig, ServerError};
pub use store::{Architecture, ArchitectureError, ModelStore};
pub use types::*;
pub use ui::CanvasApp;

/// Runs the layer canvas application with default settings.
///
/// The previous session is restored from eframe storage when available. Server calls and
/// file dialogs are spawned on the ambient tokio runtime, so this must be called from
/// within one (see `main.rs`).
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an `eframe::Error` if
/// initialization fails.
///
/// # Example
///
/// ```no_run
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let rt = tokio::runtime::Runtime::new()?;
///     let _guard = rt.enter();
///     layer_canvas::run_app()?;
///     Ok(())
/// }
/// ```
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Layer Canvas")
            .with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Layer Canvas",
        options,
        Box::new(|cc| Ok(Box::new(CanvasApp::new(cc)))),
    )
}
