//! Application state management structures.
//!
//! This module contains the state the desktop shell keeps around the interaction core:
//! the architecture being edited, file and server operation plumbing, and persisted
//! display preferences.

use crate::interaction::{InteractionCoordinator, KeyboardScope};
use crate::server::{ModelId, ServerClient, ServerConfig, SessionId};
use crate::store::Architecture;
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Messages sent from async file operations back to the main app.
#[derive(Debug)]
pub enum FileOperationResult {
    /// Export completed successfully to the given path
    ExportCompleted(String),
    /// Open completed successfully with path and content
    OpenCompleted(String, String),
    /// Operation failed with an error message
    OperationFailed(String),
}

/// State related to exporting and opening architecture files.
pub struct FileState {
    /// Path of the last exported or opened file
    pub current_path: Option<String>,
    /// Channel for receiving file operation results from async contexts
    pub sender: Sender<FileOperationResult>,
    /// Receiving end, drained once per frame
    pub receiver: Receiver<FileOperationResult>,
}

impl Default for FileState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            current_path: None,
            sender,
            receiver,
        }
    }
}

/// Messages sent from async server calls back to the main app.
#[derive(Debug)]
pub enum ServerOperationResult {
    /// Architecture stored under the given ID
    Saved(ModelId),
    /// Share link created for the saved architecture
    LinkCreated(String),
    /// Training session opened
    SessionStarted(SessionId),
    /// Latest training session state
    TrainingUpdated(serde_json::Value),
    /// Training session deleted; carries the acknowledgement status
    TrainingStopped(u16),
    /// Call failed with an error message
    OperationFailed(String),
}

/// State related to the training backend.
pub struct ServerState {
    /// Client for the configured backend
    pub client: ServerClient,
    /// ID of the last saved architecture
    pub model_id: Option<ModelId>,
    /// ID of the running training session
    pub session_id: Option<SessionId>,
    /// Share link for the last saved architecture
    pub share_link: Option<String>,
    /// Last training state reported by the backend
    pub training: Option<serde_json::Value>,
    /// One-line status shown in the toolbar
    pub status: String,
    /// Channel for receiving results from async server calls
    pub sender: Sender<ServerOperationResult>,
    /// Receiving end, drained once per frame
    pub receiver: Receiver<ServerOperationResult>,
}

impl Default for ServerState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            client: ServerClient::new(ServerConfig::from_env()),
            model_id: None,
            session_id: None,
            share_link: None,
            training: None,
            status: String::new(),
            sender,
            receiver,
        }
    }
}

/// The main application structure containing UI state and the architecture being edited.
///
/// This struct implements the `eframe::App` trait and handles all user interface
/// rendering and forwards canvas input to the [`InteractionCoordinator`].
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasApp {
    /// The architecture being edited; this is the model store the canvas mutates
    pub architecture: Architecture,
    /// Transient canvas interaction state
    #[serde(skip)]
    pub interaction: InteractionCoordinator,
    /// Keyboard listener scope, alive while the canvas is shown
    #[serde(skip)]
    pub keyboard: Option<KeyboardScope>,
    /// Last raw pointer position forwarded to the coordinator
    #[serde(skip)]
    pub last_pointer: Option<egui::Pos2>,
    /// Number of layers placed from the toolbar, used to stagger placement
    #[serde(skip)]
    pub placed_count: u32,
    /// File operations state
    #[serde(skip)]
    pub file: FileState,
    /// Training backend state
    #[serde(skip)]
    pub server: ServerState,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
    /// Remembered width of the properties panel across sessions
    pub properties_panel_width: f32,
}

impl Default for CanvasApp {
    fn default() -> Self {
        Self {
            architecture: Architecture::new(),
            interaction: InteractionCoordinator::default(),
            keyboard: None,
            last_pointer: None,
            placed_count: 0,
            file: FileState::default(),
            server: ServerState::default(),
            dark_mode: true,
            properties_panel_width: 260.0,
        }
    }
}

impl CanvasApp {
    /// Restores the previous session from eframe storage, if any.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.storage
            .and_then(|storage| storage.get_string("app_state"))
            .and_then(|json| match Self::from_json(&json) {
                Ok(app) => Some(app),
                Err(err) => {
                    log::warn!("discarding unreadable saved state: {err}");
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Serializes the application state to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes application state from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Hides the canvas: the keyboard listener detaches until it is shown again.
    pub fn unmount_canvas(&mut self) {
        self.keyboard = None;
    }
}
