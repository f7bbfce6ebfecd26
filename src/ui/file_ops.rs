//! Exporting and opening architecture files.
//!
//! File dialogs run on the tokio runtime; results come back over the channel in
//! [`FileState`](super::state::FileState) and are applied at the start of the next frame.

use super::state::{CanvasApp, FileOperationResult};
use crate::interaction::CanvasEvent;
use crate::store::Architecture;
use eframe::egui;
use std::path::{Path, PathBuf};

impl CanvasApp {
    /// Applies results of finished file operations.
    pub fn handle_file_results(&mut self) {
        while let Ok(result) = self.file.receiver.try_recv() {
            match result {
                FileOperationResult::ExportCompleted(path) => {
                    log::info!("architecture exported to {path}");
                    self.file.current_path = Some(path);
                }
                FileOperationResult::OpenCompleted(path, content) => {
                    match Architecture::from_json(&content) {
                        Ok(architecture) => self.replace_architecture(architecture, Some(path)),
                        Err(e) => {
                            log::error!("failed to load architecture {path}: {e}");
                            self.server.status = format!("Cannot open {path}: {e}");
                        }
                    }
                }
                FileOperationResult::OperationFailed(error) => {
                    log::error!("file operation failed: {error}");
                    self.server.status = error;
                }
            }
        }
    }

    /// Swaps in a new architecture and resets transient interaction state.
    pub fn replace_architecture(&mut self, architecture: Architecture, path: Option<String>) {
        self.architecture = architecture;
        self.file.current_path = path;
        self.server.model_id = None;
        self.server.share_link = None;
        self.dispatch(CanvasEvent::BackgroundClick);
    }

    /// Asks for a destination and writes the architecture there as JSON.
    pub fn export_architecture(&mut self, ctx: &egui::Context) {
        let json = match self.architecture.to_json() {
            Ok(json) => json,
            Err(e) => {
                log::error!("failed to serialize architecture: {e}");
                return;
            }
        };
        let (directory, file_name) = export_target(self.file.current_path.as_deref());
        let sender = self.file.sender.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            let mut dialog = rfd::AsyncFileDialog::new()
                .add_filter("JSON", &["json"])
                .set_file_name(file_name);
            if let Some(directory) = directory {
                dialog = dialog.set_directory(directory);
            }
            if let Some(handle) = dialog.save_file().await {
                let path = handle.path();
                let result = match std::fs::write(path, json) {
                    Ok(()) => FileOperationResult::ExportCompleted(path.display().to_string()),
                    Err(e) => {
                        FileOperationResult::OperationFailed(format!("Failed to save file: {e}"))
                    }
                };
                let _ = sender.send(result);
            }
            ctx.request_repaint();
        });
    }

    /// Asks for a JSON file and loads it as the current architecture.
    pub fn open_architecture(&mut self, ctx: &egui::Context) {
        let sender = self.file.sender.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            if let Some(handle) = rfd::AsyncFileDialog::new()
                .add_filter("JSON", &["json"])
                .pick_file()
                .await
            {
                let path = handle.path();
                let result = match std::fs::read_to_string(path) {
                    Ok(content) => {
                        FileOperationResult::OpenCompleted(path.display().to_string(), content)
                    }
                    Err(e) => {
                        FileOperationResult::OperationFailed(format!("Failed to read file: {e}"))
                    }
                };
                let _ = sender.send(result);
            }
            ctx.request_repaint();
        });
    }
}

/// Directory and file name the export dialog starts from: the last opened or exported
/// file if there is one.
fn export_target(current_path: Option<&str>) -> (Option<PathBuf>, String) {
    let Some(path) = current_path.map(Path::new) else {
        return (None, "architecture.json".to_owned());
    };
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf);
    let file_name = path
        .file_name()
        .map_or_else(|| "architecture.json".to_owned(), |n| n.to_string_lossy().into_owned());
    (directory, file_name)
}
