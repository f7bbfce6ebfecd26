//! Toolbar actions that talk to the training backend.
//!
//! Each action spawns one task on the tokio runtime. Outcomes travel back over the
//! channel in [`ServerState`](super::state::ServerState); failures only update the
//! status line, nothing is retried.

use super::state::{CanvasApp, ServerOperationResult};
use crate::server::{resource_id, ServerClient, ServerError};
use eframe::egui;
use std::future::Future;
use std::sync::mpsc::Sender;

impl CanvasApp {
    /// Applies results of finished server calls.
    pub fn handle_server_results(&mut self) {
        while let Ok(result) = self.server.receiver.try_recv() {
            match result {
                ServerOperationResult::Saved(id) => {
                    self.server.model_id = Some(id);
                    self.server.share_link = None;
                    self.server.status = format!("Saved as model {id}");
                }
                ServerOperationResult::LinkCreated(link) => {
                    self.server.status = format!("Share link: {link}");
                    self.server.share_link = Some(link);
                }
                ServerOperationResult::SessionStarted(id) => {
                    self.server.session_id = Some(id);
                    self.server.training = None;
                    self.server.status = format!("Training session {id} started");
                }
                ServerOperationResult::TrainingUpdated(state) => {
                    self.server.training = Some(state);
                    self.server.status = "Training state refreshed".to_owned();
                }
                ServerOperationResult::TrainingStopped(status) => {
                    self.server.session_id = None;
                    self.server.status = format!("Training stopped ({status})");
                }
                ServerOperationResult::OperationFailed(error) => {
                    log::error!("server call failed: {error}");
                    self.server.status = error;
                }
            }
        }
    }

    /// Stores the current architecture on the backend.
    pub fn save_to_server(&mut self, ctx: &egui::Context) {
        let architecture = self.architecture.clone();
        self.spawn_server_call(ctx, move |client, tx| async move {
            let created = client.save_model(&architecture).await?;
            let id = resource_id(&created).ok_or(ServerError::MissingField("id"))?;
            let _ = tx.send(ServerOperationResult::Saved(id));
            Ok(())
        });
    }

    /// Saves the architecture if needed, then creates a share link for it.
    pub fn share_link(&mut self, ctx: &egui::Context) {
        let saved = self.server.model_id;
        let architecture = self.architecture.clone();
        self.spawn_server_call(ctx, move |client, tx| async move {
            let id = match saved {
                Some(id) => id,
                None => {
                    let created = client.save_model(&architecture).await?;
                    let id = resource_id(&created).ok_or(ServerError::MissingField("id"))?;
                    let _ = tx.send(ServerOperationResult::Saved(id));
                    id
                }
            };
            let link = client.create_link(id).await?;
            let _ = tx.send(ServerOperationResult::LinkCreated(link));
            Ok(())
        });
    }

    /// Saves the architecture, then opens a training session for it.
    pub fn start_training(&mut self, ctx: &egui::Context) {
        let architecture = self.architecture.clone();
        self.spawn_server_call(ctx, move |client, tx| async move {
            let created = client.save_model(&architecture).await?;
            let model_id = resource_id(&created).ok_or(ServerError::MissingField("id"))?;
            let _ = tx.send(ServerOperationResult::Saved(model_id));
            let session = client.start_session(model_id).await?;
            let session_id = resource_id(&session).ok_or(ServerError::MissingField("id"))?;
            let _ = tx.send(ServerOperationResult::SessionStarted(session_id));
            Ok(())
        });
    }

    /// Fetches the latest state of the running training session.
    pub fn refresh_training(&mut self, ctx: &egui::Context) {
        let Some(session_id) = self.server.session_id else {
            return;
        };
        self.spawn_server_call(ctx, move |client, tx| async move {
            let state = client.update_train(session_id).await?;
            let _ = tx.send(ServerOperationResult::TrainingUpdated(state));
            Ok(())
        });
    }

    /// Stops the running training session.
    pub fn stop_training(&mut self, ctx: &egui::Context) {
        let Some(session_id) = self.server.session_id else {
            return;
        };
        self.spawn_server_call(ctx, move |client, tx| async move {
            let status = client.delete_train(session_id).await?;
            let _ = tx.send(ServerOperationResult::TrainingStopped(status.as_u16()));
            Ok(())
        });
    }

    /// Runs `call` on the runtime and reports a failure if it returns an error.
    fn spawn_server_call<F, Fut>(&mut self, ctx: &egui::Context, call: F)
    where
        F: FnOnce(ServerClient, Sender<ServerOperationResult>) -> Fut,
        Fut: Future<Output = Result<(), ServerError>> + Send + 'static,
    {
        self.server.status = "Contacting server…".to_owned();
        let client = self.server.client.clone();
        let tx = self.server.sender.clone();
        let ctx = ctx.clone();
        let task = call(client, tx.clone());
        tokio::spawn(async move {
            if let Err(e) = task.await {
                let _ = tx.send(ServerOperationResult::OperationFailed(e.to_string()));
            }
            ctx.request_repaint();
        });
    }
}
