//! Event wiring around a shared controller.
//!
//! Every edit takes two paths: the instant path updates the in-memory note
//! and the view right away, and the debounced path persists the note once
//! input has been quiet for the configured delay.

use std::sync::Arc;

use log::{debug, error, info};
use tokio::sync::{mpsc, Mutex};
use tokio::time::Duration;

use crate::{
    Controller, DateRefreshScheduler, Debouncer, EditTarget, Note, NoteError, NoteView, Result,
    StorageMedium,
};

pub type SharedController<M, V> = Arc<Mutex<Controller<M, V>>>;

pub struct Session<M: StorageMedium + 'static, V: NoteView + 'static> {
    controller: SharedController<M, V>,
    debouncer: Debouncer,
    refresher: DateRefreshScheduler,
    save_errors_tx: mpsc::UnboundedSender<NoteError>,
    save_errors_rx: mpsc::UnboundedReceiver<NoteError>,
}

impl<M: StorageMedium + 'static, V: NoteView + 'static> Session<M, V> {
    /// Wraps `controller` and starts the date refresh ticker. Must be called
    /// from within a tokio runtime.
    pub fn start(
        controller: Controller<M, V>,
        debounce: Duration,
        date_refresh: Duration,
    ) -> Result<Self> {
        let controller = Arc::new(Mutex::new(controller));
        let mut refresher = DateRefreshScheduler::new(date_refresh);
        refresher.start(&controller)?;

        let (save_errors_tx, save_errors_rx) = mpsc::unbounded_channel();
        info!(
            "Session started (debounce {}ms)",
            debounce.as_millis()
        );

        Ok(Self {
            controller,
            debouncer: Debouncer::new(debounce),
            refresher,
            save_errors_tx,
            save_errors_rx,
        })
    }

    pub fn controller(&self) -> SharedController<M, V> {
        Arc::clone(&self.controller)
    }

    pub fn refresher(&self) -> &DateRefreshScheduler {
        &self.refresher
    }

    pub async fn title_input(&mut self, text: &str) -> bool {
        self.input(EditTarget::Title, text).await
    }

    pub async fn content_input(&mut self, text: &str) -> bool {
        self.input(EditTarget::Content, text).await
    }

    /// Applies an edit immediately and (re)arms the debounced save.
    pub async fn input(&mut self, target: EditTarget, text: &str) -> bool {
        let applied = self.controller.lock().await.apply_edit(target, text);
        if applied {
            self.schedule_save();
        }
        applied
    }

    fn schedule_save(&mut self) {
        let controller = Arc::clone(&self.controller);
        let errors = self.save_errors_tx.clone();

        self.debouncer.schedule(async move {
            let mut controller = controller.lock().await;
            match controller.save_active() {
                Ok(true) => debug!("Debounced save completed"),
                Ok(false) => debug!("Debounced save skipped, nothing to save"),
                Err(e) => {
                    error!("Debounced save failed: {}", e);
                    let _ = errors.send(e);
                }
            }
        });
    }

    /// Errors raised by debounced saves since the last call.
    pub fn take_save_errors(&mut self) -> Vec<NoteError> {
        let mut errors = Vec::new();
        while let Ok(e) = self.save_errors_rx.try_recv() {
            errors.push(e);
        }
        errors
    }

    pub async fn select(&mut self, id: &str) -> Result<bool> {
        self.controller.lock().await.select_note(id)
    }

    pub async fn create(&mut self, title: Option<&str>) -> Result<Note> {
        self.controller.lock().await.new_note(title)
    }

    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.controller.lock().await.delete_note(id)
    }

    /// Cancels the pending debounced save and saves immediately instead.
    pub async fn flush(&mut self) -> Result<bool> {
        if self.debouncer.cancel() {
            debug!("Flushing pending edit");
        }
        self.controller.lock().await.save_active()
    }

    /// Flushes pending edits and stops background work.
    pub async fn shutdown(mut self) -> Result<()> {
        info!("Shutting down session...");
        let flushed = self.flush().await;
        self.refresher.stop().await?;
        flushed.map(|_| ())
    }
}
