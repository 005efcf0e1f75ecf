//! Consumer-facing facade
//!
//! [`StockNotifier`] owns the supervision task and hands the host everything
//! it needs: the notification list, the unread count, the connection status
//! and the control operations. List mutations apply immediately under the
//! shared lock; connection commands are forwarded to the supervision task so
//! its lifecycle stays single-threaded.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::config::StreamConfig;
use crate::notifications::NotificationList;
use crate::stream::manager::{Command, ConnectionManager};
use crate::stream::transport::{SseTransport, Transport};
use crate::stream::ConnectionStatus;
use crate::types::Notification;

/// Handle to the live update subsystem.
///
/// Construct with [`start`](Self::start) inside a tokio runtime. Dropping
/// the handle closes the command channel, which shuts the supervision task
/// down along with its transport and timers; [`shutdown`](Self::shutdown)
/// does the same but lets the caller await completion.
pub struct StockNotifier {
    list: Arc<RwLock<NotificationList>>,
    status_rx: watch::Receiver<ConnectionStatus>,
    /// Absent when the subsystem is disabled; every control call is inert.
    commands: Option<mpsc::UnboundedSender<Command>>,
    task: Option<JoinHandle<()>>,
}

impl StockNotifier {
    /// Start against the production SSE transport.
    pub fn start(config: StreamConfig) -> Self {
        let transport = Arc::new(SseTransport::new(&config));
        Self::start_with_transport(config, transport)
    }

    /// Start with a custom transport. Entirely a no-op when
    /// `config.enabled` is false: no task is spawned and the status stays
    /// disconnected.
    pub fn start_with_transport(config: StreamConfig, transport: Arc<dyn Transport>) -> Self {
        let list = Arc::new(RwLock::new(NotificationList::new()));
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::disconnected());

        if !config.enabled {
            return Self {
                list,
                status_rx,
                commands: None,
                task: None,
            };
        }

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let manager =
            ConnectionManager::new(config, transport, Arc::clone(&list), status_tx, command_rx);
        let task = tokio::spawn(manager.run());

        Self {
            list,
            status_rx,
            commands: Some(command_tx),
            task: Some(task),
        }
    }

    /// Whether the subsystem is actually running.
    pub fn is_enabled(&self) -> bool {
        self.commands.is_some()
    }

    /// Snapshot of the list, newest-affecting-event first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.list.read().entries().to_vec()
    }

    /// Unacknowledged notifications, derived on every call.
    pub fn unread_count(&self) -> usize {
        self.list.read().unread_count()
    }

    /// Current connection status snapshot.
    pub fn status(&self) -> ConnectionStatus {
        self.status_rx.borrow().clone()
    }

    /// Human-readable status line.
    pub fn status_text(&self) -> String {
        self.status_rx.borrow().describe()
    }

    /// Watch the status for changes; for hosts that want to react instead
    /// of poll.
    pub fn status_watch(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_rx.clone()
    }

    /// Acknowledge one notification by id.
    pub fn mark_as_read(&self, id: &str) {
        self.list.write().mark_as_read(id);
    }

    /// Delete one notification by id.
    pub fn remove_notification(&self, id: &str) {
        self.list.write().remove(id);
    }

    /// Empty the list.
    pub fn clear_all(&self) {
        self.list.write().clear();
    }

    /// Force a reconnect: resets the backoff schedule and connects now.
    /// The escape hatch from the failed state.
    pub fn reconnect(&self) {
        self.send(Command::Reconnect);
    }

    /// Reconnect only if the stream is dead and no retry is pending.
    ///
    /// Call this when the host regains visibility (a tab turning visible, a
    /// window waking) - the same guard the periodic liveness check uses.
    pub fn ensure_connected(&self) {
        self.send(Command::EnsureConnected);
    }

    /// Stop the subsystem and wait for the supervision task to exit.
    pub async fn shutdown(mut self) {
        if let Some(commands) = self.commands.take() {
            let _ = commands.send(Command::Shutdown);
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    fn send(&self, command: Command) {
        if let Some(ref commands) = self.commands {
            // A closed channel means the task is already gone.
            let _ = commands.send(command);
        }
    }
}
