//! Stream connection supervision
//!
//! One task owns the transport handle, the backoff schedule, the pending
//! retry and the liveness interval. Commands, transport events and timer
//! ticks are serialized through a single `select!` loop, so every state
//! transition is a discrete step and connect attempts can never race.
//!
//! Both liveness signals - the periodic tick and the host's visibility
//! hook - funnel into the same [`ensure_connected`] guard; a manual
//! reconnect bypasses the guard on purpose.
//!
//! Teardown is the loop exiting: the open stream, the retry deadline and
//! the interval all live in the task, so dropping it cancels everything at
//! once and no stale timer can fire afterwards.
//!
//! [`ensure_connected`]: ConnectionManager::ensure_connected

use std::sync::Arc;

use futures::StreamExt;
use parking_lot::RwLock;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::StreamConfig;
use crate::notifications::NotificationList;
use crate::stream::backoff::Backoff;
use crate::stream::protocol;
use crate::stream::transport::{EventStream, Transport, TransportEvent};
use crate::stream::{ConnectionState, ConnectionStatus};

/// Control commands accepted by the supervision task.
#[derive(Debug)]
pub(crate) enum Command {
    /// Reconnect only if no stream is open and no retry is pending.
    EnsureConnected,
    /// Reset the backoff schedule and reconnect unconditionally.
    Reconnect,
    /// Tear everything down and exit.
    Shutdown,
}

/// The supervision task state. Constructed by the facade, consumed by
/// [`run`](Self::run).
pub(crate) struct ConnectionManager {
    config: StreamConfig,
    transport: Arc<dyn Transport>,
    list: Arc<RwLock<NotificationList>>,
    status_tx: watch::Sender<ConnectionStatus>,
    commands: mpsc::UnboundedReceiver<Command>,
    backoff: Backoff,
    /// The one live transport subscription, when open.
    stream: Option<EventStream>,
    /// Deadline of the scheduled backoff retry, when reconnecting.
    retry_at: Option<Instant>,
    /// When the last well-formed batch arrived, empty ones included.
    last_event_at: Option<Instant>,
}

impl ConnectionManager {
    pub(crate) fn new(
        config: StreamConfig,
        transport: Arc<dyn Transport>,
        list: Arc<RwLock<NotificationList>>,
        status_tx: watch::Sender<ConnectionStatus>,
        commands: mpsc::UnboundedReceiver<Command>,
    ) -> Self {
        let backoff = Backoff::new(config.base_delay, config.max_delay, config.backoff_factor);
        Self {
            config,
            transport,
            list,
            status_tx,
            commands,
            backoff,
            stream: None,
            retry_at: None,
            last_event_at: None,
        }
    }

    /// Supervise the stream until shutdown or the command channel closes.
    pub(crate) async fn run(mut self) {
        let mut health = time::interval(self.config.health_check_interval);
        health.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.begin_connect();

        loop {
            let retry_at = self.retry_at;
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::EnsureConnected) => self.ensure_connected(),
                    Some(Command::Reconnect) => self.force_reconnect(),
                    Some(Command::Shutdown) | None => break,
                },
                event = Self::next_event(&mut self.stream) => {
                    self.on_transport_event(event);
                }
                _ = async { time::sleep_until(retry_at.unwrap()).await }, if retry_at.is_some() => {
                    self.retry_at = None;
                    self.begin_connect();
                }
                _ = health.tick() => self.ensure_connected(),
            }
        }

        debug!("live update supervision stopped");
    }

    /// Next event from the open stream; parked forever while disconnected.
    async fn next_event(stream: &mut Option<EventStream>) -> Option<TransportEvent> {
        match stream.as_mut() {
            Some(stream) => stream.next().await,
            None => std::future::pending().await,
        }
    }

    /// Open a fresh subscription, dropping any previous handle first.
    fn begin_connect(&mut self) {
        self.stream = None;
        self.retry_at = None;
        self.stream = Some(self.transport.open());
        self.publish(ConnectionState::Connecting, None);
        debug!(endpoint = %self.config.endpoint, "opening live update stream");
    }

    /// Manual reconnect: forget the backoff history and connect now.
    fn force_reconnect(&mut self) {
        self.backoff.reset();
        self.begin_connect();
    }

    /// Reconnect only when nothing is connected, connecting, or scheduled.
    ///
    /// Both liveness triggers land here, so a health tick can neither
    /// interrupt a live stream nor race a pending backoff retry.
    fn ensure_connected(&mut self) {
        if self.stream.is_some() || self.retry_at.is_some() {
            return;
        }
        if let Some(last) = self.last_event_at {
            debug!(
                idle_secs = last.elapsed().as_secs(),
                "liveness check found a dead stream"
            );
        }
        self.force_reconnect();
    }

    fn on_transport_event(&mut self, event: Option<TransportEvent>) {
        match event {
            Some(TransportEvent::Opened) => {
                self.backoff.reset();
                self.publish(ConnectionState::Connected, None);
                info!("live update stream connected");
            }
            Some(TransportEvent::Message { event, data }) => {
                self.on_message(event.as_deref(), &data);
            }
            Some(TransportEvent::Failed { reason }) => {
                self.stream = None;
                self.schedule_retry(&reason);
            }
            None => {
                self.stream = None;
                self.schedule_retry("transport stream ended");
            }
        }
    }

    /// Parse one frame and fold its batch into the list.
    ///
    /// Parse failures are logged and swallowed; they must never affect the
    /// connection.
    fn on_message(&mut self, event: Option<&str>, data: &str) {
        match protocol::parse_frame(event, data) {
            Ok(Some(batch)) => {
                self.last_event_at = Some(Instant::now());
                if batch.is_empty() {
                    return;
                }
                let mut list = self.list.write();
                list.apply_batch(&batch.products, &batch.datetime);
                debug!(
                    products = batch.products.len(),
                    unread = list.unread_count(),
                    "applied stock batch"
                );
            }
            Ok(None) => {} // foreign event or wrong discriminator
            Err(err) => warn!(%err, "ignoring malformed stream payload"),
        }
    }

    /// Schedule the next automatic retry, or give up after the budget.
    fn schedule_retry(&mut self, reason: &str) {
        if self.backoff.attempt() >= self.config.max_reconnect_attempts {
            self.publish(ConnectionState::Failed, None);
            warn!(reason, "live update stream failed; waiting for manual reconnect");
            return;
        }

        let delay = self.backoff.next_delay();
        self.retry_at = Some(Instant::now() + delay);
        self.publish(ConnectionState::Reconnecting, Some(delay));
        info!(
            reason,
            attempt = self.backoff.attempt(),
            wait_secs = delay.as_secs_f64(),
            "live update stream lost, retry scheduled"
        );
    }

    fn publish(&self, state: ConnectionState, retry_in: Option<std::time::Duration>) {
        // send_replace: nobody watching is fine.
        self.status_tx.send_replace(ConnectionStatus {
            state,
            reconnect_attempt: self.backoff.attempt(),
            retry_in,
        });
    }
}
