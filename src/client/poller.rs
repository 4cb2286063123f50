// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Interval-driven polling of a single read request.
//!
//! The poller drives the client once per interval and delivers each result
//! (value or error) to a sink channel. Two invariants hold:
//!
//! - **No overlap**: at most one request is in flight at a time. If an
//!   attempt is still pending when the next tick is due, that tick is
//!   skipped rather than queued, so a slow slave never builds a backlog.
//! - **Cooperative stop**: [`PollHandle::stop`] halts future ticks but never
//!   cancels an attempt already in flight; its result is still delivered
//!   once, after which the loop exits and the client is handed back.
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use tokio::sync::mpsc;
//! use modscan::client::{ModbusClient, Poller};
//! use modscan::types::{ReadRequest, ValueKind};
//!
//! let (tx, mut rx) = mpsc::channel(16);
//! let handle = Poller::start(
//!     client,
//!     ReadRequest::holding_registers(0, 10),
//!     ValueKind::UInt16,
//!     Duration::from_secs(1),
//!     tx,
//! );
//!
//! while let Some(sample) = rx.recv().await {
//!     println!("#{}: {:?}", sample.sequence, sample.result);
//! }
//!
//! let client = handle.stop().await?;
//! ```

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::{ConnectionError, ModbusError, ModbusResult};
use crate::types::{ReadRequest, ValueKind};

use super::conversion::ScanValue;
use super::ModbusClient;

// =============================================================================
// PollSample
// =============================================================================

/// One delivered polling result.
#[derive(Debug)]
pub struct PollSample {
    /// 1-based attempt counter. Skipped ticks do not advance it.
    pub sequence: u64,
    /// The converted reading, or the first failure of the attempt.
    pub result: ModbusResult<ScanValue>,
}

// =============================================================================
// Poller
// =============================================================================

/// Repeating driver for a single read request.
///
/// See the module documentation for the timing invariants.
pub struct Poller;

impl Poller {
    /// Starts polling `request` on `client` every `interval`.
    ///
    /// The first attempt fires one interval after the call. Each attempt's
    /// result is sent to `sink`; if the receiving side is dropped the loop
    /// stops on its own. The client is owned by the poll task until
    /// [`PollHandle::stop`] returns it.
    pub fn start(
        mut client: ModbusClient,
        request: ReadRequest,
        kind: ValueKind,
        interval: Duration,
        sink: mpsc::Sender<PollSample>,
    ) -> PollHandle {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The interval's first tick completes immediately; consume it so
            // the first attempt fires one interval after start.
            ticker.tick().await;

            tracing::debug!(
                request = %request,
                kind = %kind,
                interval_ms = interval.as_millis() as u64,
                "Polling started"
            );

            let mut sequence: u64 = 0;

            loop {
                tokio::select! {
                    changed = cancel_rx.changed() => {
                        // Cancelled, or the handle was dropped
                        let _ = changed;
                        break;
                    }
                    _ = ticker.tick() => {}
                }

                if *cancel_rx.borrow() {
                    break;
                }

                sequence += 1;
                // The attempt is never cancelled mid-flight; a stop issued
                // now takes effect after this result is delivered.
                let result = client.read_value(&request, kind).await;

                if let Err(error) = &result {
                    error.log("poll");
                }

                if sink.send(PollSample { sequence, result }).await.is_err() {
                    tracing::debug!(request = %request, "Poll sink closed, stopping");
                    break;
                }
            }

            tracing::debug!(request = %request, attempts = sequence, "Polling stopped");
            client
        });

        PollHandle {
            cancel: cancel_tx,
            task,
        }
    }
}

// =============================================================================
// PollHandle
// =============================================================================

/// Handle to a running poll loop.
pub struct PollHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<ModbusClient>,
}

impl PollHandle {
    /// Returns `true` if the poll loop has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops polling and returns the client once the loop has exited.
    ///
    /// An attempt already in flight completes first and its result is still
    /// delivered; no further ticks occur afterwards.
    pub async fn stop(self) -> ModbusResult<ModbusClient> {
        let _ = self.cancel.send(true);

        self.task.await.map_err(|e| {
            ModbusError::connection(ConnectionError::closed(Some(format!(
                "poll task failed: {e}"
            ))))
        })
    }
}

impl std::fmt::Debug for PollHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollHandle")
            .field("finished", &self.is_finished())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
