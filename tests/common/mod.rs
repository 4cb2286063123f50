// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Mock transport for testing the engine in isolation.
//!
//! Scripted responses are popped in order, every request frame is recorded
//! for verification, and latency can be injected to exercise timing paths.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use modscan::client::{Framing, ModbusTransport, TransportState};
use modscan::error::{ConnectionError, ModbusError, ModbusResult};

/// Shared handle for scripting and inspecting a [`MockTransport`] after it
/// has been moved into a client.
#[derive(Clone)]
pub struct MockHandle {
    responses: Arc<Mutex<VecDeque<ModbusResult<Vec<u8>>>>>,
    exchanges: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockHandle {
    /// Queues a response frame.
    pub fn push_response(&self, frame: Vec<u8>) {
        self.responses.lock().unwrap().push_back(Ok(frame));
    }

    /// Queues an error result.
    pub fn push_error(&self, error: ModbusError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Returns the number of exchanges the transport saw.
    pub fn exchange_count(&self) -> usize {
        self.exchanges.lock().unwrap().len()
    }

    /// Returns a recorded request frame.
    pub fn recorded(&self, index: usize) -> Vec<u8> {
        self.exchanges.lock().unwrap()[index].clone()
    }
}

/// A scripted in-memory transport.
pub struct MockTransport {
    unit_id: u8,
    framing: Framing,
    state: TransportState,
    latency: Duration,
    responses: Arc<Mutex<VecDeque<ModbusResult<Vec<u8>>>>>,
    exchanges: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockTransport {
    /// Creates a connected mock speaking the given framing.
    pub fn new(unit_id: u8, framing: Framing) -> (Self, MockHandle) {
        let responses = Arc::new(Mutex::new(VecDeque::new()));
        let exchanges = Arc::new(Mutex::new(Vec::new()));
        let handle = MockHandle {
            responses: responses.clone(),
            exchanges: exchanges.clone(),
        };
        (
            Self {
                unit_id,
                framing,
                state: TransportState::Connected,
                latency: Duration::ZERO,
                responses,
                exchanges,
            },
            handle,
        )
    }

    /// Sets a simulated exchange latency.
    #[allow(dead_code)]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl ModbusTransport for MockTransport {
    async fn connect(&mut self) -> ModbusResult<()> {
        self.state = TransportState::Connected;
        Ok(())
    }

    async fn disconnect(&mut self) -> ModbusResult<()> {
        self.state = TransportState::Closed;
        Ok(())
    }

    async fn exchange(&mut self, request: &[u8]) -> ModbusResult<Vec<u8>> {
        self.exchanges.lock().unwrap().push(request.to_vec());

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(ModbusError::connection(ConnectionError::closed(Some(
                "no scripted response".to_string(),
            ))))
        })
    }

    fn is_connected(&self) -> bool {
        self.state == TransportState::Connected
    }

    fn state(&self) -> TransportState {
        self.state
    }

    fn framing(&self) -> Framing {
        self.framing
    }

    fn unit_id(&self) -> u8 {
        self.unit_id
    }

    fn display_name(&self) -> String {
        format!("mock {} transport (unit {})", self.framing, self.unit_id)
    }
}
