// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Modbus master client.
//!
//! This module provides the request engine and everything around it:
//!
//! - **Transport Layer**: Abstract transport trait for TCP and RTU
//! - **ModbusClient**: One session per slave device, read request execution
//! - **Data Conversion**: Raw readings to presentation values
//! - **Poller**: Interval-driven repeated reads with a result sink
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Poller                                 │
//! │               (interval-driven read loop)                       │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       ModbusClient                              │
//! │        (validation, framing dispatch, response echo)            │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     ModbusTransport                             │
//! │                (abstract byte-level transport)                  │
//! └─────────────────────────────────────────────────────────────────┘
//!            │                                     │
//!            ▼                                     ▼
//! ┌─────────────────────┐             ┌─────────────────────┐
//! │    TcpTransport     │             │    RtuTransport     │
//! │   (tokio TcpStream) │             │   (tokio-serial)    │
//! └─────────────────────┘             └─────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use modscan::client::ModbusClient;
//! use modscan::types::{ConnectionConfig, ReadRequest, TcpConfig, ValueKind};
//!
//! let config = ConnectionConfig::Tcp(TcpConfig::with_port("192.168.1.100", 502));
//! let mut client = ModbusClient::connect(config).await?;
//!
//! let reading = client.read(&ReadRequest::holding_registers(0, 10)).await?;
//! let value = client.read_value(&ReadRequest::holding_registers(0, 2), ValueKind::Float32).await?;
//!
//! client.close().await?;
//! ```

mod conversion;
mod poller;
mod rtu;
mod tcp;
mod transport;

pub use conversion::{convert, ScanValue};
pub use poller::{PollHandle, PollSample, Poller};
pub use rtu::RtuTransport;
pub use tcp::TcpTransport;
pub use transport::{Framing, ModbusTransport, TransportState};

use crate::codec;
use crate::error::ModbusResult;
use crate::types::{ConnectionConfig, RawReading, ReadRequest, ValueKind};

// =============================================================================
// ModbusClient
// =============================================================================

/// A Modbus master session.
///
/// The client owns exactly one live transport handle and drives one
/// request/response cycle at a time: it validates the request locally,
/// encodes it through the frame codec, exchanges bytes over the transport
/// and decodes the response, checking the transaction/unit id echo.
///
/// The client never retries: each operation returns the first failure it
/// observes, and retry policy belongs to the caller (the [`Poller`] simply
/// tries again on its next tick).
///
/// Reconnecting means building a new client; close or drop the previous one
/// first so the physical resource is released.
pub struct ModbusClient {
    /// The underlying transport.
    transport: Box<dyn ModbusTransport>,
    /// TCP transaction id counter.
    transaction_id: u16,
}

impl ModbusClient {
    /// Creates a client over an already-constructed transport.
    ///
    /// The transport is used as-is; call [`connect`](Self::connect) to build
    /// and connect a transport from a [`ConnectionConfig`] instead.
    pub fn new(transport: Box<dyn ModbusTransport>) -> Self {
        Self {
            transport,
            transaction_id: 0,
        }
    }

    /// Connects to the configured device and returns a live session.
    ///
    /// A failed connect leaves no session behind; the caller retries by
    /// calling `connect` again.
    pub async fn connect(config: ConnectionConfig) -> ModbusResult<Self> {
        config.validate()?;

        let mut transport: Box<dyn ModbusTransport> = match config {
            ConnectionConfig::Tcp(tcp) => Box::new(TcpTransport::new(tcp)),
            ConnectionConfig::Rtu(rtu) => Box::new(RtuTransport::new(rtu)),
        };

        transport.connect().await?;
        Ok(Self::new(transport))
    }

    /// Executes one read request and returns the raw reading.
    ///
    /// The request is validated against the protocol limits before any
    /// bytes are written; an invalid request never touches the network.
    pub async fn read(&mut self, request: &ReadRequest) -> ModbusResult<RawReading> {
        request.validate()?;

        let unit_id = self.transport.unit_id();
        let pdu = codec::encode_read_request(request);

        let response_pdu = match self.transport.framing() {
            Framing::Tcp => {
                let transaction_id = self.next_transaction_id();
                let frame = codec::wrap_tcp(transaction_id, unit_id, &pdu);
                let reply = self.transport.exchange(&frame).await?;
                codec::unwrap_tcp(transaction_id, unit_id, &reply)?
            }
            Framing::Rtu => {
                let frame = codec::wrap_rtu(unit_id, &pdu);
                let reply = self.transport.exchange(&frame).await?;
                codec::unwrap_rtu(unit_id, &reply)?
            }
        };

        let reading = codec::decode_read_response(request, &response_pdu)?;

        tracing::debug!(
            request = %request,
            items = reading.len(),
            "Read completed"
        );

        Ok(reading)
    }

    /// Executes one read request and converts the reading for presentation.
    pub async fn read_value(
        &mut self,
        request: &ReadRequest,
        kind: ValueKind,
    ) -> ModbusResult<ScanValue> {
        let reading = self.read(request).await?;
        Ok(convert(&reading, kind)?)
    }

    /// Closes the session, releasing the transport handle.
    ///
    /// Idempotent: closing an already-closed session is a no-op.
    pub async fn close(&mut self) -> ModbusResult<()> {
        self.transport.disconnect().await
    }

    /// Returns `true` if the session is connected.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Returns the current transport state.
    pub fn state(&self) -> TransportState {
        self.transport.state()
    }

    /// Returns the unit ID this session addresses.
    pub fn unit_id(&self) -> u8 {
        self.transport.unit_id()
    }

    /// Returns a display name for the underlying transport.
    pub fn display_name(&self) -> String {
        self.transport.display_name()
    }

    fn next_transaction_id(&mut self) -> u16 {
        self.transaction_id = self.transaction_id.wrapping_add(1);
        self.transaction_id
    }
}

impl std::fmt::Debug for ModbusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModbusClient")
            .field("transport", &self.transport.display_name())
            .field("state", &self.transport.state())
            .field("transaction_id", &self.transaction_id)
            .finish()
    }
}
