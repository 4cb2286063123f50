// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Abstract transport layer for Modbus communication.
//!
//! This module defines the [`ModbusTransport`] trait that provides a
//! unified byte-level interface for both TCP and RTU transports. Framing
//! itself lives in [`crate::codec`]; a transport only moves whole frames.

use async_trait::async_trait;
use std::fmt;

use crate::error::ModbusResult;

// =============================================================================
// TransportState
// =============================================================================

/// Connection state of a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportState {
    /// Transport is disconnected.
    Disconnected,
    /// Transport is connecting.
    Connecting,
    /// Transport is connected and ready.
    Connected,
    /// Transport failed at the connection level and needs an explicit
    /// reconnect.
    Error,
    /// Transport was closed by the caller.
    Closed,
}

impl TransportState {
    /// Returns `true` if the transport is connected.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Returns `true` if the transport can accept operations.
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
            Self::Closed => "closed",
        };
        write!(f, "{}", s)
    }
}

impl Default for TransportState {
    fn default() -> Self {
        Self::Disconnected
    }
}

// =============================================================================
// Framing
// =============================================================================

/// The wire framing a transport speaks.
///
/// The client picks the matching codec wrapping for each request based on
/// this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Framing {
    /// Modbus TCP: MBAP header + PDU.
    Tcp,
    /// Modbus RTU: unit id + PDU + CRC-16.
    Rtu,
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "tcp"),
            Self::Rtu => write!(f, "rtu"),
        }
    }
}

// =============================================================================
// ModbusTransport Trait
// =============================================================================

/// Abstract transport layer for Modbus communication.
///
/// This trait provides a unified interface for both TCP and RTU transports,
/// abstracting away the underlying connection details. A transport owns
/// exactly one physical resource (socket or serial line) and moves whole
/// frames: [`exchange`](Self::exchange) writes the full request and then
/// accumulates reads until a complete response frame is assembled or the
/// configured response timeout elapses.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`. All operations take `&mut self`,
/// so access through an owning client is serialized by construction: at
/// most one exchange is in flight per transport.
#[async_trait]
pub trait ModbusTransport: Send + Sync {
    /// Establishes a connection to the Modbus device.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established; no handle
    /// is retained in that case.
    async fn connect(&mut self) -> ModbusResult<()>;

    /// Disconnects from the Modbus device.
    ///
    /// Idempotent: closing an already-closed or never-opened transport is a
    /// no-op.
    async fn disconnect(&mut self) -> ModbusResult<()>;

    /// Sends a request frame and reads back one complete response frame.
    ///
    /// The request is written atomically; the response is accumulated from
    /// partial reads until the framing-declared length is reached. The
    /// configured response timeout bounds the whole read.
    async fn exchange(&mut self, request: &[u8]) -> ModbusResult<Vec<u8>>;

    /// Returns `true` if the transport is connected.
    fn is_connected(&self) -> bool;

    /// Returns the current transport state.
    fn state(&self) -> TransportState;

    /// Returns the wire framing this transport speaks.
    fn framing(&self) -> Framing;

    /// Returns the unit ID (slave address).
    fn unit_id(&self) -> u8;

    /// Returns a display name for this transport.
    fn display_name(&self) -> String;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_state() {
        assert!(TransportState::Connected.is_connected());
        assert!(!TransportState::Disconnected.is_connected());

        assert!(TransportState::Connected.is_operational());
        assert!(!TransportState::Connecting.is_operational());
        assert!(!TransportState::Error.is_operational());
        assert!(!TransportState::Closed.is_operational());
    }

    #[test]
    fn test_transport_state_display() {
        assert_eq!(TransportState::Connected.to_string(), "connected");
        assert_eq!(TransportState::Closed.to_string(), "closed");
        assert_eq!(TransportState::default(), TransportState::Disconnected);
    }

    #[test]
    fn test_framing_display() {
        assert_eq!(Framing::Tcp.to_string(), "tcp");
        assert_eq!(Framing::Rtu.to_string(), "rtu");
    }
}
