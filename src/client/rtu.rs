// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Modbus RTU transport implementation.
//!
//! This module provides the RTU (serial) transport for Modbus communication
//! using the `tokio-serial` crate.
//!
//! # Features
//!
//! - Serial port communication with configurable line parameters
//! - Automatic inter-frame delay per the Modbus RTU specification
//! - Incremental response assembly driven by the expected frame length
//! - Comprehensive error handling
//!
//! # Example
//!
//! ```rust,ignore
//! use modscan::client::{ModbusTransport, RtuTransport};
//! use modscan::types::RtuConfig;
//!
//! let config = RtuConfig::builder()
//!     .port("/dev/ttyUSB0")
//!     .default_9600_8n1()
//!     .unit_id(1)
//!     .build()?;
//!
//! let mut transport = RtuTransport::new(config);
//! transport.connect().await?;
//! ```

use std::time::Instant;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tokio_serial::{
    DataBits as SerialDataBits, Parity as SerialParity, SerialPortBuilderExt,
    SerialStream, StopBits as SerialStopBits,
};

use crate::codec;
use crate::error::{ConnectionError, ModbusError, ModbusResult, TimeoutError};
use crate::types::{DataBits, Parity, RtuConfig, StopBits};

use super::transport::{Framing, ModbusTransport, TransportState};

// =============================================================================
// RtuTransport
// =============================================================================

/// Modbus RTU transport over a serial line.
///
/// This transport provides:
/// - Serial port communication via `tokio-serial`
/// - Configurable baud rate, parity, stop bits (8N1 default)
/// - Silent-interval enforcement between frames (3.5 character times)
/// - Response assembly from partial reads
pub struct RtuTransport {
    /// Configuration.
    config: RtuConfig,
    /// The open serial stream, if any.
    port: Option<SerialStream>,
    /// Current state.
    state: TransportState,
    /// Completion time of the previous exchange, for gap enforcement.
    last_exchange: Option<Instant>,
}

impl RtuTransport {
    /// Creates a new RTU transport with the given configuration.
    pub fn new(config: RtuConfig) -> Self {
        Self {
            config,
            port: None,
            state: TransportState::Disconnected,
            last_exchange: None,
        }
    }

    /// Creates a simple RTU transport with port and default settings (9600 8N1).
    pub fn simple(port: impl Into<String>) -> Self {
        Self::new(RtuConfig::new(port))
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &RtuConfig {
        &self.config
    }

    /// Returns the serial port path.
    pub fn port(&self) -> &str {
        &self.config.port
    }

    /// Converts DataBits to tokio-serial DataBits.
    fn convert_data_bits(bits: DataBits) -> SerialDataBits {
        match bits {
            DataBits::Seven => SerialDataBits::Seven,
            DataBits::Eight => SerialDataBits::Eight,
        }
    }

    /// Converts Parity to tokio-serial Parity.
    fn convert_parity(parity: Parity) -> SerialParity {
        match parity {
            Parity::None => SerialParity::None,
            Parity::Odd => SerialParity::Odd,
            Parity::Even => SerialParity::Even,
        }
    }

    /// Converts StopBits to tokio-serial StopBits.
    fn convert_stop_bits(bits: StopBits) -> SerialStopBits {
        match bits {
            StopBits::One => SerialStopBits::One,
            StopBits::Two => SerialStopBits::Two,
        }
    }

    /// Maps a serial open failure to a connection error.
    fn map_open_error(&self, e: tokio_serial::Error) -> ConnectionError {
        match e.kind {
            tokio_serial::ErrorKind::NoDevice => {
                ConnectionError::serial_not_found(&self.config.port)
            }
            tokio_serial::ErrorKind::InvalidInput => ConnectionError::SerialConfigurationFailed {
                port: self.config.port.clone(),
                message: e.to_string(),
            },
            tokio_serial::ErrorKind::Io(io_kind) => match io_kind {
                std::io::ErrorKind::PermissionDenied => {
                    ConnectionError::serial_access_denied(&self.config.port)
                }
                std::io::ErrorKind::NotFound => {
                    ConnectionError::serial_not_found(&self.config.port)
                }
                _ => ConnectionError::SerialConfigurationFailed {
                    port: self.config.port.clone(),
                    message: e.to_string(),
                },
            },
            _ => ConnectionError::SerialConfigurationFailed {
                port: self.config.port.clone(),
                message: e.to_string(),
            },
        }
    }

    /// Marks the transport failed after an I/O error mid-exchange.
    fn fail(&mut self, error: std::io::Error) -> ModbusError {
        self.port = None;
        self.state = TransportState::Error;
        ModbusError::connection(ConnectionError::from(error))
    }

    /// Waits out the silent interval between frames if the previous exchange
    /// finished too recently.
    async fn enforce_inter_frame_gap(&self) {
        if let Some(last) = self.last_exchange {
            let gap = self.config.calculated_inter_frame_delay();
            let elapsed = last.elapsed();
            if elapsed < gap {
                tokio::time::sleep(gap - elapsed).await;
            }
        }
    }

    /// Reads one complete RTU frame, accumulating partial reads until the
    /// expected length (derived from the function code and byte count) is
    /// buffered.
    async fn read_frame(port: &mut SerialStream) -> std::io::Result<Vec<u8>> {
        let mut frame: Vec<u8> = Vec::with_capacity(8);
        let mut chunk = [0u8; 256];

        loop {
            let n = port.read(&mut chunk).await?;
            if n == 0 {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "serial line closed mid-frame",
                ));
            }
            frame.extend_from_slice(&chunk[..n]);

            if let Some(expected) = codec::rtu_response_len(&frame) {
                if frame.len() >= expected {
                    frame.truncate(expected);
                    return Ok(frame);
                }
            }
        }
    }
}

#[async_trait]
impl ModbusTransport for RtuTransport {
    async fn connect(&mut self) -> ModbusResult<()> {
        if self.state == TransportState::Connected {
            return Ok(());
        }

        self.state = TransportState::Connecting;

        let builder = tokio_serial::new(&self.config.port, self.config.baud_rate)
            .data_bits(Self::convert_data_bits(self.config.data_bits))
            .parity(Self::convert_parity(self.config.parity))
            .stop_bits(Self::convert_stop_bits(self.config.stop_bits));

        let port = match builder.open_native_async() {
            Ok(port) => port,
            Err(e) => {
                self.state = TransportState::Disconnected;
                return Err(ModbusError::connection(self.map_open_error(e)));
            }
        };

        self.port = Some(port);
        self.state = TransportState::Connected;
        self.last_exchange = None;

        tracing::info!(
            port = %self.config.port,
            baud_rate = self.config.baud_rate,
            unit_id = self.config.unit_id,
            "Connected to Modbus RTU device"
        );

        Ok(())
    }

    async fn disconnect(&mut self) -> ModbusResult<()> {
        if self.port.take().is_some() {
            tracing::debug!(
                port = %self.config.port,
                "Disconnected from Modbus RTU device"
            );
        }

        self.state = TransportState::Closed;
        Ok(())
    }

    async fn exchange(&mut self, request: &[u8]) -> ModbusResult<Vec<u8>> {
        self.enforce_inter_frame_gap().await;

        let response_timeout = self.config.response_timeout;

        let port = self
            .port
            .as_mut()
            .ok_or_else(|| ModbusError::connection(ConnectionError::NotConnected))?;

        if let Err(e) = port.write_all(request).await {
            return Err(self.fail(e));
        }

        let read = timeout(response_timeout, Self::read_frame(port)).await;
        self.last_exchange = Some(Instant::now());

        match read {
            Err(_) => Err(ModbusError::timeout(TimeoutError::response(response_timeout))),
            Ok(Err(io_error)) => Err(self.fail(io_error)),
            Ok(Ok(frame)) => Ok(frame),
        }
    }

    fn is_connected(&self) -> bool {
        self.state == TransportState::Connected
    }

    fn state(&self) -> TransportState {
        self.state
    }

    fn framing(&self) -> Framing {
        Framing::Rtu
    }

    fn unit_id(&self) -> u8 {
        self.config.unit_id
    }

    fn display_name(&self) -> String {
        format!(
            "Modbus RTU {} @{}bps (unit {})",
            self.config.port, self.config.baud_rate, self.config.unit_id
        )
    }
}

impl std::fmt::Debug for RtuTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RtuTransport")
            .field("port", &self.config.port)
            .field("baud_rate", &self.config.baud_rate)
            .field("unit_id", &self.config.unit_id)
            .field("state", &self.state)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
