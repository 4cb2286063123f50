// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Modbus TCP transport implementation.
//!
//! This module provides the TCP transport for Modbus communication over a
//! `tokio` stream socket. Frames are assembled from the MBAP header's
//! declared length, accumulating partial reads until the response is
//! complete or the response timeout elapses.

use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::codec;
use crate::error::{ConnectionError, ModbusError, ModbusResult, ProtocolError, TimeoutError};
use crate::types::TcpConfig;

use super::transport::{Framing, ModbusTransport, TransportState};

// =============================================================================
// TcpTransport
// =============================================================================

/// Modbus TCP transport.
///
/// This transport provides:
/// - Connection management with configurable timeouts
/// - Host resolution (IP literal first, then DNS)
/// - MBAP-length-driven response frame assembly
/// - Comprehensive error mapping
///
/// # Example
///
/// ```rust,ignore
/// use modscan::client::{ModbusTransport, TcpTransport};
/// use modscan::types::TcpConfig;
///
/// let config = TcpConfig::builder()
///     .host("192.168.1.100")
///     .port(502)
///     .unit_id(1)
///     .build()?;
///
/// let mut transport = TcpTransport::new(config);
/// transport.connect().await?;
/// ```
pub struct TcpTransport {
    /// Configuration.
    config: TcpConfig,
    /// The connected stream, if any.
    stream: Option<TcpStream>,
    /// Current state.
    state: TransportState,
}

impl TcpTransport {
    /// Creates a new TCP transport with the given configuration.
    pub fn new(config: TcpConfig) -> Self {
        Self {
            config,
            stream: None,
            state: TransportState::Disconnected,
        }
    }

    /// Creates a simple TCP transport with host and port.
    pub fn simple(host: impl Into<String>, port: u16) -> Self {
        Self::new(TcpConfig::with_port(host, port))
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &TcpConfig {
        &self.config
    }

    /// Returns the socket address.
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Resolves the socket address.
    async fn resolve_address(&self) -> ModbusResult<SocketAddr> {
        let addr_str = self.config.socket_addr();

        // Try to parse as IP:port first
        if let Ok(addr) = addr_str.parse::<SocketAddr>() {
            return Ok(addr);
        }

        // Try DNS resolution
        let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&addr_str)
            .await
            .map_err(|e| {
                ModbusError::connection(ConnectionError::DnsResolutionFailed {
                    hostname: self.config.host.clone(),
                    source: Some(e),
                })
            })?
            .collect();

        addrs
            .into_iter()
            .next()
            .ok_or_else(|| ModbusError::connection(ConnectionError::dns_failed(&self.config.host)))
    }

    /// Maps an I/O failure during an exchange, marking the transport as
    /// needing an explicit reconnect.
    fn fail(&mut self, error: std::io::Error) -> ModbusError {
        self.stream = None;
        self.state = TransportState::Error;
        ModbusError::connection(ConnectionError::from(error))
    }

    /// Reads one complete MBAP frame from the stream.
    async fn read_frame(stream: &mut TcpStream) -> std::io::Result<Result<Vec<u8>, ModbusError>> {
        let mut header = [0u8; codec::MBAP_HEADER_LEN];
        stream.read_exact(&mut header).await?;

        let total = codec::tcp_frame_len(&header);
        if total > codec::MBAP_HEADER_LEN - 1 + codec::MAX_PDU_LEN + 1 {
            return Ok(Err(ModbusError::protocol(ProtocolError::FrameTooLong {
                max: codec::MBAP_HEADER_LEN - 1 + codec::MAX_PDU_LEN + 1,
                actual: total,
            })));
        }
        if total <= codec::MBAP_HEADER_LEN {
            return Ok(Err(ModbusError::protocol(
                ProtocolError::invalid_mbap_header("declared length carries no PDU"),
            )));
        }

        let mut frame = vec![0u8; total];
        frame[..codec::MBAP_HEADER_LEN].copy_from_slice(&header);
        stream
            .read_exact(&mut frame[codec::MBAP_HEADER_LEN..])
            .await?;

        Ok(Ok(frame))
    }
}

#[async_trait]
impl ModbusTransport for TcpTransport {
    async fn connect(&mut self) -> ModbusResult<()> {
        if self.state == TransportState::Connected {
            return Ok(());
        }

        self.state = TransportState::Connecting;

        let socket_addr = match self.resolve_address().await {
            Ok(addr) => addr,
            Err(e) => {
                self.state = TransportState::Disconnected;
                return Err(e);
            }
        };

        let connected = timeout(self.config.connect_timeout, TcpStream::connect(socket_addr))
            .await
            .map_err(|_| {
                ModbusError::connection(ConnectionError::timed_out(
                    &self.config.host,
                    self.config.port,
                    self.config.connect_timeout,
                ))
            })
            .and_then(|result| {
                result.map_err(|e| {
                    ModbusError::connection(ConnectionError::refused_with(
                        &self.config.host,
                        self.config.port,
                        e,
                    ))
                })
            });

        let stream = match connected {
            Ok(stream) => stream,
            Err(e) => {
                self.state = TransportState::Disconnected;
                return Err(e);
            }
        };

        if self.config.tcp_nodelay {
            stream.set_nodelay(true).ok();
        }

        self.stream = Some(stream);
        self.state = TransportState::Connected;

        tracing::info!(
            host = %self.config.host,
            port = self.config.port,
            unit_id = self.config.unit_id,
            "Connected to Modbus TCP device"
        );

        Ok(())
    }

    async fn disconnect(&mut self) -> ModbusResult<()> {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                tracing::warn!(error = %e, "Error shutting down Modbus TCP stream");
            }

            tracing::debug!(
                host = %self.config.host,
                port = self.config.port,
                "Disconnected from Modbus TCP device"
            );
        }

        self.state = TransportState::Closed;
        Ok(())
    }

    async fn exchange(&mut self, request: &[u8]) -> ModbusResult<Vec<u8>> {
        let response_timeout = self.config.response_timeout;

        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| ModbusError::connection(ConnectionError::NotConnected))?;

        if let Err(e) = stream.write_all(request).await {
            return Err(self.fail(e));
        }

        let read = timeout(response_timeout, Self::read_frame(stream)).await;

        match read {
            Err(_) => {
                // Timed out: the session stays open, a late reply is
                // rejected by the transaction-id echo on the next read.
                Err(ModbusError::timeout(TimeoutError::response(response_timeout)))
            }
            Ok(Err(io_error)) => Err(self.fail(io_error)),
            Ok(Ok(framed)) => framed,
        }
    }

    fn is_connected(&self) -> bool {
        self.state == TransportState::Connected
    }

    fn state(&self) -> TransportState {
        self.state
    }

    fn framing(&self) -> Framing {
        Framing::Tcp
    }

    fn unit_id(&self) -> u8 {
        self.config.unit_id
    }

    fn display_name(&self) -> String {
        format!(
            "Modbus TCP {}:{} (unit {})",
            self.config.host, self.config.port, self.config.unit_id
        )
    }
}

impl std::fmt::Debug for TcpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpTransport")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("unit_id", &self.config.unit_id)
            .field("state", &self.state)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_constructor() {
        let transport = TcpTransport::simple("127.0.0.1", 502);
        assert_eq!(transport.config().host, "127.0.0.1");
        assert_eq!(transport.config().port, 502);
        assert_eq!(transport.state(), TransportState::Disconnected);
        assert_eq!(transport.framing(), Framing::Tcp);
    }

    #[test]
    fn test_socket_addr() {
        let transport = TcpTransport::simple("192.168.1.100", 502);
        assert_eq!(transport.socket_addr(), "192.168.1.100:502");
    }

    #[test]
    fn test_display_name() {
        let config = TcpConfig::builder()
            .host("plc.local")
            .port(502)
            .unit_id(5)
            .build()
            .unwrap();
        let transport = TcpTransport::new(config);
        assert_eq!(transport.display_name(), "Modbus TCP plc.local:502 (unit 5)");
    }

    #[tokio::test]
    async fn test_exchange_requires_connection() {
        let mut transport = TcpTransport::simple("127.0.0.1", 502);
        let result = transport.exchange(&[0x00]).await;
        assert!(matches!(
            result,
            Err(ModbusError::Connection(ConnectionError::NotConnected))
        ));
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let mut transport = TcpTransport::simple("127.0.0.1", 502);
        assert!(transport.disconnect().await.is_ok());
        assert!(transport.disconnect().await.is_ok());
        assert_eq!(transport.state(), TransportState::Closed);
    }

    #[test]
    fn test_debug_impl() {
        let transport = TcpTransport::simple("127.0.0.1", 502);
        let debug_str = format!("{:?}", transport);
        assert!(debug_str.contains("127.0.0.1"));
        assert!(debug_str.contains("502"));
    }
}
