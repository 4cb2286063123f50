// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # modscan
//!
//! Modbus TCP/RTU master engine for register scanning.
//!
//! This crate connects to a single Modbus slave device, issues read
//! requests for the four readable register classes, and converts raw
//! register payloads into presentation values, with:
//!
//! - **Modbus TCP**: MBAP framing over a `tokio` stream socket
//! - **Modbus RTU**: CRC-16 framing over a `tokio-serial` line
//! - **In-crate frame codec**: PDU construction, exception decoding,
//!   byte-count verification — no protocol crate underneath
//! - **Typed conversion**: uint16 / int16 / float32 / hex / ascii
//! - **Interval polling**: skip-if-pending ticks, cooperative stop
//!
//! Writes, diagnostics and the slave role are out of scope; the engine is
//! strictly a reading master.
//!
//! ## Architecture
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
//! │        (one session: validation, framing, response echo)        │
//! └─────────────────────────────────────────────────────────────────┘
//!                   │                          │
//!                   ▼                          ▼
//! ┌─────────────────────────────┐  ┌─────────────────────────────┐
//! │         FrameCodec          │  │       ModbusTransport       │
//! │  (PDU + MBAP/RTU framing)   │  │  (TcpTransport/RtuTransport)│
//! └─────────────────────────────┘  └─────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use tokio::sync::mpsc;
//! use modscan::client::{ModbusClient, Poller};
//! use modscan::types::{ConnectionConfig, ReadRequest, TcpConfig, ValueKind};
//!
//! // Connect
//! let config = ConnectionConfig::Tcp(
//!     TcpConfig::builder()
//!         .host("192.168.1.100")
//!         .port(502)
//!         .unit_id(1)
//!         .build()?,
//! );
//! let mut client = ModbusClient::connect(config).await?;
//!
//! // One-shot read with conversion
//! let value = client
//!     .read_value(&ReadRequest::holding_registers(0, 2), ValueKind::Float32)
//!     .await?;
//!
//! // Poll continuously
//! let (tx, mut rx) = mpsc::channel(16);
//! let handle = Poller::start(
//!     client,
//!     ReadRequest::holding_registers(0, 10),
//!     ValueKind::UInt16,
//!     Duration::from_secs(1),
//!     tx,
//! );
//! while let Some(sample) = rx.recv().await {
//!     println!("#{}: {:?}", sample.sequence, sample.result);
//! }
//! let mut client = handle.stop().await?;
//! client.close().await?;
//! ```
//!
//! ## Error Handling
//!
//! ```rust,ignore
//! use modscan::error::{ModbusError, ModbusResult};
//!
//! fn handle_error(result: ModbusResult<()>) {
//!     if let Err(error) = result {
//!         eprintln!("{} ({})", error.user_message(), error.category());
//!         if error.is_retryable() {
//!             // retry policy is the caller's call; the engine never retries
//!         }
//!     }
//! }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod codec;
pub mod error;
pub mod types;

pub use client::{
    convert, Framing, ModbusClient, ModbusTransport, PollHandle, PollSample, Poller,
    RtuTransport, ScanValue, TcpTransport, TransportState,
};
pub use error::{ModbusError, ModbusResult};
pub use types::{
    ConnectionConfig, RawReading, ReadRequest, RegisterType, RtuConfig, TcpConfig, ValueKind,
};
