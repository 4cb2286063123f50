// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Core types for the Modbus master engine.
//!
//! This module provides the type definitions the rest of the crate is built
//! on:
//!
//! - **RegisterType**: The four readable Modbus register types with metadata
//! - **ValueKind**: Presentation formats for decoded register payloads
//! - **ReadRequest**: A validated read request
//! - **RawReading**: The raw payload of a successful read
//! - **TcpConfig / RtuConfig / ConnectionConfig**: Connection configuration
//!   with builders and serde support
//!
//! # Examples
//!
//! ```
//! use modscan::types::{ReadRequest, RegisterType, TcpConfig};
//!
//! let request = ReadRequest::holding_registers(100, 10);
//! assert_eq!(request.register_type, RegisterType::HoldingRegister);
//! assert!(request.validate().is_ok());
//!
//! let config = TcpConfig::builder()
//!     .host("192.168.1.100")
//!     .port(502)
//!     .unit_id(1)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.socket_addr(), "192.168.1.100:502");
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, ModbusError, RequestError};

// =============================================================================
// RegisterType
// =============================================================================

/// Modbus register type.
///
/// Modbus defines four readable register classes, each with its own function
/// code and per-request quantity limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterType {
    /// Coil (read/write, 1 bit). Read via function code 0x01.
    Coil,

    /// Discrete Input (read-only, 1 bit). Read via function code 0x02.
    DiscreteInput,

    /// Holding Register (read/write, 16 bits). Read via function code 0x03.
    #[default]
    HoldingRegister,

    /// Input Register (read-only, 16 bits). Read via function code 0x04.
    InputRegister,
}

impl RegisterType {
    /// Returns `true` if this is a bit-type register (1-bit).
    #[inline]
    pub const fn is_bit(&self) -> bool {
        matches!(self, Self::Coil | Self::DiscreteInput)
    }

    /// Returns `true` if this is a word-type register (16-bit).
    #[inline]
    pub const fn is_word(&self) -> bool {
        matches!(self, Self::HoldingRegister | Self::InputRegister)
    }

    /// Returns the function code for reading this register type.
    #[inline]
    pub const fn read_function_code(&self) -> u8 {
        match self {
            Self::Coil => 0x01,
            Self::DiscreteInput => 0x02,
            Self::HoldingRegister => 0x03,
            Self::InputRegister => 0x04,
        }
    }

    /// Returns the maximum number of items readable in a single request.
    #[inline]
    pub const fn max_read_count(&self) -> u16 {
        match self {
            Self::Coil | Self::DiscreteInput => 2000,
            Self::HoldingRegister | Self::InputRegister => 125,
        }
    }

    /// Returns the short name for this register type.
    pub const fn short_name(&self) -> &'static str {
        match self {
            Self::Coil => "C",
            Self::DiscreteInput => "DI",
            Self::InputRegister => "IR",
            Self::HoldingRegister => "HR",
        }
    }

    /// Returns the full name for this register type.
    pub const fn full_name(&self) -> &'static str {
        match self {
            Self::Coil => "Coil",
            Self::DiscreteInput => "Discrete Input",
            Self::InputRegister => "Input Register",
            Self::HoldingRegister => "Holding Register",
        }
    }

    /// All register types as an array.
    pub const ALL: [RegisterType; 4] = [
        Self::Coil,
        Self::DiscreteInput,
        Self::HoldingRegister,
        Self::InputRegister,
    ];
}

impl fmt::Display for RegisterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

impl FromStr for RegisterType {
    type Err = ModbusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "C" | "COIL" | "COILS" => Ok(Self::Coil),
            "DI" | "DISCRETE" | "DISCRETE_INPUT" | "DISCRETE_INPUTS" => Ok(Self::DiscreteInput),
            "IR" | "INPUT" | "INPUT_REGISTER" | "INPUT_REGISTERS" => Ok(Self::InputRegister),
            "HR" | "HOLDING" | "HOLDING_REGISTER" | "HOLDING_REGISTERS" => {
                Ok(Self::HoldingRegister)
            }
            _ => Err(ModbusError::configuration(
                ConfigurationError::invalid_register_type(
                    s,
                    "Expected: C/DI/IR/HR or Coil/DiscreteInput/InputRegister/HoldingRegister",
                ),
            )),
        }
    }
}

// =============================================================================
// ValueKind
// =============================================================================

/// Presentation format for a decoded reading.
///
/// Registers are 16-bit words; these kinds control how the word sequence is
/// interpreted for display. `Float32` consumes two registers per value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Each word as an unsigned 16-bit integer.
    #[default]
    UInt16,

    /// Each word reinterpreted as a two's-complement signed 16-bit integer.
    Int16,

    /// Word pairs reinterpreted as IEEE 754 single-precision floats,
    /// most-significant word first.
    Float32,

    /// Each word as a `0x`-prefixed hexadecimal literal.
    Hex,

    /// All words as packed ASCII text, high byte first.
    Ascii,
}

impl ValueKind {
    /// Returns the number of registers consumed per semantic value.
    #[inline]
    pub const fn words_per_value(&self) -> u16 {
        match self {
            Self::Float32 => 2,
            _ => 1,
        }
    }

    /// Returns `true` if this kind can render a bit-function reading.
    ///
    /// Bit readings carry one flag per address; integer and hex kinds render
    /// them as 0/1, while `Float32` and `Ascii` have no meaning for bits.
    #[inline]
    pub const fn supports_bits(&self) -> bool {
        matches!(self, Self::UInt16 | Self::Int16 | Self::Hex)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UInt16 => "uint16",
            Self::Int16 => "int16",
            Self::Float32 => "float32",
            Self::Hex => "hex",
            Self::Ascii => "ascii",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ValueKind {
    type Err = ModbusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uint16" | "u16" | "ushort" => Ok(Self::UInt16),
            "int16" | "i16" | "short" => Ok(Self::Int16),
            "float32" | "f32" | "float" | "real" => Ok(Self::Float32),
            "hex" | "hexadecimal" => Ok(Self::Hex),
            "ascii" | "string" | "text" => Ok(Self::Ascii),
            _ => Err(ModbusError::configuration(
                ConfigurationError::invalid_data_type(s),
            )),
        }
    }
}

// =============================================================================
// ReadRequest
// =============================================================================

/// A single Modbus read request.
///
/// Immutable value, constructed per call. [`validate`](Self::validate) is
/// invoked by the client before any bytes touch the transport, so requests
/// the slave would reject never leave the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRequest {
    /// The register type to read.
    pub register_type: RegisterType,

    /// The starting address (0-based).
    pub address: u16,

    /// The number of items to read.
    pub quantity: u16,
}

impl ReadRequest {
    /// Creates a new read request.
    pub fn new(register_type: RegisterType, address: u16, quantity: u16) -> Self {
        Self {
            register_type,
            address,
            quantity,
        }
    }

    /// Creates a coil read request (FC 01).
    pub fn coils(address: u16, quantity: u16) -> Self {
        Self::new(RegisterType::Coil, address, quantity)
    }

    /// Creates a discrete input read request (FC 02).
    pub fn discrete_inputs(address: u16, quantity: u16) -> Self {
        Self::new(RegisterType::DiscreteInput, address, quantity)
    }

    /// Creates a holding register read request (FC 03).
    pub fn holding_registers(address: u16, quantity: u16) -> Self {
        Self::new(RegisterType::HoldingRegister, address, quantity)
    }

    /// Creates an input register read request (FC 04).
    pub fn input_registers(address: u16, quantity: u16) -> Self {
        Self::new(RegisterType::InputRegister, address, quantity)
    }

    /// Returns the function code for this request.
    #[inline]
    pub const fn function_code(&self) -> u8 {
        self.register_type.read_function_code()
    }

    /// Validates this request against the protocol's hard limits.
    ///
    /// Quantity must be 1-125 for register functions and 1-2000 for bit
    /// functions, and the address range must fit the 16-bit address space.
    pub fn validate(&self) -> Result<(), ModbusError> {
        let max = self.register_type.max_read_count();
        if self.quantity == 0 || self.quantity > max {
            return Err(ModbusError::request(RequestError::quantity_out_of_range(
                self.register_type.short_name(),
                self.quantity,
                1,
                max,
            )));
        }

        if self.address as u32 + self.quantity as u32 > 0x1_0000 {
            return Err(ModbusError::request(RequestError::address_range_overflow(
                self.address,
                self.quantity,
            )));
        }

        Ok(())
    }
}

impl fmt::Display for ReadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.register_type.short_name(),
            self.address,
            self.quantity
        )
    }
}

// =============================================================================
// RawReading
// =============================================================================

/// The raw payload of a successful read.
///
/// Bit functions (coils, discrete inputs) yield flags; register functions
/// yield 16-bit words. Length equals the requested quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawReading {
    /// Coil / discrete input flags, in address order.
    Bits(Vec<bool>),

    /// Holding / input register words, in address order.
    Words(Vec<u16>),
}

impl RawReading {
    /// Returns the number of items in this reading.
    pub fn len(&self) -> usize {
        match self {
            Self::Bits(bits) => bits.len(),
            Self::Words(words) => words.len(),
        }
    }

    /// Returns `true` if the reading is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if this is a bit reading.
    pub fn is_bits(&self) -> bool {
        matches!(self, Self::Bits(_))
    }

    /// Returns the words of a register reading, if any.
    pub fn as_words(&self) -> Option<&[u16]> {
        match self {
            Self::Words(words) => Some(words),
            Self::Bits(_) => None,
        }
    }

    /// Returns the flags of a bit reading, if any.
    pub fn as_bits(&self) -> Option<&[bool]> {
        match self {
            Self::Bits(bits) => Some(bits),
            Self::Words(_) => None,
        }
    }
}

// =============================================================================
// Serial Port Settings
// =============================================================================

/// Data bits configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DataBits {
    /// 7 data bits.
    Seven,
    /// 8 data bits (default, standard Modbus RTU).
    #[default]
    Eight,
}

impl DataBits {
    /// Returns the number of bits.
    pub const fn bits(&self) -> u8 {
        match self {
            Self::Seven => 7,
            Self::Eight => 8,
        }
    }
}

impl fmt::Display for DataBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Parity configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Parity {
    /// No parity (default, standard Modbus RTU).
    #[default]
    None,
    /// Odd parity.
    Odd,
    /// Even parity.
    Even,
}

impl Parity {
    /// Returns the number of parity bits.
    pub const fn bits(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Odd | Self::Even => 1,
        }
    }

    /// Returns the short character representation.
    pub const fn char(&self) -> char {
        match self {
            Self::None => 'N',
            Self::Odd => 'O',
            Self::Even => 'E',
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// Stop bits configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StopBits {
    /// 1 stop bit (default, standard Modbus RTU).
    #[default]
    One,
    /// 2 stop bits.
    Two,
}

impl StopBits {
    /// Returns the number of stop bits.
    pub const fn bits(&self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl fmt::Display for StopBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

// =============================================================================
// TcpConfig
// =============================================================================

/// Configuration for Modbus TCP connections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TcpConfig {
    /// Target host address.
    pub host: String,

    /// Target port (default: 502).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Unit ID / slave address (default: 1).
    #[serde(default = "default_unit_id")]
    pub unit_id: u8,

    /// Connection timeout.
    #[serde(default = "default_connect_timeout")]
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Response timeout per exchange.
    #[serde(default = "default_tcp_response_timeout")]
    #[serde(with = "humantime_serde")]
    pub response_timeout: Duration,

    /// Enable TCP_NODELAY.
    #[serde(default = "default_true")]
    pub tcp_nodelay: bool,
}

fn default_port() -> u16 {
    502
}

fn default_unit_id() -> u8 {
    1
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_tcp_response_timeout() -> Duration {
    Duration::from_secs(3)
}

// Serial slaves answer within a frame time or not at all.
fn default_rtu_response_timeout() -> Duration {
    Duration::from_secs(1)
}

fn default_true() -> bool {
    true
}

mod option_duration {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => {
                let s = humantime::format_duration(*d).to_string();
                s.serialize(serializer)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<String> = Option::deserialize(deserializer)?;
        match opt {
            Some(s) => {
                let d = humantime::parse_duration(&s).map_err(serde::de::Error::custom)?;
                Ok(Some(d))
            }
            None => Ok(None),
        }
    }
}

impl TcpConfig {
    /// Creates a new builder for TcpConfig.
    pub fn builder() -> TcpConfigBuilder {
        TcpConfigBuilder::default()
    }

    /// Creates a simple configuration with just host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    /// Creates configuration with host and port.
    pub fn with_port(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Returns the socket address string.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), ModbusError> {
        if self.host.is_empty() {
            return Err(ModbusError::configuration(ConfigurationError::missing_field(
                "host",
            )));
        }

        if self.unit_id == 0 {
            return Err(ModbusError::configuration(
                ConfigurationError::invalid_unit_id(0),
            ));
        }

        if self.connect_timeout.is_zero() || self.response_timeout.is_zero() {
            return Err(ModbusError::configuration(ConfigurationError::InvalidTimeout {
                duration: Duration::ZERO,
                reason: "Timeouts must be greater than 0".to_string(),
            }));
        }

        Ok(())
    }
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: default_port(),
            unit_id: default_unit_id(),
            connect_timeout: default_connect_timeout(),
            response_timeout: default_tcp_response_timeout(),
            tcp_nodelay: true,
        }
    }
}

/// Builder for TcpConfig.
#[derive(Debug, Default)]
pub struct TcpConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    unit_id: Option<u8>,
    connect_timeout: Option<Duration>,
    response_timeout: Option<Duration>,
    tcp_nodelay: Option<bool>,
}

impl TcpConfigBuilder {
    /// Sets the host address.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the unit ID.
    pub fn unit_id(mut self, unit_id: u8) -> Self {
        self.unit_id = Some(unit_id);
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the response timeout.
    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = Some(timeout);
        self
    }

    /// Sets TCP_NODELAY.
    pub fn tcp_nodelay(mut self, nodelay: bool) -> Self {
        self.tcp_nodelay = Some(nodelay);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> Result<TcpConfig, ModbusError> {
        let host = self
            .host
            .ok_or_else(|| ModbusError::configuration(ConfigurationError::missing_field("host")))?;

        let config = TcpConfig {
            host,
            port: self.port.unwrap_or_else(default_port),
            unit_id: self.unit_id.unwrap_or_else(default_unit_id),
            connect_timeout: self.connect_timeout.unwrap_or_else(default_connect_timeout),
            response_timeout: self
                .response_timeout
                .unwrap_or_else(default_tcp_response_timeout),
            tcp_nodelay: self.tcp_nodelay.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// RtuConfig
// =============================================================================

/// Configuration for Modbus RTU connections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RtuConfig {
    /// Serial port path (e.g., "/dev/ttyUSB0" or "COM3").
    pub port: String,

    /// Baud rate (default: 9600).
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Data bits.
    #[serde(default)]
    pub data_bits: DataBits,

    /// Parity.
    #[serde(default)]
    pub parity: Parity,

    /// Stop bits.
    #[serde(default)]
    pub stop_bits: StopBits,

    /// Unit ID / slave address (default: 1).
    #[serde(default = "default_unit_id")]
    pub unit_id: u8,

    /// Response timeout per exchange.
    #[serde(default = "default_rtu_response_timeout")]
    #[serde(with = "humantime_serde")]
    pub response_timeout: Duration,

    /// Inter-frame delay (3.5 character times).
    /// If not set, calculated from the line settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    #[serde(with = "option_duration")]
    pub inter_frame_delay: Option<Duration>,
}

fn default_baud_rate() -> u32 {
    9600
}

impl RtuConfig {
    /// Creates a new builder for RtuConfig.
    pub fn builder() -> RtuConfigBuilder {
        RtuConfigBuilder::default()
    }

    /// Creates a simple configuration with just port (9600 8N1).
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Default::default()
        }
    }

    /// Calculates the inter-frame delay based on the line settings.
    ///
    /// Per Modbus specification, the silent interval between frames is 3.5
    /// character times. At 9600 baud with 11 bits per character this is
    /// roughly 4 ms.
    pub fn calculated_inter_frame_delay(&self) -> Duration {
        if let Some(delay) = self.inter_frame_delay {
            return delay;
        }

        let bits_per_char = 1 + // Start bit
            self.data_bits.bits() +
            self.parity.bits() +
            self.stop_bits.bits();

        let delay_us = (3.5 * bits_per_char as f64 / self.baud_rate as f64 * 1_000_000.0) as u64;

        // Minimum 1ms to account for OS scheduling
        Duration::from_micros(delay_us.max(1000))
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), ModbusError> {
        if self.port.is_empty() {
            return Err(ModbusError::configuration(ConfigurationError::missing_field(
                "port",
            )));
        }

        const VALID_BAUD_RATES: &[u32] = &[
            1200, 2400, 4800, 9600, 14400, 19200, 38400, 57600, 115200,
        ];

        if !VALID_BAUD_RATES.contains(&self.baud_rate) {
            return Err(ModbusError::configuration(
                ConfigurationError::InvalidBaudRate {
                    baud_rate: self.baud_rate,
                },
            ));
        }

        if self.unit_id == 0 {
            return Err(ModbusError::configuration(
                ConfigurationError::invalid_unit_id(0),
            ));
        }

        if self.response_timeout.is_zero() {
            return Err(ModbusError::configuration(ConfigurationError::InvalidTimeout {
                duration: self.response_timeout,
                reason: "Response timeout must be greater than 0".to_string(),
            }));
        }

        Ok(())
    }
}

impl Default for RtuConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: default_baud_rate(),
            data_bits: DataBits::default(),
            parity: Parity::default(),
            stop_bits: StopBits::default(),
            unit_id: default_unit_id(),
            response_timeout: default_rtu_response_timeout(),
            inter_frame_delay: None,
        }
    }
}

/// Builder for RtuConfig.
#[derive(Debug, Default)]
pub struct RtuConfigBuilder {
    port: Option<String>,
    baud_rate: Option<u32>,
    data_bits: Option<DataBits>,
    parity: Option<Parity>,
    stop_bits: Option<StopBits>,
    unit_id: Option<u8>,
    response_timeout: Option<Duration>,
    inter_frame_delay: Option<Duration>,
}

impl RtuConfigBuilder {
    /// Sets the serial port.
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Sets the baud rate.
    pub fn baud_rate(mut self, rate: u32) -> Self {
        self.baud_rate = Some(rate);
        self
    }

    /// Sets the data bits.
    pub fn data_bits(mut self, bits: DataBits) -> Self {
        self.data_bits = Some(bits);
        self
    }

    /// Sets the parity.
    pub fn parity(mut self, parity: Parity) -> Self {
        self.parity = Some(parity);
        self
    }

    /// Sets the stop bits.
    pub fn stop_bits(mut self, bits: StopBits) -> Self {
        self.stop_bits = Some(bits);
        self
    }

    /// Sets the unit ID.
    pub fn unit_id(mut self, id: u8) -> Self {
        self.unit_id = Some(id);
        self
    }

    /// Sets the response timeout.
    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = Some(timeout);
        self
    }

    /// Sets the inter-frame delay.
    pub fn inter_frame_delay(mut self, delay: Duration) -> Self {
        self.inter_frame_delay = Some(delay);
        self
    }

    /// Sets common RTU parameters: 9600/8/N/1.
    pub fn default_9600_8n1(self) -> Self {
        self.baud_rate(9600)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
    }

    /// Builds the configuration.
    pub fn build(self) -> Result<RtuConfig, ModbusError> {
        let port = self
            .port
            .ok_or_else(|| ModbusError::configuration(ConfigurationError::missing_field("port")))?;

        let config = RtuConfig {
            port,
            baud_rate: self.baud_rate.unwrap_or_else(default_baud_rate),
            data_bits: self.data_bits.unwrap_or_default(),
            parity: self.parity.unwrap_or_default(),
            stop_bits: self.stop_bits.unwrap_or_default(),
            unit_id: self.unit_id.unwrap_or_else(default_unit_id),
            response_timeout: self
                .response_timeout
                .unwrap_or_else(default_rtu_response_timeout),
            inter_frame_delay: self.inter_frame_delay,
        };

        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// ConnectionConfig (Unified)
// =============================================================================

/// Unified connection configuration for TCP or RTU.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConnectionConfig {
    /// Modbus TCP configuration.
    Tcp(TcpConfig),

    /// Modbus RTU configuration.
    Rtu(RtuConfig),
}

impl ConnectionConfig {
    /// Returns `true` if this is a TCP configuration.
    pub const fn is_tcp(&self) -> bool {
        matches!(self, Self::Tcp(_))
    }

    /// Returns `true` if this is an RTU configuration.
    pub const fn is_rtu(&self) -> bool {
        matches!(self, Self::Rtu(_))
    }

    /// Returns the unit ID.
    pub fn unit_id(&self) -> u8 {
        match self {
            Self::Tcp(c) => c.unit_id,
            Self::Rtu(c) => c.unit_id,
        }
    }

    /// Returns the response timeout.
    pub fn response_timeout(&self) -> Duration {
        match self {
            Self::Tcp(c) => c.response_timeout,
            Self::Rtu(c) => c.response_timeout,
        }
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), ModbusError> {
        match self {
            Self::Tcp(c) => c.validate(),
            Self::Rtu(c) => c.validate(),
        }
    }
}

impl From<TcpConfig> for ConnectionConfig {
    fn from(config: TcpConfig) -> Self {
        Self::Tcp(config)
    }
}

impl From<RtuConfig> for ConnectionConfig {
    fn from(config: RtuConfig) -> Self {
        Self::Rtu(config)
    }
}

// =============================================================================
// Tests
// =============================================================================
