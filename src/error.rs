// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Modbus master error types with comprehensive diagnostics.
//!
//! This module provides the error type hierarchy for every operation the
//! engine exposes, designed for:
//!
//! - **Diagnostics**: Detailed, structured error information
//! - **Recovery**: Distinguishing retryable from permanent failures
//! - **Presentation**: User-friendly messages for the calling shell
//!
//! # Error Categories
//!
//! ```text
//! ModbusError
//! ├── Connection    - TCP/RTU connection and I/O failures
//! ├── Protocol      - Exception responses, framing and echo violations
//! ├── Request       - Invalid read requests, rejected before any I/O
//! ├── Conversion    - Register-to-value conversion errors
//! ├── Configuration - Invalid connection settings
//! └── Timeout       - Connect/response deadline expiry
//! ```
//!
//! # Examples
//!
//! ```
//! use modscan::error::{ModbusError, ConnectionError};
//!
//! let error = ModbusError::connection(ConnectionError::refused("192.168.1.100", 502));
//!
//! assert!(error.is_retryable());
//! assert_eq!(error.category(), "connection");
//! ```

use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;
use tracing::Level;

// =============================================================================
// ModbusError - Main Error Type
// =============================================================================

/// The main error type for Modbus master operations.
///
/// This enum categorizes errors by their domain, making it easy to handle
/// specific error types while maintaining a unified interface.
#[derive(Debug, Error)]
pub enum ModbusError {
    /// Connection-related errors (TCP/RTU).
    #[error("{0}")]
    Connection(#[from] ConnectionError),

    /// Modbus protocol errors (exception codes, framing, response echo).
    #[error("{0}")]
    Protocol(#[from] ProtocolError),

    /// Request validation errors, detected before any I/O.
    #[error("{0}")]
    Request(#[from] RequestError),

    /// Data conversion errors.
    #[error("{0}")]
    Conversion(#[from] ConversionError),

    /// Configuration errors.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// Timeout errors.
    #[error("{0}")]
    Timeout(#[from] TimeoutError),
}

impl ModbusError {
    // =========================================================================
    // Factory Methods
    // =========================================================================

    /// Creates a connection error.
    #[inline]
    pub fn connection(error: ConnectionError) -> Self {
        Self::Connection(error)
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(error: ProtocolError) -> Self {
        Self::Protocol(error)
    }

    /// Creates a request validation error.
    #[inline]
    pub fn request(error: RequestError) -> Self {
        Self::Request(error)
    }

    /// Creates a conversion error.
    #[inline]
    pub fn conversion(error: ConversionError) -> Self {
        Self::Conversion(error)
    }

    /// Creates a configuration error.
    #[inline]
    pub fn configuration(error: ConfigurationError) -> Self {
        Self::Configuration(error)
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(error: TimeoutError) -> Self {
        Self::Timeout(error)
    }

    // =========================================================================
    // Convenience Factory Methods
    // =========================================================================

    /// Creates a not connected error.
    pub fn not_connected() -> Self {
        Self::Connection(ConnectionError::NotConnected)
    }

    /// Creates an exception response error.
    pub fn exception(function_code: u8, exception_code: u8) -> Self {
        Self::Protocol(ProtocolError::exception_response(function_code, exception_code))
    }

    /// Creates a response timeout error.
    pub fn response_timeout(duration: Duration) -> Self {
        Self::Timeout(TimeoutError::response(duration))
    }

    // =========================================================================
    // Error Properties
    // =========================================================================

    /// Returns `true` if this error is retryable.
    ///
    /// Retryable errors are typically transient issues that may succeed on a
    /// subsequent attempt. The engine itself never retries; this is a hint
    /// for the caller's retry policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(e) => e.is_retryable(),
            Self::Protocol(e) => e.is_retryable(),
            Self::Timeout(_) => true,
            Self::Request(_) | Self::Conversion(_) | Self::Configuration(_) => false,
        }
    }

    /// Returns the error category for logging and metrics.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::Protocol(_) => "protocol",
            Self::Request(_) => "request",
            Self::Conversion(_) => "conversion",
            Self::Configuration(_) => "configuration",
            Self::Timeout(_) => "timeout",
        }
    }

    /// Returns the severity level of this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Connection(e) => e.severity(),
            Self::Protocol(e) => e.severity(),
            Self::Request(_) => ErrorSeverity::Error,
            Self::Conversion(_) => ErrorSeverity::Error,
            Self::Configuration(_) => ErrorSeverity::Critical,
            Self::Timeout(_) => ErrorSeverity::Warning,
        }
    }

    /// Returns a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Connection(e) => e.user_message(),
            Self::Protocol(e) => e.user_message(),
            Self::Request(e) => e.user_message(),
            Self::Conversion(e) => e.user_message(),
            Self::Configuration(e) => e.user_message(),
            Self::Timeout(e) => e.user_message(),
        }
    }

    /// Returns the tracing level for this error.
    pub fn tracing_level(&self) -> Level {
        self.severity().to_tracing_level()
    }

    /// Logs this error with appropriate level and context.
    pub fn log(&self, context: &str) {
        match self.tracing_level() {
            Level::ERROR => tracing::error!(
                category = self.category(),
                context = context,
                retryable = self.is_retryable(),
                "{self}"
            ),
            Level::WARN => tracing::warn!(
                category = self.category(),
                context = context,
                retryable = self.is_retryable(),
                "{self}"
            ),
            _ => tracing::debug!(
                category = self.category(),
                context = context,
                retryable = self.is_retryable(),
                "{self}"
            ),
        }
    }
}

// =============================================================================
// ConnectionError
// =============================================================================

/// Connection-related errors for TCP and RTU.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// TCP connection refused.
    #[error("Connection refused to {host}:{port}")]
    Refused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
        /// Underlying error.
        #[source]
        source: Option<io::Error>,
    },

    /// TCP connection timed out.
    #[error("Connection timed out to {host}:{port} after {duration:?}")]
    TimedOut {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
        /// Timeout duration.
        duration: Duration,
    },

    /// DNS resolution failed.
    #[error("Failed to resolve hostname '{hostname}'")]
    DnsResolutionFailed {
        /// The hostname that failed to resolve.
        hostname: String,
        /// Underlying error.
        #[source]
        source: Option<io::Error>,
    },

    /// Serial port not found (RTU).
    #[error("Serial port not found: {port}")]
    SerialPortNotFound {
        /// Port path.
        port: String,
    },

    /// Serial port access denied (RTU).
    #[error("Serial port access denied: {port}")]
    SerialPortAccessDenied {
        /// Port path.
        port: String,
    },

    /// Serial port configuration error (RTU).
    #[error("Serial port configuration failed for '{port}': {message}")]
    SerialConfigurationFailed {
        /// Port path.
        port: String,
        /// Error message.
        message: String,
    },

    /// Connection closed unexpectedly.
    #[error("Connection closed unexpectedly")]
    Closed {
        /// Reason for closure.
        reason: Option<String>,
    },

    /// Not connected.
    #[error("Not connected to Modbus device")]
    NotConnected,

    /// Generic I/O error.
    #[error("I/O error: {message}")]
    Io {
        /// Error message.
        message: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl ConnectionError {
    /// Creates a connection refused error.
    pub fn refused(host: impl Into<String>, port: u16) -> Self {
        Self::Refused {
            host: host.into(),
            port,
            source: None,
        }
    }

    /// Creates a connection refused error with source.
    pub fn refused_with(host: impl Into<String>, port: u16, source: io::Error) -> Self {
        Self::Refused {
            host: host.into(),
            port,
            source: Some(source),
        }
    }

    /// Creates a connection timed out error.
    pub fn timed_out(host: impl Into<String>, port: u16, duration: Duration) -> Self {
        Self::TimedOut {
            host: host.into(),
            port,
            duration,
        }
    }

    /// Creates a DNS resolution failed error.
    pub fn dns_failed(hostname: impl Into<String>) -> Self {
        Self::DnsResolutionFailed {
            hostname: hostname.into(),
            source: None,
        }
    }

    /// Creates a serial port not found error.
    pub fn serial_not_found(port: impl Into<String>) -> Self {
        Self::SerialPortNotFound { port: port.into() }
    }

    /// Creates a serial port access denied error.
    pub fn serial_access_denied(port: impl Into<String>) -> Self {
        Self::SerialPortAccessDenied { port: port.into() }
    }

    /// Creates a connection closed error.
    pub fn closed(reason: Option<String>) -> Self {
        Self::Closed { reason }
    }

    /// Creates an I/O error.
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Returns `true` if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Refused { .. } => true,
            Self::TimedOut { .. } => true,
            Self::DnsResolutionFailed { .. } => true,
            Self::Closed { .. } => true,
            Self::NotConnected => true,
            Self::Io { source, .. } => {
                matches!(
                    source.kind(),
                    io::ErrorKind::ConnectionReset
                        | io::ErrorKind::ConnectionAborted
                        | io::ErrorKind::TimedOut
                        | io::ErrorKind::Interrupted
                )
            }
            Self::SerialPortNotFound { .. }
            | Self::SerialPortAccessDenied { .. }
            | Self::SerialConfigurationFailed { .. } => false,
        }
    }

    /// Returns the severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotConnected => ErrorSeverity::Warning,
            Self::TimedOut { .. } => ErrorSeverity::Warning,
            Self::Closed { .. } => ErrorSeverity::Warning,
            Self::SerialPortAccessDenied { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Returns a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Refused { host, port, .. } => {
                format!("Modbus 장비({}:{})에 연결할 수 없습니다", host, port)
            }
            Self::TimedOut { host, port, .. } => {
                format!("Modbus 장비({}:{}) 연결 시간 초과", host, port)
            }
            Self::DnsResolutionFailed { hostname, .. } => {
                format!("호스트명 '{}' 조회 실패", hostname)
            }
            Self::SerialPortNotFound { port } => {
                format!("시리얼 포트를 찾을 수 없음: {}", port)
            }
            Self::SerialPortAccessDenied { port } => {
                format!("시리얼 포트 접근 거부: {}", port)
            }
            Self::SerialConfigurationFailed { port, .. } => {
                format!("시리얼 포트 설정 실패: {}", port)
            }
            Self::Closed { .. } => "연결이 끊어졌습니다".to_string(),
            Self::NotConnected => "Modbus 장비에 연결되어 있지 않습니다".to_string(),
            Self::Io { .. } => "네트워크 오류가 발생했습니다".to_string(),
        }
    }
}

impl From<io::Error> for ConnectionError {
    fn from(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::ConnectionRefused => Self::Refused {
                host: "unknown".to_string(),
                port: 0,
                source: Some(error),
            },
            io::ErrorKind::NotFound => Self::SerialPortNotFound {
                port: "unknown".to_string(),
            },
            io::ErrorKind::PermissionDenied => Self::SerialPortAccessDenied {
                port: "unknown".to_string(),
            },
            io::ErrorKind::UnexpectedEof => Self::Closed {
                reason: Some("Peer closed the connection".to_string()),
            },
            _ => Self::Io {
                message: error.to_string(),
                source: error,
            },
        }
    }
}

// =============================================================================
// ProtocolError
// =============================================================================

/// Modbus protocol-level errors.
///
/// Covers exception responses from the slave and every malformed-response
/// case: framing, checksum, declared-length and echo violations.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Modbus exception response received.
    #[error("Modbus exception: function code {function_code:#04x}, exception {exception_code} ({exception_name})")]
    ExceptionResponse {
        /// The function code that caused the exception.
        function_code: u8,
        /// The exception code.
        exception_code: u8,
        /// Human-readable exception name.
        exception_name: String,
    },

    /// CRC check failed (RTU).
    #[error("CRC check failed: expected {expected:#06x}, got {actual:#06x}")]
    CrcMismatch {
        /// Expected CRC.
        expected: u16,
        /// Actual CRC.
        actual: u16,
    },

    /// Frame too short.
    #[error("Frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Expected minimum bytes.
        expected: usize,
        /// Actual bytes received.
        actual: usize,
    },

    /// Frame too long.
    #[error("Frame too long: maximum {max} bytes, got {actual}")]
    FrameTooLong {
        /// Maximum allowed bytes.
        max: usize,
        /// Actual bytes received.
        actual: usize,
    },

    /// Declared byte count does not match the payload actually present or
    /// the payload implied by the request.
    #[error("Byte count mismatch: declared {declared}, expected {expected}")]
    ByteCountMismatch {
        /// Byte count declared in the response.
        declared: usize,
        /// Byte count expected.
        expected: usize,
    },

    /// Unit ID mismatch.
    #[error("Unit ID mismatch: expected {expected}, got {actual}")]
    UnitIdMismatch {
        /// Expected unit ID.
        expected: u8,
        /// Actual unit ID.
        actual: u8,
    },

    /// Transaction ID mismatch (TCP).
    #[error("Transaction ID mismatch: expected {expected}, got {actual}")]
    TransactionIdMismatch {
        /// Expected transaction ID.
        expected: u16,
        /// Actual transaction ID.
        actual: u16,
    },

    /// Function code echo mismatch.
    #[error("Function code mismatch: expected {expected:#04x}, got {actual:#04x}")]
    FunctionCodeMismatch {
        /// Expected function code.
        expected: u8,
        /// Actual function code.
        actual: u8,
    },

    /// Invalid MBAP header (TCP).
    #[error("Invalid MBAP header: {message}")]
    InvalidMbapHeader {
        /// Error message.
        message: String,
    },
}

impl ProtocolError {
    /// Creates an exception response error.
    pub fn exception_response(function_code: u8, exception_code: u8) -> Self {
        Self::ExceptionResponse {
            function_code,
            exception_code,
            exception_name: Self::exception_name(exception_code).to_string(),
        }
    }

    /// Returns the human-readable name for an exception code.
    pub fn exception_name(code: u8) -> &'static str {
        match code {
            0x01 => "Illegal Function",
            0x02 => "Illegal Data Address",
            0x03 => "Illegal Data Value",
            0x04 => "Slave Device Failure",
            0x05 => "Acknowledge",
            0x06 => "Slave Device Busy",
            0x08 => "Memory Parity Error",
            0x0A => "Gateway Path Unavailable",
            0x0B => "Gateway Target Device Failed to Respond",
            _ => "Unknown Exception",
        }
    }

    /// Creates a CRC mismatch error.
    pub fn crc_mismatch(expected: u16, actual: u16) -> Self {
        Self::CrcMismatch { expected, actual }
    }

    /// Creates a frame too short error.
    pub fn frame_too_short(expected: usize, actual: usize) -> Self {
        Self::FrameTooShort { expected, actual }
    }

    /// Creates a byte count mismatch error.
    pub fn byte_count_mismatch(declared: usize, expected: usize) -> Self {
        Self::ByteCountMismatch { declared, expected }
    }

    /// Creates a unit ID mismatch error.
    pub fn unit_id_mismatch(expected: u8, actual: u8) -> Self {
        Self::UnitIdMismatch { expected, actual }
    }

    /// Creates a transaction ID mismatch error.
    pub fn transaction_id_mismatch(expected: u16, actual: u16) -> Self {
        Self::TransactionIdMismatch { expected, actual }
    }

    /// Creates a function code mismatch error.
    pub fn function_code_mismatch(expected: u8, actual: u8) -> Self {
        Self::FunctionCodeMismatch { expected, actual }
    }

    /// Creates an invalid MBAP header error.
    pub fn invalid_mbap_header(message: impl Into<String>) -> Self {
        Self::InvalidMbapHeader {
            message: message.into(),
        }
    }

    /// Returns `true` if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ExceptionResponse { exception_code, .. } => {
                // Acknowledge, busy and gateway-target exceptions are transient
                matches!(exception_code, 0x05 | 0x06 | 0x0B)
            }
            Self::CrcMismatch { .. } => true,
            Self::TransactionIdMismatch { .. } => true,
            _ => false,
        }
    }

    /// Returns the severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ExceptionResponse { exception_code, .. } => match exception_code {
                0x05 | 0x06 => ErrorSeverity::Warning,
                0x01..=0x03 => ErrorSeverity::Error,
                _ => ErrorSeverity::Critical,
            },
            Self::CrcMismatch { .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Warning,
        }
    }

    /// Returns a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            Self::ExceptionResponse { exception_name, .. } => {
                format!("Modbus 예외 응답: {}", exception_name)
            }
            Self::CrcMismatch { .. } => "통신 오류 (CRC 검증 실패)".to_string(),
            Self::FrameTooShort { .. } | Self::FrameTooLong { .. } => {
                "잘못된 프레임 크기".to_string()
            }
            Self::ByteCountMismatch { .. } => "잘못된 응답 길이".to_string(),
            Self::UnitIdMismatch { expected, actual } => {
                format!("유닛 ID 불일치 (예상: {}, 실제: {})", expected, actual)
            }
            Self::TransactionIdMismatch { .. } => "트랜잭션 ID 불일치".to_string(),
            Self::FunctionCodeMismatch { .. } => "함수 코드 불일치".to_string(),
            Self::InvalidMbapHeader { .. } => "잘못된 MBAP 헤더".to_string(),
        }
    }
}

// =============================================================================
// RequestError
// =============================================================================

/// Read request validation errors.
///
/// These are detected locally, before any bytes are written to the
/// transport, mirroring the protocol's hard limits.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Requested quantity is outside the protocol limits.
    #[error("Quantity {quantity} out of range for {register_type} (valid: {min}-{max})")]
    QuantityOutOfRange {
        /// The register type being read.
        register_type: String,
        /// Requested quantity.
        quantity: u16,
        /// Minimum valid quantity.
        min: u16,
        /// Maximum valid quantity.
        max: u16,
    },

    /// Address plus quantity overflows the 16-bit address space.
    #[error("Address range overflow: {address} + {quantity} exceeds 65536")]
    AddressRangeOverflow {
        /// Starting address.
        address: u16,
        /// Requested quantity.
        quantity: u16,
    },
}

impl RequestError {
    /// Creates a quantity out of range error.
    pub fn quantity_out_of_range(
        register_type: impl Into<String>,
        quantity: u16,
        min: u16,
        max: u16,
    ) -> Self {
        Self::QuantityOutOfRange {
            register_type: register_type.into(),
            quantity,
            min,
            max,
        }
    }

    /// Creates an address range overflow error.
    pub fn address_range_overflow(address: u16, quantity: u16) -> Self {
        Self::AddressRangeOverflow { address, quantity }
    }

    /// Returns a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            Self::QuantityOutOfRange { quantity, min, max, .. } => {
                format!("요청 개수 범위 초과: {} ({}-{} 범위)", quantity, min, max)
            }
            Self::AddressRangeOverflow { address, quantity } => {
                format!("주소 범위 초과: {} + {}", address, quantity)
            }
        }
    }
}

// =============================================================================
// ConversionError
// =============================================================================

/// Data type conversion errors.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The reading kind does not support the requested conversion.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Expected source.
        expected: String,
        /// Actual source.
        actual: String,
    },

    /// Odd register count for a conversion that consumes word pairs.
    #[error("Odd register count {count}: float32 consumes registers in pairs")]
    OddWordCount {
        /// The register count.
        count: usize,
    },
}

impl ConversionError {
    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates an odd word count error.
    pub fn odd_word_count(count: usize) -> Self {
        Self::OddWordCount { count }
    }

    /// Returns a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            Self::TypeMismatch { expected, actual } => {
                format!("데이터 타입 불일치 (예상: {}, 실제: {})", expected, actual)
            }
            Self::OddWordCount { count } => {
                format!("레지스터 개수가 홀수입니다: {}", count)
            }
        }
    }
}

// =============================================================================
// ConfigurationError
// =============================================================================

/// Connection configuration errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Invalid unit ID.
    #[error("Invalid unit ID: {unit_id} (0 is broadcast; valid range: 1-255)")]
    InvalidUnitId {
        /// The invalid unit ID.
        unit_id: u8,
    },

    /// Invalid baud rate.
    #[error("Invalid baud rate: {baud_rate}")]
    InvalidBaudRate {
        /// The invalid baud rate.
        baud_rate: u32,
    },

    /// Invalid timeout.
    #[error("Invalid timeout: {duration:?} ({reason})")]
    InvalidTimeout {
        /// The invalid duration.
        duration: Duration,
        /// Reason.
        reason: String,
    },

    /// Missing required field.
    #[error("Missing required configuration: {field}")]
    MissingField {
        /// The missing field.
        field: String,
    },

    /// Invalid data type name.
    #[error("Invalid data type: {data_type}")]
    InvalidDataType {
        /// The invalid data type.
        data_type: String,
    },

    /// Invalid register type name.
    #[error("Invalid register type: {register_type} ({reason})")]
    InvalidRegisterType {
        /// The invalid register type string.
        register_type: String,
        /// Reason.
        reason: String,
    },
}

impl ConfigurationError {
    /// Creates an invalid unit ID error.
    pub fn invalid_unit_id(unit_id: u8) -> Self {
        Self::InvalidUnitId { unit_id }
    }

    /// Creates a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField { field: field.into() }
    }

    /// Creates an invalid data type error.
    pub fn invalid_data_type(data_type: impl Into<String>) -> Self {
        Self::InvalidDataType {
            data_type: data_type.into(),
        }
    }

    /// Creates an invalid register type error.
    pub fn invalid_register_type(
        register_type: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidRegisterType {
            register_type: register_type.into(),
            reason: reason.into(),
        }
    }

    /// Returns a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidUnitId { unit_id } => {
                format!("잘못된 유닛 ID: {} (1-255 범위)", unit_id)
            }
            Self::InvalidBaudRate { baud_rate } => {
                format!("잘못된 통신 속도: {}", baud_rate)
            }
            Self::InvalidTimeout { duration, .. } => {
                format!("잘못된 타임아웃: {:?}", duration)
            }
            Self::MissingField { field } => {
                format!("필수 설정 누락: {}", field)
            }
            Self::InvalidDataType { data_type } => {
                format!("잘못된 데이터 타입: {}", data_type)
            }
            Self::InvalidRegisterType { register_type, .. } => {
                format!("잘못된 레지스터 타입: {}", register_type)
            }
        }
    }
}

// =============================================================================
// TimeoutError
// =============================================================================

/// Timeout errors.
#[derive(Debug, Error)]
pub enum TimeoutError {
    /// Connection timeout.
    #[error("Connection timed out after {duration:?}")]
    Connect {
        /// Timeout duration.
        duration: Duration,
    },

    /// Response timeout.
    #[error("Response timed out after {duration:?}")]
    Response {
        /// Timeout duration.
        duration: Duration,
    },
}

impl TimeoutError {
    /// Creates a connection timeout.
    pub fn connect(duration: Duration) -> Self {
        Self::Connect { duration }
    }

    /// Creates a response timeout.
    pub fn response(duration: Duration) -> Self {
        Self::Response { duration }
    }

    /// Returns the timeout duration.
    pub fn duration(&self) -> Duration {
        match self {
            Self::Connect { duration } | Self::Response { duration } => *duration,
        }
    }

    /// Returns a user-friendly error message.
    pub fn user_message(&self) -> String {
        let duration = self.duration();
        match self {
            Self::Connect { .. } => {
                format!("연결 시간 초과 ({:.1}초)", duration.as_secs_f64())
            }
            Self::Response { .. } => {
                format!("응답 시간 초과 ({:.1}초)", duration.as_secs_f64())
            }
        }
    }
}

// =============================================================================
// ErrorSeverity
// =============================================================================

/// Error severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Informational - no action required.
    Info,
    /// Warning - action may be required.
    Warning,
    /// Error - action required, but recoverable.
    Error,
    /// Critical - immediate action required.
    Critical,
}

impl ErrorSeverity {
    /// Converts to tracing level.
    pub fn to_tracing_level(self) -> Level {
        match self {
            Self::Info => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error => Level::ERROR,
            Self::Critical => Level::ERROR,
        }
    }

    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// A Result type with ModbusError.
pub type ModbusResult<T> = Result<T, ModbusError>;

// =============================================================================
// Tests
// =============================================================================
