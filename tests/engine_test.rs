// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! End-to-end tests for the request engine: framing, validation, error
//! decoding, session lifecycle and the real TCP transport.

mod common;

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use modscan::client::{Framing, ModbusClient, ModbusTransport, ScanValue, TcpTransport};
use modscan::codec;
use modscan::error::{ConnectionError, ModbusError, ProtocolError, TimeoutError};
use modscan::types::{RawReading, ReadRequest, TcpConfig, ValueKind};

use common::MockTransport;

fn tcp_client(unit_id: u8) -> (ModbusClient, common::MockHandle) {
    let (transport, handle) = MockTransport::new(unit_id, Framing::Tcp);
    (ModbusClient::new(Box::new(transport)), handle)
}

fn rtu_client(unit_id: u8) -> (ModbusClient, common::MockHandle) {
    let (transport, handle) = MockTransport::new(unit_id, Framing::Rtu);
    (ModbusClient::new(Box::new(transport)), handle)
}

// =============================================================================
// Round trips over the mock transport
// =============================================================================

#[tokio::test]
async fn tcp_register_read_round_trip() {
    let (mut client, handle) = tcp_client(1);
    let request = ReadRequest::holding_registers(0x006B, 2);

    // First read uses transaction id 1
    let pdu = [0x03, 0x04, 0x12, 0x34, 0xAB, 0xCD];
    handle.push_response(codec::wrap_tcp(1, 1, &pdu));

    let reading = client.read(&request).await.unwrap();
    assert_eq!(reading, RawReading::Words(vec![0x1234, 0xABCD]));

    // The wire request is exactly header + [fc][address][quantity]
    let expected = codec::wrap_tcp(1, 1, &[0x03, 0x00, 0x6B, 0x00, 0x02]);
    assert_eq!(handle.recorded(0), expected);
}

#[tokio::test]
async fn tcp_coil_read_unpacks_in_address_order() {
    let (mut client, handle) = tcp_client(1);
    let request = ReadRequest::coils(0, 10);

    let pdu = [0x01, 0x02, 0b0000_0101, 0b0000_0010];
    handle.push_response(codec::wrap_tcp(1, 1, &pdu));

    let reading = client.read(&request).await.unwrap();
    let bits = reading.as_bits().unwrap();
    assert_eq!(bits.len(), 10);
    assert!(bits[0] && !bits[1] && bits[2]);
    assert!(bits[9] && !bits[8]);
}

#[tokio::test]
async fn rtu_register_read_round_trip() {
    let (mut client, handle) = rtu_client(0x11);
    let request = ReadRequest::holding_registers(0x006B, 3);

    let pdu = [0x03, 0x06, 0xAE, 0x41, 0x56, 0x52, 0x43, 0x40];
    handle.push_response(codec::wrap_rtu(0x11, &pdu));

    let reading = client.read(&request).await.unwrap();
    assert_eq!(reading, RawReading::Words(vec![0xAE41, 0x5652, 0x4340]));

    // Request frame carries the unit id and a valid CRC
    let expected = codec::wrap_rtu(0x11, &[0x03, 0x00, 0x6B, 0x00, 0x03]);
    assert_eq!(handle.recorded(0), expected);
}

#[tokio::test]
async fn read_value_converts_float32_end_to_end() {
    let (mut client, handle) = tcp_client(1);
    let request = ReadRequest::input_registers(0, 2);

    let pdu = [0x04, 0x04, 0x40, 0x48, 0xF5, 0xC3];
    handle.push_response(codec::wrap_tcp(1, 1, &pdu));

    let value = client.read_value(&request, ValueKind::Float32).await.unwrap();
    match value {
        ScanValue::Float32(values) => {
            assert_eq!(values.len(), 1);
            assert!((values[0] - 3.14).abs() < 1e-4);
        }
        other => panic!("Expected Float32, got {other:?}"),
    }
}

// =============================================================================
// Validation before I/O
// =============================================================================

#[tokio::test]
async fn oversized_requests_are_rejected_without_io() {
    let (mut client, handle) = tcp_client(1);

    let result = client.read(&ReadRequest::holding_registers(0, 126)).await;
    assert!(matches!(result, Err(ModbusError::Request(_))));

    let result = client.read(&ReadRequest::coils(0, 2001)).await;
    assert!(matches!(result, Err(ModbusError::Request(_))));

    let result = client.read(&ReadRequest::input_registers(0, 0)).await;
    assert!(matches!(result, Err(ModbusError::Request(_))));

    // The transport never saw a single frame
    assert_eq!(handle.exchange_count(), 0);
}

// =============================================================================
// Error decoding
// =============================================================================

#[tokio::test]
async fn exception_response_is_surfaced_with_code() {
    let (mut client, handle) = tcp_client(1);
    let request = ReadRequest::holding_registers(0, 1);

    handle.push_response(codec::wrap_tcp(1, 1, &[0x83, 0x02]));

    let error = client.read(&request).await.unwrap_err();
    match error {
        ModbusError::Protocol(ProtocolError::ExceptionResponse {
            function_code,
            exception_code,
            ..
        }) => {
            assert_eq!(function_code, 0x03);
            assert_eq!(exception_code, 0x02);
        }
        other => panic!("Expected ExceptionResponse, got {other:?}"),
    }
}

#[tokio::test]
async fn byte_count_mismatch_never_yields_partial_reading() {
    let (mut client, handle) = tcp_client(1);
    let request = ReadRequest::holding_registers(0, 5);

    // Slave declares 4 bytes where the request implies 10
    handle.push_response(codec::wrap_tcp(1, 1, &[0x03, 0x04, 0x00, 0x01, 0x00, 0x02]));

    let error = client.read(&request).await.unwrap_err();
    assert!(matches!(
        error,
        ModbusError::Protocol(ProtocolError::ByteCountMismatch { .. })
    ));
}

#[tokio::test]
async fn stale_transaction_id_is_rejected() {
    let (mut client, handle) = tcp_client(1);
    let request = ReadRequest::holding_registers(0, 1);

    // Reply carries transaction id 7; the first read expects 1
    handle.push_response(codec::wrap_tcp(7, 1, &[0x03, 0x02, 0x00, 0x01]));

    let error = client.read(&request).await.unwrap_err();
    assert!(matches!(
        error,
        ModbusError::Protocol(ProtocolError::TransactionIdMismatch { expected: 1, actual: 7 })
    ));
}

#[tokio::test]
async fn corrupted_rtu_crc_is_rejected() {
    let (mut client, handle) = rtu_client(1);
    let request = ReadRequest::holding_registers(0, 1);

    let mut frame = codec::wrap_rtu(1, &[0x03, 0x02, 0x00, 0x01]);
    let last = frame.len() - 1;
    frame[last] ^= 0xFF;
    handle.push_response(frame);

    let error = client.read(&request).await.unwrap_err();
    assert!(matches!(
        error,
        ModbusError::Protocol(ProtocolError::CrcMismatch { .. })
    ));
}

// =============================================================================
// Session lifecycle
// =============================================================================

#[tokio::test]
async fn failed_read_does_not_tear_down_session() {
    let (mut client, handle) = tcp_client(1);
    let request = ReadRequest::holding_registers(0, 1);

    // First attempt times out, second succeeds over the same session
    handle.push_error(ModbusError::timeout(TimeoutError::response(
        Duration::from_secs(1),
    )));
    handle.push_response(codec::wrap_tcp(2, 1, &[0x03, 0x02, 0x00, 0x2A]));

    let error = client.read(&request).await.unwrap_err();
    assert!(matches!(error, ModbusError::Timeout(_)));
    assert!(client.is_connected());

    let reading = client.read(&request).await.unwrap();
    assert_eq!(reading, RawReading::Words(vec![0x2A]));
    assert_eq!(handle.exchange_count(), 2);
}

#[tokio::test]
async fn close_is_idempotent_and_blocks_further_reads() {
    let (mut client, handle) = tcp_client(1);

    client.close().await.unwrap();
    client.close().await.unwrap();
    assert!(!client.is_connected());

    // The mock rejects the exchange once disconnected state is external to
    // it, so only verify no response was scripted and the error propagates
    handle.push_error(ModbusError::connection(ConnectionError::NotConnected));
    let error = client.read(&ReadRequest::coils(0, 1)).await.unwrap_err();
    assert!(matches!(
        error,
        ModbusError::Connection(ConnectionError::NotConnected)
    ));
}

// =============================================================================
// Real TCP transport
// =============================================================================

#[tokio::test]
async fn tcp_transport_reads_over_a_real_socket() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = [0u8; 12];
        socket.read_exact(&mut request).await.unwrap();
        assert_eq!(request[7], 0x03);

        let transaction = u16::from_be_bytes([request[0], request[1]]);
        let reply = codec::wrap_tcp(transaction, 1, &[0x03, 0x04, 0x00, 0x01, 0x00, 0x02]);

        // Deliver the frame in two chunks so the client must accumulate
        socket.write_all(&reply[..5]).await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        socket.write_all(&reply[5..]).await.unwrap();

        socket
    });

    let config = TcpConfig::builder()
        .host("127.0.0.1")
        .port(addr.port())
        .unit_id(1)
        .build()
        .unwrap();

    let mut transport = TcpTransport::new(config);
    transport.connect().await.unwrap();
    assert!(transport.is_connected());

    let mut client = ModbusClient::new(Box::new(transport));
    let reading = client
        .read(&ReadRequest::holding_registers(0, 2))
        .await
        .unwrap();
    assert_eq!(reading, RawReading::Words(vec![1, 2]));

    client.close().await.unwrap();
    drop(server.await.unwrap());
}

#[tokio::test]
async fn tcp_transport_times_out_on_silent_slave() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 12];
        socket.read_exact(&mut request).await.unwrap();
        // Never reply
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(socket);
    });

    let config = TcpConfig::builder()
        .host("127.0.0.1")
        .port(addr.port())
        .unit_id(1)
        .response_timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let mut transport = TcpTransport::new(config);
    transport.connect().await.unwrap();

    let mut client = ModbusClient::new(Box::new(transport));
    let error = client
        .read(&ReadRequest::holding_registers(0, 1))
        .await
        .unwrap_err();
    assert!(matches!(error, ModbusError::Timeout(_)));

    // The session is not torn down by a timeout
    assert!(client.is_connected());

    server.abort();
}

#[tokio::test]
async fn tcp_connect_to_closed_port_fails_cleanly() {
    // Bind and immediately drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = TcpConfig::builder()
        .host("127.0.0.1")
        .port(addr.port())
        .connect_timeout(Duration::from_millis(500))
        .build()
        .unwrap();

    let mut transport = TcpTransport::new(config);
    let error = transport.connect().await.unwrap_err();
    assert!(matches!(error, ModbusError::Connection(_)));
    assert!(!transport.is_connected());
}
