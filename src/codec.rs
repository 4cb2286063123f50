// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Modbus frame codec.
//!
//! Pure, stateless translation between read requests and wire bytes, and the
//! reverse for responses. Two framings are supported:
//!
//! - **TCP (MBAP)**: 7-byte header (transaction id, protocol id 0, length,
//!   unit id) followed by the PDU.
//! - **RTU**: unit id, PDU, and a trailing CRC-16 (polynomial 0xA001,
//!   low byte first on the wire).
//!
//! The PDU for every read function is `[function][address:16][quantity:16]`
//! with big-endian fields. Responses with the function code's high bit set
//! carry a single exception code byte.
//!
//! All functions here are pure; the transports own the sockets and the
//! client owns transaction-id state.

use crate::error::{ModbusResult, ProtocolError};
use crate::types::{RawReading, ReadRequest};

/// Length of the MBAP header (transaction, protocol, length, unit).
pub const MBAP_HEADER_LEN: usize = 7;

/// Modbus TCP protocol identifier. Always zero.
pub const MBAP_PROTOCOL_ID: u16 = 0;

/// Largest PDU the protocol allows (function code + 252 payload bytes).
pub const MAX_PDU_LEN: usize = 253;

/// High bit of the function code marks an exception response.
const EXCEPTION_FLAG: u8 = 0x80;

/// Length of the RTU CRC trailer.
const RTU_CRC_LEN: usize = 2;

// =============================================================================
// PDU encode / decode
// =============================================================================

/// Encodes a read request into a 5-byte PDU.
pub fn encode_read_request(request: &ReadRequest) -> Vec<u8> {
    let mut pdu = Vec::with_capacity(5);
    pdu.push(request.function_code());
    pdu.extend_from_slice(&request.address.to_be_bytes());
    pdu.extend_from_slice(&request.quantity.to_be_bytes());
    pdu
}

/// Decodes a read response PDU into a raw reading.
///
/// Verifies the function code echo, unpacks exception responses, and checks
/// the declared byte count against both the bytes actually present and the
/// count the request implies. Any inconsistency is a protocol error; a
/// partially populated reading is never returned.
pub fn decode_read_response(request: &ReadRequest, pdu: &[u8]) -> ModbusResult<RawReading> {
    if pdu.is_empty() {
        return Err(ProtocolError::frame_too_short(2, 0).into());
    }

    let function_code = pdu[0];

    if function_code & EXCEPTION_FLAG != 0 {
        if pdu.len() < 2 {
            return Err(ProtocolError::frame_too_short(2, pdu.len()).into());
        }
        return Err(ProtocolError::exception_response(
            function_code & !EXCEPTION_FLAG,
            pdu[1],
        )
        .into());
    }

    if function_code != request.function_code() {
        return Err(
            ProtocolError::function_code_mismatch(request.function_code(), function_code).into(),
        );
    }

    if pdu.len() < 2 {
        return Err(ProtocolError::frame_too_short(2, pdu.len()).into());
    }

    let declared = pdu[1] as usize;
    let expected = expected_byte_count(request);

    if declared != expected {
        return Err(ProtocolError::byte_count_mismatch(declared, expected).into());
    }

    let payload = &pdu[2..];
    if payload.len() != declared {
        return Err(ProtocolError::byte_count_mismatch(declared, payload.len()).into());
    }

    if request.register_type.is_bit() {
        Ok(RawReading::Bits(unpack_bits(payload, request.quantity)))
    } else {
        Ok(RawReading::Words(unpack_words(payload)))
    }
}

/// Returns the payload byte count a well-formed response to `request` carries.
#[inline]
pub fn expected_byte_count(request: &ReadRequest) -> usize {
    if request.register_type.is_bit() {
        (request.quantity as usize + 7) / 8
    } else {
        request.quantity as usize * 2
    }
}

/// Unpacks a byte-packed bitfield into `quantity` flags in address order.
///
/// Bit 0 of the first byte is the first requested address.
fn unpack_bits(payload: &[u8], quantity: u16) -> Vec<bool> {
    let mut bits = Vec::with_capacity(quantity as usize);
    for i in 0..quantity as usize {
        let byte = payload[i / 8];
        bits.push((byte >> (i % 8)) & 0x01 != 0);
    }
    bits
}

/// Unpacks big-endian 16-bit words.
fn unpack_words(payload: &[u8]) -> Vec<u16> {
    payload
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect()
}

// =============================================================================
// TCP (MBAP) framing
// =============================================================================

/// Wraps a PDU in an MBAP header.
pub fn wrap_tcp(transaction_id: u16, unit_id: u8, pdu: &[u8]) -> Vec<u8> {
    let length = (pdu.len() + 1) as u16;
    let mut frame = Vec::with_capacity(MBAP_HEADER_LEN + pdu.len());
    frame.extend_from_slice(&transaction_id.to_be_bytes());
    frame.extend_from_slice(&MBAP_PROTOCOL_ID.to_be_bytes());
    frame.extend_from_slice(&length.to_be_bytes());
    frame.push(unit_id);
    frame.extend_from_slice(pdu);
    frame
}

/// Unwraps an MBAP frame, returning the PDU.
///
/// The response is accepted only when the transaction id echoes the request,
/// the protocol id is zero and the unit id matches the addressed slave.
pub fn unwrap_tcp(transaction_id: u16, unit_id: u8, frame: &[u8]) -> ModbusResult<Vec<u8>> {
    if frame.len() < MBAP_HEADER_LEN + 1 {
        return Err(ProtocolError::frame_too_short(MBAP_HEADER_LEN + 1, frame.len()).into());
    }

    let received_transaction = u16::from_be_bytes([frame[0], frame[1]]);
    if received_transaction != transaction_id {
        return Err(
            ProtocolError::transaction_id_mismatch(transaction_id, received_transaction).into(),
        );
    }

    let protocol_id = u16::from_be_bytes([frame[2], frame[3]]);
    if protocol_id != MBAP_PROTOCOL_ID {
        return Err(ProtocolError::invalid_mbap_header(format!(
            "protocol id {:#06x}, expected 0",
            protocol_id
        ))
        .into());
    }

    let length = u16::from_be_bytes([frame[4], frame[5]]) as usize;
    if length < 2 {
        return Err(ProtocolError::invalid_mbap_header(format!(
            "declared length {} cannot hold a PDU",
            length
        ))
        .into());
    }

    let expected_len = MBAP_HEADER_LEN - 1 + length;
    if frame.len() < expected_len {
        return Err(ProtocolError::frame_too_short(expected_len, frame.len()).into());
    }

    let received_unit = frame[6];
    if received_unit != unit_id {
        return Err(ProtocolError::unit_id_mismatch(unit_id, received_unit).into());
    }

    Ok(frame[MBAP_HEADER_LEN..expected_len].to_vec())
}

/// Returns the total frame length declared by an MBAP header, once the
/// header has been read.
#[inline]
pub fn tcp_frame_len(header: &[u8; MBAP_HEADER_LEN]) -> usize {
    MBAP_HEADER_LEN - 1 + u16::from_be_bytes([header[4], header[5]]) as usize
}

// =============================================================================
// RTU framing
// =============================================================================

/// Wraps a PDU in an RTU frame (unit id + PDU + CRC-16).
pub fn wrap_rtu(unit_id: u8, pdu: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(1 + pdu.len() + RTU_CRC_LEN);
    frame.push(unit_id);
    frame.extend_from_slice(pdu);

    let crc = crc16(&frame);
    frame.push(crc as u8);
    frame.push((crc >> 8) as u8);

    frame
}

/// Unwraps an RTU frame, returning the PDU.
///
/// The CRC is recomputed and verified before any payload byte is trusted.
pub fn unwrap_rtu(unit_id: u8, frame: &[u8]) -> ModbusResult<Vec<u8>> {
    // Smallest possible reply: unit + exception function + code + CRC
    if frame.len() < 5 {
        return Err(ProtocolError::frame_too_short(5, frame.len()).into());
    }

    let received_crc =
        u16::from_le_bytes([frame[frame.len() - 2], frame[frame.len() - 1]]);
    let calculated_crc = crc16(&frame[..frame.len() - RTU_CRC_LEN]);

    if received_crc != calculated_crc {
        return Err(ProtocolError::crc_mismatch(calculated_crc, received_crc).into());
    }

    let received_unit = frame[0];
    if received_unit != unit_id {
        return Err(ProtocolError::unit_id_mismatch(unit_id, received_unit).into());
    }

    Ok(frame[1..frame.len() - RTU_CRC_LEN].to_vec())
}

/// Returns the expected total RTU response length once enough header bytes
/// are buffered, or `None` if more bytes are needed to tell.
///
/// Exception responses are 5 bytes; normal read responses are
/// `3 + byte_count + 2`.
pub fn rtu_response_len(buffered: &[u8]) -> Option<usize> {
    if buffered.len() < 2 {
        return None;
    }

    if buffered[1] & EXCEPTION_FLAG != 0 {
        return Some(5);
    }

    if buffered.len() < 3 {
        return None;
    }

    Some(3 + buffered[2] as usize + RTU_CRC_LEN)
}

/// Computes the Modbus CRC-16 (polynomial 0xA001, initial value 0xFFFF).
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in data {
        crc ^= byte as u16;
        for _ in 0..8 {
            if crc & 0x0001 != 0 {
                crc = (crc >> 1) ^ 0xA001;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModbusError;
    use crate::types::RegisterType;

    #[test]
    fn test_encode_read_request() {
        let request = ReadRequest::holding_registers(0x006B, 3);
        assert_eq!(encode_read_request(&request), vec![0x03, 0x00, 0x6B, 0x00, 0x03]);

        let request = ReadRequest::coils(0, 16);
        assert_eq!(encode_read_request(&request), vec![0x01, 0x00, 0x00, 0x00, 0x10]);
    }

    #[test]
    fn test_decode_register_response() {
        let request = ReadRequest::holding_registers(0, 2);
        let pdu = [0x03, 0x04, 0x12, 0x34, 0xAB, 0xCD];
        let reading = decode_read_response(&request, &pdu).unwrap();
        assert_eq!(reading, RawReading::Words(vec![0x1234, 0xABCD]));
    }

    #[test]
    fn test_decode_bit_response_order() {
        // 10 coils packed into 2 bytes; bit 0 of the first byte is coil 0
        let request = ReadRequest::coils(0, 10);
        let pdu = [0x01, 0x02, 0b0000_0101, 0b0000_0010];
        let reading = decode_read_response(&request, &pdu).unwrap();
        let bits = reading.as_bits().unwrap();
        assert_eq!(bits.len(), 10);
        assert!(bits[0]);
        assert!(!bits[1]);
        assert!(bits[2]);
        assert!(bits[9]);
        assert!(!bits[8]);
    }

    #[test]
    fn test_decode_exception_response() {
        let request = ReadRequest::holding_registers(0, 1);
        let pdu = [0x83, 0x02];
        let error = decode_read_response(&request, &pdu).unwrap_err();
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

    #[test]
    fn test_decode_byte_count_mismatch() {
        let request = ReadRequest::holding_registers(0, 2);

        // Declared count disagrees with the request
        let pdu = [0x03, 0x02, 0x12, 0x34];
        assert!(matches!(
            decode_read_response(&request, &pdu),
            Err(ModbusError::Protocol(ProtocolError::ByteCountMismatch { .. }))
        ));

        // Declared count disagrees with the bytes present
        let pdu = [0x03, 0x04, 0x12, 0x34];
        assert!(matches!(
            decode_read_response(&request, &pdu),
            Err(ModbusError::Protocol(ProtocolError::ByteCountMismatch { .. }))
        ));
    }

    #[test]
    fn test_decode_function_code_echo() {
        let request = ReadRequest::holding_registers(0, 1);
        let pdu = [0x04, 0x02, 0x00, 0x01];
        assert!(matches!(
            decode_read_response(&request, &pdu),
            Err(ModbusError::Protocol(ProtocolError::FunctionCodeMismatch { .. }))
        ));
    }

    #[test]
    fn test_expected_byte_count() {
        assert_eq!(expected_byte_count(&ReadRequest::holding_registers(0, 10)), 20);
        assert_eq!(expected_byte_count(&ReadRequest::coils(0, 10)), 2);
        assert_eq!(expected_byte_count(&ReadRequest::coils(0, 16)), 2);
        assert_eq!(expected_byte_count(&ReadRequest::coils(0, 17)), 3);
    }

    #[test]
    fn test_crc16_known_vectors() {
        // Canonical request frame 11 03 00 6B 00 03 -> CRC bytes 76 87
        assert_eq!(crc16(&[0x11, 0x03, 0x00, 0x6B, 0x00, 0x03]), 0x8776);
        // Response frame 01 04 02 FF FF -> CRC bytes B8 80
        assert_eq!(crc16(&[0x01, 0x04, 0x02, 0xFF, 0xFF]), 0x80B8);
        assert_eq!(crc16(&[0x01, 0x03, 0x00, 0x00, 0x00, 0x0A]), 0xCDC5);
    }

    #[test]
    fn test_rtu_wrap_unwrap_round_trip() {
        let pdu = [0x03, 0x00, 0x6B, 0x00, 0x03];
        let frame = wrap_rtu(0x11, &pdu);
        assert_eq!(frame[0], 0x11);
        assert_eq!(&frame[frame.len() - 2..], &[0x76, 0x87]);

        let unwrapped = unwrap_rtu(0x11, &frame).unwrap();
        assert_eq!(unwrapped, pdu);
    }

    #[test]
    fn test_rtu_crc_rejection() {
        let pdu = [0x03, 0x02, 0x00, 0x01];
        let mut frame = wrap_rtu(1, &pdu);
        let last = frame.len() - 1;
        frame[last] ^= 0xFF;

        assert!(matches!(
            unwrap_rtu(1, &frame),
            Err(ModbusError::Protocol(ProtocolError::CrcMismatch { .. }))
        ));
    }

    #[test]
    fn test_rtu_unit_id_mismatch() {
        let frame = wrap_rtu(2, &[0x03, 0x02, 0x00, 0x01]);
        assert!(matches!(
            unwrap_rtu(1, &frame),
            Err(ModbusError::Protocol(ProtocolError::UnitIdMismatch { .. }))
        ));
    }

    #[test]
    fn test_rtu_response_len() {
        assert_eq!(rtu_response_len(&[0x01]), None);
        assert_eq!(rtu_response_len(&[0x01, 0x83]), Some(5));
        assert_eq!(rtu_response_len(&[0x01, 0x03]), None);
        assert_eq!(rtu_response_len(&[0x01, 0x03, 0x04]), Some(9));
    }

    #[test]
    fn test_tcp_wrap_layout() {
        let pdu = [0x03, 0x00, 0x00, 0x00, 0x0A];
        let frame = wrap_tcp(0x0102, 0x11, &pdu);
        assert_eq!(frame.len(), 12);
        assert_eq!(&frame[0..2], &[0x01, 0x02]); // transaction id
        assert_eq!(&frame[2..4], &[0x00, 0x00]); // protocol id
        assert_eq!(&frame[4..6], &[0x00, 0x06]); // length = unit + pdu
        assert_eq!(frame[6], 0x11); // unit id
        assert_eq!(&frame[7..], &pdu);
    }

    #[test]
    fn test_tcp_wrap_unwrap_round_trip() {
        let pdu = [0x03, 0x04, 0x12, 0x34, 0xAB, 0xCD];
        let frame = wrap_tcp(7, 1, &pdu);
        let unwrapped = unwrap_tcp(7, 1, &frame).unwrap();
        assert_eq!(unwrapped, pdu);
    }

    #[test]
    fn test_tcp_unwrap_rejects_stale_transaction() {
        let frame = wrap_tcp(7, 1, &[0x03, 0x02, 0x00, 0x01]);
        assert!(matches!(
            unwrap_tcp(8, 1, &frame),
            Err(ModbusError::Protocol(ProtocolError::TransactionIdMismatch { .. }))
        ));
    }

    #[test]
    fn test_tcp_unwrap_rejects_bad_protocol_id() {
        let mut frame = wrap_tcp(1, 1, &[0x03, 0x02, 0x00, 0x01]);
        frame[3] = 0x01;
        assert!(matches!(
            unwrap_tcp(1, 1, &frame),
            Err(ModbusError::Protocol(ProtocolError::InvalidMbapHeader { .. }))
        ));
    }

    #[test]
    fn test_tcp_unwrap_rejects_wrong_unit() {
        let frame = wrap_tcp(1, 9, &[0x03, 0x02, 0x00, 0x01]);
        assert!(matches!(
            unwrap_tcp(1, 1, &frame),
            Err(ModbusError::Protocol(ProtocolError::UnitIdMismatch { .. }))
        ));
    }

    #[test]
    fn test_tcp_frame_len() {
        let frame = wrap_tcp(1, 1, &[0x03, 0x02, 0x00, 0x01]);
        let mut header = [0u8; MBAP_HEADER_LEN];
        header.copy_from_slice(&frame[..MBAP_HEADER_LEN]);
        assert_eq!(tcp_frame_len(&header), frame.len());
    }

    #[test]
    fn test_request_response_round_trip_all_types() {
        for register_type in RegisterType::ALL {
            let request = ReadRequest::new(register_type, 10, 8);
            let pdu = encode_read_request(&request);
            assert_eq!(pdu[0], register_type.read_function_code());

            // Synthesize a matching response and decode it back
            let payload_len = expected_byte_count(&request);
            let mut response = vec![register_type.read_function_code(), payload_len as u8];
            response.extend(std::iter::repeat(0xFF).take(payload_len));

            let reading = decode_read_response(&request, &response).unwrap();
            assert_eq!(reading.len(), 8);
        }
    }
}
