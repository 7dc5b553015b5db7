//! Tests for frame packing and the fixed wire layout

mod common;

use common::*;

#[test]
fn test_pack_scenario_payload() {
    let reading = RawPacket::from(SCENARIO_PACKET).decode().unwrap();
    let frame = BusFrame::pack(&reading, SafetyStatus::Ok);

    assert_eq!(frame.frame_id, FRAME_ID);
    assert_eq!(frame.dlc, FRAME_DLC);
    assert_eq!(frame.data, SCENARIO_PAYLOAD);
}

#[test]
fn test_pack_recovers_fields() {
    // Payload bytes [0..3] must read back exactly volt_hi, volt_lo,
    // temperature and status code.
    let reading = DecodedReading {
        voltage_mv: 0x1234,
        temperature_c: 99,
    };
    let frame = BusFrame::pack(&reading, SafetyStatus::CritTemp);

    assert_eq!(frame.data[0], 0x12);
    assert_eq!(frame.data[1], 0x34);
    assert_eq!(frame.data[2], 99);
    assert_eq!(frame.data[3], 0x02);
    assert_eq!(&frame.data[4..], &[0, 0, 0, 0]);
}

#[test]
fn test_wire_layout_little_endian() {
    let reading = RawPacket::from(SCENARIO_PACKET).decode().unwrap();
    let wire = BusFrame::pack(&reading, SafetyStatus::Ok).encode();

    assert_eq!(wire.len(), WIRE_LEN);
    // frame_id 0x100 little-endian, then dlc, then the payload.
    assert_eq!(&wire[..4], &[0x00, 0x01, 0x00, 0x00]);
    assert_eq!(wire[4], 8);
    assert_eq!(&wire[5..], &SCENARIO_PAYLOAD);
}

#[test]
fn test_identical_packets_encode_identically() {
    let encode = |bytes: [u8; PACKET_LEN]| {
        let reading = RawPacket::from(bytes).decode().unwrap();
        let status = classify(reading.voltage_mv, reading.temperature_c);
        BusFrame::pack(&reading, status).encode()
    };

    assert_eq!(encode(SCENARIO_PACKET), encode(SCENARIO_PACKET));
}

#[test]
fn test_roundtrip_wire_to_frame() {
    let reading = DecodedReading {
        voltage_mv: 2990,
        temperature_c: 45,
    };
    let frame = BusFrame::pack(&reading, SafetyStatus::WarnLowVolt);
    let wire = Bytes::from(frame);

    let decoded = BusFrame::try_from(wire).expect("Failed to decode wire frame");
    assert_eq!(decoded, frame);
    assert_eq!(decoded.status_code(), 0x01);
}

#[test]
fn test_short_datagram_rejected() {
    let err = BusFrame::try_from(Bytes::from_static(&[0x00, 0x01, 0x00]))
        .expect_err("Truncated datagram must not decode");
    assert!(matches!(err, BridgeError::InvalidFrame(_)));
}

#[test]
fn test_oversized_datagram_rejected() {
    let bytes = Bytes::copy_from_slice(&[0u8; WIRE_LEN + 1]);
    assert!(BusFrame::try_from(bytes).is_err());
}
