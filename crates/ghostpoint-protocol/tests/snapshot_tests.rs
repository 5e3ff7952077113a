//! Snapshot tests for the ghostpoint wire formats.
//!
//! These lock in exact bytes so an accidental layout change shows up as a
//! diff instead of a silently incompatible device.

use ghostpoint_protocol::prelude::*;
use insta::assert_snapshot;

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(not(feature = "absolute"))]
#[test]
fn test_snapshot_report_descriptor_relative() {
    assert_snapshot!(hex(REPORT_DESCRIPTOR), @"05 01 09 02 a1 01 85 01 09 01 a1 00 05 09 19 01 29 03 15 00 25 01 95 03 75 01 81 02 95 01 75 05 81 03 05 01 09 30 09 31 15 81 25 7f 75 08 95 02 81 06 c0 c0 06 00 ff 09 07 a1 01 85 02 15 00 26 ff 00 75 08 95 06 09 07 b1 02 c0");
}

#[cfg(feature = "absolute")]
#[test]
fn test_snapshot_report_descriptor_absolute() {
    assert_snapshot!(hex(REPORT_DESCRIPTOR), @"05 01 09 02 a1 01 85 01 09 01 a1 00 05 09 19 01 29 03 15 00 25 01 95 03 75 01 81 02 95 01 75 05 81 03 05 01 09 30 09 31 16 01 00 26 ff 7f 75 10 95 02 81 02 c0 c0 06 00 ff 09 07 a1 01 85 02 15 00 26 ff 00 75 08 95 06 09 07 b1 02 c0");
}

#[cfg(not(feature = "absolute"))]
#[test]
fn test_snapshot_hid_descriptor_relative() {
    assert_snapshot!(hex(&HidDescriptor::for_build().to_bytes()), @"09 21 00 01 00 01 22 4b 00");
}

#[test]
fn test_snapshot_info_report() -> Result<(), ProtocolError> {
    let mut buf = [0u8; InfoReport::SIZE];
    InfoReport::new(MotionMode::Relative, 1024).encode(&mut buf)?;
    assert_snapshot!(hex(&buf), @"02 01 01 00 04 00 00");
    Ok(())
}

#[test]
fn test_snapshot_interval_request() -> Result<(), ProtocolError> {
    let mut buf = [0u8; DwordReport::SIZE];
    DwordReport::new(ControlCode::Interval, 8000).encode(&mut buf)?;
    assert_snapshot!(hex(&buf), @"02 03 40 1f 00 00");
    Ok(())
}

#[test]
fn test_snapshot_rejected_interval_response() -> Result<(), ProtocolError> {
    let mut buf = [0u8; DwordReport::SIZE];
    DwordReport::new(ControlCode::Interval, 4999).encode(&mut buf)?;
    DwordReport::write_value(&mut buf, 8000)?;
    mark_error(&mut buf)?;
    assert_snapshot!(hex(&buf), @"02 ff 40 1f 00 00");
    Ok(())
}

#[cfg(not(feature = "absolute"))]
#[test]
fn test_snapshot_move_request_relative() -> Result<(), ProtocolError> {
    let mut buf = [0u8; MoveReport::SIZE];
    MoveReport {
        message: MotionMessage::new(-1, 127, Buttons::LEFT | Buttons::MIDDLE),
    }
    .encode(&mut buf)?;
    assert_snapshot!(hex(&buf), @"02 00 05 ff 7f");
    Ok(())
}

#[cfg(feature = "absolute")]
#[test]
fn test_snapshot_move_request_absolute() -> Result<(), ProtocolError> {
    let mut buf = [0u8; MoveReport::SIZE];
    MoveReport {
        message: MotionMessage::new(1, 32_767, Buttons::RIGHT),
    }
    .encode(&mut buf)?;
    assert_snapshot!(hex(&buf), @"02 00 02 01 00 ff 7f");
    Ok(())
}

#[cfg(not(feature = "absolute"))]
#[test]
fn test_snapshot_motion_input_report_relative() -> Result<(), ProtocolError> {
    let mut buf = [0u8; INPUT_REPORT_SIZE];
    write_motion_report(&mut buf, &MotionMessage::new(3, -4, Buttons::LEFT))?;
    assert_snapshot!(hex(&buf), @"01 01 03 fc");
    Ok(())
}

#[test]
fn test_snapshot_idle_report_debug() -> Result<(), ProtocolError> {
    let mut buf = [0xAAu8; INPUT_REPORT_SIZE];
    write_idle_report(&mut buf)?;
    let report = InputReport::parse(&buf)?;
    assert_snapshot!(
        format!("id={} idle={} buttons={:#04x}", report.report_id, report.is_idle(), report.message.buttons.bits()),
        @"id=1 idle=true buttons=0x00"
    );
    Ok(())
}
