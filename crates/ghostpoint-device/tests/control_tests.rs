//! Control dispatch tests: validation order, in-place responses and the
//! interval exchange.

use ghostpoint_device::prelude::*;
use proptest::prelude::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn started(config: DeviceConfig) -> Result<VirtualMouse, DeviceError> {
    let mouse = VirtualMouse::new(config)?;
    mouse.start()?;
    Ok(mouse)
}

fn dword(code: ControlCode, value: u32) -> Result<[u8; DwordReport::SIZE], ProtocolError> {
    let mut buf = [0u8; DwordReport::SIZE];
    DwordReport::new(code, value).encode(&mut buf)?;
    Ok(buf)
}

fn move_request(x: i32, y: i32, buttons: Buttons) -> Result<[u8; MoveReport::SIZE], String> {
    let x = <Coordinate as WireCoordinate>::from_i32(x).ok_or("x out of range")?;
    let y = <Coordinate as WireCoordinate>::from_i32(y).ok_or("y out of range")?;
    let mut buf = [0u8; MoveReport::SIZE];
    MoveReport {
        message: MotionMessage::new(x, y, buttons),
    }
    .encode(&mut buf)
    .map_err(|e| e.to_string())?;
    Ok(buf)
}

fn queue_size(mouse: &VirtualMouse) -> Result<u32, Box<dyn std::error::Error>> {
    let mut request = dword(ControlCode::QueueSize, 0xDEAD_BEEF)?;
    mouse.get_feature(CONTROL_REPORT_ID, &mut request)?;
    Ok(DwordReport::read_value(&request)?)
}

#[test]
fn test_interval_below_floor_rejected() -> TestResult {
    let mouse = started(DeviceConfig::default())?;
    let mut request = dword(ControlCode::Interval, 4999)?;
    let outcome = mouse.get_feature(CONTROL_REPORT_ID, &mut request)?;

    assert_eq!(
        outcome,
        ControlOutcome::Rejected(ControlCode::Interval, RejectReason::IntervalBelowFloor)
    );
    let response = DwordReport::decode(&request)?;
    assert!(response.is_error());
    assert_eq!(response.value, 8000);
    assert_eq!(mouse.interval_us(), 8000);
    Ok(())
}

#[test]
fn test_interval_accepted_echoes_previous() -> TestResult {
    let mouse = started(DeviceConfig::default())?;
    let mut request = dword(ControlCode::Interval, 10_000)?;
    let outcome = mouse.get_feature(CONTROL_REPORT_ID, &mut request)?;

    assert_eq!(outcome, ControlOutcome::Completed(ControlCode::Interval));
    let response = DwordReport::decode(&request)?;
    assert!(!response.is_error());
    assert_eq!(response.value, 8000);
    assert_eq!(mouse.interval_us(), 10_000);

    // A zero request reads the value back without changing it.
    let mut peek = dword(ControlCode::Interval, 0)?;
    mouse.get_feature(CONTROL_REPORT_ID, &mut peek)?;
    assert_eq!(DwordReport::read_value(&peek)?, 10_000);
    assert_eq!(mouse.interval_us(), 10_000);
    Ok(())
}

#[test]
fn test_interval_exactly_at_floor() -> TestResult {
    let mouse = started(DeviceConfig::default())?;
    let mut request = dword(ControlCode::Interval, 5000)?;
    let outcome = mouse.get_feature(CONTROL_REPORT_ID, &mut request)?;
    assert!(outcome.is_completed());
    assert_eq!(mouse.interval_us(), 5000);
    Ok(())
}

#[test]
fn test_queue_size_and_clear() -> TestResult {
    let mouse = started(DeviceConfig::default())?;
    for i in 1..=3 {
        let mut request = move_request(i, i + 1, Buttons::NONE)?;
        assert!(mouse.get_feature(CONTROL_REPORT_ID, &mut request)?.is_completed());
    }
    assert_eq!(queue_size(&mouse)?, 3);

    let mut clear = [CONTROL_REPORT_ID, ControlCode::ClearQueue.as_u8()];
    let outcome = mouse.get_feature(CONTROL_REPORT_ID, &mut clear)?;
    assert_eq!(outcome, ControlOutcome::Completed(ControlCode::ClearQueue));
    assert_eq!(clear, [CONTROL_REPORT_ID, ControlCode::ClearQueue.as_u8()]);
    assert_eq!(queue_size(&mouse)?, 0);
    Ok(())
}

#[test]
fn test_move_accepted_leaves_code_unchanged() -> TestResult {
    let mouse = started(DeviceConfig::default())?;
    let mut request = move_request(5, 6, Buttons::RIGHT)?;
    let original = request;
    mouse.get_feature(CONTROL_REPORT_ID, &mut request)?;
    assert_eq!(request, original);
    Ok(())
}

#[test]
fn test_move_fills_to_usable_capacity() -> TestResult {
    let config = DeviceConfig::builder().queue_capacity(8).build()?;
    let mouse = started(config)?;
    for _ in 0..7 {
        let mut request = move_request(1, 1, Buttons::NONE)?;
        assert!(mouse.get_feature(CONTROL_REPORT_ID, &mut request)?.is_completed());
    }
    let mut request = move_request(1, 1, Buttons::NONE)?;
    let outcome = mouse.get_feature(CONTROL_REPORT_ID, &mut request)?;
    assert_eq!(
        outcome,
        ControlOutcome::Rejected(ControlCode::Move, RejectReason::QueueFull)
    );
    assert_eq!(request.get(1), Some(&ControlCode::Error.as_u8()));
    assert_eq!(queue_size(&mouse)?, 7);
    Ok(())
}

#[test]
fn test_foreign_report_id_rejected_without_inspection() -> TestResult {
    let mouse = started(DeviceConfig::default())?;
    let mut request = dword(ControlCode::Interval, 20_000)?;
    let before = request;
    assert_eq!(
        mouse.get_feature(POINTER_REPORT_ID, &mut request),
        Err(DeviceError::UnsupportedReportId(POINTER_REPORT_ID))
    );
    assert_eq!(request, before);
    assert_eq!(mouse.interval_us(), 8000);
    Ok(())
}

#[test]
fn test_header_too_small() -> TestResult {
    let mouse = started(DeviceConfig::default())?;
    let mut tiny = [CONTROL_REPORT_ID];
    assert_eq!(
        mouse.get_feature(CONTROL_REPORT_ID, &mut tiny),
        Err(DeviceError::buffer_too_small(2, 1))
    );
    Ok(())
}

#[test]
fn test_undersized_bodies_never_partially_written() -> TestResult {
    let mouse = started(DeviceConfig::default())?;

    let mut interval = [CONTROL_REPORT_ID, ControlCode::Interval.as_u8(), 0x10, 0x27];
    assert!(matches!(
        mouse.get_feature(CONTROL_REPORT_ID, &mut interval),
        Err(DeviceError::BufferTooSmall { required: 6, .. })
    ));
    assert_eq!(interval, [CONTROL_REPORT_ID, 0x03, 0x10, 0x27]);
    assert_eq!(mouse.interval_us(), 8000);

    let mut info = [CONTROL_REPORT_ID, ControlCode::Info.as_u8(), 0, 0, 0, 0];
    assert!(mouse.get_feature(CONTROL_REPORT_ID, &mut info).is_err());
    assert_eq!(info, [CONTROL_REPORT_ID, 0x01, 0, 0, 0, 0]);

    let mut short_move = [CONTROL_REPORT_ID, ControlCode::Move.as_u8(), 0x01];
    assert!(mouse.get_feature(CONTROL_REPORT_ID, &mut short_move).is_err());
    assert_eq!(mouse.queue_depth(), 0);
    Ok(())
}

#[test]
fn test_unknown_code() -> TestResult {
    let mouse = started(DeviceConfig::default())?;
    let mut request = [CONTROL_REPORT_ID, 0x42, 0, 0, 0, 0];
    let err = mouse
        .get_feature(CONTROL_REPORT_ID, &mut request)
        .err()
        .ok_or("unknown code accepted")?;
    assert_eq!(err, DeviceError::UnsupportedControlCode(0x42));
    assert_eq!(err.category(), ErrorCategory::Unsupported);
    assert_eq!(request.get(1), Some(&0x42));
    Ok(())
}

#[test]
fn test_info_response() -> TestResult {
    let config = DeviceConfig::builder().queue_capacity(32).build()?;
    let mouse = started(config)?;
    let mut request = [0u8; 16];
    request[0] = CONTROL_REPORT_ID;
    request[1] = ControlCode::Info.as_u8();
    mouse.get_feature(CONTROL_REPORT_ID, &mut request)?;

    let info = InfoReport::decode(&request)?;
    assert_eq!(info.queue_capacity, 32);
    assert_eq!(info.mode(), MotionMode::BUILD);
    assert_eq!(info.is_relative(), cfg!(not(feature = "absolute")));
    // Bytes past the info record are untouched.
    assert!(request.iter().skip(InfoReport::SIZE).all(|&b| b == 0));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_depth_never_exceeds_usable_capacity(
        capacity in 2usize..24,
        moves in 0usize..64,
        clear_at in proptest::option::of(0usize..64),
    ) {
        let config = DeviceConfig::builder()
            .queue_capacity(capacity)
            .build()
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mouse = started(config).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mut expected = 0usize;

        for i in 0..moves {
            if clear_at == Some(i) {
                let mut clear = [CONTROL_REPORT_ID, ControlCode::ClearQueue.as_u8()];
                prop_assert!(mouse.get_feature(CONTROL_REPORT_ID, &mut clear).is_ok());
                expected = 0;
            }
            let mut request = move_request(1, 1, Buttons::NONE).map_err(TestCaseError::fail)?;
            let outcome = mouse
                .get_feature(CONTROL_REPORT_ID, &mut request)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            if expected < capacity - 1 {
                prop_assert!(outcome.is_completed());
                expected += 1;
            } else {
                prop_assert_eq!(
                    outcome,
                    ControlOutcome::Rejected(ControlCode::Move, RejectReason::QueueFull)
                );
            }
            prop_assert_eq!(mouse.queue_depth(), expected);
            prop_assert!(mouse.queue_depth() < capacity);
        }
    }

    #[test]
    fn prop_interval_exchange(floor in 1u32..20_000, requested in any::<u32>()) {
        let config = DeviceConfig::builder()
            .min_interval_us(floor)
            .default_interval_us(floor.saturating_add(3000))
            .build()
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mouse = started(config).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let before = mouse.interval_us();

        let mut request = dword(ControlCode::Interval, requested)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(mouse.get_feature(CONTROL_REPORT_ID, &mut request).is_ok());

        let response = DwordReport::decode(&request)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(response.value, before);
        if requested >= floor {
            prop_assert!(!response.is_error());
            prop_assert_eq!(mouse.interval_us(), requested);
        } else {
            prop_assert!(response.is_error());
            prop_assert_eq!(mouse.interval_us(), before);
        }
    }
}
