//! Codec Tests
//!
//! Tests for request encoding against the built-in catalog.

use oemhook::catalog::{
    self, Layout, Operation, OperationKind, OperationSpec, ParamKind, ParamSpec, Revision,
};
use oemhook::protocol::{decode_words, encode, encode_spec, Command, ParamValue, ReplyKind};
use oemhook::EncodingError;

// =============================================================================
// Helper Functions
// =============================================================================

fn op(kind: OperationKind, revision: Revision) -> Operation {
    Operation::new(kind, revision)
}

/// A valid parameter set for any row: ints count up from 1, bools are true
fn sample_params(operation: Operation) -> Vec<ParamValue> {
    let spec = operation.spec().unwrap();
    spec.params
        .iter()
        .enumerate()
        .map(|(i, p)| match p.kind {
            ParamKind::Int => ParamValue::Int(i as i32 + 1),
            ParamKind::Bool => ParamValue::Bool(true),
        })
        .collect()
}

fn raw(command: Command) -> Vec<u8> {
    match command {
        Command::Raw(bytes) => bytes,
        other => panic!("Expected raw command, got {:?}", other),
    }
}

fn tokens(command: Command) -> Vec<String> {
    match command {
        Command::Strings(tokens) => tokens,
        other => panic!("Expected string command, got {:?}", other),
    }
}

// =============================================================================
// Fixed Scenarios
// =============================================================================

#[test]
fn test_trigger_fast_dormancy_legacy_is_one_byte() {
    let command = encode(op(OperationKind::TriggerFastDormancy, Revision::Legacy), &[]).unwrap();
    assert_eq!(raw(command), vec![0xBB]);
}

#[test]
fn test_set_fast_dormancy_timer_zero() {
    let command = encode(
        op(OperationKind::SetFastDormancyTimer, Revision::Legacy),
        &[ParamValue::Int(0)],
    )
    .unwrap();
    assert_eq!(raw(command), vec![0xCC, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_thermal_get_sensor_aligned() {
    let command = encode(
        op(OperationKind::ThermalGetSensor, Revision::Aligned),
        &[ParamValue::Int(0)],
    )
    .unwrap();
    let bytes = raw(command);

    assert_eq!(bytes.len(), 8);
    assert_eq!(decode_words(&bytes), vec![0xA0, 0x00]);
}

#[test]
fn test_get_atr_strings() {
    let command = encode(op(OperationKind::GetAtr, Revision::Strings), &[]).unwrap();
    assert_eq!(tokens(command), vec!["165"]);
}

#[test]
fn test_thermal_set_threshold_strings_keeps_composite_token() {
    let command = encode(
        op(OperationKind::ThermalSetThreshold, Revision::Strings),
        &[
            ParamValue::Bool(true),
            ParamValue::Int(3),
            ParamValue::Int(2300),
            ParamValue::Int(2300),
        ],
    )
    .unwrap();
    assert_eq!(tokens(command), vec!["163", "true 3 2300 2300"]);
}

#[test]
fn test_thermal_set_threshold_aligned_layout() {
    let command = encode(
        op(OperationKind::ThermalSetThreshold, Revision::Aligned),
        &[
            ParamValue::Bool(false),
            ParamValue::Int(2),
            ParamValue::Int(-40),
            ParamValue::Int(85),
        ],
    )
    .unwrap();
    let bytes = raw(command);

    assert_eq!(bytes.len(), 20);
    assert_eq!(decode_words(&bytes), vec![0xA1, 0, 2, -40, 85]);
}

#[test]
fn test_timer_value_little_endian() {
    let command = encode(
        op(OperationKind::SetFastDormancyTimer, Revision::Aligned),
        &[ParamValue::Int(0x03070A0F)],
    )
    .unwrap();
    assert_eq!(raw(command), vec![0xCC, 0, 0, 0, 0x0F, 0x0A, 0x07, 0x03]);
}

#[test]
fn test_set_active_sim_legacy() {
    let command = encode(
        op(OperationKind::SetActiveSim, Revision::Legacy),
        &[ParamValue::Int(1)],
    )
    .unwrap();
    assert_eq!(raw(command), vec![0xD0, 0, 0, 0, 1, 0, 0, 0]);
}

#[test]
fn test_get_active_sim_revisions_differ_in_size() {
    let legacy = encode(op(OperationKind::GetActiveSim, Revision::Legacy), &[]).unwrap();
    let aligned = encode(op(OperationKind::GetActiveSim, Revision::Aligned), &[]).unwrap();

    assert_eq!(raw(legacy), vec![0xD1]);
    assert_eq!(raw(aligned), vec![0xD1, 0, 0, 0]);
}

// =============================================================================
// Catalog-wide Properties
// =============================================================================

#[test]
fn test_encode_is_deterministic_for_every_row() {
    for spec in catalog::entries() {
        let params = sample_params(spec.operation);
        let first = encode(spec.operation, &params).unwrap();
        let second = encode(spec.operation, &params).unwrap();
        assert_eq!(first, second, "{} is not deterministic", spec.operation);
    }
}

#[test]
fn test_binary_length_and_code_for_every_row() {
    for spec in catalog::entries() {
        let Layout::Binary { size } = spec.layout else {
            continue;
        };
        let bytes = raw(encode(spec.operation, &sample_params(spec.operation)).unwrap());

        assert_eq!(bytes.len(), size, "{} has wrong length", spec.operation);
        if size == 1 {
            assert_eq!(bytes[0] as i32, spec.code);
        } else {
            assert_eq!(size % 4, 0);
            assert_eq!(decode_words(&bytes)[0], spec.code, "{}", spec.operation);
        }
    }
}

#[test]
fn test_string_rows_start_with_decimal_code() {
    for spec in catalog::entries() {
        let Layout::Tokens(layout) = spec.layout else {
            continue;
        };
        let out = tokens(encode(spec.operation, &sample_params(spec.operation)).unwrap());

        assert_eq!(out[0], spec.code.to_string());
        assert_eq!(out.len(), 1 + layout.len());
    }
}

#[test]
fn test_command_reply_kind_matches_row() {
    for spec in catalog::entries() {
        let command = encode(spec.operation, &sample_params(spec.operation)).unwrap();
        assert_eq!(command.reply_kind(), spec.reply_kind());
    }
    assert_eq!(
        op(OperationKind::GetAtr, Revision::Strings).spec().unwrap().reply_kind(),
        ReplyKind::Strings
    );
}

// =============================================================================
// Encoding Errors
// =============================================================================

#[test]
fn test_missing_parameter_fails() {
    let operation = op(OperationKind::SetFastDormancyTimer, Revision::Legacy);
    let err = encode(operation, &[]).unwrap_err();

    assert_eq!(
        err,
        EncodingError::ParamCount {
            operation,
            expected: 1,
            got: 0,
        }
    );
}

#[test]
fn test_extra_parameter_fails() {
    let operation = op(OperationKind::TriggerFastDormancy, Revision::Legacy);
    let err = encode(operation, &[ParamValue::Int(1)]).unwrap_err();
    assert!(matches!(err, EncodingError::ParamCount { expected: 0, got: 1, .. }));
}

#[test]
fn test_wrong_parameter_kind_fails() {
    let operation = op(OperationKind::ThermalSetThreshold, Revision::Aligned);
    let err = encode(
        operation,
        &[
            ParamValue::Int(1),
            ParamValue::Int(3),
            ParamValue::Int(2300),
            ParamValue::Int(2300),
        ],
    )
    .unwrap_err();

    match err {
        EncodingError::ParamType {
            index,
            name,
            expected,
            got,
            ..
        } => {
            assert_eq!(index, 0);
            assert_eq!(name, "activate");
            assert_eq!(expected, ParamKind::Bool);
            assert_eq!(got, ParamKind::Int);
        }
        other => panic!("Expected ParamType, got {:?}", other),
    }
}

#[test]
fn test_operation_missing_from_revision_fails() {
    let operation = op(OperationKind::GetAtr, Revision::Legacy);
    let err = encode(operation, &[]).unwrap_err();
    assert_eq!(err, EncodingError::UnknownOperation(operation));
}

#[test]
fn test_undersized_row_is_refused() {
    let spec = OperationSpec {
        operation: op(OperationKind::ThermalSetThreshold, Revision::Aligned),
        code: 0xA1,
        params: &const { [ParamSpec::int("a"), ParamSpec::int("b")] },
        layout: Layout::Binary { size: 8 },
        summary: "",
    };

    let err = encode_spec(&spec, &[ParamValue::Int(1), ParamValue::Int(2)]).unwrap_err();
    assert!(matches!(err, EncodingError::Layout { .. }), "{:?}", err);
}

#[test]
fn test_token_without_parameter_is_refused() {
    let spec = OperationSpec {
        operation: op(OperationKind::ThermalGetSensor, Revision::Strings),
        code: 162,
        params: &const { [ParamSpec::int("sensor_id")] },
        layout: Layout::Tokens(&[&[0], &[1]]),
        summary: "",
    };

    let err = encode_spec(&spec, &[ParamValue::Int(0)]).unwrap_err();
    assert!(matches!(err, EncodingError::Layout { .. }), "{:?}", err);
}

#[test]
fn test_error_message_names_operation() {
    let operation = op(OperationKind::SetActiveSim, Revision::Aligned);
    let err = encode(operation, &[]).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("set-active-sim"), "{}", message);
    assert!(message.contains("aligned"), "{}", message);
}

// =============================================================================
// Parameter Parsing
// =============================================================================

#[test]
fn test_param_value_parse() {
    assert_eq!(ParamValue::parse(ParamKind::Int, "2300"), Some(ParamValue::Int(2300)));
    assert_eq!(ParamValue::parse(ParamKind::Int, "-5"), Some(ParamValue::Int(-5)));
    assert_eq!(ParamValue::parse(ParamKind::Int, "0xA0"), Some(ParamValue::Int(0xA0)));
    assert_eq!(ParamValue::parse(ParamKind::Bool, "1"), Some(ParamValue::Bool(true)));
    assert_eq!(ParamValue::parse(ParamKind::Bool, "false"), Some(ParamValue::Bool(false)));
    assert_eq!(ParamValue::parse(ParamKind::Bool, "yes"), None);
    assert_eq!(ParamValue::parse(ParamKind::Int, "ten"), None);
}
