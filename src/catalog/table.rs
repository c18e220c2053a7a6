//! Built-in operation table and its validation

use std::collections::HashSet;

use crate::error::{HookError, Result};

use super::operation::{Layout, Operation, OperationKind, OperationSpec, ParamSpec, Revision};

use OperationKind::*;
use Revision::*;

const TIMER: &[ParamSpec] = &[ParamSpec::int("timer")];
const SIM_ID: &[ParamSpec] = &[ParamSpec::int("sim_id")];
const SENSOR_ID: &[ParamSpec] = &[ParamSpec::int("sensor_id")];
const THRESHOLD: &[ParamSpec] = &[
    ParamSpec::bool("activate"),
    ParamSpec::int("sensor_id"),
    ParamSpec::int("min_threshold"),
    ParamSpec::int("max_threshold"),
];

const fn row(
    kind: OperationKind,
    revision: Revision,
    code: i32,
    params: &'static [ParamSpec],
    layout: Layout,
    summary: &'static str,
) -> OperationSpec {
    OperationSpec {
        operation: Operation::new(kind, revision),
        code,
        params,
        layout,
        summary,
    }
}

/// Every known operation across all revisions
pub static CATALOG: &[OperationSpec] = &[
    // -------------------------------------------------------------------------
    // Legacy: one command byte, words only where a value follows
    // -------------------------------------------------------------------------
    row(PowerOff, Legacy, 0xAA, &[], Layout::Binary { size: 1 }, "AT+CPWROFF"),
    row(TriggerFastDormancy, Legacy, 0xBB, &[], Layout::Binary { size: 1 }, "AT+XFDOR=1"),
    row(SetFastDormancyTimer, Legacy, 0xCC, TIMER, Layout::Binary { size: 8 }, "AT+XFDORT=<timer>"),
    row(SetActiveSim, Legacy, 0xD0, SIM_ID, Layout::Binary { size: 8 }, "AT+XSIM=<sim_id>"),
    row(GetActiveSim, Legacy, 0xD1, &[], Layout::Binary { size: 1 }, "AT+XSIM=?"),
    // -------------------------------------------------------------------------
    // Aligned: every field a little-endian i32
    // -------------------------------------------------------------------------
    row(ThermalGetSensor, Aligned, 0xA0, SENSOR_ID, Layout::Binary { size: 8 }, "read thermal sensor"),
    row(ThermalSetThreshold, Aligned, 0xA1, THRESHOLD, Layout::Binary { size: 20 }, "set thermal sensor thresholds"),
    row(TriggerFastDormancy, Aligned, 0xBB, &[], Layout::Binary { size: 4 }, "AT+XFDOR=1"),
    row(SetFastDormancyTimer, Aligned, 0xCC, TIMER, Layout::Binary { size: 8 }, "AT+XFDORT=<timer>"),
    row(SetActiveSim, Aligned, 0xD0, SIM_ID, Layout::Binary { size: 8 }, "AT+XSIM=<sim_id>"),
    row(GetActiveSim, Aligned, 0xD1, &[], Layout::Binary { size: 4 }, "AT+XSIM=?"),
    // -------------------------------------------------------------------------
    // Strings: decimal code followed by positional tokens
    // -------------------------------------------------------------------------
    row(ThermalGetSensor, Strings, 162, SENSOR_ID, Layout::Tokens(&[&[0]]), "read thermal sensor"),
    // The modem parses the four threshold values out of one token.
    row(ThermalSetThreshold, Strings, 163, THRESHOLD, Layout::Tokens(&[&[0, 1, 2, 3]]), "set thermal sensor thresholds"),
    row(GetAtr, Strings, 165, &[], Layout::Tokens(&[]), "read SIM answer to reset"),
];

/// All built-in rows
pub fn entries() -> &'static [OperationSpec] {
    CATALOG
}

/// Find the row for an operation
pub fn lookup(operation: Operation) -> Option<&'static OperationSpec> {
    CATALOG.iter().find(|spec| spec.operation == operation)
}

/// Find a binary row by its command code, as the modem side does
///
/// Legacy and aligned revisions share codes, so the first match is returned.
pub fn find_binary(code: i32) -> Option<&'static OperationSpec> {
    CATALOG
        .iter()
        .find(|spec| matches!(spec.layout, Layout::Binary { .. }) && spec.code == code)
}

/// Find a string row by its command code
pub fn find_strings(code: i32) -> Option<&'static OperationSpec> {
    CATALOG
        .iter()
        .find(|spec| matches!(spec.layout, Layout::Tokens(_)) && spec.code == code)
}

/// Check the built-in table
pub fn validate_builtin() -> Result<()> {
    validate(CATALOG)
}

/// Check a set of rows for layout and uniqueness problems
///
/// - binary sizes are 1 (bare command byte, no parameters) or a multiple of
///   4 with room for the code word plus one word per parameter
/// - each `(kind, revision)` appears once
/// - command codes are unique within a revision
/// - a token layout uses every parameter exactly once
pub fn validate(entries: &[OperationSpec]) -> Result<()> {
    let mut operations = HashSet::new();
    let mut codes = HashSet::new();

    for spec in entries {
        let op = spec.operation;

        if !operations.insert(op) {
            return Err(HookError::Catalog(format!("{} is listed twice", op)));
        }
        if !codes.insert((op.revision, spec.code)) {
            return Err(HookError::Catalog(format!(
                "{}: code 0x{:02x} already used in the {} revision",
                op, spec.code, op.revision
            )));
        }

        match spec.layout {
            Layout::Binary { size: 1 } => {
                if !spec.params.is_empty() {
                    return Err(HookError::Catalog(format!(
                        "{}: single-byte command cannot carry parameters",
                        op
                    )));
                }
                if !(0..=0xFF).contains(&spec.code) {
                    return Err(HookError::Catalog(format!(
                        "{}: code {} does not fit in one byte",
                        op, spec.code
                    )));
                }
            }
            Layout::Binary { size } => {
                let needed = 4 * (1 + spec.params.len());
                if size % 4 != 0 {
                    return Err(HookError::Catalog(format!(
                        "{}: size {} is not a multiple of 4",
                        op, size
                    )));
                }
                if size < needed {
                    return Err(HookError::Catalog(format!(
                        "{}: size {} cannot hold {} bytes of fields",
                        op, size, needed
                    )));
                }
            }
            Layout::Tokens(tokens) => {
                let mut seen = vec![false; spec.params.len()];
                for &index in tokens.iter().flat_map(|token| token.iter()) {
                    let Some(slot) = seen.get_mut(index) else {
                        return Err(HookError::Catalog(format!(
                            "{}: token refers to missing parameter #{}",
                            op, index
                        )));
                    };
                    if *slot {
                        return Err(HookError::Catalog(format!(
                            "{}: parameter #{} appears in more than one token",
                            op, index
                        )));
                    }
                    *slot = true;
                }
                if let Some(index) = seen.iter().position(|used| !used) {
                    return Err(HookError::Catalog(format!(
                        "{}: parameter #{} is never encoded",
                        op, index
                    )));
                }
            }
        }
    }

    Ok(())
}
