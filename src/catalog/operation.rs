//! Operation definitions
//!
//! Names every logical OEM hook command and describes the shape of its
//! catalog row.

use std::fmt;

use crate::protocol::ReplyKind;

/// Logical command tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    PowerOff,
    TriggerFastDormancy,
    SetFastDormancyTimer,
    SetActiveSim,
    GetActiveSim,
    ThermalGetSensor,
    ThermalSetThreshold,
    GetAtr,
}

impl OperationKind {
    pub const ALL: [OperationKind; 8] = [
        OperationKind::PowerOff,
        OperationKind::TriggerFastDormancy,
        OperationKind::SetFastDormancyTimer,
        OperationKind::SetActiveSim,
        OperationKind::GetActiveSim,
        OperationKind::ThermalGetSensor,
        OperationKind::ThermalSetThreshold,
        OperationKind::GetAtr,
    ];

    /// Kebab-case name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::PowerOff => "power-off",
            OperationKind::TriggerFastDormancy => "trigger-fast-dormancy",
            OperationKind::SetFastDormancyTimer => "set-fast-dormancy-timer",
            OperationKind::SetActiveSim => "set-active-sim",
            OperationKind::GetActiveSim => "get-active-sim",
            OperationKind::ThermalGetSensor => "thermal-get-sensor",
            OperationKind::ThermalSetThreshold => "thermal-set-threshold",
            OperationKind::GetAtr => "get-atr",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Command set revision
///
/// - `Legacy`: single command byte, 4-byte words only where a value follows
/// - `Aligned`: every field is a 4-byte little-endian word
/// - `Strings`: decimal tokens for the OEM hook strings request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Revision {
    Legacy,
    Aligned,
    Strings,
}

impl Revision {
    pub const ALL: [Revision; 3] = [Revision::Legacy, Revision::Aligned, Revision::Strings];

    pub fn name(&self) -> &'static str {
        match self {
            Revision::Legacy => "legacy",
            Revision::Aligned => "aligned",
            Revision::Strings => "strings",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|revision| revision.name() == name)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// One catalog row key: a logical command in a given revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation {
    pub kind: OperationKind,
    pub revision: Revision,
}

impl Operation {
    pub const fn new(kind: OperationKind, revision: Revision) -> Self {
        Self { kind, revision }
    }

    /// Look up this operation's catalog row
    pub fn spec(&self) -> Option<&'static OperationSpec> {
        super::lookup(*self)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind, self.revision)
    }
}

/// How a command travels to the modem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingMode {
    Binary,
    String,
}

/// Declared type of a single parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Int,
    Bool,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Int => f.write_str("int"),
            ParamKind::Bool => f.write_str("bool"),
        }
    }
}

/// A named, typed parameter slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
}

impl ParamSpec {
    pub const fn int(name: &'static str) -> Self {
        Self { name, kind: ParamKind::Int }
    }

    pub const fn bool(name: &'static str) -> Self {
        Self { name, kind: ParamKind::Bool }
    }
}

/// Wire layout of a catalog row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Fixed-size buffer of the given byte length
    Binary { size: usize },

    /// Tokens after the code; each token lists the parameter indices it
    /// carries, space-joined when there is more than one
    Tokens(&'static [&'static [usize]]),
}

/// A full catalog row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    pub operation: Operation,
    pub code: i32,
    pub params: &'static [ParamSpec],
    pub layout: Layout,
    /// Modem-side action, for listings
    pub summary: &'static str,
}

impl OperationSpec {
    pub fn mode(&self) -> EncodingMode {
        match self.layout {
            Layout::Binary { .. } => EncodingMode::Binary,
            Layout::Tokens(_) => EncodingMode::String,
        }
    }

    /// Which completion the transport must deliver for this row
    pub fn reply_kind(&self) -> ReplyKind {
        match self.mode() {
            EncodingMode::Binary => ReplyKind::Raw,
            EncodingMode::String => ReplyKind::Strings,
        }
    }
}
