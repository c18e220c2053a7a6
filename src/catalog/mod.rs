//! Catalog Module
//!
//! Static table of every OEM hook operation the client knows how to build.
//!
//! ## Revisions
//! The command set went through three revisions. All of them coexist here,
//! keyed by `(OperationKind, Revision)`:
//!
//! | Revision | Mode   | Field layout                                   |
//! |----------|--------|------------------------------------------------|
//! | Legacy   | binary | command byte, padded to a word when data follows |
//! | Aligned  | binary | little-endian i32 words throughout              |
//! | Strings  | string | decimal code token, then positional tokens      |
//!
//! The table is the wire contract with modem firmware and must not be
//! reordered or renumbered.

mod operation;
mod table;

pub use operation::{
    EncodingMode, Layout, Operation, OperationKind, OperationSpec, ParamKind, ParamSpec, Revision,
};
pub use table::{entries, find_binary, find_strings, lookup, validate, validate_builtin, CATALOG};
