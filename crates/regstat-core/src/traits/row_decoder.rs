//! Field coercion for imported rows.
//!
//! The engine never parses CSV itself: callers hand it string-keyed field maps
//! and a decoder that owns the defaulting rules for each field kind.

use std::collections::HashMap;

/// One source record, keyed by column header.
pub type RawRow = HashMap<String, String>;

/// Coerces raw string fields into typed values.
///
/// Every accessor returns `None` for a missing or blank field.
pub trait RowDecoder: Send + Sync {
    /// Trimmed, non-empty text.
    fn text<'a>(&self, row: &'a RawRow, field: &str) -> Option<&'a str>;

    fn integer(&self, row: &RawRow, field: &str) -> Option<i64>;

    fn real(&self, row: &RawRow, field: &str) -> Option<f64>;

    /// Indicator flag; absent or unrecognized values decode as `false`.
    fn flag(&self, row: &RawRow, field: &str) -> bool;
}

/// Default decoder for the registration extracts: accepts a decimal comma and
/// French/English yes markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRowDecoder;

impl RowDecoder for StandardRowDecoder {
    fn text<'a>(&self, row: &'a RawRow, field: &str) -> Option<&'a str> {
        row.get(field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn integer(&self, row: &RawRow, field: &str) -> Option<i64> {
        let raw = self.text(row, field)?;
        raw.parse::<i64>().ok().or_else(|| {
            // "1500,0" and "1500.0" both appear in older extracts.
            self.real(row, field)
                .filter(|v| v.fract() == 0.0)
                .map(|v| v as i64)
        })
    }

    fn real(&self, row: &RawRow, field: &str) -> Option<f64> {
        let raw = self.text(row, field)?;
        raw.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
    }

    fn flag(&self, row: &RawRow, field: &str) -> bool {
        match self.text(row, field) {
            Some(v) => matches!(
                v.to_ascii_uppercase().as_str(),
                "1" | "O" | "OUI" | "Y" | "YES" | "TRUE"
            ),
            None => false,
        }
    }
}
