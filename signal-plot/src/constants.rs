//! Named time constants
//!
//! Constants are declared once per document and referenced by name inside time
//! expressions. The first declaration of a name wins; later ones are ignored.
//! Names must not be blank: legacy evaluation matches them as substrings.

use crate::document::ConstantDecl;
use crate::types::{PlotError, Result};
use indexmap::IndexMap;

/// Time unit marker accepted (and stripped) on literals
pub const TIME_UNIT: &str = "ms";

/// Resolved constants in declaration order, values in milliseconds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantTable {
    values: IndexMap<String, f64>,
}

impl ConstantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every declaration of a document.
    ///
    /// A malformed value or a blank name fails the whole table.
    pub fn from_declarations(declarations: &[ConstantDecl]) -> Result<Self> {
        let mut table = Self::new();

        for decl in declarations {
            let value = parse_time_literal(&decl.value)?;
            if !table.define(decl.name.clone(), value)? {
                log::warn!(
                    "Constant '{}' declared more than once, keeping first value {}",
                    decl.name,
                    table.values[decl.name.as_str()]
                );
            }
        }

        Ok(table)
    }

    /// Define a constant. Returns false (and keeps the old value) if the name
    /// is already present.
    pub fn define(&mut self, name: impl Into<String>, value: f64) -> Result<bool> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PlotError::parse(name, "constant name must not be empty"));
        }
        if self.values.contains_key(&name) {
            return Ok(false);
        }
        self.values.insert(name, value);
        Ok(true)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

/// Strip every occurrence of the unit marker from a time string
pub fn strip_unit(text: &str) -> String {
    text.replace(TIME_UNIT, "")
}

/// Parse a numeric literal with an optional `ms` unit marker
pub fn parse_time_literal(raw: &str) -> Result<f64> {
    parse_number(raw, &strip_unit(raw))
}

/// Parse `text` as a finite float, reporting `input` on failure
pub(crate) fn parse_number(input: &str, text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| PlotError::parse(input, format!("'{}' is not a number", trimmed)))?;

    if !value.is_finite() {
        return Err(PlotError::parse(input, format!("'{}' is not a finite number", trimmed)));
    }

    Ok(value)
}
