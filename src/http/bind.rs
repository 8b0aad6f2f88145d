//! Binding string maps (query, path, headers) onto caller types.
//!
//! A type opts in by implementing [`Bind`], naming for each field the key it
//! reads and the conversion to apply:
//!
//! ```
//! # use rye::http::bind::{Bind, BindError, Fields};
//! #[derive(Default)]
//! struct Page {
//!     q: String,
//!     limit: i64,
//! }
//!
//! impl Bind for Page {
//!     fn bind(&mut self, fields: &Fields<'_>) -> Result<(), BindError> {
//!         fields.string("q", &mut self.q)?;
//!         fields.int("limit", &mut self.limit)
//!     }
//! }
//! ```
//!
//! Keys missing from the map leave the field untouched.

use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("invalid value {value:?} for {key:?}: expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

/// Read-only view of the values being bound.
pub struct Fields<'a> {
    values: &'a HashMap<String, String>,
}

impl<'a> Fields<'a> {
    pub fn new(values: &'a HashMap<String, String>) -> Self {
        Self { values }
    }

    pub fn raw(&self, key: &str) -> Option<&'a str> {
        self.values.get(key).map(|v| v.as_str())
    }

    pub fn string(&self, key: &str, target: &mut String) -> Result<(), BindError> {
        if let Some(value) = self.raw(key) {
            *target = value.to_string();
        }
        Ok(())
    }

    pub fn int(&self, key: &str, target: &mut i64) -> Result<(), BindError> {
        self.convert(key, target, "integer")
    }

    pub fn float(&self, key: &str, target: &mut f64) -> Result<(), BindError> {
        self.convert(key, target, "float")
    }

    pub fn bool(&self, key: &str, target: &mut bool) -> Result<(), BindError> {
        let Some(value) = self.raw(key) else {
            return Ok(());
        };

        *target = parse_bool(value).ok_or_else(|| invalid(key, value, "bool"))?;
        Ok(())
    }

    fn convert<T: FromStr>(
        &self,
        key: &str,
        target: &mut T,
        expected: &'static str,
    ) -> Result<(), BindError> {
        let Some(value) = self.raw(key) else {
            return Ok(());
        };

        *target = value.parse().map_err(|_| invalid(key, value, expected))?;
        Ok(())
    }
}

fn invalid(key: &str, value: &str, expected: &'static str) -> BindError {
    BindError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    }
}

/// A type that can be filled in from a string map.
pub trait Bind: Default {
    fn bind(&mut self, fields: &Fields<'_>) -> Result<(), BindError>;
}

/// Builds a `T` from its default and the given values.
pub fn bind_map<T: Bind>(values: &HashMap<String, String>) -> Result<T, BindError> {
    let mut target = T::default();
    target.bind(&Fields::new(values))?;
    Ok(target)
}

/// Accepts the spellings `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
