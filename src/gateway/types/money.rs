//! Money input type for the payment endpoint
//!
//! Front ends send amounts either as JSON numbers (`250.0`) or as decimal
//! strings (`"250.0"`). Both are accepted and normalized to one `Decimal`.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::*;
use serde::de::{self, Visitor};
use serde::{Deserialize, Serialize};

// ============================================================================
// LenientDecimal: number-or-string Decimal at Serde Layer
// ============================================================================

/// Decimal accepting a JSON number or a numeric string.
///
/// Rejected at deserialization:
/// - `null`, booleans, objects, arrays
/// - non-numeric strings (`"abc"`) and empty strings
/// - numbers outside the `Decimal` range (`1e30`)
///
/// The sign is not checked; the payment service owns amount rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LenientDecimal(Decimal);

impl LenientDecimal {
    pub fn inner(self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for LenientDecimal {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

impl std::ops::Deref for LenientDecimal {
    type Target = Decimal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn parse_text(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

struct LenientDecimalVisitor;

impl Visitor<'_> for LenientDecimalVisitor {
    type Value = LenientDecimal;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or numeric string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(LenientDecimal(Decimal::from(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(LenientDecimal(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Decimal::try_from(v)
            .map(LenientDecimal)
            .map_err(|_| E::custom(format!("Amount out of range: {}", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        parse_text(v)
            .map(LenientDecimal)
            .ok_or_else(|| E::custom(format!("Invalid amount: {:?}", v)))
    }
}

impl<'de> Deserialize<'de> for LenientDecimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(LenientDecimalVisitor)
    }
}

impl Serialize for LenientDecimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
