// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw property values and point-in-time snapshots.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// One raw property value as reported by the device.
///
/// [`PropertyValue::Absent`] records that the device did *not* report
/// the property — a different fact from reporting zero, and one the
/// state machine's hysteresis depends on.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// An integer reading.
    Int(i64),
    /// A floating-point reading.
    Float(f64),
    /// A boolean reading.
    Bool(bool),
    /// A string reading (also used for value shapes this library does
    /// not interpret, kept verbatim for forward compatibility).
    Str(String),
    /// The device did not report this property.
    Absent,
}

impl PropertyValue {
    /// Returns the value as an integer, if it is one.
    ///
    /// Booleans coerce to 0/1, matching how several firmware builds
    /// report flag properties.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Bool(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    /// Returns the value as a float; integer readings coerce.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            #[allow(clippy::cast_precision_loss)]
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Returns `true` if the device did not report this property.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// One point-in-time batch reading of device properties.
///
/// Produced fresh on every poll cycle and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySnapshot {
    values: HashMap<String, PropertyValue>,
    taken_at: DateTime<Utc>,
}

impl PropertySnapshot {
    /// Creates a snapshot from mapped values, timestamped now.
    #[must_use]
    pub fn new(values: HashMap<String, PropertyValue>) -> Self {
        Self {
            values,
            taken_at: Utc::now(),
        }
    }

    /// Returns when this snapshot was taken.
    #[must_use]
    pub const fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    /// Looks up a property; names that were never requested read as
    /// [`PropertyValue::Absent`].
    #[must_use]
    pub fn get(&self, name: &str) -> &PropertyValue {
        self.values.get(name).unwrap_or(&PropertyValue::Absent)
    }

    /// Integer view of a property, `None` when absent or non-numeric.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).as_int()
    }

    /// Float view of a property, `None` when absent or non-numeric.
    #[must_use]
    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).as_float()
    }

    /// Number of properties recorded (absent ones included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the snapshot holds no properties at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(&str, PropertyValue)]) -> PropertySnapshot {
        PropertySnapshot::new(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn int_coercions() {
        assert_eq!(PropertyValue::Int(5).as_int(), Some(5));
        assert_eq!(PropertyValue::Bool(true).as_int(), Some(1));
        assert_eq!(PropertyValue::Str("5".into()).as_int(), None);
        assert_eq!(PropertyValue::Absent.as_int(), None);
    }

    #[test]
    fn float_coercions() {
        assert_eq!(PropertyValue::Float(1.5).as_float(), Some(1.5));
        assert_eq!(PropertyValue::Int(3).as_float(), Some(3.0));
        assert_eq!(PropertyValue::Bool(true).as_float(), None);
    }

    #[test]
    fn missing_name_reads_as_absent() {
        let snap = snapshot(&[("run_state", PropertyValue::Int(3))]);
        assert!(snap.get("never_requested").is_absent());
        assert_eq!(snap.int("run_state"), Some(3));
    }

    #[test]
    fn absent_is_distinct_from_zero() {
        let snap = snapshot(&[
            ("err_state", PropertyValue::Int(0)),
            ("battary_life", PropertyValue::Absent),
        ]);
        assert_eq!(snap.int("err_state"), Some(0));
        assert_eq!(snap.int("battary_life"), None);
        assert!(!snap.get("err_state").is_absent());
        assert!(snap.get("battary_life").is_absent());
    }
}
