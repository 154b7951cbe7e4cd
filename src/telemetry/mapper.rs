// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Positional zip of a `get_prop` result back onto its request.
//!
//! The device answers a batched read with an ordered array aligned with
//! the requested names. Two shapes of "missing" occur in the wild and
//! both map to [`PropertyValue::Absent`]: an explicit `null` at a
//! position, and a result array shorter than the request.

use std::collections::HashMap;

use serde_json::Value;

use super::{PropertySnapshot, PropertyValue};

/// Translates one batched property read into a snapshot.
///
/// Pure function: positions where the value is the device's "not
/// available" sentinel (`null`) or beyond the end of a short result map
/// to [`PropertyValue::Absent`] rather than a default, so downstream
/// logic can tell "reported zero" from "did not report". Names outside
/// any fixed registry are carried through untouched, which keeps the
/// mapper forward-compatible with firmware additions.
#[must_use]
pub fn map_properties(names: &[&str], values: &[Value]) -> PropertySnapshot {
    let mut mapped = HashMap::with_capacity(names.len());

    for (position, name) in names.iter().enumerate() {
        let value = values.get(position).map_or(PropertyValue::Absent, convert);
        mapped.insert((*name).to_string(), value);
    }

    if values.len() > names.len() {
        tracing::debug!(
            requested = names.len(),
            received = values.len(),
            "device returned more values than requested, extras dropped"
        );
    }

    PropertySnapshot::new(mapped)
}

/// Converts one raw JSON value into the tagged property union.
fn convert(value: &Value) -> PropertyValue {
    match value {
        Value::Null => PropertyValue::Absent,
        Value::Bool(b) => PropertyValue::Bool(*b),
        Value::Number(n) => n.as_i64().map_or_else(
            || n.as_f64().map_or(PropertyValue::Absent, PropertyValue::Float),
            PropertyValue::Int,
        ),
        Value::String(s) => PropertyValue::Str(s.clone()),
        // Structured values are not interpreted; keep them verbatim.
        other => PropertyValue::Str(other.to_string()),
    }
}
