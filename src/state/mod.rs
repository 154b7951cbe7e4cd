// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The derived vacuum state machine.
//!
//! [`advance`] folds a stream of [`PropertySnapshot`](crate::telemetry::PropertySnapshot)s
//! into a stable [`VacuumStatus`]. It is a pure function of
//! `(previous, snapshot)` with no I/O and no shared state, which is what
//! makes it independently testable.

mod machine;
mod status;

pub use machine::advance;
pub use status::{VacuumState, VacuumStatus};
