// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests against an in-process mock device.
//!
//! The mock binds a real UDP socket and speaks the full protocol:
//! handshake, checksum verification, payload decryption, and JSON-RPC
//! dispatch. Tests drive the public [`Vacuum`] API against it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveTime;
use serde_json::{Value, json};
use tokio::net::UdpSocket;

use viomr_lib::protocol::codec;
use viomr_lib::protocol::crypto::CryptoKeys;
use viomr_lib::{CommandError, ControllerError, DeviceToken, FanSpeed, Vacuum, VacuumState};

const TOKEN_BYTES: [u8; 16] = [0x42; 16];
const DEVICE_ID: u32 = 1234;
const INITIAL_STAMP: u32 = 100;

/// Shared, test-adjustable behavior of the mock device.
#[derive(Default)]
struct MockState {
    /// Property values answered to `get_prop`.
    props: HashMap<String, Value>,
    /// Every data request the mock decrypted, in arrival order:
    /// request id, method, params.
    calls: Vec<(u64, String, Vec<Value>)>,
    /// Number of hello frames answered.
    hellos: usize,
    /// While `true`, data requests are silently dropped.
    drop_data_requests: bool,
    /// Corrupt this many data replies (one flipped ciphertext byte).
    garble_replies: usize,
    /// While `true`, `battary_life` reads back as 50 plus the number of
    /// `get_prop` requests seen so far.
    counting_battery: bool,
}

impl MockState {
    fn with_props(pairs: &[(&str, Value)]) -> Self {
        Self {
            props: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
            ..Self::default()
        }
    }

    fn calls_for(&self, method: &str) -> Vec<Vec<Value>> {
        self.calls
            .iter()
            .filter(|(_, m, _)| m == method)
            .map(|(_, _, params)| params.clone())
            .collect()
    }

    fn ids_for(&self, method: &str) -> Vec<u64> {
        self.calls
            .iter()
            .filter(|(_, m, _)| m == method)
            .map(|(id, _, _)| *id)
            .collect()
    }
}

/// Starts a mock device; returns its port and a handle to its state.
async fn start_mock_device(state: MockState) -> (u16, Arc<Mutex<MockState>>) {
    let socket = UdpSocket::bind(("127.0.0.1", 0)).await.unwrap();
    let port = socket.local_addr().unwrap().port();
    let state = Arc::new(Mutex::new(state));
    let shared = Arc::clone(&state);

    tokio::spawn(async move {
        let token = DeviceToken::new(TOKEN_BYTES);
        let keys = CryptoKeys::derive(&token);
        let mut buf = [0u8; 4096];

        loop {
            let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
                return;
            };
            let Ok(frame) = codec::parse_frame(&buf[..len]) else {
                continue;
            };

            if frame.is_hello() {
                shared.lock().unwrap().hellos += 1;
                let mut reply = codec::hello_frame();
                reply[8..12].copy_from_slice(&DEVICE_ID.to_be_bytes());
                reply[12..16].copy_from_slice(&INITIAL_STAMP.to_be_bytes());
                let _ = socket.send_to(&reply, peer).await;
                continue;
            }

            // A real device ignores frames it cannot authenticate.
            if frame.verify_checksum(&token).is_err() {
                continue;
            }
            assert!(
                frame.header.stamp >= INITIAL_STAMP,
                "client sent a stale stamp: {}",
                frame.header.stamp
            );
            let Ok(plaintext) = keys.decrypt(&frame.payload) else {
                continue;
            };
            let request: Value = serde_json::from_slice(&plaintext).unwrap();
            let id = request["id"].as_u64().unwrap();
            let method = request["method"].as_str().unwrap().to_string();
            let params = request["params"].as_array().cloned().unwrap_or_default();

            let reply_body = {
                let mut state = shared.lock().unwrap();
                state.calls.push((id, method.clone(), params.clone()));

                if state.drop_data_requests {
                    continue;
                }

                match method.as_str() {
                    "get_prop" => {
                        let reads = state
                            .calls
                            .iter()
                            .filter(|(_, m, _)| m == "get_prop")
                            .count();
                        let values: Vec<Value> = params
                            .iter()
                            .map(|name| match name.as_str() {
                                Some("battary_life") if state.counting_battery => {
                                    json!(50 + reads)
                                }
                                Some(n) => state.props.get(n).cloned().unwrap_or(Value::Null),
                                None => Value::Null,
                            })
                            .collect();
                        json!({"id": id, "result": values})
                    }
                    "get_consumables" => {
                        json!({"id": id, "result": [90, 60, 30, 45]})
                    }
                    "get_notdisturb" => {
                        json!({"id": id, "result": [1, 22, 0, 8, 30]})
                    }
                    "set_suction" => {
                        state
                            .props
                            .insert("suction_grade".to_string(), params[0].clone());
                        json!({"id": id, "result": ["ok"]})
                    }
                    "set_mode_withroom" | "set_mode" | "set_charge" | "set_resetpos" => {
                        json!({"id": id, "result": ["ok"]})
                    }
                    _ => {
                        json!({"id": id, "error": {"code": -1, "message": "unknown method"}})
                    }
                }
            };

            let ciphertext = keys.encrypt(reply_body.to_string().as_bytes());
            let mut reply = codec::build_frame(DEVICE_ID, INITIAL_STAMP + 1, &token, &ciphertext);
            {
                let mut state = shared.lock().unwrap();
                if state.garble_replies > 0 {
                    state.garble_replies -= 1;
                    let last = reply.len() - 1;
                    reply[last] ^= 0xFF;
                }
            }
            let _ = socket.send_to(&reply, peer).await;
        }
    });

    (port, state)
}

async fn connect(port: u16) -> Vacuum {
    Vacuum::builder("127.0.0.1", DeviceToken::new(TOKEN_BYTES))
        .with_port(port)
        .with_timeout(Duration::from_millis(200))
        .with_max_retries(2)
        .connect()
        .await
        .unwrap()
}

// ============================================================================
// Scenario A: handshake, batched read, reconciliation
// ============================================================================

#[tokio::test]
async fn handshake_learns_device_identity() {
    let (port, _state) = start_mock_device(MockState::default()).await;
    let vacuum = connect(port).await;
    assert_eq!(vacuum.identity().device_id(), DEVICE_ID);
}

#[tokio::test]
async fn refresh_reconciles_a_snapshot() {
    let (port, state) = start_mock_device(MockState::with_props(&[
        ("run_state", json!(2)),
        ("battary_life", json!(87)),
    ]))
    .await;
    let vacuum = connect(port).await;

    let status = vacuum.refresh().await.unwrap();
    assert_eq!(status.state, VacuumState::Paused);
    assert_eq!(status.battery_percent, Some(87));
    assert_eq!(vacuum.status(), status);

    // The whole registry went out as one batched request.
    let reads = state.lock().unwrap().calls_for("get_prop");
    assert_eq!(reads.len(), 1);
    assert!(reads[0].contains(&json!("run_state")));
    assert!(reads[0].contains(&json!("err_state")));
}

#[tokio::test]
async fn refresh_reports_full_diagnostics() {
    let (port, _state) = start_mock_device(MockState::with_props(&[
        ("run_state", json!(6)),
        ("err_state", json!(0)),
        ("battary_life", json!(55)),
        ("suction_grade", json!(3)),
        ("s_area", json!(18.5)),
        ("s_time", json!(1260)),
    ]))
    .await;
    let vacuum = connect(port).await;

    let status = vacuum.refresh().await.unwrap();
    assert_eq!(status.state, VacuumState::Cleaning);
    assert_eq!(status.battery_percent, Some(55));
    assert_eq!(status.fan_speed, Some(FanSpeed::Turbo));
    assert_eq!(status.cleaned_area_m2, Some(18.5));
    assert_eq!(status.cleaned_time, Some(Duration::from_secs(1260)));
    assert!(!status.has_fault());
}

// ============================================================================
// Scenario B: retries exhausted, cached status untouched
// ============================================================================

#[tokio::test]
async fn exhausted_retries_surface_unreachable_and_keep_status() {
    let (port, state) = start_mock_device(MockState::with_props(&[
        ("run_state", json!(3)),
        ("battary_life", json!(70)),
    ]))
    .await;
    let vacuum = connect(port).await;

    let known = vacuum.refresh().await.unwrap();
    assert_eq!(known.state, VacuumState::Cleaning);

    state.lock().unwrap().drop_data_requests = true;

    let err = vacuum.refresh().await.unwrap_err();
    assert!(matches!(
        err,
        ControllerError::Command(CommandError::Unreachable { attempts: 3 })
    ));
    // The previous status survives; it is not reset to Unknown.
    assert_eq!(vacuum.status(), known);

    // One initial send plus two retries: 4 reads total (1 successful
    // earlier + 3 dropped), and the dropped attempts all reuse one id.
    let ids = state.lock().unwrap().ids_for("get_prop");
    assert_eq!(ids.len(), 4);
    assert_eq!(ids[1], ids[2]);
    assert_eq!(ids[2], ids[3]);
    assert_ne!(ids[0], ids[1]);
}

// ============================================================================
// Scenario C: device-level rejection, zero retries
// ============================================================================

#[tokio::test]
async fn device_rejection_is_immediate_and_never_retried() {
    let (port, state) = start_mock_device(MockState::default()).await;
    let vacuum = connect(port).await;

    let err = vacuum.send_raw("frobnicate", vec![]).await.unwrap_err();
    match err {
        ControllerError::Command(CommandError::DeviceRejected { code, message }) => {
            assert_eq!(code, -1);
            assert_eq!(message, "unknown method");
        }
        other => panic!("expected DeviceRejected, got {other:?}"),
    }

    let attempts = state.lock().unwrap().calls_for("frobnicate");
    assert_eq!(attempts.len(), 1, "rejection must not be retried");
}

// ============================================================================
// Control commands
// ============================================================================

#[tokio::test]
async fn control_commands_use_pinned_methods() {
    let (port, state) = start_mock_device(MockState::default()).await;
    let vacuum = connect(port).await;

    vacuum.start_clean().await.unwrap();
    vacuum.pause().await.unwrap();
    vacuum.stop().await.unwrap();
    vacuum.return_to_dock().await.unwrap();
    vacuum.locate().await.unwrap();

    let state = state.lock().unwrap();
    assert_eq!(
        state.calls_for("set_mode_withroom"),
        vec![
            vec![json!(0), json!(1), json!(0)],
            vec![json!(0), json!(2), json!(0)],
        ]
    );
    assert_eq!(state.calls_for("set_mode"), vec![vec![json!(0)]]);
    assert_eq!(state.calls_for("set_charge"), vec![vec![json!(1)]]);
    assert_eq!(state.calls_for("set_resetpos"), vec![vec![json!(1)]]);
}

#[tokio::test]
async fn set_fan_speed_twice_is_idempotent() {
    let (port, state) = start_mock_device(MockState::default()).await;
    let vacuum = connect(port).await;

    vacuum.set_fan_speed(FanSpeed::Medium).await.unwrap();
    vacuum.set_fan_speed(FanSpeed::Medium).await.unwrap();

    let state = state.lock().unwrap();
    // Absolute level both times; the device-observed outcome is the
    // same as for a single call.
    assert_eq!(
        state.calls_for("set_suction"),
        vec![vec![json!(2)], vec![json!(2)]]
    );
    assert_eq!(state.props["suction_grade"], json!(2));
}

#[tokio::test]
async fn consumable_hours_count_down_from_service_life() {
    let (port, _state) = start_mock_device(MockState::default()).await;
    let vacuum = connect(port).await;

    // The mock reports 90/60/30/45 hours in use against service lives
    // of 360/180/180/180 hours.
    let life = vacuum.consumables().await.unwrap();
    assert_eq!(life.main_brush_left, Duration::from_secs(270 * 3600));
    assert_eq!(life.side_brush_left, Duration::from_secs(120 * 3600));
    assert_eq!(life.mop_left, Duration::from_secs(150 * 3600));
    assert_eq!(life.filter_left, Duration::from_secs(135 * 3600));
}

#[tokio::test]
async fn dnd_window_is_reported() {
    let (port, _state) = start_mock_device(MockState::default()).await;
    let vacuum = connect(port).await;

    let dnd = vacuum.dnd_status().await.unwrap();
    assert!(dnd.enabled);
    assert_eq!(dnd.start, NaiveTime::from_hms_opt(22, 0, 0).unwrap());
    assert_eq!(dnd.end, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
}

#[tokio::test]
async fn commands_do_not_touch_cached_status() {
    let (port, _state) = start_mock_device(MockState::default()).await;
    let vacuum = connect(port).await;

    let before = vacuum.status();
    vacuum.start_clean().await.unwrap();
    assert_eq!(vacuum.status(), before);
}

// ============================================================================
// Stamp-drift recovery
// ============================================================================

#[tokio::test]
async fn concurrent_refreshes_publish_in_exchange_order() {
    let (port, state) = start_mock_device(MockState::with_props(&[("run_state", json!(1))])).await;
    let vacuum = Arc::new(connect(port).await);
    state.lock().unwrap().counting_battery = true;

    // Each exchange reads a strictly higher battery value; whichever
    // refresher's exchange completes last must also be the last writer
    // of the cached status.
    let mut refreshers = Vec::new();
    for _ in 0..8 {
        let vacuum = Arc::clone(&vacuum);
        refreshers.push(tokio::spawn(async move { vacuum.refresh().await.unwrap() }));
    }
    for refresher in refreshers {
        refresher.await.unwrap();
    }

    assert_eq!(vacuum.status().battery_percent, Some(58));
}

#[tokio::test]
async fn consecutive_garbled_replies_trigger_rehandshake() {
    let (port, state) = start_mock_device(MockState::with_props(&[("run_state", json!(1))])).await;
    let vacuum = connect(port).await;
    assert_eq!(state.lock().unwrap().hellos, 1);

    state.lock().unwrap().garble_replies = 2;

    // Two corrupted replies look like stamp drift; the channel must
    // re-handshake once and then succeed within its retry budget.
    let status = vacuum.refresh().await.unwrap();
    assert_eq!(status.state, VacuumState::Idle);
    assert_eq!(state.lock().unwrap().hellos, 2);
}
