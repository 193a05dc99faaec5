// SPDX-License-Identifier: MIT

//! Output versioning
//!
//! A node keeps a flat, append-only list of output snapshots and a pointer to
//! the active one. Switching snapshots never discards the live state: if it
//! was never captured, it is saved first.

use chrono::Utc;
use serde_json::Value;

use super::types::{new_id, Graph, Node, OutputSnapshot};
use crate::engine::error::FlowError;

/// Compare a live state against a snapshot state, looking only at the
/// snapshot's top-level keys. Keys that exist only in `live` are ignored.
/// Numbers compare by value, so `2` and `2.0` are equal.
pub fn is_operator_state_in_sync(live: &Value, snapshot: &Value) -> bool {
    match (live, snapshot) {
        // Restricting `live` to the snapshot keys and comparing the two maps
        // reduces to: every snapshot key is present in `live` with an equal value.
        (Value::Object(live), Value::Object(saved)) => saved
            .iter()
            .all(|(k, v)| live.get(k).is_some_and(|l| values_equal(l, v))),
        _ => values_equal(live, snapshot),
    }
}

/// Deep equality that ignores the integer/float representation of numbers
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

impl Node {
    pub fn snapshot(&self, snapshot_id: &str) -> Option<&OutputSnapshot> {
        self.output_snapshots.iter().find(|s| s.id == snapshot_id)
    }

    pub fn active_snapshot(&self) -> Option<&OutputSnapshot> {
        self.active_snapshot_id
            .as_deref()
            .and_then(|id| self.snapshot(id))
    }

    /// Append a snapshot of the live state without changing the active pointer
    fn capture(&mut self) -> String {
        let snapshot = OutputSnapshot {
            id: new_id(),
            state: self.state.clone(),
            status_code: self.status_code,
            timestamp: Utc::now().timestamp_millis(),
        };
        let id = snapshot.id.clone();
        self.output_snapshots.push(snapshot);
        id
    }

    /// Save the live state as a new alternative and make it active.
    pub fn record_snapshot(&mut self) -> String {
        let id = self.capture();
        self.active_snapshot_id = Some(id.clone());
        id
    }

    /// Overwrite the active snapshot with the live state, e.g. after a
    /// re-run. Returns false when there is no active snapshot.
    pub fn refresh_active_snapshot(&mut self) -> bool {
        let state = self.state.clone();
        let status_code = self.status_code;
        let Some(active) = self.active_snapshot_id.clone() else {
            return false;
        };
        match self.output_snapshots.iter_mut().find(|s| s.id == active) {
            Some(snapshot) => {
                snapshot.state = state;
                snapshot.status_code = status_code;
                snapshot.timestamp = Utc::now().timestamp_millis();
                true
            }
            None => false,
        }
    }

    /// Make `snapshot_id` the live state.
    ///
    /// An unknown id leaves the node untouched and is reported as
    /// [`FlowError::SnapshotNotFound`].
    pub fn select_output(&mut self, snapshot_id: &str) -> Result<(), FlowError> {
        if self.snapshot(snapshot_id).is_none() {
            log::warn!(
                "select_output: snapshot {} not found on node {}",
                snapshot_id,
                self.id
            );
            return Err(FlowError::SnapshotNotFound {
                node_id: self.id.clone(),
                snapshot_id: snapshot_id.to_string(),
            });
        }

        if self.active_snapshot().is_none() {
            let saved = self.capture();
            log::debug!("Saved live state of node {} as snapshot {}", self.id, saved);
        }

        if let Some(snapshot) = self.snapshot(snapshot_id) {
            let state = snapshot.state.clone();
            let status_code = snapshot.status_code;
            self.state = state;
            self.status_code = status_code;
            self.active_snapshot_id = Some(snapshot_id.to_string());
        }
        Ok(())
    }

    /// Remove a snapshot. Deleting the active one clears the active pointer.
    pub fn delete_snapshot(&mut self, snapshot_id: &str) -> bool {
        let before = self.output_snapshots.len();
        self.output_snapshots.retain(|s| s.id != snapshot_id);
        if self.active_snapshot_id.as_deref() == Some(snapshot_id) {
            self.active_snapshot_id = None;
        }
        self.output_snapshots.len() != before
    }

    /// True when the live state has drifted from the active snapshot.
    pub fn is_stale(&self) -> bool {
        self.active_snapshot()
            .is_some_and(|s| !is_operator_state_in_sync(&self.state, &s.state))
    }
}

impl Graph {
    /// Switch `node_id` to a stored snapshot. Unknown nodes are ignored.
    pub fn select_output(&mut self, node_id: &str, snapshot_id: &str) -> Result<(), FlowError> {
        match self.node_mut(node_id) {
            Some(node) => node.select_output(snapshot_id),
            None => {
                log::debug!("select_output: node {} not found", node_id);
                Ok(())
            }
        }
    }
}
