//! Step-by-step session scenarios with golden snapshots.
//!
//! A scenario applies a short list of labelled actions to a session and
//! captures a frame after each one. The report is compared against a golden
//! JSON file (or rewritten when `CRAFTBENCH_UPDATE_SNAPSHOTS=1`).

use crate::snapshot::assert_json_snapshot;
use anyhow::{Context, Result};
use craftbench_engine::Session;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A labelled action applied to the session.
pub struct ScenarioStep {
    label: String,
    action: Box<dyn FnMut(&mut Session) -> Result<()>>,
}

impl ScenarioStep {
    /// Wrap a closure as a step.
    pub fn new(
        label: impl Into<String>,
        action: impl FnMut(&mut Session) -> Result<()> + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            action: Box::new(action),
        }
    }
}

/// Observable session state after a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionFrame {
    /// Step label (`"initial"` for the first frame).
    pub step: String,
    /// Occupied inventory slots as `slot -> [item_id, quantity]`.
    pub inventory: BTreeMap<usize, [u32; 2]>,
    /// Occupied grid cells as `"row,col" -> [item_id, quantity]`.
    pub grid: BTreeMap<String, [u32; 2]>,
    /// Held stack.
    pub held: Option<[u32; 2]>,
    /// Displayed crafting result.
    pub result: Option<[u32; 2]>,
}

impl SessionFrame {
    /// Capture the current session state.
    pub fn capture(step: impl Into<String>, session: &Session) -> Self {
        let pair = |s: &craftbench_core::ItemStack| [u32::from(s.item_id().get()), s.quantity()];
        Self {
            step: step.into(),
            inventory: session
                .inventory()
                .iter()
                .filter_map(|(slot, stack)| stack.map(|s| (slot, pair(s))))
                .collect(),
            grid: session
                .grid()
                .iter()
                .filter_map(|((row, col), stack)| stack.map(|s| (format!("{row},{col}"), pair(s))))
                .collect(),
            held: session.held().map(pair),
            result: session.result().map(pair),
        }
    }
}

#[derive(Debug, Serialize)]
struct ScenarioReport {
    name: String,
    frames: Vec<SessionFrame>,
}

/// Run `steps` against `session` and assert (or update) the snapshot at
/// `snapshot_path`. The report holds `steps.len() + 1` frames.
pub fn run_scenario(
    name: &str,
    snapshot_path: PathBuf,
    mut session: Session,
    steps: Vec<ScenarioStep>,
) -> Result<Session> {
    let mut frames = Vec::with_capacity(steps.len() + 1);
    frames.push(SessionFrame::capture("initial", &session));

    for mut step in steps {
        (step.action)(&mut session).with_context(|| format!("scenario step {:?}", step.label))?;
        frames.push(SessionFrame::capture(step.label, &session));
    }

    let report = ScenarioReport {
        name: name.to_string(),
        frames,
    };
    assert_json_snapshot(snapshot_path, &report)?;
    Ok(session)
}
