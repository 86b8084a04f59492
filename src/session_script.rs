use anyhow::{Context, Result};
use craftbench_assets::resolve_item;
use craftbench_engine::{CraftRequest, PointerButton, Session, SlotRef, TransferMode};
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct SessionScriptFile {
    steps: Vec<ScriptStep>,
}

/// One player action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    /// A completed mining action.
    Mine {
        /// Item key as written in the items file.
        item: String,
        /// Items mined.
        quantity: u32,
    },
    /// Pointer click on a slot.
    Click {
        /// Clicked slot.
        slot: SlotRef,
        /// Button used; primary when omitted.
        #[serde(default = "primary")]
        button: PointerButton,
    },
    /// Explicit transfer mode on a slot.
    Transfer {
        /// Target slot.
        slot: SlotRef,
        /// Transfer applied between the hand and the slot.
        mode: TransferMode,
    },
    /// Click the result slot.
    Craft {
        /// Craft as many times as the grid allows.
        #[serde(default)]
        all: bool,
    },
    /// Open the crafting screen.
    OpenCrafting,
    /// Close the crafting screen, returning grid and hand to the inventory.
    CloseCrafting,
}

fn primary() -> PointerButton {
    PointerButton::Primary
}

/// Tally of a script run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    /// Steps executed.
    pub steps: usize,
    /// Steps refused by the engine.
    pub refused: usize,
    /// Items crafted.
    pub crafted: u32,
    /// Items lost to a full inventory.
    pub lost: u32,
}

/// Scripted sequence of session actions, executed in file order.
///
/// Scripts are `{ "steps": [{ "action": ... }, ...] }`. Engine refusals
/// (nothing to craft, bad slot, unmineable item) are logged and counted;
/// an item key the catalog does not know aborts the run.
#[derive(Debug)]
pub struct SessionScript {
    steps: Vec<ScriptStep>,
}

impl SessionScript {
    /// Load a script from a JSON file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load a script from an in-memory JSON string.
    pub fn from_json(contents: &str) -> Result<Self> {
        let file: SessionScriptFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("session script contains no steps");
        }
        Ok(Self { steps: file.steps })
    }

    /// Steps in execution order.
    #[cfg(test)]
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// Run every step against `session`.
    pub fn run(&self, session: &mut Session) -> Result<ScriptSummary> {
        let mut summary = ScriptSummary::default();
        for (index, step) in self.steps.iter().enumerate() {
            summary.steps += 1;
            let refused = match step {
                ScriptStep::Mine { item, quantity } => {
                    let item_id = resolve_item(session.catalog(), item)
                        .with_context(|| format!("step {index}: mine"))?;
                    match session.deposit_mined(item_id, *quantity) {
                        Ok(report) => {
                            summary.lost += report.lost;
                            info!("{}", report.status_message());
                            None
                        }
                        Err(err) => Some(err.to_string()),
                    }
                }
                ScriptStep::Click { slot, button } => session
                    .click(*slot, *button)
                    .err()
                    .map(|err| err.to_string()),
                ScriptStep::Transfer { slot, mode } => session
                    .click_slot(*slot, *mode)
                    .err()
                    .map(|err| err.to_string()),
                ScriptStep::Craft { all } => {
                    let request = if *all {
                        CraftRequest::All
                    } else {
                        CraftRequest::One
                    };
                    match session.craft(request) {
                        Ok(outcome) => {
                            summary.crafted += outcome.produced;
                            summary.lost += outcome.lost;
                            None
                        }
                        Err(err) => Some(err.to_string()),
                    }
                }
                ScriptStep::OpenCrafting => {
                    session.open_crafting();
                    None
                }
                ScriptStep::CloseCrafting => {
                    summary.lost += session.close_crafting();
                    None
                }
            };
            if let Some(reason) = refused {
                warn!(step = index, %reason, "step refused");
                summary.refused += 1;
            }
        }
        Ok(summary)
    }
}
