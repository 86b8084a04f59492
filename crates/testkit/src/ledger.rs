//! Item conservation checks.

use anyhow::{bail, Result};
use craftbench_core::ItemId;
use craftbench_engine::Session;
use std::collections::BTreeMap;

/// Per-item totals captured from a session at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLedger {
    totals: BTreeMap<ItemId, u32>,
}

impl ItemLedger {
    /// Record inventory, grid and held totals.
    pub fn capture(session: &Session) -> Self {
        Self {
            totals: session.item_totals(),
        }
    }

    /// Recorded total for an item.
    pub fn total(&self, item_id: ItemId) -> u32 {
        self.totals.get(&item_id).copied().unwrap_or(0)
    }

    /// Signed change per item between this capture and `session` now.
    /// Items with no change are omitted.
    pub fn delta(&self, session: &Session) -> BTreeMap<ItemId, i64> {
        let now = session.item_totals();
        let mut delta = BTreeMap::new();
        for id in self.totals.keys().chain(now.keys()) {
            let before = i64::from(self.total(*id));
            let after = i64::from(now.get(id).copied().unwrap_or(0));
            if before != after {
                delta.insert(*id, after - before);
            }
        }
        delta
    }

    /// Fail unless every item total is unchanged.
    pub fn assert_conserved(&self, session: &Session) -> Result<()> {
        let delta = self.delta(session);
        if !delta.is_empty() {
            bail!("item totals changed: {delta:?}");
        }
        Ok(())
    }
}
