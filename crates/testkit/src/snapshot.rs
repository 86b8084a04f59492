//! Golden-file JSON snapshots.
//!
//! Values are serialized as pretty JSON with object keys sorted, so map
//! ordering never causes spurious diffs. Rerun with
//! `CRAFTBENCH_UPDATE_SNAPSHOTS=1` to rewrite goldens.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Environment variable that enables snapshot updates.
pub const UPDATE_SNAPSHOTS_ENV: &str = "CRAFTBENCH_UPDATE_SNAPSHOTS";

/// Assert that `value` matches the JSON snapshot stored at `path`.
pub fn assert_json_snapshot<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    let actual = canonical_json(value)?;

    if updating() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create snapshot directory {}", parent.display()))?;
        }
        return fs::write(path, &actual)
            .with_context(|| format!("write snapshot {}", path.display()));
    }

    let expected = fs::read_to_string(path).with_context(|| {
        format!(
            "snapshot missing at {} (run with {UPDATE_SNAPSHOTS_ENV}=1 to create it)",
            path.display()
        )
    })?;

    // Line endings differ on checkouts with autocrlf.
    let expected = expected.replace("\r\n", "\n");
    if let Some((line, want, got)) = first_difference(&expected, &actual) {
        anyhow::bail!(
            "snapshot mismatch at {}:{line}\n  expected: {want}\n    actual: {got}\n(run with {UPDATE_SNAPSHOTS_ENV}=1 to update)",
            path.display()
        );
    }
    Ok(())
}

/// Canonical text for a value: sorted keys, two-space indent, trailing newline.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value).context("serialize snapshot value")?;
    let mut text =
        serde_json::to_string_pretty(&sort_keys(value)).context("format snapshot JSON")?;
    text.push('\n');
    Ok(text)
}

fn updating() -> bool {
    matches!(
        std::env::var(UPDATE_SNAPSHOTS_ENV).as_deref(),
        Ok("1" | "true" | "yes")
    )
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(values) => Value::Array(values.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

fn first_difference<'a>(expected: &'a str, actual: &'a str) -> Option<(usize, &'a str, &'a str)> {
    let mut want = expected.lines();
    let mut got = actual.lines();
    let mut line = 1;
    loop {
        match (want.next(), got.next()) {
            (None, None) => return None,
            (w, g) if w != g => return Some((line, w.unwrap_or("<eof>"), g.unwrap_or("<eof>"))),
            _ => line += 1,
        }
    }
}
