//! Golden-file snapshot helper.
//!
//! Goldens are stored as pretty JSON but compared as parsed values, so the
//! formatting and object key order of a golden never matter. On mismatch the
//! error names the first differing element by JSON-pointer-style path.
//!
//! Rerun with `SEEDSIGHT_UPDATE_SNAPSHOTS=1` to rewrite goldens in place.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Environment variable that enables snapshot updates.
pub const UPDATE_SNAPSHOTS_ENV: &str = "SEEDSIGHT_UPDATE_SNAPSHOTS";

/// Assert that `value` matches the golden at `path`.
///
/// A missing golden is an error unless updates are enabled.
pub fn assert_json_snapshot<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    compare_snapshot(path.as_ref(), value, false)
}

/// Like [`assert_json_snapshot`], but a missing golden is recorded instead of
/// failing. Used to pin values that need one verified run to capture; once
/// the golden exists, every later run must reproduce it.
pub fn record_json_snapshot<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    compare_snapshot(path.as_ref(), value, true)
}

fn compare_snapshot<T: Serialize>(path: &Path, value: &T, record_missing: bool) -> Result<()> {
    let actual = serde_json::to_value(value).context("snapshot value is not serializable")?;

    if updates_enabled() || (record_missing && !path.exists()) {
        return write_golden(path, &actual);
    }

    let text = fs::read_to_string(path).with_context(|| {
        format!(
            "snapshot missing at {} (set {}=1 to create it)",
            path.display(),
            UPDATE_SNAPSHOTS_ENV
        )
    })?;
    let expected: Value = serde_json::from_str(&text)
        .with_context(|| format!("golden at {} is not valid JSON", path.display()))?;

    if let Some(at) = first_difference(&expected, &actual) {
        bail!(
            "snapshot {} differs at {} (set {}=1 to update)",
            path.display(),
            at,
            UPDATE_SNAPSHOTS_ENV
        );
    }
    Ok(())
}

fn updates_enabled() -> bool {
    matches!(
        std::env::var(UPDATE_SNAPSHOTS_ENV).as_deref(),
        Ok("1" | "true" | "yes")
    )
}

fn write_golden(path: &Path, value: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create golden dir {}", parent.display()))?;
    }
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

/// Path of the first difference between two JSON values, or `None` if equal.
/// Object comparison ignores key order; leaf differences include both values.
fn first_difference(expected: &Value, actual: &Value) -> Option<String> {
    match (expected, actual) {
        (Value::Object(e), Value::Object(a)) => {
            for (key, ev) in e {
                let Some(av) = a.get(key) else {
                    return Some(format!("/{key} (missing)"));
                };
                if let Some(rest) = first_difference(ev, av) {
                    return Some(format!("/{key}{rest}"));
                }
            }
            a.keys()
                .find(|key| !e.contains_key(*key))
                .map(|key| format!("/{key} (unexpected)"))
        }
        (Value::Array(e), Value::Array(a)) => {
            for (i, (ev, av)) in e.iter().zip(a).enumerate() {
                if let Some(rest) = first_difference(ev, av) {
                    return Some(format!("/{i}{rest}"));
                }
            }
            if e.len() != a.len() {
                return Some(format!(
                    "/{} (length {} vs {})",
                    e.len().min(a.len()),
                    e.len(),
                    a.len()
                ));
            }
            None
        }
        _ => {
            if expected != actual {
                Some(format!(" ({expected} != {actual})"))
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("seedsight-snap-{}-{name}", std::process::id()))
    }

    #[test]
    fn golden_formatting_and_key_order_do_not_matter() {
        let path = temp_path("format.json");
        fs::write(&path, "{\"b\": 2,\n      \"a\":1}").unwrap();
        assert_json_snapshot(&path, &json!({"a": 1, "b": 2})).unwrap();
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn record_creates_the_golden_then_compares_against_it() {
        let path = temp_path("record.json");
        let _ = fs::remove_file(&path);
        record_json_snapshot(&path, &json!({"v": [1, 2, 3]})).unwrap();
        record_json_snapshot(&path, &json!({"v": [1, 2, 3]})).unwrap();
        let err = record_json_snapshot(&path, &json!({"v": [1, 9, 3]})).unwrap_err();
        assert!(err.to_string().contains("/v/1"), "{err}");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_golden_fails_without_update_env() {
        if std::env::var(UPDATE_SNAPSHOTS_ENV).is_ok() {
            return;
        }
        let path = temp_path("missing.json");
        let _ = fs::remove_file(&path);
        assert!(assert_json_snapshot(&path, &1).is_err());
    }

    #[test]
    fn first_difference_walks_into_nested_values() {
        assert_eq!(first_difference(&json!({"a": 1}), &json!({"a": 1})), None);
        assert_eq!(
            first_difference(&json!({"a": {"b": [true]}}), &json!({"a": {"b": [false]}})),
            Some("/a/b/0 (true != false)".into())
        );
        assert_eq!(
            first_difference(&json!({"a": 1}), &json!({})),
            Some("/a (missing)".into())
        );
        assert_eq!(
            first_difference(&json!([1]), &json!([1, 2])),
            Some("/1 (length 1 vs 2)".into())
        );
    }
}
