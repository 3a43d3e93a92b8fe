//! KeyValueStore 上の JSON レコード読み書き
//!
//! 読み込みは失敗しない。壊れた・読めないレコードはログに出してデフォルトを返す。
//! load_merged はトップレベルのグループ単位で判定し、型の合わないグループだけ
//! デフォルトに戻す。

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::StoreError;
use crate::ports::KeyValueStore;

pub const SETTINGS_KEY: &str = "userSettings";
pub const TASKS_KEY: &str = "dashboardTasks";
pub const THEME_KEY: &str = "theme";

pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StoreError> {
    let text = serde_json::to_string(value)?;
    store.set(key, &text)
}

fn read_value(store: &dyn KeyValueStore, key: &str) -> Option<Value> {
    let text = match store.get(key) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(event = "store.read_failed", key, error = %e);
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(event = "store.corrupt_record", key, error = %e);
            None
        }
    }
}

/// Replace semantics: the stored record wins entirely if it decodes.
pub fn load_or<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, default: T) -> T {
    let Some(value) = read_value(store, key) else {
        return default;
    };
    match serde_json::from_value(value) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::warn!(event = "store.unexpected_shape", key, error = %e);
            default
        }
    }
}

/// Merge semantics: stored fields are laid over `defaults`, so a record saved
/// by an older version keeps defaults for fields it does not have.
pub fn load_merged<T: Serialize + DeserializeOwned>(store: &dyn KeyValueStore, key: &str, defaults: T) -> T {
    let Some(saved) = read_value(store, key) else {
        return defaults;
    };
    let mut base = match serde_json::to_value(&defaults) {
        Ok(base) => base,
        Err(_) => return defaults,
    };
    let fallback = base.clone();
    merge_json(&mut base, saved);
    match serde_json::from_value(base.clone()) {
        Ok(merged) => merged,
        Err(e) => {
            tracing::warn!(event = "store.unexpected_shape", key, error = %e);
            keep_valid_groups(key, fallback, base).unwrap_or(defaults)
        }
    }
}

/// Start from `defaults` and take each top-level group of `merged` that still
/// decodes. Groups that do not are left at their defaults.
fn keep_valid_groups<T: DeserializeOwned>(key: &str, defaults: Value, merged: Value) -> Option<T> {
    let Value::Object(groups) = merged else {
        return None;
    };
    let mut accepted = defaults;
    for (group, value) in groups {
        let mut trial = accepted.clone();
        let Value::Object(slots) = &mut trial else {
            return None;
        };
        slots.insert(group.clone(), value);
        match serde_json::from_value::<T>(trial.clone()) {
            Ok(_) => accepted = trial,
            Err(e) => tracing::warn!(event = "store.group_reset", key, group = %group, error = %e),
        }
    }
    serde_json::from_value(accepted).ok()
}

/// Recursive object merge. Nulls in `overlay` keep the base value; any other
/// non-object value replaces it.
pub fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(base), Value::Object(overlay)) => {
            for (k, v) in overlay {
                match base.get_mut(&k) {
                    Some(slot) => merge_json(slot, v),
                    None => {
                        base.insert(k, v);
                    }
                }
            }
        }
        (slot, v) => *slot = v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Settings;
    use crate::impls::MemoryStore;
    use serde_json::json;

    #[test]
    fn partial_settings_keep_other_defaults() {
        let store = MemoryStore::new().with_entry(SETTINGS_KEY, r#"{"api":{"refreshInterval":60}}"#);
        let settings = load_merged(&store, SETTINGS_KEY, Settings::default());

        let mut expected = Settings::default();
        expected.api.refresh_interval = 60;
        assert_eq!(settings, expected);
        assert!(settings.api.auto_refresh);
    }

    #[test]
    fn corrupt_record_falls_back_to_defaults() {
        let store = MemoryStore::new().with_entry(SETTINGS_KEY, "{not json");
        assert_eq!(load_merged(&store, SETTINGS_KEY, Settings::default()), Settings::default());
    }

    #[test]
    fn wrong_typed_field_resets_only_its_group() {
        let store = MemoryStore::new().with_entry(
            SETTINGS_KEY,
            r#"{"api":{"refreshInterval":"soon","autoRefresh":false},"notifications":{"email":true},"dashboard":{"compact":true}}"#,
        );
        let settings = load_merged(&store, SETTINGS_KEY, Settings::default());

        let mut expected = Settings::default();
        expected.notifications.email = true;
        expected.dashboard.compact = true;
        assert_eq!(settings, expected);
    }

    #[test]
    fn non_object_record_falls_back_to_defaults() {
        let store = MemoryStore::new().with_entry(SETTINGS_KEY, "[1, 2]");
        assert_eq!(load_merged(&store, SETTINGS_KEY, Settings::default()), Settings::default());
    }

    #[test]
    fn load_or_replaces_whole_value() {
        let store = MemoryStore::new().with_entry("nums", "[3]");
        assert_eq!(load_or(&store, "nums", vec![1, 2]), vec![3]);
        assert_eq!(load_or(&store, "missing", vec![1, 2]), vec![1, 2]);
    }

    #[test]
    fn save_then_load_uses_stored_value() {
        let store = MemoryStore::new();
        let mut settings = Settings::default();
        settings.notifications.email = true;
        save_json(&store, SETTINGS_KEY, &settings).unwrap();
        assert_eq!(load_merged(&store, SETTINGS_KEY, Settings::default()), settings);
    }

    #[test]
    fn merge_is_recursive_and_skips_nulls() {
        let mut base = json!({"a": {"x": 1, "y": 2}, "b": true});
        merge_json(&mut base, json!({"a": {"y": 5}, "b": null, "c": "new"}));
        assert_eq!(base, json!({"a": {"x": 1, "y": 5}, "b": true, "c": "new"}));
    }
}
