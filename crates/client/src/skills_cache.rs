//! On-disk cache for the skills markdown bundle.
//!
//! File layout: `{ "<version>": { "ts": <unix secs>, "payload": {...} } }`.
//! The cache is best effort: read or write failures are logged at debug
//! level and otherwise ignored.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use logsoz_config::AppConfig;
use logsoz_core::SkillsBundle;
use serde_json::{Map, Value, json};
use tracing::debug;

const CACHE_FILE: &str = "skills_cache.json";
const DEFAULT_TTL: Duration = Duration::from_secs(6 * 60 * 60);

#[derive(Debug, Clone)]
pub struct SkillsCache {
    path: PathBuf,
    ttl: Duration,
}

impl SkillsCache {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            ttl: DEFAULT_TTL,
        }
    }

    /// `~/.logsozluk/skills_cache.json`
    pub fn default_location() -> Self {
        Self::new(AppConfig::config_dir().join(CACHE_FILE))
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached bundle for `version`, if present and younger than the TTL.
    pub fn read(&self, version: &str) -> Option<SkillsBundle> {
        self.read_at(version, now_secs())
    }

    fn read_at(&self, version: &str, now: f64) -> Option<SkillsBundle> {
        let store = self.load()?;
        let entry = store.get(version)?;
        let ts = entry.get("ts").and_then(Value::as_f64)?;
        if now - ts > self.ttl.as_secs_f64() {
            debug!(version, "Skills cache expired");
            return None;
        }
        let payload = entry.get("payload")?.clone();
        match serde_json::from_value(payload) {
            Ok(bundle) => Some(bundle),
            Err(e) => {
                debug!(version, error = %e, "Skills cache entry unreadable");
                None
            }
        }
    }

    /// Store `payload` under `version`, keeping other versions.
    pub fn write(&self, version: &str, payload: &Value) {
        self.write_at(version, payload, now_secs());
    }

    fn write_at(&self, version: &str, payload: &Value, ts: f64) {
        let mut store = self.load().unwrap_or_default();
        store.insert(version.to_string(), json!({ "ts": ts, "payload": payload }));

        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                debug!(path = %parent.display(), error = %e, "Skills cache dir not created");
                return;
            }
        }
        let body = match serde_json::to_string(&Value::Object(store)) {
            Ok(body) => body,
            Err(e) => {
                debug!(error = %e, "Skills cache not serialized");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, body) {
            debug!(path = %self.path.display(), error = %e, "Skills cache not written");
        }
    }

    fn load(&self) -> Option<Map<String, Value>> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Some(map),
            Ok(_) => None,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Skills cache corrupt");
                None
            }
        }
    }
}

fn now_secs() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Value {
        json!({
            "version": "1.4.0",
            "beceriler_md": "# Beceriler",
            "racon_md": "# Racon",
            "yoklama_md": "",
        })
    }

    #[test]
    fn roundtrip_fresh_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SkillsCache::new(dir.path().join("nested").join(CACHE_FILE));

        assert!(cache.read("latest").is_none());
        cache.write("latest", &payload());

        let bundle = cache.read("latest").unwrap();
        assert_eq!(bundle.version, "1.4.0");
        assert_eq!(bundle.racon_md, "# Racon");
        assert!(cache.read("1.3.0").is_none());
    }

    #[test]
    fn expired_entry_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SkillsCache::new(dir.path().join(CACHE_FILE));
        let now = now_secs();

        cache.write_at("latest", &payload(), now - 7.0 * 3600.0);
        assert!(cache.read_at("latest", now).is_none());

        cache.write_at("latest", &payload(), now - 5.0 * 3600.0);
        assert!(cache.read_at("latest", now).is_some());
    }

    #[test]
    fn versions_are_kept_side_by_side() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SkillsCache::new(dir.path().join(CACHE_FILE));
        cache.write("latest", &payload());
        cache.write("1.3.0", &json!({"version": "1.3.0"}));

        assert_eq!(cache.read("latest").unwrap().version, "1.4.0");
        assert_eq!(cache.read("1.3.0").unwrap().version, "1.3.0");
    }

    #[test]
    fn corrupt_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CACHE_FILE);
        std::fs::write(&path, "{bozuk").unwrap();

        let cache = SkillsCache::new(path);
        assert!(cache.read("latest").is_none());
        cache.write("latest", &payload());
        assert!(cache.read("latest").is_some());
    }
}
