use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use ecycle_core::store_keys;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

const CONFIG_ENV: &str = "ECYCLE_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KioskConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Remote collection feedback is written to.
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default)]
    pub store: StoreBackend,
    #[serde(default = "default_notice_ttl_secs")]
    pub notice_ttl_secs: u64,
    /// Reachability assumed at startup, before the UI shell reports anything.
    #[serde(default = "default_start_online")]
    pub start_online: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Memory,
    S3 {
        bucket: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        region: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        endpoint_url: Option<String>,
    },
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            listen_addr: default_listen_addr(),
            collection: default_collection(),
            store: StoreBackend::default(),
            notice_ttl_secs: default_notice_ttl_secs(),
            start_online: default_start_online(),
        }
    }
}

impl KioskConfig {
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_ttl_secs)
    }

    /// Apply `ECYCLE_*` overrides. `lookup` is `std::env::var` in production.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(addr) = lookup("ECYCLE_LISTEN") {
            self.listen_addr = addr;
        }
        if let Some(collection) = lookup("ECYCLE_COLLECTION") {
            self.collection = collection;
        }
        if let Some(bucket) = lookup("ECYCLE_BUCKET") {
            self.store = match self.store {
                StoreBackend::S3 {
                    region,
                    endpoint_url,
                    ..
                } => StoreBackend::S3 {
                    bucket,
                    region,
                    endpoint_url,
                },
                StoreBackend::Memory => StoreBackend::S3 {
                    bucket,
                    region: None,
                    endpoint_url: None,
                },
            };
        }
        if let Some(endpoint) = lookup("ECYCLE_S3_ENDPOINT") {
            if let StoreBackend::S3 { endpoint_url, .. } = &mut self.store {
                *endpoint_url = Some(endpoint);
            } else {
                tracing::warn!("ECYCLE_S3_ENDPOINT ignored, store backend is not s3");
            }
        }
        self
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1:8787".to_string()
}

fn default_collection() -> String {
    store_keys::FEEDBACK.to_string()
}

fn default_notice_ttl_secs() -> u64 {
    3
}

fn default_start_online() -> bool {
    true
}

/// `$ECYCLE_CONFIG`, else `<config dir>/com.ecycle.kiosk/config.json`.
pub fn config_path() -> eyre::Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("com.ecycle.kiosk").join("config.json"))
}

/// Load the config at `path`. A missing file yields defaults; an older
/// version is migrated and written back.
pub fn load_config(path: &Path) -> eyre::Result<KioskConfig> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no config file, using defaults");
        return Ok(KioskConfig::default());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: KioskConfig = serde_json::from_value(migrated)?;

    if on_disk_version < CURRENT_VERSION {
        save_config(path, &config)?;
    }
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update the kiosk service."
        ));
    }

    // v0 → v1: top-level `bucket` moved into a tagged `store` section
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(bucket) = obj.remove("bucket") {
            let mut store = serde_json::Map::new();
            store.insert("type".to_string(), serde_json::Value::String("s3".to_string()));
            store.insert("bucket".to_string(), bucket);
            if let Some(region) = obj.remove("region") {
                store.insert("region".to_string(), region);
            }
            obj.insert("store".to_string(), serde_json::Value::Object(store));
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (bucket moved under store)");
    }

    Ok(json)
}

pub fn save_config(path: &Path, config: &KioskConfig) -> eyre::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
