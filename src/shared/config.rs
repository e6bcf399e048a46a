use serde::{Deserialize, Serialize};

/// Selector of the table body the results page renders into.
pub const DEFAULT_MOUNT_SELECTOR: &str = "#results tbody";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub view: ViewConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    pub mount_selector: String,
    /// Locally cached account name, appended to solution playback titles.
    #[serde(default)]
    pub identity_tag: Option<String>,
    /// Fixed offset for displayed timestamps. `None` uses the local zone.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub pending_deletion_ttl_ms: u64,
    pub pending_deletion_capacity: usize,
    pub channel_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite:results.db".to_string(),
                max_connections: 5,
            },
            view: ViewConfig {
                mount_selector: DEFAULT_MOUNT_SELECTOR.to_string(),
                identity_tag: None,
                utc_offset_minutes: None,
            },
            sync: SyncConfig {
                pending_deletion_ttl_ms: 30_000,
                pending_deletion_capacity: 64,
                channel_capacity: 256,
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Overlays the defaults with values returned by `lookup` for the `RESULTS_*` keys.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("RESULTS_DATABASE_URL") {
            let v = v.trim();
            if !v.is_empty() {
                cfg.database.url = v.to_string();
            }
        }
        if let Some(value) = lookup("RESULTS_MAX_CONNECTIONS").and_then(|v| parse_u64(&v)) {
            cfg.database.max_connections = value.clamp(1, u32::MAX as u64) as u32;
        }
        if let Some(v) = lookup("RESULTS_MOUNT_SELECTOR") {
            cfg.view.mount_selector = v.trim().to_string();
        }
        if let Some(v) = lookup("RESULTS_IDENTITY_TAG") {
            let v = v.trim();
            cfg.view.identity_tag = if v.is_empty() {
                None
            } else {
                Some(v.to_string())
            };
        }
        if let Some(v) = lookup("RESULTS_UTC_OFFSET_MINUTES") {
            cfg.view.utc_offset_minutes = parse_i32(&v);
        }
        if let Some(value) = lookup("RESULTS_PENDING_TTL_MS").and_then(|v| parse_u64(&v)) {
            cfg.sync.pending_deletion_ttl_ms = value;
        }
        if let Some(value) = lookup("RESULTS_PENDING_CAPACITY").and_then(|v| parse_u64(&v)) {
            cfg.sync.pending_deletion_capacity = value as usize;
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.view.mount_selector.trim().is_empty() {
            return Err("View mount_selector must not be empty".to_string());
        }
        if let Some(offset) = self.view.utc_offset_minutes {
            if offset.abs() >= 24 * 60 {
                return Err("View utc_offset_minutes must be within +/- 24 hours".to_string());
            }
        }
        if self.sync.pending_deletion_capacity == 0 {
            return Err("Sync pending_deletion_capacity must be greater than 0".to_string());
        }
        if self.sync.channel_capacity == 0 {
            return Err("Sync channel_capacity must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn parse_i32(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok()
}
