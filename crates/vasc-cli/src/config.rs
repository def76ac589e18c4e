use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 2;

pub const DEFAULT_CONFIG_FILE: &str = "vasc.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VascConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// Root holding `<exam_type>/<exam_type>.json` criteria documents.
    #[serde(default = "default_criteria_dir")]
    pub criteria_dir: PathBuf,
    /// Root holding `<exam_type>/<exam_type>.json` segment templates. Added in v2.
    pub template_dir: PathBuf,
    /// Root of the file store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub default_site: Option<String>,
    #[serde(default = "default_version")]
    pub default_version: String,
    /// Recorded on audit events. Added in v1.
    pub actor: String,
}

fn default_criteria_dir() -> PathBuf {
    PathBuf::from("criteria")
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_actor() -> String {
    "vasc-cli".to_string()
}

impl Default for VascConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            criteria_dir: default_criteria_dir(),
            template_dir: default_template_dir(),
            data_dir: default_data_dir(),
            default_site: None,
            default_version: default_version(),
            actor: default_actor(),
        }
    }
}

impl VascConfig {
    /// Apply `VASC_*` overrides. `lookup` is `std::env::var` in production.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("VASC_CRITERIA_DIR") {
            self.criteria_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("VASC_TEMPLATE_DIR") {
            self.template_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("VASC_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(site) = lookup("VASC_SITE") {
            self.default_site = Some(site);
        }
        if let Some(version) = lookup("VASC_CRITERIA_VERSION") {
            self.default_version = version;
        }
        if let Some(actor) = lookup("VASC_ACTOR") {
            self.actor = actor;
        }
    }
}

/// The given path (`--config` / `$VASC_CONFIG`), else `vasc.json` in the
/// working directory.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Load the config at `path`, migrating older versions. A missing file
/// yields the defaults.
pub fn load_config(path: &Path) -> eyre::Result<VascConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(VascConfig::default());
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
    let config: VascConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update vasc."
        ));
    }

    // v0 → v1: add actor
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("actor")
            .or_insert(serde_json::Value::String(default_actor()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added actor)");
    }

    // v1 → v2: add template_dir
    if from_version < 2 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("template_dir").or_insert(serde_json::Value::String(
            default_template_dir().to_string_lossy().into_owned(),
        ));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(2.into()),
        );
        tracing::info!("migrated config v1 → v2 (added template_dir)");
    }

    Ok(json)
}

pub fn save_config(config: &VascConfig, path: &Path) -> eyre::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
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
