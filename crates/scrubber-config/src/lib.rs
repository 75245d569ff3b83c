use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use scrubber_core::domain::{Condition, ConditionSet, MAX_PHONE_DIGITS};
use scrubber_core::error::CoreError;
use scrubber_core::rules::{ScrubOptions, DEFAULT_REMOVAL_DATE_FORMAT};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "scrubber";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_FILE_DATE_FORMAT: &str = "%Y%m%d";
pub const DEFAULT_REMOVED_FOLDER: &str = "removed";
pub const DEFAULT_SCRUBBED_FOLDER: &str = "scrubbed";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scrub: ScrubOptions,
    pub output: OutputConfig,
    pub conditions: Vec<Condition>,
    pub upload: Option<UploadConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub removal_date_format: String,
    pub file_date_format: String,
    pub null_markers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    pub backend: UploadBackend,
    pub removed_folder: String,
    pub scrubbed_folder: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadBackend {
    Directory {
        root: PathBuf,
    },
    WebDav {
        url: String,
        username: String,
        password_env: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum UploadBackendKind {
    Directory,
    Webdav,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scrub: ScrubOptions::default(),
            output: OutputConfig::default(),
            conditions: Vec::new(),
            upload: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            removal_date_format: DEFAULT_REMOVAL_DATE_FORMAT.to_string(),
            file_date_format: DEFAULT_FILE_DATE_FORMAT.to_string(),
            null_markers: vec!["nan".to_string(), "NaN".to_string()],
        }
    }
}

impl AppConfig {
    /// Configured conditions as a validated set, or `None` when the file has none.
    pub fn condition_set(&self) -> Option<std::result::Result<ConditionSet, CoreError>> {
        if self.conditions.is_empty() {
            return None;
        }
        Some(ConditionSet::new(self.conditions.clone()))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid min_phone_digits value: {0}")]
    InvalidMinPhoneDigits(usize),
    #[error("phone_keywords must contain at least one non-blank keyword")]
    InvalidPhoneKeywords,
    #[error("invalid {field} value: {value:?}")]
    InvalidField { field: &'static str, value: String },
    #[error("invalid condition: {0}")]
    InvalidCondition(#[source] CoreError),
    #[error("upload {backend} backend requires {field}")]
    MissingUploadField {
        backend: &'static str,
        field: &'static str,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    engine: Option<EngineFile>,
    output: Option<OutputFile>,
    conditions: Option<Vec<ConditionFile>>,
    upload: Option<UploadFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EngineFile {
    min_phone_digits: Option<usize>,
    phone_keywords: Option<Vec<String>>,
    list_log_type_column: Option<String>,
    list_phone_column: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputFile {
    removal_date_format: Option<String>,
    file_date_format: Option<String>,
    null_markers: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConditionFile {
    #[serde(rename = "type")]
    log_type: String,
    threshold: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UploadFile {
    backend: UploadBackendKind,
    root: Option<PathBuf>,
    url: Option<String>,
    username: Option<String>,
    password_env: Option<String>,
    removed_folder: Option<String>,
    scrubbed_folder: Option<String>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    // Upload settings point at credentials; keep such files private.
    if parsed.upload.is_some() {
        ensure_permissions(path)?;
    }
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(engine) = parsed.engine {
        if let Some(min_digits) = engine.min_phone_digits {
            if min_digits == 0 || min_digits > MAX_PHONE_DIGITS {
                return Err(ConfigError::InvalidMinPhoneDigits(min_digits));
            }
            config.scrub.phone.min_digits = min_digits;
        }
        if let Some(keywords) = engine.phone_keywords {
            config.scrub.phone_keywords = normalize_keywords(keywords)?;
        }
        if let Some(column) = engine.list_log_type_column {
            config.scrub.list_columns.log_type = required_text("list_log_type_column", column)?;
        }
        if let Some(column) = engine.list_phone_column {
            config.scrub.list_columns.phone = required_text("list_phone_column", column)?;
        }
    }

    if let Some(output) = parsed.output {
        if let Some(format) = output.removal_date_format {
            config.output.removal_date_format = date_format("removal_date_format", format)?;
        }
        if let Some(format) = output.file_date_format {
            config.output.file_date_format = file_stamp_format(format)?;
        }
        if let Some(markers) = output.null_markers {
            config.output.null_markers = markers;
        }
    }

    if let Some(conditions) = parsed.conditions {
        let conditions = conditions
            .into_iter()
            .map(|condition| Condition::new(&condition.log_type, condition.threshold))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(ConfigError::InvalidCondition)?;
        if !conditions.is_empty() {
            ConditionSet::new(conditions.clone()).map_err(ConfigError::InvalidCondition)?;
        }
        config.conditions = conditions;
    }

    if let Some(upload) = parsed.upload {
        config.upload = Some(merge_upload(upload)?);
    }

    Ok(config)
}

fn merge_upload(upload: UploadFile) -> Result<UploadConfig> {
    let backend = match upload.backend {
        UploadBackendKind::Directory => UploadBackend::Directory {
            root: upload.root.ok_or(ConfigError::MissingUploadField {
                backend: "directory",
                field: "root",
            })?,
        },
        UploadBackendKind::Webdav => {
            let missing = |field| ConfigError::MissingUploadField {
                backend: "webdav",
                field,
            };
            UploadBackend::WebDav {
                url: upload.url.ok_or_else(|| missing("url"))?,
                username: upload.username.ok_or_else(|| missing("username"))?,
                password_env: upload.password_env.ok_or_else(|| missing("password_env"))?,
            }
        }
    };

    let removed_folder = match upload.removed_folder {
        Some(folder) => required_text("removed_folder", folder)?,
        None => DEFAULT_REMOVED_FOLDER.to_string(),
    };
    let scrubbed_folder = match upload.scrubbed_folder {
        Some(folder) => required_text("scrubbed_folder", folder)?,
        None => DEFAULT_SCRUBBED_FOLDER.to_string(),
    };

    Ok(UploadConfig {
        backend,
        removed_folder,
        scrubbed_folder,
    })
}

fn normalize_keywords(raw: Vec<String>) -> Result<Vec<String>> {
    let mut keywords = Vec::with_capacity(raw.len());
    for keyword in raw {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return Err(ConfigError::InvalidPhoneKeywords);
        }
        if !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }
    if keywords.is_empty() {
        return Err(ConfigError::InvalidPhoneKeywords);
    }
    Ok(keywords)
}

fn required_text(field: &'static str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidField { field, value });
    }
    Ok(trimmed.to_string())
}

fn date_format(field: &'static str, value: String) -> Result<String> {
    let broken = StrftimeItems::new(&value).any(|item| matches!(item, Item::Error));
    if value.trim().is_empty() || broken {
        return Err(ConfigError::InvalidField { field, value });
    }
    Ok(value)
}

/// The stamp becomes part of every output file name, so it must render to a
/// single path segment.
fn file_stamp_format(value: String) -> Result<String> {
    let value = date_format("file_date_format", value)?;
    let sample = NaiveDate::from_ymd_opt(2000, 12, 31)
        .map(|date| date.format(&value).to_string())
        .unwrap_or_default();
    if sample.contains(['/', '\\']) || sample.chars().any(char::is_control) {
        return Err(ConfigError::InvalidField {
            field: "file_date_format",
            value,
        });
    }
    Ok(value)
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if metadata.permissions().mode() & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
