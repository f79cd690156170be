use crate::core::ConfigProvider;
use crate::domain::order::LabelDefaults;
use crate::domain::ports::ColumnNames;
use crate::utils::error::{LabelError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub labels: LabelDefaults,
    pub columns: ColumnNames,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            max_upload_mb: 16,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub output_root: String,
    pub allowed_extensions: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_root: "generated_files".to_string(),
            allowed_extensions: vec!["xls".to_string(), "xlsx".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub json: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LabelError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| LabelError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.server.max_upload_mb.saturating_mul(1024 * 1024)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_positive_number("server.max_upload_mb", self.server.max_upload_mb, 1)?;
        validate_path("storage.output_root", &self.storage.output_root)?;

        if self.storage.allowed_extensions.is_empty() {
            return Err(LabelError::InvalidConfigValueError {
                field: "storage.allowed_extensions".to_string(),
                value: "[]".to_string(),
                reason: "At least one spreadsheet extension is required".to_string(),
            });
        }
        let supported = ["xls", "xlsx", "xlsm", "xlsb", "ods"];
        for extension in &self.storage.allowed_extensions {
            if !supported.contains(&extension.to_ascii_lowercase().as_str()) {
                return Err(LabelError::InvalidConfigValueError {
                    field: "storage.allowed_extensions".to_string(),
                    value: extension.clone(),
                    reason: format!("Unsupported format. Valid formats: {}", supported.join(", ")),
                });
            }
        }

        validate_range(
            "labels.font_size",
            self.labels.font_size,
            crate::utils::validation::MIN_FONT_SIZE,
            crate::utils::validation::MAX_FONT_SIZE,
        )?;
        validate_non_empty_string("labels.made_in", &self.labels.made_in)?;

        validate_non_empty_string("columns.factory", &self.columns.factory)?;
        validate_non_empty_string("columns.product_info", &self.columns.product_info)?;
        validate_non_empty_string("columns.product_quantity", &self.columns.product_quantity)?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn output_root(&self) -> &str {
        &self.storage.output_root
    }

    fn allowed_extensions(&self) -> &[String] {
        &self.storage.allowed_extensions
    }

    fn columns(&self) -> &ColumnNames {
        &self.columns
    }

    fn label_defaults(&self) -> &LabelDefaults {
        &self.labels
    }
}
