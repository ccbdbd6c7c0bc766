use crate::core::ConfigProvider;
use crate::utils::error::{Result, TaskError};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// 匯率轉檔設定，鍵名沿用 `input-file` / `output-file`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExportConfig {
    pub input_file: String,
    pub output_file: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => Err(TaskError::InvalidConfigValueError {
                field: "config".to_string(),
                value: path.as_ref().display().to_string(),
                reason: "Config file must be .yaml, .yml or .toml".to_string(),
            }),
        }
    }
}

impl ExportConfig {
    /// 依副檔名載入 YAML 或 TOML 設定檔
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let format = ConfigFormat::from_path(&path)?;
        let content = std::fs::read_to_string(&path)?;
        tracing::debug!(
            "Loaded {} bytes of {:?} config from {}",
            content.len(),
            format,
            path.as_ref().display()
        );
        Self::from_str_with_format(&content, format)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Self::from_str_with_format(content, ConfigFormat::Yaml)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_str_with_format(content, ConfigFormat::Toml)
    }

    fn from_str_with_format(content: &str, format: ConfigFormat) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        let config: Self = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(&processed_content)?,
            ConfigFormat::Toml => toml::from_str(&processed_content)?,
        };
        Ok(config)
    }
}

/// 替換環境變數 (例如 ${DATA_DIR})，找不到的變數保留原文
pub fn substitute_env_vars(content: &str) -> String {
    static ENV_VAR: OnceLock<Regex> = OnceLock::new();
    let re = ENV_VAR.get_or_init(|| {
        Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex")
    });

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}

impl ConfigProvider for ExportConfig {
    fn input_file(&self) -> &str {
        &self.input_file
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }
}

impl Validate for ExportConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("input-file", &self.input_file)?;
        validate_non_empty_string("output-file", &self.output_file)?;
        validate_path("input-file", &self.input_file)?;
        validate_path("output-file", &self.output_file)?;
        validate_file_extension("input-file", &self.input_file, &["xml"])?;
        validate_file_extension("output-file", &self.output_file, &["json"])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_yaml_config() {
        let yaml = "input-file: data/rates.xml\noutput-file: out/rates.json\n";
        let config = ExportConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.input_file, "data/rates.xml");
        assert_eq!(config.output_file, "out/rates.json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml_config() {
        let toml_content = r#"
input-file = "rates.xml"
output-file = "rates.json"
"#;
        let config = ExportConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.input_file(), "rates.xml");
        assert_eq!(config.output_file(), "rates.json");
    }

    #[test]
    fn test_missing_key_is_error() {
        let err = ExportConfig::from_yaml_str("input-file: rates.xml\n").unwrap_err();
        assert!(matches!(err, TaskError::YamlError(_)));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PRACTICE_TASKS_TEST_DIR", "/tmp/rates");

        let yaml = "input-file: ${PRACTICE_TASKS_TEST_DIR}/in.xml\noutput-file: ${PRACTICE_TASKS_TEST_UNSET}/out.json\n";
        let config = ExportConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.input_file, "/tmp/rates/in.xml");
        assert_eq!(config.output_file, "${PRACTICE_TASKS_TEST_UNSET}/out.json");

        std::env::remove_var("PRACTICE_TASKS_TEST_DIR");
    }

    #[test]
    fn test_config_validation() {
        let config = ExportConfig {
            input_file: "rates.txt".to_string(),
            output_file: "rates.json".to_string(),
        };
        assert!(config.validate().is_err());

        let config = ExportConfig {
            input_file: "rates.xml".to_string(),
            output_file: String::new(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        temp_file
            .write_all(b"input-file: a.xml\noutput-file: b.json\n")
            .unwrap();

        let config = ExportConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.input_file, "a.xml");
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let temp_file = NamedTempFile::new().unwrap();
        let err = ExportConfig::from_file(temp_file.path()).unwrap_err();
        assert!(matches!(err, TaskError::InvalidConfigValueError { .. }));
    }
}
