use crate::config::{DEFAULT_CEP, DEFAULT_TIMEOUT_MS, MAX_TIMEOUT};
use crate::core::ConfigProvider;
use crate::domain::model::{Provider, ProviderEndpoint};
use crate::utils::error::{CepError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub race: RaceConfig,
    pub providers: ProvidersConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub cep: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub apicep: Option<ProviderConfig>,
    pub viacep: Option<ProviderConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub enabled: Option<bool>,
    pub base_url: Option<String>,
    pub identifier: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

impl ProvidersConfig {
    pub fn get(&self, provider: Provider) -> Option<&ProviderConfig> {
        match provider {
            Provider::ApiCep => self.apicep.as_ref(),
            Provider::ViaCep => self.viacep.as_ref(),
        }
    }

    pub fn get_mut(&mut self, provider: Provider) -> &mut ProviderConfig {
        let slot = match provider {
            Provider::ApiCep => &mut self.apicep,
            Provider::ViaCep => &mut self.viacep,
        };
        slot.get_or_insert_with(ProviderConfig::default)
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CepError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CepError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${VIACEP_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CepError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn cep(&self) -> &str {
        self.race.cep.as_deref().unwrap_or(DEFAULT_CEP)
    }

    pub fn timeout_ms(&self) -> u64 {
        self.race.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)
    }

    pub fn is_enabled(&self, provider: Provider) -> bool {
        self.providers
            .get(provider)
            .and_then(|p| p.enabled)
            .unwrap_or(true)
    }

    pub fn base_url(&self, provider: Provider) -> &str {
        self.providers
            .get(provider)
            .and_then(|p| p.base_url.as_deref())
            .unwrap_or_else(|| provider.default_base_url())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    /// 明確指定的 identifier 原樣使用，否則由 `race.cep` 依 provider 格式推導
    pub fn identifier(&self, provider: Provider) -> Result<String> {
        if let Some(identifier) = self.providers.get(provider).and_then(|p| p.identifier.as_ref()) {
            return Ok(identifier.trim().to_string());
        }

        let digits = validation::normalize_cep("race.cep", self.cep())?;
        Ok(provider.format_identifier(&digits))
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_max_duration(
            "race.timeout_ms",
            Duration::from_millis(self.timeout_ms()),
            MAX_TIMEOUT,
        )?;

        let enabled: Vec<Provider> = Provider::ALL
            .into_iter()
            .filter(|p| self.is_enabled(*p))
            .collect();

        if enabled.is_empty() {
            return Err(CepError::ConfigValidationError {
                field: "providers".to_string(),
                message: "at least one provider must be enabled".to_string(),
            });
        }

        for provider in enabled {
            validation::validate_url(
                &format!("providers.{}.base_url", provider),
                self.base_url(provider),
            )?;

            match self.providers.get(provider).and_then(|p| p.identifier.as_deref()) {
                Some(identifier) => validation::validate_non_empty_string(
                    &format!("providers.{}.identifier", provider),
                    identifier,
                )?,
                None => {
                    validation::normalize_cep("race.cep", self.cep())?;
                }
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms())
    }

    fn endpoints(&self) -> Result<Vec<ProviderEndpoint>> {
        let mut endpoints = Vec::new();
        for provider in Provider::ALL {
            if !self.is_enabled(provider) {
                continue;
            }
            endpoints.push(ProviderEndpoint::new(
                provider,
                self.base_url(provider),
                self.identifier(provider)?,
            ));
        }
        Ok(endpoints)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.cep(), DEFAULT_CEP);
        assert_eq!(config.timeout(), Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert!(config.validate().is_ok());

        let endpoints = config.endpoints().unwrap();
        assert_eq!(
            endpoints,
            vec![
                ProviderEndpoint::new(
                    Provider::ApiCep,
                    "https://cdn.apicep.com/file/apicep",
                    "06233-030"
                ),
                ProviderEndpoint::new(Provider::ViaCep, "http://viacep.com.br/ws", "06233030"),
            ]
        );
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[race]
cep = "01001-000"
timeout_ms = 250

[providers.apicep]
enabled = false

[providers.viacep]
base_url = "https://viacep.example.com/ws"
identifier = "01001000"

[logging]
level = "debug"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.timeout(), Duration::from_millis(250));
        assert_eq!(config.log_level(), Some("debug"));
        assert!(!config.is_enabled(Provider::ApiCep));

        let endpoints = config.endpoints().unwrap();
        assert_eq!(endpoints.len(), 1);
        assert_eq!(
            endpoints[0].url(),
            "https://viacep.example.com/ws/01001000/json"
        );
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CEP_RACE_TEST_VIACEP_URL", "https://test.viacep.local/ws");

        let toml_content = r#"
[providers.viacep]
base_url = "${CEP_RACE_TEST_VIACEP_URL}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.base_url(Provider::ViaCep),
            "https://test.viacep.local/ws"
        );

        std::env::remove_var("CEP_RACE_TEST_VIACEP_URL");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = TomlConfig::from_toml_str(
            r#"
[providers.apicep]
base_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(bad_url.validate().is_err());

        let bad_cep = TomlConfig::from_toml_str(
            r#"
[race]
cep = "123"
"#,
        )
        .unwrap();
        assert!(bad_cep.validate().is_err());

        let nothing_enabled = TomlConfig::from_toml_str(
            r#"
[providers.apicep]
enabled = false

[providers.viacep]
enabled = false
"#,
        )
        .unwrap();
        assert!(nothing_enabled.validate().is_err());

        let too_slow = TomlConfig::from_toml_str(
            r#"
[race]
timeout_ms = 3600000
"#,
        )
        .unwrap();
        assert!(too_slow.validate().is_err());
    }

    #[test]
    fn test_explicit_identifiers_skip_cep_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[race]
cep = "not-a-cep"

[providers.apicep]
identifier = "06233-030"

[providers.viacep]
identifier = "06233030"
"#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.identifier(Provider::ApiCep).unwrap(), "06233-030");
    }

    #[test]
    fn test_invalid_toml_reports_parsing_error() {
        let err = TomlConfig::from_toml_str("[race\ncep = ").unwrap_err();
        assert!(matches!(err, CepError::ConfigValidationError { field, .. } if field == "toml_parsing"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[race]
cep = "06233030"
timeout_ms = 500
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.timeout_ms(), 500);
    }
}
