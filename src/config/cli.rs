use crate::config::toml_config::TomlConfig;
use crate::domain::model::Provider;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "cep-race")]
#[command(about = "Look up a Brazilian postal code by racing ApiCEP against ViaCEP")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Postal code to look up (NNNNNNNN or NNNNN-NNN)
    #[arg(long)]
    pub cep: Option<String>,

    /// Overall deadline for the race, in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    #[arg(long)]
    pub apicep_url: Option<String>,

    #[arg(long)]
    pub viacep_url: Option<String>,

    /// Identifier sent to ApiCEP as-is
    #[arg(long)]
    pub apicep_id: Option<String>,

    /// Identifier sent to ViaCEP as-is
    #[arg(long)]
    pub viacep_id: Option<String>,

    /// Leave a provider out of the race
    #[arg(long, value_enum)]
    pub disable: Vec<Provider>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Print the resolved endpoints without sending any request
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// 載入 TOML（若有指定），再套用命令列覆蓋設定
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(cep) = &self.cep {
            config.race.cep = Some(cep.clone());
            // --cep 取代 TOML 裡的 identifier；--apicep-id / --viacep-id 於下方再覆蓋
            for provider in Provider::ALL {
                config.providers.get_mut(provider).identifier = None;
            }
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.race.timeout_ms = Some(timeout_ms);
        }

        let overrides = [
            (Provider::ApiCep, &self.apicep_url, &self.apicep_id),
            (Provider::ViaCep, &self.viacep_url, &self.viacep_id),
        ];
        for (provider, base_url, identifier) in overrides {
            if let Some(base_url) = base_url {
                config.providers.get_mut(provider).base_url = Some(base_url.clone());
            }
            if let Some(identifier) = identifier {
                config.providers.get_mut(provider).identifier = Some(identifier.clone());
            }
        }

        for provider in &self.disable {
            config.providers.get_mut(*provider).enabled = Some(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;
    use std::time::Duration;

    #[test]
    fn test_cli_defaults_match_reference_lookup() {
        let cli = CliConfig::parse_from(["cep-race"]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.timeout(), Duration::from_millis(1_000));
        let identifiers: Vec<String> = config
            .endpoints()
            .unwrap()
            .into_iter()
            .map(|e| e.identifier)
            .collect();
        assert_eq!(identifiers, vec!["06233-030", "06233030"]);
    }

    #[test]
    fn test_cli_cep_replaces_toml_identifiers() {
        let mut config = TomlConfig::from_toml_str(
            r#"
[providers.apicep]
identifier = "06233-030"

[providers.viacep]
identifier = "06233030"
"#,
        )
        .unwrap();

        let cli = CliConfig::parse_from(["cep-race", "--cep", "01001000"]);
        cli.apply_overrides(&mut config);

        let identifiers: Vec<String> = config
            .endpoints()
            .unwrap()
            .into_iter()
            .map(|e| e.identifier)
            .collect();
        assert_eq!(identifiers, vec!["01001-000", "01001000"]);
    }

    #[test]
    fn test_cli_provider_id_wins_over_cli_cep() {
        let mut config = TomlConfig::from_toml_str(
            r#"
[providers.viacep]
identifier = "06233030"
"#,
        )
        .unwrap();

        let cli = CliConfig::parse_from([
            "cep-race",
            "--cep",
            "01001000",
            "--viacep-id",
            "01001-000",
        ]);
        cli.apply_overrides(&mut config);

        assert_eq!(config.identifier(Provider::ApiCep).unwrap(), "01001-000");
        assert_eq!(config.identifier(Provider::ViaCep).unwrap(), "01001-000");
    }

    #[test]
    fn test_cli_overrides_toml_values() {
        let mut config = TomlConfig::from_toml_str(
            r#"
[race]
cep = "01001000"
timeout_ms = 300

[providers.viacep]
base_url = "https://from-toml.example/ws"
"#,
        )
        .unwrap();

        let cli = CliConfig::parse_from([
            "cep-race",
            "--timeout-ms",
            "50",
            "--viacep-url",
            "http://127.0.0.1:9999/ws",
            "--apicep-id",
            "01001-000",
            "--disable",
            "apicep",
        ]);
        cli.apply_overrides(&mut config);

        assert_eq!(config.timeout_ms(), 50);
        assert_eq!(config.cep(), "01001000");
        assert_eq!(config.base_url(Provider::ViaCep), "http://127.0.0.1:9999/ws");
        assert!(!config.is_enabled(Provider::ApiCep));
        assert_eq!(config.endpoints().unwrap().len(), 1);
    }
}
