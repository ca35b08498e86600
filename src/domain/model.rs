use serde::{Deserialize, Serialize};
use std::fmt;

/// 內建的兩個 CEP 查詢服務
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[cfg_attr(feature = "cli", value(name = "apicep"))]
    ApiCep,
    #[cfg_attr(feature = "cli", value(name = "viacep"))]
    ViaCep,
}

/// provider 期望的 CEP 格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierStyle {
    /// `06233-030`
    Hyphenated,
    /// `06233030`
    Digits,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::ApiCep, Provider::ViaCep];

    pub fn name(&self) -> &'static str {
        match self {
            Provider::ApiCep => "apicep",
            Provider::ViaCep => "viacep",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::ApiCep => "https://cdn.apicep.com/file/apicep",
            Provider::ViaCep => "http://viacep.com.br/ws",
        }
    }

    pub fn identifier_style(&self) -> IdentifierStyle {
        match self {
            Provider::ApiCep => IdentifierStyle::Hyphenated,
            Provider::ViaCep => IdentifierStyle::Digits,
        }
    }

    /// 依 provider 的 URL 樣板組出查詢網址
    pub fn lookup_url(&self, base_url: &str, identifier: &str) -> String {
        let base = base_url.trim_end_matches('/');
        match self {
            Provider::ApiCep => format!("{}/{}.json", base, identifier),
            Provider::ViaCep => format!("{}/{}/json", base, identifier),
        }
    }

    /// `digits` 必須是已正規化的 8 位數 CEP
    pub fn format_identifier(&self, digits: &str) -> String {
        match self.identifier_style() {
            IdentifierStyle::Hyphenated if digits.len() == 8 && digits.is_ascii() => {
                format!("{}-{}", &digits[..5], &digits[5..])
            }
            _ => digits.to_string(),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 單一 fetcher 的解析後設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoint {
    pub provider: Provider,
    pub base_url: String,
    pub identifier: String,
}

impl ProviderEndpoint {
    pub fn new(provider: Provider, base_url: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            provider,
            base_url: base_url.into(),
            identifier: identifier.into(),
        }
    }

    pub fn url(&self) -> String {
        self.provider.lookup_url(&self.base_url, &self.identifier)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiCepData {
    pub status: i64,
    pub code: String,
    pub state: String,
    pub city: String,
    pub district: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViaCepData {
    pub cep: String,
    pub logradouro: String,
    pub complemento: String,
    pub bairro: String,
    pub localidade: String,
    pub uf: String,
    pub ibge: String,
    pub gia: String,
    pub ddd: String,
    pub siafi: String,
}

/// 各 provider 的查詢結果，沒有共用的欄位結構
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProviderResult {
    ApiCep(ApiCepData),
    ViaCep(ViaCepData),
}

impl ProviderResult {
    pub fn provider(&self) -> Provider {
        match self {
            ProviderResult::ApiCep(_) => Provider::ApiCep,
            ProviderResult::ViaCep(_) => Provider::ViaCep,
        }
    }

    /// 序列化內層的資料，欄位順序與 struct 宣告一致
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// 一次賽跑的最終結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceOutcome {
    Success {
        provider: String,
        result: ProviderResult,
    },
    Timeout,
}

impl RaceOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RaceOutcome::Success { .. })
    }

    pub fn winner(&self) -> Option<&str> {
        match self {
            RaceOutcome::Success { provider, .. } => Some(provider),
            RaceOutcome::Timeout => None,
        }
    }
}
