use thiserror::Error;

/// 單一 provider 查詢失敗的原因。只在 fetch task 內部記錄，不會傳到 coordinator。
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote error (HTTP {status}): {body}")]
    Remote { status: u16, body: String },

    #[error("postal code not found: {message}")]
    NotFound { message: String },

    #[error("unable to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

#[derive(Error, Debug)]
pub enum CepError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unable to serialize the cep data into json: {0}")]
    EncodeError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CepError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CepError::HttpClientError(_) => ErrorSeverity::Medium,
            CepError::ConfigValidationError { .. }
            | CepError::InvalidConfigValueError { .. }
            | CepError::MissingConfigError { .. } => ErrorSeverity::High,
            CepError::IoError(_) => ErrorSeverity::High,
            // 序列化失敗代表 fetcher 解析出了不合法的資料，屬於程式錯誤
            CepError::EncodeError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CepError::IoError(e) => format!("Unable to write output: {}", e),
            CepError::EncodeError(_) => {
                "The winning response could not be encoded as JSON".to_string()
            }
            CepError::HttpClientError(_) => "Unable to initialize the HTTP client".to_string(),
            CepError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            CepError::InvalidConfigValueError { field, value, reason } => {
                format!("'{}' is not a valid value for '{}': {}", value, field, reason)
            }
            CepError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CepError::IoError(_) => "Check that stdout/stderr are writable",
            CepError::EncodeError(_) => "This is a bug in a provider schema; please report it",
            CepError::HttpClientError(_) => "Check the TLS setup of this host",
            CepError::ConfigValidationError { .. } => {
                "Review the configuration file and command line flags"
            }
            CepError::InvalidConfigValueError { .. } => {
                "Fix the value shown above; see --help for accepted formats"
            }
            CepError::MissingConfigError { .. } => "Provide the missing setting via TOML or CLI",
        }
    }

    /// 依嚴重程度決定程式結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, CepError>;
