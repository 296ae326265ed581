use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenResult};
use crate::types::ModelId;

/// Platform ceiling on the model response size (in tokens)
pub const MAX_OUTPUT_TOKENS: u32 = 8192;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// All user-chosen parameters for one generation request.
///
/// Built fresh per submission, consumed once by the instruction compiler
/// and the model call, then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub task_description: String,
    pub model: ModelId,
    pub temperature: f32,
    pub max_tokens: u32,
    pub prompt_preset: Option<PromptPreset>,
    pub prompt_detail_level: DetailLevel,
    pub powershell_version: PowerShellVersion,
    pub target_os: TargetOs,
    pub file_encoding: FileEncoding,
    pub include_header: bool,
    pub include_error_handling: bool,
    pub verbosity: Verbosity,
    pub script_type: ScriptType,
    pub security_level: SecurityLevel,
    pub logging_level: LoggingLevel,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            task_description: String::new(),
            model: ModelId::default(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: MAX_OUTPUT_TOKENS,
            prompt_preset: None,
            prompt_detail_level: DetailLevel::Medium,
            powershell_version: PowerShellVersion::V7,
            target_os: TargetOs::WindowsServer2016,
            file_encoding: FileEncoding::Utf8,
            include_header: false,
            include_error_handling: false,
            verbosity: Verbosity::Normal,
            script_type: ScriptType::Unattended,
            security_level: SecurityLevel::Standard,
            logging_level: LoggingLevel::None,
        }
    }
}

impl GenerationConfig {
    /// Convenience constructor for the common case
    pub fn new(task_description: impl Into<String>) -> Self {
        Self {
            task_description: task_description.into(),
            ..Self::default()
        }
    }

    /// Validate the record before compiling or sending it anywhere.
    pub fn validate(&self) -> GenResult<()> {
        if self.task_description.trim().is_empty() {
            return Err(GenError::InvalidConfig(
                "task description must not be empty".to_string(),
            ));
        }
        if !self.temperature.is_finite() || !(0.0..=1.0).contains(&self.temperature) {
            return Err(GenError::InvalidConfig(format!(
                "temperature must be within [0.0, 1.0], got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 || self.max_tokens > MAX_OUTPUT_TOKENS {
            return Err(GenError::InvalidConfig(format!(
                "max_tokens must be within 1..={}, got {}",
                MAX_OUTPUT_TOKENS, self.max_tokens
            )));
        }
        if !self.model.is_supported() {
            return Err(GenError::InvalidConfig(format!(
                "unknown model: {}",
                self.model
            )));
        }
        Ok(())
    }
}

/// Canned task description templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptPreset {
    ListFiles,
    ManageProcesses,
    ManageServices,
}

impl PromptPreset {
    /// The canned text prepended to the user's description
    pub fn template(&self) -> &'static str {
        match self {
            PromptPreset::ListFiles => "List files",
            PromptPreset::ManageProcesses => "Manage processes",
            PromptPreset::ManageServices => "Manage services",
        }
    }
}

/// Instruction verbosity sent to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailLevel {
    Low,
    Medium,
    High,
}

/// Target PowerShell version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerShellVersion {
    #[serde(rename = "5.1")]
    V5_1,
    #[serde(rename = "7")]
    V7,
}

impl PowerShellVersion {
    pub fn label(&self) -> &'static str {
        match self {
            PowerShellVersion::V5_1 => "5.1",
            PowerShellVersion::V7 => "7",
        }
    }
}

/// Target operating system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetOs {
    WindowsServer2022,
    WindowsServer2019,
    WindowsServer2016,
    WindowsServer2012R2,
    WindowsServer2012,
    WindowsServer2008R2,
    WindowsServer2008,
    Windows11,
    Windows10,
    Windows8_1,
    Windows8,
    Windows7,
    GenericWindows,
}

impl TargetOs {
    pub fn label(&self) -> &'static str {
        match self {
            TargetOs::WindowsServer2022 => "Windows Server 2022",
            TargetOs::WindowsServer2019 => "Windows Server 2019",
            TargetOs::WindowsServer2016 => "Windows Server 2016",
            TargetOs::WindowsServer2012R2 => "Windows Server 2012 R2",
            TargetOs::WindowsServer2012 => "Windows Server 2012",
            TargetOs::WindowsServer2008R2 => "Windows Server 2008 R2",
            TargetOs::WindowsServer2008 => "Windows Server 2008",
            TargetOs::Windows11 => "Windows 11",
            TargetOs::Windows10 => "Windows 10",
            TargetOs::Windows8_1 => "Windows 8.1",
            TargetOs::Windows8 => "Windows 8",
            TargetOs::Windows7 => "Windows 7",
            TargetOs::GenericWindows => "Windows",
        }
    }
}

/// Encoding of the written .ps1 file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileEncoding {
    Utf8,
    Ascii,
}

/// How chatty the generated script itself should be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    Terse,
    Normal,
    Verbose,
}

/// Whether the script may prompt the operator or must run unattended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptType {
    Unattended,
    Interactive,
}

/// Security posture requested for the generated script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    Standard,
    Hardened,
}

/// In-script logging requested for the generated script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoggingLevel {
    None,
    Basic,
    Detailed,
}

/// Transport configuration for the model client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_fails_on_empty_task() {
        let config = GenerationConfig::default();
        assert!(matches!(
            config.validate(),
            Err(GenError::InvalidConfig(_))
        ));
    }

    #[test]
    fn blank_task_is_rejected() {
        let config = GenerationConfig::new("   \n\t ");
        assert!(matches!(
            config.validate(),
            Err(GenError::InvalidConfig(_))
        ));
    }

    #[test]
    fn temperature_bounds() {
        let mut config = GenerationConfig::new("list all running processes");
        config.temperature = 1.0;
        assert!(config.validate().is_ok());
        config.temperature = 1.1;
        assert!(config.validate().is_err());
        config.temperature = -0.1;
        assert!(config.validate().is_err());
        config.temperature = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn max_tokens_bounds() {
        let mut config = GenerationConfig::new("list all running processes");
        config.max_tokens = 0;
        assert!(config.validate().is_err());
        config.max_tokens = MAX_OUTPUT_TOKENS + 1;
        assert!(config.validate().is_err());
        config.max_tokens = 128;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_model_is_rejected() {
        let mut config = GenerationConfig::new("list all running processes");
        config.model = "llama-3".into();
        assert!(matches!(
            config.validate(),
            Err(GenError::InvalidConfig(_))
        ));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: GenerationConfig = serde_json::from_str(
            r#"{"task_description": "create 50 AD users from a CSV", "security_level": "hardened"}"#,
        )
        .unwrap();
        assert_eq!(config.security_level, SecurityLevel::Hardened);
        assert_eq!(config.powershell_version, PowerShellVersion::V7);
        assert_eq!(config.target_os, TargetOs::WindowsServer2016);
        assert!(config.validate().is_ok());
    }
}
