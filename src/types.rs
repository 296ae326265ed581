use serde::{Deserialize, Serialize};
use std::fmt;

/// Model identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether the identifier is one of the supported Gemini models
    pub fn is_supported(&self) -> bool {
        matches!(self.0.as_str(), Self::GEMINI_2_0_FLASH | Self::GEMINI_1_5_FLASH)
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ModelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ModelId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Predefined model IDs
impl ModelId {
    pub const GEMINI_2_0_FLASH: &'static str = "gemini-2.0-flash-exp";
    pub const GEMINI_1_5_FLASH: &'static str = "gemini-1.5-flash";
}

impl Default for ModelId {
    fn default() -> Self {
        Self(Self::GEMINI_2_0_FLASH.to_string())
    }
}

/// Request ID for tracking
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_models() {
        assert!(ModelId::default().is_supported());
        assert!(ModelId::new(ModelId::GEMINI_1_5_FLASH).is_supported());
        assert!(!ModelId::new("gpt-4o").is_supported());
    }
}
