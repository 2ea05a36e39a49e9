//! Google Gemini model definitions.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::EnumString;

/// Google Gemini models.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString)]
pub enum GoogleModel {
    #[strum(serialize = "gemini-2.0-flash-exp")]
    Gemini20FlashExp,
    #[strum(serialize = "gemini-2.0-flash")]
    Gemini20Flash,
    #[strum(serialize = "gemini-2.5-flash")]
    Gemini25Flash,
    #[strum(serialize = "gemini-2.5-pro")]
    Gemini25Pro,
    /// Custom/unknown Google model.
    #[strum(default)]
    Custom(String),
}

impl GoogleModel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Gemini20FlashExp => "gemini-2.0-flash-exp",
            Self::Gemini20Flash => "gemini-2.0-flash",
            Self::Gemini25Flash => "gemini-2.5-flash",
            Self::Gemini25Pro => "gemini-2.5-pro",
            Self::Custom(s) => s,
        }
    }
}

impl Default for GoogleModel {
    fn default() -> Self {
        Self::Gemini20FlashExp
    }
}

impl fmt::Display for GoogleModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_custom_ids_parse() {
        assert_eq!(
            "gemini-2.0-flash-exp".parse::<GoogleModel>().unwrap(),
            GoogleModel::Gemini20FlashExp
        );
        let custom: GoogleModel = "gemini-exp-1206".parse().unwrap();
        assert_eq!(custom.as_str(), "gemini-exp-1206");
        assert_eq!(custom.to_string(), "gemini-exp-1206");
    }
}
