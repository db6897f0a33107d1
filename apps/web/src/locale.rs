use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::{SessionKey, SessionStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

#[derive(Debug, Error)]
#[error("Unsupported language code: {0}")]
pub struct UnsupportedLanguage(pub String);

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Ar)
    }

    /// Stored preference, or `fallback` when nothing (or garbage) is stored.
    pub fn load(store: &dyn SessionStore, fallback: Language) -> Language {
        store
            .get(SessionKey::Lang)
            .and_then(|code| code.parse().ok())
            .unwrap_or(fallback)
    }

    pub fn save(&self, store: &dyn SessionStore) {
        store.set(SessionKey::Lang, self.code().to_string());
    }
}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ar" => Ok(Language::Ar),
            other => Err(UnsupportedLanguage(other.to_string())),
        }
    }
}
