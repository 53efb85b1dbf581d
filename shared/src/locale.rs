//! Display language. Only affects rendered strings, never stored data.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Pt,
    En,
    Es,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::Pt, Locale::En, Locale::Es];

    /// Parses a language tag such as `en`, `en-US` or `pt_BR`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match primary.as_str() {
            "pt" => Some(Locale::Pt),
            "en" => Some(Locale::En),
            "es" => Some(Locale::Es),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::Pt => "pt",
            Locale::En => "en",
            Locale::Es => "es",
        }
    }

    /// `dd/mm/yyyy` for pt and es, `mm/dd/yyyy` for en.
    pub fn format_date(&self, date: NaiveDate) -> String {
        match self {
            Locale::En => date.format("%m/%d/%Y").to_string(),
            Locale::Pt | Locale::Es => date.format("%d/%m/%Y").to_string(),
        }
    }

    /// 24h clock in every locale
    pub fn format_time(&self, time: NaiveTime) -> String {
        time.format("%H:%M").to_string()
    }
}

/// User-facing status shown by a feature screen after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// The backend store is not configured; data stays on this device.
    ConfigurationNeeded,
    /// A store call failed; nothing was changed.
    SaveFailed,
    LoadFailed,
    SignInRequired,
}

impl Notice {
    pub fn text(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Notice::ConfigurationNeeded, Locale::Pt) => {
                "Configure o banco de dados para salvar seus dados. Por enquanto eles ficam apenas neste dispositivo."
            }
            (Notice::ConfigurationNeeded, Locale::En) => {
                "Configure the database to save your data. For now it only stays on this device."
            }
            (Notice::ConfigurationNeeded, Locale::Es) => {
                "Configura la base de datos para guardar tus datos. Por ahora solo quedan en este dispositivo."
            }
            (Notice::SaveFailed, Locale::Pt) => "Não foi possível salvar. Tente novamente.",
            (Notice::SaveFailed, Locale::En) => "Could not save. Please try again.",
            (Notice::SaveFailed, Locale::Es) => "No se pudo guardar. Inténtalo de nuevo.",
            (Notice::LoadFailed, Locale::Pt) => "Não foi possível carregar os dados.",
            (Notice::LoadFailed, Locale::En) => "Could not load your data.",
            (Notice::LoadFailed, Locale::Es) => "No se pudieron cargar los datos.",
            (Notice::SignInRequired, Locale::Pt) => "Entre na sua conta para continuar.",
            (Notice::SignInRequired, Locale::En) => "Sign in to continue.",
            (Notice::SignInRequired, Locale::Es) => "Inicia sesión para continuar.",
        }
    }
}
