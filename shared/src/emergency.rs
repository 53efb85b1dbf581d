//! Emergency phone numbers by country.

use serde::{Deserialize, Serialize};

/// Country used when none can be determined.
pub const DEFAULT_COUNTRY: CountryCode = CountryCode::Br;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CountryCode {
    Br,
    Us,
    Es,
    Fr,
    Nl,
}

impl CountryCode {
    pub const ALL: [CountryCode; 5] = [
        CountryCode::Br,
        CountryCode::Us,
        CountryCode::Es,
        CountryCode::Fr,
        CountryCode::Nl,
    ];

    /// Case-insensitive ISO 3166 alpha-2 lookup.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "BR" => Some(CountryCode::Br),
            "US" => Some(CountryCode::Us),
            "ES" => Some(CountryCode::Es),
            "FR" => Some(CountryCode::Fr),
            "NL" => Some(CountryCode::Nl),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CountryCode::Br => "BR",
            CountryCode::Us => "US",
            CountryCode::Es => "ES",
            CountryCode::Fr => "FR",
            CountryCode::Nl => "NL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContacts {
    pub country: &'static str,
    pub country_code: CountryCode,
    pub medical_emergency: &'static str,
    pub psychological_support: &'static str,
    pub police: &'static str,
    pub ambulance: &'static str,
}

pub fn contacts_for(code: CountryCode) -> EmergencyContacts {
    match code {
        CountryCode::Br => EmergencyContacts {
            country: "Brasil",
            country_code: code,
            medical_emergency: "192",
            psychological_support: "188",
            police: "190",
            ambulance: "192",
        },
        CountryCode::Us => EmergencyContacts {
            country: "United States",
            country_code: code,
            medical_emergency: "911",
            psychological_support: "988",
            police: "911",
            ambulance: "911",
        },
        CountryCode::Es => EmergencyContacts {
            country: "España",
            country_code: code,
            medical_emergency: "112",
            psychological_support: "024",
            police: "112",
            ambulance: "112",
        },
        CountryCode::Fr => EmergencyContacts {
            country: "France",
            country_code: code,
            medical_emergency: "15",
            psychological_support: "3114",
            police: "17",
            ambulance: "15",
        },
        CountryCode::Nl => EmergencyContacts {
            country: "Netherlands",
            country_code: code,
            medical_emergency: "112",
            psychological_support: "113",
            police: "112",
            ambulance: "112",
        },
    }
}

/// `tel:` URI for a dialable number; spaces and dashes are dropped.
pub fn tel_uri(number: &str) -> String {
    let digits: String = number
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    format!("tel:{digits}")
}
