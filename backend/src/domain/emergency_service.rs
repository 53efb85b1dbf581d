use std::sync::Arc;

use async_trait::async_trait;
use shared::emergency::{contacts_for, tel_uri, DEFAULT_COUNTRY};
use shared::{CountryCode, EmergencyContacts};
use tracing::{info, warn};

/// Source of the caller's current country
#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// `None` when the location cannot be determined.
    async fn resolve_country(&self) -> Option<CountryCode>;
}

pub struct FixedLocation(pub CountryCode);

#[async_trait]
impl LocationResolver for FixedLocation {
    async fn resolve_country(&self) -> Option<CountryCode> {
        Some(self.0)
    }
}

impl Default for FixedLocation {
    fn default() -> Self {
        Self(DEFAULT_COUNTRY)
    }
}

#[derive(Clone)]
pub struct EmergencyService {
    resolver: Arc<dyn LocationResolver>,
}

impl EmergencyService {
    pub fn new(resolver: Arc<dyn LocationResolver>) -> Self {
        Self { resolver }
    }

    /// Contacts for `requested` when it names a supported country, else for
    /// the resolved location, else for the default country.
    pub async fn contacts(&self, requested: Option<&str>) -> EmergencyContacts {
        if let Some(raw) = requested.filter(|r| !r.trim().is_empty()) {
            match CountryCode::parse(raw) {
                Some(code) => return contacts_for(code),
                None => warn!("Unsupported country code {:?}, falling back to location", raw),
            }
        }

        let country = self.resolver.resolve_country().await.unwrap_or(DEFAULT_COUNTRY);
        info!("Emergency contacts for {}", country.as_str());
        contacts_for(country)
    }

    pub fn dial_uri(number: &str) -> String {
        tel_uri(number)
    }
}

impl Default for EmergencyService {
    fn default() -> Self {
        Self::new(Arc::new(FixedLocation::default()))
    }
}
