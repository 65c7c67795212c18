//! Jurisdiction configuration
//!
//! Per-jurisdiction data: the receiving agency and its mailing address, the
//! fee schedule, and the form template layout. Adding a jurisdiction means
//! adding one module here and registering it in [`registry`].

use crate::errors::PipelineError;
use once_cell::sync::Lazy;
use std::collections::HashMap;

mod co;

/// Whether a jurisdiction is accepting requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JurisdictionStatus {
    Live,
    ComingSoon,
}

/// A physical mailing address.
#[derive(Debug, Clone)]
pub struct MailingAddress {
    /// Addressee line, e.g. the records section name
    pub name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// The receiving government agency.
#[derive(Debug, Clone)]
pub struct AgencyInfo {
    /// Full agency name, used in the consent letter body
    pub name: String,
    /// Where packets are mailed
    pub mailing_address: MailingAddress,
    pub phone: String,
    /// Advertised processing time once the packet arrives
    pub processing_time_days: u32,
}

/// Fee schedule, all amounts in cents.
#[derive(Debug, Clone)]
pub struct FeeSchedule {
    pub first_copy_cents: u64,
    pub additional_copy_cents: u64,
    pub service_fee_cents: u64,
    pub postage_cents: u64,
    /// Payee written on the fee check
    pub check_payee: String,
}

impl FeeSchedule {
    /// Agency fee for `copies` certified copies: first copy at the base
    /// rate, each additional copy at the discounted rate.
    pub fn agency_fee_cents(&self, copies: u32) -> u64 {
        self.first_copy_cents + u64::from(copies.saturating_sub(1)) * self.additional_copy_cents
    }
}

/// One positioned text slot on the official form template.
#[derive(Debug, Clone)]
pub struct TextSlot {
    /// Logical field key, e.g. `requestor_name`
    pub key: &'static str,
    /// X position in PDF points from the left edge
    pub x: f32,
    /// Y position in PDF points from the bottom edge
    pub y: f32,
}

/// The official form template and its fill layout.
#[derive(Debug, Clone)]
pub struct FormTemplate {
    /// Filesystem path of the blank agency form
    pub template_path: String,
    /// Overlay positions for filled values, first page
    pub slots: Vec<TextSlot>,
}

impl FormTemplate {
    /// Look up the overlay slot for a logical field key.
    pub fn slot(&self, key: &str) -> Option<&TextSlot> {
        self.slots.iter().find(|slot| slot.key == key)
    }
}

/// Everything the pipeline needs to know about one jurisdiction.
#[derive(Debug, Clone)]
pub struct JurisdictionConfig {
    /// Two-letter code, e.g. `CO`
    pub code: String,
    /// Display name, e.g. `Colorado`
    pub name: String,
    pub status: JurisdictionStatus,
    pub agency: AgencyInfo,
    pub fees: FeeSchedule,
    pub form: FormTemplate,
    /// Type of record this jurisdiction config files for
    pub request_type: String,
}

static REGISTRY: Lazy<HashMap<&'static str, JurisdictionConfig>> = Lazy::new(|| {
    let mut registry = HashMap::new();
    registry.insert("CO", co::colorado());
    registry
});

/// Look up a jurisdiction by code. Unknown codes are a config error,
/// raised before any I/O.
pub fn jurisdiction(code: &str) -> Result<&'static JurisdictionConfig, PipelineError> {
    REGISTRY
        .get(code)
        .ok_or_else(|| PipelineError::config(format!("jurisdiction \"{code}\" is not configured")))
}

/// All jurisdictions currently accepting requests.
pub fn live_jurisdictions() -> Vec<&'static JurisdictionConfig> {
    REGISTRY
        .values()
        .filter(|config| config.status == JurisdictionStatus::Live)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn colorado_is_registered_and_live() {
        let config = jurisdiction("CO").unwrap();
        assert_eq!(config.name, "Colorado");
        assert_eq!(config.status, JurisdictionStatus::Live);
        assert!(live_jurisdictions().iter().any(|c| c.code == "CO"));
    }

    #[test]
    fn unknown_code_is_config_error() {
        assert_matches!(jurisdiction("ZZ"), Err(PipelineError::Config { .. }));
    }

    #[test]
    fn agency_fee_scales_with_copies() {
        let fees = jurisdiction("CO").unwrap().fees.clone();
        assert_eq!(fees.agency_fee_cents(1), fees.first_copy_cents);
        assert_eq!(
            fees.agency_fee_cents(3),
            fees.first_copy_cents + 2 * fees.additional_copy_cents
        );
    }
}
