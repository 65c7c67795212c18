//! Colorado (CDPHE vital records)
//!
//! Fee amounts confirmed against the CDPHE direct-mail schedule, January
//! 2026. Overlay coordinates measured against the CDPHE birth certificate
//! request form, February 2026 revision.

use super::{
    AgencyInfo, FeeSchedule, FormTemplate, JurisdictionConfig, JurisdictionStatus, MailingAddress,
    TextSlot,
};

pub(super) fn colorado() -> JurisdictionConfig {
    JurisdictionConfig {
        code: "CO".to_string(),
        name: "Colorado".to_string(),
        status: JurisdictionStatus::Live,
        request_type: "birth_certificate".to_string(),
        agency: AgencyInfo {
            name: "Colorado Department of Public Health and Environment".to_string(),
            mailing_address: MailingAddress {
                name: "Vital Records Section, CDPHE".to_string(),
                street: "4300 Cherry Creek Drive South".to_string(),
                city: "Denver".to_string(),
                state: "CO".to_string(),
                zip: "80246-1530".to_string(),
            },
            phone: "303-692-2200".to_string(),
            processing_time_days: 10,
        },
        fees: FeeSchedule {
            first_copy_cents: 2500,
            additional_copy_cents: 2000,
            service_fee_cents: 500,
            postage_cents: 600,
            check_payee: "Vital Records".to_string(),
        },
        form: FormTemplate {
            template_path: "forms/CO_birth_request.pdf".to_string(),
            slots: vec![
                TextSlot { key: "requestor_name", x: 72.0, y: 676.0 },
                TextSlot { key: "requestor_email", x: 366.0, y: 676.0 },
                TextSlot { key: "mailing_street", x: 72.0, y: 652.0 },
                TextSlot { key: "mailing_city_state_zip", x: 72.0, y: 628.0 },
                TextSlot { key: "relationship", x: 72.0, y: 586.0 },
                TextSlot { key: "purpose", x: 306.0, y: 586.0 },
                TextSlot { key: "registrant_name", x: 72.0, y: 520.0 },
                TextSlot { key: "date_of_birth", x: 366.0, y: 520.0 },
                TextSlot { key: "place_of_birth", x: 72.0, y: 496.0 },
                TextSlot { key: "mother_name", x: 72.0, y: 460.0 },
                TextSlot { key: "father_name", x: 306.0, y: 460.0 },
                TextSlot { key: "copies", x: 72.0, y: 190.0 },
                TextSlot { key: "fee_total", x: 366.0, y: 190.0 },
                TextSlot { key: "todays_date", x: 366.0, y: 120.0 },
                // Signature image bottom-left corner, drawn 200x40 points
                TextSlot { key: "signature", x: 80.0, y: 122.0 },
            ],
        },
    }
}
