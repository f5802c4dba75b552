//! Shared fixtures for the integration suite, mirroring the hospital staging
//! feed the pipeline was built for.

use std::sync::Once;

use chrono::NaiveDate;
use ingest::schema::{FieldMapping, Role};
use ingest::types::{Cell, Record};

/// Initializes test tracing once for the whole test binary.
///
/// Honors `RUST_LOG` so individual runs can turn verbosity up.
pub fn init_test_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// The reference date all derived-column expectations are computed against.
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 11).unwrap()
}

/// The role mapping of the hospital staging feed.
pub fn hospital_mapping() -> FieldMapping {
    FieldMapping::new()
        .with_field(Role::CustomerId, "Customer_Id")
        .with_field(Role::Country, "Country")
        .with_field(Role::LastConsultedDate, "Last_Consulted_Date")
        .with_field(Role::DateOfBirth, "DOB")
}

/// Builds a full staging record with the feed's fixed filler fields.
pub fn staging_record(
    name: &str,
    id: &str,
    state: &str,
    country: &str,
    last_consulted: &str,
) -> Record {
    Record::from_fields([
        ("Customer_Name", Cell::from(name)),
        ("Customer_Id", Cell::from(id)),
        ("Open_Date", Cell::from("20101012")),
        ("Last_Consulted_Date", Cell::from(last_consulted)),
        ("Vaccination_Id", Cell::from("MVD")),
        ("Dr_Name", Cell::from("Paul")),
        ("State", Cell::from(state)),
        ("Country", Cell::from(country)),
        ("DOB", Cell::from("19870306")),
        ("Is_Active", Cell::from("A")),
    ])
}

/// The five-customer staging batch, one record per country.
pub fn sample_staging_batch() -> Vec<Record> {
    vec![
        staging_record("Alex", "123457", "SA", "USA", "20121013"),
        staging_record("John", "123458", "TN", "IND", "20121013"),
        staging_record("Mathew", "123459", "WAS", "PHIL", "20121013"),
        staging_record("Matt", "12345", "BOS", "NYC", "20121013"),
        staging_record("Jacob", "1256", "VIC", "AU", "20121013"),
    ]
}
