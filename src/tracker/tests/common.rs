use chrono::NaiveDate;

use crate::tracker::domain::NewApplication;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn new_application(company: &str, position: &str, reference: &str) -> NewApplication {
    NewApplication {
        company: company.to_string(),
        position: position.to_string(),
        reference_number: reference.to_string(),
        application_date: date(2024, 12, 15),
        closing_date: None,
        application_method: "Online".to_string(),
        status: "Applied".to_string(),
        contact_person: "Jordan Lee".to_string(),
        contact_email: "jordan@example.com".to_string(),
        notes: String::new(),
    }
}

pub(super) fn with_status(mut application: NewApplication, status: &str) -> NewApplication {
    application.status = status.to_string();
    application
}

pub(super) fn closing_on(mut application: NewApplication, closing: NaiveDate) -> NewApplication {
    application.closing_date = Some(closing);
    application
}
