use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::domain::JobApplication;

/// Length of the upcoming-deadline window, inclusive on both ends.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatistics {
    pub today: NaiveDate,
    pub total: usize,
    /// Distinct status text, in the order each status first appears.
    pub by_status: Vec<StatusCount>,
    /// Closing within `[today, today + 7 days]`, soonest first.
    pub upcoming_deadlines: Vec<JobApplication>,
}

impl ApplicationStatistics {
    pub fn count_for(&self, status: &str) -> usize {
        self.by_status
            .iter()
            .find(|entry| entry.status == status)
            .map_or(0, |entry| entry.count)
    }
}

pub(crate) fn compute(applications: &[JobApplication], today: NaiveDate) -> ApplicationStatistics {
    ApplicationStatistics {
        today,
        total: applications.len(),
        by_status: status_histogram(applications),
        upcoming_deadlines: upcoming_deadlines(applications, today),
    }
}

fn status_histogram(applications: &[JobApplication]) -> Vec<StatusCount> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut histogram: Vec<StatusCount> = Vec::new();

    for application in applications {
        match positions.get(application.status.as_str()) {
            Some(&index) => histogram[index].count += 1,
            None => {
                positions.insert(&application.status, histogram.len());
                histogram.push(StatusCount {
                    status: application.status.clone(),
                    count: 1,
                });
            }
        }
    }

    histogram
}

fn upcoming_deadlines(applications: &[JobApplication], today: NaiveDate) -> Vec<JobApplication> {
    let window_end = today
        .checked_add_signed(Duration::days(UPCOMING_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MAX);

    let mut upcoming: Vec<JobApplication> = applications
        .iter()
        .filter(|application| {
            application
                .closing_date
                .is_some_and(|closing| closing >= today && closing <= window_end)
        })
        .cloned()
        .collect();

    upcoming.sort_by_key(|application| application.closing_date);
    upcoming
}
