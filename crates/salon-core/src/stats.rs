//! # Stats Aggregation
//!
//! Daily figures and week buckets for the dashboard.
//!
//! Revenue counts scheduled and completed appointments at their service's
//! catalog price. Cancellations and no-shows add nothing. Appointments whose
//! service is no longer in the catalog count towards the totals but add no
//! revenue.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Appointment, AppointmentStatus, Customer, Service};

/// Aggregates for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailyStats {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub appointment_count: u32,
    pub completed_count: u32,
    pub cancelled_count: u32,
    pub revenue: Money,
    /// Customers first seen (created) that day.
    pub new_customers: u32,
}

/// Aggregates for one Monday-start week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WeekBucket {
    #[ts(as = "String")]
    pub week_start: NaiveDate,
    pub appointment_count: u32,
    pub revenue: Money,
}

/// The Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn price_index(services: &[Service]) -> HashMap<&str, Money> {
    services
        .iter()
        .map(|s| (s.id.as_str(), s.price()))
        .collect()
}

fn revenue_of(appt: &Appointment, prices: &HashMap<&str, Money>) -> Money {
    if !appt.status.earns_revenue() {
        return Money::zero();
    }
    prices
        .get(appt.service_id.as_str())
        .copied()
        .unwrap_or_default()
}

/// Computes the stats for `date`.
pub fn daily_stats(
    date: NaiveDate,
    appointments: &[Appointment],
    services: &[Service],
    customers: &[Customer],
) -> DailyStats {
    let prices = price_index(services);
    let mut stats = DailyStats {
        date,
        appointment_count: 0,
        completed_count: 0,
        cancelled_count: 0,
        revenue: Money::zero(),
        new_customers: 0,
    };

    for appt in appointments.iter().filter(|a| a.start_at.date() == date) {
        stats.appointment_count += 1;
        match appt.status {
            AppointmentStatus::Completed => stats.completed_count += 1,
            AppointmentStatus::Cancelled => stats.cancelled_count += 1,
            AppointmentStatus::Scheduled | AppointmentStatus::NoShow => {}
        }
        stats.revenue += revenue_of(appt, &prices);
    }

    stats.new_customers = customers
        .iter()
        .filter(|c| c.created_at.date_naive() == date)
        .count() as u32;

    stats
}

/// Buckets appointments by week, ascending by week start.
pub fn weekly_buckets(appointments: &[Appointment], services: &[Service]) -> Vec<WeekBucket> {
    let prices = price_index(services);
    let mut weeks: BTreeMap<NaiveDate, WeekBucket> = BTreeMap::new();

    for appt in appointments {
        let start = week_start(appt.start_at.date());
        let bucket = weeks.entry(start).or_insert_with(|| WeekBucket {
            week_start: start,
            appointment_count: 0,
            revenue: Money::zero(),
        });
        bucket.appointment_count += 1;
        bucket.revenue += revenue_of(appt, &prices);
    }

    weeks.into_values().collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
