//! # In-Memory Data Source
//!
//! Holds a fixed catalog plus customers and appointments behind
//! `tokio::sync::RwLock`. Used for demos and tests; nothing persists.
//!
//! Lock order is customers, then appointments.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::DataSource;
use crate::error::BookingResult;
use salon_core::schedule::ensure_available;
use salon_core::stats::{daily_stats, DailyStats};
use salon_core::validation::validate_customer_info;
use salon_core::{
    demo_catalog, Appointment, BookingRecord, Catalog, CoreError, Customer, Employee, Service,
};

#[derive(Debug)]
pub struct MemoryDataSource {
    catalog: Catalog,
    customers: RwLock<Vec<Customer>>,
    appointments: RwLock<Vec<Appointment>>,
}

impl MemoryDataSource {
    /// Empty customers and appointments over `catalog`.
    pub fn new(catalog: Catalog) -> Self {
        MemoryDataSource {
            catalog,
            customers: RwLock::new(Vec::new()),
            appointments: RwLock::new(Vec::new()),
        }
    }

    /// Seeded with the demo salon catalog.
    pub fn demo() -> Self {
        Self::new(demo_catalog())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl Default for MemoryDataSource {
    fn default() -> Self {
        Self::demo()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl DataSource for MemoryDataSource {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list_services(&self) -> BookingResult<Vec<Service>> {
        Ok(self.catalog.services().to_vec())
    }

    async fn list_employees(&self) -> BookingResult<Vec<Employee>> {
        Ok(self.catalog.employees().to_vec())
    }

    async fn list_customers(&self) -> BookingResult<Vec<Customer>> {
        Ok(self.customers.read().await.clone())
    }

    async fn list_appointments(&self) -> BookingResult<Vec<Appointment>> {
        let mut all = self.appointments.read().await.clone();
        all.sort_by_key(|a| a.start_at);
        Ok(all)
    }

    async fn add_appointment(&self, record: BookingRecord) -> BookingResult<Appointment> {
        validate_customer_info(&record.customer).map_err(CoreError::from)?;
        self.catalog.employee(&record.employee_id)?;
        self.catalog.service(&record.service_id)?;

        let mut customers = self.customers.write().await;
        let mut appointments = self.appointments.write().await;

        ensure_available(&appointments, &record)?;

        let email = normalize_email(&record.customer.email);
        let customer_id = match customers.iter().find(|c| c.email == email) {
            Some(existing) => existing.id.clone(),
            None => {
                let customer = Customer {
                    id: Uuid::new_v4().to_string(),
                    name: record.customer.name.trim().to_string(),
                    email,
                    phone: record.customer.phone.trim().to_string(),
                    points_balance: 0,
                    created_at: Utc::now(),
                };
                debug!(id = %customer.id, "Created customer");
                let id = customer.id.clone();
                customers.push(customer);
                id
            }
        };

        let appointment = Appointment::from_record(&record, Uuid::new_v4().to_string(), customer_id);
        appointments.push(appointment.clone());

        info!(id = %appointment.id, employee_id = %appointment.employee_id, "Appointment booked");
        Ok(appointment)
    }

    async fn daily_stats(&self, date: NaiveDate) -> BookingResult<DailyStats> {
        let customers = self.customers.read().await;
        let appointments = self.appointments.read().await;
        Ok(daily_stats(date, &appointments, self.catalog.services(), &customers))
    }
}
