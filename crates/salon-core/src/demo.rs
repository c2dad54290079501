//! # Demo Catalog
//!
//! A small nail-salon catalog used by the in-memory data source and the
//! `seed` binary.

use crate::catalog::Catalog;
use crate::types::{Employee, Service};

fn service(
    id: &str,
    name: &str,
    category: &str,
    duration_minutes: u32,
    price_cents: i64,
    points_earned: Option<i64>,
    description: &str,
) -> Service {
    Service {
        id: id.to_string(),
        name: name.to_string(),
        duration_minutes,
        price_cents,
        points_earned,
        points_price: points_earned.map(|p| p * 10),
        category: category.to_string(),
        description: description.to_string(),
    }
}

fn employee(id: &str, name: &str, specialties: &[&str], color: &str) -> Employee {
    Employee {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@salon.local", id),
        phone: "555-0100".to_string(),
        specialties: specialties.iter().map(|s| s.to_string()).collect(),
        color: color.to_string(),
    }
}

/// Services in display order, followed by the staff.
pub fn demo_catalog() -> Catalog {
    let services = vec![
        service("classic-manicure", "Classic Manicure", "Manicure", 30, 2500, Some(25), "Shape, cuticle care and polish"),
        service("gel-manicure", "Gel Manicure", "Manicure", 45, 4000, Some(40), "Long-lasting gel polish"),
        service("spa-pedicure", "Spa Pedicure", "Pedicure", 60, 5500, Some(55), "Soak, scrub, massage and polish"),
        service("classic-pedicure", "Classic Pedicure", "Pedicure", 45, 3500, Some(35), ""),
        service("nail-art", "Nail Art (per set)", "Nail Art", 30, 1500, None, "Hand-painted designs"),
        service("acrylic-full-set", "Acrylic Full Set", "Extensions", 90, 6500, Some(65), ""),
        service("french-manicure", "French Manicure", "Manicure", 40, 3500, Some(35), ""),
    ];

    let employees = vec![
        employee("mai", "Mai Tran", &["Manicure", "Nail Art"], "#e11d48"),
        employee("lena", "Lena Ortiz", &["Pedicure", "Manicure"], "#2563eb"),
        employee("sam", "Sam Okafor", &["Extensions", "Nail Art"], "#16a34a"),
    ];

    Catalog::new(services, employees)
}
