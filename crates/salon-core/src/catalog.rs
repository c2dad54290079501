//! # Catalog
//!
//! Immutable reference data (services and employees) and the category
//! grouper used to render the SERVICE step.
//!
//! The catalog is loaded once per session from a `DataSource` and injected
//! wherever it is needed; nothing in this crate holds a global copy.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::types::{Employee, Service};

// =============================================================================
// Category Grouping
// =============================================================================

/// Anything that carries a free-text category.
pub trait Categorized {
    fn category(&self) -> &str;
}

impl Categorized for Service {
    fn category(&self) -> &str {
        &self.category
    }
}

impl<T: Categorized + ?Sized> Categorized for &T {
    fn category(&self) -> &str {
        (**self).category()
    }
}

/// All records sharing one category, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup<T> {
    pub category: String,
    pub items: Vec<T>,
}

/// Groups records by category.
///
/// Groups appear in first-seen category order; records keep their input
/// order inside each group.
///
/// ```rust
/// use salon_core::catalog::{group_by_category, Categorized};
///
/// struct Row(&'static str);
/// impl Categorized for Row {
///     fn category(&self) -> &str { self.0 }
/// }
///
/// let groups = group_by_category(vec![Row("B"), Row("A"), Row("B")]);
/// let keys: Vec<_> = groups.iter().map(|g| g.category.as_str()).collect();
/// assert_eq!(keys, ["B", "A"]);
/// assert_eq!(groups[0].items.len(), 2);
/// ```
pub fn group_by_category<T, I>(items: I) -> Vec<CategoryGroup<T>>
where
    T: Categorized,
    I: IntoIterator<Item = T>,
{
    let mut groups: Vec<CategoryGroup<T>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let key = item.category().to_string();
        match index.get(&key) {
            Some(&i) => groups[i].items.push(item),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(CategoryGroup {
                    category: key,
                    items: vec![item],
                });
            }
        }
    }

    groups
}

// =============================================================================
// Catalog
// =============================================================================

/// Services and employees available for booking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    services: Vec<Service>,
    employees: Vec<Employee>,
}

impl Catalog {
    pub fn new(services: Vec<Service>, employees: Vec<Employee>) -> Self {
        Catalog {
            services,
            employees,
        }
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty() && self.employees.is_empty()
    }

    /// Looks up a service by id.
    pub fn service(&self, id: &str) -> CoreResult<&Service> {
        self.services
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::ServiceNotFound(id.to_string()))
    }

    /// Looks up an employee by id.
    pub fn employee(&self, id: &str) -> CoreResult<&Employee> {
        self.employees
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| CoreError::EmployeeNotFound(id.to_string()))
    }

    /// Services grouped for display, first-seen category order.
    pub fn services_by_category(&self) -> Vec<CategoryGroup<&Service>> {
        group_by_category(self.services.iter())
    }

    /// Employees listing `tag` among their specialties.
    pub fn employees_with_specialty<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Employee> + 'a {
        self.employees.iter().filter(move |e| e.has_specialty(tag))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn service(id: &str, category: &str) -> Service {
        Service {
            id: id.to_string(),
            name: id.to_uppercase(),
            duration_minutes: 30,
            price_cents: 3000,
            points_earned: None,
            points_price: None,
            category: category.to_string(),
            description: String::new(),
        }
    }

    fn employee(id: &str, specialties: &[&str]) -> Employee {
        Employee {
            id: id.to_string(),
            name: id.to_string(),
            email: format!("{}@salon.test", id),
            phone: "555-0000".to_string(),
            specialties: specialties.iter().map(|s| s.to_string()).collect(),
            color: "#000000".to_string(),
        }
    }

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let services = vec![
            service("gel", "Manicure"),
            service("spa", "Pedicure"),
            service("french", "Manicure"),
            service("art", "Nail Art"),
        ];

        let groups = group_by_category(services.iter());
        let keys: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(keys, ["Manicure", "Pedicure", "Nail Art"]);

        let manicure: Vec<&str> = groups[0].items.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(manicure, ["gel", "french"]);
    }

    #[test]
    fn test_grouping_empty_input() {
        let groups = group_by_category(Vec::<Service>::new());
        assert!(groups.is_empty());
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::new(
            vec![service("gel", "Manicure")],
            vec![employee("mai", &["Manicure"]), employee("tom", &["Pedicure"])],
        );

        assert_eq!(catalog.service("gel").unwrap().name, "GEL");
        assert!(matches!(
            catalog.service("nope"),
            Err(CoreError::ServiceNotFound(_))
        ));
        assert!(matches!(
            catalog.employee("nope"),
            Err(CoreError::EmployeeNotFound(_))
        ));

        let manicurists: Vec<&str> = catalog
            .employees_with_specialty("manicure")
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(manicurists, ["mai"]);
    }
}
