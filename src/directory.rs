use crate::availability::{HolidayCalendar, LeaveLookup, ResourceRegistry};
use crate::model::{Employee, EmployeeId, Leave, PublicHoliday, ResourceId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Annuaire en mémoire : employés, congés et jours fériés.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Directory {
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub leaves: Vec<Leave>,
    #[serde(default)]
    pub holidays: Vec<PublicHoliday>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_employees(&mut self, employees: Vec<Employee>) {
        self.employees.extend(employees);
    }

    pub fn add_leaves(&mut self, leaves: Vec<Leave>) {
        self.leaves.extend(leaves);
    }

    pub fn add_holidays(&mut self, holidays: Vec<PublicHoliday>) {
        self.holidays.extend(holidays);
    }

    pub fn find_employee(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| &e.id == id)
    }

    pub fn find_employee_by_handle<'a>(&'a self, handle: &str) -> Option<&'a Employee> {
        self.employees.iter().find(|e| e.handle == handle)
    }

    pub fn employee_ids(&self) -> Vec<EmployeeId> {
        self.employees.iter().map(|e| e.id.clone()).collect()
    }
}

impl HolidayCalendar for Directory {
    fn is_holiday(&self, date: NaiveDate, employee: &EmployeeId) -> bool {
        let Some(employee) = self.find_employee(employee) else {
            return false;
        };
        self.holidays
            .iter()
            .any(|h| h.date == date && h.applies_to(employee))
    }
}

impl LeaveLookup for Directory {
    fn leaves_covering(
        &self,
        resource: &ResourceId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Leave> {
        self.leaves
            .iter()
            .filter(|l| &l.resource == resource && l.covers(start, end))
            .cloned()
            .collect()
    }
}

impl ResourceRegistry for Directory {
    fn resource_of(&self, employee: &EmployeeId) -> Option<ResourceId> {
        self.find_employee(employee).map(|e| e.resource.clone())
    }
}
