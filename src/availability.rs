//! Résolution de disponibilité d'un employé pour une occurrence de poste.
//!
//! Les données (jours fériés, congés, ressources) viennent de collaborateurs
//! injectés ; le résolveur ne fait que des lectures.

use crate::model::{EmployeeId, Leave, ResourceId};
use crate::planning::OccurrenceState;
use chrono::{DateTime, NaiveDate, Utc};

/// Calendrier des jours fériés.
pub trait HolidayCalendar {
    fn is_holiday(&self, date: NaiveDate, employee: &EmployeeId) -> bool;
}

/// Recherche des congés couvrant entièrement un intervalle.
pub trait LeaveLookup {
    fn leaves_covering(
        &self,
        resource: &ResourceId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Leave>;
}

/// Associe un employé à sa ressource de calendrier.
pub trait ResourceRegistry {
    fn resource_of(&self, employee: &EmployeeId) -> Option<ResourceId>;
}

#[derive(Clone, Copy)]
pub struct AvailabilityResolver<'a> {
    holidays: &'a dyn HolidayCalendar,
    leaves: &'a dyn LeaveLookup,
    registry: &'a dyn ResourceRegistry,
}

impl<'a> AvailabilityResolver<'a> {
    pub fn new(
        holidays: &'a dyn HolidayCalendar,
        leaves: &'a dyn LeaveLookup,
        registry: &'a dyn ResourceRegistry,
    ) -> Self {
        Self {
            holidays,
            leaves,
            registry,
        }
    }

    /// Raccourci quand une même source implémente les trois collaborateurs.
    pub fn from_source<S>(source: &'a S) -> Self
    where
        S: HolidayCalendar + LeaveLookup + ResourceRegistry,
    {
        Self::new(source, source, source)
    }

    pub fn is_public_holiday(&self, date: NaiveDate, employee: &EmployeeId) -> bool {
        self.holidays.is_holiday(date, employee)
    }

    /// Faux si l'employé n'a pas de ressource.
    pub fn is_on_leave(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        employee: &EmployeeId,
    ) -> bool {
        let Some(resource) = self.registry.resource_of(employee) else {
            return false;
        };
        !self.leaves.leaves_covering(&resource, start, end).is_empty()
    }

    /// Priorité : férié, puis congé, puis présence d'un template.
    pub fn resolve(
        &self,
        date: NaiveDate,
        times: Option<(DateTime<Utc>, DateTime<Utc>)>,
        employee: &EmployeeId,
        has_template: bool,
    ) -> OccurrenceState {
        if self.is_public_holiday(date, employee) {
            return OccurrenceState::Holiday;
        }
        if let Some((start, end)) = times {
            if self.is_on_leave(start, end, employee) {
                return OccurrenceState::OnLeave;
            }
        }
        if has_template {
            OccurrenceState::Assigned
        } else {
            OccurrenceState::Unassigned
        }
    }
}
