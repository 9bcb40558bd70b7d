use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! strong_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new<S: AsRef<str>>(s: S) -> Self {
                Self(s.as_ref().to_owned())
            }
            pub fn random() -> Self {
                Self(Uuid::new_v4().to_string())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

strong_id!(
    /// Identifiant fort pour Employee
    EmployeeId
);
strong_id!(
    /// Identité « calendrier » d'un employé, clé de jointure des congés
    ResourceId
);
strong_id!(
    /// Identifiant fort pour ShiftTemplate
    TemplateId
);
strong_id!(
    /// Identifiant fort pour WeeklyPlan
    PlanId
);
strong_id!(
    /// Identifiant fort pour ShiftAssignment
    AssignmentId
);
strong_id!(
    /// Identifiant fort pour ShiftOccurrence
    OccurrenceId
);

/// Employé planifiable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub handle: String,
    pub display_name: String,
    pub resource: ResourceId,
    /// Pays (ou région) utilisé pour filtrer les jours fériés.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Employee {
    /// Crée un employé dont l'id et la ressource dérivent du handle
    /// (stables d'un import à l'autre).
    pub fn new<H: Into<String>, D: Into<String>>(handle: H, display_name: D) -> Self {
        let handle = handle.into();
        Self {
            id: EmployeeId::new(&handle),
            resource: ResourceId::new(&handle),
            display_name: display_name.into(),
            country: None,
            handle,
        }
    }

    pub fn with_country<C: Into<String>>(mut self, country: C) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// Absence posée sur une ressource (intervalle UTC [date_from, date_to]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leave {
    pub resource: ResourceId,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Leave {
    pub fn new(
        resource: ResourceId,
        date_from: DateTime<Utc>,
        date_to: DateTime<Utc>,
    ) -> Result<Self, String> {
        if date_to <= date_from {
            return Err("leave end must be after start".to_string());
        }
        Ok(Self {
            resource,
            date_from,
            date_to,
            reason: None,
        })
    }

    /// Vrai si l'absence contient entièrement `[start, end]`.
    pub fn covers(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.date_from <= start && self.date_to >= end
    }
}

/// Jour férié. Sans pays, il s'applique à tout le monde.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicHoliday {
    pub date: NaiveDate,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl PublicHoliday {
    pub fn new<N: Into<String>>(date: NaiveDate, name: N) -> Self {
        Self {
            date,
            name: name.into(),
            country: None,
        }
    }

    pub fn applies_to(&self, employee: &Employee) -> bool {
        match (&self.country, &employee.country) {
            (None, _) => true,
            (Some(c), Some(e)) => c.eq_ignore_ascii_case(e),
            (Some(_), None) => false,
        }
    }
}
