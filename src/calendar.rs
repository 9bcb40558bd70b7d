//! Fusion des postes planifiés avec le calendrier de travail général.
//!
//! Un jour où l'employé a un poste affecté, ses horaires de calendrier sont
//! remplacés par ceux du poste.

use crate::model::{EmployeeId, OccurrenceId};
use crate::planning::{Planner, ShiftOccurrence};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntervalSource {
    Calendar,
    Shift(OccurrenceId),
}

/// Intervalle de présence UTC `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub source: IntervalSource,
}

impl AttendanceInterval {
    pub fn calendar(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            source: IntervalSource::Calendar,
        }
    }

    fn day(&self) -> NaiveDate {
        self.start.date_naive()
    }
}

/// Remplace les intervalles de calendrier des jours couverts par un poste.
pub fn merge_shift_intervals<'a, I>(
    calendar: Vec<AttendanceInterval>,
    shifts: I,
) -> Vec<AttendanceInterval>
where
    I: IntoIterator<Item = &'a ShiftOccurrence>,
{
    let mut shift_days = BTreeSet::new();
    let mut added = Vec::new();
    for shift in shifts {
        let (Some(start), Some(end)) = (shift.start_time(), shift.end_time()) else {
            continue;
        };
        shift_days.insert(start.date_naive());
        added.push(AttendanceInterval {
            start,
            end,
            source: IntervalSource::Shift(shift.id.clone()),
        });
    }

    let mut out: Vec<AttendanceInterval> = calendar
        .into_iter()
        .filter(|i| !shift_days.contains(&i.day()))
        .chain(added)
        .collect();
    out.sort_by_key(|i| i.start);
    out
}

/// Intervalles de présence d'un employé sur `[from, to]`, postes prioritaires.
pub fn employee_attendance(
    planner: &Planner,
    employee: &EmployeeId,
    from: NaiveDate,
    to: NaiveDate,
    calendar: Vec<AttendanceInterval>,
) -> Vec<AttendanceInterval> {
    let shifts = planner.assigned_shifts_between(std::slice::from_ref(employee), from, to);
    merge_shift_intervals(calendar, shifts.into_iter().map(|(_, l)| l))
}
