use super::{util, PlanError, PlanState, ShiftAssignment};
use crate::config::CompanyConfig;
use crate::model::{AssignmentId, EmployeeId, PlanId};
use crate::template::{weekday_name, DaySpan};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// En-tête d'un jour travaillé de la semaine (vue par jour).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayHeader {
    pub weekday: u8,
    pub name: &'static str,
    pub day: u32,
}

/// Planning d'une semaine ISO : racine d'agrégat des affectations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyPlan {
    pub id: PlanId,
    year: i32,
    week_number: u32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    pub state: PlanState,
    #[serde(default)]
    pub(super) shifts: Vec<ShiftAssignment>,
}

impl WeeklyPlan {
    pub fn new(year: i32, week_number: u32) -> Result<Self, PlanError> {
        let mut plan = Self {
            id: PlanId::random(),
            year,
            week_number,
            start_date: NaiveDate::MIN,
            end_date: NaiveDate::MIN,
            state: PlanState::New,
            shifts: Vec::new(),
        };
        plan.compute_dates()?;
        Ok(plan)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week_number(&self) -> u32 {
        self.week_number
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Lundi / dimanche de la semaine ISO `(year, week_number)`.
    pub fn compute_dates(&mut self) -> Result<(), PlanError> {
        let (start, end) =
            util::iso_week_bounds(self.year, self.week_number).ok_or(PlanError::InvalidWeek {
                year: self.year,
                week: self.week_number,
            })?;
        self.start_date = start;
        self.end_date = end;
        Ok(())
    }

    /// Inverse de `compute_dates` : la date est ramenée au lundi de sa semaine ISO.
    ///
    /// Les occurrences ne sont pas recalculées ici (voir `Planner::set_plan_start_date`).
    pub fn set_start_date(&mut self, date: NaiveDate) -> Result<(), PlanError> {
        let (year, week) = util::iso_year_week(date);
        self.year = year;
        self.week_number = week;
        self.compute_dates()
    }

    pub fn shifts(&self) -> &[ShiftAssignment] {
        &self.shifts
    }

    pub fn shift(&self, id: &AssignmentId) -> Option<&ShiftAssignment> {
        self.shifts.iter().find(|s| &s.id == id)
    }

    pub fn shift_for(&self, employee: &EmployeeId) -> Option<&ShiftAssignment> {
        self.shifts.iter().find(|s| &s.employee == employee)
    }

    pub fn has_employee(&self, employee: &EmployeeId) -> bool {
        self.shift_for(employee).is_some()
    }

    pub fn shifts_count(&self) -> usize {
        self.shifts.len()
    }

    /// Affectations avec au moins un jour en congé.
    pub fn issued_shifts(&self) -> Vec<&ShiftAssignment> {
        self.shifts.iter().filter(|s| s.has_issue()).collect()
    }

    pub fn issued_shift_ids(&self) -> Vec<AssignmentId> {
        self.issued_shifts().into_iter().map(|s| s.id.clone()).collect()
    }

    pub fn issued_shifts_count(&self) -> usize {
        self.shifts.iter().filter(|s| s.has_issue()).count()
    }

    pub fn occurrences_count(&self) -> usize {
        self.shifts.iter().map(|s| s.lines().len()).sum()
    }

    pub fn display_name(&self) -> String {
        format!(
            "{} Week {} ({} - {})",
            self.year, self.week_number, self.start_date, self.end_date
        )
    }

    /// Jours de la semaine couverts par l'empan par défaut de l'entreprise.
    pub fn day_headers(&self, config: &CompanyConfig) -> Vec<DayHeader> {
        DaySpan::from_config(config)
            .explode(self.start_date, self.end_date)
            .map(|d| DayHeader {
                weekday: d.weekday,
                name: weekday_name(d.weekday),
                day: d.date.day(),
            })
            .collect()
    }
}
