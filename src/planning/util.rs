use super::{ShiftAssignment, ShiftOccurrence, WeeklyPlan};
use crate::model::{AssignmentId, OccurrenceId, PlanId};
use chrono::{Datelike, NaiveDate, Weekday};

/// Lundi et dimanche de la semaine ISO `(year, week)`.
pub(crate) fn iso_week_bounds(year: i32, week: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?;
    let end = NaiveDate::from_isoywd_opt(year, week, Weekday::Sun)?;
    Some((start, end))
}

/// Année et numéro de semaine ISO d'une date.
pub(crate) fn iso_year_week(date: NaiveDate) -> (i32, u32) {
    let iso = date.iso_week();
    (iso.year(), iso.week())
}

pub(super) fn find_plan_index(plans: &[WeeklyPlan], id: &PlanId) -> Option<usize> {
    plans.iter().position(|p| &p.id == id)
}

pub(super) fn find_assignment_index(
    shifts: &[ShiftAssignment],
    id: &AssignmentId,
) -> Option<usize> {
    shifts.iter().position(|s| &s.id == id)
}

pub(super) fn find_line_index(lines: &[ShiftOccurrence], id: &OccurrenceId) -> Option<usize> {
    lines.iter().position(|l| &l.id == id)
}
