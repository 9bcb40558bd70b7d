mod assignment;
mod occurrence;
mod plan;
mod types;
mod util;

pub use assignment::ShiftAssignment;
pub use occurrence::ShiftOccurrence;
pub use plan::{DayHeader, WeeklyPlan};
pub use types::{AssignmentState, OccurrenceState, PlanError, PlanState, Violation};

use crate::availability::AvailabilityResolver;
use crate::config::CompanyConfig;
use crate::model::{AssignmentId, EmployeeId, OccurrenceId, PlanId, TemplateId};
use crate::template::TemplateCatalog;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tout ce dont la résolution a besoin, passé explicitement.
#[derive(Clone, Copy)]
pub struct PlanningContext<'a> {
    pub config: &'a CompanyConfig,
    pub templates: &'a TemplateCatalog,
    pub resolver: AvailabilityResolver<'a>,
}

impl<'a> PlanningContext<'a> {
    pub fn new(
        config: &'a CompanyConfig,
        templates: &'a TemplateCatalog,
        resolver: AvailabilityResolver<'a>,
    ) -> Self {
        Self {
            config,
            templates,
            resolver,
        }
    }
}

/// Ensemble persistant des plannings, dans l'ordre de création.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanBook {
    pub plans: Vec<WeeklyPlan>,
}

/// Planner : encapsule un PlanBook et y fait respecter les contraintes d'unicité.
#[derive(Debug, Default)]
pub struct Planner {
    book: PlanBook,
}

impl Planner {
    pub fn new() -> Self {
        Self {
            book: PlanBook::default(),
        }
    }

    /// Reprend un PlanBook chargé depuis le disque après contrôle d'unicité.
    pub fn from_book(book: PlanBook) -> Result<Self, PlanError> {
        let mut weeks = BTreeSet::new();
        for plan in &book.plans {
            let (year, week) = (plan.year(), plan.week_number());
            if !weeks.insert((year, week)) {
                return Err(PlanError::ConstraintViolation(Violation::DuplicateWeek {
                    year,
                    week,
                }));
            }
            let mut employees = BTreeSet::new();
            for shift in plan.shifts() {
                if !employees.insert(&shift.employee) {
                    return Err(PlanError::ConstraintViolation(
                        Violation::DuplicateAssignment(shift.employee.clone()),
                    ));
                }
            }
        }
        Ok(Self { book })
    }

    pub fn book(&self) -> &PlanBook {
        &self.book
    }

    pub fn into_book(self) -> PlanBook {
        self.book
    }

    pub fn plans(&self) -> &[WeeklyPlan] {
        &self.book.plans
    }

    pub fn plan(&self, id: &PlanId) -> Option<&WeeklyPlan> {
        self.book.plans.iter().find(|p| &p.id == id)
    }

    pub fn find_plan_by_week(&self, year: i32, week: u32) -> Option<&WeeklyPlan> {
        self.book
            .plans
            .iter()
            .find(|p| p.year() == year && p.week_number() == week)
    }

    fn plan_mut(&mut self, id: &PlanId) -> Result<&mut WeeklyPlan, PlanError> {
        let pos = util::find_plan_index(&self.book.plans, id)
            .ok_or_else(|| PlanError::UnknownPlan(id.as_str().to_string()))?;
        Ok(&mut self.book.plans[pos])
    }

    /// Affectation d'un employé dans un planning.
    pub fn assignment_for(
        &self,
        plan: &PlanId,
        employee: &EmployeeId,
    ) -> Result<&ShiftAssignment, PlanError> {
        self.plan(plan)
            .ok_or_else(|| PlanError::UnknownPlan(plan.as_str().to_string()))?
            .shift_for(employee)
            .ok_or_else(|| PlanError::UnknownEmployee(employee.as_str().to_string()))
    }

    /// Occurrence du jour `day_number` (0 = lundi) pour un employé.
    pub fn occurrence_for_day(
        &self,
        plan: &PlanId,
        employee: &EmployeeId,
        day_number: u8,
    ) -> Result<(&ShiftAssignment, &ShiftOccurrence), PlanError> {
        if day_number > 6 {
            return Err(PlanError::InvalidDay(day_number));
        }
        let shift = self.assignment_for(plan, employee)?;
        let line = shift.line_for_day(day_number).ok_or_else(|| {
            PlanError::UnknownOccurrence(format!("{employee} day {day_number}"))
        })?;
        Ok((shift, line))
    }

    fn ensure_week_free(
        &self,
        year: i32,
        week: u32,
        except: Option<&PlanId>,
    ) -> Result<(), PlanError> {
        let taken = self
            .book
            .plans
            .iter()
            .any(|p| Some(&p.id) != except && p.year() == year && p.week_number() == week);
        if taken {
            return Err(PlanError::ConstraintViolation(Violation::DuplicateWeek {
                year,
                week,
            }));
        }
        Ok(())
    }

    pub fn create_plan(&mut self, year: i32, week: u32) -> Result<PlanId, PlanError> {
        self.ensure_week_free(year, week, None)?;
        let plan = WeeklyPlan::new(year, week)?;
        let id = plan.id.clone();
        tracing::info!(plan = %id, year, week, "plan created");
        self.book.plans.push(plan);
        Ok(id)
    }

    /// Semaine ISO qui suit le dernier planning créé.
    pub fn default_next_week(&self) -> Option<(i32, u32)> {
        let last = self.book.plans.last()?;
        let next_day = last.end_date() + Duration::days(1);
        Some(util::iso_year_week(next_day))
    }

    /// Crée le planning suivant ; sans historique, la semaine de `fallback`.
    pub fn create_next_plan(&mut self, fallback: NaiveDate) -> Result<PlanId, PlanError> {
        let (year, week) = self
            .default_next_week()
            .unwrap_or_else(|| util::iso_year_week(fallback));
        self.create_plan(year, week)
    }

    /// Déplace un planning sur la semaine ISO de `date` et recalcule ses occurrences.
    pub fn set_plan_start_date(
        &mut self,
        plan: &PlanId,
        date: NaiveDate,
        ctx: &PlanningContext<'_>,
    ) -> Result<(), PlanError> {
        let (year, week) = util::iso_year_week(date);
        self.ensure_week_free(year, week, Some(plan))?;
        let target = self.plan_mut(plan)?;
        target.set_start_date(date)?;
        let week_start = target.start_date();
        for shift in &mut target.shifts {
            shift.refresh(week_start, ctx);
        }
        Ok(())
    }

    pub fn add_assignment(
        &mut self,
        plan: &PlanId,
        employee: EmployeeId,
        ctx: &PlanningContext<'_>,
    ) -> Result<AssignmentId, PlanError> {
        let target = self.plan_mut(plan)?;
        if target.has_employee(&employee) {
            return Err(PlanError::ConstraintViolation(
                Violation::DuplicateAssignment(employee),
            ));
        }
        let mut shift = ShiftAssignment::new(employee);
        shift.generate_occurrences(target.start_date(), target.end_date(), ctx)?;
        let id = shift.id.clone();
        target.shifts.push(shift);
        Ok(id)
    }

    /// Crée une affectation par employé absent du planning puis passe en `assignment`.
    ///
    /// Les appels répétés n'ajoutent que les employés manquants.
    pub fn generate(
        &mut self,
        plan: &PlanId,
        employees: &[EmployeeId],
        ctx: &PlanningContext<'_>,
    ) -> Result<usize, PlanError> {
        let target = self.plan_mut(plan)?;
        let mut seen = BTreeSet::new();
        let mut created = Vec::new();
        for employee in employees {
            if target.has_employee(employee) || !seen.insert(employee) {
                continue;
            }
            let mut shift = ShiftAssignment::new(employee.clone());
            shift.generate_occurrences(target.start_date(), target.end_date(), ctx)?;
            created.push(shift);
        }
        let count = created.len();
        target.shifts.extend(created);
        target.state = PlanState::Assignment;
        tracing::info!(
            plan = %target.id,
            created = count,
            total = target.shifts_count(),
            "shifts generated"
        );
        Ok(count)
    }

    pub fn set_assignment_template(
        &mut self,
        plan: &PlanId,
        assignment: &AssignmentId,
        template: Option<TemplateId>,
        ctx: &PlanningContext<'_>,
    ) -> Result<(), PlanError> {
        let target = self.plan_mut(plan)?;
        let (start, end) = (target.start_date(), target.end_date());
        let pos = util::find_assignment_index(&target.shifts, assignment)
            .ok_or_else(|| PlanError::UnknownAssignment(assignment.as_str().to_string()))?;
        target.shifts[pos].set_template(template, start, end, ctx)
    }

    pub fn set_occurrence_template(
        &mut self,
        plan: &PlanId,
        assignment: &AssignmentId,
        occurrence: &OccurrenceId,
        template: Option<TemplateId>,
        ctx: &PlanningContext<'_>,
    ) -> Result<(), PlanError> {
        let target = self.plan_mut(plan)?;
        let pos = util::find_assignment_index(&target.shifts, assignment)
            .ok_or_else(|| PlanError::UnknownAssignment(assignment.as_str().to_string()))?;
        target.shifts[pos].set_occurrence_template(occurrence, template, ctx)
    }

    pub fn unassign_shift(
        &mut self,
        plan: &PlanId,
        assignment: &AssignmentId,
        occurrence: &OccurrenceId,
        ctx: &PlanningContext<'_>,
    ) -> Result<(), PlanError> {
        let target = self.plan_mut(plan)?;
        let pos = util::find_assignment_index(&target.shifts, assignment)
            .ok_or_else(|| PlanError::UnknownAssignment(assignment.as_str().to_string()))?;
        target.shifts[pos].unassign_occurrence(occurrence, ctx)
    }

    /// Recalcule toutes les occurrences (après import de congés ou de fériés).
    pub fn refresh_plan(
        &mut self,
        plan: &PlanId,
        ctx: &PlanningContext<'_>,
    ) -> Result<(), PlanError> {
        let target = self.plan_mut(plan)?;
        let week_start = target.start_date();
        for shift in &mut target.shifts {
            shift.refresh(week_start, ctx);
        }
        Ok(())
    }

    pub fn mark_planned(&mut self, plan: &PlanId) -> Result<(), PlanError> {
        let target = self.plan_mut(plan)?;
        if target.state != PlanState::Assignment {
            return Err(PlanError::InvalidStateTransition {
                from: target.state,
                to: PlanState::Planned,
            });
        }
        target.state = PlanState::Planned;
        Ok(())
    }

    /// Occurrences affectées entièrement comprises dans `[from 00:00, to 23:59:59]`.
    pub fn assigned_shifts_between<'s>(
        &'s self,
        employees: &[EmployeeId],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<(&'s EmployeeId, &'s ShiftOccurrence)> {
        let min_time = from.and_time(chrono::NaiveTime::MIN).and_utc();
        let max_time = (to + Duration::days(1))
            .and_time(chrono::NaiveTime::MIN)
            .and_utc();
        let mut out: Vec<(&EmployeeId, &ShiftOccurrence)> = self
            .book
            .plans
            .iter()
            .flat_map(|p| p.shifts.iter())
            .filter(|s| employees.contains(&s.employee))
            .flat_map(|s| s.lines().iter().map(move |l| (&s.employee, l)))
            .filter(|(_, l)| l.state() == OccurrenceState::Assigned)
            .filter(|(_, l)| match (l.start_time(), l.end_time()) {
                (Some(start), Some(end)) => start >= min_time && end < max_time,
                _ => false,
            })
            .collect();
        out.sort_by_key(|(_, l)| l.start_time());
        out
    }

    /// Poste affecté du jour de `now` pour un employé, s'il existe.
    pub fn current_shift(
        &self,
        employee: &EmployeeId,
        now: DateTime<Utc>,
    ) -> Option<&ShiftOccurrence> {
        let today = now.date_naive();
        self.assigned_shifts_between(std::slice::from_ref(employee), today, today)
            .into_iter()
            .map(|(_, l)| l)
            .next()
    }
}
