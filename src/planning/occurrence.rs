use super::{OccurrenceState, PlanError, PlanningContext, Violation};
use crate::model::{EmployeeId, OccurrenceId, TemplateId};
use crate::template::{build_datetimes, date_for_weekday, weekday_name, ClockTime, ShiftTemplate};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

type Times = Option<(DateTime<Utc>, DateTime<Utc>)>;

/// Occurrence datée d'un poste pour un employé.
///
/// Le template, les timestamps et l'état sont dérivés : ils ne changent qu'à
/// travers `resolve`/`refresh`/`set_template`, qui recalculent dans l'ordre
/// template -> état -> timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftOccurrence {
    pub id: OccurrenceId,
    day_number: u8,
    date: NaiveDate,
    template: Option<TemplateId>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    state: OccurrenceState,
}

impl ShiftOccurrence {
    /// Occurrence vierge (non affectée) pour le jour `day_number` de la semaine
    /// commençant `week_start`.
    pub fn new(week_start: NaiveDate, day_number: u8) -> Result<Self, PlanError> {
        if day_number > 6 {
            return Err(PlanError::InvalidDay(day_number));
        }
        Ok(Self {
            id: OccurrenceId::random(),
            day_number,
            date: date_for_weekday(week_start, day_number),
            template: None,
            start_time: None,
            end_time: None,
            state: OccurrenceState::Unassigned,
        })
    }

    /// Jour de la semaine, 0 = lundi.
    pub fn day_number(&self) -> u8 {
        self.day_number
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn template(&self) -> Option<&TemplateId> {
        self.template.as_ref()
    }

    pub fn state(&self) -> OccurrenceState {
        self.state
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn start_date(&self) -> NaiveDate {
        self.date
    }

    /// "Monday Morning", ou l'état quand il n'y a pas de template.
    pub fn label(&self, ctx: &PlanningContext<'_>) -> String {
        let what = self
            .template
            .as_ref()
            .and_then(|id| ctx.templates.get(id))
            .map(|t| t.name.clone())
            .unwrap_or_else(|| self.state.to_string());
        format!("{} {}", weekday_name(self.day_number), what)
    }

    fn times_for(&self, template: Option<&TemplateId>, ctx: &PlanningContext<'_>) -> Times {
        let prepared = template
            .and_then(|id| ctx.templates.get(id))
            .map(ShiftTemplate::prepare_time);
        let (start, end) = prepared.map_or((ClockTime::MIDNIGHT, ClockTime::MIDNIGHT), |p| {
            (p.start_time, p.end_time)
        });
        let times = build_datetimes(self.date, start, end);
        if times.is_none() {
            tracing::warn!(
                occurrence = %self.id,
                ?start,
                ?end,
                "clock time out of range, occurrence has no timestamps"
            );
        }
        times
    }

    fn probe(
        &self,
        candidate: Option<&TemplateId>,
        employee: &EmployeeId,
        ctx: &PlanningContext<'_>,
    ) -> (OccurrenceState, Times) {
        let times = self.times_for(candidate, ctx);
        let state = ctx
            .resolver
            .resolve(self.date, times, employee, candidate.is_some());
        (state, times)
    }

    /// Recalcule l'occurrence avec `candidate` comme template souhaité.
    ///
    /// Un jour bloqué (férié, congé) perd toujours son template.
    pub fn resolve(
        &mut self,
        candidate: Option<TemplateId>,
        employee: &EmployeeId,
        ctx: &PlanningContext<'_>,
    ) {
        let (state, times) = self.probe(candidate.as_ref(), employee, ctx);
        let times = if state.is_blocked() {
            self.template = None;
            self.times_for(None, ctx)
        } else {
            self.template = candidate;
            times
        };
        self.start_time = times.map(|(s, _)| s);
        self.end_time = times.map(|(_, e)| e);
        self.state = state;
        tracing::debug!(
            occurrence = %self.id,
            date = %self.date,
            state = %self.state,
            "occurrence resolved"
        );
    }

    /// Recalcul après changement de dates ou de données d'absence.
    ///
    /// Une occurrence précédemment bloquée reprend le template de son affectation.
    pub fn refresh(
        &mut self,
        assignment_template: Option<&TemplateId>,
        employee: &EmployeeId,
        ctx: &PlanningContext<'_>,
    ) {
        let candidate = if self.state.is_blocked() {
            assignment_template.cloned()
        } else {
            self.template.clone()
        };
        self.resolve(candidate, employee, ctx);
    }

    /// Déplace l'occurrence dans la semaine commençant `week_start`.
    pub(crate) fn move_to_week(&mut self, week_start: NaiveDate) {
        self.date = date_for_weekday(week_start, self.day_number);
    }

    /// Pose (ou retire) explicitement un template.
    ///
    /// Refusé sur un jour férié ou un congé ; l'occurrence reste alors inchangée.
    pub fn set_template(
        &mut self,
        template: Option<TemplateId>,
        employee: &EmployeeId,
        ctx: &PlanningContext<'_>,
    ) -> Result<(), PlanError> {
        let Some(template) = template else {
            self.unassign(employee, ctx);
            return Ok(());
        };
        if !ctx.templates.contains(&template) {
            return Err(PlanError::UnknownTemplate(template.as_str().to_string()));
        }
        if self.state.is_blocked() {
            return Err(PlanError::ConstraintViolation(Violation::BlockedOccurrence(
                self.state,
            )));
        }
        let (state, _) = self.probe(Some(&template), employee, ctx);
        if state.is_blocked() {
            return Err(PlanError::ConstraintViolation(Violation::BlockedOccurrence(
                state,
            )));
        }
        self.resolve(Some(template), employee, ctx);
        Ok(())
    }

    /// Retire le template ; férié et congé restent prioritaires.
    pub fn unassign(&mut self, employee: &EmployeeId, ctx: &PlanningContext<'_>) {
        self.resolve(None, employee, ctx);
    }
}
