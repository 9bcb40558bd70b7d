use super::{util, AssignmentState, OccurrenceState, PlanError, PlanningContext, ShiftOccurrence};
use crate::model::{AssignmentId, EmployeeId, OccurrenceId, TemplateId};
use crate::template::DaySpan;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Semaine d'un employé dans un planning : un template et ses occurrences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub id: AssignmentId,
    pub employee: EmployeeId,
    template: Option<TemplateId>,
    lines: Vec<ShiftOccurrence>,
}

impl ShiftAssignment {
    pub fn new(employee: EmployeeId) -> Self {
        Self {
            id: AssignmentId::random(),
            employee,
            template: None,
            lines: Vec::new(),
        }
    }

    pub fn template(&self) -> Option<&TemplateId> {
        self.template.as_ref()
    }

    pub fn lines(&self) -> &[ShiftOccurrence] {
        &self.lines
    }

    pub fn line(&self, id: &OccurrenceId) -> Option<&ShiftOccurrence> {
        self.lines.iter().find(|l| &l.id == id)
    }

    pub fn line_for_day(&self, day_number: u8) -> Option<&ShiftOccurrence> {
        self.lines.iter().find(|l| l.day_number() == day_number)
    }

    /// Disponible si tout est affecté, indisponible si rien ne l'est.
    pub fn state(&self) -> AssignmentState {
        let assigned = self
            .lines
            .iter()
            .filter(|l| l.state() == OccurrenceState::Assigned)
            .count();
        if assigned == 0 {
            AssignmentState::Unavailable
        } else if assigned == self.lines.len() {
            AssignmentState::Available
        } else {
            AssignmentState::Partial
        }
    }

    /// Au moins un jour en congé : l'employé doit être remplacé.
    pub fn has_issue(&self) -> bool {
        self.lines
            .iter()
            .any(|l| l.state() == OccurrenceState::OnLeave)
    }

    /// Reconstruit toutes les occurrences de la semaine.
    ///
    /// Les anciennes lignes ne sont remplacées qu'une fois le nouveau lot complet.
    pub fn generate_occurrences(
        &mut self,
        week_start: NaiveDate,
        week_end: NaiveDate,
        ctx: &PlanningContext<'_>,
    ) -> Result<usize, PlanError> {
        let template = match &self.template {
            Some(id) => Some(
                ctx.templates
                    .get(id)
                    .ok_or_else(|| PlanError::UnknownTemplate(id.as_str().to_string()))?,
            ),
            None => None,
        };
        let span = DaySpan::resolve(template, ctx.config);
        if span.is_empty() {
            tracing::debug!(
                employee = %self.employee,
                start = span.start,
                end = span.end,
                "day span start after end, no occurrence generated"
            );
        }

        let mut lines = Vec::new();
        for day in span.explode(week_start, week_end) {
            let mut line = ShiftOccurrence::new(week_start, day.weekday)?;
            line.resolve(self.template.clone(), &self.employee, ctx);
            lines.push(line);
        }
        self.lines = lines;
        Ok(self.lines.len())
    }

    /// Change le template : toutes les lignes sont supprimées puis régénérées.
    pub fn set_template(
        &mut self,
        template: Option<TemplateId>,
        week_start: NaiveDate,
        week_end: NaiveDate,
        ctx: &PlanningContext<'_>,
    ) -> Result<(), PlanError> {
        if let Some(id) = &template {
            if !ctx.templates.contains(id) {
                return Err(PlanError::UnknownTemplate(id.as_str().to_string()));
            }
        }
        let previous = std::mem::replace(&mut self.template, template);
        if let Err(err) = self.generate_occurrences(week_start, week_end, ctx) {
            self.template = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Recalcule chaque ligne (nouvelles dates ou nouvelles absences).
    pub fn refresh(&mut self, week_start: NaiveDate, ctx: &PlanningContext<'_>) {
        for line in &mut self.lines {
            line.move_to_week(week_start);
            line.refresh(self.template.as_ref(), &self.employee, ctx);
        }
    }

    pub fn set_occurrence_template(
        &mut self,
        occurrence: &OccurrenceId,
        template: Option<TemplateId>,
        ctx: &PlanningContext<'_>,
    ) -> Result<(), PlanError> {
        let pos = util::find_line_index(&self.lines, occurrence)
            .ok_or_else(|| PlanError::UnknownOccurrence(occurrence.as_str().to_string()))?;
        self.lines[pos].set_template(template, &self.employee, ctx)
    }

    pub fn unassign_occurrence(
        &mut self,
        occurrence: &OccurrenceId,
        ctx: &PlanningContext<'_>,
    ) -> Result<(), PlanError> {
        let pos = util::find_line_index(&self.lines, occurrence)
            .ok_or_else(|| PlanError::UnknownOccurrence(occurrence.as_str().to_string()))?;
        self.lines[pos].unassign(&self.employee, ctx);
        Ok(())
    }
}
