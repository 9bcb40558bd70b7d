use crate::model::EmployeeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanState {
    #[default]
    New,
    Assignment,
    Planned,
}

/// État agrégé d'une affectation hebdomadaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentState {
    Available,
    Partial,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceState {
    Assigned,
    OnLeave,
    #[default]
    Unassigned,
    Holiday,
}

impl OccurrenceState {
    /// Férié ou congé : l'occurrence ne peut pas porter de template.
    pub fn is_blocked(self) -> bool {
        matches!(self, OccurrenceState::Holiday | OccurrenceState::OnLeave)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OccurrenceState::Assigned => "assigned",
            OccurrenceState::OnLeave => "on_leave",
            OccurrenceState::Unassigned => "unassigned",
            OccurrenceState::Holiday => "holiday",
        }
    }
}

impl fmt::Display for OccurrenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PlanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlanState::New => "new",
            PlanState::Assignment => "assignment",
            PlanState::Planned => "planned",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Template posé sur un jour férié ou un congé.
    BlockedOccurrence(OccurrenceState),
    DuplicateWeek { year: i32, week: u32 },
    DuplicateAssignment(EmployeeId),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::BlockedOccurrence(OccurrenceState::Holiday) => f.write_str(
                "this is a public holiday and the employee isn't available for this shift",
            ),
            Violation::BlockedOccurrence(_) => {
                f.write_str("this employee is on leave so can't be assigned to this shift")
            }
            Violation::DuplicateWeek { year, week } => {
                write!(f, "you can't plan the same week twice ({year} week {week})")
            }
            Violation::DuplicateAssignment(employee) => write!(
                f,
                "you can't assign an employee twice to the same plan ({employee})"
            ),
        }
    }
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("constraint violation: {0}")]
    ConstraintViolation(Violation),
    #[error("invalid ISO week: {year} week {week}")]
    InvalidWeek { year: i32, week: u32 },
    #[error("invalid day number: {0} (expected 0..=6)")]
    InvalidDay(u8),
    #[error("invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: PlanState, to: PlanState },
    #[error("unknown plan: {0}")]
    UnknownPlan(String),
    #[error("unknown assignment: {0}")]
    UnknownAssignment(String),
    #[error("unknown occurrence: {0}")]
    UnknownOccurrence(String),
    #[error("unknown template: {0}")]
    UnknownTemplate(String),
    #[error("unknown employee: {0}")]
    UnknownEmployee(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlanError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, PlanError::ConstraintViolation(_))
    }
}
