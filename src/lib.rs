#![forbid(unsafe_code)]
//! Roulement — planification hebdomadaire de postes et résolution de disponibilité.
//!
//! - Templates récurrents (empan de jours + plage horaire) dépliés sur une semaine ISO.
//! - Chaque occurrence est classée : affectée, non affectée, férié, congé.
//! - Jours fériés, congés et ressources fournis par des collaborateurs injectés.
//! - Tout en UTC ; stockage fichiers (JSON/CSV) en dehors du cœur.

pub mod availability;
pub mod calendar;
pub mod config;
pub mod directory;
pub mod io;
pub mod model;
pub mod planning;
pub mod storage;
pub mod template;

pub use availability::{AvailabilityResolver, HolidayCalendar, LeaveLookup, ResourceRegistry};
pub use calendar::{employee_attendance, merge_shift_intervals, AttendanceInterval, IntervalSource};
pub use config::CompanyConfig;
pub use directory::Directory;
pub use model::{
    AssignmentId, Employee, EmployeeId, Leave, OccurrenceId, PlanId, PublicHoliday, ResourceId,
    TemplateId,
};
pub use planning::{
    AssignmentState, OccurrenceState, PlanBook, PlanError, PlanState, Planner, PlanningContext,
    ShiftAssignment, ShiftOccurrence, Violation, WeeklyPlan,
};
pub use storage::{JsonStorage, Storage};
pub use template::{
    date_for_weekday, ClockTime, DaySpan, ExplodedRange, PreparedTime, ShiftTemplate,
    TemplateCatalog, TemplateInfo, TemplateStore, WeekDay,
};
