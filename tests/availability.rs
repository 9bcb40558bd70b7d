#![forbid(unsafe_code)]
mod common;

use common::{at, day, directory};
use roulement::{
    AvailabilityResolver, Employee, EmployeeId, OccurrenceState, PublicHoliday, ResourceId,
    ResourceRegistry,
};

struct NoResources;

impl ResourceRegistry for NoResources {
    fn resource_of(&self, _employee: &EmployeeId) -> Option<ResourceId> {
        None
    }
}

#[test]
fn public_holiday_applies_to_matching_country() {
    let mut dir = directory();
    dir.add_employees(vec![Employee::new("carla", "Carla").with_country("ES")]);
    let mut regional = PublicHoliday::new(day(2024, 3, 19), "San José");
    regional.country = Some("es".into());
    dir.add_holidays(vec![regional]);

    let resolver = AvailabilityResolver::from_source(&dir);
    let alice = EmployeeId::new("alice");
    let carla = EmployeeId::new("carla");

    assert!(resolver.is_public_holiday(day(2024, 3, 6), &alice));
    assert!(resolver.is_public_holiday(day(2024, 3, 6), &carla));
    assert!(resolver.is_public_holiday(day(2024, 3, 19), &carla));
    assert!(!resolver.is_public_holiday(day(2024, 3, 19), &alice));
    assert!(!resolver.is_public_holiday(day(2024, 3, 6), &EmployeeId::new("ghost")));
}

#[test]
fn leave_must_contain_the_whole_window() {
    let dir = directory();
    let resolver = AvailabilityResolver::from_source(&dir);
    let bob = EmployeeId::new("bob");

    assert!(resolver.is_on_leave(at(2024, 3, 7, 9, 30), at(2024, 3, 7, 17, 15), &bob));
    assert!(resolver.is_on_leave(at(2024, 3, 7, 0, 0), at(2024, 3, 8, 0, 0), &bob));
    assert!(!resolver.is_on_leave(at(2024, 3, 7, 20, 0), at(2024, 3, 8, 4, 0), &bob));
    assert!(!resolver.is_on_leave(
        at(2024, 3, 7, 9, 30),
        at(2024, 3, 7, 17, 15),
        &EmployeeId::new("alice")
    ));
}

#[test]
fn no_resource_means_never_on_leave() {
    let dir = directory();
    let registry = NoResources;
    let resolver = AvailabilityResolver::new(&dir, &dir, &registry);
    let bob = EmployeeId::new("bob");
    assert!(!resolver.is_on_leave(at(2024, 3, 7, 9, 30), at(2024, 3, 7, 17, 15), &bob));
}

#[test]
fn holiday_wins_over_leave_and_template() {
    let mut dir = directory();
    dir.add_holidays(vec![PublicHoliday::new(day(2024, 3, 7), "Pont")]);
    let resolver = AvailabilityResolver::from_source(&dir);
    let bob = EmployeeId::new("bob");
    let window = Some((at(2024, 3, 7, 9, 30), at(2024, 3, 7, 17, 15)));

    assert_eq!(
        resolver.resolve(day(2024, 3, 7), window, &bob, true),
        OccurrenceState::Holiday
    );
}

#[test]
fn resolve_follows_precedence() {
    let dir = directory();
    let resolver = AvailabilityResolver::from_source(&dir);
    let bob = EmployeeId::new("bob");
    let thursday = Some((at(2024, 3, 7, 9, 30), at(2024, 3, 7, 17, 15)));
    let friday = Some((at(2024, 3, 8, 9, 30), at(2024, 3, 8, 17, 15)));

    assert_eq!(
        resolver.resolve(day(2024, 3, 7), thursday, &bob, true),
        OccurrenceState::OnLeave
    );
    assert_eq!(
        resolver.resolve(day(2024, 3, 8), friday, &bob, true),
        OccurrenceState::Assigned
    );
    assert_eq!(
        resolver.resolve(day(2024, 3, 8), friday, &bob, false),
        OccurrenceState::Unassigned
    );
    // sans timestamps, pas de test de congé
    assert_eq!(
        resolver.resolve(day(2024, 3, 7), None, &bob, false),
        OccurrenceState::Unassigned
    );
}
