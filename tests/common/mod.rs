#![allow(dead_code)]
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use roulement::{
    CompanyConfig, Directory, Employee, Leave, PublicHoliday, ResourceId, ShiftTemplate,
    TemplateCatalog,
};

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn morning() -> ShiftTemplate {
    ShiftTemplate::new("Morning", 9.5, 17.25).with_id("morning")
}

pub fn weekend() -> ShiftTemplate {
    ShiftTemplate::new("Weekend", 8.0, 20.0)
        .with_id("weekend")
        .with_days(5, 6)
}

pub fn catalog() -> TemplateCatalog {
    [morning(), weekend()].into_iter().collect()
}

/// Semaine 10 de 2024 : férié le mercredi 6, bob en congé le jeudi 7.
pub fn directory() -> Directory {
    let mut dir = Directory::new();
    dir.add_employees(vec![
        Employee::new("alice", "Alice").with_country("FR"),
        Employee::new("bob", "Bob").with_country("FR"),
    ]);
    dir.add_holidays(vec![PublicHoliday::new(day(2024, 3, 6), "Fête locale")]);
    dir.add_leaves(vec![Leave::new(
        ResourceId::new("bob"),
        at(2024, 3, 7, 0, 0),
        at(2024, 3, 8, 0, 0),
    )
    .unwrap()]);
    dir
}

pub fn config() -> CompanyConfig {
    CompanyConfig::default()
}
