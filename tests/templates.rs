#![forbid(unsafe_code)]
mod common;

use chrono::Datelike;
use common::{catalog, day, morning, weekend};
use roulement::{date_for_weekday, ClockTime, CompanyConfig, ShiftTemplate, TemplateStore};
use tempfile::tempdir;

#[test]
fn prepare_time_splits_fractional_hours() {
    let prepared = morning().prepare_time();
    assert_eq!(prepared.start_time, ClockTime { hour: 9, minute: 30 });
    assert_eq!(prepared.end_time, ClockTime { hour: 17, minute: 15 });
}

#[test]
fn prepare_time_ignores_sign() {
    let prepared = ShiftTemplate::new("odd", -6.75, 0.0).prepare_time();
    assert_eq!(prepared.start_time, ClockTime { hour: 6, minute: 45 });
    assert_eq!(prepared.end_time, ClockTime::MIDNIGHT);
}

#[test]
fn clock_time_past_midnight_has_no_naive_time() {
    assert!(ClockTime::from_float_hours(24.0).to_naive_time().is_none());
    assert!(ClockTime::from_float_hours(23.99).to_naive_time().is_some());
}

#[test]
fn full_week_with_default_bounds_gives_monday_to_friday() {
    let config = CompanyConfig::default();
    let days: Vec<_> = morning()
        .explode_date_range(day(2024, 3, 4), day(2024, 3, 10), &config)
        .collect();
    assert_eq!(days.len(), 5);
    assert_eq!(
        days.iter().map(|d| d.weekday).collect::<Vec<_>>(),
        vec![0, 1, 2, 3, 4]
    );
    assert_eq!(days[0].date, day(2024, 3, 4));
    assert_eq!(days[4].date, day(2024, 3, 8));
}

#[test]
fn template_bounds_override_company_defaults() {
    let config = CompanyConfig::default();
    let days: Vec<_> = weekend()
        .explode_date_range(day(2024, 3, 4), day(2024, 3, 10), &config)
        .map(|d| d.date)
        .collect();
    assert_eq!(days, vec![day(2024, 3, 9), day(2024, 3, 10)]);
}

#[test]
fn reversed_span_yields_nothing() {
    let config = CompanyConfig::default();
    let friday_to_monday = ShiftTemplate::new("wrap", 8.0, 16.0).with_days(4, 0);
    let days = friday_to_monday.explode_date_range(day(2024, 3, 1), day(2024, 3, 31), &config);
    assert_eq!(days.count(), 0);
}

#[test]
fn exploded_range_stays_inside_bounds_and_restarts() {
    let config = CompanyConfig::new(1, 3).unwrap();
    let start = day(2024, 2, 27);
    let end = day(2024, 3, 13);
    let range = ShiftTemplate::new("mid", 8.0, 12.0).explode_date_range(start, end, &config);

    let first: Vec<_> = range.clone().collect();
    let second: Vec<_> = range.collect();
    assert_eq!(first, second);
    assert!(!first.is_empty());
    for d in &first {
        assert!(d.date >= start && d.date <= end);
        assert!((1..=3).contains(&d.weekday));
        assert_eq!(u32::from(d.weekday), d.date.weekday().num_days_from_monday());
    }
    assert!(first.windows(2).all(|w| w[0].date < w[1].date));
}

#[test]
fn date_for_weekday_moves_forward_within_a_week() {
    let mut date = day(2024, 2, 26);
    for _ in 0..14 {
        for weekday in 0..7u8 {
            let found = date_for_weekday(date, weekday);
            assert!(found >= date);
            assert!((found - date).num_days() <= 6);
            assert_eq!(found.weekday().num_days_from_monday(), u32::from(weekday));
        }
        date = date.succ_opt().unwrap();
    }
}

#[test]
fn catalog_finds_templates_by_id() {
    let catalog = catalog();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get(&morning().id).map(|t| t.name.as_str()), Some("Morning"));
}

#[test]
fn save_and_load_template_roundtrip() {
    let dir = tempdir().unwrap();
    let store = TemplateStore::new(dir.path());
    let template = weekend();
    store.save(&template).unwrap();

    let loaded = store.load(template.id.as_str()).unwrap();
    assert_eq!(loaded, template);

    store.save(&morning()).unwrap();
    let listed: Vec<_> = store
        .list()
        .unwrap()
        .into_iter()
        .map(|i| i.template.id.as_str().to_string())
        .collect();
    assert_eq!(listed, vec!["morning", "weekend"]);
    assert_eq!(store.catalog().unwrap().len(), 2);
}

#[test]
fn store_rejects_out_of_range_days() {
    let dir = tempdir().unwrap();
    let store = TemplateStore::new(dir.path());
    let bad = ShiftTemplate::new("bad", 8.0, 16.0).with_days(0, 9);
    assert!(store.save(&bad).is_err());
}

#[test]
fn company_config_loads_with_defaults_and_validates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("company.json");

    std::fs::write(&path, r#"{"shift_end_day": 5}"#).unwrap();
    let config = CompanyConfig::load(&path).unwrap();
    assert_eq!(config, CompanyConfig::new(0, 5).unwrap());

    std::fs::write(&path, r#"{"shift_start_day": 7}"#).unwrap();
    assert!(CompanyConfig::load(&path).is_err());
}
