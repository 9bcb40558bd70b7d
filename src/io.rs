use crate::model::{Employee, Leave, PublicHoliday, ResourceId};
use crate::planning::WeeklyPlan;
use crate::template::weekday_name;
use anyhow::{bail, Context};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import d'employés depuis CSV: header `handle,display_name[,country]`
pub fn import_employees_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Employee>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let handle = rec.get(0).context("missing handle")?.trim();
        let display = rec.get(1).context("missing display_name")?.trim();
        if handle.is_empty() || display.is_empty() {
            bail!("invalid employee row (empty)");
        }
        let mut employee = Employee::new(handle, display);
        if let Some(country) = rec.get(2).map(str::trim).filter(|c| !c.is_empty()) {
            employee = employee.with_country(country);
        }
        out.push(employee);
    }
    Ok(out)
}

/// Import de congés: header `handle,from,to[,reason]` (RFC3339 ou `YYYY-MM-DD`)
///
/// Une date de fin seule est inclusive : le congé court jusqu'au minuit suivant.
pub fn import_leaves_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Leave>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let handle = rec.get(0).context("missing handle")?.trim();
        if handle.is_empty() {
            bail!("invalid leave row (empty handle)");
        }
        let (from, _) = parse_point(rec.get(1).context("missing from")?.trim())?;
        let (mut to, to_was_date) = parse_point(rec.get(2).context("missing to")?.trim())?;
        if to_was_date {
            to += Duration::days(1);
        }
        let mut leave = Leave::new(ResourceId::new(handle), from, to)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid leave for handle {handle}"))?;
        leave.reason = rec
            .get(3)
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        out.push(leave);
    }
    Ok(out)
}

/// Import de jours fériés: header `date,name[,country]`
pub fn import_holidays_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<PublicHoliday>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let raw = rec.get(0).context("missing date")?.trim();
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("invalid holiday date: {raw}"))?;
        let name = rec.get(1).context("missing name")?.trim();
        let mut holiday = PublicHoliday::new(date, name);
        holiday.country = rec
            .get(2)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        out.push(holiday);
    }
    Ok(out)
}

fn parse_point(raw: &str) -> anyhow::Result<(DateTime<Utc>, bool)> {
    if let Ok(dt) = raw.parse::<DateTime<Utc>>() {
        return Ok((dt, false));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date/datetime: {raw}"))?;
    let datetime = date
        .and_hms_opt(0, 0, 0)
        .context("invalid midnight conversion")?;
    Ok((datetime.and_utc(), true))
}

/// Export JSON d'un planning (jolie mise en forme)
pub fn export_plan_json<P: AsRef<Path>>(path: P, plan: &WeeklyPlan) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(plan)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des occurrences: header `plan,employee,day,date,template,start,end,state`
pub fn export_occurrences_csv<P: AsRef<Path>>(path: P, plan: &WeeklyPlan) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "plan", "employee", "day", "date", "template", "start", "end", "state",
    ])?;
    let plan_name = plan.display_name();
    for shift in plan.shifts() {
        for line in shift.lines() {
            let date = line.date().to_string();
            let start = line.start_time().map(|t| t.to_rfc3339()).unwrap_or_default();
            let end = line.end_time().map(|t| t.to_rfc3339()).unwrap_or_default();
            w.write_record([
                plan_name.as_str(),
                shift.employee.as_str(),
                weekday_name(line.day_number()),
                date.as_str(),
                line.template().map(|t| t.as_str()).unwrap_or(""),
                start.as_str(),
                end.as_str(),
                line.state().as_str(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}
