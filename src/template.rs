use crate::config::CompanyConfig;
use crate::model::TemplateId;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const WEEK_DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Nom anglais du jour (0 = lundi).
pub fn weekday_name(day: u8) -> &'static str {
    WEEK_DAYS.get(usize::from(day)).copied().unwrap_or("?")
}

/// Numéro du jour de la semaine (0 = lundi).
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

/// Date de la même semaine que `date_start` portant le jour `weekday`.
///
/// Ne recule jamais : le résultat est dans `[date_start, date_start + 6]`.
pub fn date_for_weekday(date_start: NaiveDate, weekday: u8) -> NaiveDate {
    let delta = (i64::from(weekday) - i64::from(weekday_index(date_start)) + 7).rem_euclid(7);
    date_start + Duration::days(delta)
}

/// Heure d'horloge entière issue d'une heure fractionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime { hour: 0, minute: 0 };

    /// 9.5 -> 09:30. Le signe est ignoré ; plage attendue [0, 24).
    pub fn from_float_hours(value: f64) -> Self {
        let total = value.abs() * 60.0;
        let hour = (total / 60.0).floor();
        let minute = total.rem_euclid(60.0);
        Self {
            hour: hour as u32,
            minute: minute as u32,
        }
    }

    /// `None` quand l'heure n'existe pas (24h et au-delà).
    pub fn to_naive_time(self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreparedTime {
    pub start_time: ClockTime,
    pub end_time: ClockTime,
}

/// Combine une date et deux heures d'horloge en timestamps UTC.
///
/// Les deux bornes portent toujours la date de l'occurrence, y compris quand
/// la fin est antérieure au début.
pub fn build_datetimes(
    date: NaiveDate,
    start: ClockTime,
    end: ClockTime,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start_dt = date.and_time(start.to_naive_time()?).and_utc();
    let end_dt = date.and_time(end.to_naive_time()?).and_utc();
    Some((start_dt, end_dt))
}

/// Modèle de poste hebdomadaire récurrent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftTemplate {
    pub id: TemplateId,
    pub name: String,
    #[serde(default)]
    pub day_of_week_start: Option<u8>,
    #[serde(default)]
    pub day_of_week_end: Option<u8>,
    /// Heures fractionnaires (9.5 = 09:30).
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default)]
    pub color: u32,
}

impl ShiftTemplate {
    pub fn new<S: Into<String>>(name: S, start_time: f64, end_time: f64) -> Self {
        Self {
            id: TemplateId::random(),
            name: name.into(),
            day_of_week_start: None,
            day_of_week_end: None,
            start_time,
            end_time,
            color: 0,
        }
    }

    pub fn with_id<S: AsRef<str>>(mut self, id: S) -> Self {
        self.id = TemplateId::new(id);
        self
    }

    pub fn with_days(mut self, start: u8, end: u8) -> Self {
        self.day_of_week_start = Some(start);
        self.day_of_week_end = Some(end);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().trim().is_empty() {
            bail!("template id cannot be empty");
        }
        if self.name.trim().is_empty() {
            bail!("template name cannot be empty");
        }
        for day in [self.day_of_week_start, self.day_of_week_end].into_iter().flatten() {
            if day > 6 {
                bail!("template day bounds must be within 0..=6 (got {day})");
            }
        }
        if !self.start_time.is_finite() || !self.end_time.is_finite() {
            bail!("template times must be finite numbers");
        }
        Ok(())
    }

    pub fn prepare_time(&self) -> PreparedTime {
        PreparedTime {
            start_time: ClockTime::from_float_hours(self.start_time),
            end_time: ClockTime::from_float_hours(self.end_time),
        }
    }

    pub fn day_span(&self, config: &CompanyConfig) -> DaySpan {
        DaySpan {
            start: self.day_of_week_start.unwrap_or(config.shift_start_day),
            end: self.day_of_week_end.unwrap_or(config.shift_end_day),
        }
    }

    /// Jours de `[date_start, date_end]` compris dans l'empan du template.
    pub fn explode_date_range(
        &self,
        date_start: NaiveDate,
        date_end: NaiveDate,
        config: &CompanyConfig,
    ) -> ExplodedRange {
        self.day_span(config).explode(date_start, date_end)
    }
}

/// Empan de jours `[start, end]`, sans bouclage : `start > end` ne retient aucun jour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySpan {
    pub start: u8,
    pub end: u8,
}

impl DaySpan {
    pub fn from_config(config: &CompanyConfig) -> Self {
        Self {
            start: config.shift_start_day,
            end: config.shift_end_day,
        }
    }

    /// Empan d'un template optionnel (défauts de l'entreprise sinon).
    pub fn resolve(template: Option<&ShiftTemplate>, config: &CompanyConfig) -> Self {
        template.map_or_else(|| Self::from_config(config), |t| t.day_span(config))
    }

    pub fn contains(&self, weekday: u8) -> bool {
        self.start <= weekday && weekday <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn explode(self, date_start: NaiveDate, date_end: NaiveDate) -> ExplodedRange {
        ExplodedRange {
            next: Some(date_start),
            end: date_end,
            span: self,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekDay {
    pub date: NaiveDate,
    pub weekday: u8,
}

/// Itérateur paresseux (et clonable) sur les jours retenus, en ordre croissant.
#[derive(Debug, Clone)]
pub struct ExplodedRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
    span: DaySpan,
}

impl Iterator for ExplodedRange {
    type Item = WeekDay;

    fn next(&mut self) -> Option<WeekDay> {
        while let Some(current) = self.next {
            if current > self.end {
                self.next = None;
                break;
            }
            self.next = current.succ_opt();
            let weekday = weekday_index(current);
            if self.span.contains(weekday) {
                return Some(WeekDay {
                    date: current,
                    weekday,
                });
            }
        }
        None
    }
}

/// Templates connus, indexés par id.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: BTreeMap<TemplateId, ShiftTemplate>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, template: ShiftTemplate) -> Option<ShiftTemplate> {
        self.templates.insert(template.id.clone(), template)
    }

    pub fn get(&self, id: &TemplateId) -> Option<&ShiftTemplate> {
        self.templates.get(id)
    }

    pub fn contains(&self, id: &TemplateId) -> bool {
        self.templates.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShiftTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl FromIterator<ShiftTemplate> for TemplateCatalog {
    fn from_iter<I: IntoIterator<Item = ShiftTemplate>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for template in iter {
            catalog.insert(template);
        }
        catalog
    }
}

#[derive(Debug, Clone)]
pub struct TemplateInfo {
    pub template: ShiftTemplate,
    pub path: PathBuf,
    pub modified: Option<DateTime<Utc>>,
}

/// Gestion simple des templates persistés sur disque (un JSON par template).
#[derive(Debug, Clone)]
pub struct TemplateStore {
    base_dir: PathBuf,
}

impl TemplateStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            base_dir: dir.as_ref().to_path_buf(),
        }
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)
            .with_context(|| format!("creating template directory {}", self.base_dir.display()))
    }

    pub fn save(&self, template: &ShiftTemplate) -> Result<PathBuf> {
        template.validate()?;
        self.ensure_dir()?;
        let path = self.base_dir.join(format!("{}.json", template.id));
        let json = serde_json::to_string_pretty(template)?;
        fs::write(&path, json).with_context(|| format!("writing template {}", path.display()))?;
        Ok(path)
    }

    pub fn load(&self, id: &str) -> Result<ShiftTemplate> {
        let path = self.base_dir.join(format!("{id}.json"));
        let data =
            fs::read(&path).with_context(|| format!("reading template {}", path.display()))?;
        let template: ShiftTemplate = serde_json::from_slice(&data)
            .with_context(|| format!("parsing template {}", path.display()))?;
        template.validate()?;
        Ok(template)
    }

    pub fn list(&self) -> Result<Vec<TemplateInfo>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }
        let mut infos = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let data = fs::read(&path)?;
            let template: ShiftTemplate = match serde_json::from_slice(&data) {
                Ok(t) => t,
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "could not parse template");
                    continue;
                }
            };
            let modified = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .ok()
                .map(DateTime::<Utc>::from);
            infos.push(TemplateInfo {
                template,
                path,
                modified,
            });
        }
        infos.sort_by(|a, b| a.template.id.cmp(&b.template.id));
        Ok(infos)
    }

    /// Charge tous les templates lisibles dans un catalogue.
    pub fn catalog(&self) -> Result<TemplateCatalog> {
        Ok(self.list()?.into_iter().map(|info| info.template).collect())
    }
}
