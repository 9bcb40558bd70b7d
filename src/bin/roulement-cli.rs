#![forbid(unsafe_code)]
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use roulement::{
    io,
    model::{AssignmentId, EmployeeId, OccurrenceId, PlanId, TemplateId},
    planning::{Planner, PlanningContext},
    storage::{JsonStorage, Storage},
    template::{weekday_name, ShiftTemplate, TemplateStore},
    AvailabilityResolver, CompanyConfig, Directory,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification hebdomadaire des postes
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON des plannings
    #[arg(long, global = true, default_value = "planning.json")]
    book: String,

    /// Répertoire des templates (un JSON par template)
    #[arg(long, global = true, default_value = "templates")]
    templates: String,

    /// CSV des employés `handle,display_name[,country]`
    #[arg(long, global = true)]
    employees: Option<String>,

    /// CSV des congés `handle,from,to[,reason]`
    #[arg(long, global = true)]
    leaves: Option<String>,

    /// CSV des jours fériés `date,name[,country]`
    #[arg(long, global = true)]
    holidays: Option<String>,

    /// Configuration entreprise (JSON)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Premier jour travaillé par défaut (0 = lundi)
    #[arg(long, global = true)]
    start_day: Option<u8>,

    /// Dernier jour travaillé par défaut
    #[arg(long, global = true)]
    end_day: Option<u8>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args, Debug, Clone, Copy)]
struct Week {
    #[arg(long)]
    year: i32,
    #[arg(long)]
    week: u32,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Créer un planning (par défaut la semaine qui suit le dernier)
    NewPlan {
        #[arg(long, requires = "week")]
        year: Option<i32>,
        #[arg(long, requires = "year")]
        week: Option<u32>,
    },

    /// Enregistrer un template de poste
    SaveTemplate {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        /// Heure fractionnaire (9.5 = 09:30)
        #[arg(long)]
        start: f64,
        #[arg(long)]
        end: f64,
        #[arg(long)]
        from_day: Option<u8>,
        #[arg(long)]
        to_day: Option<u8>,
        #[arg(long, default_value_t = 0)]
        color: u32,
    },

    /// Générer les affectations des employés absents du planning
    Generate {
        #[command(flatten)]
        week: Week,
    },

    /// Changer le template d'un employé (régénère ses jours)
    SetTemplate {
        #[command(flatten)]
        week: Week,
        #[arg(long)]
        employee: String,
        /// Absent : retire le template
        #[arg(long)]
        template: Option<String>,
    },

    /// Poser un template sur un seul jour
    SetDay {
        #[command(flatten)]
        week: Week,
        #[arg(long)]
        employee: String,
        #[arg(long)]
        day: u8,
        #[arg(long)]
        template: String,
    },

    /// Désaffecter un jour
    Unassign {
        #[command(flatten)]
        week: Week,
        #[arg(long)]
        employee: String,
        #[arg(long)]
        day: u8,
    },

    /// Recalculer les états après mise à jour des congés / fériés
    Refresh {
        #[command(flatten)]
        week: Week,
    },

    /// Marquer le planning comme planifié
    Confirm {
        #[command(flatten)]
        week: Week,
    },

    /// Lister et optionnellement exporter
    List {
        #[command(flatten)]
        week: Week,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Lister les employés en congé sur un jour planifié
    Issues {
        #[command(flatten)]
        week: Week,
    },
}

fn load_config(cli: &Cli) -> Result<CompanyConfig> {
    let mut config = match &cli.config {
        Some(path) => CompanyConfig::load(path)?,
        None => CompanyConfig::default(),
    };
    if let Some(day) = cli.start_day {
        config.shift_start_day = day;
    }
    if let Some(day) = cli.end_day {
        config.shift_end_day = day;
    }
    config.validate()?;
    Ok(config)
}

fn load_directory(cli: &Cli) -> Result<Directory> {
    let mut directory = Directory::new();
    if let Some(path) = &cli.employees {
        directory.add_employees(io::import_employees_csv(path)?);
    }
    if let Some(path) = &cli.leaves {
        directory.add_leaves(io::import_leaves_csv(path)?);
    }
    if let Some(path) = &cli.holidays {
        directory.add_holidays(io::import_holidays_csv(path)?);
    }
    Ok(directory)
}

fn plan_id(planner: &Planner, week: Week) -> Result<PlanId> {
    planner
        .find_plan_by_week(week.year, week.week)
        .map(|p| p.id.clone())
        .ok_or_else(|| anyhow!("no plan for {} week {}", week.year, week.week))
}

fn employee_id(directory: &Directory, handle: &str) -> EmployeeId {
    directory
        .find_employee_by_handle(handle)
        .map(|e| e.id.clone())
        .unwrap_or_else(|| EmployeeId::new(handle))
}

fn assignment_id(
    planner: &Planner,
    plan: &PlanId,
    employee: &EmployeeId,
) -> Result<AssignmentId> {
    Ok(planner.assignment_for(plan, employee)?.id.clone())
}

fn occurrence_ids(
    planner: &Planner,
    plan: &PlanId,
    employee: &EmployeeId,
    day: u8,
) -> Result<(AssignmentId, OccurrenceId)> {
    let (shift, line) = planner.occurrence_for_day(plan, employee, day)?;
    Ok((shift.id.clone(), line.id.clone()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let config = load_config(&cli)?;
    let directory = load_directory(&cli)?;
    let store = TemplateStore::new(&cli.templates);
    let templates = store.catalog()?;
    let ctx = PlanningContext::new(
        &config,
        &templates,
        AvailabilityResolver::from_source(&directory),
    );

    let storage = JsonStorage::open(&cli.book)?;
    let mut planner = if storage.exists() {
        Planner::from_book(storage.load()?)?
    } else {
        Planner::new()
    };

    let code = match cli.cmd {
        Commands::NewPlan { year, week } => {
            let id = match (year, week) {
                (Some(year), Some(week)) => planner.create_plan(year, week)?,
                _ => planner.create_next_plan(Utc::now().date_naive())?,
            };
            storage.save(planner.book())?;
            if let Some(plan) = planner.plan(&id) {
                println!("{}", plan.display_name());
            }
            0
        }
        Commands::SaveTemplate {
            id,
            name,
            start,
            end,
            from_day,
            to_day,
            color,
        } => {
            let mut template = ShiftTemplate::new(name, start, end).with_id(id);
            template.day_of_week_start = from_day;
            template.day_of_week_end = to_day;
            template.color = color;
            let path = store.save(&template)?;
            println!("template saved to {}", path.display());
            0
        }
        Commands::Generate { week } => {
            let plan = plan_id(&planner, week)?;
            let created = planner.generate(&plan, &directory.employee_ids(), &ctx)?;
            storage.save(planner.book())?;
            println!("{created} shift(s) created");
            0
        }
        Commands::SetTemplate {
            week,
            employee,
            template,
        } => {
            let plan = plan_id(&planner, week)?;
            let employee = employee_id(&directory, &employee);
            let shift = assignment_id(&planner, &plan, &employee)?;
            planner.set_assignment_template(&plan, &shift, template.map(TemplateId::new), &ctx)?;
            storage.save(planner.book())?;
            0
        }
        Commands::SetDay {
            week,
            employee,
            day,
            template,
        } => {
            let plan = plan_id(&planner, week)?;
            let employee = employee_id(&directory, &employee);
            let (shift, line) = occurrence_ids(&planner, &plan, &employee, day)?;
            planner.set_occurrence_template(
                &plan,
                &shift,
                &line,
                Some(TemplateId::new(template)),
                &ctx,
            )?;
            storage.save(planner.book())?;
            0
        }
        Commands::Unassign {
            week,
            employee,
            day,
        } => {
            let plan = plan_id(&planner, week)?;
            let employee = employee_id(&directory, &employee);
            let (shift, line) = occurrence_ids(&planner, &plan, &employee, day)?;
            planner.unassign_shift(&plan, &shift, &line, &ctx)?;
            storage.save(planner.book())?;
            0
        }
        Commands::Refresh { week } => {
            let plan = plan_id(&planner, week)?;
            planner.refresh_plan(&plan, &ctx)?;
            storage.save(planner.book())?;
            0
        }
        Commands::Confirm { week } => {
            let plan = plan_id(&planner, week)?;
            planner.mark_planned(&plan)?;
            storage.save(planner.book())?;
            0
        }
        Commands::List {
            week,
            out_json,
            out_csv,
        } => {
            let id = plan_id(&planner, week)?;
            let plan = planner.plan(&id).context("plan vanished")?;
            if let Some(path) = out_json {
                io::export_plan_json(path, plan)?;
            }
            if let Some(path) = out_csv {
                io::export_occurrences_csv(path, plan)?;
            }
            println!("{} [{}]", plan.display_name(), plan.state);
            for shift in plan.shifts() {
                let days: Vec<String> = shift
                    .lines()
                    .iter()
                    .map(|l| l.label(&ctx))
                    .collect();
                println!(
                    "{} | {:?} | {}",
                    shift.employee,
                    shift.state(),
                    days.join(", ")
                );
            }
            0
        }
        Commands::Issues { week } => {
            let id = plan_id(&planner, week)?;
            let plan = planner.plan(&id).context("plan vanished")?;
            let issues = plan.issued_shifts();
            if issues.is_empty() {
                println!("OK: no issues");
                0
            } else {
                eprintln!("Found {} issue(s)", issues.len());
                for shift in issues {
                    let days: Vec<&str> = shift
                        .lines()
                        .iter()
                        .filter(|l| l.state() == roulement::OccurrenceState::OnLeave)
                        .map(|l| weekday_name(l.day_number()))
                        .collect();
                    println!("{} on leave: {}", shift.employee, days.join(", "));
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
    };

    std::process::exit(code);
}
