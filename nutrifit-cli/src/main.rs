use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use diesel::SqliteConnection;
use dotenvy::dotenv;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::path::{Path, PathBuf};

use nutrifit::catalog::exercises::Focus;
use nutrifit::catalog::import::{import_exercises, import_recipes};
use nutrifit::catalog::recipes::{list_unique_tags, search_recipes};
use nutrifit::config::{PlannerConfig, database_url};
use nutrifit::db::models::NewUser;
use nutrifit::db::operations::{create_user, get_recipe};
use nutrifit::db::{establish_connection, reset_all_tables, run_migrations};
use nutrifit::logging::set_log_level;
use nutrifit::planner::calendar::read_week_workouts;
use nutrifit::planner::{Intensity, build_session, generate_weekly_plan, read_week, swap_meal, swap_session};
use nutrifit::tools::{ToolCall, dispatch};

#[derive(Parser, Debug)]
#[command(version, about = "NutriFit - meal and training planner CLI", long_about = None)]
struct Args {
    /// SQLite database, overrides DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FocusArg {
    FullBody,
    Upper,
    Lower,
    Push,
    Pull,
    Cardio,
}

impl From<FocusArg> for Focus {
    fn from(arg: FocusArg) -> Self {
        match arg {
            FocusArg::FullBody => Focus::FullBody,
            FocusArg::Upper => Focus::Upper,
            FocusArg::Lower => Focus::Lower,
            FocusArg::Push => Focus::Push,
            FocusArg::Pull => Focus::Pull,
            FocusArg::Cardio => Focus::Cardio,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum IntensityArg {
    Low,
    Medium,
    High,
}

impl From<IntensityArg> for Intensity {
    fn from(arg: IntensityArg) -> Self {
        match arg {
            IntensityArg::Low => Intensity::Low,
            IntensityArg::Medium => Intensity::Medium,
            IntensityArg::High => Intensity::High,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Delete every row from every table
    Reset,
    /// Import exercises from a free-exercise-db JSON export
    ImportExercises {
        file: PathBuf,
        /// JSON array of names, or one allowed exercise name per line
        #[arg(long)]
        allow_list: Option<PathBuf>,
    },
    /// Import recipes from a JSON array
    ImportRecipes { file: PathBuf },
    CreateUser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        sex: Option<String>,
        #[arg(long)]
        age: Option<i32>,
        #[arg(long)]
        weight_kg: Option<f64>,
        #[arg(long)]
        height_cm: Option<f64>,
        #[arg(long)]
        goal: Option<String>,
        #[arg(long)]
        equipment: Option<String>,
        #[arg(long)]
        training_days: Option<i32>,
    },
    /// Generate meals and workouts for the seven days from START
    Generate {
        user_id: i32,
        start: NaiveDate,
        #[arg(long)]
        no_meals: bool,
        #[arg(long)]
        no_sport: bool,
        /// Seed for reproducible picks
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show planned meals and workouts between two dates
    Week {
        user_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    },
    SwapMeal { planning_id: i32, recipe_id: i32 },
    SwapSession { planning_id: i32, session_id: i32 },
    BuildSession {
        #[arg(value_enum)]
        focus: FocusArg,
        #[arg(short, long)]
        equipment: Option<String>,
        #[arg(short, long)]
        duration: Option<i32>,
        #[arg(short, long)]
        intensity: Option<IntensityArg>,
    },
    SearchRecipes {
        query: Option<String>,
        #[arg(short, long, default_value_t = 10)]
        limit: i64,
    },
    /// List every recipe tag
    Tags,
    /// Run an assistant tool call, e.g. '{"name":"get_health_profile","arguments":{}}'
    Tool { user_id: i32, call: String },
}

fn connect(args: &Args) -> Result<SqliteConnection> {
    let url = match &args.database_url {
        Some(url) => url.clone(),
        None => database_url()?,
    };
    let mut conn = establish_connection(&url)?;
    run_migrations(&mut conn)?;
    Ok(conn)
}

fn read_allow_list(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    if raw.trim_start().starts_with('[') {
        return serde_json::from_str(&raw).context("parsing allow list");
    }
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();
    if !set_log_level(&args.log_level) {
        return Err(anyhow!("unknown log level '{}'", args.log_level));
    }

    let mut conn = connect(&args)?;
    let config = PlannerConfig::from_env();

    match args.command {
        Commands::Migrate => {
            println!("Database is up to date");
        }
        Commands::Reset => {
            reset_all_tables(&mut conn)?;
            println!("All tables cleared");
        }
        Commands::ImportExercises { file, allow_list } => {
            let json = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let allowed = match allow_list {
                Some(path) => Some(read_allow_list(&path)?),
                None => None,
            };
            let report = import_exercises(&mut conn, &json, allowed.as_deref())?;
            println!(
                "{} exercises imported, {} already present, {} not allowed",
                report.inserted, report.already_present, report.not_allowed
            );
        }
        Commands::ImportRecipes { file } => {
            let json = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let report = import_recipes(&mut conn, &json)?;
            println!(
                "{} recipes imported, {} already present",
                report.inserted, report.already_present
            );
        }
        Commands::CreateUser {
            email,
            first_name,
            sex,
            age,
            weight_kg,
            height_cm,
            goal,
            equipment,
            training_days,
        } => {
            let user = create_user(
                &mut conn,
                &NewUser {
                    email,
                    first_name,
                    sex,
                    age,
                    weight_kg,
                    height_cm,
                    goal,
                    equipment,
                    training_days_per_week: training_days,
                    ..Default::default()
                },
            )?;
            println!("Created user {} ({})", user.id, user.email);
        }
        Commands::Generate {
            user_id,
            start,
            no_meals,
            no_sport,
            seed,
        } => {
            let mut rng = rng_from(seed);
            let summary = generate_weekly_plan(
                &mut conn, &mut rng, &config, user_id, start, !no_meals, !no_sport,
            )?;
            println!("{}", summary.message);
            for detail in summary.details {
                println!("\t{}", detail);
            }
        }
        Commands::Week {
            user_id,
            start,
            end,
        } => {
            for meal in read_week(&mut conn, user_id, start, end)? {
                let name = get_recipe(&mut conn, meal.recipe_id)?
                    .map(|r| r.name)
                    .unwrap_or_else(|| "Unknown recipe".into());
                println!("{} {}", meal, name);
            }
            for workout in read_week_workouts(&mut conn, user_id, start, end)? {
                println!("{}", workout);
            }
        }
        Commands::SwapMeal {
            planning_id,
            recipe_id,
        } => {
            if swap_meal(&mut conn, planning_id, recipe_id)? {
                println!("Planned meal {} now uses recipe {}", planning_id, recipe_id);
            } else {
                println!("No planned meal {}", planning_id);
            }
        }
        Commands::SwapSession {
            planning_id,
            session_id,
        } => {
            if swap_session(&mut conn, planning_id, session_id)? {
                println!("Planned workout {} now uses session {}", planning_id, session_id);
            } else {
                println!("No planned workout {}", planning_id);
            }
        }
        Commands::BuildSession {
            focus,
            equipment,
            duration,
            intensity,
        } => {
            let mut rng = rng_from(None);
            let built = build_session(
                &mut conn,
                &mut rng,
                &config,
                focus.into(),
                equipment.as_deref(),
                duration,
                intensity.map(Into::into),
            )?;
            println!("Session {}: {}", built.session.id, built.session.name);
            for link in built.exercises {
                println!("\t{}", link);
            }
        }
        Commands::SearchRecipes { query, limit } => {
            for recipe in search_recipes(&mut conn, query.as_deref(), limit)? {
                let calories = recipe
                    .calories
                    .map(|c| format!("{} kcal", c))
                    .unwrap_or_else(|| "? kcal".into());
                println!("{}, {} ({})", recipe.id, recipe.name, calories);
            }
        }
        Commands::Tags => {
            for tag in list_unique_tags(&mut conn)? {
                println!("{}", tag);
            }
        }
        Commands::Tool { user_id, call } => {
            let call: ToolCall = serde_json::from_str(&call).context("parsing tool call")?;
            let mut rng = rng_from(None);
            let result = dispatch(&mut conn, &mut rng, &config, user_id, call);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
