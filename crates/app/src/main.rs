use std::fmt;
use std::sync::Arc;

use course_core::model::CourseId;
use course_core::model::sample::{sample_course, sample_course_id};
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{Clock, ContentApi, CourseService, HttpContentApi};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidCourseId { raw: String },
    InvalidDbUrl { raw: String },
    InvalidApiUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCourseId { raw } => write!(f, "invalid --course-id value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api-url value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    course_id: CourseId,
    content_api: Arc<dyn ContentApi>,
}

impl UiApp for DesktopApp {
    fn default_course_id(&self) -> CourseId {
        self.course_id.clone()
    }

    fn content_api(&self) -> Arc<dyn ContentApi> {
        Arc::clone(&self.content_api)
    }
}

/// Where course content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Backend {
    Sqlite { db_url: String },
    Http { base_url: String },
}

struct Args {
    backend: Backend,
    course_id: CourseId,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui   [--db <sqlite_url> | --api-url <url>] [--course-id <id>]");
    eprintln!("  cargo run -p app -- seed [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults for ui:");
    eprintln!("  --db sqlite:dev.sqlite3");
    eprintln!("  --course-id rust-foundations");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  COURSEHOME_DB_URL, COURSEHOME_COURSE_ID, COURSEHOME_API_URL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

impl Args {
    /// `--api-url` and `--course-id` only mean something to the UI; seeding always writes
    /// the built-in course to local storage.
    fn parse(args: &mut impl Iterator<Item = String>, command: Command) -> Result<Self, ArgsError> {
        let ui = command == Command::Ui;
        let mut db_url = std::env::var("COURSEHOME_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://dev.sqlite3".into(), normalize_sqlite_url);
        let mut api_url = std::env::var("COURSEHOME_API_URL")
            .ok()
            .filter(|value| ui && !value.trim().is_empty());
        let mut course_id = std::env::var("COURSEHOME_COURSE_ID")
            .ok()
            .and_then(|value| value.parse::<CourseId>().ok())
            .unwrap_or_else(sample_course_id);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                    api_url = None;
                }
                "--api-url" if ui => {
                    let value = require_value(args, "--api-url")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidApiUrl { raw: value });
                    }
                    api_url = Some(value);
                }
                "--course-id" if ui => {
                    let value = require_value(args, "--course-id")?;
                    course_id = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidCourseId { raw: value.clone() })?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let backend = match api_url {
            Some(base_url) => Backend::Http { base_url },
            None => Backend::Sqlite { db_url },
        };
        Ok(Self { backend, course_id })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Open local storage and make sure the built-in course is there.
async fn local_service(db_url: &str) -> Result<CourseService, Box<dyn std::error::Error>> {
    prepare_sqlite_file(db_url)?;
    let service = CourseService::sqlite(db_url, Clock::system()).await?;
    if service.ensure_course(&sample_course()).await? {
        info!(%db_url, "stored built-in sample course");
    }
    Ok(service)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter, cmd).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();

    match (cmd, parsed.backend) {
        (Command::Ui, backend) => {
            let content_api: Arc<dyn ContentApi> = match backend {
                Backend::Http { base_url } => {
                    info!(%base_url, "using remote course service");
                    Arc::new(HttpContentApi::new(&base_url)?)
                }
                Backend::Sqlite { db_url } => {
                    info!(%db_url, "using local course storage");
                    Arc::new(local_service(&db_url).await?)
                }
            };

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                course_id: parsed.course_id,
                content_api,
            });
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Course Home")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        (Command::Seed, Backend::Sqlite { db_url }) => {
            local_service(&db_url).await?;
            info!(%db_url, course_id = %sample_course_id(), "seed complete");
            Ok(())
        }
        (Command::Seed, Backend::Http { base_url }) => Err(Box::new(ArgsError::InvalidApiUrl {
            raw: base_url,
        })),
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
