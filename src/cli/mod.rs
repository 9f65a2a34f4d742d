pub mod render;
pub mod shutdown;
pub mod views;

use std::{fmt::Display, io::Write, path::PathBuf};

use anyhow::Result;
use chrono::Local;
use chrono_english::parse_date_string;
use clap::{builder::RangedU64ValueParser, CommandFactory, Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{info, level_filters::LevelFilter};
use views::{PeakMode, Workspace};

use crate::{
    log::aggregate::GroupKey,
    session::timer::SessionTimer,
    store::{config::MAX_VIEW_DAYS, UserDataSource, UserFile},
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, USER_DATA_FILE},
        logging::{enable_logging, LogOptions},
    },
};

#[derive(Parser, Debug)]
#[command(name = "daylog", version, long_about = None)]
#[command(about = "Personal activity log: timelines, bars and peak charts of recorded sessions", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "User file. By default $XDG_STATE_HOME/daylog/user.json or $HOME/.local/state/daylog/user.json"
    )]
    file: Option<PathBuf>,
    #[arg(long, global = true, help = "Print primitives as JSON")]
    json: bool,
    #[arg(long, global = true, help = "Trace level logging, mirrored on stderr")]
    log: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

fn days_parser() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::new().range(1..=MAX_VIEW_DAYS as u64)
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Stacked timeline of the most recent days, one row per day")]
    Line {
        #[arg(
            long,
            value_parser = days_parser(),
            help = "Number of days. Defaults to ui.view from the user config"
        )]
        days: Option<usize>,
    },
    #[command(about = "Timeline and entries of a single day")]
    Day {
        #[arg(
            long,
            help = "Day to show. Examples are \"today\", \"yesterday\", \"15/03/2025\". Defaults to today"
        )]
        date: Option<String>,
        #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
        date_style: DateStyle,
    },
    #[command(about = "Stacked bar per day, split by sector or project")]
    Bars {
        #[arg(
            long,
            value_parser = days_parser(),
            help = "Number of days. Defaults to ui.view from the user config"
        )]
        days: Option<usize>,
        #[arg(long, value_enum, default_value_t = GroupKey::Sector)]
        by: GroupKey,
    },
    #[command(about = "Peak hours or days of the whole log")]
    Peaks {
        #[arg(long, value_enum, default_value_t = PeakMode::Hours)]
        mode: PeakMode,
        #[arg(long, conflicts_with = "project", help = "Only entries of this sector")]
        sector: Option<String>,
        #[arg(long, help = "Only entries of this project")]
        project: Option<String>,
    },
    #[command(about = "Share of the whole log taken by each sector or project")]
    Focus {
        #[arg(long, value_enum, default_value_t = GroupKey::Sector)]
        by: GroupKey,
    },
    #[command(about = "Whether a session is in progress")]
    Status {},
    #[command(about = "Display the elapsed time of the session in progress until interrupted")]
    Timer {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = create_application_default_path()?;
    enable_logging(
        &app_dir,
        LogOptions {
            level: args.log.then_some(LevelFilter::TRACE),
            console: args.log,
        },
    )?;

    let source = UserFile::new(args.file.unwrap_or_else(|| app_dir.join(USER_DATA_FILE)));

    match args.commands {
        Commands::Timer {} => run_timer(&source).await,
        command => run_command(command, &source, args.json, &mut std::io::stdout().lock()).await,
    }
}

async fn run_command(
    command: Commands,
    source: &impl UserDataSource,
    as_json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let mut workspace = Workspace::new(source.load().await?, Local)?;
    let now = Local::now();
    let ui = workspace.data.config.ui.clone();
    let view_days = |days: Option<usize>| ui.view_days(days);

    match command {
        Commands::Line { days } => {
            let rows = views::line_view(&workspace, view_days(days)?, &now)?;
            if as_json {
                render::json(out, &rows)
            } else {
                render::timeline_rows(out, &rows)
            }
        }
        Commands::Day { date, date_style } => {
            let date = match date.map(|s| parse_date_string(&s, now, date_style.into())) {
                Some(Ok(v)) => v.date_naive(),
                Some(Err(e)) => {
                    return Err(Args::command()
                        .error(
                            clap::error::ErrorKind::ValueValidation,
                            format!("Failed to validate date {e}"),
                        )
                        .into());
                }
                None => now.date_naive(),
            };
            let view = views::day_view(&mut workspace, date)?;
            if as_json {
                render::json(out, &view)
            } else {
                render::day(out, &view)
            }
        }
        Commands::Bars { days, by } => {
            let columns = views::bars_view(&workspace, view_days(days)?, by, &now);
            if as_json {
                render::json(out, &columns)
            } else {
                render::bar_columns(out, &columns)
            }
        }
        Commands::Peaks {
            mode,
            sector,
            project,
        } => {
            let filter = match (&sector, &project) {
                (Some(name), _) => Some((GroupKey::Sector, name.as_str())),
                (None, Some(name)) => Some((GroupKey::Project, name.as_str())),
                (None, None) => None,
            };
            match views::peaks_view(&mut workspace, mode, filter, &now)? {
                Some(view) if as_json => render::json(out, &view),
                Some(view) => render::peaks(out, &view),
                None => {
                    writeln!(out, "No data")?;
                    Ok(())
                }
            }
        }
        Commands::Focus { by } => {
            let bar = views::focus_view(&workspace, by);
            if as_json {
                render::json(out, &bar)
            } else {
                render::labelled_segments(out, &bar)
            }
        }
        Commands::Status {} => {
            let status = views::status_view(&workspace, &now);
            if as_json {
                render::json(out, &status)
            } else {
                render::status(out, &status)
            }
        }
        Commands::Timer {} => run_timer(source).await,
    }
}

async fn run_timer(source: &impl UserDataSource) -> Result<()> {
    let workspace = Workspace::new(source.load().await?, Local)?;
    let mut timer = SessionTimer::new(DefaultClock);
    let mut display = timer.subscribe();

    if !timer.start(&workspace.log) {
        println!("{}", timer.display());
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown::detect_shutdown(shutdown.clone()));
    loop {
        print!("\r{}", display.borrow_and_update().as_str());
        std::io::stdout().flush()?;
        tokio::select! {
            _ = shutdown.cancelled() => break,
            changed = display.changed() => changed?,
        }
    }
    timer.reset();
    println!();
    info!("Timer stopped");
    Ok(())
}
