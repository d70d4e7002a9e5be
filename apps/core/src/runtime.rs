use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{self, ConfigError};
use crate::contract::{CafeResultDto, SearchRequest};
use crate::core_service::{CafeService, ServiceError};
use crate::model::PriceRange;
use crate::profile::Profile;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Parser)]
#[command(name = "kapetayo-core", version, about = "Browse and search Marikina City cafes")]
pub struct Cli {
    /// Path to config.toml (defaults to the app data directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Filter the catalog with a fuzzy query and exact filters
    Search(SearchArgs),
    /// Rank cafes by how strongly they feature a keyword
    BestMatch {
        keyword: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Toggle a bookmark
    Bookmark { id: String },
    /// Toggle the visited mark
    Visit { id: String },
    /// List bookmarked cafes
    Bookmarks,
    /// List visited cafes
    Visited,
    /// Show the local profile
    Profile,
    /// Create the local profile
    Onboard {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        bio: String,
    },
    /// Remove every stored account value
    Reset,
    /// Answer newline-delimited JSON commands from stdin
    Serve,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-text query; words are joined with spaces
    pub query: Vec<String>,
    #[arg(long)]
    pub tag: Option<String>,
    #[arg(long)]
    pub price: Option<PriceRange>,
    #[arg(long)]
    pub student: bool,
    #[arg(long)]
    pub bookmarked: bool,
    #[arg(long)]
    pub visited: bool,
    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    fn to_request(&self) -> SearchRequest {
        SearchRequest {
            query: self.query.join(" "),
            tag: self.tag.clone(),
            price: self.price,
            student_only: self.student,
            bookmarked_only: self.bookmarked,
            visited_only: self.visited,
        }
    }
}

pub fn run(cli: Cli) -> Result<(), RuntimeError> {
    let config = config::load(cli.config.as_deref())?;
    if !config.config_path.exists() {
        config::save(&config)?;
    }
    if let Err(error) = crate::logging::init(&config) {
        eprintln!("[kapetayo-core] logging disabled: {error}");
    }
    tracing::info!(
        config_path = %config.config_path.display(),
        store_path = %config.store_path.display(),
        "startup"
    );

    let service = CafeService::new(config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if matches!(cli.command, Command::Serve) {
        let stdin = std::io::stdin();
        return serve(&service, stdin.lock(), &mut out);
    }
    execute(&service, cli.command, &mut out)
}

pub fn execute(
    service: &CafeService,
    command: Command,
    out: &mut dyn Write,
) -> Result<(), RuntimeError> {
    match command {
        Command::Search(args) => {
            let cafes = service.search_request(&args.to_request())?;
            let results = service.to_results(&cafes)?;
            if args.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&results)?)?;
            } else {
                write_results(out, &results)?;
            }
        }
        Command::BestMatch { keyword, limit } => {
            let cafes = service.best_matches(&keyword, limit);
            write_results(out, &service.to_results(&cafes)?)?;
        }
        Command::Bookmark { id } => {
            let active = service.toggle_bookmark(&id)?;
            let state = if active { "bookmarked" } else { "removed from bookmarks" };
            writeln!(out, "{} {state}", service.cafe(&id)?.name)?;
        }
        Command::Visit { id } => {
            let active = service.toggle_visited(&id)?;
            let state = if active { "marked visited" } else { "marked not visited" };
            writeln!(out, "{} {state}", service.cafe(&id)?.name)?;
        }
        Command::Bookmarks => {
            let cafes = service.bookmarked_cafes()?;
            write_results(out, &service.to_results(&cafes)?)?;
        }
        Command::Visited => {
            let cafes = service.visited_cafes()?;
            write_results(out, &service.to_results(&cafes)?)?;
        }
        Command::Profile => write_profile(out, &service.profile()?)?,
        Command::Onboard { name, bio } => write_profile(out, &service.onboard(&name, &bio)?)?,
        Command::Reset => {
            service.reset_account()?;
            writeln!(out, "account data cleared")?;
        }
        Command::Serve => {
            let stdin = std::io::stdin();
            serve(service, stdin.lock(), out)?;
        }
    }
    Ok(())
}

/// One JSON request per input line, one JSON response per output line.
/// Blank lines are skipped.
pub fn serve(
    service: &CafeService,
    input: impl BufRead,
    out: &mut dyn Write,
) -> Result<(), RuntimeError> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = crate::transport::handle_json(service, &line);
        writeln!(out, "{response}")?;
        out.flush()?;
    }
    Ok(())
}

fn write_results(out: &mut dyn Write, results: &[CafeResultDto]) -> Result<(), RuntimeError> {
    if results.is_empty() {
        writeln!(out, "No cafes found. Try adjusting your filters.")?;
        return Ok(());
    }

    for cafe in results {
        let mut marks = String::new();
        if cafe.bookmarked {
            marks.push_str(" [bookmarked]");
        }
        if cafe.visited {
            marks.push_str(" [visited]");
        }
        writeln!(
            out,
            "{}\t{}\t{}\t{}{marks}",
            cafe.id, cafe.name, cafe.price_range, cafe.address
        )?;
    }
    Ok(())
}

fn write_profile(out: &mut dyn Write, profile: &Profile) -> Result<(), RuntimeError> {
    if !profile.onboarded {
        writeln!(out, "No profile yet. Run `kapetayo-core onboard --name <NAME>`.")?;
        return Ok(());
    }
    writeln!(out, "{}", profile.name)?;
    writeln!(out, "{}", profile.bio)?;
    if let Some(avatar) = &profile.avatar_id {
        writeln!(out, "avatar: {avatar}")?;
    }
    writeln!(out, "visible: {}", profile.visible)?;
    Ok(())
}
