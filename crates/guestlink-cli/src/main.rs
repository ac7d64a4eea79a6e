//! `guestlink`: resolve arriving guests across hotel systems and manage the
//! resulting profiles.
//!
//! # Usage
//!
//! ```text
//! guestlink resolve --date 2026-02-13
//! guestlink resolve --dry-run
//! guestlink profiles search kapoor
//! guestlink --config ~/.config/guestlink.toml profiles list
//! ```

mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use guestlink_core::{
  GuestIdentity, GuestProfile,
  pipeline::build_profiles,
  store::ProfileStore,
  summary::{arrival_flags, arrival_summary},
};
use guestlink_sources::{IdentityMatcher, SourceSet};
use guestlink_store_sqlite::SqliteStore;
use settings::Settings;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "guestlink", version, about = "Guest identity resolution across hotel systems")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "guestlink.toml")]
  config: PathBuf,

  /// Directory holding the source feeds (overrides `data_dir`).
  #[arg(long, value_name = "DIR")]
  data_dir: Option<PathBuf>,

  /// Profile database (overrides `store_path`).
  #[arg(long, value_name = "PATH")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Match a day's arrivals across every source and save their profiles.
  Resolve {
    /// Arrival date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    date:    Option<NaiveDate>,
    /// Also print each guest's arrival summary and flags.
    #[arg(long)]
    dry_run: bool,
  },
  /// Inspect or administer stored profiles.
  #[command(subcommand)]
  Profiles(ProfilesCommand),
}

#[derive(Subcommand, Debug)]
enum ProfilesCommand {
  /// List every stored profile.
  List,
  /// Print one profile as JSON.
  Show { guest_id: String },
  /// Find profiles whose names contain TEXT, ignoring case.
  Search { text: String },
  /// Delete one profile.
  Delete { guest_id: String },
  /// Delete every profile.
  Clear,
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // CLI flags override the config file and environment.
  let mut settings = Settings::load(&args.config)
    .with_context(|| format!("reading settings from {}", args.config.display()))?;
  if let Some(dir) = args.data_dir {
    settings.data_dir = dir;
  }
  if let Some(store) = args.store {
    settings.store_path = store;
  }

  let store_path = settings.store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {}", store_path.display()))?;

  match args.command {
    Command::Resolve { date, dry_run } => {
      let date = date.unwrap_or_else(|| Local::now().date_naive());
      resolve(&settings, &store, date, dry_run).await
    }
    Command::Profiles(cmd) => profiles(&settings, &store, cmd).await,
  }
}

// ─── resolve ─────────────────────────────────────────────────────────────────

async fn resolve(
  settings: &Settings,
  store: &SqliteStore,
  date: NaiveDate,
  dry_run: bool,
) -> Result<()> {
  println!("{} | {date}", settings.hotel_name);
  println!();

  let sources = SourceSet::load(&settings.data_dir);
  println!("Sources ({}):", settings.data_dir.display());
  for (file, reason) in sources.status() {
    match reason {
      None => println!("  [ok] {file}"),
      Some(reason) => println!("  [--] {file}: {reason}"),
    }
  }
  println!();

  let matcher = IdentityMatcher::new(sources).with_max_concurrency(settings.max_concurrency);
  println!("Matching arrivals...");
  let matches = matcher.match_arrivals(date).await;
  if matches.is_empty() {
    println!("  No arrivals found for {date}.");
    return Ok(());
  }
  for m in &matches {
    let refs = m.cross_references();
    let found = if refs.is_empty() {
      "no cross-references".to_owned()
    } else {
      refs.iter().map(|(kind, n)| format!("{kind}({n})")).collect::<Vec<_>>().join(", ")
    };
    let room = m.room.as_deref().unwrap_or("?");
    println!("  {} (Room {room}): {found}", m.guest_name);
  }
  println!();

  println!("Building profiles...");
  let profiles = build_profiles(store, &matches, date)
    .await
    .context("failed to save profiles")?;
  for p in &profiles {
    let status = if p.is_returning() { "returning" } else { "new" };
    println!(
      "  {}: {status} guest, {} visit(s), {}{:.0} total spend",
      p.display_name(),
      p.total_visits,
      settings.currency,
      p.spend_history.total,
    );
  }
  info!(%date, profiles = profiles.len(), "resolution complete");

  if dry_run {
    println!();
    println!("Arrival summaries:");
    for p in &profiles {
      println!();
      println!("{}", arrival_summary(p, &settings.currency));
      let flags = arrival_flags(p);
      if !flags.is_empty() {
        println!("   Flags: {}", flags.join(", "));
      }
    }
  }

  Ok(())
}

// ─── profiles ────────────────────────────────────────────────────────────────

async fn profiles(settings: &Settings, store: &SqliteStore, cmd: ProfilesCommand) -> Result<()> {
  match cmd {
    ProfilesCommand::List => {
      let all = store.list_all().await.context("listing profiles")?;
      if all.is_empty() {
        println!("No profiles stored.");
      }
      for s in all {
        let updated = s.last_updated.map_or_else(|| "-".to_owned(), |d| d.to_string());
        println!(
          "{}  {:<30}  {} visit(s)  updated {updated}",
          s.guest_id,
          s.names.first().map(String::as_str).unwrap_or("Unknown"),
          s.total_visits,
        );
      }
    }
    ProfilesCommand::Show { guest_id } => {
      let id = GuestIdentity::parse(&guest_id)?;
      let profile = store
        .load(&id)
        .await
        .with_context(|| format!("loading profile {id}"))?
        .with_context(|| format!("no profile stored for {id}"))?;
      println!("{}", serde_json::to_string_pretty(&profile)?);
    }
    ProfilesCommand::Search { text } => {
      let found = store.search_by_name(&text).await.context("searching profiles")?;
      if found.is_empty() {
        println!("No profiles match {text:?}.");
      }
      for p in &found {
        print_profile_line(p, &settings.currency);
      }
    }
    ProfilesCommand::Delete { guest_id } => {
      let id = GuestIdentity::parse(&guest_id)?;
      if store.delete(&id).await.with_context(|| format!("deleting profile {id}"))? {
        println!("Deleted {id}.");
      } else {
        println!("No profile stored for {id}.");
      }
    }
    ProfilesCommand::Clear => {
      let removed = store.clear_all().await.context("clearing profiles")?;
      println!("Deleted {removed} profile(s).");
    }
  }
  Ok(())
}

fn print_profile_line(p: &GuestProfile, currency: &str) {
  println!(
    "{}  {}  {} visit(s)  {currency}{:.0}",
    p.guest_id,
    p.names.join(" / "),
    p.total_visits,
    p.spend_history.total,
  );
}
