//! `coffer` binary.
//!
//! Offline checks for server operators:
//! - `check` validates a menu file the way the engine loads it
//! - `query` answers an `amt_` placeholder against a stored ledger snapshot

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use coffer_engine::EngineConfig;

mod check;
mod query;

#[derive(Parser, Debug)]
#[command(name = "coffer")]
#[command(about = "Validate coffer menus and inspect ledger snapshots")]
struct Args {
	/// Engine configuration file (tick rate, extra materials)
	#[arg(short, long, value_name = "PATH", global = true)]
	config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Validate a menu file: sizes, slots, ids and alias uniqueness
	Check {
		#[arg(value_name = "MENUS")]
		menus: PathBuf,
	},
	/// Resolve a placeholder token against a ledger snapshot
	Query {
		#[arg(value_name = "SNAPSHOT")]
		snapshot: PathBuf,
		/// User id the snapshot belongs to
		user: String,
		/// Placeholder token, e.g. `amt_nexo-custom-sword`
		token: String,
	},
}

fn main() -> anyhow::Result<()> {
	let args = Args::parse();
	setup_tracing(args.verbose);

	let config = match &args.config {
		Some(path) => EngineConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
		None => EngineConfig::default(),
	};

	match args.command {
		Command::Check { menus } => {
			let text = std::fs::read_to_string(&menus).with_context(|| format!("reading {}", menus.display()))?;
			let report = check::check_menus(&text).with_context(|| format!("checking {}", menus.display()))?;
			print!("{report}");
		}
		Command::Query { snapshot, user, token } => {
			let answer = query::query_snapshot(&config, &snapshot, &user, &token)?;
			println!("{answer}");
		}
	}
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("COFFER_LOG")
		.or_else(|_| EnvFilter::try_from_default_env())
		.unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}
