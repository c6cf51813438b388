//! EQL REPL - query a JSON dataset with EQL.
//!
//! This is the entry point for the `eql` binary.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use eql_core::parse_date_time;
use eql_prepare::QueryContext;
use eql_repl::{Dataset, Repl};

#[derive(Parser, Debug)]
#[command(name = "eql", version, about = "Query a JSON dataset with EQL")]
struct Cli {
    /// Dataset file (JSON)
    #[arg(short, long)]
    data: PathBuf,

    /// Entity type to query
    #[arg(short, long)]
    entity: Option<String>,

    /// Principal returned by currentUser()
    #[arg(short, long)]
    user: Option<String>,

    /// Clock instant for now() and today(), as yyyy-MM-dd HH:mm
    #[arg(long)]
    now: Option<String>,

    /// Log prepared queries
    #[arg(short, long)]
    verbose: bool,

    /// Run one query and exit
    query: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Dataset::load(&cli.data)?;
    let mut repl = Repl::new(&dataset, cli.entity.as_deref())?;
    repl.set_verbose(cli.verbose);

    let mut context = match &cli.now {
        Some(now) => {
            QueryContext::new(parse_date_time(now).ok_or_else(|| format!("Invalid date-time: {}", now))?)
        }
        None => QueryContext::at_local_time(),
    };
    if let Some(user) = cli.user {
        context = context.with_principal(user);
    }
    repl.set_context(context);

    if let Some(query) = cli.query {
        println!("{}", repl.run_query(&query)?);
        return Ok(());
    }

    // Enter interactive mode if stdin is a terminal
    let stdin = io::stdin();
    if stdin.is_terminal() {
        repl.interactive();
    } else {
        let mut input = String::new();
        stdin.lock().read_to_string(&mut input)?;
        repl.run_script(&input)?;
    }
    Ok(())
}
