//! InsureTrack CLI
//!
//! Operator front end: database bootstrap, backups, dashboards and account
//! administration.

use std::error::Error;

use clap::{Parser, Subcommand};
use insuretrack_core::logging_facility;
use insuretrack_core::ExError;
use insuretrack_core_types::RequestContext;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "insuretrack")]
#[command(about = "InsureTrack - insurance policy and claims tracker", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: commands::GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create or migrate the database and the default admin account
    Init,
    /// Snapshot operations
    Backup(commands::backup::BackupArgs),
    /// Show a user's dashboard
    Dashboard(commands::dashboard::DashboardArgs),
    /// Account administration
    Users(commands::users::UsersArgs),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let request = RequestContext::new();

    let result = commands::Context::open(&cli.global).and_then(|mut ctx| {
        let span = logging_facility::command_span(&request);
        let _entered = span.enter();

        match cli.command {
            Commands::Init => commands::init::execute(&mut ctx),
            Commands::Backup(args) => commands::backup::execute(args, &mut ctx),
            Commands::Dashboard(args) => commands::dashboard::execute(args, &mut ctx),
            Commands::Users(args) => commands::users::execute(args, &mut ctx),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", with_request_id(e, &request));
        std::process::exit(1);
    }
}

/// Tag structured errors with the invocation's request id
fn with_request_id(err: Box<dyn Error>, request: &RequestContext) -> Box<dyn Error> {
    match err.downcast::<ExError>() {
        Ok(ex) => Box::new((*ex).with_request_id(request.request_id.clone())),
        Err(other) => other,
    }
}
