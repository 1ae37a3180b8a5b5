use anyhow::Result;

use campus_forum::cli::Command;
use campus_forum::{handle_init_db, handle_issue_session, handle_serve, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::InitDb { reset } => handle_init_db(*reset),
        Command::IssueSession { email, name, role } => handle_issue_session(email, name, *role),
    }
}
