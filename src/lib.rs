pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod errors;
pub mod rating;
pub mod services;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

use crate::cli::{Command, RoleArg};
use crate::config::settings::AppConfig;
use crate::database::NewUser;
use crate::services::accounts;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_init_db(reset: bool) -> Result<()> {
    let config = AppConfig::new();
    let pool = database::create_pool(&config.server.database_path)?;
    let mut conn = database::get_connection(&pool)?;

    if reset {
        database::setup::reset_database(&mut conn)?;
    } else {
        database::setup::ensure_schema(&mut conn)?;
    }

    info!("Database {} initialised", config.server.database_path);
    Ok(())
}

pub fn handle_issue_session(email: &str, name: &str, role: Option<RoleArg>) -> Result<()> {
    let config = AppConfig::new();
    let pool = database::create_pool(&config.server.database_path)?;
    let mut conn = database::get_connection(&pool)?;
    database::setup::ensure_schema(&mut conn)?;

    let profile = NewUser {
        name: name.to_string(),
        email: email.to_string(),
        ..Default::default()
    };
    let issued = accounts::issue_session(
        &mut conn,
        &profile,
        role.map(Into::into),
        config.auth.session_ttl_days,
    )?;

    info!(
        "Issued session for {} ({}) valid until {}",
        issued.user.email,
        issued.user.role.as_str(),
        issued.expires_at
    );
    println!("{}", issued.token);
    Ok(())
}
