use clap::{Parser, Subcommand, ValueEnum};

use crate::database::Role;

#[derive(Parser, Debug)]
#[command(author, version, about = "campus-forum backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Create the database schema
    InitDb {
        /// Drop every table first
        #[arg(long)]
        reset: bool,
    },
    /// Register a user if needed and print a bearer token for them
    IssueSession {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long, value_enum)]
        role: Option<RoleArg>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq)]
pub enum RoleArg {
    User,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::User => Role::User,
            RoleArg::Admin => Role::Admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_default_port() {
        let cli = Cli::parse_from(["campus_forum", "serve"]);
        assert_eq!(cli.command, Command::Serve { port: 3000 });
    }

    #[test]
    fn test_parse_issue_session() {
        let cli = Cli::parse_from([
            "campus_forum",
            "issue-session",
            "--email",
            "d1@school.edu",
            "--name",
            "Chen",
            "--role",
            "admin",
        ]);
        assert_eq!(
            cli.command,
            Command::IssueSession {
                email: "d1@school.edu".to_string(),
                name: "Chen".to_string(),
                role: Some(RoleArg::Admin),
            }
        );
    }

    #[test]
    fn test_parse_init_db_reset() {
        let cli = Cli::parse_from(["campus_forum", "init-db", "--reset"]);
        assert_eq!(cli.command, Command::InitDb { reset: true });
    }
}
