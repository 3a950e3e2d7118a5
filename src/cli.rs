use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ServerConfig;

const LONG_ABOUT: &str = r#"
TaskPro - Task Management REST API

Endpoints (all under /api):
  POST   /register        Create an account, returns user + token
  POST   /login           Exchange email/password for a token
  GET    /me              Current user                    (auth)
  GET    /tasks           List your tasks, newest first   (auth)
  POST   /tasks           Create a task                   (auth)
  GET    /tasks/stats     Totals for your tasks           (auth)
  GET    /tasks/{id}      Fetch one task                  (auth)
  PUT    /tasks/{id}      Update a task                   (auth)
  DELETE /tasks/{id}      Delete a task                   (auth)

Authenticated endpoints expect "Authorization: Bearer <token>".

Configuration is read from TASKPRO_* environment variables or a .env file:
  TASKPRO_HOST, TASKPRO_PORT, TASKPRO_DATABASE_PATH, TASKPRO_JWT_SECRET,
  TASKPRO_TOKEN_TTL_HOURS, TASKPRO_BCRYPT_COST, TASKPRO_LOG_RETENTION_DAYS
"#;

#[derive(Parser, Clone)]
#[command(name = "taskpro")]
#[command(about = "Task management REST API with JWT authentication")]
#[command(long_about = LONG_ABOUT)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output (-q)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output logs in JSON format
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Run the HTTP API server
    ///
    /// Examples:
    ///   taskpro serve
    ///   taskpro serve --port 3000 --db /var/lib/taskpro/taskpro.db
    Serve {
        /// Address to bind (overrides TASKPRO_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides TASKPRO_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file (overrides TASKPRO_DATABASE_PATH)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Write logs to this file (rotated daily) instead of stdout
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Create the database and its tables, then exit
    ///
    /// Safe to run repeatedly; existing tables are left alone.
    InitDb {
        /// SQLite database file (overrides TASKPRO_DATABASE_PATH)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

impl Commands {
    /// Apply command-line overrides on top of the environment configuration
    pub fn apply_overrides(&self, config: &mut ServerConfig) {
        match self {
            Commands::Serve { host, port, db, .. } => {
                if let Some(h) = host {
                    config.host = h.clone();
                }
                if let Some(p) = port {
                    config.port = *p;
                }
                if let Some(d) = db {
                    config.database_path = d.clone();
                }
            },
            Commands::InitDb { db } => {
                if let Some(d) = db {
                    config.database_path = d.clone();
                }
            },
        }
    }
}
