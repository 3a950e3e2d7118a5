use clap::Parser;
use taskpro::api::server::ApiServer;
use taskpro::cli::{Cli, Commands};
use taskpro::config::ServerConfig;
use taskpro::db::{create_pool, run_migrations};
use taskpro::error::Result;
use taskpro::logging::{
    cleanup_old_logs, init_logging, log_dir_for, ApplicationMode, LoggingConfig,
};

#[tokio::main]
async fn main() {
    // Parse CLI arguments first to get logging configuration
    let cli = Cli::parse();

    let args_config = LoggingConfig::from_args(cli.quiet, cli.verbose > 0, cli.json);

    let log_config = match &cli.command {
        Commands::Serve {
            log_file: Some(path),
            ..
        } => LoggingConfig {
            level: args_config.level,
            json_format: cli.json,
            file_output: Some(path.clone()),
            ..LoggingConfig::for_mode(ApplicationMode::Server)
        },
        Commands::Serve { .. } => args_config,
        Commands::InitDb { .. } => LoggingConfig {
            level: args_config.level,
            color: args_config.color,
            json_format: args_config.json_format,
            ..LoggingConfig::for_mode(ApplicationMode::Cli)
        },
    };

    let log_dir = log_config.file_output.as_deref().map(log_dir_for);

    if let Err(e) = init_logging(log_config) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&cli, log_dir).await {
        let error_response = e.to_error_response();
        // Operators need the real cause, not the masked client message
        eprintln!(
            "{}",
            serde_json::json!({ "code": error_response.code, "message": e.to_string() })
        );
        std::process::exit(1);
    }
}

async fn run(cli: &Cli, log_dir: Option<std::path::PathBuf>) -> Result<()> {
    let mut config = ServerConfig::load()?;
    cli.command.apply_overrides(&mut config);
    config.validate()?;

    match &cli.command {
        Commands::Serve { .. } => {
            if let Some(dir) = log_dir {
                cleanup_old_logs(&dir, config.log_retention_days).ok();
            }

            ApiServer::new(config).run().await?;
        },

        Commands::InitDb { .. } => {
            let pool = create_pool(&config.database_path).await?;
            run_migrations(&pool).await?;
            pool.close().await;

            tracing::info!("Database ready at {}", config.database_path.display());
            println!("Initialized database at {}", config.database_path.display());
        },
    }

    Ok(())
}
