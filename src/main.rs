use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use vitrine::{AppState, Config, admin::AdminRegistry, create_app, startup_checks, store::BlogStore};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Global options that apply to all commands
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the web server (default if no command specified)
    Serve {
        #[arg(short, long)]
        port: Option<u16>,

        #[arg(long)]
        host: Option<String>,

        /// Automatically quit after specified number of seconds (useful for testing)
        #[arg(long)]
        quit_after: Option<u64>,
    },

    /// Manage the administrator registry
    #[command(subcommand)]
    Admin(AdminCommands),
}

#[derive(Subcommand, Debug)]
enum AdminCommands {
    /// List registered administrator emails
    List {
        /// Path to the registry file
        #[arg(short, long, default_value = "admins.toml")]
        registry: PathBuf,
    },
    /// Register an administrator email
    Add {
        /// Email address (stored lowercase)
        email: String,
        /// Path to the registry file
        #[arg(short, long, default_value = "admins.toml")]
        registry: PathBuf,
    },
    /// Remove an administrator email
    Remove {
        /// Email address to remove
        email: String,
        /// Path to the registry file
        #[arg(short, long, default_value = "admins.toml")]
        registry: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    // Set up logging first
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Some(Commands::Admin(admin_cmd)) => handle_admin_command(admin_cmd).await,
        Some(Commands::Serve {
            port,
            host,
            quit_after,
        }) => run_server(cli.config, port, host, quit_after).await,
        None => run_server(cli.config, None, None, None).await,
    }
}

async fn handle_admin_command(cmd: AdminCommands) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match cmd {
        AdminCommands::List { registry } => {
            if !registry.exists() {
                println!("No administrator registry found at: {:?}", registry);
                return Ok(());
            }

            let db = AdminRegistry::load_from_file(&registry).await?;
            if db.emails.is_empty() {
                println!("No administrators registered");
            } else {
                println!("Registered administrators:");
                for email in &db.emails {
                    println!("  {}", email);
                }
            }
        }
        AdminCommands::Add { email, registry } => {
            let mut db = if registry.exists() {
                AdminRegistry::load_from_file(&registry).await?
            } else {
                println!("Creating new administrator registry at: {:?}", registry);
                AdminRegistry::new()
            };

            if !db.add(&email) {
                eprintln!("Error: '{}' is already registered", email.trim());
                std::process::exit(1);
            }

            db.save_to_file(&registry).await?;
            println!("Registered administrator '{}'", email.trim().to_lowercase());
        }
        AdminCommands::Remove { email, registry } => {
            if !registry.exists() {
                eprintln!("Error: No administrator registry found at: {:?}", registry);
                std::process::exit(1);
            }

            let mut db = AdminRegistry::load_from_file(&registry).await?;
            if db.remove(&email) {
                db.save_to_file(&registry).await?;
                println!("Removed administrator '{}'", email.trim());
            } else {
                eprintln!("Error: '{}' is not registered", email.trim());
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn run_server(
    config_path: PathBuf,
    port: Option<u16>,
    host: Option<String>,
    quit_after: Option<u64>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = if config_path.exists() {
        let config_content = std::fs::read_to_string(&config_path)?;
        toml_edit::de::from_str::<Config>(&config_content)?
    } else {
        info!("Config file not found at {:?}, using defaults", config_path);
        Config::default()
    };

    let host = host.unwrap_or(config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info!("Starting {} server", config.app.name);
    info!("Configuration loaded from: {:?}", config_path);
    info!("Blog documents: {:?}", config.blog.data_file);
    info!("Uploads directory: {:?}", config.uploads.directory);
    info!("Administrator registry: {:?}", config.admin.registry_file);

    match startup_checks::perform_startup_checks(&config).await {
        Ok(()) => {}
        Err(errors) => {
            for error in &errors {
                tracing::error!("Startup check failed: {}", error);
            }
            // Missing directories are fatal: neither the store nor the
            // upload pipeline can function without them
            let critical_error = errors.iter().any(|e| {
                matches!(
                    e,
                    startup_checks::StartupCheckError::DataDirectoryCreationFailed(_)
                        | startup_checks::StartupCheckError::UploadsDirectoryCreationFailed(_)
                )
            });

            if critical_error {
                tracing::error!("Critical startup check failed, exiting");
                return Err("Critical startup check failed".into());
            } else {
                tracing::warn!("Non-critical startup checks failed, continuing");
            }
        }
    }

    let state = AppState::initialize(config).await?;
    let store = state.store.clone();
    let app = create_app(state);

    // Durability: flush the document store every 5 minutes and on shutdown
    BlogStore::start_periodic_save(store.clone(), 5);

    let addr = SocketAddr::from((host.parse::<std::net::IpAddr>()?, port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let app = app.into_make_service_with_connect_info::<SocketAddr>();

    let server = axum::serve(listener, app);
    let graceful = server.with_graceful_shutdown(shutdown_signal(quit_after));

    if let Err(e) = graceful.await {
        tracing::error!("Server error: {}", e);
    }

    info!("Shutting down - saving document store...");
    if let Err(e) = store.save().await {
        tracing::error!("Failed to save document store on shutdown: {}", e);
    } else {
        info!("Document store saved successfully");
    }

    Ok(())
}

async fn shutdown_signal(quit_after: Option<u64>) {
    use tokio::signal;
    use tokio::time::{Duration, sleep};

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let quit_timer = async {
        if let Some(seconds) = quit_after {
            info!(
                "Server will automatically shut down after {} seconds",
                seconds
            );
            sleep(Duration::from_secs(seconds)).await;
            info!("Quit timer expired, shutting down");
        } else {
            std::future::pending::<()>().await
        }
    };

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        },
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        },
        _ = quit_timer => {},
    }
}
