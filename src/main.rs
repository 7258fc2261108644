use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use calcmeter::auth::UsersServiceClient;
use calcmeter::config::ServerConfig;
use calcmeter::payments::PayPalClient;
use calcmeter::server::{AppState, create_router};
use calcmeter::store::{SqliteStore, Store};
use calcmeter::tokens::SystemClock;

#[derive(Parser)]
#[command(name = "calcmeter")]
#[command(about = "Token-metered backend for the CSEC formula calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve(ServeArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// TOML configuration file. Flags and environment variables override it.
    #[arg(long, env = "CALCMETER_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long, env = "CALCMETER_HOST")]
    host: Option<String>,

    /// Port to bind to
    #[arg(long, short, env = "CALCMETER_PORT")]
    port: Option<u16>,

    /// Data directory for the database
    #[arg(long, env = "CALCMETER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Base URL of the users/session service
    #[arg(long, env = "USERS_SERVICE_API_URL")]
    users_service_url: Option<String>,

    #[arg(long, env = "USERS_SERVICE_API_KEY", hide_env_values = true)]
    users_service_key: Option<String>,

    #[arg(long, env = "PAYPAL_CLIENT_ID")]
    paypal_client_id: Option<String>,

    #[arg(long, env = "PAYPAL_CLIENT_SECRET", hide_env_values = true)]
    paypal_client_secret: Option<String>,

    /// PayPal REST base URL, e.g. the sandbox
    #[arg(long, env = "PAYPAL_API_BASE")]
    paypal_api_base: Option<String>,

    /// Comma-separated emails with unlimited tokens
    #[arg(long, env = "ADMIN_EMAILS", value_delimiter = ',')]
    admin_emails: Vec<String>,

    /// Comma-separated browser origins allowed to call the API
    #[arg(long, env = "CALCMETER_ALLOWED_ORIGINS", value_delimiter = ',')]
    allowed_origins: Vec<String>,
}

impl ServeArgs {
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_toml_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => ServerConfig::default(),
        };

        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        if let Some(url) = self.users_service_url {
            config.identity.api_url = url;
        }
        if let Some(key) = self.users_service_key {
            config.identity.api_key = key;
        }
        if let Some(id) = self.paypal_client_id {
            config.paypal.client_id = id;
        }
        if let Some(secret) = self.paypal_client_secret {
            config.paypal.client_secret = secret;
        }
        if let Some(base) = self.paypal_api_base {
            config.paypal.api_base = base;
        }
        if !self.admin_emails.is_empty() {
            config.admin_emails = self.admin_emails;
        }
        if !self.allowed_origins.is_empty() {
            config.allowed_origins = self.allowed_origins;
        }

        Ok(config)
    }
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Create the database and schema
    Init {
        /// Data directory for the database
        #[arg(long, env = "CALCMETER_DATA_DIR", default_value = "./data")]
        data_dir: PathBuf,
    },

    /// Show the stored balance row for a user
    Balance {
        #[arg(long, env = "CALCMETER_DATA_DIR", default_value = "./data")]
        data_dir: PathBuf,

        #[arg(long)]
        user_id: String,
    },

    /// Print a user's token ledger, newest first
    Ledger {
        #[arg(long, env = "CALCMETER_DATA_DIR", default_value = "./data")]
        data_dir: PathBuf,

        #[arg(long)]
        user_id: String,

        /// Maximum number of rows
        #[arg(long, default_value = "50")]
        limit: i32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn open_existing_store(data_dir: &std::path::Path) -> anyhow::Result<SqliteStore> {
    let db_path = data_dir.join("calcmeter.db");
    if !db_path.exists() {
        anyhow::bail!(
            "No database at {}. Run 'calcmeter admin init' first.",
            db_path.display()
        );
    }
    Ok(SqliteStore::new(&db_path)?)
}

fn run_init(data_dir: PathBuf) -> anyhow::Result<()> {
    fs::create_dir_all(&data_dir)?;

    let db_path = data_dir.join("calcmeter.db");
    let existed = db_path.exists();
    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;

    if existed {
        println!("Database already initialized at {}", db_path.display());
    } else {
        println!("Initialized database at {}", db_path.display());
    }
    Ok(())
}

fn run_balance(data_dir: PathBuf, user_id: String) -> anyhow::Result<()> {
    let store = open_existing_store(&data_dir)?;

    match store.get_balance(&user_id)? {
        Some(balance) => {
            println!("User:         {}", balance.user_id);
            println!("Tokens:       {}", balance.token_count);
            println!("Last refresh: {}", balance.last_refresh_date);
            println!("Updated:      {}", balance.updated_at.to_rfc3339());
        }
        None => println!("No balance recorded for '{user_id}'"),
    }
    Ok(())
}

fn run_ledger(data_dir: PathBuf, user_id: String, limit: i32, json: bool) -> anyhow::Result<()> {
    let store = open_existing_store(&data_dir)?;
    let transactions = store.list_transactions(&user_id, None, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&transactions)?);
        return Ok(());
    }

    if transactions.is_empty() {
        println!("No transactions for '{user_id}'");
        return Ok(());
    }

    for t in &transactions {
        let price = t
            .price_paid
            .map(|p| format!("{p:.2}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>6}  {}  {:<8}  {:>6}  {:>8}  {}",
            t.id,
            t.created_at.to_rfc3339(),
            t.transaction_type.as_str(),
            t.token_amount,
            price,
            t.external_transaction_id.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

async fn run_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = args.into_config()?;
    config.validate()?;

    fs::create_dir_all(&config.data_dir)?;
    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;

    let identity = UsersServiceClient::new(&config.identity)?;
    let payments = PayPalClient::new(&config.paypal)?;
    let admins = config.admin_list();

    info!(
        "{} admin account(s), PayPal at {}",
        admins.len(),
        config.paypal.api_base
    );

    let state = AppState::new(
        Arc::new(store),
        admins,
        Arc::new(SystemClock),
        Arc::new(identity),
        Arc::new(payments),
    )
    .with_allowed_origins(config.allowed_origins.clone());

    let app = create_router(Arc::new(state));
    let addr = config.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("calcmeter=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init { data_dir } => run_init(data_dir)?,
            AdminCommands::Balance { data_dir, user_id } => run_balance(data_dir, user_id)?,
            AdminCommands::Ledger {
                data_dir,
                user_id,
                limit,
                json,
            } => run_ledger(data_dir, user_id, limit, json)?,
        },
        Commands::Serve(args) => run_serve(args).await?,
    }

    Ok(())
}
