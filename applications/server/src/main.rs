/// Speakerbox Server - shared sound library with server-side playback
use clap::{Parser, Subcommand};
use speakerbox_playback::{PlaybackInvoker, PlayerRegistry};
use speakerbox_server::{
    api::auth::normalize_email,
    config::ServerConfig,
    create_router,
    services::{AuthService, FileStorage},
    state::AppState,
};
use speakerbox_storage::{users, Database};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "speakerbox-server")]
#[command(about = "Speakerbox sound library server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SPEAKERBOX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user
    AddUser {
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
        /// Display name
        #[arg(short, long)]
        full_name: Option<String>,
    },
    /// List all users
    ListUsers,
    /// Show the audio players known to the server
    Players,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "speakerbox_server=info,speakerbox_playback=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Serve => {
            serve(config_path).await?;
        }
        Commands::AddUser {
            email,
            password,
            full_name,
        } => {
            add_user(config_path, &email, &password, full_name).await?;
        }
        Commands::ListUsers => {
            list_users(config_path).await?;
        }
        Commands::Players => {
            list_players();
        }
    }

    Ok(())
}

async fn serve(config_path: Option<&Path>) -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load(config_path)?;
    config.validate()?;

    tracing::info!("Starting Speakerbox Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let db = Arc::new(Database::new(&config.storage.database_url).await?);
    tracing::info!("Database connected");

    // Initialize file storage
    let file_storage = FileStorage::new(
        config.storage.audio_path.clone(),
        config.storage.max_upload_bytes,
    );
    file_storage.initialize().await?;
    let file_storage = Arc::new(file_storage);
    tracing::info!(
        "Audio storage at {}",
        config.storage.audio_path.display()
    );

    // Initialize auth service
    let auth_service = Arc::new(AuthService::new(
        &config.auth.jwt_secret,
        config.auth.jwt_expiration_hours,
        config.auth.jwt_refresh_expiration_days,
    ));
    tracing::info!("Auth service initialized");

    // Initialize playback
    let playback = PlaybackInvoker::new(config.storage.audio_path.clone())
        .with_volume(config.playback.volume);
    tracing::info!(
        "Playback volume {} with players: {}",
        playback.volume(),
        playback.registry().player_names().join(", ")
    );
    let playback = Arc::new(playback);

    // Build application state
    let app_state = AppState::new(db, auth_service, file_storage, playback);

    // Build router
    let app = create_router(app_state, config.server.web_dir.clone());

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_user(
    config_path: Option<&Path>,
    email: &str,
    password: &str,
    full_name: Option<String>,
) -> anyhow::Result<()> {
    let config = ServerConfig::load(config_path)?;
    config.validate()?;
    let db = Database::new(&config.storage.database_url).await?;

    let auth_service = AuthService::new(
        &config.auth.jwt_secret,
        config.auth.jwt_expiration_hours,
        config.auth.jwt_refresh_expiration_days,
    );
    let password_hash = auth_service.hash_password(password)?;

    let user = users::create_with_password(
        db.pool(),
        users::NewUser {
            email: normalize_email(email),
            full_name,
        },
        &password_hash,
    )
    .await?;

    println!("Created user {} ({})", user.id, user.email);

    Ok(())
}

async fn list_users(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = ServerConfig::load(config_path)?;
    let db = Database::new(&config.storage.database_url).await?;

    let users = users::get_all(db.pool()).await?;

    println!("Users:");
    for user in users {
        println!(
            "  {} - {} {}",
            user.id,
            user.email,
            user.full_name.as_deref().unwrap_or_default()
        );
    }

    Ok(())
}

fn list_players() {
    let registry = PlayerRegistry::standard();

    println!("Players (in priority order):");
    for player in registry.players() {
        let status = if on_path(player.program) {
            "installed"
        } else {
            "missing"
        };
        println!(
            "  {:<8} {:<10} {}",
            player.name,
            status,
            player.extensions.join(" ")
        );
    }
}

/// Whether `program` is an executable file in one of the `PATH` directories
fn on_path(program: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(program).is_file()))
        .unwrap_or(false)
}
