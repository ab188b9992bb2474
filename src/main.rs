mod commands;
mod state;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use journal_client::storage::preferences::{Language, Role};
use journal_client::ClientConfig;

use state::{AppState, TokenBackend};

#[derive(Parser, Debug)]
#[command(name = "journal-cli", about = "Command-line client for the journal portal API")]
struct Args {
    /// API base URL or path (overrides JOURNAL_API_BASE / VITE_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Origin the API base is resolved against (overrides JOURNAL_ORIGIN)
    #[arg(long, global = true)]
    origin: Option<String>,

    /// Log request and response bodies at debug level
    #[arg(long, global = true)]
    debug_bodies: bool,

    /// Directory for persisted session and preferences
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Keep tokens in the system keychain instead of the state directory
    #[arg(long, global = true)]
    keychain: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with username (or e-mail) and password
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the current user
    Me,
    /// List roles granted to the current user
    Roles,
    /// List notifications
    Notifications {
        #[arg(long)]
        unread: bool,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Mark a notification as read
    ReadNotification { id: i64 },
    /// Upload a file to storage
    Upload { path: PathBuf },
    /// List journal volumes
    Volumes {
        /// Use the public archive (no login needed)
        #[arg(long)]
        public: bool,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Show or change local preferences
    Prefs {
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        low_vision: Option<bool>,
        #[arg(long)]
        lang: Option<Language>,
    },
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(ref base) = self.api_base {
            config = config.with_api_base(base.clone());
        }
        if let Some(ref origin) = self.origin {
            config = config.with_runtime_origin(origin.clone());
        }
        if self.debug_bodies {
            config = config.with_log_bodies(true);
        }
        if let Some(ref dir) = self.state_dir {
            config = config.with_state_dir(dir.clone());
        }
        config
    }

    fn token_backend(&self) -> TokenBackend {
        if self.keychain {
            TokenBackend::Keychain
        } else {
            TokenBackend::File
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    env_logger::init();

    let args = Args::parse();
    let config = args.client_config();

    match run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, config: ClientConfig) -> Result<(), String> {
    let state = AppState::new(&config, args.token_backend())?;

    match args.command {
        Command::Login { username, password } => {
            commands::login(&state, username, password).await
        }
        Command::Logout => commands::logout(&state).await,
        Command::Me => commands::me(&state).await,
        Command::Roles => commands::roles(&state).await,
        Command::Notifications { unread, limit } => {
            commands::list_notifications(&state, unread, limit).await
        }
        Command::ReadNotification { id } => commands::read_notification(&state, id).await,
        Command::Upload { path } => commands::upload(&state, &path).await,
        Command::Volumes { public, year } => commands::list_volumes(&state, public, year).await,
        Command::Prefs {
            role,
            low_vision,
            lang,
        } => commands::prefs(&state, role, low_vision, lang),
    }
}
