use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skillpath_client::login::{sign_in, SignInOutcome};
use skillpath_client::models::task_id;
use skillpath_client::{ApiClient, ClientConfig, FileStorage, SessionStore};

#[derive(Parser)]
#[command(name = "skillpath")]
#[command(about = "Sign in, generate a learning roadmap and track its tasks")]
struct Cli {
    /// Session file (defaults to the platform data directory)
    #[arg(long, env = "ROADMAP_SESSION_FILE", global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "ROADMAP_PASSWORD")]
        password: String,
    },

    /// Sign in with email and password
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "ROADMAP_PASSWORD")]
        password: String,
        /// Open a local session if the backend rejects or is unreachable
        #[arg(long)]
        demo: bool,
    },

    /// Forget the cached session
    Logout,

    /// Show the signed-in user and roadmap progress
    Status {
        /// Refresh the profile from the backend first
        #[arg(long)]
        refresh: bool,
    },

    /// Mark a roadmap task as done (or pending with --undo)
    Toggle {
        /// Zero-based week index
        week: i64,
        /// Zero-based task index within the week
        task: i64,
        #[arg(long)]
        undo: bool,
    },

    /// Upload a résumé and generate a roadmap for a target role
    Generate {
        #[arg(short, long)]
        resume: PathBuf,
        #[arg(long)]
        role: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}=warn", env!("CARGO_CRATE_NAME")))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;
    let api = ApiClient::new(&config)?;

    let storage = match cli.session_file {
        Some(path) => FileStorage::new(path),
        None => FileStorage::default_location(),
    };
    let mut store = SessionStore::open(storage);

    match cli.command {
        Commands::Register {
            username,
            email,
            password,
        } => {
            let response = api.register(&username, &email, &password).await?;
            store.login(response.user, Some(response.token))?;
            println!("Registered and signed in as {username} <{email}>");
        }

        Commands::Login {
            email,
            password,
            demo,
        } => {
            let demo_mode = demo || config.demo_mode;
            match sign_in(&api, &mut store, &email, &password, demo_mode).await? {
                SignInOutcome::Authenticated => println!("Signed in as {email}"),
                SignInOutcome::Demo { reason } => {
                    println!("Backend login failed ({reason}); opened a demo session for {email}")
                }
            }
        }

        Commands::Logout => {
            store.logout()?;
            println!("Signed out (session file: {})", store.storage().path().display());
        }

        Commands::Status { refresh } => {
            if refresh {
                let token = store
                    .require_session()?
                    .token
                    .clone()
                    .context("Demo sessions cannot be refreshed; log in against the backend")?;
                let profile = api.me(&token).await?;
                store.login(profile, Some(token))?;
            }
            print_status(&store)?;
        }

        Commands::Toggle { week, task, undo } => {
            let user_id = store
                .require_session()?
                .user
                .id
                .clone()
                .context("Demo sessions have no server-side progress; log in against the backend")?;
            let tasks = api.toggle_task(&user_id, week, task, !undo).await?;
            store.set_completed_tasks(tasks)?;
            print_status(&store)?;
        }

        Commands::Generate { resume, role } => {
            let token = store.require_session()?.token.clone();
            println!("Generating roadmap for '{role}', this can take a while...");
            let payload = api
                .generate_roadmap(&resume, &role, token.as_deref())
                .await?;
            match token {
                Some(token) => {
                    let profile = api.save_roadmap(&token, &payload).await?;
                    store.login(profile, Some(token))?;
                }
                // Demo sessions keep the roadmap locally only
                None => store.merge_profile(&payload)?,
            }
            print_status(&store)?;
        }
    }

    Ok(())
}

fn print_status(store: &SessionStore<FileStorage>) -> Result<()> {
    let session = store.require_session()?;
    let user = &session.user;

    println!("{} <{}>", user.username, user.email);
    if let Some(role) = &user.target_role {
        println!("Target role: {role}");
    }
    if session.token.is_none() {
        println!("(demo session)");
    }

    let total = user.task_count();
    println!("Progress: {}/{} tasks", user.completed_tasks.len(), total);
    for (w, item) in user.roadmap.iter().enumerate() {
        println!("\nWeek {}: {}", item.week, item.title);
        for (t, task) in item.tasks.iter().enumerate() {
            let id = task_id(w as i64, t as i64);
            let mark = if user.completed_tasks.contains(&id) { "x" } else { " " };
            println!("  [{mark}] {w}.{t} {task}");
        }
    }
    Ok(())
}
