//! taskdeck — command-line client for the task service.
//!
//! Configuration via CLI flags, environment variables, or config file
//! (`~/.config/taskdeck/config.toml`).
//!
//! ```bash
//! # Log in (stores the session token under ~/.config/taskdeck/token)
//! taskdeck --api-url https://tasks.example.com/api login \
//!     --email alice@example.com --password secret
//!
//! # List pending tasks
//! taskdeck task list --status pending
//!
//! # Create and assign
//! taskdeck task create --title "Replace filter"
//! taskdeck task assign t42 --to u7
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use taskdeck::api::ApiClient;
use taskdeck::config::{CliArgs, ClientConfig};
use taskdeck::credentials::FileTokenStore;
use taskdeck::session::{SessionState, SessionStore};
use taskdeck::tasks::TaskStore;
use taskdeck_model::auth::Registration;
use taskdeck_model::task::{Task, TaskDraft, TaskId, TaskPatch, TaskStatus};
use taskdeck_model::team::{Team, TeamDraft, TeamId};
use taskdeck_model::user::{User, UserId};

#[derive(Parser, Debug)]
#[command(version, about = "Command-line client for the taskdeck task service")]
struct Cli {
    #[command(flatten)]
    args: CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session token.
    Login {
        /// Login email address.
        #[arg(long)]
        email: String,
        /// Password.
        #[arg(long)]
        password: String,
    },
    /// Register a new account and log it in.
    Register {
        /// Display name.
        #[arg(long)]
        name: String,
        /// Login email address.
        #[arg(long)]
        email: String,
        /// Password.
        #[arg(long)]
        password: String,
        /// Contact phone number.
        #[arg(long)]
        phone: String,
    },
    /// Discard the stored session.
    Logout,
    /// Show the currently logged-in user.
    Whoami,
    /// Task operations.
    #[command(subcommand)]
    Task(TaskCommand),
    /// Team operations.
    #[command(subcommand)]
    Team(TeamCommand),
    /// Send a task notification to a user.
    #[command(subcommand)]
    Notify(NotifyCommand),
}

#[derive(Subcommand, Debug)]
enum TaskCommand {
    /// List tasks, optionally filtered.
    List {
        /// Only tasks in this status (pending, in_progress, completed).
        #[arg(long)]
        status: Option<TaskStatus>,
        /// Only tasks assigned to this user id.
        #[arg(long)]
        assigned_to: Option<String>,
    },
    /// Show one task.
    Show {
        /// Task id.
        id: String,
    },
    /// Create a task.
    Create {
        /// Task title.
        #[arg(long)]
        title: String,
        /// Optional description.
        #[arg(long)]
        description: Option<String>,
        /// Optional initial status.
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Update fields of a task; omitted fields are left untouched.
    Update {
        /// Task id.
        id: String,
        /// Replacement title.
        #[arg(long)]
        title: Option<String>,
        /// Replacement description.
        #[arg(long)]
        description: Option<String>,
        /// Replacement status.
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Delete a task.
    Delete {
        /// Task id.
        id: String,
    },
    /// Assign a task to a user.
    Assign {
        /// Task id.
        id: String,
        /// User id of the assignee.
        #[arg(long = "to")]
        user: String,
    },
    /// Attach a photo to a task.
    UploadPhoto {
        /// Task id.
        id: String,
        /// Path to the image file.
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum TeamCommand {
    /// List teams.
    List,
    /// Create a team.
    Create {
        /// Team name.
        #[arg(long)]
        name: String,
    },
    /// List the members of a team.
    Members {
        /// Team id.
        id: String,
    },
    /// Add a user to a team.
    AddMember {
        /// Team id.
        id: String,
        /// User id to add.
        #[arg(long)]
        user: String,
    },
}

#[derive(Subcommand, Debug)]
enum NotifyCommand {
    /// Send an email notification about a task.
    Email {
        /// Task id the notification refers to.
        #[arg(long)]
        task: String,
        /// User id of the recipient.
        #[arg(long)]
        recipient: String,
    },
    /// Send an SMS notification about a task.
    Sms {
        /// Task id the notification refers to.
        #[arg(long)]
        task: String,
        /// User id of the recipient.
        #[arg(long)]
        recipient: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.args.log_level);

    let config = ClientConfig::load(&cli.args).context("failed to load configuration")?;
    let Some(api_config) = config.to_api_config() else {
        bail!(
            "no API base URL configured; pass --api-url, set TASKDECK_API_URL, \
             or add [api] base_url to the config file"
        );
    };

    let credentials = Arc::new(FileTokenStore::new(config.token_path()?));
    let api = ApiClient::new(&api_config, Arc::clone(&credentials))?;

    match cli.command {
        Command::Login { email, password } => {
            let session = SessionStore::new(api, credentials);
            let user = session.login(&email, &password).await?;
            print_user(&user);
        }
        Command::Register {
            name,
            email,
            password,
            phone,
        } => {
            let session = SessionStore::new(api, credentials);
            let registration = Registration {
                name,
                email,
                password,
                phone,
            };
            let user = session.register(&registration).await?;
            print_user(&user);
        }
        Command::Logout => {
            let session = SessionStore::new(api, credentials);
            session.logout().await;
            println!("Logged out");
        }
        Command::Whoami => {
            let session = SessionStore::new(api, credentials);
            session.restore().await;
            match session.state() {
                SessionState::Authenticated(user) => print_user(&user),
                _ => bail!("not logged in; run `taskdeck login` first"),
            }
        }
        Command::Task(command) => run_task_command(api, command).await?,
        Command::Team(command) => run_team_command(&api, command).await?,
        Command::Notify(command) => run_notify_command(&api, command).await?,
    }

    Ok(())
}

async fn run_task_command(api: ApiClient<FileTokenStore>, command: TaskCommand) -> Result<()> {
    match command {
        TaskCommand::List {
            status,
            assigned_to,
        } => {
            let mut filters = Vec::new();
            if let Some(status) = status {
                filters.push(("status".to_string(), status.to_string()));
            }
            if let Some(user) = assigned_to {
                filters.push(("assigned_to".to_string(), user));
            }

            let store = TaskStore::new(api);
            store.fetch_all(&filters).await?;
            let items = store.snapshot().items;
            if items.is_empty() {
                println!("No tasks");
            }
            for task in &items {
                print_task(task);
            }
        }
        TaskCommand::Show { id } => {
            let task = api.get_task(&TaskId::new(id)).await?;
            print_task_details(&task);
        }
        TaskCommand::Create {
            title,
            description,
            status,
        } => {
            let store = TaskStore::new(api);
            let draft = TaskDraft {
                title,
                description,
                status,
                assigned_to: None,
            };
            let task = store.create(&draft).await?;
            println!("Created task {}", task.id);
        }
        TaskCommand::Update {
            id,
            title,
            description,
            status,
        } => {
            let store = TaskStore::new(api);
            let patch = TaskPatch {
                title,
                description,
                status,
                assigned_to: None,
            };
            let task = store.update(&TaskId::new(id), &patch).await?;
            print_task(&task);
        }
        TaskCommand::Delete { id } => {
            let store = TaskStore::new(api);
            store.delete(&TaskId::new(&id)).await?;
            println!("Deleted task {id}");
        }
        TaskCommand::Assign { id, user } => {
            let store = TaskStore::new(api);
            let task = store.assign(&TaskId::new(id), &UserId::new(user)).await?;
            print_task(&task);
        }
        TaskCommand::UploadPhoto { id, file } => {
            let photo = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let task = api.upload_task_photo(&TaskId::new(id), photo).await?;
            match task.photo_url {
                Some(url) => println!("Uploaded photo: {url}"),
                None => println!("Uploaded photo"),
            }
        }
    }
    Ok(())
}

async fn run_team_command(api: &ApiClient<FileTokenStore>, command: TeamCommand) -> Result<()> {
    match command {
        TeamCommand::List => {
            let teams = api.list_teams().await?;
            if teams.is_empty() {
                println!("No teams");
            }
            for team in &teams {
                print_team(team);
            }
        }
        TeamCommand::Create { name } => {
            let team = api.create_team(&TeamDraft { name }).await?;
            println!("Created team {}", team.id);
        }
        TeamCommand::Members { id } => {
            let members = api.team_members(&TeamId::new(id)).await?;
            if members.is_empty() {
                println!("No members");
            }
            for member in &members {
                print_user(member);
            }
        }
        TeamCommand::AddMember { id, user } => {
            let team = api
                .add_team_member(&TeamId::new(id), &UserId::new(user))
                .await?;
            print_team(&team);
        }
    }
    Ok(())
}

async fn run_notify_command(api: &ApiClient<FileTokenStore>, command: NotifyCommand) -> Result<()> {
    match command {
        NotifyCommand::Email { task, recipient } => {
            api.send_email_notification(&TaskId::new(task), &UserId::new(recipient))
                .await?;
            println!("Email notification sent");
        }
        NotifyCommand::Sms { task, recipient } => {
            api.send_sms_notification(&TaskId::new(task), &UserId::new(recipient))
                .await?;
            println!("SMS notification sent");
        }
    }
    Ok(())
}

/// Initialize stderr logging; `RUST_LOG` overrides the CLI level.
fn init_logging(level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_user(user: &User) {
    println!("{}  {} <{}>  {}", user.id, user.name, user.email, user.role);
}

fn print_task(task: &Task) {
    let status = task.status.to_string();
    let assignee = task.assigned_to.as_ref().map_or("-", UserId::as_str);
    println!("{}  {status:<12} {assignee:<10} {}", task.id, task.title);
}

fn print_task_details(task: &Task) {
    print_task(task);
    if let Some(description) = &task.description {
        println!("  {description}");
    }
    if let Some(url) = &task.photo_url {
        println!("  photo: {url}");
    }
    println!("  created {}  updated {}", task.created_at, task.updated_at);
}

fn print_team(team: &Team) {
    println!("{}  {}  ({} members)", team.id, team.name, team.members.len());
}
