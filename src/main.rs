use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::*;

use crate::{
    models::project::ProjectStatus,
    services::{
        email::LogMailer,
        projects::{
            CreateProjectParameters, UpdateProjectParameters, create_project, delete_project,
            update_project,
        },
        users::{
            RegisterParameters, begin_password_reset, complete_password_reset, register_user,
        },
    },
    storage::connector::{DataConfig, RecordStore},
    timeline::TimelineGrid,
};

mod models;
mod services;
mod storage;
mod timeline;
mod ui;

/// Attempts allowed when typing the emailed reset code
const MAX_CODE_ATTEMPTS: u32 = 3;

#[derive(Parser)]
#[command(
    name = "procheck",
    about = "A flat-file project manager with kanban and gantt views"
)]
struct Cli {
    /// Directory holding the projects/users/notifications documents
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Acting username recorded in the notification log
    #[arg(long, global = true, default_value = "local")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Register {
        name: String,
        email: String,
        username: String,
        password: String,

        /// Phone number
        #[arg(long, default_value = "")]
        phone: String,

        /// Avatar image path
        #[arg(long)]
        avatar: Option<String>,
    },

    /// Check credentials against the stored digest
    Login { username: String, password: String },

    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Show projects grouped by status
    Kanban,

    /// Render the project timeline
    Gantt {
        /// Number of days in the visible window
        #[arg(long, default_value_t = 30)]
        days: usize,

        /// Characters per day column
        #[arg(long, default_value_t = 4)]
        cell_width: i64,

        /// Scroll the window by this many days (negative = earlier)
        #[arg(long, default_value_t = 0)]
        offset: i64,

        /// Anchor date (default: earliest project start minus lookback)
        #[arg(long)]
        anchor: Option<String>,
    },

    /// Show the notification log
    Notifications,

    /// Reset a forgotten password via an emailed code
    ResetPassword { email: String },
}

#[derive(Debug, Subcommand)]
enum ProjectCommands {
    /// Create a new project
    Add {
        name: String,

        #[arg(short, long)]
        manager: String,

        /// Assignee username (can be used multiple times)
        #[arg(short, long, action = clap::ArgAction::Append)]
        assignee: Vec<String>,

        #[arg(long, default_value = "Open")]
        status: String,

        #[arg(long, default_value_t = 0)]
        progress: i64,

        #[arg(long)]
        start: String,

        #[arg(long)]
        end: String,

        /// Bar color as "#RRGGBB"
        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        priority: Option<String>,

        #[arg(long, default_value = "")]
        description: String,

        /// Project id this one depends on
        #[arg(long, default_value = "")]
        dependency: String,

        #[arg(long, default_value = "")]
        estimated_time: String,
    },

    /// List all projects
    List,

    /// Show one project in detail
    Show { id: String },

    /// Update fields of a project
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        manager: Option<String>,

        /// Replace the assignee list (can be used multiple times)
        #[arg(short, long, action = clap::ArgAction::Append)]
        assignee: Vec<String>,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        progress: Option<i64>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        priority: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        dependency: Option<String>,

        #[arg(long)]
        estimated_time: Option<String>,
    },

    /// Delete a project
    Delete { id: String },
}

fn main() {
    pretty_env_logger::init();

    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("procheck")
    });
    std::fs::create_dir_all(&data_dir).unwrap_or_else(|e| {
        eprintln!("Error: Failed to create data directory: {}", e);
        std::process::exit(1);
    });

    let store = RecordStore::new(DataConfig::in_dir(&data_dir));
    let mailer = LogMailer;

    match cli.command {
        Commands::Register {
            name,
            email,
            username,
            password,
            phone,
            avatar,
        } => {
            let result = register_user(
                &store,
                RegisterParameters {
                    name,
                    email,
                    phone,
                    username: username.clone(),
                    password,
                    avatar,
                },
            );
            match result {
                Ok(()) => println!("Account '{}' created", username.bold()),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Login { username, password } => match store.login(&username, &password) {
            Some(user) => println!("Welcome, {}!", user.name.bold()),
            None => {
                eprintln!("{}", "Login failed. Check your username and password.".red());
                std::process::exit(1);
            }
        },
        Commands::Project(project_command) => {
            run_project_command(&store, &mailer, &cli.user, project_command)
        }
        Commands::Kanban => {
            let projects = store.all_projects();
            if projects.is_empty() {
                println!("No projects yet");
            } else {
                ui::render_view_header("Kanban", projects.len());
                ui::render_kanban(&projects);
            }
        }
        Commands::Gantt {
            days,
            cell_width,
            offset,
            anchor,
        } => {
            let projects = store.all_projects();
            let mut grid = match anchor {
                Some(text) => match timeline::try_parse_date(&text) {
                    Some(date) => TimelineGrid::new(date, days, cell_width),
                    None => {
                        eprintln!("Error: '{}' is not a recognized date", text);
                        std::process::exit(1);
                    }
                },
                None => TimelineGrid::from_projects(&projects, days, cell_width),
            };
            grid.shift(offset);

            ui::render_view_header("Gantt", projects.len());
            ui::render_gantt(&grid, &projects);
        }
        Commands::Notifications => {
            let notifications = store.notifications();
            if notifications.is_empty() {
                println!("No notifications");
            } else {
                println!();
                for notification in &notifications {
                    ui::render_notification_line(notification);
                }
            }
        }
        Commands::ResetPassword { email } => {
            let code = match begin_password_reset(&store, &mailer, &email) {
                Ok(code) => code,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            let mut attempts = 0;
            let supplied = loop {
                let entered = prompt("Enter the code sent to your email");
                if entered == code {
                    break entered;
                }
                attempts += 1;
                if attempts >= MAX_CODE_ATTEMPTS {
                    eprintln!("{}", "Too many incorrect codes.".red());
                    std::process::exit(1);
                }
                println!(
                    "Code does not match ({} attempts left)",
                    MAX_CODE_ATTEMPTS - attempts
                );
            };

            let new_password = prompt("New password");
            match complete_password_reset(&store, &email, &code, &supplied, &new_password) {
                Ok(()) => println!("Password updated"),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn run_project_command(
    store: &RecordStore,
    mailer: &LogMailer,
    actor: &str,
    command: ProjectCommands,
) {
    match command {
        ProjectCommands::Add {
            name,
            manager,
            assignee,
            status,
            progress,
            start,
            end,
            color,
            priority,
            description,
            dependency,
            estimated_time,
        } => {
            let status = parse_status(&status);
            let result = create_project(
                store,
                mailer,
                actor,
                CreateProjectParameters {
                    name,
                    manager,
                    assignees: assignee,
                    status,
                    progress,
                    start_date: start,
                    end_date: end,
                    color,
                    priority,
                    description,
                    dependency,
                    estimated_time,
                },
            );
            match result {
                Ok(project) => {
                    println!("Created {}", project.project_id.bold());
                    ui::render_project_line(&project);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        ProjectCommands::List => {
            let projects = store.all_projects();
            if projects.is_empty() {
                println!("No projects yet");
            } else {
                ui::render_view_header("Projects", projects.len());
                for project in &projects {
                    ui::render_project_line(project);
                }
            }
        }
        ProjectCommands::Show { id } => match store.project_by_id(&id) {
            Some(project) => ui::render_project_details(&project),
            None => {
                eprintln!("Error: Project '{}' not found", id);
                std::process::exit(1);
            }
        },
        ProjectCommands::Update {
            id,
            name,
            manager,
            assignee,
            status,
            progress,
            start,
            end,
            color,
            priority,
            description,
            dependency,
            estimated_time,
        } => {
            let status = status.map(|s| parse_status(&s));
            let result = update_project(
                store,
                actor,
                UpdateProjectParameters {
                    project_id: id,
                    name,
                    manager,
                    assignees: if assignee.is_empty() {
                        None
                    } else {
                        Some(assignee)
                    },
                    status,
                    progress,
                    start_date: start,
                    end_date: end,
                    color,
                    priority,
                    description,
                    dependency,
                    estimated_time,
                },
            );
            match result {
                Ok(project) => {
                    println!("Updated {}", project.project_id.bold());
                    ui::render_project_line(&project);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        ProjectCommands::Delete { id } => match delete_project(store, actor, &id) {
            Ok(project) => println!("Deleted {} ({})", project.project_id.bold(), project.name),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
    }
}

fn parse_status(text: &str) -> ProjectStatus {
    text.parse().unwrap_or_else(|e: String| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    })
}

fn prompt(label: &str) -> String {
    print!("{}: ", label);
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line).is_err() {
        return String::new();
    }
    line.trim().to_string()
}
