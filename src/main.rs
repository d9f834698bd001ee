use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studymate::cli::commands;
use studymate::cli::ui::Output;

#[derive(Parser)]
#[command(name = "studymate")]
#[command(
    version,
    about = "AI study assistant: worksheets, video suggestions and chat"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a practice worksheet with an answer key
    Worksheet {
        #[arg(long, help = "Subject, e.g. Math")]
        subject: String,
        #[arg(long, help = "Grade level, e.g. 5th")]
        grade: String,
        #[arg(long, help = "Topic, e.g. Fractions")]
        topic: String,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Suggest educational videos for a topic
    Videos {
        #[arg(help = "What to learn about")]
        query: String,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Ask the study assistant a question
    Chat {
        #[arg(help = "Your question")]
        message: String,
    },

    /// Manage your learner account
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Create an account and receive a verification code
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "STUDYMATE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Confirm an email address
    Verify {
        #[arg(long)]
        email: String,
        #[arg(long, required_unless_present = "resend")]
        code: Option<String>,
        #[arg(long, help = "Issue a new code instead of verifying")]
        resend: bool,
    },
    /// Log in; the session persists until logout
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "STUDYMATE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Record learning preferences for the logged-in user
    #[command(after_help = commands::account::survey_choices())]
    Survey {
        #[arg(long)]
        grade: String,
        #[arg(long = "subject", required = true, help = "Repeat for several subjects")]
        subjects: Vec<String>,
        #[arg(long)]
        style: String,
        #[arg(long = "interest", required = true, help = "Repeat for several interests")]
        interests: Vec<String>,
    },
    /// Show the logged-in user
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },
    /// End the current session
    Logout,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mStudyMate encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Output::new().error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Worksheet {
            subject,
            grade,
            topic,
            format,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(commands::worksheet::run(&subject, &grade, &topic, &format))?;
        }
        Commands::Videos { query, format } => {
            let rt = Runtime::new()?;
            rt.block_on(commands::videos::run(&query, &format))?;
        }
        Commands::Chat { message } => {
            let rt = Runtime::new()?;
            rt.block_on(commands::chat::run(&message))?;
        }
        Commands::Account { action } => match action {
            AccountAction::Register {
                name,
                email,
                password,
            } => commands::account::register(&name, &email, &password)?,
            AccountAction::Verify {
                email,
                code,
                resend,
            } => commands::account::verify(&email, code.as_deref(), resend)?,
            AccountAction::Login { email, password } => {
                commands::account::login(&email, &password)?
            }
            AccountAction::Survey {
                grade,
                subjects,
                style,
                interests,
            } => commands::account::survey(&grade, subjects, &style, interests)?,
            AccountAction::Show { format } => commands::account::show(&format)?,
            AccountAction::Logout => commands::account::logout()?,
        },
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => {
                commands::config::show(global, &format)?;
            }
            ConfigAction::Path => {
                commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                if global {
                    commands::config::init_global(force)?;
                } else {
                    commands::config::init_project(force)?;
                }
            }
        },
    }

    Ok(())
}
