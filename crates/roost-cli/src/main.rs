use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use roost_cli::{OutputFormat, commands};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "roost")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Keeps a Clica portal session signed in from your desktop",
    long_about = "Roost drives a Chrome window onto the study portal, fills the login form from \
                  stored credentials, and watches navigations to keep track of the session. \
                  Repeated failed logins purge the stored credentials."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Override the state directory (default: ~/.roost)
    #[arg(long, global = true, env = "ROOST_HOME", value_name = "DIR")]
    home: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the portal in Chrome and keep the session signed in
    Run {
        /// Path to the Chrome binary
        #[arg(long, value_name = "PATH")]
        chrome_path: Option<PathBuf>,

        /// Named Chrome profile to reuse between runs
        #[arg(long)]
        profile: Option<String>,

        /// Use a throwaway temporary profile
        #[arg(long)]
        temp: bool,

        /// Start at this URL instead of the portal base URL
        #[arg(long)]
        url: Option<String>,
    },

    /// Manage the stored portal credentials
    Creds {
        #[command(subcommand)]
        command: CredsCommands,
    },

    /// Show stored credentials state and what the next run will do
    Status,

    /// Inspect or scaffold the portal profile
    Portal {
        #[command(subcommand)]
        command: PortalCommands,
    },

    /// Generate shell completion scripts
    #[command(after_long_help = "SUPPORTED SHELLS:
    bash, zsh, fish, powershell, elvish

INSTALLATION:
    Bash:
        roost completion --shell bash >> ~/.bashrc

    Zsh:
        roost completion --shell zsh >> ~/.zshrc

    Fish:
        roost completion --shell fish > ~/.config/fish/completions/roost.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum CredsCommands {
    /// Save the user ID and password used for auto-login
    Set {
        /// Portal user ID (prompts when omitted)
        #[arg(long)]
        user: Option<String>,

        /// Portal password (prompts when omitted)
        #[arg(long)]
        password: Option<String>,

        /// Save with auto-login switched off
        #[arg(long)]
        no_auto_login: bool,
    },

    /// Show the stored record
    Show {
        /// Print the password instead of masking it
        #[arg(long)]
        reveal: bool,
    },

    /// Switch automatic login on or off
    Auto {
        #[arg(value_enum)]
        state: AutoState,
    },

    /// Delete the stored record
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum AutoState {
    On,
    Off,
}

#[derive(Subcommand)]
enum PortalCommands {
    /// Show the effective portal profile
    Show,

    /// Write the default portal profile for editing
    Init {
        /// Overwrite an existing portal file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let home = match cli.home {
        Some(ref home) => home.clone(),
        None => roost_core::default_home()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?,
    };

    // Execute the command
    match cli.command {
        Commands::Run {
            chrome_path,
            profile,
            temp,
            url,
        } => commands::run::execute(&home, chrome_path, profile, temp, url),
        Commands::Creds { command } => match command {
            CredsCommands::Set {
                user,
                password,
                no_auto_login,
            } => commands::creds::set(&home, user, password, no_auto_login),
            CredsCommands::Show { reveal } => commands::creds::show(&home, reveal),
            CredsCommands::Auto { state } => {
                commands::creds::auto(&home, matches!(state, AutoState::On))
            }
            CredsCommands::Clear { force } => commands::creds::clear(&home, force),
        },
        Commands::Status => commands::status::execute(&home, cli.format),
        Commands::Portal { command } => match command {
            PortalCommands::Show => commands::portal::show(&home, cli.format),
            PortalCommands::Init { force } => commands::portal::init(&home, force),
        },
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            commands::completion::execute(shell, &mut cmd)
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("roost=debug,roost_cli=debug,roost_core=debug,roost_session=debug,roost_browser=debug")
    } else {
        EnvFilter::new("roost=info,roost_cli=info,roost_core=warn,roost_session=warn,roost_browser=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
