use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use blog_api::{ChangeUsernameRequest, LoginRequest, PostResponse};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use blog_admin::config::ClientConfig;
use blog_admin::delete::{Confirm, DeleteOutcome, DeletePostAction, Navigator, Notifier};
use blog_admin::filter::{ALL_CATEGORIES, CategoryFilter};
use blog_admin::guard::{ADMIN_POSTS_ROUTE, ADMIN_ROUTE, LOGIN_ROUTE, PLACEHOLDER, SETTINGS_ROUTE};
use blog_admin::{ApiClient, FileTokenStore, GuardDecision, Session};

#[derive(Parser)]
#[command(name = "blog-admin", version, about = "Manage the blog from a terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and store the access token. The password is read from
    /// `BLOG_ADMIN_PASSWORD` or prompted for.
    Login {
        #[arg(short, long)]
        username: String,
    },
    /// Forget the stored token
    Logout,
    /// Show the logged-in account
    Whoami,
    /// List every post, drafts included
    Posts {
        #[arg(short, long, default_value = ALL_CATEGORIES)]
        category: String,
    },
    /// Delete a post after confirmation
    Delete {
        id: Uuid,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Rename the account
    ChangeUsername {
        #[arg(long)]
        current_password: String,
        #[arg(long)]
        new_username: String,
    },
}

impl Command {
    fn route(&self) -> String {
        match self {
            Self::Login { .. } => LOGIN_ROUTE.to_string(),
            Self::Logout | Self::Whoami => ADMIN_ROUTE.to_string(),
            Self::Posts { .. } => ADMIN_POSTS_ROUTE.to_string(),
            Self::Delete { id, .. } => format!("{ADMIN_POSTS_ROUTE}/{id}"),
            Self::ChangeUsername { .. } => SETTINGS_ROUTE.to_string(),
        }
    }
}

fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

// === Terminal adapters ===

const PASSWORD_ENV: &str = "BLOG_ADMIN_PASSWORD";

fn read_answer(input: &mut impl BufRead) -> io::Result<String> {
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "y" | "yes")
}

/// Prints `message` and reads one line off the runtime's worker threads.
async fn prompt(message: String) -> io::Result<String> {
    tokio::task::spawn_blocking(move || {
        print!("{message}");
        io::stdout().flush()?;
        read_answer(&mut io::stdin().lock())
    })
    .await
    .map_err(io::Error::other)?
}

async fn login_password() -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV)
        && !password.is_empty()
    {
        return Ok(password);
    }
    prompt("Password: ".to_string())
        .await
        .context("Cannot read password")
}

struct TerminalConfirm {
    assume_yes: bool,
}

impl Confirm for TerminalConfirm {
    async fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        match prompt(format!("{message} [y/N] ")).await {
            Ok(answer) => is_yes(&answer),
            Err(e) => {
                tracing::warn!("Cannot read confirmation: {e}");
                false
            }
        }
    }
}

struct Terminal;

impl Notifier for Terminal {
    fn success(&self, message: &str) {
        println!("✅ {message}");
    }

    fn error(&self, message: &str) {
        eprintln!("❌ {message}");
    }
}

impl Navigator for Terminal {
    fn navigate(&self, route: &str) {
        tracing::debug!(route, "Navigating");
    }
}

fn print_posts(posts: &[PostResponse]) {
    if posts.is_empty() {
        println!("No posts.");
        return;
    }
    for post in posts {
        let state = if post.published { "published" } else { "draft" };
        println!(
            "{}  {:<9}  {:<12}  {}",
            post.id, state, post.category, post.title
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();

    let config = ClientConfig::from_env();
    let store = FileTokenStore::default_location().context("Cannot locate token storage")?;
    let mut session = Session::new(Arc::new(store));

    if let GuardDecision::Redirect { to } = session.enter(&cli.command.route()) {
        eprintln!("{PLACEHOLDER}");
        bail!("Not logged in. Run `blog-admin login` first ({to}).");
    }

    let client = ApiClient::new(&config).with_token(session.token());

    match cli.command {
        Command::Login { username } => {
            let password = login_password().await?;
            let response = client
                .login(&LoginRequest { username, password })
                .await?;
            session.login(&response.access_token)?;
            println!("Logged in as {}", response.user.username);
        }
        Command::Logout => {
            if let Err(e) = client.logout().await {
                tracing::warn!("Server logout failed: {e}");
            }
            session.logout()?;
            println!("Logged out");
        }
        Command::Whoami => {
            let user = client.me().await?;
            println!("{} ({})", user.username, user.id);
        }
        Command::Posts { category } => {
            let mut query = String::new();
            let mut filter = CategoryFilter::new(|value: &str| query = value.to_string());
            filter.select(&category);
            drop(filter);

            print_posts(&client.admin_posts(&query).await?);
        }
        Command::Delete { id, yes } => {
            let post = client.admin_post(id).await?.post_ref();
            let action = DeletePostAction::new(
                client,
                TerminalConfirm { assume_yes: yes },
                Terminal,
                Terminal,
            );
            match action.run(&post).await {
                DeleteOutcome::Deleted => {}
                DeleteOutcome::Declined => println!("Cancelled"),
                DeleteOutcome::Failed => bail!("Post was not deleted"),
                DeleteOutcome::AlreadyInProgress => bail!("A deletion is already running"),
            }
        }
        Command::ChangeUsername {
            current_password,
            new_username,
        } => {
            let request = ChangeUsernameRequest {
                current_password,
                new_username,
            };
            if let Err(errors) = blog_api::validation::check(&request) {
                for error in &errors {
                    eprintln!("{}: {}", error.field, error.message);
                }
                bail!("Invalid input");
            }

            let user = client.change_username(&request).await?;
            println!("Username changed to {}", user.username);
        }
    }

    Ok(())
}
