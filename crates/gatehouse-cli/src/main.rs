use chrono::Utc;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use gatehouse_config::jwt::DEFAULT_TOKEN_LIFETIME_SECS;

#[derive(Parser)]
#[command(name = "gatehouse-cli")]
#[command(about = "Gatehouse CLI - issue, verify and inspect bearer tokens", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a signed token
    Issue {
        /// Subject (prompted if not provided)
        #[arg(short = 's', long)]
        sub: Option<String>,

        /// Extra claim as name=value, repeatable
        #[arg(short = 'c', long = "claim")]
        claims: Vec<String>,

        /// Lifetime in seconds (defaults to JWT_TOKEN_LIFETIME, then 900)
        #[arg(short = 'l', long)]
        lifetime: Option<i64>,

        /// Signing secret (defaults to JWT_SECRET, prompted securely otherwise)
        #[arg(long)]
        secret: Option<String>,
    },
    /// Verify a token's algorithm, signature and expiry
    Verify {
        token: String,

        /// Signing secret (defaults to JWT_SECRET, prompted securely otherwise)
        #[arg(long)]
        secret: Option<String>,

        /// Seconds of clock skew tolerated past `exp`
        #[arg(long, default_value = "0")]
        leeway: u64,

        /// Reject tokens without a numeric `exp`
        #[arg(long)]
        require_exp: bool,
    },
    /// Decode a token without verifying it
    Inspect { token: String },
}

fn main() {
    dotenv().ok();
    gatehouse_observability::init_console_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Issue {
            sub,
            claims,
            lifetime,
            secret,
        } => handle_issue(sub, claims, lifetime, secret),
        Commands::Verify {
            token,
            secret,
            leeway,
            require_exp,
        } => handle_verify(token, secret, leeway, require_exp),
        Commands::Inspect { token } => gatehouse_cli::inspect(&token, Utc::now()),
    };

    match result {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn handle_issue(
    sub: Option<String>,
    claims: Vec<String>,
    lifetime: Option<i64>,
    secret: Option<String>,
) -> anyhow::Result<String> {
    let sub = match sub {
        Some(s) => s,
        None => Input::new().with_prompt("Subject").interact_text()?,
    };

    let lifetime = match lifetime {
        Some(l) => l,
        None => std::env::var("JWT_TOKEN_LIFETIME")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS),
    };

    let secret = resolve_secret(secret)?;
    gatehouse_cli::issue(&secret, &sub, &claims, lifetime, Utc::now())
}

fn handle_verify(
    token: String,
    secret: Option<String>,
    leeway: u64,
    require_exp: bool,
) -> anyhow::Result<String> {
    let secret = resolve_secret(secret)?;
    gatehouse_cli::verify(&secret, &token, leeway, require_exp, Utc::now())
}

fn resolve_secret(secret: Option<String>) -> anyhow::Result<String> {
    if let Some(secret) = secret {
        return Ok(secret);
    }
    if let Some(secret) = std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty()) {
        return Ok(secret);
    }
    Ok(Password::new().with_prompt("Signing secret").interact()?)
}
