use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use smart_graama::config::AppConfig;
use smart_graama::error::AppError;
use smart_graama::welfare::{Role, TokenVerifier, UserId};

#[derive(Parser, Debug)]
#[command(
    name = "Smart Graama",
    about = "Run and demonstrate the panchayat welfare service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk the sample panchayat through eligibility, application and review
    Demo(DemoArgs),
    /// Mint a development bearer token for a user and role
    Token(TokenArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Load the sample schemes and residents before serving
    #[arg(long)]
    pub(crate) seed: bool,
}

#[derive(Args, Debug)]
pub(crate) struct TokenArgs {
    /// Account id placed in the token subject
    #[arg(long)]
    pub(crate) user_id: String,
    /// One of resident, officer, admin
    #[arg(long)]
    pub(crate) role: Role,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Token(args) => issue_token(args),
    }
}

fn issue_token(args: TokenArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let verifier = TokenVerifier::new(&config.identity);
    let token = verifier.issue(&UserId(args.user_id), args.role)?;
    println!("{token}");
    Ok(())
}
