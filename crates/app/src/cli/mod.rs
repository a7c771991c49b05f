use clap::{Args, Parser, Subcommand};
use elysian_app::{
    auth::{PgAuthService, TokenIssuer, TokenSettings},
    database,
};
use jiff::SignedDuration;

mod db;
mod session;
mod user;

#[derive(Debug, Parser)]
#[command(name = "elysian-app", about = "Elysian CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(user::UserCommand),
    Session(session::SessionCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::User(command) => user::run(command).await,
            Commands::Session(command) => session::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

/// Connection settings shared by commands that go through the auth service.
#[derive(Debug, Args)]
pub(crate) struct AuthArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Secret used to sign JWTs
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// JWT issuer claim
    #[arg(long, env = "JWT_ISSUER", default_value = "elysian")]
    jwt_issuer: String,
}

impl AuthArgs {
    pub(crate) async fn connect(self) -> Result<PgAuthService, String> {
        let pool = database::connect(&self.database_url)
            .await
            .map_err(|error| format!("failed to connect to database: {error}"))?;

        let tokens = TokenIssuer::new(TokenSettings {
            secret: self.jwt_secret,
            issuer: self.jwt_issuer,
            access_ttl: SignedDuration::from_hours(1),
            refresh_ttl: SignedDuration::from_hours(7 * 24),
        });

        Ok(PgAuthService::new(
            pool,
            tokens,
            SignedDuration::from_hours(14 * 24),
        ))
    }
}
