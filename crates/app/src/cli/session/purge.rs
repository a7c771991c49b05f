use clap::Args;

use crate::cli::AuthArgs;

#[derive(Debug, Args)]
pub(crate) struct PurgeArgs {
    #[command(flatten)]
    auth: AuthArgs,
}

pub(crate) async fn run(args: PurgeArgs) -> Result<(), String> {
    let service = args.auth.connect().await?;

    let (sessions, blacklisted) = service
        .purge_expired()
        .await
        .map_err(|error| format!("failed to purge expired sessions: {error}"))?;

    println!("sessions_deleted: {sessions}");
    println!("blacklist_entries_deleted: {blacklisted}");

    Ok(())
}
