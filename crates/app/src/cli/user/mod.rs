use clap::{Args, Subcommand};

mod create_staff;

#[derive(Debug, Args)]
pub(crate) struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    CreateStaff(create_staff::CreateStaffArgs),
}

pub(crate) async fn run(command: UserCommand) -> Result<(), String> {
    match command.command {
        UserSubcommand::CreateStaff(args) => create_staff::run(args).await,
    }
}
