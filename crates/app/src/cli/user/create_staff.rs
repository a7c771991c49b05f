use clap::Args;
use elysian_app::auth::{NewUser, Password};

use crate::cli::AuthArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateStaffArgs {
    #[command(flatten)]
    auth: AuthArgs,

    /// 10-digit mobile number used to log in
    #[arg(long)]
    mobile_number: String,

    /// Account password
    #[arg(long, env = "STAFF_PASSWORD", hide_env_values = true)]
    password: String,

    #[arg(long, default_value = "")]
    first_name: String,

    #[arg(long, default_value = "")]
    last_name: String,

    #[arg(long)]
    email: Option<String>,
}

pub(crate) async fn run(args: CreateStaffArgs) -> Result<(), String> {
    let service = args.auth.connect().await?;
    let password = Password::new(args.password);

    let user = service
        .create_staff_user(NewUser {
            mobile_number: args.mobile_number,
            alternate_mobile_number: None,
            password_confirm: password.clone(),
            password,
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
        })
        .await
        .map_err(|error| format!("failed to create staff user: {error}"))?;

    println!("user_id: {}", user.id);
    println!("mobile_number: {}", user.mobile_number);
    println!("is_staff: {}", user.is_staff);

    Ok(())
}
