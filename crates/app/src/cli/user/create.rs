use clap::Args;
use ostrum_app::domain::accounts::data::SignIn;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Steam ID the account signs in with
    #[arg(long)]
    steam_id: String,

    /// Display name
    #[arg(long)]
    nickname: String,

    /// Avatar image URL
    #[arg(long)]
    avatar_url: Option<String>,

    /// Create the account with the admin role
    #[arg(long)]
    admin: bool,
}

impl CreateUserArgs {
    fn identity(&self) -> SignIn {
        SignIn {
            steam_id: self.steam_id.trim().to_string(),
            nickname: self.nickname.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }

    fn promoted_steam_ids(&self) -> Vec<String> {
        if self.admin {
            vec![self.steam_id.trim().to_string()]
        } else {
            Vec::new()
        }
    }
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    if args.steam_id.trim().is_empty() {
        return Err("steam id cannot be empty".to_string());
    }

    let ctx = args
        .database
        .context_promoting(args.promoted_steam_ids())
        .await?;

    let user = ctx
        .accounts
        .sign_in(args.identity())
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("steam_id: {}", user.steam_id);
    println!("nickname: {}", user.nickname);
    println!("role: {}", user.role.as_str());
    println!("referral_code: {}", user.referral_code);

    Ok(())
}
