//! User command handlers.

use tabled::Tabled;

use cloudavenue_core::{Client, User};

use crate::cli::{GlobalOpts, UserArgs, UserCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
    #[tabled(rename = "Locked")]
    locked: String,
}

impl UserRow {
    fn new(user: &User, color: bool) -> Self {
        Self {
            name: user.name.clone(),
            role: user.role_name.clone(),
            provider: user.provider_type.clone(),
            enabled: output::flag(user.enabled, color),
            locked: output::flag(user.locked, color),
        }
    }
}

pub async fn handle(client: &Client, args: UserArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let users = client.users();
    let color = output::should_color(&global.color);

    let changed = match args.command {
        UserCommand::List => {
            let all = users.list().await?;
            let out = output::render_list(
                &global.output,
                &all,
                |u| UserRow::new(u, color),
                |u| u.name.clone(),
            );
            output::print_output(&out, global.quiet);
            return Ok(());
        }
        UserCommand::Enable { user } => users.enable(&user).await?,
        UserCommand::Disable { user } => users.disable(&user).await?,
        UserCommand::Unlock { user } => users.unlock(&user).await?,
        UserCommand::Delete {
            user,
            take_ownership,
        } => {
            if !util::confirm(&format!("Delete user {user}?"), "user delete", global.yes)? {
                return Ok(());
            }
            users.delete(&user, take_ownership).await?;
            output::status(&format!("User {user} deleted"), global.quiet);
            return Ok(());
        }
    };

    let out = output::render_list(
        &global.output,
        std::slice::from_ref(&changed),
        |u| UserRow::new(u, color),
        |u| u.name.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
