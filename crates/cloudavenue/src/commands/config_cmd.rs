//! Config command handlers. These never contact the console.

use cloudavenue_config::{self as config, Settings};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, settings: &Settings, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let shown = settings.redacted();
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => shown.to_toml()?,
                _ => output::render_single(&global.output, &shown, |_| String::new(), |_| String::new()),
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            let path = global.config.clone().unwrap_or_else(config::config_path);
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let org = settings.organization()?;
            let username = settings.user()?;
            let password = dialoguer::Password::new()
                .with_prompt(format!("Password for {username}@{org}"))
                .interact()
                .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
            config::store_password(org, username, &password)?;
            output::status(
                &format!("Password for {username}@{org} stored in the system keyring"),
                global.quiet,
            );
            Ok(())
        }
    }
}
