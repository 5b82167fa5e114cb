//! Certificate library command handlers.

use tabled::Tabled;

use cloudavenue_core::{Certificate, Client};

use crate::cli::{CertArgs, CertCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct CertRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Alias")]
    alias: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Certificate> for CertRow {
    fn from(c: &Certificate) -> Self {
        Self {
            id: c.id.clone(),
            alias: c.alias.clone(),
            description: util::or_dash(c.description.as_deref()).to_owned(),
        }
    }
}

fn cert_detail(c: &Certificate) -> String {
    format!(
        "ID:          {}\nAlias:       {}\nDescription: {}\n\n{}",
        c.id,
        c.alias,
        util::or_dash(c.description.as_deref()),
        c.certificate
    )
}

pub async fn handle(client: &Client, args: CertArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        CertCommand::List => {
            let certs = client.certificates().list().await?;
            let out = output::render_list(
                &global.output,
                &certs,
                |c| CertRow::from(c),
                |c| c.alias.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CertCommand::Get { cert } => {
            let cert = client.certificates().get(&cert).await?;
            let out = output::render_single(&global.output, &cert, cert_detail, |c| c.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CertCommand::Delete { cert } => {
            if !util::confirm(&format!("Delete certificate {cert}?"), "cert delete", global.yes)? {
                return Ok(());
            }
            client.certificates().delete(&cert).await?;
            output::status(&format!("Certificate {cert} deleted"), global.quiet);
            Ok(())
        }
    }
}
