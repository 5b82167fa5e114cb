// ── Certificate library ──

use cloudavenue_api::openapi::fiql_eq;
use cloudavenue_api::openapi::models::CertificateRecord;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::info;

use crate::client::Client;
use crate::error::{ApiResultExt, CoreError};
use crate::urn::{self, UrnKind};

/// A certificate stored in the organization library. Private material is
/// never read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Certificate {
    pub id: String,
    pub alias: String,
    pub description: Option<String>,
    /// PEM body.
    pub certificate: String,
}

impl From<CertificateRecord> for Certificate {
    fn from(record: CertificateRecord) -> Self {
        Self {
            id: record.id.unwrap_or_default(),
            alias: record.alias,
            description: record.description.filter(|d| !d.is_empty()),
            certificate: record.certificate,
        }
    }
}

/// Input of [`CertificateLibrary::create`].
#[derive(Debug, Clone)]
pub struct NewCertificate {
    pub alias: String,
    pub description: Option<String>,
    pub certificate: String,
    pub private_key: Option<SecretString>,
    pub passphrase: Option<SecretString>,
}

pub struct CertificateLibrary {
    client: Client,
}

impl Client {
    pub fn certificates(&self) -> CertificateLibrary {
        CertificateLibrary {
            client: self.clone(),
        }
    }
}

impl CertificateLibrary {
    pub async fn list(&self) -> Result<Vec<Certificate>, CoreError> {
        Ok(self
            .client
            .api()
            .list_certificates(None)
            .await
            .on("list certificates")?
            .into_iter()
            .map(Certificate::from)
            .collect())
    }

    /// A certificate by URN or by alias.
    pub async fn get(&self, alias_or_urn: &str) -> Result<Certificate, CoreError> {
        if alias_or_urn.is_empty() {
            return Err(CoreError::empty("certificate alias or id"));
        }
        let api = self.client.api();
        if urn::is_kind(alias_or_urn, UrnKind::CertificateLibraryItem) {
            return api
                .get_certificate(alias_or_urn)
                .await
                .map(Certificate::from)
                .map_err(|e| {
                    if e.is_not_found() {
                        CoreError::not_found("certificate", alias_or_urn)
                    } else {
                        CoreError::from(e)
                    }
                });
        }

        let mut found: Vec<CertificateRecord> = api
            .list_certificates(Some(&fiql_eq("alias", alias_or_urn)))
            .await
            .on("list certificates")?
            .into_iter()
            .filter(|c| c.alias == alias_or_urn)
            .collect();
        match found.len() {
            0 => Err(CoreError::not_found("certificate", alias_or_urn)),
            1 => Ok(Certificate::from(found.remove(0))),
            count => Err(CoreError::Ambiguous {
                entity: "certificate".into(),
                name: alias_or_urn.to_owned(),
                count,
            }),
        }
    }

    pub async fn create(&self, new: NewCertificate) -> Result<Certificate, CoreError> {
        if new.alias.trim().is_empty() {
            return Err(CoreError::empty("certificate alias"));
        }
        if new.certificate.trim().is_empty() {
            return Err(CoreError::empty("certificate body"));
        }
        let record = CertificateRecord {
            id: None,
            alias: new.alias,
            description: new.description,
            certificate: new.certificate,
            private_key: new.private_key.map(|k| k.expose_secret().to_owned()),
            private_key_passphrase: new.passphrase.map(|p| p.expose_secret().to_owned()),
        };
        let created = self
            .client
            .api()
            .create_certificate(&record)
            .await
            .on("create certificate")?;
        let certificate = Certificate::from(created);
        info!(alias = %certificate.alias, id = %certificate.id, "certificate created");
        Ok(certificate)
    }

    /// Rename or re-describe a certificate. The body and key are immutable.
    pub async fn update(
        &self,
        alias_or_urn: &str,
        alias: Option<String>,
        description: Option<String>,
    ) -> Result<Certificate, CoreError> {
        let current = self.get(alias_or_urn).await?;
        let record = CertificateRecord {
            id: Some(current.id.clone()),
            alias: alias.filter(|a| !a.is_empty()).unwrap_or(current.alias),
            description: description.or(current.description),
            certificate: current.certificate,
            private_key: None,
            private_key_passphrase: None,
        };
        let updated = self
            .client
            .api()
            .update_certificate(&current.id, &record)
            .await
            .on("update certificate")?;
        info!(id = %current.id, "certificate updated");
        Ok(Certificate::from(updated))
    }

    pub async fn delete(&self, alias_or_urn: &str) -> Result<(), CoreError> {
        let id = if urn::is_kind(alias_or_urn, UrnKind::CertificateLibraryItem) {
            alias_or_urn.to_owned()
        } else {
            self.get(alias_or_urn).await?.id
        };
        self.client
            .api()
            .delete_certificate(&id)
            .await
            .on("delete certificate")?;
        info!(id = %id, "certificate deleted");
        Ok(())
    }
}
