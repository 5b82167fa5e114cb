// OpenAPI certificate library endpoints

use tracing::debug;

use crate::client::{ApiClient, interpolate};
use crate::error::Error;
use crate::openapi::models::CertificateRecord;

const CERTIFICATES: &str = "/cloudapi/1.0.0/ssl/certificateLibrary";
const CERTIFICATE: &str = "/cloudapi/1.0.0/ssl/certificateLibrary/{certificateId}";

impl ApiClient {
    /// `GET /cloudapi/1.0.0/ssl/certificateLibrary` (all pages)
    pub async fn list_certificates(&self, filter: Option<&str>) -> Result<Vec<CertificateRecord>, Error> {
        self.get_all_pages(CERTIFICATES, filter).await
    }

    /// `GET /cloudapi/1.0.0/ssl/certificateLibrary/{certificateId}`
    pub async fn get_certificate(&self, certificate_id: &str) -> Result<CertificateRecord, Error> {
        self.get(&interpolate(CERTIFICATE, &[("certificateId", certificate_id)]))
            .await
    }

    /// `POST /cloudapi/1.0.0/ssl/certificateLibrary`
    pub async fn create_certificate(&self, certificate: &CertificateRecord) -> Result<CertificateRecord, Error> {
        debug!(alias = %certificate.alias, "importing certificate");
        self.post(CERTIFICATES, certificate).await
    }

    /// `PUT /cloudapi/1.0.0/ssl/certificateLibrary/{certificateId}`
    pub async fn update_certificate(
        &self,
        certificate_id: &str,
        certificate: &CertificateRecord,
    ) -> Result<CertificateRecord, Error> {
        debug!(certificate_id, "updating certificate");
        self.put(
            &interpolate(CERTIFICATE, &[("certificateId", certificate_id)]),
            certificate,
        )
        .await
    }

    /// `DELETE /cloudapi/1.0.0/ssl/certificateLibrary/{certificateId}`
    pub async fn delete_certificate(&self, certificate_id: &str) -> Result<(), Error> {
        debug!(certificate_id, "deleting certificate");
        self.delete(&interpolate(CERTIFICATE, &[("certificateId", certificate_id)]))
            .await
    }
}
