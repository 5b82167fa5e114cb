// OpenAPI VDC and VDC group endpoints

use crate::client::{ApiClient, interpolate};
use crate::error::Error;
use crate::openapi::fiql_eq;
use crate::openapi::models::{VdcGroupRecord, VdcRecord};

const VDCS: &str = "/cloudapi/1.0.0/vdcs";
const VDC: &str = "/cloudapi/1.0.0/vdcs/{vdcId}";
const VDC_GROUPS: &str = "/cloudapi/1.0.0/vdcGroups";
const VDC_GROUP: &str = "/cloudapi/1.0.0/vdcGroups/{vdcGroupId}";

impl ApiClient {
    /// `GET /cloudapi/1.0.0/vdcs` (all pages)
    pub async fn list_vdcs(&self) -> Result<Vec<VdcRecord>, Error> {
        self.get_all_pages(VDCS, None).await
    }

    /// `GET /cloudapi/1.0.0/vdcs/{vdcId}`
    pub async fn get_vdc(&self, vdc_id: &str) -> Result<VdcRecord, Error> {
        self.get(&interpolate(VDC, &[("vdcId", vdc_id)])).await
    }

    pub async fn get_vdc_by_name(&self, name: &str) -> Result<VdcRecord, Error> {
        self.get_all_pages::<VdcRecord>(VDCS, Some(&fiql_eq("name", name)))
            .await?
            .into_iter()
            .find(|vdc| vdc.name == name)
            .ok_or_else(|| Error::NotFound {
                path: VDCS.to_owned(),
                message: format!("vdc {name} not found"),
            })
    }

    /// `GET /cloudapi/1.0.0/vdcGroups` (all pages)
    pub async fn list_vdc_groups(&self) -> Result<Vec<VdcGroupRecord>, Error> {
        self.get_all_pages(VDC_GROUPS, None).await
    }

    /// `GET /cloudapi/1.0.0/vdcGroups/{vdcGroupId}`
    pub async fn get_vdc_group(&self, vdc_group_id: &str) -> Result<VdcGroupRecord, Error> {
        self.get(&interpolate(VDC_GROUP, &[("vdcGroupId", vdc_group_id)]))
            .await
    }

    pub async fn get_vdc_group_by_name(&self, name: &str) -> Result<VdcGroupRecord, Error> {
        self.get_all_pages::<VdcGroupRecord>(VDC_GROUPS, Some(&fiql_eq("name", name)))
            .await?
            .into_iter()
            .find(|group| group.name == name)
            .ok_or_else(|| Error::NotFound {
                path: VDC_GROUPS.to_owned(),
                message: format!("vdc group {name} not found"),
            })
    }
}
