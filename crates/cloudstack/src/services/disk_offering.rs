//! Disk offerings.

use serde::{Deserialize, Serialize};

use crate::client::CloudStackClient;
use crate::error::CloudStackResult;
use crate::http::Transport;
use crate::services::{
    apply_options, not_found_as_no_match, pick_by_id, pick_by_name, LookupOption, Resource,
    Scoped, SuccessResponse,
};

cloudstack_params! {
    /// Parameters for `createDiskOffering`.
    CreateDiskOfferingParams {
        required {
            displaytext: String => "displaytext",
            name: String => "name",
        }
        optional {
            bytesreadrate: i64 => "bytesreadrate",
            bytesreadratemax: i64 => "bytesreadratemax",
            bytesreadratemaxlength: i64 => "bytesreadratemaxlength",
            byteswriterate: i64 => "byteswriterate",
            byteswriteratemax: i64 => "byteswriteratemax",
            byteswriteratemaxlength: i64 => "byteswriteratemaxlength",
            customized: bool => "customized",
            customizediops: bool => "customizediops",
            disksize: i64 => "disksize",
            displayoffering: bool => "displayoffering",
            domainid: String => "domainid",
            hypervisorsnapshotreserve: i32 => "hypervisorsnapshotreserve",
            iopsreadrate: i64 => "iopsreadrate",
            iopsreadratemax: i64 => "iopsreadratemax",
            iopsreadratemaxlength: i64 => "iopsreadratemaxlength",
            iopswriterate: i64 => "iopswriterate",
            iopswriteratemax: i64 => "iopswriteratemax",
            iopswriteratemaxlength: i64 => "iopswriteratemaxlength",
            maxiops: i64 => "maxiops",
            miniops: i64 => "miniops",
            provisioningtype: String => "provisioningtype",
            storagetype: String => "storagetype",
            tags: String => "tags",
        }
    }
}

cloudstack_params! {
    /// Parameters for `updateDiskOffering`.
    UpdateDiskOfferingParams {
        required {
            id: String => "id",
        }
        optional {
            displayoffering: bool => "displayoffering",
            displaytext: String => "displaytext",
            name: String => "name",
            sortkey: i32 => "sortkey",
        }
    }
}

cloudstack_params! {
    /// Parameters for `deleteDiskOffering`.
    DeleteDiskOfferingParams {
        required {
            id: String => "id",
        }
        optional {}
    }
}

cloudstack_params! {
    /// Parameters for `listDiskOfferings`.
    ListDiskOfferingsParams {
        required {}
        optional {
            domainid: String => "domainid",
            id: String => "id",
            isrecursive: bool => "isrecursive",
            keyword: String => "keyword",
            listall: bool => "listall",
            name: String => "name",
            page: i32 => "page",
            pagesize: i32 => "pagesize",
        }
    }
}

impl Scoped for ListDiskOfferingsParams {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskOffering {
    #[serde(rename = "cacheMode")]
    pub cache_mode: String,
    pub created: String,
    #[serde(rename = "diskBytesReadRate")]
    pub disk_bytes_read_rate: i64,
    #[serde(rename = "diskBytesReadRateMax")]
    pub disk_bytes_read_rate_max: i64,
    #[serde(rename = "diskBytesReadRateMaxLength")]
    pub disk_bytes_read_rate_max_length: i64,
    #[serde(rename = "diskBytesWriteRate")]
    pub disk_bytes_write_rate: i64,
    #[serde(rename = "diskBytesWriteRateMax")]
    pub disk_bytes_write_rate_max: i64,
    #[serde(rename = "diskBytesWriteRateMaxLength")]
    pub disk_bytes_write_rate_max_length: i64,
    #[serde(rename = "diskIopsReadRate")]
    pub disk_iops_read_rate: i64,
    #[serde(rename = "diskIopsReadRateMax")]
    pub disk_iops_read_rate_max: i64,
    #[serde(rename = "diskIopsReadRateMaxLength")]
    pub disk_iops_read_rate_max_length: i64,
    #[serde(rename = "diskIopsWriteRate")]
    pub disk_iops_write_rate: i64,
    #[serde(rename = "diskIopsWriteRateMax")]
    pub disk_iops_write_rate_max: i64,
    #[serde(rename = "diskIopsWriteRateMaxLength")]
    pub disk_iops_write_rate_max_length: i64,
    pub disksize: i64,
    pub displayoffering: bool,
    pub displaytext: String,
    pub domain: String,
    pub domainid: String,
    pub hypervisorsnapshotreserve: i32,
    pub id: String,
    pub iscustomized: bool,
    pub iscustomizediops: bool,
    pub jobid: String,
    pub jobstatus: i32,
    pub maxiops: i64,
    pub miniops: i64,
    pub name: String,
    pub provisioningtype: String,
    pub storagetype: String,
    pub tags: String,
}

impl Resource for DiskOffering {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListDiskOfferingsResponse {
    pub count: i64,
    #[serde(rename = "diskoffering")]
    pub disk_offerings: Vec<DiskOffering>,
}

pub struct DiskOfferingService<'a, T: Transport> {
    client: &'a CloudStackClient<T>,
}

impl<'a, T: Transport> DiskOfferingService<'a, T> {
    pub(crate) fn new(client: &'a CloudStackClient<T>) -> Self {
        Self { client }
    }

    pub fn create_disk_offering(
        &self,
        params: &CreateDiskOfferingParams,
    ) -> CloudStackResult<DiskOffering> {
        self.client
            .call_record("createDiskOffering", params, "diskoffering")
    }

    pub fn update_disk_offering(
        &self,
        params: &UpdateDiskOfferingParams,
    ) -> CloudStackResult<DiskOffering> {
        self.client
            .call_record("updateDiskOffering", params, "diskoffering")
    }

    pub fn delete_disk_offering(
        &self,
        params: &DeleteDiskOfferingParams,
    ) -> CloudStackResult<SuccessResponse> {
        self.client.call("deleteDiskOffering", params)
    }

    pub fn list_disk_offerings(
        &self,
        params: &ListDiskOfferingsParams,
    ) -> CloudStackResult<ListDiskOfferingsResponse> {
        self.client.call("listDiskOfferings", params)
    }

    pub fn get_disk_offering_id(
        &self,
        name: &str,
        options: &[LookupOption],
    ) -> CloudStackResult<String> {
        let mut params = ListDiskOfferingsParams::new().with_name(name);
        apply_options(&mut params, self.client, options);

        let list = self.list_disk_offerings(&params)?;
        pick_by_name(name, list.disk_offerings).map(|offering| offering.id)
    }

    pub fn get_disk_offering_by_name(
        &self,
        name: &str,
        options: &[LookupOption],
    ) -> CloudStackResult<DiskOffering> {
        let id = self.get_disk_offering_id(name, options)?;
        self.get_disk_offering_by_id(&id, options)
    }

    pub fn get_disk_offering_by_id(
        &self,
        id: &str,
        options: &[LookupOption],
    ) -> CloudStackResult<DiskOffering> {
        let mut params = ListDiskOfferingsParams::new().with_id(id);
        apply_options(&mut params, self.client, options);

        let list = self
            .list_disk_offerings(&params)
            .map_err(|err| not_found_as_no_match(id, err))?;
        pick_by_id(id, list.disk_offerings)
    }
}
