//! ISO images.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::client::CloudStackClient;
use crate::error::CloudStackResult;
use crate::http::Transport;
use crate::jobs::JobPayload;
use crate::params::{DetailsMap, KeyValueMap};
use crate::services::virtual_machine::VirtualMachine;
use crate::services::{
    apply_options, not_found_as_no_match, pick_by_id, pick_by_name, LookupOption, Resource,
    ResourceTag, Scoped, SuccessResponse,
};

cloudstack_params! {
    /// Parameters for `registerIso`.
    RegisterIsoParams {
        required {
            displaytext: String => "displaytext",
            name: String => "name",
            url: String => "url",
            zoneid: String => "zoneid",
        }
        optional {
            account: String => "account",
            bootable: bool => "bootable",
            checksum: String => "checksum",
            directdownload: bool => "directdownload",
            domainid: String => "domainid",
            imagestoreuuid: String => "imagestoreuuid",
            isdynamicallyscalable: bool => "isdynamicallyscalable",
            isextractable: bool => "isextractable",
            isfeatured: bool => "isfeatured",
            ispublic: bool => "ispublic",
            ostypeid: String => "ostypeid",
            passwordenabled: bool => "passwordenabled",
            projectid: String => "projectid",
        }
    }
}

cloudstack_params! {
    /// Parameters for `updateIso`.
    UpdateIsoParams {
        required {
            id: String => "id",
        }
        optional {
            bootable: bool => "bootable",
            cleanupdetails: bool => "cleanupdetails",
            details: DetailsMap => "details",
            displaytext: String => "displaytext",
            format: String => "format",
            isdynamicallyscalable: bool => "isdynamicallyscalable",
            isrouting: bool => "isrouting",
            name: String => "name",
            ostypeid: String => "ostypeid",
            passwordenabled: bool => "passwordenabled",
            requireshvm: bool => "requireshvm",
            sortkey: i32 => "sortkey",
            sshkeyenabled: bool => "sshkeyenabled",
        }
    }
}

cloudstack_params! {
    /// Parameters for `attachIso`.
    AttachIsoParams {
        required {
            id: String => "id",
            virtualmachineid: String => "virtualmachineid",
        }
        optional {}
    }
}

cloudstack_params! {
    /// Parameters for `detachIso`.
    DetachIsoParams {
        required {
            virtualmachineid: String => "virtualmachineid",
        }
        optional {}
    }
}

cloudstack_params! {
    /// Parameters for `deleteIso`.
    ///
    /// Without `zoneid` the ISO is deleted from every zone.
    DeleteIsoParams {
        required {
            id: String => "id",
        }
        optional {
            zoneid: String => "zoneid",
        }
    }
}

cloudstack_params! {
    /// Parameters for `listIsos`.
    ListIsosParams {
        required {}
        optional {
            account: String => "account",
            bootable: bool => "bootable",
            domainid: String => "domainid",
            hypervisor: String => "hypervisor",
            id: String => "id",
            isofilter: String => "isofilter",
            ispublic: bool => "ispublic",
            isready: bool => "isready",
            isrecursive: bool => "isrecursive",
            keyword: String => "keyword",
            listall: bool => "listall",
            name: String => "name",
            page: i32 => "page",
            pagesize: i32 => "pagesize",
            projectid: String => "projectid",
            showremoved: bool => "showremoved",
            tags: KeyValueMap => "tags",
            zoneid: String => "zoneid",
        }
    }
}

impl Scoped for ListIsosParams {
    fn scope_project(&mut self, project_id: &str) {
        self.projectid = Some(project_id.to_string());
    }

    fn scope_zone(&mut self, zone_id: &str) {
        self.zoneid = Some(zone_id.to_string());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Iso {
    pub account: String,
    pub accountid: String,
    pub bits: i32,
    pub bootable: bool,
    pub checksum: String,
    pub childtemplates: Vec<serde_json::Value>,
    pub created: String,
    #[serde(rename = "crossZones")]
    pub cross_zones: bool,
    pub details: BTreeMap<String, String>,
    pub directdownload: bool,
    pub displaytext: String,
    pub domain: String,
    pub domainid: String,
    pub format: String,
    pub hostid: String,
    pub hostname: String,
    pub hypervisor: String,
    pub id: String,
    pub isdynamicallyscalable: bool,
    pub isextractable: bool,
    pub isfeatured: bool,
    pub ispublic: bool,
    pub isready: bool,
    pub jobid: String,
    pub jobstatus: i32,
    pub name: String,
    #[serde(deserialize_with = "crate::decode::string_or_number")]
    pub ostypeid: String,
    pub ostypename: String,
    pub parenttemplateid: String,
    pub passwordenabled: bool,
    pub physicalsize: i64,
    pub project: String,
    pub projectid: String,
    pub removed: String,
    pub requireshvm: bool,
    pub size: i64,
    pub sourcetemplateid: String,
    pub sshkeyenabled: bool,
    pub status: String,
    pub tags: Vec<ResourceTag>,
    pub templatetag: String,
    pub templatetype: String,
    pub zoneid: String,
    pub zonename: String,
}

impl Resource for Iso {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListIsosResponse {
    pub count: i64,
    #[serde(rename = "iso")]
    pub isos: Vec<Iso>,
}

/// `registerIso` answers with a list, one entry per zone the ISO was
/// registered in.
pub type RegisterIsoResponse = ListIsosResponse;

pub struct IsoService<'a, T: Transport> {
    client: &'a CloudStackClient<T>,
}

impl<'a, T: Transport> IsoService<'a, T> {
    pub(crate) fn new(client: &'a CloudStackClient<T>) -> Self {
        Self { client }
    }

    /// Registers an ISO from a URL.
    pub fn register_iso(&self, params: &RegisterIsoParams) -> CloudStackResult<RegisterIsoResponse> {
        self.client.call("registerIso", params)
    }

    pub fn update_iso(&self, params: &UpdateIsoParams) -> CloudStackResult<Iso> {
        self.client.call_record("updateIso", params, "iso")
    }

    /// Attaches an ISO to a virtual machine, returning the updated VM.
    pub fn attach_iso(&self, params: &AttachIsoParams) -> CloudStackResult<VirtualMachine> {
        self.client
            .call_async("attachIso", params, JobPayload::Wrapped)
    }

    /// Detaches any ISO from a virtual machine, returning the updated VM.
    pub fn detach_iso(&self, params: &DetachIsoParams) -> CloudStackResult<VirtualMachine> {
        self.client
            .call_async("detachIso", params, JobPayload::Wrapped)
    }

    pub fn delete_iso(&self, params: &DeleteIsoParams) -> CloudStackResult<SuccessResponse> {
        self.client.call_async("deleteIso", params, JobPayload::Bare)
    }

    pub fn list_isos(&self, params: &ListIsosParams) -> CloudStackResult<ListIsosResponse> {
        self.client.call("listIsos", params)
    }

    /// Finds an ISO id by name within an `isofilter` (e.g. `featured`,
    /// `self`, `executable`) and zone.
    pub fn get_iso_id(
        &self,
        name: &str,
        isofilter: &str,
        zoneid: &str,
        options: &[LookupOption],
    ) -> CloudStackResult<String> {
        let mut params = ListIsosParams::new()
            .with_name(name)
            .with_isofilter(isofilter)
            .with_zoneid(zoneid);
        apply_options(&mut params, self.client, options);

        let list = self.list_isos(&params)?;
        pick_by_name(name, list.isos).map(|iso| iso.id)
    }

    pub fn get_iso_by_name(
        &self,
        name: &str,
        isofilter: &str,
        zoneid: &str,
        options: &[LookupOption],
    ) -> CloudStackResult<Iso> {
        let id = self.get_iso_id(name, isofilter, zoneid, options)?;
        self.get_iso_by_id(&id, options)
    }

    pub fn get_iso_by_id(&self, id: &str, options: &[LookupOption]) -> CloudStackResult<Iso> {
        let mut params = ListIsosParams::new().with_id(id);
        apply_options(&mut params, self.client, options);

        let list = self
            .list_isos(&params)
            .map_err(|err| not_found_as_no_match(id, err))?;
        pick_by_id(id, list.isos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ToParams;
    use serde_json::json;

    #[test]
    fn test_register_iso_params() {
        let params = RegisterIsoParams::new(
            "Debian 12 netinst",
            "debian-12",
            "https://mirror.example.com/debian-12.iso",
            "zone-1",
        )
        .with_bootable(true)
        .with_ostypeid("142")
        .to_params();

        assert_eq!(params.len(), 6);
        assert_eq!(params.get("url"), Some("https://mirror.example.com/debian-12.iso"));
        assert_eq!(params.get("bootable"), Some("true"));
    }

    #[test]
    fn test_update_iso_details() {
        let params = UpdateIsoParams::new("iso-1")
            .with_details(DetailsMap::from([("rootDiskController", "scsi")]))
            .to_params();
        assert_eq!(params.get("details[0].rootDiskController"), Some("scsi"));
    }

    #[test]
    fn test_decode_register_iso_list_shape() {
        let registered: RegisterIsoResponse = serde_json::from_value(json!({
            "count": 1,
            "iso": [{
                "id": "iso-1",
                "name": "debian-12",
                "ostypeid": 142,
                "isready": false,
                "crossZones": false,
                "status": "Download pending"
            }]
        }))
        .unwrap();

        assert_eq!(registered.count, 1);
        assert_eq!(registered.isos[0].ostypeid, "142");
        assert_eq!(registered.isos[0].status, "Download pending");
    }

    #[test]
    fn test_decode_iso_details_and_tags() {
        let iso: Iso = serde_json::from_value(json!({
            "id": "iso-1",
            "bootable": true,
            "details": {"rootDiskController": "scsi"},
            "tags": [{"key": "os", "value": "debian"}],
            "size": 654311424
        }))
        .unwrap();

        assert!(iso.bootable);
        assert_eq!(iso.details["rootDiskController"], "scsi");
        assert_eq!(iso.tags[0].value, "debian");
        assert_eq!(iso.size, 654311424);
    }
}
