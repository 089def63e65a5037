//! Volumes.

use serde::{Deserialize, Serialize};

use crate::client::CloudStackClient;
use crate::error::CloudStackResult;
use crate::http::Transport;
use crate::jobs::JobPayload;
use crate::params::KeyValueMap;
use crate::services::{
    apply_options, not_found_as_no_match, pick_by_id, pick_by_name, LookupOption, Resource,
    ResourceTag, Scoped, SuccessResponse,
};

cloudstack_params! {
    /// Parameters for `createVolume`.
    ///
    /// Either `diskofferingid` or `snapshotid` must be set.
    CreateVolumeParams {
        required {}
        optional {
            account: String => "account",
            customid: String => "customid",
            diskofferingid: String => "diskofferingid",
            displayvolume: bool => "displayvolume",
            domainid: String => "domainid",
            maxiops: i64 => "maxiops",
            miniops: i64 => "miniops",
            name: String => "name",
            projectid: String => "projectid",
            size: i64 => "size",
            snapshotid: String => "snapshotid",
            virtualmachineid: String => "virtualmachineid",
            zoneid: String => "zoneid",
        }
    }
}

cloudstack_params! {
    /// Parameters for `attachVolume`.
    AttachVolumeParams {
        required {
            id: String => "id",
            virtualmachineid: String => "virtualmachineid",
        }
        optional {
            deviceid: i64 => "deviceid",
        }
    }
}

cloudstack_params! {
    /// Parameters for `detachVolume`.
    ///
    /// Identify the volume by `id`, or by `virtualmachineid` and `deviceid`.
    DetachVolumeParams {
        required {}
        optional {
            deviceid: i64 => "deviceid",
            id: String => "id",
            virtualmachineid: String => "virtualmachineid",
        }
    }
}

cloudstack_params! {
    /// Parameters for `resizeVolume`.
    ResizeVolumeParams {
        required {
            id: String => "id",
        }
        optional {
            diskofferingid: String => "diskofferingid",
            maxiops: i64 => "maxiops",
            miniops: i64 => "miniops",
            shrinkok: bool => "shrinkok",
            size: i64 => "size",
        }
    }
}

cloudstack_params! {
    /// Parameters for `migrateVolume`.
    MigrateVolumeParams {
        required {
            storageid: String => "storageid",
            volumeid: String => "volumeid",
        }
        optional {
            livemigrate: bool => "livemigrate",
            newdiskofferingid: String => "newdiskofferingid",
        }
    }
}

cloudstack_params! {
    /// Parameters for `deleteVolume`.
    DeleteVolumeParams {
        required {
            id: String => "id",
        }
        optional {}
    }
}

cloudstack_params! {
    /// Parameters for `listVolumes`.
    ListVolumesParams {
        required {}
        optional {
            account: String => "account",
            clusterid: String => "clusterid",
            diskofferingid: String => "diskofferingid",
            displayvolume: bool => "displayvolume",
            domainid: String => "domainid",
            hostid: String => "hostid",
            id: String => "id",
            ids: Vec<String> => "ids",
            isrecursive: bool => "isrecursive",
            keyword: String => "keyword",
            listall: bool => "listall",
            name: String => "name",
            page: i32 => "page",
            pagesize: i32 => "pagesize",
            podid: String => "podid",
            projectid: String => "projectid",
            storageid: String => "storageid",
            tags: KeyValueMap => "tags",
            volume_type: String => "type",
            virtualmachineid: String => "virtualmachineid",
            zoneid: String => "zoneid",
        }
    }
}

impl Scoped for ListVolumesParams {
    fn scope_project(&mut self, project_id: &str) {
        self.projectid = Some(project_id.to_string());
    }

    fn scope_zone(&mut self, zone_id: &str) {
        self.zoneid = Some(zone_id.to_string());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Volume {
    pub account: String,
    pub attached: String,
    pub chaininfo: String,
    pub clusterid: String,
    pub clustername: String,
    pub created: String,
    pub destroyed: bool,
    pub deviceid: i64,
    #[serde(rename = "diskBytesReadRate")]
    pub disk_bytes_read_rate: i64,
    #[serde(rename = "diskBytesWriteRate")]
    pub disk_bytes_write_rate: i64,
    #[serde(rename = "diskIopsReadRate")]
    pub disk_iops_read_rate: i64,
    #[serde(rename = "diskIopsWriteRate")]
    pub disk_iops_write_rate: i64,
    pub diskofferingdisplaytext: String,
    pub diskofferingid: String,
    pub diskofferingname: String,
    pub displayvolume: bool,
    pub domain: String,
    pub domainid: String,
    pub hypervisor: String,
    pub id: String,
    pub isextractable: bool,
    pub isodisplaytext: String,
    pub isoid: String,
    pub isoname: String,
    pub jobid: String,
    pub jobstatus: i32,
    pub maxiops: i64,
    pub miniops: i64,
    pub name: String,
    pub path: String,
    pub physicalsize: i64,
    pub podid: String,
    pub podname: String,
    pub project: String,
    pub projectid: String,
    pub provisioningtype: String,
    pub quiescevm: bool,
    pub serviceofferingdisplaytext: String,
    pub serviceofferingid: String,
    pub serviceofferingname: String,
    pub size: i64,
    pub snapshotid: String,
    pub state: String,
    pub status: String,
    pub storage: String,
    pub storageid: String,
    pub storagetype: String,
    pub tags: Vec<ResourceTag>,
    pub templatedisplaytext: String,
    pub templateid: String,
    pub templatename: String,
    #[serde(rename = "type")]
    pub volume_type: String,
    pub utilization: String,
    pub virtualmachineid: String,
    pub virtualsize: i64,
    pub vmdisplayname: String,
    pub vmname: String,
    pub vmstate: String,
    pub zoneid: String,
    pub zonename: String,
}

impl Resource for Volume {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListVolumesResponse {
    pub count: i64,
    #[serde(rename = "volume")]
    pub volumes: Vec<Volume>,
}

pub struct VolumeService<'a, T: Transport> {
    client: &'a CloudStackClient<T>,
}

impl<'a, T: Transport> VolumeService<'a, T> {
    pub(crate) fn new(client: &'a CloudStackClient<T>) -> Self {
        Self { client }
    }

    /// Creates a disk volume from a disk offering or a snapshot.
    pub fn create_volume(&self, params: &CreateVolumeParams) -> CloudStackResult<Volume> {
        self.client
            .call_async("createVolume", params, JobPayload::Wrapped)
    }

    /// Attaches a disk volume to a virtual machine.
    pub fn attach_volume(&self, params: &AttachVolumeParams) -> CloudStackResult<Volume> {
        self.client
            .call_async("attachVolume", params, JobPayload::Wrapped)
    }

    /// Detaches a disk volume from a virtual machine.
    pub fn detach_volume(&self, params: &DetachVolumeParams) -> CloudStackResult<Volume> {
        self.client
            .call_async("detachVolume", params, JobPayload::Wrapped)
    }

    /// Resizes a volume.
    pub fn resize_volume(&self, params: &ResizeVolumeParams) -> CloudStackResult<Volume> {
        self.client
            .call_async("resizeVolume", params, JobPayload::Wrapped)
    }

    /// Migrates a volume to another storage pool.
    pub fn migrate_volume(&self, params: &MigrateVolumeParams) -> CloudStackResult<Volume> {
        self.client
            .call_async("migrateVolume", params, JobPayload::Wrapped)
    }

    /// Deletes a detached disk volume.
    pub fn delete_volume(&self, params: &DeleteVolumeParams) -> CloudStackResult<SuccessResponse> {
        self.client.call("deleteVolume", params)
    }

    /// Lists volumes.
    pub fn list_volumes(&self, params: &ListVolumesParams) -> CloudStackResult<ListVolumesResponse> {
        self.client.call("listVolumes", params)
    }

    pub fn get_volume_id(&self, name: &str, options: &[LookupOption]) -> CloudStackResult<String> {
        let mut params = ListVolumesParams::new().with_name(name);
        apply_options(&mut params, self.client, options);

        let list = self.list_volumes(&params)?;
        pick_by_name(name, list.volumes).map(|volume| volume.id)
    }

    pub fn get_volume_by_name(
        &self,
        name: &str,
        options: &[LookupOption],
    ) -> CloudStackResult<Volume> {
        let id = self.get_volume_id(name, options)?;
        self.get_volume_by_id(&id, options)
    }

    pub fn get_volume_by_id(&self, id: &str, options: &[LookupOption]) -> CloudStackResult<Volume> {
        let mut params = ListVolumesParams::new().with_id(id);
        apply_options(&mut params, self.client, options);

        let list = self
            .list_volumes(&params)
            .map_err(|err| not_found_as_no_match(id, err))?;
        pick_by_id(id, list.volumes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ToParams;
    use serde_json::json;

    #[test]
    fn test_list_volumes_params() {
        let params = ListVolumesParams::new()
            .with_virtualmachineid("vm-1")
            .with_volume_type("DATADISK")
            .with_tags(KeyValueMap::from([("backup", "daily")]))
            .to_params();

        assert_eq!(params.get("virtualmachineid"), Some("vm-1"));
        assert_eq!(params.get("type"), Some("DATADISK"));
        assert_eq!(params.get("tags[0].key"), Some("backup"));
        assert_eq!(params.get("tags[0].value"), Some("daily"));
    }

    #[test]
    fn test_scoping_sets_project_and_zone() {
        let mut params = ListVolumesParams::new();
        params.scope_project("proj-1");
        params.scope_zone("zone-1");

        let params = params.to_params();
        assert_eq!(params.get("projectid"), Some("proj-1"));
        assert_eq!(params.get("zoneid"), Some("zone-1"));
    }

    #[test]
    fn test_resize_volume_params() {
        let params = ResizeVolumeParams::new("vol-1")
            .with_size(100i64)
            .with_shrinkok(false)
            .to_params();

        assert_eq!(params.get("id"), Some("vol-1"));
        assert_eq!(params.get("size"), Some("100"));
        assert_eq!(params.get("shrinkok"), Some("false"));
    }

    #[test]
    fn test_decode_volume() {
        let volume: Volume = serde_json::from_value(json!({
            "id": "vol-1",
            "name": "DATA-42",
            "type": "DATADISK",
            "size": 21474836480i64,
            "deviceid": 1,
            "state": "Ready",
            "diskBytesReadRate": 1048576,
            "destroyed": false,
            "virtualmachineid": "vm-1",
            "vmname": "web-01",
            "zonename": "zone-a",
            "tags": [{"key": "backup", "value": "daily", "resourcetype": "Volume"}]
        }))
        .unwrap();

        assert_eq!(volume.volume_type, "DATADISK");
        assert_eq!(volume.size, 21474836480);
        assert_eq!(volume.deviceid, 1);
        assert_eq!(volume.disk_bytes_read_rate, 1048576);
        assert_eq!(volume.tags[0].key, "backup");
        assert_eq!(volume.tags[0].resourcetype, "Volume");
        assert!(volume.path.is_empty());
    }
}
