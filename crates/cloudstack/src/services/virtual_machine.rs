//! Virtual machines.
//!
//! `deployVirtualMachine` and `updateVirtualMachine` can carry large
//! `userdata` values and are sent as form POSTs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::client::CloudStackClient;
use crate::error::CloudStackResult;
use crate::http::Transport;
use crate::jobs::JobPayload;
use crate::params::{DetailsMap, KeyValueMap};
use crate::services::{
    apply_options, not_found_as_no_match, pick_by_id, pick_by_name, LookupOption, Nic, Resource,
    ResourceTag, Scoped, SuccessResponse,
};

cloudstack_params! {
    /// Parameters for `deployVirtualMachine`.
    DeployVirtualMachineParams {
        required {
            serviceofferingid: String => "serviceofferingid",
            templateid: String => "templateid",
            zoneid: String => "zoneid",
        }
        optional {
            account: String => "account",
            affinitygroupids: Vec<String> => "affinitygroupids",
            affinitygroupnames: Vec<String> => "affinitygroupnames",
            customid: String => "customid",
            datadiskofferinglist: KeyValueMap => "datadiskofferinglist",
            deploymentplanner: String => "deploymentplanner",
            details: DetailsMap => "details",
            dhcpoptionsnetworklist: KeyValueMap => "dhcpoptionsnetworklist",
            diskofferingid: String => "diskofferingid",
            displayname: String => "displayname",
            displayvm: bool => "displayvm",
            domainid: String => "domainid",
            extraconfig: String => "extraconfig",
            group: String => "group",
            hostid: String => "hostid",
            hypervisor: String => "hypervisor",
            ip6address: String => "ip6address",
            ipaddress: String => "ipaddress",
            iptonetworklist: KeyValueMap => "iptonetworklist",
            keyboard: String => "keyboard",
            keypair: String => "keypair",
            macaddress: String => "macaddress",
            name: String => "name",
            networkids: Vec<String> => "networkids",
            projectid: String => "projectid",
            rootdisksize: i64 => "rootdisksize",
            securitygroupids: Vec<String> => "securitygroupids",
            securitygroupnames: Vec<String> => "securitygroupnames",
            size: i64 => "size",
            startvm: bool => "startvm",
            userdata: String => "userdata",
        }
    }
}

cloudstack_params! {
    /// Parameters for `destroyVirtualMachine`.
    DestroyVirtualMachineParams {
        required {
            id: String => "id",
        }
        optional {
            expunge: bool => "expunge",
            volumeids: Vec<String> => "volumeids",
        }
    }
}

cloudstack_params! {
    /// Parameters for `expungeVirtualMachine`.
    ExpungeVirtualMachineParams {
        required {
            id: String => "id",
        }
        optional {}
    }
}

cloudstack_params! {
    /// Parameters for `startVirtualMachine`.
    StartVirtualMachineParams {
        required {
            id: String => "id",
        }
        optional {
            deploymentplanner: String => "deploymentplanner",
            hostid: String => "hostid",
        }
    }
}

cloudstack_params! {
    /// Parameters for `stopVirtualMachine`.
    StopVirtualMachineParams {
        required {
            id: String => "id",
        }
        optional {
            forced: bool => "forced",
        }
    }
}

cloudstack_params! {
    /// Parameters for `rebootVirtualMachine`.
    RebootVirtualMachineParams {
        required {
            id: String => "id",
        }
        optional {}
    }
}

cloudstack_params! {
    /// Parameters for `recoverVirtualMachine`.
    RecoverVirtualMachineParams {
        required {
            id: String => "id",
        }
        optional {}
    }
}

cloudstack_params! {
    /// Parameters for `updateVirtualMachine`.
    UpdateVirtualMachineParams {
        required {
            id: String => "id",
        }
        optional {
            cleanupdetails: bool => "cleanupdetails",
            customid: String => "customid",
            details: DetailsMap => "details",
            dhcpoptionsnetworklist: KeyValueMap => "dhcpoptionsnetworklist",
            displayname: String => "displayname",
            displayvm: bool => "displayvm",
            extraconfig: String => "extraconfig",
            group: String => "group",
            haenable: bool => "haenable",
            instancename: String => "instancename",
            isdynamicallyscalable: bool => "isdynamicallyscalable",
            name: String => "name",
            ostypeid: String => "ostypeid",
            securitygroupids: Vec<String> => "securitygroupids",
            securitygroupnames: Vec<String> => "securitygroupnames",
            userdata: String => "userdata",
        }
    }
}

cloudstack_params! {
    /// Parameters for `listVirtualMachines`.
    ListVirtualMachinesParams {
        required {}
        optional {
            account: String => "account",
            affinitygroupid: String => "affinitygroupid",
            details: Vec<String> => "details",
            displayvm: bool => "displayvm",
            domainid: String => "domainid",
            forvirtualnetwork: bool => "forvirtualnetwork",
            groupid: String => "groupid",
            hostid: String => "hostid",
            hypervisor: String => "hypervisor",
            id: String => "id",
            ids: Vec<String> => "ids",
            isoid: String => "isoid",
            isrecursive: bool => "isrecursive",
            keypair: String => "keypair",
            keyword: String => "keyword",
            listall: bool => "listall",
            name: String => "name",
            networkid: String => "networkid",
            page: i32 => "page",
            pagesize: i32 => "pagesize",
            podid: String => "podid",
            projectid: String => "projectid",
            serviceofferingid: String => "serviceofferingid",
            state: String => "state",
            storageid: String => "storageid",
            tags: KeyValueMap => "tags",
            templateid: String => "templateid",
            userid: String => "userid",
            vpcid: String => "vpcid",
            zoneid: String => "zoneid",
        }
    }
}

impl Scoped for ListVirtualMachinesParams {
    fn scope_project(&mut self, project_id: &str) {
        self.projectid = Some(project_id.to_string());
    }

    fn scope_zone(&mut self, zone_id: &str) {
        self.zoneid = Some(zone_id.to_string());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityGroupRule {
    pub account: String,
    pub cidr: String,
    pub endport: i32,
    pub icmpcode: i32,
    pub icmptype: i32,
    pub protocol: String,
    pub ruleid: String,
    pub securitygroupname: String,
    pub startport: i32,
    pub tags: Vec<ResourceTag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityGroup {
    pub account: String,
    pub description: String,
    pub domain: String,
    pub domainid: String,
    pub egressrule: Vec<SecurityGroupRule>,
    pub id: String,
    pub ingressrule: Vec<SecurityGroupRule>,
    pub name: String,
    pub project: String,
    pub projectid: String,
    pub tags: Vec<ResourceTag>,
    pub virtualmachinecount: i32,
    pub virtualmachineids: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffinityGroup {
    pub account: String,
    pub description: String,
    pub domain: String,
    pub domainid: String,
    pub id: String,
    pub name: String,
    pub project: String,
    pub projectid: String,
    #[serde(rename = "type")]
    pub group_type: String,
    #[serde(rename = "virtualmachineIds")]
    pub virtualmachine_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualMachine {
    pub account: String,
    pub affinitygroup: Vec<AffinityGroup>,
    pub cpunumber: i32,
    pub cpuspeed: i32,
    pub cpuused: String,
    pub created: String,
    pub details: BTreeMap<String, String>,
    pub diskioread: i64,
    pub diskiowrite: i64,
    pub diskkbsread: i64,
    pub diskkbswrite: i64,
    pub diskofferingid: String,
    pub diskofferingname: String,
    pub displayname: String,
    pub displayvm: bool,
    pub domain: String,
    pub domainid: String,
    pub forvirtualnetwork: bool,
    pub group: String,
    pub groupid: String,
    pub guestosid: String,
    pub haenable: bool,
    pub hostid: String,
    pub hostname: String,
    pub hypervisor: String,
    pub id: String,
    pub instancename: String,
    pub isdynamicallyscalable: bool,
    pub isodisplaytext: String,
    pub isoid: String,
    pub isoname: String,
    pub jobid: String,
    pub jobstatus: i32,
    pub keypair: String,
    pub memory: i32,
    pub memoryintfreekbs: i64,
    pub memorykbs: i64,
    pub memorytargetkbs: i64,
    pub name: String,
    pub networkkbsread: i64,
    pub networkkbswrite: i64,
    pub nic: Vec<Nic>,
    #[serde(deserialize_with = "crate::decode::string_or_number")]
    pub ostypeid: String,
    pub password: String,
    pub passwordenabled: bool,
    pub project: String,
    pub projectid: String,
    pub publicip: String,
    pub publicipid: String,
    pub rootdeviceid: i64,
    pub rootdevicetype: String,
    pub securitygroup: Vec<SecurityGroup>,
    pub serviceofferingid: String,
    pub serviceofferingname: String,
    pub servicestate: String,
    pub state: String,
    pub tags: Vec<ResourceTag>,
    pub templatedisplaytext: String,
    pub templateid: String,
    pub templatename: String,
    pub userid: String,
    pub username: String,
    pub vgpu: String,
    pub zoneid: String,
    pub zonename: String,
}

impl Resource for VirtualMachine {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl VirtualMachine {
    /// The default NIC, if the VM has one.
    pub fn default_nic(&self) -> Option<&Nic> {
        self.nic.iter().find(|nic| nic.isdefault)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListVirtualMachinesResponse {
    pub count: i64,
    #[serde(rename = "virtualmachine")]
    pub virtual_machines: Vec<VirtualMachine>,
}

pub struct VirtualMachineService<'a, T: Transport> {
    client: &'a CloudStackClient<T>,
}

impl<'a, T: Transport> VirtualMachineService<'a, T> {
    pub(crate) fn new(client: &'a CloudStackClient<T>) -> Self {
        Self { client }
    }

    /// Creates and, unless `startvm=false`, starts a virtual machine.
    pub fn deploy_virtual_machine(
        &self,
        params: &DeployVirtualMachineParams,
    ) -> CloudStackResult<VirtualMachine> {
        self.client
            .call_async("deployVirtualMachine", params, JobPayload::Wrapped)
    }

    /// Destroys a virtual machine, optionally expunging it.
    pub fn destroy_virtual_machine(
        &self,
        params: &DestroyVirtualMachineParams,
    ) -> CloudStackResult<VirtualMachine> {
        self.client
            .call_async("destroyVirtualMachine", params, JobPayload::Wrapped)
    }

    /// Expunges a destroyed virtual machine.
    pub fn expunge_virtual_machine(
        &self,
        params: &ExpungeVirtualMachineParams,
    ) -> CloudStackResult<SuccessResponse> {
        self.client
            .call_async("expungeVirtualMachine", params, JobPayload::Bare)
    }

    pub fn start_virtual_machine(
        &self,
        params: &StartVirtualMachineParams,
    ) -> CloudStackResult<VirtualMachine> {
        self.client
            .call_async("startVirtualMachine", params, JobPayload::Wrapped)
    }

    pub fn stop_virtual_machine(
        &self,
        params: &StopVirtualMachineParams,
    ) -> CloudStackResult<VirtualMachine> {
        self.client
            .call_async("stopVirtualMachine", params, JobPayload::Wrapped)
    }

    pub fn reboot_virtual_machine(
        &self,
        params: &RebootVirtualMachineParams,
    ) -> CloudStackResult<VirtualMachine> {
        self.client
            .call_async("rebootVirtualMachine", params, JobPayload::Wrapped)
    }

    /// Recovers a destroyed, not yet expunged, virtual machine.
    pub fn recover_virtual_machine(
        &self,
        params: &RecoverVirtualMachineParams,
    ) -> CloudStackResult<VirtualMachine> {
        self.client
            .call_record("recoverVirtualMachine", params, "virtualmachine")
    }

    /// Updates properties of a virtual machine. The VM must be stopped for
    /// most changes to apply.
    pub fn update_virtual_machine(
        &self,
        params: &UpdateVirtualMachineParams,
    ) -> CloudStackResult<VirtualMachine> {
        self.client
            .call_record("updateVirtualMachine", params, "virtualmachine")
    }

    pub fn list_virtual_machines(
        &self,
        params: &ListVirtualMachinesParams,
    ) -> CloudStackResult<ListVirtualMachinesResponse> {
        self.client.call("listVirtualMachines", params)
    }

    pub fn get_virtual_machine_id(
        &self,
        name: &str,
        options: &[LookupOption],
    ) -> CloudStackResult<String> {
        let mut params = ListVirtualMachinesParams::new().with_name(name);
        apply_options(&mut params, self.client, options);

        let list = self.list_virtual_machines(&params)?;
        pick_by_name(name, list.virtual_machines).map(|vm| vm.id)
    }

    pub fn get_virtual_machine_by_name(
        &self,
        name: &str,
        options: &[LookupOption],
    ) -> CloudStackResult<VirtualMachine> {
        let id = self.get_virtual_machine_id(name, options)?;
        self.get_virtual_machine_by_id(&id, options)
    }

    pub fn get_virtual_machine_by_id(
        &self,
        id: &str,
        options: &[LookupOption],
    ) -> CloudStackResult<VirtualMachine> {
        let mut params = ListVirtualMachinesParams::new().with_id(id);
        apply_options(&mut params, self.client, options);

        let list = self
            .list_virtual_machines(&params)
            .map_err(|err| not_found_as_no_match(id, err))?;
        pick_by_id(id, list.virtual_machines)
    }
}
