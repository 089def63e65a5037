//! Virtual routers.

use serde::{Deserialize, Serialize};

use crate::client::CloudStackClient;
use crate::error::CloudStackResult;
use crate::http::Transport;
use crate::jobs::JobPayload;
use crate::services::{
    apply_options, not_found_as_no_match, pick_by_id, pick_by_name, LookupOption, Nic, Resource,
    Scoped,
};

cloudstack_params! {
    /// Parameters for `startRouter`.
    StartRouterParams {
        required {
            id: String => "id",
        }
        optional {}
    }
}

cloudstack_params! {
    /// Parameters for `stopRouter`.
    StopRouterParams {
        required {
            id: String => "id",
        }
        optional {
            forced: bool => "forced",
        }
    }
}

cloudstack_params! {
    /// Parameters for `rebootRouter`.
    RebootRouterParams {
        required {
            id: String => "id",
        }
        optional {}
    }
}

cloudstack_params! {
    /// Parameters for `destroyRouter`.
    DestroyRouterParams {
        required {
            id: String => "id",
        }
        optional {}
    }
}

cloudstack_params! {
    /// Parameters for `changeServiceForRouter`.
    ChangeServiceForRouterParams {
        required {
            id: String => "id",
            serviceofferingid: String => "serviceofferingid",
        }
        optional {}
    }
}

cloudstack_params! {
    /// Parameters for `listRouters`.
    ListRoutersParams {
        required {}
        optional {
            account: String => "account",
            clusterid: String => "clusterid",
            domainid: String => "domainid",
            forvpc: bool => "forvpc",
            hostid: String => "hostid",
            id: String => "id",
            isrecursive: bool => "isrecursive",
            keyword: String => "keyword",
            listall: bool => "listall",
            name: String => "name",
            networkid: String => "networkid",
            page: i32 => "page",
            pagesize: i32 => "pagesize",
            podid: String => "podid",
            projectid: String => "projectid",
            state: String => "state",
            version: String => "version",
            vpcid: String => "vpcid",
            zoneid: String => "zoneid",
        }
    }
}

impl Scoped for ListRoutersParams {
    fn scope_project(&mut self, project_id: &str) {
        self.projectid = Some(project_id.to_string());
    }

    fn scope_zone(&mut self, zone_id: &str) {
        self.zoneid = Some(zone_id.to_string());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Router {
    pub account: String,
    pub created: String,
    pub dns1: String,
    pub dns2: String,
    pub domain: String,
    pub domainid: String,
    pub gateway: String,
    pub guestipaddress: String,
    pub guestmacaddress: String,
    pub guestnetmask: String,
    pub guestnetworkid: String,
    pub guestnetworkname: String,
    pub hostid: String,
    pub hostname: String,
    pub hypervisor: String,
    pub id: String,
    pub ip6dns1: String,
    pub ip6dns2: String,
    pub isredundantrouter: bool,
    pub jobid: String,
    pub jobstatus: i32,
    pub linklocalip: String,
    pub linklocalmacaddress: String,
    pub linklocalnetmask: String,
    pub linklocalnetworkid: String,
    pub name: String,
    pub networkdomain: String,
    pub nic: Vec<Nic>,
    pub podid: String,
    pub project: String,
    pub projectid: String,
    pub publicip: String,
    pub publicmacaddress: String,
    pub publicnetmask: String,
    pub publicnetworkid: String,
    pub redundantstate: String,
    pub requiresupgrade: bool,
    pub role: String,
    pub scriptsversion: String,
    pub serviceofferingid: String,
    pub serviceofferingname: String,
    pub state: String,
    pub templateid: String,
    pub version: String,
    pub vpcid: String,
    pub vpcname: String,
    pub zoneid: String,
    pub zonename: String,
}

impl Resource for Router {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListRoutersResponse {
    pub count: i64,
    #[serde(rename = "router")]
    pub routers: Vec<Router>,
}

pub struct RouterService<'a, T: Transport> {
    client: &'a CloudStackClient<T>,
}

impl<'a, T: Transport> RouterService<'a, T> {
    pub(crate) fn new(client: &'a CloudStackClient<T>) -> Self {
        Self { client }
    }

    pub fn start_router(&self, params: &StartRouterParams) -> CloudStackResult<Router> {
        self.client
            .call_async("startRouter", params, JobPayload::Wrapped)
    }

    pub fn stop_router(&self, params: &StopRouterParams) -> CloudStackResult<Router> {
        self.client
            .call_async("stopRouter", params, JobPayload::Wrapped)
    }

    pub fn reboot_router(&self, params: &RebootRouterParams) -> CloudStackResult<Router> {
        self.client
            .call_async("rebootRouter", params, JobPayload::Wrapped)
    }

    pub fn destroy_router(&self, params: &DestroyRouterParams) -> CloudStackResult<Router> {
        self.client
            .call_async("destroyRouter", params, JobPayload::Wrapped)
    }

    /// Upgrades or downgrades the service offering of a stopped router.
    pub fn change_service_for_router(
        &self,
        params: &ChangeServiceForRouterParams,
    ) -> CloudStackResult<Router> {
        self.client
            .call_record("changeServiceForRouter", params, "router")
    }

    pub fn list_routers(&self, params: &ListRoutersParams) -> CloudStackResult<ListRoutersResponse> {
        self.client.call("listRouters", params)
    }

    pub fn get_router_id(&self, name: &str, options: &[LookupOption]) -> CloudStackResult<String> {
        let mut params = ListRoutersParams::new().with_name(name);
        apply_options(&mut params, self.client, options);

        let list = self.list_routers(&params)?;
        pick_by_name(name, list.routers).map(|router| router.id)
    }

    pub fn get_router_by_name(
        &self,
        name: &str,
        options: &[LookupOption],
    ) -> CloudStackResult<Router> {
        let id = self.get_router_id(name, options)?;
        self.get_router_by_id(&id, options)
    }

    pub fn get_router_by_id(&self, id: &str, options: &[LookupOption]) -> CloudStackResult<Router> {
        let mut params = ListRoutersParams::new().with_id(id);
        apply_options(&mut params, self.client, options);

        let list = self
            .list_routers(&params)
            .map_err(|err| not_found_as_no_match(id, err))?;
        pick_by_id(id, list.routers)
    }
}
