//! Typed services, one per resource group.
//!
//! Each service borrows the client and exposes one method per command plus
//! the `get_<resource>_id` / `get_<resource>_by_name` / `get_<resource>_by_id`
//! lookup helpers. Lookups are scoped by [`LookupOption`]s on top of the
//! client's configured default project and zone.

pub mod disk_offering;
pub mod iso;
pub mod role;
pub mod router;
pub mod virtual_machine;
pub mod volume;

use serde::{Deserialize, Serialize};

use crate::client::CloudStackClient;
use crate::error::{CloudStackError, CloudStackResult};
use crate::http::Transport;

/// Result of commands that only report success, e.g. `deleteVolume`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuccessResponse {
    pub displaytext: String,
    pub jobid: String,
    pub jobstatus: i32,
    #[serde(deserialize_with = "crate::decode::bool_or_string")]
    pub success: bool,
}

/// A resource tag attached to volumes, VMs, templates and ISOs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceTag {
    pub account: String,
    pub customer: String,
    pub domain: String,
    pub domainid: String,
    pub key: String,
    pub project: String,
    pub projectid: String,
    pub resourceid: String,
    pub resourcetype: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NicSecondaryIp {
    pub id: String,
    pub ipaddress: String,
}

/// A network interface of a VM or router.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nic {
    pub broadcasturi: String,
    pub deviceid: String,
    pub extradhcpoption: Vec<String>,
    pub gateway: String,
    pub id: String,
    pub ip6address: String,
    pub ip6cidr: String,
    pub ip6gateway: String,
    pub ipaddress: String,
    pub isdefault: bool,
    pub isolationuri: String,
    pub macaddress: String,
    pub netmask: String,
    pub networkid: String,
    pub networkname: String,
    pub nsxlogicalswitch: String,
    pub nsxlogicalswitchport: String,
    pub secondaryip: Vec<NicSecondaryIp>,
    pub traffictype: String,
    #[serde(rename = "type")]
    pub nic_type: String,
    pub virtualmachineid: String,
}

/// Narrows the list call behind a lookup helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOption {
    /// Only consider resources owned by this project id.
    Project(String),
    /// Only consider resources in this zone id.
    Zone(String),
}

/// List parameters that accept lookup scoping.
///
/// Commands without a `projectid` or `zoneid` parameter keep the default
/// no-op, and the corresponding option is ignored.
pub trait Scoped {
    fn scope_project(&mut self, _project_id: &str) {}
    fn scope_zone(&mut self, _zone_id: &str) {}
}

/// Records that can be found by name and id.
pub trait Resource {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

/// Applies the client defaults, then the caller's options, to list params.
pub(crate) fn apply_options<P: Scoped, T: Transport>(
    params: &mut P,
    client: &CloudStackClient<T>,
    options: &[LookupOption],
) {
    for option in client.default_lookup_options().iter().chain(options) {
        match option {
            LookupOption::Project(project_id) => params.scope_project(project_id),
            LookupOption::Zone(zone_id) => params.scope_zone(zone_id),
        }
    }
}

/// Picks the single record for a name lookup.
///
/// With several matches the record whose name matches exactly wins.
pub(crate) fn pick_by_name<R: Resource>(name: &str, mut items: Vec<R>) -> CloudStackResult<R> {
    match items.len() {
        0 => Err(CloudStackError::NoMatch(name.to_string())),
        1 => Ok(items.remove(0)),
        count => items
            .into_iter()
            .find(|item| item.name() == name)
            .ok_or_else(|| CloudStackError::AmbiguousMatch {
                name: name.to_string(),
                count,
            }),
    }
}

/// Picks the single record for an id lookup.
pub(crate) fn pick_by_id<R: Resource>(id: &str, mut items: Vec<R>) -> CloudStackResult<R> {
    match items.len() {
        0 => Err(CloudStackError::NoMatch(id.to_string())),
        1 => Ok(items.remove(0)),
        count => Err(CloudStackError::AmbiguousMatch {
            name: id.to_string(),
            count,
        }),
    }
}

/// Maps the server's "entity does not exist" answer for an id to `NoMatch`.
pub(crate) fn not_found_as_no_match(id: &str, err: CloudStackError) -> CloudStackError {
    match err {
        CloudStackError::ApiError { ref text, .. } if text.contains("does not exist") => {
            CloudStackError::NoMatch(id.to_string())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct Item {
        id: &'static str,
        name: &'static str,
    }

    impl Resource for Item {
        fn id(&self) -> &str {
            self.id
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    #[test]
    fn test_pick_by_name_single_match() {
        let item = pick_by_name("web", vec![Item { id: "1", name: "web-01" }]).unwrap();
        assert_eq!(item.id, "1");
    }

    #[test]
    fn test_pick_by_name_prefers_exact_match() {
        let items = vec![
            Item { id: "1", name: "web-01" },
            Item { id: "2", name: "web" },
        ];
        assert_eq!(pick_by_name("web", items).unwrap().id, "2");
    }

    #[test]
    fn test_pick_by_name_ambiguous() {
        let items = vec![
            Item { id: "1", name: "web-01" },
            Item { id: "2", name: "web-02" },
        ];
        match pick_by_name("web", items).unwrap_err() {
            CloudStackError::AmbiguousMatch { name, count } => {
                assert_eq!(name, "web");
                assert_eq!(count, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_pick_no_match() {
        assert!(matches!(
            pick_by_name::<Item>("web", vec![]).unwrap_err(),
            CloudStackError::NoMatch(_)
        ));
        assert!(matches!(
            pick_by_id::<Item>("1", vec![]).unwrap_err(),
            CloudStackError::NoMatch(_)
        ));
    }

    #[test]
    fn test_pick_by_id_rejects_duplicates() {
        let items = vec![Item { id: "1", name: "a" }, Item { id: "1", name: "b" }];
        assert!(matches!(
            pick_by_id("1", items).unwrap_err(),
            CloudStackError::AmbiguousMatch { count: 2, .. }
        ));
    }

    #[test]
    fn test_not_found_mapping() {
        let err = CloudStackError::ApiError {
            code: 431,
            cs_code: 4350,
            text: "Invalid parameter id value=42 due to incorrect long value format, or entity does not exist or due to incorrect parameter annotation for the field in api cmd class.".to_string(),
        };
        assert!(matches!(
            not_found_as_no_match("42", err),
            CloudStackError::NoMatch(id) if id == "42"
        ));

        let other = CloudStackError::HttpError {
            status: 500,
            body: String::new(),
        };
        assert!(matches!(
            not_found_as_no_match("42", other),
            CloudStackError::HttpError { .. }
        ));
    }

    #[test]
    fn test_success_response_lenient() {
        let parsed: SuccessResponse =
            serde_json::from_value(json!({"success": "true", "displaytext": "ok"})).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.displaytext, "ok");

        let parsed: SuccessResponse = serde_json::from_value(json!({"success": false})).unwrap();
        assert!(!parsed.success);
    }

    #[test]
    fn test_decode_nic() {
        let nic: Nic = serde_json::from_value(json!({
            "id": "nic-1",
            "ipaddress": "10.1.1.20",
            "isdefault": true,
            "type": "Isolated",
            "secondaryip": [{"id": "ip-2", "ipaddress": "10.1.1.21"}]
        }))
        .unwrap();

        assert_eq!(nic.nic_type, "Isolated");
        assert!(nic.isdefault);
        assert_eq!(nic.secondaryip[0].ipaddress, "10.1.1.21");
    }
}
