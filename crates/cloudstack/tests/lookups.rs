//! Name and id lookup helpers.

use std::sync::Arc;

use cloudstack::testing::{fixtures, MockTransport};
use cloudstack::{CloudStackClient, CloudStackError, LookupOption};
use serde_json::json;

fn client_with(
    config: cloudstack::ClientConfig,
    transport: &Arc<MockTransport>,
) -> CloudStackClient<Arc<MockTransport>> {
    CloudStackClient::with_transport(config, transport.clone()).unwrap()
}

#[test]
fn test_get_id_single_match() {
    let transport = Arc::new(MockTransport::new().with_reply(fixtures::ok_reply(
        "listVolumes",
        json!({"count": 1, "volume": [{"id": "vol-1", "name": "data-01"}]}),
    )));
    let client = client_with(fixtures::test_config(), &transport);

    let id = client.volume().get_volume_id("data-01", &[]).unwrap();

    assert_eq!(id, "vol-1");
    assert_eq!(
        transport.requests()[0].param("name").as_deref(),
        Some("data-01")
    );
}

#[test]
fn test_get_by_name_prefers_exact_match_then_fetches_by_id() {
    let transport = Arc::new(MockTransport::new().with_replies([
        fixtures::ok_reply(
            "listVirtualMachines",
            json!({"count": 2, "virtualmachine": [
                {"id": "vm-1", "name": "web-01-old"},
                {"id": "vm-2", "name": "web-01"}
            ]}),
        ),
        fixtures::ok_reply(
            "listVirtualMachines",
            json!({"count": 1, "virtualmachine": [
                {"id": "vm-2", "name": "web-01", "state": "Running"}
            ]}),
        ),
    ]));
    let client = client_with(fixtures::test_config(), &transport);

    let vm = client
        .virtual_machine()
        .get_virtual_machine_by_name("web-01", &[])
        .unwrap();

    assert_eq!(vm.id, "vm-2");
    assert_eq!(vm.state, "Running");

    let requests = transport.requests();
    assert_eq!(requests[1].param("id").as_deref(), Some("vm-2"));
    assert!(requests[1].param("name").is_none());
}

#[test]
fn test_get_id_ambiguous() {
    let transport = Arc::new(MockTransport::new().with_reply(fixtures::ok_reply(
        "listRoles",
        json!({"count": 2, "role": [
            {"id": "r-1", "name": "Ops Admin"},
            {"id": "r-2", "name": "Ops Admin 2"}
        ]}),
    )));
    let client = client_with(fixtures::test_config(), &transport);

    let err = client.role().get_role_id("Ops", &[]).unwrap_err();
    assert!(matches!(
        err,
        CloudStackError::AmbiguousMatch { count: 2, .. }
    ));
}

#[test]
fn test_get_id_no_match() {
    let transport = Arc::new(
        MockTransport::new().with_reply(fixtures::ok_reply("listDiskOfferings", json!({}))),
    );
    let client = client_with(fixtures::test_config(), &transport);

    let err = client
        .disk_offering()
        .get_disk_offering_id("ssd-50", &[])
        .unwrap_err();
    assert_eq!(err.to_string(), "No match found for ssd-50");
}

#[test]
fn test_get_by_id_missing_entity_is_no_match() {
    let transport = Arc::new(MockTransport::new().with_reply(fixtures::api_error(
        "listRouters",
        431,
        431,
        "Invalid parameter id value=r-404 due to incorrect long value format, or entity does not exist or due to incorrect parameter annotation for the field in api cmd class.",
    )));
    let client = client_with(fixtures::test_config(), &transport);

    let err = client.router().get_router_by_id("r-404", &[]).unwrap_err();
    assert!(matches!(err, CloudStackError::NoMatch(ref id) if id == "r-404"));
}

#[test]
fn test_options_scope_list_calls() {
    let transport = Arc::new(MockTransport::new().with_reply(fixtures::ok_reply(
        "listVolumes",
        json!({"count": 1, "volume": [{"id": "vol-1", "name": "data-01"}]}),
    )));
    let client = client_with(fixtures::test_config().with_project("proj-default"), &transport);

    client
        .volume()
        .get_volume_id("data-01", &[LookupOption::Zone("zone-2".to_string())])
        .unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.param("projectid").as_deref(), Some("proj-default"));
    assert_eq!(request.param("zoneid").as_deref(), Some("zone-2"));
}

#[test]
fn test_caller_option_overrides_default() {
    let transport = Arc::new(MockTransport::new().with_reply(fixtures::ok_reply(
        "listIsos",
        json!({"count": 1, "iso": [{"id": "iso-1", "name": "debian-12"}]}),
    )));
    let config = fixtures::test_config()
        .with_project("proj-default")
        .with_zone("zone-default");
    let client = client_with(config, &transport);

    let id = client
        .iso()
        .get_iso_id(
            "debian-12",
            "featured",
            "",
            &[LookupOption::Project("proj-override".to_string())],
        )
        .unwrap();

    assert_eq!(id, "iso-1");
    let request = &transport.requests()[0];
    assert_eq!(request.param("isofilter").as_deref(), Some("featured"));
    assert_eq!(request.param("projectid").as_deref(), Some("proj-override"));
    assert_eq!(request.param("zoneid").as_deref(), Some("zone-default"));
}

#[test]
fn test_unscoped_lists_ignore_options() {
    let transport = Arc::new(MockTransport::new().with_reply(fixtures::ok_reply(
        "listRoles",
        json!({"count": 1, "role": [{"id": "r-1", "name": "User"}]}),
    )));
    let client = client_with(fixtures::test_config().with_project("proj-1"), &transport);

    client.role().get_role_id("User", &[]).unwrap();

    assert!(transport.requests()[0].param("projectid").is_none());
}
