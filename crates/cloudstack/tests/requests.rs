//! Request building, signing and reply decoding.

use std::sync::Arc;

use cloudstack::services::role::{CreateRoleParams, ListRolesParams};
use cloudstack::services::virtual_machine::{
    DeployVirtualMachineParams, UpdateVirtualMachineParams,
};
use cloudstack::services::volume::ListVolumesParams;
use cloudstack::signing;
use cloudstack::testing::{fixtures, Method, MockTransport, RecordedRequest};
use cloudstack::{CloudStackClient, CloudStackError, HttpReply, ParamSet};
use serde_json::{json, Value};

fn client_with(
    config: cloudstack::ClientConfig,
    transport: &Arc<MockTransport>,
) -> CloudStackClient<Arc<MockTransport>> {
    CloudStackClient::with_transport(config, transport.clone()).unwrap()
}

/// Recomputes the signature over everything except `signature` itself.
fn expected_signature(request: &RecordedRequest) -> String {
    let unsigned: ParamSet = request
        .params()
        .into_iter()
        .filter(|(key, _)| key != "signature")
        .collect();
    signing::sign(&signing::encode_values(&unsigned), "test-secret-key").unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Signing and method selection
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_get_request_is_signed() {
    let transport = Arc::new(
        MockTransport::new().with_reply(fixtures::ok_reply("listRoles", json!({"count": 0}))),
    );
    let client = client_with(fixtures::test_config(), &transport);

    client
        .role()
        .list_roles(&ListRolesParams::new().with_name("Domain Admin"))
        .unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.method, Method::Get);
    assert!(request
        .url
        .starts_with(&format!("{}?apiKey=test-api-key&command=listRoles", fixtures::TEST_API_URL)));
    assert!(request.url.contains("name=Domain+Admin"));
    assert_eq!(request.url.matches('?').count(), 1);
    assert_eq!(request.param("response").as_deref(), Some("json"));
    assert_eq!(request.param("name").as_deref(), Some("Domain Admin"));
    assert_eq!(
        request.param("signature"),
        Some(expected_signature(request))
    );
}

#[test]
fn test_deploy_is_posted_with_signature() {
    let transport = Arc::new(
        MockTransport::new().with_reply(fixtures::job_started("deployVirtualMachine", "job-1", "vm-1")),
    );
    let config = fixtures::test_config().with_async_mode(false);
    let client = client_with(config, &transport);

    client
        .virtual_machine()
        .deploy_virtual_machine(
            &DeployVirtualMachineParams::new("so-1", "tpl-1", "zone-1")
                .with_userdata("IyEvYmluL2Jhc2gKZWNobyBoZWxsbwo="),
        )
        .unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, fixtures::TEST_API_URL);
    assert_eq!(
        request.param("userdata").as_deref(),
        Some("IyEvYmluL2Jhc2gKZWNobyBoZWxsbwo=")
    );
    assert_eq!(request.param("signature"), Some(expected_signature(request)));
}

#[test]
fn test_get_only_never_posts() {
    let transport = Arc::new(MockTransport::new().with_reply(fixtures::ok_reply(
        "updateVirtualMachine",
        json!({"virtualmachine": {"id": "vm-1", "displayname": "Web"}}),
    )));
    let config = fixtures::test_config().with_http_get_only(true);
    let client = client_with(config, &transport);

    let vm = client
        .virtual_machine()
        .update_virtual_machine(&UpdateVirtualMachineParams::new("vm-1").with_displayname("Web"))
        .unwrap();

    assert_eq!(vm.displayname, "Web");
    assert_eq!(transport.requests()[0].method, Method::Get);
}

#[test]
fn test_sync_create_unwraps_record() {
    let transport = Arc::new(MockTransport::new().with_reply(fixtures::ok_reply(
        "createRole",
        json!({"role": {"id": "r-9", "name": "operators", "type": "DomainAdmin"}}),
    )));
    let client = client_with(fixtures::test_config(), &transport);

    let role = client
        .role()
        .create_role(&CreateRoleParams::new("operators", "DomainAdmin"))
        .unwrap();

    assert_eq!(role.id, "r-9");
    assert_eq!(role.role_type, "DomainAdmin");
}

// ─────────────────────────────────────────────────────────────────────────────
// Reply decoding
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_envelope_is_empty_list() {
    let transport =
        Arc::new(MockTransport::new().with_reply(fixtures::ok_reply("listVolumes", json!({}))));
    let client = client_with(fixtures::test_config(), &transport);

    let list = client
        .volume()
        .list_volumes(&ListVolumesParams::new())
        .unwrap();

    assert_eq!(list.count, 0);
    assert!(list.volumes.is_empty());
}

#[test]
fn test_null_fields_decode_as_defaults() {
    let transport = Arc::new(MockTransport::new().with_reply(fixtures::ok_reply(
        "listVolumes",
        json!({"count": 1, "volume": [{"id": "vol-1", "name": null, "size": null, "tags": null}]}),
    )));
    let client = client_with(fixtures::test_config(), &transport);

    let list = client
        .volume()
        .list_volumes(&ListVolumesParams::new())
        .unwrap();

    assert_eq!(list.volumes[0].id, "vol-1");
    assert!(list.volumes[0].name.is_empty());
    assert_eq!(list.volumes[0].size, 0);
    assert!(list.volumes[0].tags.is_empty());
}

#[test]
fn test_api_error_is_decoded() {
    let transport = Arc::new(MockTransport::new().with_reply(fixtures::api_error(
        "listVolumes",
        431,
        431,
        "Unable to execute API command listvolumes due to invalid value",
    )));
    let client = client_with(fixtures::test_config(), &transport);

    let err = client
        .volume()
        .list_volumes(&ListVolumesParams::new().with_id("bogus"))
        .unwrap_err();

    match err {
        CloudStackError::ApiError {
            code,
            cs_code,
            text,
        } => {
            assert_eq!(code, 431);
            assert_eq!(cs_code, 4350);
            assert!(text.contains("invalid value"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_non_cloudstack_error_keeps_status_and_body() {
    let transport = Arc::new(
        MockTransport::new().with_reply(HttpReply::new(503, "<html>Service Unavailable</html>")),
    );
    let client = client_with(fixtures::test_config(), &transport);

    let err = client
        .volume()
        .list_volumes(&ListVolumesParams::new())
        .unwrap_err();

    assert!(matches!(
        err,
        CloudStackError::HttpError { status: 503, ref body } if body.contains("Unavailable")
    ));
}

#[test]
fn test_malformed_payload_is_decode_error() {
    let transport = Arc::new(MockTransport::new().with_reply(fixtures::ok_reply(
        "listVolumes",
        json!({"count": "many", "volume": []}),
    )));
    let client = client_with(fixtures::test_config(), &transport);

    let err = client
        .volume()
        .list_volumes(&ListVolumesParams::new())
        .unwrap_err();

    match err {
        CloudStackError::DecodeError { command, .. } => assert_eq!(command, "listVolumes"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_transport_failure_propagates() {
    let transport = Arc::new(MockTransport::new().with_failure("connection refused"));
    let client = client_with(fixtures::test_config(), &transport);

    let err = client.request("listZones", &ParamSet::new()).unwrap_err();
    assert!(matches!(err, CloudStackError::TransportError(ref msg) if msg == "connection refused"));
}

#[test]
fn test_free_form_request() {
    let transport = Arc::new(MockTransport::new().with_reply(fixtures::ok_reply(
        "listZones",
        json!({"count": 1, "zone": [{"id": "zone-1", "name": "zone-a"}]}),
    )));
    let client = client_with(fixtures::test_config(), &transport);

    let params: ParamSet = [("available", "true")].into_iter().collect();
    let payload: Value = client.call("listZones", &params).unwrap();

    assert_eq!(payload["zone"][0]["name"], "zone-a");
    assert_eq!(
        transport.requests()[0].param("available").as_deref(),
        Some("true")
    );
}
