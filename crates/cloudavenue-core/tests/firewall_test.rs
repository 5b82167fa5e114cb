#![allow(clippy::unwrap_used)]
// Edge and distributed firewalls, firewall groups and application port
// profiles against a mocked console.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cloudavenue_core::firewall::{PortProtocol, PortRule};
use cloudavenue_core::{
    AppPortProfile, AuthCredentials, Client, ClientConfig, CoreError, EdgeFirewall, FirewallRule,
    IpSet, RuleAction, RuleDirection, SecretString,
};

const EDGE_ID: &str = "urn:vcloud:gateway:6d3c0a5e-1c7e-4f0b-9a61-3f1f7e2b8c10";
const VDC_GROUP_ID: &str = "urn:vcloud:vdcGroup:0e6a1c4d-5b2f-4a8e-9c3d-7f1e2a4b6c8d";
const PROFILE_ID: &str =
    "urn:vcloud:applicationPortProfile:0f1e2d3c-4b5a-4978-8695-a4b3c2d1e0f9";
const RULES_PATH: &str =
    "/cloudapi/1.0.0/edgeGateways/urn:vcloud:gateway:6d3c0a5e-1c7e-4f0b-9a61-3f1f7e2b8c10/firewall/rules";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let mut config = ClientConfig::new(
        "cav01ev01ocb0001234",
        AuthCredentials::Token(SecretString::from("static-token".to_owned())),
    )
    .with_endpoint(Url::parse(&server.uri()).unwrap());
    config.poll_interval = Duration::from_millis(10);
    config.job_timeout = Duration::from_secs(5);
    (server, Client::new(config).unwrap())
}

fn page(values: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "pageCount": 1, "page": 1, "values": values }))
}

/// A `202` pointing at `/api/task/{id}`, plus the task itself, already done.
async fn mount_task(server: &MockServer, task_id: &str) -> ResponseTemplate {
    Mock::given(method("GET"))
        .and(path(format!("/api/task/{task_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": task_id,
            "status": "success",
        })))
        .mount(server)
        .await;
    ResponseTemplate::new(202).insert_header(
        "Location",
        format!("{}/api/task/{task_id}", server.uri()).as_str(),
    )
}

/// Bodies of every request received with `verb` on `route`.
async fn bodies(server: &MockServer, verb: &str, route: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == verb && r.url.path() == route)
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

fn names(rules: &Value) -> Vec<&str> {
    rules
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect()
}

// ── Edge firewall ───────────────────────────────────────────────────

#[tokio::test]
async fn test_create_orders_rules_by_priority_then_name() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(RULES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "systemRules": [],
            "userDefinedRules": [],
            "defaultRules": [{
                "id": "default", "name": "Default", "actionValue": "DROP",
                "direction": "IN_OUT", "ipProtocol": "IPV4_IPV6"
            }],
        })))
        .mount(&server)
        .await;
    let accepted = mount_task(&server, "task-put").await;
    Mock::given(method("PUT"))
        .and(path(RULES_PATH))
        .respond_with(accepted)
        .expect(1)
        .mount(&server)
        .await;

    let firewall = EdgeFirewall::new(client.clone(), EDGE_ID);
    firewall
        .create(vec![
            FirewallRule::new("b", 10, RuleAction::Allow, RuleDirection::In),
            FirewallRule::new("a", 10, RuleAction::Allow, RuleDirection::In),
            FirewallRule::new("z", 5, RuleAction::Drop, RuleDirection::Out),
        ])
        .await
        .unwrap();

    let put = bodies(&server, "PUT", RULES_PATH).await;
    assert_eq!(put.len(), 1);
    assert!(put[0].get("defaultRules").is_none());
    assert_eq!(names(&put[0]["userDefinedRules"]), vec!["5_z", "10_a", "10_b"]);
    assert_eq!(put[0]["userDefinedRules"][0]["actionValue"], "DROP");
    assert_eq!(put[0]["userDefinedRules"][0]["ipProtocol"], "IPV4_IPV6");
}

#[tokio::test]
async fn test_update_correlates_by_hash_and_keeps_server_id() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(RULES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userDefinedRules": [
                {
                    "id": "urn:vcloud:firewallRule:1", "name": "svc_web", "enabled": true,
                    "actionValue": "ALLOW", "direction": "IN", "ipProtocol": "IPV4", "logging": false
                },
                {
                    "id": "urn:vcloud:firewallRule:2", "name": "20_ssh", "enabled": true,
                    "actionValue": "ALLOW", "direction": "IN", "ipProtocol": "IPV4", "logging": false
                }
            ],
        })))
        .mount(&server)
        .await;
    let accepted = mount_task(&server, "task-update").await;
    Mock::given(method("PUT"))
        .and(path(RULES_PATH))
        .respond_with(accepted)
        .expect(1)
        .mount(&server)
        .await;

    let mut update = FirewallRule::new("svc_web", 10, RuleAction::Allow, RuleDirection::In);
    update.logging = true;
    EdgeFirewall::new(client.clone(), EDGE_ID)
        .update(vec![update])
        .await
        .unwrap();

    let put = bodies(&server, "PUT", RULES_PATH).await;
    let rules = &put[0]["userDefinedRules"];
    assert_eq!(names(rules), vec!["10_svc_web", "20_ssh"]);
    assert_eq!(rules[0]["id"], "urn:vcloud:firewallRule:1");
    assert_eq!(rules[0]["logging"], true);
    assert_eq!(rules[1]["id"], "urn:vcloud:firewallRule:2");
}

#[tokio::test]
async fn test_invalid_rule_never_reaches_the_server() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path(RULES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "userDefinedRules": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let mut rule = FirewallRule::new("web", 10, RuleAction::Allow, RuleDirection::In);
    rule.source_ips = vec!["not-an-ip".into()];
    let err = EdgeFirewall::new(client.clone(), EDGE_ID)
        .create(vec![rule])
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidFormat { .. }));
}

#[tokio::test]
async fn test_delete_many_stops_at_first_failure() {
    let (server, client) = setup().await;

    let accepted = mount_task(&server, "task-del").await;
    Mock::given(method("DELETE"))
        .and(path(format!("{RULES_PATH}/r1")))
        .respond_with(accepted)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{RULES_PATH}/r2")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "minorErrorCode": "BAD_REQUEST",
            "message": "rule r2 is in use",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{RULES_PATH}/r3")))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let err = EdgeFirewall::new(client.clone(), EDGE_ID)
        .delete_many(&["r1".into(), "r2".into(), "r3".into()])
        .await
        .unwrap_err();
    assert!(
        err.to_string().contains("delete firewall rule"),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn test_delete_all_clears_user_rules_and_waits() {
    let (server, client) = setup().await;

    let accepted = mount_task(&server, "task-clear").await;
    Mock::given(method("DELETE"))
        .and(path(RULES_PATH))
        .respond_with(accepted)
        .expect(1)
        .mount(&server)
        .await;

    EdgeFirewall::new(client.clone(), EDGE_ID)
        .delete_all()
        .await
        .unwrap();

    let polled = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/api/task/task-clear")
        .count();
    assert_eq!(polled, 1);
}

// ── Distributed firewall ────────────────────────────────────────────

async fn mount_vdc_group(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/cloudapi/1.0.0/vdcGroups"))
        .and(query_param("filter", "name==vdcg-prod"))
        .respond_with(page(json!([{
            "id": VDC_GROUP_ID, "name": "vdcg-prod", "dfwEnabled": false
        }])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_create_distributed_firewall_from_absent() {
    let (server, client) = setup().await;
    let policies = format!("/cloudapi/1.0.0/vdcGroups/{VDC_GROUP_ID}/dfwPolicies");
    let default = format!("{policies}/default");
    let rules = format!("{default}/rules");

    mount_vdc_group(&server).await;
    Mock::given(method("GET"))
        .and(path(policies.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "enabled": false })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(policies.as_str()))
        .and(body_json(json!({ "enabled": true })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(default.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "urn:vcloud:dfwPolicy:default",
            "name": "Default",
            "enabled": false,
            "version": { "version": 3 },
        })))
        .mount(&server)
        .await;
    let accepted = mount_task(&server, "task-policy").await;
    Mock::given(method("PUT"))
        .and(path(default.as_str()))
        .respond_with(accepted)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(rules.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "values": [] })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(rules.as_str()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dfw = client.distributed_firewall("vdcg-prod").await.unwrap();
    assert_eq!(dfw.vdc_group().id, VDC_GROUP_ID);
    dfw.create_firewall(
        vec![
            FirewallRule::new("deny-all", 1000, RuleAction::Drop, RuleDirection::InOut),
            FirewallRule::new("web", 100, RuleAction::Allow, RuleDirection::In),
        ],
        true,
    )
    .await
    .unwrap();

    let policy = bodies(&server, "PUT", &default).await;
    assert_eq!(policy[0]["enabled"], true);
    assert_eq!(policy[0]["version"], json!({ "version": 3 }));

    let written = bodies(&server, "PUT", &rules).await;
    assert_eq!(names(&written[0]["values"]), vec!["100_web", "1000_deny-all"]);
}

#[tokio::test]
async fn test_create_distributed_firewall_twice_is_rejected() {
    let (server, client) = setup().await;
    let policies = format!("/cloudapi/1.0.0/vdcGroups/{VDC_GROUP_ID}/dfwPolicies");

    mount_vdc_group(&server).await;
    Mock::given(method("GET"))
        .and(path(policies.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "enabled": true,
            "defaultPolicy": { "id": "default", "name": "Default", "enabled": true },
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(policies.as_str()))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dfw = client.distributed_firewall("vdcg-prod").await.unwrap();
    let err = dfw.create_firewall(Vec::new(), true).await.unwrap_err();
    assert!(matches!(err, CoreError::Rejected { .. }));
}

/// Policies of a VDC group whose DFW is active, default policy `enabled`.
async fn mount_present_dfw(server: &MockServer, enabled: bool) {
    let policies = format!("/cloudapi/1.0.0/vdcGroups/{VDC_GROUP_ID}/dfwPolicies");
    Mock::given(method("GET"))
        .and(path(policies.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "enabled": true,
            "defaultPolicy": { "id": "default", "name": "Default", "enabled": enabled },
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{policies}/default")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "urn:vcloud:dfwPolicy:default",
            "name": "Default",
            "enabled": enabled,
            "version": { "version": 7 },
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_delete_distributed_firewall_tears_down_in_order() {
    let (server, client) = setup().await;
    let policies = format!("/cloudapi/1.0.0/vdcGroups/{VDC_GROUP_ID}/dfwPolicies");
    let default = format!("{policies}/default");
    let rules = format!("{default}/rules");

    mount_vdc_group(&server).await;
    mount_present_dfw(&server, true).await;
    Mock::given(method("PUT"))
        .and(path(rules.as_str()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(default.as_str()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(policies.as_str()))
        .and(body_json(json!({ "enabled": false })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dfw = client.distributed_firewall("vdcg-prod").await.unwrap();
    dfw.delete().await.unwrap();

    let puts: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == "PUT")
        .map(|r| r.url.path().to_owned())
        .collect();
    assert_eq!(puts, vec![rules.clone(), default.clone(), policies.clone()]);

    let written = bodies(&server, "PUT", &rules).await;
    assert_eq!(written[0]["values"], json!([]));
    let policy = bodies(&server, "PUT", &default).await;
    assert_eq!(policy[0]["enabled"], false);
    assert_eq!(policy[0]["version"], json!({ "version": 7 }));
}

#[tokio::test]
async fn test_set_enabled_toggles_the_default_policy() {
    let (server, client) = setup().await;
    let default = format!("/cloudapi/1.0.0/vdcGroups/{VDC_GROUP_ID}/dfwPolicies/default");

    mount_vdc_group(&server).await;
    mount_present_dfw(&server, true).await;
    Mock::given(method("PUT"))
        .and(path(default.as_str()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dfw = client.distributed_firewall("vdcg-prod").await.unwrap();
    dfw.set_enabled(false).await.unwrap();

    let policy = bodies(&server, "PUT", &default).await;
    assert_eq!(policy.len(), 1);
    assert_eq!(policy[0]["enabled"], false);
}

#[tokio::test]
async fn test_set_enabled_without_firewall_is_rejected() {
    let (server, client) = setup().await;
    let policies = format!("/cloudapi/1.0.0/vdcGroups/{VDC_GROUP_ID}/dfwPolicies");

    mount_vdc_group(&server).await;
    Mock::given(method("GET"))
        .and(path(policies.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "enabled": false })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dfw = client.distributed_firewall("vdcg-prod").await.unwrap();
    let err = dfw.set_enabled(true).await.unwrap_err();
    assert!(matches!(err, CoreError::Rejected { .. }));
    let err = dfw.delete().await.unwrap_err();
    assert!(matches!(err, CoreError::Rejected { .. }));
}

// ── Firewall groups ─────────────────────────────────────────────────

#[tokio::test]
async fn test_ip_set_create_then_read_back() {
    let (server, client) = setup().await;
    let group_id = "urn:vcloud:firewallGroup:7a1b2c3d-4e5f-4a6b-8c7d-9e0f1a2b3c4d";

    let accepted = mount_task(&server, "task-group").await;
    Mock::given(method("POST"))
        .and(path("/cloudapi/1.0.0/firewallGroups"))
        .respond_with(accepted)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cloudapi/1.0.0/firewallGroups/summaries"))
        .and(query_param(
            "filter",
            format!("ownerRef.id=={EDGE_ID};typeValue==IP_SET;name==office").as_str(),
        ))
        .respond_with(page(json!([{ "id": group_id, "name": "office", "typeValue": "IP_SET" }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/cloudapi/1.0.0/firewallGroups/{group_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": group_id,
            "name": "office",
            "typeValue": "IP_SET",
            "ownerRef": { "id": EDGE_ID, "name": "edge01" },
            "ipAddresses": ["192.168.1.0/24", "10.0.0.1-10.0.0.9"],
        })))
        .mount(&server)
        .await;

    let groups = cloudavenue_core::FirewallGroups::new(
        client.clone(),
        cloudavenue_api::openapi::models::EntityRef {
            id: EDGE_ID.into(),
            name: "edge01".into(),
        },
    );
    let created: IpSet = groups
        .create(&IpSet {
            name: "office".into(),
            ip_addresses: vec!["192.168.1.0/24".into(), "10.0.0.1-10.0.0.9".into()],
            ..IpSet::default()
        })
        .await
        .unwrap();
    assert_eq!(created.id.as_deref(), Some(group_id));
    assert_eq!(created.ip_addresses.len(), 2);

    let posted = bodies(&server, "POST", "/cloudapi/1.0.0/firewallGroups").await;
    assert_eq!(posted[0]["typeValue"], "IP_SET");
    assert_eq!(posted[0]["ownerRef"]["id"], EDGE_ID);
    assert!(posted[0].get("id").is_none());
}

// ── Application port profiles ───────────────────────────────────────

#[tokio::test]
async fn test_profile_lookup_walks_scopes_and_system_is_read_only() {
    let (server, client) = setup().await;
    let profiles = "/cloudapi/1.0.0/applicationPortProfiles";

    for scope in ["TENANT", "PROVIDER"] {
        Mock::given(method("GET"))
            .and(path(profiles))
            .and(query_param(
                "filter",
                format!("name==HTTPS;scope=={scope};_context=={VDC_GROUP_ID}").as_str(),
            ))
            .respond_with(page(json!([])))
            .expect(1)
            .mount(&server)
            .await;
    }
    let system = json!({
        "id": PROFILE_ID,
        "name": "HTTPS",
        "scope": "SYSTEM",
        "applicationPorts": [{ "protocol": "TCP", "destinationPorts": ["443"] }],
    });
    Mock::given(method("GET"))
        .and(path(profiles))
        .and(query_param(
            "filter",
            format!("name==HTTPS;scope==SYSTEM;_context=={VDC_GROUP_ID}").as_str(),
        ))
        .respond_with(page(json!([system.clone()])))
        .mount(&server)
        .await;
    // `update` re-reads the profile by its id.
    Mock::given(method("GET"))
        .and(path(format!("{profiles}/{PROFILE_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(system))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let apps = cloudavenue_core::firewall::AppPortProfiles::new(client.clone(), VDC_GROUP_ID);
    let https = apps.get("HTTPS").await.unwrap();
    assert_eq!(https.ports[0].protocol, PortProtocol::Tcp);
    assert_eq!(https.ports[0].ports, vec!["443"]);

    let edited = AppPortProfile {
        ports: vec![PortRule {
            protocol: PortProtocol::Tcp,
            ports: vec!["8443".into()],
        }],
        ..https
    };
    let err = apps.update(&edited).await.unwrap_err();
    assert!(matches!(err, CoreError::Rejected { .. }));
}
