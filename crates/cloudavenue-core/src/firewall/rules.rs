// ── Firewall rule engine ──
//
// Pure transformations between domain rules and the user-defined bucket the
// server stores: priority encoding in the rule name, content hashing, stable
// ordering, validation, and merging of creates and updates into the bucket.

use std::sync::LazyLock;

use cloudavenue_api::openapi::models::{EntityRef, FirewallRuleRecord};
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::firewall::{FirewallRule, IpProtocol, RuleAction, RuleDirection};
use crate::urn::{self, UrnKind};
use crate::validate;

pub const MIN_PRIORITY: u16 = 1;
pub const MAX_PRIORITY: u16 = 1000;
pub const MAX_COMMENT_LEN: usize = 2048;

static PRIORITY_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0|[1-9][0-9]{0,3})_(.*)$").expect("valid priority prefix regex")
});

// ── Naming ───────────────────────────────────────────────────────────

/// On-wire name of a rule: `"<priority>_<name>"`.
pub fn encode_name(priority: u16, name: &str) -> String {
    format!("{priority}_{name}")
}

/// Split an on-wire name into priority and name.
///
/// Names without a canonical numeric prefix decode to priority 0 and are
/// returned whole.
pub fn decode_name(wire: &str) -> (u16, String) {
    PRIORITY_PREFIX
        .captures(wire)
        .and_then(|caps| {
            let priority = caps.get(1)?.as_str().parse::<u16>().ok()?;
            Some((priority, caps.get(2)?.as_str().to_owned()))
        })
        .unwrap_or_else(|| (0, wire.to_owned()))
}

/// Content identity of a rule: `hex(sha256("<name>/<action>/<direction>"))`.
pub fn rule_hash(name: &str, action: RuleAction, direction: RuleDirection) -> String {
    let digest = Sha256::digest(format!("{name}/{action}/{direction}").as_bytes());
    hex::encode(digest)
}

/// Stable sort by `(priority, name)`.
pub fn sort_rules(rules: &mut [FirewallRule]) {
    rules.sort_by(|a, b| (a.priority, &a.name).cmp(&(b.priority, &b.name)));
}

// ── Validation ───────────────────────────────────────────────────────

pub fn validate(rule: &FirewallRule) -> Result<(), CoreError> {
    if rule.name.trim().is_empty() {
        return Err(CoreError::empty("firewall rule name"));
    }
    if rule
        .comment
        .as_ref()
        .is_some_and(|c| c.chars().count() > MAX_COMMENT_LEN)
    {
        return Err(CoreError::invalid(
            "firewall rule comment",
            format!("longer than {MAX_COMMENT_LEN} characters"),
        ));
    }
    if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&rule.priority) {
        return Err(CoreError::invalid(
            "firewall rule priority",
            format!(
                "{} is outside {MIN_PRIORITY}..={MAX_PRIORITY}",
                rule.priority
            ),
        ));
    }

    for ip in rule.source_ips.iter().chain(&rule.destination_ips) {
        if !(validate::is_ipv4(ip) || validate::is_cidr(ip) || validate::is_ipv4_range(ip)) {
            return Err(CoreError::invalid(
                "firewall rule ip address",
                format!("{ip} is not an IPv4 address, CIDR or IPv4 range"),
            ));
        }
    }

    let references = [
        (&rule.source_groups, UrnKind::SecurityGroup, "source firewall group"),
        (&rule.destination_groups, UrnKind::SecurityGroup, "destination firewall group"),
        (&rule.app_port_profiles, UrnKind::AppPortProfile, "application port profile"),
        (
            &rule.network_context_profiles,
            UrnKind::NetworkContextProfile,
            "network context profile",
        ),
    ];
    for (ids, kind, field) in references {
        if let Some(bad) = ids.iter().find(|id| !urn::is_kind(id, kind)) {
            return Err(CoreError::invalid(field, format!("{bad} is not a {kind} urn")));
        }
    }

    Ok(())
}

// ── Bucket merging ───────────────────────────────────────────────────

/// Append `new` to the bucket and restore the order.
pub fn merge_create(mut existing: Vec<FirewallRule>, new: Vec<FirewallRule>) -> Vec<FirewallRule> {
    existing.extend(new);
    sort_rules(&mut existing);
    existing
}

/// Apply `updates` to the bucket.
///
/// Each update replaces the rule with the same id or, lacking an id, the
/// rule with the same hash, keeping the server id. Unmatched updates are
/// appended.
pub fn merge_update(
    mut existing: Vec<FirewallRule>,
    updates: Vec<FirewallRule>,
) -> Vec<FirewallRule> {
    for mut update in updates {
        let position = match &update.id {
            Some(id) => existing.iter().position(|r| r.id.as_ref() == Some(id)),
            None => {
                let hash = update.hash();
                existing.iter().position(|r| r.hash() == hash)
            }
        };
        match position {
            Some(index) => {
                if update.id.is_none() {
                    update.id = existing[index].id.clone();
                }
                existing[index] = update;
            }
            None => existing.push(update),
        }
    }
    sort_rules(&mut existing);
    existing
}

// ── Wire conversion ──────────────────────────────────────────────────

fn refs(ids: &[String]) -> Vec<EntityRef> {
    ids.iter().map(EntityRef::from_id).collect()
}

fn ids(refs: Vec<EntityRef>) -> Vec<String> {
    refs.into_iter().map(|r| r.id).collect()
}

pub fn to_record(rule: &FirewallRule) -> FirewallRuleRecord {
    FirewallRuleRecord {
        id: rule.id.clone(),
        name: encode_name(rule.priority, &rule.name),
        comments: rule.comment.clone(),
        enabled: rule.enabled,
        action_value: rule.action.to_string(),
        direction: rule.direction.to_string(),
        ip_protocol: rule.ip_protocol.to_string(),
        logging: rule.logging,
        source_firewall_groups: refs(&rule.source_groups),
        destination_firewall_groups: refs(&rule.destination_groups),
        application_port_profiles: refs(&rule.app_port_profiles),
        network_context_profiles: refs(&rule.network_context_profiles),
        source_firewall_ip_addresses: rule.source_ips.clone(),
        destination_firewall_ip_addresses: rule.destination_ips.clone(),
    }
}

pub fn from_record(record: FirewallRuleRecord) -> Result<FirewallRule, CoreError> {
    let (priority, name) = decode_name(&record.name);
    let action: RuleAction = record.action_value.parse().map_err(|_| {
        CoreError::invalid("firewall rule action", record.action_value.clone())
    })?;
    let direction: RuleDirection = record
        .direction
        .parse()
        .map_err(|_| CoreError::invalid("firewall rule direction", record.direction.clone()))?;
    let ip_protocol: IpProtocol = record.ip_protocol.parse().map_err(|_| {
        CoreError::invalid("firewall rule ip protocol", record.ip_protocol.clone())
    })?;

    Ok(FirewallRule {
        id: record.id,
        name,
        comment: record.comments.filter(|c| !c.is_empty()),
        priority,
        action,
        enabled: record.enabled,
        direction,
        ip_protocol,
        logging: record.logging,
        source_ips: record.source_firewall_ip_addresses,
        destination_ips: record.destination_firewall_ip_addresses,
        source_groups: ids(record.source_firewall_groups),
        destination_groups: ids(record.destination_firewall_groups),
        app_port_profiles: ids(record.application_port_profiles),
        network_context_profiles: ids(record.network_context_profiles),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rule(priority: u16, name: &str) -> FirewallRule {
        FirewallRule::new(name, priority, RuleAction::Allow, RuleDirection::In)
    }

    #[test]
    fn encoded_names_follow_priority_then_name() {
        let mut rules = vec![rule(10, "b"), rule(10, "a"), rule(5, "z")];
        sort_rules(&mut rules);
        let wire: Vec<String> = rules.iter().map(|r| to_record(r).name).collect();
        assert_eq!(wire, vec!["5_z", "10_a", "10_b"]);
    }

    #[test]
    fn decode_then_encode_restores_prefixed_names() {
        for wire in ["1_web", "1000_ssh_in", "0_legacy", "42_", "7_with_underscores_inside"] {
            let (priority, name) = decode_name(wire);
            assert_eq!(encode_name(priority, &name), wire);
        }
    }

    #[test]
    fn unprefixed_and_non_canonical_names_decode_to_priority_zero() {
        assert_eq!(decode_name("svc_web"), (0, "svc_web".to_owned()));
        assert_eq!(decode_name("007_bond"), (0, "007_bond".to_owned()));
        assert_eq!(decode_name("12345_big"), (0, "12345_big".to_owned()));
    }

    #[test]
    fn hash_covers_name_action_direction_only() {
        let a = rule(1, "web");
        let mut b = rule(900, "web");
        b.logging = true;
        b.source_ips = vec!["10.0.0.1".into()];
        assert_eq!(a.hash(), b.hash());

        let c = FirewallRule::new("web", 1, RuleAction::Drop, RuleDirection::In);
        let d = FirewallRule::new("web", 1, RuleAction::Allow, RuleDirection::Out);
        assert_ne!(a.hash(), c.hash());
        assert_ne!(a.hash(), d.hash());
        assert_eq!(a.hash().len(), 64);
    }

    #[test]
    fn update_replaces_by_hash_and_keeps_server_id() {
        let mut existing = rule(0, "svc_web");
        existing.id = Some("urn:vcloud:firewallRule:1".into());
        let other = rule(3, "dns");

        let mut update = rule(0, "svc_web");
        update.logging = true;

        let merged = merge_update(vec![existing, other], vec![update]);
        assert_eq!(merged.len(), 2);
        let web = merged.iter().find(|r| r.name == "svc_web").unwrap();
        assert!(web.logging);
        assert_eq!(web.id.as_deref(), Some("urn:vcloud:firewallRule:1"));
    }

    #[test]
    fn update_matches_by_id_before_hash() {
        let mut existing = rule(1, "old-name");
        existing.id = Some("r1".into());
        let mut update = rule(2, "new-name");
        update.id = Some("r1".into());

        let merged = merge_update(vec![existing], vec![update]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "new-name");
    }

    #[test]
    fn unmatched_update_is_appended_in_order() {
        let merged = merge_update(vec![rule(5, "a")], vec![rule(1, "b")]);
        let names: Vec<&str> = merged.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn validation_rejects_bad_rules() {
        assert!(matches!(validate(&rule(1, " ")), Err(CoreError::Empty { .. })));
        assert!(validate(&rule(0, "x")).is_err());
        assert!(validate(&rule(1001, "x")).is_err());

        let mut long = rule(1, "x");
        long.comment = Some("c".repeat(MAX_COMMENT_LEN + 1));
        assert!(validate(&long).is_err());

        let mut ips = rule(1, "x");
        ips.source_ips = vec!["10.0.0.0/8".into(), "10.0.0.1-10.0.0.9".into()];
        ips.destination_ips = vec!["192.168.1.1".into()];
        assert!(validate(&ips).is_ok());
        ips.destination_ips.push("not-an-ip".into());
        assert!(validate(&ips).is_err());

        let mut groups = rule(1, "x");
        groups.source_groups = vec!["urn:vcloud:network:2b1c9a3e-1f4d-4c5b-8a6e-7d8f9a0b1c2d".into()];
        assert!(validate(&groups).is_err());
        groups.source_groups = vec!["urn:vcloud:firewallGroup:2b1c9a3e-1f4d-4c5b-8a6e-7d8f9a0b1c2d".into()];
        assert!(validate(&groups).is_ok());
    }

    #[test]
    fn record_conversion_decodes_priority() {
        let record = FirewallRuleRecord {
            id: Some("r1".into()),
            name: "20_https".into(),
            enabled: true,
            action_value: "ALLOW".into(),
            direction: "IN_OUT".into(),
            ip_protocol: "IPV4_IPV6".into(),
            ..FirewallRuleRecord::default()
        };
        let rule = from_record(record.clone()).unwrap();
        assert_eq!(rule.priority, 20);
        assert_eq!(rule.name, "https");
        assert_eq!(rule.direction, RuleDirection::InOut);
        assert_eq!(to_record(&rule), record);
    }
}
