// ── Console table ──
//
// Every Cloud Avenue organization lives on exactly one console. The
// organization name encodes the console (`cav01ev01ocb0001234` lives on
// console 1), so the table below lets a client find its endpoint from the
// organization name alone.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use strum::Display;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum ConsoleId {
    Console1,
    Console2,
    Console4,
    Console5,
    Console7,
    Console8,
    Console9,
}

/// One console definition.
#[derive(Debug, Clone, Serialize)]
pub struct Console {
    pub id: ConsoleId,
    pub site_id: &'static str,
    pub location: &'static str,
    pub url: &'static str,
    /// S3 control-plane endpoint of the site.
    pub s3_url: &'static str,
    pub org_pattern: &'static str,
}

static DEFINITIONS: [Console; 7] = [
    Console {
        id: ConsoleId::Console1,
        site_id: "vcd-externe-vdr",
        location: "Val de Reuil",
        url: "https://console1.cloudavenue.orange-business.com",
        s3_url: "https://s3-region01.cloudavenue.orange-business.com",
        org_pattern: r"^cav01ev01ocb\d{7}$",
    },
    Console {
        id: ConsoleId::Console2,
        site_id: "vcd-interne-vdr",
        location: "Val de Reuil",
        url: "https://console2.cloudavenue.orange-business.com",
        s3_url: "https://s3-region01.cloudavenue.orange-business.com",
        org_pattern: r"^cav01iv02ocb\d{7}$",
    },
    Console {
        id: ConsoleId::Console4,
        site_id: "vcd-externe-chr",
        location: "Chartres",
        url: "https://console4.cloudavenue.orange-business.com",
        s3_url: "https://s3-region02.cloudavenue.orange-business.com",
        org_pattern: r"^cav02ev04ocb\d{7}$",
    },
    Console {
        id: ConsoleId::Console5,
        site_id: "vcd-interne-chr",
        location: "Chartres",
        url: "https://console5.cloudavenue.orange-business.com",
        s3_url: "https://s3-region02.cloudavenue.orange-business.com",
        org_pattern: r"^cav02iv05ocb\d{7}$",
    },
    Console {
        id: ConsoleId::Console7,
        site_id: "vcd-externe-dmz-vdr",
        location: "Val de Reuil",
        url: "https://console7.cloudavenue.orange-business.com",
        s3_url: "https://s3-region01.cloudavenue.orange-business.com",
        org_pattern: r"^cav01vv07ocb\d{7}$",
    },
    Console {
        id: ConsoleId::Console8,
        site_id: "vcd-externe-dmz-chr",
        location: "Chartres",
        url: "https://console8.cloudavenue.orange-business.com",
        s3_url: "https://s3-region02.cloudavenue.orange-business.com",
        org_pattern: r"^cav02vv08ocb\d{7}$",
    },
    Console {
        id: ConsoleId::Console9,
        site_id: "vcd-qualif",
        location: "Val de Reuil",
        url: "https://console9.cloudavenue.orange-business.com",
        s3_url: "https://s3-region01-qualif.cloudavenue.orange-business.com",
        org_pattern: r"^cav00vv09ocb\d{7}$",
    },
];

static MATCHERS: LazyLock<Vec<(&'static Console, Regex)>> = LazyLock::new(|| {
    DEFINITIONS
        .iter()
        .map(|console| {
            let re = Regex::new(console.org_pattern).expect("valid organization regex");
            (console, re)
        })
        .collect()
});

/// All known consoles.
pub fn consoles() -> &'static [Console] {
    &DEFINITIONS
}

fn matching(org: &str) -> Vec<&'static Console> {
    MATCHERS
        .iter()
        .filter(|(_, re)| re.is_match(org))
        .map(|(console, _)| *console)
        .collect()
}

/// Succeeds iff exactly one console accepts `org`.
pub fn check_organization_name(org: &str) -> Result<(), CoreError> {
    find_by_organization_name(org).map(|_| ())
}

/// The unique console hosting `org`.
pub fn find_by_organization_name(org: &str) -> Result<&'static Console, CoreError> {
    if org.is_empty() {
        return Err(CoreError::empty("organization"));
    }
    match matching(org).as_slice() {
        [console] => Ok(*console),
        [] => Err(CoreError::invalid(
            "organization",
            format!("{org} does not match any console naming scheme"),
        )),
        many => Err(CoreError::Ambiguous {
            entity: "console".into(),
            name: org.to_owned(),
            count: many.len(),
        }),
    }
}

/// Scheme-less, lowercase, trailing-slash-free form used for URL matching.
fn normalize_url(url: &str) -> String {
    let lower = url.trim().to_ascii_lowercase();
    let without_scheme = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower);
    without_scheme.trim_end_matches('/').to_owned()
}

/// The console whose URL equals `url`, ignoring scheme, case, and trailing
/// slashes.
pub fn find_by_url(url: &str) -> Result<&'static Console, CoreError> {
    let wanted = normalize_url(url);
    DEFINITIONS
        .iter()
        .find(|console| normalize_url(console.url) == wanted)
        .ok_or_else(|| CoreError::not_found("console", url))
}
