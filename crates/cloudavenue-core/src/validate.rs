// ── Literal validators ──
//
// Shared checks for IP literals, ports, and e-mail addresses used by the
// firewall, group, VCDA, and IAM modules.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

pub fn is_ipv4(s: &str) -> bool {
    s.parse::<Ipv4Addr>().is_ok()
}

pub fn is_ipv6(s: &str) -> bool {
    s.parse::<Ipv6Addr>().is_ok()
}

/// `a.b.c.d/n` (IPv4) or `x::y/n` (IPv6).
pub fn is_cidr(s: &str) -> bool {
    let Some((addr, prefix)) = s.split_once('/') else {
        return false;
    };
    let Ok(prefix) = prefix.parse::<u8>() else {
        return false;
    };
    (is_ipv4(addr) && prefix <= 32) || (is_ipv6(addr) && prefix <= 128)
}

/// `a.b.c.d-e.f.g.h` with start <= end.
pub fn is_ipv4_range(s: &str) -> bool {
    let Some((start, end)) = s.split_once('-') else {
        return false;
    };
    match (start.trim().parse::<Ipv4Addr>(), end.trim().parse::<Ipv4Addr>()) {
        (Ok(start), Ok(end)) => start <= end,
        _ => false,
    }
}

/// Network address of an IPv4 CIDR, e.g. `100.113.99.96` for `100.113.99.100/27`.
pub fn ipv4_network_address(cidr: &str) -> Option<Ipv4Addr> {
    let (addr, prefix) = cidr.split_once('/')?;
    let addr = addr.parse::<Ipv4Addr>().ok()?;
    let prefix = prefix.parse::<u32>().ok().filter(|p| *p <= 32)?;
    let mask = u32::MAX.checked_shl(32 - prefix).unwrap_or(0);
    Some(Ipv4Addr::from(u32::from(addr) & mask))
}

/// A port (`443`) or an inclusive range (`8000-8080`) within 1..=65535.
pub fn is_port_literal(s: &str) -> bool {
    let parse = |p: &str| p.trim().parse::<u16>().ok().filter(|p| *p > 0);
    match s.split_once('-') {
        Some((start, end)) => match (parse(start), parse(end)) {
            (Some(start), Some(end)) => start <= end,
            _ => false,
        },
        None => parse(s).is_some(),
    }
}

pub fn is_email(s: &str) -> bool {
    EMAIL.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip_literals() {
        assert!(is_ipv4("10.0.0.1"));
        assert!(!is_ipv4("10.0.0.256"));
        assert!(is_cidr("10.0.0.0/8"));
        assert!(is_cidr("2001:db8::/32"));
        assert!(!is_cidr("10.0.0.0/33"));
        assert!(!is_cidr("10.0.0.0"));
        assert!(is_ipv4_range("10.0.0.1-10.0.0.20"));
        assert!(!is_ipv4_range("10.0.0.20-10.0.0.1"));
    }

    #[test]
    fn network_address_of_cidr() {
        assert_eq!(
            ipv4_network_address("100.113.99.96/27"),
            Some(Ipv4Addr::new(100, 113, 99, 96))
        );
        assert_eq!(
            ipv4_network_address("192.168.10.77/24"),
            Some(Ipv4Addr::new(192, 168, 10, 0))
        );
        assert_eq!(ipv4_network_address("0.0.0.0/0"), Some(Ipv4Addr::UNSPECIFIED));
        assert_eq!(ipv4_network_address("garbage"), None);
    }

    #[test]
    fn port_literals() {
        assert!(is_port_literal("443"));
        assert!(is_port_literal("8000-8080"));
        assert!(!is_port_literal("0"));
        assert!(!is_port_literal("70000"));
        assert!(!is_port_literal("9000-8000"));
        assert!(!is_port_literal("http"));
    }

    #[test]
    fn email_addresses() {
        assert!(is_email("jane.doe@example.com"));
        assert!(!is_email("jane.doe@"));
        assert!(!is_email("not an email"));
    }
}
