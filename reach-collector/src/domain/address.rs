//! Best-effort prefecture / municipality extraction from Japanese addresses.
//!
//! This is filter metadata, not a geocoder. Inputs that do not look like
//! `<prefecture><municipality>...` simply yield no fields.

use std::sync::LazyLock;

use regex::Regex;

/// Prefecture prefix followed by a non-empty remainder.
static PREFECTURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(東京都|北海道|(?:京都|大阪)府|.{2,3}県)(.+)$").expect("valid prefecture regex")
});

/// Shortest leading run ending in a city/ward/town/village marker.
static MUNICIPALITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?(?:市|区|町|村))").expect("valid municipality regex"));

/// Fields derived from a free-text address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAddress {
    pub pref: Option<String>,
    pub city_ward: Option<String>,
}

/// Parse the prefecture and city/ward out of `address`.
///
/// # Examples
///
/// ```
/// use reach_collector::domain::parse_address;
///
/// let parsed = parse_address("東京都中野区中野1-1-1");
/// assert_eq!(parsed.pref.as_deref(), Some("東京都"));
/// assert_eq!(parsed.city_ward.as_deref(), Some("中野区"));
///
/// assert_eq!(parse_address("Unknown Place"), Default::default());
/// ```
pub fn parse_address(address: &str) -> ParsedAddress {
    let Some(caps) = PREFECTURE.captures(address) else {
        return ParsedAddress::default();
    };

    let pref = caps.get(1).map(|m| m.as_str().to_string());
    let city_ward = caps
        .get(2)
        .and_then(|rest| MUNICIPALITY.captures(rest.as_str()))
        .and_then(|m| m.get(1))
        .map(|m| m.as_str().to_string());

    ParsedAddress { pref, city_ward }
}
