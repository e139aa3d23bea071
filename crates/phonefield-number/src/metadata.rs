#![forbid(unsafe_code)]

//! Per-region dialing metadata used by [`MetadataParser`](crate::MetadataParser).
//!
//! The table covers the calling codes most fields meet in practice. Every
//! entry records the national prefix (trunk code) that is dropped when a
//! number is written in international form, the prefix used to dial out of
//! the region, and the accepted length range of the national significant
//! number.
//!
//! # Invariants
//!
//! 1. Calling codes form a prefix-free set (E.164), so longest-match and
//!    first-match lookups agree.
//! 2. When several regions share a calling code, the first entry in the
//!    table is the main region for that code (`US` for `+1`, `RU` for `+7`).

use std::ops::RangeInclusive;
use std::sync::LazyLock;

use ahash::AHashMap;

use crate::region::RegionCode;

/// Dialing metadata for a single region.
#[derive(Debug, Clone)]
pub struct RegionMetadata {
    pub region: &'static str,
    pub calling_code: u16,
    pub national_prefix: Option<&'static str>,
    pub international_prefix: &'static str,
    pub national_lengths: RangeInclusive<usize>,
}

macro_rules! region {
    ($region:literal, $code:literal, $np:expr, $ip:literal, $lengths:expr) => {
        RegionMetadata {
            region: $region,
            calling_code: $code,
            national_prefix: $np,
            international_prefix: $ip,
            national_lengths: $lengths,
        }
    };
}

static TABLE: &[RegionMetadata] = &[
    region!("US", 1, Some("1"), "011", 10..=10),
    region!("CA", 1, Some("1"), "011", 10..=10),
    region!("RU", 7, Some("8"), "810", 10..=10),
    region!("EG", 20, Some("0"), "00", 8..=10),
    region!("ZA", 27, Some("0"), "00", 9..=9),
    region!("NL", 31, Some("0"), "00", 9..=9),
    region!("BE", 32, Some("0"), "00", 8..=9),
    region!("FR", 33, Some("0"), "00", 9..=9),
    region!("ES", 34, None, "00", 9..=9),
    region!("IT", 39, None, "00", 6..=11),
    region!("CH", 41, Some("0"), "00", 9..=9),
    region!("AT", 43, Some("0"), "00", 4..=13),
    region!("GB", 44, Some("0"), "00", 9..=10),
    region!("DK", 45, None, "00", 8..=8),
    region!("SE", 46, Some("0"), "00", 7..=10),
    region!("NO", 47, None, "00", 8..=8),
    region!("PL", 48, None, "00", 9..=9),
    region!("DE", 49, Some("0"), "00", 6..=13),
    region!("MX", 52, None, "00", 10..=10),
    region!("AR", 54, Some("0"), "00", 10..=10),
    region!("BR", 55, Some("0"), "00", 10..=11),
    region!("AU", 61, Some("0"), "0011", 9..=9),
    region!("NZ", 64, Some("0"), "00", 8..=10),
    region!("SG", 65, None, "000", 8..=8),
    region!("JP", 81, Some("0"), "010", 9..=10),
    region!("KR", 82, Some("0"), "001", 8..=10),
    region!("CN", 86, Some("0"), "00", 7..=11),
    region!("TR", 90, Some("0"), "00", 10..=10),
    region!("IN", 91, Some("0"), "00", 10..=10),
    region!("NG", 234, Some("0"), "009", 8..=10),
    region!("PT", 351, None, "00", 9..=9),
    region!("IE", 353, Some("0"), "00", 7..=9),
    region!("FI", 358, Some("0"), "00", 5..=12),
    region!("UA", 380, Some("0"), "00", 9..=9),
    region!("HK", 852, None, "001", 8..=8),
    region!("AE", 971, Some("0"), "00", 8..=9),
    region!("IL", 972, Some("0"), "00", 8..=9),
];

static BY_REGION: LazyLock<AHashMap<&'static str, &'static RegionMetadata>> =
    LazyLock::new(|| TABLE.iter().map(|m| (m.region, m)).collect());

static BY_CODE: LazyLock<AHashMap<u16, &'static RegionMetadata>> = LazyLock::new(|| {
    let mut map = AHashMap::new();
    for meta in TABLE {
        map.entry(meta.calling_code).or_insert(meta);
    }
    map
});

/// Metadata for a region, if the region is known.
#[must_use]
pub fn for_region(region: RegionCode) -> Option<&'static RegionMetadata> {
    BY_REGION.get(region.as_str()).copied()
}

/// Main-region metadata for a calling code, if the code is known.
#[must_use]
pub fn for_calling_code(code: u16) -> Option<&'static RegionMetadata> {
    BY_CODE.get(&code).copied()
}

/// Split a leading calling code off `digits`.
///
/// Returns the metadata for the matched code and the remaining digits.
#[must_use]
pub fn split_calling_code(digits: &str) -> Option<(&'static RegionMetadata, &str)> {
    (1..=3.min(digits.len())).find_map(|len| {
        let code: u16 = digits[..len].parse().ok()?;
        for_calling_code(code).map(|meta| (meta, &digits[len..]))
    })
}

/// All known regions, in table order.
pub fn regions() -> impl Iterator<Item = &'static RegionMetadata> {
    TABLE.iter()
}
