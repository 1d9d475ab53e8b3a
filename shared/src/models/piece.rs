//! Piece identity: scannable codes and lookup addresses
//!
//! Code layout: `{PREFIX}-{TIME}-{RANDOM}`
//! - TIME: milliseconds since the Unix epoch, base-36, zero-padded to 9
//!   characters so codes sort chronologically
//! - RANDOM: 8 symbols from the Crockford base-32 alphabet
//!
//! Codes are unique with overwhelming probability but nothing here checks an
//! order store for an existing code.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix used when a deployment does not configure its own
pub const DEFAULT_PIECE_PREFIX: &str = "PC";

const TIME_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const TIME_WIDTH: usize = 9;

/// Crockford base-32 symbols (no I, L, O, U)
const SUFFIX_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
const SUFFIX_LEN: usize = 8;

/// Unique code printed on a produced piece.
/// Equality is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceCode(String);

impl PieceCode {
    /// Generate a fresh code with the default prefix
    pub fn generate() -> Self {
        Self::generate_with_prefix(DEFAULT_PIECE_PREFIX)
    }

    /// Generate a fresh code. Every call is independent; there is no counter.
    pub fn generate_with_prefix(prefix: &str) -> Self {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect();

        Self(format!("{}-{}-{}", prefix, encode_time(millis), suffix))
    }

    /// Code fabricated for the `index`-th (0-based) generic piece of an
    /// order that has no item detail. Stable across calls.
    pub fn synthetic(order_id: Uuid, index: usize) -> Self {
        let simple = order_id.simple().to_string().to_uppercase();
        Self(format!("SYN-{}-{}", simple, index + 1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PieceCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl From<&str> for PieceCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl std::fmt::Display for PieceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn encode_time(mut value: u64) -> String {
    let mut buf = [b'0'; TIME_WIDTH];
    for slot in buf.iter_mut().rev() {
        *slot = TIME_ALPHABET[(value % 36) as usize];
        value /= 36;
    }
    buf.iter().map(|&b| b as char).collect()
}

/// Address encoded into a piece's scannable label:
/// `.../piece/{code}[?workshop={id}]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceAddress {
    pub code: PieceCode,
    pub workshop: Option<Uuid>,
}

impl PieceAddress {
    /// Extract the code and optional workshop hint from an address.
    /// An unparseable workshop id is ignored rather than rejected.
    pub fn parse(address: &str) -> Option<Self> {
        let (path, query) = match address.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (address, None),
        };

        let (_, rest) = path.rsplit_once("/piece/")?;
        let code = rest.trim_end_matches('/');
        if code.is_empty() || code.contains('/') {
            return None;
        }

        let workshop = query.and_then(|q| {
            q.split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(key, _)| *key == "workshop")
                .and_then(|(_, value)| Uuid::parse_str(value).ok())
        });

        Some(Self {
            code: PieceCode::from(code),
            workshop,
        })
    }

    /// Render the address under `base_url`
    pub fn to_url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        match self.workshop {
            Some(workshop) => format!("{}/piece/{}?workshop={}", base, self.code, workshop),
            None => format!("{}/piece/{}", base, self.code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_code_shape() {
        let code = PieceCode::generate();
        let parts: Vec<&str> = code.as_str().split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "PC");
        assert_eq!(parts[1].len(), TIME_WIDTH);
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(parts[2].bytes().all(|b| SUFFIX_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_custom_prefix() {
        let code = PieceCode::generate_with_prefix("KW");
        assert!(code.as_str().starts_with("KW-"));
    }

    #[test]
    fn test_ten_thousand_codes_are_unique() {
        let codes: HashSet<PieceCode> = (0..10_000).map(|_| PieceCode::generate()).collect();
        assert_eq!(codes.len(), 10_000);
    }

    #[test]
    fn test_time_component_is_chronological() {
        assert!(encode_time(1_000) < encode_time(1_001));
        assert!(encode_time(35) < encode_time(36));
        assert_eq!(encode_time(0), "000000000");
    }

    #[test]
    fn test_equality_is_case_sensitive() {
        assert_ne!(PieceCode::from("PC-ABC"), PieceCode::from("pc-abc"));
    }

    #[test]
    fn test_synthetic_codes_are_stable() {
        let order_id = Uuid::new_v4();
        assert_eq!(PieceCode::synthetic(order_id, 0), PieceCode::synthetic(order_id, 0));
        assert_ne!(PieceCode::synthetic(order_id, 0), PieceCode::synthetic(order_id, 1));
        assert!(PieceCode::synthetic(order_id, 2).as_str().ends_with("-3"));
    }

    #[test]
    fn test_synthetic_codes_differ_for_orders_with_shared_prefix() {
        let first = Uuid::from_u128(0x1234_5678_0000_0000_0000_0000_0000_0001);
        let second = Uuid::from_u128(0x1234_5678_0000_0000_0000_0000_0000_0002);
        assert_ne!(PieceCode::synthetic(first, 0), PieceCode::synthetic(second, 0));
    }

    #[test]
    fn test_parse_address_with_workshop() {
        let workshop = Uuid::new_v4();
        let url = format!("https://shop.example/app/piece/PC-0ABC-XYZ?workshop={}", workshop);
        let address = PieceAddress::parse(&url).unwrap();

        assert_eq!(address.code.as_str(), "PC-0ABC-XYZ");
        assert_eq!(address.workshop, Some(workshop));
        assert_eq!(address.to_url("https://shop.example/app"), url);
    }

    #[test]
    fn test_parse_address_without_workshop() {
        let address = PieceAddress::parse("/piece/PC-1").unwrap();
        assert_eq!(address.code.as_str(), "PC-1");
        assert_eq!(address.workshop, None);
    }

    #[test]
    fn test_parse_address_rejects_other_paths() {
        assert!(PieceAddress::parse("/orders/123").is_none());
        assert!(PieceAddress::parse("/piece/").is_none());
        assert!(PieceAddress::parse("/piece/a/b").is_none());
    }

    #[test]
    fn test_parse_address_ignores_bad_workshop() {
        let address = PieceAddress::parse("/piece/PC-1?workshop=nope").unwrap();
        assert_eq!(address.workshop, None);
    }
}
