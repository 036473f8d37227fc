//! Identifier generation.
//!
//! Records are keyed by opaque strings. Seeded and imported data may carry
//! arbitrary ids (`db-1`, `temp-0`); everything created by the service gets
//! the text form of a UUIDv7, so freshly created ids sort by creation time.

use uuid::Uuid;

/// Generate a new record identifier (UUIDv7 text form).
#[inline]
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

/// Generate a prefixed identifier, e.g. `w-0190...` for dashboard widgets.
pub fn new_prefixed_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::now_v7().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_is_parseable_v7() {
        let id = new_id();
        let parsed = Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
    }

    #[test]
    fn test_new_ids_are_unique() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_prefixed_id() {
        let id = new_prefixed_id("w");
        assert!(id.starts_with("w-"));
        assert_eq!(id.len(), 2 + 32);
    }
}
