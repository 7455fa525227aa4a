//! Collection identifier resolution.

use uuid::Uuid;

/// Whether `id` parses as a UUID (hyphenated, simple, braced or urn form).
pub fn is_valid_collection_id(id: &str) -> bool {
    Uuid::parse_str(id).is_ok()
}

/// Pick the collection id for one request.
///
/// A non-empty override that parses as a UUID wins and is returned verbatim.
/// Anything else (absent, empty, malformed) silently falls back to `default_id`.
pub fn resolve_collection_id<'a>(default_id: &'a str, override_id: Option<&'a str>) -> &'a str {
    match override_id {
        Some(id) if !id.is_empty() && is_valid_collection_id(id) => id,
        _ => default_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: &str = "11111111-1111-1111-1111-111111111111";

    #[test]
    fn valid_override_wins() {
        let o = "22222222-2222-2222-2222-222222222222";
        assert_eq!(resolve_collection_id(DEFAULT, Some(o)), o);
    }

    #[test]
    fn override_returned_verbatim() {
        let upper = "A0EEBC99-9C0B-4EF8-BB6D-6BB9BD380A11";
        assert_eq!(resolve_collection_id(DEFAULT, Some(upper)), upper);
        let simple = "a0eebc999c0b4ef8bb6d6bb9bd380a11";
        assert_eq!(resolve_collection_id(DEFAULT, Some(simple)), simple);
        let braced = "{a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11}";
        assert_eq!(resolve_collection_id(DEFAULT, Some(braced)), braced);
    }

    #[test]
    fn missing_or_malformed_falls_back() {
        assert_eq!(resolve_collection_id(DEFAULT, None), DEFAULT);
        assert_eq!(resolve_collection_id(DEFAULT, Some("")), DEFAULT);
        assert_eq!(resolve_collection_id(DEFAULT, Some("not-a-uuid")), DEFAULT);
        assert_eq!(resolve_collection_id(DEFAULT, Some("22222222-2222-2222-2222-22222222222")), DEFAULT);
        assert_eq!(resolve_collection_id(DEFAULT, Some("my-collection")), DEFAULT);
    }

    #[test]
    fn empty_default_is_passed_through() {
        assert_eq!(resolve_collection_id("", Some("nope")), "");
        assert_eq!(resolve_collection_id("", None), "");
    }
}
