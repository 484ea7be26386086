//! Identifier parsing. Every path identifier goes through here before any lookup,
//! so malformed input is an `InvalidArgument` and never a `NotFound`.

use uuid::Uuid;

use crate::error::{AppError, Result};

/// Parses `raw` as an identifier of the given entity kind ("video", "playlist", ...).
pub fn parse_id(kind: &str, raw: &str) -> Result<Uuid> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid(format!("{} id is required", capitalize(kind))));
    }
    Uuid::parse_str(trimmed).map_err(|_| AppError::invalid(format!("Invalid {kind} id")))
}

/// Same as [`parse_id`] for optional query parameters; blank counts as absent.
pub fn parse_optional_id(kind: &str, raw: Option<&str>) -> Result<Option<Uuid>> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse_id(kind, value).map(Some),
        None => Ok(None),
    }
}

/// Fresh time-ordered identifier for a new record.
pub fn new_id() -> Uuid {
    Uuid::now_v7()
}

fn capitalize(kind: &str) -> String {
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hyphenated_uuid() {
        let id = new_id();
        assert_eq!(parse_id("video", &id.to_string()).unwrap(), id);
        assert_eq!(parse_id("video", &format!("  {id} ")).unwrap(), id);
    }

    #[test]
    fn malformed_id_is_invalid_argument() {
        let err = parse_id("video", "64f1c0ffee").unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(ref m) if m == "Invalid video id"));
    }

    #[test]
    fn blank_id_is_required() {
        let err = parse_id("comment", "   ").unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(ref m) if m == "Comment id is required"));
    }

    #[test]
    fn optional_blank_is_absent() {
        assert_eq!(parse_optional_id("user", None).unwrap(), None);
        assert_eq!(parse_optional_id("user", Some("")).unwrap(), None);
        assert!(parse_optional_id("user", Some("nope")).is_err());
    }

    #[test]
    fn new_ids_are_time_ordered() {
        let first = new_id();
        let second = new_id();
        assert!(first < second);
    }
}
