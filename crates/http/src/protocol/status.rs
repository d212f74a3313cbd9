//! The fixed status-code table.
//!
//! Only the codes this runtime actually emits (or expects applications to
//! emit) are listed. Anything else is written to the wire with an empty
//! reason phrase rather than a guessed one.

/// Looks up the canonical reason phrase for a status code.
pub fn reason_phrase(code: u16) -> Option<&'static str> {
    match code {
        200 => Some("OK"),
        201 => Some("Created"),
        202 => Some("Accepted"),
        204 => Some("No Content"),
        301 => Some("Moved Permanently"),
        302 => Some("Found"),
        304 => Some("Not Modified"),
        400 => Some("Bad Request"),
        401 => Some("Unauthorized"),
        403 => Some("Forbidden"),
        404 => Some("Not Found"),
        500 => Some("Internal Server Error"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_have_text() {
        assert_eq!(reason_phrase(200), Some("OK"));
        assert_eq!(reason_phrase(404), Some("Not Found"));
        assert_eq!(reason_phrase(500), Some("Internal Server Error"));
    }

    #[test]
    fn unknown_codes_have_none() {
        assert_eq!(reason_phrase(299), None);
        assert_eq!(reason_phrase(999), None);
    }
}
