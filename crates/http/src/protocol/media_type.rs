//! The fixed extension-to-content-type table used by `send_file`.

/// Looks up the content type for a file extension.
///
/// Accepts the extension with or without the leading dot, in any case.
/// Unknown extensions fall back to `application/octet-stream`.
pub fn content_type_for(ext: &str) -> &'static str {
    match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "html" => "text/html; charset=UTF-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        "xml" => "application/xml",
        "zip" => "application/zip",
        "csv" => "text/csv",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_dot_is_optional() {
        assert_eq!(content_type_for(".html"), "text/html; charset=UTF-8");
        assert_eq!(content_type_for("html"), "text/html; charset=UTF-8");
    }

    #[test]
    fn unknown_extension_falls_back() {
        assert_eq!(content_type_for("wasm"), "application/octet-stream");
        assert_eq!(content_type_for(""), "application/octet-stream");
    }
}
