//! Upload hygiene: filename sanitizing and content type detection.

use crate::defaults::FALLBACK_CONTENT_TYPE;

/// Maximum length of a stored original file name.
const FILENAME_MAX_LEN: usize = 255;

/// Maximum length of a preserved extension, dot included.
const EXTENSION_MAX_LEN: usize = 16;

/// Sanitize a client-supplied file name for storage and display.
///
/// Path components are stripped, reserved and control characters are
/// replaced with `_`, and the result is capped at 255 bytes with the
/// extension preserved.
pub fn sanitize_filename(filename: &str) -> String {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let sanitized = sanitized.trim();
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        return "unnamed_file".to_string();
    }

    if sanitized.len() > FILENAME_MAX_LEN {
        let ext = storage_extension(sanitized);
        let mut cut = FILENAME_MAX_LEN - ext.len();
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        return format!("{}{}", &sanitized[..cut], ext);
    }

    sanitized.to_string()
}

/// Extension (with leading dot) used when naming the stored blob.
///
/// Returns an empty string when the name has no usable extension. Only
/// ASCII alphanumerics are kept so the blob name stays filesystem-safe.
pub fn storage_extension(filename: &str) -> String {
    let Some(dot) = filename.rfind('.') else {
        return String::new();
    };
    let ext = &filename[dot + 1..];
    if ext.is_empty()
        || ext.len() + 1 > EXTENSION_MAX_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
        || dot == 0
    {
        return String::new();
    }
    format!(".{}", ext.to_ascii_lowercase())
}

/// Detect the content type of an upload.
///
/// Magic bytes win; otherwise the client's declared type is trusted when it
/// looks like a MIME type; otherwise `application/octet-stream`.
pub fn detect_content_type(data: &[u8], claimed: Option<&str>) -> String {
    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }

    match claimed.map(str::trim) {
        Some(mime) if is_valid_mime_type(mime) => mime.to_ascii_lowercase(),
        _ => FALLBACK_CONTENT_TYPE.to_string(),
    }
}

/// Loose `type/subtype` shape check.
pub fn is_valid_mime_type(mime: &str) -> bool {
    let Some((kind, subtype)) = mime.split_once('/') else {
        return false;
    };
    let token = |s: &str| {
        !s.is_empty()
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-' | '_'))
    };
    let subtype = subtype.split(';').next().unwrap_or(subtype).trim();
    token(kind) && token(subtype)
}
