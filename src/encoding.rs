use base64::{Engine as _, engine::general_purpose::STANDARD as B64};

/// Encode raw bytes as a bare base64 payload (no data-URL prefix).
#[must_use]
pub fn to_base64(bytes: &[u8]) -> String {
    B64.encode(bytes)
}

/// Build a `data:<mime>;base64,<payload>` URL for in-page previews.
#[must_use]
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", B64.encode(bytes))
}

/// Return only the base64 payload of a data URL, or the input unchanged
/// when it carries no `data:...;base64,` prefix.
#[must_use]
pub fn strip_data_url(s: &str) -> &str {
    if s.starts_with("data:")
        && let Some((_, payload)) = s.split_once(',')
    {
        return payload;
    }
    s
}

/// Decode a data URL (or a bare base64 payload) into its declared MIME type
/// and raw bytes. Without a prefix the MIME falls back to `image/jpeg`, same
/// as an upload field with no declared type.
///
/// # Errors
///
/// Returns an error if the payload is not valid base64.
pub fn from_data_url(s: &str) -> anyhow::Result<(String, Vec<u8>)> {
    let mime = s
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once([';', ',']))
        .map_or_else(|| "image/jpeg".to_string(), |(m, _)| m.to_string());
    let bytes = B64.decode(strip_data_url(s).trim())?;
    Ok((mime, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine as _, engine::general_purpose::STANDARD as B64};

    #[test]
    fn base64_round_trips_arbitrary_bytes() {
        let inputs: [&[u8]; 4] = [b"", b"a", &[0xff, 0x00, 0x7f, 0x80], b"hello recipes"];
        for bytes in inputs {
            let encoded = to_base64(bytes);
            assert_eq!(B64.decode(&encoded).unwrap(), bytes);
        }
    }

    #[test]
    fn data_url_carries_mime_and_payload() {
        let url = to_data_url("image/png", b"\x89PNG");
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(B64.decode(strip_data_url(&url)).unwrap(), b"\x89PNG");
    }

    #[test]
    fn strip_is_passthrough_without_prefix() {
        assert_eq!(strip_data_url("aGVsbG8="), "aGVsbG8=");
    }

    #[test]
    fn strip_removes_prefix_regardless_of_mime() {
        assert_eq!(strip_data_url("data:image/jpeg;base64,abc"), "abc");
        assert_eq!(strip_data_url("data:image/webp;base64,abc"), "abc");
    }

    #[test]
    fn from_data_url_recovers_mime_and_bytes() {
        let url = to_data_url("image/webp", b"RIFF");
        let (mime, bytes) = from_data_url(&url).unwrap();
        assert_eq!(mime, "image/webp");
        assert_eq!(bytes, b"RIFF");
    }

    #[test]
    fn from_data_url_accepts_bare_payload_with_fallback_mime() {
        let (mime, bytes) = from_data_url(&to_base64(b"hello")).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn from_data_url_rejects_garbage_payload() {
        assert!(from_data_url("data:image/png;base64,not base64!").is_err());
    }
}
