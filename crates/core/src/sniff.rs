//! Content-type sniffing from raw bytes.
//!
//! Implements the MIME sniffing table from the WHATWG "MIME Sniffing"
//! standard, in the same order and with the same result strings that
//! mainstream HTTP stacks report, so a given file classifies identically
//! here and in other servers.

/// Number of leading bytes inspected by [`detect_content_type`].
pub const SNIFF_LEN: usize = 512;

/// Result when nothing in the table matches.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Result for text without binary control bytes (and for empty input).
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

const TEXT_HTML_UTF8: &str = "text/html; charset=utf-8";

/// Embedded OpenType: 34 arbitrary bytes followed by `LP`.
const EOT_PATTERN: [u8; 36] = {
    let mut pattern = [0u8; 36];
    pattern[34] = b'L';
    pattern[35] = b'P';
    pattern
};

const EOT_MASK: [u8; 36] = {
    let mut mask = [0u8; 36];
    mask[34] = 0xFF;
    mask[35] = 0xFF;
    mask
};

enum Signature {
    /// Case-insensitive HTML tag, after leading whitespace, followed by a
    /// tag-terminating byte.
    Html(&'static [u8]),
    Masked {
        mask: &'static [u8],
        pattern: &'static [u8],
        skip_ws: bool,
        content_type: &'static str,
    },
    Exact {
        prefix: &'static [u8],
        content_type: &'static str,
    },
    Mp4,
    Text,
}

const fn exact(prefix: &'static [u8], content_type: &'static str) -> Signature {
    Signature::Exact {
        prefix,
        content_type,
    }
}

const fn masked(
    mask: &'static [u8],
    pattern: &'static [u8],
    content_type: &'static str,
) -> Signature {
    Signature::Masked {
        mask,
        pattern,
        skip_ws: false,
        content_type,
    }
}

/// Checked top to bottom; the first match wins. `Text` must stay last.
const SIGNATURES: &[Signature] = &[
    Signature::Html(b"<!DOCTYPE HTML"),
    Signature::Html(b"<HTML"),
    Signature::Html(b"<HEAD"),
    Signature::Html(b"<SCRIPT"),
    Signature::Html(b"<IFRAME"),
    Signature::Html(b"<H1"),
    Signature::Html(b"<DIV"),
    Signature::Html(b"<FONT"),
    Signature::Html(b"<TABLE"),
    Signature::Html(b"<A"),
    Signature::Html(b"<STYLE"),
    Signature::Html(b"<TITLE"),
    Signature::Html(b"<B"),
    Signature::Html(b"<BODY"),
    Signature::Html(b"<BR"),
    Signature::Html(b"<P"),
    Signature::Html(b"<!--"),
    Signature::Masked {
        mask: b"\xFF\xFF\xFF\xFF\xFF",
        pattern: b"<?xml",
        skip_ws: true,
        content_type: "text/xml; charset=utf-8",
    },
    exact(b"%PDF-", "application/pdf"),
    exact(b"%!PS-Adobe-", "application/postscript"),
    // Byte order marks.
    masked(
        b"\xFF\xFF\x00\x00",
        b"\xFE\xFF\x00\x00",
        "text/plain; charset=utf-16be",
    ),
    masked(
        b"\xFF\xFF\x00\x00",
        b"\xFF\xFE\x00\x00",
        "text/plain; charset=utf-16le",
    ),
    masked(b"\xFF\xFF\xFF\x00", b"\xEF\xBB\xBF\x00", TEXT_PLAIN_UTF8),
    // Images.
    exact(b"\x00\x00\x01\x00", "image/x-icon"),
    exact(b"\x00\x00\x02\x00", "image/x-icon"),
    exact(b"BM", "image/bmp"),
    exact(b"GIF87a", "image/gif"),
    exact(b"GIF89a", "image/gif"),
    masked(
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF\xFF\xFF",
        b"RIFF\x00\x00\x00\x00WEBPVP",
        "image/webp",
    ),
    exact(b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    exact(b"\xFF\xD8\xFF", "image/jpeg"),
    // Audio and video.
    masked(
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        b"FORM\x00\x00\x00\x00AIFF",
        "audio/aiff",
    ),
    masked(b"\xFF\xFF\xFF", b"ID3", "audio/mpeg"),
    masked(b"\xFF\xFF\xFF\xFF\xFF", b"OggS\x00", "application/ogg"),
    masked(
        b"\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF",
        b"MThd\x00\x00\x00\x06",
        "audio/midi",
    ),
    masked(
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        b"RIFF\x00\x00\x00\x00AVI ",
        "video/avi",
    ),
    masked(
        b"\xFF\xFF\xFF\xFF\x00\x00\x00\x00\xFF\xFF\xFF\xFF",
        b"RIFF\x00\x00\x00\x00WAVE",
        "audio/wave",
    ),
    Signature::Mp4,
    exact(b"\x1A\x45\xDF\xA3", "video/webm"),
    // Fonts.
    masked(&EOT_MASK, &EOT_PATTERN, "application/vnd.ms-fontobject"),
    exact(b"\x00\x01\x00\x00", "font/ttf"),
    exact(b"OTTO", "font/otf"),
    exact(b"ttcf", "font/collection"),
    exact(b"wOFF", "font/woff"),
    exact(b"wOF2", "font/woff2"),
    // Archives.
    exact(b"\x1F\x8B\x08", "application/x-gzip"),
    exact(b"PK\x03\x04", "application/zip"),
    exact(b"Rar!\x1A\x07\x00", "application/x-rar-compressed"),
    exact(b"Rar!\x1A\x07\x01\x00", "application/x-rar-compressed"),
    exact(b"\x00\x61\x73\x6D", "application/wasm"),
    Signature::Text,
];

/// Classify `data` by its leading bytes.
///
/// At most [`SNIFF_LEN`] bytes are inspected. Always returns a valid MIME
/// type; input that matches no signature and contains binary control bytes
/// yields [`OCTET_STREAM`].
pub fn detect_content_type(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];
    let first_non_ws = data
        .iter()
        .position(|&b| !is_whitespace(b))
        .unwrap_or(data.len());

    SIGNATURES
        .iter()
        .find_map(|sig| sig.matches(data, first_non_ws))
        .unwrap_or(OCTET_STREAM)
}

impl Signature {
    fn matches(&self, data: &[u8], first_non_ws: usize) -> Option<&'static str> {
        match self {
            Signature::Html(tag) => match_html(tag, &data[first_non_ws..]),
            Signature::Masked {
                mask,
                pattern,
                skip_ws,
                content_type,
            } => {
                let data = if *skip_ws { &data[first_non_ws..] } else { data };
                let hit = data.len() >= pattern.len()
                    && pattern
                        .iter()
                        .zip(mask.iter())
                        .zip(data)
                        .all(|((&p, &m), &d)| d & m == p);
                hit.then_some(*content_type)
            }
            Signature::Exact {
                prefix,
                content_type,
            } => data.starts_with(prefix).then_some(*content_type),
            Signature::Mp4 => match_mp4(data),
            Signature::Text => data[first_non_ws..]
                .iter()
                .all(|&b| !is_binary_control(b))
                .then_some(TEXT_PLAIN_UTF8),
        }
    }
}

fn match_html(tag: &[u8], data: &[u8]) -> Option<&'static str> {
    if data.len() < tag.len() + 1 {
        return None;
    }
    let same = tag.iter().zip(data).all(|(&t, &d)| {
        let d = if t.is_ascii_uppercase() { d & 0xDF } else { d };
        t == d
    });
    (same && is_tag_terminator(data[tag.len()])).then_some(TEXT_HTML_UTF8)
}

/// ISO base media file: an `ftyp` box whose brands include `mp4`.
fn match_mp4(data: &[u8]) -> Option<&'static str> {
    if data.len() < 12 {
        return None;
    }
    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if data.len() < box_size || box_size % 4 != 0 || &data[4..8] != b"ftyp" {
        return None;
    }
    // Offset 12 holds the major brand's version, not a brand.
    (8..box_size)
        .step_by(4)
        .filter(|&offset| offset != 12)
        .any(|offset| &data[offset..offset + 3] == b"mp4")
        .then_some("video/mp4")
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | 0x0C | b'\r' | b' ')
}

fn is_tag_terminator(b: u8) -> bool {
    matches!(b, b' ' | b'>')
}

fn is_binary_control(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_plain_text() {
        assert_eq!(detect_content_type(b""), TEXT_PLAIN_UTF8);
    }

    #[test]
    fn ascii_text_is_plain_text() {
        assert_eq!(detect_content_type(b"hello world"), TEXT_PLAIN_UTF8);
    }

    #[test]
    fn binary_without_signature_is_octet_stream() {
        assert_eq!(detect_content_type(b"\x01\x02\x03\x04garbage"), OCTET_STREAM);
    }

    #[test]
    fn allow_listed_signatures() {
        assert_eq!(
            detect_content_type(b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR"),
            "image/png"
        );
        assert_eq!(detect_content_type(b"\xFF\xD8\xFF\xE0\x00\x10JFIF"), "image/jpeg");
        assert_eq!(detect_content_type(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3"), "application/pdf");
    }

    #[test]
    fn truncated_png_signature_is_not_png() {
        assert_ne!(detect_content_type(b"\x89PNG\r\n"), "image/png");
    }

    #[test]
    fn pdf_header_must_be_at_offset_zero() {
        // Whitespace is skipped for markup only.
        assert_eq!(detect_content_type(b"  %PDF-1.4"), TEXT_PLAIN_UTF8);
        assert_eq!(detect_content_type(b"%PDF"), TEXT_PLAIN_UTF8);
    }

    #[test]
    fn html_is_case_insensitive_and_skips_whitespace() {
        assert_eq!(detect_content_type(b"\n\t <html><body>"), TEXT_HTML_UTF8);
        assert_eq!(detect_content_type(b"<!doctype html>"), TEXT_HTML_UTF8);
        assert_eq!(detect_content_type(b"<p >para"), TEXT_HTML_UTF8);
    }

    #[test]
    fn html_tag_requires_terminator() {
        // `<a` followed by a letter is not the `<A` tag.
        assert_eq!(detect_content_type(b"<abbr>"), TEXT_PLAIN_UTF8);
        assert_eq!(detect_content_type(b"<html"), TEXT_PLAIN_UTF8);
    }

    #[test]
    fn xml_declaration() {
        assert_eq!(
            detect_content_type(b"  <?xml version=\"1.0\"?>"),
            "text/xml; charset=utf-8"
        );
    }

    #[test]
    fn byte_order_marks() {
        assert_eq!(
            detect_content_type(b"\xFE\xFF\x00h"),
            "text/plain; charset=utf-16be"
        );
        assert_eq!(
            detect_content_type(b"\xFF\xFE\x68\x00"),
            "text/plain; charset=utf-16le"
        );
        assert_eq!(detect_content_type(b"\xEF\xBB\xBFhi"), TEXT_PLAIN_UTF8);
    }

    #[test]
    fn other_images() {
        assert_eq!(detect_content_type(b"GIF89a\x01\x00"), "image/gif");
        assert_eq!(detect_content_type(b"BM\x3e\x00"), "image/bmp");
        assert_eq!(detect_content_type(b"\x00\x00\x01\x00\x01\x00"), "image/x-icon");
        assert_eq!(
            detect_content_type(b"RIFF\x24\x00\x00\x00WEBPVP8 "),
            "image/webp"
        );
    }

    #[test]
    fn riff_containers_are_told_apart() {
        assert_eq!(detect_content_type(b"RIFF\x10\x00\x00\x00WAVEfmt "), "audio/wave");
        assert_eq!(detect_content_type(b"RIFF\x10\x00\x00\x00AVI LIST"), "video/avi");
    }

    #[test]
    fn mp4_brand_in_ftyp_box() {
        let mut data = vec![0x00, 0x00, 0x00, 0x18];
        data.extend_from_slice(b"ftypisom\x00\x00\x02\x00isommp41");
        assert_eq!(detect_content_type(&data), "video/mp4");
    }

    #[test]
    fn mp4_major_brand_version_is_ignored() {
        // "mp4" only appears in the version slot at offset 12.
        let mut data = vec![0x00, 0x00, 0x00, 0x10];
        data.extend_from_slice(b"ftypisommp4\x00");
        assert_ne!(detect_content_type(&data), "video/mp4");
    }

    #[test]
    fn embedded_opentype_font() {
        let mut data = vec![0xAB; 34];
        data.extend_from_slice(b"LP");
        assert_eq!(detect_content_type(&data), "application/vnd.ms-fontobject");
    }

    #[test]
    fn archives() {
        assert_eq!(detect_content_type(b"PK\x03\x04\x14\x00"), "application/zip");
        assert_eq!(detect_content_type(b"\x1F\x8B\x08\x00"), "application/x-gzip");
        assert_eq!(
            detect_content_type(b"Rar!\x1A\x07\x01\x00"),
            "application/x-rar-compressed"
        );
        assert_eq!(detect_content_type(b"\x00asm\x01\x00\x00\x00"), "application/wasm");
    }

    #[test]
    fn only_the_sniff_window_is_inspected() {
        let mut data = vec![b'a'; SNIFF_LEN];
        data.push(0x00);
        assert_eq!(detect_content_type(&data), TEXT_PLAIN_UTF8);

        data[SNIFF_LEN - 1] = 0x00;
        assert_eq!(detect_content_type(&data), OCTET_STREAM);
    }
}
