use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use scrape_logging::scrape_warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    pub text: String,
    pub encoding_label: String,
    /// Malformed sequences were replaced with U+FFFD.
    pub lossy: bool,
}

/// Decode raw bytes into UTF-8 using: BOM -> Content-Type charset -> chardetng guess.
///
/// Never fails; malformed input is decoded with replacement characters.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> DecodedBody {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(enc) = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return decode_with(bytes, enc);
    }

    // chardetng also sees <meta charset> when given the full document.
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

fn charset_param(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.trim().split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim_matches(&[' ', '"', '\''][..]).to_string())
        })
        .next()
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> DecodedBody {
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        scrape_warn!("Body had malformed {} sequences; decoded lossily", enc.name());
    }
    DecodedBody {
        text: text.into_owned(),
        encoding_label: enc.name().to_string(),
        lossy: had_errors,
    }
}
