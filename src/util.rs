use base64::Engine;

/// Strip an optional `data:image/...;base64,` prefix, leaving the payload.
pub fn parse_data_uri(input: &str) -> Option<String> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(rest) = s.strip_prefix("data:") {
        let (_, b64) = rest.split_once(',')?;
        return Some(b64.trim().to_string());
    }
    // assume plain base64
    Some(s.to_string())
}

pub fn b64_decode(input: &str) -> Option<Vec<u8>> {
    let b64 = parse_data_uri(input)?;
    let engine = base64::engine::general_purpose::STANDARD;
    engine.decode(b64.as_bytes()).ok()
}

const FILENAME_MAX: usize = 40;

/// Suggested download name: `cracha_<name>.png`, whitespace as underscores,
/// anything header-hostile dropped.
pub fn download_filename(name: &str) -> String {
    let mut stem: String = name
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    stem.truncate(FILENAME_MAX);

    if stem.is_empty() {
        "cracha.png".to_string()
    } else {
        format!("cracha_{stem}.png")
    }
}
