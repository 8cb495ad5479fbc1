/// Clean user-supplied HTML using the ammonia library.
///
/// Whitelist-based: safe tags (like <b>, <p>) survive, while dangerous tags
/// (like <script>, <iframe>) and attributes (like onclick) are stripped.
/// Note that <script> is removed together with its content.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

/// Cleans `input` and rejects it if nothing readable is left.
pub fn clean_required(input: &str) -> Option<String> {
    let cleaned = clean_html(input);
    if cleaned.trim().is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
