/// Placeholder replaced by the page index in ranged scrapes.
pub const PAGE_NUMBER_TOKEN: &str = "{{page_number}}";

/// Expand a URL template for one iteration.
///
/// With a page index, only the first `{{page_number}}` is substituted; a
/// template without the token is passed through as-is. The result is always
/// scheme-normalized.
pub fn expand(template: &str, page_index: Option<i64>) -> String {
    let url = match page_index {
        Some(index) => template.replacen(PAGE_NUMBER_TOKEN, &index.to_string(), 1),
        None => template.to_owned(),
    };
    normalize_scheme(url)
}

/// Prefix `https://` unless the string literally starts with `http`.
///
/// This is a prefix test, not a URL parse: `httpfoo.com` is left alone.
pub fn normalize_scheme(url: String) -> String {
    if url.starts_with("http") {
        url
    } else {
        format!("https://{url}")
    }
}
