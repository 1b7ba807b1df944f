/// Derive the stable identifier the mobile client assigns to an article.
///
/// The id must match what the client computes so bookmarks written by
/// either side refer to the same article:
///
/// 1. join as `"{title}_{url}_{category}"`, lowercase, strip all whitespace
/// 2. fold the UTF-16 code units with `h = h * 31 + unit` in wrapping
///    32-bit signed arithmetic
/// 3. format as `news_{|h|}` (the absolute value is taken in 64 bits)
///
/// # Examples
///
/// ```
/// use summanews_store::util::stable_article_id;
///
/// assert_eq!(stable_article_id("", "", ""), "news_3040");
/// ```
pub fn stable_article_id(title: &str, url: &str, category: &str) -> String {
    let text: String = format!("{}_{}_{}", title, url, category)
        .to_lowercase()
        .chars()
        .filter(|c| !is_js_whitespace(*c))
        .collect();

    let hash = text.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit))
    });

    format!("news_{}", i64::from(hash).abs())
}

/// Whitespace as matched by `\s` in ECMAScript regular expressions.
///
/// Differs from Unicode `White_Space`: NEL (U+0085) is not included, the BOM
/// (U+FEFF) is.
fn is_js_whitespace(c: char) -> bool {
    match c {
        '\u{85}' => false,
        '\u{feff}' => true,
        _ => c.is_whitespace(),
    }
}
