pub mod accessory_service;
pub mod auth_service;
pub mod cart_service;
pub mod category_service;
pub mod order_service;
pub mod phone_service;
pub mod profile_service;
pub mod review_service;

/// `ILIKE` pattern matching `search` anywhere, with wildcard characters in the
/// input taken literally.
pub(crate) fn contains_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn pattern_wraps_plain_text() {
        assert_eq!(contains_pattern("galaxy"), "%galaxy%");
    }

    #[test]
    fn pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
    }
}
