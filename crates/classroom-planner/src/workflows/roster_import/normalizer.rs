pub(crate) fn clean_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Joins first and last name the way the front office writes it.
pub(crate) fn display_name(first: &str, last: Option<&str>) -> String {
    let first = clean_text(first);
    let last = last.map(clean_text).unwrap_or_default();

    match (first.is_empty(), last.is_empty()) {
        (_, true) => first,
        (true, false) => last,
        (false, false) => format!("{first} {last}"),
    }
}

pub(crate) fn header_cell(value: &str) -> String {
    clean_text(value.trim().trim_matches('"'))
}

#[cfg(test)]
pub(crate) fn display_name_for_tests(first: &str, last: Option<&str>) -> String {
    display_name(first, last)
}
