// src/core/sanitize.rs

/// Collapse every whitespace run to one space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Capitalize the first letter of every alphabetic run, lowercase the rest.
/// "pepe-in-grani" style slugs become "Pepe In Grani" once separators are spaces;
/// "l'antica" becomes "L'Antica".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha { out.extend(ch.to_lowercase()); }
            else { out.extend(ch.to_uppercase()); }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Last path segment of a slug URL turned into words: separators → spaces, title-cased.
pub fn slug_to_name(slug: &str) -> String {
    let words: String = slug
        .chars()
        .map(|c| if c == '-' || c == '_' || c == '+' { ' ' } else { c })
        .collect();
    title_case(&normalize_ws(&words))
}

/// Remove `suffix` from the end of `name` and trim. `None` when it is not a suffix
/// or nothing would be left.
pub fn strip_suffix_word(name: &str, suffix: &str) -> Option<String> {
    if suffix.is_empty() { return None; }
    let rest = name.strip_suffix(suffix)?.trim();
    if rest.is_empty() { None } else { Some(rest.to_string()) }
}
