//! English title-casing and pluralization for derived names and folders.

const UNCOUNTABLE: [&str; 22] = [
    "audio", "data", "equipment", "feedback", "fish", "information", "knowledge", "media",
    "metadata", "money", "music", "news", "police", "rice", "series", "sheep", "species",
    "staff", "traffic", "analytics", "software", "hardware",
];

const IRREGULAR: [(&str, &str); 14] = [
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("ox", "oxen"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("knife", "knives"),
    ("wife", "wives"),
    ("half", "halves"),
];

/// Upper-case the first letter of every word and lower-case the rest.
///
/// A word starts at a letter that follows a non-letter. Apostrophes and dots
/// inside a word do not end it.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
                in_word = true;
            }
        } else {
            if !(in_word && matches!(c, '\'' | '.')) {
                in_word = false;
            }
            out.push(c);
        }
    }
    out
}

/// Plural form of an English noun, keeping a leading capital.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let lower = word.to_lowercase();
    let plural = plural_lower(&lower);
    match_case(word, &plural)
}

fn plural_lower(word: &str) -> String {
    let tail_start = word
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_alphabetic())
        .map_or(0, |(i, c)| i + c.len_utf8());
    let (prefix, tail) = word.split_at(tail_start);
    if tail.is_empty() {
        return format!("{word}s");
    }

    if UNCOUNTABLE.contains(&tail) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(single, _)| *single == tail) {
        return format!("{prefix}{plural}");
    }
    if IRREGULAR.iter().any(|(_, plural)| *plural == tail) {
        return word.to_string();
    }

    if let Some(stem) = tail.strip_suffix("is") {
        if !stem.is_empty() {
            return format!("{prefix}{stem}es");
        }
    }
    if tail.ends_with("ss") || tail.ends_with("us") {
        return format!("{word}es");
    }
    if tail.ends_with('s') {
        return word.to_string();
    }
    if tail.ends_with('x') || tail.ends_with('z') || tail.ends_with("ch") || tail.ends_with("sh") {
        return format!("{word}es");
    }
    if let Some(stem) = tail.strip_suffix('y') {
        let before = stem.chars().last();
        if matches!(before, Some(c) if !"aeiou".contains(c)) {
            return format!("{prefix}{stem}ies");
        }
    }
    format!("{word}s")
}

fn match_case(original: &str, plural: &str) -> String {
    if original.chars().any(char::is_alphabetic)
        && original.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase)
        && original.chars().filter(|c| c.is_alphabetic()).count() > 1
    {
        return plural.to_uppercase();
    }
    if original.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = plural.chars();
        if let Some(first) = chars.next() {
            return first.to_uppercase().chain(chars).collect();
        }
    }
    plural.to_string()
}
