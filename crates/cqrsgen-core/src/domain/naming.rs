//! Identifier casing and pluralization helpers.
//!
//! These are the only string transformations the registry applies to a
//! domain name. They are pure and total: the same input always yields the
//! same output, which is what makes rendered artifacts reproducible.

/// Split a string into lowercase words based on casing and separators.
///
/// ## Word Boundary Detection
///
/// 1. **Explicit separators:** `_`, `-`, whitespace → always split
/// 2. **Case transition (camelCase):** `aB` → split between `a` and `B`
/// 3. **Acronym boundary:** `HTTPRequest` → split between `P` and `R`
///    (detected by `Upper Upper Lower` pattern)
///
/// | Input | Output |
/// |-------|--------|
/// | "invoice" | ["invoice"] |
/// | "purchaseOrder" | ["purchase", "order"] |
/// | "HTTPRequest" | ["http", "request"] |
/// | "customer2" | ["customer2"] |
pub(crate) fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(next) = chars.peek() {
            // "myApp" → "my" + "App"
            if c.is_lowercase() && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            // "HTTPServer" → "HTTP" + "Server"
            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}

/// Uppercase the first character, leaving the rest untouched.
pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(word.len());
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

pub(crate) fn pascal_case(words: &[String]) -> String {
    words.iter().map(|w| capitalize(w)).collect()
}

pub(crate) fn camel_case(words: &[String]) -> String {
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(word);
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

pub(crate) fn kebab_case(words: &[String]) -> String {
    words.join("-")
}

pub(crate) fn constant_case(words: &[String]) -> String {
    words
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// English plural of a single lowercase word.
///
/// | Input | Output |
/// |-------|--------|
/// | "invoice" | "invoices" |
/// | "category" | "categories" |
/// | "day" | "days" |
/// | "address" | "addresses" |
/// | "batch" | "batches" |
pub(crate) fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y') {
        let before = stem.chars().last();
        if before.is_some_and(|c| !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')) {
            return format!("{stem}ies");
        }
    }

    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{word}es");
    }

    format!("{word}s")
}

/// Letters and ASCII digits only, first character a letter.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_camel_case() {
        assert_eq!(split_words("purchaseOrder"), vec!["purchase", "order"]);
        assert_eq!(split_words("HTTPRequest"), vec!["http", "request"]);
        assert_eq!(split_words("invoice"), vec!["invoice"]);
    }

    #[test]
    fn digits_stay_in_word() {
        assert_eq!(split_words("customer2"), vec!["customer2"]);
    }

    #[test]
    fn casing_forms() {
        let words = split_words("purchaseOrder");
        assert_eq!(pascal_case(&words), "PurchaseOrder");
        assert_eq!(camel_case(&words), "purchaseOrder");
        assert_eq!(kebab_case(&words), "purchase-order");
        assert_eq!(constant_case(&words), "PURCHASE_ORDER");
    }

    #[test]
    fn plural_rules() {
        assert_eq!(pluralize("invoice"), "invoices");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("address"), "addresses");
        assert_eq!(pluralize("batch"), "batches");
        assert_eq!(pluralize("box"), "boxes");
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("invoice"));
        assert!(is_identifier("purchaseOrder2"));
        assert!(!is_identifier("2invoice"));
        assert!(!is_identifier("purchase-order"));
        assert!(!is_identifier(""));
    }
}
