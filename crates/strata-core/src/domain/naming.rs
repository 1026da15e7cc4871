//! Identifier case conversion.
//!
//! Every generated name is derived mechanically from the names in the
//! project description: `PascalCase` for Go types and exported fields,
//! `snake_case` for file names, columns and serialization keys, and
//! `camelCase` for unexported identifiers.
//!
//! ## Examples
//!
//! | Input          | Pascal        | snake           | camel         |
//! |----------------|---------------|-----------------|---------------|
//! | `Widget`       | `Widget`      | `widget`        | `widget`      |
//! | `order_item`   | `OrderItem`   | `order_item`    | `orderItem`   |
//! | `owner_id`     | `OwnerID`     | `owner_id`      | `ownerID`     |
//! | `HTTPEndpoint` | `HTTPEndpoint`| `http_endpoint` | `httpEndpoint`|

/// Words rendered fully upper-case in exported Go identifiers.
const INITIALISMS: &[&str] = &[
    "api", "db", "dns", "html", "http", "https", "id", "ip", "json", "sql", "tcp", "ui", "uri",
    "url", "uuid", "xml",
];

/// Convert a string to snake_case.
///
/// | Input | Output |
/// |-------|--------|
/// | "MyApp" | "my_app" |
/// | "my-app" | "my_app" |
/// | "XMLHttpRequest" | "xml_http_request" |
pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// Convert a string to kebab-case.
pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// Convert a string to PascalCase, upper-casing known initialisms.
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// Convert a string to camelCase.
///
/// The first word is lower-cased entirely, so `IDs` becomes `ids` and
/// `owner_id` becomes `ownerID`.
pub fn to_camel_case(s: &str) -> String {
    let words = split_words(s);
    let mut out = String::new();
    for (i, w) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(w);
        } else {
            out.push_str(&capitalize(w));
        }
    }
    out
}

/// Naive English plural used for table names and slice variables.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_ascii_lowercase();
    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{word}es");
    }

    if let Some(stem) = word.strip_suffix('y') {
        let before = stem.chars().last();
        if before.is_some_and(|c| !"aeiouAEIOU".contains(c)) {
            return format!("{stem}ies");
        }
    }

    format!("{word}s")
}

/// Whether `s` is usable as a Go identifier once case-converted.
///
/// Names may use `_`, `-` and spaces as separators, but must start with an
/// ASCII letter and otherwise contain only ASCII alphanumerics.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == ' ')
}

/// Go's reserved words; none may be used as an unexported identifier.
const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

pub fn is_go_keyword(s: &str) -> bool {
    GO_KEYWORDS.contains(&s)
}

fn capitalize(word: &str) -> String {
    if INITIALISMS.contains(&word) {
        return word.to_ascii_uppercase();
    }
    // "ids" is the plural of an initialism, keep Go's `IDs` spelling.
    if let Some(stem) = word.strip_suffix('s') {
        if INITIALISMS.contains(&stem) {
            return format!("{}s", stem.to_ascii_uppercase());
        }
    }

    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::new();
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// Split a string into lower-cased words based on casing and separators.
///
/// 1. **Explicit separators:** `_`, `-`, whitespace always split
/// 2. **camelCase transition:** `aB` splits between `a` and `B`
/// 3. **Acronym boundary:** `HTTPRequest` splits between `P` and `R`
fn split_words(input: &str) -> Vec<String> {
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

        if let Some(&next) = chars.peek() {
            if (c.is_lowercase() || c.is_ascii_digit()) && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_handles_common_shapes() {
        assert_eq!(to_snake_case("Widget"), "widget");
        assert_eq!(to_snake_case("OrderItem"), "order_item");
        assert_eq!(to_snake_case("order-item"), "order_item");
        assert_eq!(to_snake_case("XMLHttpRequest"), "xml_http_request");
        assert_eq!(to_snake_case("ownerID"), "owner_id");
    }

    #[test]
    fn kebab_case_joins_with_dashes() {
        assert_eq!(to_kebab_case("My Service"), "my-service");
        assert_eq!(to_kebab_case("order_api"), "order-api");
        assert_eq!(to_kebab_case("HTTPGateway"), "http-gateway");
    }

    #[test]
    fn pascal_case_uppercases_initialisms() {
        assert_eq!(to_pascal_case("owner_id"), "OwnerID");
        assert_eq!(to_pascal_case("api_url"), "APIURL");
        assert_eq!(to_pascal_case("ids"), "IDs");
        assert_eq!(to_pascal_case("weight"), "Weight");
        assert_eq!(to_pascal_case("created at"), "CreatedAt");
    }

    #[test]
    fn camel_case_lowers_first_word() {
        assert_eq!(to_camel_case("Widget"), "widget");
        assert_eq!(to_camel_case("OrderItem"), "orderItem");
        assert_eq!(to_camel_case("owner_id"), "ownerID");
        assert_eq!(to_camel_case("ID"), "id");
    }

    #[test]
    fn pluralize_follows_simple_rules() {
        assert_eq!(pluralize("widget"), "widgets");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("address"), "addresses");
    }

    #[test]
    fn identifier_validation() {
        assert!(is_valid_identifier("Widget"));
        assert!(is_valid_identifier("order_item"));
        assert!(!is_valid_identifier("1widget"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("wid/get"));
    }

    #[test]
    fn go_keywords() {
        assert!(is_go_keyword(&to_camel_case("Type")));
        assert!(!is_go_keyword(&to_camel_case("Widget")));
    }
}
