//! Naming heuristics for REST paths
//!
//! Pure string transforms used by the classifier: case conversion,
//! singular/plural forms, and resource name / base path extraction from a
//! path pattern such as `/store/order/{orderId}`.

/// Segments that mark a path as an operation rather than an entity
///
/// Matched case-insensitively as substrings, so `uploadImage` and
/// `findByStatus` both qualify.
pub const ACTION_KEYWORDS: [&str; 21] = [
    "upload", "download", "find", "search", "get", "create", "delete", "update", "list", "login",
    "logout", "check", "validate", "verify", "send", "receive", "export", "import", "sync",
    "refresh", "reset",
];

/// Keywords that make even a GET-only path an action (e.g., `/user/login`)
pub const STRONG_ACTION_KEYWORDS: [&str; 14] = [
    "login",
    "logout",
    "signin",
    "signout",
    "register",
    "verify",
    "activate",
    "deactivate",
    "reset",
    "refresh",
    "revoke",
    "authorize",
    "authenticate",
    "token",
];

/// Split a path into segments, ignoring leading and trailing slashes
///
/// The root path yields a single empty segment.
pub fn segments(path: &str) -> Vec<&str> {
    path.trim_matches('/').split('/').collect()
}

/// Whether a segment is a path template parameter (`{petId}`)
pub fn is_param(segment: &str) -> bool {
    segment.starts_with('{')
}

/// Name inside a `{...}` segment
pub fn param_name(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

/// Whether the path is `/` (or empty)
pub fn is_root(path: &str) -> bool {
    path.trim_matches('/').is_empty()
}

/// Convert `user-profiles` / `user_profiles` / `user profiles` to `UserProfiles`
///
/// Everything after the first letter of a word is lowercased, so `API`
/// becomes `Api`.
pub fn to_pascal_case(s: &str) -> String {
    words(s)
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Like [`to_pascal_case`] but keeps interior capitals: `uploadImage` → `UploadImage`
///
/// Used for endpoint Kind names built from camelCase path segments.
pub fn to_upper_camel_case(s: &str) -> String {
    words(s)
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

fn words(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
}

/// Naive English singular form
///
/// Nouns already singular but ending in `-ses` lose their `es`
/// (`cases` → `cas`).
pub fn singularize(s: &str) -> String {
    if let Some(stem) = s.strip_suffix("ies") {
        return format!("{}y", stem);
    }

    const SIBILANT_PLURALS: [&str; 6] = ["sses", "ses", "xes", "zes", "ches", "shes"];
    if SIBILANT_PLURALS.iter().any(|suffix| s.ends_with(suffix)) {
        return s[..s.len() - 2].to_string();
    }

    if s.ends_with('s') && !s.ends_with("ss") {
        return s[..s.len() - 1].to_string();
    }

    s.to_string()
}

/// Naive English plural form
pub fn pluralize(s: &str) -> String {
    if let Some(stem) = s.strip_suffix('y') {
        return format!("{}ies", stem);
    }

    if s.ends_with('s') || s.ends_with('x') || s.ends_with("ch") {
        return format!("{}es", s);
    }

    format!("{}s", s)
}

/// Whether a segment looks like an operation (`uploadImage`, `findByStatus`)
pub fn is_action_segment(segment: &str) -> bool {
    let lower = segment.to_lowercase();
    ACTION_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Whether a segment names an action strongly enough to override a GET-only shape
pub fn is_strong_action_keyword(segment: &str) -> bool {
    let lower = segment.to_lowercase();
    STRONG_ACTION_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Whether a parameter identifies the entity named by `segment`
///
/// `{orderId}` matches `order`, `{variableName}` matches `variables`, and
/// a bare `{id}` matches anything.
fn param_identifies(param: &str, segment: &str, check_singular: bool) -> bool {
    let param = param.to_lowercase();
    let segment_lower = segment.to_lowercase();

    param.contains(&segment_lower)
        || (check_singular && param.contains(&singularize(segment).to_lowercase()))
        || param == "id"
}

/// The segment at `index + 1` is a parameter identifying `parts[index]`
fn followed_by_id_param(parts: &[&str], index: usize, check_singular: bool) -> bool {
    parts
        .get(index + 1)
        .and_then(|next| param_name(next))
        .is_some_and(|param| param_identifies(param, parts[index], check_singular))
}

/// Derive the singular PascalCase resource name for a path
///
/// - `/pet/{petId}` → `Pet`
/// - `/store/order` → `Order`
/// - `/users/{userId}/posts` → `User` (nested collections belong to the parent)
/// - `/pet/{petId}/uploadImage` → `Pet`
///
/// The root path yields `root_kind`, or an empty string without one.
pub fn extract_resource_name(path: &str, root_kind: Option<&str>) -> String {
    if is_root(path) {
        return root_kind.unwrap_or_default().to_string();
    }

    let parts = segments(path);
    let last = parts.len() - 1;

    for (i, part) in parts.iter().enumerate().rev() {
        if is_param(part) {
            continue;
        }

        if followed_by_id_param(&parts, i, true) {
            return singularize(&to_pascal_case(part));
        }

        if i == last {
            if is_action_segment(part) {
                continue;
            }

            // Sub-collection of the entity identified by the preceding parameter
            if i > 0 && is_param(parts[i - 1]) {
                continue;
            }

            return singularize(&to_pascal_case(part));
        }
    }

    parts
        .iter()
        .find(|part| !is_param(part))
        .map(|part| singularize(&to_pascal_case(part)))
        .unwrap_or_default()
}

/// Collection path of the resource a path belongs to
///
/// Stops at the first parameter or action segment, or right after a
/// segment followed by its own ID parameter: `/store/order/{orderId}` →
/// `/store/order`, `/users/{userId}/posts` → `/users`.
pub fn get_base_path(path: &str) -> String {
    let parts = segments(path);
    let mut base = Vec::new();

    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() || is_param(part) || is_action_segment(part) {
            break;
        }

        base.push(*part);

        if followed_by_id_param(&parts, i, false) {
            break;
        }
    }

    format!("/{}", base.join("/"))
}

/// Whether a path addresses a single entity: `/pet/{petId}`, `/users/{id}`
pub fn is_resource_id_path(path: &str) -> bool {
    let parts = segments(path);
    if parts.len() < 2 {
        return false;
    }

    let resource_index = parts.len() - 2;
    param_name(parts[parts.len() - 1]).is_some()
        && !is_param(parts[resource_index])
        && followed_by_id_param(&parts, resource_index, true)
}

/// Collection path for an entity path: `/pet/{petId}` → `/pet`
pub fn base_path_for_id_path(path: &str) -> Option<String> {
    if !is_resource_id_path(path) {
        return None;
    }

    let parts = segments(path);
    Some(format!("/{}", parts[..parts.len() - 1].join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_resource_name() {
        let cases = [
            ("/users", "User"),
            ("/users/{id}", "User"),
            ("/users/{userId}/posts", "User"),
            ("/api/v1/users", "User"),
            ("/store/order", "Order"),
            ("/store/order/{orderId}", "Order"),
            ("/pets", "Pet"),
            ("/categories", "Category"),
            ("/user-profiles", "UserProfile"),
            ("/user_settings", "UserSetting"),
            ("/{id}", ""),
            ("/", ""),
            ("", ""),
            ("/items/", "Item"),
            ("/pet/{petId}/uploadImage", "Pet"),
            (
                "/sharedmem/classes/{className}/instances/{instanceName}/variables/{variableName}",
                "Variable",
            ),
            ("/classes/{className}", "Class"),
            ("/variables/{variableName}", "Variable"),
        ];

        for (path, expected) in cases {
            assert_eq!(extract_resource_name(path, None), expected, "path {:?}", path);
        }
    }

    #[test]
    fn test_extract_resource_name_root_kind() {
        assert_eq!(extract_resource_name("/", Some("Petstore")), "Petstore");
        assert_eq!(extract_resource_name("", Some("Petstore")), "Petstore");
        assert_eq!(extract_resource_name("/pets", Some("Petstore")), "Pet");
    }

    #[test]
    fn test_get_base_path() {
        let cases = [
            ("/users", "/users"),
            ("/users/{id}", "/users"),
            ("/users/{userId}/posts", "/users"),
            ("/api/v1/users", "/api/v1/users"),
            ("/store/order/{orderId}", "/store/order"),
            ("/pet/findByStatus", "/pet"),
            ("/", "/"),
            ("", "/"),
            ("/pets/", "/pets"),
        ];

        for (path, expected) in cases {
            assert_eq!(get_base_path(path), expected, "path {:?}", path);
        }
    }

    #[test]
    fn test_is_resource_id_path() {
        for path in [
            "/pet/{petId}",
            "/store/order/{orderId}",
            "/users/{id}",
            "/users/{userId}",
            "/api/v1/users/{userId}",
        ] {
            assert!(is_resource_id_path(path), "{:?} should be an ID path", path);
        }

        for path in [
            "/pet",
            "/{id}",
            "/pet/{petId}/uploadImage",
            "/pet/findByStatus",
            "/user/{userId}/posts",
            "/",
            "",
            "/pet/{randomId}",
        ] {
            assert!(!is_resource_id_path(path), "{:?} should not be an ID path", path);
        }
    }

    #[test]
    fn test_base_path_for_id_path() {
        assert_eq!(base_path_for_id_path("/pet/{petId}").as_deref(), Some("/pet"));
        assert_eq!(
            base_path_for_id_path("/store/order/{orderId}").as_deref(),
            Some("/store/order")
        );
        assert_eq!(base_path_for_id_path("/pet"), None);
    }

    #[test]
    fn test_to_pascal_case() {
        let cases = [
            ("users", "Users"),
            ("user-profiles", "UserProfiles"),
            ("user_settings", "UserSettings"),
            ("API", "Api"),
            ("", ""),
            ("hello world", "HelloWorld"),
            ("HELLO_WORLD", "HelloWorld"),
            ("uploadImage", "Uploadimage"),
        ];

        for (input, expected) in cases {
            assert_eq!(to_pascal_case(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_to_upper_camel_case() {
        assert_eq!(to_upper_camel_case("uploadImage"), "UploadImage");
        assert_eq!(to_upper_camel_case("findByStatus"), "FindByStatus");
        assert_eq!(to_upper_camel_case("user-profiles"), "UserProfiles");
        assert_eq!(to_upper_camel_case("login"), "Login");
        assert_eq!(to_upper_camel_case(""), "");
    }

    #[test]
    fn test_singularize() {
        let cases = [
            ("users", "user"),
            ("pets", "pet"),
            ("categories", "category"),
            ("entries", "entry"),
            ("boxes", "box"),
            ("buses", "bus"),
            ("classes", "class"),
            ("matches", "match"),
            ("wishes", "wish"),
            ("class", "class"),
            ("address", "address"),
            ("user", "user"),
            ("", ""),
            ("a", "a"),
            // Known imprecision, kept stable for Kind naming
            ("cases", "cas"),
        ];

        for (input, expected) in cases {
            assert_eq!(singularize(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_pluralize() {
        let cases = [
            ("user", "users"),
            ("pet", "pets"),
            ("category", "categories"),
            ("entry", "entries"),
            ("box", "boxes"),
            ("bus", "buses"),
            ("class", "classes"),
            ("match", "matches"),
            ("", "s"),
            ("a", "as"),
        ];

        for (input, expected) in cases {
            assert_eq!(pluralize(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_singular_plural_round_trip() {
        for word in ["pet", "category", "bus", "box", "match", "user", "entry"] {
            assert_eq!(singularize(&pluralize(word)), word, "word {:?}", word);
        }
        for word in ["pets", "categories", "buses", "boxes", "matches", "users"] {
            assert_eq!(pluralize(&singularize(word)), word, "word {:?}", word);
        }
    }

    #[test]
    fn test_action_keywords() {
        assert!(is_action_segment("uploadImage"));
        assert!(is_action_segment("findByStatus"));
        assert!(is_action_segment("LOGIN"));
        assert!(!is_action_segment("pets"));
        assert!(!is_action_segment("order"));

        assert!(is_strong_action_keyword("login"));
        assert!(is_strong_action_keyword("refreshToken"));
        assert!(!is_strong_action_keyword("findByStatus"));
        assert!(!is_strong_action_keyword("inventory"));
    }

    #[test]
    fn test_segments_and_params() {
        assert_eq!(segments("/pet/{petId}"), vec!["pet", "{petId}"]);
        assert_eq!(segments("/"), vec![""]);
        assert_eq!(param_name("{petId}"), Some("petId"));
        assert_eq!(param_name("pet"), None);
        assert!(is_root("/"));
        assert!(is_root(""));
        assert!(!is_root("/pets"));
    }
}
