use crate::domain::entities::response_rule::{ResponseRule, METHOD_ANY, SUB_PATH_WILDCARD};

/// Trim and uppercase a method; empty or `*` becomes the `ANY` sentinel.
pub fn normalize_method(value: &str) -> String {
    let normalized = value.trim().to_uppercase();
    if normalized.is_empty() || normalized == "*" {
        return METHOD_ANY.to_string();
    }
    normalized
}

/// Trim a sub-path; empty or `*` becomes the wildcard, `/` stays the root,
/// anything else gets a leading `/` enforced.
pub fn normalize_sub_path(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == SUB_PATH_WILDCARD {
        return SUB_PATH_WILDCARD.to_string();
    }
    if trimmed == "/" {
        return "/".to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Missing or non-finite status falls back to 200; everything else is
/// truncated and clamped into the valid HTTP range.
pub fn normalize_status(value: Option<f64>) -> u16 {
    let Some(candidate) = value else {
        return 200;
    };
    if !candidate.is_finite() {
        return 200;
    }
    (candidate.trunc() as i64).clamp(100, 599) as u16
}

/// Trimmed content type; empty becomes absent.
pub fn normalize_content_type(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

/// First stored rule (in position order) matching the given raw method and
/// sub-path, normalized with the same rules the rules themselves were stored
/// under.
pub fn find_first<'a>(
    rules: &'a [ResponseRule],
    method: &str,
    sub_path: &str,
) -> Option<&'a ResponseRule> {
    let method = normalize_method(method);
    let sub_path = normalize_sub_path(sub_path);
    rules.iter().find(|rule| rule.matches(&method, &sub_path))
}
