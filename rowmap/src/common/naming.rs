//! Identifier case conversion between field names and column names.

/// Converts a camelCase identifier to snake_case.
///
/// Every uppercase character after the first position becomes `_` followed by its
/// lowercase form. An uppercase first character is lower-cased without an underscore.
/// Everything else passes through, so an already snake_case name is returned unchanged.
///
/// # Examples
///
/// ```rust
/// use rowmap::common::naming::to_snake_case;
///
/// assert_eq!(to_snake_case("createdAt"), "created_at");
/// assert_eq!(to_snake_case("UserName"), "user_name");
/// assert_eq!(to_snake_case("user_name"), "user_name");
/// ```
pub fn to_snake_case(identifier: &str) -> String {
    let mut result = String::with_capacity(identifier.len() + 4);
    for (index, ch) in identifier.chars().enumerate() {
        if ch.is_uppercase() {
            if index > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

/// Converts a snake_case identifier to camelCase.
///
/// The character after each underscore is upper-cased and the underscore dropped.
/// Leading underscores are kept.
pub fn to_camel_case(identifier: &str) -> String {
    let mut result = String::with_capacity(identifier.len());
    let mut upper_next = false;
    for ch in identifier.chars() {
        if ch == '_' && !result.is_empty() {
            upper_next = true;
        } else if upper_next {
            result.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            result.push(ch);
        }
    }
    result
}
