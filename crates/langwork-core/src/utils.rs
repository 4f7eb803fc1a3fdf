//! Identifier case helpers used by the default naming policy.

/// Uppercase the first character.
///
/// # Examples
/// ```
/// use langwork_core::utils::upper_first;
/// assert_eq!(upper_first("decl"), "Decl");
/// assert_eq!(upper_first("var_decl"), "Var_decl");
/// ```
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase the first character.
///
/// # Examples
/// ```
/// use langwork_core::utils::lower_first;
/// assert_eq!(lower_first("Decl"), "decl");
/// ```
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// True when the name has at least one letter and no lowercase letters.
///
/// `ID`, `NAME2` and `HEX_INT` are all-uppercase; `Id` and `_` are not.
pub fn is_all_uppercase(s: &str) -> bool {
    s.chars().any(|c| c.is_alphabetic()) && !s.chars().any(|c| c.is_lowercase())
}

/// Lowercase the first character unless the whole name is uppercase.
///
/// # Examples
/// ```
/// use langwork_core::utils::lower_first_unless_upper;
/// assert_eq!(lower_first_unless_upper("Expr"), "expr");
/// assert_eq!(lower_first_unless_upper("ID"), "ID");
/// ```
pub fn lower_first_unless_upper(s: &str) -> String {
    if is_all_uppercase(s) {
        s.to_owned()
    } else {
        lower_first(s)
    }
}
