//! Case conversion between custom element tags and JavaScript bindings.

/// Converts a tag or component name to lowercase-hyphenated form.
///
/// Word boundaries are inserted before an uppercase letter that follows a
/// lowercase letter or digit, and before the last capital of an acronym run
/// when a lowercase letter follows it. Any other non-alphanumeric character
/// is treated as a separator.
///
/// # Examples
///
/// ```
/// use fmloader_core::naming::to_kebab_case;
///
/// assert_eq!(to_kebab_case("MyWidget"), "my-widget");
/// assert_eq!(to_kebab_case("my-widget"), "my-widget");
/// assert_eq!(to_kebab_case("MDXProvider"), "mdx-provider");
/// assert_eq!(to_kebab_case("My_Widget"), "my-widget");
/// ```
pub fn to_kebab_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_ascii_alphanumeric() {
            push_separator(&mut out);
            continue;
        }

        if ch.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let after_lower = prev.is_ascii_lowercase() || prev.is_ascii_digit();
            let acronym_end =
                prev.is_ascii_uppercase() && next.is_some_and(|n| n.is_ascii_lowercase());
            if after_lower || acronym_end {
                push_separator(&mut out);
            }
        }

        out.push(ch.to_ascii_lowercase());
    }

    while out.ends_with('-') {
        out.pop();
    }
    out
}

fn push_separator(out: &mut String) {
    if !out.is_empty() && !out.ends_with('-') {
        out.push('-');
    }
}

/// Converts a name to a PascalCase identifier usable as a JavaScript binding.
///
/// # Examples
///
/// ```
/// use fmloader_core::naming::to_pascal_case;
///
/// assert_eq!(to_pascal_case("my-widget"), "MyWidget");
/// assert_eq!(to_pascal_case("MDXProvider"), "MdxProvider");
/// ```
pub fn to_pascal_case(name: &str) -> String {
    let kebab = to_kebab_case(name);
    let mut out = String::with_capacity(kebab.len());
    for segment in kebab.split('-').filter(|s| !s.is_empty()) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_handles_common_shapes() {
        assert_eq!(to_kebab_case("ChildComponent"), "child-component");
        assert_eq!(to_kebab_case("child-component"), "child-component");
        assert_eq!(to_kebab_case("Child-Component"), "child-component");
        assert_eq!(to_kebab_case("URLTable"), "url-table");
        assert_eq!(to_kebab_case("Widget2Box"), "widget2-box");
        assert_eq!(to_kebab_case("x-2d"), "x-2d");
        assert_eq!(to_kebab_case("my--widget-"), "my-widget");
    }

    #[test]
    fn kebab_and_pascal_spellings_share_a_canonical_name() {
        assert_eq!(to_kebab_case("CodeConfusing"), to_kebab_case("code-confusing"));
    }

    #[test]
    fn pascal_builds_identifiers() {
        assert_eq!(to_pascal_case("child-component"), "ChildComponent");
        assert_eq!(to_pascal_case("ChildComponent"), "ChildComponent");
        assert_eq!(to_pascal_case("x-2d"), "X2d");
        assert_eq!(to_pascal_case("app.header"), "AppHeader");
    }
}
