use smol_str::SmolStr;

#[inline(always)]
pub fn lower_case(s: &str) -> SmolStr {
    s.chars()
        .map(|c| c.to_lowercase().collect::<String>())
        .collect::<SmolStr>()
}

#[inline(always)]
pub fn upper_case(s: &str) -> SmolStr {
    s.chars()
        .map(|c| c.to_uppercase().collect::<String>())
        .collect::<SmolStr>()
}

#[inline(always)]
pub fn upper_first(s: &str) -> SmolStr {
    let mut c = s.chars();
    match c.next() {
        None => SmolStr::new(""),
        Some(f) => SmolStr::from(f.to_uppercase().collect::<String>() + c.as_str()),
    }
}

/// First letter uppercase, the rest lowercase.
#[inline(always)]
pub fn capitalize_first(s: &str) -> SmolStr {
    upper_first(&lower_case(s))
}

pub fn is_all_upper(s: &str) -> bool {
    s.chars().all(char::is_uppercase)
}

pub fn is_all_lower(s: &str) -> bool {
    s.chars().all(char::is_lowercase)
}

/// Recases `target` after the word the user typed.
///
/// An all-caps template (beyond its first letter) gives an all-caps result,
/// a capitalized one a capitalized result, anything else lowercase.
/// `sentence_start` capitalizes results that would otherwise be lowercase.
/// A bare "i" always becomes "I".
pub fn capitalize_from_template(template: &str, target: &str, sentence_start: bool) -> SmolStr {
    if target.trim().is_empty() {
        return SmolStr::default();
    }

    if lower_case(target) == "i" {
        return SmolStr::new("I");
    }

    let recase_plain = || {
        if sentence_start {
            capitalize_first(target)
        } else {
            lower_case(target)
        }
    };

    let mut chars = template.chars();
    let first = match chars.next() {
        Some(first) if !template.trim().is_empty() => first,
        _ => return recase_plain(),
    };

    if !first.is_uppercase() {
        return recase_plain();
    }

    let rest = chars.as_str();
    if is_all_upper(rest) && !is_all_lower(rest) {
        return upper_case(target);
    }

    capitalize_first(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recasing() {
        assert_eq!(lower_case("ČÁHCI"), "čáhci");
        assert_eq!(upper_case("čáhci"), "ČÁHCI");
        assert_eq!(upper_first("čáhci"), "Čáhci");
        assert_eq!(capitalize_first("hELLO"), "Hello");
        assert_eq!(upper_first(""), "");
    }

    #[test]
    fn templates() {
        assert_eq!(capitalize_from_template("lov", "love", false), "love");
        assert_eq!(capitalize_from_template("lov", "LOVE", false), "love");
        assert_eq!(capitalize_from_template("lov", "love", true), "Love");
        assert_eq!(capitalize_from_template("Lov", "love", false), "Love");
        assert_eq!(capitalize_from_template("LOV", "love", false), "LOVE");
        assert_eq!(capitalize_from_template("L", "love", false), "Love");
        assert_eq!(capitalize_from_template("LoV", "love", false), "Love");
        assert_eq!(capitalize_from_template("", "love", false), "love");
        assert_eq!(capitalize_from_template(" ", "love", true), "Love");
        assert_eq!(capitalize_from_template("x", "i", false), "I");
        assert_eq!(capitalize_from_template("Lov", "", true), "");
    }

    #[test]
    fn all_caps_checks() {
        assert_eq!(is_all_upper("ABC"), true);
        assert_eq!(is_all_upper("AbC"), false);
        assert_eq!(is_all_lower("abc"), true);
        assert_eq!(is_all_lower(""), true);
    }
}
