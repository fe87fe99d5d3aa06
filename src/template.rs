//! Literal placeholder substitution. A template is any string containing
//! markers of the form `{name}`; a [`Replacement`] fills one of them. There is
//! no escaping, no looping, and no recursion: a value is inserted verbatim.
//!
//! Only the *first* occurrence of a placeholder is filled by a replacement, so
//! templates should mention each placeholder exactly once.

/// A single `{variable}` -> `value` substitution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Replacement {
    /// The placeholder name, without braces.
    pub variable: String,

    /// The text that replaces the placeholder.
    pub value: String,
}

impl Replacement {
    pub fn new(variable: impl Into<String>, value: impl Into<String>) -> Replacement {
        Replacement {
            variable: variable.into(),
            value: value.into(),
        }
    }

    fn placeholder(&self) -> String {
        format!("{{{}}}", self.variable)
    }
}

/// Replaces the first occurrence of `{replacement.variable}` in `template`
/// with `replacement.value`. If the placeholder is absent, the template is
/// returned unchanged.
pub fn replace_template_variable(template: &str, replacement: &Replacement) -> String {
    template.replacen(&replacement.placeholder(), &replacement.value, 1)
}

/// Applies each replacement in order to the running result (see
/// [`replace_template_variable`]). A value inserted by an earlier replacement
/// is visible to later ones.
pub fn replace_template_variables(template: &str, replacements: &[Replacement]) -> String {
    replacements
        .iter()
        .fold(template.to_owned(), |acc, replacement| {
            replace_template_variable(&acc, replacement)
        })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_replace_single_placeholder() {
        let template = "<main>{content}</main>";
        assert_eq!(
            "<main><p>hi</p></main>",
            replace_template_variable(template, &Replacement::new("content", "<p>hi</p>")),
        );
    }

    #[test]
    fn test_replace_only_first_occurrence() {
        let template = "{x} and {x}";
        assert_eq!(
            "1 and {x}",
            replace_template_variable(template, &Replacement::new("x", "1")),
        );
    }

    #[test]
    fn test_missing_placeholder_is_noop() {
        let template = "<p>{content}</p>";
        assert_eq!(
            template,
            replace_template_variable(template, &Replacement::new("head", "ignored")),
        );
    }

    #[test]
    fn test_value_inserted_verbatim() {
        // `$&` would be special in some regex replacement syntaxes.
        let template = "<p>{content}</p>";
        assert_eq!(
            "<p>$& {other} &amp;</p>",
            replace_template_variable(template, &Replacement::new("content", "$& {other} &amp;")),
        );
    }

    #[test]
    fn test_replace_in_order() {
        let template = "<head>{head}</head><body>{header}{content}</body>";
        let got = replace_template_variables(
            template,
            &[
                Replacement::new("head", "H"),
                Replacement::new("header", "HD"),
                Replacement::new("content", "C"),
            ],
        );
        assert_eq!("<head>H</head><body>HDC</body>", got);
    }

    #[test]
    fn test_earlier_value_visible_to_later_replacement() {
        let got = replace_template_variables(
            "{head}|{content}",
            &[
                Replacement::new("head", "{content}"),
                Replacement::new("content", "C"),
            ],
        );
        assert_eq!("C|{content}", got);
    }

    #[test]
    fn test_empty_replacements() {
        assert_eq!("{a}", replace_template_variables("{a}", &[]));
    }
}
