use serde::Deserialize;

/// Options of [`process_document()`](crate::process_document).
///
/// Deserializable from any [`serde`] format, missing fields taking their
/// default values:
///
/// ```rust
/// # use juniper_document::DocumentOptions;
/// let options = DocumentOptions::default()
///     .max_errors(10)
///     .disable_rule("5.5.1.4");
///
/// assert!(options.validate);
/// assert_eq!(options.max_errors, Some(10));
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentOptions {
    /// Whether to run the validation rules at all.
    pub validate: bool,

    /// Maximum number of reported validation errors, unlimited if `None`.
    pub max_errors: Option<usize>,

    /// Numbers of the rules to skip, e.g. `5.8.4`.
    ///
    /// Disabling a rule also disables all the rules it's made of, so `5.8`
    /// skips every variable check.
    pub disabled_rules: Vec<String>,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            validate: true,
            max_errors: None,
            disabled_rules: vec![],
        }
    }
}

impl DocumentOptions {
    /// Sets whether the validation rules are run.
    #[must_use]
    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Limits the number of reported validation errors.
    #[must_use]
    pub fn max_errors(mut self, max: usize) -> Self {
        self.max_errors = Some(max);
        self
    }

    /// Skips the rule with the provided number.
    #[must_use]
    pub fn disable_rule(mut self, number: impl Into<String>) -> Self {
        self.disabled_rules.push(number.into());
        self
    }

    /// Checks whether the rule with the provided number is skipped, either
    /// directly or through one of the rules it belongs to.
    pub fn is_rule_disabled(&self, number: &str) -> bool {
        self.disabled_rules.iter().any(|d| {
            number == d
                || number
                    .strip_prefix(d.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::DocumentOptions;

    #[test]
    fn deserializes_with_defaults() {
        let options: DocumentOptions = serde_json::from_str("{}").expect("valid options");
        assert_eq!(options, DocumentOptions::default());

        let options: DocumentOptions =
            serde_json::from_str(r#"{"maxErrors": 3, "disabledRules": ["5.8.4"]}"#)
                .expect("valid options");
        assert!(options.validate);
        assert_eq!(options.max_errors, Some(3));
        assert_eq!(options.disabled_rules, ["5.8.4"]);
    }

    #[test]
    fn rejects_malformed_options() {
        assert!(serde_json::from_str::<DocumentOptions>(r#"{"validate": "yes"}"#).is_err());
    }

    #[test]
    fn disables_nested_rules() {
        let options = DocumentOptions::default()
            .validate(false)
            .disable_rule("5.8")
            .disable_rule("5.2.1.1");

        assert!(!options.validate);
        assert!(options.is_rule_disabled("5.8"));
        assert!(options.is_rule_disabled("5.8.3"));
        assert!(options.is_rule_disabled("5.2.1.1"));
        assert!(!options.is_rule_disabled("5.2.1"));
        assert!(!options.is_rule_disabled("5.2"));
        assert!(!options.is_rule_disabled("5.81"));
    }
}
