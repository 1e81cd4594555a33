//! Validation rules and value conversion for cell edits.

use std::rc::Rc;

use chrono::SecondsFormat;
use regex::Regex;

use crate::column::ColumnEdit;
use crate::column::EditType;
use crate::model::Value;
use crate::model::parse_date;

/// Type alias for custom rule closures.
type CustomRule = Rc<dyn Fn(&str) -> bool>;

#[derive(Clone)]
enum Rule {
    Required(String),
    MinLength(usize, String),
    MaxLength(usize, String),
    Pattern(Regex, String),
    Min(f64, String),
    Max(f64, String),
    Custom(CustomRule, String),
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Required(_) => write!(f, "Required"),
            Rule::MinLength(n, _) => write!(f, "MinLength({n})"),
            Rule::MaxLength(n, _) => write!(f, "MaxLength({n})"),
            Rule::Pattern(re, _) => write!(f, "Pattern({})", re.as_str()),
            Rule::Min(n, _) => write!(f, "Min({n})"),
            Rule::Max(n, _) => write!(f, "Max({n})"),
            Rule::Custom(_, msg) => write!(f, "Custom({msg:?})"),
        }
    }
}

/// Validation rules for an editable column.
///
/// Length and pattern rules apply to text and select inputs, range rules to
/// number inputs, custom rules to every input. The first failing rule's
/// message is the one shown inline.
///
/// # Example
///
/// ```
/// use dataframe_lib::edit::Rules;
/// use regex::Regex;
///
/// let rules = Rules::new()
///     .required("SKU is required")
///     .max_length(12, "SKU is too long")
///     .pattern(Regex::new("^[A-Z0-9-]+$").unwrap(), "Use capitals, digits and dashes");
/// assert!(!rules.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Rules {
    rules: Vec<Rule>,
}

impl Rules {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a non-blank value.
    pub fn required(mut self, msg: impl Into<String>) -> Self {
        self.rules.push(Rule::Required(msg.into()));
        self
    }

    /// Require minimum length (in characters).
    pub fn min_length(mut self, min: usize, msg: impl Into<String>) -> Self {
        self.rules.push(Rule::MinLength(min, msg.into()));
        self
    }

    /// Require maximum length (in characters).
    pub fn max_length(mut self, max: usize, msg: impl Into<String>) -> Self {
        self.rules.push(Rule::MaxLength(max, msg.into()));
        self
    }

    /// Require the value to match a regex pattern.
    pub fn pattern(mut self, re: Regex, msg: impl Into<String>) -> Self {
        self.rules.push(Rule::Pattern(re, msg.into()));
        self
    }

    /// Require a number greater than or equal to `min`.
    pub fn min(mut self, min: f64, msg: impl Into<String>) -> Self {
        self.rules.push(Rule::Min(min, msg.into()));
        self
    }

    /// Require a number less than or equal to `max`.
    pub fn max(mut self, max: f64, msg: impl Into<String>) -> Self {
        self.rules.push(Rule::Max(max, msg.into()));
        self
    }

    /// Add a custom rule on the raw input.
    pub fn rule<F>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&str) -> bool + 'static,
    {
        self.rules.push(Rule::Custom(Rc::new(f), msg.into()));
        self
    }

    /// Returns `true` if no rules are set.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn required_message(&self) -> Option<&str> {
        self.rules.iter().find_map(|rule| match rule {
            Rule::Required(msg) => Some(msg.as_str()),
            _ => None,
        })
    }

    fn check_text(&self, input: &str) -> Result<(), String> {
        for rule in &self.rules {
            let ok = match rule {
                Rule::MinLength(min, _) => input.chars().count() >= *min,
                Rule::MaxLength(max, _) => input.chars().count() <= *max,
                Rule::Pattern(re, _) => re.is_match(input),
                _ => true,
            };
            if !ok {
                return Err(rule_message(rule).to_string());
            }
        }
        Ok(())
    }

    fn check_number(&self, n: f64) -> Result<(), String> {
        for rule in &self.rules {
            let ok = match rule {
                Rule::Min(min, _) => n >= *min,
                Rule::Max(max, _) => n <= *max,
                _ => true,
            };
            if !ok {
                return Err(rule_message(rule).to_string());
            }
        }
        Ok(())
    }

    fn check_custom(&self, input: &str) -> Result<(), String> {
        for rule in &self.rules {
            if let Rule::Custom(f, msg) = rule
                && !f(input)
            {
                return Err(msg.clone());
            }
        }
        Ok(())
    }
}

fn rule_message(rule: &Rule) -> &str {
    match rule {
        Rule::Required(msg)
        | Rule::MinLength(_, msg)
        | Rule::MaxLength(_, msg)
        | Rule::Pattern(_, msg)
        | Rule::Min(_, msg)
        | Rule::Max(_, msg)
        | Rule::Custom(_, msg) => msg,
    }
}

/// Validates a working value and converts it to the column's target type.
///
/// Text and select inputs commit as strings, number inputs as `Int` when
/// integral and `Float` otherwise, date inputs as ISO-8601 strings. A blank
/// input that is not required commits as an empty string (text) or null.
pub fn validate_input(edit: &ColumnEdit, input: &str) -> Result<Value, String> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        if let Some(msg) = edit.rules.required_message() {
            return Err(msg.to_string());
        }
        return Ok(match edit.kind {
            EditType::Text => Value::String(String::new()),
            _ => Value::Null,
        });
    }

    edit.rules.check_custom(input)?;

    match edit.kind {
        EditType::Text => {
            edit.rules.check_text(input)?;
            Ok(Value::String(input.to_string()))
        }
        EditType::Select => {
            if !edit.options.is_empty() && !edit.options.iter().any(|o| o == trimmed) {
                return Err(format!("Must be one of: {}", edit.options.join(", ")));
            }
            edit.rules.check_text(trimmed)?;
            Ok(Value::String(trimmed.to_string()))
        }
        EditType::Number => {
            let n = trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| "Must be a valid number".to_string())?;
            edit.rules.check_number(n)?;
            Ok(number_value(n))
        }
        EditType::Date => {
            let date = parse_date(trimmed).ok_or_else(|| "Must be a valid date".to_string())?;
            Ok(Value::String(
                date.to_rfc3339_opts(SecondsFormat::Millis, true),
            ))
        }
    }
}

fn number_value(n: f64) -> Value {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        Value::Int(n as i64)
    } else {
        Value::Float(n)
    }
}

/// Returns the text an input starts with when editing begins.
pub fn edit_text(kind: EditType, value: &Value) -> String {
    match (kind, value) {
        (EditType::Date, Value::Date(d)) => d.format("%Y-%m-%d").to_string(),
        (EditType::Date, Value::String(s)) => parse_date(s)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| s.clone()),
        _ => value.to_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit(kind: EditType, rules: Rules) -> ColumnEdit {
        ColumnEdit {
            kind,
            rules,
            ..ColumnEdit::default()
        }
    }

    #[test]
    fn test_text_rules_report_first_failure() {
        let col = edit(
            EditType::Text,
            Rules::new()
                .required("Required")
                .min_length(3, "Too short")
                .max_length(5, "Too long"),
        );
        assert_eq!(validate_input(&col, "  ").unwrap_err(), "Required");
        assert_eq!(validate_input(&col, "ab").unwrap_err(), "Too short");
        assert_eq!(validate_input(&col, "abcdef").unwrap_err(), "Too long");
        assert_eq!(validate_input(&col, "abcd").unwrap(), Value::from("abcd"));
    }

    #[test]
    fn test_pattern_rule() {
        let col = edit(
            EditType::Text,
            Rules::new().pattern(Regex::new(r"^\d{4}$").unwrap(), "Four digits"),
        );
        assert_eq!(validate_input(&col, "12a4").unwrap_err(), "Four digits");
        assert!(validate_input(&col, "1234").is_ok());
    }

    #[test]
    fn test_number_conversion_and_range() {
        let col = edit(
            EditType::Number,
            Rules::new().min(0.0, "No negatives").max(100.0, "Too many"),
        );
        assert_eq!(validate_input(&col, "12").unwrap(), Value::Int(12));
        assert_eq!(validate_input(&col, "2.5").unwrap(), Value::Float(2.5));
        assert_eq!(validate_input(&col, "-1").unwrap_err(), "No negatives");
        assert_eq!(validate_input(&col, "101").unwrap_err(), "Too many");
        assert_eq!(
            validate_input(&col, "twelve").unwrap_err(),
            "Must be a valid number"
        );
        assert_eq!(validate_input(&col, "").unwrap(), Value::Null);
    }

    #[test]
    fn test_date_converts_to_iso() {
        let col = edit(EditType::Date, Rules::new());
        assert_eq!(
            validate_input(&col, "2024-05-01").unwrap(),
            Value::from("2024-05-01T00:00:00.000Z")
        );
        assert_eq!(
            validate_input(&col, "May first").unwrap_err(),
            "Must be a valid date"
        );
    }

    #[test]
    fn test_select_requires_known_option() {
        let col = ColumnEdit {
            kind: EditType::Select,
            options: vec!["active".into(), "inactive".into()],
            ..ColumnEdit::default()
        };
        assert!(validate_input(&col, "active").is_ok());
        assert_eq!(
            validate_input(&col, "archived").unwrap_err(),
            "Must be one of: active, inactive"
        );
    }

    #[test]
    fn test_custom_rule() {
        let col = edit(
            EditType::Text,
            Rules::new().rule(|v| !v.contains(' '), "No spaces"),
        );
        assert_eq!(validate_input(&col, "a b").unwrap_err(), "No spaces");
    }

    #[test]
    fn test_edit_text_for_dates() {
        let value = Value::from("2024-05-01T10:00:00Z");
        assert_eq!(edit_text(EditType::Date, &value), "2024-05-01");
        assert_eq!(edit_text(EditType::Number, &Value::Int(5)), "5");
    }
}
