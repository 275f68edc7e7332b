use crate::error::{Result, ResultWithContext};
use crate::spec::comparator::{Comparator, StringComparator};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Parse an ordered rule list from the editor UI's JSON payload.
pub fn parse_rule_list(value: &Value) -> Result<Vec<FormatterRuleSpec>> {
    serde_json::from_value(value.clone())
        .with_context(|| "Failed to parse the conditional formatting rule list")
}

/// One entry of the user-authored conditional formatting configuration, as
/// emitted by the rule editor. All fields are optional at this level; the
/// closed, validated form is [`RuleConfig`], produced by [`normalize`].
///
/// [`normalize`]: FormatterRuleSpec::normalize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatterRuleSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    #[serde(default)]
    pub is_string: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value_left: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value_right: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_string_value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<String>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// A rule that survived normalization, discriminated by value domain.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleConfig {
    Numeric(NumericRule),
    Str(StringRule),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumericRule {
    pub column: String,
    pub operator: Comparator,
    pub target_value: Option<f64>,
    pub target_value_left: Option<f64>,
    pub target_value_right: Option<f64>,
    pub color_scheme: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringRule {
    pub column: String,
    pub operator: StringComparator,
    pub target_string_value: Option<String>,
    pub color_scheme: String,
}

impl FormatterRuleSpec {
    /// Validate this raw rule and convert it into its typed form.
    ///
    /// Returns `None` for rules that can never produce a color entry: missing
    /// column or color scheme, unrecognized numeric operator, or numeric
    /// target bounds inconsistent with the operator's arity. String rules
    /// with an empty or missing target are kept (they evaluate to no-match,
    /// not to an absent entry).
    pub fn normalize(&self) -> Option<RuleConfig> {
        let Some(column) = self.column.clone() else {
            debug!("Skipping formatter rule without a column");
            return None;
        };
        let Some(color_scheme) = self.color_scheme.clone() else {
            debug!("Skipping formatter rule for {column:?} without a color scheme");
            return None;
        };

        if self.is_string {
            let operator = self
                .operator
                .as_deref()
                .map(StringComparator::parse)
                .unwrap_or(StringComparator::Unknown);
            return Some(RuleConfig::Str(StringRule {
                column,
                operator,
                target_string_value: self.target_string_value.clone(),
                color_scheme,
            }));
        }

        let operator = match self.operator.as_deref().map(Comparator::parse) {
            Some(Some(operator)) => operator,
            _ => {
                debug!(
                    "Skipping numeric formatter rule for {column:?} with operator {:?}",
                    self.operator
                );
                return None;
            }
        };
        let valid = match operator {
            Comparator::None => true,
            op if op.is_multi_value() => {
                self.target_value_left.is_some() && self.target_value_right.is_some()
            }
            _ => self.target_value.is_some(),
        };
        if !valid {
            debug!(
                "Skipping numeric formatter rule for {column:?}: operator {} is missing its target bounds",
                operator.as_token()
            );
            return None;
        }

        Some(RuleConfig::Numeric(NumericRule {
            column,
            operator,
            target_value: self.target_value,
            target_value_left: self.target_value_left,
            target_value_right: self.target_value_right,
            color_scheme,
        }))
    }
}
