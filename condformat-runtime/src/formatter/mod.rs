pub mod cache;
pub mod numeric;
pub mod opacity;
pub mod string;

use condformat_core::data::table::RowTable;
use condformat_core::spec::rule::{FormatterRuleSpec, RuleConfig};
use serde_json::Value;

pub use numeric::NumericColorScale;
pub use string::StringColorScale;

/// A resolved numeric rule: the column it formats and its color scale.
#[derive(Debug, Clone)]
pub struct NumericFormatter {
    pub column: String,
    pub scale: NumericColorScale,
}

impl NumericFormatter {
    pub fn color_for(&self, value: f64) -> Option<String> {
        self.scale.color_for(value)
    }
}

/// A resolved string rule: the column it formats and its color scale.
#[derive(Debug, Clone)]
pub struct StringFormatter {
    pub column: String,
    pub scale: StringColorScale,
}

impl StringFormatter {
    pub fn color_for(&self, value: &Value) -> Option<String> {
        self.scale.color_for(value)
    }
}

/// Resolve the numeric-domain rules of `rules` against `table`, in input
/// order. Invalid rules and string-domain rules contribute no entry;
/// duplicate columns are preserved and the caller decides precedence.
pub fn resolve_numeric_formatters(
    rules: &[FormatterRuleSpec],
    table: &RowTable,
    alpha: bool,
) -> Vec<NumericFormatter> {
    rules
        .iter()
        .filter_map(|rule| match rule.normalize()? {
            RuleConfig::Numeric(numeric) => {
                let column_values = table.numeric_column(&numeric.column);
                let column = numeric.column.clone();
                let scale = NumericColorScale::new(numeric, &column_values, alpha);
                Some(NumericFormatter { column, scale })
            }
            RuleConfig::Str(_) => None,
        })
        .collect()
}

/// Resolve the string-domain rules of `rules`, in input order. The table is
/// part of the call signature for parity with the numeric entry point (and
/// for the memoization key), but string scales need no column statistics.
pub fn resolve_string_formatters(
    rules: &[FormatterRuleSpec],
    _table: &RowTable,
) -> Vec<StringFormatter> {
    rules
        .iter()
        .filter_map(|rule| match rule.normalize()? {
            RuleConfig::Str(string_rule) => {
                let column = string_rule.column.clone();
                let scale = StringColorScale::new(string_rule);
                Some(StringFormatter { column, scale })
            }
            RuleConfig::Numeric(_) => None,
        })
        .collect()
}
