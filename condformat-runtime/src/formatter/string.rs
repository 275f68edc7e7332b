use condformat_core::spec::comparator::StringComparator;
use condformat_core::spec::rule::StringRule;
use serde_json::Value;

/// Per-rule string value-to-color mapping. String formatting is flat: a
/// match yields the scheme token as-is, never an alpha-scaled variant.
#[derive(Debug, Clone)]
pub struct StringColorScale {
    operator: StringComparator,
    target: Option<String>,
    color_scheme: String,
}

impl StringColorScale {
    pub fn new(rule: StringRule) -> Self {
        Self {
            operator: rule.operator,
            target: rule.target_string_value,
            color_scheme: rule.color_scheme,
        }
    }

    pub fn color_for(&self, value: &Value) -> Option<String> {
        self.matches(value).then(|| self.color_scheme.clone())
    }

    pub fn color_scheme(&self) -> &str {
        &self.color_scheme
    }

    fn matches(&self, value: &Value) -> bool {
        // `None` is unconditional and applies before the empty-cell guard
        if self.operator == StringComparator::None {
            return true;
        }
        if is_empty_cell(value) {
            return false;
        }
        // An empty target can never be matched against
        let Some(target) = self.target.as_deref().filter(|target| !target.is_empty()) else {
            return false;
        };
        match self.operator {
            StringComparator::None => true,
            StringComparator::Equal => value.as_str() == Some(target),
            StringComparator::NotEqual => value.as_str() != Some(target),
            StringComparator::Contains => value.as_str().is_some_and(|v| v.contains(target)),
            StringComparator::StartsWith => value.as_str().is_some_and(|v| v.starts_with(target)),
            StringComparator::EndsWith => value.as_str().is_some_and(|v| v.ends_with(target)),
            StringComparator::Unknown => false,
        }
    }
}

fn is_empty_cell(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
