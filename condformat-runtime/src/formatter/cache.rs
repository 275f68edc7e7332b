use crate::formatter::{
    resolve_numeric_formatters, resolve_string_formatters, NumericFormatter, StringFormatter,
};
use condformat_core::data::table::RowTable;
use condformat_core::spec::rule::FormatterRuleSpec;
use log::{debug, log_enabled, Level};
use std::sync::Arc;

/// Single-slot caches guarding formatter resolution against recomputation
/// when a caller re-renders with unchanged inputs.
///
/// Keys compare by `Arc` identity: a hit requires the same rule-list and
/// table allocations plus an equal alpha flag, so a freshly ingested but
/// value-equal table recomputes. One slot per domain, most-recent-wins.
/// The cache is `Send` but not synchronized; a multithreaded caller wraps
/// it in a `Mutex`.
#[derive(Debug, Default)]
pub struct FormatterCache {
    numeric: Option<NumericSlot>,
    string: Option<StringSlot>,
}

#[derive(Debug)]
struct NumericSlot {
    rules: Arc<Vec<FormatterRuleSpec>>,
    table: Arc<RowTable>,
    alpha: bool,
    output: Arc<Vec<NumericFormatter>>,
}

#[derive(Debug)]
struct StringSlot {
    rules: Arc<Vec<FormatterRuleSpec>>,
    table: Arc<RowTable>,
    output: Arc<Vec<StringFormatter>>,
}

impl FormatterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve_numeric(
        &mut self,
        rules: &Arc<Vec<FormatterRuleSpec>>,
        table: &Arc<RowTable>,
        alpha: bool,
    ) -> Arc<Vec<NumericFormatter>> {
        if let Some(slot) = &self.numeric {
            if Arc::ptr_eq(&slot.rules, rules)
                && Arc::ptr_eq(&slot.table, table)
                && slot.alpha == alpha
            {
                return slot.output.clone();
            }
        }
        if log_enabled!(Level::Debug) {
            debug!(
                "Numeric formatter cache miss: {} rules, table fingerprint {}",
                rules.len(),
                table.fingerprint()
            );
        }
        let output = Arc::new(resolve_numeric_formatters(rules.as_slice(), table, alpha));
        self.numeric = Some(NumericSlot {
            rules: rules.clone(),
            table: table.clone(),
            alpha,
            output: output.clone(),
        });
        output
    }

    pub fn resolve_string(
        &mut self,
        rules: &Arc<Vec<FormatterRuleSpec>>,
        table: &Arc<RowTable>,
    ) -> Arc<Vec<StringFormatter>> {
        if let Some(slot) = &self.string {
            if Arc::ptr_eq(&slot.rules, rules) && Arc::ptr_eq(&slot.table, table) {
                return slot.output.clone();
            }
        }
        if log_enabled!(Level::Debug) {
            debug!(
                "String formatter cache miss: {} rules, table fingerprint {}",
                rules.len(),
                table.fingerprint()
            );
        }
        let output = Arc::new(resolve_string_formatters(rules.as_slice(), table));
        self.string = Some(StringSlot {
            rules: rules.clone(),
            table: table.clone(),
            output: output.clone(),
        });
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rules() -> Arc<Vec<FormatterRuleSpec>> {
        Arc::new(
            serde_json::from_value(json!([
                {"column": "count", "operator": "None", "colorScheme": "#ff0000"},
                {"column": "name", "isString": true, "operator": "=",
                 "targetStringValue": "a", "colorScheme": "#00ff00"},
            ]))
            .unwrap(),
        )
    }

    fn table() -> Arc<RowTable> {
        Arc::new(RowTable::from_json(&json!([{"count": 1, "name": "a"}, {"count": 2, "name": "b"}])).unwrap())
    }

    #[test]
    fn test_repeated_call_returns_same_allocation() {
        let mut cache = FormatterCache::new();
        let (rules, table) = (rules(), table());

        let first = cache.resolve_numeric(&rules, &table, true);
        let second = cache.resolve_numeric(&rules, &table, true);
        assert!(Arc::ptr_eq(&first, &second));

        let first = cache.resolve_string(&rules, &table);
        let second = cache.resolve_string(&rules, &table);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_alpha_flag_invalidates() {
        let mut cache = FormatterCache::new();
        let (rules, table) = (rules(), table());

        let first = cache.resolve_numeric(&rules, &table, true);
        let second = cache.resolve_numeric(&rules, &table, false);
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_value_equal_inputs_with_new_allocations_recompute() {
        let mut cache = FormatterCache::new();
        let table = table();

        let first = cache.resolve_numeric(&rules(), &table, true);
        let second = cache.resolve_numeric(&rules(), &table, true);
        assert!(!Arc::ptr_eq(&first, &second));

        let rules = rules();
        let first = cache.resolve_numeric(&rules, &self::table(), true);
        let second = cache.resolve_numeric(&rules, &self::table(), true);
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_slot_is_most_recent_wins() {
        let mut cache = FormatterCache::new();
        let (first_rules, table) = (rules(), table());
        let second_rules = rules();

        let first = cache.resolve_numeric(&first_rules, &table, true);
        cache.resolve_numeric(&second_rules, &table, true);
        // The original key was evicted by the newer one
        let recomputed = cache.resolve_numeric(&first_rules, &table, true);
        assert!(!Arc::ptr_eq(&first, &recomputed));
    }
}
