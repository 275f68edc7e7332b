use crate::color::add_alpha;
use crate::formatter::opacity::{
    compute_opacity, MAX_OPACITY, MIN_OPACITY_BOUNDED, MIN_OPACITY_UNBOUNDED,
};
use condformat_core::spec::comparator::Comparator;
use condformat_core::spec::rule::NumericRule;
use itertools::Itertools;

/// Bounds of a matched comparator: the cutoff the value is measured from,
/// and the extreme that receives full opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MatchBounds {
    cutoff: f64,
    extreme: f64,
}

/// Per-rule numeric value-to-color mapping, resolved once against the full
/// data column so each evaluation is O(1) apart from the `≠` index lookup.
#[derive(Debug, Clone)]
pub struct NumericColorScale {
    operator: Comparator,
    target_value: Option<f64>,
    target_left: Option<f64>,
    target_right: Option<f64>,
    color_scheme: String,
    column_min: f64,
    column_max: f64,
    sorted_values: Vec<f64>,
    alpha: bool,
}

impl NumericColorScale {
    pub fn new(rule: NumericRule, column_values: &[f64], alpha: bool) -> Self {
        let column_min = column_values.iter().copied().fold(f64::INFINITY, f64::min);
        let column_max = column_values
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let sorted_values = column_values
            .iter()
            .copied()
            .sorted_by(|a, b| a.total_cmp(b))
            .collect();
        Self {
            operator: rule.operator,
            target_value: rule.target_value,
            target_left: rule.target_value_left,
            target_right: rule.target_value_right,
            color_scheme: rule.color_scheme,
            column_min,
            column_max,
            sorted_values,
            alpha,
        }
    }

    /// Color token for `value`, or `None` when the comparator doesn't match.
    /// With alpha disabled the raw scheme token is returned; the opacity is
    /// still computed so that both modes exercise the same branches.
    pub fn color_for(&self, value: f64) -> Option<String> {
        let bounds = self.match_bounds(value)?;
        let opacity = self.opacity_for(value, bounds);
        if self.alpha {
            Some(add_alpha(&self.color_scheme, opacity))
        } else {
            Some(self.color_scheme.clone())
        }
    }

    pub fn color_scheme(&self) -> &str {
        &self.color_scheme
    }

    fn match_bounds(&self, value: f64) -> Option<MatchBounds> {
        match self.operator {
            Comparator::None => (self.column_min <= value && value <= self.column_max).then_some(
                MatchBounds {
                    cutoff: self.column_min,
                    extreme: self.column_max,
                },
            ),
            Comparator::GreaterThan => {
                let target = self.target_value?;
                (value > target).then_some(MatchBounds {
                    cutoff: target,
                    extreme: self.column_max,
                })
            }
            Comparator::LessThan => {
                let target = self.target_value?;
                (value < target).then_some(MatchBounds {
                    cutoff: target,
                    extreme: self.column_min,
                })
            }
            Comparator::GreaterOrEqual => {
                let target = self.target_value?;
                (value >= target).then_some(MatchBounds {
                    cutoff: target,
                    extreme: self.column_max,
                })
            }
            Comparator::LessOrEqual => {
                let target = self.target_value?;
                (value <= target).then_some(MatchBounds {
                    cutoff: target,
                    extreme: self.column_min,
                })
            }
            Comparator::Equal => {
                let target = self.target_value?;
                (value == target).then_some(MatchBounds {
                    cutoff: target,
                    extreme: target,
                })
            }
            Comparator::NotEqual => {
                let target = self.target_value?;
                (value != target).then(|| self.not_equal_bounds(value, target))
            }
            Comparator::Between => {
                let (left, right) = (self.target_left?, self.target_right?);
                (left < value && value < right).then_some(MatchBounds {
                    cutoff: left,
                    extreme: right,
                })
            }
            Comparator::BetweenOrEqual => {
                let (left, right) = (self.target_left?, self.target_right?);
                (left <= value && value <= right).then_some(MatchBounds {
                    cutoff: left,
                    extreme: right,
                })
            }
            Comparator::BetweenOrLeftEqual => {
                let (left, right) = (self.target_left?, self.target_right?);
                (left <= value && value < right).then_some(MatchBounds {
                    cutoff: left,
                    extreme: right,
                })
            }
            Comparator::BetweenOrRightEqual => {
                let (left, right) = (self.target_left?, self.target_right?);
                (left < value && value <= right).then_some(MatchBounds {
                    cutoff: left,
                    extreme: right,
                })
            }
        }
    }

    // Tie-break for `≠`: values below a target that occurs in the column fade
    // in from zero toward the target; values above it (or any value when the
    // target sits below the whole column) have no upper extreme and stay at
    // the minimum opacity.
    fn not_equal_bounds(&self, value: f64, target: f64) -> MatchBounds {
        let found = self.sorted_values.iter().any(|v| *v == target);
        if found {
            if value < target {
                MatchBounds {
                    cutoff: 0.0,
                    extreme: target,
                }
            } else {
                MatchBounds {
                    cutoff: target,
                    extreme: f64::INFINITY,
                }
            }
        } else if self.sorted_values.first().is_some_and(|first| target < *first) {
            MatchBounds {
                cutoff: target,
                extreme: f64::INFINITY,
            }
        } else {
            MatchBounds {
                cutoff: 0.0,
                extreme: target,
            }
        }
    }

    fn opacity_for(&self, value: f64, bounds: MatchBounds) -> f64 {
        let unbounded = matches!(self.operator, Comparator::None | Comparator::NotEqual);
        let min_opacity = if unbounded {
            MIN_OPACITY_UNBOUNDED
        } else {
            MIN_OPACITY_BOUNDED
        };

        if !unbounded && value == bounds.extreme {
            return MAX_OPACITY;
        }

        if self.operator == Comparator::NotEqual {
            let Some(target) = self.target_value else {
                return min_opacity;
            };
            if bounds.extreme.is_infinite() {
                return min_opacity;
            }
            let range = (bounds.extreme - bounds.cutoff).abs();
            let distance = (value - target).abs();
            return compute_opacity(0.0, range, distance);
        }

        // Double application of the min/max scaling, kept byte-for-byte with
        // the rendered output of deployed dashboards.
        let range = (bounds.extreme - bounds.cutoff).abs();
        let distance = (value - bounds.cutoff).abs();
        let ratio = if range == 0.0 {
            if distance == 0.0 {
                0.0
            } else {
                f64::INFINITY
            }
        } else {
            distance / range
        };
        compute_opacity(
            min_opacity,
            MAX_OPACITY,
            ratio * (MAX_OPACITY - min_opacity) + min_opacity,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use condformat_core::spec::comparator::Comparator;

    fn scale(
        operator: Comparator,
        target: Option<f64>,
        left: Option<f64>,
        right: Option<f64>,
        column_values: &[f64],
        alpha: bool,
    ) -> NumericColorScale {
        NumericColorScale::new(
            NumericRule {
                column: "count".to_string(),
                operator,
                target_value: target,
                target_value_left: left,
                target_value_right: right,
                color_scheme: "#ff0000".to_string(),
            },
            column_values,
            alpha,
        )
    }

    #[test]
    fn test_none_matches_inside_column_extent() {
        let scale = scale(Comparator::None, None, None, None, &[1.0, 5.0, 3.0], false);
        assert!(scale.color_for(1.0).is_some());
        assert!(scale.color_for(5.0).is_some());
        assert!(scale.color_for(3.0).is_some());
        assert_eq!(scale.color_for(0.5), None);
        assert_eq!(scale.color_for(5.5), None);
    }

    #[test]
    fn test_none_on_empty_column_never_matches() {
        let scale = scale(Comparator::None, None, None, None, &[], false);
        assert_eq!(scale.color_for(0.0), None);
    }

    #[test]
    fn test_equal_matches_at_full_opacity() {
        let values = [1.0, 2.0, 3.0];
        let scale = scale(Comparator::Equal, Some(2.0), None, None, &values, true);
        assert_eq!(scale.color_for(2.0), Some("#ff0000ff".to_string()));
        assert_eq!(scale.color_for(2.5), None);
    }

    #[test]
    fn test_between_excludes_both_endpoints() {
        let values = [0.0, 5.0, 10.0];
        let scale = scale(
            Comparator::Between,
            None,
            Some(0.0),
            Some(10.0),
            &values,
            false,
        );
        assert_eq!(scale.color_for(0.0), None);
        assert_eq!(scale.color_for(10.0), None);
        assert_eq!(scale.color_for(5.0), Some("#ff0000".to_string()));
    }

    #[test]
    fn test_between_or_one_sided_endpoints() {
        let values = [0.0, 5.0, 10.0];
        let left_eq = scale(
            Comparator::BetweenOrLeftEqual,
            None,
            Some(0.0),
            Some(10.0),
            &values,
            false,
        );
        assert!(left_eq.color_for(0.0).is_some());
        assert_eq!(left_eq.color_for(10.0), None);

        let right_eq = scale(
            Comparator::BetweenOrRightEqual,
            None,
            Some(0.0),
            Some(10.0),
            &values,
            false,
        );
        assert_eq!(right_eq.color_for(0.0), None);
        assert!(right_eq.color_for(10.0).is_some());
    }

    #[test]
    fn test_greater_than_extreme_hits_max_opacity() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let scale = scale(Comparator::GreaterThan, Some(2.0), None, None, &values, true);
        assert_eq!(scale.color_for(2.0), None);
        // Column maximum is the extreme of `>`
        assert_eq!(scale.color_for(5.0), Some("#ff0000ff".to_string()));
        // distance 1 over range 3, double-scaled: 1/3 * 0.7 + 0.3 -> 0.33
        assert_eq!(scale.color_for(3.0), Some("#ff000054".to_string()));
    }

    #[test]
    fn test_less_than_fades_toward_column_minimum() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let scale = scale(Comparator::LessThan, Some(4.0), None, None, &values, true);
        assert_eq!(scale.color_for(4.0), None);
        assert_eq!(scale.color_for(1.0), Some("#ff0000ff".to_string()));
    }

    #[test]
    fn test_not_equal_tie_break_with_target_in_column() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let scale = scale(Comparator::NotEqual, Some(3.0), None, None, &values, true);
        assert_eq!(scale.color_for(3.0), None);
        // Below target: cutoff 0 / extreme 3, distance 2 -> 2/3 -> 0.67
        assert_eq!(scale.color_for(1.0), Some("#ff0000ab".to_string()));
        // Above target: extreme is unbounded, minimum opacity 0.1
        assert_eq!(scale.color_for(5.0), Some("#ff00001a".to_string()));
    }

    #[test]
    fn test_not_equal_tie_break_with_target_outside_column() {
        let values = [1.0, 2.0, 3.0];
        // Target below the whole column: unbounded side, minimum opacity
        let below = scale(Comparator::NotEqual, Some(0.5), None, None, &values, true);
        assert_eq!(below.color_for(2.0), Some("#ff00001a".to_string()));

        // Target above the whole column: cutoff 0 / extreme target
        let above = scale(Comparator::NotEqual, Some(4.0), None, None, &values, true);
        // distance |2 - 4| = 2 over range 4 -> 0.5
        assert_eq!(above.color_for(2.0), Some("#ff000080".to_string()));
    }

    #[test]
    fn test_alpha_disabled_returns_raw_scheme() {
        let values = [1.0, 2.0, 3.0];
        let scale = scale(Comparator::GreaterThan, Some(1.0), None, None, &values, false);
        assert_eq!(scale.color_for(2.0), Some("#ff0000".to_string()));
        assert_eq!(scale.color_for(3.0), Some("#ff0000".to_string()));
    }

    #[test]
    fn test_degenerate_between_bounds() {
        let values = [5.0];
        let scale = scale(
            Comparator::BetweenOrEqual,
            None,
            Some(5.0),
            Some(5.0),
            &values,
            true,
        );
        // value == extreme, full opacity
        assert_eq!(scale.color_for(5.0), Some("#ff0000ff".to_string()));
        assert_eq!(scale.color_for(4.0), None);
    }
}
