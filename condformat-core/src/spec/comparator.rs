/// Numeric comparator, identified on the wire by the symbol token the rule
/// editor emits (`">"`, `"≤ x <"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    None,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    Equal,
    NotEqual,
    Between,
    BetweenOrEqual,
    BetweenOrLeftEqual,
    BetweenOrRightEqual,
}

impl Comparator {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "None" => Some(Self::None),
            ">" => Some(Self::GreaterThan),
            "<" => Some(Self::LessThan),
            "≥" => Some(Self::GreaterOrEqual),
            "≤" => Some(Self::LessOrEqual),
            "=" => Some(Self::Equal),
            "≠" => Some(Self::NotEqual),
            "< x <" => Some(Self::Between),
            "≤ x ≤" => Some(Self::BetweenOrEqual),
            "≤ x <" => Some(Self::BetweenOrLeftEqual),
            "< x ≤" => Some(Self::BetweenOrRightEqual),
            _ => None,
        }
    }

    pub fn as_token(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::GreaterOrEqual => "≥",
            Self::LessOrEqual => "≤",
            Self::Equal => "=",
            Self::NotEqual => "≠",
            Self::Between => "< x <",
            Self::BetweenOrEqual => "≤ x ≤",
            Self::BetweenOrLeftEqual => "≤ x <",
            Self::BetweenOrRightEqual => "< x ≤",
        }
    }

    /// Whether the comparator takes a left and right bound rather than a
    /// single target value.
    pub fn is_multi_value(&self) -> bool {
        matches!(
            self,
            Self::Between
                | Self::BetweenOrEqual
                | Self::BetweenOrLeftEqual
                | Self::BetweenOrRightEqual
        )
    }
}

/// String comparator. Unrecognized tokens normalize to `Unknown`, which never
/// matches at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringComparator {
    None,
    Equal,
    NotEqual,
    Contains,
    StartsWith,
    EndsWith,
    Unknown,
}

impl StringComparator {
    pub fn parse(token: &str) -> Self {
        match token {
            "None" => Self::None,
            "=" => Self::Equal,
            "≠" => Self::NotEqual,
            "contains" => Self::Contains,
            "starts with" => Self::StartsWith,
            "ends with" => Self::EndsWith,
            _ => Self::Unknown,
        }
    }
}
