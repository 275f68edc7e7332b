use regex::Regex;

lazy_static! {
    static ref HEX_COLOR_RE: Regex =
        Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap();
}

/// Encode `opacity` into a `#rgb` or `#rrggbb` color token by appending a
/// two-digit hex alpha channel. Opacity is clamped to [0, 1]; tokens that
/// aren't hex colors are returned unchanged.
pub fn add_alpha(color: &str, opacity: f64) -> String {
    if !HEX_COLOR_RE.is_match(color) {
        return color.to_string();
    }
    let channel = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("{}{channel:02x}", expand_shorthand(color))
}

fn expand_shorthand(color: &str) -> String {
    let digits = &color[1..];
    if digits.len() != 3 {
        return color.to_string();
    }
    let mut expanded = String::with_capacity(7);
    expanded.push('#');
    for digit in digits.chars() {
        expanded.push(digit);
        expanded.push(digit);
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::add_alpha;

    #[test]
    fn test_add_alpha_full_hex() {
        assert_eq!(add_alpha("#ff0000", 1.0), "#ff0000ff");
        assert_eq!(add_alpha("#ff0000", 0.5), "#ff000080");
        assert_eq!(add_alpha("#FF0000", 0.0), "#FF000000");
    }

    #[test]
    fn test_add_alpha_shorthand_hex() {
        assert_eq!(add_alpha("#f00", 1.0), "#ff0000ff");
        assert_eq!(add_alpha("#abc", 0.5), "#aabbcc80");
    }

    #[test]
    fn test_add_alpha_clamps_opacity() {
        assert_eq!(add_alpha("#ff0000", 1.5), "#ff0000ff");
        assert_eq!(add_alpha("#ff0000", -0.5), "#ff000000");
    }

    #[test]
    fn test_add_alpha_passes_through_non_hex_tokens() {
        assert_eq!(add_alpha("tomato", 0.5), "tomato");
        assert_eq!(add_alpha("#12345", 0.5), "#12345");
        assert_eq!(add_alpha("", 0.5), "");
    }
}
