//! Lenient scalar coercion for contract cells.
//!
//! None of these functions fail: unrecognized booleans become `false` and unparseable optional
//! numbers become `None`.

use super::cell::Cell;

/// Tokens (compared trimmed and upper-cased) that read as `true`.
pub const TRUE_TOKENS: [&str; 5] = ["Y", "YES", "TRUE", "1", "T"];

/// Boolean flag coercion. Missing cells and any token outside [`TRUE_TOKENS`] are `false`.
pub fn parse_boolean(cell: &Cell) -> bool {
    match cell {
        Cell::Empty => false,
        Cell::Bool(b) => *b,
        other => {
            let token = other.to_string().trim().to_ascii_uppercase();
            TRUE_TOKENS.contains(&token.as_str())
        }
    }
}

/// Optional text coercion. Missing or blank cells are `None`; other text is returned as-is.
pub fn parse_optional_string(cell: &Cell) -> Option<String> {
    if cell.is_empty() {
        return None;
    }
    let text = cell.to_string();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Optional number coercion. Missing cells, unparseable text and NaN are `None`.
pub fn parse_optional_float(cell: &Cell) -> Option<f64> {
    let v = match cell {
        Cell::Empty => return None,
        Cell::Int(i) => *i as f64,
        Cell::Float(f) => *f,
        Cell::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Cell::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    if v.is_nan() { None } else { Some(v) }
}

/// Required text coercion. Missing cells become the empty string.
pub fn cell_to_text(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn true_tokens_in_any_case_with_whitespace() {
        for raw in ["Y", "y", " yes ", "Yes", "TRUE", "true", "1", " t", "T\t"] {
            assert!(parse_boolean(&Cell::text(raw)), "expected true for {raw:?}");
        }
    }

    #[test]
    fn everything_else_is_false() {
        for raw in ["N", "no", "False", "maybe", "2", "", "   ", "0"] {
            assert!(!parse_boolean(&Cell::text(raw)), "expected false for {raw:?}");
        }
        assert!(!parse_boolean(&Cell::Empty));
    }

    #[test]
    fn boolean_from_native_and_numeric_cells() {
        assert!(parse_boolean(&Cell::Bool(true)));
        assert!(!parse_boolean(&Cell::Bool(false)));
        assert!(parse_boolean(&Cell::Int(1)));
        assert!(parse_boolean(&Cell::Float(1.0)));
        assert!(!parse_boolean(&Cell::Float(1.5)));
        assert!(!parse_boolean(&Cell::Int(0)));
    }

    #[test]
    fn optional_string_blank_is_none() {
        assert_eq!(parse_optional_string(&Cell::Empty), None);
        assert_eq!(parse_optional_string(&Cell::text("")), None);
        assert_eq!(parse_optional_string(&Cell::text("  \t")), None);
    }

    #[test]
    fn optional_string_keeps_text_unchanged() {
        assert_eq!(parse_optional_string(&Cell::text(" N/A ")), Some(" N/A ".to_string()));
        assert_eq!(parse_optional_string(&Cell::Float(0.0)), Some("0".to_string()));
    }

    #[test]
    fn optional_float_rules() {
        assert_eq!(parse_optional_float(&Cell::Empty), None);
        assert_eq!(parse_optional_float(&Cell::text("3.5")), Some(3.5));
        assert_eq!(parse_optional_float(&Cell::text(" 10 ")), Some(10.0));
        assert_eq!(parse_optional_float(&Cell::text("abc")), None);
        assert_eq!(parse_optional_float(&Cell::text("")), None);
        assert_eq!(parse_optional_float(&Cell::text("NaN")), None);
        assert_eq!(parse_optional_float(&Cell::Int(-4)), Some(-4.0));
        assert_eq!(parse_optional_float(&Cell::Float(0.25)), Some(0.25));
        assert_eq!(parse_optional_float(&Cell::Bool(true)), Some(1.0));
    }

    #[test]
    fn required_text_never_produces_nan_token() {
        assert_eq!(cell_to_text(&Cell::Empty), "");
        assert_eq!(cell_to_text(&Cell::text("customers")), "customers");
        assert_eq!(cell_to_text(&Cell::Float(2024.0)), "2024");
    }
}
