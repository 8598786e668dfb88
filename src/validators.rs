//! Pure syntactic predicates used by the parser: title shape, ordinal
//! suffix agreement, measure/measure-type concord, and the numeric
//! constraints on cooking-time and time declarations.

use crate::error::{SyntaxError, SyntaxErrorKind};

/// Checks that a title is non-empty and ends with a full stop.
pub fn validate_title(title: &str) -> Result<(), SyntaxError> {
    if title.is_empty() {
        return Err(SyntaxError::new(SyntaxErrorKind::MissingTitle, None));
    }
    if !title.ends_with('.') {
        return Err(SyntaxError::new(
            SyntaxErrorKind::MissingTrailingFullStop,
            Some(1),
        ));
    }
    Ok(())
}

/// Checks that `number` and `suffix` form a sensible ordinal (`2nd`, not
/// `2th`), per standard English ordinal rules with the `11th`/`12th`/`13th`
/// exceptions.
pub fn validate_ordinal_id_suffix(
    number: u32,
    suffix: &str,
    lineno: Option<u32>,
) -> Result<(), SyntaxError> {
    let last_digit = number % 10;
    let ok = match suffix {
        "st" => number != 11 && last_digit == 1,
        "nd" => number != 12 && last_digit == 2,
        "rd" => number != 13 && last_digit == 3,
        "th" => matches!(number, 11 | 12 | 13) || !matches!(last_digit, 1 | 2 | 3),
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(SyntaxError::new(
            SyntaxErrorKind::NonMatchingSuffix {
                number,
                suffix: suffix.to_string(),
            },
            lineno,
        ))
    }
}

const VALID_MEASURE_VALUES: &[&str] = &[
    "pinch",
    "pinches",
    "cup",
    "cups",
    "teaspoon",
    "teaspoons",
    "tablespoon",
    "tablespoons",
];

/// Checks that a `heaped`/`level` measure type only qualifies a measure it
/// makes sense with (you can heap a cup, not a millilitre).
pub fn validate_measure_type(
    measure: &str,
    measure_type: &str,
    lineno: Option<u32>,
) -> Result<(), SyntaxError> {
    if measure_type != "heaped" && measure_type != "level" {
        return Err(SyntaxError::new(
            SyntaxErrorKind::InvalidMeasureType {
                measure_type: measure_type.to_string(),
            },
            lineno,
        ));
    }
    if !VALID_MEASURE_VALUES.contains(&measure) {
        return Err(SyntaxError::new(
            SyntaxErrorKind::NonMatchingMeasureType {
                measure: measure.to_string(),
                measure_type: measure_type.to_string(),
            },
            lineno,
        ));
    }
    Ok(())
}

/// Checks a `Cooking time:` declaration's number/unit agreement: `1 hour`
/// and `2 hours`, never `1 hours` or `2 hour`.
pub fn validate_cooking_time(time: u32, unit: &str, lineno: Option<u32>) -> Result<(), SyntaxError> {
    if time < 1 {
        return Err(SyntaxError::new(
            SyntaxErrorKind::NotAllowedTime { time: time as i64 },
            lineno,
        ));
    }
    let plural = unit.ends_with('s');
    if (time == 1 && plural) || (time > 1 && !plural) {
        return Err(SyntaxError::new(
            SyntaxErrorKind::NonMatchingUnit {
                number: time,
                unit: unit.to_string(),
            },
            lineno,
        ));
    }
    Ok(())
}

/// Checks a `Refrigerate for N hour(s)` declaration's number/unit
/// agreement. A missing `hours` value is always valid.
pub fn validate_time_declaration(
    hours: Option<u32>,
    unit: &str,
    lineno: Option<u32>,
) -> Result<(), SyntaxError> {
    let Some(hours) = hours else {
        return Ok(());
    };
    let singular_unit = unit == "hour";
    let plural_unit = unit == "hours";
    if (hours == 1 && plural_unit) || (hours > 1 && singular_unit) {
        return Err(SyntaxError::new(
            SyntaxErrorKind::InvalidTimeDeclaration {
                hours,
                unit: unit.to_string(),
            },
            lineno,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn title_without_full_stop_is_rejected() {
        assert!(validate_title("Mash").is_err());
    }

    #[test]
    fn empty_title_is_missing() {
        let err = validate_title("").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::MissingTitle);
    }

    #[test]
    fn title_with_full_stop_is_accepted() {
        assert!(validate_title("Mash.").is_ok());
    }

    #[test_case(1, "st"; "1st")]
    #[test_case(2, "nd"; "2nd")]
    #[test_case(3, "rd"; "3rd")]
    #[test_case(4, "th"; "4th")]
    #[test_case(11, "th"; "11th exception")]
    #[test_case(12, "th"; "12th exception")]
    #[test_case(13, "th"; "13th exception")]
    #[test_case(21, "st"; "21st")]
    fn valid_ordinal_suffixes(number: u32, suffix: &str) {
        assert!(validate_ordinal_id_suffix(number, suffix, None).is_ok());
    }

    #[test_case(1, "th"; "1th is wrong")]
    #[test_case(11, "st"; "11st is wrong")]
    #[test_case(2, "st"; "2st is wrong")]
    fn invalid_ordinal_suffixes(number: u32, suffix: &str) {
        assert!(validate_ordinal_id_suffix(number, suffix, None).is_err());
    }

    #[test]
    fn measure_type_requires_known_value() {
        assert!(validate_measure_type("cups", "heaped", None).is_ok());
        assert!(validate_measure_type("cups", "chunky", None).is_err());
    }

    #[test]
    fn measure_type_requires_compatible_measure() {
        assert!(validate_measure_type("ml", "level", None).is_err());
    }

    #[test]
    fn cooking_time_singular_plural_agreement() {
        assert!(validate_cooking_time(1, "hour", None).is_ok());
        assert!(validate_cooking_time(2, "hours", None).is_ok());
        assert!(validate_cooking_time(1, "hours", None).is_err());
        assert!(validate_cooking_time(2, "hour", None).is_err());
    }

    #[test]
    fn cooking_time_rejects_zero() {
        assert!(validate_cooking_time(0, "hours", None).is_err());
    }

    #[test]
    fn time_declaration_allows_missing_hours() {
        assert!(validate_time_declaration(None, "hours", None).is_ok());
    }

    #[test]
    fn time_declaration_singular_plural_agreement() {
        assert!(validate_time_declaration(Some(1), "hour", None).is_ok());
        assert!(validate_time_declaration(Some(2), "hours", None).is_ok());
        assert!(validate_time_declaration(Some(1), "hours", None).is_err());
        assert!(validate_time_declaration(Some(2), "hour", None).is_err());
    }
}
