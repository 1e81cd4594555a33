//! Sort specification and value ordering.

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Row;
use crate::model::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }
}

/// Sorting by one column.
///
/// # Example
///
/// ```
/// use dataframe_lib::query::{Direction, SortSpec};
///
/// let sort = SortSpec::desc("amount");
/// assert_eq!(sort.direction, Direction::Desc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    #[serde(default)]
    pub direction: Direction,
}

impl SortSpec {
    /// Creates an ascending sort on a column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    /// Creates a descending sort on a column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Desc,
        }
    }

    /// Compares two rows under this sort. Nulls and missing values sort last
    /// in both directions.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        compare_rows(a, b, &self.column, self.direction)
    }
}

/// Compares two rows on one field. Nulls and missing values always sort last.
pub fn compare_rows(a: &Row, b: &Row, field: &str, direction: Direction) -> Ordering {
    match (a.present(field), b.present(field)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ord = compare_values(x, y);
            match direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            }
        }
    }
}

/// Compares two non-null values.
///
/// Strings compare case-insensitively and numeric-aware, numbers and
/// decimals numerically, dates temporally and booleans `false < true`.
/// Mixed types fall back to comparing their text.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(x), Value::String(y)) => natural_cmp(x, y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Date(x), Value::Date(y)) => x.cmp(y),
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Decimal(x), Value::Decimal(y)) => x.cmp(y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => natural_cmp(&a.to_text(), &b.to_text()),
        },
    }
}

/// Case-insensitive comparison that orders digit runs by numeric value, so
/// `"Item 2"` sorts before `"Item 10"`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let left = take_digits(&mut a);
                let right = take_digits(&mut b);
                let ord = compare_digit_runs(&left, &right);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.to_lowercase().cmp(y.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        run.push(c);
        chars.next();
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Sorts rows in place. The sort is stable: rows comparing equal keep their
/// relative order.
pub fn sort_rows(rows: &mut [&Row], sort: &SortSpec) {
    rows.sort_by(|a, b| sort.compare(a, b));
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_natural_order() {
        assert_eq!(natural_cmp("Item 2", "Item 10"), Ordering::Less);
        assert_eq!(natural_cmp("item 2", "Item 2"), Ordering::Equal);
        assert_eq!(natural_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(natural_cmp("a007", "a7"), Ordering::Equal);
        assert_eq!(natural_cmp("abc", "ab"), Ordering::Greater);
    }

    #[test]
    fn test_typed_comparisons() {
        assert_eq!(
            compare_values(&Value::Bool(false), &Value::Bool(true)),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::Int(3), &Value::Float(2.5)),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&Value::Decimal(Decimal::new(1999, 2)), &Value::Int(20)),
            Ordering::Less
        );

        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(
            compare_values(&Value::Date(late), &Value::Date(early)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_mixed_types_compare_as_text() {
        assert_eq!(
            compare_values(&Value::from("10"), &Value::Int(9)),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&Value::from("abc"), &Value::Bool(true)),
            Ordering::Less
        );
    }

    #[test]
    fn test_nulls_last_both_directions() {
        let rows = [
            Row::new().set("id", "a").set("n", Value::Null),
            Row::new().set("id", "b").set("n", 2i64),
            Row::new().set("id", "c"),
            Row::new().set("id", "d").set("n", 1i64),
        ];

        for sort in [SortSpec::asc("n"), SortSpec::desc("n")] {
            let mut refs: Vec<&Row> = rows.iter().collect();
            sort_rows(&mut refs, &sort);
            let ids: Vec<String> = refs.iter().map(|r| r.text("id")).collect();
            assert_eq!(&ids[2..], ["a", "c"]);
        }
    }

    #[test]
    fn test_direction_toggle() {
        assert_eq!(Direction::Asc.toggled(), Direction::Desc);
        assert_eq!(Direction::Desc.toggled(), Direction::Asc);
    }
}
