use std::fmt::Display;

use super::schema::ColumnType;

/// A single cell value, tagged with its runtime type.
///
/// [`Value::Empty`] is the sentinel for a cell that has never been
/// written. Every column type starts out as `Empty` and renders as the
/// empty string, so a client can display a grid without knowing the
/// column types.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Char(char),
    Integer(i32),
    Real(f64),
    Empty,
}

impl Value {
    pub fn coerce(raw: &str, declared: ColumnType) -> Option<Value> {
        //! Coerce raw wire text into a value of the declared column type.
        //!
        //! Returns [`None`] when the text cannot represent the type: a
        //! non-numeric string for Integer/Real, or more than one character
        //! for Char. Empty input always coerces to [`Value::Empty`].

        if raw.is_empty() {
            return Some(Value::Empty);
        }

        match declared {
            ColumnType::String => Some(Value::Text(raw.to_string())),
            ColumnType::Char => {
                let mut chars = raw.chars();
                let first = chars.next()?;
                if chars.next().is_some() {
                    None
                } else {
                    Some(Value::Char(first))
                }
            }
            ColumnType::Integer => raw.parse::<i32>().ok().map(Value::Integer),
            ColumnType::Real => raw.parse::<f64>().ok().map(Value::Real),
        }
    }

    pub fn render(&self) -> String {
        //! Turn the value back into its wire text form.

        match self {
            Value::Text(text) => text.clone(),
            Value::Char(character) => character.to_string(),
            Value::Integer(number) => number.to_string(),
            Value::Real(number) => number.to_string(),
            Value::Empty => String::new(),
        }
    }
}

/// One row of a table: a fixed-order tuple of values, positionally
/// aligned with the owning table's schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Row(pub Vec<Value>);

impl Row {
    pub fn rendered(&self) -> Vec<String> {
        //! Render every cell to its wire text form, in column order.

        self.0.iter().map(|value| value.render()).collect()
    }
}

impl Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rendered().join(" | "))
    }
}
