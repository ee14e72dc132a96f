use smallvec::SmallVec;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::errors::{ErrorKind, MonguitoError, MonguitoResult};

/// Specifies the direction for sorting documents.
///
/// # Variants
/// - `Ascending`: Sort from smallest to largest value (A to Z, 0 to 9)
/// - `Descending`: Sort from largest to smallest value (Z to A, 9 to 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Sort in ascending order (smallest to largest, A-Z)
    #[default]
    Ascending,
    /// Sort in descending order (largest to smallest, Z-A)
    Descending,
}

impl FromStr for SortOrder {
    type Err = MonguitoError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if token.eq_ignore_ascii_case("ASC") {
            Ok(SortOrder::Ascending)
        } else if token.eq_ignore_ascii_case("DESC") {
            Ok(SortOrder::Descending)
        } else {
            log::error!("Unknown sort direction '{}', expecting ASC or DESC", token);
            Err(MonguitoError::new(
                &format!("Unknown sort direction '{}', expecting ASC or DESC", token),
                ErrorKind::InvalidSortExpression,
            ))
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Ascending => write!(f, "ASC"),
            SortOrder::Descending => write!(f, "DESC"),
        }
    }
}

/// An ordered list of `(field, direction)` sort keys. The first key is the
/// primary key; later keys only break ties.
///
/// Built from a sort expression such as `"seller, total DESC"`:
///
/// ```rust,ignore
/// let fields = SortableFields::parse("seller ASC, total DESC")?;
/// assert_eq!(fields.sorting_order()[1], ("total".to_string(), SortOrder::Descending));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortableFields {
    sorting_order: SmallVec<[(String, SortOrder); 4]>,
}

impl SortableFields {
    pub fn new() -> Self {
        SortableFields {
            sorting_order: SmallVec::new(),
        }
    }

    pub fn add_sorted_field(mut self, field_name: String, sort_order: SortOrder) -> Self {
        self.sorting_order.push((field_name, sort_order));
        self
    }

    pub fn sorting_order(&self) -> &[(String, SortOrder)] {
        &self.sorting_order
    }

    /// Parses a comma-separated list of `field [ASC|DESC]` clauses.
    ///
    /// Runs of whitespace are collapsed and the direction is case-insensitive,
    /// defaulting to `ASC`. An empty expression, an empty clause, an unknown
    /// direction or a clause with more than two tokens is rejected.
    pub fn parse(expression: &str) -> MonguitoResult<SortableFields> {
        if expression.trim().is_empty() {
            log::error!("Sort expression can't be empty");
            return Err(MonguitoError::new(
                "Sort expression can't be empty",
                ErrorKind::InvalidSortExpression,
            ));
        }

        let mut fields = SortableFields::new();
        for clause in expression.split(',') {
            let tokens: SmallVec<[&str; 2]> = clause.split_whitespace().collect();
            match tokens.as_slice() {
                [field] => {
                    fields = fields.add_sorted_field(field.to_string(), SortOrder::Ascending);
                }
                [field, direction] => {
                    let order = direction.parse::<SortOrder>()?;
                    fields = fields.add_sorted_field(field.to_string(), order);
                }
                [] => {
                    log::error!("Sort expression '{}' has an empty clause", expression);
                    return Err(MonguitoError::new(
                        &format!("Sort expression '{}' has an empty clause", expression),
                        ErrorKind::InvalidSortExpression,
                    ));
                }
                _ => {
                    log::error!("Sort clause '{}' must be 'field [ASC|DESC]'", clause.trim());
                    return Err(MonguitoError::new(
                        &format!("Sort clause '{}' must be 'field [ASC|DESC]'", clause.trim()),
                        ErrorKind::InvalidSortExpression,
                    ));
                }
            }
        }
        Ok(fields)
    }
}

impl FromStr for SortableFields {
    type Err = MonguitoError;

    fn from_str(expression: &str) -> Result<Self, Self::Err> {
        SortableFields::parse(expression)
    }
}
