//! Sort resolution: a client-facing sort key becomes one concrete ordering
//! instruction, with virtual keys resolving through the joined company.
//!
//! Single-key sort only; tie order is whatever the store's natural order is,
//! which is non-deterministic unless the store guarantees stable ordering.

use crate::errors::ValidationError;

const DEFAULT_SORT_KEY: &str = "createdAt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Physical ordering target after virtual-key resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortTarget {
    /// Column on the application itself.
    Own(&'static str),
    /// Column on a joined entity.
    Joined {
        relation: &'static str,
        column: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub target: SortTarget,
    pub direction: Direction,
}

impl SortSpec {
    /// Default ordering for list and recent-application queries.
    #[must_use]
    pub const fn newest_first() -> Self {
        Self {
            target: SortTarget::Own("created_at"),
            direction: Direction::Desc,
        }
    }
}

type Resolver = fn() -> SortTarget;

/// Lookup table from sort key to resolver. New virtual keys are additive
/// entries here, not new branches elsewhere.
const SORT_RESOLVERS: &[(&str, Resolver)] = &[
    ("createdAt", || SortTarget::Own("created_at")),
    ("updatedAt", || SortTarget::Own("updated_at")),
    ("appliedDate", || SortTarget::Own("applied_date")),
    ("responseDeadline", || SortTarget::Own("response_deadline")),
    ("jobTitle", || SortTarget::Own("job_title")),
    ("status", || SortTarget::Own("status")),
    ("priority", || SortTarget::Own("priority")),
    ("salaryMin", || SortTarget::Own("salary_min")),
    ("salaryMax", || SortTarget::Own("salary_max")),
    ("isFavorite", || SortTarget::Own("is_favorite")),
    ("companyName", || SortTarget::Joined {
        relation: "company",
        column: "name",
    }),
];

fn parse_direction(raw: Option<&str>) -> Result<Direction, ValidationError> {
    match raw {
        None => Ok(Direction::Desc),
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            _ => Err(ValidationError::new(
                "sortOrder",
                format!("must be 'asc' or 'desc', got '{value}'"),
            )),
        },
    }
}

/// Resolve `sortBy`/`sortOrder` into a concrete [`SortSpec`].
///
/// Defaults to `createdAt desc`. An unrecognized key or order is a
/// validation error.
pub fn resolve(
    sort_by: Option<&str>,
    sort_order: Option<&str>,
) -> Result<SortSpec, ValidationError> {
    let key = sort_by.unwrap_or(DEFAULT_SORT_KEY);
    let direction = parse_direction(sort_order)?;

    let target = SORT_RESOLVERS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, resolver)| resolver())
        .ok_or_else(|| {
            ValidationError::new("sortBy", format!("unknown sort key '{key}'"))
        })?;

    Ok(SortSpec { target, direction })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_created_at_desc() {
        let sort = resolve(None, None).unwrap();
        assert_eq!(sort, SortSpec::newest_first());
    }

    #[test]
    fn company_name_resolves_through_the_join() {
        let sort = resolve(Some("companyName"), Some("asc")).unwrap();
        assert_eq!(
            sort.target,
            SortTarget::Joined {
                relation: "company",
                column: "name"
            }
        );
        assert_eq!(sort.direction, Direction::Asc);
    }

    #[test]
    fn own_keys_map_to_snake_case_columns() {
        let sort = resolve(Some("appliedDate"), None).unwrap();
        assert_eq!(sort.target, SortTarget::Own("applied_date"));
    }

    #[test]
    fn direction_is_case_insensitive() {
        assert_eq!(
            resolve(None, Some("ASC")).unwrap().direction,
            Direction::Asc
        );
        assert_eq!(
            resolve(None, Some("Desc")).unwrap().direction,
            Direction::Desc
        );
    }

    #[test]
    fn unknown_sort_key_is_an_error() {
        let err = resolve(Some("personalNotes"), None).unwrap_err();
        assert_eq!(err.field, "sortBy");
    }

    #[test]
    fn unknown_sort_order_is_an_error() {
        let err = resolve(None, Some("sideways")).unwrap_err();
        assert_eq!(err.field, "sortOrder");
    }
}
