//! Free-text search clause: one substring predicate per selected field,
//! combined as a disjunction that participates in the compiler's AND.

use super::predicate::{Field, Predicate};
use super::spec::FilterSpec;

/// Field a free-text search may target. `CompanyName` reads the joined
/// company's name; everything else is an attribute of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    JobTitle,
    CompanyName,
    PersonalNotes,
    JobDescription,
    Requirements,
    Location,
}

/// The closed catalog, also advertised by the filter-options endpoint.
pub const SEARCH_FIELD_CATALOG: [SearchField; 6] = [
    SearchField::JobTitle,
    SearchField::CompanyName,
    SearchField::PersonalNotes,
    SearchField::JobDescription,
    SearchField::Requirements,
    SearchField::Location,
];

/// Fields searched when the caller does not narrow the selection.
pub const DEFAULT_SEARCH_FIELDS: [SearchField; 3] = [
    SearchField::JobTitle,
    SearchField::CompanyName,
    SearchField::PersonalNotes,
];

impl SearchField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JobTitle => "jobTitle",
            Self::CompanyName => "companyName",
            Self::PersonalNotes => "personalNotes",
            Self::JobDescription => "jobDescription",
            Self::Requirements => "requirements",
            Self::Location => "location",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        SEARCH_FIELD_CATALOG
            .iter()
            .copied()
            .find(|f| f.as_str() == value)
    }

    const fn target(self) -> Field {
        match self {
            Self::JobTitle => Field::JobTitle,
            Self::CompanyName => Field::CompanyName,
            Self::PersonalNotes => Field::PersonalNotes,
            Self::JobDescription => Field::JobDescription,
            Self::Requirements => Field::Requirements,
            Self::Location => Field::Location,
        }
    }
}

/// Build the OR clause for the spec's search term, if any.
///
/// A missing or blank term contributes nothing to the overall filter.
#[must_use]
pub fn clause(spec: &FilterSpec) -> Option<Predicate> {
    let term = spec.search.as_deref()?.trim();
    if term.is_empty() {
        return None;
    }

    let fields: &[SearchField] = if spec.search_fields.is_empty() {
        &DEFAULT_SEARCH_FIELDS
    } else {
        &spec.search_fields
    };

    Some(Predicate::Or(
        fields
            .iter()
            .map(|f| Predicate::Contains(f.target(), term.to_string()))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn absent_term_emits_no_clause() {
        let spec = FilterSpec::new(Uuid::new_v4());
        assert_eq!(clause(&spec), None);
    }

    #[test]
    fn blank_term_emits_no_clause() {
        let mut spec = FilterSpec::new(Uuid::new_v4());
        spec.search = Some("   ".to_string());
        assert_eq!(clause(&spec), None);
    }

    #[test]
    fn default_fields_are_title_company_and_notes() {
        let mut spec = FilterSpec::new(Uuid::new_v4());
        spec.search = Some("dev".to_string());
        spec.search_fields = DEFAULT_SEARCH_FIELDS.to_vec();
        let clause = clause(&spec).unwrap();
        assert_eq!(
            clause,
            Predicate::Or(vec![
                Predicate::Contains(Field::JobTitle, "dev".to_string()),
                Predicate::Contains(Field::CompanyName, "dev".to_string()),
                Predicate::Contains(Field::PersonalNotes, "dev".to_string()),
            ])
        );
    }

    #[test]
    fn selected_fields_narrow_the_disjunction() {
        let mut spec = FilterSpec::new(Uuid::new_v4());
        spec.search = Some("Berlin".to_string());
        spec.search_fields = vec![SearchField::Location];
        let clause = clause(&spec).unwrap();
        assert_eq!(
            clause,
            Predicate::Or(vec![Predicate::Contains(
                Field::Location,
                "Berlin".to_string()
            )])
        );
    }

    #[test]
    fn catalog_parses_its_own_names() {
        for field in SEARCH_FIELD_CATALOG {
            assert_eq!(SearchField::parse(field.as_str()), Some(field));
        }
        assert_eq!(SearchField::parse("salaryMin"), None);
    }
}
