//! FilterSpec normalizer: raw query pairs in, a typed and validated
//! specification out.
//!
//! Recognized keys are coerced strictly (unknown enum literal, non-numeric
//! number, bad boolean, unparsable date and malformed UUID are all
//! validation errors); unknown keys are ignored for forward compatibility.
//! Every offending field is accumulated so the caller sees them all at once.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::search::{DEFAULT_SEARCH_FIELDS, SearchField};
use crate::errors::ValidationError;
use crate::models::{
    ApplicationStatus, EmploymentType, JobLevel, PRIORITY_MAX, PRIORITY_MIN,
};

/// Scalar-vs-list duality of a membership filter. A scalar compiles to
/// equality, a list to `IN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

/// Inclusive bounds of a date filter; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }
}

/// Normalized, request-scoped filter specification. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    /// Always injected from the authenticated identity, never client input.
    pub user_id: Uuid,
    pub status: Option<OneOrMany<ApplicationStatus>>,
    pub priority: Option<OneOrMany<i16>>,
    pub job_level: Option<OneOrMany<JobLevel>>,
    pub employment_type: Option<OneOrMany<EmploymentType>>,
    pub company: Option<Uuid>,
    pub location: Option<String>,
    pub source: Option<String>,
    pub is_remote: Option<bool>,
    pub is_favorite: Option<bool>,
    pub has_notes: Option<bool>,
    pub has_deadline: Option<bool>,
    pub is_overdue: Option<bool>,
    pub currency: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub applied_date: DateRange,
    pub response_deadline: DateRange,
    pub search: Option<String>,
    pub search_fields: Vec<SearchField>,
}

impl FilterSpec {
    /// A spec with no filters set beyond the ownership scope.
    #[must_use]
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            status: None,
            priority: None,
            job_level: None,
            employment_type: None,
            company: None,
            location: None,
            source: None,
            is_remote: None,
            is_favorite: None,
            has_notes: None,
            has_deadline: None,
            is_overdue: None,
            currency: None,
            salary_min: None,
            salary_max: None,
            applied_date: DateRange::default(),
            response_deadline: DateRange::default(),
            search: None,
            search_fields: DEFAULT_SEARCH_FIELDS.to_vec(),
        }
    }
}

/// View over raw query pairs that keeps repeated keys addressable.
#[derive(Debug, Clone, Copy)]
pub struct RawParams<'a> {
    pairs: &'a [(String, String)],
}

impl<'a> RawParams<'a> {
    #[must_use]
    pub fn new(pairs: &'a [(String, String)]) -> Self {
        Self { pairs }
    }

    /// First occurrence of a scalar key.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&'a str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All occurrences of a list-capable key, comma-separated values
    /// flattened, blanks dropped.
    #[must_use]
    pub fn list(&self, key: &str) -> Vec<&'a str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .flat_map(|(_, v)| v.split(','))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect()
    }
}

struct Normalizer<'a> {
    params: RawParams<'a>,
    errors: Vec<ValidationError>,
}

impl<'a> Normalizer<'a> {
    fn enum_list<T: Copy>(
        &mut self,
        key: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<OneOrMany<T>> {
        let raw = self.params.list(key);
        if raw.is_empty() {
            return None;
        }
        let mut parsed = Vec::with_capacity(raw.len());
        for value in &raw {
            match parse(value) {
                Some(v) => parsed.push(v),
                None => self
                    .errors
                    .push(ValidationError::new(key, format!("unknown value '{value}'"))),
            }
        }
        match (parsed.len(), raw.len()) {
            (1, 1) => Some(OneOrMany::One(parsed[0])),
            (n, m) if n == m => Some(OneOrMany::Many(parsed)),
            _ => None, // at least one literal failed; already reported
        }
    }

    fn boolean(&mut self, key: &str) -> Option<bool> {
        match self.params.first(key)? {
            "true" => Some(true),
            "false" => Some(false),
            other => {
                self.errors.push(ValidationError::new(
                    key,
                    format!("must be 'true' or 'false', got '{other}'"),
                ));
                None
            }
        }
    }

    fn integer(&mut self, key: &str) -> Option<i64> {
        let raw = self.params.first(key)?;
        match raw.trim().parse::<i64>() {
            Ok(n) => Some(n),
            Err(_) => {
                self.errors
                    .push(ValidationError::new(key, format!("must be a number, got '{raw}'")));
                None
            }
        }
    }

    fn instant(&mut self, key: &str) -> Option<DateTime<Utc>> {
        let raw = self.params.first(key)?;
        match parse_instant(raw) {
            Some(instant) => Some(instant),
            None => {
                self.errors.push(ValidationError::new(
                    key,
                    format!("must be an ISO-8601 date, got '{raw}'"),
                ));
                None
            }
        }
    }

    fn uuid(&mut self, key: &str) -> Option<Uuid> {
        let raw = self.params.first(key)?;
        match Uuid::parse_str(raw.trim()) {
            Ok(id) => Some(id),
            Err(_) => {
                self.errors
                    .push(ValidationError::new(key, format!("must be a UUID, got '{raw}'")));
                None
            }
        }
    }

    fn text(&mut self, key: &str) -> Option<String> {
        let raw = self.params.first(key)?.trim();
        if raw.is_empty() {
            None
        } else {
            Some(raw.to_string())
        }
    }

    fn priority_entry(&mut self, key: &str) -> Option<OneOrMany<i16>> {
        self.enum_list(key, |raw| {
            raw.parse::<i16>()
                .ok()
                .filter(|p| (PRIORITY_MIN..=PRIORITY_MAX).contains(p))
        })
    }

    fn search_fields(&mut self) -> Vec<SearchField> {
        let raw = self.params.list("searchFields");
        if raw.is_empty() {
            return DEFAULT_SEARCH_FIELDS.to_vec();
        }
        let mut fields = Vec::with_capacity(raw.len());
        for value in raw {
            match SearchField::parse(value) {
                Some(f) => {
                    if !fields.contains(&f) {
                        fields.push(f);
                    }
                }
                None => self.errors.push(ValidationError::new(
                    "searchFields",
                    format!("unknown value '{value}'"),
                )),
            }
        }
        if fields.is_empty() {
            DEFAULT_SEARCH_FIELDS.to_vec()
        } else {
            fields
        }
    }
}

/// RFC 3339 instant, or a bare `YYYY-MM-DD` taken as midnight UTC.
fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Normalize raw query pairs into a [`FilterSpec`] for the given user.
///
/// Returns every offending field at once; a spec is only produced when all
/// recognized keys coerced cleanly.
pub fn normalize(
    user_id: Uuid,
    pairs: &[(String, String)],
) -> Result<FilterSpec, Vec<ValidationError>> {
    let mut n = Normalizer {
        params: RawParams::new(pairs),
        errors: Vec::new(),
    };

    let spec = FilterSpec {
        user_id,
        status: n.enum_list("status", ApplicationStatus::parse),
        priority: n.priority_entry("priority"),
        job_level: n.enum_list("jobLevel", JobLevel::parse),
        employment_type: n.enum_list("employmentType", EmploymentType::parse),
        company: n.uuid("company"),
        location: n.text("location"),
        source: n.text("source"),
        is_remote: n.boolean("isRemote"),
        is_favorite: n.boolean("isFavorite"),
        has_notes: n.boolean("hasNotes"),
        has_deadline: n.boolean("hasDeadline"),
        is_overdue: n.boolean("isOverdue"),
        currency: n.text("currency"),
        salary_min: n.integer("salaryMin"),
        salary_max: n.integer("salaryMax"),
        applied_date: DateRange {
            from: n.instant("appliedDateFrom"),
            to: n.instant("appliedDateTo"),
        },
        response_deadline: DateRange {
            from: n.instant("responseDeadlineFrom"),
            to: n.instant("responseDeadlineTo"),
        },
        search: n.text("search"),
        search_fields: n.search_fields(),
    };

    if n.errors.is_empty() {
        Ok(spec)
    } else {
        Err(n.errors)
    }
}
