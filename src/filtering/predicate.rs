//! Tagged predicate tree and the `FilterSpec` compiler.
//!
//! Every filter entry compiles to exactly one node of a closed variant set,
//! combined by a single top-level `And`. The tree is immutable once built and
//! carries no I/O; stores interpret it (`store::memory` evaluates it in
//! process, `store::condition` lowers it to a Sea-ORM `Condition`).

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::search;
use super::spec::{FilterSpec, OneOrMany};

/// Filterable attribute of an application, or of its joined company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    UserId,
    Status,
    Priority,
    JobLevel,
    EmploymentType,
    CompanyId,
    JobTitle,
    CompanyName,
    Location,
    Source,
    IsRemote,
    IsFavorite,
    Currency,
    SalaryMin,
    SalaryMax,
    AppliedDate,
    ResponseDeadline,
    PersonalNotes,
    JobDescription,
    Requirements,
}

/// Literal operand of a leaf predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
}

/// Composable boolean condition over application rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// All children must hold. An empty `And` holds.
    And(Vec<Predicate>),
    /// At least one child must hold. An empty `Or` never holds.
    Or(Vec<Predicate>),
    Equals(Field, Value),
    In(Field, Vec<Value>),
    Gte(Field, Value),
    Lte(Field, Value),
    Lt(Field, Value),
    /// Substring match; case semantics belong to the store adapter.
    Contains(Field, String),
    IsNull(Field),
    IsNotNull(Field),
    /// At least one related note (`true`) or exactly zero (`false`).
    HasNotes(bool),
    /// Matches no rows. Produced by the inverted-range guard.
    Nothing,
}

impl Predicate {
    /// Ownership scoping used by every read path.
    #[must_use]
    pub fn owned_by(user_id: Uuid) -> Self {
        Self::Equals(Field::UserId, Value::Uuid(user_id))
    }
}

fn membership<T: Copy>(field: Field, entry: &OneOrMany<T>, to_value: impl Fn(T) -> Value) -> Predicate {
    match entry {
        OneOrMany::One(v) => Predicate::Equals(field, to_value(*v)),
        OneOrMany::Many(vs) => {
            Predicate::In(field, vs.iter().map(|v| to_value(*v)).collect())
        }
    }
}

/// Inverted-range guard: a well-typed but inconsistent range compiles to a
/// predicate that matches nothing, never an error.
fn has_inverted_range(spec: &FilterSpec) -> bool {
    if spec.applied_date.is_inverted() || spec.response_deadline.is_inverted() {
        return true;
    }
    matches!(
        (spec.salary_min, spec.salary_max),
        (Some(floor), Some(ceiling)) if floor > ceiling
    )
}

/// Compile a normalized spec into one predicate tree.
///
/// `now` is captured by the caller so that `isOverdue` is evaluated at a
/// single instant per request (and is injectable in tests).
#[must_use]
pub fn compile(spec: &FilterSpec, now: DateTime<Utc>) -> Predicate {
    if has_inverted_range(spec) {
        return Predicate::Nothing;
    }

    let mut clauses = vec![Predicate::owned_by(spec.user_id)];

    if let Some(entry) = &spec.status {
        clauses.push(membership(Field::Status, entry, |s| {
            Value::Str(s.as_str().to_string())
        }));
    }
    if let Some(entry) = &spec.priority {
        clauses.push(membership(Field::Priority, entry, |p| Value::Int(i64::from(p))));
    }
    if let Some(entry) = &spec.job_level {
        clauses.push(membership(Field::JobLevel, entry, |l| {
            Value::Str(l.as_str().to_string())
        }));
    }
    if let Some(entry) = &spec.employment_type {
        clauses.push(membership(Field::EmploymentType, entry, |t| {
            Value::Str(t.as_str().to_string())
        }));
    }

    if let Some(company_id) = spec.company {
        clauses.push(Predicate::Equals(Field::CompanyId, Value::Uuid(company_id)));
    }
    if let Some(location) = &spec.location {
        clauses.push(Predicate::Contains(Field::Location, location.clone()));
    }
    if let Some(source) = &spec.source {
        clauses.push(Predicate::Contains(Field::Source, source.clone()));
    }
    if let Some(remote) = spec.is_remote {
        clauses.push(Predicate::Equals(Field::IsRemote, Value::Bool(remote)));
    }
    if let Some(favorite) = spec.is_favorite {
        clauses.push(Predicate::Equals(Field::IsFavorite, Value::Bool(favorite)));
    }
    if let Some(currency) = &spec.currency {
        clauses.push(Predicate::Equals(Field::Currency, Value::Str(currency.clone())));
    }

    // Salary filters are an interval-overlap test, not containment: the
    // entity matches a floor if any part of its declared band reaches it,
    // and a ceiling if any part of its band stays under it.
    if let Some(floor) = spec.salary_min {
        clauses.push(Predicate::Or(vec![
            Predicate::Gte(Field::SalaryMin, Value::Int(floor)),
            Predicate::Gte(Field::SalaryMax, Value::Int(floor)),
        ]));
    }
    if let Some(ceiling) = spec.salary_max {
        clauses.push(Predicate::Or(vec![
            Predicate::Lte(Field::SalaryMin, Value::Int(ceiling)),
            Predicate::Lte(Field::SalaryMax, Value::Int(ceiling)),
        ]));
    }

    if let Some(from) = spec.applied_date.from {
        clauses.push(Predicate::Gte(Field::AppliedDate, Value::DateTime(from)));
    }
    if let Some(to) = spec.applied_date.to {
        clauses.push(Predicate::Lte(Field::AppliedDate, Value::DateTime(to)));
    }

    if let Some(has_notes) = spec.has_notes {
        clauses.push(Predicate::HasNotes(has_notes));
    }

    // hasDeadline owns the null/non-null axis; deadline range bounds refine
    // within non-null values and are suppressed when the axis says null.
    match spec.has_deadline {
        Some(false) => clauses.push(Predicate::IsNull(Field::ResponseDeadline)),
        Some(true) => {
            clauses.push(Predicate::IsNotNull(Field::ResponseDeadline));
            push_deadline_range(spec, &mut clauses);
        }
        None => push_deadline_range(spec, &mut clauses),
    }

    if spec.is_overdue == Some(true) {
        clauses.push(Predicate::IsNotNull(Field::ResponseDeadline));
        clauses.push(Predicate::Lt(Field::ResponseDeadline, Value::DateTime(now)));
    }

    if let Some(clause) = search::clause(spec) {
        clauses.push(clause);
    }

    Predicate::And(clauses)
}

fn push_deadline_range(spec: &FilterSpec, clauses: &mut Vec<Predicate>) {
    if let Some(from) = spec.response_deadline.from {
        clauses.push(Predicate::Gte(Field::ResponseDeadline, Value::DateTime(from)));
    }
    if let Some(to) = spec.response_deadline.to {
        clauses.push(Predicate::Lte(Field::ResponseDeadline, Value::DateTime(to)));
    }
}
