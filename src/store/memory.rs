//! In-memory [`ApplicationStore`] with full predicate evaluation.
//!
//! This is the reference interpretation of the predicate tree: SQL adapters
//! must match its semantics. Substring matches are case-sensitive here;
//! SQL backends may differ (see [`super::condition`]). Sorting is stable,
//! nulls ordered after values in ascending order.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;

use super::{ApplicationStore, FacetField, GroupCount, GroupField};
use crate::errors::StoreError;
use crate::filtering::{Direction, Field, Predicate, SortSpec, SortTarget, Value};
use crate::models::{CompanySummary, JobApplication};

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    rows: Vec<JobApplication>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(rows: Vec<JobApplication>) -> Self {
        Self { rows }
    }

    fn matching(&self, predicate: &Predicate) -> Vec<&JobApplication> {
        self.rows.iter().filter(|row| eval(row, predicate)).collect()
    }
}

fn field_value(row: &JobApplication, field: Field) -> Option<Value> {
    match field {
        Field::UserId => Some(Value::Uuid(row.user_id)),
        Field::Status => Some(Value::Str(row.status.as_str().to_string())),
        Field::Priority => Some(Value::Int(i64::from(row.priority))),
        Field::JobLevel => row.job_level.map(|l| Value::Str(l.as_str().to_string())),
        Field::EmploymentType => row
            .employment_type
            .map(|t| Value::Str(t.as_str().to_string())),
        Field::CompanyId => Some(Value::Uuid(row.company.id)),
        Field::JobTitle => Some(Value::Str(row.job_title.clone())),
        Field::CompanyName => Some(Value::Str(row.company.name.clone())),
        Field::Location => row.location.clone().map(Value::Str),
        Field::Source => row.source.clone().map(Value::Str),
        Field::IsRemote => Some(Value::Bool(row.is_remote)),
        Field::IsFavorite => Some(Value::Bool(row.is_favorite)),
        Field::Currency => Some(Value::Str(row.currency.clone())),
        Field::SalaryMin => row.salary_min.map(Value::Int),
        Field::SalaryMax => row.salary_max.map(Value::Int),
        Field::AppliedDate => Some(Value::DateTime(row.applied_date)),
        Field::ResponseDeadline => row.response_deadline.map(Value::DateTime),
        Field::PersonalNotes => row.personal_notes.clone().map(Value::Str),
        Field::JobDescription => row.job_description.clone().map(Value::Str),
        Field::Requirements => row.requirements.clone().map(Value::Str),
    }
}

fn cmp_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => Some(x.cmp(y)),
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Uuid(x), Value::Uuid(y)) => Some(x.cmp(y)),
        (Value::DateTime(x), Value::DateTime(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn compare(row: &JobApplication, field: Field, operand: &Value) -> Option<Ordering> {
    let value = field_value(row, field)?;
    cmp_values(&value, operand)
}

/// Evaluate a predicate against one row. Null fields fail every comparison,
/// matching SQL three-valued logic collapsed to false.
fn eval(row: &JobApplication, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::And(children) => children.iter().all(|c| eval(row, c)),
        Predicate::Or(children) => children.iter().any(|c| eval(row, c)),
        Predicate::Equals(field, operand) => {
            compare(row, *field, operand) == Some(Ordering::Equal)
        }
        Predicate::In(field, operands) => field_value(row, *field)
            .is_some_and(|value| operands.contains(&value)),
        Predicate::Gte(field, operand) => matches!(
            compare(row, *field, operand),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Predicate::Lte(field, operand) => matches!(
            compare(row, *field, operand),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Predicate::Lt(field, operand) => {
            compare(row, *field, operand) == Some(Ordering::Less)
        }
        Predicate::Contains(field, needle) => match field_value(row, *field) {
            Some(Value::Str(haystack)) => haystack.contains(needle),
            _ => false,
        },
        Predicate::IsNull(field) => field_value(row, *field).is_none(),
        Predicate::IsNotNull(field) => field_value(row, *field).is_some(),
        Predicate::HasNotes(wanted) => (row.notes_count > 0) == *wanted,
        Predicate::Nothing => false,
    }
}

fn sort_value(row: &JobApplication, target: &SortTarget) -> Option<Value> {
    match target {
        SortTarget::Own(column) => match *column {
            "created_at" => Some(Value::DateTime(row.created_at)),
            "updated_at" => Some(Value::DateTime(row.updated_at)),
            "applied_date" => Some(Value::DateTime(row.applied_date)),
            "response_deadline" => row.response_deadline.map(Value::DateTime),
            "job_title" => Some(Value::Str(row.job_title.clone())),
            "status" => Some(Value::Str(row.status.as_str().to_string())),
            "priority" => Some(Value::Int(i64::from(row.priority))),
            "salary_min" => row.salary_min.map(Value::Int),
            "salary_max" => row.salary_max.map(Value::Int),
            "is_favorite" => Some(Value::Bool(row.is_favorite)),
            _ => None,
        },
        SortTarget::Joined { relation, column } => {
            if *relation == "company" && *column == "name" {
                Some(Value::Str(row.company.name.clone()))
            } else {
                None
            }
        }
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn find_many(
        &self,
        predicate: &Predicate,
        sort: &SortSpec,
        skip: u64,
        take: u64,
    ) -> Result<Vec<JobApplication>, StoreError> {
        let mut rows: Vec<&JobApplication> = self.matching(predicate);
        rows.sort_by(|a, b| {
            let ordering = match (sort_value(a, &sort.target), sort_value(b, &sort.target)) {
                (Some(x), Some(y)) => cmp_values(&x, &y).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            match sort.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        });

        Ok(rows
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(take).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count(&self, predicate: &Predicate) -> Result<u64, StoreError> {
        Ok(self.matching(predicate).len() as u64)
    }

    async fn group_by(
        &self,
        field: GroupField,
        predicate: &Predicate,
    ) -> Result<Vec<GroupCount>, StoreError> {
        let mut buckets: BTreeMap<String, u64> = BTreeMap::new();
        for row in self.matching(predicate) {
            let key = match field {
                GroupField::Status => row.status.as_str().to_string(),
                GroupField::Priority => row.priority.to_string(),
            };
            *buckets.entry(key).or_insert(0) += 1;
        }
        Ok(buckets
            .into_iter()
            .map(|(key, count)| GroupCount { key, count })
            .collect())
    }

    async fn distinct(
        &self,
        field: FacetField,
        predicate: &Predicate,
    ) -> Result<Vec<String>, StoreError> {
        let mut values = BTreeSet::new();
        for row in self.matching(predicate) {
            let value = match field {
                FacetField::Status => Some(row.status.as_str().to_string()),
                FacetField::JobLevel => row.job_level.map(|l| l.as_str().to_string()),
                FacetField::EmploymentType => {
                    row.employment_type.map(|t| t.as_str().to_string())
                }
                FacetField::Source => row.source.clone(),
                FacetField::Location => row.location.clone(),
            };
            if let Some(value) = value
                && !value.is_empty()
            {
                values.insert(value);
            }
        }
        Ok(values.into_iter().collect())
    }

    async fn distinct_companies(
        &self,
        predicate: &Predicate,
    ) -> Result<Vec<CompanySummary>, StoreError> {
        let mut companies: BTreeMap<(String, uuid::Uuid), CompanySummary> = BTreeMap::new();
        for row in self.matching(predicate) {
            companies
                .entry((row.company.name.clone(), row.company.id))
                .or_insert_with(|| row.company.clone());
        }
        Ok(companies.into_values().collect())
    }
}
