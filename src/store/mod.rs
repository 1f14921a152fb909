//! Abstract queryable store consumed by the engine.
//!
//! The engine issues read-only queries only: a compound find, a count, a
//! group-by and distinct-value scans. Two interpreters of the predicate tree
//! ship with the crate: [`memory::MemoryStore`] evaluates it in process and
//! [`condition`] lowers it to a Sea-ORM `Condition` for SQL-backed
//! implementations.

pub mod condition;
pub mod memory;

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::filtering::{Predicate, SortSpec};
use crate::models::{CompanySummary, JobApplication};

/// Field a breakdown can group on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Status,
    Priority,
}

/// Field a distinct-value facet scan can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetField {
    Status,
    JobLevel,
    EmploymentType,
    Source,
    Location,
}

/// One bucket of a group-by result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: String,
    pub count: u64,
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Rows matching the predicate, ordered and windowed.
    async fn find_many(
        &self,
        predicate: &Predicate,
        sort: &SortSpec,
        skip: u64,
        take: u64,
    ) -> Result<Vec<JobApplication>, StoreError>;

    async fn count(&self, predicate: &Predicate) -> Result<u64, StoreError>;

    async fn group_by(
        &self,
        field: GroupField,
        predicate: &Predicate,
    ) -> Result<Vec<GroupCount>, StoreError>;

    /// Distinct non-null values of `field` across matching rows.
    async fn distinct(
        &self,
        field: FacetField,
        predicate: &Predicate,
    ) -> Result<Vec<String>, StoreError>;

    /// Distinct companies referenced by matching rows, ordered by name.
    async fn distinct_companies(
        &self,
        predicate: &Predicate,
    ) -> Result<Vec<CompanySummary>, StoreError>;
}
