//! Facet aggregation for the filter-options endpoint.
//!
//! Distinct-value scans are always scoped by the ownership predicate so one
//! user's facets never leak another user's data. The three static
//! enumerations (priorities, currencies, search fields) come from fixed
//! catalogs, not from stored rows.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{StoreError, ValidationError};
use crate::filtering::search::SEARCH_FIELD_CATALOG;
use crate::filtering::{Predicate, RawParams};
use crate::models::{CompanySummary, priority_label};
use crate::store::{ApplicationStore, FacetField};

/// Fixed currency catalog offered by the UI.
pub const CURRENCIES: [&str; 7] = ["IDR", "USD", "SGD", "EUR", "GBP", "JPY", "AUD"];

/// Which facet categories the caller wants computed. Everything defaults on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetToggles {
    pub companies: bool,
    pub statuses: bool,
    pub job_levels: bool,
    pub employment_types: bool,
    pub sources: bool,
    pub locations: bool,
}

impl Default for FacetToggles {
    fn default() -> Self {
        Self {
            companies: true,
            statuses: true,
            job_levels: true,
            employment_types: true,
            sources: true,
            locations: true,
        }
    }
}

impl FacetToggles {
    /// Parse `include<Category>` query parameters; absent means on.
    pub fn from_raw(params: &RawParams<'_>) -> Result<Self, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut toggle = |key: &str| match params.first(key) {
            None => true,
            Some("true") => true,
            Some("false") => false,
            Some(other) => {
                errors.push(ValidationError::new(
                    key,
                    format!("must be 'true' or 'false', got '{other}'"),
                ));
                true
            }
        };

        let toggles = Self {
            companies: toggle("includeCompanies"),
            statuses: toggle("includeStatuses"),
            job_levels: toggle("includeJobLevels"),
            employment_types: toggle("includeEmploymentTypes"),
            sources: toggle("includeSources"),
            locations: toggle("includeLocations"),
        };

        if errors.is_empty() {
            Ok(toggles)
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PriorityOption {
    pub value: i16,
    pub label: &'static str,
}

/// Payload of `GET /job-applications/filter-options`. Categories the caller
/// toggled off are omitted rather than sent empty.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptionsData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companies: Option<Vec<CompanySummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_levels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
    pub priorities: Vec<PriorityOption>,
    pub currencies: Vec<&'static str>,
    pub search_fields: Vec<&'static str>,
}

#[must_use]
pub fn priority_options() -> Vec<PriorityOption> {
    (1..=3)
        .map(|value| PriorityOption {
            value,
            label: priority_label(value),
        })
        .collect()
}

/// Compute the requested facet categories for one user.
pub async fn filter_options(
    store: &dyn ApplicationStore,
    user_id: Uuid,
    toggles: FacetToggles,
) -> Result<FilterOptionsData, StoreError> {
    let scope = Predicate::owned_by(user_id);

    let companies = if toggles.companies {
        Some(store.distinct_companies(&scope).await?)
    } else {
        None
    };
    let statuses = if toggles.statuses {
        Some(store.distinct(FacetField::Status, &scope).await?)
    } else {
        None
    };
    let job_levels = if toggles.job_levels {
        Some(store.distinct(FacetField::JobLevel, &scope).await?)
    } else {
        None
    };
    let employment_types = if toggles.employment_types {
        Some(store.distinct(FacetField::EmploymentType, &scope).await?)
    } else {
        None
    };
    let sources = if toggles.sources {
        Some(store.distinct(FacetField::Source, &scope).await?)
    } else {
        None
    };
    let locations = if toggles.locations {
        Some(store.distinct(FacetField::Location, &scope).await?)
    } else {
        None
    };

    Ok(FilterOptionsData {
        companies,
        statuses,
        job_levels,
        employment_types,
        sources,
        locations,
        priorities: priority_options(),
        currencies: CURRENCIES.to_vec(),
        search_fields: SEARCH_FIELD_CATALOG.iter().map(|f| f.as_str()).collect(),
    })
}
