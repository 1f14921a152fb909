//! Dashboard statistics: totals, breakdowns, recent applications and the
//! derived success rate.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::filtering::{Predicate, SortSpec};
use crate::models::{ApplicationStatus, JobApplication, priority_label};
use crate::store::{ApplicationStore, GroupField};

const RECENT_LIMIT: u64 = 5;

/// Minimal company projection for the recent-applications list.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentApplication {
    pub id: Uuid,
    pub job_title: String,
    pub status: ApplicationStatus,
    pub applied_date: DateTime<Utc>,
    pub company: CompanyRef,
}

impl From<JobApplication> for RecentApplication {
    fn from(row: JobApplication) -> Self {
        Self {
            id: row.id,
            job_title: row.job_title,
            status: row.status,
            applied_date: row.applied_date,
            company: CompanyRef {
                id: row.company.id,
                name: row.company.name,
            },
        }
    }
}

/// Payload of `GET /job-applications/stats`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsData {
    pub total_applications: u64,
    pub status_breakdown: BTreeMap<String, u64>,
    pub priority_breakdown: BTreeMap<String, u64>,
    pub recent_applications: Vec<RecentApplication>,
    pub success_rate: f64,
}

/// Offers plus acceptances over the total, as a percentage rounded to two
/// decimals. Zero totals short-circuit to 0 rather than dividing.
#[must_use]
pub fn success_rate(total: u64, offers: u64, accepted: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let ratio = (offers + accepted) as f64 / total as f64;
    (ratio * 100.0 * 100.0).round() / 100.0
}

/// Compute the stats payload for one user.
pub async fn stats(
    store: &dyn ApplicationStore,
    user_id: Uuid,
) -> Result<StatsData, StoreError> {
    let scope = Predicate::owned_by(user_id);

    let total = store.count(&scope).await?;

    let status_breakdown: BTreeMap<String, u64> = store
        .group_by(GroupField::Status, &scope)
        .await?
        .into_iter()
        .map(|bucket| (bucket.key, bucket.count))
        .collect();

    // Priority buckets come back keyed 1..=3; the payload uses the labels.
    let mut priority_breakdown: BTreeMap<String, u64> = BTreeMap::new();
    for bucket in store.group_by(GroupField::Priority, &scope).await? {
        let label = match bucket.key.parse::<i16>() {
            Ok(priority) => priority_label(priority).to_string(),
            Err(_) => bucket.key,
        };
        *priority_breakdown.entry(label).or_insert(0) += bucket.count;
    }

    let recent_applications: Vec<RecentApplication> = store
        .find_many(&scope, &SortSpec::newest_first(), 0, RECENT_LIMIT)
        .await?
        .into_iter()
        .map(RecentApplication::from)
        .collect();

    let offers = status_breakdown
        .get(ApplicationStatus::Offer.as_str())
        .copied()
        .unwrap_or(0);
    let accepted = status_breakdown
        .get(ApplicationStatus::Accepted.as_str())
        .copied()
        .unwrap_or(0);

    Ok(StatsData {
        total_applications: total,
        status_breakdown,
        priority_breakdown,
        recent_applications,
        success_rate: success_rate(total, offers, accepted),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_total_is_an_explicit_zero() {
        assert_eq!(success_rate(0, 0, 0), 0.0);
    }

    #[test]
    fn one_offer_one_acceptance_of_four_is_fifty() {
        assert_eq!(success_rate(4, 1, 1), 50.0);
    }

    #[test]
    fn rate_rounds_to_two_decimals() {
        // 1 of 3 = 33.333.. -> 33.33
        assert_eq!(success_rate(3, 1, 0), 33.33);
        // 2 of 3 = 66.666.. -> 66.67
        assert_eq!(success_rate(3, 1, 1), 66.67);
    }
}
