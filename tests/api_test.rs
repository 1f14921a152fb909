//! End-to-end handler tests over the in-memory store.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use jobtrack::models::{ApplicationStatus, CompanySummary, JobApplication};
use jobtrack::{AppState, CurrentUser, MemoryStore, router};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

fn seed_app(user_id: Uuid, title: &str, company_name: &str, age_days: i64) -> JobApplication {
    let created = base_time() - Duration::days(age_days);
    JobApplication {
        id: Uuid::new_v4(),
        user_id,
        status: ApplicationStatus::Applied,
        job_title: title.to_string(),
        job_level: None,
        employment_type: None,
        salary_min: None,
        salary_max: None,
        currency: "IDR".to_string(),
        location: None,
        is_remote: false,
        is_favorite: false,
        source: None,
        applied_date: created,
        response_deadline: None,
        personal_notes: None,
        job_description: None,
        requirements: None,
        priority: 2,
        company: CompanySummary {
            id: Uuid::new_v4(),
            name: company_name.to_string(),
            industry: None,
            location: None,
        },
        notes_count: 0,
        created_at: created,
        updated_at: created,
    }
}

fn test_router(rows: Vec<JobApplication>) -> Router {
    router(AppState::new(Arc::new(MemoryStore::new(rows))))
}

async fn get_as(
    app: &Router,
    user: Option<Uuid>,
    uri: &str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(user_id) = user {
        builder = builder.extension(CurrentUser(user_id));
    }
    let request = builder.body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn listed_titles(body: &Value) -> Vec<String> {
    body["data"]["jobApplications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["jobTitle"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn listing_without_identity_is_unauthorized() {
    let app = test_router(vec![]);
    let (status, body) = get_as(&app, None, "/job-applications").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], Value::Bool(false));
}

#[tokio::test]
async fn empty_filter_lists_only_the_callers_rows() {
    let me = Uuid::new_v4();
    let other = Uuid::new_v4();
    let app = test_router(vec![
        seed_app(me, "Mine", "Acme", 1),
        seed_app(other, "Theirs", "Acme", 2),
    ]);

    let (status, body) = get_as(&app, Some(me), "/job-applications").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], Value::Bool(true));
    assert_eq!(listed_titles(&body), vec!["Mine"]);
    assert_eq!(body["data"]["pagination"]["total"], 1);
}

#[tokio::test]
async fn status_list_filter_is_the_union_of_scalars() {
    let me = Uuid::new_v4();
    let mut applied = seed_app(me, "Applied", "Acme", 1);
    applied.status = ApplicationStatus::Applied;
    let mut offer = seed_app(me, "Offer", "Beta", 2);
    offer.status = ApplicationStatus::Offer;
    let mut rejected = seed_app(me, "Rejected", "Gamma", 3);
    rejected.status = ApplicationStatus::Rejected;
    let app = test_router(vec![applied, offer, rejected]);

    let (status, body) = get_as(
        &app,
        Some(me),
        "/job-applications?status=APPLIED&status=OFFER",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let mut titles = listed_titles(&body);
    titles.sort();
    assert_eq!(titles, vec!["Applied", "Offer"]);
}

#[tokio::test]
async fn salary_filters_use_partial_overlap() {
    let me = Uuid::new_v4();
    let mut row = seed_app(me, "Banded", "Acme", 1);
    row.salary_min = Some(8_000_000);
    row.salary_max = Some(12_000_000);
    let app = test_router(vec![row]);

    // the band's upper bound reaches the floor
    let (_, body) = get_as(&app, Some(me), "/job-applications?salaryMin=10000000").await;
    assert_eq!(listed_titles(&body), vec!["Banded"]);

    // the band's lower bound is under the ceiling
    let (_, body) = get_as(&app, Some(me), "/job-applications?salaryMax=9000000").await;
    assert_eq!(listed_titles(&body), vec!["Banded"]);

    // the whole band is below the floor
    let (_, body) = get_as(&app, Some(me), "/job-applications?salaryMin=20000000").await;
    assert!(listed_titles(&body).is_empty());
}

#[tokio::test]
async fn pagination_metadata_matches_the_window() {
    let me = Uuid::new_v4();
    let rows: Vec<JobApplication> = (0..25)
        .map(|i| seed_app(me, &format!("Job {i:02}"), "Acme", i))
        .collect();
    let app = test_router(rows);

    let (status, body) = get_as(&app, Some(me), "/job-applications?page=3&limit=10").await;
    assert_eq!(status, StatusCode::OK);
    let pagination = &body["data"]["pagination"];
    assert_eq!(pagination["page"], 3);
    assert_eq!(pagination["limit"], 10);
    assert_eq!(pagination["total"], 25);
    assert_eq!(pagination["pages"], 3);
    assert_eq!(body["data"]["jobApplications"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn invalid_parameters_are_reported_together() {
    let me = Uuid::new_v4();
    let app = test_router(vec![seed_app(me, "A", "Acme", 1)]);

    let (status, body) = get_as(
        &app,
        Some(me),
        "/job-applications?status=GHOSTED&sortBy=bogus&limit=many",
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], Value::Bool(false));
    let details: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d.as_str().unwrap())
        .collect();
    assert!(details.iter().any(|d| d.starts_with("status:")));
    assert!(details.iter().any(|d| d.starts_with("sortBy:")));
    assert!(details.iter().any(|d| d.starts_with("limit:")));
}

#[tokio::test]
async fn search_defaults_to_title_company_and_notes() {
    let me = Uuid::new_v4();
    let title_hit = seed_app(me, "Senior dev", "Acme", 1);
    let company_hit = seed_app(me, "Backend Engineer", "devhouse", 2);
    let mut notes_hit = seed_app(me, "Data Analyst", "Beta", 3);
    notes_hit.personal_notes = Some("talked to a dev there".to_string());
    let mut description_only = seed_app(me, "PM", "Gamma", 4);
    description_only.job_description = Some("dev adjacent".to_string());
    let app = test_router(vec![title_hit, company_hit, notes_hit, description_only]);

    let (_, body) = get_as(&app, Some(me), "/job-applications?search=dev").await;
    let mut titles = listed_titles(&body);
    titles.sort();
    assert_eq!(titles, vec!["Backend Engineer", "Data Analyst", "Senior dev"]);
}

#[tokio::test]
async fn company_name_sort_uses_the_joined_name() {
    let me = Uuid::new_v4();
    let app = test_router(vec![
        seed_app(me, "1", "Zenith", 1),
        seed_app(me, "2", "Acme", 2),
        seed_app(me, "3", "Midway", 3),
    ]);

    let (_, body) = get_as(
        &app,
        Some(me),
        "/job-applications?sortBy=companyName&sortOrder=asc",
    )
    .await;
    let companies: Vec<&str> = body["data"]["jobApplications"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["company"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(companies, vec!["Acme", "Midway", "Zenith"]);
}

#[tokio::test]
async fn inverted_date_range_yields_an_empty_page_not_an_error() {
    let me = Uuid::new_v4();
    let app = test_router(vec![seed_app(me, "A", "Acme", 1)]);

    let (status, body) = get_as(
        &app,
        Some(me),
        "/job-applications?appliedDateFrom=2024-05-01&appliedDateTo=2024-04-01",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed_titles(&body).is_empty());
    assert_eq!(body["data"]["pagination"]["total"], 0);
}

#[tokio::test]
async fn facets_never_leak_another_users_values() {
    let me = Uuid::new_v4();
    let other = Uuid::new_v4();
    let mut mine = seed_app(me, "A", "Acme", 1);
    mine.source = Some("LinkedIn".to_string());
    let mut theirs = seed_app(other, "B", "Beta", 2);
    theirs.source = Some("Referral".to_string());
    let app = test_router(vec![mine, theirs]);

    let (status, body) = get_as(&app, Some(me), "/job-applications/filter-options").await;
    assert_eq!(status, StatusCode::OK);
    let sources: Vec<&str> = body["data"]["sources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap())
        .collect();
    assert_eq!(sources, vec!["LinkedIn"]);
    let companies: Vec<&str> = body["data"]["companies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(companies, vec!["Acme"]);
}

#[tokio::test]
async fn filter_options_carry_the_static_catalogs() {
    let me = Uuid::new_v4();
    let app = test_router(vec![]);

    let (_, body) = get_as(&app, Some(me), "/job-applications/filter-options").await;
    let priorities = body["data"]["priorities"].as_array().unwrap();
    assert_eq!(priorities[0]["label"], "High");
    assert_eq!(priorities[2]["value"], 3);
    assert!(
        body["data"]["currencies"]
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c == "IDR")
    );
    let search_fields = body["data"]["searchFields"].as_array().unwrap();
    assert_eq!(search_fields[0], "jobTitle");
    assert_eq!(search_fields.len(), 6);
}

#[tokio::test]
async fn disabled_facet_category_is_omitted() {
    let me = Uuid::new_v4();
    let app = test_router(vec![]);

    let (_, body) = get_as(
        &app,
        Some(me),
        "/job-applications/filter-options?includeSources=false",
    )
    .await;
    assert!(body["data"].get("sources").is_none());
    assert!(body["data"].get("statuses").is_some());
}

#[tokio::test]
async fn stats_derive_the_success_rate() {
    let me = Uuid::new_v4();
    let mut offer = seed_app(me, "Offer", "Acme", 1);
    offer.status = ApplicationStatus::Offer;
    let mut accepted = seed_app(me, "Accepted", "Beta", 2);
    accepted.status = ApplicationStatus::Accepted;
    accepted.priority = 1;
    let rejected = {
        let mut row = seed_app(me, "Rejected", "Gamma", 3);
        row.status = ApplicationStatus::Rejected;
        row
    };
    let applied = seed_app(me, "Applied", "Delta", 4);
    let app = test_router(vec![offer, accepted, rejected, applied]);

    let (status, body) = get_as(&app, Some(me), "/job-applications/stats").await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["totalApplications"], 4);
    assert_eq!(data["successRate"], 50.0);
    assert_eq!(data["statusBreakdown"]["OFFER"], 1);
    assert_eq!(data["priorityBreakdown"]["High"], 1);
    assert_eq!(data["priorityBreakdown"]["Medium"], 3);
    // newest first
    let recent = data["recentApplications"].as_array().unwrap();
    assert_eq!(recent[0]["jobTitle"], "Offer");
    assert_eq!(recent[0]["company"]["name"].as_str().unwrap(), "Acme");
}

#[tokio::test]
async fn stats_for_an_empty_account_are_zeroed() {
    let me = Uuid::new_v4();
    let app = test_router(vec![]);

    let (_, body) = get_as(&app, Some(me), "/job-applications/stats").await;
    assert_eq!(body["data"]["totalApplications"], 0);
    assert_eq!(body["data"]["successRate"], 0.0);
}
