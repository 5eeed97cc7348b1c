use crate::common;
use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{Days, NaiveDate};
use milestones::db::models::status::Status;
use milestones::milestones::today;

fn days_from_today(days: i64) -> NaiveDate {
    let today = today();
    if days >= 0 {
        today.checked_add_days(Days::new(days.unsigned_abs())).unwrap()
    } else {
        today.checked_sub_days(Days::new(days.unsigned_abs())).unwrap()
    }
}

fn expand_request(username: &str, document: &str) -> actix_http::Request {
    test::TestRequest::post()
        .uri("/milestones/expand/")
        .insert_header((common::REMOTE_USER, username))
        .set_payload(document.to_owned())
        .to_request()
}

#[actix_web::test]
async fn test_expand_when_days_qualifier_expect_only_window_and_no_past_informational() {
    let (db, seed) = common::initialize_seeded_db().await;
    let a = seed.article_id;
    common::add_milestone(&db, a, seed.ada, "Soon active", Status::Active, days_from_today(2), None).await;
    common::add_milestone(&db, a, seed.ada, "Edge of window", Status::Pending, days_from_today(5), None).await;
    common::add_milestone(&db, a, seed.ada, "Too far", Status::Active, days_from_today(6), None).await;
    common::add_milestone(&db, a, seed.ada, "Old news", Status::Informational, days_from_today(-1), None).await;
    common::add_milestone(&db, a, seed.ada, "Heads up", Status::Informational, days_from_today(1), None).await;
    common::add_milestone(&db, a, seed.ada, "Called off", Status::Cancelled, days_from_today(1), None).await;
    common::add_milestone(&db, a, seed.ada, "All done", Status::Completed, days_from_today(1), None).await;
    common::add_milestone(&db, a, seed.ada, "Overdue", Status::Active, days_from_today(-3), None).await;
    let app = common::initialize_app(&db).await;

    let resp = test::call_service(&app, expand_request("ada", "Intro\n[milestones days:5]\nOutro")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let actual = common::body_text(resp).await;

    assert!(actual.starts_with("Intro\n"));
    assert!(actual.ends_with("\nOutro"));
    assert!(!actual.contains("[milestones"));
    for shown in ["Soon active", "Edge of window", "Heads up", "Overdue"] {
        assert!(actual.contains(shown), "{shown} missing from {actual}");
    }
    for hidden in ["Too far", "Old news", "Called off", "All done"] {
        assert!(!actual.contains(hidden), "{hidden} shown in {actual}");
    }
    assert!(actual.contains("danger"));
}

#[actix_web::test]
async fn test_expand_when_owner_qualifier_expect_only_that_owner() {
    let (db, seed) = common::initialize_seeded_db().await;
    let a = seed.article_id;
    common::add_milestone(&db, a, seed.ada, "Ada's", Status::Active, days_from_today(1), None).await;
    common::add_milestone(&db, a, seed.grace, "Grace's", Status::Active, days_from_today(1), None).await;
    let app = common::initialize_app(&db).await;

    let resp = test::call_service(&app, expand_request("ada", "See: [milestones owner:grace] (owner view)")).await;
    let actual = common::body_text(resp).await;
    assert!(actual.starts_with("See: <table"));
    assert!(actual.ends_with(" (owner view)"));
    assert!(actual.contains("Grace&#x27;s"));
    assert!(!actual.contains("Ada&#x27;s"));
}

#[actix_web::test]
async fn test_expand_when_invalid_date_expect_error_fragment_and_other_lines_kept() {
    let (db, _seed) = common::initialize_seeded_db().await;
    let app = common::initialize_app(&db).await;

    let resp = test::call_service(
        &app,
        expand_request("ada", "[milestones start_date:someday]\nplain line"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let actual = common::body_text(resp).await;
    assert!(actual.contains("milestones-error"));
    assert!(actual.contains("someday"));
    assert!(actual.ends_with("\nplain line"));
}

#[actix_web::test]
async fn test_expand_when_no_directive_expect_document_unchanged() {
    let (db, _seed) = common::initialize_seeded_db().await;
    let app = common::initialize_app(&db).await;
    let document = "# Heading\n\nJust [a link](milestones) here.";
    let resp = test::call_service(&app, expand_request("ada", document)).await;
    let actual = common::body_text(resp).await;
    assert_eq!(actual, document);
}
