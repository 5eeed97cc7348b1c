use crate::common::{self, date};
use actix_web::http::StatusCode;
use actix_web::test;
use chrono::NaiveTime;
use milestones::db::models::status::Status;
use milestones::milestones::colors::PALETTE;
use serde_json::Value;

/// 2024-03-01T00:00:00Z
const MARCH_START: &str = "1709251200";
/// 2024-03-31T00:00:00Z
const MARCH_END: &str = "1711843200.5";

#[actix_web::test]
async fn test_events_when_cancelled_and_deleted_expect_excluded() {
    let (db, seed) = common::initialize_seeded_db().await;
    common::add_milestone(&db, seed.article_id, seed.ada, "Kick-off", Status::Active, date(2024, 3, 5), NaiveTime::from_hms_opt(10, 0, 0)).await;
    common::add_milestone(&db, seed.article_id, seed.ada, "Called off", Status::Cancelled, date(2024, 3, 6), None).await;
    let gone = common::add_milestone(&db, seed.article_id, seed.grace, "Removed", Status::Active, date(2024, 3, 7), None).await;
    common::soft_delete(&db, &[gone]).await;
    common::add_milestone(&db, seed.article_id, seed.grace, "Next month", Status::Active, date(2024, 4, 20), None).await;
    common::add_milestone(&db, seed.article_id, seed.grace, "Wrap-up", Status::Completed, date(2024, 3, 31), None).await;
    let app = common::initialize_app(&db).await;

    let uri = format!("/milestones/calendar/json/?start={MARCH_START}&end={MARCH_END}");
    let resp = test::call_service(&app, common::get_as(&uri, "ada")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let actual: Value = serde_json::from_str(&common::body_text(resp).await).unwrap();
    let events = actual.as_array().unwrap();
    let titles: Vec<&str> = events
        .iter()
        .map(|event| event["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Kick-off", "Wrap-up"]);

    let kick_off = &events[0];
    assert_eq!(kick_off["start"], "2024-03-05T10:00:00");
    assert_eq!(kick_off["allDay"], false);
    assert_eq!(kick_off["color"], PALETTE[35]);
    assert_eq!(kick_off["owner"], "Ada Lovelace");
    assert_eq!(kick_off["article"], "Engine notes");
    let wrap_up = &events[1];
    assert_eq!(wrap_up["start"], "2024-03-31");
    assert_eq!(wrap_up["allDay"], true);
    assert_eq!(wrap_up["color"], PALETTE[34]);
    assert_eq!(wrap_up["statusLabel"], "Completed");
}

#[actix_web::test]
async fn test_events_when_article_filter_expect_only_that_article() {
    let (db, seed) = common::initialize_seeded_db().await;
    common::add_milestone(&db, seed.article_id, seed.ada, "Here", Status::Active, date(2024, 3, 5), None).await;
    let app = common::initialize_app(&db).await;

    let uri = format!(
        "/milestones/calendar/json/?start={MARCH_START}&end={MARCH_END}&apk={}",
        seed.bare_article_id
    );
    let resp = test::call_service(&app, common::get_as(&uri, "ada")).await;
    let actual: Value = serde_json::from_str(&common::body_text(resp).await).unwrap();
    assert_eq!(actual, Value::Array(vec![]));
}

#[actix_web::test]
async fn test_events_when_no_window_expect_empty_list() {
    let (db, seed) = common::initialize_seeded_db().await;
    common::add_milestone(&db, seed.article_id, seed.ada, "Here", Status::Active, date(2024, 3, 5), None).await;
    let app = common::initialize_app(&db).await;
    let resp = test::call_service(&app, common::get_as("/milestones/calendar/json/?apk=", "ada")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let actual: Value = serde_json::from_str(&common::body_text(resp).await).unwrap();
    assert_eq!(actual, Value::Array(vec![]));
}

#[actix_web::test]
async fn test_events_when_start_not_a_number_expect_client_error() {
    let (db, _seed) = common::initialize_seeded_db().await;
    let app = common::initialize_app(&db).await;
    let resp = test::call_service(&app, common::get_as("/milestones/calendar/json/?start=soon", "ada")).await;
    let actual = resp.status().is_client_error();
    let expected = true;
    assert_eq!(actual, expected);
}

#[actix_web::test]
async fn test_page_when_rendered_expect_non_staff_users_with_colours() {
    let (db, seed) = common::initialize_seeded_db().await;
    let app = common::initialize_app(&db).await;
    let uri = format!("/milestones/calendar/?apk={}", seed.article_id);
    let resp = test::call_service(&app, common::get_as(&uri, "grace")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let actual = common::body_text(resp).await;
    assert!(actual.contains("Ada Lovelace"));
    assert!(actual.contains("Grace Hopper"));
    assert!(!actual.contains("Root Admin"));
    assert!(actual.contains(PALETTE[35]));
    assert!(actual.contains(&format!("data-article=\"{}\"", seed.article_id)));
    assert!(actual.contains("/milestones/calendar/json/"));
}
