use crate::common::{self, date};
use actix_web::http::header::{COOKIE, LOCATION};
use actix_web::http::StatusCode;
use actix_web::test;
use milestones::db::models::milestone;
use milestones::db::models::status::Status;

#[actix_web::test]
async fn test_list_when_known_user_expect_article_tab() {
    let (db, seed) = common::initialize_seeded_db().await;
    common::add_milestone(&db, seed.article_id, seed.ada, "Draft ready", Status::Active, date(2024, 3, 1), None).await;
    let app = common::initialize_app(&db).await;
    let uri = format!("/article/{}/_plugin/milestones/", seed.article_id);
    let resp = test::call_service(&app, common::get_as(&uri, "ada")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let actual = common::body_text(resp).await;
    assert!(actual.contains("Engine notes"));
    assert!(actual.contains("Draft ready"));
    assert!(actual.contains("Add milestone"));
}

#[actix_web::test]
async fn test_list_when_no_remote_user_expect_unauthorized() {
    let (db, seed) = common::initialize_seeded_db().await;
    let app = common::initialize_app(&db).await;
    let uri = format!("/article/{}/_plugin/milestones/", seed.article_id);
    let req = test::TestRequest::get().uri(&uri).to_request();
    let actual = test::call_service(&app, req).await.status();
    let expected = StatusCode::UNAUTHORIZED;
    assert_eq!(actual, expected);
}

#[actix_web::test]
async fn test_list_when_unknown_remote_user_expect_unauthorized() {
    let (db, seed) = common::initialize_seeded_db().await;
    let app = common::initialize_app(&db).await;
    let uri = format!("/article/{}/_plugin/milestones/", seed.article_id);
    let actual = test::call_service(&app, common::get_as(&uri, "mallory"))
        .await
        .status();
    let expected = StatusCode::UNAUTHORIZED;
    assert_eq!(actual, expected);
}

#[actix_web::test]
async fn test_list_when_unknown_article_expect_not_found() {
    let (db, _seed) = common::initialize_seeded_db().await;
    let app = common::initialize_app(&db).await;
    let actual = test::call_service(&app, common::get_as("/article/999/_plugin/milestones/", "ada"))
        .await
        .status();
    let expected = StatusCode::NOT_FOUND;
    assert_eq!(actual, expected);
}

#[actix_web::test]
async fn test_create_when_date_range_expect_one_milestone_per_day_and_revision_log() {
    let (db, seed) = common::initialize_seeded_db().await;
    let app = common::initialize_app(&db).await;
    let uri = format!("/article/{}/_plugin/milestones/", seed.article_id);
    let owner = seed.ada.to_string();
    let req = common::post_form_as(
        &uri,
        "ada",
        &[
            ("owner", &owner),
            ("title", "Print run"),
            ("status", "1"),
            ("date", "2024-03-01"),
            ("time", "09:30"),
            ("end_date", "2024-03-04"),
        ],
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(LOCATION).unwrap(), uri.as_str());

    let listings = milestone::Manager::find_all_by_article(&db, seed.article_id)
        .await
        .unwrap();
    let actual: Vec<_> = listings
        .iter()
        .map(|listing| (listing.milestone.date, listing.milestone.time.is_some()))
        .collect();
    let expected = vec![
        (date(2024, 3, 1), true),
        (date(2024, 3, 2), false),
        (date(2024, 3, 3), false),
        (date(2024, 3, 4), false),
    ];
    assert_eq!(actual, expected);
    assert_eq!(
        common::latest_log(&db, seed.article_id).await,
        "Milestone created by Ada Lovelace. Title: Print run"
    );
}

#[actix_web::test]
async fn test_create_when_redirected_expect_flash_message_on_next_page() {
    let (db, seed) = common::initialize_seeded_db().await;
    let app = common::initialize_app(&db).await;
    let uri = format!("/article/{}/_plugin/milestones/", seed.article_id);
    let owner = seed.grace.to_string();
    let req = common::post_form_as(
        &uri,
        "ada",
        &[
            ("owner", &owner),
            ("title", "Proofs back"),
            ("status", "0"),
            ("date", "2024-05-01"),
        ],
    );
    let resp = test::call_service(&app, req).await;
    let cookie = common::set_cookie(&resp);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header((common::REMOTE_USER, "ada"))
        .insert_header((COOKIE, cookie))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cleared = common::set_cookie(&resp);
    let actual = common::body_text(resp).await;
    assert!(actual.contains("Proofs back was successfully added."));
    assert_eq!(cleared, "milestones_messages=");
}

#[actix_web::test]
async fn test_create_when_end_date_not_after_date_expect_form_error_and_nothing_created() {
    let (db, seed) = common::initialize_seeded_db().await;
    let app = common::initialize_app(&db).await;
    let uri = format!("/article/{}/_plugin/milestones/", seed.article_id);
    let owner = seed.ada.to_string();
    let req = common::post_form_as(
        &uri,
        "ada",
        &[
            ("owner", &owner),
            ("title", "Backwards"),
            ("status", "1"),
            ("date", "2024-03-04"),
            ("end_date", "2024-03-04"),
        ],
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let actual = common::body_text(resp).await;
    assert!(actual.contains("End date must be greater than start date."));
    assert!(actual.contains("value=\"Backwards\""));
    let listings = milestone::Manager::find_all_by_article(&db, seed.article_id)
        .await
        .unwrap();
    assert!(listings.is_empty());
}

#[actix_web::test]
async fn test_create_when_article_has_no_revision_expect_bad_request() {
    let (db, seed) = common::initialize_seeded_db().await;
    let app = common::initialize_app(&db).await;
    let uri = format!("/article/{}/_plugin/milestones/", seed.bare_article_id);
    let owner = seed.ada.to_string();
    let req = common::post_form_as(
        &uri,
        "ada",
        &[("owner", &owner), ("title", "Orphan"), ("status", "1"), ("date", "2024-03-04")],
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let actual = common::body_text(resp).await;
    assert_eq!(actual, "Article does not have a current_revision set.");
}

#[actix_web::test]
async fn test_create_when_revision_locked_expect_forbidden_and_nothing_created() {
    let (db, seed) = common::initialize_seeded_db().await;
    common::lock_current_revision(&db, seed.article_id).await;
    let app = common::initialize_app(&db).await;
    let uri = format!("/article/{}/_plugin/milestones/", seed.article_id);
    let owner = seed.ada.to_string();
    let req = common::post_form_as(
        &uri,
        "ada",
        &[("owner", &owner), ("title", "Blocked"), ("status", "1"), ("date", "2024-03-04")],
    );
    let actual = test::call_service(&app, req).await.status();
    assert_eq!(actual, StatusCode::FORBIDDEN);
    let listings = milestone::Manager::find_all_by_article(&db, seed.article_id)
        .await
        .unwrap();
    assert!(listings.is_empty());
    assert_eq!(common::latest_log(&db, seed.article_id).await, "Article created");
}

#[actix_web::test]
async fn test_edit_form_when_milestone_exists_expect_prefilled_form() {
    let (db, seed) = common::initialize_seeded_db().await;
    let id = common::add_milestone(&db, seed.article_id, seed.grace, "Index", Status::Pending, date(2024, 6, 1), None).await;
    let app = common::initialize_app(&db).await;
    let uri = format!("/article/{}/_plugin/milestones/edit/{id}/", seed.article_id);
    let resp = test::call_service(&app, common::get_as(&uri, "ada")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let actual = common::body_text(resp).await;
    assert!(actual.contains("Edit milestone"));
    assert!(actual.contains("value=\"Index\""));
    assert!(actual.contains("value=\"2024-06-01\""));
}

#[actix_web::test]
async fn test_edit_form_when_milestone_of_other_article_expect_not_found() {
    let (db, seed) = common::initialize_seeded_db().await;
    let id = common::add_milestone(&db, seed.article_id, seed.grace, "Index", Status::Pending, date(2024, 6, 1), None).await;
    let app = common::initialize_app(&db).await;
    let uri = format!("/article/{}/_plugin/milestones/edit/{id}/", seed.bare_article_id);
    let actual = test::call_service(&app, common::get_as(&uri, "ada"))
        .await
        .status();
    assert_eq!(actual, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_edit_when_deleted_checked_expect_soft_delete_and_deleted_log() {
    let (db, seed) = common::initialize_seeded_db().await;
    let id = common::add_milestone(&db, seed.article_id, seed.ada, "Errata", Status::Active, date(2024, 6, 1), None).await;
    let app = common::initialize_app(&db).await;
    let uri = format!("/article/{}/_plugin/milestones/edit/{id}/", seed.article_id);
    let owner = seed.ada.to_string();
    let req = common::post_form_as(
        &uri,
        "grace",
        &[
            ("owner", &owner),
            ("title", "Errata"),
            ("status", "2"),
            ("date", "2024-06-02"),
            ("deleted", "on"),
        ],
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(LOCATION).unwrap(),
        format!("/article/{}/_plugin/milestones/", seed.article_id).as_str()
    );

    let actual = milestone::Manager::find_by_id(&db, id).await.unwrap().unwrap();
    assert!(actual.deleted);
    assert_eq!(actual.status, Status::Completed);
    assert_eq!(actual.date, date(2024, 6, 2));
    assert_eq!(
        common::latest_log(&db, seed.article_id).await,
        format!("Milestone deleted by Grace Hopper. Title: Errata PK: {id}")
    );
}

#[actix_web::test]
async fn test_edit_when_not_deleted_expect_updated_log_and_new_revision() {
    let (db, seed) = common::initialize_seeded_db().await;
    let id = common::add_milestone(&db, seed.article_id, seed.ada, "Cover art", Status::Active, date(2024, 6, 1), None).await;
    let before = milestone::Manager::find_by_id(&db, id).await.unwrap().unwrap();
    let app = common::initialize_app(&db).await;
    let uri = format!("/article/{}/_plugin/milestones/edit/{id}/", seed.article_id);
    let owner = seed.grace.to_string();
    let req = common::post_form_as(
        &uri,
        "ada",
        &[
            ("owner", &owner),
            ("title", "Cover art v2"),
            ("status", "1"),
            ("date", "2024-06-01"),
            ("time", "17:00"),
        ],
    );
    test::call_service(&app, req).await;

    let actual = milestone::Manager::find_by_id(&db, id).await.unwrap().unwrap();
    assert_eq!(actual.title, "Cover art v2");
    assert_eq!(actual.owner_id, seed.grace);
    assert_ne!(actual.article_revision_id, before.article_revision_id);
    assert_eq!(
        common::latest_log(&db, seed.article_id).await,
        format!("Milestone updated by Ada Lovelace. Title: Cover art v2 PK: {id}")
    );
}

#[actix_web::test]
async fn test_create_when_all_day_range_expect_four_rows_listed_everywhere() {
    let (db, seed) = common::initialize_seeded_db().await;
    let app = common::initialize_app(&db).await;
    let uri = format!("/article/{}/_plugin/milestones/", seed.article_id);
    let owner = seed.ada.to_string();
    let req = common::post_form_as(
        &uri,
        "ada",
        &[
            ("owner", &owner),
            ("title", "Ship"),
            ("status", "1"),
            ("date", "2030-01-01"),
            ("end_date", "2030-01-04"),
        ],
    );
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let listings = milestone::Manager::find_all_by_article(&db, seed.article_id)
        .await
        .unwrap();
    let actual: Vec<_> = listings
        .iter()
        .map(|listing| (listing.milestone.date, listing.milestone.time))
        .collect();
    let expected = vec![
        (date(2030, 1, 1), None),
        (date(2030, 1, 2), None),
        (date(2030, 1, 3), None),
        (date(2030, 1, 4), None),
    ];
    assert_eq!(actual, expected);

    let resp = test::call_service(&app, common::get_as(&uri, "ada")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = common::body_text(resp).await;
    assert!(page.matches("Ship").count() >= 4);

    // 2030-01-01T00:00:00Z to 2030-01-31T00:00:00Z
    let resp = test::call_service(
        &app,
        common::get_as("/milestones/calendar/json/?start=1893456000&end=1896048000", "ada"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let events: serde_json::Value = serde_json::from_str(&common::body_text(resp).await).unwrap();
    let actual: Vec<bool> = events
        .as_array()
        .unwrap()
        .iter()
        .map(|event| event["allDay"].as_bool().unwrap())
        .collect();
    assert_eq!(actual, vec![true; 4]);
}
