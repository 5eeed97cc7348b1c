use crate::common::{self, date};
use chrono::NaiveTime;
use milestones::db::models::{article, milestone, status::Status, user};
use milestones::milestones::errors::MilestoneError;
use milestones::milestones::forms::MilestoneInput;
use milestones::milestones::lifecycle::{create_milestone, update_milestone, Actor};

fn input(owner_id: i64, title: &str) -> MilestoneInput {
    MilestoneInput {
        owner_id,
        title: title.to_owned(),
        status: Status::Active,
        date: date(2024, 7, 1),
        time: NaiveTime::from_hms_opt(8, 0, 0),
        end_date: None,
        deleted: false,
    }
}

#[actix_web::test]
async fn test_create_milestone_when_no_end_date_expect_single_milestone_on_new_revision() {
    let (db, seed) = common::initialize_seeded_db().await;
    let ada = user::Manager::find_by_username(&db, "ada").await.unwrap();
    let actor = Actor {
        user: ada,
        ip_address: Some("192.0.2.7".to_owned()),
    };
    let ids = create_milestone(&db, seed.article_id, &input(seed.grace, "Typesetting"), &actor)
        .await
        .unwrap();
    assert_eq!(ids.len(), 1);

    let created = milestone::Manager::find_by_id(&db, ids[0]).await.unwrap().unwrap();
    let current = article::Manager::find_by_id(&db, seed.article_id)
        .await
        .unwrap()
        .unwrap()
        .current_revision_id;
    assert_eq!(Some(created.article_revision_id), current);

    let revisions = article::Manager::find_revisions(&db, seed.article_id).await.unwrap();
    let latest = &revisions[0];
    assert_eq!(latest.revision_number, 2);
    assert_eq!(latest.title, "Engine notes");
    assert_eq!(latest.content, "Notes on the analytical engine.");
    assert_eq!(latest.user_id, Some(seed.ada));
    assert_eq!(latest.ip_address.as_deref(), Some("192.0.2.7"));
    assert_eq!(latest.automatic_log, "Milestone created by Ada Lovelace. Title: Typesetting");
}

#[actix_web::test]
async fn test_create_milestone_when_anonymous_expect_blank_name_in_log() {
    let (db, seed) = common::initialize_seeded_db().await;
    create_milestone(&db, seed.article_id, &input(seed.ada, "Anon"), &Actor::default())
        .await
        .unwrap();
    let actual = common::latest_log(&db, seed.article_id).await;
    let expected = "Milestone created by . Title: Anon";
    assert_eq!(actual, expected);
}

#[actix_web::test]
async fn test_create_milestone_when_no_current_revision_expect_error_and_nothing_written() {
    let (db, seed) = common::initialize_seeded_db().await;
    let actual = create_milestone(&db, seed.bare_article_id, &input(seed.ada, "Orphan"), &Actor::default())
        .await
        .unwrap_err();
    assert_eq!(
        actual.downcast_ref::<MilestoneError>(),
        Some(&MilestoneError::NoCurrentRevision)
    );
    let revisions = article::Manager::find_revisions(&db, seed.bare_article_id).await.unwrap();
    assert!(revisions.is_empty());
}

#[actix_web::test]
async fn test_create_milestone_when_article_missing_expect_not_found() {
    let (db, seed) = common::initialize_seeded_db().await;
    let actual = create_milestone(&db, 404, &input(seed.ada, "Ghost"), &Actor::default())
        .await
        .unwrap_err();
    assert_eq!(
        actual.downcast_ref::<MilestoneError>(),
        Some(&MilestoneError::ArticleNotFound(404))
    );
}

#[actix_web::test]
async fn test_create_milestone_when_end_date_expect_copies_without_time() {
    let (db, seed) = common::initialize_seeded_db().await;
    let mut ranged = input(seed.ada, "Daily standup");
    ranged.end_date = Some(date(2024, 7, 4));
    let ids = create_milestone(&db, seed.article_id, &ranged, &Actor::default())
        .await
        .unwrap();
    assert_eq!(ids.len(), 4);

    let listings = milestone::Manager::find_all_by_article(&db, seed.article_id).await.unwrap();
    let actual: Vec<_> = listings
        .iter()
        .map(|listing| (listing.milestone.date, listing.milestone.time))
        .collect();
    let expected = vec![
        (date(2024, 7, 1), NaiveTime::from_hms_opt(8, 0, 0)),
        (date(2024, 7, 2), None),
        (date(2024, 7, 3), None),
        (date(2024, 7, 4), None),
    ];
    assert_eq!(actual, expected);
    let revisions = article::Manager::find_revisions(&db, seed.article_id).await.unwrap();
    assert_eq!(revisions.len(), 2);
}

#[actix_web::test]
async fn test_update_milestone_when_locked_expect_forbidden_and_unchanged() {
    let (db, seed) = common::initialize_seeded_db().await;
    let id = common::add_milestone(&db, seed.article_id, seed.ada, "Frozen", Status::Active, date(2024, 7, 1), None).await;
    common::lock_current_revision(&db, seed.article_id).await;
    let actual = update_milestone(&db, seed.article_id, id, &input(seed.ada, "Thawed"), &Actor::default())
        .await
        .unwrap_err();
    assert_eq!(
        actual.downcast_ref::<MilestoneError>(),
        Some(&MilestoneError::Forbidden)
    );
    let unchanged = milestone::Manager::find_by_id(&db, id).await.unwrap().unwrap();
    assert_eq!(unchanged.title, "Frozen");
}

#[actix_web::test]
async fn test_update_milestone_when_unknown_id_expect_not_found() {
    let (db, seed) = common::initialize_seeded_db().await;
    let actual = update_milestone(&db, seed.article_id, 77, &input(seed.ada, "Nope"), &Actor::default())
        .await
        .unwrap_err();
    assert_eq!(
        actual.downcast_ref::<MilestoneError>(),
        Some(&MilestoneError::MilestoneNotFound(77))
    );
}

#[actix_web::test]
async fn test_update_milestone_when_other_article_expect_not_found_and_no_revision() {
    let (db, seed) = common::initialize_seeded_db().await;
    let id = common::add_milestone(&db, seed.article_id, seed.ada, "Elsewhere", Status::Active, date(2024, 7, 1), None).await;
    let actual = update_milestone(&db, seed.bare_article_id, id, &input(seed.ada, "Moved"), &Actor::default())
        .await
        .unwrap_err();
    assert_eq!(
        actual.downcast_ref::<MilestoneError>(),
        Some(&MilestoneError::MilestoneNotFound(id))
    );
    let unchanged = milestone::Manager::find_by_id(&db, id).await.unwrap().unwrap();
    assert_eq!(unchanged.title, "Elsewhere");
    assert_eq!(common::latest_log(&db, seed.article_id).await, "Article created");
    let revisions = article::Manager::find_revisions(&db, seed.bare_article_id).await.unwrap();
    assert!(revisions.is_empty());
}

#[actix_web::test]
async fn test_update_milestone_when_all_day_range_copy_expect_updated() {
    let (db, seed) = common::initialize_seeded_db().await;
    let mut ranged = input(seed.ada, "Proofing");
    ranged.end_date = Some(date(2024, 7, 2));
    let ids = create_milestone(&db, seed.article_id, &ranged, &Actor::default())
        .await
        .unwrap();
    let copy = ids[1];

    let mut changes = input(seed.grace, "Proofing, day two");
    changes.date = date(2024, 7, 2);
    changes.time = None;
    update_milestone(&db, seed.article_id, copy, &changes, &Actor::default())
        .await
        .unwrap();

    let actual = milestone::Manager::find_by_id(&db, copy).await.unwrap().unwrap();
    assert_eq!(actual.title, "Proofing, day two");
    assert_eq!(actual.owner_id, seed.grace);
    assert_eq!(actual.time, None);
    assert_eq!(
        common::latest_log(&db, seed.article_id).await,
        format!("Milestone updated by . Title: Proofing, day two PK: {copy}")
    );
}
