use crate::common;
use milestones::db::models::article::{self, NewRevision};
use milestones::db::Tx as _;

#[actix_web::test]
async fn test_find_by_id_when_no_revision_expect_unset_current_revision() {
    let (db, seed) = common::initialize_seeded_db().await;
    let actual = article::Manager::find_by_id(&db, seed.bare_article_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(actual.title, "Empty");
    assert_eq!(actual.current_revision_id, None);
}

#[actix_web::test]
async fn test_add_revision_when_anonymous_expect_unset_user_and_ip() {
    let (db, seed) = common::initialize_seeded_db().await;
    let mut tx = db.begin().await.unwrap();
    let revision_id = article::TxManager::add_revision(
        &mut tx,
        seed.article_id,
        &NewRevision {
            automatic_log: "Anonymous edit".to_owned(),
            ..NewRevision::default()
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    let current = article::Manager::find_by_id(&db, seed.article_id)
        .await
        .unwrap()
        .unwrap()
        .current_revision_id;
    assert_eq!(current, Some(revision_id));
    let revisions = article::Manager::find_revisions(&db, seed.article_id).await.unwrap();
    let actual = &revisions[0];
    assert_eq!(actual.id, revision_id);
    assert_eq!(actual.revision_number, 2);
    assert_eq!(actual.user_id, None);
    assert_eq!(actual.ip_address, None);
    assert_eq!(actual.title, "Engine notes");
}

#[actix_web::test]
async fn test_create_when_two_articles_expect_distinct_ids() {
    let db = common::initialize_db().await;
    let mut tx = db.begin().await.unwrap();
    let first = article::TxManager::create(&mut tx, "First").await.unwrap();
    let second = article::TxManager::create(&mut tx, "Second").await.unwrap();
    tx.commit().await.unwrap();
    assert!(first.is_some());
    assert!(second.is_some());
    assert_ne!(first, second);
}
