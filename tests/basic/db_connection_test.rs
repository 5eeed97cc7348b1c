use milestones::db::init::connect_url;
use milestones::db::models::user;
use tempfile::tempdir;

#[actix_web::test]
async fn test_connect_url_when_memory_database_expect_migrated_schema() {
    let db = connect_url("sqlite::memory:", 5).await.unwrap();
    let actual = user::Manager::find_all_active(&db).await.unwrap();
    assert!(actual.is_empty());
}

#[actix_web::test]
async fn test_connect_url_when_file_database_expect_file_created() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("milestones.sqlite3");
    let url = format!("sqlite://{}?mode=rwc", path.display());
    connect_url(&url, 2).await.unwrap();
    assert!(path.exists());
}

#[actix_web::test]
async fn test_connect_url_when_missing_directory_expect_error() {
    let dir = tempdir().unwrap();
    let url = format!("sqlite://{}/nowhere/db.sqlite3", dir.path().display());
    let actual = connect_url(&url, 1).await.unwrap_err();
    let expected = "unable to open database file";
    assert!(
        actual.to_string().contains(expected),
        "\"{actual}\" doesn't contain {expected}"
    );
}

#[actix_web::test]
async fn test_connect_url_when_not_sqlite_expect_error() {
    let actual = connect_url("mysql://localhost/milestones", 1)
        .await
        .unwrap_err();
    let expected = "Unsupported database URL";
    assert!(actual.to_string().contains(expected));
}
