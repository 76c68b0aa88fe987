use chrono::{Duration, DurationRound, Utc};
use linkpulse::domain::entities::NewUrlMapping;
use linkpulse::domain::repositories::UrlRepository;
use linkpulse::error::AppError;
use linkpulse::infrastructure::persistence::PgUrlRepository;
use sqlx::PgPool;
use std::sync::Arc;

fn new_mapping(code: &str) -> NewUrlMapping {
    NewUrlMapping {
        original_url: "https://example.com".to_string(),
        short_code: code.to_string(),
        expires_at: None,
    }
}

#[sqlx::test]
async fn test_create_mapping(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    let expires_at = (Utc::now() + Duration::hours(2))
        .duration_trunc(Duration::microseconds(1))
        .unwrap();
    let mapping = repo
        .create(NewUrlMapping {
            expires_at: Some(expires_at),
            ..new_mapping("test123")
        })
        .await
        .unwrap();

    assert!(mapping.id > 0);
    assert_eq!(mapping.short_code, "test123");
    assert_eq!(mapping.original_url, "https://example.com");
    assert_eq!(mapping.click_count, 0);
    assert_eq!(mapping.expires_at, Some(expires_at));
}

#[sqlx::test]
async fn test_create_duplicate_code_is_conflict(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    repo.create(new_mapping("dup")).await.unwrap();
    let result = repo.create(new_mapping("dup")).await;

    match result {
        Err(AppError::Conflict { message, .. }) => assert_eq!(message, "Alias is already taken"),
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[sqlx::test]
async fn test_find_by_code(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    repo.create(new_mapping("abc123")).await.unwrap();

    let found = repo.find_by_code("abc123").await.unwrap();
    assert_eq!(found.unwrap().short_code, "abc123");

    let missing = repo.find_by_code("notfound").await.unwrap();
    assert!(missing.is_none());
}

#[sqlx::test]
async fn test_concurrent_increments_are_not_lost(pool: PgPool) {
    let repo = Arc::new(PgUrlRepository::new(Arc::new(pool)));
    let url_id = repo.create(new_mapping("hot")).await.unwrap().id;

    let mut tasks = Vec::new();
    for _ in 0..20 {
        let repo = repo.clone();
        tasks.push(tokio::spawn(async move {
            repo.increment_click_count(url_id).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let stored = repo.find_by_code("hot").await.unwrap().unwrap();
    assert_eq!(stored.click_count, 20);
}

#[sqlx::test]
async fn test_ping(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    assert!(repo.ping().await.is_ok());
}
