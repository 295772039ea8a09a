//! Integration tests for `UserRepo`: credentials, uniqueness, search, and
//! profile edits.

mod common;

use assert_matches::assert_matches;
use sqlx::PgPool;
use taskmaster_core::error::CoreError;
use taskmaster_core::password::{hash_password, verify_password};
use taskmaster_db::models::status::UserRole;
use taskmaster_db::models::user::{CreateUser, UpdateUser};
use taskmaster_db::repositories::UserRepo;
use taskmaster_db::RepoError;

use common::{create_user, new_user, PASSWORD};

// ---------------------------------------------------------------------------
// Test: Create and authenticate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_assigns_positive_id(pool: PgPool) {
    let user = create_user(&pool, "john_doe", UserRole::User).await;
    assert!(user.id > 0);
    assert_eq!(user.role, UserRole::User);
    assert!(user.is_active);
    assert_ne!(user.password_hash, PASSWORD);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_authenticate_accepts_correct_password(pool: PgPool) {
    let created = create_user(&pool, "alice", UserRole::Admin).await;
    let user = UserRepo::authenticate(&pool, "alice", PASSWORD)
        .await
        .unwrap()
        .expect("valid credentials should authenticate");
    assert_eq!(user.id, created.id);
    assert!(user.is_admin());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_authenticate_is_uniform_on_failure(pool: PgPool) {
    create_user(&pool, "alice", UserRole::User).await;

    let wrong_password = UserRepo::authenticate(&pool, "alice", "Wrong123")
        .await
        .unwrap();
    let unknown_user = UserRepo::authenticate(&pool, "nobody", PASSWORD)
        .await
        .unwrap();
    assert!(wrong_password.is_none());
    assert!(unknown_user.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_authenticate_skips_inactive_users(pool: PgPool) {
    let input = CreateUser {
        is_active: false,
        ..new_user("dormant", UserRole::User)
    };
    UserRepo::create(&pool, &input).await.unwrap();
    assert!(UserRepo::authenticate(&pool, "dormant", PASSWORD)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_plaintext_password_is_never_stored(pool: PgPool) {
    let input = CreateUser {
        password_hash: PASSWORD.to_string(),
        ..new_user("plain", UserRole::User)
    };
    assert_matches!(
        UserRepo::create(&pool, &input).await,
        Err(RepoError::Invalid(_))
    );
    assert_eq!(UserRepo::count(&pool).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Test: Uniqueness
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_rejected_even_when_inactive(pool: PgPool) {
    let inactive = CreateUser {
        is_active: false,
        ..new_user("first", UserRole::User)
    };
    UserRepo::create(&pool, &inactive).await.unwrap();

    let clash = CreateUser {
        email: "first@example.com".to_string(),
        ..new_user("second", UserRole::User)
    };
    assert_matches!(
        UserRepo::create(&pool, &clash).await,
        Err(RepoError::Conflict { field }) if field == "email"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_username_rejected(pool: PgPool) {
    create_user(&pool, "taken", UserRole::User).await;
    let clash = CreateUser {
        email: "other@example.com".to_string(),
        ..new_user("taken", UserRole::User)
    };
    let err = UserRepo::create(&pool, &clash).await.unwrap_err();
    assert_matches!(&err, RepoError::Conflict { field } if field == "username");
    assert_matches!(
        CoreError::from(err),
        CoreError::Conflict(msg) if msg == "username already exists"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_uniqueness_ignores_letter_case(pool: PgPool) {
    create_user(&pool, "john_doe", UserRole::User).await;

    let email_clash = CreateUser {
        email: "JOHN_DOE@EXAMPLE.COM".to_string(),
        ..new_user("johnny", UserRole::User)
    };
    assert_matches!(
        UserRepo::create(&pool, &email_clash).await,
        Err(RepoError::Conflict { field }) if field == "email"
    );

    let username_clash = CreateUser {
        email: "second.john@example.com".to_string(),
        ..new_user("JOHN_DOE", UserRole::User)
    };
    assert_matches!(
        UserRepo::create(&pool, &username_clash).await,
        Err(RepoError::Conflict { field }) if field == "username"
    );
    assert_eq!(UserRepo::count(&pool).await.unwrap(), 1);

    assert!(UserRepo::email_exists(&pool, "John_Doe@Example.com")
        .await
        .unwrap());
    assert!(UserRepo::username_exists(&pool, "JOHN_DOE").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_existence_checks(pool: PgPool) {
    let user = create_user(&pool, "bob", UserRole::User).await;
    let other = create_user(&pool, "carol", UserRole::User).await;

    assert!(UserRepo::email_exists(&pool, "bob@example.com")
        .await
        .unwrap());
    assert!(!UserRepo::email_exists(&pool, "zed@example.com")
        .await
        .unwrap());
    assert!(UserRepo::username_exists(&pool, "carol").await.unwrap());
    assert!(!UserRepo::username_exists(&pool, "dave").await.unwrap());

    assert!(!UserRepo::email_taken_by_other(&pool, "bob@example.com", user.id)
        .await
        .unwrap());
    assert!(UserRepo::email_taken_by_other(&pool, "bob@example.com", other.id)
        .await
        .unwrap());
    assert!(UserRepo::email_taken_by_other(&pool, "BOB@example.com", other.id)
        .await
        .unwrap());
}

// ---------------------------------------------------------------------------
// Test: Lookup and search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_username_and_email(pool: PgPool) {
    let user = create_user(&pool, "erin", UserRole::User).await;

    let by_name = UserRepo::find_by_username(&pool, "erin")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_name.id, user.id);
    let by_email = UserRepo::find_by_email(&pool, "erin@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, user.id);
    let missing = UserRepo::find_by_id(&pool, user.id + 100).await.unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_matches_any_name_field_and_role(pool: PgPool) {
    let admin = create_user(&pool, "boss", UserRole::Admin).await;
    let worker = UserRepo::create(
        &pool,
        &CreateUser {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            ..new_user("ghopper", UserRole::User)
        },
    )
    .await
    .unwrap();

    let hits = UserRepo::search(&pool, "hOPp", None).await.unwrap();
    let ids: Vec<_> = hits.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![worker.id]);

    let hits = UserRepo::search(&pool, "example.com", Some(UserRole::Admin))
        .await
        .unwrap();
    let ids: Vec<_> = hits.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![admin.id]);

    let all = UserRepo::search(&pool, "", None).await.unwrap();
    assert_eq!(all, UserRepo::find_all(&pool).await.unwrap());
    assert_eq!(all.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_treats_wildcards_literally(pool: PgPool) {
    create_user(&pool, "under_score", UserRole::User).await;
    create_user(&pool, "underxscore", UserRole::User).await;

    let hits = UserRepo::search(&pool, "under_", None).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].username, "under_score");
    assert!(UserRepo::search(&pool, "%", None).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: Updates and passwords
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_never_touches_hash(pool: PgPool) {
    let user = create_user(&pool, "frank", UserRole::User).await;
    let input = UpdateUser {
        first_name: "Francis".to_string(),
        role: UserRole::Admin,
        ..UpdateUser::from(&user)
    };
    let updated = UserRepo::update(&pool, user.id, &input).await.unwrap();
    assert_eq!(updated.first_name, "Francis");
    assert!(updated.is_admin());
    assert_eq!(updated.password_hash, user.password_hash);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_and_conflicting(pool: PgPool) {
    let user = create_user(&pool, "gina", UserRole::User).await;
    create_user(&pool, "hank", UserRole::User).await;

    assert_matches!(
        UserRepo::update(&pool, user.id + 100, &UpdateUser::from(&user)).await,
        Err(RepoError::NotFound { entity: "User", .. })
    );

    let clash = UpdateUser {
        email: "hank@example.com".to_string(),
        ..UpdateUser::from(&user)
    };
    assert_matches!(
        UserRepo::update(&pool, user.id, &clash).await,
        Err(RepoError::Conflict { field }) if field == "email"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_password(pool: PgPool) {
    let user = create_user(&pool, "ivy", UserRole::User).await;
    let hash = hash_password("NewSecret9").unwrap();
    UserRepo::update_password(&pool, user.id, &hash)
        .await
        .unwrap();

    assert!(UserRepo::authenticate(&pool, "ivy", "NewSecret9")
        .await
        .unwrap()
        .is_some());
    assert!(UserRepo::authenticate(&pool, "ivy", PASSWORD)
        .await
        .unwrap()
        .is_none());

    assert_matches!(
        UserRepo::update_password(&pool, user.id, "NewSecret9").await,
        Err(RepoError::Invalid(_))
    );
    assert_matches!(
        UserRepo::update_password(&pool, user.id + 100, &hash).await,
        Err(RepoError::NotFound { .. })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_change_password_flow(pool: PgPool) {
    let user = create_user(&pool, "jack", UserRole::User).await;

    assert_matches!(
        UserRepo::change_password(&pool, user.id, "Wrong123", "NewSecret9").await,
        Err(CoreError::Unauthorized(_))
    );
    assert_matches!(
        UserRepo::change_password(&pool, user.id, PASSWORD, "weakpass").await,
        Err(CoreError::Validation(msg)) if msg.contains("uppercase")
    );

    UserRepo::change_password(&pool, user.id, PASSWORD, "NewSecret9")
        .await
        .unwrap();
    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(verify_password("NewSecret9", &stored.password_hash));
}

// ---------------------------------------------------------------------------
// Test: Delete and counts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_and_counts(pool: PgPool) {
    let keep = create_user(&pool, "keep", UserRole::User).await;
    let gone = create_user(&pool, "gone", UserRole::User).await;
    UserRepo::update(
        &pool,
        keep.id,
        &UpdateUser {
            is_active: false,
            ..UpdateUser::from(&keep)
        },
    )
    .await
    .unwrap();

    assert_eq!(UserRepo::count(&pool).await.unwrap(), 2);
    assert_eq!(UserRepo::count_active(&pool).await.unwrap(), 1);

    assert!(UserRepo::delete(&pool, gone.id).await.unwrap());
    assert!(!UserRepo::delete(&pool, gone.id).await.unwrap());
    assert_eq!(UserRepo::count(&pool).await.unwrap(), 1);
}
