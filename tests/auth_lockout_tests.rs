//! Login throttling: the two-state machine between normal and blocked.

use std::sync::Arc;

use roomly::config::Config;
use roomly::entities::users;
use roomly::services::{AuthError, AuthService, RegisterInput};
use roomly::state::SharedState;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.security.max_login_attempts = 3;
    config.security.block_minutes = 5;
    config
}

async fn spawn_state() -> Arc<SharedState> {
    Arc::new(
        SharedState::new(test_config())
            .await
            .expect("Failed to create shared state"),
    )
}

const EMAIL: &str = "lockout@example.com";
const PASSWORD: &str = "Str0ng!pass";

async fn register(state: &SharedState) -> i32 {
    let user = state
        .auth_service
        .register(&RegisterInput {
            first_name: "Locked".to_string(),
            last_name: "Out".to_string(),
            email: EMAIL.to_string(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap();
    user.id
}

async fn fail_login(state: &SharedState) {
    let result = state
        .auth_service
        .login(EMAIL, "wrong-password")
        .await
        .unwrap();
    assert!(result.is_none());
}

/// Rewinds `last_login_attempt` so a block window appears to have elapsed.
async fn backdate_last_attempt(state: &SharedState, minutes: i64) {
    let user = users::Entity::find()
        .filter(users::Column::Email.eq(EMAIL))
        .one(&state.store.conn)
        .await
        .unwrap()
        .unwrap();

    let stamp = (chrono::Utc::now() - chrono::Duration::minutes(minutes)).to_rfc3339();

    let mut active: users::ActiveModel = user.into();
    active.last_login_attempt = Set(Some(stamp));
    active.update(&state.store.conn).await.unwrap();
}

async fn failed_attempts(state: &SharedState) -> i32 {
    users::Entity::find()
        .filter(users::Column::Email.eq(EMAIL))
        .one(&state.store.conn)
        .await
        .unwrap()
        .unwrap()
        .failed_login_attempts
}

#[tokio::test]
async fn test_unknown_email_is_not_an_error() {
    let state = spawn_state().await;

    let result = state
        .auth_service
        .login("nobody@example.com", "whatever")
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_wrong_password_increments_counter() {
    let state = spawn_state().await;
    register(&state).await;

    fail_login(&state).await;
    fail_login(&state).await;

    assert_eq!(failed_attempts(&state).await, 2);
}

#[tokio::test]
async fn test_blocked_after_max_attempts_even_with_correct_password() {
    let state = spawn_state().await;
    register(&state).await;

    for _ in 0..3 {
        fail_login(&state).await;
    }

    let result = state.auth_service.login(EMAIL, PASSWORD).await;

    match result {
        Err(AuthError::Blocked { remaining_minutes }) => {
            assert!(remaining_minutes > 0 && remaining_minutes <= 5);
        }
        other => panic!("expected Blocked, got {other:?}"),
    }

    // The rejected attempt must not have touched the counter.
    assert_eq!(failed_attempts(&state).await, 3);
}

#[tokio::test]
async fn test_under_max_attempts_correct_password_succeeds() {
    let state = spawn_state().await;
    register(&state).await;

    fail_login(&state).await;
    fail_login(&state).await;

    let user = state.auth_service.login(EMAIL, PASSWORD).await.unwrap();
    assert!(user.is_some());
    assert_eq!(failed_attempts(&state).await, 0);
}

#[tokio::test]
async fn test_elapsed_window_readmits_and_success_resets_counter() {
    let state = spawn_state().await;
    register(&state).await;

    for _ in 0..3 {
        fail_login(&state).await;
    }

    // Still blocked right away.
    assert!(matches!(
        state.auth_service.login(EMAIL, PASSWORD).await,
        Err(AuthError::Blocked { .. })
    ));

    backdate_last_attempt(&state, 6).await;

    let user = state.auth_service.login(EMAIL, PASSWORD).await.unwrap();
    assert!(user.is_some());
    assert_eq!(failed_attempts(&state).await, 0);
}

#[tokio::test]
async fn test_elapsed_window_does_not_reset_counter_on_failure() {
    let state = spawn_state().await;
    register(&state).await;

    for _ in 0..3 {
        fail_login(&state).await;
    }

    backdate_last_attempt(&state, 6).await;

    // The window elapsed, so the attempt is admitted, but a wrong password
    // keeps counting up.
    fail_login(&state).await;
    assert_eq!(failed_attempts(&state).await, 4);

    // And the fresh stamp re-arms the block immediately.
    assert!(matches!(
        state.auth_service.login(EMAIL, PASSWORD).await,
        Err(AuthError::Blocked { .. })
    ));
}
