//! Gallery ordering properties, exercised through the domain services
//! against an in-memory database.

use std::sync::Arc;

use roomly::config::Config;
use roomly::entities::room_pictures;
use roomly::models::{
    AddressInput, AddressKind, BathroomType, GenderPreference, RoomInput, RoomType,
};
use roomly::services::{
    AuthService, OwnerProfileInput, PictureError, PictureService, RegisterInput, RoomService,
};
use roomly::state::SharedState;

fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.uploads.images_path = std::env::temp_dir()
        .join("roomly-picture-tests")
        .to_string_lossy()
        .into_owned();
    config
}

async fn spawn_state() -> Arc<SharedState> {
    Arc::new(
        SharedState::new(test_config())
            .await
            .expect("Failed to create shared state"),
    )
}

fn address() -> AddressInput {
    AddressInput {
        street: "Main St".to_string(),
        number: 123,
        other: None,
        postal_code: "A1B2C3".to_string(),
        city_id: 1,
    }
}

fn room_input() -> RoomInput {
    RoomInput {
        room_type: RoomType::Individual,
        bathroom_type: BathroomType::Ensuite,
        gender: GenderPreference::Any,
        description: "Test room".to_string(),
        rent_price: 600,
        size: 20,
        number_of_rooms: 1,
        address: address(),
    }
}

async fn create_owner(state: &SharedState, email: &str) -> i32 {
    let user = state
        .auth_service
        .register(&RegisterInput {
            first_name: "Test".to_string(),
            last_name: "Owner".to_string(),
            email: email.to_string(),
            password: "Str0ng!pass".to_string(),
        })
        .await
        .unwrap();

    state
        .auth_service
        .become_owner(
            user.id,
            &OwnerProfileInput {
                kind: AddressKind::Residential,
                street: "Owner St".to_string(),
                number: 7,
                other: None,
                postal_code: "B2C3D4".to_string(),
                city_id: 1,
                phone: "416-555-0199".to_string(),
            },
        )
        .await
        .unwrap();

    user.id
}

async fn create_room_with_pictures(
    state: &SharedState,
    owner_id: i32,
    urls: &[&str],
) -> (i32, Vec<room_pictures::Model>) {
    let room = state
        .room_service
        .create_room(owner_id, &room_input())
        .await
        .unwrap();

    let created = state
        .picture_service
        .add_pictures(
            owner_id,
            room.id,
            urls.iter().map(ToString::to_string).collect(),
        )
        .await
        .unwrap();

    (room.id, created)
}

/// Exactly one cover, and it has the minimum order.
async fn assert_cover_invariant(state: &SharedState, room_id: i32) {
    let pictures = state
        .picture_service
        .list_for_room(room_id)
        .await
        .unwrap();

    if pictures.is_empty() {
        return;
    }

    let covers: Vec<_> = pictures.iter().filter(|p| p.is_cover).collect();
    assert_eq!(covers.len(), 1, "expected exactly one cover");

    let min_order = pictures.iter().map(|p| p.order).min().unwrap();
    assert_eq!(covers[0].order, min_order, "cover must have the lowest order");
}

#[tokio::test]
async fn test_batch_upload_into_empty_room() {
    let state = spawn_state().await;
    let owner_id = create_owner(&state, "batch@example.com").await;

    let (room_id, created) =
        create_room_with_pictures(&state, owner_id, &["a.jpg", "b.jpg", "c.jpg"]).await;

    assert_eq!(created.len(), 3);
    assert_eq!(created[0].order, 1);
    assert!(created[0].is_cover);
    assert_eq!(created[1].order, 2);
    assert!(!created[1].is_cover);
    assert_eq!(created[2].order, 3);
    assert!(!created[2].is_cover);

    assert_cover_invariant(&state, room_id).await;
}

#[tokio::test]
async fn test_append_batch_keeps_existing_cover_and_density() {
    let state = spawn_state().await;
    let owner_id = create_owner(&state, "append@example.com").await;

    let (room_id, _) = create_room_with_pictures(&state, owner_id, &["a.jpg", "b.jpg"]).await;

    let appended = state
        .picture_service
        .add_pictures(owner_id, room_id, vec!["c.jpg".to_string(), "d.jpg".to_string()])
        .await
        .unwrap();

    assert_eq!(appended[0].order, 3);
    assert_eq!(appended[1].order, 4);
    assert!(!appended[0].is_cover);
    assert!(!appended[1].is_cover);

    let pictures = state.picture_service.list_for_room(room_id).await.unwrap();
    let orders: Vec<i32> = pictures.iter().map(|p| p.order).collect();
    assert_eq!(orders, vec![1, 2, 3, 4]);
    assert!(pictures[0].is_cover);

    assert_cover_invariant(&state, room_id).await;
}

#[tokio::test]
async fn test_swap_ascending_shifts_in_between_down() {
    let state = spawn_state().await;
    let owner_id = create_owner(&state, "swap-asc@example.com").await;

    let (room_id, created) =
        create_room_with_pictures(&state, owner_id, &["1.jpg", "2.jpg", "3.jpg", "4.jpg", "5.jpg"])
            .await;

    // Move the order-2 picture onto order 4: [1,2,3,4,5] -> old 3,4 shift
    // to 2,3 and the moved picture lands on 4.
    let source = &created[1];
    let target = &created[3];

    let updated = state
        .picture_service
        .swap_order(owner_id, &[source.id, target.id], true)
        .await
        .unwrap();

    assert_eq!(updated.order, 4);

    let pictures = state.picture_service.list_for_room(room_id).await.unwrap();
    let by_url: Vec<(&str, i32)> = pictures
        .iter()
        .map(|p| (p.url.as_str(), p.order))
        .collect();

    assert_eq!(
        by_url,
        vec![
            ("1.jpg", 1),
            ("3.jpg", 2),
            ("4.jpg", 3),
            ("2.jpg", 4),
            ("5.jpg", 5),
        ]
    );

    assert_cover_invariant(&state, room_id).await;
}

#[tokio::test]
async fn test_swap_descending_shifts_in_between_up() {
    let state = spawn_state().await;
    let owner_id = create_owner(&state, "swap-desc@example.com").await;

    let (room_id, created) =
        create_room_with_pictures(&state, owner_id, &["1.jpg", "2.jpg", "3.jpg", "4.jpg"]).await;

    // Move the order-4 picture onto order 2: old 2,3 shift to 3,4.
    let source = &created[3];
    let target = &created[1];

    let updated = state
        .picture_service
        .swap_order(owner_id, &[source.id, target.id], false)
        .await
        .unwrap();

    assert_eq!(updated.order, 2);

    let pictures = state.picture_service.list_for_room(room_id).await.unwrap();
    let by_url: Vec<(&str, i32)> = pictures
        .iter()
        .map(|p| (p.url.as_str(), p.order))
        .collect();

    assert_eq!(
        by_url,
        vec![("1.jpg", 1), ("4.jpg", 2), ("2.jpg", 3), ("3.jpg", 4)]
    );

    assert_cover_invariant(&state, room_id).await;
}

#[tokio::test]
async fn test_swap_moving_cover_recomputes_it() {
    let state = spawn_state().await;
    let owner_id = create_owner(&state, "swap-cover@example.com").await;

    let (room_id, created) =
        create_room_with_pictures(&state, owner_id, &["1.jpg", "2.jpg", "3.jpg"]).await;

    // Move the cover (order 1) onto order 3; the picture now at order 1
    // must take over as cover.
    let updated = state
        .picture_service
        .swap_order(owner_id, &[created[0].id, created[2].id], true)
        .await
        .unwrap();

    assert_eq!(updated.order, 3);
    assert!(!updated.is_cover);

    let pictures = state.picture_service.list_for_room(room_id).await.unwrap();
    assert_eq!(pictures[0].url, "2.jpg");
    assert!(pictures[0].is_cover);

    assert_cover_invariant(&state, room_id).await;
}

#[tokio::test]
async fn test_delete_cover_promotes_next_lowest() {
    let state = spawn_state().await;
    let owner_id = create_owner(&state, "delete-cover@example.com").await;

    let (room_id, created) =
        create_room_with_pictures(&state, owner_id, &["1.jpg", "2.jpg", "3.jpg"]).await;

    state
        .picture_service
        .delete_picture(owner_id, created[0].id)
        .await
        .unwrap();

    let pictures = state.picture_service.list_for_room(room_id).await.unwrap();
    assert_eq!(pictures.len(), 2);
    assert_eq!(pictures[0].url, "2.jpg");
    assert!(pictures[0].is_cover);

    assert_cover_invariant(&state, room_id).await;
}

#[tokio::test]
async fn test_delete_middle_leaves_gap_but_cover_holds() {
    let state = spawn_state().await;
    let owner_id = create_owner(&state, "delete-middle@example.com").await;

    let (room_id, created) =
        create_room_with_pictures(&state, owner_id, &["1.jpg", "2.jpg", "3.jpg"]).await;

    state
        .picture_service
        .delete_picture(owner_id, created[1].id)
        .await
        .unwrap();

    let pictures = state.picture_service.list_for_room(room_id).await.unwrap();
    let orders: Vec<i32> = pictures.iter().map(|p| p.order).collect();
    // Orders are not re-packed after a delete.
    assert_eq!(orders, vec![1, 3]);

    assert_cover_invariant(&state, room_id).await;

    // A swap across the gap still works on relative order.
    let updated = state
        .picture_service
        .swap_order(owner_id, &[pictures[0].id, pictures[1].id], true)
        .await
        .unwrap();
    assert_eq!(updated.order, 3);

    assert_cover_invariant(&state, room_id).await;
}

#[tokio::test]
async fn test_swap_requires_exactly_two_ids() {
    let state = spawn_state().await;
    let owner_id = create_owner(&state, "swap-ids@example.com").await;

    let (_, created) = create_room_with_pictures(&state, owner_id, &["1.jpg", "2.jpg"]).await;

    let result = state
        .picture_service
        .swap_order(owner_id, &[created[0].id], true)
        .await;

    assert!(matches!(result, Err(PictureError::InvalidInput(_))));
}

#[tokio::test]
async fn test_foreign_owner_cannot_touch_gallery() {
    let state = spawn_state().await;
    let owner_id = create_owner(&state, "gallery-owner@example.com").await;
    let intruder_id = create_owner(&state, "gallery-intruder@example.com").await;

    let (room_id, created) =
        create_room_with_pictures(&state, owner_id, &["1.jpg", "2.jpg"]).await;

    let result = state
        .picture_service
        .add_pictures(intruder_id, room_id, vec!["x.jpg".to_string()])
        .await;
    assert!(matches!(result, Err(PictureError::WrongOwner)));

    let result = state
        .picture_service
        .swap_order(intruder_id, &[created[0].id, created[1].id], true)
        .await;
    assert!(matches!(result, Err(PictureError::WrongOwner)));

    let result = state
        .picture_service
        .delete_picture(intruder_id, created[0].id)
        .await;
    assert!(matches!(result, Err(PictureError::WrongOwner)));

    // Nothing changed.
    let pictures = state.picture_service.list_for_room(room_id).await.unwrap();
    let urls: Vec<&str> = pictures.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(urls, vec!["1.jpg", "2.jpg"]);
    assert!(pictures[0].is_cover);
    assert_cover_invariant(&state, room_id).await;
}

#[tokio::test]
async fn test_room_delete_removes_gallery() {
    let state = spawn_state().await;
    let owner_id = create_owner(&state, "room-delete@example.com").await;

    let (room_id, _) = create_room_with_pictures(&state, owner_id, &["1.jpg", "2.jpg"]).await;

    state
        .room_service
        .delete_room(owner_id, room_id)
        .await
        .unwrap();

    let pictures = state.picture_service.list_for_room(room_id).await.unwrap();
    assert!(pictures.is_empty());
}
