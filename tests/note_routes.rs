use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode, header},
    response::Response,
};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{Set, Unchanged},
};
use tower::ServiceExt;
use uuid::Uuid;

use sticky_notes::{
    config::DatabaseConfig,
    db::{
        dao::{DaoBase, DaoContext, NoteRecord},
        entities::note,
        seed::{DEFAULT_TOPICS, seed_topics},
    },
    state::AppState,
    test_helpers::{test_router, test_state, test_state_with},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

async fn send(state: &Arc<AppState>, request: Request<Body>) -> Response {
    test_router(state.clone()).oneshot(request).await.unwrap()
}

async fn get(state: &Arc<AppState>, uri: &str) -> (StatusCode, String) {
    let response = send(state, Request::builder().uri(uri).body(Body::empty()).unwrap()).await;
    read_page(response).await
}

async fn post_form(state: &Arc<AppState>, uri: &str, form: &str) -> Response {
    send(
        state,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(Body::from(form.to_string()))
            .unwrap(),
    )
    .await
}

async fn read_page(response: Response) -> (StatusCode, String) {
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn assert_redirects_home(response: &Response) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
}

fn daos(state: &Arc<AppState>) -> DaoContext {
    DaoContext::new(&state.db)
}

async fn only_note(state: &Arc<AppState>) -> NoteRecord {
    let mut notes = daos(state).note().list_notes().await.unwrap();
    assert_eq!(notes.len(), 1);
    notes.remove(0)
}

#[tokio::test]
async fn created_note_shows_up_in_list() {
    let state = test_state().await;

    let response = post_form(
        &state,
        "/note/create/",
        "title=Groceries&content=Milk+and+eggs&owner_name=Sam",
    )
    .await;
    assert_redirects_home(&response);

    let (status, html) = get(&state, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Groceries"));
    assert!(html.contains("Milk and eggs"));
    assert!(html.contains("Sam"));

    let record = only_note(&state).await;
    assert_eq!(record.topic.name, DEFAULT_TOPICS[0]);
}

#[tokio::test]
async fn empty_board_renders() {
    let state = test_state().await;
    let (status, html) = get(&state, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No notes yet"));
}

#[tokio::test]
async fn create_form_lists_topics() {
    let state = test_state().await;
    let (status, html) = get(&state, "/note/create/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("---------"));
    for name in DEFAULT_TOPICS {
        assert!(html.contains(name), "missing topic {name}");
    }
}

#[tokio::test]
async fn same_owner_name_reuses_owner() {
    let state = test_state().await;

    for title in ["First", "Second"] {
        let form = format!("title={title}&content=body&owner_name=Jane");
        let response = post_form(&state, "/note/create/", &form).await;
        assert_redirects_home(&response);
    }

    let daos = daos(&state);
    assert_eq!(daos.note().count_notes().await.unwrap(), 2);
    assert_eq!(daos.owner().count_owners().await.unwrap(), 1);
}

#[tokio::test]
async fn submitted_topic_is_ignored_on_create() {
    let state = test_state().await;
    let other = daos(&state)
        .topic()
        .find_by_name("Other")
        .await
        .unwrap()
        .unwrap();

    let form = format!("title=Essay&content=Draft&owner_name=Kim&topic={}", other.id);
    let response = post_form(&state, "/note/create/", &form).await;
    assert_redirects_home(&response);

    let record = only_note(&state).await;
    assert_eq!(record.topic.name, "Work");
}

#[tokio::test]
async fn invalid_submission_rerenders_form_and_saves_nothing() {
    let state = test_state().await;
    let long_title = "t".repeat(36);
    let form = format!("title={long_title}&content=&owner_name=Jane");

    let response = post_form(&state, "/note/create/", &form).await;
    let (status, html) = read_page(response).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Ensure this value has at most 35 characters (it has 36)."));
    assert!(html.contains("This field is required."));
    assert!(html.contains("value=\"Jane\""));

    let daos = daos(&state);
    assert_eq!(daos.note().count_notes().await.unwrap(), 0);
    assert_eq!(daos.owner().count_owners().await.unwrap(), 0);
}

#[tokio::test]
async fn detail_shows_note_content() {
    let state = test_state().await;
    let response = post_form(
        &state,
        "/note/create/",
        "title=My+first+note%21&content=This+is+text+content&owner_name=Jane",
    )
    .await;
    assert_redirects_home(&response);

    // New notes always land in the first topic; file this one under Admin.
    let record = only_note(&state).await;
    let admin = daos(&state)
        .topic()
        .find_by_name("Admin")
        .await
        .unwrap()
        .unwrap();
    note::ActiveModel {
        id: Unchanged(record.note.id),
        topic_id: Set(admin.id),
        ..Default::default()
    }
    .update(&state.db)
    .await
    .unwrap();

    let (status, html) = get(&state, &format!("/note/{}/", record.note.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("My first note!"));
    assert!(html.contains("This is text content"));
    assert!(html.contains("Jane"));
    assert!(html.contains("Admin"));
}

#[tokio::test]
async fn list_returns_every_note_in_creation_order() {
    let state = test_state().await;
    for n in 0..120 {
        let form = format!("title=n{n}&content=body&owner_name=Jane");
        let response = post_form(&state, "/note/create/", &form).await;
        assert_redirects_home(&response);
    }

    let notes = daos(&state).note().list_notes().await.unwrap();
    let titles: Vec<&str> = notes.iter().map(|record| record.note.title.as_str()).collect();
    let expected: Vec<String> = (0..120).map(|n| format!("n{n}")).collect();
    assert_eq!(titles, expected);

    let (status, html) = get(&state, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(">n0<"));
    assert!(html.contains(">n119<"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_all_succeed_with_one_owner() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state_with(DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", dir.path().join("notes.db").display()),
        max_connections: 8,
        min_idle: 1,
    })
    .await;

    for round in 0..5 {
        let mut handles = Vec::new();
        for n in 0..8 {
            let state = state.clone();
            handles.push(tokio::spawn(async move {
                let form = format!("title=r{round}n{n}&content=body&owner_name=Shared");
                post_form(&state, "/note/create/", &form).await.status()
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), StatusCode::SEE_OTHER);
        }
    }

    let daos = daos(&state);
    assert_eq!(daos.note().count_notes().await.unwrap(), 40);
    assert_eq!(daos.owner().count_owners().await.unwrap(), 1);
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_not_found() {
    let state = test_state().await;

    let (status, html) = get(&state, &format!("/note/{}/", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Note not found"));

    let (status, _) = get(&state, "/note/42/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&state, &format!("/note/{}/edit/", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_changes_fields_but_keeps_created_at_and_topic() {
    let state = test_state().await;
    let response = post_form(&state, "/note/create/", "title=Old&content=Old+body&owner_name=Jane").await;
    assert_redirects_home(&response);
    let before = only_note(&state).await;

    let (status, html) = get(&state, &format!("/note/{}/edit/", before.note.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("value=\"Old\""));
    assert!(html.contains(&format!("value=\"{}\" selected", before.topic.id)));

    let other = daos(&state)
        .topic()
        .find_by_name("Other")
        .await
        .unwrap()
        .unwrap();
    let form = format!("title=New&content=New+body&owner_name=Alex&topic={}", other.id);
    let response = post_form(&state, &format!("/note/{}/edit/", before.note.id), &form).await;
    assert_redirects_home(&response);

    let after = only_note(&state).await;
    assert_eq!(after.note.id, before.note.id);
    assert_eq!(after.note.title, "New");
    assert_eq!(after.note.content, "New body");
    assert_eq!(after.owner.name, "Alex");
    assert_eq!(after.topic.id, before.topic.id);
    assert_eq!(after.note.created_at, before.note.created_at);
}

#[tokio::test]
async fn invalid_update_leaves_note_untouched() {
    let state = test_state().await;
    let response = post_form(&state, "/note/create/", "title=Keep&content=Body&owner_name=Jane").await;
    assert_redirects_home(&response);
    let before = only_note(&state).await;

    let response = post_form(
        &state,
        &format!("/note/{}/edit/", before.note.id),
        "title=&content=Changed&owner_name=Jane",
    )
    .await;
    let (status, html) = read_page(response).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("This field is required."));

    let after = only_note(&state).await;
    assert_eq!(after.note.title, "Keep");
    assert_eq!(after.note.content, "Body");
}

#[tokio::test]
async fn delete_removes_note_and_later_requests_are_not_found() {
    let state = test_state().await;
    let response = post_form(&state, "/note/create/", "title=Bye&content=Soon+gone&owner_name=Jane").await;
    assert_redirects_home(&response);
    let record = only_note(&state).await;
    let id = record.note.id;

    let response = post_form(&state, &format!("/note/{id}/delete/"), "").await;
    assert_redirects_home(&response);
    assert_eq!(daos(&state).note().count_notes().await.unwrap(), 0);

    for uri in [format!("/note/{id}/"), format!("/note/{id}/edit/"), format!("/note/{id}/delete/")] {
        let (status, _) = get(&state, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn delete_works_over_get() {
    let state = test_state().await;
    let response = post_form(&state, "/note/create/", "title=Link&content=Body&owner_name=Jane").await;
    assert_redirects_home(&response);
    let record = only_note(&state).await;

    let response = send(
        &state,
        Request::builder()
            .uri(format!("/note/{}/delete/", record.note.id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_redirects_home(&response);
    assert_eq!(daos(&state).note().count_notes().await.unwrap(), 0);
}

#[tokio::test]
async fn deleting_owner_removes_their_notes() {
    let state = test_state().await;
    let response = post_form(&state, "/note/create/", "title=Mine&content=Body&owner_name=Jane").await;
    assert_redirects_home(&response);
    let record = only_note(&state).await;

    let daos = daos(&state);
    daos.owner().delete(record.owner.id).await.unwrap();
    assert_eq!(daos.note().count_notes().await.unwrap(), 0);
}

#[tokio::test]
async fn seeding_twice_keeps_four_topics() {
    let state = test_state().await;
    seed_topics(&state.db).await.unwrap();

    let topics = daos(&state).topic().list_topics().await.unwrap();
    let mut names: Vec<&str> = topics.iter().map(|topic| topic.name.as_str()).collect();
    names.sort_unstable();
    let mut expected = DEFAULT_TOPICS.to_vec();
    expected.sort_unstable();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn stylesheet_is_served() {
    let state = test_state().await;
    let (status, css) = get(&state, "/static/styles.css").await;
    assert_eq!(status, StatusCode::OK);
    assert!(css.contains(".sticky"));
}
