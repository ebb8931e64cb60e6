use std::sync::Arc;

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use uuid::Uuid;

use crate::{
    db::{dao::NoteRecord, entities::topic},
    error::AppError,
    forms::{FormErrors, NoteForm},
    services::{ServiceContext, note_service::NoteService, topic_service::TopicService},
    state::AppState,
};

use super::{project_name, render};

const LIST_PATH: &str = "/";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(LIST_PATH, get(notes_list))
        .route("/note/create/", get(note_create_form).post(note_create))
        .route("/note/{id}/", get(note_detail))
        .route("/note/{id}/edit/", get(note_update_form).post(note_update))
        .route("/note/{id}/delete/", get(note_delete).post(note_delete))
}

/// One sticky note as the templates see it.
#[derive(Debug, Clone)]
pub struct NoteCard {
    pub id: String,
    pub title: String,
    pub content: String,
    pub owner_name: String,
    pub topic_name: String,
    pub created_at: String,
}

impl From<&NoteRecord> for NoteCard {
    fn from(record: &NoteRecord) -> Self {
        Self {
            id: record.note.id.to_string(),
            title: record.note.title.clone(),
            content: record.note.content.clone(),
            owner_name: record.owner.name.clone(),
            topic_name: record.topic.name.clone(),
            created_at: record.note.created_at.format("%b %-d, %Y, %H:%M").to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TopicOption {
    pub id: String,
    pub name: String,
}

impl From<topic::Model> for TopicOption {
    fn from(model: topic::Model) -> Self {
        Self {
            id: model.id.to_string(),
            name: model.name,
        }
    }
}

/// Values and messages for the shared create/edit form.
#[derive(Debug, Clone)]
pub struct NoteFormView {
    pub heading: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub title: String,
    pub content: String,
    pub owner_name: String,
    pub topic: String,
    pub topics: Vec<TopicOption>,
    pub errors: FormErrors,
}

impl NoteFormView {
    fn create(form: &NoteForm, errors: FormErrors, topics: Vec<topic::Model>) -> Self {
        Self {
            heading: "New note",
            action: "/note/create/".to_string(),
            submit_label: "Create",
            title: form.title.clone(),
            content: form.content.clone(),
            owner_name: form.owner_name.clone(),
            topic: form.topic.clone(),
            topics: topics.into_iter().map(TopicOption::from).collect(),
            errors,
        }
    }

    fn update(id: &Uuid, form: &NoteForm, errors: FormErrors, topics: Vec<topic::Model>) -> Self {
        Self {
            heading: "Edit note",
            action: format!("/note/{id}/edit/"),
            submit_label: "Save",
            ..Self::create(form, errors, topics)
        }
    }
}

#[derive(Template)]
#[template(path = "notes/notes_list.html")]
struct NotesListTemplate {
    project_name: String,
    show_home_button: bool,
    notes: Vec<NoteCard>,
}

#[derive(Template)]
#[template(path = "notes/note_detail.html")]
struct NoteDetailTemplate {
    project_name: String,
    show_home_button: bool,
    note: NoteCard,
}

#[derive(Template)]
#[template(path = "notes/note_form.html")]
struct NoteFormTemplate {
    project_name: String,
    show_home_button: bool,
    form: NoteFormView,
}

async fn notes_list(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let records = note_service(&state).list_notes().await?;
    render(&NotesListTemplate {
        project_name: project_name(),
        show_home_button: false,
        notes: records.iter().map(NoteCard::from).collect(),
    })
}

async fn note_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = parse_note_id(&id)?;
    let record = note_service(&state).require_note(&id).await?;
    render(&NoteDetailTemplate {
        project_name: project_name(),
        show_home_button: true,
        note: NoteCard::from(&record),
    })
}

async fn note_create_form(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let topics = topic_service(&state).list_topics().await?;
    render_form(NoteFormView::create(
        &NoteForm::default(),
        FormErrors::default(),
        topics,
    ))
}

async fn note_create(
    State(state): State<Arc<AppState>>,
    Form(form): Form<NoteForm>,
) -> Result<Response, AppError> {
    match form.validate() {
        Ok(valid) => {
            note_service(&state).create_note(&valid).await?;
            Ok(Redirect::to(LIST_PATH).into_response())
        }
        Err(errors) => {
            let topics = topic_service(&state).list_topics().await?;
            let page = render_form(NoteFormView::create(&form, errors, topics))?;
            Ok(page.into_response())
        }
    }
}

async fn note_update_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = parse_note_id(&id)?;
    let record = note_service(&state).require_note(&id).await?;
    let topics = topic_service(&state).list_topics().await?;
    let initial = NoteForm {
        title: record.note.title,
        content: record.note.content,
        owner_name: record.owner.name,
        topic: record.topic.id.to_string(),
    };
    render_form(NoteFormView::update(
        &id,
        &initial,
        FormErrors::default(),
        topics,
    ))
}

async fn note_update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<NoteForm>,
) -> Result<Response, AppError> {
    let id = parse_note_id(&id)?;
    let service = note_service(&state);
    service.require_note(&id).await?;

    match form.validate() {
        Ok(valid) => {
            service.update_note(&id, &valid).await?;
            Ok(Redirect::to(LIST_PATH).into_response())
        }
        Err(errors) => {
            let topics = topic_service(&state).list_topics().await?;
            let page = render_form(NoteFormView::update(&id, &form, errors, topics))?;
            Ok(page.into_response())
        }
    }
}

async fn note_delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let id = parse_note_id(&id)?;
    note_service(&state).delete_note(&id).await?;
    Ok(Redirect::to(LIST_PATH))
}

fn render_form(form: NoteFormView) -> Result<Html<String>, AppError> {
    render(&NoteFormTemplate {
        project_name: project_name(),
        show_home_button: true,
        form,
    })
}

// A malformed id can never match a row, so it is a 404 like any unknown id.
fn parse_note_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found("Note not found"))
}

fn note_service(state: &AppState) -> NoteService {
    ServiceContext::from_state(state).note()
}

fn topic_service(state: &AppState) -> TopicService {
    ServiceContext::from_state(state).topic()
}

#[cfg(test)]
mod tests {
    use super::{NoteFormView, parse_note_id};
    use crate::forms::{FormErrors, NoteForm};
    use axum::http::StatusCode;
    use uuid::Uuid;

    #[test]
    fn malformed_ids_are_not_found() {
        let err = parse_note_id("not-a-uuid").expect_err("id should be rejected");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(parse_note_id(&Uuid::new_v4().to_string()).is_ok());
    }

    #[test]
    fn update_form_posts_back_to_edit_route() {
        let id = Uuid::new_v4();
        let view = NoteFormView::update(&id, &NoteForm::default(), FormErrors::default(), Vec::new());
        assert_eq!(view.action, format!("/note/{id}/edit/"));
        assert_eq!(view.heading, "Edit note");
    }
}
