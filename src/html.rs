//! Server-rendered HTML surface for `/tasks`.
//!
//! Forms post `application/x-www-form-urlencoded` bodies. Browsers cannot
//! send PATCH from a form, so updates are also accepted as POST to
//! `/tasks/{id}`.

use crate::server::AppState;
use crate::store::{StoreError, store_error};
use crate::types::{MAX_CONTENT_LEN, Task, TaskId, TaskPatch, ValidationError, parse_flag};
use axum::Form;
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

/// Fields submitted by the new/edit forms, kept as submitted.
///
/// When a field appears more than once the last value wins; the edit form
/// relies on this to send `done=false` for an unchecked box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub content: Option<String>,
    pub done: Option<String>,
}

impl TaskForm {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = TaskForm::default();
        for (key, value) in pairs {
            match key.as_str() {
                "content" => form.content = Some(value),
                "done" => form.done = Some(value),
                _ => {}
            }
        }
        form
    }

    fn from_task(task: &Task) -> Self {
        TaskForm {
            content: Some(task.content.clone()),
            done: Some(task.done.to_string()),
        }
    }

    /// The submitted flag; unrecognised values are an error, not `false`.
    pub fn done_flag(&self) -> Result<Option<bool>, ValidationError> {
        self.done.as_deref().map(parse_flag).transpose()
    }

    fn to_patch(&self) -> Result<TaskPatch, ValidationError> {
        Ok(TaskPatch {
            content: self.content.clone(),
            done: self.done_flag()?,
        })
    }
}

/// Page-level failures.
pub enum PageError {
    /// The request body could not be read as a form.
    BadRequest,
    NotFound,
    Internal,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::BadRequest => (
                StatusCode::BAD_REQUEST,
                Html(layout(
                    "Bad request",
                    "<h1>Bad request</h1>\n<p>The form could not be read.</p>\n<p><a href=\"/tasks\">Back to tasks</a></p>",
                )),
            )
                .into_response(),
            PageError::NotFound => (StatusCode::NOT_FOUND, Html(render_not_found())).into_response(),
            PageError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(layout("Error", "<p>Something went wrong.</p>")),
            )
                .into_response(),
        }
    }
}

impl From<eyre::Report> for PageError {
    fn from(report: eyre::Report) -> Self {
        match store_error(&report) {
            Some(StoreError::TaskNotFound(_)) => PageError::NotFound,
            _ => {
                log::error!("Request failed: {:#}", report);
                PageError::Internal
            }
        }
    }
}

impl From<FormRejection> for PageError {
    fn from(rejection: FormRejection) -> Self {
        log::debug!("Rejected form body: {}", rejection);
        PageError::BadRequest
    }
}

fn validation_error(report: &eyre::Report) -> Option<ValidationError> {
    match store_error(report) {
        Some(StoreError::Validation(e)) => Some(e.clone()),
        _ => None,
    }
}

fn parse_id(raw: &str) -> Result<TaskId, PageError> {
    raw.parse::<TaskId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(PageError::NotFound)
}

/// GET /tasks
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let tasks = state.store.list()?;
    Ok(Html(render_index(&tasks)))
}

/// GET /tasks/new
pub async fn new_form() -> Html<String> {
    Html(render_new(&TaskForm::default(), None))
}

/// POST /tasks
pub async fn create(
    State(state): State<AppState>,
    body: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Response, PageError> {
    let Form(pairs) = body?;
    let form = TaskForm::from_pairs(pairs);
    let content = form.content.clone().unwrap_or_default();

    match state.store.create(&content) {
        Ok(_) => Ok(Redirect::to("/tasks").into_response()),
        Err(report) => match validation_error(&report) {
            Some(e) => Ok((StatusCode::BAD_REQUEST, Html(render_new(&form, Some(&e)))).into_response()),
            None => Err(report.into()),
        },
    }
}

/// GET /tasks/{id}/edit
pub async fn edit_form(State(state): State<AppState>, Path(id): Path<String>) -> Result<Html<String>, PageError> {
    let id = parse_id(&id)?;
    let task = state.store.get(id)?.ok_or(PageError::NotFound)?;
    Ok(Html(render_edit(id, &TaskForm::from_task(&task), None)))
}

/// PATCH /tasks/{id} (and POST from browsers)
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Response, PageError> {
    let id = parse_id(&id)?;
    let Form(pairs) = body?;
    let form = TaskForm::from_pairs(pairs);

    let patch = match form.to_patch() {
        Ok(patch) => patch,
        Err(e) => return Ok((StatusCode::BAD_REQUEST, Html(render_edit(id, &form, Some(&e)))).into_response()),
    };

    match state.store.update(id, &patch) {
        Ok(_) => Ok(Redirect::to("/tasks").into_response()),
        Err(report) => match validation_error(&report) {
            Some(e) => Ok((StatusCode::BAD_REQUEST, Html(render_edit(id, &form, Some(&e)))).into_response()),
            None => Err(report.into()),
        },
    }
}

// =============================================================================
// Views
// =============================================================================

/// Escape text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

pub fn render_index(tasks: &[Task]) -> String {
    let mut body = String::from("<h1>Tasks</h1>\n<p><a href=\"/tasks/new\">New task</a></p>\n");
    if tasks.is_empty() {
        body.push_str("<p>No tasks yet.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for task in tasks {
            body.push_str(&format!(
                "<li><input type=\"checkbox\" disabled{}> {} <a href=\"/tasks/{}/edit\">edit</a></li>\n",
                if task.done { " checked" } else { "" },
                escape(&task.content),
                task.id
            ));
        }
        body.push_str("</ul>\n");
    }
    layout("Tasks", &body)
}

fn render_errors(error: Option<&ValidationError>) -> String {
    match error {
        Some(e) => format!(
            "<p class=\"error\" data-field=\"{}\">{}</p>\n",
            e.field(),
            escape(&e.to_string())
        ),
        None => String::new(),
    }
}

fn content_input(form: &TaskForm) -> String {
    format!(
        "<input type=\"text\" name=\"content\" maxlength=\"{}\" value=\"{}\">",
        MAX_CONTENT_LEN,
        escape(form.content.as_deref().unwrap_or(""))
    )
}

pub fn render_new(form: &TaskForm, error: Option<&ValidationError>) -> String {
    let body = format!(
        "<h1>New task</h1>\n{}<form method=\"post\" action=\"/tasks\">\n{}\n<button type=\"submit\">Create</button>\n</form>\n<p><a href=\"/tasks\">Back</a></p>\n",
        render_errors(error),
        content_input(form)
    );
    layout("New task", &body)
}

pub fn render_edit(id: TaskId, form: &TaskForm, error: Option<&ValidationError>) -> String {
    let body = format!(
        concat!(
            "<h1>Edit task</h1>\n{errors}",
            "<form method=\"post\" action=\"/tasks/{id}\">\n",
            "<input type=\"hidden\" name=\"_method\" value=\"patch\">\n",
            "{content}\n",
            "<input type=\"hidden\" name=\"done\" value=\"false\">\n",
            "<label><input type=\"checkbox\" name=\"done\" value=\"true\"{checked}> done</label>\n",
            "<button type=\"submit\">Update</button>\n</form>\n",
            "<p><a href=\"/tasks\">Back</a></p>\n"
        ),
        errors = render_errors(error),
        id = id,
        content = content_input(form),
        checked = if matches!(form.done_flag(), Ok(Some(true))) { " checked" } else { "" },
    );
    layout("Edit task", &body)
}

pub fn render_not_found() -> String {
    layout(
        "Not found",
        "<h1>Task not found</h1>\n<p><a href=\"/tasks\">Back to tasks</a></p>",
    )
}
