//! The public careers page: `GET /careers` and its multipart `POST`.

use askama::Template;
use axum::{
  extract::{Multipart, State, multipart::MultipartError},
  http::StatusCode,
  response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use prodesk_core::{
  record::Position,
  store::Backend,
  submission::{ApplicationForm, CareersForm, FormStatus, ResumeFile, SubmitError},
};
use strum::IntoEnumIterator as _;

use crate::{AppState, error::Error};

pub struct PositionOption {
  pub label:    &'static str,
  pub selected: bool,
}

#[derive(Template)]
#[template(path = "careers.html")]
pub struct CareersPage<'a> {
  pub fields:    &'a ApplicationForm,
  pub positions: Vec<PositionOption>,
  pub submitted: bool,
  pub error:     Option<&'a str>,
}

impl<'a> CareersPage<'a> {
  pub fn new(form: &'a CareersForm) -> Self {
    let (submitted, error) = match &form.status {
      FormStatus::Editing => (false, None),
      FormStatus::Submitted => (true, None),
      FormStatus::Rejected(message) => (false, Some(message.as_str())),
    };
    Self {
      fields: &form.fields,
      positions: Position::iter()
        .map(|position| {
          let label: &'static str = position.into();
          PositionOption {
            label,
            selected: form.fields.position == label,
          }
        })
        .collect(),
      submitted,
      error,
    }
  }
}

/// An empty, editable form. Also where "Submit another application" leads.
pub async fn show() -> Result<Html<String>, Error> {
  let form = CareersForm::default();
  Ok(Html(CareersPage::new(&form).render()?))
}

pub async fn submit<S>(
  State(state): State<AppState<S>>,
  multipart: Multipart,
) -> Result<Response, Error>
where
  S: Backend + Clone + 'static,
{
  let (fields, resume) = read_form(multipart).await?;
  let mut form = CareersForm::new(fields, resume);

  let outcome = form
    .submit(state.store.as_ref(), &state.config.submission(), Utc::now())
    .await;
  let status = match outcome {
    Ok(_) => StatusCode::OK,
    Err(SubmitError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
    Err(_) => StatusCode::BAD_GATEWAY,
  };

  Ok((status, Html(CareersPage::new(&form).render()?)).into_response())
}

async fn read_form(
  mut multipart: Multipart,
) -> Result<(ApplicationForm, Option<ResumeFile>), MultipartError> {
  let mut fields = ApplicationForm::default();
  let mut resume = None;

  while let Some(field) = multipart.next_field().await? {
    let name = field.name().unwrap_or_default().to_string();
    match name.as_str() {
      "name"     => fields.name = field.text().await?,
      "email"    => fields.email = field.text().await?,
      "phone"    => fields.phone = field.text().await?,
      "position" => fields.position = field.text().await?,
      "linkedin" => fields.linkedin = field.text().await?,
      "cv" => {
        let file_name    = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes        = field.bytes().await?;
        // A file input with nothing chosen still sends an empty part.
        if !(file_name.is_empty() && bytes.is_empty()) {
          resume = Some(ResumeFile {
            file_name,
            content_type,
            bytes,
          });
        }
      }
      other => {
        tracing::debug!(field = other, "ignoring unknown form field");
        field.bytes().await?;
      }
    }
  }
  Ok((fields, resume))
}
