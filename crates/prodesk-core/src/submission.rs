//! Submission Flow: validate a careers application, upload the resume, then
//! insert the applicant row.
//!
//! The order is fixed: upload → public URL → insert. Each step only runs if
//! the previous one succeeded, so a row can never point at a missing blob.
//! The converse (blob without a row) is possible when the insert fails; that
//! blob is left where it is.

use std::{str::FromStr, sync::LazyLock};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
  record::{NewApplicant, Position, Table},
  store::{Backend, Blob},
  validate::{
    ValidationError, file_extension, is_resume_extension, is_valid_email,
    is_valid_phone, is_valid_profile_url, required,
  },
};

static WHITESPACE_RUN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Bucket resumes are uploaded to unless configured otherwise.
pub const DEFAULT_RESUME_BUCKET: &str = "resumes";

/// Largest resume accepted unless configured otherwise (10 MiB).
pub const DEFAULT_MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Where and how much the Submission Flow may upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionConfig {
  pub bucket:           String,
  pub max_resume_bytes: usize,
}

impl Default for SubmissionConfig {
  fn default() -> Self {
    Self {
      bucket:           DEFAULT_RESUME_BUCKET.to_string(),
      max_resume_bytes: DEFAULT_MAX_RESUME_BYTES,
    }
  }
}

/// The text fields exactly as the applicant typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationForm {
  pub name:     String,
  pub email:    String,
  pub phone:    String,
  pub position: String,
  pub linkedin: String,
}

/// A selected resume file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
  pub file_name:    String,
  pub content_type: Option<String>,
  pub bytes:        Bytes,
}

impl ResumeFile {
  /// The declared media type, or one inferred from the extension when the
  /// client sent nothing useful.
  pub fn media_type(&self) -> String {
    match self.content_type.as_deref() {
      Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => {
        ct.to_string()
      }
      _ => media_type_for(file_extension(&self.file_name)).to_string(),
    }
  }
}

fn media_type_for(ext: &str) -> &'static str {
  match ext.to_ascii_lowercase().as_str() {
    "pdf" => "application/pdf",
    "doc" => "application/msword",
    "docx" => {
      "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    }
    _ => "application/octet-stream",
  }
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// A submission that passed every local check and may now touch the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedApplication {
  pub name:     String,
  pub email:    String,
  pub phone:    String,
  pub position: Position,
  pub linkedin: Option<String>,
  pub resume:   ResumeFile,
}

impl ApplicationForm {
  /// Check every field and the resume. Required fields first, then the phone
  /// pattern, then the resume, then the remaining formats.
  pub fn validate(
    &self,
    resume: Option<ResumeFile>,
    config: &SubmissionConfig,
  ) -> Result<ValidatedApplication, ValidationError> {
    let name = required(&self.name, "Full Name")?;
    let email = required(&self.email, "Email Address")?;
    required(&self.phone, "Phone Number")?;
    let position = required(&self.position, "Position")?;

    // Matched and stored as typed; surrounding whitespace is significant.
    let phone = self.phone.as_str();
    if !is_valid_phone(phone) {
      return Err(ValidationError::InvalidPhone);
    }

    let resume = resume.ok_or(ValidationError::MissingResume)?;
    let ext = file_extension(&resume.file_name);
    if !is_resume_extension(ext) {
      return Err(ValidationError::UnsupportedResumeType(ext.to_string()));
    }
    if resume.bytes.len() > config.max_resume_bytes {
      return Err(ValidationError::ResumeTooLarge {
        limit_mib: config.max_resume_bytes / (1024 * 1024),
      });
    }

    if !is_valid_email(email) {
      return Err(ValidationError::InvalidEmail);
    }
    let position = Position::from_str(position)
      .map_err(|_| ValidationError::UnknownPosition(position.to_string()))?;

    let linkedin = match self.linkedin.trim() {
      "" => None,
      url if is_valid_profile_url(url) => Some(url.to_string()),
      _ => return Err(ValidationError::InvalidLinkedIn),
    };

    Ok(ValidatedApplication {
      name: name.to_string(),
      email: email.to_string(),
      phone: phone.to_string(),
      position,
      linkedin,
      resume,
    })
  }
}

// ─── Storage key ─────────────────────────────────────────────────────────────

/// `{millis}_{name with whitespace runs as "_"}.{extension}`.
///
/// The millisecond timestamp keeps concurrent submissions under the same
/// name apart; the name keeps the bucket listing readable.
pub fn storage_key(
  submitted_at: DateTime<Utc>,
  name: &str,
  extension: &str,
) -> String {
  format!(
    "{}_{}.{}",
    submitted_at.timestamp_millis(),
    WHITESPACE_RUN.replace_all(name, "_"),
    extension
  )
}

// ─── Submit ──────────────────────────────────────────────────────────────────

/// Why a submission did not produce an applicant row. The `Display` text is
/// what the applicant sees.
#[derive(Debug, Error)]
pub enum SubmitError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("Upload Error: {0}")]
  Upload(String),

  #[error("Database Error: {0}")]
  Database(String),
}

/// The outcome of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
  pub storage_key: String,
  pub applicant:   NewApplicant,
}

/// Upload the resume and insert the applicant row, in that order.
pub async fn submit_application<B: Backend>(
  backend: &B,
  config: &SubmissionConfig,
  application: ValidatedApplication,
  submitted_at: DateTime<Utc>,
) -> Result<Submission, SubmitError> {
  let ValidatedApplication {
    name,
    email,
    phone,
    position,
    linkedin,
    resume,
  } = application;

  let key = storage_key(submitted_at, &name, file_extension(&resume.file_name));
  let blob = Blob {
    content_type: resume.media_type(),
    bytes:        resume.bytes,
  };

  tracing::debug!(bucket = %config.bucket, %key, size = blob.bytes.len(), "uploading resume");
  backend
    .upload_blob(&config.bucket, &key, blob)
    .await
    .map_err(|e| SubmitError::Upload(e.to_string()))?;

  let cv_url = backend.public_url(&config.bucket, &key);

  let applicant = NewApplicant {
    name,
    email,
    phone,
    position,
    linkedin,
    cv_url,
  };
  let row = applicant
    .to_row()
    .map_err(|e| SubmitError::Database(e.to_string()))?;

  if let Err(e) = backend.insert(Table::Applicants, vec![row]).await {
    tracing::warn!(
      bucket = %config.bucket,
      %key,
      error = %e,
      "applicant insert failed; uploaded resume left orphaned"
    );
    return Err(SubmitError::Database(e.to_string()));
  }

  tracing::info!(%key, position = %applicant.position, "application stored");
  Ok(Submission {
    storage_key: key,
    applicant,
  })
}

// ─── Form state ──────────────────────────────────────────────────────────────

/// What the careers form is currently showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormStatus {
  #[default]
  Editing,
  /// "Application Received!"; fields have been cleared.
  Submitted,
  /// The last attempt failed with this message; typed values are kept.
  Rejected(String),
}

/// The careers form: typed values, the chosen file, and the current status.
#[derive(Debug, Clone, Default)]
pub struct CareersForm {
  pub fields: ApplicationForm,
  pub resume: Option<ResumeFile>,
  pub status: FormStatus,
}

impl CareersForm {
  pub fn new(fields: ApplicationForm, resume: Option<ResumeFile>) -> Self {
    Self {
      fields,
      resume,
      status: FormStatus::Editing,
    }
  }

  /// Run the whole flow once.
  ///
  /// The selected file is consumed by every attempt, so after a failure the
  /// applicant must choose it again. On success the typed values are
  /// cleared as well.
  pub async fn submit<B: Backend>(
    &mut self,
    backend: &B,
    config: &SubmissionConfig,
    submitted_at: DateTime<Utc>,
  ) -> Result<Submission, SubmitError> {
    let resume = self.resume.take();
    let outcome = match self.fields.validate(resume, config) {
      Ok(application) => {
        submit_application(backend, config, application, submitted_at).await
      }
      Err(e) => Err(e.into()),
    };

    match &outcome {
      Ok(_) => {
        self.fields = ApplicationForm::default();
        self.status = FormStatus::Submitted;
      }
      Err(e) => {
        tracing::info!(error = %e, "application rejected");
        self.status = FormStatus::Rejected(e.to_string());
      }
    }
    outcome
  }

  /// "Submit another application": back to an empty, editable form.
  pub fn reset(&mut self) {
    self.fields = ApplicationForm::default();
    self.resume = None;
    self.status = FormStatus::Editing;
  }
}
