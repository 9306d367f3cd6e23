//! Record types: the two row kinds held by the backing store.
//!
//! Both kinds are append-only from the site's point of view: rows are created
//! once and never updated or deleted here. `id` and `created_at` are always
//! assigned by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::Result;

// ─── Position ────────────────────────────────────────────────────────────────

/// The fixed set of roles an applicant can apply for.
///
/// The serialised form is the human-readable label, which is also what the
/// careers form submits and what lands in the `position` column.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
  IntoStaticStr,
)]
pub enum Position {
  #[serde(rename = "Software Engineer")]
  #[strum(serialize = "Software Engineer")]
  SoftwareEngineer,
  #[serde(rename = "Mobile Developer")]
  #[strum(serialize = "Mobile Developer")]
  MobileDeveloper,
  #[serde(rename = "Data Scientist")]
  #[strum(serialize = "Data Scientist")]
  DataScientist,
  #[serde(rename = "Business Development")]
  #[strum(serialize = "Business Development")]
  BusinessDevelopment,
  Internship,
}

// ─── Table ───────────────────────────────────────────────────────────────────

/// A table in the backing store. Doubles as the review tab selector.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Table {
  #[default]
  Applicants,
  Contacts,
}

impl Table {
  /// The table name as the store knows it.
  pub fn name(self) -> &'static str {
    match self {
      Self::Applicants => "applicants",
      Self::Contacts => "contacts",
    }
  }

  /// Tab label shown to operators.
  pub fn label(self) -> &'static str {
    match self {
      Self::Applicants => "Applicants",
      Self::Contacts => "Inquiries",
    }
  }

  /// The other table; there are only two.
  pub fn toggled(self) -> Self {
    match self {
      Self::Applicants => Self::Contacts,
      Self::Contacts => Self::Applicants,
    }
  }

  /// Decode raw JSON rows fetched from this table into typed records.
  pub fn decode_rows(self, rows: Vec<serde_json::Value>) -> Result<Vec<Record>> {
    rows
      .into_iter()
      .map(|row| {
        Ok(match self {
          Self::Applicants => Record::Applicant(serde_json::from_value(row)?),
          Self::Contacts => Record::Inquiry(serde_json::from_value(row)?),
        })
      })
      .collect()
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// A job application as stored in the `applicants` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
  pub id:         i64,
  pub name:       String,
  pub email:      String,
  pub phone:      String,
  /// Kept as free text on read: rows edited out-of-band may carry labels that
  /// are no longer offered by the form.
  pub position:   String,
  #[serde(default)]
  pub linkedin:   Option<String>,
  /// Public URL of the uploaded resume. Set once at insert.
  pub cv_url:     String,
  pub created_at: DateTime<Utc>,
}

/// A general contact-form submission as stored in the `contacts` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
  pub id:         i64,
  pub name:       String,
  pub email:      String,
  pub phone:      String,
  pub message:    String,
  pub created_at: DateTime<Utc>,
}

/// A row from either table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
  Applicant(Applicant),
  Inquiry(Inquiry),
}

impl Record {
  pub fn id(&self) -> i64 {
    match self {
      Self::Applicant(a) => a.id,
      Self::Inquiry(i) => i.id,
    }
  }

  pub fn name(&self) -> &str {
    match self {
      Self::Applicant(a) => &a.name,
      Self::Inquiry(i) => &i.name,
    }
  }

  pub fn created_at(&self) -> DateTime<Utc> {
    match self {
      Self::Applicant(a) => a.created_at,
      Self::Inquiry(i) => i.created_at,
    }
  }
}

// ─── NewApplicant ────────────────────────────────────────────────────────────

/// The row written by the Submission Flow. `id` and `created_at` are left to
/// the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewApplicant {
  pub name:     String,
  pub email:    String,
  pub phone:    String,
  pub position: Position,
  pub linkedin: Option<String>,
  pub cv_url:   String,
}

impl NewApplicant {
  /// The JSON object handed to [`crate::store::Backend::insert`].
  pub fn to_row(&self) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(self)?)
  }
}
