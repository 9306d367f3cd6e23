//! Field checks applied to a careers submission before any store call.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Optional leading `+`, then 10–15 digits, spaces or hyphens.
static PHONE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\+?[0-9\s-]{10,15}$").expect("phone pattern"));

static EMAIL_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+$").expect("email pattern"));

/// File extensions accepted for resumes, compared case-insensitively.
pub const RESUME_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// A submission rejected before anything was sent to the store. The
/// `Display` text is shown to the applicant verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("{0} is required.")]
  MissingField(&'static str),

  #[error("Please enter a valid phone number (at least 10 digits).")]
  InvalidPhone,

  #[error("Please enter a valid email address.")]
  InvalidEmail,

  #[error("Please enter a valid LinkedIn URL starting with http:// or https://.")]
  InvalidLinkedIn,

  #[error("Please select one of the listed positions (got {0:?}).")]
  UnknownPosition(String),

  #[error("Please upload your CV/Resume.")]
  MissingResume,

  #[error("Your CV must be a PDF, DOC or DOCX file (got {0:?}).")]
  UnsupportedResumeType(String),

  #[error("Your CV must be at most {limit_mib} MB.")]
  ResumeTooLarge { limit_mib: usize },
}

pub fn is_valid_phone(phone: &str) -> bool { PHONE_RE.is_match(phone) }

pub fn is_valid_email(email: &str) -> bool { EMAIL_RE.is_match(email) }

/// LinkedIn is free text in the store; only the scheme is checked.
pub fn is_valid_profile_url(url: &str) -> bool {
  ["https://", "http://"].iter().any(|scheme| {
    url
      .get(..scheme.len())
      .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
      && url.len() > scheme.len()
  })
}

/// Everything after the last `.` of `file_name`, or the whole name when it
/// has no dot.
pub fn file_extension(file_name: &str) -> &str {
  file_name.rsplit('.').next().unwrap_or(file_name)
}

pub fn is_resume_extension(ext: &str) -> bool {
  RESUME_EXTENSIONS
    .iter()
    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
}

/// Fail with [`ValidationError::MissingField`] if `value` is blank.
pub fn required<'a>(
  value: &'a str,
  label: &'static str,
) -> Result<&'a str, ValidationError> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    Err(ValidationError::MissingField(label))
  } else {
    Ok(trimmed)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn phone_pattern() {
    for ok in [
      "+1 555-123-4567",
      "0123456789",
      "+919876543210",
      "555 123 4567",
      "---------------",
    ] {
      assert!(is_valid_phone(ok), "{ok:?} should pass");
    }
    for bad in [
      "",
      "12345",
      "123456789",
      "1234567890123456",
      "++1234567890",
      "(555) 123-4567",
      "555.123.4567",
      "12345abcde",
      " +1234567890",
    ] {
      assert!(!is_valid_phone(bad), "{bad:?} should fail");
    }
  }

  #[test]
  fn phone_rejects_non_ascii_digits() {
    assert!(!is_valid_phone("١٢٣٤٥٦٧٨٩٠"));
  }

  #[test]
  fn email_shape() {
    assert!(is_valid_email("jane@x.com"));
    assert!(is_valid_email("a@b"));
    assert!(!is_valid_email("jane"));
    assert!(!is_valid_email("jane @x.com"));
    assert!(!is_valid_email("@x.com"));
  }

  #[test]
  fn profile_url_scheme() {
    assert!(is_valid_profile_url("https://linkedin.com/in/jane"));
    assert!(is_valid_profile_url("HTTP://example.com"));
    assert!(!is_valid_profile_url("linkedin.com/in/jane"));
    assert!(!is_valid_profile_url("https://"));
    assert!(!is_valid_profile_url("ftp://example.com"));
  }

  #[test]
  fn extension_is_text_after_last_dot() {
    assert_eq!(file_extension("resume.pdf"), "pdf");
    assert_eq!(file_extension("my.cv.final.DOCX"), "DOCX");
    assert_eq!(file_extension("README"), "README");
    assert!(is_resume_extension("Pdf"));
    assert!(!is_resume_extension("txt"));
  }

  #[test]
  fn required_trims() {
    assert_eq!(required("  Jane ", "Full Name"), Ok("Jane"));
    assert_eq!(
      required("   ", "Full Name"),
      Err(ValidationError::MissingField("Full Name"))
    );
  }
}
