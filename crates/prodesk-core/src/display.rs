//! Presentation helpers shared by the HTML dashboard and the terminal one.
//!
//! Rendering is a pure function of the fetched rows and the viewport
//! category; nothing here holds state.

use chrono::{DateTime, TimeZone, Utc};

use crate::record::Record;

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Numeric date order used by a locale.
///
/// The default, used for unknown, empty or absent locales, is
/// [`DateStyle::YearFirst`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
  /// `1/31/2026`, US English and the browser default for bare `en`.
  MonthFirst,
  /// `31/01/2026`
  DayFirst,
  /// `31.01.2026`
  DayFirstDotted,
  /// `2026-01-31`
  #[default]
  YearFirst,
}

impl DateStyle {
  /// Pick a style from a BCP 47 tag (`en-GB`) or a POSIX locale
  /// (`de_DE.UTF-8`).
  pub fn from_locale(tag: &str) -> Self {
    let tag = tag.split(['.', '@']).next().unwrap_or_default();
    let mut parts = tag.split(['-', '_']);
    let lang = parts.next().unwrap_or_default().to_ascii_lowercase();
    let region = parts
      .find(|p| p.len() == 2)
      .map(str::to_ascii_uppercase);

    match (lang.as_str(), region.as_deref()) {
      ("en", None | Some("US" | "PH")) => Self::MonthFirst,
      ("en", Some("CA" | "ZA" | "SE")) => Self::YearFirst,
      ("en" | "es" | "fr" | "it" | "pt" | "el" | "id" | "vi" | "ar" | "hi", _) => {
        Self::DayFirst
      }
      ("de" | "ru" | "pl" | "cs" | "fi" | "nb" | "no" | "da" | "tr" | "uk", _) => {
        Self::DayFirstDotted
      }
      _ => Self::default(),
    }
  }

  /// Use the first language listed in an `Accept-Language` header.
  pub fn from_accept_language(header: &str) -> Self {
    let first = header
      .split(',')
      .next()
      .and_then(|entry| entry.split(';').next())
      .unwrap_or_default()
      .trim();
    Self::from_locale(first)
  }

  fn pattern(self) -> &'static str {
    match self {
      Self::MonthFirst => "%-m/%-d/%Y",
      Self::DayFirst => "%d/%m/%Y",
      Self::DayFirstDotted => "%d.%m.%Y",
      Self::YearFirst => "%Y-%m-%d",
    }
  }

  /// Format the calendar date of `at` as seen in `tz`.
  pub fn format<Tz>(self, at: DateTime<Utc>, tz: &Tz) -> String
  where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
  {
    at.with_timezone(tz).format(self.pattern()).to_string()
  }
}

// ─── Viewport ────────────────────────────────────────────────────────────────

/// Wide viewports get a table, narrow ones a card list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewport {
  Wide,
  Narrow,
}

impl Viewport {
  /// Classify a width against `breakpoint` (inclusive lower bound for
  /// [`Viewport::Wide`]).
  pub fn for_width(width: u16, breakpoint: u16) -> Self {
    if width >= breakpoint { Self::Wide } else { Self::Narrow }
  }
}

// ─── Row view ────────────────────────────────────────────────────────────────

/// Kind-specific columns of a rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
  Applicant { position: String, cv_url: String },
  Inquiry { message: String },
}

/// One record flattened into display strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView {
  pub id:     i64,
  pub date:   String,
  pub name:   String,
  pub email:  String,
  pub phone:  String,
  pub detail: Detail,
}

impl RecordView {
  pub fn new<Tz>(record: &Record, style: DateStyle, tz: &Tz) -> Self
  where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
  {
    let date = style.format(record.created_at(), tz);
    match record {
      Record::Applicant(a) => Self {
        id: a.id,
        date,
        name: a.name.clone(),
        email: a.email.clone(),
        phone: a.phone.clone(),
        detail: Detail::Applicant {
          position: a.position.clone(),
          cv_url:   a.cv_url.clone(),
        },
      },
      Record::Inquiry(i) => Self {
        id: i.id,
        date,
        name: i.name.clone(),
        email: i.email.clone(),
        phone: i.phone.clone(),
        detail: Detail::Inquiry {
          message: i.message.clone(),
        },
      },
    }
  }
}

/// One view per record, same order, no duplicates or omissions.
pub fn record_views<Tz>(records: &[Record], style: DateStyle, tz: &Tz) -> Vec<RecordView>
where
  Tz: TimeZone,
  Tz::Offset: std::fmt::Display,
{
  records
    .iter()
    .map(|record| RecordView::new(record, style, tz))
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::{FixedOffset, TimeZone};

  use super::*;
  use crate::record::Applicant;

  fn at() -> DateTime<Utc> { Utc.with_ymd_and_hms(2026, 1, 31, 23, 30, 0).unwrap() }

  #[test]
  fn locale_tags() {
    assert_eq!(DateStyle::from_locale("en-US"), DateStyle::MonthFirst);
    assert_eq!(DateStyle::from_locale("en"), DateStyle::MonthFirst);
    assert_eq!(DateStyle::from_locale("en_GB.UTF-8"), DateStyle::DayFirst);
    assert_eq!(DateStyle::from_locale("en-IN"), DateStyle::DayFirst);
    assert_eq!(DateStyle::from_locale("de_DE.UTF-8"), DateStyle::DayFirstDotted);
    assert_eq!(DateStyle::from_locale("ja-JP"), DateStyle::YearFirst);
    assert_eq!(DateStyle::from_locale("C"), DateStyle::YearFirst);
    assert_eq!(DateStyle::from_locale(""), DateStyle::YearFirst);
    assert_eq!(DateStyle::from_locale("zh-Hant-TW"), DateStyle::YearFirst);
    assert_eq!(DateStyle::from_locale("xx"), DateStyle::default());
  }

  #[test]
  fn accept_language_uses_first_entry() {
    assert_eq!(
      DateStyle::from_accept_language("fr-CH, fr;q=0.9, en;q=0.8"),
      DateStyle::DayFirst
    );
    assert_eq!(DateStyle::from_accept_language("en-US;q=0.9"), DateStyle::MonthFirst);
  }

  #[test]
  fn formats_in_the_given_zone() {
    assert_eq!(DateStyle::MonthFirst.format(at(), &Utc), "1/31/2026");
    assert_eq!(DateStyle::DayFirst.format(at(), &Utc), "31/01/2026");
    assert_eq!(DateStyle::DayFirstDotted.format(at(), &Utc), "31.01.2026");

    let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
    assert_eq!(DateStyle::YearFirst.format(at(), &ist), "2026-02-01");
  }

  #[test]
  fn viewport_breakpoint() {
    assert_eq!(Viewport::for_width(100, 100), Viewport::Wide);
    assert_eq!(Viewport::for_width(99, 100), Viewport::Narrow);
  }

  #[test]
  fn applicant_view_carries_position_and_link() {
    let record = Record::Applicant(Applicant {
      id:         4,
      name:       "Jane Doe".into(),
      email:      "jane@x.com".into(),
      phone:      "+1 555-123-4567".into(),
      position:   "Internship".into(),
      linkedin:   None,
      cv_url:     "https://cdn/resumes/1_Jane_Doe.pdf".into(),
      created_at: at(),
    });
    let views = record_views(std::slice::from_ref(&record), DateStyle::YearFirst, &Utc);
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].date, "2026-01-31");
    assert_eq!(views[0].detail, Detail::Applicant {
      position: "Internship".into(),
      cv_url:   "https://cdn/resumes/1_Jane_Doe.pdf".into(),
    });
  }
}
