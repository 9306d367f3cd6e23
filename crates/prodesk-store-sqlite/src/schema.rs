//! SQL schema for the Prodesk SQLite store.

use prodesk_core::record::Table;

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Rows are append-only; the site never issues UPDATE or DELETE.
CREATE TABLE IF NOT EXISTS applicants (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL,
    phone       TEXT NOT NULL,
    position    TEXT NOT NULL,
    linkedin    TEXT,
    cv_url      TEXT NOT NULL,
    created_at  TEXT NOT NULL    -- RFC 3339 UTC, fixed width; store-assigned
);

CREATE TABLE IF NOT EXISTS contacts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL,
    phone       TEXT NOT NULL,
    message     TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

-- Object storage. A key is written once; re-uploading it is an error.
CREATE TABLE IF NOT EXISTS blobs (
    bucket        TEXT NOT NULL,
    key           TEXT NOT NULL,
    content_type  TEXT NOT NULL,
    content_hash  TEXT NOT NULL,   -- SHA-256 hex of data
    data          BLOB NOT NULL,
    created_at    TEXT NOT NULL,
    PRIMARY KEY (bucket, key)
);

CREATE INDEX IF NOT EXISTS applicants_created_idx ON applicants(created_at);
CREATE INDEX IF NOT EXISTS contacts_created_idx   ON contacts(created_at);

PRAGMA user_version = 1;
";

/// Columns a caller may supply on insert. `id` and `created_at` are always
/// assigned by the store.
pub fn writable_columns(table: Table) -> &'static [&'static str] {
  match table {
    Table::Applicants => {
      &["name", "email", "phone", "position", "linkedin", "cv_url"]
    }
    Table::Contacts => &["name", "email", "phone", "message"],
  }
}

/// Every column of `table`, in declaration order.
pub fn all_columns(table: Table) -> &'static [&'static str] {
  match table {
    Table::Applicants => &[
      "id", "name", "email", "phone", "position", "linkedin", "cv_url",
      "created_at",
    ],
    Table::Contacts => {
      &["id", "name", "email", "phone", "message", "created_at"]
    }
  }
}
