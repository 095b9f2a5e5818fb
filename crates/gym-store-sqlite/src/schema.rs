//! SQL schema for the gym SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Both sides of the coaching relation are stored: members.coached_by and
-- coaches.client_ids. The service layer keeps them in step.
CREATE TABLE IF NOT EXISTS coaches (
    coach_id      TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,             -- YYYY-MM-DD
    email         TEXT NOT NULL UNIQUE,
    code_digest   TEXT NOT NULL UNIQUE,      -- SHA-256 hex of the coach code
    client_ids    TEXT NOT NULL DEFAULT '[]', -- JSON array of member ids
    workout_plans TEXT NOT NULL DEFAULT '[]'  -- JSON array, ordered
);

CREATE TABLE IF NOT EXISTS members (
    member_id       TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    date_of_birth   TEXT NOT NULL,
    email           TEXT NOT NULL UNIQUE,
    membership_date TEXT NOT NULL,           -- free-form
    coached_by      TEXT REFERENCES coaches(coach_id) DEFERRABLE INITIALLY DEFERRED,
    bench           INTEGER NOT NULL DEFAULT 0 CHECK (bench >= 0),
    squat           INTEGER NOT NULL DEFAULT 0 CHECK (squat >= 0),
    deadlift        INTEGER NOT NULL DEFAULT 0 CHECK (deadlift >= 0)
);

CREATE TABLE IF NOT EXISTS workers (
    worker_id     TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    code_digest   TEXT NOT NULL UNIQUE
);

-- One-way switches that outlive the rows that set them.
CREATE TABLE IF NOT EXISTS registry_flags (
    name  TEXT PRIMARY KEY,
    value INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS members_coach_idx ON members(coached_by);

PRAGMA user_version = 1;
";

/// Column lists in the order the `Raw*` row readers expect.
pub const MEMBER_COLUMNS: &str =
  "member_id, name, date_of_birth, email, membership_date, coached_by, bench, squat, deadlift";

pub const COACH_COLUMNS: &str =
  "coach_id, name, date_of_birth, email, code_digest, client_ids, workout_plans";

pub const WORKER_COLUMNS: &str = "worker_id, name, date_of_birth, email, code_digest";
