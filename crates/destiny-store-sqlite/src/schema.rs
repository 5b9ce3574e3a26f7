//! SQL schema for the Destiny Matrix SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision so later migrations can be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Matrices are write-once. No UPDATE is ever issued against this table.
CREATE TABLE IF NOT EXISTS matrices (
    matrix_id      TEXT PRIMARY KEY,
    user_id        TEXT,
    name           TEXT NOT NULL,
    birth_date     TEXT NOT NULL,   -- DD.MM.YYYY
    gender         TEXT NOT NULL,   -- 'male' | 'female'
    arcana_numbers TEXT NOT NULL,   -- JSON array of the 22 arcana
    matrix_data    TEXT NOT NULL,   -- JSON-encoded MatrixCalculation
    created_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS payments (
    payment_id         TEXT PRIMARY KEY,
    user_id            TEXT,
    matrix_id          TEXT REFERENCES matrices(matrix_id),
    kind               TEXT NOT NULL,   -- 'full_unlock' | 'single_question'
    amount_cents       INTEGER NOT NULL,
    currency           TEXT NOT NULL DEFAULT 'EUR',
    provider_reference TEXT,
    status             TEXT NOT NULL DEFAULT 'pending',
    created_at         TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS subscriptions (
    subscription_id          TEXT PRIMARY KEY,
    user_id                  TEXT NOT NULL,
    provider_subscription_id TEXT,
    provider_customer_id     TEXT,
    status                   TEXT NOT NULL DEFAULT 'active',
    current_period_end       TEXT,
    created_at               TEXT NOT NULL,
    updated_at               TEXT NOT NULL
);

-- One interpretation per matrix; re-attaching replaces the row.
CREATE TABLE IF NOT EXISTS interpretations (
    matrix_id  TEXT PRIMARY KEY REFERENCES matrices(matrix_id),
    text       TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS questions (
    question_id TEXT PRIMARY KEY,
    matrix_id   TEXT NOT NULL REFERENCES matrices(matrix_id),
    user_id     TEXT NOT NULL,
    question    TEXT NOT NULL,
    answer      TEXT,
    payment_id  TEXT REFERENCES payments(payment_id),
    created_at  TEXT NOT NULL,
    UNIQUE (payment_id)
);

CREATE INDEX IF NOT EXISTS matrices_user_idx      ON matrices(user_id);
CREATE INDEX IF NOT EXISTS payments_matrix_idx    ON payments(matrix_id);
CREATE INDEX IF NOT EXISTS subscriptions_user_idx ON subscriptions(user_id);
CREATE INDEX IF NOT EXISTS questions_matrix_idx   ON questions(matrix_id);

PRAGMA user_version = 1;
";
