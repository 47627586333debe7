//! SQL schema for the Reclaim SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,    -- argon2 PHC string
    is_admin      INTEGER NOT NULL DEFAULT 0,
    email         TEXT NOT NULL,
    phone         TEXT,
    registered_at TEXT NOT NULL     -- ISO 8601 UTC; server-assigned
);

-- Posts are never deleted. Moderation flips `status`; approving a claim
-- flips `claimed`. No other writes are issued against existing rows.
CREATE TABLE IF NOT EXISTS posts (
    post_id     TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL REFERENCES users(user_id),
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    image_ref   TEXT,               -- opaque media-store reference
    location    TEXT,
    date_found  TEXT,               -- ISO 8601 calendar date
    status      TEXT NOT NULL DEFAULT 'pending',   -- 'pending' | 'published'
    claimed     TEXT NOT NULL DEFAULT 'unclaimed', -- 'unclaimed' | 'claimed'
    posted_at   TEXT NOT NULL
);

-- A rejected claim is deleted outright, so rows are only ever 'pending'
-- or 'approved'. At most one approved claim can exist per post.
CREATE TABLE IF NOT EXISTS claims (
    claim_id     TEXT PRIMARY KEY,
    post_id      TEXT NOT NULL REFERENCES posts(post_id),
    claimant_id  TEXT NOT NULL REFERENCES users(user_id),
    reason       TEXT NOT NULL,
    contact_info TEXT NOT NULL,
    status       TEXT NOT NULL DEFAULT 'pending',  -- 'pending' | 'approved'
    filed_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS posts_owner_idx  ON posts(owner_id);
CREATE INDEX IF NOT EXISTS posts_status_idx ON posts(status);
CREATE INDEX IF NOT EXISTS claims_post_idx  ON claims(post_id);

PRAGMA user_version = 1;
";
