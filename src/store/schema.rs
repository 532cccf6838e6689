// SPDX-License-Identifier: MPL-2.0

/// SQL schema for the local store
pub const SCHEMA: &str = r#"
PRAGMA user_version = 1;

-- kv: one row per namespaced key (session, password hashes, drafts)
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
"#;
