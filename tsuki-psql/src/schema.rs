pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS guilds (
  guild_id BIGINT PRIMARY KEY,
  prefix VARCHAR(5) NOT NULL DEFAULT '?',
  joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS tags (
  tag_id SERIAL PRIMARY KEY,
  guild_id BIGINT NOT NULL REFERENCES guilds (guild_id) ON DELETE CASCADE,
  owner_id BIGINT NOT NULL,
  name VARCHAR(100) NOT NULL,
  content TEXT NOT NULL,
  uses INTEGER NOT NULL DEFAULT 0,
  created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
  UNIQUE (guild_id, name)
);

CREATE TABLE IF NOT EXISTS notes (
  note_id SERIAL PRIMARY KEY,
  author_id BIGINT NOT NULL,
  content TEXT NOT NULL,
  created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS notes_author_idx ON notes (author_id);

CREATE TABLE IF NOT EXISTS command_usage (
  name VARCHAR(32) PRIMARY KEY,
  uses BIGINT NOT NULL DEFAULT 0,
  last_used TIMESTAMPTZ
);
"#;
