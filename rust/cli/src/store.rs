//! SQLite-backed rule library.
//!
//! Every load reads the whole library in a handful of queries and hands the
//! engine a snapshot; nothing is read lazily during evaluation.

use std::path::Path;

use rusqlite::{params, Connection, Row};
use tracing::{debug, warn};

use librarian_engine::errors::LibraryError;
use librarian_engine::format::{default_profiles, GameProfile};
use librarian_engine::library::{
    Document, LibrarySnapshot, LibraryStore, Spot, SpotDocumentLink, SpotLibrary, SpotProfileLink,
    SpotRule, Tag, TagDocumentLink, TagLibrary,
};
use librarian_engine::rules::TagRule;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS study_documents (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    path TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS study_tags (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS study_document_tags (
    document_id INTEGER NOT NULL REFERENCES study_documents(id) ON DELETE CASCADE,
    tag_id INTEGER NOT NULL REFERENCES study_tags(id) ON DELETE CASCADE,
    PRIMARY KEY (document_id, tag_id)
);
CREATE TABLE IF NOT EXISTS study_tag_rules (
    id INTEGER PRIMARY KEY,
    tag_id INTEGER NOT NULL REFERENCES study_tags(id) ON DELETE CASCADE,
    description TEXT,
    preflop_pattern TEXT,
    flop_pattern TEXT,
    turn_pattern TEXT,
    river_pattern TEXT,
    board_texture TEXT,
    min_effective_stack_bb REAL,
    max_effective_stack_bb REAL,
    game_class_pattern TEXT,
    game_variant_pattern TEXT,
    table_size_pattern TEXT,
    game_type_pattern TEXT,
    num_players INTEGER,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS poker_spots (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    description TEXT,
    created_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS spot_rules (
    id INTEGER PRIMARY KEY,
    spot_id INTEGER NOT NULL REFERENCES poker_spots(id) ON DELETE CASCADE,
    condition_type TEXT NOT NULL,
    condition_params TEXT NOT NULL DEFAULT '{}'
);
CREATE TABLE IF NOT EXISTS spot_document_links (
    spot_id INTEGER NOT NULL REFERENCES poker_spots(id) ON DELETE CASCADE,
    document_id INTEGER NOT NULL REFERENCES study_documents(id) ON DELETE CASCADE,
    is_default INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (spot_id, document_id)
);
CREATE TABLE IF NOT EXISTS game_profiles (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE COLLATE NOCASE,
    game_class TEXT NOT NULL,
    game_variant TEXT NOT NULL,
    table_size TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS spot_profile_links (
    spot_id INTEGER NOT NULL REFERENCES poker_spots(id) ON DELETE CASCADE,
    profile_id INTEGER NOT NULL REFERENCES game_profiles(id) ON DELETE CASCADE,
    PRIMARY KEY (spot_id, profile_id)
);
";

fn now_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn lib_err(context: &str, e: impl std::fmt::Display) -> LibraryError {
    LibraryError::new(format!("{}: {}", context, e))
}

/// Row counts written by [`SqliteStore::import`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ImportSummary {
    pub documents: usize,
    pub tags: usize,
    pub tag_rules: usize,
    pub spots: usize,
    pub spot_rules: usize,
    pub profiles: usize,
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, LibraryError> {
        let conn = Connection::open(path)
            .map_err(|e| lib_err(&format!("Failed to open {}", path.display()), e))?;
        Self::configure(conn)
    }

    /// Opens an existing library without creating the file.
    pub fn open_existing(path: &Path) -> Result<Self, LibraryError> {
        if !path.exists() {
            return Err(LibraryError::new(format!(
                "{} does not exist (run `librarian init` first)",
                path.display()
            )));
        }
        Self::open(path)
    }

    pub fn open_in_memory() -> Result<Self, LibraryError> {
        let conn = Connection::open_in_memory().map_err(|e| lib_err("Failed to open database", e))?;
        Self::configure(conn)
    }

    fn configure(conn: Connection) -> Result<Self, LibraryError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| lib_err("Failed to configure database", e))?;
        Ok(Self { conn })
    }

    /// Creates missing tables and seeds the default game profiles. Idempotent.
    pub fn init(&self) -> Result<(), LibraryError> {
        self.conn
            .execute_batch(SCHEMA)
            .map_err(|e| lib_err("Failed to create schema", e))?;
        for profile in default_profiles() {
            insert_profile(&self.conn, &profile, false)?;
        }
        debug!("library schema ready");
        Ok(())
    }

    /// Writes a whole snapshot in one transaction.
    ///
    /// Documents, tags and spots with existing ids are updated in place so the
    /// rules and links that hang off them survive. A name already taken by a
    /// different id fails the import.
    pub fn import(&mut self, snapshot: &LibrarySnapshot) -> Result<ImportSummary, LibraryError> {
        self.init()?;
        let now = now_iso();
        let tx = self
            .conn
            .transaction()
            .map_err(|e| lib_err("Failed to start transaction", e))?;

        for d in &snapshot.documents {
            tx.execute(
                "INSERT INTO study_documents (id, title, path, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET title = excluded.title, path = excluded.path",
                params![d.id, d.title, d.path, now],
            )
            .map_err(|e| lib_err(&format!("Failed to insert document {}", d.id), e))?;
        }
        for t in &snapshot.tags {
            tx.execute(
                "INSERT INTO study_tags (id, name, description, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET name = excluded.name,
                     description = excluded.description",
                params![t.id, t.name, t.description, now],
            )
            .map_err(|e| lib_err(&format!("Failed to insert tag {}", t.id), e))?;
        }
        for l in &snapshot.tag_documents {
            tx.execute(
                "INSERT OR REPLACE INTO study_document_tags (document_id, tag_id) VALUES (?1, ?2)",
                params![l.document_id, l.tag_id],
            )
            .map_err(|e| lib_err("Failed to link tag document", e))?;
        }
        for r in &snapshot.tag_rules {
            tx.execute(
                "INSERT OR REPLACE INTO study_tag_rules (id, tag_id, description,
                 preflop_pattern, flop_pattern, turn_pattern, river_pattern, board_texture,
                 min_effective_stack_bb, max_effective_stack_bb, game_class_pattern,
                 game_variant_pattern, table_size_pattern, game_type_pattern, num_players,
                 created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                params![
                    r.id,
                    r.tag_id,
                    r.description,
                    r.preflop_pattern,
                    r.flop_pattern,
                    r.turn_pattern,
                    r.river_pattern,
                    r.board_texture,
                    r.min_effective_stack_bb,
                    r.max_effective_stack_bb,
                    r.game_class_pattern,
                    r.game_variant_pattern,
                    r.table_size_pattern,
                    r.game_type_pattern,
                    r.num_players,
                    now,
                ],
            )
            .map_err(|e| lib_err(&format!("Failed to insert tag rule {}", r.id), e))?;
        }
        for s in &snapshot.spots {
            tx.execute(
                "INSERT INTO poker_spots (id, name, description, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET name = excluded.name,
                     description = excluded.description",
                params![s.id, s.name, s.description, now],
            )
            .map_err(|e| lib_err(&format!("Failed to insert spot {}", s.id), e))?;
        }
        for r in &snapshot.spot_rules {
            let params_json = serde_json::to_string(&r.condition_params)
                .map_err(|e| lib_err(&format!("Failed to encode spot rule {}", r.id), e))?;
            tx.execute(
                "INSERT OR REPLACE INTO spot_rules (id, spot_id, condition_type, condition_params)
                 VALUES (?1, ?2, ?3, ?4)",
                params![r.id, r.spot_id, r.condition_type, params_json],
            )
            .map_err(|e| lib_err(&format!("Failed to insert spot rule {}", r.id), e))?;
        }
        for l in &snapshot.spot_documents {
            tx.execute(
                "INSERT OR REPLACE INTO spot_document_links (spot_id, document_id, is_default)
                 VALUES (?1, ?2, ?3)",
                params![l.spot_id, l.document_id, l.is_default],
            )
            .map_err(|e| lib_err("Failed to link spot document", e))?;
        }
        for p in &snapshot.profiles {
            insert_profile(&tx, p, true)?;
        }
        for l in &snapshot.spot_profiles {
            let linked = tx
                .execute(
                    "INSERT OR IGNORE INTO spot_profile_links (spot_id, profile_id)
                     SELECT ?1, id FROM game_profiles WHERE name = ?2",
                    params![l.spot_id, l.profile_name],
                )
                .map_err(|e| lib_err("Failed to link spot profile", e))?;
            if linked == 0 && !profile_exists(&tx, &l.profile_name)? {
                return Err(LibraryError::new(format!(
                    "Unknown game profile '{}' for spot {}",
                    l.profile_name, l.spot_id
                )));
            }
        }

        tx.commit().map_err(|e| lib_err("Failed to commit import", e))?;

        Ok(ImportSummary {
            documents: snapshot.documents.len(),
            tags: snapshot.tags.len(),
            tag_rules: snapshot.tag_rules.len(),
            spots: snapshot.spots.len(),
            spot_rules: snapshot.spot_rules.len(),
            profiles: snapshot.profiles.len(),
        })
    }

    fn query_all<T>(
        &self,
        what: &str,
        sql: &str,
        map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>, LibraryError> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| lib_err(&format!("Failed to read {}", what), e))?;
        let rows = stmt
            .query_map([], map)
            .map_err(|e| lib_err(&format!("Failed to read {}", what), e))?;
        rows.collect::<rusqlite::Result<Vec<T>>>()
            .map_err(|e| lib_err(&format!("Failed to read {}", what), e))
    }

    fn documents(&self) -> Result<Vec<Document>, LibraryError> {
        self.query_all(
            "documents",
            "SELECT id, title, path FROM study_documents ORDER BY id",
            |row| {
                Ok(Document {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    path: row.get(2)?,
                })
            },
        )
    }

    fn profiles(&self) -> Result<Vec<GameProfile>, LibraryError> {
        let raw = self.query_all(
            "game profiles",
            "SELECT name, game_class, game_variant, table_size FROM game_profiles ORDER BY id",
            |row| {
                Ok(serde_json::json!({
                    "name": row.get::<_, String>(0)?,
                    "game_class": row.get::<_, String>(1)?,
                    "game_variant": row.get::<_, String>(2)?,
                    "table_size": row.get::<_, String>(3)?,
                }))
            },
        )?;
        raw.into_iter()
            .map(|v| serde_json::from_value(v).map_err(|e| lib_err("Invalid game profile", e)))
            .collect()
    }
}

fn insert_profile(conn: &Connection, profile: &GameProfile, replace: bool) -> Result<(), LibraryError> {
    let sql = if replace {
        "INSERT INTO game_profiles (name, game_class, game_variant, table_size)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(name) DO UPDATE SET game_class = excluded.game_class,
             game_variant = excluded.game_variant, table_size = excluded.table_size"
    } else {
        "INSERT OR IGNORE INTO game_profiles (name, game_class, game_variant, table_size)
         VALUES (?1, ?2, ?3, ?4)"
    };
    conn.execute(
        sql,
        params![
            profile.name,
            profile.format.game_class.as_str(),
            profile.format.game_variant.as_str(),
            profile.format.table_size.as_str(),
        ],
    )
    .map_err(|e| lib_err(&format!("Failed to store profile '{}'", profile.name), e))?;
    Ok(())
}

fn profile_exists(conn: &Connection, name: &str) -> Result<bool, LibraryError> {
    conn.query_row(
        "SELECT COUNT(*) FROM game_profiles WHERE name = ?1",
        params![name],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n > 0)
    .map_err(|e| lib_err("Failed to look up profile", e))
}

fn parse_condition_params(rule_id: i64, raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(rule_id, error = %e, "spot rule params are not valid JSON");
        serde_json::Value::Null
    })
}

impl LibraryStore for SqliteStore {
    fn load_tag_library(&self) -> Result<TagLibrary, LibraryError> {
        let tags = self.query_all(
            "tags",
            "SELECT id, name, description FROM study_tags ORDER BY id",
            |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                })
            },
        )?;
        let rules = self.query_all(
            "tag rules",
            "SELECT id, tag_id, description, preflop_pattern, flop_pattern, turn_pattern,
                    river_pattern, board_texture, min_effective_stack_bb,
                    max_effective_stack_bb, game_class_pattern, game_variant_pattern,
                    table_size_pattern, game_type_pattern, num_players
             FROM study_tag_rules ORDER BY id",
            |row| {
                Ok(TagRule {
                    id: row.get(0)?,
                    tag_id: row.get(1)?,
                    description: row.get(2)?,
                    preflop_pattern: row.get(3)?,
                    flop_pattern: row.get(4)?,
                    turn_pattern: row.get(5)?,
                    river_pattern: row.get(6)?,
                    board_texture: row.get(7)?,
                    min_effective_stack_bb: row.get(8)?,
                    max_effective_stack_bb: row.get(9)?,
                    game_class_pattern: row.get(10)?,
                    game_variant_pattern: row.get(11)?,
                    table_size_pattern: row.get(12)?,
                    game_type_pattern: row.get(13)?,
                    num_players: row.get(14)?,
                })
            },
        )?;
        let links = self.query_all(
            "tag documents",
            "SELECT tag_id, document_id FROM study_document_tags ORDER BY tag_id, document_id",
            |row| {
                Ok(TagDocumentLink {
                    tag_id: row.get(0)?,
                    document_id: row.get(1)?,
                })
            },
        )?;
        let library = TagLibrary {
            tags,
            rules,
            documents: self.documents()?,
            links,
        };
        debug!(tags = library.tags.len(), rules = library.rules.len(), "loaded tag library");
        Ok(library)
    }

    fn load_spot_library(&self) -> Result<SpotLibrary, LibraryError> {
        let spots = self.query_all(
            "spots",
            "SELECT id, name, description FROM poker_spots ORDER BY id",
            |row| {
                Ok(Spot {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                })
            },
        )?;
        let rules = self.query_all(
            "spot rules",
            "SELECT id, spot_id, condition_type, condition_params FROM spot_rules ORDER BY id",
            |row| {
                let id: i64 = row.get(0)?;
                let raw: String = row.get(3)?;
                Ok(SpotRule {
                    id,
                    spot_id: row.get(1)?,
                    condition_type: row.get(2)?,
                    condition_params: parse_condition_params(id, &raw),
                })
            },
        )?;
        let links = self.query_all(
            "spot documents",
            "SELECT spot_id, document_id, is_default FROM spot_document_links
             ORDER BY spot_id, document_id",
            |row| {
                Ok(SpotDocumentLink {
                    spot_id: row.get(0)?,
                    document_id: row.get(1)?,
                    is_default: row.get(2)?,
                })
            },
        )?;
        let profile_links = self.query_all(
            "spot profiles",
            "SELECT l.spot_id, p.name FROM spot_profile_links l
             JOIN game_profiles p ON p.id = l.profile_id ORDER BY l.spot_id, p.id",
            |row| {
                Ok(SpotProfileLink {
                    spot_id: row.get(0)?,
                    profile_name: row.get(1)?,
                })
            },
        )?;
        let library = SpotLibrary {
            spots,
            rules,
            documents: self.documents()?,
            links,
            profiles: self.profiles()?,
            profile_links,
        };
        debug!(spots = library.spots.len(), rules = library.rules.len(), "loaded spot library");
        Ok(library)
    }
}
