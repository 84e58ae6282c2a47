//! Chat-export import. Loads a Slack-style export directory and bulk-inserts
//! channels, users, and messages.
//!
//! Layout: `<root>/<channel-name>/<YYYY-MM-DD>.json`, each file a JSON array of
//! message objects. JSON files directly under `<root>` (users.json,
//! channels.json, ...) are export metadata and are skipped.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;
use tracing::{debug, info};

/// Messages are inserted this many rows per statement.
pub const MESSAGE_BATCH_SIZE: usize = 100;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelRecord {
    pub id: String,
    pub name: String,
    pub is_channel: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageRecord {
    pub id: String,
    pub channel_id: String,
    pub user_id: String,
    pub text: String,
    pub ts: String,
    pub thread_ts: Option<String>,
    /// `None` when the message has no reactions.
    pub reactions: Option<Value>,
}

/// Everything read from one export, with ids assigned.
#[derive(Debug, Default, Serialize)]
pub struct ExportSnapshot {
    pub channels: Vec<ChannelRecord>,
    pub users: Vec<UserRecord>,
    pub messages: Vec<MessageRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub channels: usize,
    pub users: usize,
    pub messages: usize,
}

/// Reads an export directory. Channel ids are `C{n}` in sorted directory
/// order, message ids `M{n}` in file order; messages without a `user` are dropped.
pub fn load_export(root: &Path) -> Result<ExportSnapshot, ImportError> {
    let mut files = Vec::new();
    collect_json_files(root, &mut files)?;
    files.sort();

    let mut channel_ids: BTreeMap<String, String> = BTreeMap::new();
    let mut snapshot = ExportSnapshot::default();
    let mut users: BTreeSet<String> = BTreeSet::new();

    for file in files {
        let Some(channel_dir) = file.parent() else {
            continue;
        };
        if channel_dir == root {
            debug!("Skipping export metadata file {}", file.display());
            continue;
        }
        let channel_name = channel_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let channel_id = match channel_ids.get(&channel_name) {
            Some(id) => id.clone(),
            None => {
                let id = format!("C{}", snapshot.channels.len());
                snapshot.channels.push(ChannelRecord {
                    id: id.clone(),
                    name: channel_name.clone(),
                    is_channel: true,
                });
                channel_ids.insert(channel_name, id.clone());
                id
            }
        };

        let raw = fs::read_to_string(&file).map_err(|source| ImportError::Io {
            path: file.clone(),
            source,
        })?;
        let parsed: Value = serde_json::from_str(&raw).map_err(|source| ImportError::Json {
            path: file.clone(),
            source,
        })?;

        for message in parsed.as_array().into_iter().flatten() {
            if let Some(record) =
                message_record(message, &channel_id, snapshot.messages.len())
            {
                users.insert(record.user_id.clone());
                snapshot.messages.push(record);
            }
        }
    }

    snapshot.users = users
        .into_iter()
        .map(|id| UserRecord {
            name: id.clone(),
            id,
        })
        .collect();

    info!(
        "Found {} channels, {} users, and {} messages",
        snapshot.channels.len(),
        snapshot.users.len(),
        snapshot.messages.len()
    );

    Ok(snapshot)
}

fn message_record(message: &Value, channel_id: &str, index: usize) -> Option<MessageRecord> {
    let object = message.as_object()?;
    let user_id = object.get("user")?.as_str()?.to_string();

    let reactions = object
        .get("reactions")
        .filter(|r| r.as_array().is_some_and(|a| !a.is_empty()))
        .cloned();

    Some(MessageRecord {
        id: format!("M{index}"),
        channel_id: channel_id.to_string(),
        user_id,
        text: string_field(object, "text").unwrap_or_default(),
        ts: string_field(object, "ts").unwrap_or_default(),
        thread_ts: string_field(object, "thread_ts"),
        reactions,
    })
}

fn string_field(object: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn collect_json_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ImportError> {
    let entries = fs::read_dir(dir).map_err(|source| ImportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let path = entry
            .map_err(|source| ImportError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        if path.is_dir() {
            collect_json_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            out.push(path);
        }
    }

    Ok(())
}

/// Inserts channels, then users, then messages in batches. Existing ids are
/// left untouched. Not transactional: a failure mid-way leaves earlier rows.
pub async fn import_snapshot(
    pool: &PgPool,
    snapshot: &ExportSnapshot,
) -> Result<ImportSummary, ImportError> {
    for channel in &snapshot.channels {
        sqlx::query(
            "INSERT INTO channels (id, name, is_channel) VALUES ($1, $2, $3) ON CONFLICT (id) DO NOTHING",
        )
        .bind(&channel.id)
        .bind(&channel.name)
        .bind(channel.is_channel)
        .execute(pool)
        .await?;
        debug!("Inserted channel {}", channel.name);
    }

    for user in &snapshot.users {
        sqlx::query("INSERT INTO users (id, name) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING")
            .bind(&user.id)
            .bind(&user.name)
            .execute(pool)
            .await?;
    }

    for batch in snapshot.messages.chunks(MESSAGE_BATCH_SIZE) {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO messages (id, channel_id, user_id, text, ts, thread_ts, reactions) ",
        );
        builder.push_values(batch, |mut row, message| {
            row.push_bind(message.id.clone())
                .push_bind(message.channel_id.clone())
                .push_bind(message.user_id.clone())
                .push_bind(message.text.clone())
                .push_bind(message.ts.clone())
                .push_bind(message.thread_ts.clone())
                .push_bind(message.reactions.clone());
        });
        builder.push(" ON CONFLICT (id) DO NOTHING");
        builder.build().execute(pool).await?;
        info!("Inserted {} messages", batch.len());
    }

    Ok(ImportSummary {
        channels: snapshot.channels.len(),
        users: snapshot.users.len(),
        messages: snapshot.messages.len(),
    })
}
