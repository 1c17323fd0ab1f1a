//! Roster seeding from the `[[users]]` entries of config.toml.
//!
//! Entries reference each other by `key`, so a student can name their Teacher
//! Guardian and Class Coordinator without knowing database ids. The roster is
//! only written into an empty database; after that the database is the source
//! of truth.

use crate::{
    core::user::{self, NewUser},
    entities::Role,
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use tracing::{info, instrument};

/// One roster member as written in config.toml
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RosterEntry {
    /// Identifier other entries use to reference this one
    pub key: String,
    /// Display name
    pub name: String,
    /// Role on the roster
    pub role: Role,
    /// Linked Discord account
    #[serde(default)]
    pub discord_id: Option<String>,
    /// Roll number, students only
    #[serde(default)]
    pub roll_no: Option<i32>,
    /// Batch label
    #[serde(default)]
    pub batch: Option<String>,
    /// Attendance percentage, students only
    #[serde(default)]
    pub attendance: Option<f64>,
    /// Key of the student's Teacher Guardian
    #[serde(default)]
    pub tg: Option<String>,
    /// Key of the student's Class Coordinator
    #[serde(default)]
    pub cc: Option<String>,
}

/// Writes the roster into an empty database.
///
/// Approvers are inserted before students so that the students' links resolve.
/// The whole roster is written in one transaction. Returns how many users were
/// created, which is zero when the database already has a roster.
#[instrument(skip(db, entries), fields(entries = entries.len()))]
pub async fn seed_roster(db: &DatabaseConnection, entries: &[RosterEntry]) -> Result<usize> {
    if !user::roster_is_empty(db).await? {
        info!("Roster already present, skipping seed.");
        return Ok(0);
    }

    let mut keys = HashSet::new();
    for entry in entries {
        if !keys.insert(entry.key.as_str()) {
            return Err(Error::Config {
                message: format!("Duplicate roster key '{}'", entry.key),
            });
        }
    }

    let mut ids: HashMap<&str, i64> = HashMap::new();

    let txn = db.begin().await?;

    let (students, staff): (Vec<&RosterEntry>, Vec<&RosterEntry>) = entries
        .iter()
        .partition(|entry| entry.role == Role::Student);

    for entry in staff {
        if entry.tg.is_some() || entry.cc.is_some() {
            return Err(Error::Config {
                message: format!(
                    "Roster entry '{}' is a {} and cannot have a tg or cc",
                    entry.key, entry.role
                ),
            });
        }
        let created = user::create_user(&txn, new_user_from(entry, None, None)).await?;
        ids.insert(entry.key.as_str(), created.id);
    }

    for entry in &students {
        let tg_id = resolve_key(&ids, entry, entry.tg.as_deref())?;
        let cc_id = resolve_key(&ids, entry, entry.cc.as_deref())?;
        user::create_user(&txn, new_user_from(entry, tg_id, cc_id)).await?;
    }

    txn.commit().await?;

    info!("Seeded roster with {} users.", entries.len());
    Ok(entries.len())
}

fn resolve_key(
    ids: &HashMap<&str, i64>,
    entry: &RosterEntry,
    key: Option<&str>,
) -> Result<Option<i64>> {
    let Some(key) = key else {
        return Ok(None);
    };
    match ids.get(key) {
        Some(&id) => Ok(Some(id)),
        None => Err(Error::Config {
            message: format!(
                "Roster entry '{}' references unknown approver '{key}'",
                entry.key
            ),
        }),
    }
}

fn new_user_from(entry: &RosterEntry, tg_id: Option<i64>, cc_id: Option<i64>) -> NewUser {
    NewUser {
        name: entry.name.clone(),
        role: entry.role,
        discord_id: entry.discord_id.clone(),
        roll_no: entry.roll_no,
        batch: entry.batch.clone(),
        attendance: entry.attendance,
        tg_id,
        cc_id,
    }
}
