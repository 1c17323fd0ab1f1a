//! Request-scoped identity of whoever is acting.
//!
//! Every command resolves the invoking Discord account to a roster row and hands
//! the resulting [`Actor`] to the core explicitly; there is no session state.

use crate::{
    core::user,
    entities::{Role, user as user_entity},
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;

/// The roster member performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Roster id of the acting user
    pub user_id: i64,
    /// Display name
    pub name: String,
    /// Role that decides what the actor may do
    pub role: Role,
}

impl Actor {
    /// Builds an actor from a roster row.
    #[must_use]
    pub fn from_user(user: &user_entity::Model) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            role: user.role,
        }
    }

    /// Fails with [`Error::RoleNotPermitted`] unless the actor has the given role.
    pub fn require_role(&self, role: Role, action: &'static str) -> Result<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(Error::RoleNotPermitted {
                role: self.role,
                action,
            })
        }
    }
}

/// Resolves a Discord account to the roster member it is linked to.
pub async fn resolve(db: &DatabaseConnection, discord_id: &str) -> Result<Actor> {
    let user = user::find_by_discord_id(db, discord_id)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            reference: format!("Discord account {discord_id} is not on the roster"),
        })?;
    Ok(Actor::from_user(&user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_resolve_linked_account() -> Result<()> {
        let db = setup_test_db().await?;
        let tg = create_test_staff(&db, "Prof. S. P. Jadhav", Role::Tg).await?;

        let actor = resolve(&db, &discord_id_for(&tg.name)).await?;
        assert_eq!(actor.user_id, tg.id);
        assert_eq!(actor.role, Role::Tg);
        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_unknown_account() -> Result<()> {
        let db = setup_test_db().await?;
        let result = resolve(&db, "42").await;
        assert!(matches!(result, Err(Error::UserNotFound { .. })));
        Ok(())
    }

    #[test]
    fn test_require_role() {
        let actor = Actor {
            user_id: 1,
            name: "Dr. P. R. Sonawane".to_string(),
            role: Role::Hod,
        };
        assert!(actor.require_role(Role::Hod, "view all requests").is_ok());
        assert!(matches!(
            actor.require_role(Role::Student, "apply for leave"),
            Err(Error::RoleNotPermitted {
                role: Role::Hod,
                ..
            })
        ));
    }
}
