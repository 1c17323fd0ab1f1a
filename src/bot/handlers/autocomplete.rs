//! Autocomplete handlers for Discord slash command parameters.
//!
//! Approvers pick a request from their own queue instead of typing an id.

use crate::{
    bot::{BotData, current_actor},
    core::{approval, leave, report},
    entities::leave_request,
    errors::Error,
};
use poise::serenity_prelude::AutocompleteChoice;
use std::collections::HashMap;
use tracing::debug;

/// Discord autocomplete limit
const MAX_CHOICES: usize = 25;
/// Discord limit on the length of a choice label
const MAX_LABEL_LEN: usize = 100;

/// Suggests requests from the invoking approver's pending queue.
///
/// Matches the typed text against the request id and the student's name.
/// Returns nothing for students and unknown accounts.
pub async fn autocomplete_pending_request(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<AutocompleteChoice> {
    let db = &ctx.data().database;

    let Ok(actor) = current_actor(ctx).await else {
        return Vec::new();
    };
    let queue = match approval::pending_queue(db, &actor).await {
        Ok(queue) => queue,
        Err(e) => {
            debug!("No queue for autocomplete: {}", e);
            return Vec::new();
        }
    };
    let Ok(names) = leave::student_names(db, &queue).await else {
        return Vec::new();
    };

    matching_requests(&queue, &names, partial)
        .into_iter()
        .map(|(label, id)| AutocompleteChoice::new(label, id))
        .collect()
}

/// Labels and ids of the queued requests matching the typed text.
fn matching_requests(
    queue: &[leave_request::Model],
    names: &HashMap<i64, String>,
    partial: &str,
) -> Vec<(String, i64)> {
    let partial_lower = partial.trim().trim_start_matches('#').to_lowercase();

    queue
        .iter()
        .filter_map(|request| {
            let name = names
                .get(&request.student_id)
                .map_or("Unknown student", String::as_str);
            let matches = request.id.to_string().starts_with(&partial_lower)
                || name.to_lowercase().contains(&partial_lower);
            matches.then(|| {
                let label = format!(
                    "#{} {name} | {}",
                    request.id,
                    report::format_date_range(request.from_date, request.to_date)
                );
                (label.chars().take(MAX_LABEL_LEN).collect(), request.id)
            })
        })
        .take(MAX_CHOICES)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::Result, test_utils::*};

    #[tokio::test]
    async fn test_matching_requests_by_id_and_name() -> Result<()> {
        let (db, roster) = setup_with_roster().await?;
        let first = submit_test_request(&db, &roster.eligible).await?;
        let other = create_test_student(&db, "Rahul More", 30, 91.0, &roster.tg, &roster.cc).await?;
        let second = submit_test_request(&db, &other).await?;

        let queue = approval::list_pending_for_tg(&db, roster.tg.id).await?;
        let names = leave::student_names(&db, &queue).await?;

        let all = matching_requests(&queue, &names, "");
        assert_eq!(all.len(), 2);
        assert_eq!(
            all[0].0,
            format!("#{} Pradnya Jadhav | 2026-10-20 → 2026-10-21 (2 days)", first.id)
        );

        let by_name = matching_requests(&queue, &names, "rahul");
        assert_eq!(by_name, vec![(by_name[0].0.clone(), second.id)]);

        let by_id = matching_requests(&queue, &names, &format!("#{}", first.id));
        assert!(by_id.iter().any(|(_, id)| *id == first.id));

        assert!(matching_requests(&queue, &names, "nobody").is_empty());
        Ok(())
    }
}
