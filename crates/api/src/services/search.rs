//! Catalog search and numeric selection handling.
//!
//! Both paths mutate the user's single pending-interaction slot. Writes are
//! guarded by the interaction version so two rapid replies from the same
//! sender cannot both consume the same slot.

use std::sync::Arc;

use chrono::Utc;
use domain::models::{CatalogItem, MediaKind, PendingInteraction, UserStatus};
use domain::services::Catalog;
use persistence::entities::media_request::NewMediaRequest;
use persistence::entities::UserEntity;
use persistence::repositories::{MediaRequestRepository, UserRepository};
use sqlx::PgPool;

pub const GENERIC_ERROR_REPLY: &str = "An error occurred. Please try again later.";
const NO_MATCHES_REPLY: &str = "No matches found. Would you like to:\n\n\
    1. Submit this as a custom request\n\
    2. Try searching with different terms\n\n\
    Reply with 1 or 2";
const NO_PENDING_SEARCH_REPLY: &str = "No pending search found. Please start a new request.";
const RETRY_SEARCH_REPLY: &str = "Please try your search again with different terms.";
const CUSTOM_REPROMPT_REPLY: &str =
    "Please reply with 1 to submit as custom request, or 2 to try again.";

/// Numbered list reply for a non-empty search.
pub fn format_search_results(results: &[CatalogItem]) -> String {
    let entries: Vec<String> = results
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let year = item
                .release_year
                .as_deref()
                .map(|y| format!(" ({})", y))
                .unwrap_or_default();
            let rating = item
                .rating
                .as_deref()
                .map(|r| format!(" \u{2022} Rating: {}/10", r))
                .unwrap_or_default();
            format!(
                "{}. {}{} - {}{}\n{}\n",
                index + 1,
                item.title,
                year,
                item.media_type.label(),
                rating,
                item.overview
            )
        })
        .collect();

    format!(
        "Best matches found:\n\n{}\nEnter a number (1-{}) to select",
        entries.join("\n"),
        results.len()
    )
}

fn submitted_reply(title: &str) -> String {
    format!(
        "Your request for \"{}\" has been submitted and will be reviewed by your media server administrator.",
        title
    )
}

fn custom_submitted_reply(title: &str) -> String {
    format!(
        "Your custom request for \"{}\" has been submitted and will be reviewed by your media server administrator.",
        title
    )
}

/// Handles the search branch and the digit-reply branch of the conversation.
pub struct SearchService {
    users: UserRepository,
    requests: MediaRequestRepository,
    catalog: Arc<dyn Catalog>,
}

impl SearchService {
    pub fn new(pool: PgPool, catalog: Arc<dyn Catalog>) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            requests: MediaRequestRepository::new(pool),
            catalog,
        }
    }

    /// Run a catalog search for an active user and stash the outcome as
    /// their pending interaction.
    ///
    /// A catalog failure is treated like an empty result: the user is offered
    /// the custom-request path rather than an error.
    pub async fn search(&self, user: &UserEntity, query: &str) -> Result<String, sqlx::Error> {
        let results = match self.catalog.search(query).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "Catalog search failed");
                Vec::new()
            }
        };

        let now = Utc::now();
        let interaction = if results.is_empty() {
            PendingInteraction::CustomRequest {
                title: query.to_string(),
                original_query: query.to_string(),
                timestamp: now,
            }
        } else {
            PendingInteraction::SearchResults {
                results: results.clone(),
                original_query: query.to_string(),
                timestamp: now,
            }
        };

        if !self.store_interaction(user, &interaction).await? {
            return Ok(GENERIC_ERROR_REPLY.to_string());
        }

        if results.is_empty() {
            Ok(NO_MATCHES_REPLY.to_string())
        } else {
            Ok(format_search_results(&results))
        }
    }

    /// Interpret a bare digit 1-5 against the user's pending interaction.
    pub async fn select(&self, user: &UserEntity, digit: usize) -> Result<String, sqlx::Error> {
        let interaction = match user.interaction() {
            Some(interaction) => interaction.clone(),
            None => return Ok(NO_PENDING_SEARCH_REPLY.to_string()),
        };

        match interaction {
            PendingInteraction::CustomRequest { title, .. } => match digit {
                1 => {
                    if !self.consume_interaction(user).await? {
                        return Ok(NO_PENDING_SEARCH_REPLY.to_string());
                    }
                    self.requests
                        .create(&custom_request(user, &title))
                        .await?;
                    tracing::info!(user_id = %user.id, title = %title, "Custom request submitted");
                    Ok(custom_submitted_reply(&title))
                }
                2 => {
                    if !self.consume_interaction(user).await? {
                        return Ok(NO_PENDING_SEARCH_REPLY.to_string());
                    }
                    Ok(RETRY_SEARCH_REPLY.to_string())
                }
                _ => Ok(CUSTOM_REPROMPT_REPLY.to_string()),
            },
            PendingInteraction::SearchResults { results, .. } => {
                let candidate = match digit.checked_sub(1).and_then(|i| results.get(i)) {
                    Some(candidate) => candidate.clone(),
                    None => {
                        return Ok(format!(
                            "Invalid selection. Please enter a number between 1 and {}.",
                            results.len()
                        ));
                    }
                };

                if !self.consume_interaction(user).await? {
                    return Ok(NO_PENDING_SEARCH_REPLY.to_string());
                }
                self.requests
                    .create(&catalog_request(user, &candidate))
                    .await?;
                tracing::info!(
                    user_id = %user.id,
                    tmdb_id = candidate.tmdb_id,
                    title = %candidate.title,
                    "Media request submitted"
                );
                Ok(submitted_reply(&candidate.title))
            }
        }
    }

    /// Store a new interaction, retrying once if another write moved the
    /// version underneath us. Overwriting someone else's fresh state is fine
    /// (newest turn wins); persistent contention gives up.
    async fn store_interaction(
        &self,
        user: &UserEntity,
        interaction: &PendingInteraction,
    ) -> Result<bool, sqlx::Error> {
        if self
            .users
            .set_pending_interaction(user.id, interaction, user.interaction_version)
            .await?
        {
            return Ok(true);
        }

        match self.users.find_by_id(user.id).await? {
            Some(fresh) if fresh.status == UserStatus::Active => {
                self.users
                    .set_pending_interaction(fresh.id, interaction, fresh.interaction_version)
                    .await
            }
            _ => Ok(false),
        }
    }

    /// Claim the pending interaction. Exactly one concurrent reply wins;
    /// the loser sees the slot already gone.
    async fn consume_interaction(&self, user: &UserEntity) -> Result<bool, sqlx::Error> {
        self.users
            .clear_pending_interaction(user.id, user.interaction_version)
            .await
    }
}

fn custom_request(user: &UserEntity, title: &str) -> NewMediaRequest {
    NewMediaRequest {
        tmdb_id: None,
        title: title.to_string(),
        media_type: MediaKind::Custom,
        overview: "Custom media request".to_string(),
        poster_path: None,
        release_year: None,
        rating: None,
        requester_id: user.id,
        requester_phone: user.phone_number.clone(),
        requester_nickname: user.nickname.clone(),
        manager_id: user.manager_id,
    }
}

fn catalog_request(user: &UserEntity, candidate: &CatalogItem) -> NewMediaRequest {
    NewMediaRequest {
        tmdb_id: Some(candidate.tmdb_id),
        title: candidate.title.clone(),
        media_type: candidate.media_type,
        overview: candidate.overview.clone(),
        poster_path: candidate.poster_path.clone(),
        release_year: candidate.release_year.clone(),
        rating: candidate.rating.clone(),
        requester_id: user.id,
        requester_phone: user.phone_number.clone(),
        requester_nickname: user.nickname.clone(),
        manager_id: user.manager_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, year: Option<&str>, rating: Option<&str>) -> CatalogItem {
        CatalogItem {
            tmdb_id: 1,
            title: title.to_string(),
            media_type: MediaKind::Movie,
            overview: "A thief who steals corporate secrets.".to_string(),
            release_year: year.map(str::to_string),
            rating: rating.map(str::to_string),
            poster_path: None,
        }
    }

    #[test]
    fn test_format_search_results_full_entry() {
        let results = vec![candidate("Inception", Some("2010"), Some("8.4"))];
        let formatted = format_search_results(&results);

        assert!(formatted.starts_with("Best matches found:\n\n"));
        assert!(formatted.contains("1. Inception (2010) - Movie \u{2022} Rating: 8.4/10"));
        assert!(formatted.contains("A thief who steals corporate secrets."));
        assert!(formatted.ends_with("Enter a number (1-1) to select"));
    }

    #[test]
    fn test_format_search_results_omits_missing_year_and_rating() {
        let results = vec![candidate("Obscure Film", None, None)];
        let formatted = format_search_results(&results);

        assert!(formatted.contains("1. Obscure Film - Movie\n"));
        assert!(!formatted.contains("()"));
        assert!(!formatted.contains("Rating:"));
    }

    #[test]
    fn test_format_search_results_numbers_all_entries() {
        let results = vec![
            candidate("First", None, None),
            candidate("Second", None, None),
            candidate("Third", None, None),
        ];
        let formatted = format_search_results(&results);

        assert!(formatted.contains("1. First"));
        assert!(formatted.contains("2. Second"));
        assert!(formatted.contains("3. Third"));
        assert!(formatted.ends_with("Enter a number (1-3) to select"));
    }

    #[test]
    fn test_submitted_replies_echo_title() {
        assert_eq!(
            submitted_reply("Inception"),
            "Your request for \"Inception\" has been submitted and will be reviewed by your media server administrator."
        );
        assert_eq!(
            custom_submitted_reply("Rare Documentary"),
            "Your custom request for \"Rare Documentary\" has been submitted and will be reviewed by your media server administrator."
        );
    }
}
