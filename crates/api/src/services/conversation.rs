//! Inbound SMS routing.
//!
//! Every message lands here. Keyword commands are matched first; anything
//! else from a registered user is treated as a catalog search.

use std::sync::Arc;

use domain::services::{Catalog, SmsSender};
use persistence::repositories::UserRepository;
use sqlx::PgPool;

use crate::middleware::record_inbound_sms;
use crate::services::registration::RegistrationService;
use crate::services::renewal::{NoticeCommand, RenewalService};
use crate::services::search::SearchService;
use crate::twiml::Twiml;

const UNREGISTERED_SEARCH_REPLY: &str =
    "You are not registered to make media requests. Please contact your media server administrator.";
const UNREGISTERED_SELECT_REPLY: &str = "You are not registered to make media requests.";

/// What an inbound message asks for, decided before any state is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ConfirmRegistration,
    HelpOrStart,
    Deregister,
    Renew(Option<usize>),
    Delete(Option<usize>),
    Select(usize),
    Search,
}

impl Intent {
    fn label(&self) -> &'static str {
        match self {
            Intent::ConfirmRegistration => "confirm_registration",
            Intent::HelpOrStart => "help_or_start",
            Intent::Deregister => "deregister",
            Intent::Renew(_) => "renew",
            Intent::Delete(_) => "delete",
            Intent::Select(_) => "select",
            Intent::Search => "search",
        }
    }
}

/// Classify a raw message body. Keyword matching is case-insensitive;
/// "renew"/"delete" require a trailing space so a bare keyword still falls
/// through to search.
pub fn classify(body: &str) -> Intent {
    let normalized = body.trim().to_lowercase();

    if normalized == "yes" {
        return Intent::ConfirmRegistration;
    }
    if normalized == "help" || normalized == "start" {
        return Intent::HelpOrStart;
    }
    if normalized == "deregister" {
        return Intent::Deregister;
    }
    if let Some(rest) = normalized.strip_prefix("renew ") {
        return Intent::Renew(parse_item_number(rest));
    }
    if let Some(rest) = normalized.strip_prefix("delete ") {
        return Intent::Delete(parse_item_number(rest));
    }
    if normalized.len() == 1 {
        if let Some(digit @ 1..=5) = normalized.chars().next().and_then(|c| c.to_digit(10)) {
            return Intent::Select(digit as usize);
        }
    }
    Intent::Search
}

fn parse_item_number(rest: &str) -> Option<usize> {
    rest.trim().parse::<usize>().ok().filter(|n| *n >= 1)
}

/// Dispatches classified messages to the registration, search, and renewal
/// services and wraps the reply as TwiML.
pub struct ConversationService {
    users: UserRepository,
    registration: RegistrationService,
    search: SearchService,
    renewal: RenewalService,
}

impl ConversationService {
    pub fn new(pool: PgPool, catalog: Arc<dyn Catalog>, sms: Arc<dyn SmsSender>) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            registration: RegistrationService::new(pool.clone(), sms),
            search: SearchService::new(pool.clone(), catalog),
            renewal: RenewalService::new(pool),
        }
    }

    pub async fn handle(&self, from: &str, body: &str) -> Result<Twiml, sqlx::Error> {
        let intent = classify(body);
        record_inbound_sms(intent.label());
        tracing::info!(from = %from, intent = intent.label(), "Inbound SMS");

        let reply = match intent {
            Intent::ConfirmRegistration => self.registration.confirm(from).await?,
            Intent::HelpOrStart => return Ok(Twiml::Empty),
            Intent::Deregister => self.registration.deregister(from).await?,
            Intent::Renew(index) => {
                self.renewal.handle(from, NoticeCommand::Renew, index).await?
            }
            Intent::Delete(index) => {
                self.renewal.handle(from, NoticeCommand::Delete, index).await?
            }
            Intent::Select(digit) => match self.users.find_active_by_phone(from).await? {
                Some(user) => self.search.select(&user, digit).await?,
                None => UNREGISTERED_SELECT_REPLY.to_string(),
            },
            Intent::Search => match self.users.find_active_by_phone(from).await? {
                Some(user) => self.search.search(&user, body).await?,
                None => UNREGISTERED_SEARCH_REPLY.to_string(),
            },
        };

        Ok(Twiml::message(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_yes_any_case() {
        assert_eq!(classify("YES"), Intent::ConfirmRegistration);
        assert_eq!(classify("  yes "), Intent::ConfirmRegistration);
    }

    #[test]
    fn test_classify_help_and_start() {
        assert_eq!(classify("help"), Intent::HelpOrStart);
        assert_eq!(classify("START"), Intent::HelpOrStart);
    }

    #[test]
    fn test_classify_deregister() {
        assert_eq!(classify("Deregister"), Intent::Deregister);
    }

    #[test]
    fn test_classify_renew_with_number() {
        assert_eq!(classify("RENEW 2"), Intent::Renew(Some(2)));
        assert_eq!(classify("renew  3 "), Intent::Renew(Some(3)));
    }

    #[test]
    fn test_classify_renew_without_number() {
        assert_eq!(classify("renew abc"), Intent::Renew(None));
        assert_eq!(classify("renew 0"), Intent::Renew(None));
    }

    #[test]
    fn test_classify_bare_renew_is_search() {
        assert_eq!(classify("renew"), Intent::Search);
    }

    #[test]
    fn test_classify_delete() {
        assert_eq!(classify("delete 1"), Intent::Delete(Some(1)));
        assert_eq!(classify("DELETE x"), Intent::Delete(None));
    }

    #[test]
    fn test_classify_digit_selection() {
        assert_eq!(classify("1"), Intent::Select(1));
        assert_eq!(classify(" 5 "), Intent::Select(5));
    }

    #[test]
    fn test_classify_out_of_range_digit_is_search() {
        assert_eq!(classify("6"), Intent::Search);
        assert_eq!(classify("0"), Intent::Search);
    }

    #[test]
    fn test_classify_multi_digit_is_search() {
        assert_eq!(classify("12"), Intent::Search);
    }

    #[test]
    fn test_classify_free_text_is_search() {
        assert_eq!(classify("The Matrix"), Intent::Search);
        assert_eq!(classify("yes please"), Intent::Search);
    }
}
