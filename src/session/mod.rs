use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::models::{Restaurant, User};
use crate::services::matching::{MatchingError, MatchingService};

/// Outcome state of the request in flight (or settled) for a session
///
/// `Idle → Sending → Accepted | Rejected | Failed`; `reset` is the only
/// way back to `Idle`. Only one outcome is live at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStatus {
    Idle,
    Sending,
    Accepted,
    Rejected,
    Failed(String),
}

/// One matching session: a restaurant, a proposed meal time, the
/// discovered candidates, and at most one live match request.
///
/// All mutable state is owned by the session and driven from a single
/// logical flow. Requests are guarded by a generation counter: issuing a
/// new request supersedes the previous one, and a superseded completion
/// is dropped rather than applied.
pub struct MatchSession {
    restaurant: Restaurant,
    proposed_time: DateTime<Utc>,
    candidates: Vec<User>,
    selected: Option<User>,
    status: MatchStatus,
    generation: u64,
}

impl MatchSession {
    pub fn new(restaurant: Restaurant, proposed_time: DateTime<Utc>) -> Self {
        Self {
            restaurant,
            proposed_time,
            candidates: Vec::new(),
            selected: None,
            status: MatchStatus::Idle,
            generation: 0,
        }
    }

    pub fn restaurant(&self) -> &Restaurant {
        &self.restaurant
    }

    pub fn proposed_time(&self) -> DateTime<Utc> {
        self.proposed_time
    }

    pub fn candidates(&self) -> &[User] {
        &self.candidates
    }

    pub fn selected(&self) -> Option<&User> {
        self.selected.as_ref()
    }

    pub fn status(&self) -> &MatchStatus {
        &self.status
    }

    /// Discover nearby candidates for this session's restaurant and time.
    ///
    /// Replaces any previously discovered candidate list.
    pub async fn discover(&mut self, service: &MatchingService) -> Result<&[User], MatchingError> {
        self.candidates.clear();
        let users = service
            .find_matches(&self.restaurant, self.proposed_time)
            .await?;
        debug!(
            "session at {} has {} candidates",
            self.restaurant.name,
            users.len()
        );
        self.candidates = users;
        Ok(&self.candidates)
    }

    /// Issue a match request to `user` and apply the outcome.
    ///
    /// Any outcome from a previously issued request is discarded the
    /// moment this starts.
    pub async fn send_request(&mut self, service: &MatchingService, user: User) {
        let user_id = user.id.clone();
        let token = self.begin_request(user);

        let result = service.send_match_request(&user_id).await;
        self.complete_request(token, result);
    }

    /// Record a new in-flight request and return its generation token.
    pub fn begin_request(&mut self, user: User) -> u64 {
        self.generation += 1;
        info!(
            "match request {} -> {} ({})",
            self.generation, user.nickname, user.id
        );
        self.selected = Some(user);
        self.status = MatchStatus::Sending;
        self.generation
    }

    /// Apply the outcome of the request started with `token`. Outcomes of
    /// superseded requests are dropped.
    pub fn complete_request(&mut self, token: u64, result: Result<bool, MatchingError>) {
        if token != self.generation {
            debug!(
                "dropping stale match outcome (token {}, current {})",
                token, self.generation
            );
            return;
        }

        self.status = match result {
            Ok(true) => MatchStatus::Accepted,
            Ok(false) => MatchStatus::Rejected,
            Err(e) => MatchStatus::Failed(e.to_string()),
        };
        debug!("match request {} settled as {:?}", token, self.status);
    }

    /// Clear the selection and return the session to `Idle`.
    pub fn reset(&mut self) {
        self.selected = None;
        self.status = MatchStatus::Idle;
    }
}
