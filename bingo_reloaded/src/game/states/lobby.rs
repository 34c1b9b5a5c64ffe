use std::time::Instant;

use crate::{
    entities::PlayerId,
    errors::{SessionError, SessionResult},
    game::state_machine::{PhaseEvents, PhaseKind, PhaseLifecycle, SessionData},
    settings::{PlayerKit, VoteCategory, VoteTally, VoteTicket, parse_gamemode_token},
};

/// Lobby state - participants pick teams and vote on the next game
#[derive(Debug, Default)]
pub struct Lobby {
    tally: VoteTally,
    ended: bool,
}

impl Lobby {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a ballot. Options are checked against what the catalog and
    /// settings can actually express, so a ticket never holds junk.
    pub fn cast_vote(
        &mut self,
        data: &SessionData,
        player: PlayerId,
        category: VoteCategory,
        option: &str,
    ) -> SessionResult<()> {
        let canonical = match category {
            VoteCategory::Gamemode => parse_gamemode_token(option)
                .ok()
                .map(|(mode, size)| format!("{mode}_{}", size.side())),
            VoteCategory::Kit => option.parse::<PlayerKit>().ok().map(|kit| kit.to_string()),
            VoteCategory::Card => data.catalog.card(option).map(|card| card.name.clone()),
        };
        let Some(canonical) = canonical else {
            return Err(SessionError::InvalidVote {
                category: category.to_string(),
                option: option.to_string(),
            });
        };

        log::debug!("{}: vote for {category} '{canonical}'", data.arena);
        self.tally.cast(player, category, canonical);
        Ok(())
    }

    pub fn withdraw_votes(&mut self, player: PlayerId) {
        self.tally.withdraw(player);
    }

    #[must_use]
    pub fn vote_result(&self) -> VoteTicket {
        self.tally.result()
    }
}

impl PhaseLifecycle for Lobby {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Lobby
    }

    fn setup(&mut self, data: &mut SessionData, _now: Instant) {
        self.tally.clear();
        data.teams.reset();
        log::info!(
            "{}: lobby open with {} participants",
            data.arena,
            data.teams.participant_count()
        );
    }

    fn end(&mut self, data: &mut SessionData, _now: Instant) {
        if self.ended {
            return;
        }
        self.ended = true;
        log::debug!("{}: lobby closed", data.arena);
    }

    fn is_ended(&self) -> bool {
        self.ended
    }
}

impl PhaseEvents for Lobby {}
