//! Layered settings builder.
//!
//! Layers, lowest precedence first:
//! 1. the default preset the session was created with,
//! 2. overrides applied through commands while the session lives,
//! 3. the lobby's vote ticket, applied only for the game about to start.

use super::{
    models::{Gamemode, PlayerKit, Settings, parse_gamemode_token},
    vote::VoteTicket,
};
use crate::card::CardSize;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    #[must_use]
    pub fn new(base: Settings) -> Self {
        Self { settings: base }
    }

    /// Replaces every setting with `other`.
    pub fn from_other(&mut self, other: Settings) -> &mut Self {
        self.settings = other;
        self
    }

    pub fn card(&mut self, card: impl Into<String>) -> &mut Self {
        self.settings.card = card.into();
        self
    }

    pub fn mode(&mut self, mode: Gamemode) -> &mut Self {
        self.settings.mode = mode;
        self
    }

    pub fn card_size(&mut self, size: CardSize) -> &mut Self {
        self.settings.size = size;
        self
    }

    pub fn kit(&mut self, kit: PlayerKit) -> &mut Self {
        self.settings.kit = kit;
        self
    }

    pub fn card_seed(&mut self, seed: u64) -> &mut Self {
        self.settings.seed = seed;
        self
    }

    pub fn max_team_size(&mut self, size: usize) -> &mut Self {
        self.settings.max_team_size = size.max(1);
        self
    }

    /// Snapshot of the current settings.
    #[must_use]
    pub fn view(&self) -> Settings {
        self.settings.clone()
    }

    /// A copy of this builder with every category the ticket decided
    /// overriding the session value. The builder itself is not changed.
    ///
    /// Options that do not parse are skipped with a warning; they are
    /// normally rejected when the ballot is cast.
    #[must_use]
    pub fn vote_result(&self, ticket: &VoteTicket) -> SettingsBuilder {
        let mut result = self.clone();

        if let Some(token) = ticket.gamemode.as_deref() {
            match parse_gamemode_token(token) {
                Ok((mode, size)) => {
                    result.mode(mode).card_size(size);
                }
                Err(e) => log::warn!("Ignoring gamemode vote: {e}"),
            }
        }

        if let Some(kit) = ticket.kit.as_deref() {
            match kit.parse::<PlayerKit>() {
                Ok(kit) => {
                    result.kit(kit);
                }
                Err(e) => log::warn!("Ignoring kit vote: {e}"),
            }
        }

        if let Some(card) = ticket.card.as_deref() {
            result.card(card);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_overrides_apply_over_base() {
        let mut builder = SettingsBuilder::new(Settings::default());
        builder.card("hard_card").card_seed(42);

        let view = builder.view();
        assert_eq!(view.card, "hard_card");
        assert_eq!(view.seed, 42);
        assert_eq!(view.mode, Gamemode::Regular);
    }

    #[test]
    fn test_vote_overrides_only_decided_categories() {
        let mut builder = SettingsBuilder::new(Settings::default());
        builder.kit(PlayerKit::Hardcore).card("session_card");

        let ticket = VoteTicket {
            gamemode: Some("lockout_3".to_string()),
            kit: None,
            card: None,
        };
        let voted = builder.vote_result(&ticket).view();

        assert_eq!(voted.mode, Gamemode::Lockout);
        assert_eq!(voted.size, CardSize::X3);
        assert_eq!(voted.kit, PlayerKit::Hardcore);
        assert_eq!(voted.card, "session_card");

        // The session layer is untouched by the vote.
        assert_eq!(builder.view().mode, Gamemode::Regular);
    }

    #[test]
    fn test_empty_ticket_changes_nothing() {
        let builder = SettingsBuilder::new(Settings::default());
        assert_eq!(builder.vote_result(&VoteTicket::default()), builder);
    }
}
