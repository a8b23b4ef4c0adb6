//! Rendered, human-readable messages for a game.
//!
//! The scaffold is shared; a [`PhraseSet`] fills in the kind-specific words.
//! Nothing here is stored on the game. Messages are rebuilt from the current
//! roster whenever they are needed.

use rallypoint_protocol::{GameState, PlayerId};
use serde::Serialize;

use crate::PhraseSet;

/// Every message a game can show, rendered for its current roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameMessages {
    /// Invitation posted when the game opens.
    pub created: String,
    /// Shown once `min` players have joined.
    pub ready: String,
    /// Shown when the timer fires below `min`.
    pub timeout: String,
    /// Shown when every player has left.
    pub empty: String,
    /// Shown when the game fills (or the timer fires with enough players).
    pub finished: String,
    /// Label of the join button.
    pub join_prompt: String,
    /// Label of the leave button.
    pub leave_prompt: String,
    /// Private notice to a player that they are queued.
    pub queued: String,
    /// Start signal posted after the game fills.
    pub go: String,
    /// Who is in, in join order.
    pub roster_summary: String,
}

impl GameMessages {
    /// Renders the full bundle.
    pub fn render(phrases: &PhraseSet, creator: &PlayerId, roster: &[PlayerId]) -> Self {
        let PhraseSet {
            icon,
            command,
            title,
            activity,
        } = phrases;
        let creator = mention(creator);

        Self {
            created: format!("{creator} wants to challenge anyone @here to a game of {title}."),
            ready: "Minimum number of players has joined the game, new ones can still join."
                .to_owned(),
            timeout: format!(
                "{icon} It has been some time since {creator} created the request, \
                 but not enough players joined, or they have just found the rest of \
                 the players offline.\nYou can now create another game by typing \
                 {command} in the channel."
            ),
            empty: format!(
                "All the players have cancelled their requests. You can now create \
                 another game by typing {command} in the channel."
            ),
            finished: format!(
                "{icon} All the players for the game were found. You are ready to play some {activity}!"
            ),
            join_prompt: format!("{icon} Join"),
            leave_prompt: ":x: Leave".to_owned(),
            queued: format!("You are currently queued for a game of {title}"),
            go: "Go!".to_owned(),
            roster_summary: roster_summary(roster),
        }
    }

    /// The message that announces `state`.
    pub fn for_state(&self, state: GameState) -> &str {
        match state {
            GameState::Open => &self.created,
            GameState::Ready => &self.ready,
            GameState::Finished => &self.finished,
            GameState::Timeout => &self.timeout,
            GameState::Empty => &self.empty,
        }
    }
}

/// Chat mention syntax for a player.
fn mention(player: &PlayerId) -> String {
    format!("<@{player}>")
}

fn roster_summary(roster: &[PlayerId]) -> String {
    if roster.is_empty() {
        return "No players".to_owned();
    }
    let mentions: Vec<String> = roster.iter().map(mention).collect();
    format!("Players joined: {}", mentions.join(" "))
}
