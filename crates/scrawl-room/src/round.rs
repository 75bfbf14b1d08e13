//! The per-room round state machine.
//!
//! [`RoundController`] owns everything about one room: its roster, the
//! replay buffer, the turn scheduler and the current secret word. Every
//! operation is synchronous and returns the notifications it produced as
//! `(Recipient, ServerEvent)` pairs. The room actor delivers them; the
//! controller never touches a channel, so a whole transition (for example
//! a correct guess ending the round) happens in one step with nothing
//! interleaved.

use std::sync::Arc;

use scrawl_protocol::{ChatKind, Point, Recipient, RoomCode, ServerEvent, SessionId};
use tracing::{debug, info};

use crate::guess::{GuessContext, GuessVerdict, evaluate_guess};
use crate::roster::PlayerRoster;
use crate::scheduler::{TimerEvent, TurnScheduler};
use crate::words::{WordBank, mask_word};
use crate::{DrawingRelay, RoomConfig, RoomError, RoundPhase};

/// Notifications produced by one controller step, in delivery order.
pub type Outbound = Vec<(Recipient, ServerEvent)>;

/// What happens once a round's end has been announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterRound {
    /// Pause, then start the next round.
    Intermission,
    /// Stop: not enough players to go on.
    Idle,
}

/// A snapshot of room metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub code: RoomCode,
    pub phase: RoundPhase,
    pub player_count: usize,
    pub max_players: usize,
    /// Rounds started since the room was created.
    pub round: u32,
    pub drawer: Option<SessionId>,
    pub game_started: bool,
}

pub struct RoundController {
    code: RoomCode,
    config: RoomConfig,
    words: Arc<WordBank>,
    roster: PlayerRoster,
    relay: DrawingRelay,
    scheduler: TurnScheduler,
    phase: RoundPhase,
    secret: Option<String>,
    hint: String,
    round: u32,
    game_started: bool,
}

impl RoundController {
    pub fn new(code: RoomCode, config: RoomConfig, words: Arc<WordBank>) -> Self {
        Self {
            code,
            config,
            words,
            roster: PlayerRoster::new(),
            relay: DrawingRelay::new(),
            scheduler: TurnScheduler::new(),
            phase: RoundPhase::Idle,
            secret: None,
            hint: String::new(),
            round: 0,
            game_started: false,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn roster(&self) -> &PlayerRoster {
        &self.roster
    }

    pub fn relay(&self) -> &DrawingRelay {
        &self.relay
    }

    pub fn scheduler(&self) -> &TurnScheduler {
        &self.scheduler
    }

    /// The secret word, once the drawer has chosen it.
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn info(&self) -> RoomInfo {
        RoomInfo {
            code: self.code.clone(),
            phase: self.phase,
            player_count: self.roster.len(),
            max_players: self.config.max_players,
            round: self.round,
            drawer: self.roster.drawer().map(|p| p.id),
            game_started: self.game_started,
        }
    }

    /// The session whose turn it is by rotation, even between rounds.
    fn rotation_drawer(&self) -> Option<SessionId> {
        self.scheduler
            .drawer_index()
            .and_then(|i| self.roster.get(i))
            .map(|p| p.id)
    }

    /// `true` if `id` holds the pen right now.
    fn is_drawing(&self, id: SessionId) -> bool {
        self.phase.is_running() && self.roster.find(id).is_some_and(|p| p.is_drawer)
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    /// Adds a player.
    ///
    /// The first player into an idle room (or the first to arrive after
    /// the game stalled for lack of players) starts a round. Anyone joining
    /// while a round is running is brought up to date privately.
    ///
    /// # Errors
    /// [`RoomError::MissingJoinFields`], [`RoomError::DuplicateUsername`]
    /// or [`RoomError::RoomFull`]. Nothing changes on error.
    pub fn join(&mut self, id: SessionId, username: &str) -> Result<Outbound, RoomError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(RoomError::MissingJoinFields);
        }
        if self.roster.has_username(username) {
            return Err(RoomError::DuplicateUsername);
        }
        if self.roster.len() >= self.config.max_players {
            return Err(RoomError::RoomFull);
        }

        self.roster.append(id, username);
        info!(
            room = %self.code,
            session = %id,
            %username,
            players = self.roster.len(),
            "player joined"
        );

        let mut out = vec![
            (
                Recipient::All,
                ServerEvent::PlayerJoined {
                    username: username.to_owned(),
                },
            ),
            self.roster_update(),
        ];

        if !self.game_started {
            self.game_started = true;
            if self.roster.len() == 1 {
                out.push((
                    Recipient::All,
                    ServerEvent::system(format!(
                        "Waiting for more players to join room {}...",
                        self.code
                    )),
                ));
            }
            self.start_round(&mut out);
        } else if self.phase.is_running() {
            self.sync_late_joiner(id, &mut out);
        }

        Ok(out)
    }

    /// Removes a player and applies the departure rules.
    ///
    /// Returns `None` if the session wasn't in the room.
    pub fn leave(&mut self, id: SessionId) -> Option<Outbound> {
        let (index, player) = self.roster.remove(id)?;
        let was_drawing = player.is_drawer && self.phase.is_running();
        self.scheduler.on_player_removed(index, self.roster.len());
        info!(
            room = %self.code,
            session = %id,
            username = %player.username,
            players = self.roster.len(),
            was_drawing,
            "player left"
        );

        let mut out = vec![
            (
                Recipient::All,
                ServerEvent::PlayerLeft {
                    username: player.username.clone(),
                },
            ),
            self.roster_update(),
        ];

        if self.roster.is_empty() {
            self.shutdown();
        } else if self.roster.len() < self.config.min_players && self.game_started {
            out.push((
                Recipient::All,
                ServerEvent::system("Not enough players to continue. Waiting for more."),
            ));
            if self.phase.is_running() {
                self.finish_round("Not enough players.", AfterRound::Idle, &mut out);
            } else {
                self.scheduler.cancel_all();
                self.phase = RoundPhase::Idle;
            }
            self.game_started = false;
        } else if was_drawing {
            out.push((
                Recipient::All,
                ServerEvent::system(format!("{} (the drawer) left!", player.username)),
            ));
            self.finish_round("The drawer left the game.", AfterRound::Intermission, &mut out);
        }

        Some(out)
    }

    /// Stops everything. Used when the room is being destroyed.
    pub fn shutdown(&mut self) {
        self.scheduler.cancel_all();
        self.phase = RoundPhase::Idle;
        self.secret = None;
        self.hint.clear();
        self.relay.clear();
    }

    // -----------------------------------------------------------------------
    // Player input
    // -----------------------------------------------------------------------

    /// The drawer picks the secret word, opening the round for guesses.
    ///
    /// # Errors
    /// [`RoomError::NotAuthorized`] if `id` isn't the drawer,
    /// [`RoomError::WordAlreadyChosen`] if it is but the choosing window is
    /// closed, [`RoomError::BlankWord`] for an empty word.
    pub fn word_chosen(&mut self, id: SessionId, word: &str) -> Result<Outbound, RoomError> {
        if self.rotation_drawer() != Some(id) {
            return Err(RoomError::NotAuthorized);
        }
        if self.phase != RoundPhase::ChoosingWord || self.secret.is_some() {
            return Err(RoomError::WordAlreadyChosen);
        }
        let word = word.trim();
        if word.is_empty() {
            return Err(RoomError::BlankWord);
        }

        self.scheduler.cancel_word_choice();
        self.secret = Some(word.to_owned());
        self.hint = mask_word(word);
        self.phase = RoundPhase::Active;

        let seconds = self.config.round_seconds();
        self.scheduler.start_countdown(seconds);
        info!(room = %self.code, round = self.round, "word chosen, guessing open");

        Ok(vec![
            (
                Recipient::All,
                ServerEvent::RoundStart {
                    drawer_id: id,
                    word_hint: self.hint.clone(),
                    timer: seconds,
                },
            ),
            (
                Recipient::All,
                ServerEvent::system("The word has been chosen! Start guessing!"),
            ),
            (Recipient::All, ServerEvent::TimerUpdate { seconds }),
        ])
    }

    /// A stroke sample. Anything not from the drawer is ignored.
    pub fn drawing(&mut self, id: SessionId, point: Point) -> Outbound {
        if !self.is_drawing(id) {
            debug!(room = %self.code, session = %id, "ignoring stroke from non-drawer");
            return Vec::new();
        }
        self.relay.record(point);
        vec![(Recipient::AllExcept(id), ServerEvent::Drawing(point))]
    }

    /// The drawer wipes the canvas.
    ///
    /// # Errors
    /// [`RoomError::NotDrawer`] for anyone else.
    pub fn clear_canvas(&mut self, id: SessionId) -> Result<Outbound, RoomError> {
        if !self.is_drawing(id) {
            return Err(RoomError::NotDrawer);
        }
        self.relay.clear();
        Ok(vec![(Recipient::All, ServerEvent::ClearCanvas)])
    }

    /// A chat line: ordinary chat, a wrong guess, or the winning guess.
    ///
    /// The sender's roster name is used, whatever name the client claims.
    pub fn chat(&mut self, id: SessionId, message: &str) -> Outbound {
        let message = message.trim();
        if message.is_empty() {
            return Vec::new();
        }
        let Some(sender) = self.roster.find(id) else {
            return Vec::new();
        };
        let username = sender.username.clone();

        let ctx = GuessContext {
            round_active: self.phase == RoundPhase::Active,
            secret: self.secret.as_deref(),
            sender_is_drawer: sender.is_drawer,
            sender_already_guessed: sender.guessed_this_round,
        };

        match evaluate_guess(ctx, message) {
            GuessVerdict::NotAGuess => vec![(
                Recipient::All,
                ServerEvent::ChatMessage {
                    username: Some(username),
                    message: message.to_owned(),
                    kind: ChatKind::Chat,
                },
            )],
            GuessVerdict::Incorrect => vec![(
                Recipient::All,
                ServerEvent::NewGuess {
                    username,
                    guess: message.to_owned(),
                },
            )],
            GuessVerdict::Correct => self.correct_guess(id, username),
        }
    }

    fn correct_guess(&mut self, id: SessionId, username: String) -> Outbound {
        let Some(word) = self.secret.clone() else {
            return Vec::new();
        };
        let Some(score) = self.roster.award(id, self.config.correct_guess_bonus) else {
            return Vec::new();
        };
        info!(room = %self.code, session = %id, %username, score, "correct guess");

        let mut out = vec![
            (
                Recipient::All,
                ServerEvent::CorrectGuess {
                    username: username.clone(),
                    word: word.clone(),
                    score,
                },
            ),
            (
                Recipient::All,
                ServerEvent::system(format!(
                    "{username} guessed correctly! The word was: {word}."
                )),
            ),
            self.roster_update(),
        ];
        self.finish_round(
            &format!("{username} guessed the word!"),
            AfterRound::Intermission,
            &mut out,
        );
        out
    }

    // -----------------------------------------------------------------------
    // Timers
    // -----------------------------------------------------------------------

    /// Waits for the next armed timer. Cancel-safe.
    pub async fn next_timer_event(&mut self) -> TimerEvent {
        self.scheduler.next_event().await
    }

    /// Reacts to a fired timer.
    ///
    /// A timer that no longer matches the phase is ignored, though with
    /// every transition cancelling its timers that shouldn't happen.
    pub fn on_timer(&mut self, event: TimerEvent) -> Outbound {
        let mut out = Vec::new();
        match event {
            TimerEvent::WordChoiceExpired => {
                if self.phase != RoundPhase::ChoosingWord {
                    return out;
                }
                let drawer = self
                    .roster
                    .drawer()
                    .map(|p| p.username.clone())
                    .unwrap_or_default();
                info!(room = %self.code, %drawer, "word choice timed out");
                out.push((
                    Recipient::All,
                    ServerEvent::system(format!("{drawer} failed to choose a word.")),
                ));
                self.finish_round(
                    "Drawer failed to choose a word.",
                    AfterRound::Intermission,
                    &mut out,
                );
            }
            TimerEvent::Tick {
                remaining,
                finished,
            } => {
                if self.phase != RoundPhase::Active {
                    return out;
                }
                out.push((Recipient::All, ServerEvent::TimerUpdate { seconds: remaining }));
                if finished {
                    self.finish_round(
                        "Time is up! No one guessed the word.",
                        AfterRound::Intermission,
                        &mut out,
                    );
                }
            }
            TimerEvent::IntermissionElapsed => {
                if self.phase != RoundPhase::Ending {
                    return out;
                }
                if self.game_started && !self.roster.is_empty() {
                    self.start_round(&mut out);
                } else {
                    self.phase = RoundPhase::Idle;
                }
            }
        }
        out
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    fn roster_update(&self) -> (Recipient, ServerEvent) {
        (
            Recipient::All,
            ServerEvent::UpdatePlayers(self.roster.public_view()),
        )
    }

    /// Idle/Ending → ChoosingWord.
    fn start_round(&mut self, out: &mut Outbound) {
        self.scheduler.cancel_all();
        let Some(index) = self.scheduler.advance_drawer(self.roster.len()) else {
            self.phase = RoundPhase::Idle;
            return;
        };

        self.round += 1;
        self.secret = None;
        self.hint.clear();
        self.relay.clear();
        self.roster.reset_guesses();
        self.roster.set_drawer(index);
        self.phase = RoundPhase::ChoosingWord;

        let Some(drawer) = self.roster.get(index) else {
            self.phase = RoundPhase::Idle;
            return;
        };
        let (drawer_id, drawer_name) = (drawer.id, drawer.username.clone());
        info!(room = %self.code, round = self.round, drawer = %drawer_name, "round started");

        out.push(self.roster_update());
        out.push((
            Recipient::All,
            ServerEvent::system(format!("New round! {drawer_name} is drawing.")),
        ));
        out.push((Recipient::All, ServerEvent::ClearCanvas));
        out.push((
            Recipient::Player(drawer_id),
            ServerEvent::YourTurnToChooseWord {
                candidate_words: self.words.candidates(self.config.candidate_count),
            },
        ));

        self.scheduler.arm_word_choice(self.config.word_choice_timeout);
    }

    /// ChoosingWord/Active → Ending (or Idle).
    fn finish_round(&mut self, message: &str, next: AfterRound, out: &mut Outbound) {
        self.scheduler.cancel_all();
        self.secret = None;
        self.hint.clear();
        self.relay.clear();
        self.roster.reset_guesses();
        self.roster.clear_drawer();
        info!(room = %self.code, round = self.round, reason = message, "round ended");

        out.push((
            Recipient::All,
            ServerEvent::RoundEnd {
                message: message.to_owned(),
            },
        ));
        out.push((Recipient::All, ServerEvent::ClearCanvas));
        out.push(self.roster_update());

        match next {
            AfterRound::Intermission => {
                self.phase = RoundPhase::Ending;
                self.scheduler.arm_intermission(self.config.intermission);
            }
            AfterRound::Idle => self.phase = RoundPhase::Idle,
        }
    }

    /// Brings a player who joined mid-round up to date: who is drawing,
    /// the hint, the clock, and every stroke so far.
    fn sync_late_joiner(&self, id: SessionId, out: &mut Outbound) {
        let Some(drawer_id) = self.roster.drawer().map(|p| p.id) else {
            return;
        };
        let timer = match self.phase {
            RoundPhase::Active => self.scheduler.seconds_remaining(),
            _ => self.config.round_seconds(),
        };
        out.push((
            Recipient::Player(id),
            ServerEvent::RoundStart {
                drawer_id,
                word_hint: self.hint.clone(),
                timer,
            },
        ));
        out.extend(
            self.relay
                .replay()
                .map(|point| (Recipient::Player(id), ServerEvent::Drawing(point))),
        );
    }
}
