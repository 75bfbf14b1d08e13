//! Room actor: an isolated Tokio task that owns one room's state.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. Commands and timer expiries are multiplexed
//! through a single `select!`, so the room's state is only ever touched
//! by one event at a time and events are handled in arrival order.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use scrawl_protocol::{Point, Recipient, RoomCode, ServerEvent, SessionId};
use tokio::sync::{mpsc, oneshot};

use crate::round::{Outbound, RoomInfo, RoundController};
use crate::{RoomConfig, RoomError, WordBank};

/// Channel sender for delivering outbound events to a player.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// In-room input from a player, after the connection layer has decoded it.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomInput {
    WordChosen(String),
    Drawing(Point),
    ClearCanvas,
    Chat(String),
}

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` in some variants is a reply channel: the caller
/// sends a command and waits for the answer on it.
pub(crate) enum RoomCommand {
    Join {
        session: SessionId,
        username: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Replies with the number of players still in the room.
    Leave {
        session: SessionId,
        reply: oneshot::Sender<usize>,
    },

    Input {
        session: SessionId,
        input: RoomInput,
    },

    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },

    Shutdown,
}

/// Handle to a running room actor.
///
/// Cheap to clone: it's an `mpsc::Sender` plus the room code.
#[derive(Clone)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl fmt::Debug for RoomHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomHandle")
            .field("code", &self.code)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl RoomHandle {
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.code.clone())
    }

    /// Asks the room to admit a player.
    pub async fn join(
        &self,
        session: SessionId,
        username: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                session,
                username,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Removes a player. Returns how many players remain.
    pub async fn leave(&self, session: SessionId) -> Result<usize, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                session,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    /// Delivers player input (fire-and-forget). Any rejection is sent to
    /// the player as an `error` event by the room itself.
    pub async fn send_input(&self, session: SessionId, input: RoomInput) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Input { session, input })
            .await
            .map_err(|_| self.unavailable())
    }

    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::GetInfo { reply: reply_tx })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    /// Tells the room to cancel its timers and stop.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| self.unavailable())
    }

    /// `true` once the actor task has exited.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    controller: RoundController,
    /// Per-player outbound channels.
    senders: HashMap<SessionId, PlayerSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop until shutdown or until every handle is gone.
    async fn run(mut self) {
        let code = self.controller.code().clone();
        tracing::info!(room = %code, "room actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    if !self.handle_command(cmd) {
                        break;
                    }
                }
                event = self.controller.next_timer_event() => {
                    let out = self.controller.on_timer(event);
                    self.dispatch(out);
                }
            }
        }

        self.controller.shutdown();
        tracing::info!(room = %code, "room actor stopped");
    }

    /// Handles one command. Returns `false` when the actor should stop.
    fn handle_command(&mut self, cmd: RoomCommand) -> bool {
        match cmd {
            RoomCommand::Join {
                session,
                username,
                sender,
                reply,
            } => {
                let result = self.controller.join(session, &username).map(|out| {
                    self.senders.insert(session, sender);
                    self.dispatch(out);
                });
                if let Err(e) = &result {
                    tracing::debug!(
                        room = %self.controller.code(),
                        %session,
                        %username,
                        reason = %e,
                        "join rejected"
                    );
                }
                let _ = reply.send(result);
            }
            RoomCommand::Leave { session, reply } => {
                self.senders.remove(&session);
                if let Some(out) = self.controller.leave(session) {
                    self.dispatch(out);
                }
                let _ = reply.send(self.controller.roster().len());
            }
            RoomCommand::Input { session, input } => {
                self.handle_input(session, input);
            }
            RoomCommand::GetInfo { reply } => {
                let _ = reply.send(self.controller.info());
            }
            RoomCommand::Shutdown => {
                tracing::info!(room = %self.controller.code(), "room shutting down");
                return false;
            }
        }
        true
    }

    fn handle_input(&mut self, session: SessionId, input: RoomInput) {
        if self.controller.roster().find(session).is_none() {
            tracing::debug!(
                room = %self.controller.code(),
                %session,
                "input from non-member, ignoring"
            );
            return;
        }

        let result = match input {
            RoomInput::WordChosen(word) => self.controller.word_chosen(session, &word),
            RoomInput::Drawing(point) => Ok(self.controller.drawing(session, point)),
            RoomInput::ClearCanvas => self.controller.clear_canvas(session),
            RoomInput::Chat(message) => Ok(self.controller.chat(session, &message)),
        };

        match result {
            Ok(out) => self.dispatch(out),
            Err(e) => {
                tracing::debug!(
                    room = %self.controller.code(),
                    %session,
                    reason = %e,
                    "input rejected"
                );
                self.send_to(session, ServerEvent::error(e.to_string()));
            }
        }
    }

    /// Dispatches outbound events to the correct recipients.
    fn dispatch(&self, out: Outbound) {
        for (recipient, event) in out {
            match recipient {
                Recipient::All => {
                    for sender in self.senders.values() {
                        let _ = sender.send(event.clone());
                    }
                }
                Recipient::Player(session) => {
                    self.send_to(session, event);
                }
                Recipient::AllExcept(excluded) => {
                    for (session, sender) in &self.senders {
                        if *session != excluded {
                            let _ = sender.send(event.clone());
                        }
                    }
                }
            }
        }
    }

    /// Sends an event to a single player. Silently drops it if the
    /// receiver is gone (player disconnected).
    fn send_to(&self, session: SessionId, event: ServerEvent) {
        if let Some(sender) = self.senders.get(&session) {
            let _ = sender.send(event);
        }
    }
}

/// Spawns a new room actor task and returns a handle to communicate with it.
///
/// `channel_size` bounds the command queue; senders wait when it's full.
pub(crate) fn spawn_room(
    code: RoomCode,
    config: RoomConfig,
    words: Arc<WordBank>,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        controller: RoundController::new(code.clone(), config, words),
        senders: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}
