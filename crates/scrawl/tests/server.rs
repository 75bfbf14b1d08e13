//! End-to-end tests: real WebSocket clients against a running server.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use scrawl::prelude::*;
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a server on a random port and returns the address.
async fn start_server() -> String {
    let server = ScrawlServerBuilder::new()
        .bind("127.0.0.1:0")
        .build()
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

async fn send(ws: &mut ClientWs, frame: Value) {
    ws.send(Message::Text(frame.to_string().into()))
        .await
        .expect("send");
}

async fn recv(ws: &mut ClientWs) -> ServerEvent {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for an event")
            .expect("stream ended")
            .expect("recv");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).expect("decode server event");
        }
    }
}

/// Reads events until one matches, returning it.
async fn recv_until(ws: &mut ClientWs, matches: impl Fn(&ServerEvent) -> bool) -> ServerEvent {
    loop {
        let event = recv(ws).await;
        if matches(&event) {
            return event;
        }
    }
}

async fn join(ws: &mut ClientWs, username: &str, room: &str) {
    send(
        ws,
        json!({"event": "joinRoom", "data": {"username": username, "roomCode": room}}),
    )
    .await;
}

async fn recv_error(ws: &mut ClientWs) -> String {
    match recv_until(ws, |e| matches!(e, ServerEvent::Error { .. })).await {
        ServerEvent::Error { message } => message,
        _ => unreachable!(),
    }
}

async fn recv_round_end(ws: &mut ClientWs) -> String {
    match recv_until(ws, |e| matches!(e, ServerEvent::RoundEnd { .. })).await {
        ServerEvent::RoundEnd { message } => message,
        _ => unreachable!(),
    }
}

fn is_system(event: &ServerEvent, text: &str) -> bool {
    matches!(
        event,
        ServerEvent::ChatMessage { kind: ChatKind::System, message, .. } if message == text
    )
}

fn roster_of_len(n: usize) -> impl Fn(&ServerEvent) -> bool {
    move |e| matches!(e, ServerEvent::UpdatePlayers(players) if players.len() == n)
}

/// `ann` opens `room` and gets the first turn; `others` join afterwards.
/// Returns once every client has seen the full roster.
async fn table(addr: &str, room: &str, others: &[&str]) -> (ClientWs, Vec<ClientWs>) {
    let mut ann = connect(addr).await;
    join(&mut ann, "ann", room).await;
    recv_until(&mut ann, |e| {
        matches!(e, ServerEvent::YourTurnToChooseWord { .. })
    })
    .await;

    let mut clients = Vec::new();
    for name in others {
        let mut ws = connect(addr).await;
        join(&mut ws, name, room).await;
        clients.push(ws);
    }
    if !clients.is_empty() {
        let total = clients.len() + 1;
        recv_until(&mut ann, roster_of_len(total)).await;
        for ws in &mut clients {
            recv_until(ws, roster_of_len(total)).await;
        }
    }
    (ann, clients)
}

// =========================================================================
// Joining
// =========================================================================

#[tokio::test]
async fn test_first_player_opens_room_and_chooses() {
    let addr = start_server().await;
    let mut ann = connect(&addr).await;
    join(&mut ann, "ann", "R1").await;

    assert_eq!(
        recv(&mut ann).await,
        ServerEvent::PlayerJoined {
            username: "ann".into()
        }
    );
    recv_until(&mut ann, |e| {
        is_system(e, "Waiting for more players to join room R1...")
    })
    .await;
    recv_until(&mut ann, |e| is_system(e, "New round! ann is drawing.")).await;

    match recv_until(&mut ann, |e| {
        matches!(e, ServerEvent::YourTurnToChooseWord { .. })
    })
    .await
    {
        ServerEvent::YourTurnToChooseWord { candidate_words } => {
            assert_eq!(candidate_words.len(), 3);
        }
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn test_late_joiner_sees_round_in_progress() {
    let addr = start_server().await;
    let (_ann, _) = table(&addr, "R1", &[]).await;

    let mut bob = connect(&addr).await;
    join(&mut bob, "bob", "R1").await;

    match recv_until(&mut bob, |e| matches!(e, ServerEvent::RoundStart { .. })).await {
        ServerEvent::RoundStart { word_hint, timer, .. } => {
            assert_eq!(word_hint, "");
            assert_eq!(timer, 90);
        }
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let addr = start_server().await;
    let (_ann, _) = table(&addr, "R1", &[]).await;

    let mut imposter = connect(&addr).await;
    join(&mut imposter, "ann", "R1").await;
    assert_eq!(
        recv_error(&mut imposter).await,
        "Username already taken in this room. Please choose another."
    );

    // The rejected session is still in the lobby and can pick a new name.
    join(&mut imposter, "anne", "R1").await;
    recv_until(&mut imposter, roster_of_len(2)).await;
}

#[tokio::test]
async fn test_blank_join_fields_rejected() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    join(&mut ws, "  ", "R1").await;
    assert_eq!(recv_error(&mut ws).await, "Username and Room ID are required.");

    join(&mut ws, "ann", "").await;
    assert_eq!(recv_error(&mut ws).await, "Username and Room ID are required.");
}

#[tokio::test]
async fn test_missing_join_fields_rejected() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    send(&mut ws, json!({"event": "joinRoom", "data": {"username": "ann"}})).await;
    assert_eq!(recv_error(&mut ws).await, "Username and Room ID are required.");

    send(&mut ws, json!({"event": "joinRoom", "data": {"roomCode": "R1"}})).await;
    assert_eq!(recv_error(&mut ws).await, "Username and Room ID are required.");

    // Still in the lobby, so a complete join goes through.
    join(&mut ws, "ann", "R1").await;
    recv_until(&mut ws, |e| {
        is_system(e, "Waiting for more players to join room R1...")
    })
    .await;
}

#[tokio::test]
async fn test_second_room_join_rejected_until_leave() {
    let addr = start_server().await;
    let (mut ann, _) = table(&addr, "R1", &[]).await;

    join(&mut ann, "ann", "R2").await;
    let message = recv_error(&mut ann).await;
    assert!(message.contains("already in room R1"), "got {message}");

    send(&mut ann, json!({"event": "leaveRoom", "data": {"roomCode": "R1"}})).await;
    join(&mut ann, "ann", "R2").await;
    recv_until(&mut ann, |e| {
        is_system(e, "Waiting for more players to join room R2...")
    })
    .await;
}

// =========================================================================
// Playing a round
// =========================================================================

#[tokio::test]
async fn test_two_player_guess_round() {
    let addr = start_server().await;
    let (mut ann, mut others) = table(&addr, "R1", &["bob"]).await;
    let bob = &mut others[0];

    send(
        &mut ann,
        json!({"event": "wordChosen", "data": {"roomCode": "R1", "word": "apple"}}),
    )
    .await;

    // Skip the catch-up roundStart bob got on joining, which has no hint yet.
    match recv_until(bob, |e| {
        matches!(e, ServerEvent::RoundStart { word_hint, .. } if !word_hint.is_empty())
    })
    .await
    {
        ServerEvent::RoundStart {
            word_hint, timer, ..
        } => {
            assert_eq!(word_hint, "_ _ _ _ _");
            assert_eq!(timer, 90);
        }
        _ => unreachable!(),
    }
    recv_until(bob, |e| *e == ServerEvent::TimerUpdate { seconds: 90 }).await;

    send(
        bob,
        json!({"event": "chatMessage", "data": {"roomCode": "R1", "message": "pear"}}),
    )
    .await;
    assert_eq!(
        recv_until(&mut ann, |e| matches!(e, ServerEvent::NewGuess { .. })).await,
        ServerEvent::NewGuess {
            username: "bob".into(),
            guess: "pear".into()
        }
    );

    send(
        bob,
        json!({"event": "chatMessage", "data": {"roomCode": "R1", "message": "APPLE"}}),
    )
    .await;
    assert_eq!(
        recv_until(bob, |e| matches!(e, ServerEvent::CorrectGuess { .. })).await,
        ServerEvent::CorrectGuess {
            username: "bob".into(),
            word: "apple".into(),
            score: 100
        }
    );
    assert_eq!(recv_round_end(&mut ann).await, "bob guessed the word!");
}

#[tokio::test]
async fn test_strokes_relayed_to_guessers() {
    let addr = start_server().await;
    let (mut ann, mut others) = table(&addr, "R1", &["bob"]).await;
    let bob = &mut others[0];

    send(
        &mut ann,
        json!({"event": "wordChosen", "data": {"roomCode": "R1", "word": "cat"}}),
    )
    .await;
    send(
        &mut ann,
        json!({"event": "drawing", "data": {"roomCode": "R1", "x": 12.5, "y": 40.0}}),
    )
    .await;

    assert_eq!(
        recv_until(bob, |e| matches!(e, ServerEvent::Drawing(_))).await,
        ServerEvent::Drawing(Point { x: 12.5, y: 40.0 })
    );
}

#[tokio::test]
async fn test_clear_canvas_by_guesser_rejected() {
    let addr = start_server().await;
    let (_ann, mut others) = table(&addr, "R1", &["bob"]).await;
    let bob = &mut others[0];

    send(bob, json!({"event": "clearCanvas", "data": {"roomCode": "R1"}})).await;
    assert_eq!(recv_error(bob).await, "Only the drawer can clear the canvas.");
}

#[tokio::test]
async fn test_guesser_cannot_choose_word() {
    let addr = start_server().await;
    let (_ann, mut others) = table(&addr, "R1", &["bob"]).await;
    let bob = &mut others[0];

    send(
        bob,
        json!({"event": "wordChosen", "data": {"roomCode": "R1", "word": "dog"}}),
    )
    .await;
    assert_eq!(recv_error(bob).await, "Not authorized to choose a word.");
}

#[tokio::test]
async fn test_chat_uses_roster_name() {
    let addr = start_server().await;
    let (mut ann, mut others) = table(&addr, "R1", &["bob"]).await;
    let bob = &mut others[0];

    send(
        bob,
        json!({"event": "chatMessage", "data": {"roomCode": "R1", "message": "hi", "username": "mallory"}}),
    )
    .await;

    assert_eq!(
        recv_until(&mut ann, |e| matches!(
            e,
            ServerEvent::ChatMessage {
                kind: ChatKind::Chat,
                ..
            }
        ))
        .await,
        ServerEvent::ChatMessage {
            username: Some("bob".into()),
            message: "hi".into(),
            kind: ChatKind::Chat
        }
    );
}

#[tokio::test]
async fn test_events_for_other_rooms_ignored() {
    let addr = start_server().await;
    let (mut ann, _) = table(&addr, "R1", &[]).await;

    // Neither of these may reach R1 or produce an error.
    send(&mut ann, json!({"event": "clearCanvas", "data": {"roomCode": "R9"}})).await;
    send(&mut ann, Value::String("not an event".into())).await;
    ann.send(Message::Text(String::from("{{{").into())).await.expect("send");

    send(
        &mut ann,
        json!({"event": "chatMessage", "data": {"roomCode": "R1", "message": "still here"}}),
    )
    .await;
    let next = recv(&mut ann).await;
    assert_eq!(
        next,
        ServerEvent::ChatMessage {
            username: Some("ann".into()),
            message: "still here".into(),
            kind: ChatKind::Chat
        }
    );
}

// =========================================================================
// Departures
// =========================================================================

#[tokio::test]
async fn test_drawer_disconnect_ends_round() {
    let addr = start_server().await;
    let (ann, mut others) = table(&addr, "R1", &["bob", "carl"]).await;
    drop(ann);
    let bob = &mut others[0];

    assert_eq!(
        recv_until(bob, |e| matches!(e, ServerEvent::PlayerLeft { .. })).await,
        ServerEvent::PlayerLeft {
            username: "ann".into()
        }
    );
    recv_until(bob, |e| is_system(e, "ann (the drawer) left!")).await;
    assert_eq!(recv_round_end(bob).await, "The drawer left the game.");
}

#[tokio::test]
async fn test_drop_to_one_player_stops_game() {
    let addr = start_server().await;
    let (mut ann, mut others) = table(&addr, "R1", &["bob"]).await;
    let bob = others.remove(0);
    drop(bob);

    recv_until(&mut ann, |e| {
        is_system(e, "Not enough players to continue. Waiting for more.")
    })
    .await;
    assert_eq!(recv_round_end(&mut ann).await, "Not enough players.");
}

#[tokio::test]
async fn test_empty_room_is_recreated_fresh() {
    let addr = start_server().await;
    let (mut ann, _) = table(&addr, "R1", &[]).await;
    send(&mut ann, json!({"event": "leaveRoom", "data": {"roomCode": "R1"}})).await;
    drop(ann);

    // Give the teardown a moment to run.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let mut bob = connect(&addr).await;
    join(&mut bob, "bob", "R1").await;
    recv_until(&mut bob, |e| {
        is_system(e, "Waiting for more players to join room R1...")
    })
    .await;
    recv_until(&mut bob, |e| is_system(e, "New round! bob is drawing.")).await;
}
