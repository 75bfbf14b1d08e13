//! Deciding whether a chat line is a guess, and whether it's right.

/// What the evaluator needs to know about the room and the sender.
#[derive(Debug, Clone, Copy)]
pub struct GuessContext<'a> {
    /// Guessing is open (word chosen, countdown running).
    pub round_active: bool,
    /// The secret word, if one has been chosen.
    pub secret: Option<&'a str>,
    pub sender_is_drawer: bool,
    pub sender_already_guessed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessVerdict {
    /// Ordinary chat: no guessing window, or the drawer is talking.
    NotAGuess,
    /// Matches the secret word.
    Correct,
    /// A guess that doesn't match. Shown to the room as an attempt.
    Incorrect,
}

/// Judges one chat message.
///
/// Matching ignores case and surrounding whitespace. A player who has
/// already scored this round can't score again; anything they send that
/// still looks like a guess counts as incorrect.
pub fn evaluate_guess(ctx: GuessContext<'_>, message: &str) -> GuessVerdict {
    let secret = match ctx.secret {
        Some(secret) if ctx.round_active && !ctx.sender_is_drawer => secret,
        _ => return GuessVerdict::NotAGuess,
    };

    if !ctx.sender_already_guessed && message.trim().to_lowercase() == secret.to_lowercase() {
        GuessVerdict::Correct
    } else {
        GuessVerdict::Incorrect
    }
}
