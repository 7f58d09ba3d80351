use crate::session::round::RoundState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Letter(char),
    Backspace,
}

impl InputEvent {
    /// Map a typed character to an event. Only ASCII letters count.
    pub fn from_char(ch: char) -> Option<Self> {
        ch.is_ascii_alphabetic().then_some(InputEvent::Letter(ch))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// Dropped because the round is busy or waiting for a retry.
    Ignored,
    Unchanged,
    Updated,
    /// Every masked slot now holds a character.
    Filled,
}

pub fn route(round: &mut RoundState, event: InputEvent) -> InputOutcome {
    match event {
        InputEvent::Letter(ch) => process_letter(round, ch),
        InputEvent::Backspace => process_backspace(round),
    }
}

pub fn process_letter(round: &mut RoundState, ch: char) -> InputOutcome {
    if !round.accepts_input() {
        return InputOutcome::Ignored;
    }
    if !ch.is_ascii_alphabetic() {
        return InputOutcome::Unchanged;
    }
    let Some(idx) = round.next_empty_slot() else {
        return InputOutcome::Unchanged;
    };
    round.input[idx] = Some(ch);
    if round.is_filled() {
        InputOutcome::Filled
    } else {
        InputOutcome::Updated
    }
}

pub fn process_backspace(round: &mut RoundState) -> InputOutcome {
    if !round.accepts_input() {
        return InputOutcome::Ignored;
    }
    match round.last_filled_slot() {
        Some(idx) => {
            round.input[idx] = None;
            InputOutcome::Updated
        }
        None => InputOutcome::Unchanged,
    }
}
