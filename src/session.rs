use crate::speech::{Speaker, SpeechSignal};
use std::fmt;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

/// What the user asked for: how many items, how long to pause between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionRequest {
    pub count: usize,
    pub delay: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    ZeroCount,
    CountExceedsPool { requested: usize, available: usize },
    InvalidDelay(f64),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::ZeroCount => write!(f, "item count must be at least 1"),
            ValidationError::CountExceedsPool {
                requested,
                available,
            } => write!(
                f,
                "requested {requested} items but only {available} are available"
            ),
            ValidationError::InvalidDelay(secs) => {
                write!(f, "delay must be a non-negative number of seconds, got {secs}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl SessionRequest {
    /// Build a request from user-facing units (count, delay in seconds).
    pub fn from_seconds(count: usize, delay_secs: f64) -> Result<Self, ValidationError> {
        if !delay_secs.is_finite() || delay_secs < 0.0 {
            return Err(ValidationError::InvalidDelay(delay_secs));
        }
        Ok(Self {
            count,
            delay: Duration::from_secs_f64(delay_secs),
        })
    }

    /// Bounds check against the item source. Re-run at session-start time,
    /// not load time.
    pub fn validate(&self, available: usize) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(ValidationError::ZeroCount);
        }
        if self.count > available {
            return Err(ValidationError::CountExceedsPool {
                requested: self.count,
                available,
            });
        }
        Ok(())
    }
}

enum Step {
    Wait,
    ItemComplete { error: Option<String> },
    Advance,
}

enum Phase {
    /// Waiting for the speech collaborator to finish the current item.
    Speaking(Receiver<SpeechSignal>),
    /// Inter-item pause; advance once the deadline passes.
    Pausing(Instant),
    Finished,
}

/// One run through a drawn item list. Driven cooperatively by `tick` from
/// the event loop; there is no internal thread.
pub struct Session {
    items: Vec<String>,
    delay: Duration,
    index: usize,
    phase: Phase,
    speech_errors: usize,
}

impl Session {
    /// Begin playback: speaks the first item immediately. `items` must be
    /// non-empty (guaranteed by request validation).
    pub fn start(items: Vec<String>, delay: Duration, speaker: &mut dyn Speaker) -> Self {
        debug_assert!(!items.is_empty());
        log::info!(
            "session started: {} items, {:.1}s delay",
            items.len(),
            delay.as_secs_f64()
        );
        let rx = speaker.speak(&items[0]);
        log::debug!("item 1/{}: {}", items.len(), items[0]);
        Self {
            items,
            delay,
            index: 0,
            phase: Phase::Speaking(rx),
            speech_errors: 0,
        }
    }

    /// The item currently on screen.
    pub fn current_item(&self) -> Option<&str> {
        match self.phase {
            Phase::Finished => None,
            _ => self.items.get(self.index).map(String::as_str),
        }
    }

    /// 1-based progress, e.g. (3, 10) while the third of ten items plays.
    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, self.items.len())
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }

    /// Speech failures swallowed so far this session.
    pub fn speech_errors(&self) -> usize {
        self.speech_errors
    }

    /// Advance the phase machine. Returns true once the session finished.
    pub fn tick(&mut self, now: Instant, speaker: &mut dyn Speaker) -> bool {
        // Decide first, mutate after: the receiver borrows self.phase.
        let step = match &self.phase {
            Phase::Speaking(rx) => match rx.try_recv() {
                Ok(SpeechSignal::Done) => Step::ItemComplete { error: None },
                Ok(SpeechSignal::Error(msg)) => Step::ItemComplete { error: Some(msg) },
                Err(TryRecvError::Empty) => Step::Wait,
                // Dropped sender counts as completion so a crashed backend
                // never stalls the sequence.
                Err(TryRecvError::Disconnected) => Step::ItemComplete { error: None },
            },
            Phase::Pausing(deadline) => {
                if now >= *deadline {
                    Step::Advance
                } else {
                    Step::Wait
                }
            }
            Phase::Finished => Step::Wait,
        };

        match step {
            Step::Wait => {}
            Step::ItemComplete { error } => {
                if let Some(msg) = error {
                    log::warn!("speech error on '{}': {msg}", self.items[self.index]);
                    self.speech_errors += 1;
                }
                self.on_item_complete(now);
            }
            Step::Advance => {
                self.index += 1;
                let rx = speaker.speak(&self.items[self.index]);
                log::debug!(
                    "item {}/{}: {}",
                    self.index + 1,
                    self.items.len(),
                    self.items[self.index]
                );
                self.phase = Phase::Speaking(rx);
            }
        }
        self.is_finished()
    }

    fn on_item_complete(&mut self, now: Instant) {
        if self.index + 1 == self.items.len() {
            // No trailing pause after the final item.
            log::info!("session finished: {} items", self.items.len());
            self.phase = Phase::Finished;
        } else {
            self.phase = Phase::Pausing(now + self.delay);
        }
    }

    /// Consume the session and hand back the items in playback order.
    pub fn into_items(self) -> Vec<String> {
        self.items
    }
}
