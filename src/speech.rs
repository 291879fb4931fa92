use std::collections::VecDeque;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;

/// Completion signal for one spoken item, delivered over a one-shot channel.
/// A dropped sender is read as completion too, so a crashed backend can
/// never stall a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeechSignal {
    Done,
    Error(String),
}

/// Speech output collaborator: accept a string, eventually signal
/// done-or-error. Voice tuning is out of scope.
pub trait Speaker: Send {
    fn speak(&mut self, text: &str) -> Receiver<SpeechSignal>;
}

/// Silent variant: every item completes immediately.
pub struct NullSpeaker;

impl Speaker for NullSpeaker {
    fn speak(&mut self, _text: &str) -> Receiver<SpeechSignal> {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(SpeechSignal::Done);
        rx
    }
}

/// Speaks through an external TTS command, one process per item, on a
/// background thread.
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Platform default TTS command.
    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("say", vec![])
        } else {
            Self::new("espeak", vec![])
        }
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&mut self, text: &str) -> Receiver<SpeechSignal> {
        let (tx, rx) = mpsc::channel();
        let program = self.program.clone();
        let args = self.args.clone();
        let text = text.to_string();

        thread::spawn(move || {
            let status = Command::new(&program)
                .args(&args)
                .arg(&text)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();

            let signal = match status {
                Ok(s) if s.success() => SpeechSignal::Done,
                Ok(s) => SpeechSignal::Error(format!("{program} exited with {s}")),
                Err(e) => SpeechSignal::Error(format!("failed to run {program}: {e}")),
            };
            // Receiver may be gone if the app quit mid-session.
            let _ = tx.send(signal);
        });

        rx
    }
}

/// Test double with scripted outcomes and a log of spoken items.
pub struct ScriptedSpeaker {
    outcomes: VecDeque<SpeechSignal>,
    spoken: Arc<Mutex<Vec<String>>>,
}

impl ScriptedSpeaker {
    /// Speaker that answers `Done` to everything.
    pub fn always_done() -> Self {
        Self {
            outcomes: VecDeque::new(),
            spoken: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Speaker that plays back `outcomes` in order, then `Done` forever.
    pub fn with_outcomes(outcomes: Vec<SpeechSignal>) -> Self {
        Self {
            outcomes: outcomes.into(),
            spoken: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the spoken-item log; clone before handing the
    /// speaker off to a session.
    pub fn spoken_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.spoken)
    }
}

impl Speaker for ScriptedSpeaker {
    fn speak(&mut self, text: &str) -> Receiver<SpeechSignal> {
        self.spoken.lock().unwrap().push(text.to_string());
        let signal = self.outcomes.pop_front().unwrap_or(SpeechSignal::Done);
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(signal);
        rx
    }
}
