use crate::pool::{PoolError, WordPool};
use crate::session::{Session, SessionRequest, ValidationError};
use crate::source::{ItemSource, NumberSource, WordListSource};
use crate::speech::Speaker;
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

/// Where the trainer gets its items from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// One of the word lists compiled into the binary.
    EmbeddedList(String),
    /// A newline-delimited word file supplied by the user.
    WordFile(PathBuf),
    /// Number-drill mode; no external resource involved.
    Numbers,
}

/// Reported after a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStatus {
    pub count: usize,
    pub description: String,
}

#[derive(Debug)]
pub enum StartError {
    SessionActive,
    PoolNotLoaded,
    Invalid(ValidationError),
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartError::SessionActive => write!(f, "a session is already running"),
            StartError::PoolNotLoaded => write!(f, "no items loaded; load a word list first"),
            StartError::Invalid(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for StartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartError::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for StartError {
    fn from(e: ValidationError) -> Self {
        StartError::Invalid(e)
    }
}

/// Owns the item source, the active session, and the last completed
/// session's items. All state lives here rather than in ambient globals;
/// the UI is a projection of this struct.
pub struct Trainer {
    spec: SourceSpec,
    source: Option<Box<dyn ItemSource + Send>>,
    speaker: Box<dyn Speaker>,
    session: Option<Session>,
    last_items: Vec<String>,
}

impl Trainer {
    pub fn new(spec: SourceSpec, speaker: Box<dyn Speaker>) -> Self {
        Self {
            spec,
            source: None,
            speaker,
            session: None,
            last_items: Vec::new(),
        }
    }

    /// (Re)load the item source. On failure the source is cleared, which
    /// disables session start until a load succeeds.
    pub fn load_pool(&mut self) -> Result<PoolStatus, PoolError> {
        let loaded: Result<Box<dyn ItemSource + Send>, PoolError> = match &self.spec {
            SourceSpec::EmbeddedList(name) => {
                WordPool::from_embedded(name).map(|p| Box::new(WordListSource::new(p)) as _)
            }
            SourceSpec::WordFile(path) => {
                WordPool::from_file(path).map(|p| Box::new(WordListSource::new(p)) as _)
            }
            SourceSpec::Numbers => Ok(Box::new(NumberSource::default()) as _),
        };

        match loaded {
            Ok(source) => {
                let status = PoolStatus {
                    count: source.max_count(),
                    description: source.describe(),
                };
                log::info!("loaded {}", status.description);
                self.source = Some(source);
                Ok(status)
            }
            Err(e) => {
                log::error!("pool load failed: {e}");
                self.source = None;
                // A failed load disables review as well as start.
                self.last_items.clear();
                Err(e)
            }
        }
    }

    /// Draw a fresh random subset and begin playback. Bounds are checked
    /// here, at start time, against whatever is currently loaded. Any
    /// refusal leaves prior state untouched, including the review list.
    pub fn start_session(&mut self, request: SessionRequest) -> Result<(), StartError> {
        if self.session.is_some() {
            return Err(StartError::SessionActive);
        }
        let source = self.source.as_ref().ok_or(StartError::PoolNotLoaded)?;
        request.validate(source.max_count())?;

        let items = source.draw(request.count, &mut rand::thread_rng());
        self.last_items.clear();
        self.session = Some(Session::start(items, request.delay, &mut *self.speaker));
        Ok(())
    }

    /// Advance the active session, if any. On completion the played items
    /// become the review list and the session slot is cleared
    /// unconditionally, so start is always re-enabled afterwards.
    pub fn tick(&mut self, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.tick(now, &mut *self.speaker) {
            if let Some(finished) = self.session.take() {
                self.last_items = finished.into_items();
            }
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_session_active(&self) -> bool {
        self.session.is_some()
    }

    /// Start is enabled only with a loaded source and no active session.
    pub fn can_start(&self) -> bool {
        self.session.is_none() && self.source.as_ref().is_some_and(|s| s.max_count() > 0)
    }

    /// Review is enabled only after a completed session.
    pub fn can_review(&self) -> bool {
        !self.last_items.is_empty()
    }

    /// Items of the most recent completed session, in playback order.
    /// Empty until a session completes.
    pub fn last_session_items(&self) -> &[String] {
        &self.last_items
    }

    /// Upper bound for the count setting, or None before a successful load.
    pub fn max_count(&self) -> Option<usize> {
        self.source.as_ref().map(|s| s.max_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::ScriptedSpeaker;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn word_trainer() -> Trainer {
        Trainer::new(
            SourceSpec::EmbeddedList("animals".into()),
            Box::new(ScriptedSpeaker::always_done()),
        )
    }

    fn drive_to_completion(trainer: &mut Trainer) {
        let mut guard = 0;
        while trainer.is_session_active() {
            trainer.tick(Instant::now());
            guard += 1;
            assert!(guard < 10_000, "session did not finish");
        }
    }

    #[test]
    fn start_refused_before_load() {
        let mut trainer = word_trainer();
        let req = SessionRequest::from_seconds(2, 0.0).unwrap();
        assert_matches!(trainer.start_session(req), Err(StartError::PoolNotLoaded));
        assert!(!trainer.can_start());
        assert!(!trainer.can_review());
    }

    #[test]
    fn load_failure_clears_source_and_disables_start() {
        let mut trainer = Trainer::new(
            SourceSpec::WordFile("/no/such/file.txt".into()),
            Box::new(ScriptedSpeaker::always_done()),
        );
        assert!(trainer.load_pool().is_err());
        assert!(!trainer.can_start());
        assert_eq!(trainer.max_count(), None);
    }

    #[test]
    fn failed_reload_disables_review_too() {
        use std::io::Write;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "cat\ndog\nbird").unwrap();
        drop(file);

        let mut trainer = Trainer::new(
            SourceSpec::WordFile(path.clone()),
            Box::new(ScriptedSpeaker::always_done()),
        );
        trainer.load_pool().unwrap();
        trainer
            .start_session(SessionRequest::from_seconds(2, 0.0).unwrap())
            .unwrap();
        drive_to_completion(&mut trainer);
        assert!(trainer.can_review());

        // The resource goes away; the reload failure must disable both
        // start and review.
        std::fs::remove_file(&path).unwrap();
        assert!(trainer.load_pool().is_err());
        assert!(!trainer.can_start());
        assert!(!trainer.can_review());
        assert!(trainer.last_session_items().is_empty());
    }

    #[test]
    fn full_session_produces_review_list_in_playback_order() {
        let mut trainer = Trainer::new(
            SourceSpec::EmbeddedList("animals".into()),
            Box::new(ScriptedSpeaker::always_done()),
        );
        let status = trainer.load_pool().unwrap();
        assert!(status.count > 0);

        let req = SessionRequest::from_seconds(5, 0.0).unwrap();
        trainer.start_session(req).unwrap();
        assert!(trainer.is_session_active());
        assert!(!trainer.can_start());

        drive_to_completion(&mut trainer);

        assert!(trainer.can_review());
        assert_eq!(trainer.last_session_items().len(), 5);
        assert!(trainer.can_start());
    }

    #[test]
    fn second_start_refused_while_active() {
        let mut trainer = word_trainer();
        trainer.load_pool().unwrap();

        let req = SessionRequest::from_seconds(3, 10.0).unwrap();
        trainer.start_session(req).unwrap();
        assert_matches!(trainer.start_session(req), Err(StartError::SessionActive));

        // The running session is unaffected by the refusal.
        assert_eq!(trainer.session().unwrap().position().1, 3);
    }

    #[test]
    fn oversized_count_refused_without_state_change() {
        let mut trainer = word_trainer();
        let status = trainer.load_pool().unwrap();

        let req = SessionRequest::from_seconds(status.count + 1, 0.0).unwrap();
        assert_matches!(
            trainer.start_session(req),
            Err(StartError::Invalid(ValidationError::CountExceedsPool { .. }))
        );
        assert!(!trainer.is_session_active());

        let zero = SessionRequest::from_seconds(0, 0.0).unwrap();
        assert_matches!(
            trainer.start_session(zero),
            Err(StartError::Invalid(ValidationError::ZeroCount))
        );
    }

    #[test]
    fn refusal_preserves_previous_review_list() {
        let mut trainer = word_trainer();
        trainer.load_pool().unwrap();

        trainer
            .start_session(SessionRequest::from_seconds(2, 0.0).unwrap())
            .unwrap();
        drive_to_completion(&mut trainer);
        let previous = trainer.last_session_items().to_vec();

        let bad = SessionRequest {
            count: 0,
            delay: Duration::ZERO,
        };
        assert!(trainer.start_session(bad).is_err());
        assert_eq!(trainer.last_session_items(), previous.as_slice());
    }

    #[test]
    fn starting_a_session_clears_the_old_review_list() {
        let mut trainer = word_trainer();
        trainer.load_pool().unwrap();

        trainer
            .start_session(SessionRequest::from_seconds(2, 0.0).unwrap())
            .unwrap();
        drive_to_completion(&mut trainer);
        assert!(trainer.can_review());

        trainer
            .start_session(SessionRequest::from_seconds(2, 10.0).unwrap())
            .unwrap();
        assert!(!trainer.can_review());
        assert!(trainer.last_session_items().is_empty());
    }

    #[test]
    fn number_mode_needs_no_resource() {
        let mut trainer = Trainer::new(
            SourceSpec::Numbers,
            Box::new(ScriptedSpeaker::always_done()),
        );
        let status = trainer.load_pool().unwrap();
        assert_eq!(status.count, 100);

        trainer
            .start_session(SessionRequest::from_seconds(4, 0.0).unwrap())
            .unwrap();
        drive_to_completion(&mut trainer);

        let items = trainer.last_session_items();
        assert_eq!(items.len(), 4);
        for item in items {
            let n: u32 = item.parse().unwrap();
            assert!((1..=100).contains(&n));
        }
    }

    #[test]
    fn reload_replaces_the_pool_wholesale() {
        use std::io::Write;
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "red\ngreen\nblue").unwrap();

        let mut trainer = Trainer::new(
            SourceSpec::WordFile(tmp.path().to_path_buf()),
            Box::new(ScriptedSpeaker::always_done()),
        );
        assert_eq!(trainer.load_pool().unwrap().count, 3);

        writeln!(tmp, "yellow").unwrap();
        tmp.flush().unwrap();
        assert_eq!(trainer.load_pool().unwrap().count, 4);
    }
}
