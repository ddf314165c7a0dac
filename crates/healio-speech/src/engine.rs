//! Text-to-speech engines.
//!
//! An engine plays one utterance at a time and reports how it ended through a
//! `SpeechEvent` on the channel it was handed. The adapter never relies on
//! callbacks mutating its state directly.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};

use crate::error::SpeechError;

/// Identifies one `speak` call so late completion events can be matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtteranceId(pub u64);

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utterance-{}", self.0)
    }
}

/// How an utterance ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Playback reached the end.
    Done(UtteranceId),
    /// Playback was interrupted.
    Stopped(UtteranceId),
}

impl SpeechEvent {
    pub fn utterance(&self) -> UtteranceId {
        match self {
            SpeechEvent::Done(id) | SpeechEvent::Stopped(id) => *id,
        }
    }
}

pub type SpeechEventSender = mpsc::UnboundedSender<SpeechEvent>;
pub type SpeechEventReceiver = mpsc::UnboundedReceiver<SpeechEvent>;

/// Create the channel completion events travel on.
pub fn event_channel() -> (SpeechEventSender, SpeechEventReceiver) {
    mpsc::unbounded_channel()
}

/// Platform text-to-speech capability.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Start speaking `text`. Returns once playback has started; the end of
    /// playback is reported on `events`.
    async fn speak(
        &self,
        id: UtteranceId,
        text: &str,
        events: SpeechEventSender,
    ) -> Result<(), SpeechError>;

    /// Interrupt the current utterance, if any.
    async fn stop(&self) -> Result<(), SpeechError>;

    /// Whether the engine is currently playing anything, including utterances
    /// started by someone else.
    async fn is_speaking(&self) -> bool;
}

// =============================================================================
// SilentSpeechEngine
// =============================================================================

/// Engine used when speech is disabled or no TTS program is configured.
///
/// Every utterance completes immediately.
#[derive(Debug, Default)]
pub struct SilentSpeechEngine;

impl SilentSpeechEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SpeechEngine for SilentSpeechEngine {
    async fn speak(
        &self,
        id: UtteranceId,
        text: &str,
        events: SpeechEventSender,
    ) -> Result<(), SpeechError> {
        tracing::debug!(%id, text_len = text.len(), "Silent engine: skipping playback");
        let _ = events.send(SpeechEvent::Done(id));
        Ok(())
    }

    async fn stop(&self) -> Result<(), SpeechError> {
        Ok(())
    }

    async fn is_speaking(&self) -> bool {
        false
    }
}

// =============================================================================
// CommandSpeechEngine
// =============================================================================

struct Playback {
    id: UtteranceId,
    active: Arc<AtomicBool>,
    cancel: Option<oneshot::Sender<()>>,
}

/// Engine that runs an external TTS program (`espeak`, `say`, ...) once per
/// utterance, with the text as the last argument.
pub struct CommandSpeechEngine {
    program: String,
    args: Vec<String>,
    current: Mutex<Option<Playback>>,
}

impl CommandSpeechEngine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            current: Mutex::new(None),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn lock_current(&self) -> std::sync::MutexGuard<'_, Option<Playback>> {
        // A poisoned lock only means a panic elsewhere; the slot is still usable.
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for CommandSpeechEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpeechEngine")
            .field("program", &self.program)
            .field("args", &self.args)
            .finish()
    }
}

#[async_trait]
impl SpeechEngine for CommandSpeechEngine {
    async fn speak(
        &self,
        id: UtteranceId,
        text: &str,
        events: SpeechEventSender,
    ) -> Result<(), SpeechError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SpeechError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let active = Arc::new(AtomicBool::new(true));
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

        tracing::debug!(%id, program = %self.program, text_len = text.len(), "Speech started");

        let watcher_active = Arc::clone(&active);
        tokio::spawn(async move {
            let event = tokio::select! {
                status = child.wait() => {
                    if let Err(e) = status {
                        tracing::warn!(%id, error = %e, "Speech program wait failed");
                    }
                    SpeechEvent::Done(id)
                }
                _ = cancel_rx => {
                    if let Err(e) = child.kill().await {
                        tracing::warn!(%id, error = %e, "Failed to kill speech program");
                    }
                    SpeechEvent::Stopped(id)
                }
            };
            watcher_active.store(false, Ordering::SeqCst);
            tracing::debug!(?event, "Speech finished");
            let _ = events.send(event);
        });

        *self.lock_current() = Some(Playback {
            id,
            active,
            cancel: Some(cancel_tx),
        });
        Ok(())
    }

    async fn stop(&self) -> Result<(), SpeechError> {
        let playback = self.lock_current().take();
        let Some(mut playback) = playback else {
            return Ok(());
        };
        if !playback.active.load(Ordering::SeqCst) {
            return Ok(());
        }
        match playback.cancel.take() {
            Some(cancel) => cancel.send(()).map_err(|_| {
                SpeechError::Stop(format!("{} already finished", playback.id))
            }),
            None => Ok(()),
        }
    }

    async fn is_speaking(&self) -> bool {
        self.lock_current()
            .as_ref()
            .map(|p| p.active.load(Ordering::SeqCst))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn next_event(rx: &mut SpeechEventReceiver) -> SpeechEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for speech event")
            .expect("event channel closed")
    }

    #[tokio::test]
    async fn test_silent_engine_completes_immediately() {
        let engine = SilentSpeechEngine::new();
        let (tx, mut rx) = event_channel();

        engine.speak(UtteranceId(7), "hello", tx).await.unwrap();
        assert!(!engine.is_speaking().await);
        assert_eq!(next_event(&mut rx).await, SpeechEvent::Done(UtteranceId(7)));
        assert!(engine.stop().await.is_ok());
    }

    #[tokio::test]
    async fn test_command_engine_missing_program_is_spawn_error() {
        let engine = CommandSpeechEngine::new("healio-no-such-tts-program", vec![]);
        let (tx, _rx) = event_channel();

        let err = engine.speak(UtteranceId(1), "hi", tx).await.unwrap_err();
        assert!(matches!(err, SpeechError::Spawn { .. }));
        assert!(!engine.is_speaking().await);
    }

    #[tokio::test]
    async fn test_stop_without_playback_is_ok() {
        let engine = CommandSpeechEngine::new("true", vec![]);
        assert!(engine.stop().await.is_ok());
        assert!(!engine.is_speaking().await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_engine_reports_done() {
        // `true` ignores its arguments and exits at once.
        let engine = CommandSpeechEngine::new("true", vec![]);
        let (tx, mut rx) = event_channel();

        engine.speak(UtteranceId(3), "hello", tx).await.unwrap();
        assert_eq!(next_event(&mut rx).await, SpeechEvent::Done(UtteranceId(3)));
        assert!(!engine.is_speaking().await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_engine_stop_reports_stopped() {
        // `sleep 30` stands in for a long utterance; the text becomes an
        // extra argument, so pass it through `sh -c` which ignores $1.
        let engine = CommandSpeechEngine::new(
            "sh",
            vec!["-c".to_string(), "sleep 30".to_string(), "tts".to_string()],
        );
        let (tx, mut rx) = event_channel();

        engine.speak(UtteranceId(4), "long text", tx).await.unwrap();
        assert!(engine.is_speaking().await);

        engine.stop().await.unwrap();
        assert_eq!(
            next_event(&mut rx).await,
            SpeechEvent::Stopped(UtteranceId(4))
        );
        assert!(!engine.is_speaking().await);
    }

    #[test]
    fn test_event_utterance() {
        assert_eq!(SpeechEvent::Done(UtteranceId(2)).utterance(), UtteranceId(2));
        assert_eq!(
            SpeechEvent::Stopped(UtteranceId(9)).utterance(),
            UtteranceId(9)
        );
        assert_eq!(UtteranceId(5).to_string(), "utterance-5");
    }
}
