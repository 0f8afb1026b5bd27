//! Best-effort text-to-speech.
//!
//! Utterances pass a global cooldown gate, then wait in a single pending
//! slot for the speech worker. A newer utterance replaces one that has not
//! started yet. Backend failures are logged and otherwise dropped.

use anyhow::{bail, Context, Result};
use std::process::{Command, Stdio};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::SpeechConfig;
use crate::log;
use crate::logging::Logger;

pub trait Speaker: Send {
    /// Speak `text`, returning once playback has finished
    fn say(&mut self, text: &str) -> Result<()>;
}

/// Runs an external TTS program with the utterance as its last argument
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }
}

impl Speaker for CommandSpeaker {
    fn say(&mut self, text: &str) -> Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| format!("failed to run {}", self.program))?;
        if !status.success() {
            bail!("{} exited with {}", self.program, status);
        }
        Ok(())
    }
}

pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn say(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}

/// Minimum spacing between accepted utterances, shared by every caller
#[derive(Debug)]
pub struct CooldownGate {
    cooldown: Duration,
    last: Mutex<Option<Instant>>,
}

impl CooldownGate {
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown, last: Mutex::new(None) }
    }

    /// Claim the gate at `now`. Check and update happen under one lock.
    pub fn try_acquire(&self, now: Instant) -> bool {
        let Ok(mut last) = self.last.lock() else { return false };
        let open = match *last {
            None => true,
            Some(t) => now.saturating_duration_since(t) >= self.cooldown,
        };
        if open {
            *last = Some(now);
        }
        open
    }
}

#[derive(Default)]
struct Slot {
    pending: Option<String>,
    shutdown: bool,
}

struct Shared {
    slot: Mutex<Slot>,
    ready: Condvar,
    gate: CooldownGate,
}

/// Cheap cloneable handle for requesting speech from any thread
#[derive(Clone)]
pub struct SpeechHandle {
    shared: Arc<Shared>,
}

impl SpeechHandle {
    /// Queue `text` unless the cooldown is active. Returns whether it was accepted.
    pub fn speak(&self, text: &str) -> bool {
        self.speak_at(text, Instant::now())
    }

    pub fn speak_at(&self, text: &str, now: Instant) -> bool {
        if !self.shared.gate.try_acquire(now) {
            return false;
        }
        let Ok(mut slot) = self.shared.slot.lock() else { return false };
        if slot.shutdown {
            return false;
        }
        slot.pending = Some(text.to_string());
        self.shared.ready.notify_one();
        true
    }
}

pub struct SpeechDispatcher {
    handle: SpeechHandle,
    worker: Option<JoinHandle<()>>,
}

impl SpeechDispatcher {
    pub fn spawn(speaker: Box<dyn Speaker>, cooldown: Duration, logger: Logger) -> Self {
        let shared = Arc::new(Shared {
            slot: Mutex::new(Slot::default()),
            ready: Condvar::new(),
            gate: CooldownGate::new(cooldown),
        });
        let worker_shared = shared.clone();
        let worker = thread::spawn(move || speech_worker(worker_shared, speaker, logger));
        Self { handle: SpeechHandle { shared }, worker: Some(worker) }
    }

    pub fn from_config(config: &SpeechConfig, logger: Logger) -> Self {
        let speaker: Box<dyn Speaker> = if config.enabled {
            Box::new(CommandSpeaker::new(config.program.clone(), config.args.clone()))
        } else {
            Box::new(SilentSpeaker)
        };
        Self::spawn(speaker, config.cooldown(), logger)
    }

    pub fn handle(&self) -> SpeechHandle {
        self.handle.clone()
    }

    pub fn speak(&self, text: &str) -> bool {
        self.handle.speak(text)
    }
}

impl Drop for SpeechDispatcher {
    /// Finishes any pending utterance, then stops the worker
    fn drop(&mut self) {
        if let Ok(mut slot) = self.handle.shared.slot.lock() {
            slot.shutdown = true;
        }
        self.handle.shared.ready.notify_all();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn speech_worker(shared: Arc<Shared>, mut speaker: Box<dyn Speaker>, logger: Logger) {
    loop {
        let text = {
            let Ok(mut slot) = shared.slot.lock() else { return };
            while slot.pending.is_none() && !slot.shutdown {
                slot = match shared.ready.wait(slot) {
                    Ok(s) => s,
                    Err(_) => return,
                };
            }
            match slot.pending.take() {
                Some(text) => text,
                None => return,
            }
        };
        if let Err(e) = speaker.say(&text) {
            log!(logger, "[speech] {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    struct RecordingSpeaker {
        spoken: Arc<Mutex<Vec<String>>>,
        started: mpsc::Sender<()>,
        release: mpsc::Receiver<()>,
    }

    impl Speaker for RecordingSpeaker {
        fn say(&mut self, text: &str) -> Result<()> {
            let _ = self.started.send(());
            let _ = self.release.recv();
            self.spoken.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct FailingSpeaker;

    impl Speaker for FailingSpeaker {
        fn say(&mut self, _text: &str) -> Result<()> {
            bail!("no audio device")
        }
    }

    #[test]
    fn test_gate_cooldown() {
        let gate = CooldownGate::new(Duration::from_secs(4));
        let t0 = Instant::now();
        assert!(gate.try_acquire(t0));
        assert!(!gate.try_acquire(t0 + Duration::from_secs(1)));
        assert!(!gate.try_acquire(t0 + Duration::from_millis(3999)));
        assert!(gate.try_acquire(t0 + Duration::from_secs(4)));
    }

    #[test]
    fn test_gate_is_atomic_across_threads() {
        let gate = Arc::new(CooldownGate::new(Duration::from_secs(60)));
        let now = Instant::now();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gate = gate.clone();
                thread::spawn(move || gate.try_acquire(now))
            })
            .collect();
        let accepted = handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count();
        assert_eq!(accepted, 1);
    }

    #[test]
    fn test_newest_request_supersedes_pending() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let speaker = RecordingSpeaker {
            spoken: spoken.clone(),
            started: started_tx,
            release: release_rx,
        };
        let dispatcher = SpeechDispatcher::spawn(Box::new(speaker), Duration::ZERO, Logger::stderr_only());

        assert!(dispatcher.speak("first"));
        started_rx.recv().unwrap();
        // worker is busy with "first"; these compete for the single slot
        assert!(dispatcher.speak("second"));
        assert!(dispatcher.speak("third"));
        release_tx.send(()).unwrap();
        release_tx.send(()).unwrap();
        drop(dispatcher);

        assert_eq!(*spoken.lock().unwrap(), ["first", "third"]);
    }

    #[test]
    fn test_cooldown_rejects_second_request() {
        let dispatcher =
            SpeechDispatcher::spawn(Box::new(SilentSpeaker), Duration::from_secs(4), Logger::stderr_only());
        let handle = dispatcher.handle();
        let t0 = Instant::now();
        assert!(handle.speak_at("one", t0));
        assert!(!handle.speak_at("two", t0 + Duration::from_secs(1)));
        assert!(handle.speak_at("three", t0 + Duration::from_secs(5)));
    }

    #[test]
    fn test_failures_are_swallowed() {
        let dispatcher =
            SpeechDispatcher::spawn(Box::new(FailingSpeaker), Duration::ZERO, Logger::stderr_only());
        assert!(dispatcher.speak("hello"));
        assert!(dispatcher.speak("again"));
        drop(dispatcher);
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let mut speaker = CommandSpeaker::new("definitely-not-a-tts-program", Vec::new());
        assert!(speaker.say("hello").is_err());
    }
}
