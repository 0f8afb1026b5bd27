use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::classify::PoseTarget;
use crate::config::SessionConfig;
use crate::error::CoachError;
use crate::log;
use crate::logging::Logger;
use crate::session::controller::{timer_text, SessionController, SessionEvent, SessionState};
use crate::session::hold::HoldSetting;
use crate::session::sink::{FrameUpdate, SessionOutcome, SessionSink};
use crate::source::FrameSource;
use crate::speech::SpeechHandle;

type Clock = Box<dyn FnMut() -> Instant + Send>;

/// Drives one session: read a frame, classify it, advance the controller, report.
pub struct SessionRunner {
    target: PoseTarget,
    controller: SessionController,
    hold: HoldSetting,
    speech: Option<SpeechHandle>,
    frame_delay: Duration,
    running: Arc<AtomicBool>,
    logger: Logger,
    clock: Clock,
    display_secs: u32,
}

impl SessionRunner {
    pub fn new(target: PoseTarget, config: &SessionConfig, hold: HoldSetting, logger: Logger) -> Self {
        Self {
            target,
            controller: SessionController::from_config(config),
            hold,
            speech: None,
            frame_delay: config.frame_delay(),
            running: Arc::new(AtomicBool::new(true)),
            logger,
            clock: Box::new(Instant::now),
            display_secs: 0,
        }
    }

    pub fn with_speech(mut self, speech: SpeechHandle) -> Self {
        self.speech = Some(speech);
        self
    }

    /// Replace the wall clock, e.g. to replay a recording at simulated speed
    pub fn with_clock(mut self, clock: impl FnMut() -> Instant + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Flag checked once per frame; clearing it ends the session
    pub fn running(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    pub fn state(&self) -> SessionState {
        self.controller.state()
    }

    /// Run the session to completion on the current thread
    pub fn run<S, K>(&mut self, source: &mut S, sink: &mut K) -> SessionOutcome
    where
        S: FrameSource + ?Sized,
        K: SessionSink + ?Sized,
    {
        let events = self.controller.start(self.target.name(), self.hold.seconds());
        log!(self.logger, "[session] start {} ({}s)", self.target.name(), self.hold.seconds());
        self.dispatch(&events, sink);

        loop {
            if !self.running.load(Ordering::SeqCst) {
                return self.finish(SessionOutcome::Stopped, sink);
            }

            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    log!(self.logger, "[session] frame source exhausted");
                    return self.finish(SessionOutcome::Stopped, sink);
                }
                Err(e) => {
                    let err = CoachError::DeviceUnavailable(format!("{e:#}"));
                    log!(self.logger, "[session] {err}");
                    sink.set_status(&err.to_string());
                    return self.finish(SessionOutcome::DeviceUnavailable(format!("{e:#}")), sink);
                }
            };

            let required = self.hold.seconds();
            self.controller.set_required_secs(required);
            if self.controller.state() == SessionState::Armed {
                self.display_secs = required;
            }

            let now = (self.clock)();
            let verdict = frame.skeleton.as_ref().map(|s| self.target.classify(s));
            if let Some(verdict) = &verdict {
                let events = self.controller.on_frame(verdict, now);
                self.dispatch(&events, sink);
            }

            sink.frame_processed(FrameUpdate {
                frame: frame.pixels,
                skeleton: frame.skeleton,
                verdict,
                remaining_secs: self.display_secs,
                required_secs: required,
            });

            if self.controller.state() == SessionState::Completed {
                return self.finish(SessionOutcome::Completed, sink);
            }

            if !self.frame_delay.is_zero() {
                thread::sleep(self.frame_delay);
            }
        }
    }

    /// Run on a worker thread. The source is opened on the worker and dropped
    /// there on every exit path.
    pub fn spawn<S, F, K>(mut self, open_source: F, mut sink: K) -> SessionHandle
    where
        S: FrameSource,
        F: FnOnce() -> Result<S> + Send + 'static,
        K: SessionSink + 'static,
    {
        let running = self.running.clone();
        let handle = thread::spawn(move || match open_source() {
            Ok(mut source) => self.run(&mut source, &mut sink),
            Err(e) => {
                let reason = format!("{e:#}");
                let err = CoachError::DeviceUnavailable(reason.clone());
                log!(self.logger, "[session] {err}");
                sink.set_status(&err.to_string());
                self.controller.start(self.target.name(), self.hold.seconds());
                self.finish(SessionOutcome::DeviceUnavailable(reason), &mut sink)
            }
        });
        SessionHandle { running, worker: Some(handle) }
    }

    fn finish<K: SessionSink + ?Sized>(&mut self, outcome: SessionOutcome, sink: &mut K) -> SessionOutcome {
        if outcome != SessionOutcome::Completed {
            let events = self.controller.stop();
            self.dispatch(&events, sink);
        } else {
            log!(self.logger, "[session] {} completed", self.target.name());
        }
        self.running.store(false, Ordering::SeqCst);
        sink.session_ended(outcome.clone());
        outcome
    }

    fn dispatch<K: SessionSink + ?Sized>(&mut self, events: &[SessionEvent], sink: &mut K) {
        for event in events {
            match event {
                SessionEvent::HoldStarted { .. } => log!(self.logger, "[session] hold started"),
                SessionEvent::TimerReset { .. } => log!(self.logger, "[session] hold interrupted"),
                SessionEvent::Correction(_) | SessionEvent::WrongPose { .. } => {
                    if let Some(status) = event.status() {
                        log!(self.logger, "[feedback] {status}");
                    }
                }
                _ => {}
            }
            if let Some(status) = event.status() {
                sink.set_status(&status);
            }
            if let Some(secs) = event.timer_secs() {
                self.display_secs = secs;
                sink.set_timer(&timer_text(secs));
            }
            if let (Some(text), Some(speech)) = (event.speech(), &self.speech) {
                speech.speak(&text);
            }
        }
    }
}

/// Owner side of a spawned session
pub struct SessionHandle {
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<SessionOutcome>>,
}

impl SessionHandle {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Ask the worker to stop after the current frame
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Wait for the worker. `None` if it panicked or was already joined.
    pub fn join(&mut self) -> Option<SessionOutcome> {
        self.worker.take().and_then(|w| w.join().ok())
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.stop();
        let _ = self.join();
    }
}
