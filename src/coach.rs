//! Caller-facing surface: pick a pose, start and stop sessions, drain updates.

use anyhow::Result as AnyResult;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::catalog::{PoseCatalog, PoseInfo};
use crate::classify::PoseClassifier;
use crate::config::Config;
use crate::error::{CoachError, Result};
use crate::log;
use crate::logging::Logger;
use crate::session::{ChannelSink, HoldDuration, HoldSetting, SessionHandle, SessionRunner, UiUpdate};
use crate::source::FrameSource;
use crate::speech::SpeechDispatcher;

pub struct Coach {
    config: Config,
    catalog: PoseCatalog,
    classifier: PoseClassifier,
    hold: HoldSetting,
    speech: Option<SpeechDispatcher>,
    logger: Logger,
    selected: Option<String>,
    session: Option<SessionHandle>,
    tx: Sender<UiUpdate>,
    rx: Receiver<UiUpdate>,
}

impl Coach {
    pub fn new(config: Config, catalog: PoseCatalog, logger: Logger) -> Self {
        let classifier = PoseClassifier::new(catalog.names());
        for name in classifier.uncatalogued_rules() {
            log!(logger, "[catalog] no entry for {name}; it cannot be selected");
        }
        let hold = HoldSetting::new(config.session.default_hold_secs);
        let selected = catalog.default_pose().map(str::to_string);
        let (tx, rx) = mpsc::channel();
        Self {
            config,
            catalog,
            classifier,
            hold,
            speech: None,
            logger,
            selected,
            session: None,
            tx,
            rx,
        }
    }

    pub fn with_speech(mut self, speech: SpeechDispatcher) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn catalog(&self) -> &PoseCatalog {
        &self.catalog
    }

    pub fn selected_pose(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Make `pose` the current selection and return what to show for it
    pub fn select_pose(&mut self, pose: &str) -> Result<&PoseInfo> {
        let info = self.catalog.select(pose)?;
        self.selected = Some(pose.to_string());
        Ok(info)
    }

    pub fn hold_secs(&self) -> u32 {
        self.hold.seconds()
    }

    /// Applies to a running session from its next frame
    pub fn set_hold_secs(&self, secs: u32) {
        self.hold.set(secs);
    }

    pub fn set_hold(&self, duration: HoldDuration) {
        self.hold.set(duration.seconds());
    }

    pub fn cycle_hold(&self) -> HoldDuration {
        self.hold.cycle()
    }

    pub fn is_session_running(&self) -> bool {
        self.session.as_ref().is_some_and(SessionHandle::is_running)
    }

    /// Start a session on a source opened by `open_source` on the worker.
    /// Any previous session is stopped and joined first.
    pub fn start_session<S, F>(&mut self, pose: &str, required_secs: u32, open_source: F) -> Result<()>
    where
        S: FrameSource,
        F: FnOnce() -> AnyResult<S> + Send + 'static,
    {
        let target = self.classifier.target(pose).inspect_err(|e| {
            log!(self.logger, "[coach] rejected start: {e}");
        })?;
        self.stop_session();

        self.selected = Some(pose.to_string());
        self.hold.set(required_secs);
        let mut runner =
            SessionRunner::new(target, &self.config.session, self.hold.clone(), self.logger.clone());
        if let Some(speech) = &self.speech {
            runner = runner.with_speech(speech.handle());
        }
        self.session = Some(runner.spawn(open_source, ChannelSink::new(self.tx.clone())));
        Ok(())
    }

    /// Start a session for the selected pose with the current hold duration
    pub fn start_selected<S, F>(&mut self, open_source: F) -> Result<()>
    where
        S: FrameSource,
        F: FnOnce() -> AnyResult<S> + Send + 'static,
    {
        let pose = self
            .selected
            .clone()
            .ok_or_else(|| CoachError::UnrecognizedPose(String::new()))?;
        let secs = self.hold.seconds();
        self.start_session(&pose, secs, open_source)
    }

    /// Stop the running session and wait for its worker to release the source
    pub fn stop_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stop();
            session.join();
        }
    }

    /// Updates posted by the session worker since the last call
    pub fn poll_updates(&self) -> Vec<UiUpdate> {
        self.rx.try_iter().collect()
    }

    /// Block until the running session ends, returning everything it posted
    pub fn wait_session(&mut self) -> Vec<UiUpdate> {
        if let Some(mut session) = self.session.take() {
            session.join();
        }
        self.poll_updates()
    }
}

impl Drop for Coach {
    fn drop(&mut self) {
        self.stop_session();
    }
}
