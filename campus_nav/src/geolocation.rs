//! Continuous position watching as a polled state machine.
//!
//! A [`PositionSource`] stands in for the platform geolocation service. It
//! pushes [`PositionEvent`]s into a channel; [`GeolocationWatcher`] drains the
//! channel on [`poll`](GeolocationWatcher::poll) and keeps only the newest
//! event.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use thiserror::Error;

use crate::geometry::GeoPoint;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Geolocation is not supported")]
    Unsupported,
    #[error("Location access denied by user")]
    PermissionDenied,
    #[error("Location information unavailable")]
    PositionUnavailable,
    #[error("Location request timed out")]
    Timeout,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionSample {
    pub point: GeoPoint,
    /// Accuracy radius in meters when the source reports one.
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl PositionSample {
    pub fn new(point: GeoPoint) -> Self {
        Self {
            point,
            accuracy: None,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PositionEvent {
    Sample(PositionSample),
    Error(GeolocationError),
}

/// Options passed to the platform watch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub maximum_age: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_millis(10_000),
            maximum_age: Duration::from_millis(60_000),
        }
    }
}

/// Handle of an active platform subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

/// Platform service delivering position updates.
pub trait PositionSource {
    /// Starts delivering events into `sink` until the watch is cleared.
    fn watch(
        &mut self,
        options: &WatchOptions,
        sink: Sender<PositionEvent>,
    ) -> Result<WatchId, GeolocationError>;

    /// Releases the subscription. Must tolerate unknown ids.
    fn clear_watch(&mut self, id: WatchId);
}

/// Current state of a [`GeolocationWatcher`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WatchState {
    #[default]
    Idle,
    /// Subscribed, no event received yet.
    Waiting,
    Located(PositionSample),
    Failed(GeolocationError),
    Stopped,
}

pub struct GeolocationWatcher<S: PositionSource> {
    source: S,
    options: WatchOptions,
    state: WatchState,
    active: Option<(WatchId, Receiver<PositionEvent>)>,
}

impl<S: PositionSource> GeolocationWatcher<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, WatchOptions::default())
    }

    pub fn with_options(source: S, options: WatchOptions) -> Self {
        Self {
            source,
            options,
            state: WatchState::Idle,
            active: None,
        }
    }

    /// Subscribes to the source. Calling it while already watching is a no-op.
    pub fn start(&mut self) -> &WatchState {
        if self.active.is_some() {
            return &self.state;
        }
        let (tx, rx) = unbounded();
        match self.source.watch(&self.options, tx) {
            Ok(id) => {
                log::debug!("position watch {:?} started", id);
                self.active = Some((id, rx));
                self.state = WatchState::Waiting;
            }
            Err(e) => {
                log::warn!("position watch unavailable: {e}");
                self.state = WatchState::Failed(e);
            }
        }
        &self.state
    }

    /// Applies every pending event; the latest one wins.
    ///
    /// When the source closes the watch, the subscription is released. A
    /// watch closed before any event fails with
    /// [`GeolocationError::PositionUnavailable`].
    pub fn poll(&mut self) -> &WatchState {
        let Some((id, rx)) = &self.active else {
            return &self.state;
        };
        let id = *id;
        let closed = loop {
            match rx.try_recv() {
                Ok(PositionEvent::Sample(sample)) => self.state = WatchState::Located(sample),
                Ok(PositionEvent::Error(e)) => {
                    log::warn!("position watch {:?}: {e}", id);
                    self.state = WatchState::Failed(e);
                }
                Err(TryRecvError::Empty) => break false,
                Err(TryRecvError::Disconnected) => break true,
            }
        };
        if closed {
            log::debug!("position source closed watch {:?}", id);
            self.active = None;
            self.source.clear_watch(id);
            if self.state == WatchState::Waiting {
                self.state = WatchState::Failed(GeolocationError::PositionUnavailable);
            }
        }
        &self.state
    }

    /// Releases the platform subscription. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some((id, _rx)) = self.active.take() {
            self.source.clear_watch(id);
            log::debug!("position watch {:?} cleared", id);
            self.state = WatchState::Stopped;
        }
    }

    pub fn state(&self) -> &WatchState {
        &self.state
    }

    pub fn is_watching(&self) -> bool {
        self.active.is_some()
    }

    /// Latest known location. Any error clears it.
    pub fn location(&self) -> Option<GeoPoint> {
        match &self.state {
            WatchState::Located(sample) => Some(sample.point),
            _ => None,
        }
    }

    /// Human-readable error of the last event, if it was one.
    pub fn error(&self) -> Option<String> {
        match &self.state {
            WatchState::Failed(e) => Some(e.to_string()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, WatchState::Waiting)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S: PositionSource> Drop for GeolocationWatcher<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Source for environments without geolocation.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedSource;

impl PositionSource for UnsupportedSource {
    fn watch(
        &mut self,
        _options: &WatchOptions,
        _sink: Sender<PositionEvent>,
    ) -> Result<WatchId, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }

    fn clear_watch(&mut self, _id: WatchId) {}
}

/// Source that delivers a scripted list of events to each new watch and
/// forwards later [`emit`](ReplaySource::emit) calls to all active watches.
#[derive(Debug, Default)]
pub struct ReplaySource {
    script: Vec<PositionEvent>,
    next_id: u64,
    sinks: Vec<(WatchId, Sender<PositionEvent>)>,
    registered: Vec<WatchId>,
    active: Rc<Cell<usize>>,
}

impl ReplaySource {
    pub fn new(script: Vec<PositionEvent>) -> Self {
        Self {
            script,
            next_id: 1,
            sinks: Vec::new(),
            registered: Vec::new(),
            active: Rc::default(),
        }
    }

    /// Sends `event` to every active watch.
    pub fn emit(&mut self, event: PositionEvent) {
        for (_, tx) in &self.sinks {
            let _ = tx.send(event.clone());
        }
    }

    /// Drops every sender, as a platform does when it gives up on a watch.
    /// The watches stay registered until cleared.
    pub fn close_all(&mut self) {
        self.sinks.clear();
    }

    /// Watches started and not yet cleared.
    pub fn active_watches(&self) -> usize {
        self.active.get()
    }

    /// Shared view of [`active_watches`](ReplaySource::active_watches) that
    /// outlives the source.
    pub fn watch_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.active)
    }
}

impl PositionSource for ReplaySource {
    fn watch(
        &mut self,
        _options: &WatchOptions,
        sink: Sender<PositionEvent>,
    ) -> Result<WatchId, GeolocationError> {
        let id = WatchId(self.next_id);
        self.next_id += 1;
        for event in &self.script {
            // The receiver lives in the watcher that is being set up.
            let _ = sink.send(event.clone());
        }
        self.sinks.push((id, sink));
        self.registered.push(id);
        self.active.set(self.registered.len());
        Ok(id)
    }

    fn clear_watch(&mut self, id: WatchId) {
        self.sinks.retain(|(sid, _)| *sid != id);
        self.registered.retain(|r| *r != id);
        self.active.set(self.registered.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(lat: f64, lng: f64) -> PositionEvent {
        PositionEvent::Sample(PositionSample::new(GeoPoint::new(lat, lng)))
    }

    #[test]
    fn unsupported_source_fails_gracefully() {
        let mut w = GeolocationWatcher::new(UnsupportedSource);
        w.start();
        assert!(w.location().is_none());
        assert_eq!(w.error().as_deref(), Some("Geolocation is not supported"));
        assert!(!w.is_loading());
        assert!(!w.is_watching());
    }

    #[test]
    fn waiting_until_first_sample() {
        let mut w = GeolocationWatcher::new(ReplaySource::new(Vec::new()));
        assert_eq!(w.state(), &WatchState::Idle);
        w.start();
        assert!(w.is_loading());
        w.poll();
        assert!(w.is_loading());
    }

    #[test]
    fn last_event_wins() {
        let script = vec![sample(1.0, 1.0), sample(2.0, 2.0)];
        let mut w = GeolocationWatcher::new(ReplaySource::new(script));
        w.start();
        w.poll();
        assert_eq!(w.location(), Some(GeoPoint::new(2.0, 2.0)));
    }

    #[test]
    fn later_samples_replace_earlier_ones() {
        let mut w = GeolocationWatcher::new(ReplaySource::new(vec![sample(1.0, 1.0)]));
        w.start();
        w.poll();
        w.source_mut().emit(sample(3.0, 4.0));
        assert_eq!(w.location(), Some(GeoPoint::new(1.0, 1.0)));
        w.poll();
        assert_eq!(w.location(), Some(GeoPoint::new(3.0, 4.0)));
    }

    #[test]
    fn error_clears_location() {
        let script = vec![sample(1.0, 1.0), PositionEvent::Error(GeolocationError::Timeout)];
        let mut w = GeolocationWatcher::new(ReplaySource::new(script));
        w.start();
        w.poll();
        assert!(w.location().is_none());
        assert_eq!(w.error().as_deref(), Some("Location request timed out"));
    }

    #[test]
    fn stop_releases_subscription_once() {
        let mut w = GeolocationWatcher::new(ReplaySource::new(Vec::new()));
        w.start();
        w.start();
        assert_eq!(w.source().active_watches(), 1);
        w.stop();
        assert_eq!(w.source().active_watches(), 0);
        assert_eq!(w.state(), &WatchState::Stopped);
        w.stop();
        assert_eq!(w.state(), &WatchState::Stopped);
    }

    #[test]
    fn dropping_watcher_clears_its_watch() {
        let source = ReplaySource::new(vec![sample(1.0, 1.0)]);
        let watches = source.watch_counter();
        {
            let mut w = GeolocationWatcher::new(source);
            w.start();
            w.poll();
            assert_eq!(watches.get(), 1);
        }
        assert_eq!(watches.get(), 0);
    }

    #[test]
    fn dropping_stopped_watcher_does_not_clear_twice() {
        let source = ReplaySource::new(Vec::new());
        let watches = source.watch_counter();
        let mut first = GeolocationWatcher::new(source);
        first.start();
        first.stop();
        drop(first);
        assert_eq!(watches.get(), 0);
    }

    #[test]
    fn closed_watch_without_events_fails() {
        let mut w = GeolocationWatcher::new(ReplaySource::new(Vec::new()));
        w.start();
        w.source_mut().close_all();
        assert_eq!(
            w.poll(),
            &WatchState::Failed(GeolocationError::PositionUnavailable)
        );
        assert!(!w.is_loading());
        assert!(!w.is_watching());
        assert_eq!(w.source().active_watches(), 0);
        assert_eq!(w.error().as_deref(), Some("Location information unavailable"));
    }

    #[test]
    fn closed_watch_keeps_last_location() {
        let mut w = GeolocationWatcher::new(ReplaySource::new(vec![sample(5.0, 6.0)]));
        w.start();
        w.source_mut().close_all();
        w.poll();
        assert_eq!(w.location(), Some(GeoPoint::new(5.0, 6.0)));
        assert!(!w.is_watching());
    }
}
