//! Run control: cooperative cancellation and progress reporting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

/// Snapshot emitted every `progress_interval` iterations and once at the end.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressEvent {
    pub iteration: usize,
    pub best_score: f64,
    pub elapsed_ms: u64,
}

/// Sending half of a progress channel.
pub type ProgressSender = Sender<ProgressEvent>;

/// Lazy, finite sequence of progress events for one run.
///
/// Iteration blocks until the next event arrives and ends once every
/// sender (the run's [`RunControl`]) has been dropped. A stream cannot be
/// restarted; a new run needs a new stream.
#[derive(Debug)]
pub struct ProgressStream {
    rx: Receiver<ProgressEvent>,
}

impl ProgressStream {
    /// Creates a connected sender/stream pair.
    pub fn channel() -> (ProgressSender, ProgressStream) {
        let (tx, rx) = mpsc::channel();
        (tx, ProgressStream { rx })
    }

    /// Returns the next event if one is already buffered.
    pub fn try_next(&self) -> Option<ProgressEvent> {
        self.rx.try_recv().ok()
    }
}

impl Iterator for ProgressStream {
    type Item = ProgressEvent;

    fn next(&mut self) -> Option<ProgressEvent> {
        self.rx.recv().ok()
    }
}

/// Optional hooks observed by a run at iteration boundaries.
///
/// Neither hook affects the search itself: cancellation only ends it,
/// and progress delivery never blocks (a dropped stream is ignored).
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    cancel: Option<Arc<AtomicBool>>,
    progress: Option<ProgressSender>,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observes `flag`; setting it to `true` cancels the run at the next
    /// iteration boundary.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn with_progress(mut self, sender: ProgressSender) -> Self {
        self.progress = Some(sender);
        self
    }

    /// Attaches a fresh progress channel and returns its stream.
    pub fn with_progress_stream(self) -> (Self, ProgressStream) {
        let (tx, stream) = ProgressStream::channel();
        (self.with_progress(tx), stream)
    }

    /// Same cancel flag, no progress channel.
    pub(crate) fn silenced(&self) -> Self {
        Self {
            cancel: self.cancel.clone(),
            progress: None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    pub(crate) fn report(&self, event: ProgressEvent) {
        if let Some(tx) = &self.progress {
            // receiver gone: nobody is listening, keep searching
            let _ = tx.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_ends_when_control_dropped() {
        let (control, stream) = RunControl::new().with_progress_stream();
        for i in 0..3 {
            control.report(ProgressEvent {
                iteration: i,
                best_score: 1.0,
                elapsed_ms: 0,
            });
        }
        drop(control);
        let events: Vec<_> = stream.collect();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2].iteration, 2);
    }

    #[test]
    fn test_report_without_listener_is_silent() {
        let (control, stream) = RunControl::new().with_progress_stream();
        drop(stream);
        control.report(ProgressEvent {
            iteration: 0,
            best_score: 0.0,
            elapsed_ms: 0,
        });
    }

    #[test]
    fn test_silenced_keeps_cancel_drops_progress() {
        let flag = Arc::new(AtomicBool::new(true));
        let (control, stream) = RunControl::new().with_cancel(flag).with_progress_stream();
        let quiet = control.silenced();
        drop(control);
        assert!(quiet.is_cancelled());
        quiet.report(ProgressEvent {
            iteration: 1,
            best_score: 0.0,
            elapsed_ms: 0,
        });
        assert_eq!(stream.count(), 0);
    }

    #[test]
    fn test_cancel_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let control = RunControl::new().with_cancel(flag.clone());
        assert!(!control.is_cancelled());
        flag.store(true, Ordering::Relaxed);
        assert!(control.is_cancelled());
        assert!(!RunControl::new().is_cancelled());
    }
}
