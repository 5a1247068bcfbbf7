//! Upload progress reporting.
//!
//! Raw `progress` events from the upload are turned into a percentage and
//! forwarded to whatever displays it. Values only ever move forward.

use std::cell::Cell;

use web_sys::HtmlProgressElement;

/// Something able to display an upload percentage.
pub trait ProgressSink {
    fn show(&self, percent: f64);
}

impl ProgressSink for HtmlProgressElement {
    fn show(&self, percent: f64) {
        self.set_value(percent);
        // Fallback for browsers without <progress> support
        self.set_text_content(Some(&percent.to_string()));
    }
}

/// Snapshot of a browser `ProgressEvent`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressSample {
    pub loaded: f64,
    pub total: f64,
    pub length_computable: bool,
}

impl ProgressSample {
    /// Percentage of bytes sent, or `None` when the total is unknown.
    pub fn percent(&self) -> Option<f64> {
        if !self.length_computable || !(self.total > 0.0) {
            return None;
        }
        let percent = self.loaded / self.total * 100.0;
        if !percent.is_finite() {
            return None;
        }
        Some(percent.clamp(0.0, 100.0))
    }
}

/// Forwards upload progress to a sink, keeping it within [0, 100] and
/// non-decreasing.
pub struct ProgressReporter {
    sink: Box<dyn ProgressSink>,
    last: Cell<Option<f64>>,
}

impl ProgressReporter {
    pub fn new(sink: impl ProgressSink + 'static) -> Self {
        Self {
            sink: Box::new(sink),
            last: Cell::new(None),
        }
    }

    /// Report a sample. Returns the value shown, if any.
    pub fn report(&self, sample: ProgressSample) -> Option<f64> {
        let percent = sample.percent()?;
        if self.last.get().is_some_and(|last| percent < last) {
            return None;
        }
        self.last.set(Some(percent));
        self.sink.show(percent);
        Some(percent)
    }

    /// Last value shown.
    pub fn last(&self) -> Option<f64> {
        self.last.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<f64>>>);

    impl ProgressSink for Recorder {
        fn show(&self, percent: f64) {
            self.0.borrow_mut().push(percent);
        }
    }

    fn sample(loaded: f64, total: f64) -> ProgressSample {
        ProgressSample { loaded, total, length_computable: true }
    }

    #[test]
    fn test_unknown_total_shows_nothing() {
        let recorder = Recorder::default();
        let reporter = ProgressReporter::new(recorder.clone());

        reporter.report(ProgressSample { loaded: 10.0, total: 0.0, length_computable: false });
        reporter.report(sample(10.0, 0.0));

        assert!(recorder.0.borrow().is_empty());
        assert_eq!(reporter.last(), None);
    }

    #[test]
    fn test_values_are_bounded_and_monotonic() {
        let recorder = Recorder::default();
        let reporter = ProgressReporter::new(recorder.clone());

        for (loaded, total) in [(0.0, 200.0), (50.0, 200.0), (20.0, 200.0), (200.0, 200.0), (250.0, 200.0)] {
            reporter.report(sample(loaded, total));
        }

        let shown = recorder.0.borrow().clone();
        assert_eq!(shown, vec![0.0, 25.0, 100.0, 100.0]);
        assert!(shown.windows(2).all(|w| w[0] <= w[1]));
        assert!(shown.iter().all(|p| (0.0..=100.0).contains(p)));
    }

    #[test]
    fn test_half_way() {
        assert_eq!(sample(512.0, 1024.0).percent(), Some(50.0));
    }
}
