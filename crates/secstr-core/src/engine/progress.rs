/// Events emitted while an assignment runs, one phase per pipeline stage.
#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,
    /// A one-line summary of a finished stage.
    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Runs `stage` bracketed by `PhaseStart` and `PhaseFinish` events.
    pub fn phase<T>(&self, name: &'static str, stage: impl FnOnce() -> T) -> T {
        self.report(Progress::PhaseStart { name });
        let result = stage();
        self.report(Progress::PhaseFinish);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_ignores_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::PhaseStart { name: "Idle" });
    }

    #[test]
    fn reporter_forwards_events_in_order() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(format!("{event:?}"));
        }));

        let answer = reporter.phase("Ladders", || {
            reporter.report(Progress::Message("2 ladders".to_string()));
            42
        });
        drop(reporter);

        assert_eq!(answer, 42);
        let events = events.into_inner().unwrap();
        assert_eq!(events.len(), 3);
        assert!(events[0].contains("Ladders"));
        assert!(events[1].contains("2 ladders"));
        assert_eq!(events[2], "PhaseFinish");
    }
}
