use crate::{
    error::Result,
    fs_tools::{Sink, Source},
    processing::ChunkProcessor,
};

/// Stage of a run in which a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Reading,
    Processing,
    Writing,
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    /// Input exhausted, handles being released.
    Draining,
    Succeeded,
    Failed(Phase),
}

/// Current [`State`] of a run; every change goes through [`Tracker::transition`].
#[derive(Debug)]
struct Tracker {
    current: State,
    #[cfg(test)]
    trail: Vec<State>,
}

impl Tracker {
    fn new() -> Self {
        Tracker {
            current: State::Running,
            #[cfg(test)]
            trail: vec![State::Running],
        }
    }

    fn transition(&mut self, next: State) {
        log::debug!("pipeline {:?} -> {:?}", self.current, next);
        #[cfg(test)]
        self.trail.push(next);
        self.current = next;
    }
}

/// Counters for a completed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub chunks: usize,
    pub bytes_read: usize,
    pub bytes_written: usize,
}

/// Drives chunks from a source through a processor into a sink.
pub struct Pipeline<'a, S, W> {
    source: S,
    sink: W,
    processor: &'a dyn ChunkProcessor,
    tracker: Tracker,
    summary: Summary,
}

impl<'a, S: Source, W: Sink> Pipeline<'a, S, W> {
    pub fn new(source: S, sink: W, processor: &'a dyn ChunkProcessor) -> Self {
        Pipeline {
            source,
            sink,
            processor,
            tracker: Tracker::new(),
            summary: Summary::default(),
        }
    }

    /// Runs until the source is exhausted or a stage fails. Source and sink
    /// are closed exactly once, in that order, whatever the outcome; the
    /// first error encountered is the one returned.
    pub fn run(self) -> Result<Summary> {
        self.run_with_state().1
    }

    /// Like [`Pipeline::run`], also returning the state the run ended in:
    /// `Succeeded`, or `Failed` with the phase of the first failure.
    pub fn run_with_state(self) -> (State, Result<Summary>) {
        let (tracker, result) = self.drive();
        (tracker.current, result)
    }

    fn drive(mut self) -> (Tracker, Result<Summary>) {
        let outcome = self.pump();
        if outcome.is_ok() {
            self.tracker.transition(State::Draining);
        }

        let Pipeline {
            source,
            sink,
            mut tracker,
            summary,
            ..
        } = self;
        let source_closed = source.close();
        let sink_closed = sink.close();
        let result = outcome
            .and(source_closed)
            .and(sink_closed)
            .map(|()| summary);

        match (&result, tracker.current) {
            (Ok(_), _) => tracker.transition(State::Succeeded),
            (Err(_), State::Failed(_)) => {}
            (Err(_), _) => tracker.transition(State::Failed(Phase::Closing)),
        }
        (tracker, result)
    }

    fn pump(&mut self) -> Result<()> {
        loop {
            let chunk = match self.source.read() {
                Ok(Some(chunk)) => chunk,
                Ok(None) => return Ok(()),
                Err(err) => {
                    self.tracker.transition(State::Failed(Phase::Reading));
                    return Err(err);
                }
            };
            self.summary.chunks += 1;
            self.summary.bytes_read += chunk.len();
            log::trace!("chunk {}: {} bytes", self.summary.chunks, chunk.len());

            let processed = match self.processor.process(chunk) {
                Ok(processed) => processed,
                Err(err) => {
                    self.tracker.transition(State::Failed(Phase::Processing));
                    return Err(err.into());
                }
            };

            if let Err(err) = self.sink.write(&processed) {
                self.tracker.transition(State::Failed(Phase::Writing));
                return Err(err);
            }
            self.summary.bytes_written += processed.len();
        }
    }
}
