use crate::core::race::RaceCoordinator;
use crate::core::sink::ResultSink;
use crate::domain::model::RaceOutcome;
use crate::utils::error::Result;
use std::io::Write;

pub struct LookupEngine<O: Write, E: Write> {
    coordinator: RaceCoordinator,
    sink: ResultSink<O, E>,
}

impl<O: Write, E: Write> LookupEngine<O, E> {
    pub fn new(coordinator: RaceCoordinator, sink: ResultSink<O, E>) -> Self {
        Self { coordinator, sink }
    }

    pub async fn run(&mut self) -> Result<RaceOutcome> {
        tracing::info!(
            "🚀 Looking up CEP via {} (deadline {}ms)",
            self.coordinator.providers().join(", "),
            self.coordinator.timeout().as_millis()
        );

        let outcome = self.coordinator.race().await;
        self.sink.render(&outcome)?;

        Ok(outcome)
    }

    pub fn into_sink(self) -> ResultSink<O, E> {
        self.sink
    }
}
