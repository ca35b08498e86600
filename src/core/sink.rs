use crate::domain::model::RaceOutcome;
use crate::utils::error::Result;
use std::io::{self, Stderr, Stdout, Write};

pub const TIMEOUT_MESSAGE: &str = "no provider responded before the deadline";

/// 將賽跑結果輸出：成功結果寫到 stdout，逾時訊息寫到診斷串流。
pub struct ResultSink<O: Write, E: Write> {
    out: O,
    diagnostics: E,
}

impl ResultSink<Stdout, Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ResultSink<O, E> {
    pub fn new(out: O, diagnostics: E) -> Self {
        Self { out, diagnostics }
    }

    pub fn render(&mut self, outcome: &RaceOutcome) -> Result<()> {
        match outcome {
            RaceOutcome::Success { provider, result } => {
                let payload = result.to_json()?;
                writeln!(
                    self.out,
                    "response received from the '{}' api. Response data: {}",
                    provider, payload
                )?;
                self.out.flush()?;
            }
            RaceOutcome::Timeout => {
                writeln!(self.diagnostics, "{}", TIMEOUT_MESSAGE)?;
                self.diagnostics.flush()?;
            }
        }
        Ok(())
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.diagnostics)
    }
}
