use std::io::{self, Write};

use tokio::sync::mpsc;

use crate::config::OutputFormat;

use super::event::PadEvent;

/// Writes region events in the configured format
pub struct EventOutput {
    format: OutputFormat,
    rx: mpsc::Receiver<PadEvent>,
}

impl EventOutput {
    pub fn new(format: OutputFormat, rx: mpsc::Receiver<PadEvent>) -> Self {
        Self { format, rx }
    }

    /// Write events until every sender has been dropped
    pub async fn run(mut self) -> io::Result<()> {
        while let Some(event) = self.rx.recv().await {
            match self.format {
                OutputFormat::Log => log::info!("{event}"),
                OutputFormat::Json => {
                    let mut stdout = io::stdout().lock();
                    write_json(&mut stdout, &event)?;
                    stdout.flush()?;
                }
            }
        }

        Ok(())
    }
}

/// Write the given event as a single line of JSON
pub fn write_json<W: Write>(writer: &mut W, event: &PadEvent) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, event)?;
    writeln!(writer)
}
