use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use serde::Deserialize;

use crate::input::sample::AxisSample;

use super::{InputError, SampleSource, SourceEvent};

/// A single line in a sample file
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplayRecord {
    Sample(AxisSample),
    Toggle { toggle: bool },
}

/// Source device that replays samples recorded as newline-delimited JSON.
///
/// Each line holds either a sample (`{"x": 0.5, "y": -0.5}`) or a mode
/// toggle (`{"toggle": true}`). Blank lines and lines starting with `#` are
/// skipped. One record is produced per poll so that the poll rate controls
/// the replay speed.
pub struct ReplaySource<R: BufRead> {
    name: String,
    reader: R,
    line_number: usize,
}

impl ReplaySource<BufReader<File>> {
    /// Open the sample file at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, InputError> {
        let path = path.as_ref();
        log::debug!("Opening sample file: {path:?}");
        let file = File::open(path)?;
        let name = format!("Replay {}", path.display());
        Ok(Self::new(name, BufReader::new(file)))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(name: String, reader: R) -> Self {
        Self {
            name,
            reader,
            line_number: 0,
        }
    }

    /// Read the next record, skipping blank lines and comments
    fn next_event(&mut self) -> Result<SourceEvent, InputError> {
        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = self.reader.read_line(&mut line)?;
            if bytes_read == 0 {
                return Err(InputError::EndOfStream);
            }
            self.line_number += 1;

            let content = line.trim();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }

            let record: ReplayRecord =
                serde_json::from_str(content).map_err(|source| InputError::Decode {
                    line: self.line_number,
                    source,
                })?;
            log::trace!("Replaying record: {record:?}");

            match record {
                ReplayRecord::Sample(sample) => return Ok(SourceEvent::Sample(sample)),
                ReplayRecord::Toggle { toggle: true } => return Ok(SourceEvent::ToggleMode),
                ReplayRecord::Toggle { toggle: false } => continue,
            }
        }
    }

    /// Read every remaining record in the file
    pub fn read_all(mut self) -> Result<Vec<SourceEvent>, InputError> {
        let mut events = Vec::new();
        loop {
            match self.next_event() {
                Ok(event) => events.push(event),
                Err(InputError::EndOfStream) => return Ok(events),
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: BufRead + Send> SampleSource for ReplaySource<R> {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn poll(&mut self) -> Result<Vec<SourceEvent>, InputError> {
        let event = self.next_event()?;
        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_read_records() {
        let content = "# comment\n{\"x\": 0.5, \"y\": -0.5}\n\n{\"toggle\": true}\n{\"toggle\": false}\n{\"x\": 0, \"y\": 0}\n";
        let source = ReplaySource::new("test".to_string(), Cursor::new(content));
        let events = source.read_all().unwrap();
        assert_eq!(
            events,
            vec![
                SourceEvent::Sample(AxisSample::new(0.5, -0.5)),
                SourceEvent::ToggleMode,
                SourceEvent::Sample(AxisSample::center()),
            ]
        );
    }

    #[test]
    fn test_poll_until_end() {
        let content = "{\"x\": 1.0, \"y\": 0.0}\n";
        let mut source = ReplaySource::new("test".to_string(), Cursor::new(content));
        assert_eq!(
            source.poll().unwrap(),
            vec![SourceEvent::Sample(AxisSample::new(1.0, 0.0))]
        );
        assert!(matches!(source.poll(), Err(InputError::EndOfStream)));
    }

    #[test]
    fn test_invalid_line_reports_line_number() {
        let content = "{\"x\": 1.0, \"y\": 0.0}\nnot json\n";
        let source = ReplaySource::new("test".to_string(), Cursor::new(content));
        let err = source.read_all().unwrap_err();
        assert!(matches!(err, InputError::Decode { line: 2, .. }));
    }

    #[test]
    fn test_open_demo_file() {
        let source = ReplaySource::open("./demos/corner_walk.jsonl").unwrap();
        assert_eq!(source.read_all().unwrap().len(), 5);
    }
}
