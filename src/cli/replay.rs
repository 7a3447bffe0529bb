use std::{error::Error, path::PathBuf};

use tabled::{
    settings::{Panel, Style},
    Table, Tabled,
};

use crate::input::{
    classifier::Scheme,
    device::DpadMode,
    source::{replay::ReplaySource, SourceEvent},
    tracker::SchemeTracker,
};

#[derive(Debug, Tabled)]
pub struct ReplayRow {
    #[tabled(rename = "Step")]
    pub step: usize,
    #[tabled(rename = "Sample")]
    pub sample: String,
    #[tabled(rename = "Region")]
    pub region: String,
    #[tabled(rename = "Events")]
    pub events: String,
}

pub fn handle_replay(scheme: Scheme, file: PathBuf) -> Result<(), Box<dyn Error + Send + Sync>> {
    let events = ReplaySource::open(&file)?.read_all()?;
    let rows = replay_events(scheme, events);
    let count = rows.iter().filter(|row| !row.events.is_empty()).count();

    let mut table = Table::new(rows);
    table
        .with(Style::modern_rounded())
        .with(Panel::header(format!("{}", file.display())));
    println!("{table}");
    println!("{count} step(s) produced region events");

    Ok(())
}

/// Feed the given source events through a new tracker and describe each step
pub fn replay_events(scheme: Scheme, events: Vec<SourceEvent>) -> Vec<ReplayRow> {
    let mut tracker = SchemeTracker::new(scheme);
    let mut mode = DpadMode::default();

    events
        .into_iter()
        .enumerate()
        .map(|(i, event)| match event {
            SourceEvent::Sample(sample) => {
                let transition = tracker.handle_sample(sample.x, sample.y);
                let events: Vec<String> = transition.into_iter().map(|e| e.to_string()).collect();
                ReplayRow {
                    step: i + 1,
                    sample: format!("({:.2}, {:.2})", sample.x, sample.y),
                    region: tracker.active_region().to_string(),
                    events: events.join(", "),
                }
            }
            SourceEvent::ToggleMode => {
                mode = mode.toggled();
                ReplayRow {
                    step: i + 1,
                    sample: format!("{mode} mode"),
                    region: tracker.active_region().to_string(),
                    events: String::new(),
                }
            }
        })
        .collect()
}
