use std::error::Error;

use remotepad::{
    config::PadConfig,
    input::{
        event::{PadEvent, RegionEvent},
        region::{Corner, DpadRegion, Side},
        service,
    },
};
use tokio::sync::mpsc;

const CONFIG: &str = r#"
version: 1
kind: RemotePad
name: Replay test
scheme: side
devices:
  - id: walk
    scheme: corner
    poll_rate_ms: 1
    replay:
      path: ./demos/corner_walk.jsonl
  - id: swipe
    poll_rate_ms: 1
    replay:
      path: ./demos/side_swipe.jsonl
  - id: missing
    replay:
      path: ./demos/does_not_exist.jsonl
"#;

fn events_for(events: &[PadEvent], device: &str) -> Vec<RegionEvent<DpadRegion>> {
    events
        .iter()
        .filter(|event| event.device == device)
        .map(|event| event.event)
        .collect()
}

#[tokio::test]
async fn test_service_replays_devices() -> Result<(), Box<dyn Error>> {
    let config = PadConfig::from_yaml(CONFIG.to_string())?;
    let (tx, mut rx) = mpsc::channel(64);

    let result = service::run(&config, tx).await;
    assert!(result.is_ok());

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert_eq!(
        events_for(&events, "walk"),
        vec![
            RegionEvent::Press(DpadRegion::Corner(Corner::TopLeft)),
            RegionEvent::Release(DpadRegion::Corner(Corner::TopLeft)),
            RegionEvent::Press(DpadRegion::Corner(Corner::BottomRight)),
        ]
    );
    assert_eq!(
        events_for(&events, "swipe"),
        vec![
            RegionEvent::Press(DpadRegion::Side(Side::Up)),
            RegionEvent::Release(DpadRegion::Side(Side::Up)),
            RegionEvent::Press(DpadRegion::Side(Side::Left)),
            RegionEvent::Release(DpadRegion::Side(Side::Left)),
        ]
    );
    assert!(events_for(&events, "missing").is_empty());

    Ok(())
}
