use std::os::fd::AsRawFd;

use evdev::{AbsInfo, AbsoluteAxisCode, Device, EventType, InputEvent, KeyCode, SynchronizationCode};
use nix::fcntl::{FcntlArg, OFlag};

use crate::{
    config::{EvdevConfig, PadAxis, ToggleButton},
    input::{
        device::DpadMode,
        sample::{normalize_signed_value, AxisSample},
    },
};

use super::{InputError, SampleSource, SourceEvent};

/// Returns the evdev axis code for the given configured axis
fn axis_code(axis: PadAxis) -> AbsoluteAxisCode {
    match axis {
        PadAxis::X => AbsoluteAxisCode::ABS_X,
        PadAxis::Y => AbsoluteAxisCode::ABS_Y,
        PadAxis::Rx => AbsoluteAxisCode::ABS_RX,
        PadAxis::Ry => AbsoluteAxisCode::ABS_RY,
        PadAxis::Hat0x => AbsoluteAxisCode::ABS_HAT0X,
        PadAxis::Hat0y => AbsoluteAxisCode::ABS_HAT0Y,
        PadAxis::MtPositionX => AbsoluteAxisCode::ABS_MT_POSITION_X,
        PadAxis::MtPositionY => AbsoluteAxisCode::ABS_MT_POSITION_Y,
    }
}

/// Returns the evdev key code for the given toggle button
fn button_code(button: ToggleButton) -> KeyCode {
    match button {
        ToggleButton::Left => KeyCode::BTN_LEFT,
        ToggleButton::South => KeyCode::BTN_SOUTH,
        ToggleButton::Select => KeyCode::BTN_SELECT,
    }
}

/// Range of raw values an axis can report
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisRange {
    min: f64,
    max: f64,
}

impl From<AbsInfo> for AxisRange {
    fn from(info: AbsInfo) -> Self {
        Self {
            min: info.minimum() as f64,
            max: info.maximum() as f64,
        }
    }
}

/// Tracks the current axis state of an evdev device between sync reports
#[derive(Debug, Clone)]
struct AxisState {
    x_axis: AbsoluteAxisCode,
    y_axis: AbsoluteAxisCode,
    x_range: AxisRange,
    y_range: AxisRange,
    invert_y: bool,
    center_on_release: bool,
    deadzone: f64,
    toggle: Option<KeyCode>,
    mode: DpadMode,
    /// Last absolute position reported by the device. This survives touch
    /// release because the kernel does not resend unchanged axis values.
    position: AxisSample,
    /// Where the current slide started
    origin: Option<AxisSample>,
    /// Set while the finger is lifted and the center is being reported
    released: bool,
    changed: bool,
}

impl AxisState {
    /// Update the state with the given event. Returns an event once a full
    /// report has been received.
    fn update(&mut self, event_type: EventType, code: u16, value: i32) -> Option<SourceEvent> {
        if event_type == EventType::ABSOLUTE {
            let axis = AbsoluteAxisCode(code);
            if axis == self.x_axis {
                let range = self.x_range;
                self.position.x = normalize_signed_value(value as f64, range.min, range.max);
                self.changed = true;
            }
            if axis == self.y_axis {
                let range = self.y_range;
                let y = normalize_signed_value(value as f64, range.min, range.max);
                self.position.y = if self.invert_y { -y } else { y };
                self.changed = true;
            }
            return None;
        }

        if event_type == EventType::KEY {
            if code == KeyCode::BTN_TOUCH.0 {
                match value {
                    0 if self.center_on_release => {
                        log::trace!("Touch released, centering sample");
                        self.released = true;
                        self.changed = true;
                    }
                    1 => {
                        // A new touch starts a new slide
                        self.released = false;
                        self.origin = None;
                        self.changed = true;
                    }
                    _ => (),
                }
                return None;
            }
            let is_toggle = self.toggle.map(|key| key.0 == code).unwrap_or(false);
            if is_toggle && value == 1 {
                return Some(SourceEvent::ToggleMode);
            }
            return None;
        }

        if event_type == EventType::SYNCHRONIZATION
            && code == SynchronizationCode::SYN_REPORT.0
            && self.changed
        {
            self.changed = false;
            return Some(SourceEvent::Sample(self.sample()));
        }

        None
    }

    /// Switch between absolute and relative reporting
    fn set_mode(&mut self, mode: DpadMode) {
        self.mode = mode;
        self.origin = None;
        self.changed = true;
    }

    /// Returns the sample to report for the current state
    fn sample(&mut self) -> AxisSample {
        if self.released {
            return AxisSample::center();
        }

        let position = self.position;
        let sample = match self.mode {
            DpadMode::Absolute => position,
            DpadMode::Slide => {
                let origin = *self.origin.get_or_insert(position);
                AxisSample::new(
                    (position.x - origin.x).clamp(-1.0, 1.0),
                    (position.y - origin.y).clamp(-1.0, 1.0),
                )
            }
        };

        if sample.x.hypot(sample.y) <= self.deadzone {
            return AxisSample::center();
        }
        sample
    }
}

/// Source device implementation that reads a D-pad surface from an evdev
/// input device like a touchpad or thumbstick.
pub struct EvdevPad {
    device: Device,
    state: AxisState,
}

impl EvdevPad {
    /// Open the evdev device described by the given config
    pub fn new(config: &EvdevConfig) -> Result<Self, InputError> {
        let path = config.path.as_str();
        log::debug!("Opening device at: {path}");
        let mut device = Device::open(path)?;
        if config.grab() {
            device.grab()?;
        }

        // Set the device to do non-blocking reads
        let raw_fd = device.as_raw_fd();
        nix::fcntl::fcntl(raw_fd, FcntlArg::F_SETFL(OFlag::O_NONBLOCK))?;

        // Query information about the device to get the absolute ranges
        let x_axis = axis_code(config.x_axis);
        let y_axis = axis_code(config.y_axis);
        let mut x_range = None;
        let mut y_range = None;
        for (axis, info) in device.get_absinfo()? {
            log::trace!("Found axis {axis:?} with info: {info:?}");
            if axis == x_axis {
                x_range = Some(AxisRange::from(info));
            }
            if axis == y_axis {
                y_range = Some(AxisRange::from(info));
            }
        }
        let Some(x_range) = x_range else {
            return Err(InputError::MissingAxis(config.x_axis));
        };
        let Some(y_range) = y_range else {
            return Err(InputError::MissingAxis(config.y_axis));
        };

        let state = AxisState {
            x_axis,
            y_axis,
            x_range,
            y_range,
            invert_y: config.invert_y(),
            center_on_release: config.center_on_release(),
            deadzone: config.deadzone(),
            toggle: config.toggle_button.map(button_code),
            mode: DpadMode::default(),
            position: AxisSample::center(),
            origin: None,
            released: false,
            changed: false,
        };

        Ok(Self { device, state })
    }
}

impl SampleSource for EvdevPad {
    fn name(&self) -> String {
        self.device.name().unwrap_or("Unknown Device").to_string()
    }

    fn poll(&mut self) -> Result<Vec<SourceEvent>, InputError> {
        let events: Vec<InputEvent> = match self.device.fetch_events() {
            Ok(events) => events.collect(),
            Err(err) => match err.kind() {
                // Do nothing if this would block
                std::io::ErrorKind::WouldBlock => return Ok(vec![]),
                _ => {
                    log::trace!("Failed to fetch events: {err:?}");
                    return Err(err.into());
                }
            },
        };

        let source_events = events
            .into_iter()
            .filter_map(|event| {
                self.state
                    .update(event.event_type(), event.code(), event.value())
            })
            .collect();

        Ok(source_events)
    }

    fn set_mode(&mut self, mode: DpadMode) {
        log::debug!("Switching {} to {mode} mode", self.name());
        self.state.set_mode(mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touchpad_state() -> AxisState {
        AxisState {
            x_axis: AbsoluteAxisCode::ABS_X,
            y_axis: AbsoluteAxisCode::ABS_Y,
            x_range: AxisRange { min: 0.0, max: 1000.0 },
            y_range: AxisRange { min: 0.0, max: 1000.0 },
            invert_y: true,
            center_on_release: true,
            deadzone: 0.05,
            toggle: Some(KeyCode::BTN_LEFT),
            mode: DpadMode::Absolute,
            position: AxisSample::center(),
            origin: None,
            released: false,
            changed: false,
        }
    }

    fn stick_state() -> AxisState {
        AxisState {
            x_range: AxisRange {
                min: -32768.0,
                max: 32767.0,
            },
            y_range: AxisRange {
                min: -32768.0,
                max: 32767.0,
            },
            center_on_release: false,
            toggle: Some(KeyCode::BTN_SELECT),
            ..touchpad_state()
        }
    }

    fn syn() -> (EventType, u16, i32) {
        (EventType::SYNCHRONIZATION, SynchronizationCode::SYN_REPORT.0, 0)
    }

    /// Send an X/Y report and return whatever the sync produces
    fn report(state: &mut AxisState, x: i32, y: i32) -> Option<SourceEvent> {
        state.update(EventType::ABSOLUTE, AbsoluteAxisCode::ABS_X.0, x);
        state.update(EventType::ABSOLUTE, AbsoluteAxisCode::ABS_Y.0, y);
        let (t, c, v) = syn();
        state.update(t, c, v)
    }

    #[test]
    fn test_sample_emitted_on_sync() {
        let mut state = touchpad_state();
        let abs = EventType::ABSOLUTE;
        assert_eq!(state.update(abs, AbsoluteAxisCode::ABS_X.0, 1000), None);
        assert_eq!(state.update(abs, AbsoluteAxisCode::ABS_Y.0, 0), None);
        let (t, c, v) = syn();
        assert_eq!(
            state.update(t, c, v),
            Some(SourceEvent::Sample(AxisSample::new(1.0, 1.0)))
        );
        // No changes means no sample on the next report
        assert_eq!(state.update(t, c, v), None);
    }

    #[test]
    fn test_touch_release_centers() {
        let mut state = touchpad_state();
        state.update(EventType::ABSOLUTE, AbsoluteAxisCode::ABS_X.0, 250);
        let (t, c, v) = syn();
        assert_eq!(
            state.update(t, c, v),
            Some(SourceEvent::Sample(AxisSample::new(-0.5, 0.0)))
        );
        state.update(EventType::KEY, KeyCode::BTN_TOUCH.0, 0);
        assert_eq!(
            state.update(t, c, v),
            Some(SourceEvent::Sample(AxisSample::center()))
        );
    }

    #[test]
    fn test_retouch_at_same_position_restores_sample() {
        let mut state = touchpad_state();
        report(&mut state, 250, 250);
        state.update(EventType::KEY, KeyCode::BTN_TOUCH.0, 0);
        let (t, c, v) = syn();
        state.update(t, c, v);

        // The kernel does not resend unchanged axis values on the next touch
        state.update(EventType::KEY, KeyCode::BTN_TOUCH.0, 1);
        assert_eq!(
            state.update(t, c, v),
            Some(SourceEvent::Sample(AxisSample::new(-0.5, 0.5)))
        );
    }

    #[test]
    fn test_resting_stick_is_centered() {
        let mut state = stick_state();
        assert_eq!(
            report(&mut state, 0, 0),
            Some(SourceEvent::Sample(AxisSample::center()))
        );
        // Small jitter around rest stays centered
        assert_eq!(
            report(&mut state, 900, -700),
            Some(SourceEvent::Sample(AxisSample::center()))
        );
        // Full deflection is reported as is
        let Some(SourceEvent::Sample(sample)) = report(&mut state, 32767, 0) else {
            panic!("expected a sample");
        };
        assert_eq!(sample.x, 1.0);
        assert!(sample.y.abs() < 1e-4);
    }

    #[test]
    fn test_slide_mode_reports_relative_motion() {
        let mut state = touchpad_state();
        assert_eq!(
            state.update(EventType::KEY, KeyCode::BTN_LEFT.0, 1),
            Some(SourceEvent::ToggleMode)
        );
        state.set_mode(DpadMode::Slide);

        // The first position of a touch becomes the slide origin
        state.update(EventType::KEY, KeyCode::BTN_TOUCH.0, 1);
        assert_eq!(
            report(&mut state, 750, 500),
            Some(SourceEvent::Sample(AxisSample::center()))
        );
        assert_eq!(
            report(&mut state, 1000, 500),
            Some(SourceEvent::Sample(AxisSample::new(0.5, 0.0)))
        );
        assert_eq!(
            report(&mut state, 250, 500),
            Some(SourceEvent::Sample(AxisSample::new(-1.0, 0.0)))
        );
        // Motion past the edge of the range is clamped
        assert_eq!(
            report(&mut state, 0, 500),
            Some(SourceEvent::Sample(AxisSample::new(-1.0, 0.0)))
        );

        // The same motion in absolute mode reports positions
        state.set_mode(DpadMode::Absolute);
        assert_eq!(
            report(&mut state, 1000, 500),
            Some(SourceEvent::Sample(AxisSample::new(1.0, 0.0)))
        );
    }

    #[test]
    fn test_new_touch_restarts_slide() {
        let mut state = touchpad_state();
        state.set_mode(DpadMode::Slide);
        state.update(EventType::KEY, KeyCode::BTN_TOUCH.0, 1);
        report(&mut state, 500, 500);
        report(&mut state, 1000, 500);
        state.update(EventType::KEY, KeyCode::BTN_TOUCH.0, 0);
        let (t, c, v) = syn();
        state.update(t, c, v);

        state.update(EventType::KEY, KeyCode::BTN_TOUCH.0, 1);
        assert_eq!(
            report(&mut state, 1000, 500),
            Some(SourceEvent::Sample(AxisSample::center()))
        );
        assert_eq!(
            report(&mut state, 750, 500),
            Some(SourceEvent::Sample(AxisSample::new(-0.5, 0.0)))
        );
    }

    #[test]
    fn test_toggle_button() {
        let mut state = touchpad_state();
        assert_eq!(
            state.update(EventType::KEY, KeyCode::BTN_LEFT.0, 1),
            Some(SourceEvent::ToggleMode)
        );
        assert_eq!(state.update(EventType::KEY, KeyCode::BTN_LEFT.0, 0), None);
        assert_eq!(state.update(EventType::KEY, KeyCode::BTN_SOUTH.0, 1), None);
    }

    #[test]
    fn test_unrelated_axes_ignored() {
        let mut state = touchpad_state();
        state.update(EventType::ABSOLUTE, AbsoluteAxisCode::ABS_RX.0, 10);
        let (t, c, v) = syn();
        assert_eq!(state.update(t, c, v), None);
    }
}
