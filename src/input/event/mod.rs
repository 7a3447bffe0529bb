use std::fmt::Display;

use serde::Serialize;

use super::region::DpadRegion;

/// An edge-triggered region event. A press is emitted when a region becomes
/// active and a release when it stops being active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "region", rename_all = "snake_case")]
pub enum RegionEvent<R> {
    Press(R),
    Release(R),
}

impl<R: Copy> RegionEvent<R> {
    /// Returns true if this is a press event
    pub fn is_press(&self) -> bool {
        matches!(self, RegionEvent::Press(_))
    }
}

impl<R: Display> Display for RegionEvent<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionEvent::Press(region) => write!(f, "press({region})"),
            RegionEvent::Release(region) => write!(f, "release({region})"),
        }
    }
}

/// The events produced by a single sample. A sample can release the previous
/// region, press a new one, or both; the release always comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<R> {
    release: Option<R>,
    press: Option<R>,
}

impl<R> Default for Transition<R> {
    fn default() -> Self {
        Self {
            release: None,
            press: None,
        }
    }
}

impl<R: Copy> Transition<R> {
    pub fn new(release: Option<R>, press: Option<R>) -> Self {
        Self { release, press }
    }

    /// The region released by this sample, if any
    pub fn released(&self) -> Option<R> {
        self.release
    }

    /// The region pressed by this sample, if any
    pub fn pressed(&self) -> Option<R> {
        self.press
    }

    /// Returns true if the sample produced no events
    pub fn is_empty(&self) -> bool {
        self.release.is_none() && self.press.is_none()
    }

    /// Returns the number of events produced by the sample
    pub fn len(&self) -> usize {
        self.release.is_some() as usize + self.press.is_some() as usize
    }

    /// Convert the regions of this transition using the given function
    pub fn map<T, F>(self, f: F) -> Transition<T>
    where
        F: Fn(R) -> T,
    {
        Transition {
            release: self.release.map(&f),
            press: self.press.map(&f),
        }
    }
}

impl<R: Copy> IntoIterator for Transition<R> {
    type Item = RegionEvent<R>;
    type IntoIter = std::iter::Chain<
        std::option::IntoIter<RegionEvent<R>>,
        std::option::IntoIter<RegionEvent<R>>,
    >;

    fn into_iter(self) -> Self::IntoIter {
        let release = self.release.map(RegionEvent::Release);
        let press = self.press.map(RegionEvent::Press);
        release.into_iter().chain(press)
    }
}

/// A region event emitted by a specific input device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PadEvent {
    /// Identifier of the device that produced the event
    pub device: String,
    #[serde(flatten)]
    pub event: RegionEvent<DpadRegion>,
}

impl PadEvent {
    pub fn new(device: String, event: RegionEvent<DpadRegion>) -> Self {
        Self { device, event }
    }
}

impl Display for PadEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.device, self.event)
    }
}
