use super::{
    classifier::{Classifier, CornerClassifier, Scheme, SideClassifier},
    event::{RegionEvent, Transition},
    region::{DpadRegion, Region},
};

/// Tracks the active region of a single input source and reports region
/// changes as edge-triggered press and release events.
///
/// Holding the same region across samples produces no events. Moving directly
/// from one region to another in a single sample produces a release of the
/// old region followed by a press of the new one.
#[derive(Debug, Clone)]
pub struct EdgeTriggeredTracker<C: Classifier> {
    classifier: C,
    last_region: C::Region,
}

impl<C: Classifier> EdgeTriggeredTracker<C> {
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            last_region: C::Region::NONE,
        }
    }

    /// Returns the currently active region
    pub fn active_region(&self) -> C::Region {
        self.last_region
    }

    /// Classify the given sample and return the resulting transition
    pub fn handle_sample(&mut self, x: f64, y: f64) -> Transition<C::Region> {
        let new_region = self.classifier.classify(x, y);
        let mut release = None;
        let mut press = None;

        if !self.last_region.is_none() && new_region != self.last_region {
            release = Some(self.last_region);
            self.last_region = C::Region::NONE;
        }

        if !new_region.is_none() && self.last_region.is_none() {
            self.last_region = new_region;
            press = Some(new_region);
        }

        if release.is_some() || press.is_some() {
            log::trace!("Sample ({x}, {y}) released {release:?} pressed {press:?}");
        }

        Transition::new(release, press)
    }

    /// Classify the given sample and invoke the given callbacks for each
    /// resulting event. When both fire, `on_release` runs before `on_press`.
    pub fn handle_sample_with<P, R>(&mut self, x: f64, y: f64, mut on_press: P, mut on_release: R)
    where
        P: FnMut(C::Region),
        R: FnMut(C::Region),
    {
        for event in self.handle_sample(x, y) {
            match event {
                RegionEvent::Press(region) => on_press(region),
                RegionEvent::Release(region) => on_release(region),
            }
        }
    }
}

/// A tracker whose classification scheme is selected at construction time
#[derive(Debug, Clone)]
pub enum SchemeTracker {
    Corner(EdgeTriggeredTracker<CornerClassifier>),
    Side(EdgeTriggeredTracker<SideClassifier>),
}

impl SchemeTracker {
    pub fn new(scheme: Scheme) -> Self {
        match scheme {
            Scheme::Corner => Self::Corner(EdgeTriggeredTracker::new(CornerClassifier)),
            Scheme::Side => Self::Side(EdgeTriggeredTracker::new(SideClassifier)),
        }
    }

    /// Returns the scheme used by this tracker
    pub fn scheme(&self) -> Scheme {
        match self {
            SchemeTracker::Corner(_) => Scheme::Corner,
            SchemeTracker::Side(_) => Scheme::Side,
        }
    }

    /// Returns the currently active region
    pub fn active_region(&self) -> DpadRegion {
        match self {
            SchemeTracker::Corner(tracker) => tracker.active_region().into(),
            SchemeTracker::Side(tracker) => tracker.active_region().into(),
        }
    }

    /// Classify the given sample and return the resulting transition
    pub fn handle_sample(&mut self, x: f64, y: f64) -> Transition<DpadRegion> {
        match self {
            SchemeTracker::Corner(tracker) => tracker.handle_sample(x, y).map(DpadRegion::from),
            SchemeTracker::Side(tracker) => tracker.handle_sample(x, y).map(DpadRegion::from),
        }
    }
}
