use std::collections::BTreeSet;

use foundation::bounds::Viewport;
use indicators::{
    CameraEvent, FlyToOptions, MapHost, NavigationTarget, ViewportError, ViewportProvider,
};

/// A map that never moves on its own: fixed viewport and zoom, with camera
/// requests recorded instead of animated.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticMap {
    viewport: Viewport,
    zoom: f64,
    subscribed: BTreeSet<CameraEvent>,
    flights: Vec<(NavigationTarget, FlyToOptions)>,
}

impl StaticMap {
    pub fn new(viewport: Viewport, zoom: f64) -> Self {
        Self {
            viewport,
            zoom,
            subscribed: BTreeSet::new(),
            flights: Vec::new(),
        }
    }

    pub fn is_subscribed(&self, event: CameraEvent) -> bool {
        self.subscribed.contains(&event)
    }

    pub fn flights(&self) -> &[(NavigationTarget, FlyToOptions)] {
        &self.flights
    }
}

impl ViewportProvider for StaticMap {
    fn bounds(&self) -> Result<Option<Viewport>, ViewportError> {
        Ok(Some(self.viewport))
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }
}

impl MapHost for StaticMap {
    fn subscribe(&mut self, event: CameraEvent) {
        self.subscribed.insert(event);
    }

    fn unsubscribe(&mut self, event: CameraEvent) {
        self.subscribed.remove(&event);
    }

    fn fly_to(&mut self, target: &NavigationTarget, options: FlyToOptions) {
        self.flights.push((*target, options));
    }
}
