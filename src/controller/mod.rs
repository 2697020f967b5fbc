use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::{
    encoding::Scales,
    shared::time::{self, TimeFilter},
    source,
    traffic::{Dataset, compute_station_traffic, filter_trips},
    view::{Marker, MarkerLayer, Projector, Reconciliation},
};

/// Things the session reacts to.
#[derive(Debug)]
pub enum Event {
    DataReady(Dataset),
    LoadFailed(source::Error),
    /// Raw slider value, `-1` for any time.
    SliderInput(i32),
    /// Move, zoom, resize or move end of the map.
    ViewportChanged,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    /// Loading failed, the session stays empty until restarted.
    Failed,
}

/// Owns the session: data, filter, label and markers.
///
/// Events are handled one at a time through `&mut self`, a pipeline run
/// always finishes before the next event is looked at.
pub struct Controller<P: Projector> {
    projector: P,
    dataset: Dataset,
    state: LoadState,
    filter: TimeFilter,
    label: String,
    layer: MarkerLayer,
    last: Option<Reconciliation>,
}

impl<P: Projector> Controller<P> {
    pub fn new(projector: P) -> Self {
        let filter = TimeFilter::Any;
        Self {
            projector,
            dataset: Dataset::default(),
            state: LoadState::Loading,
            filter,
            label: filter.label(),
            layer: MarkerLayer::new(),
            last: None,
        }
    }

    pub fn dispatch(&mut self, event: Event) {
        match event {
            Event::DataReady(dataset) => self.on_data_ready(dataset),
            Event::LoadFailed(err) => self.on_load_failed(err),
            Event::SliderInput(value) => {
                if let Err(err) = self.on_slider_input(value) {
                    warn!("Ignoring slider input: {err}");
                }
            }
            Event::ViewportChanged => self.layer.reposition(&self.projector),
        }
    }

    fn on_data_ready(&mut self, dataset: Dataset) {
        if self.state == LoadState::Failed {
            warn!("Data arrived after a failed load, ignoring it");
            return;
        }
        info!(
            "Data ready: {} stations, {} trips",
            dataset.stations.len(),
            dataset.trips.len()
        );
        self.dataset = dataset;
        self.state = LoadState::Ready;
        self.run_pipeline();
    }

    fn on_load_failed(&mut self, err: source::Error) {
        error!("Failed to load station traffic: {err}");
        self.dataset = Dataset::default();
        self.layer.clear();
        self.last = None;
        self.state = LoadState::Failed;
    }

    fn on_slider_input(&mut self, value: i32) -> Result<(), time::Error> {
        self.filter = TimeFilter::try_from(value)?;
        self.label = self.filter.label();
        if self.state == LoadState::Ready {
            self.run_pipeline();
        }
        Ok(())
    }

    /// Filter, aggregate, encode, bind and reposition.
    fn run_pipeline(&mut self) {
        let now = Instant::now();
        let trips = filter_trips(&self.dataset.trips, self.filter);
        let stations = compute_station_traffic(&self.dataset.stations, &trips);
        let scales = Scales::new(&stations, self.filter);
        let reconciliation = self.layer.bind(&stations, &scales);
        self.layer.reposition(&self.projector);
        debug!(
            "Pipeline for {} counted {} trips in {:?}",
            self.label,
            trips.len(),
            now.elapsed()
        );
        self.last = Some(reconciliation);
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn filter(&self) -> TimeFilter {
        self.filter
    }

    /// Text for the slider's time display.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn layer(&self) -> &MarkerLayer {
        &self.layer
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.layer.markers()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// What the last pipeline run changed.
    pub fn last_reconciliation(&self) -> Option<&Reconciliation> {
        self.last.as_ref()
    }

    pub fn projector(&self) -> &P {
        &self.projector
    }

    /// Swaps the projector, e.g. after the viewport moved. Positions refresh
    /// on the next [`Event::ViewportChanged`].
    pub fn set_projector(&mut self, projector: P) {
        self.projector = projector;
    }
}
