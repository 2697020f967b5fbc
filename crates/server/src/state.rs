use bikeflow::prelude::*;
use tokio::sync::Mutex;

pub struct AppState {
    /// One session. The lock hands events to the controller one at a time.
    pub controller: Mutex<Controller<Viewport>>,
}

impl AppState {
    pub fn new(controller: Controller<Viewport>) -> Self {
        Self {
            controller: Mutex::new(controller),
        }
    }
}
