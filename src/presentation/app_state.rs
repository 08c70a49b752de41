// Application state for HTTP handlers
use crate::application::fleet_service::FleetService;

#[derive(Clone)]
pub struct AppState {
    pub fleet_service: FleetService,
}
