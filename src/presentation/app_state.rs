// Application state for HTTP handlers
use crate::application::dashboard_manager::DashboardManager;

pub struct AppState {
    pub manager: DashboardManager,
}
