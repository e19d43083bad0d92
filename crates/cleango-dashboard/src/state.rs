use crate::model::{CleanPhase, CleanRun, ConnectionStatus, Page, Stats};
use crate::pagination::PaginationState;

/// Everything the controller loop owns.
#[derive(Debug, Clone, Default)]
pub(crate) struct DashboardState {
    pub(crate) version: Option<String>,
    pub(crate) connection: ConnectionStatus,
    pub(crate) clean_phase: CleanPhase,
    pub(crate) last_clean: CleanRun,
    pub(crate) stats: Option<Stats>,
    pub(crate) page: Option<Page>,
    pub(crate) pagination: PaginationState,
}

impl DashboardState {
    pub(crate) fn new(page_size: u32) -> Self {
        Self {
            pagination: PaginationState::new(page_size),
            ..Self::default()
        }
    }

    /// The clean affordance is live only when idle and connected.
    pub(crate) const fn clean_available(&self) -> bool {
        matches!(self.clean_phase, CleanPhase::Idle) && self.connection.is_connected()
    }
}
