use crate::state::state::YaccState;

/// What pressing play does in a given [YaccState].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchAction {
    Install,
    /// Updating reinstalls over the existing files.
    Update,
    Launch,
    Nothing,
}

impl LaunchAction {
    pub fn for_state(state: YaccState) -> Self {
        match state {
            YaccState::Install => LaunchAction::Install,
            YaccState::MustUpdate => LaunchAction::Update,
            YaccState::ReadyToPlay => LaunchAction::Launch,
            YaccState::GameNotFound | YaccState::Installing | YaccState::Updating => LaunchAction::Nothing,
        }
    }

    /// State published before the backend call resolves. `None` leaves the record alone.
    pub fn pending_state(&self) -> Option<YaccState> {
        match self {
            LaunchAction::Install => Some(YaccState::Installing),
            LaunchAction::Update => Some(YaccState::Updating),
            LaunchAction::Launch | LaunchAction::Nothing => None,
        }
    }
}
