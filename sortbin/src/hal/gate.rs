/// Commanded position of a gate. There is no position feedback.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum GateState {
    #[default]
    Closed,
    Open,
}

impl GateState {
    pub fn is_open(&self) -> bool {
        *self == GateState::Open
    }
}
