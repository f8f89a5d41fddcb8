use crate::ItemId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionAction {
    Buy(ItemId),
    Sell(ItemId),
    Tick,
    Exit,
}

impl SessionAction {
    pub(super) fn name(&self) -> &'static str {
        match self {
            SessionAction::Buy(_) => "Buy",
            SessionAction::Sell(_) => "Sell",
            SessionAction::Tick => "Tick",
            SessionAction::Exit => "Exit",
        }
    }
}
