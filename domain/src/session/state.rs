use crate::money::format_full;
use crate::{Catalog, ItemId, Persona, PurchasedItem};

use super::purchase::PurchaseState;
use super::snapshot::{ItemLine, SessionSnapshot};
use super::summary::SessionSummary;
use super::{SessionAction, SessionConfig, SessionEffect, SessionError, SessionEvent, SessionPhase};

#[derive(Clone, Debug)]
pub struct SessionState {
    pub(super) phase: SessionPhase,
    config: SessionConfig,
    persona: Persona,
    catalog: Catalog,
    pub(super) balance: i64,
    pub(super) purchases: PurchaseState,
    pub(super) elapsed_seconds: u64,
}

impl SessionState {
    pub fn process_action(
        &mut self,
        action: SessionAction,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        self.require_phase(SessionPhase::Active, action.name())?;
        match action {
            SessionAction::Buy(item_id) => self.handle_buy(item_id),
            SessionAction::Sell(item_id) => self.handle_sell(item_id),
            SessionAction::Tick => self.handle_tick(),
            SessionAction::Exit => self.handle_exit(),
        }
    }

    fn require_phase(
        &self,
        required: SessionPhase,
        action: &'static str,
    ) -> Result<(), SessionError> {
        if self.phase != required {
            return Err(SessionError::InvalidPhase {
                action,
                phase: self.phase,
            });
        }
        Ok(())
    }
}

impl SessionState {
    #[must_use]
    pub fn new(
        persona: Persona,
        catalog: Catalog,
        config: SessionConfig,
    ) -> Self {
        let purchases = PurchaseState::new(&catalog);
        Self {
            phase: SessionPhase::Active,
            config,
            balance: persona.net_worth,
            persona,
            catalog,
            purchases,
            elapsed_seconds: 0,
        }
    }

    /// Creates a session and returns its opening effects. A persona with
    /// nothing to spend finishes on the spot.
    #[must_use]
    pub fn launch(
        persona: Persona,
        catalog: Catalog,
        config: SessionConfig,
    ) -> (Self, Vec<SessionEffect>) {
        let mut state = Self::new(persona, catalog, config);

        let mut effects = vec![SessionEffect::Notify(SessionEvent::Started {
            persona_name: state.persona.name.clone(),
            net_worth: state.persona.net_worth,
        })];
        effects.extend(state.settle());

        if state.phase == SessionPhase::Active {
            effects.push(SessionEffect::ScheduleTick {
                delay: state.config.tick_interval,
            });
        }

        (state, effects)
    }

    /// Finishes the session if the balance has run out. Safe to call any
    /// number of times: only the first observation of a spent balance
    /// produces the completion effects.
    pub fn settle(&mut self) -> Vec<SessionEffect> {
        if self.phase != SessionPhase::Active || self.balance > 0 {
            return Vec::new();
        }

        self.phase = SessionPhase::Finished;
        vec![
            SessionEffect::Complete(self.summary()),
            SessionEffect::Notify(SessionEvent::Finished {
                elapsed_seconds: self.elapsed_seconds,
            }),
        ]
    }

    fn handle_buy(
        &mut self,
        item_id: ItemId,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        let price = self.catalog.get(item_id).ok_or(SessionError::UnknownItem(item_id))?.unit_price;

        if self.balance < price {
            return Err(SessionError::InsufficientFunds {
                available: self.balance,
                required: price,
            });
        }

        let quantity = self
            .purchases
            .quantity(item_id)
            .checked_add(1)
            .ok_or(SessionError::Overflow { action: "Buy" })?;

        self.balance -= price;
        self.purchases.quantities[item_id.0] = quantity;

        let mut effects = vec![SessionEffect::Notify(SessionEvent::Purchased {
            item_id,
            quantity,
            balance: self.balance,
        })];
        effects.extend(self.settle());
        Ok(effects)
    }

    fn handle_sell(
        &mut self,
        item_id: ItemId,
    ) -> Result<Vec<SessionEffect>, SessionError> {
        let price = self.catalog.get(item_id).ok_or(SessionError::UnknownItem(item_id))?.unit_price;

        let quantity = self.purchases.quantity(item_id);
        if quantity == 0 {
            return Err(SessionError::NothingToSell { item_id });
        }

        let balance = self
            .balance
            .checked_add(price)
            .ok_or(SessionError::Overflow { action: "Sell" })?;

        self.balance = balance;
        self.purchases.quantities[item_id.0] = quantity - 1;

        Ok(vec![SessionEffect::Notify(SessionEvent::Sold {
            item_id,
            quantity: quantity - 1,
            balance,
        })])
    }

    fn handle_tick(&mut self) -> Result<Vec<SessionEffect>, SessionError> {
        self.elapsed_seconds = self
            .elapsed_seconds
            .checked_add(1)
            .ok_or(SessionError::Overflow { action: "Tick" })?;

        Ok(vec![
            SessionEffect::Notify(SessionEvent::Ticked {
                elapsed_seconds: self.elapsed_seconds,
            }),
            SessionEffect::ScheduleTick {
                delay: self.config.tick_interval,
            },
        ])
    }

    fn handle_exit(&mut self) -> Result<Vec<SessionEffect>, SessionError> {
        self.phase = SessionPhase::Abandoned;
        Ok(vec![SessionEffect::Notify(SessionEvent::Abandoned)])
    }

    fn summary(&self) -> SessionSummary {
        let purchased_items = self
            .catalog
            .iter()
            .filter_map(|(item_id, item)| {
                let quantity = self.purchases.quantity(item_id);
                (quantity > 0).then(|| PurchasedItem {
                    name: item.name.clone(),
                    unit_price: item.unit_price,
                    quantity,
                    image_ref: item.image_ref.clone(),
                })
            })
            .collect();

        SessionSummary {
            persona_name: self.persona.name.clone(),
            persona_image: self.persona.image_ref.clone(),
            elapsed_seconds: self.elapsed_seconds,
            purchased_items,
        }
    }
}

impl SessionState {
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn balance(&self) -> i64 {
        self.balance
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    #[must_use]
    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn quantity(
        &self,
        item_id: ItemId,
    ) -> u32 {
        self.purchases.quantity(item_id)
    }

    /// Total value of everything currently held.
    #[must_use]
    pub fn spent(&self) -> i64 {
        self.purchases.spent(&self.catalog)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let items = self
            .catalog
            .iter()
            .map(|(item_id, item)| ItemLine {
                item_id,
                name: item.name.clone(),
                unit_price: item.unit_price,
                quantity: self.purchases.quantity(item_id),
                image_ref: item.image_ref.clone(),
            })
            .collect();

        SessionSnapshot {
            phase: self.phase,
            persona_name: self.persona.name.clone(),
            persona_image: self.persona.image_ref.clone(),
            net_worth: self.persona.net_worth,
            balance: self.balance,
            balance_display: format_full(self.balance),
            elapsed_seconds: self.elapsed_seconds,
            items,
        }
    }
}
