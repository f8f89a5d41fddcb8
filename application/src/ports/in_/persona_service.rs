use serde::Serialize;
use thiserror::Error;
use tracing::info;

use domain::money::format_compact;
use domain::{AccessTier, Persona, PersonaDraft, PersonaError, built_in_personas};

use crate::gateway::PersistenceGateway;
use crate::ports::out_::StoreError;

#[derive(Debug, Error)]
pub enum PersonaServiceError {
    #[error(transparent)]
    Invalid(#[from] PersonaError),

    #[error("persona not found: {0}")]
    NotFound(usize),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone, Debug, Serialize)]
pub struct PersonaEntry {
    /// Position in the listing; only stable until the custom list changes.
    pub id: usize,
    pub persona: Persona,
    pub tier: AccessTier,
    pub custom: bool,
    /// Net worth as shown on the selection list, e.g. `$180.0b`.
    pub net_worth_display: String,
}

/// Built-in personas followed by the player's own, reloaded on every call.
pub struct PersonaRegistry {
    gateway: PersistenceGateway,
    built_in: Vec<Persona>,
}

impl PersonaRegistry {
    pub fn new(gateway: PersistenceGateway) -> Self {
        Self {
            gateway,
            built_in: built_in_personas(),
        }
    }

    pub async fn list_personas(&self) -> Vec<PersonaEntry> {
        let custom = self.gateway.load_custom_personas().await;

        let built_in = self.built_in.iter().cloned().map(|p| (p, false));
        let custom = custom.into_iter().map(|p| (p, true));

        built_in
            .chain(custom)
            .enumerate()
            .map(|(id, (persona, custom))| PersonaEntry {
                id,
                tier: persona.tier(),
                net_worth_display: format_compact(persona.net_worth),
                persona,
                custom,
            })
            .collect()
    }

    pub async fn select_persona(
        &self,
        id: usize,
    ) -> Result<PersonaEntry, PersonaServiceError> {
        self.list_personas()
            .await
            .into_iter()
            .nth(id)
            .ok_or(PersonaServiceError::NotFound(id))
    }

    /// Validates the draft and prepends it to the custom list. Nothing is
    /// written when validation fails.
    pub async fn create_persona(
        &self,
        draft: PersonaDraft,
    ) -> Result<Persona, PersonaServiceError> {
        let persona = draft.validate()?;
        self.gateway.prepend_custom_persona(persona.clone()).await?;
        info!(name = %persona.name, net_worth = persona.net_worth, "Custom persona created");
        Ok(persona)
    }
}
