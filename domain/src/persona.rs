use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ImageRef;

/// A selectable character with a starting balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub name: String,
    pub net_worth: i64,
    #[serde(default)]
    pub image_ref: ImageRef,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub is_hard: bool,
}

impl Persona {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        net_worth: i64,
        image_ref: ImageRef,
    ) -> Self {
        Self {
            name: name.into(),
            net_worth,
            image_ref,
            is_premium: false,
            is_hard: false,
        }
    }

    #[must_use]
    pub fn premium(mut self) -> Self {
        self.is_premium = true;
        self
    }

    #[must_use]
    pub fn hard(mut self) -> Self {
        self.is_hard = true;
        self
    }

    #[must_use]
    pub fn tier(&self) -> AccessTier {
        if self.is_premium {
            AccessTier::Premium
        } else {
            AccessTier::Free
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessTier {
    Free,
    Premium,
}

#[must_use]
pub fn built_in_personas() -> Vec<Persona> {
    vec![
        Persona::new("Bill Gates", 180_000_000_000, "bill_gates".into()),
        Persona::new("Elon Musk", 380_000_000_000, "elon_musk".into()).premium().hard(),
        Persona::new("Jeff Bezos", 230_000_000_000, "jeff_bezos".into()),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersonaError {
    #[error("name must not be blank")]
    BlankName,

    #[error("invalid net worth entered: {input:?}")]
    InvalidNetWorth { input: String },
}

/// Raw user input for a custom persona, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonaDraft {
    pub name: String,
    pub net_worth: String,
    #[serde(default)]
    pub image: Option<ImageRef>,
}

impl PersonaDraft {
    /// Validates the draft. Net worth must be a non-negative whole number;
    /// a missing image yields an empty reference.
    pub fn validate(&self) -> Result<Persona, PersonaError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(PersonaError::BlankName);
        }

        let input = self.net_worth.trim();
        let net_worth = input
            .parse::<i64>()
            .ok()
            .filter(|value| *value >= 0)
            .ok_or_else(|| PersonaError::InvalidNetWorth {
                input: self.net_worth.clone(),
            })?;

        let image_ref = self.image.clone().unwrap_or_default();
        Ok(Persona::new(name, net_worth, image_ref))
    }
}
