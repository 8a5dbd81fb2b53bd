//! Database models for machines.

use crate::types::{MachineId, PricingModelId};
use serde::{Deserialize, Serialize};

/// Database representation of a machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Machine {
    pub id: MachineId,
    pub name: String,
    pub pricing_id: Option<PricingModelId>,
}
