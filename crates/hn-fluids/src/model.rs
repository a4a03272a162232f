//! Loop fluid property model.

use hn_core::{Real, units};
use serde::{Deserialize, Serialize};

use crate::error::{FluidError, FluidResult};

/// Trait for loop fluid property models.
///
/// Implementations must be thread-safe (Send + Sync) to support parallel
/// evaluation of the compute phase.
pub trait FluidModel: Send + Sync {
    /// Density [lb/ft³].
    fn density(&self) -> Real;

    /// Specific heat [Btu/(lb·°F)].
    fn specific_heat(&self) -> Real;

    /// Capacity rate per unit volumetric flow [Btu/(hr·°F) per GPM].
    fn capacity_rate_per_gpm(&self) -> Real {
        units::capacity_rate_per_gpm(self.density(), self.specific_heat())
    }

    /// Heat capacity of a fluid volume [Btu/°F] for a volume in ft³.
    fn heat_capacity(&self, volume_ft3: Real) -> Real {
        self.density() * self.specific_heat() * volume_ft3
    }
}

/// Constant-property liquid water.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Water {
    /// Density [lb/ft³].
    pub density: Real,
    /// Specific heat [Btu/(lb·°F)].
    pub specific_heat: Real,
}

impl Water {
    /// Create a fluid with explicit properties, rejecting non-physical values.
    pub fn new(density: Real, specific_heat: Real) -> FluidResult<Self> {
        if !(density.is_finite() && density > 0.0) {
            return Err(FluidError::NonPhysical {
                what: "density",
                value: density,
            });
        }
        if !(specific_heat.is_finite() && specific_heat > 0.0) {
            return Err(FluidError::NonPhysical {
                what: "specific heat",
                value: specific_heat,
            });
        }
        Ok(Self {
            density,
            specific_heat,
        })
    }
}

impl Default for Water {
    fn default() -> Self {
        Self {
            density: 62.4,
            specific_heat: 1.0,
        }
    }
}

impl FluidModel for Water {
    fn density(&self) -> Real {
        self.density
    }

    fn specific_heat(&self) -> Real {
        self.specific_heat
    }
}
