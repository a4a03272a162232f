//! Weather and building-load providers.
//!
//! Providers answer any number of queries per step without side effects and
//! move forward only when the run loop calls `advance_to` after a commit.

use hn_core::Real;
use hn_fluids::psychro;

use crate::error::{ComponentError, ComponentResult};

/// Outdoor air conditions.
pub trait Weather: Send + Sync {
    /// Dry-bulb temperature [°F].
    fn drybulb(&self) -> Real;
    /// Wet-bulb temperature [°F].
    fn wetbulb(&self) -> Real;
    /// Barometric pressure [psia].
    fn pressure(&self) -> Real;
    /// Moist-air enthalpy [Btu/lb].
    fn enthalpy(&self) -> Real;
    /// Move to simulation time `time_hours`.
    fn advance_to(&mut self, time_hours: Real);
}

/// Building load served by a coil.
pub trait Load: Send + Sync {
    /// Sensible load [Btu/hr].
    fn sensible_load(&self) -> Real;
    /// Latent load [Btu/hr].
    fn latent_load(&self) -> Real;
    /// Move to simulation time `time_hours`.
    fn advance_to(&mut self, time_hours: Real);

    fn total_load(&self) -> Real {
        self.sensible_load() + self.latent_load()
    }
}

/// Dry-bulb, wet-bulb and derived enthalpy at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AirState {
    pub drybulb: Real,
    pub wetbulb: Real,
    pub enthalpy: Real,
}

impl AirState {
    pub fn new(drybulb: Real, wetbulb: Real, pressure: Real) -> ComponentResult<Self> {
        let enthalpy = psychro::enthalpy_from_wetbulb(drybulb, wetbulb, pressure)?;
        Ok(Self {
            drybulb,
            wetbulb,
            enthalpy,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConstantWeather {
    air: AirState,
    pressure: Real,
}

impl ConstantWeather {
    pub fn new(drybulb: Real, wetbulb: Real, pressure: Real) -> ComponentResult<Self> {
        Ok(Self {
            air: AirState::new(drybulb, wetbulb, pressure)?,
            pressure,
        })
    }
}

impl Weather for ConstantWeather {
    fn drybulb(&self) -> Real {
        self.air.drybulb
    }
    fn wetbulb(&self) -> Real {
        self.air.wetbulb
    }
    fn pressure(&self) -> Real {
        self.pressure
    }
    fn enthalpy(&self) -> Real {
        self.air.enthalpy
    }
    fn advance_to(&mut self, _time_hours: Real) {}
}

/// Hour-by-hour weather, held constant within each hour and repeated
/// cyclically past the end of the record.
#[derive(Clone, Debug, PartialEq)]
pub struct HourlyWeather {
    hours: Vec<AirState>,
    pressure: Real,
    current: usize,
}

impl HourlyWeather {
    /// Build from `(drybulb, wetbulb)` pairs, one per hour.
    pub fn new(records: &[(Real, Real)], pressure: Real) -> ComponentResult<Self> {
        if records.is_empty() {
            return Err(ComponentError::InvalidArg {
                what: "hourly weather needs at least one record",
            });
        }
        let hours = records
            .iter()
            .map(|&(db, wb)| AirState::new(db, wb, pressure))
            .collect::<ComponentResult<Vec<_>>>()?;
        Ok(Self {
            hours,
            pressure,
            current: 0,
        })
    }

    fn now(&self) -> &AirState {
        &self.hours[self.current]
    }
}

impl Weather for HourlyWeather {
    fn drybulb(&self) -> Real {
        self.now().drybulb
    }
    fn wetbulb(&self) -> Real {
        self.now().wetbulb
    }
    fn pressure(&self) -> Real {
        self.pressure
    }
    fn enthalpy(&self) -> Real {
        self.now().enthalpy
    }
    fn advance_to(&mut self, time_hours: Real) {
        self.current = hour_index(time_hours, self.hours.len());
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantLoad {
    pub sensible: Real,
    pub latent: Real,
}

impl Load for ConstantLoad {
    fn sensible_load(&self) -> Real {
        self.sensible
    }
    fn latent_load(&self) -> Real {
        self.latent
    }
    fn advance_to(&mut self, _time_hours: Real) {}
}

/// Hour-by-hour load profile, repeated cyclically.
#[derive(Clone, Debug, PartialEq)]
pub struct HourlyLoad {
    /// `(sensible, latent)` per hour [Btu/hr].
    hours: Vec<(Real, Real)>,
    current: usize,
}

impl HourlyLoad {
    pub fn new(hours: Vec<(Real, Real)>) -> ComponentResult<Self> {
        if hours.is_empty() {
            return Err(ComponentError::InvalidArg {
                what: "hourly load needs at least one record",
            });
        }
        Ok(Self { hours, current: 0 })
    }
}

impl Load for HourlyLoad {
    fn sensible_load(&self) -> Real {
        self.hours[self.current].0
    }
    fn latent_load(&self) -> Real {
        self.hours[self.current].1
    }
    fn advance_to(&mut self, time_hours: Real) {
        self.current = hour_index(time_hours, self.hours.len());
    }
}

fn hour_index(time_hours: Real, len: usize) -> usize {
    // A small nudge keeps accumulated dt round-off from landing just short
    // of an hour boundary.
    let hour = (time_hours.max(0.0) + 1e-9).floor() as usize;
    hour % len
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_fluids::psychro::STANDARD_PRESSURE_PSIA;

    #[test]
    fn constant_weather_enthalpy() {
        let w = ConstantWeather::new(95.0, 78.0, STANDARD_PRESSURE_PSIA).unwrap();
        // ASHRAE chart: about 41.4 Btu/lb at 78 °F wet bulb.
        assert!((w.enthalpy() - 41.4).abs() < 0.5, "h = {}", w.enthalpy());
    }

    #[test]
    fn hourly_weather_cycles() {
        let mut w =
            HourlyWeather::new(&[(80.0, 65.0), (90.0, 70.0)], STANDARD_PRESSURE_PSIA).unwrap();
        assert_eq!(w.drybulb(), 80.0);
        w.advance_to(1.0);
        assert_eq!(w.wetbulb(), 70.0);
        w.advance_to(2.5);
        assert_eq!(w.drybulb(), 80.0);
    }

    #[test]
    fn hourly_load_steps_within_hour() {
        let mut l = HourlyLoad::new(vec![(100.0, 10.0), (200.0, 20.0)]).unwrap();
        l.advance_to(0.999);
        assert_eq!(l.total_load(), 110.0);
        // Ten steps of 0.1 h accumulate to slightly less than 1.0.
        let t: f64 = (0..10).map(|_| 0.1).sum();
        l.advance_to(t);
        assert_eq!(l.total_load(), 220.0);
    }

    #[test]
    fn empty_profiles_rejected() {
        assert!(HourlyLoad::new(vec![]).is_err());
        assert!(HourlyWeather::new(&[], STANDARD_PRESSURE_PSIA).is_err());
    }
}
