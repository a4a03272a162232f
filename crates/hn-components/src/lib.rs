//! hn-components: element and plant library for hydronet.
//!
//! Provides:
//! - The power-law flow/pressure relation and tower lift variant
//! - Performance curves, LMTD and effectiveness-NTU relations
//! - The closed [`ElementKind`] set: pipes, pumps, valves, coils, sinks,
//!   chiller and exchanger sides, cooling towers, fixed-flow devices
//! - Plants (chillers, heat exchangers) coupled to their side elements
//!   through an index-based association table
//! - Weather and load provider traits with constant and hourly sources
//!
//! Every element quantity is a pure function of the [`EvalContext`] it is
//! evaluated against: the context hands out pre-step node states and
//! controller outputs, so reads never disturb one another.

pub mod chiller;
pub mod coil;
pub mod common;
pub mod curves;
pub mod element;
pub mod error;
pub mod exchanger;
pub mod flow_law;
pub mod hx;
pub mod pipe;
pub mod plant;
pub mod providers;
pub mod pump;
pub mod side;
pub mod sink;
pub mod tower;
pub mod traits;
pub mod valve;

pub use chiller::{ChillerDuty, CurveChiller, ParametricChiller};
pub use coil::{Coil, LoadCoil};
pub use curves::Curve;
pub use element::{Element, ElementKind};
pub use error::{ComponentError, ComponentResult};
pub use exchanger::{ExchangerDuty, NtuExchanger, UaExchanger};
pub use flow_law::PowerLaw;
pub use hx::{FlowArrangement, effectiveness, lmtd};
pub use pipe::Pipe;
pub use plant::{Plant, PlantKind, link_plants};
pub use providers::{ConstantLoad, ConstantWeather, HourlyLoad, HourlyWeather, Load, Weather};
pub use pump::{CurvePump, EmpiricalPump};
pub use side::PlantSide;
pub use sink::{FixedFlow, HeatSink};
pub use tower::{CurveTower, MerkelTower, TowerHydraulics};
pub use traits::{
    ElementModel, EvalContext, NodeState, PortStates, ReportValue, SideLink, SideRole,
};
pub use valve::{Valve, ValvePort};
