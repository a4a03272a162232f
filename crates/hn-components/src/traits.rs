//! Evaluation seams shared by every element and plant.

use hn_core::{CtrlId, ElemId, LoadId, NodeId, PlantId, Real};
use hn_fluids::FluidModel;

use crate::element::Element;
use crate::error::ComponentResult;
use crate::plant::Plant;
use crate::providers::{Load, Weather};

/// Pressure [ft] and temperature [°F] of a node at the start of a step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeState {
    pub pressure: Real,
    pub temperature: Real,
}

/// Role an element plays for the plant it is associated with.
///
/// For a UA exchanger `Primary` is the cold side and `Secondary` the hot side;
/// an NTU exchanger decides hot and cold from inlet temperatures each step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SideRole {
    Evaporator,
    Condenser,
    Primary,
    Secondary,
}

impl SideRole {
    pub fn as_str(self) -> &'static str {
        match self {
            SideRole::Evaporator => "evaporator",
            SideRole::Condenser => "condenser",
            SideRole::Primary => "primary side",
            SideRole::Secondary => "secondary side",
        }
    }
}

/// Non-owning back-reference from a side element to its plant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SideLink {
    pub plant: PlantId,
    pub role: SideRole,
}

/// Read-only view of the network during a step.
///
/// Every query must return the pre-step (current) value regardless of how
/// many times or in which order it is called.
pub trait EvalContext: Sync {
    fn fluid(&self) -> &dyn FluidModel;
    fn node(&self, id: NodeId) -> NodeState;
    fn element(&self, id: ElemId) -> &Element;
    fn side_link(&self, id: ElemId) -> Option<SideLink>;
    fn plant(&self, id: PlantId) -> &Plant;
    fn controller_output(&self, id: CtrlId) -> Real;
    fn weather(&self) -> &dyn Weather;
    fn load(&self, id: LoadId) -> &dyn Load;
}

/// Node states on either side of an element, bundled for the element models.
#[derive(Clone, Copy, Debug)]
pub struct PortStates<'a> {
    pub elem: ElemId,
    pub name: &'a str,
    pub inlet: NodeState,
    pub outlet: NodeState,
}

impl PortStates<'_> {
    /// Inlet minus outlet pressure [ft].
    pub fn pressure_drop(&self) -> Real {
        self.inlet.pressure - self.outlet.pressure
    }

    /// Outlet minus inlet pressure [ft].
    pub fn pressure_gain(&self) -> Real {
        self.outlet.pressure - self.inlet.pressure
    }
}

/// One named, unit-tagged reported quantity.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportValue {
    pub name: &'static str,
    pub unit: &'static str,
    pub value: Real,
}

impl ReportValue {
    pub fn new(name: &'static str, unit: &'static str, value: Real) -> Self {
        Self { name, unit, value }
    }
}

/// Behaviour shared by every element variant.
///
/// Implementations are pure functions of the port states, their own
/// parameters and whatever the context returns.
pub trait ElementModel: Send + Sync {
    /// Signed volumetric flow [GPM], positive inlet → outlet.
    fn flow(&self, ctx: &dyn EvalContext, ports: &PortStates<'_>) -> ComponentResult<Real>;

    /// Heat added to the fluid [Btu/hr].
    fn heat_gain(&self, _ctx: &dyn EvalContext, _ports: &PortStates<'_>) -> ComponentResult<Real> {
        Ok(0.0)
    }

    /// Electric input [kW].
    fn electric_power(
        &self,
        _ctx: &dyn EvalContext,
        _ports: &PortStates<'_>,
    ) -> ComponentResult<Real> {
        Ok(0.0)
    }

    /// Internal fluid volume [ft³] when none is configured.
    fn default_volume(&self) -> Real;

    /// Append this element's report values in a fixed order.
    fn report(
        &self,
        ctx: &dyn EvalContext,
        ports: &PortStates<'_>,
        out: &mut Vec<ReportValue>,
    ) -> ComponentResult<()> {
        out.push(ReportValue::new("Flow", "GPM", self.flow(ctx, ports)?));
        out.push(ReportValue::new("Pressure Drop", "ft", ports.pressure_drop()));
        out.push(ReportValue::new("Inlet Temperature", "F", ports.inlet.temperature));
        out.push(ReportValue::new("Outlet Temperature", "F", ports.outlet.temperature));
        Ok(())
    }
}
