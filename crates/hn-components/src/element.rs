//! The closed set of element variants and the quantities every element
//! derives from current node states.

use hn_core::{CtrlId, ElemId, LoadId, NodeId, Real};
use hn_fluids::FluidModel;

use crate::coil::{Coil, LoadCoil};
use crate::common::{check_finite, require_positive};
use crate::error::ComponentResult;
use crate::pipe::Pipe;
use crate::pump::{CurvePump, EmpiricalPump};
use crate::side::PlantSide;
use crate::sink::{FixedFlow, HeatSink};
use crate::tower::{CurveTower, MerkelTower};
use crate::traits::{ElementModel, EvalContext, PortStates, ReportValue};
use crate::valve::Valve;

#[derive(Clone, Debug, PartialEq)]
pub enum ElementKind {
    Pipe(Pipe),
    CurvePump(CurvePump),
    EmpiricalPump(EmpiricalPump),
    Valve(Valve),
    Coil(Coil),
    LoadCoil(LoadCoil),
    HeatSink(HeatSink),
    /// Evaporator or condenser barrel of a chiller.
    ChillerSide(PlantSide),
    ExchangerSide(PlantSide),
    CurveTower(CurveTower),
    MerkelTower(MerkelTower),
    FixedFlow(FixedFlow),
}

impl ElementKind {
    pub fn model(&self) -> &dyn ElementModel {
        match self {
            ElementKind::Pipe(m) => m,
            ElementKind::CurvePump(m) => m,
            ElementKind::EmpiricalPump(m) => m,
            ElementKind::Valve(m) => m,
            ElementKind::Coil(m) => m,
            ElementKind::LoadCoil(m) => m,
            ElementKind::HeatSink(m) => m,
            ElementKind::ChillerSide(m) => m,
            ElementKind::ExchangerSide(m) => m,
            ElementKind::CurveTower(m) => m,
            ElementKind::MerkelTower(m) => m,
            ElementKind::FixedFlow(m) => m,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Pipe(_) => "Pipe",
            ElementKind::CurvePump(_) => "CurvePump",
            ElementKind::EmpiricalPump(_) => "EmpiricalPump",
            ElementKind::Valve(_) => "Valve",
            ElementKind::Coil(_) => "Coil",
            ElementKind::LoadCoil(_) => "LoadCoil",
            ElementKind::HeatSink(_) => "HeatSink",
            ElementKind::ChillerSide(_) => "ChillerSide",
            ElementKind::ExchangerSide(_) => "ExchangerSide",
            ElementKind::CurveTower(_) => "CurveTower",
            ElementKind::MerkelTower(_) => "MerkelTower",
            ElementKind::FixedFlow(_) => "FixedFlow",
        }
    }
}

/// A flow-carrying device between one inlet and one outlet node.
///
/// Every derived quantity is recomputed from the context on each call;
/// nothing is cached, so repeated reads within a step agree.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub id: ElemId,
    pub name: String,
    pub inlet: NodeId,
    pub outlet: NodeId,
    /// Internal fluid volume [ft³].
    pub volume: Real,
    pub kind: ElementKind,
}

impl Element {
    /// Create an element, using the variant's default volume unless one is given.
    pub fn new(
        id: ElemId,
        name: impl Into<String>,
        inlet: NodeId,
        outlet: NodeId,
        kind: ElementKind,
        volume: Option<Real>,
    ) -> ComponentResult<Self> {
        let volume = match volume {
            Some(v) => require_positive(v, "element volume must be positive")?,
            None => kind.model().default_volume(),
        };
        Ok(Self {
            id,
            name: name.into(),
            inlet,
            outlet,
            volume,
            kind,
        })
    }

    pub fn ports<'a>(&'a self, ctx: &dyn EvalContext) -> PortStates<'a> {
        PortStates {
            elem: self.id,
            name: &self.name,
            inlet: ctx.node(self.inlet),
            outlet: ctx.node(self.outlet),
        }
    }

    pub fn pressure_drop(&self, ctx: &dyn EvalContext) -> Real {
        self.ports(ctx).pressure_drop()
    }

    pub fn inlet_temperature(&self, ctx: &dyn EvalContext) -> Real {
        ctx.node(self.inlet).temperature
    }

    pub fn outlet_temperature(&self, ctx: &dyn EvalContext) -> Real {
        ctx.node(self.outlet).temperature
    }

    /// Signed volumetric flow [GPM].
    pub fn flow(&self, ctx: &dyn EvalContext) -> ComponentResult<Real> {
        let q = self.kind.model().flow(ctx, &self.ports(ctx))?;
        check_finite(q, "flow")
    }

    /// Heat added to the fluid passing through [Btu/hr].
    pub fn heat_gain(&self, ctx: &dyn EvalContext) -> ComponentResult<Real> {
        let q = self.kind.model().heat_gain(ctx, &self.ports(ctx))?;
        check_finite(q, "heat gain")
    }

    /// Electric input [kW]; zero for passive elements.
    pub fn electric_power(&self, ctx: &dyn EvalContext) -> ComponentResult<Real> {
        let p = self.kind.model().electric_power(ctx, &self.ports(ctx))?;
        check_finite(p, "electric power")
    }

    /// Thermal capacitance of the contained fluid [Btu/°F].
    pub fn heat_capacity(&self, fluid: &dyn FluidModel) -> Real {
        fluid.heat_capacity(self.volume)
    }

    /// Capacity rate of the current flow [Btu/(hr·°F)].
    pub fn heat_capacity_rate(&self, ctx: &dyn EvalContext) -> ComponentResult<Real> {
        Ok(ctx.fluid().capacity_rate_per_gpm() * self.flow(ctx)?)
    }

    /// Energy carried from inlet to outlet temperature [Btu/hr].
    pub fn heat_advection(&self, ctx: &dyn EvalContext) -> ComponentResult<Real> {
        let ports = self.ports(ctx);
        Ok(self.heat_capacity_rate(ctx)? * (ports.outlet.temperature - ports.inlet.temperature))
    }

    /// Design flow for variants that have one [GPM].
    pub fn nominal_flow(&self) -> Option<Real> {
        match &self.kind {
            ElementKind::Pipe(p) => Some(p.law.nominal_flow),
            ElementKind::CurvePump(p) => Some(p.nominal_flow),
            ElementKind::EmpiricalPump(p) => Some(p.nominal_flow),
            ElementKind::Coil(c) => Some(c.law.nominal_flow),
            ElementKind::HeatSink(s) => Some(s.law.nominal_flow),
            ElementKind::ChillerSide(s) | ElementKind::ExchangerSide(s) => {
                Some(s.law.nominal_flow)
            }
            ElementKind::CurveTower(t) => Some(t.hydraulics.friction.nominal_flow),
            ElementKind::MerkelTower(t) => Some(t.hydraulics.friction.nominal_flow),
            ElementKind::Valve(_) | ElementKind::LoadCoil(_) | ElementKind::FixedFlow(_) => None,
        }
    }

    /// Controller whose output drives this element, if any.
    pub fn controller(&self) -> Option<CtrlId> {
        match &self.kind {
            ElementKind::CurvePump(p) => Some(p.controller),
            ElementKind::EmpiricalPump(p) => Some(p.controller),
            ElementKind::Valve(v) => Some(v.controller),
            ElementKind::HeatSink(s) => Some(s.controller),
            ElementKind::CurveTower(t) => Some(t.controller),
            ElementKind::MerkelTower(t) => Some(t.controller),
            _ => None,
        }
    }

    /// Building load served, for coils.
    pub fn load(&self) -> Option<LoadId> {
        match &self.kind {
            ElementKind::Coil(c) => Some(c.load),
            ElementKind::LoadCoil(c) => Some(c.load),
            _ => None,
        }
    }

    pub fn as_valve(&self) -> Option<&Valve> {
        match &self.kind {
            ElementKind::Valve(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_coil(&self) -> Option<&Coil> {
        match &self.kind {
            ElementKind::Coil(c) => Some(c),
            _ => None,
        }
    }

    /// Report values in a fixed order for this variant.
    pub fn report(&self, ctx: &dyn EvalContext) -> ComponentResult<Vec<ReportValue>> {
        let mut out = Vec::new();
        self.kind.model().report(ctx, &self.ports(ctx), &mut out)?;
        Ok(out)
    }
}
