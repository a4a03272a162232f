//! Coupled plants and the link pass that associates them with their side
//! elements.

use hn_core::{CtrlId, ElemId, PlantId, Real};
use hn_fluids::FluidModel;

use crate::chiller::{CurveChiller, ParametricChiller, chiller_report};
use crate::element::{Element, ElementKind};
use crate::error::{ComponentError, ComponentResult};
use crate::exchanger::{NtuExchanger, UaExchanger};
use crate::traits::{EvalContext, ReportValue, SideLink, SideRole};

#[derive(Clone, Debug, PartialEq)]
pub enum PlantKind {
    CurveChiller(CurveChiller),
    ParametricChiller(ParametricChiller),
    NtuExchanger(NtuExchanger),
    UaExchanger(UaExchanger),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Plant {
    pub id: PlantId,
    pub name: String,
    pub kind: PlantKind,
}

impl Plant {
    pub fn new(id: PlantId, name: impl Into<String>, kind: PlantKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
        }
    }

    /// The two side elements and the role each plays.
    pub fn sides(&self) -> [(ElemId, SideRole); 2] {
        match &self.kind {
            PlantKind::CurveChiller(c) => [
                (c.evaporator, SideRole::Evaporator),
                (c.condenser, SideRole::Condenser),
            ],
            PlantKind::ParametricChiller(c) => [
                (c.evaporator, SideRole::Evaporator),
                (c.condenser, SideRole::Condenser),
            ],
            PlantKind::NtuExchanger(x) => [
                (x.primary, SideRole::Primary),
                (x.secondary, SideRole::Secondary),
            ],
            PlantKind::UaExchanger(x) => {
                [(x.cold, SideRole::Primary), (x.hot, SideRole::Secondary)]
            }
        }
    }

    /// Enabling controller, for chillers.
    pub fn controller(&self) -> Option<CtrlId> {
        match &self.kind {
            PlantKind::CurveChiller(c) => Some(c.controller),
            PlantKind::ParametricChiller(c) => Some(c.controller),
            PlantKind::NtuExchanger(_) | PlantKind::UaExchanger(_) => None,
        }
    }

    fn is_chiller(&self) -> bool {
        matches!(
            self.kind,
            PlantKind::CurveChiller(_) | PlantKind::ParametricChiller(_)
        )
    }

    /// Heat added to the fluid in the side element playing `role` [Btu/hr].
    pub fn side_heat(&self, ctx: &dyn EvalContext, role: SideRole) -> ComponentResult<Real> {
        match &self.kind {
            PlantKind::CurveChiller(c) => {
                let duty = c.duty(ctx);
                Ok(chiller_side(role, duty.evaporator, duty.condenser))
            }
            PlantKind::ParametricChiller(c) => {
                let duty = c.duty(ctx);
                Ok(chiller_side(role, duty.evaporator, duty.condenser))
            }
            PlantKind::NtuExchanger(x) => Ok(x.duty(ctx)?.for_role(role)),
            PlantKind::UaExchanger(x) => Ok(x.duty(ctx)?.for_role(role)),
        }
    }

    /// Electric input [kW].
    pub fn electric_power(&self, ctx: &dyn EvalContext) -> Real {
        match &self.kind {
            PlantKind::CurveChiller(c) => c.duty(ctx).power,
            PlantKind::ParametricChiller(c) => c.duty(ctx).power,
            PlantKind::NtuExchanger(_) | PlantKind::UaExchanger(_) => 0.0,
        }
    }

    pub fn report(&self, ctx: &dyn EvalContext) -> ComponentResult<Vec<ReportValue>> {
        match &self.kind {
            PlantKind::CurveChiller(c) => {
                chiller_report(ctx, c.evaporator, c.condenser, &c.duty(ctx))
            }
            PlantKind::ParametricChiller(c) => {
                chiller_report(ctx, c.evaporator, c.condenser, &c.duty(ctx))
            }
            PlantKind::NtuExchanger(x) => x.report(ctx),
            PlantKind::UaExchanger(x) => x.report(ctx),
        }
    }

    /// Design-point quantities that depend on the side elements.
    fn prepare(&mut self, elements: &[Element], fluid: &dyn FluidModel) -> ComponentResult<()> {
        let nominal = |id: ElemId| {
            elements
                .get(id.idx())
                .and_then(Element::nominal_flow)
                .unwrap_or(0.0)
        };
        match &mut self.kind {
            PlantKind::NtuExchanger(x) => {
                let rate = fluid.capacity_rate_per_gpm();
                x.compute_nominal_ntu(rate * nominal(x.primary), rate * nominal(x.secondary))?;
            }
            PlantKind::UaExchanger(x) => {
                x.nominal_flows = Some((nominal(x.cold), nominal(x.hot)));
            }
            PlantKind::CurveChiller(_) | PlantKind::ParametricChiller(_) => {}
        }
        Ok(())
    }
}

fn chiller_side(role: SideRole, evaporator: Real, condenser: Real) -> Real {
    match role {
        SideRole::Condenser => condenser,
        _ => evaporator,
    }
}

/// Build the element → plant association table.
///
/// Every chiller side must be linked to exactly one chiller and every
/// exchanger side to exactly one exchanger. Plants also fix their design
/// quantities here.
pub fn link_plants(
    plants: &mut [Plant],
    elements: &[Element],
    fluid: &dyn FluidModel,
) -> ComponentResult<Vec<Option<SideLink>>> {
    let mut links: Vec<Option<SideLink>> = vec![None; elements.len()];

    for plant in plants.iter_mut() {
        for (elem_id, role) in plant.sides() {
            let elem = elements
                .get(elem_id.idx())
                .ok_or(ComponentError::InvalidArg {
                    what: "plant side refers to a missing element",
                })?;
            let fits = match elem.kind {
                ElementKind::ChillerSide(_) => plant.is_chiller(),
                ElementKind::ExchangerSide(_) => !plant.is_chiller(),
                _ => false,
            };
            if !fits {
                return Err(ComponentError::LinkMismatch {
                    plant: plant.name.clone(),
                    element: elem.name.clone(),
                    role: role.as_str(),
                });
            }
            let slot = &mut links[elem_id.idx()];
            if slot.is_some() {
                return Err(ComponentError::DuplicateLink {
                    element: elem.name.clone(),
                });
            }
            *slot = Some(SideLink {
                plant: plant.id,
                role,
            });
        }
        plant.prepare(elements, fluid)?;
    }

    for elem in elements {
        let needs_link = matches!(
            elem.kind,
            ElementKind::ChillerSide(_) | ElementKind::ExchangerSide(_)
        );
        if needs_link && links[elem.id.idx()].is_none() {
            return Err(ComponentError::MissingLink {
                element: elem.name.clone(),
            });
        }
    }

    Ok(links)
}
