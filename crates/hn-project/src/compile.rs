//! Compile a validated project into a runnable network.

use std::collections::HashMap;

use hn_components::{
    Coil, ConstantLoad, ConstantWeather, CurveChiller, CurvePump, CurveTower, ElementKind,
    EmpiricalPump, FixedFlow, HeatSink, HourlyLoad, HourlyWeather, LoadCoil, MerkelTower,
    NtuExchanger, ParametricChiller, Pipe, PlantKind, PlantSide, PowerLaw, TowerHydraulics,
    UaExchanger, Valve,
};
use hn_controls::{ControllerKind, LoadBasedController, PiController, SensorKind, Setpoint};
use hn_core::Id;
use hn_fluids::Water;
use hn_sim::{Network, NetworkBuilder, SimOptions};
use tracing::info;

use crate::schema::{
    ControllerKindDef, ElementKindDef, HydraulicsDef, LoadKind, NodeKind, PlantKindDef, Project,
    SensorKindDef, SetpointDef, WeatherDef,
};
use crate::validate::{ValidationError, validate_project};
use crate::ProjectResult;

/// Name → index for one section.
struct Index<'a> {
    section: &'static str,
    map: HashMap<&'a str, usize>,
}

impl<'a> Index<'a> {
    fn new(section: &'static str, names: impl Iterator<Item = &'a String>) -> Self {
        Self {
            section,
            map: names.enumerate().map(|(i, n)| (n.as_str(), i)).collect(),
        }
    }

    fn get(&self, name: &str, owner: &str) -> Result<Id, ValidationError> {
        self.map
            .get(name)
            .map(|&i| Id::from_usize(i))
            .ok_or_else(|| ValidationError::MissingReference {
                name: name.to_string(),
                context: format!("{} of '{owner}'", self.section),
            })
    }
}

fn law(h: &HydraulicsDef) -> ProjectResult<PowerLaw> {
    Ok(PowerLaw::new(h.nominal_flow, h.nominal_dp, h.exponent)?)
}

/// A network ready to run plus the run options stored with the project.
pub struct Compiled {
    pub network: Network,
    pub options: SimOptions,
}

pub fn compile(project: &Project) -> ProjectResult<Compiled> {
    validate_project(project)?;

    let nodes = Index::new("node", project.nodes.iter().map(|n| &n.name));
    let elements = Index::new("element", project.elements.iter().map(|e| &e.name));
    let loads = Index::new("load", project.loads.iter().map(|l| &l.name));
    let sensors = Index::new("sensor", project.sensors.iter().map(|s| &s.name));
    let controllers = Index::new("controller", project.controllers.iter().map(|c| &c.name));
    let curves: HashMap<&str, &hn_components::Curve> = project
        .curves
        .iter()
        .map(|c| (c.name.as_str(), &c.curve))
        .collect();
    let curve = |name: &str, owner: &str| {
        curves
            .get(name)
            .map(|&c| c.clone())
            .ok_or_else(|| ValidationError::MissingReference {
                name: name.to_string(),
                context: format!("curve of '{owner}'"),
            })
    };

    let mut b = NetworkBuilder::new();
    b.set_fluid(
        Water::new(project.fluid.density, project.fluid.specific_heat)?,
    );
    match &project.weather {
        WeatherDef::Constant {
            drybulb,
            wetbulb,
            pressure,
        } => {
            b.set_weather(ConstantWeather::new(*drybulb, *wetbulb, *pressure)?);
        }
        WeatherDef::Hourly { hours, pressure } => {
            let records: Vec<(f64, f64)> = hours.iter().map(|h| (h[0], h[1])).collect();
            b.set_weather(HourlyWeather::new(&records, *pressure)?);
        }
    }
    for load in &project.loads {
        match &load.kind {
            LoadKind::Constant { sensible, latent } => {
                b.add_load(ConstantLoad {
                    sensible: *sensible,
                    latent: *latent,
                });
            }
            LoadKind::Hourly { hours } => {
                let hours = hours.iter().map(|h| (h[0], h[1])).collect();
                b.add_load(HourlyLoad::new(hours)?);
            }
        }
    }

    for node in &project.nodes {
        match node.kind {
            NodeKind::Fixed => b.add_fixed_node(&node.name, node.pressure, node.temperature),
            NodeKind::Dynamic { alpha } => {
                b.add_dynamic_node(&node.name, node.pressure, node.temperature, alpha)
            }
        };
    }

    for elem in &project.elements {
        let owner = elem.name.as_str();
        let kind = match &elem.kind {
            ElementKindDef::Pipe {
                hydraulics,
                ua,
                environment_temperature,
            } => ElementKind::Pipe(Pipe::new(law(hydraulics)?, *ua, *environment_temperature)?),
            ElementKindDef::CurvePump {
                nominal_flow,
                nominal_head,
                nominal_efficiency,
                motor_efficiency,
                controller,
            } => ElementKind::CurvePump(
                CurvePump::new(
                    *nominal_flow,
                    *nominal_head,
                    *nominal_efficiency,
                    *motor_efficiency,
                    controllers.get(controller, owner)?,
                )?,
            ),
            ElementKindDef::EmpiricalPump {
                nominal_flow,
                nominal_head,
                coefficients,
                controller,
            } => ElementKind::EmpiricalPump(
                EmpiricalPump::new(
                    *nominal_flow,
                    *nominal_head,
                    *coefficients,
                    controllers.get(controller, owner)?,
                )?,
            ),
            ElementKindDef::Valve {
                hydraulics,
                port,
                controller,
            } => ElementKind::Valve(
                Valve::new(
                    hydraulics.nominal_flow,
                    hydraulics.nominal_dp,
                    hydraulics.exponent,
                    *port,
                    controllers.get(controller, owner)?,
                )?,
            ),
            ElementKindDef::Coil {
                hydraulics,
                nominal_capacity,
                load,
            } => ElementKind::Coil(
                Coil::new(law(hydraulics)?, *nominal_capacity, loads.get(load, owner)?)?,
            ),
            ElementKindDef::LoadCoil { coefficients, load } => {
                ElementKind::LoadCoil(LoadCoil::new(*coefficients, loads.get(load, owner)?)?)
            }
            ElementKindDef::HeatSink {
                hydraulics,
                nominal_dt,
                controller,
            } => ElementKind::HeatSink(HeatSink::new(
                law(hydraulics)?,
                *nominal_dt,
                controllers.get(controller, owner)?,
            )?),
            ElementKindDef::ChillerSide { hydraulics } => {
                ElementKind::ChillerSide(PlantSide::chiller_barrel(law(hydraulics)?))
            }
            ElementKindDef::ExchangerSide { hydraulics } => {
                ElementKind::ExchangerSide(PlantSide::exchanger(law(hydraulics)?))
            }
            ElementKindDef::CurveTower {
                hydraulics,
                static_head,
                design_wetbulb,
                design_approach,
                design_range,
                fan_off_flow,
                design_fan_power,
                controller,
            } => ElementKind::CurveTower(CurveTower {
                hydraulics: TowerHydraulics {
                    friction: law(hydraulics)?,
                    static_head: *static_head,
                },
                design_wetbulb: *design_wetbulb,
                design_approach: *design_approach,
                design_range: *design_range,
                fan_off_flow: *fan_off_flow,
                design_fan_power: *design_fan_power,
                controller: controllers.get(controller, owner)?,
            }),
            ElementKindDef::MerkelTower {
                hydraulics,
                static_head,
                nominal_airflow,
                c1,
                c2,
                design_fan_power,
                controller,
            } => ElementKind::MerkelTower(MerkelTower {
                hydraulics: TowerHydraulics {
                    friction: law(hydraulics)?,
                    static_head: *static_head,
                },
                nominal_airflow: *nominal_airflow,
                c1: *c1,
                c2: *c2,
                design_fan_power: *design_fan_power,
                controller: controllers.get(controller, owner)?,
            }),
            ElementKindDef::FixedFlow { flow, heat_gain } => {
                ElementKind::FixedFlow(FixedFlow::new(*flow, *heat_gain)?)
            }
        };
        b.add_element(
            &elem.name,
            elem.inlet.as_str(),
            elem.outlet.as_str(),
            kind,
            elem.volume,
        );
    }

    for plant in &project.plants {
        let owner = plant.name.as_str();
        let kind = match &plant.kind {
            PlantKindDef::CurveChiller {
                evaporator,
                condenser,
                nominal_tons,
                nominal_kw_per_ton,
                cap_ft,
                eir_ft,
                eir_fplr,
                controller,
            } => PlantKind::CurveChiller(
                CurveChiller::new(
                    elements.get(evaporator, owner)?,
                    elements.get(condenser, owner)?,
                    *nominal_tons,
                    *nominal_kw_per_ton,
                    curve(cap_ft, owner)?,
                    curve(eir_ft, owner)?,
                    curve(eir_fplr, owner)?,
                    controllers.get(controller, owner)?,
                )?,
            ),
            PlantKindDef::ParametricChiller {
                evaporator,
                condenser,
                nominal_capacity,
                c1,
                c2,
                c3,
                controller,
            } => PlantKind::ParametricChiller(ParametricChiller::new(
                elements.get(evaporator, owner)?,
                elements.get(condenser, owner)?,
                *nominal_capacity,
                [*c1, *c2, *c3],
                controllers.get(controller, owner)?,
            )?),
            PlantKindDef::NtuExchanger {
                primary,
                secondary,
                nominal_capacity,
                nominal_inlet_dt,
                nominal_outlet_dt,
                arrangement,
            } => PlantKind::NtuExchanger(
                NtuExchanger::new(
                    elements.get(primary, owner)?,
                    elements.get(secondary, owner)?,
                    *nominal_capacity,
                    *nominal_inlet_dt,
                    *nominal_outlet_dt,
                    *arrangement,
                )?,
            ),
            PlantKindDef::UaExchanger {
                cold,
                hot,
                nominal_ua,
                coefficients,
            } => PlantKind::UaExchanger(
                UaExchanger::new(
                    elements.get(cold, owner)?,
                    elements.get(hot, owner)?,
                    *nominal_ua,
                    *coefficients,
                )?,
            ),
        };
        b.add_plant(&plant.name, kind);
    }

    for sensor in &project.sensors {
        let owner = sensor.name.as_str();
        let kind = match &sensor.kind {
            SensorKindDef::NodeTemperature { node } => SensorKind::NodeTemperature {
                node: nodes.get(node, owner)?,
            },
            SensorKindDef::NodePressure { node } => SensorKind::NodePressure {
                node: nodes.get(node, owner)?,
            },
            SensorKindDef::DifferentialPressure { high, low } => {
                SensorKind::DifferentialPressure {
                    high: nodes.get(high, owner)?,
                    low: nodes.get(low, owner)?,
                }
            }
            SensorKindDef::Flow { element } => SensorKind::Flow {
                element: elements.get(element, owner)?,
            },
            SensorKindDef::BtuMeter {
                flow,
                inlet,
                outlet,
                full_scale_tons,
            } => SensorKind::BtuMeter {
                flow: elements.get(flow, owner)?,
                inlet: nodes.get(inlet, owner)?,
                outlet: nodes.get(outlet, owner)?,
                full_scale_tons: *full_scale_tons,
            },
            SensorKindDef::MaxValvePosition { valves } => SensorKind::MaxValvePosition {
                valves: valves
                    .iter()
                    .map(|v| elements.get(v, owner))
                    .collect::<Result<_, _>>()?,
            },
            SensorKindDef::CoilFlowSetpoint {
                coil,
                airside,
                nominal_chwst,
            } => SensorKind::CoilFlowSetpoint {
                coil: elements.get(coil, owner)?,
                airside: *airside,
                nominal_chwst: *nominal_chwst,
            },
        };
        b.add_sensor(&sensor.name, kind);
    }

    for ctrl in &project.controllers {
        let owner = ctrl.name.as_str();
        let kind = match &ctrl.kind {
            ControllerKindDef::Constant { value } => ControllerKind::Constant { value: *value },
            ControllerKindDef::Schedule { values } => ControllerKind::Schedule {
                values: values.clone(),
            },
            ControllerKindDef::LoadBased {
                signal,
                thresholds,
                deadband,
                min_cycle,
            } => ControllerKind::LoadBased(
                LoadBasedController::new(
                    sensors.get(signal, owner)?,
                    thresholds.clone(),
                    *deadband,
                    *min_cycle,
                )?,
            ),
            ControllerKindDef::Pi {
                process,
                setpoint,
                kp,
                ti,
                action,
                out_min,
                out_max,
                integral_limit,
                initial_output,
            } => {
                let mut pi = PiController::with_limits(*kp, *ti, *action, *out_min, *out_max)?;
                if let Some(limit) = integral_limit {
                    pi = pi.with_integral_limit(*limit);
                }
                let setpoint = match setpoint {
                    SetpointDef::Fixed(v) => Setpoint::Fixed(*v),
                    SetpointDef::Sensor(s) => Setpoint::Sensor(sensors.get(s, owner)?),
                };
                ControllerKind::Pi {
                    pi,
                    process: sensors.get(process, owner)?,
                    setpoint,
                    initial_output: *initial_output,
                }
            }
        };
        b.add_controller(&ctrl.name, kind);
    }

    let network = b.build()?;
    let sim = &project.simulation;
    info!(project = %project.name, "project compiled");
    Ok(Compiled {
        network,
        options: SimOptions {
            dt_hours: sim.dt_hours,
            duration_hours: sim.duration_hours,
            record_every: sim.record_every,
            parallel: sim.parallel,
            ..SimOptions::default()
        },
    })
}
