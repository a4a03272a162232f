//! Project validation: names, references and parameter sanity.
//!
//! Everything that can be checked without building the network is checked
//! here, so a validated project only fails to compile on physics-level
//! parameter errors reported by the component constructors.

use std::collections::HashSet;

use crate::schema::{
    ControllerKindDef, ElementKindDef, NodeKind, PlantKindDef, Project, SensorKindDef, SetpointDef,
    WeatherDef,
};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Missing reference: {name} in {context}")]
    MissingReference { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

type ValidationResult = Result<(), ValidationError>;

fn unique<'a>(
    names: impl Iterator<Item = &'a String>,
    context: &str,
) -> Result<HashSet<&'a str>, ValidationError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: name.clone(),
                context: context.to_string(),
            });
        }
    }
    Ok(seen)
}

fn exists(set: &HashSet<&str>, name: &str, context: impl FnOnce() -> String) -> ValidationResult {
    if set.contains(name) {
        Ok(())
    } else {
        Err(ValidationError::MissingReference {
            name: name.to_string(),
            context: context(),
        })
    }
}

fn invalid(field: String, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: impl FnOnce() -> String, value: f64) -> ValidationResult {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field(), value, "must be positive"))
    }
}

fn non_negative(field: impl FnOnce() -> String, value: f64) -> ValidationResult {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field(), value, "must be non-negative"))
    }
}

fn unit_interval(field: impl FnOnce() -> String, value: f64) -> ValidationResult {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field(), value, "must lie in [0, 1]"))
    }
}

fn finite(field: impl FnOnce() -> String, value: f64) -> ValidationResult {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field(), value, "must be finite"))
    }
}

struct Names<'a> {
    nodes: HashSet<&'a str>,
    elements: HashSet<&'a str>,
    loads: HashSet<&'a str>,
    curves: HashSet<&'a str>,
    sensors: HashSet<&'a str>,
    controllers: HashSet<&'a str>,
}

pub fn validate_project(project: &Project) -> ValidationResult {
    if project.version == 0 || project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    let names = Names {
        nodes: unique(project.nodes.iter().map(|n| &n.name), "nodes")?,
        elements: unique(project.elements.iter().map(|e| &e.name), "elements")?,
        loads: unique(project.loads.iter().map(|l| &l.name), "loads")?,
        curves: unique(project.curves.iter().map(|c| &c.name), "curves")?,
        sensors: unique(project.sensors.iter().map(|s| &s.name), "sensors")?,
        controllers: unique(project.controllers.iter().map(|c| &c.name), "controllers")?,
    };
    unique(project.plants.iter().map(|p| &p.name), "plants")?;

    positive(|| "fluid.density".into(), project.fluid.density)?;
    positive(|| "fluid.specific_heat".into(), project.fluid.specific_heat)?;
    validate_weather(&project.weather)?;
    validate_simulation(project)?;

    for node in &project.nodes {
        finite(|| format!("node '{}' pressure", node.name), node.pressure)?;
        finite(|| format!("node '{}' temperature", node.name), node.temperature)?;
        if let NodeKind::Dynamic { alpha } = node.kind {
            non_negative(|| format!("node '{}' alpha", node.name), alpha)?;
        }
    }

    for elem in &project.elements {
        validate_element(elem, &names)?;
    }
    for plant in &project.plants {
        validate_plant(&plant.name, &plant.kind, &names)?;
    }
    for sensor in &project.sensors {
        validate_sensor(&sensor.name, &sensor.kind, &names)?;
    }
    for ctrl in &project.controllers {
        validate_controller(&ctrl.name, &ctrl.kind, &names)?;
    }
    Ok(())
}

fn validate_weather(weather: &WeatherDef) -> ValidationResult {
    match weather {
        WeatherDef::Constant {
            drybulb,
            wetbulb,
            pressure,
        } => {
            positive(|| "weather.pressure".into(), *pressure)?;
            if wetbulb > drybulb {
                return Err(invalid(
                    "weather.wetbulb".into(),
                    *wetbulb,
                    "must not exceed drybulb",
                ));
            }
        }
        WeatherDef::Hourly { hours, pressure } => {
            positive(|| "weather.pressure".into(), *pressure)?;
            if hours.is_empty() {
                return Err(ValidationError::InvalidValue {
                    field: "weather.hours".into(),
                    value: "[]".into(),
                    reason: "needs at least one hour".into(),
                });
            }
        }
    }
    Ok(())
}

fn validate_simulation(project: &Project) -> ValidationResult {
    let sim = &project.simulation;
    positive(|| "simulation.dt_hours".into(), sim.dt_hours)?;
    non_negative(|| "simulation.duration_hours".into(), sim.duration_hours)?;
    if sim.record_every == 0 {
        return Err(ValidationError::InvalidValue {
            field: "simulation.record_every".into(),
            value: "0".into(),
            reason: "must be positive".into(),
        });
    }
    Ok(())
}

fn validate_element(elem: &crate::schema::ElementDef, names: &Names<'_>) -> ValidationResult {
    let ctx = || format!("element '{}'", elem.name);
    exists(&names.nodes, &elem.inlet, || format!("{} inlet", ctx()))?;
    exists(&names.nodes, &elem.outlet, || format!("{} outlet", ctx()))?;
    if let Some(v) = elem.volume {
        positive(|| format!("{} volume", ctx()), v)?;
    }
    let hydraulics = |h: &crate::schema::HydraulicsDef| -> ValidationResult {
        positive(|| format!("{} nominal_flow", ctx()), h.nominal_flow)?;
        positive(|| format!("{} nominal_dp", ctx()), h.nominal_dp)?;
        positive(|| format!("{} exponent", ctx()), h.exponent)
    };
    let controller =
        |name: &str| exists(&names.controllers, name, || format!("{} controller", ctx()));
    let load = |name: &str| exists(&names.loads, name, || format!("{} load", ctx()));

    match &elem.kind {
        ElementKindDef::Pipe {
            hydraulics: h, ua, ..
        } => {
            hydraulics(h)?;
            non_negative(|| format!("{} ua", ctx()), *ua)?;
        }
        ElementKindDef::CurvePump { controller: c, .. }
        | ElementKindDef::EmpiricalPump { controller: c, .. } => controller(c)?,
        ElementKindDef::Valve {
            hydraulics: h,
            controller: c,
            ..
        } => {
            hydraulics(h)?;
            controller(c)?;
        }
        ElementKindDef::Coil {
            hydraulics: h,
            nominal_capacity,
            load: l,
        } => {
            hydraulics(h)?;
            positive(|| format!("{} nominal_capacity", ctx()), *nominal_capacity)?;
            load(l)?;
        }
        ElementKindDef::LoadCoil { load: l, .. } => load(l)?,
        ElementKindDef::HeatSink {
            hydraulics: h,
            nominal_dt,
            controller: c,
        } => {
            hydraulics(h)?;
            non_negative(|| format!("{} nominal_dt", ctx()), *nominal_dt)?;
            controller(c)?;
        }
        ElementKindDef::ChillerSide { hydraulics: h }
        | ElementKindDef::ExchangerSide { hydraulics: h } => hydraulics(h)?,
        ElementKindDef::CurveTower {
            hydraulics: h,
            static_head,
            design_range,
            fan_off_flow,
            design_fan_power,
            controller: c,
            ..
        } => {
            hydraulics(h)?;
            non_negative(|| format!("{} static_head", ctx()), *static_head)?;
            positive(|| format!("{} design_range", ctx()), *design_range)?;
            unit_interval(|| format!("{} fan_off_flow", ctx()), *fan_off_flow)?;
            non_negative(|| format!("{} design_fan_power", ctx()), *design_fan_power)?;
            controller(c)?;
        }
        ElementKindDef::MerkelTower {
            hydraulics: h,
            static_head,
            nominal_airflow,
            design_fan_power,
            controller: c,
            ..
        } => {
            hydraulics(h)?;
            non_negative(|| format!("{} static_head", ctx()), *static_head)?;
            positive(|| format!("{} nominal_airflow", ctx()), *nominal_airflow)?;
            non_negative(|| format!("{} design_fan_power", ctx()), *design_fan_power)?;
            controller(c)?;
        }
        ElementKindDef::FixedFlow { .. } => {}
    }
    Ok(())
}

fn validate_plant(name: &str, kind: &PlantKindDef, names: &Names<'_>) -> ValidationResult {
    let ctx = || format!("plant '{name}'");
    let element = |e: &str, role: &str| exists(&names.elements, e, || format!("{} {role}", ctx()));
    let curve = |c: &str, role: &str| exists(&names.curves, c, || format!("{} {role}", ctx()));
    let controller = |c: &str| exists(&names.controllers, c, || format!("{} controller", ctx()));
    match kind {
        PlantKindDef::CurveChiller {
            evaporator,
            condenser,
            nominal_tons,
            nominal_kw_per_ton,
            cap_ft,
            eir_ft,
            eir_fplr,
            controller: c,
        } => {
            element(evaporator, "evaporator")?;
            element(condenser, "condenser")?;
            positive(|| format!("{} nominal_tons", ctx()), *nominal_tons)?;
            positive(|| format!("{} nominal_kw_per_ton", ctx()), *nominal_kw_per_ton)?;
            curve(cap_ft, "cap_ft")?;
            curve(eir_ft, "eir_ft")?;
            curve(eir_fplr, "eir_fplr")?;
            controller(c)?;
        }
        PlantKindDef::ParametricChiller {
            evaporator,
            condenser,
            nominal_capacity,
            controller: c,
            ..
        } => {
            element(evaporator, "evaporator")?;
            element(condenser, "condenser")?;
            positive(|| format!("{} nominal_capacity", ctx()), *nominal_capacity)?;
            controller(c)?;
        }
        PlantKindDef::NtuExchanger {
            primary, secondary, ..
        } => {
            element(primary, "primary")?;
            element(secondary, "secondary")?;
        }
        PlantKindDef::UaExchanger { cold, hot, .. } => {
            element(cold, "cold side")?;
            element(hot, "hot side")?;
        }
    }
    Ok(())
}

fn validate_sensor(name: &str, kind: &SensorKindDef, names: &Names<'_>) -> ValidationResult {
    let ctx = || format!("sensor '{name}'");
    let node = |n: &str| exists(&names.nodes, n, ctx);
    let element = |e: &str| exists(&names.elements, e, ctx);
    match kind {
        SensorKindDef::NodeTemperature { node: n } | SensorKindDef::NodePressure { node: n } => {
            node(n)?
        }
        SensorKindDef::DifferentialPressure { high, low } => {
            node(high)?;
            node(low)?;
        }
        SensorKindDef::Flow { element: e } => element(e)?,
        SensorKindDef::BtuMeter {
            flow,
            inlet,
            outlet,
            full_scale_tons,
        } => {
            element(flow)?;
            node(inlet)?;
            node(outlet)?;
            positive(|| format!("{} full_scale_tons", ctx()), *full_scale_tons)?;
        }
        SensorKindDef::MaxValvePosition { valves } => {
            for v in valves {
                element(v)?;
            }
        }
        SensorKindDef::CoilFlowSetpoint { coil, .. } => element(coil)?,
    }
    Ok(())
}

fn validate_controller(
    name: &str,
    kind: &ControllerKindDef,
    names: &Names<'_>,
) -> ValidationResult {
    let ctx = || format!("controller '{name}'");
    let sensor = |s: &str| exists(&names.sensors, s, ctx);
    match kind {
        ControllerKindDef::Constant { value } => {
            unit_interval(|| format!("{} value", ctx()), *value)?;
        }
        ControllerKindDef::Schedule { values } => {
            if values.is_empty() {
                return Err(ValidationError::InvalidValue {
                    field: format!("{} values", ctx()),
                    value: "[]".into(),
                    reason: "needs at least one value".into(),
                });
            }
            for v in values {
                unit_interval(|| format!("{} values", ctx()), *v)?;
            }
        }
        ControllerKindDef::LoadBased {
            signal,
            thresholds,
            deadband,
            min_cycle,
        } => {
            sensor(signal)?;
            if thresholds.is_empty() || thresholds.windows(2).any(|w| w[0] >= w[1]) {
                return Err(ValidationError::InvalidValue {
                    field: format!("{} thresholds", ctx()),
                    value: format!("{thresholds:?}"),
                    reason: "must be non-empty and strictly increasing".into(),
                });
            }
            non_negative(|| format!("{} deadband", ctx()), *deadband)?;
            non_negative(|| format!("{} min_cycle", ctx()), *min_cycle)?;
        }
        ControllerKindDef::Pi {
            process,
            setpoint,
            ti,
            initial_output,
            ..
        } => {
            sensor(process)?;
            if let SetpointDef::Sensor(s) = setpoint {
                sensor(s)?;
            }
            positive(|| format!("{} ti", ctx()), *ti)?;
            unit_interval(|| format!("{} initial_output", ctx()), *initial_output)?;
        }
    }
    Ok(())
}
