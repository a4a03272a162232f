//! Project schema definitions.
//!
//! Objects refer to one another by name. Names are unique within their
//! section and resolved when the project is compiled.

use hn_components::{Curve, FlowArrangement, ValvePort};
use hn_controls::{AirsideControl, ControlAction};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub fluid: FluidDef,
    #[serde(default)]
    pub weather: WeatherDef,
    #[serde(default)]
    pub loads: Vec<LoadDef>,
    #[serde(default)]
    pub curves: Vec<CurveDef>,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub elements: Vec<ElementDef>,
    #[serde(default)]
    pub plants: Vec<PlantDef>,
    #[serde(default)]
    pub sensors: Vec<SensorDef>,
    #[serde(default)]
    pub controllers: Vec<ControllerDef>,
    #[serde(default)]
    pub simulation: SimulationDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FluidDef {
    /// [lb/ft³]
    pub density: f64,
    /// [Btu/(lb·°F)]
    pub specific_heat: f64,
}

impl Default for FluidDef {
    fn default() -> Self {
        Self {
            density: 62.4,
            specific_heat: 1.0,
        }
    }
}

fn standard_pressure() -> f64 {
    hn_fluids::psychro::STANDARD_PRESSURE_PSIA
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum WeatherDef {
    Constant {
        drybulb: f64,
        wetbulb: f64,
        #[serde(default = "standard_pressure")]
        pressure: f64,
    },
    /// One `[drybulb, wetbulb]` pair per hour, repeated.
    Hourly {
        hours: Vec<[f64; 2]>,
        #[serde(default = "standard_pressure")]
        pressure: f64,
    },
}

impl Default for WeatherDef {
    fn default() -> Self {
        WeatherDef::Constant {
            drybulb: 95.0,
            wetbulb: 78.0,
            pressure: standard_pressure(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadDef {
    pub name: String,
    pub kind: LoadKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum LoadKind {
    Constant {
        sensible: f64,
        #[serde(default)]
        latent: f64,
    },
    /// One `[sensible, latent]` pair per hour, repeated.
    Hourly { hours: Vec<[f64; 2]> },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurveDef {
    pub name: String,
    pub curve: Curve,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDef {
    pub name: String,
    /// Initial pressure [ft].
    pub pressure: f64,
    /// Initial temperature [°F].
    pub temperature: f64,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum NodeKind {
    Fixed,
    Dynamic { alpha: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementDef {
    pub name: String,
    pub inlet: String,
    pub outlet: String,
    /// Internal volume override [ft³].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    pub kind: ElementKindDef,
}

fn default_exponent() -> f64 {
    2.0
}

fn default_environment() -> f64 {
    75.0
}

/// Power-law hydraulics shared by most element kinds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HydraulicsDef {
    /// [GPM]
    pub nominal_flow: f64,
    /// [ft]
    pub nominal_dp: f64,
    #[serde(default = "default_exponent")]
    pub exponent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ElementKindDef {
    Pipe {
        #[serde(flatten)]
        hydraulics: HydraulicsDef,
        /// Conductance to surroundings [Btu/(hr·°F)].
        #[serde(default)]
        ua: f64,
        #[serde(default = "default_environment")]
        environment_temperature: f64,
    },
    CurvePump {
        nominal_flow: f64,
        nominal_head: f64,
        nominal_efficiency: f64,
        motor_efficiency: f64,
        controller: String,
    },
    EmpiricalPump {
        nominal_flow: f64,
        nominal_head: f64,
        coefficients: [f64; 6],
        controller: String,
    },
    Valve {
        #[serde(flatten)]
        hydraulics: HydraulicsDef,
        #[serde(default)]
        port: ValvePort,
        controller: String,
    },
    Coil {
        #[serde(flatten)]
        hydraulics: HydraulicsDef,
        /// [Btu/hr]
        nominal_capacity: f64,
        load: String,
    },
    LoadCoil {
        coefficients: [f64; 4],
        load: String,
    },
    HeatSink {
        #[serde(flatten)]
        hydraulics: HydraulicsDef,
        nominal_dt: f64,
        controller: String,
    },
    ChillerSide {
        #[serde(flatten)]
        hydraulics: HydraulicsDef,
    },
    ExchangerSide {
        #[serde(flatten)]
        hydraulics: HydraulicsDef,
    },
    CurveTower {
        #[serde(flatten)]
        hydraulics: HydraulicsDef,
        static_head: f64,
        design_wetbulb: f64,
        design_approach: f64,
        design_range: f64,
        #[serde(default)]
        fan_off_flow: f64,
        design_fan_power: f64,
        controller: String,
    },
    MerkelTower {
        #[serde(flatten)]
        hydraulics: HydraulicsDef,
        static_head: f64,
        /// [CFM]
        nominal_airflow: f64,
        c1: f64,
        c2: f64,
        design_fan_power: f64,
        controller: String,
    },
    FixedFlow {
        flow: f64,
        #[serde(default)]
        heat_gain: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantDef {
    pub name: String,
    pub kind: PlantKindDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum PlantKindDef {
    CurveChiller {
        evaporator: String,
        condenser: String,
        nominal_tons: f64,
        nominal_kw_per_ton: f64,
        cap_ft: String,
        eir_ft: String,
        eir_fplr: String,
        controller: String,
    },
    ParametricChiller {
        evaporator: String,
        condenser: String,
        /// [Btu/hr]
        nominal_capacity: f64,
        c1: f64,
        c2: f64,
        c3: f64,
        controller: String,
    },
    NtuExchanger {
        primary: String,
        secondary: String,
        nominal_capacity: f64,
        nominal_inlet_dt: f64,
        nominal_outlet_dt: f64,
        #[serde(default)]
        arrangement: FlowArrangement,
    },
    UaExchanger {
        cold: String,
        hot: String,
        nominal_ua: f64,
        coefficients: [f64; 6],
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorDef {
    pub name: String,
    pub kind: SensorKindDef,
}

fn default_full_scale() -> f64 {
    100.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum SensorKindDef {
    NodeTemperature {
        node: String,
    },
    NodePressure {
        node: String,
    },
    DifferentialPressure {
        high: String,
        low: String,
    },
    Flow {
        element: String,
    },
    BtuMeter {
        flow: String,
        inlet: String,
        outlet: String,
        #[serde(default = "default_full_scale")]
        full_scale_tons: f64,
    },
    MaxValvePosition {
        valves: Vec<String>,
    },
    CoilFlowSetpoint {
        coil: String,
        airside: AirsideControl,
        nominal_chwst: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControllerDef {
    pub name: String,
    pub kind: ControllerKindDef,
}

/// A fixed number, or the name of a sensor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SetpointDef {
    Fixed(f64),
    Sensor(String),
}

fn default_out_max() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ControllerKindDef {
    Constant {
        value: f64,
    },
    Schedule {
        values: Vec<f64>,
    },
    LoadBased {
        signal: String,
        thresholds: Vec<f64>,
        #[serde(default)]
        deadband: f64,
        /// [hr]
        #[serde(default)]
        min_cycle: f64,
    },
    Pi {
        process: String,
        setpoint: SetpointDef,
        kp: f64,
        /// [hr]
        ti: f64,
        #[serde(default)]
        action: ControlAction,
        #[serde(default)]
        out_min: f64,
        #[serde(default = "default_out_max")]
        out_max: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        integral_limit: Option<f64>,
        #[serde(default)]
        initial_output: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationDef {
    pub dt_hours: f64,
    pub duration_hours: f64,
    pub record_every: usize,
    #[serde(default)]
    pub parallel: bool,
}

impl Default for SimulationDef {
    fn default() -> Self {
        Self {
            dt_hours: 0.001,
            duration_hours: 24.0,
            record_every: 1000,
            parallel: false,
        }
    }
}
