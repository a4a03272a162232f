//! Sensors and controllers evaluated against a hand-built network view.

use hn_components::{
    Coil, ConstantLoad, ConstantWeather, Element, ElementKind, FixedFlow, Load,
    NodeState, Plant, PowerLaw, SideLink, Valve, ValvePort, Weather,
};
use hn_controls::{
    AirsideControl, ControlAction, ControlError, Controller, ControllerKind, LoadBasedController,
    PiController, Sensor, SensorKind, Setpoint,
};
use hn_core::{CtrlId, ElemId, Id, LoadId, NodeId, PlantId, Real, SensorId};
use hn_fluids::psychro::STANDARD_PRESSURE_PSIA;
use hn_fluids::{FluidModel, Water};

struct View {
    fluid: Water,
    nodes: Vec<NodeState>,
    elements: Vec<Element>,
    plants: Vec<Plant>,
    outputs: Vec<Real>,
    weather: ConstantWeather,
    loads: Vec<ConstantLoad>,
}

impl View {
    fn new() -> Self {
        Self {
            fluid: Water::default(),
            nodes: Vec::new(),
            elements: Vec::new(),
            plants: Vec::new(),
            outputs: Vec::new(),
            weather: ConstantWeather::new(95.0, 78.0, STANDARD_PRESSURE_PSIA).unwrap(),
            loads: Vec::new(),
        }
    }

    fn node(&mut self, pressure: Real, temperature: Real) -> NodeId {
        self.nodes.push(NodeState {
            pressure,
            temperature,
        });
        Id::from_usize(self.nodes.len() - 1)
    }

    fn output(&mut self, value: Real) -> CtrlId {
        self.outputs.push(value);
        Id::from_usize(self.outputs.len() - 1)
    }

    fn element(&mut self, inlet: NodeId, outlet: NodeId, kind: ElementKind) -> ElemId {
        let id = Id::from_usize(self.elements.len());
        let elem = Element::new(id, format!("E{}", id.index()), inlet, outlet, kind, None).unwrap();
        self.elements.push(elem);
        id
    }
}

impl hn_components::EvalContext for View {
    fn fluid(&self) -> &dyn FluidModel {
        &self.fluid
    }
    fn node(&self, id: NodeId) -> NodeState {
        self.nodes[id.idx()]
    }
    fn element(&self, id: ElemId) -> &Element {
        &self.elements[id.idx()]
    }
    fn side_link(&self, _id: ElemId) -> Option<SideLink> {
        None
    }
    fn plant(&self, id: PlantId) -> &Plant {
        &self.plants[id.idx()]
    }
    fn controller_output(&self, id: CtrlId) -> Real {
        self.outputs[id.idx()]
    }
    fn weather(&self) -> &dyn Weather {
        &self.weather
    }
    fn load(&self, id: LoadId) -> &dyn Load {
        &self.loads[id.idx()]
    }
}

fn sensor(index: usize, kind: SensorKind) -> Sensor {
    Sensor::new(SensorId::from_usize(index), format!("S{index}"), kind).unwrap()
}

#[test]
fn node_and_differential_pressure_sensors() {
    let mut v = View::new();
    let a = v.node(40.0, 44.0);
    let b = v.node(25.0, 56.0);
    let t = sensor(0, SensorKind::NodeTemperature { node: b });
    let p = sensor(1, SensorKind::NodePressure { node: a });
    let dp = sensor(2, SensorKind::DifferentialPressure { high: a, low: b });
    assert_eq!(t.read(&v).unwrap(), 56.0);
    assert_eq!(p.read(&v).unwrap(), 40.0);
    assert_eq!(dp.read(&v).unwrap(), 15.0);
}

#[test]
fn btu_meter_reports_fraction_of_full_scale() {
    let mut v = View::new();
    let ret = v.node(0.0, 56.0);
    let sup = v.node(0.0, 44.0);
    let flow = v.element(sup, ret, ElementKind::FixedFlow(FixedFlow::new(24.0, 0.0).unwrap()));
    let meter = sensor(
        0,
        SensorKind::BtuMeter {
            flow,
            inlet: ret,
            outlet: sup,
            full_scale_tons: 100.0,
        },
    );
    // 500 · 24 · 12 / 12000 / 100
    assert!((meter.read(&v).unwrap() - 0.12).abs() < 1e-12);

    let bad = Sensor::new(
        SensorId::from_index(1),
        "bad",
        SensorKind::BtuMeter {
            flow,
            inlet: ret,
            outlet: sup,
            full_scale_tons: 0.0,
        },
    );
    assert!(bad.is_err());
}

#[test]
fn max_valve_position_covers_both_ports() {
    let mut v = View::new();
    let a = v.node(10.0, 50.0);
    let b = v.node(0.0, 50.0);
    let c1 = v.output(0.3);
    let c2 = v.output(0.3);
    let va = v.element(
        a,
        b,
        ElementKind::Valve(Valve::new(40.0, 10.0, 2.0, ValvePort::A, c1).unwrap()),
    );
    let vb = v.element(
        a,
        b,
        ElementKind::Valve(Valve::new(40.0, 10.0, 2.0, ValvePort::B, c2).unwrap()),
    );
    let s = sensor(0, SensorKind::MaxValvePosition { valves: vec![va, vb] });
    s.check_references(&v).unwrap();
    assert!((s.read(&v).unwrap() - 0.7).abs() < 1e-12);

    let empty = sensor(1, SensorKind::MaxValvePosition { valves: vec![] });
    assert_eq!(empty.read(&v).unwrap(), 0.0);
}

#[test]
fn max_valve_position_rejects_non_valves() {
    let mut v = View::new();
    let a = v.node(10.0, 50.0);
    let b = v.node(0.0, 50.0);
    let f = v.element(a, b, ElementKind::FixedFlow(FixedFlow::new(1.0, 0.0).unwrap()));
    let s = sensor(0, SensorKind::MaxValvePosition { valves: vec![f] });
    assert!(matches!(
        s.check_references(&v),
        Err(ControlError::InvalidReference { .. })
    ));
}

#[test]
fn coil_flow_setpoint_follows_load_ratio() {
    let mut v = View::new();
    let a = v.node(10.0, 44.0);
    let b = v.node(0.0, 56.0);
    v.loads.push(ConstantLoad {
        sensible: 40_000.0,
        latent: 10_000.0,
    });
    let load = Id::from_index(0);
    let coil = Coil::new(PowerLaw::new(100.0, 10.0, 2.0).unwrap(), 100_000.0, load).unwrap();
    let c = v.element(a, b, ElementKind::Coil(coil));

    let vav = sensor(
        0,
        SensorKind::CoilFlowSetpoint {
            coil: c,
            airside: AirsideControl::Vav,
            nominal_chwst: 44.0,
        },
    );
    vav.check_references(&v).unwrap();
    let expected = 100.0 * (0.629_428 * 0.5 + 0.355_645 * 0.25);
    assert!((vav.read(&v).unwrap() - expected).abs() < 1e-9);

    // Entering water warmer than design CHWST raises the setpoint.
    let cav = sensor(
        1,
        SensorKind::CoilFlowSetpoint {
            coil: c,
            airside: AirsideControl::Cav,
            nominal_chwst: 42.0,
        },
    );
    let expected = 100.0 * (-0.091_549 * 0.5 + 1.101_282_6 * 0.25 - 0.05 * (42.0 - 44.0));
    assert!((cav.read(&v).unwrap() - expected).abs() < 1e-9);
}

#[test]
fn pi_controller_reads_committed_measurement() {
    let mut v = View::new();
    let n = v.node(0.0, 50.0);
    let sensors = vec![sensor(0, SensorKind::NodeTemperature { node: n })];
    let pi = PiController::new(0.1, 1.0, ControlAction::Direct).unwrap();
    let mut c = Controller::new(
        CtrlId::from_index(0),
        "chw valve",
        ControllerKind::Pi {
            pi,
            process: SensorId::from_index(0),
            setpoint: Setpoint::Fixed(44.0),
            initial_output: 0.0,
        },
    )
    .unwrap();

    let next = c.next_state(&v, &sensors, 0.1, 0.1).unwrap();
    // Reading the next state leaves the committed output alone.
    assert_eq!(c.output(), 0.0);
    c.commit(next);
    // e = 6: P = 0.6, I = 0.1 · 0.6
    assert!((c.output() - 0.66).abs() < 1e-12);
}

#[test]
fn pi_setpoint_from_sensor() {
    let mut v = View::new();
    let pv = v.node(0.0, 40.0);
    let sp = v.node(0.0, 45.0);
    let sensors = vec![
        sensor(0, SensorKind::NodeTemperature { node: pv }),
        sensor(1, SensorKind::NodeTemperature { node: sp }),
    ];
    let c = Controller::new(
        CtrlId::from_index(0),
        "reset",
        ControllerKind::Pi {
            pi: PiController::new(0.1, 1.0, ControlAction::Reverse).unwrap(),
            process: SensorId::from_index(0),
            setpoint: Setpoint::Sensor(SensorId::from_index(1)),
            initial_output: 0.0,
        },
    )
    .unwrap();
    assert_eq!(
        c.sensor_refs(),
        vec![SensorId::from_index(0), SensorId::from_index(1)]
    );
    let next = c.next_state(&v, &sensors, 0.1, 0.1).unwrap();
    assert!((next.output() - 0.55).abs() < 1e-12);
}

#[test]
fn load_based_controller_starts_on_and_drops_on_low_signal() {
    let mut v = View::new();
    let n = v.node(0.0, 0.05);
    let sensors = vec![sensor(0, SensorKind::NodeTemperature { node: n })];
    let lb = LoadBasedController::new(SensorId::from_index(0), vec![0.3], 0.02, 0.5).unwrap();
    let mut c = Controller::new(CtrlId::from_index(0), "stage", ControllerKind::LoadBased(lb))
        .unwrap();
    assert_eq!(c.output(), 1.0);
    let next = c.next_state(&v, &sensors, 0.25, 0.25).unwrap();
    c.commit(next);
    assert_eq!(c.output(), 0.0);
}

#[test]
fn missing_sensor_is_reported() {
    let v = View::new();
    let lb = LoadBasedController::new(SensorId::from_index(3), vec![0.3], 0.0, 0.0).unwrap();
    let c = Controller::new(CtrlId::from_index(0), "stage", ControllerKind::LoadBased(lb))
        .unwrap();
    assert!(matches!(
        c.next_state(&v, &[], 0.1, 0.1),
        Err(ControlError::InvalidReference { .. })
    ));
}

#[test]
fn schedule_advances_with_time() {
    let v = View::new();
    let mut c = Controller::new(
        CtrlId::from_index(0),
        "occupancy",
        ControllerKind::Schedule {
            values: vec![0.0, 1.0],
        },
    )
    .unwrap();
    assert_eq!(c.output(), 0.0);
    let next = c.next_state(&v, &[], 1.0, 0.5).unwrap();
    c.commit(next);
    assert_eq!(c.output(), 1.0);
    let next = c.next_state(&v, &[], 2.0, 1.0).unwrap();
    c.commit(next);
    assert_eq!(c.output(), 0.0);
}
