//! End-to-end behavior of the two-phase integrator.

use hn_components::{
    Coil, ComponentError, ConstantLoad, CurvePump, ElementKind, EvalContext, FixedFlow,
    HourlyLoad, Load, ParametricChiller, Pipe, PlantKind, PlantSide, PowerLaw,
};
use hn_controls::{ControllerKind, SensorKind};
use hn_core::{CtrlId, Id, NodeId};
use hn_sim::{
    Integrator, NetworkBuilder, SimError, SimOptions, StepOptions, compute_next_states_in_order,
    run_sim,
};

fn fixed_flow(q: f64) -> ElementKind {
    ElementKind::FixedFlow(FixedFlow::new(q, 0.0).unwrap())
}

#[test]
fn pressure_relaxes_linearly_under_constant_imbalance() {
    let mut b = NetworkBuilder::new();
    b.add_fixed_node("Source", 0.0, 60.0);
    b.add_fixed_node("Sink", 0.0, 60.0);
    let n = b.add_dynamic_node("N", 5.0, 60.0, 2.0);
    b.add_element("In", "Source", "N", fixed_flow(10.0), None);
    b.add_element("Out", "N", "Sink", fixed_flow(4.0), None);
    let mut net = b.build().unwrap();

    let dt = 0.01;
    let integrator = Integrator::new(StepOptions {
        dt_hours: dt,
        parallel: false,
    })
    .unwrap();
    for _ in 0..50 {
        integrator.step(&mut net).unwrap();
    }
    let expected = 5.0 + 50.0 * dt * 2.0 * 6.0;
    assert!((net.node(n).pressure - expected).abs() < 1e-9);
    assert!((net.time_hours() - 0.5).abs() < 1e-12);
}

#[test]
fn single_node_settles_to_inlet_temperature() {
    let mut b = NetworkBuilder::new();
    b.add_fixed_node("Source", 0.0, 60.0);
    b.add_fixed_node("Sink", 0.0, 45.0);
    let n = b.add_dynamic_node("N", 3.0, 80.0, 1.0);
    b.add_element("In", "Source", "N", fixed_flow(10.0), None);
    b.add_element("Out", "N", "Sink", fixed_flow(10.0), None);
    let mut net = b.build().unwrap();

    let opts = SimOptions {
        dt_hours: 0.001,
        duration_hours: 2.0,
        record_every: 500,
        ..SimOptions::default()
    };
    let frame = run_sim(&mut net, &opts).unwrap();

    let state = net.node(n);
    assert!((state.temperature - 60.0).abs() < 1e-9, "T = {}", state.temperature);
    // Balanced flows leave pressure where it started.
    assert_eq!(state.pressure, 3.0);

    let temps = frame.series("N", "Temperature").unwrap();
    assert_eq!(temps.len(), 5);
    assert_eq!(temps[0], 80.0);
    assert!(temps.windows(2).all(|w| w[1] <= w[0]));
}

#[test]
fn compute_phase_is_read_only() {
    let mut b = NetworkBuilder::new();
    b.add_fixed_node("Source", 20.0, 60.0);
    let a = b.add_dynamic_node("A", 10.0, 50.0, 1.0);
    let c = b.add_dynamic_node("C", 0.0, 40.0, 1.0);
    b.add_element(
        "P1",
        "Source",
        "A",
        ElementKind::Pipe(Pipe::adiabatic(PowerLaw::new(100.0, 10.0, 2.0).unwrap())),
        None,
    );
    b.add_element(
        "P2",
        "A",
        "C",
        ElementKind::Pipe(Pipe::adiabatic(PowerLaw::new(100.0, 10.0, 2.0).unwrap())),
        None,
    );
    let net = b.build().unwrap();

    let order = [a, c];
    let first = compute_next_states_in_order(&net, &order, 0.01).unwrap();
    let second = compute_next_states_in_order(&net, &order, 0.01).unwrap();
    assert_eq!(first, second);
    assert_eq!(net.node(a).pressure, 10.0);

    let p1 = net.element_id("P1").unwrap();
    let elem = net.element(p1);
    assert_eq!(elem.flow(&net).unwrap(), elem.flow(&net).unwrap());
    assert_eq!(elem.heat_gain(&net).unwrap(), elem.heat_gain(&net).unwrap());
}

#[test]
fn parallel_step_matches_serial() {
    let build = || {
        let mut b = NetworkBuilder::new();
        b.add_fixed_node("Source", 40.0, 44.0);
        b.add_fixed_node("Sink", 0.0, 44.0);
        for i in 0..6 {
            b.add_dynamic_node(format!("N{i}"), 30.0 - 4.0 * i as f64, 50.0 + i as f64, 0.5);
        }
        let law = PowerLaw::new(80.0, 5.0, 1.85).unwrap();
        let mut prev = "Source".to_string();
        for i in 0..6 {
            let next = format!("N{i}");
            let pipe = Pipe::new(law.clone(), 50.0, 75.0).unwrap();
            b.add_element(
                format!("P{i}"),
                prev.as_str(),
                next.as_str(),
                ElementKind::Pipe(pipe),
                None,
            );
            prev = next;
        }
        let last = Pipe::adiabatic(law);
        b.add_element("Last", prev.as_str(), "Sink", ElementKind::Pipe(last), None);
        b.build().unwrap()
    };
    let mut serial = build();
    let mut parallel = build();
    let s = Integrator::new(StepOptions {
        dt_hours: 0.001,
        parallel: false,
    })
    .unwrap();
    let p = Integrator::new(StepOptions {
        dt_hours: 0.001,
        parallel: true,
    })
    .unwrap();
    for _ in 0..200 {
        s.step(&mut serial).unwrap();
        p.step(&mut parallel).unwrap();
    }
    assert_eq!(serial.node_states(), parallel.node_states());
}

/// Tank → pump → A → coil → B → pipe → tank.
fn pumped_coil_loop(load_btuh: f64) -> hn_sim::Network {
    let mut b = NetworkBuilder::new();
    b.add_fixed_node("Tank", 0.0, 44.0);
    b.add_dynamic_node("A", 50.0, 44.0, 10.0);
    b.add_dynamic_node("B", 25.0, 44.0, 10.0);
    let speed = b.add_controller("Speed", ControllerKind::Constant { value: 1.0 });
    let load = b.add_load(ConstantLoad {
        sensible: load_btuh,
        latent: 0.0,
    });
    let pump = CurvePump::new(100.0, 50.0, 0.7, 0.9, speed).unwrap();
    b.add_element("Pump", "Tank", "A", ElementKind::CurvePump(pump), None);
    let coil = Coil::new(PowerLaw::new(100.0, 25.0, 2.0).unwrap(), 600_000.0, load).unwrap();
    b.add_element("Coil", "A", "B", ElementKind::Coil(coil), None);
    let pipe = Pipe::adiabatic(PowerLaw::new(100.0, 25.0, 2.0).unwrap());
    b.add_element("Return", "B", "Tank", ElementKind::Pipe(pipe), None);
    b.add_sensor("Coil Flow", SensorKind::Flow { element: Id::from_index(1) });
    b.build().unwrap()
}

#[test]
fn pumped_loop_reaches_mass_and_energy_balance() {
    let mut net = pumped_coil_loop(300_000.0);
    let opts = SimOptions {
        dt_hours: 0.001,
        duration_hours: 5.0,
        record_every: 1000,
        ..SimOptions::default()
    };
    let frame = run_sim(&mut net, &opts).unwrap();
    assert_eq!(frame.len(), 6);

    let flow = |name: &str| {
        let id = net.element_id(name).unwrap();
        net.element(id).flow(&net).unwrap()
    };
    let (q_pump, q_coil, q_ret) = (flow("Pump"), flow("Coil"), flow("Return"));
    assert!(q_pump > 50.0 && q_pump < 150.0, "pump flow {q_pump}");
    assert!((q_pump - q_coil).abs() < 1e-3);
    assert!((q_coil - q_ret).abs() < 1e-3);

    let rate = net.fluid().capacity_rate_per_gpm();
    let a = net.node(net.node_id("A").unwrap());
    let b = net.node(net.node_id("B").unwrap());
    let pump_id = net.element_id("Pump").unwrap();
    let pump_heat = net.element(pump_id).heat_gain(&net).unwrap();
    assert!((a.temperature - (44.0 + pump_heat / (rate * q_pump))).abs() < 1e-6);
    assert!((b.temperature - a.temperature - 300_000.0 / (rate * q_coil)).abs() < 1e-6);

    let sensed = net.read_sensor(Id::from_index(0)).unwrap();
    assert_eq!(sensed, q_coil);
    assert!(net.total_electric_power().unwrap() > 0.0);
}

#[test]
fn report_columns_are_fixed_and_ordered() {
    let mut net = pumped_coil_loop(100_000.0);
    let opts = SimOptions {
        dt_hours: 0.01,
        duration_hours: 0.05,
        record_every: 2,
        ..SimOptions::default()
    };
    let frame = run_sim(&mut net, &opts).unwrap();
    // t = 0, 0.02, 0.04 and the final 0.05.
    assert_eq!(frame.len(), 4);
    assert!((frame.times[3] - 0.05).abs() < 1e-12);
    assert_eq!(frame.columns[0].object, "Tank");
    assert_eq!(frame.columns[0].name, "Pressure");
    assert!(frame.column_index("Pump", "Flow").is_some());
    assert!(frame.column_index("Speed", "Output").is_some());
    assert!(frame.rows.iter().all(|r| r.len() == frame.columns.len()));
}

#[test]
fn providers_advance_after_commit() {
    let mut b = NetworkBuilder::new();
    b.add_fixed_node("Source", 0.0, 44.0);
    b.add_dynamic_node("N", 0.0, 44.0, 1.0);
    b.add_fixed_node("Sink", 0.0, 44.0);
    let load = b.add_load(HourlyLoad::new(vec![(1000.0, 0.0), (5000.0, 0.0)]).unwrap());
    let coil = Coil::new(PowerLaw::new(10.0, 10.0, 2.0).unwrap(), 10_000.0, load).unwrap();
    b.add_element("Coil", "Source", "N", ElementKind::Coil(coil), None);
    b.add_element("Out", "N", "Sink", fixed_flow(0.0), None);
    let mut net = b.build().unwrap();

    let integrator = Integrator::new(StepOptions {
        dt_hours: 0.5,
        parallel: false,
    })
    .unwrap();
    assert_eq!(net.load(load).sensible_load(), 1000.0);
    integrator.step(&mut net).unwrap();
    assert_eq!(net.load(load).sensible_load(), 1000.0);
    integrator.step(&mut net).unwrap();
    assert_eq!(net.load(load).sensible_load(), 5000.0);
}

#[test]
fn schedule_controller_steps_on_the_hour() {
    let mut b = NetworkBuilder::new();
    b.add_fixed_node("Source", 0.0, 44.0);
    b.add_dynamic_node("N", 0.0, 44.0, 1.0);
    b.add_element("In", "Source", "N", fixed_flow(0.0), None);
    let ctrl = b.add_controller(
        "Occupancy",
        ControllerKind::Schedule {
            values: vec![0.2, 0.9],
        },
    );
    let mut net = b.build().unwrap();
    let integrator = Integrator::new(StepOptions {
        dt_hours: 0.25,
        parallel: false,
    })
    .unwrap();
    for _ in 0..3 {
        integrator.step(&mut net).unwrap();
    }
    assert_eq!(net.controller_output(ctrl), 0.2);
    integrator.step(&mut net).unwrap();
    assert_eq!(net.controller_output(ctrl), 0.9);
}

#[test]
fn dynamic_node_without_inlet_is_rejected() {
    let mut b = NetworkBuilder::new();
    b.add_dynamic_node("Dead End", 0.0, 50.0, 1.0);
    b.add_fixed_node("Sink", 0.0, 50.0);
    b.add_element("Out", "Dead End", "Sink", fixed_flow(1.0), None);
    assert!(matches!(b.build(), Err(SimError::InvalidNetwork { .. })));
}

#[test]
fn dangling_controller_is_rejected() {
    let mut b = NetworkBuilder::new();
    b.add_fixed_node("A", 0.0, 50.0);
    b.add_dynamic_node("B", 0.0, 50.0, 1.0);
    let pump = CurvePump::new(100.0, 50.0, 0.7, 0.9, CtrlId::from_index(3)).unwrap();
    b.add_element("Pump", "A", "B", ElementKind::CurvePump(pump), None);
    assert!(matches!(b.build(), Err(SimError::InvalidReference { .. })));
}

#[test]
fn unresolved_node_name_is_rejected() {
    let mut b = NetworkBuilder::new();
    b.add_fixed_node("A", 0.0, 50.0);
    b.add_element("Pipe", "A", "Nowhere", fixed_flow(1.0), None);
    assert!(matches!(b.build(), Err(SimError::Graph(_))));
}

#[test]
fn unlinked_chiller_side_is_rejected() {
    let mut b = NetworkBuilder::new();
    b.add_fixed_node("A", 0.0, 50.0);
    b.add_dynamic_node("B", 0.0, 50.0, 1.0);
    let law = PowerLaw::new(100.0, 10.0, 2.0).unwrap();
    let side = PlantSide::chiller_barrel(law);
    b.add_element("Evap", "A", "B", ElementKind::ChillerSide(side), None);
    assert!(matches!(
        b.build(),
        Err(SimError::Component(ComponentError::MissingLink { .. }))
    ));
}

#[test]
fn chiller_plant_links_through_builder() {
    let mut b = NetworkBuilder::new();
    b.add_fixed_node("CHWR", 0.0, 54.0);
    b.add_dynamic_node("CHWS", 0.0, 54.0, 1.0);
    b.add_fixed_node("CWS", 0.0, 85.0);
    b.add_dynamic_node("CWR", 0.0, 85.0, 1.0);
    let on = b.add_controller("Enable", ControllerKind::Constant { value: 1.0 });
    let law = PowerLaw::new(100.0, 10.0, 2.0).unwrap();
    let evap = b.add_element(
        "Evap",
        "CHWR",
        "CHWS",
        ElementKind::ChillerSide(PlantSide::chiller_barrel(law.clone())),
        None,
    );
    let cond = b.add_element(
        "Cond",
        "CWS",
        "CWR",
        ElementKind::ChillerSide(PlantSide::chiller_barrel(law)),
        None,
    );
    let chiller = ParametricChiller::new(evap, cond, 1_200_000.0, [0.1, 0.5, 0.2], on).unwrap();
    b.add_plant("Chiller", PlantKind::ParametricChiller(chiller));
    let net = b.build().unwrap();
    assert_eq!(net.plants().len(), 1);
    assert_eq!(net.node_kind(NodeId::from_index(0)), hn_sim::NodeKind::Fixed);
}
