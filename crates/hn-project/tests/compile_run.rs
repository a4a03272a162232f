use hn_components::EvalContext;
use hn_project::{ProjectError, ValidationError, compile, from_yaml_str};
use hn_sim::run_sim;

const CHILLED_WATER: &str = r#"
version: 1
name: Chilled Water Loop
loads:
  - name: Zone
    kind: { type: Constant, sensible: 300000.0 }
nodes:
  - { name: Tank, pressure: 0.0, temperature: 44.0, kind: { type: Fixed } }
  - { name: A, pressure: 50.0, temperature: 44.0, kind: { type: Dynamic, alpha: 10.0 } }
  - { name: B, pressure: 25.0, temperature: 44.0, kind: { type: Dynamic, alpha: 10.0 } }
elements:
  - name: Pump
    inlet: Tank
    outlet: A
    kind:
      type: CurvePump
      nominal_flow: 100.0
      nominal_head: 50.0
      nominal_efficiency: 0.7
      motor_efficiency: 0.9
      controller: Speed
  - name: Coil
    inlet: A
    outlet: B
    kind:
      type: Coil
      nominal_flow: 100.0
      nominal_dp: 25.0
      nominal_capacity: 600000.0
      load: Zone
  - name: Return
    inlet: B
    outlet: Tank
    kind: { type: Pipe, nominal_flow: 100.0, nominal_dp: 25.0 }
sensors:
  - name: Coil Flow
    kind: { type: Flow, element: Coil }
  - name: Coil Btu
    kind: { type: BtuMeter, flow: Coil, inlet: A, outlet: B, full_scale_tons: 50.0 }
controllers:
  - name: Speed
    kind: { type: Constant, value: 1.0 }
simulation:
  dt_hours: 0.001
  duration_hours: 5.0
  record_every: 1000
"#;

#[test]
fn chilled_water_project_compiles_and_runs() {
    let project = from_yaml_str(CHILLED_WATER).unwrap();
    let mut compiled = compile(&project).unwrap();
    assert_eq!(compiled.options.record_every, 1000);
    assert_eq!(compiled.network.node_count(), 3);

    let frame = run_sim(&mut compiled.network, &compiled.options).unwrap();
    assert_eq!(frame.len(), 6);

    let net = &compiled.network;
    let rate = net.fluid().capacity_rate_per_gpm();
    let flow = net.read_sensor(hn_core::Id::from_index(0)).unwrap();
    assert!(flow > 50.0 && flow < 150.0, "coil flow {flow}");

    let a = net.node(net.node_id("A").unwrap());
    let b = net.node(net.node_id("B").unwrap());
    assert!((b.temperature - a.temperature - 300_000.0 / (rate * flow)).abs() < 1e-6);

    // The Btu meter reads the coil duty against its full scale.
    let btu = frame.series("Coil Btu", "Value").unwrap();
    let last = *btu.last().unwrap();
    let expected = 500.0 * flow * (a.temperature - b.temperature) / 12_000.0 / 50.0;
    assert!((last - expected).abs() < 1e-6, "{last} vs {expected}");
    assert!(last < 0.0);
}

#[test]
fn missing_curve_is_reported_by_name() {
    let yaml = format!(
        "{CHILLED_WATER}{}",
        r#"
plants:
  - name: Chiller
    kind:
      type: CurveChiller
      evaporator: Coil
      condenser: Return
      nominal_tons: 100.0
      nominal_kw_per_ton: 0.6
      cap_ft: Missing
      eir_ft: Missing
      eir_fplr: Missing
      controller: Speed
"#
    );
    match from_yaml_str(&yaml) {
        Err(ProjectError::Validation(ValidationError::MissingReference { name, context })) => {
            assert_eq!(name, "Missing");
            assert!(context.contains("Chiller"));
        }
        other => panic!("expected missing curve, got {other:?}"),
    }
}

#[test]
fn component_errors_surface_from_compile() {
    let mut project = from_yaml_str(CHILLED_WATER).unwrap();
    if let hn_project::ElementKindDef::CurvePump {
        nominal_efficiency, ..
    } = &mut project.elements[0].kind
    {
        *nominal_efficiency = -0.7;
    }
    assert!(matches!(
        compile(&project),
        Err(ProjectError::Component(_))
    ));
}

#[test]
fn chiller_on_plain_elements_is_rejected_at_build() {
    let yaml = format!(
        "{CHILLED_WATER}{}",
        r#"
plants:
  - name: Chiller
    kind:
      type: ParametricChiller
      evaporator: Coil
      condenser: Return
      nominal_capacity: 1200000.0
      c1: 0.1
      c2: 0.5
      c3: 0.4
      controller: Speed
"#
    );
    let project = from_yaml_str(&yaml).unwrap();
    assert!(matches!(compile(&project), Err(ProjectError::Sim(_))));
}
