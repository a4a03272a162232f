use hn_project::schema::*;
use hn_project::{load, load_json, load_yaml, save_json, save_yaml, validate_project};

fn small_project() -> Project {
    Project {
        version: 1,
        name: "Small Loop".to_string(),
        fluid: FluidDef::default(),
        weather: WeatherDef::Hourly {
            hours: vec![[90.0, 75.0], [95.0, 78.0]],
            pressure: 14.696,
        },
        loads: vec![LoadDef {
            name: "Zone".to_string(),
            kind: LoadKind::Constant {
                sensible: 200_000.0,
                latent: 20_000.0,
            },
        }],
        curves: vec![],
        nodes: vec![
            NodeDef {
                name: "Tank".to_string(),
                pressure: 0.0,
                temperature: 44.0,
                kind: NodeKind::Fixed,
            },
            NodeDef {
                name: "Supply".to_string(),
                pressure: 40.0,
                temperature: 44.0,
                kind: NodeKind::Dynamic { alpha: 10.0 },
            },
        ],
        elements: vec![
            ElementDef {
                name: "Pump".to_string(),
                inlet: "Tank".to_string(),
                outlet: "Supply".to_string(),
                volume: None,
                kind: ElementKindDef::CurvePump {
                    nominal_flow: 100.0,
                    nominal_head: 50.0,
                    nominal_efficiency: 0.7,
                    motor_efficiency: 0.9,
                    controller: "Speed".to_string(),
                },
            },
            ElementDef {
                name: "Coil".to_string(),
                inlet: "Supply".to_string(),
                outlet: "Tank".to_string(),
                volume: Some(8.0),
                kind: ElementKindDef::Coil {
                    hydraulics: HydraulicsDef {
                        nominal_flow: 100.0,
                        nominal_dp: 40.0,
                        exponent: 2.0,
                    },
                    nominal_capacity: 300_000.0,
                    load: "Zone".to_string(),
                },
            },
        ],
        plants: vec![],
        sensors: vec![SensorDef {
            name: "Supply Temp".to_string(),
            kind: SensorKindDef::NodeTemperature {
                node: "Supply".to_string(),
            },
        }],
        controllers: vec![ControllerDef {
            name: "Speed".to_string(),
            kind: ControllerKindDef::Pi {
                process: "Supply Temp".to_string(),
                setpoint: SetpointDef::Fixed(44.0),
                kp: 0.1,
                ti: 0.5,
                action: Default::default(),
                out_min: 0.2,
                out_max: 1.0,
                integral_limit: Some(10.0),
                initial_output: 0.8,
            },
        }],
        simulation: SimulationDef::default(),
    }
}

#[test]
fn roundtrip_yaml_small_project() {
    let project = small_project();
    validate_project(&project).unwrap();

    let path = std::env::temp_dir().join("hn_project_roundtrip_small.yaml");
    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(project, loaded);

    // Extension dispatch picks YAML for anything that is not .json.
    assert_eq!(load(&path).unwrap(), project);
}

#[test]
fn roundtrip_json_small_project() {
    let project = small_project();

    let path = std::env::temp_dir().join("hn_project_roundtrip_small.json");
    save_json(&path, &project).unwrap();
    let loaded = load_json(&path).unwrap();
    assert_eq!(project, loaded);
    assert_eq!(load(&path).unwrap(), project);
}

#[test]
fn save_refuses_invalid_project() {
    let mut project = small_project();
    project.nodes[1].name = "Tank".to_string();

    let path = std::env::temp_dir().join("hn_project_invalid.yaml");
    assert!(save_yaml(&path, &project).is_err());
}
