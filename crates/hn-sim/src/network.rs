//! The network registry: topology, node states, elements, plants, controls
//! and external providers, owned in one place and addressed by index.

use hn_components::{
    ConstantWeather, Element, ElementKind, EvalContext, Load, NodeState, Plant, PlantKind,
    SideLink, Weather, link_plants,
};
use hn_controls::{Controller, ControllerKind, Sensor, SensorKind};
use hn_core::{CtrlId, ElemId, Id, LoadId, NodeId, PlantId, Real, SensorId};
use hn_fluids::psychro::STANDARD_PRESSURE_PSIA;
use hn_fluids::{FluidModel, Water};
use hn_graph::{Graph, GraphBuilder, NodeRef};
use tracing::{info, warn};

use crate::error::{SimError, SimResult};
use crate::node::{NodeBuffers, NodeKind};
use crate::validate;

/// Design-day conditions used when no weather source is given.
const DEFAULT_DRYBULB: Real = 95.0;
const DEFAULT_WETBULB: Real = 78.0;

struct PendingElement {
    kind: ElementKind,
    volume: Option<Real>,
}

/// Two-pass network assembly.
///
/// Objects are numbered in the order they are added, so ids handed out here
/// can be used in element, plant and controller parameters before `build`.
pub struct NetworkBuilder {
    graph: GraphBuilder,
    nodes: Vec<(NodeKind, NodeState)>,
    elements: Vec<PendingElement>,
    plants: Vec<(String, PlantKind)>,
    sensors: Vec<(String, SensorKind)>,
    controllers: Vec<(String, ControllerKind)>,
    loads: Vec<Box<dyn Load>>,
    fluid: Box<dyn FluidModel>,
    weather: Option<Box<dyn Weather>>,
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self {
            graph: GraphBuilder::new(),
            nodes: Vec::new(),
            elements: Vec::new(),
            plants: Vec::new(),
            sensors: Vec::new(),
            controllers: Vec::new(),
            loads: Vec::new(),
            fluid: Box::new(Water::default()),
            weather: None,
        }
    }

    pub fn set_fluid(&mut self, fluid: impl FluidModel + 'static) -> &mut Self {
        self.fluid = Box::new(fluid);
        self
    }

    pub fn set_weather(&mut self, weather: impl Weather + 'static) -> &mut Self {
        self.weather = Some(Box::new(weather));
        self
    }

    pub fn add_fixed_node(
        &mut self,
        name: impl Into<String>,
        pressure: Real,
        temperature: Real,
    ) -> NodeId {
        self.push_node(name.into(), NodeKind::Fixed, pressure, temperature)
    }

    pub fn add_dynamic_node(
        &mut self,
        name: impl Into<String>,
        pressure: Real,
        temperature: Real,
        alpha: Real,
    ) -> NodeId {
        self.push_node(name.into(), NodeKind::Dynamic { alpha }, pressure, temperature)
    }

    fn push_node(
        &mut self,
        name: String,
        kind: NodeKind,
        pressure: Real,
        temperature: Real,
    ) -> NodeId {
        let id = self.graph.add_node(name);
        self.nodes.push((
            kind,
            NodeState {
                pressure,
                temperature,
            },
        ));
        id
    }

    /// Declare an element; `volume` overrides the variant's default.
    pub fn add_element(
        &mut self,
        name: impl Into<String>,
        inlet: impl Into<NodeRef>,
        outlet: impl Into<NodeRef>,
        kind: ElementKind,
        volume: Option<Real>,
    ) -> ElemId {
        let id = self.graph.add_element(name, inlet, outlet);
        self.elements.push(PendingElement { kind, volume });
        id
    }

    pub fn add_plant(&mut self, name: impl Into<String>, kind: PlantKind) -> PlantId {
        self.plants.push((name.into(), kind));
        Id::from_usize(self.plants.len() - 1)
    }

    pub fn add_sensor(&mut self, name: impl Into<String>, kind: SensorKind) -> SensorId {
        self.sensors.push((name.into(), kind));
        Id::from_usize(self.sensors.len() - 1)
    }

    pub fn add_controller(&mut self, name: impl Into<String>, kind: ControllerKind) -> CtrlId {
        self.controllers.push((name.into(), kind));
        Id::from_usize(self.controllers.len() - 1)
    }

    pub fn add_load(&mut self, load: impl Load + 'static) -> LoadId {
        self.loads.push(Box::new(load));
        Id::from_usize(self.loads.len() - 1)
    }

    /// Resolve, link and validate everything, producing a runnable network.
    pub fn build(self) -> SimResult<Network> {
        let graph = self.graph.build()?;

        let mut elements = Vec::with_capacity(self.elements.len());
        for (topo, pending) in graph.elements().iter().zip(self.elements) {
            elements.push(Element::new(
                topo.id,
                topo.name.clone(),
                topo.inlet,
                topo.outlet,
                pending.kind,
                pending.volume,
            )?);
        }

        let mut plants: Vec<Plant> = self
            .plants
            .into_iter()
            .enumerate()
            .map(|(i, (name, kind))| Plant::new(Id::from_usize(i), name, kind))
            .collect();
        let links = link_plants(&mut plants, &elements, self.fluid.as_ref())?;

        let sensors = self
            .sensors
            .into_iter()
            .enumerate()
            .map(|(i, (name, kind))| Sensor::new(Id::from_usize(i), name, kind))
            .collect::<Result<Vec<_>, _>>()?;
        let controllers = self
            .controllers
            .into_iter()
            .enumerate()
            .map(|(i, (name, kind))| Controller::new(Id::from_usize(i), name, kind))
            .collect::<Result<Vec<_>, _>>()?;

        let weather = match self.weather {
            Some(w) => w,
            None => Box::new(ConstantWeather::new(
                DEFAULT_DRYBULB,
                DEFAULT_WETBULB,
                STANDARD_PRESSURE_PSIA,
            )?),
        };

        let (node_kinds, initial): (Vec<NodeKind>, Vec<NodeState>) =
            self.nodes.into_iter().unzip();

        let network = Network {
            graph,
            node_kinds,
            states: NodeBuffers::new(initial),
            elements,
            plants,
            links,
            sensors,
            controllers,
            loads: self.loads,
            fluid: self.fluid,
            weather,
            time_hours: 0.0,
        };
        network.validate()?;

        info!(
            nodes = network.node_kinds.len(),
            dynamic = network.dynamic_nodes().count(),
            elements = network.elements.len(),
            plants = network.plants.len(),
            controllers = network.controllers.len(),
            "network built"
        );
        Ok(network)
    }
}

/// A frozen, runnable network.
pub struct Network {
    graph: Graph,
    node_kinds: Vec<NodeKind>,
    pub(crate) states: NodeBuffers,
    elements: Vec<Element>,
    plants: Vec<Plant>,
    links: Vec<Option<SideLink>>,
    sensors: Vec<Sensor>,
    pub(crate) controllers: Vec<Controller>,
    pub(crate) loads: Vec<Box<dyn Load>>,
    fluid: Box<dyn FluidModel>,
    pub(crate) weather: Box<dyn Weather>,
    pub(crate) time_hours: Real,
}

impl Network {
    fn validate(&self) -> SimResult<()> {
        validate::check_node_states(self)?;
        validate::check_references(self)?;
        for sensor in &self.sensors {
            sensor.check_references(self)?;
        }
        for (i, kind) in self.node_kinds.iter().enumerate() {
            let id = NodeId::from_usize(i);
            let NodeKind::Dynamic { alpha } = *kind else {
                continue;
            };
            let name = self.node_name(id);
            if !alpha.is_finite() || alpha < 0.0 {
                return Err(SimError::InvalidNetwork {
                    what: format!("node '{name}': relaxation coefficient must be non-negative"),
                });
            }
            if alpha == 0.0 {
                warn!(node = name, "dynamic node has zero relaxation, pressure is frozen");
            }
            if self.graph.inlet_elements(id).is_empty() {
                return Err(SimError::InvalidNetwork {
                    what: format!("dynamic node '{name}' has no inlet element"),
                });
            }
        }
        Ok(())
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn time_hours(&self) -> Real {
        self.time_hours
    }

    pub fn node_count(&self) -> usize {
        self.node_kinds.len()
    }

    pub fn node_kind(&self, id: NodeId) -> NodeKind {
        self.node_kinds[id.idx()]
    }

    pub fn node_name(&self, id: NodeId) -> &str {
        self.graph.node(id).map(|n| n.name.as_str()).unwrap_or("?")
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.graph.node_by_name(name)
    }

    pub fn element_id(&self, name: &str) -> Option<ElemId> {
        self.graph.element_by_name(name)
    }

    /// Committed state of every node, by index.
    pub fn node_states(&self) -> &[NodeState] {
        self.states.current_all()
    }

    pub fn dynamic_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_kinds
            .iter()
            .enumerate()
            .filter(|(_, k)| k.is_dynamic())
            .map(|(i, _)| NodeId::from_usize(i))
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    pub fn controllers(&self) -> &[Controller] {
        &self.controllers
    }

    pub fn load_count(&self) -> usize {
        self.loads.len()
    }

    pub fn read_sensor(&self, id: SensorId) -> SimResult<Real> {
        let sensor = self
            .sensors
            .get(id.idx())
            .ok_or_else(|| SimError::InvalidReference {
                what: format!("sensor #{} does not exist", id.index()),
            })?;
        Ok(sensor.read(self)?)
    }

    /// Electric input of every element and plant [kW].
    pub fn total_electric_power(&self) -> SimResult<Real> {
        let mut total = 0.0;
        for elem in &self.elements {
            total += elem.electric_power(self)?;
        }
        for plant in &self.plants {
            total += plant.electric_power(self);
        }
        Ok(total)
    }
}

impl EvalContext for Network {
    fn fluid(&self) -> &dyn FluidModel {
        self.fluid.as_ref()
    }

    fn node(&self, id: NodeId) -> NodeState {
        self.states.current(id)
    }

    fn element(&self, id: ElemId) -> &Element {
        &self.elements[id.idx()]
    }

    fn side_link(&self, id: ElemId) -> Option<SideLink> {
        self.links.get(id.idx()).copied().flatten()
    }

    fn plant(&self, id: PlantId) -> &Plant {
        &self.plants[id.idx()]
    }

    fn controller_output(&self, id: CtrlId) -> Real {
        self.controllers[id.idx()].output()
    }

    fn weather(&self) -> &dyn Weather {
        self.weather.as_ref()
    }

    fn load(&self, id: LoadId) -> &dyn Load {
        self.loads[id.idx()].as_ref()
    }
}
