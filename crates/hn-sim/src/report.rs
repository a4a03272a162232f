//! Tabular run output: fixed columns, one row per recorded time.

use hn_components::{EvalContext, ReportValue};
use hn_core::{NodeId, Real};

use crate::error::{SimError, SimResult};
use crate::network::Network;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    /// Name of the reporting object.
    pub object: String,
    pub name: &'static str,
    pub unit: &'static str,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportFrame {
    pub columns: Vec<Column>,
    pub times: Vec<Real>,
    pub rows: Vec<Vec<Real>>,
}

impl ReportFrame {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, object: &str, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.object == object && c.name == name)
    }

    /// One column over every recorded time.
    pub fn series(&self, object: &str, name: &str) -> Option<Vec<Real>> {
        let i = self.column_index(object, name)?;
        Some(self.rows.iter().map(|row| row[i]).collect())
    }

    /// Append the network's current report values.
    ///
    /// The first record fixes the columns; later records must match them.
    pub fn record(&mut self, net: &Network) -> SimResult<()> {
        let values = snapshot(net)?;
        if self.columns.is_empty() {
            self.columns = values
                .iter()
                .map(|(object, v)| Column {
                    object: object.clone(),
                    name: v.name,
                    unit: v.unit,
                })
                .collect();
        } else if values.len() != self.columns.len() {
            return Err(SimError::InvalidNetwork {
                what: format!(
                    "report row has {} values, expected {}",
                    values.len(),
                    self.columns.len()
                ),
            });
        }
        self.times.push(net.time_hours());
        self.rows.push(values.into_iter().map(|(_, v)| v.value).collect());
        Ok(())
    }
}

/// Every report value of the network, in a fixed order: nodes, elements,
/// plants, sensors, controllers.
pub fn snapshot(net: &Network) -> SimResult<Vec<(String, ReportValue)>> {
    let mut out = Vec::new();
    for i in 0..net.node_count() {
        let id = NodeId::from_usize(i);
        let state = net.node(id);
        let name = net.node_name(id).to_string();
        out.push((name.clone(), ReportValue::new("Pressure", "ft", state.pressure)));
        out.push((name, ReportValue::new("Temperature", "F", state.temperature)));
    }
    for elem in net.elements() {
        for v in elem.report(net)? {
            out.push((elem.name.clone(), v));
        }
    }
    for plant in net.plants() {
        for v in plant.report(net)? {
            out.push((plant.name.clone(), v));
        }
    }
    for sensor in net.sensors() {
        out.push((sensor.name.clone(), ReportValue::new("Value", "", sensor.read(net)?)));
    }
    for ctrl in net.controllers() {
        out.push((ctrl.name.clone(), ReportValue::new("Output", "", ctrl.output())));
    }
    Ok(out)
}
