//! Chart series handed to an external plotting tool.
//!
//! Nothing here draws. Each series is a title, a chart kind and parallel
//! label/value lists, serialized as JSON.

use serde::Serialize;

use crate::error::{TimetraceError, TimetraceResult};
use crate::session::MonthCount;
use crate::traffic::AggregateState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub kind: ChartKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    pub labels: Vec<String>,
    pub values: Vec<usize>,
}

pub fn top_ips_chart(state: &AggregateState, top_n: usize) -> ChartSeries {
    let (labels, values) = state
        .ip_counts()
        .top_n(top_n)
        .into_iter()
        .map(|(ip, count)| (ip.clone(), count))
        .unzip();

    ChartSeries {
        title: format!("Top {top_n} IP Addresses"),
        kind: ChartKind::Bar,
        x_label: Some("IP Addresses".to_string()),
        y_label: Some("Occurrences".to_string()),
        labels,
        values,
    }
}

pub fn top_ports_chart(state: &AggregateState, top_n: usize) -> ChartSeries {
    let (labels, values) = port_series(state, top_n, |port| port.to_string());

    ChartSeries {
        title: format!("Top {top_n} Ports"),
        kind: ChartKind::Bar,
        x_label: Some("Ports".to_string()),
        y_label: Some("Occurrences".to_string()),
        labels,
        values,
    }
}

pub fn port_distribution_chart(state: &AggregateState, top_n: usize) -> ChartSeries {
    let (labels, values) = port_series(state, top_n, |port| format!("Port {port}"));

    ChartSeries {
        title: "Port Distribution".to_string(),
        kind: ChartKind::Pie,
        x_label: None,
        y_label: None,
        labels,
        values,
    }
}

pub fn sessions_chart(title: &str, months: &[MonthCount]) -> ChartSeries {
    ChartSeries {
        title: title.to_string(),
        kind: ChartKind::Bar,
        x_label: Some("Month".to_string()),
        y_label: Some("Sessions".to_string()),
        labels: months.iter().map(|m| m.label.clone()).collect(),
        values: months.iter().map(|m| m.count).collect(),
    }
}

pub fn charts_json(charts: &[ChartSeries]) -> TimetraceResult<String> {
    serde_json::to_string_pretty(charts).map_err(|e| TimetraceError::Serialization(e.to_string()))
}

fn port_series(
    state: &AggregateState,
    top_n: usize,
    label: impl Fn(u32) -> String,
) -> (Vec<String>, Vec<usize>) {
    state
        .port_counts()
        .top_n(top_n)
        .into_iter()
        .map(|(&port, count)| (label(port), count))
        .unzip()
}
