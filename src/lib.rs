use serde::{Deserialize, Serialize};

pub mod errors;
pub mod modules;
pub mod pages {
    pub mod report;
    pub mod site;
}

use crate::modules::models::comparison::ImprovementRecord;

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct TemplateDataReport {
    pub title: String,
    pub subtitle: String,
    pub league: String,
    pub logo: Option<String>,
    pub generated_at: String,
    pub sidebar: Vec<SidebarSection>,
    pub pace_table: TableData<PaceTableRow>,
    pub improvement_table: TableData<ImprovementRecord>,
    pub chart_data: ChartData,
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct TableData<T> {
    pub headers: Vec<String>,
    pub rows: Vec<T>,
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct PaceTableRow {
    pub driver_id: String,
    /// pace vs alien per round, `None` renders as an empty cell
    pub paces: Vec<Option<f64>>,
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct SidebarSection {
    pub label: String,
    pub links: Vec<SidebarLink>,
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct SidebarLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Plotly traces and layout of the pace trend chart.
#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct ChartData {
    pub traces: Vec<ChartTrace>,
    pub layout: serde_json::Value,
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct ChartTrace {
    pub x: Vec<usize>,
    pub y: Vec<f64>,
    pub mode: String,
    pub name: String,
    pub hovertemplate: String,
    pub customdata: Vec<String>,
    pub line: ChartLine,
    pub marker: ChartMarker,
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct ChartLine {
    pub width: u32,
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct ChartMarker {
    pub size: u32,
}
