use handlebars::html_escape;
use serde_json::json;

use crate::modules::championship::ChampionshipReport;
use crate::modules::config::{LeagueConfig, ReportDefinition, SessionKind};
use crate::modules::models::comparison::{ComparisonTable, ImprovementRecord};
use crate::{
    ChartData, ChartLine, ChartMarker, ChartTrace, PaceTableRow, SidebarLink, SidebarSection,
    TableData, TemplateDataReport,
};

/// # sidebar navigation
/// group the generated reports by section, in report order
///
/// ## Arguments
/// * `reports` - the reports that are generated this run
/// * `active_slug` - the report the sidebar is rendered for
pub fn sidebar(reports: &[ReportDefinition], active_slug: &str) -> Vec<SidebarSection> {
    let mut sections: Vec<SidebarSection> = Vec::new();

    for report in reports {
        let link = SidebarLink {
            label: format!("{} Pace", report.session.label()),
            href: report.page_file(),
            active: report.slug == active_slug,
        };

        match sections.last_mut() {
            Some(section) if section.label == report.section => section.links.push(link),
            _ => sections.push(SidebarSection {
                label: report.section.clone(),
                links: vec![link],
            }),
        }
    }

    sections
}

pub fn pace_table(comparison: &ComparisonTable) -> TableData<PaceTableRow> {
    let mut headers = vec!["Driver".to_string()];
    headers.extend(comparison.events.iter().map(|event| event.track.clone()));

    TableData {
        headers,
        rows: comparison
            .rows
            .iter()
            .map(|row| PaceTableRow {
                driver_id: row.driver_id.clone(),
                paces: row.reference_paces().collect(),
            })
            .collect(),
    }
}

pub fn improvement_table(records: &[ImprovementRecord]) -> TableData<ImprovementRecord> {
    TableData {
        headers: vec![
            "Driver".to_string(),
            "Best (First 2)".to_string(),
            "Best (Last 2)".to_string(),
            "Improvement".to_string(),
        ],
        rows: records.to_vec(),
    }
}

/// # pace trend chart
/// one trace per driver whose pace in the final round lies within `chart_range`,
/// fastest driver first
pub fn chart_data(definition: &ReportDefinition, comparison: &ComparisonTable, chart_range: [f64; 2]) -> ChartData {
    let [lower, upper] = chart_range;
    let tracks: Vec<String> = comparison.events.iter().map(|event| event.track.clone()).collect();
    let rounds = tracks.len();

    let traces = comparison
        .display_order()
        .into_iter()
        .filter(|row| {
            row.cells
                .last()
                .and_then(|cell| cell.pace_pct_reference)
                .map_or(false, |pace| lower <= pace && pace <= upper)
        })
        .map(|row| {
            let points: Vec<(usize, f64)> = row
                .reference_paces()
                .enumerate()
                .filter_map(|(round, pace)| pace.map(|pace| (round, pace)))
                .collect();

            ChartTrace {
                x: points.iter().map(|(round, _)| *round).collect(),
                y: points.iter().map(|(_, pace)| *pace).collect(),
                mode: "lines+markers".to_string(),
                name: row.driver_id.clone(),
                hovertemplate: format!(
                    "<b>{}</b><br>%{{customdata}}<br>Pace: %{{y:.2f}}%<extra></extra>",
                    html_escape(&row.driver_id)
                ),
                customdata: points
                    .iter()
                    .map(|(round, _)| tracks.get(*round).cloned().unwrap_or_default())
                    .collect(),
                line: ChartLine { width: 2 },
                marker: ChartMarker { size: 8 },
            }
        })
        .collect();

    let session = definition.session.label();
    ChartData {
        traces,
        layout: json!({
            "title": format!("{} {} Pace Trend: After {} Rounds", definition.section, session, rounds),
            "xaxis": {
                "tickmode": "array",
                "ticktext": tracks,
                "tickvals": (0..rounds).collect::<Vec<usize>>(),
                "range": [-0.6, rounds as f64 - 1.0 + 0.6],
            },
            "yaxis": {
                "title": format!("{} Pace % (vs Alien)", session),
                "range": [lower, upper],
            },
            "hovermode": "closest",
            "plot_bgcolor": "rgba(240, 240, 240, 0.5)",
            "height": 500,
            "autosize": true,
            "showlegend": false,
            "margin": { "l": 50, "r": 20, "b": 50, "t": 60 },
        }),
    }
}

pub fn subtitle(definition: &ReportDefinition, rounds: usize) -> String {
    let analysis = match definition.session {
        SessionKind::Race => "Race Performance",
        SessionKind::Quali => "Qualification Performance",
    };

    match &definition.class {
        Some(class) => format!("{} {} Analysis Across {} Championship Rounds", class.label, analysis, rounds),
        None => format!("{} Analysis Across {} Championship Rounds", analysis, rounds),
    }
}

/// # page data of a report
///
/// ## Arguments
/// * `report` - the report to render
/// * `generated` - every report generated this run, for the sidebar
/// * `config` - the league configuration
/// * `generated_at` - timestamp shown in the footer
pub fn template_data(
    report: &ChampionshipReport,
    generated: &[ReportDefinition],
    config: &LeagueConfig,
    generated_at: &str,
) -> TemplateDataReport {
    let definition = &report.definition;

    TemplateDataReport {
        title: definition.title(),
        subtitle: subtitle(definition, report.comparison.events.len()),
        league: config.title.clone(),
        logo: config.logo.clone(),
        generated_at: generated_at.to_string(),
        sidebar: sidebar(generated, &definition.slug),
        pace_table: pace_table(&report.comparison),
        improvement_table: improvement_table(&report.improvements),
        chart_data: chart_data(definition, &report.comparison, config.chart_range),
    }
}
