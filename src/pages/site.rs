use std::fs;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use log::{error, info, warn};
use snafu::ResultExt;

use crate::errors::{CreateOutputDirSnafu, CustomResult, RenderSnafu, TemplateSnafu, WriteOutputSnafu};
use crate::modules::championship::{build_report, ChampionshipReport};
use crate::modules::config::{LeagueConfig, ReportDefinition};
use crate::modules::helpers::handelbars::abbreviate_name::AbbreviateName;
use crate::modules::helpers::handelbars::format_pace::FormatPace;
use crate::modules::helpers::handelbars::to_json::ToJson;
use crate::modules::result_file::ResultFileCache;
use crate::pages::report::template_data;

const REPORT_TEMPLATE: &str = "report";
const STYLESHEET: &str = "style.css";
const INDEX_PAGE: &str = "index.html";

/// # template registry
/// the page templates are compiled into the binary
pub fn registry() -> CustomResult<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);

    handlebars.register_helper("abbreviateName", Box::new(AbbreviateName));
    handlebars.register_helper("formatPace", Box::new(FormatPace));
    handlebars.register_helper("toJson", Box::new(ToJson));

    handlebars
        .register_partial("sidebar", include_str!("../../templates/partials/sidebar.hbs"))
        .context(TemplateSnafu { name: "sidebar" })?;
    handlebars
        .register_template_string(REPORT_TEMPLATE, include_str!("../../templates/report.hbs"))
        .context(TemplateSnafu { name: REPORT_TEMPLATE })?;

    Ok(handlebars)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut temporary = path.as_os_str().to_owned();
    temporary.push(".tmp");
    PathBuf::from(temporary)
}

/// writes `contents` to `<path>.tmp`, leaving `path` untouched
fn stage(path: &Path, contents: &str) -> CustomResult<()> {
    let temporary = staging_path(path);
    if let Err(source) = fs::write(&temporary, contents) {
        let _ = fs::remove_file(&temporary);
        return Err(source).context(WriteOutputSnafu { path });
    }

    Ok(())
}

/// renames a staged `<path>.tmp` over `path`
fn commit(path: &Path) -> CustomResult<()> {
    let temporary = staging_path(path);
    if let Err(source) = fs::rename(&temporary, path) {
        let _ = fs::remove_file(&temporary);
        return Err(source).context(WriteOutputSnafu { path });
    }

    Ok(())
}

fn discard(path: &Path) {
    let _ = fs::remove_file(staging_path(path));
}

fn write_atomic(path: &Path, contents: &str) -> CustomResult<()> {
    stage(path, contents)?;
    commit(path)
}

pub fn render_report(
    handlebars: &Handlebars,
    report: &ChampionshipReport,
    generated: &[ReportDefinition],
    config: &LeagueConfig,
    generated_at: &str,
) -> CustomResult<String> {
    let data = template_data(report, generated, config, generated_at);
    handlebars
        .render(REPORT_TEMPLATE, &data)
        .context(RenderSnafu { name: report.definition.slug.clone() })
}

/// # generate the dashboard
/// rebuild every page of the dashboard from the result files. Reports without any
/// loadable event are left out of the site; failing to create the output directory
/// aborts the run.
///
/// ## Returns
/// * `Vec<PathBuf>` - the pages written, `index.html` included
pub fn generate_site(config: &LeagueConfig) -> CustomResult<Vec<PathBuf>> {
    let handlebars = registry()?;
    let identity = config.identity();
    let definitions = config.reports()?;

    fs::create_dir_all(&config.output_dir).context(CreateOutputDirSnafu { path: &config.output_dir })?;

    let mut cache = ResultFileCache::new();
    let reports: Vec<ChampionshipReport> = definitions
        .iter()
        .filter_map(|definition| {
            let report = build_report(&mut cache, &identity, definition, config.outlier_ceiling);
            if report.is_none() {
                warn!(target: "site", "no results for {}, page omitted", definition.title());
            }
            report
        })
        .collect();

    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let stylesheet = config.output_dir.join(STYLESHEET);
    write_atomic(&stylesheet, include_str!("../../templates/style.css"))?;

    // sidebars only link staged pages: a page that fails to render or stage is
    // dropped and the remaining pages are staged again
    let mut pending: Vec<&ChampionshipReport> = reports.iter().collect();
    let staged = loop {
        let generated: Vec<ReportDefinition> = pending.iter().map(|report| report.definition.clone()).collect();
        let mut staged = Vec::new();
        let mut failed = Vec::new();

        for report in &pending {
            let page = config.output_dir.join(report.definition.page_file());
            let staged_page = render_report(&handlebars, report, &generated, config, &generated_at)
                .and_then(|html| stage(&page, &html).map(|()| html));

            match staged_page {
                Ok(html) => staged.push((page, html)),
                Err(error) => {
                    error!(target: "site", "{}", error);
                    failed.push(report.definition.slug.clone());
                }
            }
        }

        if failed.is_empty() {
            break staged;
        }
        for (page, _) in &staged {
            discard(page);
        }
        pending.retain(|report| !failed.contains(&report.definition.slug));
    };

    let mut written = Vec::new();
    for (page, _) in &staged {
        match commit(page) {
            Ok(()) => {
                info!(target: "site", "generated {}", page.display());
                written.push(page.clone());
            }
            Err(error) => error!(target: "site", "{}", error),
        }
    }

    if let Some((_, html)) = staged.first() {
        let index = config.output_dir.join(INDEX_PAGE);
        match write_atomic(&index, html) {
            Ok(()) => written.push(index),
            Err(error) => error!(target: "site", "{}", error),
        }
    }

    info!(target: "site", "{} of {} reports generated", staged.len(), definitions.len());
    Ok(written)
}
