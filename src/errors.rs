use std::path::PathBuf;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("File not found: {}", path.display()))]
    MissingFile { path: PathBuf },

    #[snafu(display("Could not read {}: {}", path.display(), source))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Malformed xml in {}: {}", path.display(), source))]
    MalformedXml {
        path: PathBuf,
        source: quick_xml::Error,
    },

    #[snafu(display("No session results found in {}", path.display()))]
    MissingSession { path: PathBuf },

    #[snafu(display("Could not read config {}: {}", path.display(), source))]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Could not parse config {}: {}", path.display(), source))]
    ParseConfig {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("Invalid config: {}", message))]
    InvalidConfig { message: String },

    #[snafu(display("Could not create output directory {}: {}", path.display(), source))]
    CreateOutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Could not write {}: {}", path.display(), source))]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Invalid template {}: {}", name, source))]
    Template {
        name: String,
        source: handlebars::TemplateError,
    },

    #[snafu(display("Could not render {}: {}", name, source))]
    Render {
        name: String,
        source: handlebars::RenderError,
    },
}

pub type CustomResult<T> = Result<T, Error>;
