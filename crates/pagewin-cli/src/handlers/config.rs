use crate::output;
use pagewin_core::AppConfig;
use serde::Serialize;

#[derive(Serialize)]
struct ConfigReport<'a> {
    path: Option<String>,
    config: &'a AppConfig,
}

pub fn handle(config: &AppConfig, path: Option<String>) -> anyhow::Result<()> {
    output::output_success(ConfigReport { path, config })
}
