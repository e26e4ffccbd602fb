use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

pub(crate) const QUIZZES_CREATED: &str = "quizzes_created_total";
pub(crate) const QUIZZES_REPEATED: &str = "quizzes_repeated_total";
pub(crate) const QUIZ_COMPLETIONS: &str = "quiz_completions_total";

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled || PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);

    metrics::describe_counter!(QUIZZES_CREATED, "Quizzes created, including auto-linking");
    metrics::describe_counter!(QUIZZES_REPEATED, "Quizzes cloned through the repeat endpoint");
    metrics::describe_counter!(QUIZ_COMPLETIONS, "Graded quiz submissions");
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}
