
use super::Analyzer;
use crate::settings::Settings;
use crate::testutil::{ru_builder, ru_bundle};

fn ru_analyzer() -> Analyzer {
    Analyzer::from_bundle(&ru_bundle()).unwrap()
}

fn ru_analyzer_with(settings: Settings) -> Analyzer {
    Analyzer::with_settings(&ru_builder().build().unwrap(), settings).unwrap()
}
