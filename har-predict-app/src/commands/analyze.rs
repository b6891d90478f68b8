use crate::report::render_not_ready;
use anyhow::Result;
use har_predict_core::{AppConfig, LabelTable};
use har_predict_prediction::{AnalyzeOutcome, PredictionApi, Predictor};
use std::sync::Arc;

pub async fn run(config: &AppConfig, api: Arc<dyn PredictionApi>) -> Result<AnalyzeOutcome> {
    let predictor = Predictor::new(
        api,
        LabelTable::activities(),
        config.run.record_path.clone(),
    );
    let outcome = predictor.analyze(&config.model.model_ref()).await?;

    match &outcome {
        AnalyzeOutcome::Ready(analysis) => println!("{}", serde_json::to_string_pretty(analysis)?),
        AnalyzeOutcome::NotReady { status } => println!("{}", render_not_ready(status)),
    }

    Ok(outcome)
}
