//! Human-readable output.

use har_predict_core::{LabelTable, Prediction, TrainingStatus};

pub fn render_prediction(prediction: &Prediction, labels: &LabelTable) -> String {
    let mut out = format!(
        "You are currently {} (class {}).",
        prediction.activity, prediction.class_id
    );

    if !prediction.scores.is_empty() {
        out.push_str("\nClass scores:");
        for score in &prediction.scores {
            let name = labels.lookup(&score.class_id).unwrap_or("unknown");
            out.push_str(&format!(
                "\n  {:<20} (class {})  {:.4}",
                name, score.class_id, score.score
            ));
        }
    }

    out
}

/// Single stderr line for a failed run, with the context chain.
pub fn render_error(err: &anyhow::Error) -> String {
    format!("❌ {:#}", err)
}

pub fn render_not_ready(status: &TrainingStatus) -> String {
    format!(
        "Model is (still) training (status: {}).\nPlease wait and run me again!",
        status
    )
}
