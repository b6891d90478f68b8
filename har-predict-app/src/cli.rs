use clap::Parser;
use har_predict_auth::FlowFlags;
use har_predict_core::config::DEFAULT_CONFIG_FILE;
use har_predict_core::{AppConfig, AuthMode};
use std::path::PathBuf;

/// Classify the activity in record.csv with a cloud-trained model.
///
/// Trains the model first if it does not exist yet. Training runs
/// remotely; re-run once it has finished.
#[derive(Debug, Parser)]
#[command(name = "har-predict", version)]
pub struct Cli {
    /// TOML configuration file; built-in defaults apply when absent.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Use the browser consent flow instead of the service account.
    #[arg(long)]
    pub interactive: bool,

    /// Do not run a local web server; paste the verification code instead.
    #[arg(long)]
    pub noauth_local_webserver: bool,

    #[arg(long, default_value = "localhost")]
    pub auth_host_name: String,

    /// Ports tried, in order, for the local redirect listener.
    #[arg(long, num_args = 1.., default_values_t = [8080u16, 8090])]
    pub auth_host_port: Vec<u16>,

    /// Record file to classify (overrides the config file).
    #[arg(long)]
    pub record: Option<PathBuf>,

    /// Print the model analysis instead of making a prediction.
    #[arg(long)]
    pub analyze: bool,
}

impl Cli {
    /// Fold command-line overrides into the loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if self.interactive {
            config.auth.mode = AuthMode::Interactive;
        }
        if let Some(record) = &self.record {
            config.run.record_path = record.clone();
        }
    }

    pub fn flow_flags(&self) -> FlowFlags {
        FlowFlags {
            noauth_local_webserver: self.noauth_local_webserver,
            auth_host_name: self.auth_host_name.clone(),
            auth_host_ports: self.auth_host_port.clone(),
        }
    }
}
