use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "mindhaven-server")]
#[command(about = "MindHaven chat triage service", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    pub config: String,

    /// Inference router base URL
    #[arg(short, long)]
    pub router: Option<String>,

    /// Generative chat-model identifier
    #[arg(short = 'm', long)]
    pub chat_model: Option<String>,

    /// Listen address
    #[arg(short = 'l', long, default_value = "0.0.0.0")]
    pub listen: String,

    /// Listen port
    #[arg(short = 'P', long, default_value = "8080")]
    pub port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
