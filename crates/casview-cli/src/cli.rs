use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "casview",
    about = "casview: assemble service validation response models and probe proxy callbacks",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assemble the response model for a resolved assertion
    Assemble {
        /// Path to assertion JSON
        assertion: String,

        /// Protocol version: 1, 2, or 3
        #[arg(long, default_value = "3")]
        protocol: String,

        /// Path to casview TOML config
        #[arg(long)]
        config: Option<String>,

        /// Release a retained credential regardless of config
        #[arg(long)]
        release_credential: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load and validate configuration
    ConfigCheck {
        /// Path to casview TOML config
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Verify a proxy callback endpoint through the callback transport
    CallbackCheck {
        /// Callback URL
        url: String,

        /// Proxy-granting ticket id to deliver
        #[arg(long)]
        pgt_id: Option<String>,

        /// Proxy-granting ticket IOU to deliver
        #[arg(long)]
        pgt_iou: Option<String>,

        /// Path to casview TOML config
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
