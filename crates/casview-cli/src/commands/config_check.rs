use crate::support::{config_source_label, load_config_or_exit, print_json};
use serde_json::json;

pub fn run(config: Option<String>, json_output: bool) {
    let (config, source) = load_config_or_exit(config.as_deref());
    let source = config_source_label(&source);

    if json_output {
        print_json(&json!({
            "result": "accepted",
            "source": source,
            "config": config,
        }));
    } else {
        println!("casview config-check");
        println!("  Source: {source}");
        println!(
            "  Release credential: {}",
            config.validation.release_credential
        );
        println!(
            "  Reserved attribute names: {}",
            config.validation.reserved_attribute_names
        );
        println!(
            "  Callback pool: {} total / {} per host",
            config.callback.max_total_connections, config.callback.max_connections_per_host
        );
        println!(
            "  Callback timeouts: connect {}ms / socket {}ms / pool wait {}ms",
            config.callback.connect_timeout_ms,
            config.callback.socket_timeout_ms,
            config.callback.pool_wait_timeout_ms
        );
        println!("  Require https: {}", config.callback.require_https);
    }
}
