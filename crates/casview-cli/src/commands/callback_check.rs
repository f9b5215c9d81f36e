use crate::support::{load_config_or_exit, print_json};
use casview_transport::{CallbackRequest, CallbackTransport, HttpCallbackTransport};
use serde_json::json;

pub struct Args {
    pub url: String,
    pub pgt_id: Option<String>,
    pub pgt_iou: Option<String>,
    pub config: Option<String>,
    pub json: bool,
}

pub fn run(args: Args) {
    let (config, _) = load_config_or_exit(args.config.as_deref());
    let transport = HttpCallbackTransport::new(config.callback).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    let request = CallbackRequest {
        callback_url: args.url.clone(),
        pgt_id: args.pgt_id,
        pgt_iou: args.pgt_iou,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            std::process::exit(1);
        });

    match runtime.block_on(transport.verify(&request)) {
        Ok(outcome) => {
            let result = if outcome.accepted {
                "accepted"
            } else {
                "rejected"
            };
            if args.json {
                print_json(&json!({
                    "result": result,
                    "url": args.url,
                    "status": outcome.status,
                }));
            } else {
                println!("casview callback-check");
                println!("  URL: {}", args.url);
                println!("  Status: {}", outcome.status);
                println!("  Accepted: {}", outcome.accepted);
            }
            if !outcome.accepted {
                std::process::exit(1);
            }
        }
        Err(err) => {
            if args.json {
                print_json(&json!({
                    "result": "error",
                    "url": args.url,
                    "message": err.to_string(),
                }));
            } else {
                eprintln!("error: {err}");
            }
            std::process::exit(1);
        }
    }
}
