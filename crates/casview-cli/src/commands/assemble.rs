use crate::support::{
    load_config_or_exit, parse_protocol_or_exit, print_json, read_json_file_or_exit,
};
use casview_kernel::{Assertion, FieldValue, JsonRenderer, WireRenderer, assemble_response_model};
use serde_json::json;

pub struct Args {
    pub assertion: String,
    pub protocol: String,
    pub config: Option<String>,
    pub release_credential: bool,
    pub json: bool,
}

pub fn run(args: Args) {
    let version = parse_protocol_or_exit(&args.protocol);
    let (config, _) = load_config_or_exit(args.config.as_deref());
    let assertion: Assertion = read_json_file_or_exit(&args.assertion, "assertion");

    let mut policy = config.validation;
    if args.release_credential {
        policy.release_credential = true;
    }

    let model = match assemble_response_model(&assertion, version, &policy) {
        Ok(model) => model,
        Err(err) => {
            if args.json {
                print_json(&json!({
                    "result": "failure",
                    "protocolVersion": version,
                    "code": err.code(),
                    "rootCause": err.root_cause().code(),
                    "message": err.to_string(),
                }));
            } else {
                println!("casview assemble");
                println!("  Protocol: {version}");
                println!("  Result: failure");
                println!("  Code: {}", err.code());
                println!("  Message: {err}");
            }
            std::process::exit(1);
        }
    };

    if args.json {
        let rendered = JsonRenderer::default()
            .render(&model, version)
            .unwrap_or_else(|e| {
                eprintln!("error: {e}");
                std::process::exit(1);
            });
        let document: serde_json::Value =
            serde_json::from_slice(&rendered).expect("renderer emits valid json");
        print_json(&json!({
            "result": "success",
            "digest": model.digest(),
            "model": document,
        }));
    } else {
        println!("casview assemble");
        println!("  Protocol: {version}");
        println!("  Result: success");
        println!("  Digest: {}", model.digest());
        println!("  Fields: {}", model.len());
        for (name, value) in model.iter() {
            println!("    {name}: {}", describe(value));
        }
    }
}

fn describe(value: &FieldValue) -> String {
    match value {
        FieldValue::Scalar(_) => "scalar".to_string(),
        FieldValue::Set(set) => format!("set[{}]", set.len()),
        FieldValue::List(items) => format!("list[{}]", items.len()),
        FieldValue::Raw(map) => format!("raw attributes[{}]", map.len()),
        FieldValue::Attributes(map) => format!("attributes[{}]", map.len()),
    }
}
