//! `predict` -- will a user reserve a field?
//!
//! Usage: `predict <userId> <fieldId>`
//!
//! Prints exactly one JSON document on stdout, either
//! `{"predicted": bool, "probability": number}` or `{"error": string}`.
//! Exits with status 1 on error. Logs go to stderr.

use field2go_pipeline::commands::predict;
use field2go_pipeline::telemetry;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    telemetry::init("field2go_pipeline=warn,field2go_core=info,predict=info");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let response = predict::run(&args).await;

    println!("{}", response.to_json());
    std::process::exit(response.exit_code());
}
