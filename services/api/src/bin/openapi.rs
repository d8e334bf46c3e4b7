//! services/api/src/bin/openapi.rs
//!
//! Exports the OpenAPI document of the CRM API for client generation.
//!
//! Usage: `openapi [PATH]`. The path defaults to `openapi.json`; `-` prints the
//! document to stdout instead.

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

const DEFAULT_PATH: &str = "openapi.json";

fn document() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = "Opion CRM API".to_string();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    doc
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let doc = document();
    let json = doc.to_pretty_json()?;

    match std::env::args().nth(1).as_deref() {
        Some("-") => println!("{json}"),
        target => {
            let path = target.unwrap_or(DEFAULT_PATH);
            std::fs::write(path, json)?;
            eprintln!("Wrote {} paths to {}", doc.paths.paths.len(), path);
        }
    }
    Ok(())
}
