//! Generate TypeScript definitions and JSON schemas for the web frontend.
//!
//! Run with `cargo run --bin generate_types`. Output lands in
//! `frontend/types/`, which the Next.js app imports directly.

use anyhow::Result;
use schemars::schema_for;
use ts_rs::TS;

use bondhon::types::{BiodataSummary, TokenBalance, WizardStepInfo};

fn main() -> Result<()> {
    let out_dir = std::path::Path::new("frontend/types");
    std::fs::create_dir_all(out_dir)?;

    BiodataSummary::export_all_to(out_dir)?;
    WizardStepInfo::export_all_to(out_dir)?;
    TokenBalance::export_all_to(out_dir)?;

    for (name, schema) in [
        ("BiodataSummary", schema_for!(BiodataSummary)),
        ("WizardStepInfo", schema_for!(WizardStepInfo)),
        ("TokenBalance", schema_for!(TokenBalance)),
    ] {
        let path = out_dir.join(format!("{name}.schema.json"));
        std::fs::write(&path, serde_json::to_string_pretty(&schema)?)?;
    }

    println!("Frontend types written to {}", out_dir.display());
    Ok(())
}
