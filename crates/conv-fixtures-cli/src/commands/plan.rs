use std::path::Path;

use conv_fixtures::sweep::enumerate_combinations;

use super::load_plan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown format '{other}', expected 'text' or 'json'"
            )),
        }
    }
}

pub fn run(path: Option<&Path>, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let plan = load_plan(path)?;

    match format {
        OutputFormat::Text => {
            println!("{} combination(s)", plan.combination_count());
            println!("{}", "=".repeat(40));
            for c in enumerate_combinations(&plan) {
                println!("{c}");
                match c.shapes() {
                    Ok(s) => {
                        println!("    input:   {:?}", s.input);
                        println!("    kernel1: {:?}", s.kernel1);
                        println!("    hidden:  {:?}", s.hidden);
                        println!("    kernel2: {:?}", s.kernel2);
                        println!("    output:  {:?}", s.output);
                    }
                    Err(e) => println!("    error:   {e}"),
                }
            }
        }
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = enumerate_combinations(&plan)
                .map(|c| {
                    let (shapes, error) = match c.shapes() {
                        Ok(s) => (Some(s), None),
                        Err(e) => (None, Some(e.to_string())),
                    };
                    serde_json::json!({
                        "combination": c,
                        "shapes": shapes,
                        "error": error,
                    })
                })
                .collect();
            let json = serde_json::to_string_pretty(&rows)?;
            println!("{json}");
        }
    }

    Ok(())
}
