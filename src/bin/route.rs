use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Value};

use router_core::{config, PipelineRegistry, RouteRequest, Router, RouterConfig};

/// Classify a classroom request and print the routing decision as JSON
#[derive(Parser, Debug)]
struct Args {
    /// Free-text request (ignored when --json is given)
    text: Option<String>,

    /// Full request object as JSON
    #[arg(long)]
    json: Option<String>,

    /// Explicit intent override
    #[arg(long = "type")]
    kind: Option<String>,

    /// Mark the request as carrying an image
    #[arg(long)]
    image: bool,

    /// Mark the request as carrying audio
    #[arg(long)]
    audio: bool,

    /// TOML router configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also run the offline pipeline for the chosen target
    #[arg(long)]
    dispatch: bool,
}

fn build_request(args: &Args) -> Result<RouteRequest> {
    let mut value: Value = match (&args.json, &args.text) {
        (Some(raw), _) => serde_json::from_str(raw).context("--json is not valid JSON")?,
        (None, Some(text)) => json!({ "text": text }),
        (None, None) => anyhow::bail!("either a text argument or --json is required"),
    };
    // Flags are merged into the object so the echoed request includes them
    if let Some(object) = value.as_object_mut() {
        if let Some(kind) = &args.kind {
            object.insert("type".to_string(), Value::String(kind.clone()));
        }
        if args.image {
            object.insert("image".to_string(), Value::Bool(true));
        }
        if args.audio {
            object.insert("audio".to_string(), Value::Bool(true));
        }
    }
    Ok(RouteRequest::from_json(&value)?)
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Err(e) = router_core::init_tracing() {
        eprintln!("warning: {e}");
    }

    let router_config = match &args.config {
        Some(path) => config::load_from_file(path)?,
        None => RouterConfig::default(),
    };
    let router = Router::from_config(router_config)?;

    let request = build_request(&args)?;
    let decision = router.route(&request)?;

    let output = if args.dispatch {
        let response = PipelineRegistry::offline().dispatch(&decision, &request)?;
        json!({ "decision": decision, "response": response })
    } else {
        serde_json::to_value(&decision)?
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cli: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("route").chain(cli.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_merge_onto_json_request() {
        let request = build_request(&args(&[
            "--json",
            r#"{"query": "read this aloud", "topic": "birds"}"#,
            "--type",
            "assessment",
            "--image",
            "--audio",
        ]))
        .unwrap();
        assert_eq!(request.kind.as_deref(), Some("assessment"));
        assert!(request.has_image());
        assert!(request.has_audio());
        assert_eq!(
            request.to_json().unwrap(),
            json!({"query": "read this aloud", "topic": "birds", "type": "assessment", "image": true, "audio": true})
        );
    }

    #[test]
    fn test_text_argument() {
        let request = build_request(&args(&["draw a leaf", "--audio"])).unwrap();
        assert_eq!(request.extract_input_text(), "draw a leaf");
        assert!(request.has_audio());
        assert!(!request.has_image());
        assert_eq!(request.kind, None);
    }

    #[test]
    fn test_requires_text_or_json() {
        let err = build_request(&args(&["--image"])).unwrap_err();
        assert!(err.to_string().contains("either a text argument or --json"));
    }

    #[test]
    fn test_rejects_non_object_json() {
        assert!(build_request(&args(&["--json", "[1, 2]"])).is_err());
        assert!(build_request(&args(&["--json", "{oops"])).is_err());
    }
}
