use std::path::PathBuf;

use clap::Parser;
use rayon::prelude::*;

use alice_outline::net::fetch::load_document;
use alice_outline::page::Page;
use alice_outline::{HeadingRecord, OutlineConfig, OutlineEngine, Result};

/// Print the numbered heading outline of HTML pages.
#[derive(Parser)]
#[command(name = "alice-outline", version)]
struct Cli {
    /// HTML files or http(s) URLs
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Only show headings containing this text (case-insensitive)
    #[arg(long)]
    filter: Option<String>,

    /// Scroll offset in pixels used to pick the active heading
    #[arg(long, default_value_t = 0.0)]
    scroll: f32,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match OutlineConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(2);
            }
        },
        None => OutlineConfig::default(),
    };

    // Each input gets its own page and engine
    let reports: Vec<Result<String>> = cli
        .inputs
        .par_iter()
        .map(|input| outline(input, &config, cli.filter.as_deref(), cli.scroll))
        .collect();

    let mut failed = false;
    for (input, report) in cli.inputs.iter().zip(reports) {
        match report {
            Ok(text) => print!("{}", text),
            Err(e) => {
                eprintln!("{}: {}", input, e);
                failed = true;
            }
        }
    }
    if failed {
        std::process::exit(1);
    }
}

fn outline(input: &str, config: &OutlineConfig, filter: Option<&str>, scroll: f32) -> Result<String> {
    let tree = load_document(input)?;
    let mut page = Page::new(tree, config);
    let mut engine = OutlineEngine::new(config.clone());

    let location = page.location().to_string();
    engine.start(&mut page.tree, &location);

    page.scroll_to(scroll);
    let geometry = page.geometry();
    engine.observe_viewport(&geometry, page.viewport());

    let headings = match filter {
        Some(query) => engine.apply_filter(query),
        None => engine.headings().to_vec(),
    };

    Ok(render_outline(&page.tree.title, &location, &headings, engine.active()))
}

fn render_outline(title: &str, location: &str, headings: &[HeadingRecord], active: Option<&str>) -> String {
    let mut out = String::new();
    if title.is_empty() {
        out.push_str(&format!("# {}\n", location));
    } else {
        out.push_str(&format!("# {} ({})\n", title, location));
    }
    if headings.is_empty() {
        out.push_str("  (no headings)\n");
    }
    for h in headings {
        let marker = if active == Some(h.identifier.as_str()) { '>' } else { ' ' };
        let indent = "  ".repeat(h.level.saturating_sub(1) as usize);
        out.push_str(&format!(
            "{} {}{:<10} {}  #{}\n",
            marker, indent, h.number, h.text, h.identifier
        ));
    }
    out.push('\n');
    out
}
