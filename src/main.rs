//! Intention Resolver - command line entry point
//!
//! `schema` prints the intention JSON Schema, `resolve` resolves an intention
//! document under the given constraints, and `ask` has an LLM propose an
//! intention from plain language and resolves it.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use intention_resolver::affinity::{default_rule_table, load_rule_table, RuleTable};
use intention_resolver::constraint::{
    ColorScheme, ConstraintSet, Density, InputMethod, PointerType, Urgency, ViewportClass,
};
use intention_resolver::core::error::Result;
use intention_resolver::core::types::parse_wire_name;
use intention_resolver::core::ResolverConfig;
use intention_resolver::intention::intention_schema;
use intention_resolver::llm::{ConversationHistory, IntentionAdapter, LlmClient};
use intention_resolver::resolution::ResolutionEngine;

#[derive(Parser, Debug)]
#[command(name = "intention-resolver")]
#[command(about = "Resolve declarative UI intentions under device and accessibility constraints")]
struct Cli {
    /// Resolver config (TOML); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Affinity rule table (TOML); the built-in table is used when omitted
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the intention JSON Schema
    Schema,
    /// Resolve an intention JSON document ("-" reads stdin)
    Resolve {
        input: String,

        #[command(flatten)]
        constraints: ConstraintArgs,

        /// Print only the materializer-facing ResolvedUI
        #[arg(long)]
        ui: bool,
    },
    /// Ask the configured LLM for an intention, then resolve it
    Ask {
        text: String,

        #[command(flatten)]
        constraints: ConstraintArgs,

        /// Print only the materializer-facing ResolvedUI
        #[arg(long)]
        ui: bool,
    },
}

#[derive(Args, Debug, Default)]
struct ConstraintArgs {
    #[arg(long, value_parser = parse_wire_name::<ViewportClass>)]
    viewport: Option<ViewportClass>,

    #[arg(long, value_parser = parse_wire_name::<PointerType>)]
    pointer: Option<PointerType>,

    #[arg(long, value_parser = parse_wire_name::<InputMethod>)]
    input_method: Option<InputMethod>,

    #[arg(long)]
    screen_reader: bool,

    #[arg(long)]
    high_contrast: bool,

    #[arg(long)]
    reduced_motion: bool,

    #[arg(long)]
    token_set: Option<String>,

    #[arg(long, value_parser = parse_wire_name::<ColorScheme>)]
    color_scheme: Option<ColorScheme>,

    #[arg(long, value_parser = parse_wire_name::<Urgency>)]
    urgency: Option<Urgency>,

    #[arg(long, value_parser = parse_wire_name::<Density>)]
    density: Option<Density>,
}

impl ConstraintArgs {
    fn to_constraints(&self) -> ConstraintSet {
        let mut c = ConstraintSet::new();
        if let Some(v) = self.viewport {
            c = c.with_viewport(v);
        }
        if let Some(p) = self.pointer {
            c = c.with_pointer(p);
        }
        if let Some(m) = self.input_method {
            c = c.with_input_method(m);
        }
        if self.screen_reader {
            c = c.with_screen_reader();
        }
        if self.high_contrast {
            c = c.with_high_contrast();
        }
        if self.reduced_motion {
            c = c.with_reduced_motion();
        }
        if let Some(t) = &self.token_set {
            c = c.with_token_set(t.clone());
        }
        if let Some(s) = self.color_scheme {
            c = c.with_color_scheme(s);
        }
        if let Some(u) = self.urgency {
            c = c.with_urgency(u);
        }
        if let Some(d) = self.density {
            c = c.with_density(d);
        }
        c
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("intention_resolver=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ResolverConfig::load(path)?,
        None => ResolverConfig::default(),
    };
    let rules = match &cli.rules {
        Some(path) => Arc::new(load_rule_table(path)?),
        None => default_rule_table(),
    };

    match cli.command {
        Command::Schema => print_json(intention_schema()),
        Command::Resolve {
            input,
            constraints,
            ui,
        } => {
            let raw = read_input(&input)?;
            let value: serde_json::Value = serde_json::from_str(&raw)?;
            let engine = engine(rules, config)?;

            let resolution = engine.resolve_untrusted(&value, &constraints.to_constraints())?;
            tracing::info!(
                "Resolved to {} with confidence {:.2}",
                resolution.pattern().as_str(),
                resolution.confidence()
            );
            if ui {
                print_json(&resolution.to_resolved_ui())
            } else {
                print_json(&resolution)
            }
        }
        Command::Ask {
            text,
            constraints,
            ui,
        } => {
            let client = LlmClient::from_env()?;
            let adapter = IntentionAdapter::new(Arc::new(client), &config);
            let mut history = ConversationHistory::new(config.history_limit);

            // The async runtime exists only for the provider call
            let rt = Runtime::new()?;
            let intention = rt.block_on(adapter.converse(&mut history, text))?;
            tracing::info!("Model proposed a '{}' intention", intention.action().as_str());

            let engine = engine(rules, config)?;
            let resolution = engine.resolve(&intention, &constraints.to_constraints())?;
            if ui {
                print_json(&resolution.to_resolved_ui())
            } else {
                print_json(&resolution)
            }
        }
    }
}

fn engine(rules: Arc<RuleTable>, config: ResolverConfig) -> Result<ResolutionEngine> {
    tracing::debug!("Engine over {} affinity rules", rules.len());
    ResolutionEngine::new(rules, config)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(Path::new(input))?)
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
