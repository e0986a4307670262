//! specsuite CLI - Baseline API test plans from OpenAPI documents

mod loader;
mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use specsuite_core::{Config, GenerationOptions, StringRotation, VariantPolicy};

#[derive(Parser)]
#[command(name = "specsuite")]
#[command(about = "Generate baseline API test plans from OpenAPI documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "terminal")]
    output: OutputFormat,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a test plan from an OpenAPI document
    Generate {
        /// OpenAPI document (default: `spec` from the config file)
        spec: Option<PathBuf>,

        /// Config file (default: .specsuite.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Plan output file (default: `output` from the config file)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Cap on synthesized array length
        #[arg(long)]
        max_array_items: Option<usize>,

        /// Depth up to which optional object properties are filled in
        #[arg(long)]
        max_object_depth: Option<usize>,

        /// oneOf/anyOf member selection
        #[arg(long)]
        variant_policy: Option<VariantPolicyArg>,

        /// Seed for the seeded variant policy
        #[arg(long)]
        seed: Option<u64>,

        /// Placeholder string rotation
        #[arg(long)]
        string_rotation: Option<StringRotationArg>,

        /// Show the plan without writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Initialize config file
    Init,

    /// Export JSON Schema for the test plan format
    Schema,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantPolicyArg {
    First,
    Seeded,
    AllVariants,
}

impl From<VariantPolicyArg> for VariantPolicy {
    fn from(arg: VariantPolicyArg) -> Self {
        match arg {
            VariantPolicyArg::First => VariantPolicy::First,
            VariantPolicyArg::Seeded => VariantPolicy::Seeded,
            VariantPolicyArg::AllVariants => VariantPolicy::AllVariants,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StringRotationArg {
    CallOrder,
    SchemaPath,
}

impl From<StringRotationArg> for StringRotation {
    fn from(arg: StringRotationArg) -> Self {
        match arg {
            StringRotationArg::CallOrder => StringRotation::CallOrder,
            StringRotationArg::SchemaPath => StringRotation::SchemaPath,
        }
    }
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Terminal,
    Json,
    Silent,
}

/// Command-line overrides for [`GenerationOptions`].
#[derive(Default)]
struct Overrides {
    max_array_items: Option<usize>,
    max_object_depth: Option<usize>,
    variant_policy: Option<VariantPolicyArg>,
    seed: Option<u64>,
    string_rotation: Option<StringRotationArg>,
}

impl Overrides {
    fn apply(self, options: &mut GenerationOptions) {
        if let Some(n) = self.max_array_items {
            options.max_array_items = n;
        }
        if let Some(n) = self.max_object_depth {
            options.max_object_depth = n;
        }
        if let Some(policy) = self.variant_policy {
            options.variant_policy = policy.into();
        }
        if let Some(seed) = self.seed {
            options.seed = seed;
        }
        if let Some(rotation) = self.string_rotation {
            options.string_rotation = rotation.into();
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(3)
        }
    }
}

/// Logs go to stderr; `SPECSUITE_LOG` or `RUST_LOG` select the level.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("SPECSUITE_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<u8> {
    match cli.command {
        Commands::Generate {
            spec,
            config,
            out,
            max_array_items,
            max_object_depth,
            variant_policy,
            seed,
            string_rotation,
            dry_run,
        } => {
            let mut cfg = match config {
                Some(path) => Config::load(&path)?,
                None => Config::load_default()?,
            };
            Overrides {
                max_array_items,
                max_object_depth,
                variant_policy,
                seed,
                string_rotation,
            }
            .apply(&mut cfg.generation);

            let spec_path = spec.unwrap_or_else(|| cfg.spec.clone());
            let out_path = out.unwrap_or_else(|| cfg.output.clone());
            generate(&spec_path, &out_path, &cfg.generation, dry_run, cli.output)
        }

        Commands::Init => {
            let config_path = ".specsuite.toml";
            if Path::new(config_path).exists() {
                eprintln!("{config_path} already exists");
                return Ok(1);
            }

            std::fs::write(config_path, Config::example())?;
            println!("Created {config_path}");
            println!("\nEdit the file to configure:");
            println!("  - spec: path to your OpenAPI document");
            println!("  - output: where the plan is written");
            println!("  - [generation]: example synthesis options");
            Ok(0)
        }

        Commands::Schema => {
            let schema = specsuite_core::schema::generate_schema();
            println!("{schema}");
            Ok(0)
        }
    }
}

fn generate(
    spec_path: &Path,
    out_path: &Path,
    options: &GenerationOptions,
    dry_run: bool,
    format: OutputFormat,
) -> Result<u8> {
    let doc = loader::load_spec(spec_path)?;
    let plan = specsuite_engine::generate(&doc, options)
        .with_context(|| format!("cannot generate a plan from {}", spec_path.display()))?;

    if !dry_run {
        output::write_plan(out_path, &plan)?;
    }

    match format {
        OutputFormat::Terminal => {
            print!("{}", plan.to_terminal());
            if dry_run {
                eprintln!("\nDry run: plan not written");
            } else {
                eprintln!("\nPlan written: {}", out_path.display());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        OutputFormat::Silent => {}
    }

    Ok(if plan.has_coverage() { 0 } else { 1 })
}
