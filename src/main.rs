use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tfplan_match::{
    PlanRequest, Template, TemplateMatch, Terraform, compile, load_fixture, parse_var,
    trim_fixture, verify_template,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tfpm")]
#[command(about = "Terraform plan matcher - check plan output against expected fixtures", long_about = None)]
#[command(version)]
struct Cli {
    /// Log filter (e.g., debug, tfplan_match=trace)
    #[arg(long, global = true, env = "RUST_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the regular expression a fixture compiles to
    Compile {
        /// Fixture file, or - for stdin
        fixture: PathBuf,
    },
    /// Search captured plan output for each fixture
    Check {
        /// Fixture files, or - for stdin
        #[arg(required = true)]
        fixtures: Vec<PathBuf>,
        /// File holding the plan output (defaults to stdin)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run terraform plan and check its output against fixtures
    Plan {
        /// Terraform configuration directory
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Input variable (e.g., name=my-alb)
        #[arg(long = "var", value_parser = parse_var_arg)]
        vars: Vec<(String, String)>,
        /// Resource address to target (e.g., module.alb_test)
        #[arg(long = "target")]
        targets: Vec<String>,
        /// Fixture files to check the plan against
        #[arg(short, long = "fixture")]
        fixtures: Vec<PathBuf>,
        /// Run terraform init and get before planning
        #[arg(long)]
        init: bool,
        /// Terraform executable
        #[arg(long, env = "TERRAFORM_BIN", default_value = "terraform")]
        terraform: PathBuf,
    },
}

fn parse_var_arg(s: &str) -> Result<(String, String), String> {
    parse_var(s).map_err(|e| e.to_string())
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;
    Ok(buf)
}

fn read_fixture(path: &Path) -> Result<String> {
    if is_stdin(path) {
        trim_fixture(&read_stdin()?, &"from stdin")
    } else {
        load_fixture(path)
    }
}

fn check_all(fixtures: &[PathBuf], output: &str) -> Result<()> {
    if fixtures.iter().filter(|p| is_stdin(p)).count() > 1 {
        bail!("Only one fixture can be read from stdin");
    }
    for path in fixtures {
        let template = Template::new(&read_fixture(path)?)?;
        let found = verify_template(&template, output)
            .with_context(|| format!("Check failed for {}", path.display()))?;
        report(path, &found);
    }
    Ok(())
}

fn report(path: &Path, found: &TemplateMatch) {
    println!("{}: matched at {}..{}", path.display(), found.start(), found.end());
    for (name, value) in found.bindings() {
        println!("  {name} = \"{value}\"");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::new(&cli.log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Compile { fixture } => {
            println!("{}", compile(&read_fixture(&fixture)?));
        }
        Commands::Check { fixtures, output } => {
            let output = match output {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read output: {}", path.display()))?,
                None => {
                    if fixtures.iter().any(|p| is_stdin(p)) {
                        bail!("Plan output and a fixture cannot both come from stdin");
                    }
                    read_stdin()?
                }
            };
            check_all(&fixtures, &output)?;
        }
        Commands::Plan {
            dir,
            vars,
            targets,
            fixtures,
            init,
            terraform,
        } => {
            let tf = Terraform::new(dir).with_binary(terraform);
            if init {
                tf.init()?;
                tf.get()?;
            }

            let mut request = PlanRequest::new();
            for (name, value) in vars {
                request = request.var(name, value);
            }
            for target in targets {
                request = request.target(target);
            }

            let output = tf.plan(&request)?;
            if fixtures.is_empty() {
                print!("{output}");
            } else {
                check_all(&fixtures, &output)?;
            }
        }
    }

    Ok(())
}
