use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use typehint::{CallStack, HookRegistry, Severity, ViolationSignal};

#[derive(Debug, Clone, clap::ValueEnum)]
enum EmitStage {
    Outcome,
    Parsed,
    Json,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum SeverityArg {
    Recoverable,
    Other,
}

#[derive(Parser, Debug)]
#[command(
    name = "typehint",
    version,
    about = "Classifies argument-type violation messages and prints the normalized report"
)]
struct Cli {
    /// Violation message, or `-` to read it from stdin
    message: String,

    /// Severity of the signal
    #[arg(long, value_enum, default_value_t = SeverityArg::Recoverable)]
    severity: SeverityArg,

    /// Host error level (4096 = recoverable); overrides --severity
    #[arg(long)]
    code: Option<i64>,

    /// Call context JSON file (frames innermost first, invocable names)
    #[arg(long)]
    context: Option<PathBuf>,

    /// Output stage
    #[arg(long, value_enum, default_value_t = EmitStage::Outcome)]
    emit: EmitStage,

    /// Log pipeline decisions
    #[arg(long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("typehint=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_message(arg: &str) -> std::io::Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf.trim_end_matches(['\r', '\n']).to_string())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let message = match read_message(&cli.message) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("typehint: error: stdin: {}", e);
            std::process::exit(2);
        }
    };

    let severity = match (cli.code, cli.severity) {
        (Some(code), _) => Severity::from_code(code),
        (None, SeverityArg::Recoverable) => Severity::Recoverable,
        (None, SeverityArg::Other) => Severity::Other,
    };

    // ── Call context ──
    let ctx = match &cli.context {
        Some(path) => match CallStack::load(path) {
            Ok(ctx) => {
                tracing::info!(
                    frames = ctx.frames.len(),
                    path = %path.display(),
                    "loaded call context"
                );
                ctx
            }
            Err(e) => {
                eprintln!("typehint: error: {}", e);
                std::process::exit(2);
            }
        },
        None => CallStack::new(),
    };

    if let EmitStage::Parsed = cli.emit {
        match typehint::parser::parse(&message) {
            Ok(parsed) => match serde_json::to_string_pretty(&parsed) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("typehint: error: {}", e);
                    std::process::exit(2);
                }
            },
            Err(e) => {
                eprintln!("typehint: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // ── Intercept ──
    let guard = match HookRegistry::global().install() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("typehint: error: {}", e);
            std::process::exit(2);
        }
    };
    let signal = ViolationSignal::new(severity, message);
    let result = guard.handle(&signal, &ctx);
    guard.release();

    match cli.emit {
        EmitStage::Json => {
            println!("{}", typehint::handler::result_json(&result));
            if result.is_err() {
                std::process::exit(1);
            }
        }
        _ => match result {
            Ok(outcome) if outcome.is_handled() => println!("handled"),
            Ok(_) => println!("not handled"),
            Err(violation) => {
                tracing::warn!(kind = ?violation.kind, "type contract violated");
                println!("{}", violation);
                std::process::exit(1);
            }
        },
    }
}
