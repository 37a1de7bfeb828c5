//! Sylloge CLI entry point.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use sylloge_debug::TracerConfig;
use sylloge_engine::{EngineConfig, KnowledgeBase, ScriptedProvider};
use sylloge_foundation::Error;
use sylloge_runtime::{
    Dialog, Goal, RunReport, RustylineEditor, Session, load_from_file, load_knowledge_base,
    logging, save_to_file,
};

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    kb_file: Option<PathBuf>,
    facts: Vec<String>,
    target: Option<String>,
    prove: Option<String>,
    answers: Option<Vec<String>>,
    no_ask: bool,
    max_questions: Option<usize>,
    why: Option<String>,
    why_depth: usize,
    snapshot: Option<PathBuf>,
    trace: bool,
    json: bool,
    verbose: u8,
    quiet: bool,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_args(args: &[String]) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig {
        why_depth: 8,
        ..CliConfig::default()
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-q" | "--quiet" => config.quiet = true,
            "-v" | "--verbose" => config.verbose = config.verbose.saturating_add(1),
            "-vv" => config.verbose = config.verbose.saturating_add(2),
            "--trace" => config.trace = true,
            "--json" => config.json = true,
            "--no-ask" => config.no_ask = true,
            "--fact" => config.facts.push(value(args, &mut i, "--fact")?.to_string()),
            "--target" => config.target = Some(value(args, &mut i, "--target")?.to_string()),
            "--prove" => config.prove = Some(value(args, &mut i, "--prove")?.to_string()),
            "--why" => config.why = Some(value(args, &mut i, "--why")?.to_string()),
            "--snapshot" => config.snapshot = Some(value(args, &mut i, "--snapshot")?.into()),
            "--answers" => {
                let list = value(args, &mut i, "--answers")?;
                config.answers = Some(
                    list.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect(),
                );
            }
            "--max-questions" => {
                let n = value(args, &mut i, "--max-questions")?;
                config.max_questions = Some(
                    n.parse()
                        .map_err(|_| format!("invalid --max-questions value: {n}"))?,
                );
            }
            "--why-depth" => {
                let n = value(args, &mut i, "--why-depth")?;
                config.why_depth = n
                    .parse()
                    .map_err(|_| format!("invalid --why-depth value: {n}"))?;
            }
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            path => {
                if config.kb_file.is_some() {
                    return Err(format!("unexpected argument: {path}").into());
                }
                config.kb_file = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    if config.target.is_some() && config.prove.is_some() {
        return Err("--target and --prove are mutually exclusive".into());
    }
    Ok(config)
}

fn render_error(err: &Error) -> String {
    match &err.context {
        Some(context) => format!("{err} {context}"),
        None => err.to_string(),
    }
}

fn load(path: &Path) -> Result<KnowledgeBase, Error> {
    if path.extension().is_some_and(|ext| ext == "msgpack") {
        load_from_file(path)
    } else {
        load_knowledge_base(path)
    }
}

fn run(args: Vec<String>) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = parse_args(&args)?;

    if config.show_help {
        print_help();
        return Ok(ExitCode::SUCCESS);
    }

    if config.show_version {
        println!("sylloge {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    logging::init(config.verbose, config.quiet);

    let Some(kb_file) = &config.kb_file else {
        print_help();
        return Err("missing KB_FILE".into());
    };
    let kb = load(kb_file).map_err(|e| render_error(&e))?;
    println!("KB name: {}", kb.name());

    if let Some(path) = &config.snapshot {
        save_to_file(&kb, path).map_err(|e| render_error(&e))?;
        println!("Snapshot written to {}", path.display());
    }

    let mut engine_config = EngineConfig::new();
    if config.no_ask {
        engine_config = engine_config.without_asking();
    }
    if let Some(max) = config.max_questions {
        engine_config = engine_config.with_max_questions(max);
    }
    let mut tracer_config = TracerConfig::new();
    if config.trace {
        tracer_config = tracer_config.to_stderr();
    }
    if config.json {
        tracer_config = tracer_config.json();
    }

    let mut session = Session::new(kb)
        .with_engine_config(engine_config)
        .with_tracer_config(tracer_config);
    for fact in &config.facts {
        session.add_fact(fact);
    }

    let goal = match (&config.prove, &config.target) {
        (Some(name), _) => Goal::Prove(name.clone()),
        (None, target) => Goal::Forward(target.clone()),
    };

    let status = if let Some(answers) = &config.answers {
        let facts = session.facts(answers.iter().map(String::as_str));
        let report = session.run(&goal, ScriptedProvider::new(facts));
        print_report(&session, &report, &config)
    } else {
        let dialog = Dialog::new(RustylineEditor::new().map_err(|e| render_error(&e))?);
        let mut report = session.run(&goal, dialog);
        let status = print_report(&session, &report, &config);
        if !config.trace && report.provider.confirm("Show trace").unwrap_or(false) {
            println!("{}", report.tracer.render());
        }
        status
    };

    Ok(ExitCode::from(status))
}

fn print_report<P>(session: &Session, report: &RunReport<P>, config: &CliConfig) -> u8 {
    let interner = session.kb().interner();
    println!("{}", report.outcome.describe(interner));
    if let Some(err) = report.outcome.error() {
        if let Some(context) = &err.context {
            eprintln!("{context}");
        }
    }

    if let Some(name) = &config.why {
        print!("{}", session.why(report, name, config.why_depth).render(interner));
    }

    report.outcome.exit_status()
}

fn print_help() {
    println!(
        "\x1b[1mSylloge\x1b[0m - Production-rule expert system

\x1b[1mUSAGE:\x1b[0m
    sylloge [OPTIONS] KB_FILE

\x1b[1mARGUMENTS:\x1b[0m
    KB_FILE    Knowledge base (.json document or .msgpack snapshot)

\x1b[1mOPTIONS:\x1b[0m
    -h, --help             Print help information
    -V, --version          Print version information
    -v, --verbose          More diagnostic logging (repeatable)
    -q, --quiet            Only log errors
    --fact NAME            Add an initial fact (repeatable)
    --target NAME          Run forward and check the concluded fact
    --prove NAME           Run backward towards NAME
    --answers A,B,...      Answer questions from this list (batch mode)
    --no-ask               Do not ask for missing premises when stalled
    --max-questions N      Ask at most N questions for missing premises
    --snapshot PATH        Write a MessagePack snapshot of the knowledge base

\x1b[1mDEBUG OPTIONS:\x1b[0m
    --trace                Print each fact and rule firing as it happens
    --json                 Print trace records as JSON
    --why NAME             Explain how NAME was derived
    --why-depth N          Follow at most N firings back (default 8)

\x1b[1mENVIRONMENT:\x1b[0m
    SYLLOGE_LOG            Log filter directive, e.g. `debug` or `sylloge_engine=trace`

\x1b[1mEXAMPLES:\x1b[0m
    sylloge demos/minerals.json                        Consult interactively
    sylloge demos/minerals.json --fact NoGlitter       Start from a known fact
    sylloge demos/minerals.json --prove Silver --answers Glitter,Metallic,White
    sylloge --trace --json demos/minerals.json         Trace as JSON lines"
    );
}
