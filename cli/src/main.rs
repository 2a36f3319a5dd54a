mod config;
mod test_runner;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::diagnostic::Diagnostic;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

use runner::{Host, Options, SystemHost};

use crate::config::Config;

const SUBCOMMANDS: &[&str] = &["build", "check", "test", "help"];

#[derive(Parser)]
#[command(
    name = "snippets",
    version,
    about = "Run the snippet directives in Markdown notes and splice in their output"
)]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log progress (otherwise RUST_LOG applies, defaulting to warnings)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory commands run in and `show` paths are read from
    #[arg(short = 'C', long = "directory", global = true, default_value = ".")]
    directory: PathBuf,

    /// Config file [default: ./snippets.toml when present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile documents (the default when no subcommand is given)
    Build(BuildArgs),

    /// Decode snippets without running anything
    Check(CheckArgs),

    /// Run .test.md regression files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct BuildArgs {
    /// Document to compile. Repeatable; the n-th input pairs with the n-th output.
    #[arg(short = 'i', long = "input", value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// Where to write the compiled document. Repeatable.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    outputs: Vec<PathBuf>,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Documents to check
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.md file or a directory containing them
    path: PathBuf,
}

fn main() {
    // `snippets -i a.md -o b.md` is shorthand for `snippets build -i a.md -o b.md`.
    let mut args: Vec<String> = std::env::args().collect();
    if !names_subcommand(&args) {
        args.insert(1.min(args.len()), "build".to_string());
    }

    let cli = Cli::parse_from(&args);
    init_logging(cli.verbose);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    };
    let options = config.options();

    let exit_code = match cli.command {
        Command::Build(args) => do_build(args, &cli.directory, &options, cli.no_color),
        Command::Check(args) => do_check(args, &options, cli.no_color),
        Command::Test(args) => test_runner::run_tests(&args.path, &options, cli.no_color),
    };
    process::exit(exit_code);
}

/// True when a subcommand (or a help/version flag) appears before the first
/// `-i`/`-o`. The values of `-C`, `--directory` and `--config` are skipped.
fn names_subcommand(args: &[String]) -> bool {
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "-i" | "--input" | "-o" | "--output" => return false,
            "-C" | "--directory" | "--config" => {
                rest.next();
            }
            "-h" | "--help" | "-V" | "--version" => return true,
            other if SUBCOMMANDS.contains(&other) => return true,
            _ => {}
        }
    }
    false
}

fn init_logging(verbose: bool) {
    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn color_choice(no_color: bool) -> ColorChoice {
    if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

/// Pair each input with its output. Checked before any document is read.
fn pair_documents(
    inputs: Vec<PathBuf>,
    outputs: Vec<PathBuf>,
) -> Result<Vec<(PathBuf, PathBuf)>, String> {
    if inputs.is_empty() {
        return Err("no input documents given".into());
    }
    if inputs.len() != outputs.len() {
        return Err(format!(
            "{} input file(s) but {} output file(s); every -i needs a matching -o",
            inputs.len(),
            outputs.len()
        ));
    }
    Ok(inputs.into_iter().zip(outputs).collect())
}

fn do_build(args: BuildArgs, directory: &Path, options: &Options, no_color: bool) -> i32 {
    let pairs = match pair_documents(args.inputs, args.outputs) {
        Ok(pairs) => pairs,
        Err(e) => {
            eprintln!("error: {}", e);
            return 2;
        }
    };

    let writer = StandardStream::stderr(color_choice(no_color));
    let mut host = SystemHost::new(directory);
    let mut failed = 0usize;

    for (input, output) in &pairs {
        if !build_file(input, output, &mut host, options, &writer) {
            failed += 1;
        }
    }

    if failed > 0 {
        eprintln!("error: {} of {} document(s) failed", failed, pairs.len());
        1
    } else {
        0
    }
}

/// Compile `input` into `output`. Nothing is written unless every snippet succeeded.
fn build_file<H: Host>(
    input: &Path,
    output: &Path,
    host: &mut H,
    options: &Options,
    writer: &StandardStream,
) -> bool {
    let source = match std::fs::read_to_string(input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", input.display(), e);
            return false;
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(input.display().to_string(), source.clone());

    let compiled = match runner::compile_document(source, file_id, host, options) {
        Ok(text) => text,
        Err(error) => {
            emit_diagnostics(writer, &files, &error.to_diagnostics());
            eprintln!(
                "error: '{}' was not written because '{}' failed",
                output.display(),
                input.display()
            );
            return false;
        }
    };

    match std::fs::write(output, compiled) {
        Ok(()) => {
            tracing::info!(input = %input.display(), output = %output.display(), "compiled");
            true
        }
        Err(e) => {
            eprintln!("error: cannot write '{}': {}", output.display(), e);
            false
        }
    }
}

fn do_check(args: CheckArgs, options: &Options, no_color: bool) -> i32 {
    let writer = StandardStream::stderr(color_choice(no_color));
    let mut files = SimpleFiles::new();
    let mut ok = true;

    for path in &args.files {
        let source = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: cannot read '{}': {}", path.display(), e);
                ok = false;
                continue;
            }
        };
        let name = path.display().to_string();
        let file_id = files.add(name.clone(), source.clone());

        let parser = snippet::parser::Parser::new(source, file_id)
            .with_shorthand(options.shorthand.clone());
        let page = match parser.parse() {
            Ok(page) => page,
            Err(errors) => {
                let diagnostics: Vec<Diagnostic<usize>> =
                    errors.iter().map(|e| e.to_diagnostic()).collect();
                emit_diagnostics(&writer, &files, &diagnostics);
                ok = false;
                continue;
            }
        };

        if page.is_empty() {
            println!("{}: no snippets", name);
        }
        for found in &page.snippets {
            let action = &found.action;
            println!(
                "{}:{}: {} (build {}, show {}, run {}, clean {})",
                name,
                found.directive.line(parser.source()),
                if action.is_silent() { "code" } else { "stages" },
                action.build.len(),
                action.show.len(),
                action.run.len(),
                action.clean.len()
            );
        }
    }

    if ok { 0 } else { 1 }
}

fn emit_diagnostics(
    writer: &StandardStream,
    files: &SimpleFiles<String, String>,
    diagnostics: &[Diagnostic<usize>],
) {
    let config = term::Config::default();
    for diagnostic in diagnostics {
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn inputs_pair_with_outputs_in_order() {
        let pairs = pair_documents(paths(&["a.md", "b.md"]), paths(&["A.md", "B.md"])).unwrap();
        assert_eq!(pairs[1], (PathBuf::from("b.md"), PathBuf::from("B.md")));
    }

    #[test]
    fn count_mismatch_is_a_configuration_error() {
        let err = pair_documents(paths(&["a.md", "b.md"]), paths(&["A.md"])).unwrap_err();
        assert!(err.contains("2 input file(s) but 1 output file(s)"), "{}", err);
    }

    #[test]
    fn at_least_one_input_is_required() {
        assert!(pair_documents(Vec::new(), Vec::new()).is_err());
    }

    #[test]
    fn missing_subcommand_defaults_to_build() {
        let args = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert!(!names_subcommand(&args(&["snippets", "-i", "a.md", "-o", "b.md"])));
        assert!(!names_subcommand(&args(&["snippets", "--no-color", "-i", "test"])));
        assert!(names_subcommand(&args(&["snippets", "check", "a.md"])));
        assert!(names_subcommand(&args(&["snippets", "--help"])));
        assert!(!names_subcommand(&args(&["snippets", "-C", "test", "-i", "a.md", "-o", "b.md"])));
        assert!(!names_subcommand(&args(&["snippets", "--config", "check", "-i", "a.md"])));
        assert!(names_subcommand(&args(&["snippets", "-C", "demos", "test", "notes.test.md"])));
    }

    #[test]
    fn failed_document_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.md");
        let output = dir.path().join("out.md");
        std::fs::write(&input, "```snippet\n{\"build\": [], \"show\": [\"missing.c\"]}\n```\n").unwrap();

        let writer = StandardStream::stderr(ColorChoice::Never);
        let mut host = SystemHost::new(dir.path());
        assert!(!build_file(&input, &output, &mut host, &Options::default(), &writer));
        assert!(!output.exists());
    }

    #[test]
    fn compiled_document_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.md");
        let output = dir.path().join("out.md");
        std::fs::write(dir.path().join("a.c"), "int x;\n").unwrap();
        std::fs::write(&input, "# A\n\n```snippet\n{\"build\": [], \"show\": [\"a.c\"]}\n```\n").unwrap();

        let writer = StandardStream::stderr(ColorChoice::Never);
        let mut host = SystemHost::new(dir.path());
        assert!(build_file(&input, &output, &mut host, &Options::default(), &writer));
        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, "# A\n\n```c\n// a.c\nint x;\n```\n\n\n\n");
    }
}
