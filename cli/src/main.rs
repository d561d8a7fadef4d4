mod test_runner;

use std::io::Read;
use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

use mlstr::{Block, FormatArg};

#[derive(Parser)]
#[command(name = "mlstr", version, about = "Lay out multi-line text blocks side by side")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log block operations to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Place the contents of several files next to each other
    Concat(ConcatArgs),

    /// Substitute arguments into a template file
    Format(FormatArgs),

    /// Run .test.txt fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct ConcatArgs {
    /// Column separator placed between consecutive files
    #[arg(short, long, default_value = "")]
    sep: String,

    /// Files to lay out from left to right (`-` reads stdin)
    #[arg(required = true)]
    files: Vec<String>,
}

#[derive(clap::Args)]
struct FormatArgs {
    /// Template file containing %s, %d and %f directives
    template: String,

    /// Values for the directives, in order (after --). Integers and plain decimals
    /// like `-1.5` are numbers, `@path` passes a file as a block, anything else is text.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.txt file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Concat(concat_args) => do_concat(concat_args),
        Command::Format(format_args) => do_format(format_args, cli.no_color),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            let exit_code = test_runner::run_tests(path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "mlstr=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Read a block from a file, or stdin for `-`. One trailing newline is dropped
/// so a file ending in a newline does not gain an empty bottom row.
fn read_block(path: &str) -> Result<String, String> {
    let mut text = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("cannot read stdin: {}", e))?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|e| format!("cannot read '{}': {}", path, e))?
    };
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}

fn read_or_exit(path: &str) -> String {
    match read_block(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn do_concat(args: ConcatArgs) {
    let blocks: Vec<String> = args.files.iter().map(|f| read_or_exit(f)).collect();
    tracing::debug!(files = blocks.len(), "concatenating files");
    let out = Block::new(args.sep).join(&blocks);
    println!("{}", out);
}

fn do_format(args: FormatArgs, no_color: bool) {
    let source = read_or_exit(&args.template);

    let mut files = SimpleFiles::new();
    let file_id = files.add(args.template.clone(), source.clone());

    let arguments: Vec<FormatArg> = args.args.iter().map(|s| parse_arg(s)).collect();

    match Block::new(source).format(&arguments) {
        Ok(out) => println!("{}", out),
        Err(error) => {
            let color_choice = if no_color {
                ColorChoice::Never
            } else {
                ColorChoice::Auto
            };
            let writer = StandardStream::stderr(color_choice);
            let config = term::Config::default();
            let diagnostic = error.to_diagnostic(file_id);
            let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
            process::exit(1);
        }
    }
}

/// Parse a CLI argument string into a FormatArg.
/// Integers and plain decimals (`1.5`, never `1e5`, `inf` or `nan`) become
/// numbers, "true"/"false" become booleans, `@path` loads a block from a
/// file, everything else is a string.
fn parse_arg(s: &str) -> FormatArg {
    if let Some(path) = s.strip_prefix('@') {
        return FormatArg::Block(Block::new(read_or_exit(path)));
    }
    if let Ok(n) = s.parse::<i64>() {
        return FormatArg::Int(n);
    }
    if is_plain_decimal(s) {
        if let Ok(n) = s.parse::<f64>() {
            return FormatArg::Float(n);
        }
    }
    match s {
        "true" => FormatArg::Bool(true),
        "false" => FormatArg::Bool(false),
        _ => FormatArg::Str(s.to_string()),
    }
}

fn is_plain_decimal(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    digits.contains('.')
        && digits.bytes().any(|b| b.is_ascii_digit())
        && digits.bytes().all(|b| b.is_ascii_digit() || b == b'.')
}
