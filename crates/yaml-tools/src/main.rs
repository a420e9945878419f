use std::path::PathBuf;
use std::process::ExitCode;

use bpaf::Bpaf;
use commented_yaml::PrintOptions;
use yaml_tools_cli_common::{CLIGlobalOptions, cli_global_options};
use yaml_tools_config::Config;

mod commands;

/// Layout of the written document. Flags win over `yaml-tools.toml`, which
/// wins over the defaults.
#[derive(Debug, Clone, Bpaf)]
pub struct LayoutArgs {
    /// Spaces per nesting level [default: 2]
    #[bpaf(long("indent"), argument("N"))]
    pub indent: Option<usize>,

    /// Columns before the `-` of a sequence nested under a key [default: 0]
    #[bpaf(long("seq-indent"), argument("N"))]
    pub seq_indent: Option<usize>,
}

impl LayoutArgs {
    /// Resolve the layout against the configuration file.
    pub fn print_options(&self, config: &Config) -> anyhow::Result<PrintOptions> {
        let defaults = PrintOptions::default();
        let indent = self
            .indent
            .or(config.indent)
            .unwrap_or(defaults.indent);
        anyhow::ensure!(indent > 0, "indent must be at least 1");
        Ok(PrintOptions {
            indent,
            sequence_indent: self
                .seq_indent
                .or(config.sequence_indent)
                .unwrap_or(defaults.sequence_indent),
        })
    }
}

#[derive(Debug, Clone, Bpaf)]
pub struct MergeArgs {
    /// Input file; repeat the flag or list more files after it. Later files
    /// take precedence.
    #[bpaf(short('i'), long("inputs"), argument("FILE"))]
    pub inputs: Vec<PathBuf>,

    /// Output file, standard output when omitted
    #[bpaf(short('o'), long("output"), argument("FILE"))]
    pub output: Option<PathBuf>,

    #[bpaf(external(layout_args))]
    pub layout: LayoutArgs,

    #[bpaf(positional("FILE"))]
    pub files: Vec<PathBuf>,
}

impl MergeArgs {
    /// All input files in command line order.
    pub fn all_inputs(&self) -> impl Iterator<Item = &PathBuf> {
        self.inputs.iter().chain(&self.files)
    }
}

#[derive(Debug, Clone, Bpaf)]
pub struct EditArgs {
    /// Input file
    #[bpaf(short('i'), long("input"), argument("FILE"))]
    pub input: PathBuf,

    /// Output file, standard output when omitted. May be the input file.
    #[bpaf(short('o'), long("output"), argument("FILE"))]
    pub output: Option<PathBuf>,

    #[bpaf(external(layout_args))]
    pub layout: LayoutArgs,

    /// Node to act on, dotted (`test.foo.h[2]`) or split into arguments
    /// (`test foo h 2`)
    #[bpaf(positional("PATH"))]
    pub path: Vec<String>,
}

#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version, fallback_to_usage)]
/// Merge, delete and comment out YAML nodes without losing comments
struct Cli {
    #[bpaf(external(commands))]
    command: Commands,
}

#[derive(Debug, Clone, Bpaf)]
enum Commands {
    #[bpaf(command("merge"))]
    /// Merge two or more YAML files, later files taking precedence
    Merge(
        #[bpaf(external(cli_global_options), hide_usage)] CLIGlobalOptions,
        #[bpaf(external(merge_args))] MergeArgs,
    ),

    #[bpaf(command("delete"))]
    /// Delete a node and everything under it
    Delete(
        #[bpaf(external(cli_global_options), hide_usage)] CLIGlobalOptions,
        #[bpaf(external(edit_args))] EditArgs,
    ),

    #[bpaf(command("comment"))]
    /// Comment out a node and everything under it, in place
    Comment(
        #[bpaf(external(cli_global_options), hide_usage)] CLIGlobalOptions,
        #[bpaf(external(edit_args))] EditArgs,
    ),

    #[bpaf(command("version"))]
    /// Print version information
    Version,
}

fn main() -> ExitCode {
    let cli = cli().run();

    let (global, result) = match cli.command {
        Commands::Merge(global, args) => {
            setup(&global);
            (global, commands::merge::run(&args))
        }
        Commands::Delete(global, args) => {
            setup(&global);
            (global, commands::delete::run(&args))
        }
        Commands::Comment(global, args) => {
            setup(&global);
            (global, commands::comment::run(&args))
        }
        Commands::Version => {
            println!("yaml-tools {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(e, &global);
            ExitCode::from(1)
        }
    }
}

fn setup(global: &CLIGlobalOptions) {
    yaml_tools_cli_common::init_tracing(global);
    yaml_tools_cli_common::setup_miette(global.colors);
}

/// Errors from the tree operations get a full diagnostic; everything else
/// (I/O, parse errors) is printed with its context chain.
fn report(error: anyhow::Error, global: &CLIGlobalOptions) {
    match error.downcast::<yaml_tools::Error>() {
        Ok(error) => eprintln!("{:?}", miette::Report::new(error)),
        Err(error) if global.verbose => eprintln!("Error: {error:?}"),
        Err(error) => eprintln!("Error: {error:#}"),
    }
}
