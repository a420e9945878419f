use anyhow::Result;
use commented_yaml::print_document;

use super::{load_config, read_document, write_output};
use crate::MergeArgs;

/// Run the `merge` command: fold every input into the first one and write
/// the result.
pub fn run(args: &MergeArgs) -> Result<()> {
    let options = args.layout.print_options(&load_config())?;
    let documents = args
        .all_inputs()
        .map(|path| read_document(path))
        .collect::<Result<Vec<_>>>()?;
    anyhow::ensure!(!documents.is_empty(), "no input files given, use -i FILE");

    let merged = yaml_tools::successive_merge(documents)?;
    write_output(args.output.as_deref(), &print_document(&merged, &options))
}
