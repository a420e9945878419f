use anyhow::Result;
use commented_yaml::print_document;

use super::{load_config, node_path, read_document, write_output};
use crate::EditArgs;

/// Run the `comment` command: replace a node by its commented-out text.
pub fn run(args: &EditArgs) -> Result<()> {
    let options = args.layout.print_options(&load_config())?;
    let path = node_path(&args.path)?;
    let mut document = read_document(&args.input)?;

    yaml_tools::comment_out(&mut document.root, &path, &options)?;
    write_output(args.output.as_deref(), &print_document(&document, &options))
}
