use anyhow::Result;
use commented_yaml::print_document;

use super::{load_config, node_path, read_document, write_output};
use crate::EditArgs;

/// Run the `delete` command. The comment that led the deleted node stays
/// where the node was.
pub fn run(args: &EditArgs) -> Result<()> {
    let options = args.layout.print_options(&load_config())?;
    let path = node_path(&args.path)?;
    let mut document = read_document(&args.input)?;

    yaml_tools::delete_keeping_comments(&mut document.root, &path)?;
    write_output(args.output.as_deref(), &print_document(&document, &options))
}
