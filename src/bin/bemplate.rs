use std::io::Write;
use std::path::PathBuf;

use anyhow::{Result, Context, anyhow};
use clap::Parser as ClapParser;
use kstring::KString;
use bemplate::{parse, CompileOptions, Template, warn::trace_set};


#[derive(clap::Parser, Debug)]
/// Render templates to HTML. The first file is the root template,
/// each further file extends the one before it; the last one is
/// rendered.
struct Args {
    /// Use this block name for the last file instead of the one it
    /// declares; can be given multiple times
    #[clap(long)]
    block_name: Vec<String>,

    /// Print the syntax tree of the last file as JSON instead of
    /// rendering
    #[clap(long)]
    dump_tree: bool,

    /// Show what the compiler does on stderr
    #[clap(long)]
    trace: bool,

    /// Template source files
    #[clap(required(true))]
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.trace {
        trace_set(true);
    }

    let mut template: Option<Template> = None;
    let nfiles = args.files.len();
    for (i, path) in args.files.iter().enumerate() {
        let source = std::fs::read_to_string(path).with_context(
            || anyhow!("reading {path:?}"))?;
        let block = parse(&source).with_context(|| anyhow!("parsing {path:?}"))?;
        let is_last = i + 1 == nfiles;
        if is_last && args.dump_tree {
            let mut outp = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut outp, &block)?;
            writeln!(&mut outp)?;
            return Ok(())
        }
        let mut options = CompileOptions::default();
        if is_last {
            options.block_names = args.block_name.iter().map(|n| KString::from_ref(n)).collect();
        }
        let compiled = match &template {
            Some(parent) => parent.extend_block(&block, &options),
            None => Template::from_block(&block, &options),
        }.with_context(|| anyhow!("compiling {path:?}"))?;
        template = Some(compiled);
    }

    if let Some(template) = template {
        let mut outp = std::io::stdout().lock();
        writeln!(&mut outp, "{}", template.render())?;
    }
    Ok(())
}
