use clap::Parser;
use env_logger::Env;

use colecm::{args_parser::Args, system::System};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut system = System::new(args.infile);
    system.read()?;
    if let Some(ranks) = args.ranks {
        system.set_ranks(ranks);
    }
    system.contextualize()?.run()?;
    Ok(())
}
