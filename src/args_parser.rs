use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    #[arg(short, long, default_value_t = String::from("input.colecm"))]
    pub infile: String,

    /// Number of SPMD ranks, overrides the `ranks` command of the input file
    #[arg(short, long)]
    pub ranks: Option<usize>,
}
