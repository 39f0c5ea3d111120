#![allow(clippy::many_single_char_names)]

mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use plocal::prime::ValidPrime;
use psseq::utils::{init_logging, load_matrix, GroupSpec};
use run::Output;

/// Exact computations with finitely generated abelian groups localized at a prime.
///
/// Matrices are read from files holding the height, the width and then the entries in row-major
/// order, separated by whitespace. Entries are integers or fractions such as `-3/4`. Groups are
/// written `FREE[:E1,E2,...]`, e.g. `1:2` is `Z + Z/p^2`.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// The prime to localize at
    #[arg(short, long, global = true, default_value = "2")]
    prime: ValidPrime,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reduce a matrix to Smith normal form
    Smith { matrix: PathBuf },
    /// Kernel of a map, with its inclusion into the source
    Kernel {
        #[arg(long)]
        source: GroupSpec,
        #[arg(long)]
        target: GroupSpec,
        map: PathBuf,
    },
    /// Cokernel of a map, with the projection from the target
    Cokernel {
        #[arg(long)]
        target: GroupSpec,
        map: PathBuf,
    },
    /// Image of a map, with the projection and inclusion
    Image {
        #[arg(long)]
        source: GroupSpec,
        #[arg(long)]
        target: GroupSpec,
        map: PathBuf,
    },
    /// Lift a map from a free group along another map into the same target
    Lift {
        #[arg(long)]
        target: GroupSpec,
        /// The map to lift, from a free group
        free_map: PathBuf,
        /// The map to lift along
        map: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let p = cli.prime;
    let output = if cli.json { Output::Json } else { Output::Text };

    let result = match cli.command {
        Command::Smith { matrix } => run::smith(p, load_matrix(&matrix)?, output)?,
        Command::Kernel {
            source,
            target,
            map,
        } => run::kernel(p, &load_matrix(&map)?, &source.0, &target.0, output)?,
        Command::Cokernel { target, map } => {
            run::cokernel(p, &load_matrix(&map)?, &target.0, output)?
        }
        Command::Image {
            source,
            target,
            map,
        } => run::image(p, &load_matrix(&map)?, &source.0, &target.0, output)?,
        Command::Lift {
            target,
            free_map,
            map,
        } => run::lift(
            p,
            &load_matrix(&free_map)?,
            &load_matrix(&map)?,
            &target.0,
            output,
        )?,
    };
    print!("{result}");
    Ok(())
}
