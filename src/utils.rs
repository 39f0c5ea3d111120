use std::{path::Path, str::FromStr};

use abelian::{parser::parse_matrix, AbelianGroup};
use anyhow::{anyhow, Context};
use plocal::matrix::Matrix;

/// Install a `tracing` subscriber writing to stderr, filtered by `RUST_LOG`.
///
/// Nothing is logged unless `RUST_LOG` is set, e.g. `RUST_LOG=sseq=debug`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

/// Read a matrix in the plain text format of [`abelian::parser`].
pub fn load_matrix(path: &Path) -> anyhow::Result<Matrix> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_matrix(&input).with_context(|| format!("Invalid matrix in {}", path.display()))
}

/// A group given on the command line as `FREE[:E1,E2,...]`, meaning `Z^FREE` plus one
/// `Z/p^{Ei}` for each exponent. So `2` is `Z + Z` and `0:1,3` is `Z/p + Z/p^3`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupSpec(pub AbelianGroup);

impl FromStr for GroupSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (free, torsion) = match s.split_once(':') {
            Some((free, torsion)) => (free, Some(torsion)),
            None => (s, None),
        };
        let free: usize = free
            .trim()
            .parse()
            .with_context(|| format!("Invalid free rank in group {s:?}"))?;
        let torsion = torsion
            .into_iter()
            .flat_map(|t| t.split(','))
            .map(|e| {
                let e: u32 = e
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid torsion exponent in group {s:?}"))?;
                if e == 0 {
                    return Err(anyhow!("Torsion exponents must be positive in group {s:?}"));
                }
                Ok(e)
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self(AbelianGroup::new(free, torsion)))
    }
}
