use std::fmt::Write;

use abelian::{
    compute_cokernel, compute_image, compute_kernel, lift_from_free, AbelianGroup,
    GroupWithMorphisms,
};
use anyhow::Context;
use plocal::{
    matrix::{ChangeOfBasis, Matrix},
    prime::ValidPrime,
    smith::smith_reduce,
};
use serde::Serialize;

/// How results are rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Output {
    Text,
    Json,
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize result")
}

fn describe(
    p: ValidPrime,
    name: &str,
    result: &GroupWithMorphisms,
    to_name: &str,
    from_name: &str,
    output: Output,
) -> anyhow::Result<String> {
    if output == Output::Json {
        return to_json(result);
    }
    let mut s = format!("{name}: {}\n", result.group.display(p));
    for m in &result.maps_to {
        write!(s, "{to_name}:\n{m}")?;
    }
    for m in &result.maps_from {
        write!(s, "{from_name}:\n{m}")?;
    }
    Ok(s)
}

pub fn smith(p: ValidPrime, mut f: Matrix, output: Output) -> anyhow::Result<String> {
    let rank = smith_reduce(p, &mut f, &mut ChangeOfBasis::new(), &mut ChangeOfBasis::new())?;
    match output {
        Output::Json => to_json(&serde_json::json!({ "rank": rank, "matrix": f })),
        Output::Text => Ok(format!("Rank: {rank}\n{f}")),
    }
}

pub fn kernel(
    p: ValidPrime,
    f: &Matrix,
    x: &AbelianGroup,
    y: &AbelianGroup,
    output: Output,
) -> anyhow::Result<String> {
    let result = compute_kernel(p, f, x, y, &[], &[Matrix::identity(x.rank())])?;
    describe(p, "Kernel", &result, "", "Inclusion", output)
}

pub fn cokernel(
    p: ValidPrime,
    f: &Matrix,
    y: &AbelianGroup,
    output: Output,
) -> anyhow::Result<String> {
    let result = compute_cokernel(p, f, y, &[Matrix::identity(y.rank())], &[])?;
    describe(p, "Cokernel", &result, "Projection", "", output)
}

pub fn image(
    p: ValidPrime,
    f: &Matrix,
    x: &AbelianGroup,
    y: &AbelianGroup,
    output: Output,
) -> anyhow::Result<String> {
    let result = compute_image(p, f, x, y)?;
    describe(p, "Image", &result, "Projection", "Inclusion", output)
}

pub fn lift(
    p: ValidPrime,
    f: &Matrix,
    map: &Matrix,
    y: &AbelianGroup,
    output: Output,
) -> anyhow::Result<String> {
    let g = lift_from_free(p, f, map, y)?;
    match output {
        Output::Json => to_json(&g),
        Output::Text => Ok(format!("Lift:\n{g}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn cokernel_text() {
        let p = ValidPrime::new(3);
        let f = Matrix::from_vec(&[vec![0, 0, 0], vec![0, 2, 0], vec![0, 0, 3]]);
        let out = cokernel(p, &f, &AbelianGroup::free(3), Output::Text).unwrap();
        assert!(out.starts_with("Cokernel: Z + Z/3\nProjection:\nMatrix (2x3)\n"));
    }

    #[test]
    fn smith_text() {
        let p = ValidPrime::new(2);
        let f = Matrix::from_vec(&[vec![0, 0, 1], vec![0, 1, 0], vec![1, 0, 0]]);
        expect![[r#"
            Rank: 3
            Matrix (3x3)
            1 0 0 
            0 1 0 
            0 0 1 
        "#]]
        .assert_eq(&smith(p, f, Output::Text).unwrap());
    }

    #[test]
    fn lift_json() {
        let p = ValidPrime::new(2);
        let y = AbelianGroup::new(0, vec![1, 3]);
        let f = Matrix::from_vec(&[vec![1, 4], vec![3, 0]]);
        let map = Matrix::from_vec(&[vec![1], vec![1]]);
        let out = lift(p, &f, &map, &y, Output::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["rows"], 1);
        assert_eq!(value["columns"], 2);
    }

    #[test]
    fn kernel_json() {
        let p = ValidPrime::new(5);
        let x = AbelianGroup::new(0, vec![1, 2]);
        let y = AbelianGroup::new(0, vec![2]);
        let f = Matrix::from_vec(&[vec![5, 2]]);
        let out = kernel(p, &f, &x, &y, Output::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["group"]["free_rank"], 0);
        assert_eq!(value["group"]["torsion"], serde_json::json!([1]));
        assert_eq!(value["maps_from"].as_array().unwrap().len(), 1);
    }
}
