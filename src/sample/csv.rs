use ::csv;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use super::{Draw, Draws};

/// Errors raised while loading a numeric table from CSV. Distinct from the
/// estimation-side [`crate::err::InvalidInput`]: these describe a malformed
/// source, not a malformed request.
#[derive(Debug, Error)]
pub enum TableError {

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column {0}")]
    MissingColumn(String),

    #[error("Could not parse field of column {col} (line {line}) as a number")]
    BadNumber { col : String, line : usize },

    #[error("Record at line {line} disagrees with the header width")]
    Ragged { line : usize },

    #[error("No data records")]
    Empty

}

/// Parse CSV content into named f64 columns, preserving header order.
/// The first row is taken as the header; every following record must have
/// the same width and parse as numbers.
pub fn parse_columns(content : &str) -> Result<Vec<(String, Vec<f64>)>, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());
    let header : Vec<String> = reader.headers()?
        .iter()
        .map(|h| h.trim().to_string() )
        .collect();
    let mut cols : Vec<(String, Vec<f64>)> = header.iter()
        .map(|h| (h.clone(), Vec::new()) )
        .collect();
    for (ix, record) in reader.records().enumerate() {
        // Header occupies line 1; records start at line 2.
        let line = ix + 2;
        let record = record?;
        if record.len() != cols.len() {
            return Err(TableError::Ragged { line });
        }
        for (field, col) in record.iter().zip(cols.iter_mut()) {
            let val = field.trim().parse::<f64>()
                .map_err(|_| TableError::BadNumber { col : col.0.clone(), line } )?;
            col.1.push(val);
        }
    }
    if cols.is_empty() || cols[0].1.is_empty() {
        return Err(TableError::Empty);
    }
    Ok(cols)
}

/// Read a whole CSV file into named f64 columns.
pub fn load_columns<P>(path : P) -> Result<Vec<(String, Vec<f64>)>, TableError>
where
    P : AsRef<Path>
{
    let mut content = String::new();
    File::open(path)?.read_to_string(&mut content)?;
    parse_columns(&content)
}

fn find_column<'a>(cols : &'a [(String, Vec<f64>)], names : &[&str]) -> Option<&'a [f64]> {
    cols.iter()
        .find(|(n, _)| names.iter().any(|c| n.eq_ignore_ascii_case(c) ) )
        .map(|(_, v)| &v[..] )
}

/// Assemble a draw set from named columns. Columns may be labelled by role
/// (intercept, slope, noise_scale) or by the Stan parameter convention
/// (alpha, beta, sigma); matching ignores case.
pub fn draws_from_columns(cols : &[(String, Vec<f64>)]) -> Result<Draws, TableError> {
    let intercept = find_column(cols, &["intercept", "alpha"])
        .ok_or_else(|| TableError::MissingColumn("intercept".into()) )?;
    let slope = find_column(cols, &["slope", "beta"])
        .ok_or_else(|| TableError::MissingColumn("slope".into()) )?;
    let noise = find_column(cols, &["noise_scale", "sigma"])
        .ok_or_else(|| TableError::MissingColumn("noise_scale".into()) )?;
    let draws = intercept.iter().zip(slope.iter()).zip(noise.iter())
        .map(|((a, b), s)| Draw { intercept : *a, slope : *b, noise_scale : *s } )
        .collect();
    Ok(Draws::new(draws))
}

/// Load a posterior draw table from a CSV file.
pub fn load_draws<P>(path : P) -> Result<Draws, TableError>
where
    P : AsRef<Path>
{
    let cols = load_columns(path)?;
    draws_from_columns(&cols[..])
}

/// Load an observed (x, y) dataset for least-squares fitting.
pub fn load_xy<P>(path : P) -> Result<(Vec<f64>, Vec<f64>), TableError>
where
    P : AsRef<Path>
{
    let cols = load_columns(path)?;
    let x = find_column(&cols[..], &["x"])
        .ok_or_else(|| TableError::MissingColumn("x".into()) )?
        .to_vec();
    let y = find_column(&cols[..], &["y"])
        .ok_or_else(|| TableError::MissingColumn("y".into()) )?
        .to_vec();
    Ok((x, y))
}

#[test]
fn stan_convention_header() {
    let content = "alpha,beta,sigma\n0.1,2.0,1.0\n0.2,2.1,0.9\n";
    let cols = parse_columns(content).unwrap();
    let draws = draws_from_columns(&cols[..]).unwrap();
    assert_eq!(draws.len(), 2);
    let first = draws.iter().next().unwrap();
    assert_eq!(first.intercept, 0.1);
    assert_eq!(first.slope, 2.0);
    assert_eq!(first.noise_scale, 1.0);
}

#[test]
fn missing_column_reported() {
    let content = "alpha,sigma\n0.1,1.0\n";
    let cols = parse_columns(content).unwrap();
    match draws_from_columns(&cols[..]) {
        Err(TableError::MissingColumn(name)) => assert_eq!(name, "slope"),
        other => panic!("{:?}", other)
    }
}

#[test]
fn malformed_field_reported() {
    let content = "x,y\n0,0.2\n1,oops\n";
    match parse_columns(content) {
        Err(TableError::BadNumber { col, line }) => {
            assert_eq!(col, "y");
            assert_eq!(line, 3);
        },
        other => panic!("{:?}", other)
    }
}

#[test]
fn ragged_record_reported() {
    let content = "x,y\n0,0.2\n1\n";
    assert!(matches!(parse_columns(content), Err(TableError::Ragged { line : 3 })));
}

#[test]
fn header_only_is_empty() {
    assert!(matches!(parse_columns("x,y\n"), Err(TableError::Empty)));
}
