// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

//! Polars interop. Integer columns become [`Scalar::Int`], floats
//! [`Scalar::Float`], booleans [`Scalar::Bool`]; everything else, temporal
//! types included, is cast to text and re-profiled downstream.

use crate::error::{DataError, Result};
use crate::tabular::{Row, Scalar, TabularResult};
use polars::prelude::*;
use rayon::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

pub fn from_dataframe(df: &DataFrame) -> Result<TabularResult> {
    let height = df.height();
    let columns: Vec<(String, Vec<Scalar>)> = df
        .get_columns()
        .par_iter()
        .map(|column| -> Result<(String, Vec<Scalar>)> {
            let series = column.as_materialized_series();
            let name = series.name().to_string();
            let values = series_values(series).map_err(|e| DataError::DataFrame {
                column: name.clone(),
                reason: e.to_string(),
            })?;
            Ok((name, values))
        })
        .collect::<Result<_>>()?;
    let names: Vec<String> = columns.iter().map(|(name, _)| name.clone()).collect();
    let rows = (0..height)
        .map(|i| {
            columns
                .iter()
                .map(|(name, values)| (name.clone(), values.get(i).cloned().unwrap_or_default()))
                .collect::<Row>()
        })
        .collect();
    debug!(rows = height, columns = names.len(), "converted dataframe");
    TabularResult::new(names, rows)
}

pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<TabularResult> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let df = CsvReader::new(file)
        .finish()
        .map_err(|e| DataError::DataFrame {
            column: path.display().to_string(),
            reason: e.to_string(),
        })?;
    from_dataframe(&df)
}

fn series_values(series: &Series) -> PolarsResult<Vec<Scalar>> {
    let dtype = series.dtype();
    let values = if matches!(dtype, DataType::Boolean) {
        series.bool()?.into_iter().map(Scalar::from).collect()
    } else if dtype.is_integer() {
        let cast = series.cast(&DataType::Int64)?;
        cast.i64()?.into_iter().map(Scalar::from).collect()
    } else if dtype.is_float() {
        let cast = series.cast(&DataType::Float64)?;
        cast.f64()?.into_iter().map(Scalar::from).collect()
    } else {
        let cast = series.cast(&DataType::String)?;
        cast.str()?.into_iter().map(Scalar::from).collect()
    };
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn dtypes_map_to_scalars() {
        let df = df!(
            "region" => ["North", "South"],
            "units" => [Some(3i32), None],
            "price" => [1.5f64, 2.0],
            "active" => [true, false],
        )
        .unwrap();
        let result = from_dataframe(&df).unwrap();
        assert_eq!(result.columns(), ["region", "units", "price", "active"]);
        let rows = result.rows();
        assert_eq!(rows[0]["region"], Scalar::from("North"));
        assert_eq!(rows[0]["units"], Scalar::Int(3));
        assert_eq!(rows[1]["units"], Scalar::Null);
        assert_eq!(rows[1]["price"], Scalar::Float(2.0));
        assert_eq!(rows[0]["active"], Scalar::Bool(true));
    }

    #[test]
    fn csv_file_loads_through_polars() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "category,total\nBooks,12\nGames,7").unwrap();
        let result = read_csv(file.path()).unwrap();
        assert_eq!(result.row_count(), 2);
        assert_eq!(result.rows()[1]["total"], Scalar::Int(7));
    }
}
