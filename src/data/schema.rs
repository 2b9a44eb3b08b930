//! Column names and typed column access shared by the loader, processor
//! and statistics code.

use polars::prelude::*;

pub const COL_NAME: &str = "Name";
pub const COL_COUNTRY: &str = "Country";
pub const COL_GENDER: &str = "Gender";
pub const COL_REGION: &str = "Region";
pub const COL_SECTOR: &str = "Sector";
pub const COL_MVP: &str = "MVP?";
pub const COL_UNDER_TWO_YEARS: &str = "<2 years?";
pub const COL_STAGE: &str = "Stage";
pub const COL_FUND_LEVEL: &str = "Fund level";
pub const COL_TRACTION: &str = "Have Traction?";
pub const COL_TYPE: &str = "Type";
/// Label column written by the classify stage.
pub const COL_ROCKET_TYPE: &str = "rocket_type";
/// Canonical label column.
pub const COL_FINAL_LABEL: &str = "Final Label";
pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";

/// Input columns the pipeline and reports know how to use.
pub const RECOGNIZED_COLUMNS: [&str; 13] = [
    COL_NAME,
    COL_COUNTRY,
    COL_GENDER,
    COL_REGION,
    COL_SECTOR,
    COL_MVP,
    COL_UNDER_TWO_YEARS,
    COL_STAGE,
    COL_FUND_LEVEL,
    COL_TRACTION,
    COL_TYPE,
    COL_ROCKET_TYPE,
    COL_FINAL_LABEL,
];

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

/// Read a column as text, one entry per row. Nulls stay `None`.
pub fn string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

/// Read a column as `f64`, one entry per row. Unparseable cells become `None`.
pub fn float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    let values = column.f64()?.into_iter().collect();
    Ok(values)
}

/// Like [`float_values`], but `None` when the cast would drop any non-null
/// cell (e.g. a text column holding `"n/a"`).
pub fn lossless_float_values(df: &DataFrame, name: &str) -> PolarsResult<Option<Vec<Option<f64>>>> {
    let column = df.column(name)?;
    let cast = column.cast(&DataType::Float64)?;
    if cast.null_count() > column.null_count() {
        return Ok(None);
    }
    Ok(Some(cast.f64()?.into_iter().collect()))
}

/// Column values when the column exists, otherwise `None`.
pub fn optional_string_values(
    df: &DataFrame,
    name: &str,
) -> PolarsResult<Option<Vec<Option<String>>>> {
    if has_column(df, name) {
        string_values(df, name).map(Some)
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_text_and_numbers_with_nulls() {
        let df = df!(
            "Country" => [Some("France"), None],
            "latitude" => [Some(1.5), None],
        )
        .unwrap();

        assert!(has_column(&df, COL_COUNTRY));
        assert!(!has_column(&df, COL_TYPE));
        assert_eq!(
            string_values(&df, COL_COUNTRY).unwrap(),
            vec![Some("France".to_string()), None]
        );
        assert_eq!(float_values(&df, COL_LATITUDE).unwrap(), vec![Some(1.5), None]);
        assert!(optional_string_values(&df, COL_SECTOR).unwrap().is_none());
    }

    #[test]
    fn lossy_float_cast_is_detected() {
        let df = df!(
            "latitude" => [Some("46.2"), None],
            "longitude" => [Some("east"), Some("2.5")],
        )
        .unwrap();

        assert_eq!(
            lossless_float_values(&df, COL_LATITUDE).unwrap(),
            Some(vec![Some(46.2), None])
        );
        assert_eq!(lossless_float_values(&df, COL_LONGITUDE).unwrap(), None);
    }

    #[test]
    fn numeric_columns_are_read_as_text() {
        let df = df!("Fund level" => [1i64, 2]).unwrap();
        assert_eq!(
            string_values(&df, COL_FUND_LEVEL).unwrap(),
            vec![Some("1".to_string()), Some("2".to_string())]
        );
    }
}
