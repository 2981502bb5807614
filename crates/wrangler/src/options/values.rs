use crate::{metadata::OptionCategory, options::error::OptionError};
use chrono_tz::Tz;
use model::core::data_type::DataType;
use serde::Serialize;
use std::{fmt, str::FromStr};

/// A typed option read from a metadata block or supplied by a caller.
pub trait OptionValue: Sized {
    const CATEGORY: OptionCategory;

    fn from_toml(value: &toml::Value) -> Result<Self, OptionError>;

    /// Empty values never override anything.
    fn is_empty(&self) -> bool;
}

/// Columns promoted to the frame index, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexCol(pub Vec<String>);

impl IndexCol {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IndexCol(columns.into_iter().map(Into::into).collect())
    }

    pub fn columns(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for IndexCol {
    fn from(column: &str) -> Self {
        IndexCol(vec![column.to_string()])
    }
}

impl OptionValue for IndexCol {
    const CATEGORY: OptionCategory = OptionCategory::IndexCol;

    fn from_toml(value: &toml::Value) -> Result<Self, OptionError> {
        match value {
            toml::Value::String(column) => Ok(IndexCol(vec![column.clone()])),
            toml::Value::Array(items) => string_list(items, Self::CATEGORY).map(IndexCol),
            // `[index_col]` section: every string or string list, in order
            toml::Value::Table(table) => {
                let mut columns = Vec::new();
                for (key, item) in table {
                    match item {
                        toml::Value::String(column) => columns.push(column.clone()),
                        toml::Value::Array(items) => {
                            columns.extend(string_list(items, Self::CATEGORY)?)
                        }
                        other => {
                            return Err(OptionError::invalid(
                                Self::CATEGORY,
                                format!("'{key}' must name columns, got {}", other.type_str()),
                            ));
                        }
                    }
                }
                Ok(IndexCol(columns))
            }
            other => Err(OptionError::invalid(
                Self::CATEGORY,
                format!("expected a column name or list, got {}", other.type_str()),
            )),
        }
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EpochUnit {
    Days,
    Seconds,
    Millis,
    Micros,
    Nanos,
}

impl EpochUnit {
    /// Nanoseconds per unit.
    pub fn nanos(&self) -> i64 {
        match self {
            EpochUnit::Days => 86_400 * 1_000_000_000,
            EpochUnit::Seconds => 1_000_000_000,
            EpochUnit::Millis => 1_000_000,
            EpochUnit::Micros => 1_000,
            EpochUnit::Nanos => 1,
        }
    }
}

impl FromStr for EpochUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "D" | "d" => Ok(EpochUnit::Days),
            "s" => Ok(EpochUnit::Seconds),
            "ms" => Ok(EpochUnit::Millis),
            "us" => Ok(EpochUnit::Micros),
            "ns" => Ok(EpochUnit::Nanos),
            other => Err(other.to_string()),
        }
    }
}

/// How the values of a date column are read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DateFormat {
    /// Guess from the values: epoch seconds for numbers, common ISO layouts
    /// for text.
    Infer,
    /// A chrono `strftime` pattern.
    Strftime(String),
    /// Numbers counted from the Unix epoch.
    Unit(EpochUnit),
}

impl DateFormat {
    /// Unit names (`s`, `ms`, `us`, `ns`, `D`) select epoch parsing, any
    /// other text is a strftime pattern.
    pub fn from_spec(spec: &str) -> Self {
        match spec.parse::<EpochUnit>() {
            Ok(unit) => DateFormat::Unit(unit),
            Err(_) => DateFormat::Strftime(spec.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateColumn {
    pub column: String,
    pub format: DateFormat,
    /// Produce zone-aware UTC values; naive inputs are taken as UTC.
    pub utc: bool,
}

impl DateColumn {
    pub fn new(column: &str, format: DateFormat) -> Self {
        DateColumn {
            column: column.to_string(),
            format,
            utc: false,
        }
    }

    pub fn utc(mut self) -> Self {
        self.utc = true;
        self
    }

    fn from_table(column: &str, table: &toml::Table) -> Result<Self, OptionError> {
        let category = OptionCategory::ParseDates;
        let format = match (table.get("format"), table.get("unit")) {
            (Some(_), Some(_)) => {
                return Err(OptionError::invalid(
                    category,
                    format!("'{column}' sets both format and unit"),
                ));
            }
            (Some(toml::Value::String(fmt)), None) => DateFormat::from_spec(fmt),
            (None, Some(toml::Value::String(unit))) => {
                DateFormat::Unit(unit.parse::<EpochUnit>().map_err(|u| {
                    OptionError::invalid(category, format!("unknown epoch unit '{u}'"))
                })?)
            }
            (None, None) => DateFormat::Infer,
            _ => {
                return Err(OptionError::invalid(
                    category,
                    format!("'{column}' format and unit must be strings"),
                ));
            }
        };

        let utc = match table.get("utc") {
            None => false,
            Some(toml::Value::Boolean(flag)) => *flag,
            Some(other) => {
                return Err(OptionError::invalid(
                    category,
                    format!("'{column}' utc must be a boolean, got {}", other.type_str()),
                ));
            }
        };

        Ok(DateColumn {
            column: column.to_string(),
            format,
            utc,
        })
    }
}

/// Columns to convert to timestamps after the fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseDates(pub Vec<DateColumn>);

impl ParseDates {
    /// Columns whose format is inferred.
    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ParseDates(
            columns
                .into_iter()
                .map(|c| DateColumn::new(c.as_ref(), DateFormat::Infer))
                .collect(),
        )
    }

    pub fn push(&mut self, column: DateColumn) {
        self.0.push(column);
    }

    pub fn iter(&self) -> impl Iterator<Item = &DateColumn> {
        self.0.iter()
    }

    pub fn get(&self, column: &str) -> Option<&DateColumn> {
        self.0.iter().find(|c| c.column == column)
    }
}

impl OptionValue for ParseDates {
    const CATEGORY: OptionCategory = OptionCategory::ParseDates;

    fn from_toml(value: &toml::Value) -> Result<Self, OptionError> {
        match value {
            toml::Value::String(column) => Ok(ParseDates::columns([column])),
            toml::Value::Array(items) => {
                string_list(items, Self::CATEGORY).map(ParseDates::columns)
            }
            toml::Value::Table(table) => {
                let mut dates = ParseDates::default();
                for (column, spec) in table {
                    match spec {
                        toml::Value::String(format) => {
                            dates.push(DateColumn::new(column, DateFormat::from_spec(format)))
                        }
                        toml::Value::Boolean(true) => {
                            dates.push(DateColumn::new(column, DateFormat::Infer))
                        }
                        toml::Value::Boolean(false) => {}
                        // `[parse_dates]` section holding `columns = [...]`
                        toml::Value::Array(items) => {
                            for name in string_list(items, Self::CATEGORY)? {
                                dates.push(DateColumn::new(&name, DateFormat::Infer));
                            }
                        }
                        toml::Value::Table(options) => {
                            dates.push(DateColumn::from_table(column, options)?)
                        }
                        other => {
                            return Err(OptionError::invalid(
                                Self::CATEGORY,
                                format!(
                                    "'{column}' must be a format, flag or table, got {}",
                                    other.type_str()
                                ),
                            ));
                        }
                    }
                }
                Ok(dates)
            }
            other => Err(OptionError::invalid(
                Self::CATEGORY,
                format!("expected a column list or table, got {}", other.type_str()),
            )),
        }
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Target dtypes per column, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DtypeMap(pub Vec<(String, DataType)>);

impl DtypeMap {
    pub fn insert(&mut self, column: &str, dtype: DataType) {
        match self.0.iter_mut().find(|(c, _)| c == column) {
            Some(entry) => entry.1 = dtype,
            None => self.0.push((column.to_string(), dtype)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&DataType> {
        self.0.iter().find(|(c, _)| c == column).map(|(_, t)| t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataType)> {
        self.0.iter().map(|(c, t)| (c.as_str(), t))
    }

    /// Parses `column -> dtype name` pairs.
    pub fn parse<'a, I>(pairs: I) -> Result<Self, OptionError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut map = DtypeMap::default();
        for (column, name) in pairs {
            let dtype = name.parse::<DataType>().map_err(|source| OptionError::Dtype {
                column: column.to_string(),
                source,
            })?;
            map.insert(column, dtype);
        }
        Ok(map)
    }
}

impl OptionValue for DtypeMap {
    const CATEGORY: OptionCategory = OptionCategory::Dtype;

    fn from_toml(value: &toml::Value) -> Result<Self, OptionError> {
        let toml::Value::Table(table) = value else {
            return Err(OptionError::invalid(
                Self::CATEGORY,
                format!("expected a column to dtype table, got {}", value.type_str()),
            ));
        };

        let mut pairs = Vec::with_capacity(table.len());
        for (column, dtype) in table {
            let toml::Value::String(name) = dtype else {
                return Err(OptionError::invalid(
                    Self::CATEGORY,
                    format!("dtype of '{column}' must be a string"),
                ));
            };
            pairs.push((column.as_str(), name.as_str()));
        }
        DtypeMap::parse(pairs)
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Zone that zone-aware results are converted to after the fetch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Timezone(pub Tz);

impl FromStr for Timezone {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<Tz>()
            .map(Timezone)
            .map_err(|_| OptionError::UnknownTimezone(s.to_string()))
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.name())
    }
}

impl OptionValue for Timezone {
    const CATEGORY: OptionCategory = OptionCategory::Timezone;

    fn from_toml(value: &toml::Value) -> Result<Self, OptionError> {
        match value {
            toml::Value::String(zone) => zone.parse(),
            toml::Value::Table(table) => match table.get("timezone").or_else(|| table.get("tz")) {
                Some(toml::Value::String(zone)) => zone.parse(),
                _ => Err(OptionError::invalid(
                    Self::CATEGORY,
                    "section needs a 'timezone' string",
                )),
            },
            other => Err(OptionError::invalid(
                Self::CATEGORY,
                format!("expected a zone name, got {}", other.type_str()),
            )),
        }
    }

    fn is_empty(&self) -> bool {
        false
    }
}

fn string_list(items: &[toml::Value], category: OptionCategory) -> Result<Vec<String>, OptionError> {
    items
        .iter()
        .map(|item| match item {
            toml::Value::String(s) => Ok(s.clone()),
            other => Err(OptionError::invalid(
                category,
                format!("expected column names, got {}", other.type_str()),
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> toml::Value {
        let table: toml::Table = toml::from_str(text).unwrap();
        toml::Value::Table(table)
    }

    #[test]
    fn test_index_col_shapes() {
        let doc = parse(r#"a = "id"
b = ["region", "id"]
c = { columns = ["x", "y"] }"#);
        assert_eq!(IndexCol::from_toml(&doc["a"]).unwrap(), IndexCol::from("id"));
        assert_eq!(
            IndexCol::from_toml(&doc["b"]).unwrap(),
            IndexCol::new(["region", "id"])
        );
        assert_eq!(IndexCol::from_toml(&doc["c"]).unwrap(), IndexCol::new(["x", "y"]));
        assert!(IndexCol::from_toml(&toml::Value::Integer(1)).is_err());
    }

    #[test]
    fn test_parse_dates_list_and_table() {
        let doc = parse(
            r#"
list = ["created_at", "updated_at"]

[table]
created_at = "%d/%m/%Y"
seen = "s"
flag = true
skipped = false
stamp = { format = "%Y-%m-%d %H:%M", utc = true }
"#,
        );

        let list = ParseDates::from_toml(&doc["list"]).unwrap();
        assert_eq!(list, ParseDates::columns(["created_at", "updated_at"]));

        let table = ParseDates::from_toml(&doc["table"]).unwrap();
        assert_eq!(
            table.0,
            vec![
                DateColumn::new("created_at", DateFormat::Strftime("%d/%m/%Y".into())),
                DateColumn::new("seen", DateFormat::Unit(EpochUnit::Seconds)),
                DateColumn::new("flag", DateFormat::Infer),
                DateColumn::new("stamp", DateFormat::Strftime("%Y-%m-%d %H:%M".into())).utc(),
            ]
        );
    }

    #[test]
    fn test_parse_dates_rejects_format_and_unit_together() {
        let doc = parse(r#"t = { c = { format = "%Y", unit = "s" } }"#);
        assert!(matches!(
            ParseDates::from_toml(&doc["t"]),
            Err(OptionError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_dtype_map() {
        let doc = parse(r#"d = { score = "float32", id = "Int64", at = "datetime64[ns, UTC]" }"#);
        let map = DtypeMap::from_toml(&doc["d"]).unwrap();

        assert_eq!(map.get("score"), Some(&DataType::Float32));
        assert_eq!(map.get("id"), Some(&DataType::Int64));
        assert_eq!(map.get("at"), Some(&DataType::TimestampTz(chrono_tz::UTC)));
        assert_eq!(
            map.iter().map(|(c, _)| c).collect::<Vec<_>>(),
            vec!["score", "id", "at"]
        );
    }

    #[test]
    fn test_dtype_unknown_name() {
        let doc = parse(r#"d = { score = "decimal128" }"#);
        assert!(matches!(
            DtypeMap::from_toml(&doc["d"]),
            Err(OptionError::Dtype { column, .. }) if column == "score"
        ));
    }

    #[test]
    fn test_timezone_shapes() {
        let doc = parse(r#"a = "America/Chicago"
b = { timezone = "Europe/Paris" }
c = { tz = "UTC" }
d = "Mars/Olympus""#);
        assert_eq!(Timezone::from_toml(&doc["a"]).unwrap().0, chrono_tz::America::Chicago);
        assert_eq!(Timezone::from_toml(&doc["b"]).unwrap().0, chrono_tz::Europe::Paris);
        assert_eq!(Timezone::from_toml(&doc["c"]).unwrap().0, chrono_tz::UTC);
        assert_eq!(
            Timezone::from_toml(&doc["d"]),
            Err(OptionError::UnknownTimezone("Mars/Olympus".into()))
        );
    }

    #[test]
    fn test_date_format_from_spec() {
        assert_eq!(DateFormat::from_spec("ms"), DateFormat::Unit(EpochUnit::Millis));
        assert_eq!(DateFormat::from_spec("D"), DateFormat::Unit(EpochUnit::Days));
        assert_eq!(
            DateFormat::from_spec("%Y%m%d"),
            DateFormat::Strftime("%Y%m%d".into())
        );
    }
}
