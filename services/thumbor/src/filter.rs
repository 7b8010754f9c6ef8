use std::fmt::{self, Display, Formatter, Write};

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

use crate::constants::FILTERS_PREFIX;

/// A single scalar argument of a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterArg {
    /// A string argument, written verbatim.
    Str(String),
    /// An integer argument.
    Int(i64),
    /// A floating point argument.
    Float(f64),
    /// A boolean argument, written as `true` or `false`.
    Bool(bool),
}

impl Display for FilterArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FilterArg::Str(v) => f.write_str(v),
            FilterArg::Int(v) => write!(f, "{v}"),
            FilterArg::Float(v) => write_float(f, *v),
            FilterArg::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// Write a float the way javascript prints numbers.
///
/// Exponent notation is used below `1e-6` and from `1e21` on, with an
/// explicit `+` on positive exponents. Infinities print as `Infinity`.
fn write_float(f: &mut Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        return f.write_str("NaN");
    }
    if v.is_infinite() {
        return f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if v == 0.0 {
        // Covers `-0.0` too.
        return f.write_char('0');
    }

    let abs = v.abs();
    if !(1e-6..1e21).contains(&abs) {
        let exp = format!("{v:e}");
        return match exp.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                write!(f, "{mantissa}e+{exponent}")
            }
            _ => f.write_str(&exp),
        };
    }
    write!(f, "{v}")
}

impl From<&str> for FilterArg {
    fn from(v: &str) -> Self {
        FilterArg::Str(v.to_string())
    }
}

impl From<String> for FilterArg {
    fn from(v: String) -> Self {
        FilterArg::Str(v)
    }
}

impl From<bool> for FilterArg {
    fn from(v: bool) -> Self {
        FilterArg::Bool(v)
    }
}

impl From<f32> for FilterArg {
    fn from(v: f32) -> Self {
        FilterArg::Float(v as f64)
    }
}

impl From<f64> for FilterArg {
    fn from(v: f64) -> Self {
        FilterArg::Float(v)
    }
}

macro_rules! impl_filter_arg_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FilterArg {
                fn from(v: $t) -> Self {
                    FilterArg::Int(v as i64)
                }
            }
        )*
    };
}

impl_filter_arg_from_int!(i8, i16, i32, i64, u8, u16, u32);

/// The arguments of a filter.
///
/// Thumbor filters take an ordered list of arguments. They can be given
/// either as one pre-joined string (`"3,2"`) or as a list (`[3, 2]`), both
/// render the same `3,2`.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterArgs {
    /// Arguments already joined with `,`. Written verbatim.
    Raw(String),
    /// Arguments joined with `,` when written.
    List(Vec<FilterArg>),
}

impl Default for FilterArgs {
    fn default() -> Self {
        FilterArgs::List(Vec::new())
    }
}

impl FilterArgs {
    /// Check if there are no arguments at all.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterArgs::Raw(v) => v.is_empty(),
            FilterArgs::List(v) => v.is_empty(),
        }
    }
}

impl Display for FilterArgs {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FilterArgs::Raw(v) => f.write_str(v),
            FilterArgs::List(args) => {
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{arg}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for FilterArgs {
    fn from(v: &str) -> Self {
        FilterArgs::Raw(v.to_string())
    }
}

impl From<String> for FilterArgs {
    fn from(v: String) -> Self {
        FilterArgs::Raw(v)
    }
}

impl From<FilterArg> for FilterArgs {
    fn from(v: FilterArg) -> Self {
        FilterArgs::List(vec![v])
    }
}

impl<T: Into<FilterArg>> From<Vec<T>> for FilterArgs {
    fn from(v: Vec<T>) -> Self {
        FilterArgs::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FilterArg>, const N: usize> From<[T; N]> for FilterArgs {
    fn from(v: [T; N]) -> Self {
        FilterArgs::List(v.into_iter().map(Into::into).collect())
    }
}

macro_rules! impl_filter_args_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FilterArgs {
                fn from(v: $t) -> Self {
                    FilterArgs::List(vec![v.into()])
                }
            }
        )*
    };
}

impl_filter_args_from_scalar!(bool, f32, f64, i8, i16, i32, i64, u8, u16, u32);

/// A named thumbor filter, written as `name(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Name of the filter, for example `blur`.
    pub name: String,
    /// Arguments of the filter.
    pub args: FilterArgs,
}

impl Filter {
    /// Create a new filter.
    pub fn new(name: impl Into<String>, args: impl Into<FilterArgs>) -> Self {
        Self {
            name: name.into(),
            args: args.into(),
        }
    }
}

impl Display for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.args)
    }
}

/// An insertion ordered set of filters.
///
/// Filters are written to the url in the order they were inserted.
/// Inserting a name twice replaces the arguments but keeps the first position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters(Vec<Filter>);

impl Filters {
    /// Create an empty set of filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter and return self, for chaining.
    pub fn with(mut self, name: impl Into<String>, args: impl Into<FilterArgs>) -> Self {
        self.insert(name, args);
        self
    }

    /// Insert a filter, returning the previous arguments if the name existed.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        args: impl Into<FilterArgs>,
    ) -> Option<FilterArgs> {
        let name = name.into();
        let args = args.into();

        match self.0.iter_mut().find(|f| f.name == name) {
            Some(existing) => Some(std::mem::replace(&mut existing.args, args)),
            None => {
                self.0.push(Filter { name, args });
                None
            }
        }
    }

    /// Get the arguments of the filter with the given name.
    pub fn get(&self, name: &str) -> Option<&FilterArgs> {
        self.0.iter().find(|f| f.name == name).map(|f| &f.args)
    }

    /// Number of filters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no filter is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate filters in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Filters {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<FilterArgs>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Filters::new();
        for (name, args) in iter {
            filters.insert(name, args);
        }
        filters
    }
}

/// Encode filters into the `/filters:a(..):b(..)` url segment.
///
/// Returns an empty string if there are no filters.
pub fn encode_filters(filters: &Filters) -> String {
    if filters.is_empty() {
        return String::new();
    }

    let encoded = filters
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(":");
    format!("{FILTERS_PREFIX}{encoded}")
}

struct FilterArgVisitor;

impl<'de> Visitor<'de> for FilterArgVisitor {
    type Value = FilterArg;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number or bool filter argument")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(FilterArg::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(FilterArg::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        match i64::try_from(v) {
            Ok(v) => Ok(FilterArg::Int(v)),
            Err(_) => Ok(FilterArg::Float(v as f64)),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(FilterArg::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(FilterArg::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(FilterArg::Str(v))
    }
}

impl<'de> Deserialize<'de> for FilterArg {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FilterArgVisitor)
    }
}

struct FilterArgsVisitor;

impl<'de> Visitor<'de> for FilterArgsVisitor {
    type Value = FilterArgs;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a string, a scalar or a list of scalars")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        FilterArgVisitor.visit_bool(v).map(FilterArgs::from)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        FilterArgVisitor.visit_i64(v).map(FilterArgs::from)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        FilterArgVisitor.visit_u64(v).map(FilterArgs::from)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        FilterArgVisitor.visit_f64(v).map(FilterArgs::from)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(FilterArgs::Raw(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(FilterArgs::Raw(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(FilterArgs::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(FilterArgs::default())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut args = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(arg) = seq.next_element::<FilterArg>()? {
            args.push(arg);
        }
        Ok(FilterArgs::List(args))
    }
}

impl<'de> Deserialize<'de> for FilterArgs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FilterArgsVisitor)
    }
}

struct FiltersVisitor;

impl<'de> Visitor<'de> for FiltersVisitor {
    type Value = Filters;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a map of filter name to filter arguments")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut filters = Filters::new();
        while let Some((name, args)) = map.next_entry::<String, FilterArgs>()? {
            filters.insert(name, args);
        }
        Ok(filters)
    }
}

impl<'de> Deserialize<'de> for Filters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FiltersVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_filters() {
        assert_eq!(encode_filters(&Filters::new()), "");
    }

    #[test]
    fn test_string_and_list_args_are_equivalent() {
        let raw = Filters::new().with("blur", "3,2");
        let list = Filters::new().with("blur", [3, 2]);

        assert_eq!(encode_filters(&raw), "/filters:blur(3,2)");
        assert_eq!(encode_filters(&raw), encode_filters(&list));
    }

    #[test]
    fn test_filters_keep_insertion_order() {
        let filters = Filters::new()
            .with("blur", [3, 2])
            .with("grayscale", "")
            .with("brightness", -100);

        assert_eq!(
            encode_filters(&filters),
            "/filters:blur(3,2):grayscale():brightness(-100)"
        );
    }

    #[test]
    fn test_insert_existing_keeps_position() {
        let mut filters = Filters::new().with("blur", 1).with("quality", 80);
        let previous = filters.insert("blur", [3, 2]);

        assert_eq!(previous, Some(FilterArgs::from(1)));
        assert_eq!(filters.len(), 2);
        assert_eq!(
            encode_filters(&filters),
            "/filters:blur(3,2):quality(80)"
        );
    }

    #[test]
    fn test_mixed_scalar_list() {
        let filters = Filters::new().with(
            "watermark",
            vec![
                FilterArg::from("http:/www.abc.com/img.png"),
                FilterArg::from(-10),
                FilterArg::from(-11),
                FilterArg::from(15),
                FilterArg::from(25),
                FilterArg::from(20),
            ],
        );

        assert_eq!(
            encode_filters(&filters),
            "/filters:watermark(http:/www.abc.com/img.png,-10,-11,15,25,20)"
        );
    }

    #[test]
    fn test_empty_list_args() {
        let filters = Filters::new().with("grayscale", FilterArgs::default());
        assert_eq!(encode_filters(&filters), "/filters:grayscale()");
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(FilterArg::from(1.5).to_string(), "1.5");
        assert_eq!(FilterArg::from(3.0).to_string(), "3");
        assert_eq!(FilterArg::from(true).to_string(), "true");
        assert_eq!(FilterArgs::from("a, b").to_string(), "a, b");
    }

    #[test]
    fn test_float_display_uses_exponent_out_of_range() {
        assert_eq!(FilterArg::from(1e-7).to_string(), "1e-7");
        assert_eq!(FilterArg::from(1.5e-7).to_string(), "1.5e-7");
        assert_eq!(FilterArg::from(0.000001).to_string(), "0.000001");
        assert_eq!(FilterArg::from(1e21).to_string(), "1e+21");
        assert_eq!(FilterArg::from(-2.5e22).to_string(), "-2.5e+22");
        assert_eq!(FilterArg::from(1e20).to_string(), "100000000000000000000");
        assert_eq!(FilterArg::from(-0.0).to_string(), "0");
        assert_eq!(FilterArg::from(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(FilterArg::from(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn test_deserialize_exponent_floats() -> anyhow::Result<()> {
        let filters: Filters = serde_json::from_str(r#"{"x": 1e-7, "y": 1e21}"#)?;
        assert_eq!(encode_filters(&filters), "/filters:x(1e-7):y(1e+21)");
        Ok(())
    }

    #[test]
    fn test_from_iterator() {
        let filters: Filters = [("blur", "3,2"), ("grayscale", "")].into_iter().collect();
        assert_eq!(filters.get("blur"), Some(&FilterArgs::from("3,2")));
        assert!(filters.get("sharpen").is_none());
    }

    #[test]
    fn test_deserialize_filters_keep_order() -> anyhow::Result<()> {
        let filters: Filters = serde_json::from_str(
            r#"{"watermark": ["img.png", -10, 0.5, true], "grayscale": null, "brightness": -100, "blur": "3,2"}"#,
        )?;

        assert_eq!(
            encode_filters(&filters),
            "/filters:watermark(img.png,-10,0.5,true):grayscale():brightness(-100):blur(3,2)"
        );
        Ok(())
    }

    #[test]
    fn test_deserialize_rejects_nested_lists() {
        let result = serde_json::from_str::<Filters>(r#"{"blur": [[1, 2]]}"#);
        assert!(result.is_err());
    }
}
