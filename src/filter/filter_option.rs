use std::collections::BTreeMap;
use std::fmt;
use crate::my_err::MyError;
use super::FilterKind;

pub trait Parceable {
    fn try_from_string(string: &str) -> Result<Self, String> where Self: Sized;
    fn content_to_string(&self) -> String;
}

impl Parceable for f64 {
    fn try_from_string(string: &str) -> Result<Self, String> {
        let val = string.trim().parse::<f64>().map_err(|_| format!("'{}' is not a number", string))?;
        if !val.is_finite() {
            return Err(format!("'{}' is not a finite number", string));
        }
        Ok(val)
    }

    fn content_to_string(&self) -> String { format!("{}", self) }
}

impl Parceable for usize {
    fn try_from_string(string: &str) -> Result<Self, String> {
        string.trim().parse::<usize>().map_err(|_| format!("'{}' is not a non-negative integer", string))
    }

    fn content_to_string(&self) -> String { format!("{}", self) }
}

impl Parceable for bool {
    fn try_from_string(string: &str) -> Result<Self, String> {
        match string.trim() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            other => Err(format!("'{}' is not 'true' or 'false'", other)),
        }
    }

    fn content_to_string(&self) -> String { format!("{}", self) }
}


/// Parameter mapping of one chain step, `key -> textual value`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    values: BTreeMap<String, String>,
}

impl FilterParams {
    pub fn new() -> Self { Self::default() }

    pub fn with<V: fmt::Display>(mut self, key: &str, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert<V: fmt::Display>(&mut self, key: &str, value: V) {
        self.values.insert(key.trim().to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize { self.values.len() }
    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Rejects keys the filter doesn't know, so a typo doesn't silently fall back to a default.
    pub fn check_known_keys(&self, kind: FilterKind, known: &[&str]) -> Result<(), MyError> {
        for key in self.values.keys() {
            if !known.contains(&key.as_str()) {
                return Err(param_err(kind, key, format!("unknown parameter, expected one of {:?}", known)));
            }
        }
        Ok(())
    }

    pub fn get_opt<T: Parceable>(&self, kind: FilterKind, key: &str) -> Result<Option<T>, MyError> {
        match self.get(key) {
            Some(string) => T::try_from_string(string)
                .map(Some)
                .map_err(|msg| param_err(kind, key, msg)),
            None => Ok(None),
        }
    }

    pub fn get_or<T: Parceable>(&self, kind: FilterKind, key: &str, default: T) -> Result<T, MyError> {
        Ok(self.get_opt(kind, key)?.unwrap_or(default))
    }

    /// Renders as `key: value` lines.
    pub fn content_to_string(&self) -> String {
        self.values.iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<String>>()
            .join("\n")
    }
}

impl fmt::Display for FilterParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.values.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, "{}", pairs.join(", "))
    }
}

pub fn param_err(kind: FilterKind, param: &str, msg: String) -> MyError {
    MyError::InvalidFilterParam { filter: kind.name().to_string(), param: param.to_string(), msg }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters() {
        let params = FilterParams::new().with("gamma", 0.5).with("outer", "true").with("width", 3);
        let kind = FilterKind::GammaTransform;
        assert_eq!(params.get_or(kind, "gamma", 1.0).unwrap(), 0.5);
        assert_eq!(params.get_or(kind, "outer", false).unwrap(), true);
        assert_eq!(params.get_or(kind, "width", 0_usize).unwrap(), 3);
        assert_eq!(params.get_or(kind, "missing", 7_usize).unwrap(), 7);
    }

    #[test]
    fn bad_value_names_filter_and_param() {
        let params = FilterParams::new().with("gamma", "fast");
        match params.get_or(FilterKind::GammaTransform, "gamma", 1.0) {
            Err(MyError::InvalidFilterParam { filter, param, .. }) => {
                assert_eq!(filter, "Gamma Transform");
                assert_eq!(param, "gamma");
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let params = FilterParams::new().with("gama", 2);
        assert!(params.check_known_keys(FilterKind::GammaTransform, &["gamma"]).is_err());
        assert!(FilterParams::new().check_known_keys(FilterKind::GammaTransform, &["gamma"]).is_ok());
    }

    #[test]
    fn renders_key_value_lines() {
        let params = FilterParams::new().with("b", 2).with("a", 1);
        assert_eq!(params.content_to_string(), "a: 1\nb: 2");
    }
}
