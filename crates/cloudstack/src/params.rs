//! Parameter bags and their URL serialization.
//!
//! Every command takes a parameter struct declared with `cloudstack_params!`.
//! Required parameters are constructor arguments, optional ones are set with
//! `with_<name>` builders, and [`ToParams`] flattens the struct into a
//! [`ParamSet`] of wire keys and string values.
//!
//! ```rust,ignore
//! use cloudstack::services::role::CreateRoleParams;
//! use cloudstack::params::ToParams;
//!
//! let params = CreateRoleParams::new("operators", "DomainAdmin")
//!     .with_description("Day-to-day operations");
//! assert_eq!(params.to_params().get("type"), Some("DomainAdmin"));
//! ```

use std::collections::btree_map;
use std::collections::BTreeMap;

/// A flat, key-sorted set of request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSet {
    values: BTreeMap<String, String>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates parameters in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.values.iter()
    }

    /// Owned key/value pairs in key order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParamSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = ParamSet::new();
        params.extend(iter);
        params
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for ParamSet {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl IntoIterator for ParamSet {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParamSet {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Anything that can be flattened into request parameters.
pub trait ToParams {
    fn to_params(&self) -> ParamSet;
}

impl ToParams for ParamSet {
    fn to_params(&self) -> ParamSet {
        self.clone()
    }
}

/// A value that knows how to write itself under a wire key.
///
/// Empty strings, lists and maps write nothing.
pub trait ParamValue {
    fn write_param(&self, key: &str, params: &mut ParamSet);
}

impl ParamValue for String {
    fn write_param(&self, key: &str, params: &mut ParamSet) {
        if !self.is_empty() {
            params.set(key, self.as_str());
        }
    }
}

impl ParamValue for bool {
    fn write_param(&self, key: &str, params: &mut ParamSet) {
        params.set(key, self.to_string());
    }
}

impl ParamValue for i64 {
    fn write_param(&self, key: &str, params: &mut ParamSet) {
        params.set(key, self.to_string());
    }
}

impl ParamValue for i32 {
    fn write_param(&self, key: &str, params: &mut ParamSet) {
        params.set(key, self.to_string());
    }
}

impl ParamValue for Vec<String> {
    fn write_param(&self, key: &str, params: &mut ParamSet) {
        if !self.is_empty() {
            params.set(key, self.join(","));
        }
    }
}

/// A map sent as `name[i].key=<k>` / `name[i].value=<v>` pairs.
///
/// Used for `tags`, `iptonetworklist` and similar list-of-pairs parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValueMap(pub BTreeMap<String, String>);

impl ParamValue for KeyValueMap {
    fn write_param(&self, key: &str, params: &mut ParamSet) {
        for (i, (k, v)) in self.0.iter().enumerate() {
            params.set(format!("{}[{}].key", key, i), k.as_str());
            params.set(format!("{}[{}].value", key, i), v.as_str());
        }
    }
}

/// A map sent as `name[i].<k>=<v>`.
///
/// Used for `details`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailsMap(pub BTreeMap<String, String>);

impl ParamValue for DetailsMap {
    fn write_param(&self, key: &str, params: &mut ParamSet) {
        for (i, (k, v)) in self.0.iter().enumerate() {
            params.set(format!("{}[{}].{}", key, i, k), v.as_str());
        }
    }
}

macro_rules! impl_map_conversions {
    ($map:ident) => {
        impl From<BTreeMap<String, String>> for $map {
            fn from(map: BTreeMap<String, String>) -> Self {
                $map(map)
            }
        }

        impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for $map {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                $map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
            }
        }

        impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for $map {
            fn from(pairs: [(K, V); N]) -> Self {
                pairs.into_iter().collect()
            }
        }
    };
}

impl_map_conversions!(KeyValueMap);
impl_map_conversions!(DetailsMap);

/// Declares a command parameter struct.
///
/// ```rust,ignore
/// cloudstack_params! {
///     /// Parameters for `deleteRole`.
///     DeleteRoleParams {
///         required { id: String => "id" }
///         optional {}
///     }
/// }
/// ```
macro_rules! cloudstack_params {
    (
        $(#[$meta:meta])*
        $name:ident {
            required { $($req:ident: $req_ty:ty => $req_key:literal),* $(,)? }
            optional { $($opt:ident: $opt_ty:ty => $opt_key:literal),* $(,)? }
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $($req: $req_ty,)*
            $($opt: Option<$opt_ty>,)*
        }

        impl $name {
            /// Creates the parameter set with every required parameter.
            #[allow(clippy::too_many_arguments, clippy::needless_update)]
            pub fn new($($req: impl Into<$req_ty>),*) -> Self {
                Self {
                    $($req: $req.into(),)*
                    ..Default::default()
                }
            }

            ::paste::paste! {
                $(
                    #[doc = concat!("Sets the `", $req_key, "` parameter.")]
                    pub fn [<with_ $req>](mut self, value: impl Into<$req_ty>) -> Self {
                        self.$req = value.into();
                        self
                    }
                )*
                $(
                    #[doc = concat!("Sets the `", $opt_key, "` parameter.")]
                    pub fn [<with_ $opt>](mut self, value: impl Into<$opt_ty>) -> Self {
                        self.$opt = Some(value.into());
                        self
                    }
                )*
            }
        }

        impl $crate::params::ToParams for $name {
            fn to_params(&self) -> $crate::params::ParamSet {
                #[allow(unused_mut)]
                let mut params = $crate::params::ParamSet::new();
                $(
                    $crate::params::ParamValue::write_param(&self.$req, $req_key, &mut params);
                )*
                $(
                    if let Some(value) = &self.$opt {
                        $crate::params::ParamValue::write_param(value, $opt_key, &mut params);
                    }
                )*
                params
            }
        }
    };
}
