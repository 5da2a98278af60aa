//! Column layout expected by the classifier.
//!
//! The shipped model was trained on 87 dataset columns. Only a few of them
//! can be computed from a URL string; the rest (page content, WHOIS, traffic
//! rank) are always filled with zero. Zero is not "unknown": the filled
//! columns pull predictions toward whichever class zero favours. A model
//! trained with a different column set must ship its own layout.

use std::collections::HashSet;

use crate::error::{DetectError, Result};
use crate::features::FeatureVector;

/// Training columns of the shipped model, in dataset order.
pub const TRAINING_FEATURES: [&str; 87] = [
    "length_url",
    "length_hostname",
    "ip",
    "nb_dots",
    "nb_hyphens",
    "nb_at",
    "nb_qm",
    "nb_and",
    "nb_or",
    "nb_eq",
    "nb_underscore",
    "nb_tilde",
    "nb_percent",
    "nb_slash",
    "nb_star",
    "nb_colon",
    "nb_comma",
    "nb_semicolumn",
    "nb_dollar",
    "nb_space",
    "nb_www",
    "nb_com",
    "nb_dslash",
    "http_in_path",
    "https_token",
    "ratio_digits_url",
    "ratio_digits_host",
    "punycode",
    "port",
    "tld_in_path",
    "tld_in_subdomain",
    "abnormal_subdomain",
    "nb_subdomains",
    "prefix_suffix",
    "random_domain",
    "shortening_service",
    "path_extension",
    "nb_redirection",
    "nb_external_redirection",
    "length_words_raw",
    "char_repeat",
    "shortest_words_raw",
    "shortest_word_host",
    "shortest_word_path",
    "longest_words_raw",
    "longest_word_host",
    "longest_word_path",
    "avg_words_raw",
    "avg_word_host",
    "avg_word_path",
    "phish_hints",
    "domain_in_brand",
    "brand_in_subdomain",
    "brand_in_path",
    "suspecious_tld",
    "statistical_report",
    "nb_hyperlinks",
    "ratio_intHyperlinks",
    "ratio_extHyperlinks",
    "ratio_nullHyperlinks",
    "nb_extCSS",
    "ratio_intRedirection",
    "ratio_extRedirection",
    "ratio_intErrors",
    "ratio_extErrors",
    "login_form",
    "external_favicon",
    "links_in_tags",
    "submit_email",
    "ratio_intMedia",
    "ratio_extMedia",
    "sfh",
    "iframe",
    "popup_window",
    "safe_anchor",
    "onmouseover",
    "right_clic",
    "empty_title",
    "domain_in_title",
    "domain_with_copyright",
    "whois_registered_domain",
    "domain_registration_length",
    "domain_age",
    "web_traffic",
    "dns_record",
    "google_index",
    "page_rank",
];

/// Value used for every layout column the feature vector lacks.
pub const MISSING_FEATURE_VALUE: f32 = 0.0;

/// Ordered, duplicate-free list of feature names a classifier consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureLayout {
    names: Vec<String>,
}

impl FeatureLayout {
    /// The layout of the shipped model.
    pub fn training() -> Self {
        Self {
            names: TRAINING_FEATURES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(DetectError::Config("feature layout is empty".into()));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if name.trim().is_empty() {
                return Err(DetectError::Config("feature layout has an empty name".into()));
            }
            if !seen.insert(name.as_str()) {
                return Err(DetectError::Config(format!(
                    "feature layout lists {name:?} twice"
                )));
            }
        }

        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// One row in layout order, zero-filling absent features.
    ///
    /// Features outside the layout are dropped.
    pub fn align(&self, features: &FeatureVector) -> Vec<f32> {
        self.names
            .iter()
            .map(|name| features.get(name).unwrap_or(MISSING_FEATURE_VALUE))
            .collect()
    }

    /// Layout columns the vector does not provide.
    pub fn missing<'a>(&'a self, features: &FeatureVector) -> Vec<&'a str> {
        self.names
            .iter()
            .filter(|name| !features.contains(name))
            .map(String::as_str)
            .collect()
    }

    /// Features the vector provides that the layout ignores.
    pub fn unused<'f>(&self, features: &'f FeatureVector) -> Vec<&'f str> {
        features
            .names()
            .filter(|name| !self.names.iter().any(|n| n.as_str() == *name))
            .collect()
    }
}

impl Default for FeatureLayout {
    fn default() -> Self {
        Self::training()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract_features;

    #[test]
    fn training_layout_is_unique() {
        let layout = FeatureLayout::training();
        assert_eq!(layout.len(), 87);
        assert!(FeatureLayout::from_names(TRAINING_FEATURES).is_ok());
        assert_eq!(layout.names()[0], "length_url");
        assert_eq!(layout.names()[86], "page_rank");
    }

    #[test]
    fn extracted_features_land_in_their_columns() {
        let features = extract_features("http://192.168.1.1/login");
        let layout = FeatureLayout::training();
        let row = layout.align(&features);
        assert_eq!(row.len(), 87);

        let col = |name: &str| layout.names().iter().position(|n| n == name).unwrap();
        assert_eq!(row[col("ip")], 1.0);
        assert_eq!(row[col("phish_hints")], 1.0);
        assert_eq!(row[col("length_url")], 24.0);
        assert_eq!(row[col("page_rank")], 0.0);
        assert_eq!(row[col("nb_star")], 0.0);
    }

    #[test]
    fn alignment_is_deterministic() {
        let features = extract_features("https://secure-update.example.com/a?b=c");
        let layout = FeatureLayout::training();
        assert_eq!(layout.align(&features), layout.align(&features));
    }

    #[test]
    fn gaps_are_reported() {
        let features = extract_features("https://example.com/");
        let layout = FeatureLayout::training();
        let missing = layout.missing(&features);
        assert_eq!(missing.len(), 87 - 21);
        assert!(missing.contains(&"web_traffic"));
        assert!(!missing.contains(&"nb_dots"));
        assert_eq!(layout.unused(&features), vec!["tld_length"]);
    }

    #[test]
    fn custom_layouts_follow_their_own_order() {
        let layout = FeatureLayout::from_names(["ip", "nb_dots", "unknown"]).unwrap();
        let features = extract_features("http://10.0.0.1/a.b");
        assert_eq!(layout.align(&features), vec![1.0, 4.0, 0.0]);
    }

    #[test]
    fn rejects_bad_layouts() {
        assert!(FeatureLayout::from_names(Vec::<String>::new()).is_err());
        assert!(FeatureLayout::from_names(["a", " "]).is_err());
        assert!(FeatureLayout::from_names(["a", "b", "a"]).is_err());
    }
}
