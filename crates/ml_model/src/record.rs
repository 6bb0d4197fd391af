//! Single-row tabular view of a profile, and its encoding into the feature
//! vector a booster consumes.

use profile_structs::{CustomerProfile, FieldValue};

use crate::InferenceError;

/// One row of named columns, in training column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularRecord {
    columns: Vec<(&'static str, FieldValue)>,
}

impl From<&CustomerProfile> for TabularRecord {
    fn from(profile: &CustomerProfile) -> Self {
        Self {
            columns: profile.columns().to_vec(),
        }
    }
}

impl TabularRecord {
    /// Builds a record from explicit columns.
    #[must_use]
    pub const fn new(columns: Vec<(&'static str, FieldValue)>) -> Self {
        Self { columns }
    }

    /// Returns the value of a column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<FieldValue> {
        self.columns
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| *value)
    }

    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|(name, _)| *name)
    }

    /// Encodes the record into one value per model feature.
    ///
    /// A feature named exactly like an integer column takes its value. A
    /// feature named `{column}_{category}` is the one-hot indicator of that
    /// category.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::SchemaMismatch`] for a feature that cannot be
    /// derived from the record.
    pub fn encode(&self, feature_names: &[String]) -> Result<Vec<f32>, InferenceError> {
        feature_names
            .iter()
            .map(|feature| self.encode_feature(feature))
            .collect()
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "boosters compare features as f32"
    )]
    fn encode_feature(&self, feature: &str) -> Result<f32, InferenceError> {
        let mismatch = |reason| InferenceError::SchemaMismatch {
            feature: feature.to_owned(),
            reason,
        };

        if let Some(value) = self.get(feature) {
            return match value {
                FieldValue::Int(v) => Ok(v as f32),
                FieldValue::Label(_) => Err(mismatch("categorical column used as a numeric feature")),
            };
        }

        let (value, category) = self
            .columns
            .iter()
            .find_map(|(name, value)| {
                feature
                    .strip_prefix(*name)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|category| (*value, category))
            })
            .ok_or_else(|| mismatch("no column with this name or prefix"))?;

        let hot = match value {
            FieldValue::Label(label) => label == category,
            FieldValue::Int(v) => category.parse::<i64>().is_ok_and(|c| c == v),
        };

        Ok(if hot { 1.0 } else { 0.0 })
    }
}

#[cfg(test)]
mod tests {
    use profile_structs::{ProductPitched, TypeofContact};

    use super::*;

    fn names(features: &[&str]) -> Vec<String> {
        features.iter().map(|f| (*f).to_owned()).collect()
    }

    #[test]
    fn test_record_follows_profile_columns() {
        let record = TabularRecord::from(&CustomerProfile::default());
        assert_eq!(record.column_names().count(), 18);
        assert_eq!(record.get("Age"), Some(FieldValue::Int(32)));
        assert_eq!(
            record.get("TypeofContact"),
            Some(FieldValue::Label("Self Inquiry"))
        );
        assert_eq!(record.get("Salary"), None);
    }

    #[test]
    fn test_encode_numeric_and_one_hot() {
        let profile = CustomerProfile {
            typeof_contact: TypeofContact::CompanyInvited,
            product_pitched: ProductPitched::King,
            passport: 1,
            ..CustomerProfile::default()
        };
        let record = TabularRecord::from(&profile);

        let encoded = record
            .encode(&names(&[
                "MonthlyIncome",
                "TypeofContact_Company Invited",
                "TypeofContact_Self Inquiry",
                "ProductPitched_King",
                "Passport_1",
                "Occupation_Large Business",
            ]))
            .unwrap();

        assert_eq!(encoded, vec![70_000.0, 1.0, 0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_encode_unknown_feature() {
        let record = TabularRecord::from(&CustomerProfile::default());
        let err = record.encode(&names(&["Age", "CustomerID"])).unwrap_err();
        assert_eq!(
            err,
            InferenceError::SchemaMismatch {
                feature: "CustomerID".to_owned(),
                reason: "no column with this name or prefix",
            }
        );
    }

    #[test]
    fn test_encode_raw_categorical_is_mismatch() {
        let record = TabularRecord::from(&CustomerProfile::default());
        assert!(matches!(
            record.encode(&names(&["Designation"])),
            Err(InferenceError::SchemaMismatch { .. })
        ));
    }
}
