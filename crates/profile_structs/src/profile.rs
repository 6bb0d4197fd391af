use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ProfileError;
use crate::choices::{
    CityTier, Designation, Gender, MaritalStatus, Occupation, ProductPitched, TypeofContact,
};
use crate::field::{
    AGE, DURATION_OF_PITCH, FieldSpec, MONTHLY_INCOME, NUMBER_OF_CHILDREN_VISITING,
    NUMBER_OF_FOLLOWUPS, NUMBER_OF_PERSON_VISITING, NUMBER_OF_TRIPS, OWN_CAR, PASSPORT,
    PITCH_SATISFACTION_SCORE, PREFERRED_PROPERTY_STAR,
};

/// One column value of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue {
    Int(i64),
    Label(&'static str),
}

/// Customer profile submitted for a propensity prediction.
///
/// Serialized field names match the training columns exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct CustomerProfile {
    pub age: i64,
    pub typeof_contact: TypeofContact,
    pub city_tier: CityTier,
    pub occupation: Occupation,
    pub gender: Gender,
    pub number_of_person_visiting: i64,
    pub preferred_property_star: i64,
    pub marital_status: MaritalStatus,
    pub number_of_trips: i64,
    /// 1 if the customer holds a passport
    pub passport: i64,
    /// 1 if the customer owns a car
    pub own_car: i64,
    pub number_of_children_visiting: i64,
    pub designation: Designation,
    pub monthly_income: i64,
    pub pitch_satisfaction_score: i64,
    pub product_pitched: ProductPitched,
    pub number_of_followups: i64,
    /// Pitch length in minutes
    pub duration_of_pitch: i64,
}

impl Default for CustomerProfile {
    fn default() -> Self {
        Self {
            age: 32,
            typeof_contact: TypeofContact::SelfInquiry,
            city_tier: CityTier::Tier1,
            occupation: Occupation::Salaried,
            gender: Gender::Male,
            number_of_person_visiting: 2,
            preferred_property_star: 4,
            marital_status: MaritalStatus::Single,
            number_of_trips: 3,
            passport: 0,
            own_car: 0,
            number_of_children_visiting: 0,
            designation: Designation::Executive,
            monthly_income: 70_000,
            pitch_satisfaction_score: 4,
            product_pitched: ProductPitched::Basic,
            number_of_followups: 2,
            duration_of_pitch: 15,
        }
    }
}

impl CustomerProfile {
    /// Parses a submitted form, keyed by column name.
    ///
    /// # Errors
    ///
    /// Returns the first field that is missing or outside its domain.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, ProfileError> {
        let raw = |spec: &FieldSpec| {
            form.get(spec.name)
                .map(String::as_str)
                .ok_or(ProfileError::MissingField { field: spec.name })
        };
        let int = |spec: &FieldSpec| raw(spec).and_then(|value| spec.parse_int(value));
        let label = |field: &'static str| {
            form.get(field)
                .map(|value| value.trim())
                .ok_or(ProfileError::MissingField { field })
        };

        Ok(Self {
            age: int(&AGE)?,
            typeof_contact: label(TypeofContact::FIELD)?.parse()?,
            city_tier: label(CityTier::FIELD)?.parse()?,
            occupation: label(Occupation::FIELD)?.parse()?,
            gender: label(Gender::FIELD)?.parse()?,
            number_of_person_visiting: int(&NUMBER_OF_PERSON_VISITING)?,
            preferred_property_star: int(&PREFERRED_PROPERTY_STAR)?,
            marital_status: label(MaritalStatus::FIELD)?.parse()?,
            number_of_trips: int(&NUMBER_OF_TRIPS)?,
            passport: int(&PASSPORT)?,
            own_car: int(&OWN_CAR)?,
            number_of_children_visiting: int(&NUMBER_OF_CHILDREN_VISITING)?,
            designation: label(Designation::FIELD)?.parse()?,
            monthly_income: int(&MONTHLY_INCOME)?,
            pitch_satisfaction_score: int(&PITCH_SATISFACTION_SCORE)?,
            product_pitched: label(ProductPitched::FIELD)?.parse()?,
            number_of_followups: int(&NUMBER_OF_FOLLOWUPS)?,
            duration_of_pitch: int(&DURATION_OF_PITCH)?,
        })
    }

    /// Checks every integer field against its declared domain.
    ///
    /// Categorical fields are valid by construction.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-domain field.
    pub fn validate(&self) -> Result<(), ProfileError> {
        for (spec, value) in [
            (&AGE, self.age),
            (&NUMBER_OF_PERSON_VISITING, self.number_of_person_visiting),
            (&PREFERRED_PROPERTY_STAR, self.preferred_property_star),
            (&NUMBER_OF_TRIPS, self.number_of_trips),
            (&PASSPORT, self.passport),
            (&OWN_CAR, self.own_car),
            (&NUMBER_OF_CHILDREN_VISITING, self.number_of_children_visiting),
            (&MONTHLY_INCOME, self.monthly_income),
            (&PITCH_SATISFACTION_SCORE, self.pitch_satisfaction_score),
            (&NUMBER_OF_FOLLOWUPS, self.number_of_followups),
            (&DURATION_OF_PITCH, self.duration_of_pitch),
        ] {
            spec.check_int(value)?;
        }
        Ok(())
    }

    /// Returns `(column, value)` pairs in training column order.
    #[must_use]
    pub const fn columns(&self) -> [(&'static str, FieldValue); 18] {
        use FieldValue::{Int, Label};

        [
            (AGE.name, Int(self.age)),
            (TypeofContact::FIELD, Label(self.typeof_contact.as_str())),
            (CityTier::FIELD, Label(self.city_tier.as_str())),
            (Occupation::FIELD, Label(self.occupation.as_str())),
            (Gender::FIELD, Label(self.gender.as_str())),
            (
                NUMBER_OF_PERSON_VISITING.name,
                Int(self.number_of_person_visiting),
            ),
            (PREFERRED_PROPERTY_STAR.name, Int(self.preferred_property_star)),
            (MaritalStatus::FIELD, Label(self.marital_status.as_str())),
            (NUMBER_OF_TRIPS.name, Int(self.number_of_trips)),
            (PASSPORT.name, Int(self.passport)),
            (OWN_CAR.name, Int(self.own_car)),
            (
                NUMBER_OF_CHILDREN_VISITING.name,
                Int(self.number_of_children_visiting),
            ),
            (Designation::FIELD, Label(self.designation.as_str())),
            (MONTHLY_INCOME.name, Int(self.monthly_income)),
            (
                PITCH_SATISFACTION_SCORE.name,
                Int(self.pitch_satisfaction_score),
            ),
            (ProductPitched::FIELD, Label(self.product_pitched.as_str())),
            (NUMBER_OF_FOLLOWUPS.name, Int(self.number_of_followups)),
            (DURATION_OF_PITCH.name, Int(self.duration_of_pitch)),
        ]
    }

    /// Renders every field as form text, keyed by column name.
    #[must_use]
    pub fn to_form(&self) -> HashMap<String, String> {
        self.columns()
            .into_iter()
            .map(|(name, value)| {
                let text = match value {
                    FieldValue::Int(v) => v.to_string(),
                    FieldValue::Label(label) => label.to_owned(),
                };
                (name.to_owned(), text)
            })
            .collect()
    }
}
