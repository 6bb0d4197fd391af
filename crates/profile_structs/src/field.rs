//! Declared input domains for every profile field.
//!
//! The form renderer and the form parser both read [`FIELDS`], so a widget can
//! never offer a value the parser would reject.

use crate::choices::{
    CityTier, Designation, Gender, MaritalStatus, Occupation, ProductPitched, TypeofContact,
};
use crate::ProfileError;

/// Valid values for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDomain {
    /// Bounded integer input.
    Range {
        min: i64,
        max: i64,
        step: i64,
        default: i64,
    },

    /// Integer picked from a fixed list.
    IntChoice {
        options: &'static [i64],
        default: i64,
    },

    /// Label picked from a fixed list.
    Choice {
        options: &'static [&'static str],
        default: &'static str,
    },
}

/// A named field and its domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub domain: FieldDomain,
}

const fn range(name: &'static str, min: i64, max: i64, default: i64, step: i64) -> FieldSpec {
    FieldSpec {
        name,
        domain: FieldDomain::Range {
            min,
            max,
            step,
            default,
        },
    }
}

const fn flag(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        domain: FieldDomain::IntChoice {
            options: &[0, 1],
            default: 0,
        },
    }
}

const fn choice(
    name: &'static str,
    options: &'static [&'static str],
    default: &'static str,
) -> FieldSpec {
    FieldSpec {
        name,
        domain: FieldDomain::Choice { options, default },
    }
}

pub const AGE: FieldSpec = range("Age", 18, 90, 32, 1);
pub const TYPEOF_CONTACT: FieldSpec =
    choice(TypeofContact::FIELD, TypeofContact::CHOICES, "Self Inquiry");
pub const CITY_TIER: FieldSpec = choice(CityTier::FIELD, CityTier::CHOICES, "Tier 1");
pub const OCCUPATION: FieldSpec = choice(Occupation::FIELD, Occupation::CHOICES, "Salaried");
pub const GENDER: FieldSpec = choice(Gender::FIELD, Gender::CHOICES, "Male");
pub const NUMBER_OF_PERSON_VISITING: FieldSpec = range("NumberOfPersonVisiting", 1, 10, 2, 1);
pub const PREFERRED_PROPERTY_STAR: FieldSpec = range("PreferredPropertyStar", 1, 5, 4, 1);
pub const MARITAL_STATUS: FieldSpec =
    choice(MaritalStatus::FIELD, MaritalStatus::CHOICES, "Single");
pub const NUMBER_OF_TRIPS: FieldSpec = range("NumberOfTrips", 0, 50, 3, 1);
pub const PASSPORT: FieldSpec = flag("Passport");
pub const OWN_CAR: FieldSpec = flag("OwnCar");
pub const NUMBER_OF_CHILDREN_VISITING: FieldSpec = range("NumberOfChildrenVisiting", 0, 10, 0, 1);
pub const DESIGNATION: FieldSpec = choice(Designation::FIELD, Designation::CHOICES, "Executive");
pub const MONTHLY_INCOME: FieldSpec = range("MonthlyIncome", 0, 1_000_000, 70_000, 1000);
pub const PITCH_SATISFACTION_SCORE: FieldSpec = range("PitchSatisfactionScore", 1, 5, 4, 1);
pub const PRODUCT_PITCHED: FieldSpec =
    choice(ProductPitched::FIELD, ProductPitched::CHOICES, "Basic");
pub const NUMBER_OF_FOLLOWUPS: FieldSpec = range("NumberOfFollowups", 0, 20, 2, 1);
pub const DURATION_OF_PITCH: FieldSpec = range("DurationOfPitch", 0, 120, 15, 1);

/// Every profile field in training column order.
pub static FIELDS: [FieldSpec; 18] = [
    AGE,
    TYPEOF_CONTACT,
    CITY_TIER,
    OCCUPATION,
    GENDER,
    NUMBER_OF_PERSON_VISITING,
    PREFERRED_PROPERTY_STAR,
    MARITAL_STATUS,
    NUMBER_OF_TRIPS,
    PASSPORT,
    OWN_CAR,
    NUMBER_OF_CHILDREN_VISITING,
    DESIGNATION,
    MONTHLY_INCOME,
    PITCH_SATISFACTION_SCORE,
    PRODUCT_PITCHED,
    NUMBER_OF_FOLLOWUPS,
    DURATION_OF_PITCH,
];

/// Looks up a field by column name.
#[must_use]
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.name == name)
}

impl FieldSpec {
    /// Default value rendered as form text.
    #[must_use]
    pub fn default_text(&self) -> String {
        match self.domain {
            FieldDomain::Range { default, .. } | FieldDomain::IntChoice { default, .. } => {
                default.to_string()
            }
            FieldDomain::Choice { default, .. } => default.to_owned(),
        }
    }

    /// Checks an integer against this field's domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is outside the range or not in the option
    /// list, or if the field is categorical.
    pub fn check_int(&self, value: i64) -> Result<i64, ProfileError> {
        match self.domain {
            FieldDomain::Range { min, max, .. } if (min..=max).contains(&value) => Ok(value),
            FieldDomain::Range { min, max, .. } => Err(ProfileError::OutOfRange {
                field: self.name,
                value,
                min,
                max,
            }),
            FieldDomain::IntChoice { options, .. } if options.contains(&value) => Ok(value),
            FieldDomain::IntChoice { options, .. } => Err(ProfileError::UnknownChoice {
                field: self.name,
                value: value.to_string(),
                allowed: join_ints(options),
            }),
            FieldDomain::Choice { options, .. } => Err(ProfileError::UnknownChoice {
                field: self.name,
                value: value.to_string(),
                allowed: options.join(", "),
            }),
        }
    }

    /// Parses form text as an integer and checks it against the domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a whole number or is out of domain.
    pub fn parse_int(&self, raw: &str) -> Result<i64, ProfileError> {
        let value = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ProfileError::NotAnInteger {
                field: self.name,
                value: raw.to_owned(),
            })?;
        self.check_int(value)
    }
}

fn join_ints(options: &[i64]) -> String {
    options
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
