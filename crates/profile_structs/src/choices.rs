//! Categorical profile fields.
//!
//! Each enum serializes to the exact label the model was trained on, so the
//! same string flows through the form, the JSON API and the one-hot encoding.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::ProfileError;

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $field:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Column name of this field.
            pub const FIELD: &'static str = $field;

            /// Allowed labels, in display order.
            pub const CHOICES: &'static [&'static str] = &[$($label),+];

            /// Returns the label the model was trained on.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ProfileError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::iter()
                    .find(|choice| choice.as_str() == s)
                    .ok_or_else(|| ProfileError::UnknownChoice {
                        field: $field,
                        value: s.to_owned(),
                        allowed: Self::CHOICES.join(", "),
                    })
            }
        }
    };
}

choice_enum! {
    /// How the customer was contacted.
    TypeofContact as "TypeofContact" {
        CompanyInvited => "Company Invited",
        SelfInquiry => "Self Inquiry",
    }
}

choice_enum! {
    /// City development tier.
    CityTier as "CityTier" {
        Tier1 => "Tier 1",
        Tier2 => "Tier 2",
        Tier3 => "Tier 3",
    }
}

choice_enum! {
    Occupation as "Occupation" {
        Salaried => "Salaried",
        Freelancer => "Freelancer",
        SelfEmployed => "Self Employed",
        Student => "Student",
        Retired => "Retired",
    }
}

choice_enum! {
    Gender as "Gender" {
        Male => "Male",
        Female => "Female",
    }
}

choice_enum! {
    MaritalStatus as "MaritalStatus" {
        Single => "Single",
        Married => "Married",
        Divorced => "Divorced",
    }
}

choice_enum! {
    /// Job level within the customer's organization.
    Designation as "Designation" {
        Executive => "Executive",
        Manager => "Manager",
        SeniorManager => "Senior Manager",
        Avp => "AVP",
        Vp => "VP",
        Director => "Director",
    }
}

choice_enum! {
    /// Travel package pitched to the customer.
    ProductPitched as "ProductPitched" {
        Basic => "Basic",
        Deluxe => "Deluxe",
        SuperDeluxe => "Super Deluxe",
        King => "King",
        Queen => "Queen",
    }
}
