use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const MIN_AGE: u8 = 1;
pub const MAX_AGE: u8 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(()),
        }
    }
}

/// Form fields of a passenger record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PassengerField {
    Name,
    Age,
    Gender,
    IdProof,
}

/// Details of the traveller occupying one seat
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerRecord {
    pub name: String,
    pub age: Option<u8>,
    pub gender: Option<Gender>,
    pub id_proof: String,
}

impl PassengerRecord {
    /// Write one field from raw form input. A value that does not parse
    /// (age outside 1..=120, unknown gender) clears the field.
    pub fn set(&mut self, field: PassengerField, value: &str) {
        match field {
            PassengerField::Name => self.name = value.to_string(),
            PassengerField::IdProof => self.id_proof = value.to_string(),
            PassengerField::Age => {
                self.age = value
                    .trim()
                    .parse::<u8>()
                    .ok()
                    .filter(|age| (MIN_AGE..=MAX_AGE).contains(age));
            }
            PassengerField::Gender => self.gender = value.parse().ok(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && self.age.is_some()
            && self.gender.is_some()
            && !self.id_proof.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_complete_only_with_all_fields() {
        let mut record = PassengerRecord::default();
        record.set(PassengerField::Name, "Asha Rao");
        record.set(PassengerField::Age, "34");
        record.set(PassengerField::Gender, "female");
        assert!(!record.is_complete());

        record.set(PassengerField::IdProof, "P1234567");
        assert!(record.is_complete());

        record.set(PassengerField::Name, "   ");
        assert!(!record.is_complete());
    }

    #[test]
    fn test_age_out_of_range_clears_field() {
        let mut record = PassengerRecord::default();
        record.set(PassengerField::Age, "42");
        assert_eq!(record.age, Some(42));
        record.set(PassengerField::Age, "0");
        assert_eq!(record.age, None);
        record.set(PassengerField::Age, "121");
        assert_eq!(record.age, None);
        record.set(PassengerField::Age, "forty");
        assert_eq!(record.age, None);
    }

    #[test]
    fn test_unknown_gender_clears_field() {
        let mut record = PassengerRecord::default();
        record.set(PassengerField::Gender, "other");
        assert_eq!(record.gender, Some(Gender::Other));
        record.set(PassengerField::Gender, "");
        assert_eq!(record.gender, None);
    }
}
