pub mod location;
pub mod property_types;

pub use location::{validate_location, LocationForm, LocationValidation};
pub use property_types::validate_property_types;

use crate::error::ValidationError;
use crate::models::{Preferences, PropertyTypes};

/// The showcase create/edit form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowcaseForm {
    pub min_beds: Option<u32>,
    pub max_beds: Option<u32>,
    pub min_baths: Option<f32>,
    pub max_baths: Option<f32>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub location: LocationForm,
    pub property_types: PropertyTypes,
}

fn check_range<T: PartialOrd>(
    min: Option<T>,
    max: Option<T>,
    field: &'static str,
) -> Result<(), ValidationError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(ValidationError::InvalidRange(field)),
        _ => Ok(()),
    }
}

impl ShowcaseForm {
    pub fn from_preferences(prefs: &Preferences) -> Self {
        Self {
            min_beds: prefs.min_beds,
            max_beds: prefs.max_beds,
            min_baths: prefs.min_baths,
            max_baths: prefs.max_baths,
            min_price: prefs.min_price,
            max_price: prefs.max_price,
            location: LocationForm::from_mode(prefs.location.as_ref()),
            property_types: prefs.property_types,
        }
    }

    /// Validate every field and build the preferences to submit.
    /// The first failing rule is reported.
    pub fn validate(&self) -> Result<Preferences, ValidationError> {
        let location = self.location.to_mode()?;
        if !validate_property_types(&self.property_types) {
            return Err(ValidationError::PropertyTypeRequired);
        }
        check_range(self.min_price, self.max_price, "price")?;
        check_range(self.min_beds, self.max_beds, "beds")?;
        check_range(self.min_baths, self.max_baths, "baths")?;

        Ok(Preferences {
            min_beds: self.min_beds,
            max_beds: self.max_beds,
            min_baths: self.min_baths,
            max_baths: self.max_baths,
            min_price: self.min_price,
            max_price: self.max_price,
            location: Some(location),
            property_types: self.property_types,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LocationMode;

    fn valid_form() -> ShowcaseForm {
        ShowcaseForm {
            min_price: Some(250_000),
            max_price: Some(450_000),
            location: LocationForm::new().with_city("Philadelphia, PA"),
            property_types: PropertyTypes {
                condo: true,
                ..PropertyTypes::default()
            },
            ..ShowcaseForm::default()
        }
    }

    #[test]
    fn valid_form_builds_preferences() {
        let prefs = valid_form().validate().unwrap();
        assert!(matches!(prefs.location, Some(LocationMode::Area { .. })));
        assert_eq!(prefs.max_price, Some(450_000));
    }

    #[test]
    fn property_types_block_submission() {
        let mut form = valid_form();
        form.property_types = PropertyTypes::default();
        assert_eq!(form.validate(), Err(ValidationError::PropertyTypeRequired));
    }

    #[test]
    fn inverted_price_range_is_rejected() {
        let mut form = valid_form();
        form.min_price = Some(900_000);
        assert_eq!(form.validate(), Err(ValidationError::InvalidRange("price")));
    }

    #[test]
    fn edit_form_prefills_from_saved_preferences() {
        let prefs = valid_form().validate().unwrap();
        assert_eq!(ShowcaseForm::from_preferences(&prefs).validate().unwrap(), prefs);
    }
}
