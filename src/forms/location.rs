use crate::error::ValidationError;
use crate::models::LocationMode;

/// Location fields of the showcase create/edit form.
///
/// Editing one search mode clears the other's fields, so the form never holds
/// an address search and an area search at the same time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationForm {
    address: String,
    radius: Option<f32>,
    cities: Vec<String>,
    townships: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationValidation {
    pub is_valid: bool,
    pub error: Option<ValidationError>,
}

impl LocationForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill from a saved collection when editing
    pub fn from_mode(mode: Option<&LocationMode>) -> Self {
        match mode {
            Some(LocationMode::Address {
                address,
                radius_miles,
            }) => Self {
                address: address.clone(),
                radius: Some(*radius_miles),
                ..Self::default()
            },
            Some(LocationMode::Area { cities, townships }) => Self {
                cities: cities.clone(),
                townships: townships.clone(),
                ..Self::default()
            },
            None => Self::default(),
        }
    }

    pub fn with_address(mut self, address: &str) -> Self {
        self.set_address(address);
        self
    }

    pub fn with_radius(mut self, radius: Option<f32>) -> Self {
        self.set_radius(radius);
        self
    }

    pub fn with_city(mut self, city: &str) -> Self {
        self.add_city(city);
        self
    }

    pub fn with_township(mut self, township: &str) -> Self {
        self.add_township(township);
        self
    }

    fn clear_area(&mut self) {
        self.cities.clear();
        self.townships.clear();
    }

    fn clear_address(&mut self) {
        self.address.clear();
        self.radius = None;
    }

    pub fn set_address(&mut self, address: &str) {
        self.address = address.to_string();
        if self.has_address() {
            self.clear_area();
        }
    }

    /// Radius in miles around the address; zero or negative counts as unset
    pub fn set_radius(&mut self, radius: Option<f32>) {
        self.radius = radius.filter(|r| *r > 0.0);
        if self.radius.is_some() {
            self.clear_area();
        }
    }

    pub fn add_city(&mut self, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            return;
        }
        self.clear_address();
        if !self.cities.iter().any(|c| c.eq_ignore_ascii_case(city)) {
            self.cities.push(city.to_string());
        }
    }

    pub fn remove_city(&mut self, city: &str) {
        self.cities.retain(|c| !c.eq_ignore_ascii_case(city));
    }

    pub fn add_township(&mut self, township: &str) {
        let township = township.trim();
        if township.is_empty() {
            return;
        }
        self.clear_address();
        if !self.townships.iter().any(|t| t.eq_ignore_ascii_case(township)) {
            self.townships.push(township.to_string());
        }
    }

    pub fn remove_township(&mut self, township: &str) {
        self.townships.retain(|t| !t.eq_ignore_ascii_case(township));
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn radius(&self) -> Option<f32> {
        self.radius
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn townships(&self) -> &[String] {
        &self.townships
    }

    fn has_address(&self) -> bool {
        !self.address.trim().is_empty()
    }

    fn has_area(&self) -> bool {
        !self.cities.is_empty() || !self.townships.is_empty()
    }

    fn check(&self) -> Result<(), ValidationError> {
        if self.has_address() && self.radius.is_none() {
            return Err(ValidationError::RadiusRequired);
        }
        if !self.has_address() && !self.has_area() {
            return Err(ValidationError::LocationRequired);
        }
        Ok(())
    }

    /// The validated search mode
    pub fn to_mode(&self) -> Result<LocationMode, ValidationError> {
        self.check()?;
        match self.radius {
            Some(radius) if self.has_address() => Ok(LocationMode::Address {
                address: self.address.trim().to_string(),
                radius_miles: radius,
            }),
            _ => Ok(LocationMode::Area {
                cities: self.cities.clone(),
                townships: self.townships.clone(),
            }),
        }
    }
}

pub fn validate_location(form: &LocationForm) -> LocationValidation {
    match form.check() {
        Ok(()) => LocationValidation {
            is_valid: true,
            error: None,
        },
        Err(error) => LocationValidation {
            is_valid: false,
            error: Some(error),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_without_radius_is_invalid() {
        let form = LocationForm::new()
            .with_address("123 Main St")
            .with_radius(None);
        let result = validate_location(&form);
        assert!(!result.is_valid);
        assert_eq!(result.error, Some(ValidationError::RadiusRequired));
    }

    #[test]
    fn cities_without_address_is_valid() {
        let form = LocationForm::new()
            .with_address("")
            .with_city("Philadelphia, PA");
        assert!(validate_location(&form).is_valid);
        assert_eq!(
            form.to_mode().unwrap(),
            LocationMode::Area {
                cities: vec!["Philadelphia, PA".into()],
                townships: vec![]
            }
        );
    }

    #[test]
    fn empty_form_needs_a_location() {
        let result = validate_location(&LocationForm::new());
        assert_eq!(result.error, Some(ValidationError::LocationRequired));
    }

    #[test]
    fn address_with_radius_is_valid() {
        let form = LocationForm::new()
            .with_address(" 123 Main St ")
            .with_radius(Some(5.0));
        assert_eq!(
            form.to_mode().unwrap(),
            LocationMode::Address {
                address: "123 Main St".into(),
                radius_miles: 5.0
            }
        );
    }

    #[test]
    fn modes_clear_each_other() {
        let mut form = LocationForm::new()
            .with_city("Ardmore, PA")
            .with_township("Lower Merion");
        form.set_address("10 Lancaster Ave");
        assert!(form.cities().is_empty());
        assert!(form.townships().is_empty());

        form.set_radius(Some(3.0));
        form.add_township("Haverford");
        assert_eq!(form.address(), "");
        assert_eq!(form.radius(), None);
        assert_eq!(form.townships(), &["Haverford".to_string()]);
    }

    #[test]
    fn duplicate_and_removed_areas() {
        let mut form = LocationForm::new()
            .with_city("Philadelphia, PA")
            .with_city("philadelphia, pa");
        assert_eq!(form.cities().len(), 1);
        form.remove_city("Philadelphia, PA");
        assert!(!validate_location(&form).is_valid);

        form.add_township("Lower Merion");
        assert!(validate_location(&form).is_valid);
        form.remove_township("LOWER MERION");
        assert!(form.townships().is_empty());
        assert!(!validate_location(&form).is_valid);
    }

    #[test]
    fn prefill_round_trips_saved_mode() {
        let mode = LocationMode::Address {
            address: "1 Market St".into(),
            radius_miles: 2.0,
        };
        assert_eq!(LocationForm::from_mode(Some(&mode)).to_mode().unwrap(), mode);
    }
}
