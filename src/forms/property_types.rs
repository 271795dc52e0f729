use crate::models::PropertyTypes;

/// At least one listing category must be selected
pub fn validate_property_types(form: &PropertyTypes) -> bool {
    form.any()
}
