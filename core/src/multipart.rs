//! `multipart/form-data` forms as plain data.
//!
//! # Design
//! The core only records which fields a form has. Encoding them (boundary,
//! header escaping, part content types) is left to the host's HTTP library,
//! which already knows how to do it.

use crate::types::FileUpload;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartValue {
    Text(String),
    File(FileUpload),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub value: PartValue,
}

/// An ordered list of form fields. Repeated names are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: PartValue::Text(value.into()),
        });
        self
    }

    pub fn file(mut self, name: impl Into<String>, file: FileUpload) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: PartValue::File(file),
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn into_parts(self) -> Vec<FormPart> {
        self.parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_parts_in_insertion_order() {
        let photo = FileUpload::new("a.png", "image/png", vec![1, 2, 3]);
        let form = MultipartForm::new()
            .text("ocoId", "42")
            .file("files", photo.clone())
            .text("ocoId", "43");

        let names: Vec<&str> = form.parts().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["ocoId", "files", "ocoId"]);
        assert_eq!(form.parts()[1].value, PartValue::File(photo));
        assert_eq!(form.into_parts()[2].value, PartValue::Text("43".to_string()));
    }

    #[test]
    fn new_form_is_empty() {
        assert!(MultipartForm::new().is_empty());
        assert!(!MultipartForm::new().text("a", "b").is_empty());
    }
}
