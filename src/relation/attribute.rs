use std::fmt;

use crate::data_type::DataType;

/// A column of a relation, with its semantic type
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    data_type: DataType,
}

impl Attribute {
    /// Constructor
    pub fn new<S: Into<String>>(name: S, data_type: DataType) -> Attribute {
        Attribute {
            name: name.into(),
            data_type,
        }
    }

    /// Return the `Attribute`'s name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.data_type)
    }
}

impl<S: Into<String>> From<(S, DataType)> for Attribute {
    fn from((name, data_type): (S, DataType)) -> Self {
        Attribute::new(name, data_type)
    }
}
