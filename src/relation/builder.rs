use super::{Attribute, Dataset, Error, QualifiedName, Relation, Result};
use crate::{
    builder::{Ready, With},
    data_type::DataType,
    sampling::Sampling,
};

/*
Relation Builder
 */

/// A Builder for Relations
#[derive(Clone, Debug, Default)]
pub struct RelationBuilder {
    /// The database of the relation
    database: Option<String>,
    /// The schema of the relation
    schema: Option<String>,
    /// The name of the relation
    name: Option<String>,
    is_view: bool,
    unsampled: bool,
    include_outliers: bool,
    max_number_of_outliers: Option<usize>,
    sampling: Option<Sampling>,
    attributes: Vec<Attribute>,
    data: Option<Dataset>,
}

impl RelationBuilder {
    pub fn new() -> Self {
        RelationBuilder::default()
    }

    pub fn database<S: Into<String>>(mut self, database: S) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn schema<S: Into<String>>(mut self, schema: S) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn qualified_name(self, name: QualifiedName) -> Self {
        self.database(name.database)
            .schema(name.schema)
            .name(name.name)
    }

    pub fn view(mut self, is_view: bool) -> Self {
        self.is_view = is_view;
        self
    }

    pub fn unsampled(mut self, unsampled: bool) -> Self {
        self.unsampled = unsampled;
        self
    }

    pub fn include_outliers(mut self, include_outliers: bool) -> Self {
        self.include_outliers = include_outliers;
        self
    }

    pub fn max_number_of_outliers(mut self, max_number_of_outliers: usize) -> Self {
        self.max_number_of_outliers = Some(max_number_of_outliers);
        self
    }

    pub fn sampling<S: Into<Sampling>>(mut self, sampling: S) -> Self {
        self.sampling = Some(sampling.into());
        self
    }

    pub fn data(mut self, data: Dataset) -> Self {
        self.data = Some(data);
        self
    }
}

impl With<Attribute> for RelationBuilder {
    fn with(mut self, input: Attribute) -> Self {
        self.attributes.push(input);
        self
    }
}

impl<S: Into<String>> With<(S, DataType)> for RelationBuilder {
    fn with(self, (name, data_type): (S, DataType)) -> Self {
        self.with(Attribute::new(name, data_type))
    }
}

impl Ready<Relation> for RelationBuilder {
    type Error = Error;

    fn try_build(self) -> Result<Relation> {
        let (database, schema, name) = match (self.database, self.schema, self.name) {
            (Some(database), Some(schema), Some(name)) => (database, schema, name),
            (database, schema, name) => {
                return Err(Error::invalid_relation(format!(
                    "{}.{}.{}",
                    database.as_deref().unwrap_or("?"),
                    schema.as_deref().unwrap_or("?"),
                    name.as_deref().unwrap_or("?"),
                )))
            }
        };
        let mut relation = Relation::new(
            QualifiedName::new(database, schema, name),
            self.attributes,
        );
        relation.set_is_view(self.is_view);
        relation.set_unsampled(self.unsampled);
        relation.set_include_outliers(self.include_outliers);
        if let Some(max_number_of_outliers) = self.max_number_of_outliers {
            relation.set_max_number_of_outliers(max_number_of_outliers);
        }
        if let Some(sampling) = self.sampling {
            relation.set_sampling(sampling);
        }
        relation.set_data(self.data);
        Ok(relation)
    }
}
